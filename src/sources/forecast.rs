//! CWA 3-hour township forecast (F-D0047-xxx datasets).

use chrono::{DateTime, Duration, FixedOffset, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, info};

use super::region::resolve_region;
use super::{get_json, join_url};
use crate::error::FetchError;

const FEED: &str = "cwa-forecast";

/// Name of the weather element carrying the narrative forecast.
pub const DESCRIPTION_ELEMENT: &str = "天氣預報綜合描述";

/// CWA timestamps are Taiwan local time with no zone suffix.
const TAIWAN_UTC_OFFSET_SECS: i32 = 8 * 3600;

// ── Wire types ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    success: serde_json::Value,
    records: Option<ForecastRecords>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ForecastRecords {
    locations: Vec<LocationGroup>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LocationGroup {
    locations_name: String,
    location: Vec<SubArea>,
}

/// A township entry in the forecast response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubArea {
    pub location_name: String,
    #[serde(default)]
    weather_element: Vec<WeatherElement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WeatherElement {
    element_name: String,
    #[serde(default)]
    time: Vec<TimePeriod>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TimePeriod {
    #[serde(default)]
    start_time: Option<String>,
    #[serde(default)]
    element_value: Vec<ElementValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ElementValue {
    weather_description: Option<String>,
}

impl ForecastResponse {
    fn is_success(&self) -> bool {
        match &self.success {
            serde_json::Value::String(s) => s == "true",
            serde_json::Value::Bool(b) => *b,
            _ => false,
        }
    }
}

// ── Client ──────────────────────────────────────────────────────────────

/// Fetches the next-3-hours narrative forecast for an address.
pub struct ForecastClient {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl ForecastClient {
    pub fn new(http: reqwest::Client, base_url: &str, api_key: SecretString) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
            api_key,
        }
    }

    /// Resolve the county, query its dataset for the next three hours, and
    /// render a one-line forecast for the best-matching township.
    pub async fn fetch_forecast(&self, address: &str) -> Result<String, FetchError> {
        let region = resolve_region(address)?;
        let (time_from, time_to) = forecast_window(taiwan_now());

        info!(region = region.name, dataset = region.code, "Querying forecast");

        let request = self
            .http
            .get(join_url(&self.base_url, region.code))
            .query(&[
                ("Authorization", self.api_key.expose_secret()),
                ("elementName", DESCRIPTION_ELEMENT),
                ("timeFrom", time_from.as_str()),
                ("timeTo", time_to.as_str()),
            ]);

        let response: ForecastResponse = get_json(request, FEED).await?;
        describe(response, address)
    }
}

fn taiwan_now() -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(TAIWAN_UTC_OFFSET_SECS).expect("UTC+8 is a valid offset");
    Utc::now().with_timezone(&offset)
}

/// The `[now, now + 3h]` query window in `%Y-%m-%dT%H:%M:%S`.
pub fn forecast_window(now: DateTime<FixedOffset>) -> (String, String) {
    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
    let later = now + Duration::hours(3);
    (now.format(FORMAT).to_string(), later.format(FORMAT).to_string())
}

/// Pick the township whose name appears in `address`, trying longer names
/// first so a short name nested inside a longer one (中 in 臺中市) cannot win.
/// Equal-length names keep response order.
pub fn select_sub_area<'a>(areas: &'a [SubArea], address: &str) -> Option<&'a SubArea> {
    let mut by_length: Vec<&SubArea> = areas.iter().collect();
    by_length.sort_by_key(|a| std::cmp::Reverse(a.location_name.chars().count()));
    by_length
        .into_iter()
        .find(|a| address.contains(a.location_name.as_str()))
}

/// Turn a decoded forecast response into the user-facing sentence.
pub fn describe(response: ForecastResponse, address: &str) -> Result<String, FetchError> {
    if !response.is_success() {
        return Err(FetchError::Rejected {
            feed: FEED,
            reason: format!("success flag was {}", response.success),
        });
    }

    let records = response
        .records
        .ok_or_else(|| FetchError::malformed(FEED, "missing records"))?;
    let group = records
        .locations
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::malformed(FEED, "empty Locations"))?;

    let area = select_sub_area(&group.location, address).ok_or_else(|| {
        let available: Vec<&str> = group
            .location
            .iter()
            .map(|a| a.location_name.as_str())
            .collect();
        debug!(?available, "No township matched the address");
        FetchError::NoMatch {
            what: "township",
            input: address.to_string(),
        }
    })?;

    let element = area
        .weather_element
        .iter()
        .find(|e| e.element_name == DESCRIPTION_ELEMENT)
        .ok_or_else(|| FetchError::malformed(FEED, format!("no {DESCRIPTION_ELEMENT} element")))?;

    let period = element
        .time
        .first()
        .ok_or_else(|| FetchError::malformed(FEED, "element has no time periods"))?;

    let description = period
        .element_value
        .first()
        .and_then(|v| v.weather_description.as_deref())
        .ok_or_else(|| FetchError::malformed(FEED, "missing WeatherDescription"))?;

    debug!(start = ?period.start_time, "Forecast period selected");

    Ok(format!(
        "「{}{}」未來3個小時天氣{}",
        group.locations_name, area.location_name, description
    ))
}
