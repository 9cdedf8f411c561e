//! MOENV real-time AQI snapshot (aqx_p_432).

use indexmap::IndexMap;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, info};

use super::{get_json, join_url};
use crate::error::FetchError;

const FEED: &str = "moenv-aqi";
const DATASET: &str = "aqx_p_432";
const PAGE_SIZE: &str = "1000";
/// Pre-encoded so the space goes out as `%20`; form encoding would send `+`.
const SORT_QUERY: &str = "sort=ImportDate%20desc";

#[derive(Debug, Deserialize)]
pub struct AqiResponse {
    #[serde(default)]
    records: Vec<StationRecord>,
}

#[derive(Debug, Deserialize)]
pub struct StationRecord {
    pub county: String,
    pub sitename: String,
    /// Numeric string; blank while a station is offline.
    #[serde(default)]
    pub aqi: String,
    #[serde(default)]
    pub status: String,
}

/// Reading for one station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirReading {
    pub aqi: i64,
    pub status: String,
}

/// `"{county}{sitename}"` → reading, in response order.
pub type StationIndex = IndexMap<String, AirReading>;

pub struct AirQualityClient {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl AirQualityClient {
    pub fn new(http: reqwest::Client, base_url: &str, api_key: SecretString) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
            api_key,
        }
    }

    /// Fetch the latest snapshot and describe the first station whose
    /// composite key appears in `address`. Refetched on every call.
    pub async fn fetch_air_quality(&self, address: &str) -> Result<String, FetchError> {
        let request = self
            .http
            .get(format!("{}?{SORT_QUERY}", join_url(&self.base_url, DATASET)))
            .query(&[
                ("api_key", self.api_key.expose_secret()),
                ("limit", PAGE_SIZE),
                ("format", "JSON"),
            ]);

        let response: AqiResponse = get_json(request, FEED).await?;
        let index = build_index(response.records);
        info!(stations = index.len(), "Air quality snapshot loaded");

        lookup(&index, address)
            .map(|(key, reading)| {
                debug!(station = %key, aqi = reading.aqi, "Air quality station matched");
                format_reading(reading)
            })
            .ok_or_else(|| FetchError::NoMatch {
                what: "air quality station",
                input: address.to_string(),
            })
    }
}

/// Index station records by composite key. A repeated key overwrites the
/// earlier value but keeps its original position. Records whose AQI is not
/// an integer are skipped.
pub fn build_index(records: Vec<StationRecord>) -> StationIndex {
    let mut index = StationIndex::with_capacity(records.len());
    for record in records {
        let Ok(aqi) = record.aqi.trim().parse::<i64>() else {
            debug!(
                county = %record.county,
                site = %record.sitename,
                aqi = %record.aqi,
                "Skipping station without numeric AQI"
            );
            continue;
        };
        index.insert(
            format!("{}{}", record.county, record.sitename),
            AirReading {
                aqi,
                status: record.status,
            },
        );
    }
    index
}

/// First station, in index order, whose composite key is contained in `address`.
pub fn lookup<'a>(index: &'a StationIndex, address: &str) -> Option<(&'a str, &'a AirReading)> {
    index
        .iter()
        .find(|(key, _)| address.contains(key.as_str()))
        .map(|(key, reading)| (key.as_str(), reading))
}

pub fn format_reading(reading: &AirReading) -> String {
    format!("AQI: {}，空氣品質{}\n", reading.aqi, reading.status)
}
