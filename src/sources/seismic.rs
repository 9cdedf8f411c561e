//! CWA earthquake reports: the small-region feed (E-A0016-001) and the
//! significant, felt-nationwide feed (E-A0015-001).

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, warn};

use super::{get_json, join_url};
use crate::error::FetchError;

const LOCAL_DATASET: &str = "E-A0016-001";
const SIGNIFICANT_DATASET: &str = "E-A0015-001";

/// Text shown when neither report can be fetched.
pub const SEISMIC_FAILURE_TEXT: &str = "抓取失敗...";

#[derive(Debug, Deserialize)]
struct QuakeResponse {
    records: QuakeRecords,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct QuakeRecords {
    earthquake: Vec<Earthquake>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Earthquake {
    report_content: String,
    #[serde(rename = "ReportImageURI")]
    report_image_uri: String,
    earthquake_info: EarthquakeInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct EarthquakeInfo {
    origin_time: String,
}

/// The most recent earthquake report with its intensity map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeismicReport {
    pub text: String,
    /// Empty when the report is the failure fallback.
    pub image_url: String,
}

impl SeismicReport {
    pub fn fallback() -> Self {
        Self {
            text: SEISMIC_FAILURE_TEXT.to_string(),
            image_url: String::new(),
        }
    }
}

/// One feed's latest entry, reduced to what selection needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuakeEntry {
    /// ISO-8601, zero padded, so lexical order is chronological.
    pub origin_time: String,
    pub report: SeismicReport,
}

pub struct SeismicClient {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl SeismicClient {
    pub fn new(http: reqwest::Client, base_url: &str, api_key: SecretString) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
            api_key,
        }
    }

    /// Latest report across both feeds. Never fails: any error on either
    /// feed yields [`SeismicReport::fallback`].
    pub async fn fetch_report(&self) -> SeismicReport {
        match self.try_fetch_report().await {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, "Earthquake report fetch failed");
                SeismicReport::fallback()
            }
        }
    }

    async fn try_fetch_report(&self) -> Result<SeismicReport, FetchError> {
        let local = self.latest_entry(LOCAL_DATASET).await?;
        let significant = self.latest_entry(SIGNIFICANT_DATASET).await?;
        Ok(pick_latest(local, significant))
    }

    async fn latest_entry(&self, dataset: &'static str) -> Result<QuakeEntry, FetchError> {
        let request = self
            .http
            .get(join_url(&self.base_url, dataset))
            .query(&[("Authorization", self.api_key.expose_secret())]);

        let response: QuakeResponse = get_json(request, dataset).await?;
        let quake = response
            .records
            .earthquake
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::malformed(dataset, "empty Earthquake list"))?;

        debug!(dataset, origin_time = %quake.earthquake_info.origin_time, "Latest quake");

        Ok(QuakeEntry {
            origin_time: quake.earthquake_info.origin_time,
            report: SeismicReport {
                text: quake.report_content,
                image_url: quake.report_image_uri,
            },
        })
    }
}

/// Prefer the small-region report unless the significant one is strictly
/// more recent.
pub fn pick_latest(local: QuakeEntry, significant: QuakeEntry) -> SeismicReport {
    if significant.origin_time > local.origin_time {
        significant.report
    } else {
        local.report
    }
}
