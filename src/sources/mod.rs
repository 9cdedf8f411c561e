//! Third-party data feeds: CWA forecast and earthquake reports, MOENV air
//! quality, and the static livestream camera table.

pub mod air_quality;
pub mod camera;
pub mod forecast;
pub mod region;
pub mod seismic;

pub use air_quality::AirQualityClient;
pub use camera::CameraTable;
pub use forecast::ForecastClient;
pub use region::{Region, normalize_address, resolve_region};
pub use seismic::{SeismicClient, SeismicReport};

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use crate::config::BotConfig;
use crate::error::FetchError;

/// Every data source the event router consults, built once at start-up.
pub struct Sources {
    pub forecast: ForecastClient,
    pub seismic: SeismicClient,
    pub air_quality: AirQualityClient,
    pub cameras: CameraTable,
}

impl Sources {
    /// Wire all sources to the configured endpoints over one HTTP client.
    pub fn from_config(config: &BotConfig, http: reqwest::Client) -> Self {
        let cwa_key = || SecretString::from(config.cwa_api_key.expose_secret().to_owned());
        let endpoints = &config.endpoints;
        Self {
            forecast: ForecastClient::new(http.clone(), &endpoints.cwa_base, cwa_key()),
            seismic: SeismicClient::new(http.clone(), &endpoints.cwa_base, cwa_key()),
            air_quality: AirQualityClient::new(
                http,
                &endpoints.moenv_base,
                SecretString::from(config.moenv_api_key.expose_secret().to_owned()),
            ),
            cameras: CameraTable::default(),
        }
    }
}

/// Send a prepared GET and decode its JSON body, mapping every failure onto
/// [`FetchError`] tagged with `feed`.
pub(crate) async fn get_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    feed: &'static str,
) -> Result<T, FetchError> {
    let resp = request
        .send()
        .await
        .map_err(|e| FetchError::from_reqwest(feed, e))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(FetchError::Rejected {
            feed,
            reason: format!("HTTP {status}: {}", body.chars().take(200).collect::<String>()),
        });
    }

    resp.json::<T>()
        .await
        .map_err(|e| FetchError::from_reqwest(feed, e))
}

/// Join a base URL and a path segment without doubling slashes.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
