//! Configuration types.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Base URLs of every upstream the bot talks to.
///
/// Overridable from the environment so tests and staging can point the bot
/// at stub servers.
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// CWA open-data datastore (forecast and earthquake feeds).
    pub cwa_base: String,
    /// MOENV open-data API (air quality).
    pub moenv_base: String,
    /// LINE Messaging API.
    pub line_api_base: String,
    /// LINE data API (rich menu image upload).
    pub line_data_base: String,
    /// Radar echo composite image, served without auth.
    pub radar_image_url: String,
    /// Gemini generative language API.
    pub gemini_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            cwa_base: "https://opendata.cwa.gov.tw/api/v1/rest/datastore".to_string(),
            moenv_base: "https://data.moenv.gov.tw/api/v2".to_string(),
            line_api_base: "https://api.line.me".to_string(),
            line_data_base: "https://api-data.line.me".to_string(),
            radar_image_url:
                "https://cwaopendata.s3.ap-northeast-1.amazonaws.com/Observation/O-A0058-001.png"
                    .to_string(),
            gemini_base: "https://generativelanguage.googleapis.com".to_string(),
        }
    }
}

/// Bot configuration, loaded once at start-up.
#[derive(Debug)]
pub struct BotConfig {
    /// LINE channel access token (bearer auth for reply/push).
    pub access_token: SecretString,
    /// LINE channel secret (webhook signature key).
    pub channel_secret: SecretString,
    /// CWA open-data authorization key.
    pub cwa_api_key: SecretString,
    /// MOENV open-data API key.
    pub moenv_api_key: SecretString,
    /// Gemini key. `None` disables the assistant.
    pub gemini_api_key: Option<SecretString>,
    /// Push an assistant summary after each location reply.
    pub assistant_followup: bool,
    /// Listen address for the webhook server.
    pub bind_addr: String,
    /// Per-request timeout for every outbound HTTP call.
    pub http_timeout: Duration,
    /// Rich menu image uploaded by `setup-rich-menu`.
    pub rich_menu_image: String,
    pub endpoints: Endpoints,
}

impl BotConfig {
    /// Build config from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            get(key)
                .map(SecretString::from)
                .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
        };

        let access_token = required("ACCESS_TOKEN")?;
        let channel_secret = required("CHANNEL_SECRET")?;
        let cwa_api_key = required("CWA_WEATHER_API")?;
        let moenv_api_key = required("MOENV_API_KEY")?;
        let gemini_api_key = get("GEMINI_API_KEY").map(SecretString::from);

        let assistant_followup = get("ASSISTANT_FOLLOWUP")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes"))
            .unwrap_or(false);

        let http_timeout = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: "HTTP_TIMEOUT_SECS".to_string(),
                    message: format!("expected a whole number of seconds, got {raw:?}"),
                })?;
                if secs == 0 {
                    return Err(ConfigError::InvalidValue {
                        key: "HTTP_TIMEOUT_SECS".to_string(),
                        message: "must be greater than zero".to_string(),
                    });
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(10),
        };

        let defaults = Endpoints::default();
        let endpoints = Endpoints {
            cwa_base: get("CWA_BASE_URL").unwrap_or(defaults.cwa_base),
            moenv_base: get("MOENV_BASE_URL").unwrap_or(defaults.moenv_base),
            line_api_base: get("LINE_API_BASE_URL").unwrap_or(defaults.line_api_base),
            line_data_base: get("LINE_DATA_BASE_URL").unwrap_or(defaults.line_data_base),
            radar_image_url: get("RADAR_IMAGE_URL").unwrap_or(defaults.radar_image_url),
            gemini_base: get("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base),
        };

        Ok(Self {
            access_token,
            channel_secret,
            cwa_api_key,
            moenv_api_key,
            gemini_api_key,
            assistant_followup,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:5000".to_string()),
            http_timeout,
            rich_menu_image: get("RICH_MENU_IMAGE")
                .unwrap_or_else(|| "static/weather_richmenu.png".to_string()),
            endpoints,
        })
    }

    /// Build the shared outbound HTTP client.
    pub fn http_client(&self) -> Result<reqwest::Client, ConfigError> {
        reqwest::Client::builder()
            .timeout(self.http_timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))
    }
}
