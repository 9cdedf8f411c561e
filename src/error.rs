//! Error types for the weather bot.

/// Top-level error type for the bot.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("Webhook error: {0}")]
    Webhook(#[from] WebhookError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Errors from the third-party data feeds (weather, seismic, air quality).
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("{feed} unavailable: {reason}")]
    Unavailable { feed: &'static str, reason: String },

    #[error("{feed} rejected the request: {reason}")]
    Rejected { feed: &'static str, reason: String },

    #[error("{feed} returned an unexpected payload: {reason}")]
    Malformed { feed: &'static str, reason: String },

    #[error("No match for {what}: {input}")]
    NoMatch { what: &'static str, input: String },
}

impl FetchError {
    /// Classify a reqwest failure: body decode problems are malformed
    /// payloads, everything else (connect, timeout, ...) is unavailability.
    pub(crate) fn from_reqwest(feed: &'static str, err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Malformed {
                feed,
                reason: err.to_string(),
            }
        } else {
            Self::Unavailable {
                feed,
                reason: err.to_string(),
            }
        }
    }

    pub(crate) fn malformed(feed: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            feed,
            reason: reason.into(),
        }
    }
}

/// Outbound messaging errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Failed to send {kind} on channel {name}: {reason}")]
    SendFailed {
        name: String,
        kind: String,
        reason: String,
    },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Inbound webhook errors.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("Missing X-Line-Signature header")]
    MissingSignature,

    #[error("Signature does not match request body")]
    InvalidSignature,

    #[error("Invalid webhook payload: {0}")]
    InvalidPayload(String),
}

/// Result type alias for the bot.
pub type Result<T> = std::result::Result<T, Error>;
