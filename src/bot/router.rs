//! Event router: classifies each inbound event, consults the data sources,
//! and sends the composed replies.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::compose::{self, ACK_TEXT, TextCommand};
use super::{EventPayload, InboundEvent};
use crate::assistant::Assistant;
use crate::error::{ChannelError, FetchError};
use crate::line::Messenger;
use crate::sources::{Sources, camera, normalize_address};

/// Stateless dispatcher shared by every webhook delivery.
pub struct EventRouter {
    messenger: Arc<dyn Messenger>,
    sources: Sources,
    radar_image_url: String,
    /// When set, location replies are followed by an assistant summary.
    assistant: Option<Assistant>,
}

impl EventRouter {
    pub fn new(
        messenger: Arc<dyn Messenger>,
        sources: Sources,
        radar_image_url: impl Into<String>,
    ) -> Self {
        Self {
            messenger,
            sources,
            radar_image_url: radar_image_url.into(),
            assistant: None,
        }
    }

    /// Push an assistant summary after every location reply.
    pub fn with_assistant_followup(mut self, assistant: Assistant) -> Self {
        self.assistant = Some(assistant);
        self
    }

    /// Handle one event. Data-source failures never surface here; only a
    /// failed reply/push does.
    pub async fn handle(&self, event: &InboundEvent) -> Result<(), ChannelError> {
        match &event.payload {
            EventPayload::Text(text) => self.handle_text(event, text).await,
            EventPayload::Location { address } => self.handle_location(event, address).await,
        }
    }

    async fn handle_text(&self, event: &InboundEvent, text: &str) -> Result<(), ChannelError> {
        match TextCommand::classify(text) {
            TextCommand::Radar => {
                info!(user = %event.user_id, "Radar image requested");
                self.messenger.push_text(&event.user_id, ACK_TEXT).await?;
                let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
                let url = compose::radar_image_url(&self.radar_image_url, nanos);
                self.messenger.reply_image(&event.reply_token, &url).await
            }
            TextCommand::Earthquake => {
                info!(user = %event.user_id, "Earthquake report requested");
                self.messenger.push_text(&event.user_id, ACK_TEXT).await?;
                let report = self.sources.seismic.fetch_report().await;
                self.messenger
                    .reply_text(&event.reply_token, &report.text)
                    .await?;
                if report.image_url.is_empty() {
                    info!("No earthquake image to push");
                    return Ok(());
                }
                self.messenger
                    .push_image(&event.user_id, &report.image_url)
                    .await
            }
            TextCommand::Other(text) => match self.sources.cameras.lookup(text) {
                Some(url) => {
                    info!(keyword = text, "Camera requested");
                    self.messenger.reply_text(&event.reply_token, url).await?;
                    let snapshot = camera::snapshot_url(url, unix_secs_ceil());
                    self.messenger.push_image(&event.user_id, &snapshot).await
                }
                None => self.messenger.reply_text(&event.reply_token, text).await,
            },
        }
    }

    async fn handle_location(
        &self,
        event: &InboundEvent,
        address: &str,
    ) -> Result<(), ChannelError> {
        self.messenger.push_text(&event.user_id, ACK_TEXT).await?;

        let address = normalize_address(address);
        info!(address = %address, "Location lookup");

        let (forecast, air_quality) = tokio::join!(
            self.sources.forecast.fetch_forecast(&address),
            self.sources.air_quality.fetch_air_quality(&address),
        );
        log_fallback("forecast", &forecast);
        log_fallback("air quality", &air_quality);

        let reply = compose::location_reply(forecast, air_quality);
        self.messenger.reply_text(&event.reply_token, &reply).await?;

        if let Some(assistant) = &self.assistant {
            let summary = assistant.summarize(&reply).await;
            self.messenger.push_text(&event.user_id, &summary).await?;
        }
        Ok(())
    }
}

fn log_fallback(what: &str, result: &Result<String, FetchError>) {
    if let Err(e) = result {
        warn!(error = %e, "Using {what} fallback");
    }
}

/// Current Unix time in seconds, rounded up.
fn unix_secs_ceil() -> i64 {
    let now = Utc::now();
    now.timestamp() + i64::from(now.timestamp_subsec_nanos() > 0)
}
