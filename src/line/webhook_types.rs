//! Inbound webhook payload and its conversion into [`InboundEvent`].

use serde::Deserialize;

use crate::bot::{EventPayload, InboundEvent};

/// Body of a webhook delivery. May carry zero events (console "verify").
#[derive(Debug, Deserialize)]
pub struct WebhookBody {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub reply_token: Option<String>,
    #[serde(default)]
    pub source: Option<EventSource>,
    #[serde(default)]
    pub message: Option<EventMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventMessage {
    Text {
        text: String,
    },
    Location {
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        address: Option<String>,
        latitude: f64,
        longitude: f64,
    },
    #[serde(other)]
    Unsupported,
}

impl WebhookEvent {
    /// Convert a message event into an [`InboundEvent`]. Non-message events,
    /// unsupported message kinds, and events without reply/push targets
    /// yield `None`.
    pub fn into_inbound(self) -> Option<InboundEvent> {
        if self.kind != "message" {
            return None;
        }
        let reply_token = self.reply_token?;
        let user_id = self.source?.user_id?;
        let payload = match self.message? {
            EventMessage::Text { text } => EventPayload::Text(text),
            EventMessage::Location { address, .. } => EventPayload::Location {
                address: address.unwrap_or_default(),
            },
            EventMessage::Unsupported => return None,
        };
        Some(InboundEvent {
            reply_token,
            user_id,
            payload,
        })
    }
}
