//! LINE Messaging API adapter: webhook payloads, signature checks, and the
//! outbound reply/push client.

pub mod client;
pub mod rich_menu;
pub mod signature;
pub mod webhook_types;

pub use client::LineClient;
pub use signature::verify_signature;
pub use webhook_types::{EventMessage, WebhookBody, WebhookEvent};

use async_trait::async_trait;
use serde::Serialize;

use crate::error::ChannelError;

/// A message the bot sends back to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundMessage {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        original_content_url: String,
        preview_image_url: String,
    },
}

impl OutboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Image message using the same URL for the full image and its preview.
    pub fn image(url: impl Into<String>) -> Self {
        let url = url.into();
        Self::Image {
            original_content_url: url.clone(),
            preview_image_url: url,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Image { .. } => "image",
        }
    }
}

/// Outbound messaging capability.
///
/// `reply` answers the webhook event that carried `reply_token` (single use);
/// `push` sends to a user at any time.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn reply(&self, reply_token: &str, message: OutboundMessage) -> Result<(), ChannelError>;

    async fn push(&self, user_id: &str, message: OutboundMessage) -> Result<(), ChannelError>;

    async fn reply_text(&self, reply_token: &str, text: &str) -> Result<(), ChannelError> {
        self.reply(reply_token, OutboundMessage::text(text)).await
    }

    async fn reply_image(&self, reply_token: &str, url: &str) -> Result<(), ChannelError> {
        self.reply(reply_token, OutboundMessage::image(url)).await
    }

    async fn push_text(&self, user_id: &str, text: &str) -> Result<(), ChannelError> {
        self.push(user_id, OutboundMessage::text(text)).await
    }

    async fn push_image(&self, user_id: &str, url: &str) -> Result<(), ChannelError> {
        self.push(user_id, OutboundMessage::image(url)).await
    }
}
