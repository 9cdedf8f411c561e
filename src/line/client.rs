//! LINE Messaging API client: reply and push over HTTPS with bearer auth.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use super::{Messenger, OutboundMessage};
use crate::error::ChannelError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyBody<'a> {
    reply_token: &'a str,
    messages: [&'a OutboundMessage; 1],
}

#[derive(Serialize)]
struct PushBody<'a> {
    to: &'a str,
    messages: [&'a OutboundMessage; 1],
}

/// Sends messages through the LINE Messaging API.
pub struct LineClient {
    access_token: SecretString,
    api_base: String,
    client: reqwest::Client,
}

impl LineClient {
    pub fn new(client: reqwest::Client, api_base: &str, access_token: SecretString) -> Self {
        Self {
            access_token,
            api_base: api_base.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/v2/bot/{path}", self.api_base)
    }

    async fn post_message<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        kind: &str,
    ) -> Result<(), ChannelError> {
        let resp = self
            .client
            .post(self.api_url(path))
            .bearer_auth(self.access_token.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|e| ChannelError::SendFailed {
                name: "line".into(),
                kind: kind.to_string(),
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let err = resp.text().await.unwrap_or_default();
            return Err(ChannelError::SendFailed {
                name: "line".into(),
                kind: kind.to_string(),
                reason: format!("{path} returned {status}: {err}"),
            });
        }

        tracing::debug!(path, kind, "LINE message sent");
        Ok(())
    }
}

#[async_trait]
impl Messenger for LineClient {
    async fn reply(&self, reply_token: &str, message: OutboundMessage) -> Result<(), ChannelError> {
        let body = ReplyBody {
            reply_token,
            messages: [&message],
        };
        self.post_message("message/reply", &body, message.kind())
            .await
    }

    async fn push(&self, user_id: &str, message: OutboundMessage) -> Result<(), ChannelError> {
        let body = PushBody {
            to: user_id,
            messages: [&message],
        };
        self.post_message("message/push", &body, message.kind())
            .await
    }
}
