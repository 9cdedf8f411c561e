//! Optional generative "weather helper" that turns the composed forecast into
//! a short, friendly one-liner via Gemini.
//!
//! On any error (timeout, server down, parse failure) a fixed apology is
//! returned, so callers can always push the result.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const MODEL: &str = "gemini-2.5-flash";

/// Returned when the model cannot be reached or answers with nothing usable.
pub const ASSISTANT_FAILURE_TEXT: &str = "很抱歉，我的 AI 處理器目前遇到了一點問題，請稍後再試。";

const PROMPT_HEADER: &str = "你是 LINE 上的智慧助理，請根據以下提供的天氣資訊，用中文和親切的語氣簡短回覆，不超過30字。\
開頭請以「AI小幫手:」開始，可以加上關心對方的話與小表情符號，讓使用者更快了解天氣狀況。\
例如：天氣冷就提醒多加衣服，晴朗就鼓勵出門走走，下雨就提醒帶傘。";

// ── Wire types ──────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize, Debug)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Debug)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize, Debug)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Content,
}

// ── Assistant ───────────────────────────────────────────────────────────

/// Gemini-backed summarizer. Constructed once, reused for every request.
pub struct Assistant {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl Assistant {
    pub fn new(client: reqwest::Client, base_url: &str, api_key: SecretString) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Summarize `context` (the composed weather reply) for the user.
    pub async fn summarize(&self, context: &str) -> String {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(context),
                }],
            }],
        };

        let url = format!("{}/v1beta/models/{MODEL}:generateContent", self.base_url);

        let response = match self
            .client
            .post(&url)
            .query(&[("key", self.api_key.expose_secret())])
            .json(&request)
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => resp,
            Ok(resp) => {
                warn!(status = %resp.status(), "Gemini request rejected");
                return ASSISTANT_FAILURE_TEXT.to_string();
            }
            Err(e) => {
                warn!("Gemini request failed: {e}");
                return ASSISTANT_FAILURE_TEXT.to_string();
            }
        };

        let body = match response.json::<GenerateResponse>().await {
            Ok(b) => b,
            Err(e) => {
                warn!("Gemini response parse failed: {e}");
                return ASSISTANT_FAILURE_TEXT.to_string();
            }
        };

        match first_text(body) {
            Some(text) => {
                debug!(reply = %text, "Gemini summary");
                text
            }
            None => {
                warn!("Gemini returned no text");
                ASSISTANT_FAILURE_TEXT.to_string()
            }
        }
    }
}

fn build_prompt(context: &str) -> String {
    format!("{PROMPT_HEADER}\n\n提供的天氣資訊:\n{context}")
}

fn first_text(response: GenerateResponse) -> Option<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()?
        .content
        .parts
        .into_iter()
        .map(|p| p.text)
        .collect();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
