//! One-time rich menu provisioning.
//!
//! Creates the bot's tap menu (share location / radar / earthquake), uploads
//! its background image, and makes it the default for every user. Run via
//! `weather-line-bot setup-rich-menu`; the webhook server never calls this.

use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::bot::{EARTHQUAKE_TRIGGER, RADAR_TRIGGERS};
use crate::error::ChannelError;

const MENU_WIDTH: u32 = 2500;
const MENU_HEIGHT: u32 = 1686;

/// URI that opens LINE's location picker.
const LOCATION_PICKER_URI: &str = "https://line.me/R/nv/location/";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RichMenu {
    pub size: Size,
    pub selected: bool,
    pub name: String,
    pub chat_bar_text: String,
    pub areas: Vec<Area>,
}

#[derive(Debug, Serialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Serialize)]
pub struct Area {
    pub bounds: Bounds,
    pub action: Action,
}

#[derive(Debug, Serialize)]
pub struct Bounds {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    Uri { uri: String },
    Message { text: String },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedMenu {
    rich_menu_id: String,
}

/// The weather menu: a large location button on the left, radar and
/// earthquake buttons stacked on the right.
pub fn weather_menu() -> RichMenu {
    let area = |x, y, width, height, action| Area {
        bounds: Bounds {
            x,
            y,
            width,
            height,
        },
        action,
    };

    RichMenu {
        size: Size {
            width: MENU_WIDTH,
            height: MENU_HEIGHT,
        },
        selected: true,
        name: "圖文選單 1".to_string(),
        chat_bar_text: "查看更多天氣資訊".to_string(),
        areas: vec![
            area(
                4,
                2,
                1648,
                1684,
                Action::Uri {
                    uri: LOCATION_PICKER_URI.to_string(),
                },
            ),
            area(
                1662,
                2,
                836,
                840,
                Action::Message {
                    text: RADAR_TRIGGERS[0].to_string(),
                },
            ),
            area(
                1662,
                850,
                836,
                836,
                Action::Message {
                    text: EARTHQUAKE_TRIGGER.to_string(),
                },
            ),
        ],
    }
}

/// Content type LINE expects for the menu image.
pub fn image_content_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        _ => "image/jpeg",
    }
}

/// Talks to the rich menu endpoints.
pub struct RichMenuProvisioner {
    client: reqwest::Client,
    api_base: String,
    data_base: String,
    access_token: SecretString,
}

impl RichMenuProvisioner {
    pub fn new(
        client: reqwest::Client,
        api_base: &str,
        data_base: &str,
        access_token: SecretString,
    ) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            data_base: data_base.trim_end_matches('/').to_string(),
            access_token,
        }
    }

    /// Create the menu, upload `image_path`, and set it as default.
    /// Returns the new rich menu id.
    pub async fn provision(&self, image_path: &Path) -> Result<String, ChannelError> {
        let image = tokio::fs::read(image_path).await?;

        let menu_id = self.create(&weather_menu()).await?;
        info!(menu_id = %menu_id, "Rich menu created");

        self.upload_image(&menu_id, image, image_content_type(image_path))
            .await?;
        info!(menu_id = %menu_id, path = %image_path.display(), "Rich menu image uploaded");

        self.set_default(&menu_id).await?;
        info!(menu_id = %menu_id, "Rich menu set as default");

        Ok(menu_id)
    }

    async fn create(&self, menu: &RichMenu) -> Result<String, ChannelError> {
        let resp = self
            .client
            .post(format!("{}/v2/bot/richmenu", self.api_base))
            .bearer_auth(self.access_token.expose_secret())
            .json(menu)
            .send()
            .await
            .map_err(|e| ChannelError::Http(e.to_string()))?;
        let resp = check("richmenu create", resp).await?;
        let created: CreatedMenu = resp
            .json()
            .await
            .map_err(|e| ChannelError::Http(e.to_string()))?;
        Ok(created.rich_menu_id)
    }

    async fn upload_image(
        &self,
        menu_id: &str,
        image: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ChannelError> {
        let resp = self
            .client
            .post(format!("{}/v2/bot/richmenu/{menu_id}/content", self.data_base))
            .bearer_auth(self.access_token.expose_secret())
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(image)
            .send()
            .await
            .map_err(|e| ChannelError::Http(e.to_string()))?;
        check("richmenu image upload", resp).await?;
        Ok(())
    }

    async fn set_default(&self, menu_id: &str) -> Result<(), ChannelError> {
        let resp = self
            .client
            .post(format!("{}/v2/bot/user/all/richmenu/{menu_id}", self.api_base))
            .bearer_auth(self.access_token.expose_secret())
            .send()
            .await
            .map_err(|e| ChannelError::Http(e.to_string()))?;
        check("richmenu set default", resp).await?;
        Ok(())
    }
}

async fn check(step: &str, resp: reqwest::Response) -> Result<reqwest::Response, ChannelError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    Err(ChannelError::Http(format!("{step} failed: {status} {body}")))
}
