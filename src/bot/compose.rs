//! Reply text and image URLs shown to users.

use crate::error::FetchError;

/// Text commands that request the radar echo image.
pub const RADAR_TRIGGERS: [&str; 2] = ["雷達回波圖", "雷達回波"];

/// Text command that requests the latest earthquake report.
pub const EARTHQUAKE_TRIGGER: &str = "地震";

/// Pushed before any slow lookup.
pub const ACK_TEXT: &str = "馬上找給你！抓取資料中....";

pub const FORECAST_FALLBACK: &str = "⚠️ 天氣預報查詢失敗或查無資料。";
pub const AIR_QUALITY_FALLBACK: &str = "☁️ 空氣品質查詢失敗或查無資料。";

/// What a text command asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextCommand<'a> {
    Radar,
    Earthquake,
    /// Anything else: a camera keyword or plain text to echo.
    Other(&'a str),
}

impl<'a> TextCommand<'a> {
    pub fn classify(text: &'a str) -> Self {
        if RADAR_TRIGGERS.iter().any(|t| *t == text) {
            Self::Radar
        } else if text == EARTHQUAKE_TRIGGER {
            Self::Earthquake
        } else {
            Self::Other(text)
        }
    }
}

/// Radar image URL with a cache-busting nanosecond suffix.
pub fn radar_image_url(base: &str, unix_nanos: i64) -> String {
    format!("{base}?{unix_nanos}")
}

/// Forecast then air quality, each replaced by its fallback on failure.
pub fn location_reply(
    forecast: Result<String, FetchError>,
    air_quality: Result<String, FetchError>,
) -> String {
    let forecast = forecast.unwrap_or_else(|_| FORECAST_FALLBACK.to_string());
    let air_quality = air_quality.unwrap_or_else(|_| AIR_QUALITY_FALLBACK.to_string());
    format!("{forecast} \n\n {air_quality}")
}
