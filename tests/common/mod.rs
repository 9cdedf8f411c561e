//! Shared fixtures: an Axum stub of the CWA / MOENV / Gemini APIs and a
//! messenger that records everything the bot sends.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use weather_line_bot::assistant::Assistant;
use weather_line_bot::bot::EventRouter;
use weather_line_bot::error::ChannelError;
use weather_line_bot::line::{Messenger, OutboundMessage};
use weather_line_bot::sources::{
    AirQualityClient, CameraTable, ForecastClient, SeismicClient, Sources,
};

/// Maximum time any test is allowed to run before we consider it hung.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

pub const RADAR_BASE: &str = "https://radar.example/O-A0058-001.png";

// ── Stub upstream ───────────────────────────────────────────────────────

/// Canned responses; `None` makes the endpoint answer 500.
#[derive(Default)]
pub struct Upstream {
    pub forecast: Option<Value>,
    pub local_quake: Option<Value>,
    pub significant_quake: Option<Value>,
    pub air: Option<Value>,
    pub gemini: Option<Value>,
    /// Hold every CWA / MOENV response this long before answering.
    pub delay: Option<Duration>,
    /// Path and query of every request received.
    pub hits: Mutex<Vec<String>>,
}

impl Upstream {
    fn record(&self, uri: &Uri) {
        self.hits.lock().unwrap().push(uri.to_string());
    }

    async fn stall(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }

    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }
}

fn respond(body: Option<Value>) -> Response {
    match body {
        Some(v) => Json(v).into_response(),
        None => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn cwa(State(up): State<Arc<Upstream>>, Path(dataset): Path<String>, uri: Uri) -> Response {
    up.record(&uri);
    up.stall().await;
    let body = match dataset.as_str() {
        "E-A0016-001" => up.local_quake.clone(),
        "E-A0015-001" => up.significant_quake.clone(),
        d if d.starts_with("F-D0047-") => up.forecast.clone(),
        _ => None,
    };
    respond(body)
}

async fn moenv(State(up): State<Arc<Upstream>>, uri: Uri) -> Response {
    up.record(&uri);
    up.stall().await;
    respond(up.air.clone())
}

async fn gemini(State(up): State<Arc<Upstream>>, Path(_call): Path<String>, uri: Uri) -> Response {
    up.record(&uri);
    respond(up.gemini.clone())
}

/// Start the stub on a random port and return its base URL.
pub async fn start_upstream(upstream: Arc<Upstream>) -> String {
    let app = Router::new()
        .route("/cwa/{dataset}", get(cwa))
        .route("/moenv/aqx_p_432", get(moenv))
        .route("/gemini/v1beta/models/{call}", post(gemini))
        .with_state(upstream);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    format!("http://127.0.0.1:{port}")
}

// ── Payload builders ────────────────────────────────────────────────────

pub fn forecast_payload(group: &str, areas: &[(&str, &str)]) -> Value {
    let locations: Vec<Value> = areas
        .iter()
        .map(|(name, description)| {
            json!({
                "LocationName": name,
                "Geocode": "6500100",
                "WeatherElement": [{
                    "ElementName": "天氣預報綜合描述",
                    "Time": [{
                        "StartTime": "2025-01-01T12:00:00+08:00",
                        "EndTime": "2025-01-01T15:00:00+08:00",
                        "ElementValue": [{ "WeatherDescription": description }]
                    }]
                }]
            })
        })
        .collect();

    json!({
        "success": "true",
        "result": { "resource_id": "F-D0047-069" },
        "records": {
            "Locations": [{ "DatasetDescription": "3hr forecast", "LocationsName": group, "Location": locations }]
        }
    })
}

pub fn quake_payload(text: &str, image: &str, origin_time: &str) -> Value {
    json!({
        "success": "true",
        "records": {
            "Earthquake": [{
                "ReportContent": text,
                "ReportImageURI": image,
                "EarthquakeInfo": { "OriginTime": origin_time }
            }]
        }
    })
}

pub fn air_payload(stations: &[(&str, &str, &str, &str)]) -> Value {
    let records: Vec<Value> = stations
        .iter()
        .map(|(county, site, aqi, status)| {
            json!({ "county": county, "sitename": site, "aqi": aqi, "status": status })
        })
        .collect();
    json!({ "records": records })
}

// ── Recording messenger ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Reply { token: String, message: OutboundMessage },
    Push { user: String, message: OutboundMessage },
}

#[derive(Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<Sent>>,
    /// Make every push fail, as if the LINE API were down.
    pub fail_push: bool,
}

impl RecordingMessenger {
    pub fn failing_push() -> Self {
        Self {
            fail_push: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn reply(&self, reply_token: &str, message: OutboundMessage) -> Result<(), ChannelError> {
        self.sent.lock().unwrap().push(Sent::Reply {
            token: reply_token.to_string(),
            message,
        });
        Ok(())
    }

    async fn push(&self, user_id: &str, message: OutboundMessage) -> Result<(), ChannelError> {
        if self.fail_push {
            return Err(ChannelError::SendFailed {
                name: "line".into(),
                kind: "push".into(),
                reason: "stubbed outage".into(),
            });
        }
        self.sent.lock().unwrap().push(Sent::Push {
            user: user_id.to_string(),
            message,
        });
        Ok(())
    }
}

pub fn reply_text(text: &str) -> Sent {
    Sent::Reply {
        token: "reply-token".to_string(),
        message: OutboundMessage::text(text),
    }
}

pub fn push_text(text: &str) -> Sent {
    Sent::Push {
        user: "U-test".to_string(),
        message: OutboundMessage::text(text),
    }
}

pub fn push_image(url: &str) -> Sent {
    Sent::Push {
        user: "U-test".to_string(),
        message: OutboundMessage::image(url),
    }
}

// ── Router wiring ───────────────────────────────────────────────────────

fn key(value: &str) -> SecretString {
    SecretString::from(value.to_string())
}

const CLIENT_TIMEOUT: Duration = Duration::from_secs(2);

fn http(request_timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(request_timeout)
        .build()
        .unwrap()
}

pub fn sources(base: &str) -> Sources {
    sources_with_timeout(base, CLIENT_TIMEOUT)
}

pub fn sources_with_timeout(base: &str, request_timeout: Duration) -> Sources {
    let http = http(request_timeout);
    Sources {
        forecast: ForecastClient::new(http.clone(), &format!("{base}/cwa"), key("cwa-key")),
        seismic: SeismicClient::new(http.clone(), &format!("{base}/cwa"), key("cwa-key")),
        air_quality: AirQualityClient::new(http, &format!("{base}/moenv"), key("moenv-key")),
        cameras: CameraTable::default(),
    }
}

pub fn build_router(base: &str, messenger: Arc<RecordingMessenger>) -> EventRouter {
    EventRouter::new(messenger, sources(base), RADAR_BASE)
}

pub fn assistant(base: &str) -> Assistant {
    Assistant::new(http(CLIENT_TIMEOUT), &format!("{base}/gemini"), key("gemini-key"))
}
