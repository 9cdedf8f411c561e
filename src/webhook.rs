//! Webhook HTTP server: `POST /callback` for LINE deliveries and `GET /health`.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
    routing::{get, post},
};
use secrecy::{ExposeSecret, SecretString};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::bot::EventRouter;
use crate::error::{Error, WebhookError};
use crate::line::{WebhookBody, verify_signature};

const SIGNATURE_HEADER: &str = "x-line-signature";

/// Body LINE expects back; any non-2xx triggers redelivery.
const ACK_BODY: &str = "OK";

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<EventRouter>,
    pub channel_secret: Arc<SecretString>,
}

/// Build the Axum router with the webhook and health routes.
pub fn webhook_routes(router: Arc<EventRouter>, channel_secret: SecretString) -> Router {
    let state = AppState {
        router,
        channel_secret: Arc::new(channel_secret),
    };

    Router::new()
        .route("/callback", post(callback))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "weather-line-bot"
    }))
}

// ── Callback ────────────────────────────────────────────────────────────

/// Always acknowledges with `200 OK`, whatever happened inside.
async fn callback(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> &'static str {
    if let Err(e) = process_delivery(&state, &headers, &body).await {
        match e {
            Error::Webhook(e) => warn!("Webhook delivery dropped: {e}"),
            e => error!("Webhook delivery failed: {e}"),
        }
    }
    ACK_BODY
}

async fn process_delivery(state: &AppState, headers: &HeaderMap, body: &[u8]) -> Result<(), Error> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());
    verify_signature(state.channel_secret.expose_secret(), body, signature)?;

    let delivery: WebhookBody = serde_json::from_slice(body)
        .map_err(|e| WebhookError::InvalidPayload(e.to_string()))?;
    debug!(events = delivery.events.len(), "Webhook delivery received");

    // Only the first event of a delivery is handled.
    let Some(first) = delivery.events.into_iter().next() else {
        info!("Webhook delivery with no events");
        return Ok(());
    };

    let kind = first.kind.clone();
    let Some(event) = first.into_inbound() else {
        debug!(kind = %kind, "Ignoring unsupported event");
        return Ok(());
    };

    state.router.handle(&event).await?;
    Ok(())
}
