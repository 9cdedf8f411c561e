//! Event routing and reply composition.

pub mod compose;
pub mod router;

pub use compose::{
    ACK_TEXT, AIR_QUALITY_FALLBACK, EARTHQUAKE_TRIGGER, FORECAST_FALLBACK, RADAR_TRIGGERS,
};
pub use router::EventRouter;

/// A user message the bot reacts to, already authenticated by the webhook.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    /// Single-use token for replying to this event.
    pub reply_token: String,
    /// Target for push messages.
    pub user_id: String,
    pub payload: EventPayload,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    /// Free text typed by the user.
    Text(String),
    /// A shared map location; only the street address is used.
    Location { address: String },
}
