//! Weather LINE bot. Answers LINE chats with Taiwan forecasts, air quality,
//! earthquake reports, radar images, and scenic livestreams.

pub mod assistant;
pub mod bot;
pub mod config;
pub mod error;
pub mod line;
pub mod sources;
pub mod webhook;
