//! # retail-server
//!
//! The HTTP boundary for the retail chatbot: a thin axum layer over the
//! dispatch loop plus the demo catalog/order/cart endpoints that answer
//! with fixed example data. Every chat response is a well-formed envelope;
//! failures are recovered below this layer and never surface as unhandled
//! faults.

pub mod config;
pub mod rest;

pub use config::{ChatbotConfig, ServerConfig};
pub use rest::{ChatController, create_app};
