//! # retail-core
//!
//! Core traits and types for the retail customer-service chatbot.
//!
//! ## Overview
//!
//! This crate provides the foundational abstractions shared by the rest of
//! the workspace:
//!
//! - [`Intent`] / [`classify`] - rule-based intent classification
//! - [`route`] / [`RoutingDecision`] - static intent-to-agent routing
//! - [`Agent`] / [`AgentResult`] - the capability every specialized agent
//!   exposes to the dispatch loop
//! - [`Tool`] - a single mock-backend capability owned by an agent
//! - [`RetailError`] / [`Result`] - unified error handling
//!
//! ## Classification
//!
//! Classification is an ordered table of keyword rules evaluated against
//! the lowercased message; the first matching rule wins and unmatched
//! input falls through to [`Intent::GeneralInquiry`]. It is a pure, total
//! function: there is no "unroutable" error class anywhere downstream.

pub mod agent;
pub mod error;
pub mod intent;
pub mod routing;
pub mod tool;

pub use agent::{Agent, AgentResult};
pub use error::{RetailError, Result};
pub use intent::{
    CLASSIFY_CONFIDENCE, ExtractedEntities, INTENT_RULES, Intent, classify, extract_entities,
};
pub use routing::{DEFAULT_AGENT, ROUTING_TABLE, RoutingDecision, decide, route};
pub use tool::Tool;
