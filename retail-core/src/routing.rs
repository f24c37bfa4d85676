use crate::intent::{CLASSIFY_CONFIDENCE, Intent, classify};
use serde::Serialize;

/// Static intent-to-agent lookup table. Exhaustive over [`Intent`];
/// `GeneralInquiry` falls back to the product agent.
pub const ROUTING_TABLE: &[(Intent, &str)] = &[
    (Intent::ProductQuery, "ProductAgent"),
    (Intent::OrderStatus, "OrderAgent"),
    (Intent::Recommendation, "RecommendationAgent"),
    (Intent::ReturnRequest, "SupportAgent"),
    (Intent::CartHelp, "CheckoutAgent"),
    (Intent::CheckoutHelp, "CheckoutAgent"),
    (Intent::GeneralInquiry, "ProductAgent"),
];

pub const DEFAULT_AGENT: &str = "ProductAgent";

/// Resolve the agent name for an intent. Never fails: the table covers the
/// closed enumeration, and anything unexpected maps to [`DEFAULT_AGENT`].
pub fn route(intent: Intent) -> &'static str {
    ROUTING_TABLE
        .iter()
        .find(|(candidate, _)| *candidate == intent)
        .map(|(_, agent)| *agent)
        .unwrap_or(DEFAULT_AGENT)
}

/// Per-message routing outcome. Ephemeral: computed for each turn and
/// never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct RoutingDecision {
    pub intent: Intent,
    pub target_agent: &'static str,
    pub confidence: f64,
}

/// Classify a message and resolve its target agent in one step.
pub fn decide(message: &str) -> RoutingDecision {
    let intent = classify(message);
    RoutingDecision { intent, target_agent: route(intent), confidence: CLASSIFY_CONFIDENCE }
}
