//! # retail-agent
//!
//! The five specialized agents behind the retail chatbot: product, order,
//! recommendation, support, and checkout. Each one is a facade over a
//! handful of [`retail_core::Tool`]s returning fixed demo payloads; tool
//! choice is a deterministic keyword match over the task text, standing in
//! for the model-driven selection a production deployment would plug in.

pub mod checkout;
pub mod function_tool;
pub mod order;
pub mod product;
pub mod recommendation;
pub mod support;

pub use checkout::CheckoutAgent;
pub use function_tool::FunctionTool;
pub use order::OrderAgent;
pub use product::ProductAgent;
pub use recommendation::RecommendationAgent;
pub use support::SupportAgent;

use retail_core::Agent;
use std::sync::Arc;

/// All agents named by the routing table, ready to register.
pub fn default_agents() -> Vec<Arc<dyn Agent>> {
    vec![
        Arc::new(ProductAgent::new()),
        Arc::new(OrderAgent::new()),
        Arc::new(RecommendationAgent::new()),
        Arc::new(SupportAgent::new()),
        Arc::new(CheckoutAgent::new()),
    ]
}

/// Short reference id like `RET-1A2B3C4D`.
pub(crate) fn generate_ref(prefix: &str) -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, hex[..8].to_uppercase())
}

/// Customer id carried in a context snapshot, falling back to the
/// anonymous sentinel.
pub(crate) fn context_customer_id(context: Option<&serde_json::Value>) -> String {
    context
        .and_then(|snapshot| snapshot.get("context"))
        .and_then(|fields| fields.get("customer_id"))
        .and_then(serde_json::Value::as_str)
        .unwrap_or("anonymous")
        .to_string()
}
