use retail_core::Intent;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The uniform response shape every turn produces, success or failure.
///
/// `message` is always safe to show the customer. `error`, when present,
/// carries the internal diagnostic and is meant for logs, never for
/// verbatim display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub execution_time_seconds: f64,
}

impl TurnResponse {
    pub fn failure(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            intent: None,
            agent: None,
            error: Some(error.into()),
            execution_time_seconds: 0.0,
        }
    }

    pub fn with_routing(mut self, intent: Intent, agent: impl Into<String>) -> Self {
        self.intent = Some(intent);
        self.agent = Some(agent.into());
        self
    }

    pub fn with_execution_time(mut self, seconds: f64) -> Self {
        self.execution_time_seconds = seconds;
        self
    }
}
