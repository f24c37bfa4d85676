use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a single agent execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResult {
    pub success: bool,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub execution_time_seconds: f64,
    pub agent_name: String,
    pub timestamp: DateTime<Utc>,
}

impl AgentResult {
    pub fn success(
        agent_name: impl Into<String>,
        message: impl Into<String>,
        data: Value,
    ) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
            error: None,
            execution_time_seconds: 0.0,
            agent_name: agent_name.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn failure(agent_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Value::Null,
            message: String::new(),
            error: Some(error.into()),
            execution_time_seconds: 0.0,
            agent_name: agent_name.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_execution_time(mut self, seconds: f64) -> Self {
        self.execution_time_seconds = seconds;
        self
    }
}

/// A named handler capable of executing a customer task. Agents are opaque
/// to the dispatch loop: it only knows the name and the execute capability.
#[async_trait]
pub trait Agent: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;

    /// Execute a task with the accumulated conversation context. Returns a
    /// failed [`AgentResult`] for domain-level problems; `Err` is reserved
    /// for faults the caller should convert into a failure envelope.
    async fn execute(&self, task: &str, context: Option<&Value>) -> Result<AgentResult>;
}
