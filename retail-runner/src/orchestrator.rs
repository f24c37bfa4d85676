use crate::TurnResponse;
use retail_core::{Agent, decide};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Shown to the customer when routing lands on an unregistered agent.
pub const REPHRASE_MESSAGE: &str =
    "I'm sorry, I couldn't understand your request. Could you please rephrase?";

/// Shown to the customer when the dispatched agent fails.
pub const ERROR_MESSAGE: &str = "I apologize, but I encountered an error. Please try again.";

/// The dispatch loop: classifies a message, routes it, invokes the target
/// agent, and normalizes whatever happens into a [`TurnResponse`].
///
/// An explicit registry object: construct it, register agents, and inject
/// it wherever turns are processed.
pub struct Orchestrator {
    agents: HashMap<String, Arc<dyn Agent>>,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self { agents: HashMap::new() }
    }

    pub fn with_agents(agents: Vec<Arc<dyn Agent>>) -> Self {
        let mut orchestrator = Self::new();
        for agent in agents {
            orchestrator.register(agent);
        }
        orchestrator
    }

    pub fn register(&mut self, agent: Arc<dyn Agent>) {
        tracing::info!(agent = agent.name(), "registered agent");
        self.agents.insert(agent.name().to_string(), agent);
    }

    pub fn agent_names(&self) -> Vec<&str> {
        self.agents.keys().map(String::as_str).collect()
    }

    /// Process one turn. Every failure is recovered here: the caller
    /// always receives a well-formed envelope, never an error.
    pub async fn process_message(&self, message: &str, context: Option<&Value>) -> TurnResponse {
        let started = Instant::now();

        let decision = decide(message);
        tracing::info!(
            intent = %decision.intent,
            agent = decision.target_agent,
            confidence = decision.confidence,
            "message routed"
        );

        let Some(agent) = self.agents.get(decision.target_agent) else {
            tracing::warn!(agent = decision.target_agent, "routing target not registered");
            return TurnResponse::failure(
                REPHRASE_MESSAGE,
                format!("Unknown agent: {}", decision.target_agent),
            )
            .with_routing(decision.intent, decision.target_agent)
            .with_execution_time(started.elapsed().as_secs_f64());
        };

        match agent.execute(message, context).await {
            Ok(result) => {
                let message_text = if result.message.is_empty() {
                    result
                        .data
                        .get("output")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string()
                } else {
                    result.message.clone()
                };

                TurnResponse {
                    success: result.success,
                    message: message_text,
                    data: (!result.data.is_null()).then_some(result.data),
                    intent: Some(decision.intent),
                    agent: Some(decision.target_agent.to_string()),
                    error: result.error,
                    execution_time_seconds: started.elapsed().as_secs_f64(),
                }
            }
            Err(err) => {
                tracing::error!(
                    agent = decision.target_agent,
                    error = %err,
                    "agent execution failed"
                );
                TurnResponse::failure(ERROR_MESSAGE, err.to_string())
                    .with_routing(decision.intent, decision.target_agent)
                    .with_execution_time(started.elapsed().as_secs_f64())
            }
        }
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}
