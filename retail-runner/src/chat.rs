use crate::{Orchestrator, TurnResponse};
use retail_core::Result;
use retail_session::{
    ConversationContext, HistoryMessage, Session, SessionStore, SessionUpdate,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;

/// A completed chat turn: the envelope plus the session it belongs to.
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub session_id: String,
    pub response: TurnResponse,
}

/// High-level chat interface: resolves sessions, maintains per-session
/// conversation context, and runs turns through the [`Orchestrator`].
///
/// Turns on the same session are serialized by a per-session mutex held
/// for the whole turn; turns on different sessions proceed independently.
pub struct Chatbot {
    orchestrator: Arc<Orchestrator>,
    store: Arc<dyn SessionStore>,
    contexts: RwLock<HashMap<String, Arc<Mutex<ConversationContext>>>>,
    max_history: usize,
}

impl Chatbot {
    pub fn new(
        orchestrator: Arc<Orchestrator>,
        store: Arc<dyn SessionStore>,
        max_history: usize,
    ) -> Self {
        Self { orchestrator, store, contexts: RwLock::new(HashMap::new()), max_history }
    }

    /// Send a message and get a response. A missing or stale `session_id`
    /// transparently starts a new session for `customer_id`.
    pub async fn chat(
        &self,
        message: &str,
        session_id: Option<&str>,
        customer_id: &str,
    ) -> Result<ChatOutcome> {
        let session = self.resolve_session(session_id, customer_id).await?;
        let handle = self.context_handle(&session);

        // Held across the whole turn: same-session turns serialize here.
        let mut context = handle.lock().await;

        context.add_message("user", message);
        let snapshot = serde_json::to_value(context.snapshot())?;

        let response = self.orchestrator.process_message(message, Some(&snapshot)).await;

        if response.success {
            context.add_message("assistant", &response.message);
        }
        if let Some(products) = response.data.as_ref().and_then(|data| data.get("products")) {
            context.set("last_products", products.clone());
        }
        if let Some(intent) = response.intent {
            context.set_last_intent(intent);
        }

        self.store.update(&session.session_id, SessionUpdate::increment_messages()).await?;

        Ok(ChatOutcome { session_id: session.session_id, response })
    }

    /// Recent conversation history for a session; empty when unknown.
    pub async fn history(&self, session_id: &str, limit: usize) -> Vec<HistoryMessage> {
        let handle = {
            let contexts = self.contexts.read().unwrap();
            contexts.get(session_id).cloned()
        };
        match handle {
            Some(handle) => handle.lock().await.history(limit),
            None => Vec::new(),
        }
    }

    /// Clear a session's context back to its initial shape, preserving the
    /// customer id. Returns whether the session had any context.
    pub async fn reset_session(&self, session_id: &str) -> bool {
        let handle = {
            let contexts = self.contexts.read().unwrap();
            contexts.get(session_id).cloned()
        };
        match handle {
            Some(handle) => {
                handle.lock().await.reset();
                true
            }
            None => false,
        }
    }

    /// Remove a session and its context. Idempotent.
    pub async fn delete_session(&self, session_id: &str) -> Result<bool> {
        self.contexts.write().unwrap().remove(session_id);
        self.store.delete(session_id).await
    }

    pub async fn active_sessions(&self) -> Result<usize> {
        self.store.active_count().await
    }

    async fn resolve_session(
        &self,
        session_id: Option<&str>,
        customer_id: &str,
    ) -> Result<Session> {
        if let Some(id) = session_id {
            if let Some(session) = self.store.get(id).await? {
                return Ok(session);
            }
        }
        self.store.create(customer_id).await
    }

    fn context_handle(&self, session: &Session) -> Arc<Mutex<ConversationContext>> {
        let mut contexts = self.contexts.write().unwrap();
        contexts
            .entry(session.session_id.clone())
            .or_insert_with(|| {
                let mut context =
                    ConversationContext::new(&session.session_id, self.max_history);
                context.set("customer_id", Value::String(session.customer_id.clone()));
                Arc::new(Mutex::new(context))
            })
            .clone()
    }
}
