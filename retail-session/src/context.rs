use chrono::{DateTime, Utc};
use retail_core::Intent;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};

pub const DEFAULT_MAX_HISTORY: usize = 50;

/// How many recent history entries a [`ContextSnapshot`] carries.
const SNAPSHOT_HISTORY: usize = 5;

/// One entry of conversation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub role: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// The known context fields, typed, plus one open extension map for
/// anything callers set under other keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextFields {
    pub customer_id: Option<String>,
    pub current_topic: Option<String>,
    pub product_focus: Option<String>,
    pub filters: HashMap<String, Value>,
    pub cart_items: Vec<Value>,
    pub last_intent: Option<Intent>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Entities accumulated over the conversation. Product and order mentions
/// are append-if-absent lists; every other category is a scalar overwrite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityBag {
    pub mentioned_products: Vec<Value>,
    pub mentioned_orders: Vec<Value>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Default for EntityBag {
    fn default() -> Self {
        let mut extra = HashMap::new();
        extra.insert("preferences".to_string(), Value::Object(Default::default()));
        Self { mentioned_products: Vec::new(), mentioned_orders: Vec::new(), extra }
    }
}

/// What the dispatch loop hands to the downstream agent call.
#[derive(Debug, Clone, Serialize)]
pub struct ContextSnapshot {
    pub session_id: String,
    pub context: ContextFields,
    pub entities: EntityBag,
    pub history: Vec<HistoryMessage>,
    pub created_at: DateTime<Utc>,
}

/// Mutable per-session conversation state: named fields, bounded message
/// history, and accumulated entities.
#[derive(Debug, Clone)]
pub struct ConversationContext {
    session_id: String,
    created_at: DateTime<Utc>,
    fields: ContextFields,
    history: VecDeque<HistoryMessage>,
    entities: EntityBag,
    max_history: usize,
}

impl ConversationContext {
    pub fn new(session_id: impl Into<String>, max_history: usize) -> Self {
        Self {
            session_id: session_id.into(),
            created_at: Utc::now(),
            fields: ContextFields::default(),
            history: VecDeque::new(),
            entities: EntityBag::default(),
            max_history,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn customer_id(&self) -> Option<&str> {
        self.fields.customer_id.as_deref()
    }

    /// Set a context value. Known keys land in their typed fields; any
    /// other key is accepted into the extension map.
    pub fn set(&mut self, key: &str, value: Value) {
        match key {
            "customer_id" => self.fields.customer_id = value_to_string(value),
            "current_topic" => self.fields.current_topic = value_to_string(value),
            "product_focus" => self.fields.product_focus = value_to_string(value),
            "last_intent" => self.fields.last_intent = serde_json::from_value(value).ok(),
            "filters" => {
                if let Value::Object(map) = value {
                    self.fields.filters = map.into_iter().collect();
                }
            }
            "cart_items" => {
                if let Value::Array(items) = value {
                    self.fields.cart_items = items;
                }
            }
            _ => {
                self.fields.extra.insert(key.to_string(), value);
            }
        }
        tracing::debug!(key, "context set");
    }

    /// Get a context value by key. Absent keys yield `None`.
    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            "customer_id" => self.fields.customer_id.clone().map(Value::String),
            "current_topic" => self.fields.current_topic.clone().map(Value::String),
            "product_focus" => self.fields.product_focus.clone().map(Value::String),
            "last_intent" => {
                self.fields.last_intent.map(|intent| Value::String(intent.as_str().to_string()))
            }
            "filters" => Some(Value::Object(self.fields.filters.clone().into_iter().collect())),
            "cart_items" => Some(Value::Array(self.fields.cart_items.clone())),
            _ => self.fields.extra.get(key).cloned(),
        }
    }

    pub fn set_last_intent(&mut self, intent: Intent) {
        self.fields.last_intent = Some(intent);
    }

    /// Append a history record with the current timestamp, evicting the
    /// oldest entries once the configured cap is exceeded.
    pub fn add_message(&mut self, role: impl Into<String>, content: impl Into<String>) {
        let message = HistoryMessage {
            role: role.into(),
            content: content.into(),
            timestamp: Utc::now(),
        };
        self.history.push_back(message);

        while self.history.len() > self.max_history {
            self.history.pop_front();
        }
    }

    /// The last `limit` history entries in chronological order. Reading
    /// never mutates state.
    pub fn history(&self, limit: usize) -> Vec<HistoryMessage> {
        let start = self.history.len().saturating_sub(limit);
        self.history.iter().skip(start).cloned().collect()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Record an entity. List categories deduplicate by equality; any
    /// other category overwrites.
    pub fn set_entity(&mut self, category: &str, value: Value) {
        match category {
            "mentioned_products" => {
                if !self.entities.mentioned_products.contains(&value) {
                    self.entities.mentioned_products.push(value);
                }
            }
            "mentioned_orders" => {
                if !self.entities.mentioned_orders.contains(&value) {
                    self.entities.mentioned_orders.push(value);
                }
            }
            _ => {
                self.entities.extra.insert(category.to_string(), value);
            }
        }
    }

    pub fn get_entity(&self, category: &str) -> Option<Value> {
        match category {
            "mentioned_products" => Some(Value::Array(self.entities.mentioned_products.clone())),
            "mentioned_orders" => Some(Value::Array(self.entities.mentioned_orders.clone())),
            _ => self.entities.extra.get(category).cloned(),
        }
    }

    /// Update the conversation topic, optionally narrowing product focus.
    pub fn update_topic(&mut self, topic: impl Into<String>, focus: Option<String>) {
        self.fields.current_topic = Some(topic.into());
        if focus.is_some() {
            self.fields.product_focus = focus;
        }
    }

    pub fn add_filter(&mut self, key: impl Into<String>, value: Value) {
        self.fields.filters.insert(key.into(), value);
    }

    pub fn clear_filters(&mut self) {
        self.fields.filters.clear();
    }

    /// Return to the initial-state shape, keeping only `customer_id`.
    pub fn reset(&mut self) {
        let customer_id = self.fields.customer_id.take();
        self.fields = ContextFields { customer_id, ..ContextFields::default() };
        self.history.clear();
        self.entities = EntityBag::default();
        tracing::info!(session_id = %self.session_id, "context reset");
    }

    /// Serialize the context for a downstream agent call: fields,
    /// entities, and the last few history entries.
    pub fn snapshot(&self) -> ContextSnapshot {
        ContextSnapshot {
            session_id: self.session_id.clone(),
            context: self.fields.clone(),
            entities: self.entities.clone(),
            history: self.history(SNAPSHOT_HISTORY),
            created_at: self.created_at,
        }
    }
}

fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_get_known_and_extra_keys() {
        let mut ctx = ConversationContext::new("SES-1", DEFAULT_MAX_HISTORY);
        ctx.set("customer_id", json!("CUST-123"));
        ctx.set("current_topic", json!("phones"));
        ctx.set("last_products", json!([{"id": "PROD-001"}]));

        assert_eq!(ctx.get("customer_id"), Some(json!("CUST-123")));
        assert_eq!(ctx.get("current_topic"), Some(json!("phones")));
        assert_eq!(ctx.get("last_products"), Some(json!([{"id": "PROD-001"}])));
        assert_eq!(ctx.get("nonexistent"), None);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut ctx = ConversationContext::new("SES-1", 10);
        for i in 0..15 {
            ctx.add_message("user", format!("message {i}"));
        }

        assert_eq!(ctx.history_len(), 10);
        let history = ctx.history(10);
        // Newest ten survive, oldest first.
        assert_eq!(history[0].content, "message 5");
        assert_eq!(history[9].content, "message 14");
    }

    #[test]
    fn test_history_read_is_stable() {
        let mut ctx = ConversationContext::new("SES-1", DEFAULT_MAX_HISTORY);
        ctx.add_message("user", "hello");
        ctx.add_message("assistant", "hi there");

        let first = ctx.history(10);
        let second = ctx.history(10);
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].content, second[0].content);
        assert_eq!(first[0].role, "user");
    }

    #[test]
    fn test_entity_list_dedup() {
        let mut ctx = ConversationContext::new("SES-1", DEFAULT_MAX_HISTORY);
        ctx.set_entity("mentioned_products", json!("P1"));
        ctx.set_entity("mentioned_products", json!("P1"));
        ctx.set_entity("mentioned_products", json!("P2"));

        assert_eq!(ctx.get_entity("mentioned_products"), Some(json!(["P1", "P2"])));
    }

    #[test]
    fn test_entity_scalar_overwrite() {
        let mut ctx = ConversationContext::new("SES-1", DEFAULT_MAX_HISTORY);
        ctx.set_entity("preferences", json!({"brand": "Apple"}));
        ctx.set_entity("preferences", json!({"brand": "Samsung"}));

        assert_eq!(ctx.get_entity("preferences"), Some(json!({"brand": "Samsung"})));
    }

    #[test]
    fn test_reset_preserves_customer_id() {
        let mut ctx = ConversationContext::new("SES-1", DEFAULT_MAX_HISTORY);
        ctx.set("customer_id", json!("CUST-X"));
        ctx.set("current_topic", json!("shoes"));
        ctx.add_message("user", "one");
        ctx.add_message("user", "two");
        ctx.add_message("user", "three");
        ctx.set_entity("mentioned_products", json!("P1"));

        ctx.reset();

        assert_eq!(ctx.get("customer_id"), Some(json!("CUST-X")));
        assert_eq!(ctx.get("current_topic"), None);
        assert_eq!(ctx.history_len(), 0);
        assert_eq!(ctx.get_entity("mentioned_products"), Some(json!([])));
    }

    #[test]
    fn test_update_topic() {
        let mut ctx = ConversationContext::new("SES-1", DEFAULT_MAX_HISTORY);
        ctx.update_topic("phones", Some("PROD-001".to_string()));
        assert_eq!(ctx.get("current_topic"), Some(json!("phones")));
        assert_eq!(ctx.get("product_focus"), Some(json!("PROD-001")));

        // Updating the topic without a focus keeps the old focus.
        ctx.update_topic("accessories", None);
        assert_eq!(ctx.get("product_focus"), Some(json!("PROD-001")));
    }

    #[test]
    fn test_filters() {
        let mut ctx = ConversationContext::new("SES-1", DEFAULT_MAX_HISTORY);
        ctx.add_filter("max_price", json!(500));
        ctx.add_filter("category", json!("Electronics"));
        assert_eq!(ctx.get("filters"), Some(json!({"max_price": 500, "category": "Electronics"})));

        ctx.clear_filters();
        assert_eq!(ctx.get("filters"), Some(json!({})));
    }

    #[test]
    fn test_snapshot_shape() {
        let mut ctx = ConversationContext::new("SES-42", DEFAULT_MAX_HISTORY);
        ctx.set("customer_id", json!("CUST-1"));
        for i in 0..8 {
            ctx.add_message("user", format!("m{i}"));
        }

        let snapshot = ctx.snapshot();
        assert_eq!(snapshot.session_id, "SES-42");
        assert_eq!(snapshot.history.len(), 5);
        assert_eq!(snapshot.history[0].content, "m3");

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["context"]["customer_id"], json!("CUST-1"));
        assert!(value["entities"]["mentioned_products"].is_array());
    }
}
