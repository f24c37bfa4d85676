use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Customer id recorded when the caller supplies none.
pub const ANONYMOUS_CUSTOMER: &str = "anonymous";

/// One customer's ongoing interaction. Owned exclusively by the session
/// store; conversation context is a delegate keyed by `session_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub customer_id: String,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub message_count: u64,
}

impl Session {
    pub fn new(customer_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: generate_session_id(),
            customer_id: customer_id.into(),
            created_at: now,
            last_activity: now,
            message_count: 0,
        }
    }

    /// Refresh the activity timestamp.
    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    pub fn is_expired(&self, ttl: Duration) -> bool {
        Utc::now() - self.last_activity > ttl
    }
}

/// Generate a fresh session token: `SES-` plus twelve uppercase hex chars
/// of a v4 UUID. Collision probability is negligible at demo scale.
pub fn generate_session_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("SES-{}", hex[..12].to_uppercase())
}

/// Partial update merged into an existing session record.
///
/// `increment_messages` bumps the counter inside the store's critical
/// section, so concurrent turns on one session cannot lose updates.
#[derive(Debug, Clone, Default)]
pub struct SessionUpdate {
    pub customer_id: Option<String>,
    pub message_count: Option<u64>,
    pub increment_messages: bool,
}

impl SessionUpdate {
    pub fn increment_messages() -> Self {
        Self { increment_messages: true, ..Self::default() }
    }

    pub fn apply(&self, session: &mut Session) {
        if let Some(customer_id) = &self.customer_id {
            session.customer_id = customer_id.clone();
        }
        if let Some(message_count) = self.message_count {
            session.message_count = message_count;
        }
        if self.increment_messages {
            session.message_count += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_format() {
        let id = generate_session_id();
        assert!(id.starts_with("SES-"));
        assert_eq!(id.len(), 16);
        assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    }

    #[test]
    fn test_session_ids_unique() {
        assert_ne!(generate_session_id(), generate_session_id());
    }

    #[test]
    fn test_new_session() {
        let session = Session::new("CUST-123");
        assert_eq!(session.customer_id, "CUST-123");
        assert_eq!(session.message_count, 0);
        assert_eq!(session.created_at, session.last_activity);
    }

    #[test]
    fn test_update_apply() {
        let mut session = Session::new(ANONYMOUS_CUSTOMER);
        let update = SessionUpdate {
            customer_id: Some("CUST-9".into()),
            message_count: Some(3),
            ..SessionUpdate::default()
        };
        update.apply(&mut session);
        assert_eq!(session.customer_id, "CUST-9");
        assert_eq!(session.message_count, 3);

        // Empty update leaves everything in place.
        SessionUpdate::default().apply(&mut session);
        assert_eq!(session.message_count, 3);
    }

    #[test]
    fn test_update_increments_counter() {
        let mut session = Session::new(ANONYMOUS_CUSTOMER);
        SessionUpdate::increment_messages().apply(&mut session);
        SessionUpdate::increment_messages().apply(&mut session);
        assert_eq!(session.message_count, 2);
    }

    #[test]
    fn test_expiry() {
        let mut session = Session::new(ANONYMOUS_CUSTOMER);
        assert!(!session.is_expired(Duration::hours(24)));
        session.last_activity = Utc::now() - Duration::hours(25);
        assert!(session.is_expired(Duration::hours(24)));
    }
}
