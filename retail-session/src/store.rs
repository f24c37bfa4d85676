use crate::{Session, SessionUpdate};
use async_trait::async_trait;
use retail_core::Result;

/// Storage backend for session records.
///
/// Implementations must make each operation atomic per session id: a
/// get-modify-write such as [`SessionStore::update`] happens inside a
/// single critical section so concurrent turns on one session cannot lose
/// counter updates. Operations on different ids are independent.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create and persist a session with a fresh id and zeroed counters.
    async fn create(&self, customer_id: &str) -> Result<Session>;

    /// Fetch a stored session. Never creates on miss.
    async fn get(&self, session_id: &str) -> Result<Option<Session>>;

    /// Merge partial fields into an existing record and refresh
    /// `last_activity`. A missing session is a silent no-op; callers that
    /// care check with [`SessionStore::get`] first.
    async fn update(&self, session_id: &str, update: SessionUpdate) -> Result<()>;

    /// Idempotent removal. Returns whether anything was removed.
    async fn delete(&self, session_id: &str) -> Result<bool>;

    /// Remove sessions idle longer than the configured TTL and return the
    /// removed count. Backends with native TTL expiry always return 0.
    async fn cleanup_expired(&self) -> Result<usize>;

    /// Number of live sessions.
    async fn active_count(&self) -> Result<usize>;
}
