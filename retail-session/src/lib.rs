//! # retail-session
//!
//! Session registry and per-session conversation context.
//!
//! Sessions are opaque records keyed by generated `SES-…` tokens and owned
//! by a [`SessionStore`]. The default backend keeps everything in process
//! memory with a lazy TTL sweep; the `redis` feature adds a cache-backed
//! store whose TTL is enforced natively.
//!
//! [`ConversationContext`] is the mutable state attached to each session:
//! typed fields plus an open extension map, a bounded message history, and
//! deduplicating entity lists.

pub mod context;
pub mod inmemory;
pub mod session;
pub mod store;

#[cfg(feature = "redis")]
pub mod redis;

pub use context::{
    ContextFields, ContextSnapshot, ConversationContext, DEFAULT_MAX_HISTORY, EntityBag,
    HistoryMessage,
};
pub use inmemory::{DEFAULT_TTL_HOURS, InMemorySessionStore};
pub use session::{ANONYMOUS_CUSTOMER, Session, SessionUpdate, generate_session_id};
pub use store::SessionStore;

#[cfg(feature = "redis")]
pub use redis::RedisSessionStore;
