//! # retail-runner
//!
//! The dispatch loop for the retail chatbot.
//!
//! [`Orchestrator`] owns the agent registry and turns a raw customer
//! message into a uniform [`TurnResponse`]: classify, route, look up the
//! target agent, invoke it, and normalize the result. Failures (an
//! unregistered target, an agent error) are converted into failure
//! envelopes at this boundary and never propagate to the HTTP layer.
//!
//! [`Chatbot`] layers session and context bookkeeping on top: it resolves
//! or creates sessions, records each turn into the conversation history,
//! and serializes concurrent turns on the same session.

pub mod chat;
pub mod envelope;
pub mod orchestrator;

pub use chat::{ChatOutcome, Chatbot};
pub use envelope::TurnResponse;
pub use orchestrator::{ERROR_MESSAGE, Orchestrator, REPHRASE_MESSAGE};
