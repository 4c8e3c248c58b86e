//! Actum Engine - the action lifecycle state machine
//!
//! Orchestrates creation, idempotent voting, lazy height-based timeout
//! discovery, revocation, and all-or-nothing execution of approved actions.
//! The engine runs inside a single-threaded deterministic state transition:
//! no locking, no blocking I/O, and an explicit guard against re-entrant
//! calls from within message dispatch.

#![deny(unsafe_code)]

pub mod dispatch;
pub mod engine;
pub mod error;
pub mod execute;
pub mod tally;

pub use dispatch::{DispatchError, Dispatcher, InvokeHandler, StateDispatcher};
pub use engine::{ActionEngine, EngineCtx};
pub use error::EngineError;
pub use execute::execute_messages;
pub use tally::add_or_update_vote;
