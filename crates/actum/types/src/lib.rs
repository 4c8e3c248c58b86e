//! Actum Types - shared data model for the approval engine
//!
//! Ids, actions, votes, and the closed set of encapsulated messages an
//! approved action may execute. These types are passive: all lifecycle
//! behavior lives in `actum-engine`.

#![deny(unsafe_code)]

pub mod action;
pub mod id;

pub use action::{Action, ActionMessage, ActionStatus, StatusError, Vote, VoteKind};
pub use id::{ActionId, ParticipantId, RuleId};
