//! Action records, votes, and the closed message set.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::id::{ActionId, ParticipantId, RuleId};

/// Lifecycle status of an [`Action`].
///
/// Transitions are one-directional: once a terminal status is reached the
/// record is frozen. `Approved` is a transient pre-execution verdict and is
/// never persisted; within one call it always resolves to `Executed` or
/// `Rejected`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Pending,
    Approved,
    Rejected,
    Executed,
    Timeout,
    Revoked,
}

impl ActionStatus {
    /// Terminal statuses permit no further vote, revoke, or execution.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ActionStatus::Executed
                | ActionStatus::Rejected
                | ActionStatus::Timeout
                | ActionStatus::Revoked
        )
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionStatus::Pending => "pending",
            ActionStatus::Approved => "approved",
            ActionStatus::Rejected => "rejected",
            ActionStatus::Executed => "executed",
            ActionStatus::Timeout => "timeout",
            ActionStatus::Revoked => "revoked",
        };
        f.write_str(s)
    }
}

/// The kind of stance a participant takes on an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteKind {
    Approved,
    Rejected,
}

impl VoteKind {
    /// Decode the wire representation. Unknown values are an error at the
    /// service boundary, not a silently dropped vote.
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            1 => Some(VoteKind::Approved),
            2 => Some(VoteKind::Rejected),
            _ => None,
        }
    }
}

/// A participant's recorded stance on one action.
///
/// At most one live vote per participant; re-voting overwrites in place.
/// Insertion order is preserved for audit but is irrelevant to evaluation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub participant: ParticipantId,
    pub kind: VoteKind,
    pub cast_at_height: u64,
}

/// An encapsulated operation executed when the action is approved.
///
/// A closed enum with an explicit dispatch table keeps execution
/// deterministic and exhaustively checkable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionMessage {
    /// Write a value into the application state.
    Put { key: String, value: Vec<u8> },
    /// Remove a value from the application state.
    Delete { key: String },
    /// Route an opaque payload to a named application handler.
    Invoke { handler: String, payload: Vec<u8> },
}

/// Attempted status transition out of a frozen record.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid status transition: {from} -> {to}")]
pub struct StatusError {
    pub from: ActionStatus,
    pub to: ActionStatus,
}

/// A pending or resolved request to execute one or more messages, gated by
/// a rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub id: ActionId,
    pub rule_id: RuleId,
    pub status: ActionStatus,
    pub votes: Vec<Vote>,
    /// Block-height deadline; `0` means no timeout.
    pub timeout_height: u64,
    pub messages: Vec<ActionMessage>,
    pub creator: ParticipantId,
    pub created_at_height: u64,
    /// Dispatch failure recorded when an approved action failed to execute.
    pub failure_reason: Option<String>,
}

impl Action {
    /// The live vote cast by `participant`, if any.
    pub fn vote_of(&self, participant: &ParticipantId) -> Option<&Vote> {
        self.votes.iter().find(|v| &v.participant == participant)
    }

    /// Whether the height-based deadline has elapsed at `height`.
    pub fn timed_out_at(&self, height: u64) -> bool {
        self.timeout_height > 0 && self.timeout_height < height
    }

    /// Guarded one-directional status transition.
    ///
    /// Terminal records are frozen and no record ever re-enters `Pending`.
    pub fn set_status(&mut self, to: ActionStatus) -> Result<(), StatusError> {
        if self.status.is_terminal() || to == ActionStatus::Pending {
            return Err(StatusError {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}
