use actum_store::StoreError;
use actum_types::{ActionId, ActionStatus, ParticipantId, StatusError};
use thiserror::Error;

/// Errors from the action lifecycle engine.
///
/// Every failed call is fatal to that call (the surrounding transactional
/// store discards the whole transition); none of these ever corrupts a
/// previously committed terminal action.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("action must contain at least one message")]
    EmptyAction,

    #[error("timeout height {timeout_height} is not after current height {current_height}")]
    InvalidTimeout {
        timeout_height: u64,
        current_height: u64,
    },

    #[error("action {id} is not pending: {status}")]
    NotPending { id: ActionId, status: ActionStatus },

    #[error("{requester} is not the creator of action {id}")]
    Unauthorized {
        id: ActionId,
        requester: ParticipantId,
    },

    #[error("re-entrant call while executing action {0}")]
    Reentrant(ActionId),

    #[error(transparent)]
    Status(#[from] StatusError),
}
