use actum_policy::PolicyError;
use actum_types::{ActionId, RuleId};
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Store-layer errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("rule not found: {0}")]
    RuleNotFound(RuleId),

    #[error("action not found: {0}")]
    ActionNotFound(ActionId),

    #[error("invalid rule: {0}")]
    InvalidRule(#[from] PolicyError),

    #[error("codec error: {0}")]
    Codec(String),
}
