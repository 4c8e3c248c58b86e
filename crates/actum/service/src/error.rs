use actum_engine::EngineError;
use actum_store::StoreError;
use thiserror::Error;

/// Errors surfaced at the message layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The wire carried a vote type outside the known set.
    #[error("unhandled vote type value: {0}")]
    UnknownVoteKind(i32),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_vote_kind_names_the_value() {
        let err = ServiceError::UnknownVoteKind(7);
        assert_eq!(err.to_string(), "unhandled vote type value: 7");
    }
}
