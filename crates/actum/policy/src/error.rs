use actum_types::ParticipantId;
use thiserror::Error;

/// Structural rule validation errors.
///
/// All of these are raised at construction or update time; a rule that was
/// ever accepted evaluates without error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("expression exceeds maximum depth of {max}")]
    TooDeep { max: usize },

    #[error("quorum must require at least one vote")]
    ZeroQuorum,

    #[error("quorum of {n} cannot be met by a set of {set_size} participants")]
    QuorumOutOfRange { n: u32, set_size: usize },

    #[error("duplicate participant in quorum set: {0}")]
    DuplicateParticipant(ParticipantId),

    #[error("malformed participant identity: {0:?}")]
    MalformedParticipant(ParticipantId),

    #[error("{0} combinator has no children")]
    EmptyCombinator(&'static str),
}
