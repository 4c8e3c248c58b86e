//! Idempotent per-voter vote accumulation.

use actum_types::{Action, ActionStatus, ParticipantId, Vote, VoteKind};

use crate::error::EngineError;

/// Record or overwrite `participant`'s vote on a pending action.
///
/// Re-voting replaces the prior entry in place (at most one live vote per
/// participant); it is not an error, so a voter can change their mind until
/// the rule resolves. Triggering re-evaluation is the caller's job.
pub fn add_or_update_vote(
    action: &mut Action,
    participant: ParticipantId,
    kind: VoteKind,
    height: u64,
) -> Result<(), EngineError> {
    if action.status != ActionStatus::Pending {
        return Err(EngineError::NotPending {
            id: action.id,
            status: action.status,
        });
    }

    match action
        .votes
        .iter_mut()
        .find(|v| v.participant == participant)
    {
        Some(vote) => {
            vote.kind = kind;
            vote.cast_at_height = height;
        }
        None => action.votes.push(Vote {
            participant,
            kind,
            cast_at_height: height,
        }),
    }
    Ok(())
}
