//! Predicate expression tree and structural validation.

use actum_types::{ParticipantId, VoteKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::PolicyError;

/// Maximum nesting depth of an expression tree.
pub const MAX_EXPR_DEPTH: usize = 16;

/// A boolean predicate over the votes cast on an action.
///
/// The variant set is closed: there is no rule-reference atom, so a rule
/// cannot reference itself and evaluation never needs store access.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "args", rename_all = "snake_case")]
pub enum Expr {
    /// True iff `participant` has a live vote of `kind`.
    Vote {
        participant: ParticipantId,
        kind: VoteKind,
    },
    /// True iff at least `n` distinct members of `participants` have a
    /// live vote of `kind`.
    AtLeast {
        n: u32,
        kind: VoteKind,
        participants: Vec<ParticipantId>,
    },
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Not(Box<Expr>),
}

impl Expr {
    /// Atom: `participant` approved.
    pub fn approved_by(participant: impl Into<ParticipantId>) -> Self {
        Expr::Vote {
            participant: participant.into(),
            kind: VoteKind::Approved,
        }
    }

    /// Atom: `participant` rejected.
    pub fn rejected_by(participant: impl Into<ParticipantId>) -> Self {
        Expr::Vote {
            participant: participant.into(),
            kind: VoteKind::Rejected,
        }
    }

    /// Quorum: at least `n` of `participants` cast a vote of `kind`.
    pub fn at_least<I, P>(n: u32, kind: VoteKind, participants: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ParticipantId>,
    {
        Expr::AtLeast {
            n,
            kind,
            participants: participants.into_iter().map(Into::into).collect(),
        }
    }

    /// Validate well-formedness: depth bound, combinator arity, quorum
    /// bounds, and participant identity syntax.
    pub fn validate(&self) -> Result<(), PolicyError> {
        self.validate_at(1)
    }

    fn validate_at(&self, depth: usize) -> Result<(), PolicyError> {
        if depth > MAX_EXPR_DEPTH {
            return Err(PolicyError::TooDeep {
                max: MAX_EXPR_DEPTH,
            });
        }

        match self {
            Expr::Vote { participant, .. } => {
                if !participant.is_well_formed() {
                    return Err(PolicyError::MalformedParticipant(participant.clone()));
                }
                Ok(())
            }
            Expr::AtLeast { n, participants, .. } => {
                if *n == 0 {
                    return Err(PolicyError::ZeroQuorum);
                }
                if *n as usize > participants.len() {
                    return Err(PolicyError::QuorumOutOfRange {
                        n: *n,
                        set_size: participants.len(),
                    });
                }
                let mut seen = BTreeSet::new();
                for p in participants {
                    if !p.is_well_formed() {
                        return Err(PolicyError::MalformedParticipant(p.clone()));
                    }
                    if !seen.insert(p) {
                        return Err(PolicyError::DuplicateParticipant(p.clone()));
                    }
                }
                Ok(())
            }
            Expr::And(children) => {
                if children.is_empty() {
                    return Err(PolicyError::EmptyCombinator("and"));
                }
                children.iter().try_for_each(|c| c.validate_at(depth + 1))
            }
            Expr::Or(children) => {
                if children.is_empty() {
                    return Err(PolicyError::EmptyCombinator("or"));
                }
                children.iter().try_for_each(|c| c.validate_at(depth + 1))
            }
            Expr::Not(child) => child.validate_at(depth + 1),
        }
    }
}
