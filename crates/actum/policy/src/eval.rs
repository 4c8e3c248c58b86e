//! Three-valued predicate evaluation.
//!
//! Evaluation is a pure function of `(rule, votes)`. Atoms that concern a
//! participant who has not voted yet are `Unknown`; boolean combinators
//! compose with Kleene semantics so a definite sibling can short-circuit
//! (`Or(True, Unknown) = True`, `And(False, Unknown) = False`).

use actum_types::{ParticipantId, Vote, VoteKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::expr::Expr;
use crate::rule::Rule;

/// Outcome of evaluating a rule against an action's votes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Approved,
    Rejected,
    Undecided,
}

/// Kleene truth value of one predicate tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Ternary {
    True,
    False,
    Unknown,
}

impl Ternary {
    fn not(self) -> Ternary {
        match self {
            Ternary::True => Ternary::False,
            Ternary::False => Ternary::True,
            Ternary::Unknown => Ternary::Unknown,
        }
    }
}

/// Evaluate `rule` against `votes`.
///
/// The approve tree is checked before the reject tree, so a pathological
/// rule where both resolve in the same evaluation deterministically yields
/// `Approved`.
pub fn evaluate(rule: &Rule, votes: &[Vote]) -> Verdict {
    let by_participant: BTreeMap<&ParticipantId, VoteKind> =
        votes.iter().map(|v| (&v.participant, v.kind)).collect();

    if eval_expr(&rule.approve, &by_participant) == Ternary::True {
        return Verdict::Approved;
    }
    if eval_expr(&rule.reject, &by_participant) == Ternary::True {
        return Verdict::Rejected;
    }
    Verdict::Undecided
}

fn eval_expr(expr: &Expr, votes: &BTreeMap<&ParticipantId, VoteKind>) -> Ternary {
    match expr {
        Expr::Vote { participant, kind } => match votes.get(participant) {
            None => Ternary::Unknown,
            Some(cast) if cast == kind => Ternary::True,
            Some(_) => Ternary::False,
        },
        Expr::AtLeast {
            n,
            kind,
            participants,
        } => {
            let mut matching = 0usize;
            let mut unvoted = 0usize;
            for p in participants {
                match votes.get(p) {
                    None => unvoted += 1,
                    Some(cast) if cast == kind => matching += 1,
                    Some(_) => {}
                }
            }
            let n = *n as usize;
            if matching >= n {
                Ternary::True
            } else if matching + unvoted < n {
                // Too few members left who could still match; re-votes can
                // flip this later, which is why False is not terminal.
                Ternary::False
            } else {
                Ternary::Unknown
            }
        }
        Expr::And(children) => {
            let mut result = Ternary::True;
            for child in children {
                match eval_expr(child, votes) {
                    Ternary::False => return Ternary::False,
                    Ternary::Unknown => result = Ternary::Unknown,
                    Ternary::True => {}
                }
            }
            result
        }
        Expr::Or(children) => {
            let mut result = Ternary::False;
            for child in children {
                match eval_expr(child, votes) {
                    Ternary::True => return Ternary::True,
                    Ternary::Unknown => result = Ternary::Unknown,
                    Ternary::False => {}
                }
            }
            result
        }
        Expr::Not(child) => eval_expr(child, votes).not(),
    }
}
