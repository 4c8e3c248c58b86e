//! Named, reusable approval policies.

use actum_types::RuleId;
use serde::{Deserialize, Serialize};

use crate::error::PolicyError;
use crate::expr::Expr;

/// A named approval policy referenced by actions.
///
/// Approval and rejection are independent predicate trees evaluated against
/// the same vote set; an action can require three approvals to pass while a
/// single named rejector suffices to kill it.
///
/// Rules are live policy, not frozen snapshots: updating a rule changes
/// what pending actions observe on their next vote or check, and never
/// touches actions that already reached a terminal status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,
    pub name: String,
    pub description: String,
    pub approve: Expr,
    pub reject: Expr,
}

impl Rule {
    /// Build a rule, validating both expression trees.
    pub fn new(
        id: RuleId,
        name: impl Into<String>,
        description: impl Into<String>,
        approve: Expr,
        reject: Expr,
    ) -> Result<Self, PolicyError> {
        approve.validate()?;
        reject.validate()?;
        Ok(Self {
            id,
            name: name.into(),
            description: description.into(),
            approve,
            reject,
        })
    }

    /// Re-validate both trees, used when an update patches expressions.
    pub fn validate(&self) -> Result<(), PolicyError> {
        self.approve.validate()?;
        self.reject.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actum_types::VoteKind;

    #[test]
    fn construction_validates_both_trees() {
        let bad = Rule::new(
            RuleId(1),
            "broken",
            "",
            Expr::approved_by("a"),
            Expr::at_least(0, VoteKind::Rejected, ["a"]),
        );
        assert_eq!(bad.unwrap_err(), PolicyError::ZeroQuorum);

        let ok = Rule::new(
            RuleId(1),
            "two-of-three",
            "any two approvers",
            Expr::at_least(2, VoteKind::Approved, ["a", "b", "c"]),
            Expr::at_least(2, VoteKind::Rejected, ["a", "b", "c"]),
        );
        assert!(ok.is_ok());
    }
}
