//! Typed store for rules.
//!
//! Rules are mutated in place and never deleted: terminal actions keep
//! referencing their rule by id, so referential integrity requires the
//! record to outlive every action that named it.

use actum_policy::{Expr, Rule};
use actum_types::RuleId;
use serde::{Deserialize, Serialize};

use crate::kv::Kv;
use crate::{decode, encode, next_seq, QueryWindow, StoreError, StoreResult};

const RULE_PREFIX: &[u8] = b"rules/";
const RULE_SEQ: &[u8] = b"seq/rules";

fn rule_key(id: RuleId) -> Vec<u8> {
    let mut key = RULE_PREFIX.to_vec();
    key.extend_from_slice(&id.0.to_be_bytes());
    key
}

/// Partial update applied by `UpdateRule`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RulePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub approve: Option<Expr>,
    pub reject: Option<Expr>,
}

/// Rule persistence over a [`Kv`].
pub struct RuleStore;

impl RuleStore {
    /// Validate and persist a new rule, assigning the next monotonic id.
    ///
    /// Validation happens before any write: an invalid expression leaves
    /// the store untouched, including the id sequence.
    pub fn create(
        kv: &mut dyn Kv,
        name: impl Into<String>,
        description: impl Into<String>,
        approve: Expr,
        reject: Expr,
    ) -> StoreResult<Rule> {
        approve.validate()?;
        reject.validate()?;

        let id = RuleId(next_seq(kv, RULE_SEQ));
        let rule = Rule {
            id,
            name: name.into(),
            description: description.into(),
            approve,
            reject,
        };
        kv.set(&rule_key(id), &encode(&rule)?);
        Ok(rule)
    }

    pub fn get(kv: &dyn Kv, id: RuleId) -> StoreResult<Rule> {
        let bytes = kv.get(&rule_key(id)).ok_or(StoreError::RuleNotFound(id))?;
        decode(&bytes)
    }

    /// Apply a patch in place. The patched rule is re-validated before the
    /// record is written; a failed patch leaves the stored rule unchanged.
    pub fn update(kv: &mut dyn Kv, id: RuleId, patch: RulePatch) -> StoreResult<Rule> {
        let mut rule = Self::get(kv, id)?;
        if let Some(name) = patch.name {
            rule.name = name;
        }
        if let Some(description) = patch.description {
            rule.description = description;
        }
        if let Some(approve) = patch.approve {
            rule.approve = approve;
        }
        if let Some(reject) = patch.reject {
            rule.reject = reject;
        }
        rule.validate()?;
        kv.set(&rule_key(id), &encode(&rule)?);
        Ok(rule)
    }

    /// Rules in id order, paged.
    pub fn list(kv: &dyn Kv, window: QueryWindow) -> StoreResult<Vec<Rule>> {
        kv.iter_prefix(RULE_PREFIX)
            .into_iter()
            .skip(window.offset)
            .take(window.limit)
            .map(|(_, v)| decode(&v))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemKv;
    use actum_types::VoteKind;

    fn simple_exprs() -> (Expr, Expr) {
        (
            Expr::at_least(2, VoteKind::Approved, ["a", "b", "c"]),
            Expr::at_least(2, VoteKind::Rejected, ["a", "b", "c"]),
        )
    }

    #[test]
    fn ids_are_monotonic() {
        let mut kv = MemKv::new();
        let (approve, reject) = simple_exprs();
        let r1 = RuleStore::create(&mut kv, "one", "", approve.clone(), reject.clone()).unwrap();
        let r2 = RuleStore::create(&mut kv, "two", "", approve, reject).unwrap();
        assert_eq!(r1.id, RuleId(1));
        assert_eq!(r2.id, RuleId(2));
    }

    #[test]
    fn invalid_rule_persists_nothing() {
        let mut kv = MemKv::new();
        let bad = Expr::at_least(5, VoteKind::Approved, ["a"]);
        let (_, reject) = simple_exprs();
        let err = RuleStore::create(&mut kv, "bad", "", bad, reject).unwrap_err();
        assert!(matches!(err, StoreError::InvalidRule(_)));
        assert!(kv.is_empty());
    }

    #[test]
    fn get_unknown_rule() {
        let kv = MemKv::new();
        assert!(matches!(
            RuleStore::get(&kv, RuleId(9)),
            Err(StoreError::RuleNotFound(RuleId(9)))
        ));
    }

    #[test]
    fn update_patches_in_place() {
        let mut kv = MemKv::new();
        let (approve, reject) = simple_exprs();
        let rule = RuleStore::create(&mut kv, "orig", "d", approve, reject).unwrap();

        let patched = RuleStore::update(
            &mut kv,
            rule.id,
            RulePatch {
                name: Some("renamed".into()),
                approve: Some(Expr::at_least(1, VoteKind::Approved, ["a", "b", "c"])),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(patched.name, "renamed");
        assert_eq!(patched.description, "d");

        let reloaded = RuleStore::get(&kv, rule.id).unwrap();
        assert_eq!(reloaded, patched);
    }

    #[test]
    fn failed_update_leaves_rule_unchanged() {
        let mut kv = MemKv::new();
        let (approve, reject) = simple_exprs();
        let rule = RuleStore::create(&mut kv, "orig", "", approve, reject).unwrap();

        let err = RuleStore::update(
            &mut kv,
            rule.id,
            RulePatch {
                approve: Some(Expr::And(vec![])),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::InvalidRule(_)));
        assert_eq!(RuleStore::get(&kv, rule.id).unwrap(), rule);
    }

    #[test]
    fn list_pages_in_id_order() {
        let mut kv = MemKv::new();
        let (approve, reject) = simple_exprs();
        for i in 0..5 {
            RuleStore::create(&mut kv, format!("r{i}"), "", approve.clone(), reject.clone())
                .unwrap();
        }
        let page = RuleStore::list(
            &kv,
            QueryWindow {
                limit: 2,
                offset: 1,
            },
        )
        .unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].id, RuleId(2));
        assert_eq!(page[1].id, RuleId(3));
    }
}
