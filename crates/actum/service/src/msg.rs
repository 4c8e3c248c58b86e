//! Request and response messages of the service surface.

use actum_policy::Expr;
use actum_store::RulePatch;
use actum_types::{ActionId, ActionMessage, ActionStatus, ParticipantId, RuleId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MsgNewRule {
    pub name: String,
    pub description: String,
    pub approve: Expr,
    pub reject: Expr,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgNewRuleResponse {
    pub rule_id: RuleId,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MsgUpdateRule {
    pub rule_id: RuleId,
    pub patch: RulePatch,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MsgNewAction {
    pub rule_id: RuleId,
    pub messages: Vec<ActionMessage>,
    pub creator: ParticipantId,
    /// Block-height deadline; `0` means no timeout.
    pub timeout_height: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgNewActionResponse {
    pub action_id: ActionId,
    pub status: ActionStatus,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgVoteForAction {
    pub action_id: ActionId,
    pub participant: ParticipantId,
    /// Raw wire vote type; anything outside the known set is an error.
    pub vote_type: i32,
}

/// Shared response for vote, check, and revoke calls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgActionStatusResponse {
    pub status: ActionStatus,
}
