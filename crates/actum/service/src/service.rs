//! The approval service façade.

use actum_engine::{ActionEngine, EngineCtx, InvokeHandler, StateDispatcher};
use actum_policy::Rule;
use actum_store::{ActionStore, Kv, QueryWindow, RuleStore};
use actum_types::{Action, ActionId, ActionStatus, ParticipantId, RuleId, VoteKind};
use tracing::info;

use crate::error::ServiceError;
use crate::msg::{
    MsgActionStatusResponse, MsgNewAction, MsgNewActionResponse, MsgNewRule, MsgNewRuleResponse,
    MsgUpdateRule, MsgVoteForAction,
};

/// Owns the engine, the dispatch table, and the injected state backend.
///
/// The current block height is an ambient input passed into every
/// state-mutating call, so the service is testable without a live chain.
pub struct ActService<K: Kv> {
    kv: K,
    engine: ActionEngine,
    dispatcher: StateDispatcher,
}

impl<K: Kv> ActService<K> {
    pub fn new(kv: K) -> Self {
        Self {
            kv,
            engine: ActionEngine::new(),
            dispatcher: StateDispatcher::new(),
        }
    }

    /// Register an application handler for `Invoke` messages.
    pub fn register_handler(&mut self, name: impl Into<String>, handler: InvokeHandler) {
        self.dispatcher.register(name, handler);
    }

    /// Read access to the underlying state backend.
    pub fn kv(&self) -> &K {
        &self.kv
    }

    // ============ Rule Operations ============

    pub fn new_rule(&mut self, msg: MsgNewRule) -> Result<MsgNewRuleResponse, ServiceError> {
        let rule = RuleStore::create(
            &mut self.kv,
            msg.name,
            msg.description,
            msg.approve,
            msg.reject,
        )?;
        info!(rule_id = %rule.id, name = %rule.name, "rule created");
        Ok(MsgNewRuleResponse { rule_id: rule.id })
    }

    pub fn update_rule(&mut self, msg: MsgUpdateRule) -> Result<(), ServiceError> {
        RuleStore::update(&mut self.kv, msg.rule_id, msg.patch)?;
        info!(rule_id = %msg.rule_id, "rule updated");
        Ok(())
    }

    // ============ Action Operations ============

    pub fn new_action(
        &mut self,
        height: u64,
        msg: MsgNewAction,
    ) -> Result<MsgNewActionResponse, ServiceError> {
        let mut ctx = EngineCtx {
            height,
            dispatcher: &mut self.dispatcher,
        };
        let action = self.engine.new_action(
            &mut self.kv,
            &mut ctx,
            msg.rule_id,
            msg.messages,
            msg.creator,
            msg.timeout_height,
        )?;
        Ok(MsgNewActionResponse {
            action_id: action.id,
            status: action.status,
        })
    }

    /// The generic vote path; decodes the raw wire vote type first.
    pub fn vote_for_action(
        &mut self,
        height: u64,
        msg: MsgVoteForAction,
    ) -> Result<MsgActionStatusResponse, ServiceError> {
        let kind = VoteKind::from_raw(msg.vote_type)
            .ok_or(ServiceError::UnknownVoteKind(msg.vote_type))?;
        self.cast_vote(height, msg.action_id, msg.participant, kind)
    }

    /// `VoteForAction(Approved)`.
    pub fn approve_action(
        &mut self,
        height: u64,
        action_id: ActionId,
        participant: ParticipantId,
    ) -> Result<MsgActionStatusResponse, ServiceError> {
        self.cast_vote(height, action_id, participant, VoteKind::Approved)
    }

    /// `VoteForAction(Rejected)`.
    pub fn reject_action(
        &mut self,
        height: u64,
        action_id: ActionId,
        participant: ParticipantId,
    ) -> Result<MsgActionStatusResponse, ServiceError> {
        self.cast_vote(height, action_id, participant, VoteKind::Rejected)
    }

    fn cast_vote(
        &mut self,
        height: u64,
        action_id: ActionId,
        participant: ParticipantId,
        kind: VoteKind,
    ) -> Result<MsgActionStatusResponse, ServiceError> {
        let mut ctx = EngineCtx {
            height,
            dispatcher: &mut self.dispatcher,
        };
        let status = self
            .engine
            .vote(&mut self.kv, &mut ctx, action_id, participant, kind)?;
        Ok(MsgActionStatusResponse { status })
    }

    /// Re-evaluate without a new vote; a no-op on terminal actions.
    pub fn check_action(
        &mut self,
        height: u64,
        action_id: ActionId,
    ) -> Result<MsgActionStatusResponse, ServiceError> {
        let mut ctx = EngineCtx {
            height,
            dispatcher: &mut self.dispatcher,
        };
        let status = self.engine.check(&mut self.kv, &mut ctx, action_id)?;
        Ok(MsgActionStatusResponse { status })
    }

    pub fn revoke_action(
        &mut self,
        height: u64,
        action_id: ActionId,
        requester: ParticipantId,
    ) -> Result<MsgActionStatusResponse, ServiceError> {
        let mut ctx = EngineCtx {
            height,
            dispatcher: &mut self.dispatcher,
        };
        let status = self
            .engine
            .revoke(&mut self.kv, &mut ctx, action_id, requester)?;
        Ok(MsgActionStatusResponse { status })
    }

    // ============ Queries ============

    pub fn action(&self, id: ActionId) -> Result<Action, ServiceError> {
        Ok(ActionStore::get(&self.kv, id)?)
    }

    pub fn rule(&self, id: RuleId) -> Result<Rule, ServiceError> {
        Ok(RuleStore::get(&self.kv, id)?)
    }

    pub fn actions(&self, window: QueryWindow) -> Result<Vec<Action>, ServiceError> {
        Ok(ActionStore::list(&self.kv, window)?)
    }

    pub fn rules(&self, window: QueryWindow) -> Result<Vec<Rule>, ServiceError> {
        Ok(RuleStore::list(&self.kv, window)?)
    }

    /// Current status of an action, for callers that only need the state.
    pub fn action_status(&self, id: ActionId) -> Result<ActionStatus, ServiceError> {
        Ok(self.action(id)?.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actum_policy::Expr;
    use actum_store::MemKv;

    fn service_with_rule() -> (ActService<MemKv>, RuleId) {
        let mut svc = ActService::new(MemKv::new());
        let resp = svc
            .new_rule(MsgNewRule {
                name: "solo".into(),
                description: String::new(),
                approve: Expr::approved_by("a"),
                reject: Expr::rejected_by("a"),
            })
            .unwrap();
        (svc, resp.rule_id)
    }

    #[test]
    fn unknown_vote_type_is_refused() {
        let (mut svc, rule_id) = service_with_rule();
        let action = svc
            .new_action(
                1,
                MsgNewAction {
                    rule_id,
                    messages: vec![actum_types::ActionMessage::Put {
                        key: "k".into(),
                        value: vec![1],
                    }],
                    creator: "c".into(),
                    timeout_height: 0,
                },
            )
            .unwrap();

        let err = svc
            .vote_for_action(
                2,
                MsgVoteForAction {
                    action_id: action.action_id,
                    participant: "a".into(),
                    vote_type: 42,
                },
            )
            .unwrap_err();
        assert!(matches!(err, ServiceError::UnknownVoteKind(42)));
        // The bogus vote left no trace.
        assert!(svc.action(action.action_id).unwrap().votes.is_empty());
    }

    #[test]
    fn raw_vote_types_map_to_kinds() {
        let (mut svc, rule_id) = service_with_rule();
        let action = svc
            .new_action(
                1,
                MsgNewAction {
                    rule_id,
                    messages: vec![actum_types::ActionMessage::Put {
                        key: "k".into(),
                        value: vec![1],
                    }],
                    creator: "c".into(),
                    timeout_height: 0,
                },
            )
            .unwrap();

        let resp = svc
            .vote_for_action(
                2,
                MsgVoteForAction {
                    action_id: action.action_id,
                    participant: "a".into(),
                    vote_type: 1,
                },
            )
            .unwrap();
        assert_eq!(resp.status, ActionStatus::Executed);
    }

    #[test]
    fn queries_page_over_records() {
        let (mut svc, rule_id) = service_with_rule();
        for i in 0..3 {
            svc.new_action(
                1,
                MsgNewAction {
                    rule_id,
                    messages: vec![actum_types::ActionMessage::Put {
                        key: format!("k{i}"),
                        value: vec![1],
                    }],
                    creator: "c".into(),
                    timeout_height: 0,
                },
            )
            .unwrap();
        }
        let page = svc
            .actions(QueryWindow {
                limit: 2,
                offset: 1,
            })
            .unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].id, ActionId(2));
        assert_eq!(svc.rules(QueryWindow::default()).unwrap().len(), 1);
    }
}
