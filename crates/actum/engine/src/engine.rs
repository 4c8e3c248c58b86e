//! The action lifecycle manager.

use std::cell::Cell;

use actum_policy::{evaluate, Verdict};
use actum_store::{ActionStore, Kv, RuleStore};
use actum_types::{Action, ActionId, ActionMessage, ActionStatus, ParticipantId, RuleId, VoteKind};
use tracing::{debug, info, warn};

use crate::dispatch::Dispatcher;
use crate::error::EngineError;
use crate::execute::execute_messages;
use crate::tally::add_or_update_vote;

/// Ambient execution context, passed explicitly into every call so the
/// engine is testable without a live chain.
pub struct EngineCtx<'a> {
    /// Current block height.
    pub height: u64,
    /// Operation dispatcher used only when an approved action executes.
    pub dispatcher: &'a mut dyn Dispatcher,
}

/// Orchestrates the action state machine over injected stores.
///
/// Single-writer per state transition is guaranteed by the surrounding
/// deterministic execution model; the only hazard left is a dispatched
/// message calling back into the engine, which the execution guard turns
/// into an explicit error.
#[derive(Default)]
pub struct ActionEngine {
    executing: Cell<Option<ActionId>>,
}

impl ActionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> Result<(), EngineError> {
        match self.executing.get() {
            Some(id) => Err(EngineError::Reentrant(id)),
            None => Ok(()),
        }
    }

    /// Create a new pending action gated by `rule_id`.
    ///
    /// The rule must exist, `messages` must be non-empty, and
    /// `timeout_height` must be zero or strictly above the current height.
    pub fn new_action(
        &self,
        kv: &mut dyn Kv,
        ctx: &mut EngineCtx<'_>,
        rule_id: RuleId,
        messages: Vec<ActionMessage>,
        creator: ParticipantId,
        timeout_height: u64,
    ) -> Result<Action, EngineError> {
        self.guard()?;

        if messages.is_empty() {
            return Err(EngineError::EmptyAction);
        }
        if timeout_height != 0 && timeout_height <= ctx.height {
            return Err(EngineError::InvalidTimeout {
                timeout_height,
                current_height: ctx.height,
            });
        }
        RuleStore::get(kv, rule_id)?;

        let id = ActionStore::next_id(kv);
        let action = Action {
            id,
            rule_id,
            status: ActionStatus::Pending,
            votes: vec![],
            timeout_height,
            messages,
            creator,
            created_at_height: ctx.height,
            failure_reason: None,
        };
        ActionStore::set(kv, &action)?;
        info!(action_id = %id, rule_id = %rule_id, height = ctx.height, "action created");
        Ok(action)
    }

    /// Record a vote, then re-evaluate the rule against the updated tally.
    ///
    /// If the action's deadline has elapsed, the vote is not recorded: the
    /// status transitions to `Timeout` and is returned (lazy expiry is a
    /// status transition, not an error).
    pub fn vote(
        &self,
        kv: &mut dyn Kv,
        ctx: &mut EngineCtx<'_>,
        action_id: ActionId,
        participant: ParticipantId,
        kind: VoteKind,
    ) -> Result<ActionStatus, EngineError> {
        self.guard()?;
        let mut action = ActionStore::get(kv, action_id)?;

        if action.status == ActionStatus::Pending && action.timed_out_at(ctx.height) {
            return self.expire(kv, ctx.height, &mut action);
        }

        add_or_update_vote(&mut action, participant.clone(), kind, ctx.height)?;
        ActionStore::set(kv, &action)?;
        debug!(action_id = %action_id, participant = %participant, ?kind, "vote recorded");

        self.resolve(kv, ctx, &mut action)
    }

    /// Re-run expiry and evaluation against the current vote set without
    /// recording a new vote.
    ///
    /// Calling this on a terminal action is a no-op returning the current
    /// status; the path exists so a pending action can react to an updated
    /// rule without requiring a fresh vote.
    pub fn check(
        &self,
        kv: &mut dyn Kv,
        ctx: &mut EngineCtx<'_>,
        action_id: ActionId,
    ) -> Result<ActionStatus, EngineError> {
        self.guard()?;
        let mut action = ActionStore::get(kv, action_id)?;

        if action.status.is_terminal() {
            return Ok(action.status);
        }
        if action.timed_out_at(ctx.height) {
            return self.expire(kv, ctx.height, &mut action);
        }
        self.resolve(kv, ctx, &mut action)
    }

    /// Revoke a pending action. Only the creator may revoke; revocation is
    /// irreversible and executes nothing.
    pub fn revoke(
        &self,
        kv: &mut dyn Kv,
        ctx: &mut EngineCtx<'_>,
        action_id: ActionId,
        requester: ParticipantId,
    ) -> Result<ActionStatus, EngineError> {
        self.guard()?;
        let mut action = ActionStore::get(kv, action_id)?;

        if action.status == ActionStatus::Pending && action.timed_out_at(ctx.height) {
            return self.expire(kv, ctx.height, &mut action);
        }
        if action.status != ActionStatus::Pending {
            return Err(EngineError::NotPending {
                id: action_id,
                status: action.status,
            });
        }
        if requester != action.creator {
            return Err(EngineError::Unauthorized {
                id: action_id,
                requester,
            });
        }

        action.set_status(ActionStatus::Revoked)?;
        ActionStore::set(kv, &action)?;
        info!(action_id = %action_id, "action revoked");
        Ok(ActionStatus::Revoked)
    }

    /// Lazy timeout discovery: transition to `Timeout` and persist.
    fn expire(
        &self,
        kv: &mut dyn Kv,
        height: u64,
        action: &mut Action,
    ) -> Result<ActionStatus, EngineError> {
        action.set_status(ActionStatus::Timeout)?;
        ActionStore::set(kv, action)?;
        info!(action_id = %action.id, height, "action timed out");
        Ok(ActionStatus::Timeout)
    }

    /// Evaluate the action's rule as it exists *now* (rules are live
    /// policy) and act on a terminal verdict.
    fn resolve(
        &self,
        kv: &mut dyn Kv,
        ctx: &mut EngineCtx<'_>,
        action: &mut Action,
    ) -> Result<ActionStatus, EngineError> {
        let rule = RuleStore::get(kv, action.rule_id)?;
        match evaluate(&rule, &action.votes) {
            Verdict::Undecided => Ok(action.status),
            Verdict::Rejected => {
                action.set_status(ActionStatus::Rejected)?;
                ActionStore::set(kv, action)?;
                info!(action_id = %action.id, "action rejected by rule");
                Ok(ActionStatus::Rejected)
            }
            Verdict::Approved => {
                action.set_status(ActionStatus::Approved)?;
                self.execute(kv, ctx, action)?;
                ActionStore::set(kv, action)?;
                Ok(action.status)
            }
        }
    }

    /// Execute an approved action's messages atomically.
    ///
    /// Approval is a one-shot trigger: if dispatch fails, the action moves
    /// to `Rejected` with the failure recorded rather than staying pending,
    /// so a bad encapsulated operation cannot cause a silent retry loop.
    fn execute(
        &self,
        kv: &mut dyn Kv,
        ctx: &mut EngineCtx<'_>,
        action: &mut Action,
    ) -> Result<(), EngineError> {
        self.executing.set(Some(action.id));
        let result = execute_messages(kv, ctx.dispatcher, &action.messages);
        self.executing.set(None);

        match result {
            Ok(()) => {
                action.set_status(ActionStatus::Executed)?;
                info!(action_id = %action.id, "action executed");
            }
            Err(err) => {
                warn!(action_id = %action.id, error = %err, "action execution failed");
                action.failure_reason = Some(err.to_string());
                action.set_status(ActionStatus::Rejected)?;
            }
        }
        Ok(())
    }
}
