//! Actum Service - the operation surface of the approval engine
//!
//! Wraps the lifecycle engine in message request/response types the way an
//! RPC layer would present them. `approve_action` and `reject_action` are
//! thin wrappers over the single generic vote path; `check_action` is the
//! no-new-vote re-evaluation path.

#![deny(unsafe_code)]

pub mod error;
pub mod msg;
pub mod service;

pub use error::ServiceError;
pub use msg::{
    MsgActionStatusResponse, MsgNewAction, MsgNewActionResponse, MsgNewRule, MsgNewRuleResponse,
    MsgUpdateRule, MsgVoteForAction,
};
pub use service::ActService;
