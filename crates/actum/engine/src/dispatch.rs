//! Dispatch of encapsulated action messages.
//!
//! The message set is a closed enum with an explicit dispatch table, so
//! execution stays deterministic and exhaustively checkable.

use std::collections::BTreeMap;

use actum_store::Kv;
use actum_types::ActionMessage;
use thiserror::Error;

/// Namespace for application state written by dispatched messages, kept
/// apart from the engine's own records.
const APP_PREFIX: &[u8] = b"app/";

fn app_key(key: &str) -> Vec<u8> {
    let mut k = APP_PREFIX.to_vec();
    k.extend_from_slice(key.as_bytes());
    k
}

/// A message handler failure. Contained by the execution coordinator and
/// recorded on the action; never surfaced to the voter as a retryable
/// error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("no handler registered for '{0}'")]
    UnknownHandler(String),

    #[error("handler '{handler}' failed: {reason}")]
    HandlerFailed { handler: String, reason: String },
}

/// Routes one encapsulated message to its effect.
///
/// Implementations receive the execution overlay, not the base store: a
/// failing message must leave no observable effect.
pub trait Dispatcher {
    fn dispatch(&mut self, kv: &mut dyn Kv, msg: &ActionMessage) -> Result<(), DispatchError>;
}

/// Handler invoked for [`ActionMessage::Invoke`] payloads.
pub type InvokeHandler = fn(&mut dyn Kv, &[u8]) -> Result<(), DispatchError>;

/// The default dispatch table: state writes plus a registry of named
/// application handlers.
#[derive(Default)]
pub struct StateDispatcher {
    handlers: BTreeMap<String, InvokeHandler>,
}

impl StateDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `Invoke` messages naming `handler`.
    pub fn register(&mut self, handler: impl Into<String>, f: InvokeHandler) {
        self.handlers.insert(handler.into(), f);
    }
}

impl Dispatcher for StateDispatcher {
    fn dispatch(&mut self, kv: &mut dyn Kv, msg: &ActionMessage) -> Result<(), DispatchError> {
        match msg {
            ActionMessage::Put { key, value } => {
                kv.set(&app_key(key), value);
                Ok(())
            }
            ActionMessage::Delete { key } => {
                kv.delete(&app_key(key));
                Ok(())
            }
            ActionMessage::Invoke { handler, payload } => {
                let f = self
                    .handlers
                    .get(handler.as_str())
                    .ok_or_else(|| DispatchError::UnknownHandler(handler.clone()))?;
                f(kv, payload)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actum_store::MemKv;

    #[test]
    fn put_and_delete_are_namespaced() {
        let mut kv = MemKv::new();
        let mut dispatcher = StateDispatcher::new();
        dispatcher
            .dispatch(
                &mut kv,
                &ActionMessage::Put {
                    key: "balance".into(),
                    value: vec![9],
                },
            )
            .unwrap();
        assert_eq!(kv.get(b"app/balance"), Some(vec![9]));
        assert_eq!(kv.get(b"balance"), None);

        dispatcher
            .dispatch(&mut kv, &ActionMessage::Delete { key: "balance".into() })
            .unwrap();
        assert_eq!(kv.get(b"app/balance"), None);
    }

    #[test]
    fn unknown_handler_is_an_error() {
        let mut kv = MemKv::new();
        let mut dispatcher = StateDispatcher::new();
        let err = dispatcher
            .dispatch(
                &mut kv,
                &ActionMessage::Invoke {
                    handler: "missing".into(),
                    payload: vec![],
                },
            )
            .unwrap_err();
        assert_eq!(err, DispatchError::UnknownHandler("missing".into()));
    }

    #[test]
    fn registered_handler_receives_payload() {
        fn echo(kv: &mut dyn Kv, payload: &[u8]) -> Result<(), DispatchError> {
            kv.set(b"app/echo", payload);
            Ok(())
        }

        let mut kv = MemKv::new();
        let mut dispatcher = StateDispatcher::new();
        dispatcher.register("echo", echo);
        dispatcher
            .dispatch(
                &mut kv,
                &ActionMessage::Invoke {
                    handler: "echo".into(),
                    payload: vec![1, 2, 3],
                },
            )
            .unwrap();
        assert_eq!(kv.get(b"app/echo"), Some(vec![1, 2, 3]));
    }
}
