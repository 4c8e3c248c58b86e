//! Execution coordinator: all-or-nothing message dispatch.

use actum_store::{Kv, Overlay};
use actum_types::ActionMessage;

use crate::dispatch::{DispatchError, Dispatcher};

/// Dispatch `messages` in order inside one atomic scope.
///
/// Every write goes through an overlay; the overlay commits only if all
/// messages succeed. On the first failure the overlay is dropped, so no
/// message effect is observable - never a partial application.
pub fn execute_messages(
    kv: &mut dyn Kv,
    dispatcher: &mut dyn Dispatcher,
    messages: &[ActionMessage],
) -> Result<(), DispatchError> {
    let mut overlay = Overlay::new(kv);
    for msg in messages {
        dispatcher.dispatch(&mut overlay, msg)?;
    }
    overlay.commit();
    Ok(())
}
