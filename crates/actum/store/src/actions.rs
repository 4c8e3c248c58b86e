//! Typed store for action records.

use actum_types::{Action, ActionId};

use crate::kv::Kv;
use crate::{decode, encode, next_seq, QueryWindow, StoreError, StoreResult};

const ACTION_PREFIX: &[u8] = b"actions/";
const ACTION_SEQ: &[u8] = b"seq/actions";

fn action_key(id: ActionId) -> Vec<u8> {
    let mut key = ACTION_PREFIX.to_vec();
    key.extend_from_slice(&id.0.to_be_bytes());
    key
}

/// Action persistence over a [`Kv`].
pub struct ActionStore;

impl ActionStore {
    /// Assign the next monotonic action id.
    pub fn next_id(kv: &mut dyn Kv) -> ActionId {
        ActionId(next_seq(kv, ACTION_SEQ))
    }

    pub fn get(kv: &dyn Kv, id: ActionId) -> StoreResult<Action> {
        let bytes = kv
            .get(&action_key(id))
            .ok_or(StoreError::ActionNotFound(id))?;
        decode(&bytes)
    }

    /// Write the record back under its own id.
    pub fn set(kv: &mut dyn Kv, action: &Action) -> StoreResult<()> {
        kv.set(&action_key(action.id), &encode(action)?);
        Ok(())
    }

    /// Actions in id order, paged.
    pub fn list(kv: &dyn Kv, window: QueryWindow) -> StoreResult<Vec<Action>> {
        kv.iter_prefix(ACTION_PREFIX)
            .into_iter()
            .skip(window.offset)
            .take(window.limit)
            .map(|(_, v)| decode(&v))
            .collect()
    }
}
