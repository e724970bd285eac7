use memo_types::{NoteList, WordList};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{StoreError, StoreResult};

/// Longest payload excerpt carried in a decode error.
const PAYLOAD_EXCERPT_LEN: usize = 256;

/// A collection persisted as one JSON document under a fixed key.
///
/// `Default` is the empty collection that an absent key stands for.
pub trait Collection: Serialize + DeserializeOwned + Default + Send + 'static {
    /// The store key holding this collection.
    const STORE_KEY: &'static str;

    /// Serialize to the stored byte form.
    fn encode(&self) -> StoreResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| StoreError::Encode {
            key: Self::STORE_KEY.to_owned(),
            reason: e.to_string(),
        })
    }

    /// Parse the stored byte form.
    fn decode(bytes: &[u8]) -> StoreResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| StoreError::Decode {
            key: Self::STORE_KEY.to_owned(),
            payload: excerpt(bytes),
            reason: e.to_string(),
        })
    }
}

impl Collection for WordList {
    const STORE_KEY: &'static str = "word.word";
}

impl Collection for NoteList {
    const STORE_KEY: &'static str = "note.note";
}

fn excerpt(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    match text.char_indices().nth(PAYLOAD_EXCERPT_LEN) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.into_owned(),
    }
}
