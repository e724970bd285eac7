use std::path::PathBuf;

/// Errors from store and collection operations.
///
/// An absent key is not an error; see [`KvStore::get`](crate::KvStore::get).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing database could not be opened or created.
    #[error("failed to open store at {}: {reason}", path.display())]
    Open { path: PathBuf, reason: String },

    /// Reading a key failed for a reason other than the key being absent.
    #[error("read of {key} failed: {reason}")]
    Read { key: String, reason: String },

    /// Writing a key failed; the previous value is still in place.
    #[error("write of {key} failed: {reason}")]
    Write { key: String, reason: String },

    /// Stored bytes do not parse as the expected collection.
    #[error("failed to decode {key} payload ({payload}): {reason}")]
    Decode {
        key: String,
        payload: String,
        reason: String,
    },

    /// A collection could not be serialized.
    #[error("failed to encode {key}: {reason}")]
    Encode { key: String, reason: String },

    /// I/O error from the filesystem around the store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub(crate) fn read(key: &str, reason: impl ToString) -> Self {
        Self::Read {
            key: key.to_owned(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write(key: &str, reason: impl ToString) -> Self {
        Self::Write {
            key: key.to_owned(),
            reason: reason.to_string(),
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
