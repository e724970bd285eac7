use crate::error::StoreResult;

/// Byte-oriented key-value store.
///
/// All implementations must satisfy these invariants:
/// - `get` on a key that was never written returns `Ok(None)`.
/// - A single `put` is atomic: readers see the old value or the new one.
/// - All I/O errors are propagated, never silently ignored.
/// - The store never interprets values.
pub trait KvStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    /// Returns `Err` on I/O failure or corruption of the backing store.
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()>;

    /// Check whether a value exists under `key`.
    fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl std::fmt::Debug for dyn KvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("KvStore { .. }")
    }
}
