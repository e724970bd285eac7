use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

use crate::codec::Collection;
use crate::error::StoreResult;
use crate::traits::KvStore;

/// Read-modify-write access to collections.
///
/// Every mutation runs the full cycle: get the stored document (absent means
/// `C::default()`), decode it, apply the mutation in memory, encode, put.
/// The result is only returned once the put has succeeded.
///
/// Mutations of one collection hold that collection's lock for the whole
/// cycle, so concurrent writers are serialized rather than racing to
/// last-write-wins. Reads never take the lock.
pub struct CollectionManager {
    store: Arc<dyn KvStore>,
    locks: KeyLocks,
}

impl CollectionManager {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            store,
            locks: KeyLocks::default(),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn KvStore> {
        &self.store
    }

    /// Load a collection, or its empty default if it was never written.
    pub fn load<C: Collection>(&self) -> StoreResult<C> {
        match self.store.get(C::STORE_KEY)? {
            Some(bytes) => {
                debug!(key = C::STORE_KEY, len = bytes.len(), "loaded collection");
                C::decode(&bytes).inspect_err(|e| {
                    warn!(key = C::STORE_KEY, error = %e, "stored collection is unreadable");
                })
            }
            None => {
                debug!(key = C::STORE_KEY, "collection absent; using empty default");
                Ok(C::default())
            }
        }
    }

    /// Apply `mutate` to the stored collection and persist the result.
    ///
    /// Returns the collection as written. On any error nothing is written.
    pub fn apply<C, F>(&self, mutate: F) -> StoreResult<C>
    where
        C: Collection,
        F: FnOnce(&mut C),
    {
        let lock = self.locks.get(C::STORE_KEY);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut collection = self.load::<C>()?;
        mutate(&mut collection);
        self.persist(&collection)?;
        Ok(collection)
    }

    /// Overwrite the stored collection with `collection` without reading it.
    pub fn replace<C: Collection>(&self, collection: C) -> StoreResult<C> {
        let lock = self.locks.get(C::STORE_KEY);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        self.persist(&collection)?;
        Ok(collection)
    }

    fn persist<C: Collection>(&self, collection: &C) -> StoreResult<()> {
        let bytes = collection.encode()?;
        self.store.put(C::STORE_KEY, &bytes)?;
        debug!(key = C::STORE_KEY, len = bytes.len(), "persisted collection");
        Ok(())
    }
}

impl std::fmt::Debug for CollectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionManager")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

/// One mutex per store key, created on first use.
#[derive(Default)]
struct KeyLocks {
    locks: Mutex<HashMap<&'static str, Arc<Mutex<()>>>>,
}

impl KeyLocks {
    fn get(&self, key: &'static str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(key).or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::memory::InMemoryKvStore;
    use memo_types::{NoteList, Word, WordList};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::thread;

    /// Wraps an in-memory store; `get`/`put` fail while the matching switch is
    /// set. Counts attempted puts.
    #[derive(Default)]
    struct FlakyStore {
        inner: InMemoryKvStore,
        fail_gets: AtomicBool,
        fail_puts: AtomicBool,
        puts: AtomicUsize,
    }

    impl KvStore for FlakyStore {
        fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
            if self.fail_gets.load(Ordering::SeqCst) {
                return Err(StoreError::read(key, "i/o error"));
            }
            self.inner.get(key)
        }

        fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
            self.puts.fetch_add(1, Ordering::SeqCst);
            if self.fail_puts.load(Ordering::SeqCst) {
                return Err(StoreError::write(key, "disk full"));
            }
            self.inner.put(key, value)
        }
    }

    fn manager() -> (Arc<InMemoryKvStore>, CollectionManager) {
        let store = Arc::new(InMemoryKvStore::new());
        let manager = CollectionManager::new(store.clone());
        (store, manager)
    }

    fn names(list: &WordList) -> Vec<&str> {
        list.iter().map(|w| w.name.as_str()).collect()
    }

    #[test]
    fn load_absent_is_empty() {
        let (store, manager) = manager();
        assert!(manager.load::<WordList>().unwrap().is_empty());
        assert!(manager.load::<NoteList>().unwrap().is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn apply_persists_under_fixed_key() {
        let (store, manager) = manager();
        let list = manager
            .apply::<WordList, _>(|l| {
                l.add_if_absent(Word::new("sun"));
            })
            .unwrap();
        assert_eq!(names(&list), vec!["sun"]);
        assert_eq!(store.keys(), vec!["word.word"]);
        assert_eq!(manager.load::<WordList>().unwrap(), list);
    }

    #[test]
    fn apply_on_absent_key_starts_empty() {
        let (store, manager) = manager();
        let list = manager
            .apply::<WordList, _>(|l| {
                l.remove_matching("ghost");
            })
            .unwrap();
        assert!(list.is_empty());
        assert_eq!(
            store.get("word.word").unwrap().as_deref(),
            Some(&br#"{"words":[]}"#[..])
        );
    }

    #[test]
    fn replace_overwrites_wholesale() {
        let (_store, manager) = manager();
        manager.replace(NoteList::from_text("one\n\ntwo")).unwrap();
        manager.replace(NoteList::from_text("three")).unwrap();
        let notes = manager.load::<NoteList>().unwrap();
        let contents: Vec<_> = notes.iter().map(|n| n.content.as_str()).collect();
        assert_eq!(contents, vec!["three"]);
    }

    #[test]
    fn replace_ignores_unreadable_previous_value() {
        let (store, manager) = manager();
        store.put("note.note", b"garbage").unwrap();
        manager.replace(NoteList::from_text("fresh")).unwrap();
        assert_eq!(manager.load::<NoteList>().unwrap().len(), 1);
    }

    #[test]
    fn corrupt_payload_aborts_and_is_left_untouched() {
        let (store, manager) = manager();
        store.put("word.word", b"{broken").unwrap();

        let err = manager
            .apply::<WordList, _>(|l| {
                l.add_if_absent(Word::new("sun"));
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::Decode { .. }));
        assert_eq!(store.get("word.word").unwrap().as_deref(), Some(&b"{broken"[..]));

        assert!(matches!(
            manager.load::<WordList>(),
            Err(StoreError::Decode { .. })
        ));
    }

    #[test]
    fn failed_put_commits_nothing() {
        let store = Arc::new(FlakyStore::default());
        let manager = CollectionManager::new(store.clone());
        manager
            .apply::<WordList, _>(|l| {
                l.add_if_absent(Word::new("sun"));
            })
            .unwrap();

        store.fail_puts.store(true, Ordering::SeqCst);
        let err = manager
            .apply::<WordList, _>(|l| {
                l.add_if_absent(Word::new("moon"));
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));

        store.fail_puts.store(false, Ordering::SeqCst);
        assert_eq!(names(&manager.load::<WordList>().unwrap()), vec!["sun"]);
    }

    #[test]
    fn failed_get_aborts_before_put() {
        let store = Arc::new(FlakyStore::default());
        let manager = CollectionManager::new(store.clone());
        store.fail_gets.store(true, Ordering::SeqCst);

        let err = manager
            .apply::<WordList, _>(|l| {
                l.add_if_absent(Word::new("sun"));
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }));
        assert!(matches!(manager.load::<WordList>(), Err(StoreError::Read { .. })));
        assert_eq!(store.puts.load(Ordering::SeqCst), 0);
        assert!(store.inner.is_empty());
    }

    #[test]
    fn concurrent_adds_are_not_lost() {
        let (_store, manager) = manager();
        let manager = Arc::new(manager);

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let manager = Arc::clone(&manager);
                thread::spawn(move || {
                    for i in 0..25 {
                        manager
                            .apply::<WordList, _>(|l| {
                                l.add_if_absent(Word::new(format!("w{t}-{i}")));
                            })
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(manager.load::<WordList>().unwrap().len(), 8 * 25);
    }

    #[test]
    fn collections_lock_independently() {
        let locks = KeyLocks::default();
        let words = locks.get("word.word");
        let notes = locks.get("note.note");
        let _held = words.lock().unwrap();
        assert!(notes.try_lock().is_ok());
        assert!(Arc::ptr_eq(&words, &locks.get("word.word")));
    }
}
