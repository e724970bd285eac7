//! Storage for memo collections.
//!
//! Each collection is one serialized document under one fixed key in an
//! embedded key-value store. This crate provides:
//!
//! - [`KvStore`] -- the byte-oriented get/put seam, with an absent key
//!   reported as `Ok(None)` rather than an error
//! - [`RedbKvStore`] -- the persistent backend (redb, single file on disk)
//! - [`InMemoryKvStore`] -- `BTreeMap`-based store for tests and embedding
//! - [`Collection`] -- the JSON codec and store key of each collection type
//! - [`CollectionManager`] -- load-or-default, mutate, encode, put
//!
//! # Design Rules
//!
//! 1. A missing key is an empty collection, never an error.
//! 2. A payload that fails to decode is never repaired or overwritten.
//! 3. Nothing is committed unless the final `put` succeeds.
//! 4. Mutations of the same collection are serialized by the manager.

pub mod codec;
pub mod error;
pub mod manager;
pub mod memory;
pub mod persistent;
pub mod traits;

pub use codec::Collection;
pub use error::{StoreError, StoreResult};
pub use manager::CollectionManager;
pub use memory::InMemoryKvStore;
pub use persistent::RedbKvStore;
pub use traits::KvStore;
