//! Domain types for memo.
//!
//! memo keeps exactly two collections, each persisted as a single document:
//!
//! - [`WordList`] -- an insertion-ordered set of [`Word`]s, unique by name
//! - [`NoteList`] -- a list of [`Note`]s rebuilt wholesale from raw text
//!
//! The types here are pure values. Loading and persisting them is the job of
//! `memo-store`.

pub mod note;
pub mod word;

mod nullable;

pub use note::{Note, NoteList, NOTE_SEPARATOR};
pub use word::{Word, WordList};
