use serde::{Deserialize, Serialize};

/// Separator between notes in the raw text form: one blank line.
pub const NOTE_SEPARATOR: &str = "\n\n";

/// A free-form, possibly multi-line note.
///
/// `id` and `modified` are carried through storage untouched; the text write
/// path leaves them at their zero values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub modified: i64,
}

impl Note {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }
}

/// The full set of notes.
///
/// A `NoteList` is never edited in place: every write replaces the stored
/// list with one built by [`NoteList::from_text`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteList {
    #[serde(default, deserialize_with = "crate::nullable::vec_or_null")]
    notes: Vec<Note>,
}

fn is_note_padding(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n')
}

impl NoteList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a note list from raw text, one note per blank-line separated
    /// segment.
    ///
    /// Segments are trimmed of spaces, tabs and newlines; segments left empty
    /// are dropped.
    pub fn from_text(text: &str) -> Self {
        let notes = text
            .split(NOTE_SEPARATOR)
            .map(|segment| segment.trim_matches(is_note_padding))
            .filter(|segment| !segment.is_empty())
            .map(Note::new)
            .collect();
        Self { notes }
    }

    /// Render the notes back into the raw text form accepted by
    /// [`from_text`](Self::from_text).
    pub fn to_text(&self) -> String {
        self.notes
            .iter()
            .map(|n| n.content.as_str())
            .collect::<Vec<_>>()
            .join(NOTE_SEPARATOR)
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Note> {
        self.notes.iter()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

impl<'a> IntoIterator for &'a NoteList {
    type Item = &'a Note;
    type IntoIter = std::slice::Iter<'a, Note>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
