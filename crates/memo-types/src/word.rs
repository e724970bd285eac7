use serde::{Deserialize, Serialize};

/// A single saved word. Two words are the same word iff their names are equal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Word {
    #[serde(default)]
    pub name: String,
}

impl Word {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Insertion-ordered set of words, keyed on [`Word::name`].
///
/// [`add_if_absent`](Self::add_if_absent) never introduces a duplicate name,
/// so a list built only through it (or [`FromIterator`]) is unique by name.
/// Duplicates already present in decoded data are kept until
/// [`remove_matching`](Self::remove_matching) drops them. Iteration yields
/// words in the order they were first added.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordList {
    #[serde(default, deserialize_with = "crate::nullable::vec_or_null")]
    words: Vec<Word>,
}

impl WordList {
    /// Create an empty word list.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Word> {
        self.words.iter()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Returns `true` if a word with this name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.words.iter().any(|w| w.name == name)
    }

    /// Append `word` unless an entry with the same name already exists.
    ///
    /// Returns `true` if the word was appended. Existing entries keep their
    /// position.
    pub fn add_if_absent(&mut self, word: Word) -> bool {
        if self.contains(&word.name) {
            return false;
        }
        self.words.push(word);
        true
    }

    /// Remove every entry named `name`, keeping the order of the rest.
    ///
    /// Returns the number of entries removed.
    pub fn remove_matching(&mut self, name: &str) -> usize {
        let before = self.words.len();
        self.words.retain(|w| w.name != name);
        before - self.words.len()
    }
}

impl FromIterator<Word> for WordList {
    fn from_iter<I: IntoIterator<Item = Word>>(iter: I) -> Self {
        let mut list = Self::new();
        for word in iter {
            list.add_if_absent(word);
        }
        list
    }
}

impl<'a> IntoIterator for &'a WordList {
    type Item = &'a Word;
    type IntoIter = std::slice::Iter<'a, Word>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
