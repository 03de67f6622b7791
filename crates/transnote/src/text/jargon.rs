//! Jargon substitution: literal term replacement before any model call.
//!
//! A jargon file holds one `term,replacement` pair per line. Pairs are
//! applied in file order, each as a single left-to-right pass over the whole
//! text, so a term that appears inside its own replacement is not expanded
//! again.

use crate::error::{NotesError, Result};

/// Ordered term → replacement pairs, read-only once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JargonMap {
    entries: Vec<(String, String)>,
}

impl JargonMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse jargon file contents.
    ///
    /// Empty lines are skipped. Any other line must split on `,` into exactly
    /// two fields with a non-empty term, otherwise the whole file is rejected with
    /// [`NotesError::MalformedJargonFile`] (line numbers are 1-based).
    pub fn parse(contents: &str) -> Result<Self> {
        let mut map = Self::new();
        for (idx, line) in contents.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(',').collect();
            match fields.as_slice() {
                [term, replacement] if !term.is_empty() => map.insert(*term, *replacement),
                _ => {
                    return Err(NotesError::MalformedJargonFile {
                        line: idx + 1,
                        content: line.to_string(),
                    });
                }
            }
        }
        Ok(map)
    }

    /// Append a pair. Later pairs run after earlier ones.
    pub fn insert(&mut self, term: impl Into<String>, replacement: impl Into<String>) {
        self.entries.push((term.into(), replacement.into()));
    }

    pub fn with_entry(mut self, term: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.insert(term, replacement);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, r)| (t.as_str(), r.as_str()))
    }

    /// Replace every occurrence of each term, pair by pair in file order.
    pub fn apply(&self, text: &str) -> String {
        self.entries
            .iter()
            .fold(text.to_string(), |acc, (term, replacement)| {
                acc.replace(term.as_str(), replacement)
            })
    }
}
