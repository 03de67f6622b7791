//! Overlapping token windows over a long sequence.
//!
//! The first window starts at offset 0 and takes up to `budget` tokens. Each
//! following window starts `budget - overlap` tokens after the previous one,
//! so consecutive windows share exactly `overlap` tokens. Iteration stops
//! after the window whose end reaches the end of the sequence; the final
//! window may be shorter than `budget`.
//!
//! ```text
//! len = 4500, budget = 3000, overlap = 50
//!
//! [0 ............................ 3000)
//!                            [2950 ............ 4500)
//! ```

use crate::context::tokenizer::Token;
use crate::error::{NotesError, Result};

/// Default number of tokens shared between consecutive windows.
pub const DEFAULT_OVERLAP: usize = 50;

/// A contiguous slice of the token sequence and where it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window<'a> {
    pub start: usize,
    pub tokens: &'a [Token],
}

impl Window<'_> {
    /// Exclusive end offset in the full sequence.
    pub fn end(&self) -> usize {
        self.start + self.tokens.len()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Lazy iterator over the windows of a token sequence.
///
/// Holds only a borrowed slice and the next offset, so cloning it restarts
/// iteration from wherever the clone was taken.
#[derive(Debug, Clone)]
pub struct Windows<'a> {
    tokens: &'a [Token],
    budget: usize,
    stride: usize,
    next_start: Option<usize>,
}

/// Split `tokens` into windows of at most `budget` tokens overlapping by
/// `overlap`.
///
/// Returns [`NotesError::InvalidWindowConfig`] when `overlap >= budget`,
/// since the window would never advance.
pub fn windows(tokens: &[Token], budget: usize, overlap: usize) -> Result<Windows<'_>> {
    if overlap >= budget {
        return Err(NotesError::InvalidWindowConfig { budget, overlap });
    }
    Ok(Windows {
        tokens,
        budget,
        stride: budget - overlap,
        next_start: if tokens.is_empty() { None } else { Some(0) },
    })
}

impl<'a> Iterator for Windows<'a> {
    type Item = Window<'a>;

    fn next(&mut self) -> Option<Window<'a>> {
        let start = self.next_start?;
        let end = (start + self.budget).min(self.tokens.len());
        self.next_start = if end == self.tokens.len() {
            None
        } else {
            Some(start + self.stride)
        };
        Some(Window {
            start,
            tokens: &self.tokens[start..end],
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.next_start {
            None => 0,
            Some(start) => {
                let rest = self.tokens.len() - start;
                if rest <= self.budget {
                    1
                } else {
                    1 + (rest - self.budget).div_ceil(self.stride)
                }
            }
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Windows<'_> {}

impl std::iter::FusedIterator for Windows<'_> {}
