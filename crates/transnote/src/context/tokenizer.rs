//! Tokenizer adapter: text to token ids and back with one fixed encoding.
//!
//! Wraps the `cl100k_base` BPE (the encoding used by the gpt-3.5/gpt-4
//! family) so every budget in a run is measured with the same vocabulary.
//! The BPE tables are expensive to build; construct one [`Tokenizer`] per run
//! and share it by reference.

use tiktoken_rs::CoreBPE;
use tracing::trace;

use crate::context::window::Window;
use crate::error::{NotesError, Result};

/// A single token id.
pub type Token = u32;

/// Furthest a window edge moves to reach a character boundary. A UTF-8
/// scalar spans at most four bytes, so at most three of its byte tokens can
/// lie past a cut.
pub const MAX_EDGE_TOKENS: usize = 3;

pub struct Tokenizer {
    bpe: CoreBPE,
}

impl std::fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokenizer")
            .field("encoding", &"cl100k_base")
            .finish()
    }
}

impl Tokenizer {
    /// Load the `cl100k_base` encoding.
    pub fn new() -> Result<Self> {
        let bpe = tiktoken_rs::cl100k_base()
            .map_err(|e| NotesError::Encoding(format!("failed to load cl100k_base: {e}")))?;
        Ok(Self { bpe })
    }

    /// Encode text as ordinary text. Special-token markers such as
    /// `<|endoftext|>` are tokenized literally rather than rejected.
    pub fn encode(&self, text: &str) -> Vec<Token> {
        self.bpe.encode_ordinary(text)
    }

    /// Number of tokens `text` encodes to.
    pub fn count(&self, text: &str) -> usize {
        self.encode(text).len()
    }

    /// Decode a token sequence. Fails if an id is outside the vocabulary or
    /// the bytes are not valid UTF-8 (e.g. the slice cuts a character).
    pub fn decode(&self, tokens: &[Token]) -> Result<String> {
        self.bpe
            .decode(tokens.to_vec())
            .map_err(|e| NotesError::Encoding(format!("failed to decode {} tokens: {e}", tokens.len())))
    }

    /// Decode one window of `tokens`, aligned to character boundaries.
    ///
    /// A window edge can land inside a multi-byte character. Both edges move
    /// forward to the next boundary: the start drops the tail of a character
    /// the previous window finished, and the end takes the rest of a
    /// character it started. Consecutive windows therefore agree on every
    /// seam and no character is lost, whatever the overlap. The decoded
    /// window may be up to [`MAX_EDGE_TOKENS`] tokens longer than `window`.
    pub fn decode_window(&self, tokens: &[Token], window: Window<'_>) -> Result<String> {
        let start = self.boundary_at_or_after(tokens, window.start)?;
        let end = self.boundary_at_or_after(tokens, window.end())?;
        if start >= end {
            return Ok(String::new());
        }
        if (start, end) != (window.start, window.end()) {
            trace!(
                "window {}..{} aligned to {start}..{end}",
                window.start,
                window.end()
            );
        }
        self.decode(&tokens[start..end])
    }

    /// First offset at or after `pos` where a character starts.
    fn boundary_at_or_after(&self, tokens: &[Token], pos: usize) -> Result<usize> {
        let last = (pos + MAX_EDGE_TOKENS).min(tokens.len());
        (pos..=last)
            .find(|&p| self.is_boundary(tokens, p))
            .ok_or_else(|| {
                NotesError::Encoding(format!(
                    "no character boundary within {MAX_EDGE_TOKENS} tokens of offset {pos}"
                ))
            })
    }

    /// A decodable run starting at `pos` means `pos` is not inside a
    /// character, since valid UTF-8 never starts with a continuation byte.
    fn is_boundary(&self, tokens: &[Token], pos: usize) -> bool {
        if pos == 0 || pos >= tokens.len() {
            return true;
        }
        let last = (pos + MAX_EDGE_TOKENS + 1).min(tokens.len());
        (pos + 1..=last).any(|end| self.decode(&tokens[pos..end]).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::window::windows;

    fn tokenizer() -> Tokenizer {
        Tokenizer::new().unwrap()
    }

    #[test]
    fn round_trips_plain_text() {
        let tok = tokenizer();
        let text = "We track KPI weekly.\n- bullet one\n- bullet two";
        let tokens = tok.encode(text);
        assert!(!tokens.is_empty());
        assert_eq!(tok.decode(&tokens).unwrap(), text);
    }

    #[test]
    fn round_trips_multibyte_text() {
        let tok = tokenizer();
        let text = "Café meeting — 東京 notes 🎉";
        assert_eq!(tok.decode(&tok.encode(text)).unwrap(), text);
    }

    #[test]
    fn special_markers_encode_as_ordinary_text() {
        let tok = tokenizer();
        let text = "before <|endoftext|> after";
        assert_eq!(tok.decode(&tok.encode(text)).unwrap(), text);
    }

    #[test]
    fn empty_text_has_no_tokens() {
        let tok = tokenizer();
        assert!(tok.encode("").is_empty());
        assert_eq!(tok.count(""), 0);
        assert_eq!(tok.decode(&[]).unwrap(), "");
    }

    #[test]
    fn count_matches_encode_len() {
        let tok = tokenizer();
        let text = "The quick brown fox jumps over the lazy dog.";
        assert_eq!(tok.count(text), tok.encode(text).len());
    }

    const GLYPHS: &str = "𓀀𓀁𓀂𓀃𓀄𓀅𓀆𓀇𓀈𓀉 end";

    fn decoded_windows(tok: &Tokenizer, tokens: &[Token], budget: usize, overlap: usize) -> Vec<String> {
        windows(tokens, budget, overlap)
            .unwrap()
            .map(|w| tok.decode_window(tokens, w).unwrap())
            .collect()
    }

    #[test]
    fn glyph_windows_split_characters() {
        // Hieroglyphs fall back to byte-level tokens, so some cuts land
        // mid-character and a strict decode of the slice fails.
        let tok = tokenizer();
        let tokens = tok.encode(GLYPHS);
        assert!((1..tokens.len()).any(|i| tok.decode(&tokens[i..]).is_err()));
    }

    #[test]
    fn zero_overlap_windows_rebuild_the_source() {
        let tok = tokenizer();
        let tokens = tok.encode(GLYPHS);
        for budget in 1..=12 {
            let joined = decoded_windows(&tok, &tokens, budget, 0).concat();
            assert_eq!(joined, GLYPHS, "budget={budget}");
        }
    }

    #[test]
    fn overlapping_windows_keep_every_character() {
        let tok = tokenizer();
        let tokens = tok.encode(GLYPHS);
        for budget in 2..=12 {
            for overlap in 1..budget {
                let parts = decoded_windows(&tok, &tokens, budget, overlap);
                assert!(GLYPHS.starts_with(parts[0].as_str()));
                assert!(GLYPHS.ends_with(parts.last().unwrap().as_str()));
                for ch in GLYPHS.chars() {
                    assert!(
                        parts.iter().any(|p| p.contains(ch)),
                        "{ch} lost at budget={budget} overlap={overlap}"
                    );
                }
            }
        }
    }

    #[test]
    fn aligned_window_grows_by_at_most_the_edge_allowance() {
        let tok = tokenizer();
        let tokens = tok.encode(GLYPHS);
        for w in windows(&tokens, 5, 0).unwrap() {
            let text = tok.decode_window(&tokens, w).unwrap();
            assert!(tok.count(&text) <= w.len() + MAX_EDGE_TOKENS);
        }
    }

    #[test]
    fn plain_text_windows_decode_unchanged() {
        let tok = tokenizer();
        let tokens = tok.encode("The quick brown fox jumps over the lazy dog.");
        for w in windows(&tokens, 4, 1).unwrap() {
            assert_eq!(tok.decode_window(&tokens, w).unwrap(), tok.decode(w.tokens).unwrap());
        }
    }
}
