//! Transcript cleanup: remove caption timing, markup, and layout whitespace.
//!
//! Caption exports (WebVTT, SRT-style) interleave the spoken text with cue
//! timing lines and voice/styling tags. None of that is useful to the model
//! and all of it costs tokens, so it is stripped before windowing.

use std::sync::LazyLock;

use regex::Regex;

/// A cue timing line such as `00:00:01.000 --> 00:00:02.000 align:start`.
static TIMESTAMP_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:\d+:)?\d{2}:\d{2}[.,]\d{3}\s+-->\s+(?:\d+:)?\d{2}:\d{2}[.,]\d{3}")
        .expect("timestamp pattern is valid")
});

/// Inline markup such as `<v Alice>`, `</v>`, `<c.yellow>`, `<00:00:03.120>`.
static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^<>]*>").expect("tag pattern is valid"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

fn is_noise_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty()
        || TIMESTAMP_LINE.is_match(line)
        || trimmed == "WEBVTT"
        || trimmed.starts_with("WEBVTT ")
}

/// Clean a raw transcript into a single line of prose.
///
/// Drops timestamp-range lines, blank lines, and a `WEBVTT` header, strips
/// inline markup tags, then collapses every whitespace run (newlines
/// included) to one space.
///
/// ```
/// let raw = "00:00:01.000 --> 00:00:02.000\nHello <v Alice>world</v>\n\n";
/// assert_eq!(transnote::text::clean_transcript(raw), "Hello world");
/// ```
pub fn clean_transcript(raw: &str) -> String {
    let kept: Vec<&str> = raw.lines().filter(|line| !is_noise_line(line)).collect();
    let joined = kept.join("\n");
    let untagged = MARKUP_TAG.replace_all(&joined, "");
    WHITESPACE_RUN
        .replace_all(&untagged, " ")
        .trim()
        .to_string()
}
