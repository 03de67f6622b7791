//! Normalization of raw model responses.

/// Marker that opens a bullet line in section notes.
pub const BULLET_MARKER: char = '-';

/// Drop blank-line noise from a section-extraction response.
///
/// A line survives if, once trimmed, it starts with a bullet marker or is
/// non-empty. Every non-blank line is therefore kept verbatim, bullet or not;
/// only empty and whitespace-only lines go. Survivors are re-joined with
/// `\n`.
pub fn filter_bullets(response: &str) -> String {
    response
        .split('\n')
        .filter(|line| {
            let trimmed = line.trim();
            trimmed.starts_with(BULLET_MARKER) || !trimmed.is_empty()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Remove leading and trailing newlines; interior blank lines are untouched.
pub fn trim_blank_edges(response: &str) -> &str {
    response.trim_start_matches('\n').trim_end_matches('\n')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_removes_blank_lines_between_bullets() {
        let raw = "- first\n\n- second\n   \n- third\n";
        assert_eq!(filter_bullets(raw), "- first\n- second\n- third");
    }

    #[test]
    fn filter_keeps_non_bullet_text() {
        let raw = "Here are the notes:\n\n- point\nTrailing remark";
        assert_eq!(
            filter_bullets(raw),
            "Here are the notes:\n- point\nTrailing remark"
        );
    }

    #[test]
    fn filter_preserves_indentation() {
        let raw = "- parent\n  - child\n";
        assert_eq!(filter_bullets(raw), "- parent\n  - child");
    }

    #[test]
    fn filter_is_idempotent() {
        let samples = [
            "",
            "\n\n",
            "- a\n\n\n- b",
            "intro\n - a\n\t\n-b\n",
            "  \n- only\n  ",
        ];
        for raw in samples {
            let once = filter_bullets(raw);
            assert_eq!(filter_bullets(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn filter_of_blank_response_is_empty() {
        assert_eq!(filter_bullets("\n \n\t\n"), "");
    }

    #[test]
    fn trim_removes_only_edge_newlines() {
        let raw = "\n\nKey Takeaways:\n- A\n\nAction Items:\n- B\n\n";
        assert_eq!(
            trim_blank_edges(raw),
            "Key Takeaways:\n- A\n\nAction Items:\n- B"
        );
    }

    #[test]
    fn trim_leaves_spaces_alone() {
        assert_eq!(trim_blank_edges("\n  text  \n"), "  text  ");
    }

    #[test]
    fn trim_is_idempotent_and_edge_free() {
        let samples = ["", "\n", "\n\n\n", "a", "\na\n", "\n\na\n\nb\n\n", " \n"];
        for raw in samples {
            let once = trim_blank_edges(raw);
            assert!(!once.starts_with('\n'));
            assert!(!once.ends_with('\n'));
            assert_eq!(trim_blank_edges(once), once);
        }
    }
}
