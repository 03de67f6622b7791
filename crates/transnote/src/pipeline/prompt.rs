//! Persona and per-stage prompt templates.
//!
//! A stage prompt is rendered as `instruction + intro + payload + outro`.
//! The instruction, intro, and outro are fixed for the whole stage, so their
//! token length is part of the stage's fixed overhead.

/// Placeholder in the explicit topic-sort instruction replaced by the
/// comma-separated topic list.
pub const TOPICS_PLACEHOLDER: &str = "{topics}";

/// System-role persona sent with every call.
pub fn default_persona() -> String {
    "You are a meticulous note-taker. You turn meeting and lecture transcripts \
     into clear, faithful notes and never add facts that are not in the source."
        .to_string()
}

/// Wrapper text for one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePrompt {
    pub instruction: String,
    /// Delimiter text placed before the payload.
    pub intro: String,
    /// Delimiter text placed after the payload.
    pub outro: String,
}

impl StagePrompt {
    pub fn new(
        instruction: impl Into<String>,
        intro: impl Into<String>,
        outro: impl Into<String>,
    ) -> Self {
        Self {
            instruction: instruction.into(),
            intro: intro.into(),
            outro: outro.into(),
        }
    }

    /// Wrap `payload` in this stage's instruction and delimiters.
    pub fn render(&self, payload: &str) -> String {
        let mut out = String::with_capacity(
            self.instruction.len() + self.intro.len() + payload.len() + self.outro.len(),
        );
        out.push_str(&self.instruction);
        out.push_str(&self.intro);
        out.push_str(payload);
        out.push_str(&self.outro);
        out
    }

    /// The text every rendered prompt carries regardless of payload.
    pub fn fixed_parts(&self) -> [&str; 3] {
        [&self.instruction, &self.intro, &self.outro]
    }

    /// Copy of this prompt with `{topics}` in the instruction filled in.
    pub fn with_topics(&self, topics: &[String]) -> Self {
        Self {
            instruction: self
                .instruction
                .replace(TOPICS_PLACEHOLDER, &topics.join(", ")),
            ..self.clone()
        }
    }
}

/// Prompts for every stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePrompts {
    /// Paraphrase one transcript window into bullet notes.
    pub section: StagePrompt,
    /// Group notes under topics the model picks.
    pub topic_auto: StagePrompt,
    /// Group notes under caller-supplied topics (`{topics}` placeholder).
    pub topic_explicit: StagePrompt,
    /// Key takeaways and action items.
    pub summary: StagePrompt,
}

const NOTES_INTRO: &str = "\n\nNotes:\n<<<\n";
const CLOSE: &str = "\n>>>";

impl Default for StagePrompts {
    fn default() -> Self {
        Self {
            section: StagePrompt::new(
                "Paraphrase the transcript section below into concise bullet notes. \
                 Start every note with \"- \" and put each on its own line. Keep names, \
                 numbers, dates, and decisions. The section may begin or end mid-sentence; \
                 note only what it actually says.",
                "\n\nTranscript section:\n<<<\n",
                CLOSE,
            ),
            topic_auto: StagePrompt::new(
                "Reorganize the notes below under short topic headings of your choosing. \
                 Place every note under exactly one heading, keep the bullet wording, merge \
                 exact duplicates, and do not drop anything.",
                NOTES_INTRO,
                CLOSE,
            ),
            topic_explicit: StagePrompt::new(
                "Reorganize the notes below under these topic headings: {topics}. \
                 Place every note under exactly one heading, keep the bullet wording, and put \
                 notes that fit none of them under \"Other\". Do not drop anything.",
                NOTES_INTRO,
                CLOSE,
            ),
            summary: StagePrompt::new(
                "Read the notes below and write two sections. First \"Key Takeaways:\" with \
                 the most important points as bullets. Then \"Action Items:\" with concrete \
                 follow-ups as bullets, naming the owner first when the notes say who.",
                NOTES_INTRO,
                CLOSE,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_wraps_payload_in_order() {
        let p = StagePrompt::new("Do it.", "\n<<<\n", "\n>>>");
        assert_eq!(p.render("body"), "Do it.\n<<<\nbody\n>>>");
        assert_eq!(p.fixed_parts(), ["Do it.", "\n<<<\n", "\n>>>"]);
    }

    #[test]
    fn explicit_topics_fill_placeholder() {
        let prompts = StagePrompts::default();
        let filled = prompts
            .topic_explicit
            .with_topics(&["Budget".to_string(), "Hiring".to_string()]);
        assert!(filled.instruction.contains("Budget, Hiring"));
        assert!(!filled.instruction.contains(TOPICS_PLACEHOLDER));
        assert_eq!(filled.intro, prompts.topic_explicit.intro);
    }

    #[test]
    fn default_section_prompt_asks_for_bullets() {
        let prompts = StagePrompts::default();
        assert!(prompts.section.instruction.contains("\"- \""));
        assert!(!default_persona().is_empty());
    }
}
