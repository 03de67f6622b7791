//! Stage sequencing and its configuration.
//!
//! - [`config`] — [`NotesConfig`] (model, context size, overlap, response
//!   caps, persona, prompts, retry) and per-run [`RunOptions`].
//! - [`prompt`] — [`StagePrompt`] templates and the default persona.
//! - [`orchestrator`] — [`Pipeline`], which runs clean → jargon → section
//!   extraction → topic sort → summary → assembly.

pub mod config;
pub mod orchestrator;
pub mod prompt;

pub use config::{AUTO_TOPICS, NotesConfig, PROMPT_TOPICS, RunOptions, TopicMode};
pub use orchestrator::{NOTES_SEPARATOR, NotesOutput, Pipeline, SectionNotes, assemble, prepare};
pub use prompt::{StagePrompt, StagePrompts};
