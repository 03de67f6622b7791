//! Run configuration with sensible defaults.
//!
//! [`NotesConfig`] replaces any process-wide settings: the model, sampling
//! temperature, persona, per-stage prompts, window overlap, and response
//! caps are all fields, set once and handed to the
//! [`Pipeline`](super::Pipeline).

use std::time::Duration;

use crate::api::RetryConfig;
use crate::context::{DEFAULT_CONTEXT_SIZE, DEFAULT_OVERLAP};
use crate::pipeline::prompt::{StagePrompts, default_persona};
use crate::text::JargonMap;
use crate::{DEFAULT_MODEL, DEFAULT_REQUEST_TIMEOUT};

/// Default response cap for each section-extraction call.
pub const DEFAULT_SECTION_RESPONSE_TOKENS: usize = 1000;

/// Topic argument value that lets the model choose topics.
pub const AUTO_TOPICS: &str = "auto";

/// Topic argument value that asks the user for topics interactively.
pub const PROMPT_TOPICS: &str = "prompt";

#[derive(Debug, Clone)]
pub struct NotesConfig {
    /// Model identifier. Default: `"openai/gpt-3.5-turbo"`.
    pub model: String,
    /// Context window of `model`, in tokens. Default: `4000`.
    pub context_size: usize,
    /// Tokens shared by consecutive section windows. Default: `50`.
    pub overlap: usize,
    /// Response tokens reserved per section call. Default: `1000`.
    pub section_response_tokens: usize,
    /// Sampling temperature. Default: `0.0` (deterministic).
    pub temperature: f32,
    /// System-role persona sent with every call.
    pub persona: String,
    pub prompts: StagePrompts,
    /// Retry policy. Default: no retries (fail fast).
    pub retry: RetryConfig,
    /// Per-request HTTP timeout. Default: 120 s.
    pub request_timeout: Duration,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            context_size: DEFAULT_CONTEXT_SIZE,
            overlap: DEFAULT_OVERLAP,
            section_response_tokens: DEFAULT_SECTION_RESPONSE_TOKENS,
            temperature: 0.0,
            persona: default_persona(),
            prompts: StagePrompts::default(),
            retry: RetryConfig::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl NotesConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_context_size(mut self, tokens: usize) -> Self {
        self.context_size = tokens;
        self
    }

    pub fn with_overlap(mut self, tokens: usize) -> Self {
        self.overlap = tokens;
        self
    }

    pub fn with_section_response_tokens(mut self, tokens: usize) -> Self {
        self.section_response_tokens = tokens;
        self
    }

    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        self
    }

    pub fn with_prompts(mut self, prompts: StagePrompts) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// How the topic-sort stage runs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TopicMode {
    /// Pass the notes through unchanged.
    #[default]
    Skip,
    /// Let the model choose the groupings.
    Auto,
    /// Group under these topics.
    Explicit(Vec<String>),
}

impl TopicMode {
    /// Interpret a topic argument: absent or blank skips sorting, `auto`
    /// lets the model choose, anything else is a comma-separated list.
    ///
    /// The interactive `prompt` value is resolved by the caller before this
    /// is reached; here it would be treated as a one-topic list.
    pub fn from_arg(arg: Option<&str>) -> Self {
        let Some(arg) = arg.map(str::trim).filter(|a| !a.is_empty()) else {
            return TopicMode::Skip;
        };
        if arg == AUTO_TOPICS {
            return TopicMode::Auto;
        }
        let topics: Vec<String> = arg
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        if topics.is_empty() {
            TopicMode::Skip
        } else {
            TopicMode::Explicit(topics)
        }
    }
}

/// Per-run choices that are not model configuration.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Jargon to substitute before any model call.
    pub jargon: Option<JargonMap>,
    pub topics: TopicMode,
    /// Produce the key-takeaways / action-items summary.
    pub summarize: bool,
}
