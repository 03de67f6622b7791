//! Convenience re-exports for common usage.
//!
//! ```ignore
//! use transnote::prelude::*;
//! ```

pub use crate::api::{ChatModel, Completion, CompletionFuture, CompletionRequest, RetryConfig};
pub use crate::context::Tokenizer;
pub use crate::error::{NotesError, Result};
pub use crate::pipeline::{NotesConfig, NotesOutput, Pipeline, RunOptions, TopicMode};
pub use crate::text::JargonMap;
pub use crate::{OpenRouterClient, UsageInfo};
