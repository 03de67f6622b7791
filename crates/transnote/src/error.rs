//! Error taxonomy for a notes run.
//!
//! Every variant is fatal: the pipeline aborts on the first error and no
//! output file is written. Configuration errors surface before any model
//! call, resource errors carry the underlying I/O cause, and invocation
//! errors carry whatever status and message the service reported.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, NotesError>;

#[derive(Error, Debug)]
pub enum NotesError {
    /// The tokenizer could not be loaded, or a token sequence did not decode
    /// to valid text.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Fixed overhead plus reserved tokens leave no room for content.
    #[error(
        "token budget exhausted in {stage} stage: context size {context_size} \
         leaves no room after {reserved} reserved + {overhead} overhead tokens"
    )]
    BudgetExhausted {
        stage: &'static str,
        context_size: usize,
        reserved: usize,
        overhead: usize,
    },

    /// The window overlap would keep the window from advancing.
    #[error("invalid window configuration: overlap {overlap} must be smaller than budget {budget}")]
    InvalidWindowConfig { budget: usize, overlap: usize },

    /// The language-model service reported a failure or was unreachable.
    #[error("{}", invocation_message(.status, .message))]
    Invocation {
        status: Option<u16>,
        message: String,
    },

    /// The service answered but returned no text.
    #[error("model returned an empty response")]
    EmptyResponse,

    #[error("malformed jargon file at line {line}: expected `term,replacement`, got {content:?}")]
    MalformedJargonFile { line: usize, content: String },

    #[error("{0} environment variable is not set")]
    MissingCredential(&'static str),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl NotesError {
    /// Build an [`NotesError::Invocation`] from a transport-level failure
    /// (no HTTP status available).
    pub fn transport(message: impl Into<String>) -> Self {
        NotesError::Invocation {
            status: None,
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        NotesError::Io {
            path: path.into(),
            source,
        }
    }
}

fn invocation_message(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("model invocation failed (HTTP {code}): {message}"),
        None => format!("model invocation failed: {message}"),
    }
}
