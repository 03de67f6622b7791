//! Turn a transcript file into LLM-written notes.
//!
//! Reads the API key from the `OPENROUTER_KEY` environment variable.
//!
//! # Examples
//!
//! ```sh
//! # Bullet notes only, written to standup_output.txt
//! transnote standup.vtt
//!
//! # Substitute jargon from ./jargon.txt, let the model pick topics, summarize
//! transnote standup.vtt --jargon --topics auto --summary
//!
//! # Jargon from another file
//! transnote standup.vtt --jargon=team-terms.txt
//!
//! # Explicit topics and output path
//! transnote lecture.txt -o lecture-notes.txt --topics "Theory, Examples, Homework"
//!
//! # Ask for topics interactively
//! transnote lecture.txt --topics prompt
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use transnote::api::RetryConfig;
use transnote::context::{DEFAULT_CONTEXT_SIZE, DEFAULT_OVERLAP, Tokenizer};
use transnote::files::{self, DEFAULT_JARGON_FILE};
use transnote::pipeline::config::DEFAULT_SECTION_RESPONSE_TOKENS;
use transnote::pipeline::{NotesConfig, PROMPT_TOPICS, Pipeline, RunOptions, TopicMode};
use transnote::{DEFAULT_MODEL, NotesError, OpenRouterClient};

/// Turn a transcript into bullet notes, optionally grouped by topic and
/// summarized.
///
/// Reads the API key from the OPENROUTER_KEY environment variable.
#[derive(Parser)]
#[command(name = "transnote", version)]
struct Cli {
    /// Transcript file to read
    input: PathBuf,

    /// Output file (default: <input stem>_output.txt next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Jargon file of `term,replacement` lines. `--jargon` alone reads
    /// ./jargon.txt; give another file as `--jargon=PATH` or `-j=PATH`
    #[arg(
        short,
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = DEFAULT_JARGON_FILE
    )]
    jargon: Option<PathBuf>,

    /// Sort notes by topic: `auto`, `prompt` (ask interactively), or a comma-separated list
    #[arg(short, long)]
    topics: Option<String>,

    /// Add key takeaways and action items above the notes
    #[arg(short, long)]
    summary: bool,

    // ── Model ──────────────────────────────────────────────────
    /// Model to use for every call
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Context window of the model, in tokens
    #[arg(long, default_value_t = DEFAULT_CONTEXT_SIZE)]
    context_size: usize,

    /// Tokens shared between consecutive transcript windows
    #[arg(long, default_value_t = DEFAULT_OVERLAP)]
    overlap: usize,

    /// Response tokens reserved for each transcript window
    #[arg(long, default_value_t = DEFAULT_SECTION_RESPONSE_TOKENS)]
    max_tokens: usize,

    /// Retries for rate-limit and server errors (0 = fail on the first error)
    #[arg(long, default_value_t = 0)]
    retries: u32,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 120)]
    timeout: u64,
}

/// Ask on stderr for a comma-separated topic list.
fn prompt_for_topics() -> Result<String, NotesError> {
    let mut stderr = io::stderr();
    write!(stderr, "Topics (comma-separated, blank to let the model choose): ")
        .and_then(|_| stderr.flush())
        .map_err(|e| NotesError::io("<stderr>", e))?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| NotesError::io("<stdin>", e))?;
    let line = line.trim();
    Ok(if line.is_empty() {
        transnote::pipeline::AUTO_TOPICS.to_string()
    } else {
        line.to_string()
    })
}

fn resolve_topics(arg: Option<&str>) -> Result<TopicMode, NotesError> {
    match arg {
        Some(PROMPT_TOPICS) => Ok(TopicMode::from_arg(Some(&prompt_for_topics()?))),
        other => Ok(TopicMode::from_arg(other)),
    }
}

async fn run(cli: Cli) -> Result<(), NotesError> {
    let config = NotesConfig::default()
        .with_model(cli.model)
        .with_context_size(cli.context_size)
        .with_overlap(cli.overlap)
        .with_section_response_tokens(cli.max_tokens)
        .with_retry(RetryConfig::with_retries(cli.retries))
        .with_request_timeout(Duration::from_secs(cli.timeout));

    // Credential first: nothing else runs without it.
    let client = OpenRouterClient::from_env(config.request_timeout)?;
    let tokenizer = Tokenizer::new()?;

    let raw = files::read_input(&cli.input)?;
    let jargon = match &cli.jargon {
        Some(path) => files::load_jargon(path)?,
        None => None,
    };
    let topics = resolve_topics(cli.topics.as_deref())?;
    let output_path = cli
        .output
        .unwrap_or_else(|| files::default_output_path(&cli.input));

    info!(
        "Processing {} ({} bytes) with {}",
        cli.input.display(),
        raw.len(),
        config.model
    );

    let options = RunOptions {
        jargon,
        topics,
        summarize: cli.summary,
    };
    let output = Pipeline::new(&client, &tokenizer, config)
        .run(&raw, &options)
        .await?;

    files::write_output(&output_path, &output.document)?;
    eprintln!(
        "Wrote notes from {} section(s) to {} ({})",
        output.sections,
        output_path.display(),
        output.usage.summary()
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "transnote=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
