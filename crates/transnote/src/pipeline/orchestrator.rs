//! The notes pipeline: clean → jargon → sections → topics → summary → assemble.
//!
//! Stages run strictly in order and every model call is awaited before the
//! next one starts. Section extraction must finish completely before topic
//! sorting, because the topic stage sizes its budget from the full notes.
//! The first error from any stage aborts the run.

use tracing::{debug, info, warn};

use crate::api::retry::retry_invocation;
use crate::api::{ChatModel, CompletionRequest, ModelPricing, UsageTracker, pricing_for_model};
use crate::context::{CHAT_FRAMING_TOKENS, MAX_EDGE_TOKENS, StageBudget, Tokenizer, windows};
use crate::error::Result;
use crate::pipeline::config::{NotesConfig, RunOptions, TopicMode};
use crate::pipeline::prompt::StagePrompt;
use crate::text::{JargonMap, clean_transcript, filter_bullets, trim_blank_edges};

/// Separator placed between the summary and the notes.
pub const NOTES_SEPARATOR: &str = "\n\nNotes:\n";

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct NotesOutput {
    /// The final document to write.
    pub document: String,
    /// Number of section windows sent to the model.
    pub sections: usize,
    pub usage: UsageTracker,
}

/// Notes accumulated by the section stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionNotes {
    /// Filtered response of each window, in source order.
    pub parts: Vec<String>,
}

impl SectionNotes {
    /// All parts joined with newlines.
    pub fn full_notes(&self) -> String {
        self.parts.join("\n")
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Runs the stages for one transcript.
///
/// Create one per run; it accumulates token usage across its calls.
///
/// ```ignore
/// let output = Pipeline::new(&client, &tokenizer, NotesConfig::default())
///     .run(&raw, &RunOptions { summarize: true, ..Default::default() })
///     .await?;
/// ```
pub struct Pipeline<'a> {
    model: &'a dyn ChatModel,
    tokenizer: &'a Tokenizer,
    config: NotesConfig,
    pricing: ModelPricing,
    usage: UsageTracker,
}

impl<'a> Pipeline<'a> {
    pub fn new(model: &'a dyn ChatModel, tokenizer: &'a Tokenizer, config: NotesConfig) -> Self {
        let pricing = pricing_for_model(&config.model);
        Self {
            model,
            tokenizer,
            config,
            pricing,
            usage: UsageTracker::new(),
        }
    }

    pub fn config(&self) -> &NotesConfig {
        &self.config
    }

    pub fn usage(&self) -> &UsageTracker {
        &self.usage
    }

    /// Run every stage over a raw transcript and assemble the document.
    pub async fn run(&mut self, raw: &str, options: &RunOptions) -> Result<NotesOutput> {
        let text = prepare(raw, options.jargon.as_ref());
        info!(
            "Cleaned transcript: {} chars -> {} chars",
            raw.len(),
            text.len()
        );

        let sections = self.extract_sections(&text).await?;
        let full_notes = sections.full_notes();

        let document = if full_notes.trim().is_empty() {
            if options.topics != TopicMode::Skip || options.summarize {
                warn!("No notes were produced; skipping topic sorting and summary");
            }
            full_notes
        } else {
            let sorted = self.sort_topics(&full_notes, &options.topics).await?;
            let summary = if options.summarize {
                Some(self.summarize(&sorted).await?)
            } else {
                None
            };
            assemble(summary.as_deref(), &sorted)
        };

        info!("Run complete: {}", self.usage.summary());
        Ok(NotesOutput {
            document,
            sections: sections.len(),
            usage: self.usage.clone(),
        })
    }

    /// Window the cleaned text and turn each window into bullet notes.
    pub async fn extract_sections(&mut self, text: &str) -> Result<SectionNotes> {
        let prompt = self.config.prompts.section.clone();
        let budget = self.stage_budget("section", &prompt);
        let response_tokens = self.config.section_response_tokens;
        // Aligning a window to character boundaries can add MAX_EDGE_TOKENS.
        let payload_budget = budget
            .clone()
            .with_overhead(budget.overhead() + MAX_EDGE_TOKENS)
            .payload_budget(response_tokens)?;

        let tokens = self.tokenizer.encode(text);
        let windows = windows(&tokens, payload_budget, self.config.overlap)?;
        let total = windows.len();
        info!(
            "Section extraction: {} tokens in {total} window(s) of <= {payload_budget} \
             (overlap {}, overhead {})",
            tokens.len(),
            self.config.overlap,
            budget.overhead(),
        );

        let mut notes = SectionNotes::default();
        for (idx, window) in windows.enumerate() {
            info!(
                "Section {}/{total}: tokens {}..{}",
                idx + 1,
                window.start,
                window.end()
            );
            let payload = self.tokenizer.decode_window(&tokens, window)?;
            if payload.is_empty() {
                debug!("Section {}: nothing left after boundary alignment", idx + 1);
                continue;
            }
            let response = self
                .complete(&budget, prompt.render(&payload), response_tokens)
                .await?;
            notes.parts.push(filter_bullets(&response));
        }
        Ok(notes)
    }

    /// Regroup the notes by topic in a single call.
    ///
    /// The whole of `notes` goes into one request; whatever the context has
    /// left becomes the response cap. Notes too long for that fail with
    /// [`NotesError::BudgetExhausted`](crate::NotesError::BudgetExhausted).
    pub async fn sort_topics(&mut self, notes: &str, topics: &TopicMode) -> Result<String> {
        let prompt = match topics {
            TopicMode::Skip => return Ok(notes.to_string()),
            TopicMode::Auto => self.config.prompts.topic_auto.clone(),
            TopicMode::Explicit(list) => self.config.prompts.topic_explicit.with_topics(list),
        };
        info!("Sorting notes by topic ({topics:?})");
        let response = self.single_call("topic-sort", &prompt, notes).await?;
        Ok(trim_blank_edges(&response).to_string())
    }

    /// Produce key takeaways and action items in a single call.
    pub async fn summarize(&mut self, notes: &str) -> Result<String> {
        let prompt = self.config.prompts.summary.clone();
        info!("Summarizing notes");
        let response = self.single_call("summary", &prompt, notes).await?;
        Ok(trim_blank_edges(&response).to_string())
    }

    async fn single_call(
        &mut self,
        stage: &'static str,
        prompt: &StagePrompt,
        payload: &str,
    ) -> Result<String> {
        let budget = self.stage_budget(stage, prompt);
        let payload_tokens = self.tokenizer.count(payload);
        let response_tokens = budget.response_budget(payload_tokens)?;
        debug!(
            "{stage}: payload {payload_tokens} tokens, overhead {}, response cap {response_tokens}",
            budget.overhead()
        );
        self.complete(&budget, prompt.render(payload), response_tokens)
            .await
    }

    /// Fixed overhead of a stage: persona, wrapper text, chat framing.
    ///
    /// Wrapper pieces are counted separately, which upper-bounds their cost
    /// once joined to a payload. `complete` re-checks the rendered request.
    fn stage_budget(&self, stage: &'static str, prompt: &StagePrompt) -> StageBudget {
        let wrapper: usize = prompt
            .fixed_parts()
            .iter()
            .map(|part| self.tokenizer.count(part))
            .sum();
        let overhead = self.tokenizer.count(&self.config.persona) + wrapper + CHAT_FRAMING_TOKENS;
        StageBudget::new(stage, self.config.context_size).with_overhead(overhead)
    }

    /// Check the rendered request against the context and invoke the model.
    async fn complete(
        &mut self,
        budget: &StageBudget,
        prompt: String,
        response_tokens: usize,
    ) -> Result<String> {
        let prompt_tokens =
            self.tokenizer.count(&self.config.persona) + self.tokenizer.count(&prompt);
        budget.ensure_fits(prompt_tokens, response_tokens)?;

        let request = CompletionRequest {
            model: self.config.model.clone(),
            system: self.config.persona.clone(),
            prompt,
            max_tokens: u32::try_from(response_tokens).unwrap_or(u32::MAX),
            temperature: self.config.temperature,
        };
        let model = self.model;
        let completion =
            retry_invocation(&self.config.retry, || model.invoke(request.clone())).await?;
        self.usage.record(completion.usage.as_ref(), &self.pricing);
        if completion.truncated {
            warn!(
                "{}: response hit the {response_tokens}-token cap and was cut off",
                budget.stage()
            );
        }
        debug!(
            "{}: {} prompt tokens -> {} chars of response",
            budget.stage(),
            prompt_tokens,
            completion.text.len()
        );
        Ok(completion.text)
    }
}

/// Clean the transcript and apply jargon substitution if a map is given.
pub fn prepare(raw: &str, jargon: Option<&JargonMap>) -> String {
    let cleaned = clean_transcript(raw);
    match jargon {
        Some(map) if !map.is_empty() => {
            debug!("Applying {} jargon substitution(s)", map.len());
            map.apply(&cleaned)
        }
        _ => cleaned,
    }
}

/// Final document: the summary, a separator, then the notes; or the notes
/// alone when no summary was produced.
pub fn assemble(summary: Option<&str>, notes: &str) -> String {
    match summary {
        Some(summary) => format!("{summary}{NOTES_SEPARATOR}{notes}"),
        None => notes.to_string(),
    }
}
