//! Generation capability: the external service that turns a field description and a
//! candidate record into candidate blurb texts.
//!
//! `BlurbGenerator` is the seam. The coordinator only sees `Vec<String>` or a
//! `GenerationError`, and `LlmBlurbGenerator` is the production backend.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::generation::context::CandidateContext;
use crate::generation::prompts::{BLURB_PROMPT_TEMPLATE, BLURB_SYSTEM};
use crate::llm_client::prompts::GROUNDING_INSTRUCTION;
use crate::llm_client::{LlmClient, LlmError};
use crate::templates::SectionDescriptor;

/// Why the generation capability produced no candidates.
///
/// Permanent errors (missing credentials, rejected requests) need a configuration
/// change before a retry can help. Transient errors (network, timeout, rate limit,
/// malformed output) may succeed if the caller simply tries again.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("{0}")]
    Transient(String),

    #[error("{0}")]
    Permanent(String),
}

impl GenerationError {
    pub fn is_transient(&self) -> bool {
        matches!(self, GenerationError::Transient(_))
    }
}

impl From<LlmError> for GenerationError {
    fn from(e: LlmError) -> Self {
        match &e {
            LlmError::MissingApiKey => GenerationError::Permanent(e.to_string()),
            LlmError::Api { status, .. } if *status != 429 && *status < 500 => {
                GenerationError::Permanent(e.to_string())
            }
            LlmError::Api { .. } | LlmError::Http(_) => GenerationError::Transient(e.to_string()),
            LlmError::Parse(_) | LlmError::EmptyContent => {
                GenerationError::Transient(format!("Malformed response: {e}"))
            }
        }
    }
}

/// Everything the capability needs to produce candidates for one field.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub template_name: String,
    pub field: SectionDescriptor,
    pub count: u32,
    pub context: CandidateContext,
}

#[async_trait]
pub trait BlurbGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>, GenerationError>;
}

#[derive(Debug, Deserialize)]
struct SuggestionsPayload {
    suggestions: Vec<String>,
}

/// Generates blurbs through the shared `LlmClient`.
#[derive(Clone)]
pub struct LlmBlurbGenerator {
    llm: LlmClient,
}

impl LlmBlurbGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl BlurbGenerator for LlmBlurbGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>, GenerationError> {
        let prompt = build_blurb_prompt(request);
        debug!(
            "Requesting {} blurbs for '{}' in template '{}' ({} prompt chars)",
            request.count,
            request.field.key,
            request.template_name,
            prompt.len()
        );
        let payload: SuggestionsPayload = self.llm.call_json(&prompt, BLURB_SYSTEM).await?;
        Ok(payload.suggestions)
    }
}

/// Fills the blurb prompt template from the field descriptor and candidate record.
pub fn build_blurb_prompt(request: &GenerationRequest) -> String {
    let field = &request.field;
    let context = &request.context;

    let field_label = if field.label.trim().is_empty() {
        field.key.as_str()
    } else {
        field.label.as_str()
    };

    let mut field_guidance = String::new();
    if let Some(prompt_context) = field.prompt_context.as_deref() {
        field_guidance.push_str(&format!("Context: {prompt_context}\n"));
    }
    if let Some(max_chars) = field.max_chars {
        field_guidance.push_str(&format!("Max length per blurb: {max_chars} characters\n"));
    }

    let candidate = format!(
        "Name: {}\nBio: {}",
        context.profile.full_name(),
        context.profile.bio.as_deref().unwrap_or("")
    );

    let experiences = bullet_list(context.experiences.iter().map(|e| {
        let mut line = format!("- {} at {}", e.title, e.organization);
        if let Some(dates) = date_range(e.start_date.as_deref(), e.end_date.as_deref()) {
            line.push_str(&format!(" ({dates})"));
        }
        if let Some(description) = e.description.as_deref().filter(|d| !d.trim().is_empty()) {
            line.push_str(&format!(": {description}"));
        }
        line
    }));

    let projects = bullet_list(context.projects.iter().map(|p| {
        let mut line = format!("- {}", p.title);
        if let Some(description) = p.description.as_deref().filter(|d| !d.trim().is_empty()) {
            line.push_str(&format!(": {description}"));
        }
        if let Some(keywords) = p.keywords.as_deref().filter(|k| !k.trim().is_empty()) {
            line.push_str(&format!(" [Keywords: {keywords}]"));
        }
        line
    }));

    let mut job_focus = String::new();
    if let Some(focus) = context.job_focus.as_ref() {
        if !focus.keywords.is_empty() {
            job_focus.push_str(&format!(
                "\n## Target Job Keywords\n{}\n",
                focus.keywords.join(", ")
            ));
        }
        if !focus.focus_areas.is_empty() {
            job_focus.push_str("\n## Focus Areas\n");
            for area in &focus.focus_areas {
                job_focus.push_str(&format!("- {area}\n"));
            }
        }
    }

    BLURB_PROMPT_TEMPLATE
        .replace("{count}", &request.count.to_string())
        .replace("{field_label}", field_label)
        .replace("{field_key}", &field.key)
        .replace("{field_guidance}", field_guidance.trim_end())
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
        .replace("{candidate}", &candidate)
        .replace("{experiences}", &experiences)
        .replace("{projects}", &projects)
        .replace("{job_focus}", &job_focus)
}

fn bullet_list(lines: impl Iterator<Item = String>) -> String {
    let lines: Vec<String> = lines.collect();
    if lines.is_empty() {
        "(none)".to_string()
    } else {
        lines.join("\n")
    }
}

fn date_range(start: Option<&str>, end: Option<&str>) -> Option<String> {
    match (start.filter(|s| !s.is_empty()), end.filter(|s| !s.is_empty())) {
        (Some(s), Some(e)) => Some(format!("{s} - {e}")),
        (Some(s), None) => Some(format!("{s} - present")),
        (None, Some(e)) => Some(format!("until {e}")),
        (None, None) => None,
    }
}
