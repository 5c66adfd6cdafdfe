//! The text-generation seam.
//!
//! Every AI operation goes through the `TextGenerator` trait: one prompt in,
//! one raw completion out, a single attempt, no retries. `invoke_structured`
//! layers the structured-output contract on top: the completion must carry a
//! JSON object that deserializes into the operation's declared output type.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// One outbound prompt, tagged with the operation template that produced it.
#[derive(Clone, Debug)]
pub struct GenerationRequest {
    pub template_id: &'static str,
    pub prompt: String,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("text-generation request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("text-generation provider returned status {status}: {message}")]
    Provider { status: u16, message: String },
    #[error("text-generation response carried no content")]
    MissingContent,
    #[error("prompt template `{template_id}` failed to render: {detail}")]
    Template { template_id: &'static str, detail: String },
    #[error("output of `{template_id}` did not match its declared schema: {detail}")]
    InvalidPayload { template_id: &'static str, detail: String },
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError>;
}

/// Send one prompt and validate the completion against the output type `O`.
pub async fn invoke_structured<O: DeserializeOwned>(
    generator: &dyn TextGenerator,
    template_id: &'static str,
    prompt: String,
) -> Result<O, GenerationError> {
    let raw = generator.generate(GenerationRequest { template_id, prompt }).await?;
    if raw.trim().is_empty() {
        return Err(GenerationError::MissingContent);
    }

    let payload = extract_json_payload(&raw);
    serde_json::from_str(payload)
        .map_err(|err| GenerationError::InvalidPayload { template_id, detail: err.to_string() })
}

/// Locate the JSON object inside a completion.
///
/// Models frequently wrap structured output in a Markdown code fence or
/// prefix it with a sentence of prose; both are tolerated, but nothing is
/// repaired beyond slicing to the outermost braces.
fn extract_json_payload(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        text = rest.strip_suffix("```").unwrap_or(rest).trim();
    }

    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}
