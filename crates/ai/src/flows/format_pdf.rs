//! Restructures a quotation body for pagination.

use serde::{Deserialize, Serialize};

use quotecraft_core::errors::ValidationError;

use crate::flows::FlowError;
use crate::llm::{invoke_structured, GenerationError, TextGenerator};
use crate::prompts;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatQuotationInput {
    pub quotation_html: String,
    pub client_name: String,
    pub company_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatQuotationOutput {
    pub formatted_html: String,
}

/// Reformat the raw quotation body into explicit headings, lists and
/// emphasis, ready for the deterministic pagination step.
///
/// The result never carries page-frame markup: a model that wraps its output
/// in a document skeleton has that frame stripped rather than reaching the
/// exporter, which supplies its own.
pub async fn format_quotation_for_pdf(
    generator: &dyn TextGenerator,
    input: &FormatQuotationInput,
) -> Result<FormatQuotationOutput, FlowError> {
    if input.quotation_html.trim().is_empty() {
        return Err(ValidationError::Empty { field: "quotationHtml" }.into());
    }

    let prompt =
        prompts::format_pdf_prompt(&input.quotation_html, &input.client_name, &input.company_name)?;
    let output: FormatQuotationOutput =
        invoke_structured(generator, prompts::FORMAT_PDF, prompt).await?;

    let formatted_html = strip_document_frame(&output.formatted_html);
    if formatted_html.trim().is_empty() {
        return Err(GenerationError::InvalidPayload {
            template_id: prompts::FORMAT_PDF,
            detail: "formatted html is empty".to_string(),
        }
        .into());
    }

    Ok(FormatQuotationOutput { formatted_html })
}

/// Remove an `<html>`/`<head>`/`<body>` skeleton, keeping the body content.
fn strip_document_frame(html: &str) -> String {
    let trimmed = html.trim();
    if !trimmed.to_ascii_lowercase().contains("<html") {
        return trimmed.to_string();
    }

    let lower = trimmed.to_ascii_lowercase();
    let content = match (lower.find("<body"), lower.rfind("</body>")) {
        (Some(open), Some(close)) if open < close => {
            // Skip past the opening tag's closing bracket.
            match trimmed[open..close].find('>') {
                Some(end_of_tag) => &trimmed[open + end_of_tag + 1..close],
                None => trimmed,
            }
        }
        _ => trimmed,
    };

    content.trim().to_string()
}
