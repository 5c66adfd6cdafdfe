//! Drafts a complete quotation from the structured intake data.

use serde::{Deserialize, Serialize};

use quotecraft_core::quotation::QuotationRequest;

use crate::flows::FlowError;
use crate::llm::{invoke_structured, GenerationError, TextGenerator};
use crate::prompts;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotationOutput {
    pub quotation: String,
}

/// Generate a quotation body from a validated `QuotationRequest`.
///
/// The output covers introduction, service breakdown, deliverables, timeline,
/// pricing estimate, terms and conclusion, styled to the preferred tone and
/// built only from information present in the input.
pub async fn generate_quotation(
    generator: &dyn TextGenerator,
    input: &QuotationRequest,
) -> Result<QuotationOutput, FlowError> {
    input.validate()?;

    let prompt = prompts::generate_quotation_prompt(input)?;
    let output: QuotationOutput =
        invoke_structured(generator, prompts::GENERATE_QUOTATION, prompt).await?;

    if output.quotation.trim().is_empty() {
        return Err(GenerationError::InvalidPayload {
            template_id: prompts::GENERATE_QUOTATION,
            detail: "quotation text is empty".to_string(),
        }
        .into());
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use quotecraft_core::errors::ValidationError;
    use quotecraft_core::quotation::{QuotationRequest, Tone};

    use crate::flows::{generate_quotation, FlowError};
    use crate::testing::{CannedGenerator, FailingGenerator};

    fn request_fixture() -> QuotationRequest {
        QuotationRequest {
            client_name: "Jane Doe".to_string(),
            client_company_name: "Acme Inc.".to_string(),
            your_company_name: "Studio X".to_string(),
            project_description: "Redesign the marketing website".to_string(),
            services_required: "Web Design, SEO".to_string(),
            timeline: "4 weeks".to_string(),
            budget_range: "$5,000-$8,000".to_string(),
            special_requirements: Some(String::new()),
            preferred_tone: Tone::Friendly,
            add_ons: Some(String::new()),
        }
    }

    #[tokio::test]
    async fn returns_the_generated_quotation() {
        let generator = CannedGenerator::new(
            r#"{"quotation": "<h2>Hello Jane Doe</h2><h3>Pricing Estimate</h3><p>$5,000-$8,000</p>"}"#,
        );

        let output = generate_quotation(&generator, &request_fixture())
            .await
            .expect("generation succeeds");
        assert!(output.quotation.contains("Jane Doe"));
        assert!(output.quotation.contains("Pricing"));
    }

    #[tokio::test]
    async fn invalid_input_short_circuits_before_any_network_call() {
        let generator = CannedGenerator::new(r#"{"quotation": "unused"}"#);
        let mut request = request_fixture();
        request.client_name = "J".to_string();

        let error = generate_quotation(&generator, &request).await.expect_err("must reject");
        assert!(matches!(
            error,
            FlowError::Validation(ValidationError::TooShort { field: "clientName", min: 2 })
        ));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn empty_quotation_output_is_rejected() {
        let generator = CannedGenerator::new(r#"{"quotation": "  "}"#);
        let error = generate_quotation(&generator, &request_fixture())
            .await
            .expect_err("empty body is non-conforming");
        assert!(matches!(error, FlowError::Generation(_)));
    }

    #[tokio::test]
    async fn provider_failure_propagates_as_generation_error() {
        let generator = FailingGenerator::default();
        let error = generate_quotation(&generator, &request_fixture())
            .await
            .expect_err("provider down");
        assert!(matches!(error, FlowError::Generation(_)));
    }
}
