//! Re-styles an existing quotation to a requested tone.

use serde::{Deserialize, Serialize};

use quotecraft_core::errors::ValidationError;
use quotecraft_core::quotation::Tone;

use crate::flows::FlowError;
use crate::llm::{invoke_structured, GenerationError, TextGenerator};
use crate::prompts;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustToneInput {
    pub quotation: String,
    pub tone: Tone,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustToneOutput {
    pub adjusted_quotation: String,
}

/// Rewrite the quotation in the requested tone.
///
/// The informational content must survive; the document is replaced
/// wholesale by the caller on success, so an empty or missing body from the
/// provider is rejected here rather than clobbering the live document.
pub async fn adjust_tone(
    generator: &dyn TextGenerator,
    input: &AdjustToneInput,
) -> Result<AdjustToneOutput, FlowError> {
    if input.quotation.trim().is_empty() {
        return Err(ValidationError::Empty { field: "quotation" }.into());
    }

    let prompt = prompts::adjust_tone_prompt(&input.quotation, input.tone)?;
    let output: AdjustToneOutput =
        invoke_structured(generator, prompts::ADJUST_TONE, prompt).await?;

    if output.adjusted_quotation.trim().is_empty() {
        return Err(GenerationError::InvalidPayload {
            template_id: prompts::ADJUST_TONE,
            detail: "adjusted quotation is empty".to_string(),
        }
        .into());
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use quotecraft_core::errors::ValidationError;
    use quotecraft_core::quotation::Tone;

    use crate::flows::{adjust_tone, AdjustToneInput, FlowError};
    use crate::testing::CannedGenerator;

    #[tokio::test]
    async fn returns_the_adjusted_quotation() {
        let generator = CannedGenerator::new(
            r#"{"adjustedQuotation": "<h2>Dear Ms. Doe</h2><h3>Pricing Estimate</h3>"}"#,
        );
        let input = AdjustToneInput {
            quotation: "<h2>Hey Jane!</h2><h3>Pricing Estimate</h3>".to_string(),
            tone: Tone::Formal,
        };

        let output = adjust_tone(&generator, &input).await.expect("adjustment succeeds");
        assert!(output.adjusted_quotation.contains("Pricing Estimate"));
        assert_ne!(output.adjusted_quotation, input.quotation);
    }

    #[tokio::test]
    async fn empty_quotation_is_rejected_without_a_network_call() {
        let generator = CannedGenerator::new(r#"{"adjustedQuotation": "unused"}"#);
        let input = AdjustToneInput { quotation: "   ".to_string(), tone: Tone::Friendly };

        let error = adjust_tone(&generator, &input).await.expect_err("nothing to adjust");
        assert!(matches!(
            error,
            FlowError::Validation(ValidationError::Empty { field: "quotation" })
        ));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn empty_adjusted_output_is_non_conforming() {
        let generator = CannedGenerator::new(r#"{"adjustedQuotation": ""}"#);
        let input = AdjustToneInput { quotation: "<p>body</p>".to_string(), tone: Tone::Creative };

        let error = adjust_tone(&generator, &input).await.expect_err("empty output");
        assert!(matches!(error, FlowError::Generation(_)));
    }
}
