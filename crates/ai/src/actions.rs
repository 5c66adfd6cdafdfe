//! Action wrappers over the AI flows.
//!
//! Each wrapper exposes one flow across the process boundary with a uniform
//! tagged result: the caller sees either the full output or a human-readable
//! failure message, never a raised fault and never a partial result. The
//! underlying error is logged here and goes no further.

use serde::de::DeserializeOwned;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::error;

use quotecraft_core::quotation::QuotationRequest;

use crate::flows::{
    adjust_tone, format_quotation_for_pdf, generate_quotation, suggest_add_ons, AdjustToneInput,
    AdjustToneOutput, FormatQuotationInput, FormatQuotationOutput, QuotationOutput,
    SuggestAddOnsInput, SuggestAddOnsOutput,
};
use crate::llm::TextGenerator;

/// Tagged outcome of one action.
///
/// Serializes to `{"success": true, "data": …}` or
/// `{"success": false, "error": …}` so the wire shape stays a plain
/// discriminated object while Rust callers get an exhaustive sum type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionResult<T> {
    Success(T),
    Failure(String),
}

impl<T> ActionResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Success(data) => Some(data),
            Self::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure(message) => Some(message),
        }
    }
}

impl<T: Serialize> Serialize for ActionResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success(data) => {
                let mut state = serializer.serialize_struct("ActionResult", 2)?;
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
                state.end()
            }
            Self::Failure(message) => {
                let mut state = serializer.serialize_struct("ActionResult", 2)?;
                state.serialize_field("success", &false)?;
                state.serialize_field("error", message)?;
                state.end()
            }
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for ActionResult<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(bound(deserialize = "T: DeserializeOwned"))]
        struct Wire<T> {
            success: bool,
            #[serde(default)]
            data: Option<T>,
            #[serde(default)]
            error: Option<String>,
        }

        let wire = Wire::<T>::deserialize(deserializer)?;
        if wire.success {
            let data = wire
                .data
                .ok_or_else(|| serde::de::Error::missing_field("data"))?;
            Ok(Self::Success(data))
        } else {
            Ok(Self::Failure(wire.error.unwrap_or_default()))
        }
    }
}

pub async fn generate_quotation_action(
    generator: &dyn TextGenerator,
    input: &QuotationRequest,
) -> ActionResult<QuotationOutput> {
    match generate_quotation(generator, input).await {
        Ok(output) => ActionResult::Success(output),
        Err(fault) => {
            error!(
                event_name = "ai.generate_quotation.failed",
                error = %fault,
                "quotation generation failed"
            );
            ActionResult::Failure("Failed to generate quotation.".to_string())
        }
    }
}

pub async fn adjust_tone_action(
    generator: &dyn TextGenerator,
    input: &AdjustToneInput,
) -> ActionResult<AdjustToneOutput> {
    match adjust_tone(generator, input).await {
        Ok(output) => ActionResult::Success(output),
        Err(fault) => {
            error!(
                event_name = "ai.adjust_tone.failed",
                error = %fault,
                "tone adjustment failed"
            );
            ActionResult::Failure("Failed to adjust tone.".to_string())
        }
    }
}

pub async fn suggest_add_ons_action(
    generator: &dyn TextGenerator,
    input: &SuggestAddOnsInput,
) -> ActionResult<SuggestAddOnsOutput> {
    match suggest_add_ons(generator, input).await {
        Ok(output) => ActionResult::Success(output),
        Err(fault) => {
            error!(
                event_name = "ai.suggest_add_ons.failed",
                error = %fault,
                "add-on suggestion failed"
            );
            ActionResult::Failure("Failed to suggest add-ons.".to_string())
        }
    }
}

pub async fn format_quotation_for_pdf_action(
    generator: &dyn TextGenerator,
    input: &FormatQuotationInput,
) -> ActionResult<FormatQuotationOutput> {
    match format_quotation_for_pdf(generator, input).await {
        Ok(output) => ActionResult::Success(output),
        Err(fault) => {
            error!(
                event_name = "ai.format_quotation_pdf.failed",
                error = %fault,
                "quotation PDF formatting failed"
            );
            ActionResult::Failure("Failed to format quotation for PDF.".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use quotecraft_core::quotation::{QuotationRequest, Tone};

    use crate::actions::{
        adjust_tone_action, generate_quotation_action, suggest_add_ons_action, ActionResult,
    };
    use crate::flows::QuotationOutput;
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
            special_requirements: None,
            preferred_tone: Tone::Friendly,
            add_ons: None,
        }
    }

    #[tokio::test]
    async fn success_serializes_to_the_tagged_wire_shape() {
        let generator = CannedGenerator::new(r#"{"quotation": "<p>Hello Jane Doe</p>"}"#);
        let result = generate_quotation_action(&generator, &request_fixture()).await;

        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["quotation"], "<p>Hello Jane Doe</p>");
        assert!(json.get("error").is_none());
    }

    #[tokio::test]
    async fn failure_serializes_with_a_fixed_message() {
        let generator = FailingGenerator::default();
        let result = generate_quotation_action(&generator, &request_fixture()).await;

        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Failed to generate quotation.");
        assert!(json.get("data").is_none());
    }

    #[tokio::test]
    async fn tone_failure_never_propagates_the_fault() {
        let generator = FailingGenerator::default();
        let result = adjust_tone_action(
            &generator,
            &crate::flows::AdjustToneInput {
                quotation: "<p>body</p>".to_string(),
                tone: Tone::Formal,
            },
        )
        .await;
        assert_eq!(result.error(), Some("Failed to adjust tone."));
    }

    #[tokio::test]
    async fn precondition_failure_is_reported_through_the_same_shape() {
        let generator = CannedGenerator::new(r#"{"addOnSuggestions": []}"#);
        let result = suggest_add_ons_action(
            &generator,
            &crate::flows::SuggestAddOnsInput { project_description: String::new() },
        )
        .await;
        assert!(!result.is_success());
        assert_eq!(generator.calls(), 0);
    }

    #[test]
    fn wire_shape_round_trips_through_deserialization() {
        let success: ActionResult<QuotationOutput> =
            serde_json::from_str(r#"{"success": true, "data": {"quotation": "<p>q</p>"}}"#)
                .expect("success shape");
        assert_eq!(success.into_data().map(|data| data.quotation), Some("<p>q</p>".to_string()));

        let failure: ActionResult<QuotationOutput> =
            serde_json::from_str(r#"{"success": false, "error": "Failed to generate quotation."}"#)
                .expect("failure shape");
        assert_eq!(failure.error(), Some("Failed to generate quotation."));
    }
}
