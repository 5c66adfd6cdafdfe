//! Suggests add-on services relevant to the project description.

use serde::{Deserialize, Serialize};

use quotecraft_core::errors::PreconditionError;

use crate::flows::FlowError;
use crate::llm::{invoke_structured, TextGenerator};
use crate::prompts;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestAddOnsInput {
    pub project_description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestAddOnsOutput {
    pub add_on_suggestions: Vec<String>,
}

/// Suggest add-ons for the given project description.
///
/// An empty suggestion list is a valid outcome, not an error. A description
/// that is empty after trimming fails fast with a precondition error before
/// any network call is made.
pub async fn suggest_add_ons(
    generator: &dyn TextGenerator,
    input: &SuggestAddOnsInput,
) -> Result<SuggestAddOnsOutput, FlowError> {
    if input.project_description.trim().is_empty() {
        return Err(PreconditionError::MissingProjectDescription.into());
    }

    let prompt = prompts::suggest_add_ons_prompt(&input.project_description)?;
    let output = invoke_structured(generator, prompts::SUGGEST_ADD_ONS, prompt).await?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use quotecraft_core::errors::PreconditionError;

    use crate::flows::{suggest_add_ons, FlowError, SuggestAddOnsInput};
    use crate::testing::CannedGenerator;

    #[tokio::test]
    async fn returns_the_suggestion_list_in_order() {
        let generator = CannedGenerator::new(
            r#"{"addOnSuggestions": ["Ongoing Support", "SEO Audit", "Training"]}"#,
        );
        let input = SuggestAddOnsInput {
            project_description: "Redesign the marketing website".to_string(),
        };

        let output = suggest_add_ons(&generator, &input).await.expect("suggestions");
        assert_eq!(
            output.add_on_suggestions,
            vec!["Ongoing Support", "SEO Audit", "Training"]
        );
    }

    #[tokio::test]
    async fn empty_suggestion_list_is_a_valid_outcome() {
        let generator = CannedGenerator::new(r#"{"addOnSuggestions": []}"#);
        let input = SuggestAddOnsInput {
            project_description: "Redesign the marketing website".to_string(),
        };

        let output = suggest_add_ons(&generator, &input).await.expect("empty list is fine");
        assert!(output.add_on_suggestions.is_empty());
    }

    #[tokio::test]
    async fn blank_description_fails_fast_without_a_network_call() {
        let generator = CannedGenerator::new(r#"{"addOnSuggestions": ["unused"]}"#);
        let input = SuggestAddOnsInput { project_description: " \n\t ".to_string() };

        let error = suggest_add_ons(&generator, &input).await.expect_err("precondition");
        assert!(matches!(
            error,
            FlowError::Precondition(PreconditionError::MissingProjectDescription)
        ));
        assert_eq!(generator.calls(), 0);
    }
}
