//! Drafts the short cover message that accompanies an emailed quotation.

use serde::{Deserialize, Serialize};

use quotecraft_core::errors::ValidationError;

use crate::flows::FlowError;
use crate::llm::{invoke_structured, GenerationError, TextGenerator};
use crate::prompts;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateEmailBodyInput {
    pub client_name: String,
    pub your_company_name: String,
    pub project_description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateEmailBodyOutput {
    pub email_body: String,
}

pub async fn generate_email_body(
    generator: &dyn TextGenerator,
    input: &GenerateEmailBodyInput,
) -> Result<GenerateEmailBodyOutput, FlowError> {
    if input.client_name.trim().is_empty() {
        return Err(ValidationError::Empty { field: "clientName" }.into());
    }
    if input.your_company_name.trim().is_empty() {
        return Err(ValidationError::Empty { field: "yourCompanyName" }.into());
    }

    let prompt = prompts::generate_email_body_prompt(
        &input.client_name,
        &input.your_company_name,
        &input.project_description,
    )?;
    let output: GenerateEmailBodyOutput =
        invoke_structured(generator, prompts::GENERATE_EMAIL_BODY, prompt).await?;

    if output.email_body.trim().is_empty() {
        return Err(GenerationError::InvalidPayload {
            template_id: prompts::GENERATE_EMAIL_BODY,
            detail: "email body is empty".to_string(),
        }
        .into());
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use quotecraft_core::errors::ValidationError;

    use crate::flows::{generate_email_body, FlowError, GenerateEmailBodyInput};
    use crate::testing::CannedGenerator;

    fn input_fixture() -> GenerateEmailBodyInput {
        GenerateEmailBodyInput {
            client_name: "Jane Doe".to_string(),
            your_company_name: "Studio X".to_string(),
            project_description: "Redesign the marketing website".to_string(),
        }
    }

    #[tokio::test]
    async fn returns_the_cover_message() {
        let generator = CannedGenerator::new(
            r#"{"emailBody": "Hi Jane Doe,\nPlease find the quotation from Studio X attached."}"#,
        );

        let output = generate_email_body(&generator, &input_fixture()).await.expect("cover body");
        assert!(output.email_body.contains("Jane Doe"));
        assert!(output.email_body.contains("Studio X"));
    }

    #[tokio::test]
    async fn missing_client_name_is_rejected_locally() {
        let generator = CannedGenerator::new(r#"{"emailBody": "unused"}"#);
        let mut input = input_fixture();
        input.client_name = "  ".to_string();

        let error = generate_email_body(&generator, &input).await.expect_err("no client name");
        assert!(matches!(
            error,
            FlowError::Validation(ValidationError::Empty { field: "clientName" })
        ));
        assert_eq!(generator.calls(), 0);
    }
}
