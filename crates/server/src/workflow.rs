//! Async driver for the quotation workflow.
//!
//! The pure transition table lives in `quotecraft-core`; this controller owns
//! the session context, applies transitions, and runs the resulting effects:
//! AI actions, document export, email dispatch. One operation is in flight at
//! a time; every failure is surfaced as a transient error while the session's
//! document and form input stay intact.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use quotecraft_ai::actions::{
    adjust_tone_action, format_quotation_for_pdf_action, generate_quotation_action,
    suggest_add_ons_action, ActionResult,
};
use quotecraft_ai::flows::{AdjustToneInput, FormatQuotationInput, SuggestAddOnsInput};
use quotecraft_ai::TextGenerator;
use quotecraft_core::errors::{PreconditionError, ValidationError};
use quotecraft_core::quotation::{QuotationRequest, Tone};
use quotecraft_core::session::SessionSlot;
use quotecraft_core::workflow::{
    WorkflowAction, WorkflowContext, WorkflowEngine, WorkflowEvent, WorkflowState,
    WorkflowTransitionError,
};

use crate::email::{dispatch_quotation_email, MailTransport, QuotationMetadata};
use crate::export::{quotation_filename, DocumentExporter, ExportMetadata, ExportResult};

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
    #[error(transparent)]
    Transition(#[from] WorkflowTransitionError),
    #[error("{0}")]
    Operation(String),
}

pub struct WorkflowController {
    engine: WorkflowEngine,
    state: WorkflowState,
    session: SessionSlot,
    generator: Arc<dyn TextGenerator>,
    exporter: Arc<DocumentExporter>,
    mailer: Arc<dyn MailTransport>,
}

impl WorkflowController {
    /// Enter the workflow: constructs the session context and starts at Idle.
    pub fn enter(
        generator: Arc<dyn TextGenerator>,
        exporter: Arc<DocumentExporter>,
        mailer: Arc<dyn MailTransport>,
    ) -> Self {
        let engine = WorkflowEngine::new();
        let state = engine.initial_state();
        let mut session = SessionSlot::new();
        session.enter();

        Self { engine, state, session, generator, exporter, mailer }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn document(&self) -> Result<&str, PreconditionError> {
        Ok(&self.session.get()?.generated_quote)
    }

    pub fn last_error(&self) -> Result<Option<&str>, PreconditionError> {
        Ok(self.session.get()?.error.as_deref())
    }

    /// Replace the document with a user edit. Last write wins.
    pub fn edit_document(&mut self, content: String) -> Result<(), PreconditionError> {
        self.session.get_mut()?.replace_document(content);
        Ok(())
    }

    /// Tear down the session context at workflow exit.
    pub fn exit(&mut self) {
        self.session.exit();
    }

    fn context(&self, recipient: Option<&str>) -> Result<WorkflowContext, PreconditionError> {
        let session = self.session.get()?;
        Ok(WorkflowContext {
            has_form_data: session.form_data.is_some(),
            has_document: session.has_document(),
            has_project_description: session
                .form_data
                .as_ref()
                .map(|form| !form.project_description.trim().is_empty())
                .unwrap_or(false),
            has_recipient: recipient.map(|value| !value.trim().is_empty()).unwrap_or(false),
        })
    }

    fn apply(
        &mut self,
        event: WorkflowEvent,
        context: &WorkflowContext,
        correlation_id: &str,
    ) -> Result<Vec<WorkflowAction>, WorkflowTransitionError> {
        let outcome = self.engine.apply(&self.state, &event, context)?;
        info!(
            event_name = "workflow.transition_applied",
            correlation_id = correlation_id,
            from = ?outcome.from,
            to = ?outcome.to,
            "workflow transition applied"
        );
        self.state = outcome.to.clone();
        Ok(outcome.actions)
    }

    /// Entering the result view without a document redirects back to intake.
    ///
    /// Returns true when the guard fired.
    pub fn enter_result_view(&mut self) -> Result<bool, WorkflowError> {
        let context = self.context(None)?;
        let actions =
            self.apply(WorkflowEvent::ResultViewEntered, &context, "result-view")?;
        Ok(actions.contains(&WorkflowAction::RedirectToIntake))
    }

    /// Submit the intake form: validate, generate, and land on the result view.
    ///
    /// On failure the form data is retained for resubmission.
    pub async fn submit(&mut self, request: QuotationRequest) -> Result<(), WorkflowError> {
        let correlation_id = Uuid::new_v4().to_string();
        request.validate()?;

        let context = self.context(None)?;
        self.apply(WorkflowEvent::Submit, &context, &correlation_id)?;

        {
            let session = self.session.get_mut()?;
            session.form_data = Some(request.clone());
            session.is_loading = true;
            session.clear_error();
        }

        let result = generate_quotation_action(self.generator.as_ref(), &request).await;
        self.session.get_mut()?.is_loading = false;

        match result {
            ActionResult::Success(output) => {
                let context = self.context(None)?;
                self.apply(WorkflowEvent::GenerationSucceeded, &context, &correlation_id)?;
                self.session.get_mut()?.replace_document(output.quotation);
                Ok(())
            }
            ActionResult::Failure(message) => {
                let context = self.context(None)?;
                self.apply(WorkflowEvent::GenerationFailed, &context, &correlation_id)?;
                self.session.get_mut()?.surface_error(message.clone());
                Err(WorkflowError::Operation(message))
            }
        }
    }

    /// Re-style the current document; replaces it wholesale on success.
    pub async fn adjust_tone(&mut self, tone: Tone) -> Result<(), WorkflowError> {
        let correlation_id = Uuid::new_v4().to_string();
        let context = self.context(None)?;
        self.apply(WorkflowEvent::AdjustTone(tone), &context, &correlation_id)?;

        let input = AdjustToneInput {
            quotation: self.session.get()?.generated_quote.clone(),
            tone,
        };
        self.session.get_mut()?.is_loading = true;
        let result = adjust_tone_action(self.generator.as_ref(), &input).await;
        self.session.get_mut()?.is_loading = false;

        self.complete_sub_operation(result.error().map(str::to_string), &correlation_id)?;
        if let ActionResult::Success(output) = result {
            self.session.get_mut()?.replace_document(output.adjusted_quotation);
            Ok(())
        } else {
            Err(WorkflowError::Operation(
                self.session.get()?.error.clone().unwrap_or_default(),
            ))
        }
    }

    /// Suggest add-ons for display; suggestions are never merged into the
    /// document automatically.
    pub async fn suggest_add_ons(&mut self) -> Result<Vec<String>, WorkflowError> {
        let correlation_id = Uuid::new_v4().to_string();
        let context = self.context(None)?;
        self.apply(WorkflowEvent::SuggestAddOns, &context, &correlation_id)?;

        let project_description = self
            .session
            .get()?
            .form_data
            .as_ref()
            .map(|form| form.project_description.clone())
            .unwrap_or_default();

        self.session.get_mut()?.is_loading = true;
        let result = suggest_add_ons_action(
            self.generator.as_ref(),
            &SuggestAddOnsInput { project_description },
        )
        .await;
        self.session.get_mut()?.is_loading = false;

        self.complete_sub_operation(result.error().map(str::to_string), &correlation_id)?;
        match result {
            ActionResult::Success(output) => Ok(output.add_on_suggestions),
            ActionResult::Failure(message) => Err(WorkflowError::Operation(message)),
        }
    }

    /// Export the current document: AI restyle, then deterministic framing
    /// and pagination. No partial file is produced on failure.
    pub async fn export(&mut self) -> Result<(ExportResult, String), WorkflowError> {
        let correlation_id = Uuid::new_v4().to_string();
        let context = self.context(None)?;
        self.apply(WorkflowEvent::Export, &context, &correlation_id)?;

        self.session.get_mut()?.is_loading = true;
        let produced = self.produce_document().await;
        self.session.get_mut()?.is_loading = false;

        self.complete_sub_operation(produced.as_ref().err().cloned(), &correlation_id)?;
        match produced {
            Ok(result) => {
                let filename = self.download_filename()?;
                Ok((result, filename))
            }
            Err(message) => Err(WorkflowError::Operation(message)),
        }
    }

    /// Export internally, then dispatch the document to the recipient.
    pub async fn send_email(&mut self, recipient: &str) -> Result<(), WorkflowError> {
        let correlation_id = Uuid::new_v4().to_string();
        let context = self.context(Some(recipient))?;
        self.apply(WorkflowEvent::SendEmail, &context, &correlation_id)?;

        self.session.get_mut()?.is_loading = true;
        let sent = self.produce_and_dispatch(recipient).await;
        self.session.get_mut()?.is_loading = false;

        self.complete_sub_operation(sent.as_ref().err().cloned(), &correlation_id)?;
        sent.map_err(WorkflowError::Operation)
    }

    pub fn download_filename(&self) -> Result<String, PreconditionError> {
        let session = self.session.get()?;
        let form = session.form_data.as_ref().ok_or(PreconditionError::MissingFormData)?;
        Ok(quotation_filename(&form.client_company_name))
    }

    async fn produce_and_dispatch(&self, recipient: &str) -> Result<(), String> {
        let document = self.produce_document().await?;

        let form = {
            let session = self.session.get().map_err(|e| e.user_message().to_string())?;
            session.form_data.clone().ok_or_else(|| {
                PreconditionError::MissingFormData.user_message().to_string()
            })?
        };

        let metadata = QuotationMetadata {
            client_name: form.client_name.clone(),
            your_company_name: form.your_company_name.clone(),
            client_company_name: form.client_company_name.clone(),
            project_description: form.project_description.clone(),
        };

        dispatch_quotation_email(
            self.generator.as_ref(),
            self.mailer.as_ref(),
            recipient,
            &metadata,
            document.into_bytes(),
        )
        .await
        .map_err(|fault| format!("Failed to send email. {fault}"))
    }

    /// Phase one (AI restyle) and phase two (deterministic frame + paginate).
    async fn produce_document(&self) -> Result<ExportResult, String> {
        let session = self.session.get().map_err(|e| e.user_message().to_string())?;
        let form = session
            .form_data
            .as_ref()
            .ok_or_else(|| PreconditionError::MissingFormData.user_message().to_string())?;

        let format_input = FormatQuotationInput {
            quotation_html: session.generated_quote.clone(),
            client_name: form.client_name.clone(),
            company_name: form.client_company_name.clone(),
        };

        let formatted =
            match format_quotation_for_pdf_action(self.generator.as_ref(), &format_input).await {
                ActionResult::Success(output) => output.formatted_html,
                ActionResult::Failure(message) => return Err(message),
            };

        let metadata = ExportMetadata {
            client_name: form.client_name.clone(),
            client_company_name: form.client_company_name.clone(),
            your_company_name: form.your_company_name.clone(),
        };

        self.exporter
            .export(&formatted, &metadata)
            .await
            .map_err(|fault| format!("Failed to export document. {fault}"))
    }

    fn complete_sub_operation(
        &mut self,
        failure: Option<String>,
        correlation_id: &str,
    ) -> Result<(), WorkflowError> {
        let context = self.context(None)?;
        match failure {
            None => {
                self.apply(WorkflowEvent::OperationSucceeded, &context, correlation_id)?;
                self.session.get_mut()?.clear_error();
            }
            Some(message) => {
                warn!(
                    event_name = "workflow.operation_failed",
                    correlation_id = correlation_id,
                    error = %message,
                    "workflow sub-operation failed"
                );
                self.apply(WorkflowEvent::OperationFailed, &context, correlation_id)?;
                self.session.get_mut()?.surface_error(message);
            }
        }
        Ok(())
    }
}
