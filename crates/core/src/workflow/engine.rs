use thiserror::Error;

use crate::errors::PreconditionError;
use crate::workflow::states::{
    TransitionOutcome, WorkflowAction, WorkflowContext, WorkflowEvent, WorkflowState,
};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WorkflowTransitionError {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
    #[error("invalid transition from {state:?} using event {event:?}")]
    InvalidTransition { state: WorkflowState, event: WorkflowEvent },
}

/// Pure transition table for the quotation workflow.
///
/// The engine decides *what happens next*; running the resulting actions
/// (AI calls, export, email dispatch) is the controller's job. Failures of a
/// sub-operation always return to the state that held the last valid
/// document, so session content survives every error.
#[derive(Clone, Debug, Default)]
pub struct WorkflowEngine;

impl WorkflowEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn initial_state(&self) -> WorkflowState {
        WorkflowState::Idle
    }

    pub fn apply(
        &self,
        current: &WorkflowState,
        event: &WorkflowEvent,
        context: &WorkflowContext,
    ) -> Result<TransitionOutcome, WorkflowTransitionError> {
        use WorkflowAction::{
            CloseComposeDialog, InvokeGeneration, InvokeSuggestions, InvokeToneAdjustment,
            NavigateToResult, RedirectToIntake, RunEmailDispatch, RunExport, SurfaceError,
        };
        use WorkflowEvent::{
            AdjustTone, Export, GenerationFailed, GenerationSucceeded, OperationFailed,
            OperationSucceeded, ResultViewEntered, SendEmail, Submit, SuggestAddOns,
        };
        use WorkflowState::{
            Adjusting, Emailing, Exporting, Generated, Idle, Submitting, Suggesting,
        };

        let (to, actions) = match (current, event) {
            (Idle, Submit) => (Submitting, vec![InvokeGeneration]),
            (Submitting, GenerationSucceeded) => (Generated, vec![NavigateToResult]),
            // Form data is retained for resubmission.
            (Submitting, GenerationFailed) => (Idle, vec![SurfaceError]),

            // Entering the result view without a document is a guard, not an
            // error: send the user back to the intake form.
            (_, ResultViewEntered) if !context.has_document => (Idle, vec![RedirectToIntake]),
            (Generated, ResultViewEntered) => (Generated, Vec::new()),

            (Generated, AdjustTone(tone)) => (Adjusting, vec![InvokeToneAdjustment(*tone)]),
            (Generated, SuggestAddOns) => {
                if !context.has_project_description {
                    return Err(PreconditionError::MissingProjectDescription.into());
                }
                (Suggesting, vec![InvokeSuggestions])
            }
            (Generated, Export) => {
                if !context.has_form_data {
                    return Err(PreconditionError::MissingFormData.into());
                }
                (Exporting, vec![RunExport])
            }
            (Generated, SendEmail) => {
                if !context.has_form_data {
                    return Err(PreconditionError::MissingFormData.into());
                }
                if !context.has_recipient {
                    return Err(PreconditionError::MissingRecipient.into());
                }
                (Emailing, vec![RunEmailDispatch])
            }

            (Adjusting | Suggesting | Exporting, OperationSucceeded) => (Generated, Vec::new()),
            (Emailing, OperationSucceeded) => (Generated, vec![CloseComposeDialog]),
            // The prior document and form input stay intact.
            (Adjusting | Suggesting | Exporting | Emailing, OperationFailed) => {
                (Generated, vec![SurfaceError])
            }

            _ => {
                return Err(WorkflowTransitionError::InvalidTransition {
                    state: current.clone(),
                    event: event.clone(),
                });
            }
        };

        Ok(TransitionOutcome { from: current.clone(), to, event: event.clone(), actions })
    }
}
