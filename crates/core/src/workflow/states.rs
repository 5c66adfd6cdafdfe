use serde::{Deserialize, Serialize};

use crate::quotation::Tone;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowState {
    Idle,
    Submitting,
    Generated,
    Adjusting,
    Suggesting,
    Exporting,
    Emailing,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowEvent {
    Submit,
    GenerationSucceeded,
    GenerationFailed,
    ResultViewEntered,
    AdjustTone(Tone),
    SuggestAddOns,
    Export,
    SendEmail,
    OperationSucceeded,
    OperationFailed,
}

/// Facts about the session the transition table consults for its guards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WorkflowContext {
    pub has_form_data: bool,
    pub has_document: bool,
    pub has_project_description: bool,
    pub has_recipient: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowAction {
    InvokeGeneration,
    NavigateToResult,
    RedirectToIntake,
    InvokeToneAdjustment(Tone),
    InvokeSuggestions,
    RunExport,
    RunEmailDispatch,
    SurfaceError,
    CloseComposeDialog,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub from: WorkflowState,
    pub to: WorkflowState,
    pub event: WorkflowEvent,
    pub actions: Vec<WorkflowAction>,
}
