pub mod config;
pub mod errors;
pub mod quotation;
pub mod session;
pub mod workflow;

pub use errors::{PreconditionError, ValidationError};
pub use quotation::{QuotationRequest, Tone};
pub use session::{SessionSlot, SessionState};
pub use workflow::{
    TransitionOutcome, WorkflowAction, WorkflowContext, WorkflowEngine, WorkflowEvent,
    WorkflowState, WorkflowTransitionError,
};
