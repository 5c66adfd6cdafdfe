//! UI-session-scoped state for one quotation workflow run.
//!
//! Exactly one `SessionState` exists per active workflow. It is created when
//! the workflow is entered, discarded when it exits, and never shared across
//! sessions. Accessing the state before entry is a precondition failure, the
//! generalization of a context hook used outside its provider.

use crate::errors::PreconditionError;
use crate::quotation::QuotationRequest;

/// Transient state owned by one workflow run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub form_data: Option<QuotationRequest>,
    pub generated_quote: String,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl SessionState {
    pub fn has_document(&self) -> bool {
        !self.generated_quote.trim().is_empty()
    }

    /// Replace the live document wholesale. Last write wins.
    pub fn replace_document(&mut self, document: String) {
        self.generated_quote = document;
    }

    pub fn surface_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

/// Holder for the per-workflow session context.
///
/// Every accessor fails with `PreconditionError::SessionNotEntered` until
/// `enter()` has been called, and again after `exit()`.
#[derive(Debug, Default)]
pub struct SessionSlot {
    inner: Option<SessionState>,
}

impl SessionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct the session context for a new workflow run.
    ///
    /// Re-entering resets any previous run's state.
    pub fn enter(&mut self) -> &mut SessionState {
        self.inner.insert(SessionState::default())
    }

    /// Tear down the context at workflow exit.
    pub fn exit(&mut self) {
        self.inner = None;
    }

    pub fn is_entered(&self) -> bool {
        self.inner.is_some()
    }

    pub fn get(&self) -> Result<&SessionState, PreconditionError> {
        self.inner.as_ref().ok_or(PreconditionError::SessionNotEntered)
    }

    pub fn get_mut(&mut self) -> Result<&mut SessionState, PreconditionError> {
        self.inner.as_mut().ok_or(PreconditionError::SessionNotEntered)
    }
}

#[cfg(test)]
mod tests {
    use super::{SessionSlot, SessionState};
    use crate::errors::PreconditionError;

    #[test]
    fn access_before_entry_fails_with_precondition_error() {
        let slot = SessionSlot::new();
        assert_eq!(slot.get().err(), Some(PreconditionError::SessionNotEntered));
    }

    #[test]
    fn access_after_exit_fails_again() {
        let mut slot = SessionSlot::new();
        slot.enter();
        assert!(slot.get().is_ok());

        slot.exit();
        assert_eq!(slot.get_mut().err(), Some(PreconditionError::SessionNotEntered));
    }

    #[test]
    fn re_entry_resets_previous_state() {
        let mut slot = SessionSlot::new();
        slot.enter().replace_document("<p>draft</p>".to_string());
        assert!(slot.get().expect("entered").has_document());

        let fresh = slot.enter();
        assert_eq!(*fresh, SessionState::default());
    }

    #[test]
    fn whitespace_only_document_counts_as_absent() {
        let mut state = SessionState::default();
        state.replace_document("  \n ".to_string());
        assert!(!state.has_document());
    }

    #[test]
    fn error_surfacing_is_transient() {
        let mut state = SessionState::default();
        state.surface_error("Failed to adjust tone.");
        assert_eq!(state.error.as_deref(), Some("Failed to adjust tone."));
        state.clear_error();
        assert!(state.error.is_none());
    }
}
