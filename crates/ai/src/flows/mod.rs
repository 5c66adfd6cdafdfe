//! The five prompt-driven operations.
//!
//! Each flow is a pure function from structured input to structured output
//! via the text-generation seam: validate input first (no network call is
//! made for malformed input), render the fixed template, invoke once,
//! post-validate the output.

pub mod adjust_tone;
pub mod format_pdf;
pub mod generate_email_body;
pub mod generate_quotation;
pub mod suggest_add_ons;

use thiserror::Error;

use quotecraft_core::errors::{PreconditionError, ValidationError};

use crate::llm::GenerationError;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

pub use adjust_tone::{adjust_tone, AdjustToneInput, AdjustToneOutput};
pub use format_pdf::{format_quotation_for_pdf, FormatQuotationInput, FormatQuotationOutput};
pub use generate_email_body::{
    generate_email_body, GenerateEmailBodyInput, GenerateEmailBodyOutput,
};
pub use generate_quotation::{generate_quotation, QuotationOutput};
pub use suggest_add_ons::{suggest_add_ons, SuggestAddOnsInput, SuggestAddOnsOutput};
