//! Quotation intake schema and validation.
//!
//! `QuotationRequest` is the structured input collected on the intake form.
//! It is immutable once submitted for a generation run; the session state
//! owns the single live copy for the duration of one workflow.

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Stylistic register applied uniformly to quotation content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tone {
    Professional,
    Friendly,
    Formal,
    Creative,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Professional => "Professional",
            Self::Friendly => "Friendly",
            Self::Formal => "Formal",
            Self::Creative => "Creative",
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Tone {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "Professional" => Ok(Self::Professional),
            "Friendly" => Ok(Self::Friendly),
            "Formal" => Ok(Self::Formal),
            "Creative" => Ok(Self::Creative),
            other => Err(ValidationError::UnknownTone(other.to_string())),
        }
    }
}

/// Structured intake data for one quotation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationRequest {
    pub client_name: String,
    pub client_company_name: String,
    pub your_company_name: String,
    pub project_description: String,
    pub services_required: String,
    pub timeline: String,
    pub budget_range: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requirements: Option<String>,
    pub preferred_tone: Tone,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_ons: Option<String>,
}

/// Minimum field lengths, measured after trimming.
const MIN_LENGTHS: &[(&str, usize)] = &[
    ("clientName", 2),
    ("clientCompanyName", 2),
    ("yourCompanyName", 2),
    ("projectDescription", 10),
    ("servicesRequired", 5),
    ("timeline", 2),
    ("budgetRange", 2),
];

impl QuotationRequest {
    /// Validate all required fields against their minimum-length thresholds.
    ///
    /// Fails on the first violation; must be called before any network call
    /// is made on behalf of this request.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            &self.client_name,
            &self.client_company_name,
            &self.your_company_name,
            &self.project_description,
            &self.services_required,
            &self.timeline,
            &self.budget_range,
        ];

        for (value, (field, min)) in fields.into_iter().zip(MIN_LENGTHS.iter().copied()) {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(ValidationError::Empty { field });
            }
            if trimmed.chars().count() < min {
                return Err(ValidationError::TooShort { field, min });
            }
        }

        Ok(())
    }
}
