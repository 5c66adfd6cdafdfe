//! Shared test doubles for the text-generation seam.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::llm::{GenerationError, GenerationRequest, TextGenerator};

/// Returns a canned completion and counts how often it was asked.
pub struct CannedGenerator {
    response: String,
    calls: AtomicUsize,
}

impl CannedGenerator {
    pub fn new(response: impl Into<String>) -> Self {
        Self { response: response.into(), calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn generate(&self, _request: GenerationRequest) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

/// Fails every call, as an unavailable provider would.
#[derive(Default)]
pub struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _request: GenerationRequest) -> Result<String, GenerationError> {
        Err(GenerationError::Provider {
            status: 503,
            message: "service unavailable".to_string(),
        })
    }
}
