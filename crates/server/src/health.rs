use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use quotecraft_core::config::{AppConfig, LlmProvider};

#[derive(Clone)]
pub struct HealthState {
    llm_provider: LlmProvider,
    llm_model: String,
    smtp_host: String,
}

impl HealthState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            llm_provider: config.llm.provider,
            llm_model: config.llm.model.clone(),
            smtp_host: config.smtp.host.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub generator: HealthCheck,
    pub mail: HealthCheck,
    pub checked_at: String,
}

pub fn router(state: HealthState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let payload = HealthResponse {
        status: "ready",
        service: HealthCheck {
            status: "ready",
            detail: "quotecraft-server runtime initialized".to_string(),
        },
        generator: HealthCheck {
            status: "ready",
            detail: format!(
                "text-generation provider {:?} with model {}",
                state.llm_provider, state.llm_model
            ),
        },
        mail: HealthCheck {
            status: "ready",
            detail: format!("smtp relay configured for {}", state.smtp_host),
        },
        checked_at: Utc::now().to_rfc3339(),
    };

    (StatusCode::OK, Json(payload))
}
