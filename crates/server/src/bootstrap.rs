use std::path::Path;
use std::sync::Arc;

use axum::Router;
use thiserror::Error;
use tracing::{info, warn};

use quotecraft_ai::{GenerationError, HttpTextGenerator, TextGenerator};
use quotecraft_core::config::{AppConfig, ConfigError, LoadOptions};

use crate::email::{EmailState, MailTransport, MailTransportError, SmtpMailer};
use crate::export::{DocumentExporter, ExportApiState, ExportError};
use crate::health::{self, HealthState};

pub struct Application {
    pub config: AppConfig,
    pub generator: Arc<dyn TextGenerator>,
    pub exporter: Arc<DocumentExporter>,
    pub mailer: Arc<dyn MailTransport>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("text-generation client initialization failed: {0}")]
    Generator(#[source] GenerationError),
    #[error("document exporter initialization failed: {0}")]
    Exporter(#[source] ExportError),
    #[error("mail transport initialization failed: {0}")]
    Mail(#[source] MailTransportError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let generator =
        HttpTextGenerator::from_config(&config.llm).map_err(BootstrapError::Generator)?;
    info!(
        event_name = "system.bootstrap.generator_ready",
        correlation_id = "bootstrap",
        provider = ?config.llm.provider,
        model = %config.llm.model,
        "text-generation client initialized"
    );

    let exporter = build_exporter(&config)?;
    let mailer = SmtpMailer::from_config(&config.smtp).map_err(BootstrapError::Mail)?;
    info!(
        event_name = "system.bootstrap.mail_ready",
        correlation_id = "bootstrap",
        host = %config.smtp.host,
        "smtp mail transport initialized"
    );

    Ok(Application {
        config,
        generator: Arc::new(generator),
        exporter: Arc::new(exporter),
        mailer: Arc::new(mailer),
    })
}

fn build_exporter(config: &AppConfig) -> Result<DocumentExporter, BootstrapError> {
    let template_dir = format!("{}/pdf", config.export.template_dir.trim_end_matches('/'));
    if Path::new(&template_dir).exists() {
        DocumentExporter::new(&template_dir).map_err(BootstrapError::Exporter)
    } else {
        warn!(
            template_dir = %template_dir,
            "export template directory not found, using embedded templates"
        );
        Ok(DocumentExporter::with_embedded_templates())
    }
}

impl Application {
    /// The full HTTP surface: health, document export, email dispatch.
    pub fn router(&self) -> Router {
        health::router(HealthState::from_config(&self.config))
            .merge(crate::email::router(EmailState {
                generator: self.generator.clone(),
                mailer: self.mailer.clone(),
            }))
            .merge(crate::export::router(ExportApiState {
                generator: self.generator.clone(),
                exporter: self.exporter.clone(),
            }))
    }
}
