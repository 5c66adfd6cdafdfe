//! Email dispatch endpoint and the mail-relay seam.
//!
//! `POST /api/send-email` accepts a recipient, the quotation metadata and the
//! exported document as base64, generates a short cover message through the
//! text-generation seam, and relays the document as a PDF attachment.
//! Dispatch is all-or-nothing: either the relay accepted the send or the
//! caller gets a single failure; there is no partial-send state.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::post,
    Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use quotecraft_ai::flows::{generate_email_body, GenerateEmailBodyInput};
use quotecraft_ai::TextGenerator;
use quotecraft_core::config::SmtpConfig;

use crate::export::quotation_filename;

#[derive(Debug, Error)]
pub enum MailTransportError {
    #[error("invalid mail address `{0}`")]
    Address(String),
    #[error("mail relay failed: {0}")]
    Relay(String),
}

/// One outbound message with a single binary attachment.
#[derive(Clone, Debug)]
pub struct OutgoingEmail {
    pub from_name: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub attachment_filename: String,
    pub attachment: Vec<u8>,
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailTransportError>;
}

/// SMTP relay over the configured host, SMTPS with credentials.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpMailer {
    pub fn from_config(config: &SmtpConfig) -> Result<Self, MailTransportError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| MailTransportError::Relay(e.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.expose_secret().to_string(),
                config.password.expose_secret().to_string(),
            ))
            .build();

        Ok(Self { transport, from_address: config.from_address.clone() })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailTransportError> {
        let OutgoingEmail { from_name, to, subject, html_body, attachment_filename, attachment } =
            email;

        let from: Mailbox = format!("\"{from_name}\" <{}>", self.from_address)
            .parse()
            .map_err(|_| MailTransportError::Address(self.from_address.clone()))?;
        let to: Mailbox = to.parse().map_err(|_| MailTransportError::Address(to.clone()))?;

        let pdf_content_type = ContentType::parse("application/pdf")
            .map_err(|e| MailTransportError::Relay(e.to_string()))?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::html(html_body))
                    .singlepart(
                        Attachment::new(attachment_filename).body(attachment, pdf_content_type),
                    ),
            )
            .map_err(|e| MailTransportError::Relay(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| MailTransportError::Relay(e.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Missing required fields")]
    MissingFields,
    #[error("invalid document payload: {0}")]
    InvalidAttachment(String),
    #[error("cover message generation failed: {0}")]
    CoverMessage(String),
    #[error(transparent)]
    Transport(#[from] MailTransportError),
}

/// Quotation facts the cover message and attachment naming draw from.
///
/// The workflow posts its full form data here; unknown fields are ignored.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationMetadata {
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub your_company_name: String,
    #[serde(default)]
    pub client_company_name: String,
    #[serde(default)]
    pub project_description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailRequest {
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub quotation_data: Option<QuotationMetadata>,
    #[serde(default)]
    pub pdf_base64: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendEmailResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct EmailErrorBody {
    pub error: String,
}

#[derive(Clone)]
pub struct EmailState {
    pub generator: Arc<dyn TextGenerator>,
    pub mailer: Arc<dyn MailTransport>,
}

pub fn router(state: EmailState) -> Router {
    Router::new().route("/api/send-email", post(send_email)).with_state(state)
}

async fn send_email(
    State(state): State<EmailState>,
    Json(request): Json<SendEmailRequest>,
) -> Result<Json<SendEmailResponse>, (StatusCode, Json<EmailErrorBody>)> {
    let to = request.to.as_deref().map(str::trim).filter(|value| !value.is_empty());
    let pdf_base64 =
        request.pdf_base64.as_deref().map(str::trim).filter(|value| !value.is_empty());

    let (Some(to), Some(quotation_data), Some(pdf_base64)) =
        (to, request.quotation_data.as_ref(), pdf_base64)
    else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(EmailErrorBody { error: EmailError::MissingFields.to_string() }),
        ));
    };

    let document_bytes = BASE64.decode(pdf_base64).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(EmailErrorBody {
                error: format!(
                    "Failed to send email. {}",
                    EmailError::InvalidAttachment(e.to_string())
                ),
            }),
        )
    })?;

    match dispatch_quotation_email(
        state.generator.as_ref(),
        state.mailer.as_ref(),
        to,
        quotation_data,
        document_bytes,
    )
    .await
    {
        Ok(()) => Ok(Json(SendEmailResponse {
            success: true,
            message: "Email sent successfully".to_string(),
        })),
        Err(fault) => {
            error!(
                event_name = "email.dispatch.failed",
                recipient = to,
                error = %fault,
                "quotation email dispatch failed"
            );
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(EmailErrorBody { error: format!("Failed to send email. {fault}") }),
            ))
        }
    }
}

/// Generate the cover message and relay the document as an attachment.
///
/// Shared by the HTTP endpoint and the workflow controller's send step.
pub async fn dispatch_quotation_email(
    generator: &dyn TextGenerator,
    mailer: &dyn MailTransport,
    to: &str,
    metadata: &QuotationMetadata,
    document_bytes: Vec<u8>,
) -> Result<(), EmailError> {
    let cover = generate_email_body(
        generator,
        &GenerateEmailBodyInput {
            client_name: metadata.client_name.clone(),
            your_company_name: metadata.your_company_name.clone(),
            project_description: metadata.project_description.clone(),
        },
    )
    .await
    .map_err(|e| EmailError::CoverMessage(e.to_string()))?;

    let html_body = format!("<p>{}</p>", cover.email_body.replace('\n', "<br>"));

    mailer
        .send(OutgoingEmail {
            from_name: metadata.your_company_name.clone(),
            to: to.to_string(),
            subject: format!("Your Project Quotation from {}", metadata.your_company_name),
            html_body,
            attachment_filename: quotation_filename(&metadata.client_company_name),
            attachment: document_bytes,
        })
        .await?;

    info!(
        event_name = "email.dispatch.sent",
        recipient = to,
        client_company = %metadata.client_company_name,
        "quotation email relayed"
    );

    Ok(())
}
