//! Document export: deterministic framing and pagination of a quotation.
//!
//! Export is two-phase. The AI restyle (format-for-pdf) happens upstream of
//! this module; everything here is deterministic and testable without a
//! text-generation provider: wrap the restyled body in the fixed
//! header/footer frame, then convert to a paginated PDF via wkhtmltopdf when
//! it is installed, falling back to print-ready HTML otherwise.

use std::process::Stdio;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{Json, Response},
    routing::post,
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tera::{Context, Tera};
use tokio::process::Command;
use tracing::{error, info, warn};

use quotecraft_ai::actions::{format_quotation_for_pdf_action, ActionResult};
use quotecraft_ai::flows::FormatQuotationInput;
use quotecraft_ai::TextGenerator;

const DOCUMENT_TEMPLATE: &str = "document.html.tera";

/// Export error types
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("template error: {0}")]
    Template(String),
    #[error("conversion error: {0}")]
    Conversion(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Names stamped into the deterministic header block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportMetadata {
    pub client_name: String,
    pub client_company_name: String,
    pub your_company_name: String,
}

/// Derive the download filename from the client company name.
pub fn quotation_filename(client_company_name: &str) -> String {
    let company = client_company_name.trim();
    let company = if company.is_empty() { "Quote" } else { company };
    format!("Quotation_{company}.pdf")
}

#[derive(Clone, Debug)]
pub struct DocumentExporter {
    tera: Tera,
    wkhtmltopdf_path: Option<String>,
}

impl DocumentExporter {
    /// Create an exporter loading the frame template from a directory.
    pub fn new(template_dir: &str) -> Result<Self, ExportError> {
        let tera = Tera::new(&format!("{template_dir}/**/*"))
            .map_err(|e| ExportError::Template(e.to_string()))?;

        Ok(Self { tera, wkhtmltopdf_path: detect_wkhtmltopdf() })
    }

    /// Create an exporter with the embedded frame template.
    pub fn with_embedded_templates() -> Self {
        let mut tera = Tera::default();
        tera.add_raw_template(
            DOCUMENT_TEMPLATE,
            include_str!("../../../templates/pdf/document.html.tera"),
        )
        .expect("embedded document template must parse");

        Self { tera, wkhtmltopdf_path: detect_wkhtmltopdf() }
    }

    #[cfg(test)]
    pub(crate) fn disable_conversion(&mut self) {
        self.wkhtmltopdf_path = None;
    }

    /// Wrap a restyled quotation body in the fixed header/footer frame.
    ///
    /// Fully deterministic: header carries the document title, client and
    /// company names and the current date; footer carries the static
    /// thank-you line. Page-break-avoidance rules ride along in the frame's
    /// stylesheet so no heading or list item is split across a page.
    pub fn wrap_document(
        &self,
        formatted_html: &str,
        metadata: &ExportMetadata,
    ) -> Result<String, ExportError> {
        let mut context = Context::new();
        context.insert("client_name", &metadata.client_name);
        context.insert("client_company_name", &metadata.client_company_name);
        context.insert("your_company_name", &metadata.your_company_name);
        context.insert("date", &Utc::now().format("%B %-d, %Y").to_string());
        context.insert("body", formatted_html);

        self.tera
            .render(DOCUMENT_TEMPLATE, &context)
            .map_err(|e| ExportError::Template(e.to_string()))
    }

    /// Produce the binary document for a restyled quotation body.
    ///
    /// Returns PDF bytes when wkhtmltopdf is available; otherwise the
    /// print-ready HTML, which browsers paginate on print.
    pub async fn export(
        &self,
        formatted_html: &str,
        metadata: &ExportMetadata,
    ) -> Result<ExportResult, ExportError> {
        let html = self.wrap_document(formatted_html, metadata)?;

        if let Some(ref wkhtmltopdf) = self.wkhtmltopdf_path {
            match self.convert_html_to_pdf(&html, wkhtmltopdf).await {
                Ok(pdf_bytes) => Ok(ExportResult::Pdf(pdf_bytes)),
                Err(e) => {
                    warn!(error = %e, "PDF conversion failed, falling back to HTML");
                    Ok(ExportResult::Html(html))
                }
            }
        } else {
            Ok(ExportResult::Html(html))
        }
    }

    /// Convert framed HTML to PDF using wkhtmltopdf.
    async fn convert_html_to_pdf(
        &self,
        html: &str,
        wkhtmltopdf_path: &str,
    ) -> Result<Vec<u8>, ExportError> {
        let temp_dir = std::env::temp_dir();
        let html_path = temp_dir.join(format!("quotation_{}.html", uuid::Uuid::new_v4()));
        let pdf_path = temp_dir.join(format!("quotation_{}.pdf", uuid::Uuid::new_v4()));

        tokio::fs::write(&html_path, html).await?;

        let output = Command::new(wkhtmltopdf_path)
            .arg("--page-size")
            .arg("A4")
            .arg("--margin-top")
            .arg("10mm")
            .arg("--margin-bottom")
            .arg("10mm")
            .arg("--margin-left")
            .arg("10mm")
            .arg("--margin-right")
            .arg("10mm")
            .arg("--encoding")
            .arg("utf-8")
            .arg(&html_path)
            .arg(&pdf_path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!(stderr = %stderr, "wkhtmltopdf failed");
            return Err(ExportError::Conversion(stderr.to_string()));
        }

        let pdf_bytes = tokio::fs::read(&pdf_path).await?;

        let _ = tokio::fs::remove_file(&html_path).await;
        let _ = tokio::fs::remove_file(&pdf_path).await;

        info!(size = pdf_bytes.len(), "PDF generated successfully");

        Ok(pdf_bytes)
    }
}

/// Result of document export.
#[derive(Clone, Debug)]
pub enum ExportResult {
    Pdf(Vec<u8>),
    Html(String),
}

impl ExportResult {
    /// The document as a byte payload for transmission.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Pdf(bytes) => bytes,
            Self::Html(html) => html.into_bytes(),
        }
    }

    /// Convert to an Axum download response.
    pub fn into_response(self, filename: &str) -> Response {
        match self {
            Self::Pdf(bytes) => Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "application/pdf")
                .header(
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{filename}\""),
                )
                .body(Body::from(bytes))
                .unwrap(),
            Self::Html(html) => Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
                .body(Body::from(html))
                .unwrap(),
        }
    }
}

#[derive(Clone)]
pub struct ExportApiState {
    pub generator: Arc<dyn TextGenerator>,
    pub exporter: Arc<DocumentExporter>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub quotation_html: String,
    pub client_name: String,
    pub client_company_name: String,
    pub your_company_name: String,
}

#[derive(Debug, Serialize)]
pub struct ExportErrorBody {
    pub error: String,
}

pub fn router(state: ExportApiState) -> Router {
    Router::new().route("/api/export", post(export_quotation)).with_state(state)
}

/// Produce the downloadable document for the current quotation body.
///
/// Phase one restyles the body through the format-for-pdf action; phase two
/// frames and paginates deterministically. A formatting failure aborts the
/// export with no partial file.
async fn export_quotation(
    State(state): State<ExportApiState>,
    Json(request): Json<ExportRequest>,
) -> Result<Response, (StatusCode, Json<ExportErrorBody>)> {
    let format_input = FormatQuotationInput {
        quotation_html: request.quotation_html,
        client_name: request.client_name.clone(),
        company_name: request.client_company_name.clone(),
    };

    let formatted =
        match format_quotation_for_pdf_action(state.generator.as_ref(), &format_input).await {
            ActionResult::Success(output) => output.formatted_html,
            ActionResult::Failure(message) => {
                return Err((StatusCode::BAD_GATEWAY, Json(ExportErrorBody { error: message })));
            }
        };

    let metadata = ExportMetadata {
        client_name: request.client_name,
        client_company_name: request.client_company_name,
        your_company_name: request.your_company_name,
    };

    let result = state.exporter.export(&formatted, &metadata).await.map_err(|fault| {
        error!(event_name = "export.failed", error = %fault, "document export failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ExportErrorBody { error: format!("Failed to export document. {fault}") }),
        )
    })?;

    let filename = quotation_filename(&metadata.client_company_name);
    Ok(result.into_response(&filename))
}

fn detect_wkhtmltopdf() -> Option<String> {
    let path = which::which("wkhtmltopdf").ok().map(|p| p.to_string_lossy().to_string());
    if path.is_none() {
        warn!("wkhtmltopdf not found in PATH - document export will fall back to HTML");
    }
    path
}
