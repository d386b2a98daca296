//! API handlers for the wording server
//!
//! Provides REST endpoints for:
//! - Document scanning (multipart upload)
//! - Supported type and dictionary listing
//! - Health checks

use axum::extract::multipart::{Field, MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use shared_types::{DocumentFormat, MatchGroup, ScanResult};
use tracing::{debug, info};
use wording_engine::advisory;

use crate::error::ServerError;
use crate::upload::{scan_upload, TempUpload};
use crate::AppState;

/// Multipart field carrying the document
pub const FILE_FIELD: &str = "file";

pub const NO_MATCHES_MESSAGE: &str = "no forbidden words detected";

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "wording-server",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Scan response: a message when clean, grouped findings otherwise
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ScanResponse {
    Clean { message: &'static str },
    Findings { results: Vec<MatchGroup> },
}

impl From<ScanResult> for ScanResponse {
    fn from(result: ScanResult) -> Self {
        if result.is_empty() {
            ScanResponse::Clean {
                message: NO_MATCHES_MESSAGE,
            }
        } else {
            ScanResponse::Findings {
                results: result.groups,
            }
        }
    }
}

/// Handler: POST /api/parse-document (also /api/upload)
pub async fn handle_parse_document(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ScanResponse>, ServerError> {
    let mut multipart = multipart.map_err(|e| ServerError::InvalidRequest(e.body_text()))?;

    let (filename, bytes) = read_document_field(&mut multipart, state.max_file_size).await?;
    let format = DocumentFormat::from_filename(&filename)
        .ok_or_else(|| ServerError::UnsupportedFileType(filename.clone()))?;
    info!("Scan request: {} ({} bytes)", filename, bytes.len());

    let upload = TempUpload::spool(&state.upload_dir, format, &bytes)?;
    drop(bytes);
    let mut result =
        scan_upload(upload, format, state.engine.clone(), state.decode_timeout_ms).await?;
    info!(
        "Scan finished: {} matches in {} groups",
        result.match_count(),
        result.groups.len()
    );

    if let Some(advisor) = &state.advisor {
        if !result.is_empty() {
            advisory::enrich(&mut result, advisor.as_ref(), &state.advisory).await;
        }
    }

    Ok(Json(ScanResponse::from(result)))
}

/// Find the `file` field and read it, rejecting before decode on bad input
async fn read_document_field(
    multipart: &mut Multipart,
    max_file_size: usize,
) -> Result<(String, Vec<u8>), ServerError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_file_size))?
    {
        if field.name() != Some(FILE_FIELD) {
            debug!("Ignoring multipart field {:?}", field.name());
            continue;
        }

        let filename = field.file_name().unwrap_or_default().trim().to_string();
        if filename.is_empty() {
            return Err(ServerError::EmptyFilename);
        }
        if DocumentFormat::from_filename(&filename).is_none() {
            return Err(ServerError::UnsupportedFileType(filename));
        }

        let bytes = read_field(field, max_file_size).await?;
        return Ok((filename, bytes));
    }

    Err(ServerError::NoFile)
}

async fn read_field(mut field: Field<'_>, max_file_size: usize) -> Result<Vec<u8>, ServerError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| multipart_error(e, max_file_size))?
    {
        if bytes.len() + chunk.len() > max_file_size {
            return Err(ServerError::FileTooLarge(max_file_size));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn multipart_error(err: MultipartError, max_file_size: usize) -> ServerError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ServerError::FileTooLarge(max_file_size)
    } else {
        ServerError::InvalidRequest(err.body_text())
    }
}

/// Supported type entry
#[derive(Serialize)]
pub struct SupportedType {
    pub extension: &'static str,
    pub mime_type: &'static str,
}

#[derive(Serialize)]
pub struct SupportedTypesResponse {
    pub success: bool,
    pub types: Vec<SupportedType>,
    pub max_file_size: usize,
}

/// Handler: GET /api/supported-types
pub async fn handle_supported_types(State(state): State<AppState>) -> Json<SupportedTypesResponse> {
    Json(SupportedTypesResponse {
        success: true,
        types: DocumentFormat::ALL
            .iter()
            .map(|format| SupportedType {
                extension: format.extension(),
                mime_type: format.mime_type(),
            })
            .collect(),
        max_file_size: state.max_file_size,
    })
}

/// Category metadata
#[derive(Serialize)]
pub struct CategoryInfo {
    pub name: String,
    pub terms: Vec<String>,
    pub default_suggestion: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Serialize)]
pub struct CategoryListResponse {
    pub success: bool,
    pub categories: Vec<CategoryInfo>,
    pub count: usize,
}

/// Handler: GET /api/categories
pub async fn handle_list_categories(State(state): State<AppState>) -> Json<CategoryListResponse> {
    let dictionary = state.engine.dictionary();
    let categories: Vec<CategoryInfo> = dictionary
        .categories()
        .iter()
        .map(|c| CategoryInfo {
            name: c.name.clone(),
            terms: c.terms.clone(),
            default_suggestion: c
                .default_suggestion
                .clone()
                .unwrap_or_else(|| dictionary.default_suggestion().to_string()),
            explanation: c.default_explanation.clone(),
        })
        .collect();

    let count = categories.len();

    Json(CategoryListResponse {
        success: true,
        categories,
        count,
    })
}
