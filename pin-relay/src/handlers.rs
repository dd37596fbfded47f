/// Axum HTTP handlers for the upload relay

use axum::{
    extract::{Multipart, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use flower_mint::upload::{validate_upload, UPLOAD_FIELD};
use flower_mint::{CandidateRecord, MintError};
use serde_json::json;
use std::sync::Arc;

use crate::pinata::{PinError, Pinner};
use crate::store::RegistryStore;
use crate::types::*;

/// Shared application state
pub struct RelayState<P> {
    pub pinner: P,
    pub store: RegistryStore,
    /// Shared secret uploads must present as a bearer token, when set
    pub upload_token: Option<String>,
}

/// Custom error type for handlers
#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    BadRequest(String),
    Upstream(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Missing or invalid upload token".to_string(),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<PinError> for ApiError {
    fn from(err: PinError) -> Self {
        log::error!("Pinning failed: {}", err);
        ApiError::Upstream(err.to_string())
    }
}

fn authorize(headers: &HeaderMap, token: Option<&str>) -> Result<(), ApiError> {
    let Some(expected) = token else {
        return Ok(());
    };
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    if presented == Some(expected) {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}

/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}

/// GET /flowers
/// Returns the availability registry the claim page selects from
pub async fn list_flowers<P: Pinner + 'static>(
    State(state): State<Arc<RelayState<P>>>,
) -> Json<Vec<CandidateRecord>> {
    Json(state.store.snapshot().await)
}

/// POST /upload-image
/// Pins the image and its metadata, then lists the metadata CID as available
pub async fn upload_image<P: Pinner + 'static>(
    State(state): State<Arc<RelayState<P>>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    authorize(&headers, state.upload_token.as_deref())?;

    let mut image = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed upload: {}", e)))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let name = field.file_name().unwrap_or("flower").to_string();
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Malformed upload: {}", e)))?;
        image = Some((name, mime_type, bytes.to_vec()));
    }

    let (name, mime_type, bytes) =
        image.ok_or_else(|| ApiError::BadRequest("No image file provided".to_string()))?;
    validate_upload(&mime_type, bytes.len() as u64).map_err(|rejection| {
        ApiError::BadRequest(MintError::UploadRejected(rejection).user_message())
    })?;

    log::info!("📤 Pinning {} ({} bytes, {})", name, bytes.len(), mime_type);
    let image_cid = state.pinner.pin_file(&name, &mime_type, bytes).await?;
    log::info!("✓ Image pinned: {}", image_cid);

    let mut records = state.store.lock().await;
    let number = records.len() + 1;
    let metadata = FlowerMetadata::numbered(number, &image_cid);
    let content =
        serde_json::to_value(&metadata).map_err(|e| ApiError::Internal(e.to_string()))?;
    let metadata_cid = state
        .pinner
        .pin_json(&format!("flower-{}-metadata.json", number), &content)
        .await?;
    log::info!("✓ Metadata pinned: {}", metadata_cid);

    records.push(CandidateRecord::available(metadata_cid.clone()));
    if let Err(e) = state.store.persist(&records).await {
        records.pop();
        return Err(e.into());
    }

    log::info!(
        "🌸 {} added to {:?} ({} total)",
        metadata.name,
        state.store.path(),
        records.len()
    );

    Ok(Json(UploadResponse {
        image_cid,
        metadata_cid,
        total_cids: records.len(),
    }))
}
