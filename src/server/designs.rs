use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::BuilderError;
use crate::model::catalog::{section_templates, theme_presets};
use crate::model::{Document, DocumentId};
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub id: DocumentId,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<BuilderError> for ApiError {
    fn from(err: BuilderError) -> Self {
        let status = match &err {
            BuilderError::DocumentNotFound(_) => StatusCode::NOT_FOUND,
            e if e.is_validation() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %err, "design request failed");
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse { error: self.message });
        (self.status, body).into_response()
    }
}

pub async fn get_design(
    State(state): State<AppState>,
    Path(seller_id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    Ok(Json(state.store.require(&seller_id).await?))
}

pub async fn put_design(
    State(state): State<AppState>,
    Path(seller_id): Path<String>,
    Json(mut document): Json<Document>,
) -> Result<Json<SaveResponse>, ApiError> {
    if document.seller_id.is_empty() {
        document.seller_id = seller_id.clone();
    }
    if document.seller_id != seller_id {
        return Err(ApiError::bad_request(format!(
            "document belongs to seller {}, not {}",
            document.seller_id, seller_id
        )));
    }

    let id = state.store.save(&document).await?;
    tracing::info!(%seller_id, document_id = %id, "design stored");
    Ok(Json(SaveResponse { id }))
}

pub async fn delete_design(
    State(state): State<AppState>,
    Path(seller_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.store.delete(&seller_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(BuilderError::DocumentNotFound(seller_id).into())
    }
}

/// Published storefronts with hidden sections and version history removed.
pub async fn list_storefronts(
    State(state): State<AppState>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let documents = state.store.list_active().await?;
    Ok(Json(documents.iter().map(Document::published_view).collect()))
}

pub async fn list_presets() -> impl IntoResponse {
    Json(theme_presets())
}

pub async fn list_templates() -> impl IntoResponse {
    Json(section_templates())
}
