use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::{
    extractors::AppJson,
    handlers::ApiError,
    middlewares::session::CurrentUser,
    models::{
        document::{AddDocumentPayload, DocType},
        exam::Grade,
    },
    services::{document_service::DocumentService, AppState},
};

#[derive(Debug, Deserialize)]
pub struct DocumentFilter {
    pub grade: Option<String>,
    pub doc_type: Option<String>,
}

/// GET /documents - Published materials, optionally filtered
pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<DocumentFilter>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let grade = match filter.grade.as_deref() {
        Some(value) => Some(Grade::parse(value).ok_or_else(|| ApiError::bad_request("Invalid grade"))?),
        None => None,
    };
    let doc_type = match filter.doc_type.as_deref() {
        Some(value) => {
            Some(DocType::parse(value).ok_or_else(|| ApiError::bad_request("Invalid doc_type"))?)
        }
        None => None,
    };

    let documents = DocumentService::new(&state.store).list(grade, doc_type);

    // The overview page shows the three grades side by side.
    let mut by_grade = serde_json::Map::new();
    for grade in Grade::ALL {
        let of_grade: Vec<_> = documents.iter().filter(|d| d.grade == grade).collect();
        by_grade.insert(grade.as_str().to_string(), json!(of_grade));
    }

    Ok(Json(json!({
        "success": true,
        "documents": documents,
        "documents_by_grade": by_grade,
    })))
}

/// POST /teacher/documents - Publish a new document link
pub async fn add_document(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    AppJson(payload): AppJson<AddDocumentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    if let Err(e) = payload.validate() {
        return Err(ApiError::bad_request(format!("Validation error: {}", e)));
    }

    let grade =
        Grade::parse(&payload.grade).ok_or_else(|| ApiError::bad_request("Invalid grade"))?;
    let doc_type = DocType::parse(&payload.doc_type)
        .ok_or_else(|| ApiError::bad_request("Invalid doc_type"))?;

    let document = DocumentService::new(&state.store).add(payload, grade, doc_type)?;
    tracing::info!("Document {} published by {}", document.id, user.username);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "document": document })),
    ))
}
