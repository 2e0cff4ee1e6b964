use crate::error::{ApiError, Result};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use labelpress::{OutputFormat, RenderedArtifact, render_batch};
use serde::Deserialize;

pub const LABELS_RENDERED: HeaderName = HeaderName::from_static("x-labels-rendered");
pub const LABELS_FAILED: HeaderName = HeaderName::from_static("x-labels-failed");

#[derive(Debug, Default, Deserialize)]
pub struct LabelQuery {
    #[serde(rename = "type")]
    pub label_type: Option<String>,
    /// `pdf` or `png`; overrides the Accept header.
    pub format: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub ids: Vec<u64>,
    #[serde(rename = "type", default)]
    pub label_type: Option<String>,
}

pub async fn health_check() -> &'static str {
    "ok"
}

/// Renders one label, as PDF unless the client prefers a PNG preview.
pub async fn render_label(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<LabelQuery>,
    headers: HeaderMap,
) -> Result<Response> {
    let id: u64 = id
        .parse()
        .map_err(|_| ApiError::invalid(format!("'{}' is not a valid asset id", id)))?;
    let format = match query.format.as_deref() {
        Some(value) => OutputFormat::parse(value)
            .ok_or_else(|| ApiError::invalid(format!("Unsupported format '{}'", value)))?,
        None => {
            let accept = headers.get(header::ACCEPT).and_then(|v| v.to_str().ok());
            OutputFormat::negotiate(accept)
        }
    };
    let label_type = query.label_type.as_deref().unwrap_or_default();
    tracing::info!("Label request for asset {} ({:?}, {})", id, label_type, format.extension());

    let label = state.pipeline.render_one(id, label_type, format).await?;
    Ok(artifact_response(label.artifact, &label.filename, HeaderMap::new()))
}

/// Renders many labels into one PDF, skipping the ones that fail.
pub async fn render_batch_labels(
    State(state): State<AppState>,
    payload: std::result::Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(request) = payload.map_err(|e| ApiError::invalid(e.body_text()))?;
    let label_type = request.label_type.as_deref().unwrap_or_default();
    tracing::info!("Batch request for {} assets ({:?})", request.ids.len(), label_type);

    let batch = render_batch(&state.pipeline, request.ids, label_type).await?;

    let mut extra = HeaderMap::new();
    extra.insert(LABELS_RENDERED, HeaderValue::from(batch.rendered.len()));
    extra.insert(LABELS_FAILED, HeaderValue::from(batch.failures.len()));
    tracing::info!("Batch completed: {}", batch.report());
    Ok(artifact_response(batch.artifact, &batch.filename, extra))
}

fn artifact_response(artifact: RenderedArtifact, filename: &str, mut headers: HeaderMap) -> Response {
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(artifact.media_type()));
    // Filenames are sanitized to ASCII alphanumerics, `_`, `-` and `.`.
    if let Ok(disposition) = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename)) {
        headers.insert(header::CONTENT_DISPOSITION, disposition);
    }
    (StatusCode::OK, headers, artifact.bytes).into_response()
}
