use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use labelpress::LabelError;
use serde_json::json;

/// A failed request, rendered as `{"error": <code>, "message": <detail>}`.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub LabelError);

impl ApiError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self(LabelError::Validation(message.into()))
    }

    pub fn status(&self) -> StatusCode {
        match &self.0 {
            LabelError::Validation(_) => StatusCode::BAD_REQUEST,
            LabelError::NotFound { .. } => StatusCode::NOT_FOUND,
            LabelError::UpstreamAuth | LabelError::Upstream(_) => StatusCode::BAD_GATEWAY,
            LabelError::Field(_)
            | LabelError::CodeGeneration(_)
            | LabelError::Compose(_)
            | LabelError::Assembly { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            LabelError::Template(_) | LabelError::Render(_) | LabelError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self.0 {
            LabelError::UpstreamAuth => {
                tracing::error!("Inventory API rejected the access token");
                self.0.to_string()
            }
            LabelError::Internal(_) => {
                tracing::error!("Internal error: {}", self.0);
                "An internal error occurred".to_string()
            }
            other if status.is_server_error() => {
                tracing::error!("Request failed: {}", other);
                other.to_string()
            }
            other => {
                tracing::warn!("Request rejected: {}", other);
                other.to_string()
            }
        };

        let body = Json(json!({
            "error": self.0.code(),
            "message": message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
