use crate::batch::BatchFailure;
use crate::fields::FieldError;
use labelpress_codes::CodeError;
use labelpress_inventory::FetchError;
use labelpress_pdf_composer::ComposerError;
use labelpress_render::RenderError;
use labelpress_template::TemplateError;
use thiserror::Error;

/// Errors that abort one label render or a whole batch.
#[derive(Error, Debug)]
pub enum LabelError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Asset {id} not found")]
    NotFound { id: u64 },

    #[error("Inventory API rejected the configured access token")]
    UpstreamAuth,

    #[error("Inventory API error: {0}")]
    Upstream(FetchError),

    #[error("Asset data incomplete: {0}")]
    Field(#[from] FieldError),

    #[error("Code generation failed: {0}")]
    CodeGeneration(#[from] CodeError),

    #[error("Template binding failed: {0}")]
    Template(#[from] TemplateError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Merging label pages failed: {0}")]
    Compose(#[from] ComposerError),

    #[error("All {} labels in the batch failed: {}", .failures.len(), summarize(.failures))]
    Assembly { failures: Vec<BatchFailure> },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<FetchError> for LabelError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::NotFound { id } => LabelError::NotFound { id },
            FetchError::Unauthorized => LabelError::UpstreamAuth,
            other => LabelError::Upstream(other),
        }
    }
}

impl LabelError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ValidationError",
            Self::NotFound { .. } => "NotFound",
            Self::UpstreamAuth => "UpstreamAuth",
            Self::Upstream(_) => "UpstreamError",
            Self::Field(_) => "IncompleteAsset",
            Self::CodeGeneration(_) => "CodeGenerationError",
            Self::Template(_) | Self::Render(_) => "RenderError",
            Self::Compose(_) | Self::Assembly { .. } => "AssemblyError",
            Self::Internal(_) => "InternalError",
        }
    }
}

fn summarize(failures: &[BatchFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}: {}", f.id, f.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_errors_map_to_distinct_kinds() {
        assert!(matches!(
            LabelError::from(FetchError::NotFound { id: 3 }),
            LabelError::NotFound { id: 3 }
        ));
        assert!(matches!(LabelError::from(FetchError::Unauthorized), LabelError::UpstreamAuth));
        let upstream = LabelError::from(FetchError::Status { id: 3, status: 500 });
        assert_eq!(upstream.code(), "UpstreamError");
    }

    #[test]
    fn test_assembly_message_lists_failures() {
        let err = LabelError::Assembly {
            failures: vec![
                BatchFailure { id: 1, reason: "Asset 1 not found".to_string() },
                BatchFailure { id: 2, reason: "Asset 2 has no category".to_string() },
            ],
        };
        assert_eq!(
            err.to_string(),
            "All 2 labels in the batch failed: 1: Asset 1 not found; 2: Asset 2 has no category"
        );
        assert_eq!(err.code(), "AssemblyError");
    }
}
