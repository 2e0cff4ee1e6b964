use labelpress::LabelPipeline;

/// Shared application state accessible to all handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Fetch and render path; cloning shares the same templates and sessions
    pub pipeline: LabelPipeline,
}

impl AppState {
    pub fn new(pipeline: LabelPipeline) -> Self {
        Self { pipeline }
    }
}
