use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Markup is not well-formed: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Invalid label markup: {0}")]
    Markup(String),

    #[error("Unsupported image source: {0}")]
    ImageSource(String),

    #[error("Image decoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("PDF generation error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Rasterization failed: {0}")]
    Raster(String),

    #[error("Render exceeded its time budget of {budget_ms} ms")]
    Timeout { budget_ms: u128 },

    #[error("Render session unavailable: {0}")]
    Session(String),
}

impl RenderError {
    pub(crate) fn markup(message: impl Into<String>) -> Self {
        RenderError::Markup(message.into())
    }
}
