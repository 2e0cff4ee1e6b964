use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposerError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Nothing to compose: no documents were supplied")]
    Empty,

    #[error("Document {index} has no pages")]
    NoPages { index: usize },
}
