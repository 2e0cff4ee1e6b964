use crate::Symbology;
use thiserror::Error;

/// Errors raised while synthesizing a code image.
#[derive(Error, Debug)]
pub enum CodeError {
    #[error("Cannot encode an empty {0} payload")]
    EmptyPayload(Symbology),

    #[error("{symbology} encoding failed for '{payload}': {message}")]
    Encode {
        symbology: Symbology,
        payload: String,
        message: String,
    },

    #[error("PNG encoding failed: {0}")]
    Image(#[from] image::ImageError),
}
