use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Asset {id} not found")]
    NotFound { id: u64 },

    #[error("Inventory API rejected the access token")]
    Unauthorized,

    #[error("Inventory API answered {status} for asset {id}")]
    Status { id: u64, status: u16 },

    #[error("Inventory API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Could not decode asset {id}: {message}")]
    Decode { id: u64, message: String },

    #[error("Asset source unavailable: {0}")]
    Unavailable(String),
}
