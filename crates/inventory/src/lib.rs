//! Asset sources for the label pipeline.
//!
//! [`AssetSource`] is the seam between the pipeline and the external
//! inventory. [`HttpAssetSource`] talks to the inventory REST API;
//! [`InMemoryAssetSource`] serves fixed records for tests and offline use.

mod error;
mod http;
mod memory;
mod source;

pub use error::FetchError;
pub use http::{DEFAULT_TIMEOUT, HttpAssetSource};
pub use memory::{InMemoryAssetSource, InjectedFailure};
pub use source::AssetSource;
