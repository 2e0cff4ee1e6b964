//! labelpress: asset labels from inventory records.
//!
//! The root crate ties the workspace together: configuration, the field
//! composer that derives label text, the single-label [`LabelPipeline`] and
//! the batch assembler that merges many labels into one PDF.
//!
//! ```ignore
//! use labelpress::{LabelPipeline, Settings};
//!
//! let pipeline = LabelPipeline::from_settings(Settings::load()?)?;
//! let label = pipeline.render_one(42, "default", OutputFormat::Pdf).await?;
//! std::fs::write(&label.filename, &label.artifact.bytes)?;
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod fields;
pub mod filename;
pub mod pipeline;

pub use batch::{BatchFailure, BatchJob, BatchOutcome, DEADLINE_EXCEEDED, MergedBatch, render_batch};
pub use config::{ConfigError, Settings};
pub use error::LabelError;
pub use fields::{EMPTY_LINE, FieldError, LabelFields, compose};
pub use pipeline::{LabelPipeline, RenderedLabel};

pub use labelpress_executor::Schedule;
pub use labelpress_inventory::{AssetSource, FetchError, HttpAssetSource, InMemoryAssetSource};
pub use labelpress_render::{FontLibrary, IsolatedSessions, SessionProvider};
pub use labelpress_template::TemplateRegistry;
pub use labelpress_types::{
    AssetRecord, CustomFieldMapping, FieldKey, LabelType, OutputFormat, PageSize, RenderedArtifact,
};
