//! Shared domain types for the labelpress pipeline.
//!
//! Every other crate in the workspace speaks in these types:
//! - [`AssetRecord`]: the read-only inventory record a label is printed for
//! - [`LabelType`] and [`PageSize`]: the four physical label layouts
//! - [`CustomFieldMapping`]: semantic custom-field keys mapped to upstream labels
//! - [`RenderedArtifact`] and [`OutputFormat`]: what a render produces

pub mod artifact;
pub mod asset;
pub mod fields;
pub mod label;

pub use artifact::{OutputFormat, RenderedArtifact};
pub use asset::{AssetRecord, CustomFieldValue, NamedRef};
pub use fields::{CustomFieldMapping, FieldKey};
pub use label::{LabelType, PageSize, PX_PER_MM};
