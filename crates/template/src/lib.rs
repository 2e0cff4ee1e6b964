//! Label templates for labelpress.
//!
//! - **`TemplateRegistry`**: one compiled [`TemplateSpec`] per label type,
//!   resolved by identifier with a fallback to `default`
//! - **`CompiledMarkup`**: markup split into literal text and typed
//!   [`Placeholder`] slots, validated when the template is loaded
//! - **`Bindings`**: the per-render values substituted in a single pass

mod error;
mod markup;
mod placeholder;
mod registry;

pub use error::TemplateError;
pub use markup::CompiledMarkup;
pub use placeholder::{Bindings, Placeholder};
pub use registry::{TemplateRegistry, TemplateSource, TemplateSpec};
