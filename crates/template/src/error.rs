use crate::placeholder::Placeholder;
use labelpress_types::LabelType;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, compiling or binding label templates.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Failed to read template '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unterminated placeholder at byte {offset}")]
    Unterminated { offset: usize },

    #[error("Unknown placeholder '{{{{{name}}}}}'")]
    UnknownPlaceholder { name: String },

    #[error("Placeholder {placeholder} is not allowed in '{label_type}' templates")]
    Disallowed { label_type: LabelType, placeholder: Placeholder },

    #[error("Template '{label_type}' is missing required placeholder {placeholder}")]
    MissingPlaceholder { label_type: LabelType, placeholder: Placeholder },

    #[error("No value bound for {0}")]
    Unbound(Placeholder),
}
