use crate::error::TemplateError;
use crate::markup::CompiledMarkup;
use crate::placeholder::{Bindings, Placeholder};
use labelpress_types::{LabelType, PageSize};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_MARKUP: &str = include_str!("../assets/default.xml");
const MEDIUM_MARKUP: &str = include_str!("../assets/medium.xml");
const DATAMATRIX_MARKUP: &str = include_str!("../assets/datamatrix.xml");
const CABLE_FLAG_MARKUP: &str = include_str!("../assets/cable_flag.xml");

/// Where template markup is read from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TemplateSource {
    /// The four layouts compiled into the binary.
    #[default]
    Embedded,
    /// A directory holding `<identifier>.xml` for each label type.
    Directory(PathBuf),
}

/// Compiled markup plus the physical size of one label type.
#[derive(Debug, Clone)]
pub struct TemplateSpec {
    label_type: LabelType,
    markup: CompiledMarkup,
    size: PageSize,
}

impl TemplateSpec {
    /// Compiles `source` and checks it uses exactly the placeholders `label_type` allows.
    pub fn new(label_type: LabelType, source: &str) -> Result<Self, TemplateError> {
        let markup = CompiledMarkup::compile(source)?;
        let allowed = Placeholder::required_for(label_type);
        let used = markup.placeholders();

        if let Some(placeholder) = used.iter().find(|p| !allowed.contains(*p)) {
            return Err(TemplateError::Disallowed { label_type, placeholder: *placeholder });
        }
        if let Some(placeholder) = allowed.iter().find(|p| !used.contains(*p)) {
            return Err(TemplateError::MissingPlaceholder { label_type, placeholder: *placeholder });
        }

        Ok(Self { label_type, markup, size: label_type.page_size() })
    }

    pub fn label_type(&self) -> LabelType {
        self.label_type
    }

    pub fn size(&self) -> PageSize {
        self.size
    }

    pub fn placeholders(&self) -> &'static [Placeholder] {
        Placeholder::required_for(self.label_type)
    }

    pub fn bind(&self, bindings: &Bindings) -> Result<String, TemplateError> {
        self.markup.bind(bindings)
    }
}

/// Holds one compiled [`TemplateSpec`] per label type.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    default: TemplateSpec,
    medium: TemplateSpec,
    datamatrix: TemplateSpec,
    cable_flag: TemplateSpec,
}

impl TemplateRegistry {
    /// Loads and compiles all four templates. Any failure rejects the whole registry.
    pub fn load(source: &TemplateSource) -> Result<Self, TemplateError> {
        match source {
            TemplateSource::Embedded => Self::embedded(),
            TemplateSource::Directory(dir) => Self::from_dir(dir),
        }
    }

    pub fn embedded() -> Result<Self, TemplateError> {
        Ok(Self {
            default: TemplateSpec::new(LabelType::Default, DEFAULT_MARKUP)?,
            medium: TemplateSpec::new(LabelType::Medium, MEDIUM_MARKUP)?,
            datamatrix: TemplateSpec::new(LabelType::Datamatrix, DATAMATRIX_MARKUP)?,
            cable_flag: TemplateSpec::new(LabelType::CableFlag, CABLE_FLAG_MARKUP)?,
        })
    }

    pub fn from_dir(dir: &Path) -> Result<Self, TemplateError> {
        let load = |label_type: LabelType| -> Result<TemplateSpec, TemplateError> {
            let path = dir.join(format!("{}.xml", label_type.as_str()));
            log::debug!("Loading '{}' template from {}", label_type, path.display());
            let source = fs::read_to_string(&path).map_err(|source| TemplateError::Io {
                path: path.clone(),
                source,
            })?;
            TemplateSpec::new(label_type, &source)
        };

        let registry = Self {
            default: load(LabelType::Default)?,
            medium: load(LabelType::Medium)?,
            datamatrix: load(LabelType::Datamatrix)?,
            cable_flag: load(LabelType::CableFlag)?,
        };
        log::info!("Loaded label templates from {}", dir.display());
        Ok(registry)
    }

    pub fn get(&self, label_type: LabelType) -> &TemplateSpec {
        match label_type {
            LabelType::Default => &self.default,
            LabelType::Medium => &self.medium,
            LabelType::Datamatrix => &self.datamatrix,
            LabelType::CableFlag => &self.cable_flag,
        }
    }

    /// Resolves a label-type identifier; unknown identifiers get the default layout.
    pub fn resolve(&self, identifier: &str) -> &TemplateSpec {
        let label_type = LabelType::parse(identifier).unwrap_or_else(|| {
            log::debug!("Unknown label type '{}', using default", identifier);
            LabelType::Default
        });
        self.get(label_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TemplateSpec> {
        LabelType::ALL.into_iter().map(|t| self.get(t))
    }
}
