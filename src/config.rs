//! Process configuration, read once at boot.
//!
//! Sources, lowest precedence first:
//! 1. `config/default.toml` (or the file named by `LABELPRESS_CONFIG`)
//! 2. `LABELPRESS__SECTION__KEY` environment variables

use labelpress_executor::Schedule;
use labelpress_inventory::FetchError;
use labelpress_template::{TemplateError, TemplateSource};
use labelpress_types::CustomFieldMapping;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("inventory.token is not set (use LABELPRESS__INVENTORY__TOKEN)")]
    MissingToken,

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Could not load label templates: {0}")]
    Templates(#[from] TemplateError),

    #[error("Could not load font {path}: {source}")]
    Font {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not create the inventory client: {0}")]
    Inventory(#[from] FetchError),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub inventory: InventorySettings,
    #[serde(default)]
    pub labels: LabelSettings,
    #[serde(default)]
    pub render: RenderSettings,
    #[serde(default)]
    pub batch: BatchSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InventorySettings {
    pub base_url: String,
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Upper bound on ids per batch request.
    #[serde(default = "default_max_assets")]
    pub max_assets: usize,
}

impl Default for InventorySettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost".to_string(),
            token: String::new(),
            timeout_secs: default_timeout_secs(),
            max_assets: default_max_assets(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LabelSettings {
    #[serde(default)]
    pub company_name: String,
    /// Directory of `<label_type>.xml` overrides; built-in templates otherwise.
    #[serde(default)]
    pub template_dir: Option<PathBuf>,
    #[serde(default)]
    pub custom_fields: CustomFieldMapping,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenderSettings {
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Font file for PNG previews; system fonts are searched when unset.
    #[serde(default)]
    pub font_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchSettings {
    /// Assets processed at once; 1 means sequential.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default)]
    pub deadline_secs: Option<u64>,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self { concurrency: default_concurrency(), deadline_secs: None }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_assets() -> usize {
    100
}

fn default_concurrency() -> usize {
    1
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

const CONFIG_ENV: &str = "LABELPRESS_CONFIG";
const DEFAULT_CONFIG: &str = "config/default";

impl Settings {
    /// Loads and validates settings from the config file and environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        let path = std::env::var(CONFIG_ENV)
            .ok()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_CONFIG.to_string());
        if Path::new(&format!("{}.toml", path)).exists() || Path::new(&path).exists() {
            log::debug!("Reading configuration from {}", path);
            builder = builder.add_source(config::File::with_name(&path));
        } else {
            log::debug!("No configuration file at {}, using defaults and environment", path);
        }

        builder = builder.add_source(
            config::Environment::with_prefix("LABELPRESS")
                .prefix_separator("__")
                .separator("__"),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parses and validates settings from TOML text.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let settings: Settings = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.inventory.token.trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }
        if self.inventory.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("inventory.base_url must not be empty".to_string()));
        }
        if self.inventory.max_assets == 0 {
            return Err(ConfigError::Invalid("inventory.max_assets must be at least 1".to_string()));
        }
        if self.inventory.timeout_secs == 0 {
            return Err(ConfigError::Invalid("inventory.timeout_secs must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.inventory.timeout_secs)
    }

    pub fn render_budget(&self) -> Option<Duration> {
        self.render.timeout_ms.map(Duration::from_millis)
    }

    pub fn batch_deadline(&self) -> Option<Duration> {
        self.batch.deadline_secs.map(Duration::from_secs)
    }

    pub fn schedule(&self) -> Schedule {
        Schedule::bounded(self.batch.concurrency)
    }

    pub fn template_source(&self) -> TemplateSource {
        match &self.labels.template_dir {
            Some(dir) => TemplateSource::Directory(dir.clone()),
            None => TemplateSource::Embedded,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
