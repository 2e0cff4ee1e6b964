//! The single-label render path shared by the CLI, the batch assembler and
//! the HTTP surface.

use crate::config::{ConfigError, Settings};
use crate::error::LabelError;
use crate::fields;
use crate::filename;
use labelpress_codes::CodeSet;
use labelpress_inventory::{AssetSource, HttpAssetSource};
use labelpress_render::{FontLibrary, IsolatedSessions, SessionLease, SessionProvider};
use labelpress_template::{Bindings, Placeholder, TemplateRegistry};
use labelpress_types::{AssetRecord, LabelType, OutputFormat, RenderedArtifact};
use std::fmt;
use std::sync::Arc;

/// A rendered label plus its suggested download name.
#[derive(Debug, Clone)]
pub struct RenderedLabel {
    pub artifact: RenderedArtifact,
    pub filename: String,
}

/// Fetch, compose, encode and render, for one asset at a time.
///
/// Cloning is cheap; every clone shares the same settings, templates,
/// session provider and asset source.
#[derive(Clone)]
pub struct LabelPipeline {
    settings: Arc<Settings>,
    templates: Arc<TemplateRegistry>,
    sessions: Arc<dyn SessionProvider>,
    source: Arc<dyn AssetSource>,
}

impl LabelPipeline {
    pub fn new(
        settings: Arc<Settings>,
        templates: Arc<TemplateRegistry>,
        sessions: Arc<dyn SessionProvider>,
        source: Arc<dyn AssetSource>,
    ) -> Self {
        Self { settings, templates, sessions, source }
    }

    /// Builds the production pipeline: templates, fonts and the HTTP source.
    ///
    /// Every failure here is fatal at startup.
    pub fn from_settings(settings: Settings) -> Result<Self, ConfigError> {
        let templates = TemplateRegistry::load(&settings.template_source())?;

        let fonts = match &settings.render.font_path {
            Some(path) => FontLibrary::from_file(path)
                .map_err(|source| ConfigError::Font { path: path.clone(), source })?,
            None => FontLibrary::system(),
        };
        let sessions = IsolatedSessions::new(Arc::new(fonts), settings.render_budget());

        let source = HttpAssetSource::new(
            &settings.inventory.base_url,
            &settings.inventory.token,
            settings.fetch_timeout(),
        )?;

        log::info!(
            "Label pipeline ready: inventory at {}, {} batch schedule",
            settings.inventory.base_url,
            settings.schedule()
        );
        Ok(Self::new(
            Arc::new(settings),
            Arc::new(templates),
            Arc::new(sessions),
            Arc::new(source),
        ))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    pub fn source(&self) -> &dyn AssetSource {
        self.source.as_ref()
    }

    /// Resolves a label type identifier; unknown identifiers become `default`.
    pub fn label_type(&self, identifier: &str) -> LabelType {
        self.templates.resolve(identifier).label_type()
    }

    pub async fn fetch(&self, id: u64) -> Result<AssetRecord, LabelError> {
        Ok(self.source.fetch(id).await?)
    }

    /// Renders an already fetched asset.
    ///
    /// Runs inside one leased render session; the session is released
    /// whether code generation, binding or rendering succeeds or not.
    pub fn render_asset(
        &self,
        asset: &AssetRecord,
        label_type: LabelType,
        format: OutputFormat,
    ) -> Result<RenderedArtifact, LabelError> {
        let template = self.templates.get(label_type);
        let label = fields::compose(asset, &self.settings.labels.custom_fields)?;

        let mut session = SessionLease::acquire(self.sessions.as_ref())?;
        let codes = CodeSet::for_label(label_type, asset, &self.settings.inventory.base_url)?;

        let mut bindings = Bindings::new();
        bindings
            .set(Placeholder::CompanyName, self.settings.labels.company_name.as_str())
            .set(Placeholder::AssetTag, label.asset_tag)
            .set(Placeholder::AssetName, label.asset_name)
            .set(Placeholder::FirstLine, label.first_line)
            .set(Placeholder::SecondLine, label.second_line)
            .set(Placeholder::ThirdLine, label.third_line)
            .set(Placeholder::FourthLine, label.fourth_line);
        if let Some(qr) = &codes.qr {
            bindings.set(Placeholder::QrCodeImage, qr.data_uri());
        }
        if let Some(barcode) = &codes.barcode {
            bindings.set(Placeholder::BarcodeImage, barcode.data_uri());
        }
        if let Some(datamatrix) = &codes.datamatrix {
            bindings.set(Placeholder::DatamatrixImage, datamatrix.data_uri());
        }

        let markup = template.bind(&bindings)?;
        Ok(session.render(&markup, template.size(), format)?)
    }

    /// Fetches and renders one asset, resolving the label type identifier.
    pub async fn render_one(
        &self,
        id: u64,
        label_type: &str,
        format: OutputFormat,
    ) -> Result<RenderedLabel, LabelError> {
        self.render_label(id, self.label_type(label_type), format).await
    }

    /// Fetches and renders one asset.
    ///
    /// Rendering is CPU bound and runs on the blocking thread pool.
    pub async fn render_label(
        &self,
        id: u64,
        label_type: LabelType,
        format: OutputFormat,
    ) -> Result<RenderedLabel, LabelError> {
        let asset = self.fetch(id).await?;
        let name = asset.display_name().unwrap_or_default();
        let filename = filename::single(label_type, &asset.asset_tag, name, format);

        let pipeline = self.clone();
        let artifact = tokio::task::spawn_blocking(move || {
            pipeline.render_asset(&asset, label_type, format)
        })
        .await
        .map_err(|e| LabelError::Internal(format!("render task failed: {}", e)))??;

        log::info!("Rendered {} label for asset {} ({} bytes)", label_type, id, artifact.len());
        Ok(RenderedLabel { artifact, filename })
    }
}

impl fmt::Debug for LabelPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelPipeline")
            .field("source", &self.source.name())
            .field("sessions", &self.sessions)
            .field("schedule", &self.settings.schedule())
            .finish()
    }
}
