pub mod fixtures;

use labelpress::{
    FontLibrary, InMemoryAssetSource, IsolatedSessions, LabelPipeline, Settings, TemplateRegistry,
};
use lopdf::Document as LopdfDocument;
use std::sync::Arc;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub const TEST_CONFIG: &str = r#"
    [inventory]
    base_url = "https://inventory.example.com"
    token = "test-token"
    max_assets = 5

    [labels]
    company_name = "Example Corp"

    [labels.custom_fields]
    connector = "Connector"
    connector_2 = "Connector 2"
    storage_size = "Storage"
    functionality = "Functional"
    data_transfer = "Data Transfer"
"#;

/// A pipeline over an in-memory source, plus the session provider so tests
/// can check that every session was released.
pub struct TestPipeline {
    pub pipeline: LabelPipeline,
    pub sessions: Arc<IsolatedSessions>,
}

pub fn pipeline_with(source: InMemoryAssetSource) -> TestPipeline {
    pipeline_with_config(source, TEST_CONFIG)
}

pub fn pipeline_with_config(source: InMemoryAssetSource, toml: &str) -> TestPipeline {
    let settings = Settings::from_toml(toml).expect("test settings");
    let templates = TemplateRegistry::embedded().expect("built-in templates");
    let sessions = Arc::new(IsolatedSessions::new(
        Arc::new(FontLibrary::empty()),
        settings.render_budget(),
    ));
    let pipeline = LabelPipeline::new(
        Arc::new(settings),
        Arc::new(templates),
        sessions.clone(),
        Arc::new(source),
    );
    TestPipeline { pipeline, sessions }
}

/// Wrapper around a rendered PDF with helper methods
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
}

impl GeneratedPdf {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Raw content stream of a 1-based page.
    pub fn page_content(&self, page_number: u32) -> String {
        let page_id = self.doc.get_pages()[&page_number];
        String::from_utf8_lossy(&self.doc.get_page_content(page_id).unwrap_or_default())
            .into_owned()
    }

    /// MediaBox width and height of a 1-based page, in points.
    pub fn page_size(&self, page_number: u32) -> (f32, f32) {
        let page_id = self.doc.get_pages()[&page_number];
        let media_box = self
            .doc
            .get_dictionary(page_id)
            .and_then(|page| page.get(b"MediaBox"))
            .and_then(|b| b.as_array())
            .expect("page has a MediaBox");
        let number = |i: usize| media_box[i].as_float().expect("numeric MediaBox entry");
        (number(2) - number(0), number(3) - number(1))
    }
}
