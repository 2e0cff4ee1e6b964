use crate::label::PageSize;
use serde::{Deserialize, Serialize};

/// The two artifact kinds a render can produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pdf,
    Png,
}

impl OutputFormat {
    pub fn media_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Png => "image/png",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Png => "png",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Chooses the output for an HTTP `Accept` value.
    ///
    /// An image preference (`image/png` or `image/*`) selects PNG unless
    /// `application/pdf` is listed before it. Everything else gets PDF.
    pub fn negotiate(accept: Option<&str>) -> Self {
        let Some(accept) = accept else {
            return Self::Pdf;
        };
        let mut pdf_at = None;
        let mut image_at = None;
        for (index, range) in accept.split(',').enumerate() {
            let media = range.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
            match media.as_str() {
                "application/pdf" => {
                    pdf_at.get_or_insert(index);
                }
                "image/png" | "image/*" => {
                    image_at.get_or_insert(index);
                }
                _ => {}
            }
        }
        match (image_at, pdf_at) {
            (Some(image), Some(pdf)) if pdf < image => Self::Pdf,
            (Some(_), _) => Self::Png,
            _ => Self::Pdf,
        }
    }
}

/// One produced label document or preview image.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedArtifact {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    /// Physical size the artifact was produced for.
    pub size: PageSize,
    /// Raster dimensions, set for PNG output only.
    pub pixels: Option<(u32, u32)>,
}

impl RenderedArtifact {
    pub fn pdf(bytes: Vec<u8>, size: PageSize) -> Self {
        Self { bytes, format: OutputFormat::Pdf, size, pixels: None }
    }

    pub fn png(bytes: Vec<u8>, size: PageSize, pixels: (u32, u32)) -> Self {
        Self { bytes, format: OutputFormat::Png, size, pixels: Some(pixels) }
    }

    pub fn media_type(&self) -> &'static str {
        self.format.media_type()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negotiate() {
        assert_eq!(OutputFormat::negotiate(None), OutputFormat::Pdf);
        assert_eq!(OutputFormat::negotiate(Some("*/*")), OutputFormat::Pdf);
        assert_eq!(OutputFormat::negotiate(Some("image/png")), OutputFormat::Png);
        assert_eq!(
            OutputFormat::negotiate(Some("image/avif,image/webp,image/*;q=0.8,*/*;q=0.5")),
            OutputFormat::Png
        );
        assert_eq!(
            OutputFormat::negotiate(Some("application/pdf, image/png")),
            OutputFormat::Pdf
        );
        assert_eq!(
            OutputFormat::negotiate(Some("text/html,application/xhtml+xml")),
            OutputFormat::Pdf
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!(OutputFormat::parse("PNG"), Some(OutputFormat::Png));
        assert_eq!(OutputFormat::parse("pdf"), Some(OutputFormat::Pdf));
        assert_eq!(OutputFormat::parse("gif"), None);
    }
}
