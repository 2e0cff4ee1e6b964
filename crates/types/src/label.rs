use serde::{Deserialize, Serialize};
use std::fmt;

/// Pixels per millimetre used for PNG previews (approximately 96 DPI).
pub const PX_PER_MM: f64 = 3.78;

/// Points per millimetre for PDF page geometry.
const PT_PER_MM: f32 = 72.0 / 25.4;

/// The four physical label layouts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelType {
    #[default]
    Default,
    Medium,
    Datamatrix,
    CableFlag,
}

impl LabelType {
    pub const ALL: [LabelType; 4] = [
        LabelType::Default,
        LabelType::Medium,
        LabelType::Datamatrix,
        LabelType::CableFlag,
    ];

    /// Parses an exact identifier. Returns `None` for anything unrecognised.
    pub fn parse(identifier: &str) -> Option<Self> {
        match identifier {
            "default" => Some(Self::Default),
            "medium" => Some(Self::Medium),
            "datamatrix" => Some(Self::Datamatrix),
            "cable_flag" => Some(Self::CableFlag),
            _ => None,
        }
    }

    /// Parses an identifier, falling back to [`LabelType::Default`].
    pub fn resolve(identifier: &str) -> Self {
        Self::parse(identifier).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Medium => "medium",
            Self::Datamatrix => "datamatrix",
            Self::CableFlag => "cable_flag",
        }
    }

    /// Physical size of the label stock.
    pub fn page_size(&self) -> PageSize {
        match self {
            Self::Default => PageSize::new(50.0, 25.0),
            Self::Medium => PageSize::new(40.0, 30.0),
            Self::Datamatrix => PageSize::new(15.0, 15.0),
            Self::CableFlag => PageSize::new(12.0, 40.0),
        }
    }
}

impl fmt::Display for LabelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical label dimensions in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width_mm: f32,
    pub height_mm: f32,
}

impl PageSize {
    pub fn new(width_mm: f32, height_mm: f32) -> Self {
        Self { width_mm, height_mm }
    }

    /// Page size in PDF points.
    pub fn to_points(&self) -> (f32, f32) {
        (self.width_mm * PT_PER_MM, self.height_mm * PT_PER_MM)
    }

    /// Raster viewport for PNG previews: `round(mm * 3.78)` on each axis.
    pub fn to_pixels(&self) -> (u32, u32) {
        (
            (f64::from(self.width_mm) * PX_PER_MM).round() as u32,
            (f64::from(self.height_mm) * PX_PER_MM).round() as u32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_sizes() {
        assert_eq!(LabelType::Default.page_size(), PageSize::new(50.0, 25.0));
        assert_eq!(LabelType::Medium.page_size(), PageSize::new(40.0, 30.0));
        assert_eq!(LabelType::Datamatrix.page_size(), PageSize::new(15.0, 15.0));
        assert_eq!(LabelType::CableFlag.page_size(), PageSize::new(12.0, 40.0));
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        assert_eq!(LabelType::resolve("cable_flag"), LabelType::CableFlag);
        assert_eq!(LabelType::resolve("Medium"), LabelType::Default);
        assert_eq!(LabelType::resolve(""), LabelType::Default);
        assert_eq!(LabelType::parse("giant"), None);
    }

    #[test]
    fn test_pixel_viewport() {
        assert_eq!(LabelType::Default.page_size().to_pixels(), (189, 95));
        assert_eq!(LabelType::Medium.page_size().to_pixels(), (151, 113));
        assert_eq!(LabelType::Datamatrix.page_size().to_pixels(), (57, 57));
        assert_eq!(LabelType::CableFlag.page_size().to_pixels(), (45, 151));
    }

    #[test]
    fn test_points() {
        let (w, h) = LabelType::Default.page_size().to_points();
        assert!((w - 141.732).abs() < 0.01);
        assert!((h - 70.866).abs() < 0.01);
    }
}
