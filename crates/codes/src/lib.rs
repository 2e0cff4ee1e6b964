//! Machine-readable codes for labelpress labels.
//!
//! Three symbologies are produced as grayscale PNG rasters and handed to
//! templates as data URIs:
//!
//! - QR: the asset's deep link, on `default` and `medium` labels
//! - Code 128: the numeric asset id, on `default` and `medium` labels
//! - DataMatrix: the asset tag, on `datamatrix` and `cable_flag` labels

mod error;
mod raster;
mod symbology;

pub use error::CodeError;
pub use raster::CodeImage;
pub use symbology::{
    BAR_HEIGHT_PX, DEFAULT_MAGNIFICATION, SOLE_DATAMATRIX_MAGNIFICATION, Symbology, code128,
    datamatrix, qr_code,
};

use labelpress_types::{AssetRecord, LabelType};

/// Deep link into the inventory web UI for an asset.
pub fn hardware_url(base_url: &str, asset_id: u64) -> String {
    format!("{}/hardware/{}", base_url.trim_end_matches('/'), asset_id)
}

/// The code images one label needs.
#[derive(Debug, Clone, Default)]
pub struct CodeSet {
    pub qr: Option<CodeImage>,
    pub barcode: Option<CodeImage>,
    pub datamatrix: Option<CodeImage>,
}

impl CodeSet {
    /// Generates exactly the codes `label_type` embeds.
    pub fn for_label(
        label_type: LabelType,
        asset: &AssetRecord,
        base_url: &str,
    ) -> Result<Self, CodeError> {
        let set = match label_type {
            LabelType::Default | LabelType::Medium => Self {
                qr: Some(qr_code(&hardware_url(base_url, asset.id), DEFAULT_MAGNIFICATION)?),
                barcode: Some(code128(&asset.id.to_string(), DEFAULT_MAGNIFICATION)?),
                datamatrix: None,
            },
            LabelType::Datamatrix => Self {
                datamatrix: Some(datamatrix(&asset.asset_tag, SOLE_DATAMATRIX_MAGNIFICATION)?),
                ..Self::default()
            },
            LabelType::CableFlag => Self {
                datamatrix: Some(datamatrix(&asset.asset_tag, DEFAULT_MAGNIFICATION)?),
                ..Self::default()
            },
        };
        log::debug!("Generated codes for asset {} ({} label)", asset.id, label_type);
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hardware_url_trims_trailing_slash() {
        assert_eq!(
            hardware_url("https://inv.example.com/", 17),
            "https://inv.example.com/hardware/17"
        );
        assert_eq!(hardware_url("http://inv", 3), "http://inv/hardware/3");
    }

    #[test]
    fn test_code_set_per_label_type() {
        let asset = AssetRecord::new(42, "IT-0042");

        let default = CodeSet::for_label(LabelType::Default, &asset, "http://inv").unwrap();
        assert!(default.qr.is_some() && default.barcode.is_some());
        assert!(default.datamatrix.is_none());

        let sole = CodeSet::for_label(LabelType::Datamatrix, &asset, "http://inv").unwrap();
        let paired = CodeSet::for_label(LabelType::CableFlag, &asset, "http://inv").unwrap();
        assert!(sole.qr.is_none() && sole.barcode.is_none());
        let sole = sole.datamatrix.unwrap();
        let paired = paired.datamatrix.unwrap();
        assert_eq!(sole.width() / SOLE_DATAMATRIX_MAGNIFICATION, paired.width() / DEFAULT_MAGNIFICATION);
    }

    #[test]
    fn test_empty_asset_tag_fails_datamatrix_labels_only() {
        let asset = AssetRecord::new(7, "");
        assert!(CodeSet::for_label(LabelType::Default, &asset, "http://inv").is_ok());
        assert!(matches!(
            CodeSet::for_label(LabelType::CableFlag, &asset, "http://inv"),
            Err(CodeError::EmptyPayload(Symbology::DataMatrix))
        ));
    }
}
