//! Display text derived from an asset record.

use labelpress_types::{AssetRecord, CustomFieldMapping, FieldKey};
use thiserror::Error;

/// Shown when a composed line has no content.
pub const EMPTY_LINE: &str = "\u{2014}";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("Asset {id} has neither a name nor a model name")]
    MissingDisplayName { id: u64 },

    #[error("Asset {id} has no category")]
    MissingCategory { id: u64 },
}

/// The text lines a label template displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelFields {
    pub asset_tag: String,
    pub asset_name: String,
    pub first_line: String,
    pub second_line: String,
    pub third_line: String,
    pub fourth_line: String,
}

/// Derives the label text for `asset`.
///
/// `first_line` is the category, `second_line` repeats the display name,
/// `third_line` lists hardware details and `fourth_line` identification and
/// status. Empty detail lines become an em dash.
pub fn compose(asset: &AssetRecord, mapping: &CustomFieldMapping) -> Result<LabelFields, FieldError> {
    let display_name = asset
        .display_name()
        .ok_or(FieldError::MissingDisplayName { id: asset.id })?;
    let category = asset
        .category_name()
        .ok_or(FieldError::MissingCategory { id: asset.id })?;

    Ok(LabelFields {
        asset_tag: asset.asset_tag.clone(),
        asset_name: display_name.to_string(),
        first_line: category.to_string(),
        second_line: display_name.to_string(),
        third_line: or_empty(third_line(asset, mapping)),
        fourth_line: or_empty(fourth_line(asset, mapping)),
    })
}

fn third_line(asset: &AssetRecord, mapping: &CustomFieldMapping) -> Vec<String> {
    let field = |key| mapping.lookup(asset, key);
    let mut parts = Vec::new();

    if let (Some(first), Some(second)) = (field(FieldKey::Connector), field(FieldKey::Connector2)) {
        parts.push(format!("{} | {}", first, second));
    }
    for key in [FieldKey::StorageSize, FieldKey::BatteryChemistry, FieldKey::BatterySize] {
        if let Some(value) = field(key) {
            parts.push(value.to_string());
        }
    }
    parts
}

fn fourth_line(asset: &AssetRecord, mapping: &CustomFieldMapping) -> Vec<String> {
    let mut parts = Vec::new();
    let serial = asset.serial();

    if let Some(serial) = serial {
        parts.push(format!("S/N: {}", serial));
    }
    match mapping.lookup(asset, FieldKey::DataTransfer) {
        Some("1") => parts.push("Data Transfer: Yes".to_string()),
        Some("0") => parts.push("Data Transfer: No".to_string()),
        _ => {}
    }
    let working = mapping.lookup(asset, FieldKey::Functionality) == Some(mapping.working_value.as_str());
    if working && serial.is_none() {
        parts.push("Working".to_string());
    }
    parts
}

fn or_empty(parts: Vec<String>) -> String {
    if parts.is_empty() { EMPTY_LINE.to_string() } else { parts.join(" ") }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> CustomFieldMapping {
        CustomFieldMapping::default()
            .with_label(FieldKey::Connector, "Connector")
            .with_label(FieldKey::Connector2, "Connector 2")
            .with_label(FieldKey::StorageSize, "Storage")
            .with_label(FieldKey::Functionality, "Functional")
            .with_label(FieldKey::BatteryChemistry, "Battery Type")
            .with_label(FieldKey::BatterySize, "Battery Size")
            .with_label(FieldKey::DataTransfer, "Data Transfer")
    }

    fn laptop() -> AssetRecord {
        AssetRecord::new(42, "IT-0042").with_model("ThinkPad T14").with_category("Laptops")
    }

    #[test]
    fn test_name_falls_back_to_model() {
        let fields = compose(&laptop(), &mapping()).unwrap();
        assert_eq!(fields.asset_name, "ThinkPad T14");
        assert_eq!(fields.second_line, "ThinkPad T14");
        assert_eq!(fields.first_line, "Laptops");

        let named = laptop().with_name("Reception laptop");
        assert_eq!(compose(&named, &mapping()).unwrap().asset_name, "Reception laptop");

        let blank = laptop().with_name("   ");
        assert_eq!(compose(&blank, &mapping()).unwrap().asset_name, "ThinkPad T14");
    }

    #[test]
    fn test_missing_display_name_and_category() {
        let nameless = AssetRecord::new(1, "X").with_category("Cables");
        assert_eq!(compose(&nameless, &mapping()), Err(FieldError::MissingDisplayName { id: 1 }));

        let uncategorized = AssetRecord::new(2, "Y").with_name("Thing");
        assert_eq!(compose(&uncategorized, &mapping()), Err(FieldError::MissingCategory { id: 2 }));
    }

    #[test]
    fn test_third_line_connector_pair_and_storage() {
        let asset = laptop()
            .with_custom_field("Connector", "USB-C")
            .with_custom_field("Connector 2", "HDMI")
            .with_custom_field("Storage", "512GB");
        assert_eq!(compose(&asset, &mapping()).unwrap().third_line, "USB-C | HDMI 512GB");
    }

    #[test]
    fn test_third_line_literal_cases() {
        let storage_only = laptop().with_custom_field("Storage", "64GB");
        assert_eq!(compose(&storage_only, &mapping()).unwrap().third_line, "64GB");

        let connectors = laptop()
            .with_custom_field("Connector", "A")
            .with_custom_field("Connector 2", "B")
            .with_custom_field("Storage", "64GB");
        let third_line = compose(&connectors, &mapping()).unwrap().third_line;
        assert!(third_line.starts_with("A | B "));
        assert_eq!(third_line, "A | B 64GB");
    }

    #[test]
    fn test_third_line_needs_both_connectors() {
        let asset = laptop()
            .with_custom_field("Connector", "USB-C")
            .with_custom_field("Battery Type", "Li-Ion")
            .with_custom_field("Battery Size", "57Wh");
        assert_eq!(compose(&asset, &mapping()).unwrap().third_line, "Li-Ion 57Wh");
    }

    #[test]
    fn test_empty_lines_are_em_dash() {
        let fields = compose(&laptop(), &mapping()).unwrap();
        assert_eq!(fields.third_line, "\u{2014}");
        assert_eq!(fields.fourth_line, "\u{2014}");
    }

    #[test]
    fn test_fourth_line_serial_suppresses_working() {
        let asset = laptop()
            .with_serial("ABC123")
            .with_custom_field("Data Transfer", "1")
            .with_custom_field("Functional", "Working");
        assert_eq!(compose(&asset, &mapping()).unwrap().fourth_line, "S/N: ABC123 Data Transfer: Yes");
    }

    #[test]
    fn test_fourth_line_working_without_serial() {
        let asset = laptop()
            .with_custom_field("Data Transfer", "0")
            .with_custom_field("Functional", "Working");
        assert_eq!(compose(&asset, &mapping()).unwrap().fourth_line, "Data Transfer: No Working");
    }

    #[test]
    fn test_fourth_line_ignores_other_values() {
        let asset = laptop()
            .with_custom_field("Data Transfer", "yes")
            .with_custom_field("Functional", "working");
        assert_eq!(compose(&asset, &mapping()).unwrap().fourth_line, "\u{2014}");
    }

    #[test]
    fn test_configured_working_value() {
        let mut mapping = mapping();
        mapping.working_value = "OK".to_string();
        let asset = laptop().with_custom_field("Functional", "OK");
        assert_eq!(compose(&asset, &mapping).unwrap().fourth_line, "Working");
    }

    #[test]
    fn test_unmapped_keys_are_absent() {
        let asset = laptop()
            .with_custom_field("Connector", "USB-C")
            .with_custom_field("Connector 2", "HDMI")
            .with_custom_field("Storage", "1TB");
        let fields = compose(&asset, &CustomFieldMapping::default()).unwrap();
        assert_eq!(fields.third_line, "\u{2014}");
    }
}
