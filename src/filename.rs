//! Suggested download names for rendered labels.

use chrono::{DateTime, Utc};
use labelpress_types::{LabelType, OutputFormat};

const NAME_LIMIT: usize = 30;

/// Replaces every character that is not ASCII alphanumeric with `_`.
pub fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// `label_<type>_<tag>_<name>.<ext>`, with the name cut to 30 characters.
pub fn single(label_type: LabelType, asset_tag: &str, asset_name: &str, format: OutputFormat) -> String {
    let name: String = sanitize(asset_name).chars().take(NAME_LIMIT).collect();
    format!("label_{}_{}_{}.{}", label_type, sanitize(asset_tag), name, format.extension())
}

/// `labels_<type>_<count>_<timestamp>.pdf`, where `count` is the number of
/// requested ids and the timestamp is UTC without colons.
pub fn batch(label_type: LabelType, count: usize, at: DateTime<Utc>) -> String {
    let stamp = at.format("%Y-%m-%dT%H:%M:%S").to_string().replace(':', "");
    format!("labels_{}_{}_{}.pdf", label_type, count, stamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("IT-0042"), "IT_0042");
        assert_eq!(sanitize("Café 5/7"), "Caf__5_7");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_single_filename() {
        assert_eq!(
            single(LabelType::Default, "IT-0042", "ThinkPad T14", OutputFormat::Pdf),
            "label_default_IT_0042_ThinkPad_T14.pdf"
        );
        assert_eq!(
            single(LabelType::CableFlag, "C1", "USB", OutputFormat::Png),
            "label_cable_flag_C1_USB.png"
        );
    }

    #[test]
    fn test_single_filename_truncates_name() {
        let name = "A very long asset name that keeps going";
        let filename = single(LabelType::Medium, "T", name, OutputFormat::Pdf);
        assert_eq!(filename, "label_medium_T_A_very_long_asset_name_that_ke.pdf");
    }

    #[test]
    fn test_batch_filename() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(batch(LabelType::Default, 12, at), "labels_default_12_2024-03-09T140507.pdf");
    }
}
