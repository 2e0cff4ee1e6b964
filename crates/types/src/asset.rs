use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// A `{ id, name }` reference as the inventory API embeds models and categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
}

impl NamedRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self { id: None, name: Some(name.into()) }
    }
}

/// One custom field entry, keyed in [`AssetRecord::custom_fields`] by its display label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFieldValue {
    #[serde(default, deserialize_with = "lenient_string")]
    pub value: Option<String>,
}

impl CustomFieldValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: Some(value.into()) }
    }
}

/// An inventory item as returned by the asset API.
///
/// The record is owned by the upstream service; the pipeline only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub id: u64,
    pub asset_tag: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<NamedRef>,
    #[serde(default)]
    pub category: Option<NamedRef>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub serial: Option<String>,
    #[serde(default, deserialize_with = "lenient_fields")]
    pub custom_fields: BTreeMap<String, CustomFieldValue>,
}

impl AssetRecord {
    pub fn new(id: u64, asset_tag: impl Into<String>) -> Self {
        Self {
            id,
            asset_tag: asset_tag.into(),
            name: None,
            model: None,
            category: None,
            serial: None,
            custom_fields: BTreeMap::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(NamedRef::named(model));
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(NamedRef::named(category));
        self
    }

    pub fn with_serial(mut self, serial: impl Into<String>) -> Self {
        self.serial = Some(serial.into());
        self
    }

    pub fn with_custom_field(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_fields.insert(label.into(), CustomFieldValue::new(value));
        self
    }

    /// The asset's own name when it has one, otherwise its model name.
    pub fn display_name(&self) -> Option<&str> {
        present(self.name.as_deref())
            .or_else(|| present(self.model.as_ref().and_then(|m| m.name.as_deref())))
    }

    pub fn category_name(&self) -> Option<&str> {
        present(self.category.as_ref().and_then(|c| c.name.as_deref()))
    }

    pub fn serial(&self) -> Option<&str> {
        present(self.serial.as_deref())
    }

    /// Looks up a custom field by its upstream display label.
    pub fn custom_field(&self, label: &str) -> Option<&str> {
        present(self.custom_fields.get(label).and_then(|f| f.value.as_deref()))
    }
}

/// Blank strings count as absent throughout the pipeline.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Accepts strings, numbers, booleans or null where the API is loose about types.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Str(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(Option::<Loose>::deserialize(deserializer)?.map(|v| match v {
        Loose::Str(s) => s,
        Loose::Int(i) => i.to_string(),
        Loose::Float(f) => f.to_string(),
        Loose::Bool(b) => b.to_string(),
    }))
}

/// The API sends `[]` instead of `{}` for assets without custom fields.
fn lenient_fields<'de, D>(deserializer: D) -> Result<BTreeMap<String, CustomFieldValue>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Fields {
        Map(BTreeMap<String, CustomFieldValue>),
        List(Vec<CustomFieldValue>),
    }

    Ok(match Option::<Fields>::deserialize(deserializer)? {
        Some(Fields::Map(map)) => map,
        Some(Fields::List(_)) | None => BTreeMap::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_api_payload() {
        let json = r#"{
            "id": 42,
            "asset_tag": "IT-0042",
            "name": "",
            "serial": "SN-1",
            "model": { "id": 7, "name": "ThinkPad T14" },
            "category": { "id": 2, "name": "Laptop" },
            "custom_fields": {
                "Anschluss": { "field": "_snipeit_anschluss_1", "value": "USB-C", "field_format": "ANY" },
                "Datenübertragung": { "field": "_snipeit_daten_2", "value": 1 },
                "Leer": { "field": "_snipeit_leer_3", "value": null }
            }
        }"#;

        let asset: AssetRecord = serde_json::from_str(json).unwrap();
        assert_eq!(asset.id, 42);
        assert_eq!(asset.display_name(), Some("ThinkPad T14"));
        assert_eq!(asset.category_name(), Some("Laptop"));
        assert_eq!(asset.serial(), Some("SN-1"));
        assert_eq!(asset.custom_field("Anschluss"), Some("USB-C"));
        assert_eq!(asset.custom_field("Datenübertragung"), Some("1"));
        assert_eq!(asset.custom_field("Leer"), None);
        assert_eq!(asset.custom_field("Missing"), None);
    }

    #[test]
    fn test_empty_custom_fields_list() {
        let json = r#"{ "id": 1, "asset_tag": "A", "custom_fields": [] }"#;
        let asset: AssetRecord = serde_json::from_str(json).unwrap();
        assert!(asset.custom_fields.is_empty());
        assert_eq!(asset.display_name(), None);
        assert_eq!(asset.category_name(), None);
    }

    #[test]
    fn test_display_name_prefers_name() {
        let asset = AssetRecord::new(1, "A").with_name("Laptop 7").with_model("T14");
        assert_eq!(asset.display_name(), Some("Laptop 7"));

        let blank = AssetRecord::new(1, "A").with_name("   ").with_model("T14");
        assert_eq!(blank.display_name(), Some("T14"));
    }
}
