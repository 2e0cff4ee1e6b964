use crate::asset::AssetRecord;
use serde::{Deserialize, Serialize};

/// The semantic custom fields a label can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Connector,
    Connector2,
    StorageSize,
    Functionality,
    BatteryChemistry,
    BatterySize,
    DataTransfer,
}

impl FieldKey {
    pub const ALL: [FieldKey; 7] = [
        FieldKey::Connector,
        FieldKey::Connector2,
        FieldKey::StorageSize,
        FieldKey::Functionality,
        FieldKey::BatteryChemistry,
        FieldKey::BatterySize,
        FieldKey::DataTransfer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connector => "connector",
            Self::Connector2 => "connector_2",
            Self::StorageSize => "storage_size",
            Self::Functionality => "functionality",
            Self::BatteryChemistry => "battery_chemistry",
            Self::BatterySize => "battery_size",
            Self::DataTransfer => "data_transfer",
        }
    }
}

fn default_working_value() -> String {
    "Working".to_string()
}

/// Maps semantic field keys to the custom-field labels used by the inventory.
///
/// Loaded once from configuration. Keys without a label are unmapped and
/// always read as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFieldMapping {
    #[serde(default)]
    pub connector: Option<String>,
    #[serde(default)]
    pub connector_2: Option<String>,
    #[serde(default)]
    pub storage_size: Option<String>,
    #[serde(default)]
    pub functionality: Option<String>,
    #[serde(default)]
    pub battery_chemistry: Option<String>,
    #[serde(default)]
    pub battery_size: Option<String>,
    #[serde(default)]
    pub data_transfer: Option<String>,
    /// The `functionality` value that marks an asset as operational.
    #[serde(default = "default_working_value")]
    pub working_value: String,
}

impl Default for CustomFieldMapping {
    fn default() -> Self {
        Self {
            connector: None,
            connector_2: None,
            storage_size: None,
            functionality: None,
            battery_chemistry: None,
            battery_size: None,
            data_transfer: None,
            working_value: default_working_value(),
        }
    }
}

impl CustomFieldMapping {
    /// The upstream label configured for `key`, if any.
    pub fn label(&self, key: FieldKey) -> Option<&str> {
        let label = match key {
            FieldKey::Connector => &self.connector,
            FieldKey::Connector2 => &self.connector_2,
            FieldKey::StorageSize => &self.storage_size,
            FieldKey::Functionality => &self.functionality,
            FieldKey::BatteryChemistry => &self.battery_chemistry,
            FieldKey::BatterySize => &self.battery_size,
            FieldKey::DataTransfer => &self.data_transfer,
        };
        label.as_deref().filter(|l| !l.is_empty())
    }

    /// Reads the value of `key` from `asset`; unmapped keys are absent.
    pub fn lookup<'a>(&self, asset: &'a AssetRecord, key: FieldKey) -> Option<&'a str> {
        self.label(key).and_then(|label| asset.custom_field(label))
    }

    pub fn with_label(mut self, key: FieldKey, label: impl Into<String>) -> Self {
        let label = Some(label.into());
        match key {
            FieldKey::Connector => self.connector = label,
            FieldKey::Connector2 => self.connector_2 = label,
            FieldKey::StorageSize => self.storage_size = label,
            FieldKey::Functionality => self.functionality = label,
            FieldKey::BatteryChemistry => self.battery_chemistry = label,
            FieldKey::BatterySize => self.battery_size = label,
            FieldKey::DataTransfer => self.data_transfer = label,
        }
        self
    }
}
