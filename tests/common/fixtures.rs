use labelpress::{AssetRecord, InMemoryAssetSource};

/// A laptop asset with every field the default layout shows.
pub fn laptop(id: u64, tag: &str) -> AssetRecord {
    AssetRecord::new(id, tag)
        .with_name(format!("Laptop {}", id))
        .with_model("ThinkPad T14")
        .with_category("Laptops")
        .with_serial(format!("SN{:04}", id))
        .with_custom_field("Connector", "USB-C")
        .with_custom_field("Connector 2", "HDMI")
        .with_custom_field("Storage", "512GB")
        .with_custom_field("Data Transfer", "1")
}

/// A cable with neither serial nor storage.
pub fn cable(id: u64, tag: &str) -> AssetRecord {
    AssetRecord::new(id, tag)
        .with_model("USB-C Cable")
        .with_category("Cables")
        .with_custom_field("Functional", "Working")
}

/// Assets 1, 2 and 3 exist; 2 has no category and cannot be labelled.
pub fn three_assets() -> InMemoryAssetSource {
    InMemoryAssetSource::new()
        .with_asset(laptop(1, "A-1"))
        .with_asset(AssetRecord::new(2, "A-2").with_name("Uncategorized"))
        .with_asset(cable(3, "A-3"))
}
