use labelpress_types::LabelType;
use std::fmt;

/// The fixed placeholder vocabulary of label markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Placeholder {
    CompanyName,
    AssetTag,
    AssetName,
    FirstLine,
    SecondLine,
    ThirdLine,
    FourthLine,
    QrCodeImage,
    BarcodeImage,
    DatamatrixImage,
}

const TEXT_LABEL: &[Placeholder] = &[
    Placeholder::CompanyName,
    Placeholder::AssetTag,
    Placeholder::AssetName,
    Placeholder::FirstLine,
    Placeholder::SecondLine,
    Placeholder::ThirdLine,
    Placeholder::FourthLine,
    Placeholder::QrCodeImage,
    Placeholder::BarcodeImage,
];

const DATAMATRIX_LABEL: &[Placeholder] = &[
    Placeholder::CompanyName,
    Placeholder::AssetTag,
    Placeholder::DatamatrixImage,
];

const CABLE_FLAG_LABEL: &[Placeholder] = &[
    Placeholder::CompanyName,
    Placeholder::AssetTag,
    Placeholder::AssetName,
    Placeholder::DatamatrixImage,
];

impl Placeholder {
    pub const COUNT: usize = 10;

    pub const ALL: [Placeholder; Self::COUNT] = [
        Placeholder::CompanyName,
        Placeholder::AssetTag,
        Placeholder::AssetName,
        Placeholder::FirstLine,
        Placeholder::SecondLine,
        Placeholder::ThirdLine,
        Placeholder::FourthLine,
        Placeholder::QrCodeImage,
        Placeholder::BarcodeImage,
        Placeholder::DatamatrixImage,
    ];

    /// Looks up a token name. Names are case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::CompanyName => "company_name",
            Self::AssetTag => "asset_tag",
            Self::AssetName => "asset_name",
            Self::FirstLine => "first_line",
            Self::SecondLine => "second_line",
            Self::ThirdLine => "third_line",
            Self::FourthLine => "fourth_line",
            Self::QrCodeImage => "qr_code_image",
            Self::BarcodeImage => "barcode_image",
            Self::DatamatrixImage => "datamatrix_image",
        }
    }

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }

    /// The placeholders a template of `label_type` must use, and the only ones it may use.
    pub fn required_for(label_type: LabelType) -> &'static [Placeholder] {
        match label_type {
            LabelType::Default | LabelType::Medium => TEXT_LABEL,
            LabelType::Datamatrix => DATAMATRIX_LABEL,
            LabelType::CableFlag => CABLE_FLAG_LABEL,
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{{{}}}}}", self.name())
    }
}

/// Values for one render, keyed by placeholder.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    values: [Option<String>; Placeholder::COUNT],
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, placeholder: Placeholder, value: impl Into<String>) -> &mut Self {
        self.values[placeholder.index()] = Some(value.into());
        self
    }

    pub fn with(mut self, placeholder: Placeholder, value: impl Into<String>) -> Self {
        self.set(placeholder, value);
        self
    }

    pub fn get(&self, placeholder: Placeholder) -> Option<&str> {
        self.values[placeholder.index()].as_deref()
    }
}
