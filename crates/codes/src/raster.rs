use crate::error::CodeError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, GrayImage, ImageEncoder, Luma};

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// A symbol as a grid of dark/light modules, without quiet zone.
#[derive(Debug, Clone)]
pub(crate) struct ModuleGrid {
    width: usize,
    height: usize,
    dark: Vec<bool>,
}

impl ModuleGrid {
    pub(crate) fn new(width: usize, height: usize) -> Self {
        Self { width, height, dark: vec![false; width * height] }
    }

    /// A single-row grid for linear symbologies.
    pub(crate) fn from_bars(bars: &[u8]) -> Self {
        Self {
            width: bars.len(),
            height: 1,
            dark: bars.iter().map(|b| *b != 0).collect(),
        }
    }

    pub(crate) fn set_dark(&mut self, x: usize, y: usize) {
        if x < self.width && y < self.height {
            self.dark[y * self.width + x] = true;
        }
    }

    fn is_dark(&self, x: usize, y: usize) -> bool {
        self.dark[y * self.width + x]
    }

    /// Scales the grid to pixels and surrounds it with a light quiet zone.
    ///
    /// Each module becomes `module_px` wide and `row_px` tall; the quiet zone
    /// is `quiet` modules on every side (horizontally only for one-row grids).
    pub(crate) fn rasterize(&self, module_px: u32, row_px: u32, quiet: u32) -> GrayImage {
        let linear = self.height == 1;
        let quiet_x = quiet * module_px;
        let quiet_y = if linear { 0 } else { quiet * row_px };
        let width = self.width as u32 * module_px + 2 * quiet_x;
        let height = self.height as u32 * row_px + 2 * quiet_y;

        let mut img = GrayImage::from_pixel(width, height, LIGHT);
        for y in 0..self.height {
            for x in 0..self.width {
                if !self.is_dark(x, y) {
                    continue;
                }
                let px = quiet_x + x as u32 * module_px;
                let py = quiet_y + y as u32 * row_px;
                for dy in 0..row_px {
                    for dx in 0..module_px {
                        img.put_pixel(px + dx, py + dy, DARK);
                    }
                }
            }
        }
        img
    }
}

/// A rendered code, PNG-encoded for embedding in label markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeImage {
    width: u32,
    height: u32,
    png: Vec<u8>,
}

impl CodeImage {
    pub(crate) fn encode(img: &GrayImage) -> Result<Self, CodeError> {
        let mut png = Vec::new();
        PngEncoder::new(&mut png).write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            ExtendedColorType::L8,
        )?;
        Ok(Self { width: img.width(), height: img.height(), png })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    /// `data:image/png;base64,...` for use in an `<image src>` attribute.
    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }
}
