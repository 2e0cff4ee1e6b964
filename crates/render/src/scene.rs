//! Parsed label markup.
//!
//! A label is a `<label>` root holding absolutely positioned `<rect>`,
//! `<text>` and `<image>` elements. All coordinates are millimetres from the
//! top-left corner of the page; font sizes are points.

use crate::color::Color;
use crate::error::RenderError;
use crate::metrics::{FittedText, MM_PER_PT, fit_text};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::DynamicImage;
use roxmltree::Node;

/// Ratio of the baseline offset to the font size, measured from the top of
/// the text line.
pub const BASELINE_RATIO: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub size_pt: f32,
    pub min_size_pt: f32,
    pub bold: bool,
    pub align: Align,
    pub color: Color,
    pub content: String,
}

impl TextBox {
    /// Fits the content into the box width.
    pub fn fit(&self) -> FittedText {
        fit_text(&self.content, self.width, self.size_pt, self.min_size_pt, self.bold)
    }

    /// Horizontal offset of a line `line_width` mm wide inside the box.
    pub fn align_offset(&self, line_width: f32) -> f32 {
        let slack = (self.width - line_width).max(0.0);
        match self.align {
            Align::Left => 0.0,
            Align::Center => slack / 2.0,
            Align::Right => slack,
        }
    }

    /// Distance from the top of the page to the baseline, in mm.
    pub fn baseline_mm(&self, size_pt: f32) -> f32 {
        self.y + size_pt * MM_PER_PT * BASELINE_RATIO
    }
}

#[derive(Debug, Clone)]
pub struct ImageBox {
    pub frame: Frame,
    pub image: DynamicImage,
}

impl ImageBox {
    /// The area the image is drawn into, centred in its frame with the
    /// aspect ratio preserved.
    pub fn placement(&self) -> Frame {
        let (iw, ih) = (self.image.width() as f32, self.image.height() as f32);
        let scale = (self.frame.width / iw).min(self.frame.height / ih);
        let (w, h) = (iw * scale, ih * scale);
        Frame {
            x: self.frame.x + (self.frame.width - w) / 2.0,
            y: self.frame.y + (self.frame.height - h) / 2.0,
            width: w,
            height: h,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Element {
    Rect { frame: Frame, fill: Color },
    Text(TextBox),
    Image(ImageBox),
}

#[derive(Debug, Clone)]
pub struct LabelScene {
    pub background: Color,
    pub elements: Vec<Element>,
}

impl LabelScene {
    pub fn parse(markup: &str) -> Result<Self, RenderError> {
        let doc = roxmltree::Document::parse(markup)?;
        let root = doc.root_element();
        if root.tag_name().name() != "label" {
            return Err(RenderError::markup(format!(
                "Root element must be <label>, found <{}>",
                root.tag_name().name()
            )));
        }

        let background = match root.attribute("background") {
            Some(value) => color(value)?,
            None => Color::WHITE,
        };

        let mut elements = Vec::new();
        for node in root.children().filter(Node::is_element) {
            let element = match node.tag_name().name() {
                "rect" => Element::Rect {
                    frame: frame(&node)?,
                    fill: optional(&node, "fill", color)?.unwrap_or(Color::BLACK),
                },
                "text" => Element::Text(text_box(&node)?),
                "image" => Element::Image(image_box(&node)?),
                other => {
                    return Err(RenderError::markup(format!("Unknown element <{}>", other)));
                }
            };
            elements.push(element);
        }

        Ok(Self { background, elements })
    }
}

fn color(value: &str) -> Result<Color, RenderError> {
    Color::parse(value).map_err(RenderError::Markup)
}

fn length(value: &str) -> Result<f32, RenderError> {
    let trimmed = value.trim();
    let number = trimmed.strip_suffix("mm").or_else(|| trimmed.strip_suffix("pt")).unwrap_or(trimmed);
    number
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|n| n.is_finite() && *n >= 0.0)
        .ok_or_else(|| RenderError::markup(format!("Invalid length '{}'", value)))
}

fn optional<T>(
    node: &Node,
    name: &str,
    parse: impl Fn(&str) -> Result<T, RenderError>,
) -> Result<Option<T>, RenderError> {
    node.attribute(name).map(parse).transpose()
}

fn required(node: &Node, name: &str) -> Result<f32, RenderError> {
    let value = node.attribute(name).ok_or_else(|| {
        RenderError::markup(format!(
            "<{}> is missing required attribute '{}'",
            node.tag_name().name(),
            name
        ))
    })?;
    length(value)
}

fn frame(node: &Node) -> Result<Frame, RenderError> {
    Ok(Frame {
        x: required(node, "x")?,
        y: required(node, "y")?,
        width: required(node, "width")?,
        height: required(node, "height")?,
    })
}

fn text_box(node: &Node) -> Result<TextBox, RenderError> {
    let size_pt = required(node, "size")?;
    let min_size_pt = optional(node, "min-size", length)?.unwrap_or(size_pt);
    let bold = match node.attribute("weight") {
        None | Some("normal") => false,
        Some("bold") => true,
        Some(other) => return Err(RenderError::markup(format!("Unknown weight '{}'", other))),
    };
    let align = match node.attribute("align") {
        None | Some("left") => Align::Left,
        Some("center") => Align::Center,
        Some("right") => Align::Right,
        Some(other) => return Err(RenderError::markup(format!("Unknown alignment '{}'", other))),
    };

    // Whitespace collapses as in HTML text.
    let raw: String = node.descendants().filter(Node::is_text).filter_map(|n| n.text()).collect();
    let content = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    Ok(TextBox {
        x: required(node, "x")?,
        y: required(node, "y")?,
        width: required(node, "width")?,
        size_pt,
        min_size_pt,
        bold,
        align,
        color: optional(node, "color", color)?.unwrap_or(Color::BLACK),
        content,
    })
}

fn image_box(node: &Node) -> Result<ImageBox, RenderError> {
    let src = node
        .attribute("src")
        .ok_or_else(|| RenderError::markup("<image> is missing required attribute 'src'"))?;
    Ok(ImageBox { frame: frame(node)?, image: decode_data_uri(src)? })
}

/// Decodes a base64 `data:` URI. Remote sources are never fetched.
pub fn decode_data_uri(src: &str) -> Result<DynamicImage, RenderError> {
    let rest = src
        .strip_prefix("data:")
        .ok_or_else(|| RenderError::ImageSource(format!("only data URIs are supported, got '{:.40}'", src)))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| RenderError::ImageSource("data URI without payload".to_string()))?;
    if !meta.ends_with(";base64") {
        return Err(RenderError::ImageSource("data URI must be base64 encoded".to_string()));
    }
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| RenderError::ImageSource(format!("invalid base64 payload: {}", e)))?;
    Ok(image::load_from_memory(&bytes)?)
}
