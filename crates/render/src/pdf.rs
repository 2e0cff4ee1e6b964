//! Single-page PDF output.

use crate::error::RenderError;
use crate::metrics::win_ansi;
use crate::scene::{Element, ImageBox, LabelScene};
use crate::session::Deadline;
use image::DynamicImage;
use labelpress_types::PageSize;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, StringFormat, dictionary};

const PT_PER_MM: f32 = 72.0 / 25.4;

const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

/// Writes `scene` as a one-page PDF whose MediaBox is exactly `size`.
///
/// The output carries no creation date or file identifier, so equal input
/// yields byte-identical documents.
pub fn render_pdf(scene: &LabelScene, size: PageSize, deadline: &Deadline) -> Result<Vec<u8>, RenderError> {
    let (page_width, page_height) = size.to_points();
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut fonts = Dictionary::new();
    for (name, base_font) in [(REGULAR_FONT, "Helvetica"), (BOLD_FONT, "Helvetica-Bold")] {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => base_font,
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(name, font_id);
    }

    let mut ops = fill_rect(scene.background.unit(), [0.0, 0.0, page_width, page_height]);
    let mut xobjects = Dictionary::new();

    for element in &scene.elements {
        deadline.check()?;
        match element {
            Element::Rect { frame, fill } => {
                ops.extend(fill_rect(
                    fill.unit(),
                    [
                        frame.x * PT_PER_MM,
                        page_height - (frame.y + frame.height) * PT_PER_MM,
                        frame.width * PT_PER_MM,
                        frame.height * PT_PER_MM,
                    ],
                ));
            }
            Element::Text(text) => {
                let fitted = text.fit();
                if fitted.text.is_empty() {
                    continue;
                }
                let x = (text.x + text.align_offset(fitted.width_mm)) * PT_PER_MM;
                let y = page_height - text.baseline_mm(fitted.size_pt) * PT_PER_MM;
                let [r, g, b] = text.color.unit();
                let font = if text.bold { BOLD_FONT } else { REGULAR_FONT };
                ops.extend([
                    Operation::new("BT", vec![]),
                    Operation::new("rg", vec![r.into(), g.into(), b.into()]),
                    Operation::new("Tf", vec![font.into(), fitted.size_pt.into()]),
                    Operation::new("Td", vec![x.into(), y.into()]),
                    Operation::new(
                        "Tj",
                        vec![Object::String(win_ansi(&fitted.text), StringFormat::Literal)],
                    ),
                    Operation::new("ET", vec![]),
                ]);
            }
            Element::Image(image) => {
                let name = format!("Im{}", xobjects.len() + 1);
                let image_id = doc.add_object(image_xobject(&image.image));
                xobjects.set(name.as_str(), image_id);
                ops.extend(draw_image(&name, image, page_height));
            }
        }
    }

    let content = Content { operations: ops }.encode()?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, content));

    let mut resources = dictionary! { "Font" => fonts };
    if !xobjects.is_empty() {
        resources.set("XObject", xobjects);
    }
    let resources_id = doc.add_object(resources);

    let media_box: Vec<Object> = vec![0.0f32.into(), 0.0f32.into(), page_width.into(), page_height.into()];
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => media_box,
        "Contents" => content_id,
        "Resources" => resources_id,
    });
    doc.objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1i64,
        }
        .into(),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Producer" => Object::string_literal("labelpress"),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(lopdf::Error::from)?;
    Ok(bytes)
}

fn fill_rect([r, g, b]: [f32; 3], [x, y, w, h]: [f32; 4]) -> Vec<Operation> {
    vec![
        Operation::new("rg", vec![r.into(), g.into(), b.into()]),
        Operation::new("re", vec![x.into(), y.into(), w.into(), h.into()]),
        Operation::new("f", vec![]),
    ]
}

fn draw_image(name: &str, image: &ImageBox, page_height: f32) -> Vec<Operation> {
    let area = image.placement();
    let (w, h) = (area.width * PT_PER_MM, area.height * PT_PER_MM);
    let x = area.x * PT_PER_MM;
    let y = page_height - (area.y + area.height) * PT_PER_MM;
    vec![
        Operation::new("q", vec![]),
        Operation::new("cm", vec![w.into(), 0i64.into(), 0i64.into(), h.into(), x.into(), y.into()]),
        Operation::new("Do", vec![name.into()]),
        Operation::new("Q", vec![]),
    ]
}

/// Uncompressed 8-bit image with any transparency flattened onto white.
fn image_xobject(image: &DynamicImage) -> Stream {
    let (color_space, data): (&str, Vec<u8>) = if image.color().has_color() {
        let rgba = image.to_rgba8();
        let data = rgba
            .pixels()
            .flat_map(|p| [over_white(p[0], p[3]), over_white(p[1], p[3]), over_white(p[2], p[3])])
            .collect();
        ("DeviceRGB", data)
    } else {
        let gray = image.to_luma_alpha8();
        ("DeviceGray", gray.pixels().map(|p| over_white(p[0], p[1])).collect())
    };

    Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(image.width()),
            "Height" => i64::from(image.height()),
            "ColorSpace" => color_space,
            "BitsPerComponent" => 8i64,
            // Codes must stay crisp when scaled.
            "Interpolate" => false,
        },
        data,
    )
}

fn over_white(channel: u8, alpha: u8) -> u8 {
    let (c, a) = (u32::from(channel), u32::from(alpha));
    ((c * a + 255 * (255 - a)) / 255) as u8
}
