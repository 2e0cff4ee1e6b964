//! PNG previews rendered with tiny-skia.

use crate::color::Color;
use crate::error::RenderError;
use crate::fonts::{FontFace, FontLibrary};
use crate::scene::{Element, ImageBox, LabelScene, TextBox};
use crate::session::Deadline;
use labelpress_types::{PX_PER_MM, PageSize};
use tiny_skia::{
    FillRule, FilterQuality, IntSize, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Transform,
};

const PX_PER_PT: f32 = PX_PER_MM as f32 * 25.4 / 72.0;

/// Rasterizes `scene` at 3.78 px/mm. The viewport is `size.to_pixels()`.
pub fn render_png(
    scene: &LabelScene,
    size: PageSize,
    fonts: &FontLibrary,
    deadline: &Deadline,
) -> Result<(Vec<u8>, (u32, u32)), RenderError> {
    let (width, height) = size.to_pixels();
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| RenderError::Raster(format!("invalid viewport {}x{}", width, height)))?;
    pixmap.fill(skia_color(scene.background));

    let scale = PX_PER_MM as f32;
    for element in &scene.elements {
        deadline.check()?;
        match element {
            Element::Rect { frame, fill } => {
                let rect = Rect::from_xywh(
                    frame.x * scale,
                    frame.y * scale,
                    frame.width * scale,
                    frame.height * scale,
                );
                // Zero-sized rectangles draw nothing.
                if let Some(rect) = rect {
                    pixmap.fill_rect(rect, &paint(*fill), Transform::identity(), None);
                }
            }
            Element::Text(text) => draw_text(&mut pixmap, text, fonts),
            Element::Image(image) => draw_image(&mut pixmap, image)?,
        }
    }

    let png = pixmap.encode_png().map_err(|e| RenderError::Raster(e.to_string()))?;
    Ok((png, (width, height)))
}

fn skia_color(color: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(color.r, color.g, color.b, 255)
}

fn paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, 255);
    paint.anti_alias = true;
    paint
}

fn draw_image(pixmap: &mut Pixmap, image: &ImageBox) -> Result<(), RenderError> {
    let rgba = image.image.to_rgba8();
    let (w, h) = rgba.dimensions();
    let premultiplied = rgba
        .pixels()
        .flat_map(|p| {
            let a = u16::from(p[3]);
            let mul = |c: u8| ((u16::from(c) * a + 127) / 255) as u8;
            [mul(p[0]), mul(p[1]), mul(p[2]), p[3]]
        })
        .collect();
    let size = IntSize::from_wh(w, h).ok_or_else(|| RenderError::Raster("empty image".to_string()))?;
    let source = Pixmap::from_vec(premultiplied, size)
        .ok_or_else(|| RenderError::Raster("image buffer size mismatch".to_string()))?;

    let area = image.placement();
    let scale = PX_PER_MM as f32;
    let transform = Transform::from_row(
        area.width * scale / w as f32,
        0.0,
        0.0,
        area.height * scale / h as f32,
        area.x * scale,
        area.y * scale,
    );
    // Nearest-neighbour keeps code modules sharp.
    let paint = PixmapPaint { quality: FilterQuality::Nearest, ..PixmapPaint::default() };
    pixmap.draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);
    Ok(())
}

fn draw_text(pixmap: &mut Pixmap, text: &TextBox, fonts: &FontLibrary) {
    let fitted = text.fit();
    if fitted.text.is_empty() {
        return;
    }
    let Some(face) = fonts.face(text.bold).and_then(FontFace::face) else {
        log::warn!("No font available, skipping text '{}'", fitted.text);
        return;
    };

    let size_px = fitted.size_pt * PX_PER_PT;
    let units = f32::from(face.units_per_em());
    let glyph_scale = size_px / units;
    let line_px: f32 = fitted
        .text
        .chars()
        .filter_map(|c| face.glyph_index(c))
        .filter_map(|g| face.glyph_hor_advance(g))
        .map(|adv| f32::from(adv) * glyph_scale)
        .sum();

    let scale = PX_PER_MM as f32;
    let mut pen_x = (text.x + text.align_offset(line_px / scale)) * scale;
    let baseline = text.baseline_mm(fitted.size_pt) * scale;

    let mut builder = PathBuilder::new();
    for c in fitted.text.chars() {
        let Some(glyph) = face.glyph_index(c) else {
            continue;
        };
        let mut outline = GlyphOutline { builder: &mut builder, scale: glyph_scale, x: pen_x, y: baseline };
        face.outline_glyph(glyph, &mut outline);
        pen_x += face.glyph_hor_advance(glyph).map_or(0.0, |adv| f32::from(adv) * glyph_scale);
    }

    if let Some(path) = builder.finish() {
        pixmap.fill_path(&path, &paint(text.color), FillRule::Winding, Transform::identity(), None);
    }
}

/// Places font-unit outlines at a pen position, flipping the y axis.
struct GlyphOutline<'a> {
    builder: &'a mut PathBuilder,
    scale: f32,
    x: f32,
    y: f32,
}

impl GlyphOutline<'_> {
    fn point(&self, x: f32, y: f32) -> (f32, f32) {
        (self.x + x * self.scale, self.y - y * self.scale)
    }
}

impl ttf_parser::OutlineBuilder for GlyphOutline<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.point(x, y);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.point(x, y);
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.point(x1, y1);
        let (x, y) = self.point(x, y);
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.point(x1, y1);
        let (x2, y2) = self.point(x2, y2);
        let (x, y) = self.point(x, y);
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Frame;
    use image::{DynamicImage, GrayImage, Luma};

    fn decode(png: &[u8]) -> image::RgbaImage {
        image::load_from_memory(png).unwrap().to_rgba8()
    }

    #[test]
    fn test_viewport_matches_label_size() {
        let scene = LabelScene::parse("<label/>").unwrap();
        for (size, expected) in [
            (PageSize::new(50.0, 25.0), (189, 95)),
            (PageSize::new(40.0, 30.0), (151, 113)),
            (PageSize::new(15.0, 15.0), (57, 57)),
            (PageSize::new(12.0, 40.0), (45, 151)),
        ] {
            let (png, dims) = render_png(&scene, size, &FontLibrary::empty(), &Deadline::unbounded()).unwrap();
            assert_eq!(dims, expected);
            assert_eq!(decode(&png).dimensions(), expected);
        }
    }

    #[test]
    fn test_rect_and_background_are_painted() {
        let scene = LabelScene::parse(
            r##"<label background="#ff0000"><rect x="0" y="0" width="5" height="5" fill="#000"/></label>"##,
        )
        .unwrap();
        let (png, _) =
            render_png(&scene, PageSize::new(20.0, 20.0), &FontLibrary::empty(), &Deadline::unbounded()).unwrap();
        let img = decode(&png);
        assert_eq!(img.get_pixel(5, 5).0, [0, 0, 0, 255]);
        assert_eq!(img.get_pixel(70, 70).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_images_scale_with_nearest_neighbour() {
        let mut checker = GrayImage::from_pixel(2, 2, Luma([255]));
        checker.put_pixel(0, 0, Luma([0]));
        let scene = LabelScene {
            background: Color::WHITE,
            elements: vec![Element::Image(ImageBox {
                frame: Frame { x: 0.0, y: 0.0, width: 10.0, height: 10.0 },
                image: DynamicImage::ImageLuma8(checker),
            })],
        };
        let (png, _) =
            render_png(&scene, PageSize::new(10.0, 10.0), &FontLibrary::empty(), &Deadline::unbounded()).unwrap();
        let img = decode(&png);
        // Each source pixel covers ~19x19 device pixels with hard edges.
        assert_eq!(img.get_pixel(2, 2).0, [0, 0, 0, 255]);
        assert_eq!(img.get_pixel(16, 16).0, [0, 0, 0, 255]);
        assert_eq!(img.get_pixel(22, 2).0, [255, 255, 255, 255]);
        assert_eq!(img.get_pixel(30, 30).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_text_without_fonts_is_skipped() {
        let scene =
            LabelScene::parse(r#"<label><text x="1" y="1" width="20" size="9">IT-0042</text></label>"#).unwrap();
        let (png, _) =
            render_png(&scene, PageSize::new(25.0, 10.0), &FontLibrary::empty(), &Deadline::unbounded()).unwrap();
        assert!(decode(&png).pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }
}
