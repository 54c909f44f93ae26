//! tiny-skia backed raster surface

use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform};

use super::geometry::{FontStyle, LineStyle, Rgba8};
use super::raster::RasterSurface;
use super::text::LabelFonts;
use crate::domain::Size;

/// Raster surface holding an owned pixmap.
///
/// A zero-sized surface has no pixmap; drawing onto it does nothing.
#[derive(Debug)]
pub struct PixmapSurface {
    size: Size,
    pixmap: Option<Pixmap>,
    fonts: LabelFonts,
}

impl PixmapSurface {
    pub fn new(size: Size, fonts: LabelFonts) -> Self {
        let pixmap = allocate(size);
        Self {
            size,
            pixmap,
            fonts,
        }
    }

    #[cfg(test)]
    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    /// Read back one pixel as premultiplied RGBA
    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        let pixmap = self.pixmap.as_ref()?;
        let color = pixmap.pixel(x, y)?;
        Some([color.red(), color.green(), color.blue(), color.alpha()])
    }

    fn paint(color: Rgba8) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
        paint.anti_alias = true;
        paint
    }
}

fn allocate(size: Size) -> Option<Pixmap> {
    let pixmap = Pixmap::new(size.width, size.height);
    if pixmap.is_none() && !size.is_empty() {
        log::warn!(
            "Could not allocate a {}x{} ruler surface",
            size.width,
            size.height
        );
    }
    pixmap
}

impl RasterSurface for PixmapSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn resize(&mut self, size: Size) {
        if size == self.size && self.pixmap.is_some() {
            self.clear();
            return;
        }
        self.size = size;
        self.pixmap = allocate(size);
    }

    fn clear(&mut self) {
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.fill(tiny_skia::Color::TRANSPARENT);
        }
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba8) {
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        if let Some(rect) = tiny_skia::Rect::from_xywh(x, y, width, height) {
            let mut paint = Self::paint(color);
            paint.anti_alias = false;
            pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        }
    }

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), style: LineStyle) {
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        let mut pb = PathBuilder::new();
        pb.move_to(from.0, from.1);
        pb.line_to(to.0, to.1);
        if let Some(path) = pb.finish() {
            let stroke = Stroke {
                width: style.width,
                ..Default::default()
            };
            pixmap.stroke_path(
                &path,
                &Self::paint(style.color),
                &stroke,
                Transform::identity(),
                None,
            );
        }
    }

    fn fill_text(&mut self, text: &str, x: f32, y_middle: f32, font: FontStyle, color: Rgba8) {
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        let face = self.fonts.face(font.bold);
        if let Some(path) = face.text_path(text, x, y_middle, font.size) {
            pixmap.fill_path(
                &path,
                &Self::paint(color),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::render::geometry::palette;

    pub(crate) fn surface(size: Size) -> PixmapSurface {
        PixmapSurface::new(size, LabelFonts::bundled().unwrap())
    }

    fn inked(surface: &PixmapSurface) -> usize {
        surface
            .pixmap()
            .unwrap()
            .pixels()
            .iter()
            .filter(|p| p.alpha() > 0)
            .count()
    }

    #[test]
    fn test_fill_and_clear() {
        let mut surface = surface(Size::new(10, 10));
        surface.fill_rect(0.0, 0.0, 10.0, 10.0, palette::WHITE);
        assert_eq!(surface.pixel(5, 5), Some(palette::WHITE));

        surface.clear();
        assert_eq!(surface.pixel(5, 5), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_zero_sized_surface_ignores_drawing() {
        let mut surface = surface(Size::new(0, 100));
        assert!(surface.pixmap().is_none());
        surface.fill_rect(0.0, 0.0, 10.0, 10.0, palette::WHITE);
        surface.stroke_line(
            (0.0, 0.0),
            (1.0, 1.0),
            LineStyle {
                width: 1.0,
                color: palette::BLACK,
            },
        );
        assert_eq!(surface.pixel(0, 0), None);
    }

    #[test]
    fn test_resize_discards_contents() {
        let mut surface = surface(Size::new(4, 4));
        surface.fill_rect(0.0, 0.0, 4.0, 4.0, palette::WHITE);
        surface.resize(Size::new(8, 4));
        assert_eq!(surface.size(), Size::new(8, 4));
        assert_eq!(surface.pixel(1, 1), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_stroke_line_marks_pixels() {
        let mut surface = surface(Size::new(20, 20));
        surface.stroke_line(
            (0.0, 10.0),
            (20.0, 10.0),
            LineStyle {
                width: 2.0,
                color: palette::BLACK,
            },
        );
        let [_, _, _, alpha] = surface.pixel(10, 10).unwrap();
        assert!(alpha > 0);
        assert_eq!(surface.pixel(10, 2), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_fill_text_inks_label_area() {
        let mut surface = surface(Size::new(60, 30));
        let font = FontStyle {
            size: 16.0,
            bold: false,
        };
        surface.fill_text("12", 4.0, 15.0, font, palette::BLACK);

        assert!(inked(&surface) > 0);
        // nothing above or below the digits
        assert_eq!(surface.pixel(10, 2), Some([0, 0, 0, 0]));
        assert_eq!(surface.pixel(10, 28), Some([0, 0, 0, 0]));
        // nothing left of the label origin
        assert!((0..30).all(|y| surface.pixel(2, y) == Some([0, 0, 0, 0])));
    }

    #[test]
    fn test_bold_text_covers_more_pixels() {
        let draw = |bold: bool| {
            let mut surface = surface(Size::new(80, 30));
            surface.fill_text("808", 2.0, 15.0, FontStyle { size: 18.0, bold }, palette::BLACK);
            inked(&surface)
        };
        assert!(draw(true) > draw(false));
    }
}
