//! Label text from bundled outline fonts
//!
//! Ruler labels are filled from real glyph outlines: DejaVu Sans for plain
//! labels and DejaVu Sans Bold for emphasized ones. Both faces are embedded
//! in the binary.

use std::borrow::Cow;
use std::fmt;

use anyhow::{Context, Result};
use rust_embed::RustEmbed;
use skrifa::instance::{LocationRef, Size};
use skrifa::outline::OutlinePen;
use skrifa::{FontRef, MetadataProvider};
use tiny_skia::{Path, PathBuilder};

#[derive(RustEmbed)]
#[folder = "resources/fonts/"]
struct FontAssets;

const REGULAR: &str = "DejaVuSans.ttf";
const BOLD: &str = "DejaVuSans-Bold.ttf";

/// Cap height relative to the font size, for faces that do not declare one
const FALLBACK_CAP_HEIGHT: f32 = 0.7;

/// One embedded font face
#[derive(Clone)]
pub struct LabelFace {
    name: &'static str,
    data: Cow<'static, [u8]>,
}

impl fmt::Debug for LabelFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelFace")
            .field("name", &self.name)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl LabelFace {
    fn load(name: &'static str) -> Result<Self> {
        let file = FontAssets::get(name).with_context(|| format!("Font {name} is not bundled"))?;
        let face = Self {
            name,
            data: file.data,
        };
        face.font()
            .map_err(|err| anyhow::anyhow!("{err}"))
            .with_context(|| format!("Failed to parse font {name}"))?;
        log::debug!("Loaded font {} ({} bytes)", name, face.data.len());
        Ok(face)
    }

    fn font(&self) -> Result<FontRef<'_>, skrifa::raw::ReadError> {
        FontRef::new(&self.data)
    }

    /// Outline of `text` starting at `x`, with the cap height centered on
    /// `y_middle`. `None` when no glyph has an outline.
    pub fn text_path(&self, text: &str, x: f32, y_middle: f32, size_px: f32) -> Option<Path> {
        let font = self.font().ok()?;
        let size = Size::new(size_px);
        let location = LocationRef::default();
        let charmap = font.charmap();
        let outlines = font.outline_glyphs();
        let advances = font.glyph_metrics(size, location);
        let cap_height = font
            .metrics(size, location)
            .cap_height
            .unwrap_or(size_px * FALLBACK_CAP_HEIGHT);

        let mut pen = PathPen {
            builder: PathBuilder::new(),
            origin_x: x,
            baseline: y_middle + cap_height / 2.0,
        };
        for ch in text.chars() {
            let Some(glyph_id) = charmap.map(ch) else {
                log::debug!("{} has no glyph for {:?}", self.name, ch);
                continue;
            };
            if let Some(glyph) = outlines.get(glyph_id)
                && let Err(err) = glyph.draw(size, &mut pen)
            {
                log::debug!("Failed to draw {:?} from {}: {}", ch, self.name, err);
            }
            pen.origin_x += advances.advance_width(glyph_id).unwrap_or(0.0);
        }
        pen.builder.finish()
    }
}

/// Places y-up glyph coordinates onto the y-down surface
struct PathPen {
    builder: PathBuilder,
    origin_x: f32,
    baseline: f32,
}

impl PathPen {
    fn at(&self, x: f32, y: f32) -> (f32, f32) {
        (self.origin_x + x, self.baseline - y)
    }
}

impl OutlinePen for PathPen {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.at(x, y);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.at(x, y);
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.at(x1, y1);
        let (x, y) = self.at(x, y);
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.at(x1, y1);
        let (x2, y2) = self.at(x2, y2);
        let (x, y) = self.at(x, y);
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

/// Regular and bold label faces
#[derive(Clone, Debug)]
pub struct LabelFonts {
    regular: LabelFace,
    bold: LabelFace,
}

impl LabelFonts {
    /// Load the faces embedded in the binary
    pub fn bundled() -> Result<Self> {
        Ok(Self {
            regular: LabelFace::load(REGULAR)?,
            bold: LabelFace::load(BOLD)?,
        })
    }

    pub fn face(&self, bold: bool) -> &LabelFace {
        if bold { &self.bold } else { &self.regular }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fonts() -> LabelFonts {
        LabelFonts::bundled().unwrap()
    }

    #[test]
    fn test_digits_centered_on_label_line() {
        let path = fonts().face(false).text_path("100", 6.0, 50.0, 16.0).unwrap();
        let bounds = path.bounds();

        assert!(bounds.left() >= 6.0);
        assert!(((bounds.top() + bounds.bottom()) / 2.0 - 50.0).abs() < 1.0);
        // digits are about one cap height tall
        assert!(bounds.height() > 16.0 * 0.6 && bounds.height() < 16.0 * 0.8);
    }

    #[test]
    fn test_glyphs_advance_left_to_right() {
        let face = fonts().face(false).clone();
        let one = face.text_path("4", 0.0, 20.0, 20.0).unwrap().bounds();
        let three = face.text_path("-40", 0.0, 20.0, 20.0).unwrap().bounds();
        assert!(three.width() > one.width() * 2.0);
    }

    #[test]
    fn test_bold_face_is_heavier() {
        let fonts = fonts();
        let regular = fonts.face(false).text_path("888", 0.0, 20.0, 20.0).unwrap();
        let bold = fonts.face(true).text_path("888", 0.0, 20.0, 20.0).unwrap();
        assert!(bold.bounds().width() > regular.bounds().width());
    }

    #[test]
    fn test_blank_text_has_no_path() {
        let fonts = fonts();
        assert!(fonts.face(false).text_path("", 0.0, 10.0, 12.0).is_none());
        assert!(fonts.face(true).text_path("  ", 0.0, 10.0, 12.0).is_none());
    }
}
