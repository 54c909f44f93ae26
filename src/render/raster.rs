//! Immediate-mode raster surface
//!
//! The ruler is drawn through this trait so it can target a tiny-skia
//! pixmap in the application and a recording fake in tests.

use super::geometry::{FontStyle, LineStyle, Rgba8};
use crate::domain::Size;

pub trait RasterSurface {
    fn size(&self) -> Size;

    /// Resize the surface. Contents are discarded.
    fn resize(&mut self, size: Size);

    /// Reset every pixel to transparent
    fn clear(&mut self);

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba8);

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), style: LineStyle);

    /// Draw left-aligned text vertically centered on `y_middle`
    fn fill_text(&mut self, text: &str, x: f32, y_middle: f32, font: FontStyle, color: Rgba8);
}
