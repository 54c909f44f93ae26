//! Shared drawing constants
//!
//! Colors and stroke sizes used by both the raster ruler and the
//! retained vector scene.

/// RGBA color, 8 bits per channel, not premultiplied
pub type Rgba8 = [u8; 4];

/// Color constants
pub mod palette {
    use super::Rgba8;

    pub const WHITE: Rgba8 = [255, 255, 255, 255];
    pub const BLACK: Rgba8 = [0, 0, 0, 255];
    /// Gridline gray (#ddd)
    pub const GRID: Rgba8 = [0xdd, 0xdd, 0xdd, 255];
    pub const MARKER: Rgba8 = [255, 0, 0, 255];
}

/// Ruler strip stroke sizes
pub mod ruler {
    /// Width of the separator at the right edge of the strip
    pub const EDGE_WIDTH: f32 = 2.0;
    /// The separator is inset so its full width stays on the surface
    pub const EDGE_INSET: f32 = 1.5;
    pub const MAJOR_STROKE: f32 = 2.0;
    pub const MINOR_STROKE: f32 = 1.5;
}

/// Vector surface stroke sizes
pub mod scene {
    pub const GRID_STROKE: f32 = 1.0;
    pub const MARKER_STROKE: f32 = 3.0;
    /// Marker dash pattern (on, off)
    pub const MARKER_DASH: [f32; 2] = [10.0, 6.0];
}

/// Stroke style of a raster line
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineStyle {
    pub width: f32,
    pub color: Rgba8,
}

/// Size and weight of raster text
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontStyle {
    pub size: f32,
    pub bold: bool,
}
