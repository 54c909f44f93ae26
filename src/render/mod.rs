//! Stage rendering
//!
//! This module contains:
//! - The raster surface abstraction and its tiny-skia backend
//! - Label text from embedded outline fonts
//! - Ruler planning and painting
//! - Gridlines on the retained vector scene

pub mod geometry;
pub mod grid;
pub mod pixmap;
pub mod raster;
pub mod ruler;
pub mod text;
