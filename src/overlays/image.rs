//! Decoded overlay image

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use image::RgbaImage;

/// A decoded raster image ready to be placed on the stage.
///
/// Pixels are shared, so cloning is cheap.
#[derive(Clone, Debug)]
pub struct OverlayImage {
    rgba: Arc<RgbaImage>,
}

impl OverlayImage {
    /// Wrap decoded pixels. Images without pixels cannot be fitted to the stage.
    pub fn new(rgba: RgbaImage) -> Result<Self> {
        if rgba.width() == 0 || rgba.height() == 0 {
            bail!("Image has no pixels ({}x{})", rgba.width(), rgba.height());
        }
        log::debug!("OverlayImage decoded: {}x{} pixels", rgba.width(), rgba.height());
        Ok(Self {
            rgba: Arc::new(rgba),
        })
    }

    /// Decode an encoded raster file (PNG, JPEG, ...)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(bytes).context("Failed to decode image")?;
        Self::new(decoded.to_rgba8())
    }

    /// Transparent image of the given size
    #[cfg(test)]
    pub fn blank(width: u32, height: u32) -> Result<Self> {
        Self::new(RgbaImage::new(width, height))
    }

    /// Get the width of the image
    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    /// Get the height of the image
    pub fn height(&self) -> u32 {
        self.rgba.height()
    }
}
