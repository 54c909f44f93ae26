//! Image overlays
//!
//! This module provides:
//! - The decoded overlay image type
//! - Upload decoding (raster files and document pages)
//! - The slot registry that owns overlay nodes on the vector surface

pub mod decode;
pub mod image;
pub mod registry;

pub use self::image::OverlayImage;
pub use registry::{OverlayRegistry, SlotId, UploadTicket};
