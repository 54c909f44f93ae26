//! Turning uploaded files into overlay images
//!
//! Raster files are decoded with the `image` crate. Documents go through a
//! [`DocumentRenderer`]; none ships with the application, so document
//! uploads fail with a logged error unless one is provided.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use image::RgbaImage;

use super::image::OverlayImage;

pub const PDF_MIME: &str = "application/pdf";

/// A chosen file with its type tag and contents
#[derive(Clone, Debug)]
pub struct UploadFile {
    pub name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read upload: {}", path.display()))?;
        Ok(Self {
            name: display_name(path),
            mime: mime_for_path(path),
            bytes,
        })
    }

    pub fn is_document(&self) -> bool {
        self.mime == PDF_MIME
    }
}

/// File name shown as the slot's input value
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// MIME type guessed from the file extension
pub fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "pdf" => PDF_MIME,
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        _ => "application/octet-stream",
    }
}

/// Rasterizes pages of a document
pub trait DocumentRenderer: Send + Sync {
    fn page_count(&self, bytes: &[u8]) -> Result<usize>;

    fn render_page(&self, bytes: &[u8], index: usize, scale: f32) -> Result<RgbaImage>;
}

/// Document backend used when none is configured
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDocumentBackend;

impl DocumentRenderer for NoDocumentBackend {
    fn page_count(&self, _bytes: &[u8]) -> Result<usize> {
        bail!("No document renderer is available")
    }

    fn render_page(&self, _bytes: &[u8], _index: usize, _scale: f32) -> Result<RgbaImage> {
        bail!("No document renderer is available")
    }
}

/// Decode an upload: first page for documents, the image itself otherwise
pub fn decode_upload(
    file: &UploadFile,
    documents: &dyn DocumentRenderer,
    document_scale: f32,
) -> Result<OverlayImage> {
    if file.is_document() {
        let pages = documents
            .page_count(&file.bytes)
            .with_context(|| format!("Failed to open document {}", file.name))?;
        if pages == 0 {
            bail!("Document {} has no pages", file.name);
        }
        let page = documents
            .render_page(&file.bytes, 0, document_scale)
            .with_context(|| format!("Failed to render first page of {}", file.name))?;
        return OverlayImage::new(page);
    }
    OverlayImage::from_bytes(&file.bytes).with_context(|| format!("Failed to decode {}", file.name))
}

/// Read and decode `path` off the event loop
pub async fn load_upload(
    path: PathBuf,
    documents: Arc<dyn DocumentRenderer>,
    document_scale: f32,
) -> Result<OverlayImage> {
    tokio::task::spawn_blocking(move || {
        let file = UploadFile::read(&path)?;
        decode_upload(&file, documents.as_ref(), document_scale)
    })
    .await
    .context("Decode task panicked")?
}
