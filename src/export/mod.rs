//! Document export: compositing, decoration and PDF output.

pub mod compositor;
pub mod decorator;
pub mod pdf;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::rendering::paint::PaintCommand;
use crate::rendering::RasterImage;
use crate::{ExportConfig, Result, Surface};

pub use compositor::{compose, PageCursor};
pub use decorator::{decorate, load_logo};
pub use pdf::write_pdf;

/// A captured image positioned on a page, in page pixels.
#[derive(Debug, Clone)]
pub struct Placement {
    /// Id of the section the image came from
    pub section: String,
    /// Slice index within the section (0 when not split)
    pub part: usize,
    pub image: Arc<RasterImage>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// One output page
#[derive(Debug, Clone)]
pub struct Page {
    /// 1-indexed page number
    pub number: usize,
    /// Content placed by the compositor
    pub placements: Vec<Placement>,
    /// Header/footer drawing added after compositing
    pub decorations: Vec<PaintCommand>,
}

impl Page {
    pub fn new(number: usize) -> Self {
        Self {
            number,
            placements: Vec::new(),
            decorations: Vec::new(),
        }
    }
}

/// A finished PDF held in memory
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

impl ExportedDocument {
    /// Write the document into `dir` under its file name.
    pub fn save_in(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.file_name);
        self.save_as(&path)?;
        Ok(path)
    }

    pub fn save_as(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path.as_ref(), &self.bytes)?;
        log::info!("wrote {} ({} bytes, {} pages)", path.as_ref().display(), self.bytes.len(), self.page_count);
        Ok(())
    }
}

/// Capture, paginate, decorate and serialise the printable sections of
/// `surface`.
pub fn export_document<S: Surface + ?Sized>(surface: &mut S, config: &ExportConfig) -> Result<ExportedDocument> {
    let mut pages = compose(surface, &config.layout)?;
    let logo = load_logo(&config.branding);
    decorate(&mut pages, config, logo.as_ref());
    let bytes = write_pdf(&pages, config)?;
    Ok(ExportedDocument {
        file_name: config.file_name.clone(),
        bytes,
        page_count: pages.len(),
    })
}
