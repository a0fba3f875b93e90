//! Page Compositor: places captured sections onto pages.
//!
//! Sections are captured strictly one after another; the vertical cursor is
//! only ever touched by the loop in [`compose`].

use std::sync::Arc;

use super::{Page, Placement};
use crate::rendering::{split, RasterImage};
use crate::{Error, PageLayout, Result, Section, Surface};

/// Running placement state for one document.
#[derive(Debug)]
pub struct PageCursor {
    layout: PageLayout,
    finished: Vec<Page>,
    current: Page,
    y_pos: f32,
}

impl PageCursor {
    /// Cursor on a single empty page, just below the header plus the start gap.
    pub fn new(layout: PageLayout) -> Self {
        Self {
            y_pos: layout.header_height + layout.start_gap,
            finished: Vec::new(),
            current: Page::new(1),
            layout,
        }
    }

    pub fn y_pos(&self) -> f32 {
        self.y_pos
    }

    pub fn page_count(&self) -> usize {
        self.finished.len() + 1
    }

    /// Height handed to the splitter for the current page.
    ///
    /// The header is counted twice here: once in the reserved space and once
    /// in `y_pos`.
    pub fn split_limit(&self) -> f32 {
        self.layout.page_height - self.layout.reserved_space() - self.y_pos
    }

    /// Lowest `y` the bottom of a placed image may reach.
    fn bottom_limit(&self) -> f32 {
        self.layout.page_height - self.layout.reserved_space()
    }

    /// Place `image` below the previous one, breaking the page if it does not fit.
    ///
    /// The image is scaled by `page_width / source_width`, where `source_width`
    /// is the width of the capture the image came from, so all parts of a
    /// split capture share one scale.
    pub fn place(&mut self, section: &Section, part: usize, image: Arc<RasterImage>, source_width: u32) {
        let width = self.layout.page_width - self.layout.image_inset;
        let height = image.height() as f32 * (self.layout.page_width / source_width as f32);

        if self.y_pos + height > self.bottom_limit() {
            let number = self.page_count() + 1;
            log::debug!(
                "page break before '{}' part {}: {:.1} + {:.1} > {:.1}",
                section.id,
                part,
                self.y_pos,
                height,
                self.bottom_limit()
            );
            let full = std::mem::replace(&mut self.current, Page::new(number));
            self.finished.push(full);
            self.y_pos = self.layout.header_height;
        }

        let page = &mut self.current;
        log::debug!(
            "page {}: '{}' part {} at y={:.1} ({:.1}x{:.1})",
            page.number,
            section.id,
            part,
            self.y_pos,
            width,
            height
        );
        page.placements.push(Placement {
            section: section.id.clone(),
            part,
            image,
            x: 0.0,
            y: self.y_pos,
            width,
            height,
        });
        self.y_pos += height;
    }

    pub fn finish(mut self) -> Vec<Page> {
        self.finished.push(self.current);
        self.finished
    }
}

/// Capture every printable section of `surface` in order and lay the images
/// out on pages.
///
/// Multi-chart sections are split against the space left on the current
/// page. Fails without producing pages when the surface has no capture
/// target or no sections.
pub fn compose<S: Surface + ?Sized>(surface: &mut S, layout: &PageLayout) -> Result<Vec<Page>> {
    let sections = surface.printable_sections().map_err(|e| {
        log::error!("export aborted: {}", e);
        e
    })?;
    if sections.is_empty() {
        log::error!("export aborted: {}", Error::NoSections);
        return Err(Error::NoSections);
    }

    let mut cursor = PageCursor::new(*layout);
    for section in &sections {
        let captured = Arc::new(surface.capture(section)?);
        if captured.width() == 0 {
            return Err(Error::CaptureError(format!("section '{}' captured with zero width", section.id)));
        }

        let images = if section.is_multi_chart() {
            split(&captured, cursor.split_limit())
        } else {
            vec![Arc::clone(&captured)]
        };

        for (part, image) in images.into_iter().enumerate() {
            cursor.place(section, part, image, captured.width());
        }
    }

    log::info!(
        "composed {} sections onto {} page(s)",
        sections.len(),
        cursor.page_count()
    );
    Ok(cursor.finish())
}
