//! Header/Footer Decorator.
//!
//! Runs once all pages exist, since the footer prints the total page count.
//! Only `Page::decorations` is touched; placements stay as composed.

use std::sync::Arc;

use super::Page;
use crate::rendering::paint::{PaintCommand, TextBaseline};
use crate::rendering::RasterImage;
use crate::{Branding, ExportConfig};

/// Line height of multi-line header text, relative to the font size.
const LINE_HEIGHT_FACTOR: f32 = 1.15;

/// Load the header logo. An unreadable logo is reported and left out.
pub fn load_logo(branding: &Branding) -> Option<Arc<RasterImage>> {
    let path = branding.logo_path.as_ref()?;
    match RasterImage::open(path) {
        Ok(img) => Some(Arc::new(img)),
        Err(e) => {
            log::warn!("header logo skipped: {}", e);
            None
        }
    }
}

/// Append header and footer drawing to every page.
pub fn decorate(pages: &mut [Page], config: &ExportConfig, logo: Option<&Arc<RasterImage>>) {
    let total = pages.len();
    for page in pages.iter_mut() {
        header(page, config, logo);
        footer(page, config, total);
    }
}

fn header(page: &mut Page, config: &ExportConfig, logo: Option<&Arc<RasterImage>>) {
    let layout = &config.layout;
    let pad = config.band_padding;
    let branding = &config.branding;
    let logo_size = branding.logo_size;

    page.decorations.push(PaintCommand::SolidRect {
        x: pad,
        y: pad - 5.0,
        width: layout.page_width - 2.0 * pad,
        height: logo_size,
        rgb: config.band_color,
    });

    let line_height = config.font_size * LINE_HEIGHT_FACTOR;
    for (i, line) in [&branding.name, &branding.phone, &branding.address].iter().enumerate() {
        page.decorations.push(PaintCommand::Text {
            x: pad * 2.0,
            y: pad + i as f32 * line_height,
            text: line.to_string(),
            size: config.font_size,
            baseline: TextBaseline::Top,
        });
    }

    if let Some(logo) = logo {
        page.decorations.push(PaintCommand::Image {
            image: Arc::clone(logo),
            x: layout.page_width / 2.0 - logo_size / 2.0,
            y: 5.0,
            width: logo_size,
            height: logo_size,
        });
    }

    page.decorations.push(PaintCommand::Line {
        x1: 0.0,
        y1: layout.header_height,
        x2: layout.page_width,
        y2: layout.header_height,
    });
}

fn footer(page: &mut Page, config: &ExportConfig, total: usize) {
    let layout = &config.layout;
    let pad = config.band_padding;

    page.decorations.push(PaintCommand::SolidRect {
        x: pad,
        y: layout.page_height - pad * 2.0,
        width: layout.page_width - pad * 2.0,
        height: pad,
        rgb: config.band_color,
    });
    page.decorations.push(PaintCommand::Text {
        x: layout.page_width / 2.0 - pad * 2.0,
        y: layout.page_height - pad,
        text: config.locale.page_label(page.number, total),
        size: config.font_size,
        baseline: TextBaseline::Bottom,
    });
}
