//! PDF serialisation of composed pages using `lopdf`.
//!
//! Page coordinates are pixels with a top-left origin; PDF user space is
//! points with a bottom-left origin, so every command is flipped and scaled.

use std::collections::HashMap;
use std::sync::Arc;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use super::Page;
use crate::rendering::paint::{PaintCommand, TextBaseline};
use crate::rendering::RasterImage;
use crate::{ExportConfig, Result};

/// 96 DPI pixels to 72 DPI points.
pub const PX_TO_PT: f32 = 0.75;

/// Serialise `pages` to PDF bytes. Placements are drawn first, then decorations.
pub fn write_pdf(pages: &[Page], config: &ExportConfig) -> Result<Vec<u8>> {
    let layout = &config.layout;
    let page_w = layout.page_width * PX_TO_PT;
    let page_h = layout.page_height * PX_TO_PT;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut images = ImageTable::new(config.jpeg_quality);
    let mut page_ids = Vec::with_capacity(pages.len());

    for page in pages {
        let mut ops = Vec::new();
        let mut xobjects = Dictionary::new();

        for p in &page.placements {
            draw_image(&mut doc, &mut images, &mut xobjects, &mut ops, &p.image, p.x, p.y, p.width, p.height, page_h)?;
        }
        for cmd in &page.decorations {
            match cmd {
                PaintCommand::SolidRect { x, y, width, height, rgb } => {
                    let (r, g, b) = rgb.unit();
                    ops.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
                    ops.push(Operation::new(
                        "re",
                        vec![
                            (x * PX_TO_PT).into(),
                            (page_h - (y + height) * PX_TO_PT).into(),
                            (width * PX_TO_PT).into(),
                            (height * PX_TO_PT).into(),
                        ],
                    ));
                    ops.push(Operation::new("f", vec![]));
                }
                PaintCommand::Line { x1, y1, x2, y2 } => {
                    ops.push(Operation::new("G", vec![0.into()]));
                    ops.push(Operation::new("w", vec![PX_TO_PT.into()]));
                    ops.push(Operation::new("m", vec![(x1 * PX_TO_PT).into(), (page_h - y1 * PX_TO_PT).into()]));
                    ops.push(Operation::new("l", vec![(x2 * PX_TO_PT).into(), (page_h - y2 * PX_TO_PT).into()]));
                    ops.push(Operation::new("S", vec![]));
                }
                PaintCommand::Text { x, y, text, size, baseline } => {
                    let baseline_px = match baseline {
                        TextBaseline::Top => y + size * 0.8,
                        TextBaseline::Bottom => y - size * 0.2,
                    };
                    ops.push(Operation::new("g", vec![0.into()]));
                    ops.push(Operation::new("BT", vec![]));
                    ops.push(Operation::new("Tf", vec!["F1".into(), (size * PX_TO_PT).into()]));
                    ops.push(Operation::new(
                        "Td",
                        vec![(x * PX_TO_PT).into(), (page_h - baseline_px * PX_TO_PT).into()],
                    ));
                    ops.push(Operation::new("Tj", vec![Object::String(win_ansi(text), StringFormat::Literal)]));
                    ops.push(Operation::new("ET", vec![]));
                }
                PaintCommand::Image { image, x, y, width, height } => {
                    draw_image(&mut doc, &mut images, &mut xobjects, &mut ops, image, *x, *y, *width, *height, page_h)?;
                }
            }
        }

        let content = Content { operations: ops };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), page_w.into(), page_h.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
                "XObject" => xobjects,
            },
        });
        page_ids.push(page_id);
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::from(*id)).collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_ids.len() as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    log::debug!("serialised {} page(s), {} image(s), {} bytes", pages.len(), images.len(), bytes.len());
    Ok(bytes)
}

/// Image XObjects keyed by the `Arc` they came from, so a logo shared by
/// every page is embedded once.
struct ImageTable {
    quality: u8,
    ids: HashMap<*const RasterImage, (String, ObjectId)>,
}

impl ImageTable {
    fn new(quality: u8) -> Self {
        Self {
            quality,
            ids: HashMap::new(),
        }
    }

    fn len(&self) -> usize {
        self.ids.len()
    }

    fn resolve(&mut self, doc: &mut Document, image: &Arc<RasterImage>) -> Result<(String, ObjectId)> {
        let key = Arc::as_ptr(image);
        if let Some(found) = self.ids.get(&key) {
            return Ok(found.clone());
        }
        let jpeg = image.to_jpeg(self.quality)?;
        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => image.width() as i64,
                "Height" => image.height() as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            jpeg,
        )
        .with_compression(false);
        let id = doc.add_object(stream);
        let name = format!("Im{}", self.ids.len() + 1);
        self.ids.insert(key, (name.clone(), id));
        Ok((name, id))
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_image(
    doc: &mut Document,
    images: &mut ImageTable,
    xobjects: &mut Dictionary,
    ops: &mut Vec<Operation>,
    image: &Arc<RasterImage>,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    page_h: f32,
) -> Result<()> {
    if image.is_empty() {
        log::debug!("skipping empty image at y={:.1}", y);
        return Ok(());
    }
    let (name, id) = images.resolve(doc, image)?;
    xobjects.set(name.as_bytes().to_vec(), id);

    let w = width * PX_TO_PT;
    let h = height * PX_TO_PT;
    ops.push(Operation::new("q", vec![]));
    ops.push(Operation::new(
        "cm",
        vec![w.into(), 0.into(), 0.into(), h.into(), (x * PX_TO_PT).into(), (page_h - y * PX_TO_PT - h).into()],
    ));
    ops.push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
    ops.push(Operation::new("Q", vec![]));
    Ok(())
}

/// Encode for the WinAnsi (Windows-1252) Helvetica font. Characters the
/// code page lacks, C1 controls included, become `?`.
fn win_ansi(s: &str) -> Vec<u8> {
    s.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match c {
        '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}' => c as u8,
        '\t' | '\n' | '\r' => c as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8a,
        '‹' => 0x8b,
        'Œ' => 0x8c,
        'Ž' => 0x8e,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201c}' => 0x93,
        '\u{201d}' => 0x94,
        '•' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9a,
        '›' => 0x9b,
        'œ' => 0x9c,
        'ž' => 0x9e,
        'Ÿ' => 0x9f,
        _ => b'?',
    }
}
