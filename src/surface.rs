//! Surface implementations: the built-in dashboard painter and pre-rendered
//! PNG files.

use std::path::PathBuf;

use image::Rgba;

use crate::demo::{self, Person};
use crate::rendering::chart::{self, ChartSeries};
use crate::rendering::paint::Canvas;
use crate::rendering::{Font, RasterImage};
use crate::{CaptureOptions, Error, Result, Section, Surface};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const HEADER_ROW: Rgba<u8> = Rgba([221, 221, 221, 255]);
const STRIPE: Rgba<u8> = Rgba([245, 245, 245, 255]);
const RULE: Rgba<u8> = Rgba([200, 200, 200, 255]);
const INK: Rgba<u8> = Rgba([51, 51, 51, 255]);

/// Cell text size relative to the row height.
const TEXT_SCALE: f32 = 0.6;
const CELL_PADDING: f32 = 8.0;
const LIST_INDENT: f32 = 24.0;

pub const CHART_SECTION: &str = "charts";
pub const LIST_SECTION: &str = "list";

/// Paints the dashboard (chart block, table chunks, list) into raster images.
///
/// The chart block stacks the category bar chart, the line chart and the pie
/// chart and is the only multi-chart section.
pub struct RasterSurface {
    options: CaptureOptions,
    font: Font,
    mounted: bool,
    series: ChartSeries,
    table: Vec<Person>,
    list: Vec<String>,
}

impl RasterSurface {
    /// A mounted surface seeded with the demo table and list.
    pub fn new(options: CaptureOptions) -> Self {
        Self {
            options,
            font: Font::default(),
            mounted: true,
            series: ChartSeries::default(),
            table: demo::table_rows(),
            list: demo::list_lines(),
        }
    }

    /// A surface whose container was never mounted; exporting it fails.
    pub fn detached(options: CaptureOptions) -> Self {
        Self {
            mounted: false,
            ..Self::new(options)
        }
    }

    pub fn with_content(mut self, table: Vec<Person>, list: Vec<String>) -> Self {
        self.table = table;
        self.list = list;
        self
    }

    /// Replace the bundled face used for table, list and chart text.
    pub fn with_font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }

    /// Series currently bound to the bar chart
    pub fn series(&self) -> &ChartSeries {
        &self.series
    }

    fn table_chunks(&self) -> Vec<Vec<Person>> {
        demo::chunk(&self.table, self.options.table_chunk)
    }

    fn paint_charts(&self) -> Result<RasterImage> {
        let o = &self.options;
        let height = o.chart_height * 3 + o.chart_gap * 2;
        let charts = [
            chart::paint_bar_chart(&self.font, &self.series, o.width, o.chart_height)?,
            chart::paint_line_chart(&self.font, o.width, o.chart_height)?,
            chart::paint_pie_chart(&self.font, o.width, o.chart_height)?,
        ];

        let mut block = image::RgbaImage::from_pixel(o.width, height, WHITE);
        for (i, c) in charts.iter().enumerate() {
            let top = i as i64 * (o.chart_height + o.chart_gap) as i64;
            image::imageops::overlay(&mut block, c.pixels(), 0, top);
        }
        Ok(RasterImage::new(block))
    }

    fn text_size(&self) -> f32 {
        self.options.row_height as f32 * TEXT_SCALE
    }

    /// Baseline that centres cap-height text in a row starting at `top`.
    fn row_baseline(&self, top: f32) -> f32 {
        top + self.options.row_height as f32 * 0.5 + self.text_size() * 0.35
    }

    /// One row of cell text, each cell cut to its column.
    fn paint_cells(&self, canvas: &mut Canvas, top: f32, texts: [&str; 4]) {
        let col = self.options.width as f32 / 4.0;
        let size = self.text_size();
        for (c, text) in texts.iter().enumerate() {
            let fitted = self.font.truncate(text, size, col - 2.0 * CELL_PADDING);
            canvas.text(&self.font, col * c as f32 + CELL_PADDING, self.row_baseline(top), &fitted, size, INK);
        }
    }

    fn paint_table(&self, rows: &[Person]) -> Result<RasterImage> {
        let o = &self.options;
        let rh = o.row_height as f32;
        let height = o.row_height * (rows.len() as u32 + 1);
        let (width, col) = (o.width as f32, o.width as f32 / 4.0);
        let mut canvas = Canvas::new(o.width, height, WHITE)?;

        canvas.fill_rect(0.0, 0.0, width, rh, HEADER_ROW);
        self.paint_cells(&mut canvas, 0.0, demo::TABLE_HEADERS);
        for (i, row) in rows.iter().enumerate() {
            let top = rh * (i + 1) as f32;
            if i % 2 == 1 {
                canvas.fill_rect(0.0, top, width, rh, STRIPE);
            }
            let age = row.age.to_string();
            self.paint_cells(&mut canvas, top, [row.name, row.surname, row.country, age.as_str()]);
            canvas.line(0.0, top + 0.5, width, top + 0.5, RULE);
        }
        for c in 1..4 {
            let x = col * c as f32 + 0.5;
            canvas.line(x, 0.0, x, height as f32, RULE);
        }
        canvas.stroke_rect(0.0, 0.0, width, height as f32, RULE);
        canvas.into_raster()
    }

    fn paint_list(&self) -> Result<RasterImage> {
        let o = &self.options;
        let rh = o.row_height as f32;
        let size = self.text_size();
        let usable = (o.width as f32 - LIST_INDENT - 16.0).max(size);
        let wrapped: Vec<Vec<String>> = self.list.iter().map(|l| self.font.wrap(l, size, usable)).collect();
        let rows: usize = wrapped.iter().map(Vec::len).sum();
        let mut canvas = Canvas::new(o.width, (o.row_height * rows as u32).max(1), WHITE)?;

        let mut top = 0.0;
        for lines in &wrapped {
            canvas.fill_circle(14.0, top + rh * 0.5, (size * 0.2).max(1.5), INK);
            for line in lines {
                canvas.text(&self.font, LIST_INDENT, self.row_baseline(top), line, size, INK);
                top += rh;
            }
        }
        canvas.into_raster()
    }
}

impl Surface for RasterSurface {
    fn render_charts(&mut self, series: &ChartSeries) -> Result<()> {
        log::info!("rendering category chart with {} bars", series.len());
        self.series = series.clone();
        Ok(())
    }

    fn printable_sections(&self) -> Result<Vec<Section>> {
        if !self.mounted {
            return Err(Error::MissingCaptureTarget);
        }
        let mut sections = vec![Section::new(CHART_SECTION, 3)];
        sections.extend((0..self.table_chunks().len()).map(|i| Section::new(format!("table-{}", i), 0)));
        if !self.list.is_empty() {
            sections.push(Section::new(LIST_SECTION, 0));
        }
        Ok(sections)
    }

    fn capture(&mut self, section: &Section) -> Result<RasterImage> {
        if !self.mounted {
            return Err(Error::MissingCaptureTarget);
        }
        if section.id == CHART_SECTION {
            return self.paint_charts();
        }
        if section.id == LIST_SECTION {
            return self.paint_list();
        }
        let chunks = self.table_chunks();
        let rows = section
            .id
            .strip_prefix("table-")
            .and_then(|n| n.parse::<usize>().ok())
            .and_then(|n| chunks.get(n))
            .ok_or_else(|| Error::CaptureError(format!("unknown section '{}'", section.id)))?;
        self.paint_table(rows)
    }
}

/// Sections backed by pre-rendered image files, captured by decoding them.
#[derive(Debug, Default)]
pub struct FileSurface {
    entries: Vec<(Section, PathBuf)>,
}

impl FileSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a file; `multi_chart` marks it as eligible for splitting.
    pub fn push(&mut self, path: impl Into<PathBuf>, multi_chart: bool) {
        let path = path.into();
        let id = format!("{}:{}", self.entries.len(), path.display());
        self.entries.push((Section::new(id, usize::from(multi_chart)), path));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Surface for FileSurface {
    fn render_charts(&mut self, series: &ChartSeries) -> Result<()> {
        log::debug!("file surface is pre-rendered; ignoring {} chart values", series.len());
        Ok(())
    }

    fn printable_sections(&self) -> Result<Vec<Section>> {
        if self.entries.is_empty() {
            return Err(Error::NoSections);
        }
        Ok(self.entries.iter().map(|(s, _)| s.clone()).collect())
    }

    fn capture(&mut self, section: &Section) -> Result<RasterImage> {
        let (_, path) = self
            .entries
            .iter()
            .find(|(s, _)| s == section)
            .ok_or_else(|| Error::CaptureError(format!("unknown section '{}'", section.id)))?;
        RasterImage::open(path).map_err(|e| Error::CaptureError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> CaptureOptions {
        CaptureOptions {
            width: 200,
            chart_height: 80,
            chart_gap: 10,
            row_height: 10,
            table_chunk: 40,
        }
    }

    #[test]
    fn demo_sections_in_order() {
        let surface = RasterSurface::new(small());
        let ids: Vec<String> = surface.printable_sections().unwrap().into_iter().map(|s| s.id).collect();
        // 90 rows in chunks of 40 -> three table sections
        assert_eq!(ids, vec!["charts", "table-0", "table-1", "table-2", "list"]);
    }

    #[test]
    fn chart_block_stacks_three_charts() {
        let mut surface = RasterSurface::new(small());
        let sections = surface.printable_sections().unwrap();
        assert!(sections[0].is_multi_chart());
        let img = surface.capture(&sections[0]).unwrap();
        assert_eq!((img.width(), img.height()), (200, 80 * 3 + 10 * 2));
    }

    #[test]
    fn table_chunk_heights() {
        let mut surface = RasterSurface::new(small());
        let last = surface.capture(&Section::new("table-2", 0)).unwrap();
        // 10 remaining rows plus the header row
        assert_eq!(last.height(), 110);
        assert!(surface.capture(&Section::new("table-9", 0)).is_err());
    }

    #[test]
    fn cell_and_list_text_is_painted() {
        let options = CaptureOptions {
            row_height: 24,
            ..small()
        };
        let mut a = RasterSurface::new(options.clone()).with_content(
            vec![Person { name: "Juan", surname: "garcia", country: "españa", age: 30 }],
            vec!["hello world".to_string()],
        );
        let mut b = RasterSurface::new(options).with_content(
            vec![Person { name: "Zzzz", surname: "QQQQQQ", country: "xxxxxx", age: 99 }],
            vec!["HELLO WORLD".to_string()],
        );
        for id in ["table-0", "list"] {
            let section = Section::new(id, 0);
            let (pa, pb) = (a.capture(&section).unwrap(), b.capture(&section).unwrap());
            assert_eq!((pa.width(), pa.height()), (pb.width(), pb.height()));
            assert_ne!(pa.fingerprint(), pb.fingerprint(), "{} text not rendered", id);
        }
    }

    #[test]
    fn long_list_lines_wrap() {
        let options = CaptureOptions {
            width: 120,
            row_height: 20,
            ..small()
        };
        let long = "uno dos tres cuatro cinco seis siete ocho nueve diez".to_string();
        let mut surface = RasterSurface::new(options).with_content(Vec::new(), vec![long, "uno".to_string()]);
        let img = surface.capture(&Section::new(LIST_SECTION, 0)).unwrap();
        assert!(img.height() > 40);
        assert_eq!(img.height() % 20, 0);
    }

    #[test]
    fn detached_surface_has_no_target() {
        let surface = RasterSurface::detached(small());
        assert!(matches!(surface.printable_sections(), Err(Error::MissingCaptureTarget)));
    }

    #[test]
    fn empty_file_surface_has_no_sections() {
        let surface = FileSurface::new();
        assert!(matches!(surface.printable_sections(), Err(Error::NoSections)));
    }

    #[test]
    fn file_surface_decodes_png() {
        let dir = std::env::temp_dir().join(format!("newsboard-surface-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("block.png");
        let img = RasterImage::solid(12, 30, [10, 20, 30, 255]);
        std::fs::write(&path, img.to_png().unwrap()).unwrap();

        let mut surface = FileSurface::new();
        surface.push(&path, true);
        let sections = surface.printable_sections().unwrap();
        assert!(sections[0].is_multi_chart());
        let captured = surface.capture(&sections[0]).unwrap();
        assert_eq!(captured.fingerprint(), img.fingerprint());

        std::fs::remove_dir_all(&dir).ok();
    }
}
