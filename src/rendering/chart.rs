//! Chart models and their raster painting.
//!
//! Every chart carries a legend across the top. Bar and line charts add
//! value ticks on the y axis and category labels under the x axis.

use image::Rgba;

use super::paint::{opaque, tint, Canvas};
use super::text::Font;
use super::RasterImage;
use crate::aggregator::CategorySample;
use crate::Result;

/// Border colours, index-aligned with category order.
pub const PALETTE: [(u8, u8, u8); 7] = [
    (255, 99, 132),
    (255, 159, 64),
    (255, 205, 86),
    (75, 192, 192),
    (54, 162, 235),
    (153, 102, 255),
    (201, 203, 207),
];

/// Opacity of the fill colours relative to [`PALETTE`].
pub const FILL_ALPHA: f32 = 0.2;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const AXIS: Rgba<u8> = Rgba([102, 102, 102, 255]);
const GRID: Rgba<u8> = Rgba([230, 230, 230, 255]);
const LABEL: Rgba<u8> = Rgba([68, 68, 68, 255]);

pub fn fill_color(index: usize) -> Rgba<u8> {
    tint(PALETTE[index % PALETTE.len()], FILL_ALPHA)
}

pub fn border_color(index: usize) -> Rgba<u8> {
    opaque(PALETTE[index % PALETTE.len()])
}

/// `"business"` -> `"Business"`
pub fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Labelled values for the category bar chart
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<u64>,
}

impl ChartSeries {
    /// Order `samples` by `order`; categories not listed follow in arrival order.
    pub fn from_samples(samples: &[CategorySample], order: &[String]) -> Self {
        let mut picked: Vec<&CategorySample> = order
            .iter()
            .filter_map(|cat| samples.iter().find(|s| &s.category == cat))
            .collect();
        for s in samples {
            if !order.contains(&s.category) {
                picked.push(s);
            }
        }
        Self {
            labels: picked.iter().map(|s| capitalize(&s.category)).collect(),
            values: picked.iter().map(|s| s.total_results).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One line of the static line chart
#[derive(Debug, Clone, PartialEq)]
pub struct LineDataset {
    pub label: &'static str,
    pub data: [u64; 7],
    /// Index into [`PALETTE`]
    pub color: usize,
}

pub const LINE_LABELS: [&str; 7] = [
    "January", "February", "March", "April", "May", "June", "July",
];

pub const LINE_DATASETS: [LineDataset; 3] = [
    LineDataset { label: "First dataset", data: [10, 25, 40, 35, 50, 65, 80], color: 0 },
    LineDataset { label: "Second dataset", data: [80, 65, 50, 55, 40, 30, 20], color: 3 },
    LineDataset { label: "Third dataset", data: [30, 45, 60, 50, 70, 55, 75], color: 5 },
];

pub const PIE_LABELS: [&str; 7] = ["Red", "Orange", "Yellow", "Green", "Blue", "Purple", "Gray"];
pub const PIE_VALUES: [u64; 7] = [10, 12, 8, 10, 20, 15, 25];

fn font_size(height: u32) -> f32 {
    (height as f32 / 20.0).clamp(6.0, 13.0)
}

fn padding(width: u32, height: u32) -> f32 {
    (width.min(height) / 12).max(4) as f32
}

struct LegendItem {
    label: String,
    color: usize,
    x: f32,
    top: f32,
}

/// Swatch-and-label entries, centred in rows that wrap at the chart width.
struct Legend {
    items: Vec<LegendItem>,
    size: f32,
    bottom: f32,
}

impl Legend {
    fn layout(font: &Font, entries: Vec<(String, usize)>, width: u32, top: f32, size: f32) -> Self {
        let swatch = size * 2.0;
        let gap = size;
        let max_row = width as f32 - 2.0 * size;
        let entry_width = |label: &str| swatch + size * 0.4 + font.measure(label, size);

        let mut rows: Vec<(Vec<(String, usize)>, f32)> = Vec::new();
        for (label, color) in entries {
            let w = entry_width(label.as_str());
            match rows.last_mut() {
                Some((row, row_w)) if *row_w + gap + w <= max_row => {
                    *row_w += gap + w;
                    row.push((label, color));
                }
                _ => rows.push((vec![(label, color)], w)),
            }
        }

        let row_height = size * 1.5;
        let mut items = Vec::new();
        for (r, (row, row_w)) in rows.iter().enumerate() {
            let mut x = ((width as f32 - row_w) / 2.0).max(size);
            let row_top = top + r as f32 * row_height;
            for (label, color) in row {
                items.push(LegendItem {
                    label: label.clone(),
                    color: *color,
                    x,
                    top: row_top,
                });
                x += entry_width(label.as_str()) + gap;
            }
        }
        Self {
            items,
            size,
            bottom: top + rows.len() as f32 * row_height,
        }
    }

    fn paint(&self, canvas: &mut Canvas, font: &Font) {
        let s = self.size;
        for item in &self.items {
            canvas.fill_rect(item.x, item.top + s * 0.2, s * 2.0, s * 0.9, fill_color(item.color));
            canvas.stroke_rect(item.x, item.top + s * 0.2, s * 2.0, s * 0.9, border_color(item.color));
            canvas.text(font, item.x + s * 2.4, item.top + s, &item.label, s, LABEL);
        }
    }
}

/// Plot rectangle below a legend, leaving room for tick and category labels.
struct Plot {
    left: f32,
    top: f32,
    width: f32,
    height: f32,
    size: f32,
}

impl Plot {
    fn below(legend: &Legend, width: u32, height: u32) -> Self {
        let pad = padding(width, height);
        let size = legend.size;
        let left = pad + size * 3.0;
        let top = legend.bottom + size * 0.5;
        Self {
            left,
            top,
            width: (width as f32 - left - pad).max(0.0),
            height: (height as f32 - top - pad - size * 1.6).max(0.0),
            size,
        }
    }

    fn bottom(&self) -> f32 {
        self.top + self.height
    }

    fn right(&self) -> f32 {
        self.left + self.width
    }

    /// Pixel row for `value` on a zero-based axis topping out at `max`.
    fn y_for(&self, value: u64, max: u64) -> f32 {
        if max == 0 {
            return self.bottom();
        }
        self.bottom() - (value as f64 / max as f64) as f32 * self.height
    }

    /// Grid, axes and, when `max > 0`, the tick values on the y axis.
    fn axes(&self, canvas: &mut Canvas, font: &Font, max: u64) {
        for step in 0..=4u64 {
            let y = self.bottom() - self.height * step as f32 / 4.0;
            if step > 0 {
                canvas.line(self.left, y, self.right(), y, GRID);
            }
            if max > 0 {
                let tick = (max * step / 4).to_string();
                let x = self.left - self.size * 0.4 - font.measure(&tick, self.size);
                canvas.text(font, x, y + self.size * 0.35, &tick, self.size, LABEL);
            }
        }
        canvas.line(self.left, self.top, self.left, self.bottom(), AXIS);
        canvas.line(self.left, self.bottom(), self.right(), self.bottom(), AXIS);
    }

    /// Labels centred on `centers` under the x axis, cut to `slot` pixels.
    fn x_labels<T: AsRef<str>>(&self, canvas: &mut Canvas, font: &Font, labels: &[T], centers: &[f32], slot: f32) {
        let baseline = self.bottom() + self.size * 1.3;
        for (label, center) in labels.iter().zip(centers) {
            let text = font.truncate(label.as_ref(), self.size, slot - 2.0);
            let x = center - font.measure(&text, self.size) / 2.0;
            canvas.text(font, x, baseline, &text, self.size, LABEL);
        }
    }
}

fn bar_layout(font: &Font, series: &ChartSeries, width: u32, height: u32) -> (Legend, Plot) {
    let entries = series.labels.iter().cloned().enumerate().map(|(i, l)| (l, i)).collect();
    let legend = Legend::layout(font, entries, width, padding(width, height) / 2.0, font_size(height));
    let plot = Plot::below(&legend, width, height);
    (legend, plot)
}

/// Bar chart with one bar per category; an empty series paints the axes only.
pub fn paint_bar_chart(font: &Font, series: &ChartSeries, width: u32, height: u32) -> Result<RasterImage> {
    let mut canvas = Canvas::new(width, height, WHITE)?;
    let (legend, plot) = bar_layout(font, series, width, height);
    legend.paint(&mut canvas, font);

    let max = series.values.iter().copied().max().unwrap_or(0);
    plot.axes(&mut canvas, font, max);

    if !series.is_empty() {
        let slot = plot.width / series.len() as f32;
        let bar = slot * 0.72;
        let mut centers = Vec::with_capacity(series.len());
        for (i, value) in series.values.iter().enumerate() {
            let x = plot.left + slot * i as f32 + (slot - bar) / 2.0;
            let y = plot.y_for(*value, max);
            canvas.fill_rect(x, y, bar, plot.bottom() - y, fill_color(i));
            canvas.stroke_rect(x, y, bar, plot.bottom() - y, border_color(i));
            centers.push(x + bar / 2.0);
        }
        plot.x_labels(&mut canvas, font, &series.labels, &centers, slot);
    }
    canvas.into_raster()
}

/// Line chart of the three static datasets.
pub fn paint_line_chart(font: &Font, width: u32, height: u32) -> Result<RasterImage> {
    let mut canvas = Canvas::new(width, height, WHITE)?;
    let entries = LINE_DATASETS.iter().map(|d| (d.label.to_string(), d.color)).collect();
    let legend = Legend::layout(font, entries, width, padding(width, height) / 2.0, font_size(height));
    legend.paint(&mut canvas, font);
    let plot = Plot::below(&legend, width, height);

    let max = LINE_DATASETS
        .iter()
        .flat_map(|d| d.data.iter().copied())
        .max()
        .unwrap_or(0);
    plot.axes(&mut canvas, font, max);

    let step = plot.width / (LINE_LABELS.len() - 1) as f32;
    let xs: Vec<f32> = (0..LINE_LABELS.len()).map(|i| plot.left + step * i as f32).collect();
    for dataset in &LINE_DATASETS {
        let color = border_color(dataset.color);
        let points: Vec<(f32, f32)> = xs
            .iter()
            .zip(dataset.data.iter())
            .map(|(x, v)| (*x, plot.y_for(*v, max)))
            .collect();
        canvas.polyline(&points, color, 2.0);
        for (x, y) in points {
            canvas.fill_circle(x, y, 3.0, color);
            canvas.fill_circle(x, y, 2.0, fill_color(dataset.color));
        }
    }
    plot.x_labels(&mut canvas, font, &LINE_LABELS, &xs, step);
    canvas.into_raster()
}

/// Pie chart of the static values, one wedge per palette entry.
pub fn paint_pie_chart(font: &Font, width: u32, height: u32) -> Result<RasterImage> {
    let mut canvas = Canvas::new(width, height, WHITE)?;
    let pad = padding(width, height);
    let entries = PIE_LABELS.iter().enumerate().map(|(i, l)| (l.to_string(), i)).collect();
    let legend = Legend::layout(font, entries, width, pad / 2.0, font_size(height));
    legend.paint(&mut canvas, font);

    let top = legend.bottom + pad / 2.0;
    let available = (height as f32 - top - pad).max(0.0);
    let radius = ((width as f32 - 2.0 * pad).min(available) / 2.0).max(0.0);
    let (cx, cy) = (width as f32 / 2.0, top + available / 2.0);

    let total: u64 = PIE_VALUES.iter().sum();
    let mut start = 0.0_f32;
    for (i, value) in PIE_VALUES.iter().enumerate() {
        let end = start + *value as f32 / total as f32 * std::f32::consts::TAU;
        canvas.fill_wedge(cx, cy, radius, start, end, fill_color(i));
        start = end;
    }
    canvas.into_raster()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(cat: &str, n: u64) -> CategorySample {
        CategorySample::new(cat, n)
    }

    fn series(labels: &[&str], values: &[u64]) -> ChartSeries {
        ChartSeries {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            values: values.to_vec(),
        }
    }

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("business"), "Business");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn series_follows_configured_order() {
        let order: Vec<String> = ["business", "sports", "health"].iter().map(|s| s.to_string()).collect();
        let samples = vec![sample("health", 3), sample("extra", 9), sample("business", 1), sample("sports", 2)];
        let series = ChartSeries::from_samples(&samples, &order);
        assert_eq!(series.labels, vec!["Business", "Sports", "Health", "Extra"]);
        assert_eq!(series.values, vec![1, 2, 3, 9]);
    }

    #[test]
    fn bar_heights_follow_values() {
        let font = Font::default();
        let series = series(&["A", "B"], &[50, 100]);
        let img = paint_bar_chart(&font, &series, 200, 120).unwrap();
        let (_, plot) = bar_layout(&font, &series, 200, 120);
        let slot = plot.width / 2.0;
        let mid_a = (plot.left + slot * 0.5) as u32;
        let mid_b = (plot.left + slot * 1.5) as u32;
        // Just below the top of the plot only the taller bar is filled.
        let row = (plot.top + 3.0) as u32;
        assert_eq!(*img.pixels().get_pixel(mid_b, row), fill_color(1));
        assert_ne!(*img.pixels().get_pixel(mid_a, row), fill_color(0));
        assert_eq!(*img.pixels().get_pixel(mid_a, plot.bottom() as u32 - 3), fill_color(0));
    }

    #[test]
    fn bar_labels_are_drawn() {
        let font = Font::default();
        let a = paint_bar_chart(&font, &series(&["Business", "Sports"], &[5, 9]), 300, 160).unwrap();
        let b = paint_bar_chart(&font, &series(&["Health", "Science"], &[5, 9]), 300, 160).unwrap();
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn legend_wraps_to_chart_width() {
        let font = Font::default();
        let entries: Vec<(String, usize)> = PIE_LABELS.iter().enumerate().map(|(i, l)| (l.to_string(), i)).collect();
        let wide = Legend::layout(&font, entries.clone(), 2000, 0.0, 10.0);
        let narrow = Legend::layout(&font, entries, 120, 0.0, 10.0);
        assert_eq!(wide.bottom, 15.0);
        assert!(narrow.bottom > wide.bottom);
        assert_eq!(narrow.items.len(), PIE_LABELS.len());
    }

    #[test]
    fn charts_have_requested_size() {
        let font = Font::default();
        assert_eq!(paint_line_chart(&font, 300, 150).unwrap().width(), 300);
        assert_eq!(paint_pie_chart(&font, 300, 150).unwrap().height(), 150);
        assert_eq!(paint_bar_chart(&font, &ChartSeries::default(), 64, 32).unwrap().height(), 32);
    }
}
