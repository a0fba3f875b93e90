//! Newsboard
//!
//! A news-category dashboard for Rust: it collects one `totalResults` figure
//! per news category, renders the figures as charts next to static tables and
//! lists, and exports the rendered sections as a paginated PDF document.
//!
//! # Features
//!
//! - **Pluggable surfaces**: rendering and capture sit behind the [`Surface`]
//!   trait, so the exporter runs without any real display
//! - **Page compositing**: tall chart captures are sliced to fit the page and
//!   every page receives a branded header and a page-number footer
//! - **`fetch`** (default): HTTP client for the news API
//!
//! # Example
//!
//! ```no_run
//! use newsboard::{CategorySample, Dashboard, DashboardConfig};
//! use newsboard::surface::RasterSurface;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DashboardConfig::default();
//! let surface = RasterSurface::new(config.capture.clone());
//! let mut dashboard = Dashboard::new(config, surface)?;
//!
//! for category in ["business", "entertainment", "general", "technology", "health", "science", "sports"] {
//!     dashboard.notify(CategorySample::new(category, 100))?;
//! }
//! assert!(dashboard.is_complete());
//!
//! let doc = dashboard.export()?;
//! doc.save_in(".")?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

pub mod error;
pub use error::{Error, Result};

// Raster images, the splitter and chart painting
pub mod rendering;

// Page compositing, header/footer decoration and PDF output
pub mod export;

pub mod aggregator;
pub mod source;

// HTTP client for the news API
#[cfg(feature = "fetch")]
pub mod news_api;

pub mod demo;
pub mod surface;
pub mod dashboard;

// Async-friendly facade (worker-thread backed)
pub mod async_api;

pub use aggregator::{Aggregate, CategoryAggregator, CategorySample, CompletionLatch};
pub use async_api::DashboardHandle;
pub use dashboard::Dashboard;
pub use export::{export_document, ExportedDocument, Page, Placement};
pub use rendering::chart::ChartSeries;
pub use rendering::{Font, RasterImage};

/// Categories requested from the news API, in chart order.
pub const DEFAULT_CATEGORIES: [&str; 7] = [
    "business",
    "entertainment",
    "general",
    "technology",
    "health",
    "science",
    "sports",
];

/// Top-level configuration
///
/// Every field has a default, so a JSON configuration file only needs to
/// carry the values it wants to change.
///
/// # Examples
///
/// ```
/// let cfg = newsboard::DashboardConfig::default();
/// assert_eq!(cfg.categories.len(), 7);
/// assert_eq!(cfg.export.file_name, "dashboard.pdf");
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Categories to collect; the aggregate is complete once every one reported
    pub categories: Vec<String>,
    /// News API settings
    pub news: NewsApiConfig,
    /// Document export settings
    pub export: ExportConfig,
    /// Geometry of the built-in raster surface
    pub capture: CaptureOptions,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            news: NewsApiConfig::default(),
            export: ExportConfig::default(),
            capture: CaptureOptions::default(),
        }
    }
}

impl DashboardConfig {
    /// Load a configuration from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: DashboardConfig = serde_json::from_str(&text).map_err(|e| {
            Error::ConfigError(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the exporter cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            return Err(Error::ConfigError("at least one category is required".into()));
        }
        let layout = &self.export.layout;
        if layout.page_width <= 0.0 || layout.page_height <= 0.0 {
            return Err(Error::ConfigError(format!(
                "page size must be positive, got {}x{}",
                layout.page_width, layout.page_height
            )));
        }
        if layout.reserved_space() >= layout.page_height {
            return Err(Error::ConfigError(format!(
                "header ({}) and footer ({}) leave no room on a {}px page",
                layout.header_height, layout.footer_height, layout.page_height
            )));
        }
        if !(1..=100).contains(&self.export.jpeg_quality) {
            return Err(Error::ConfigError(format!(
                "jpeg_quality must be within 1..=100, got {}",
                self.export.jpeg_quality
            )));
        }
        if self.capture.width == 0 {
            return Err(Error::ConfigError("capture width must be positive".into()));
        }
        Ok(())
    }
}

/// Settings for the news API data source
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NewsApiConfig {
    /// Endpoint returning `{ "totalResults": n }` per category
    pub base_url: String,
    /// Country filter sent with every request
    pub country: String,
    /// API key (the binary also reads `NEWS_API_KEY`)
    pub api_key: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// User agent string to send with requests
    pub user_agent: String,
}

impl Default for NewsApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://newsapi.org/v2/top-headlines".to_string(),
            country: "us".to_string(),
            api_key: String::new(),
            timeout_ms: 30000,
            user_agent: concat!("newsboard/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Settings for the exported document
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub layout: PageLayout,
    /// Name of the emitted file
    pub file_name: String,
    pub branding: Branding,
    /// Fill colour of the header and footer bands
    pub band_color: Rgb,
    /// Margin around the header and footer bands
    pub band_padding: f32,
    /// Font size of header and footer text
    pub font_size: f32,
    pub locale: Locale,
    /// JPEG quality used for embedded captures
    pub jpeg_quality: u8,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            layout: PageLayout::default(),
            file_name: "dashboard.pdf".to_string(),
            branding: Branding::default(),
            band_color: Rgb::new(0xCC, 0xCC, 0xCC),
            band_padding: 10.0,
            font_size: 11.0,
            locale: Locale::default(),
            jpeg_quality: 90,
        }
    }
}

/// Page geometry in pixels. The defaults describe A4 portrait at 96 DPI.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    pub page_width: f32,
    pub page_height: f32,
    /// Height kept free at the top of every page
    pub header_height: f32,
    /// Height kept free at the bottom of every page
    pub footer_height: f32,
    /// Extra gap below the header on the first page only
    pub start_gap: f32,
    /// Amount by which placed images are narrower than the page
    pub image_inset: f32,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            page_width: 794.0,
            page_height: 1123.0,
            header_height: 55.0,
            footer_height: 10.0,
            start_gap: 5.0,
            image_inset: 10.0,
        }
    }
}

impl PageLayout {
    /// Space taken by the header and footer bands together.
    pub fn reserved_space(&self) -> f32 {
        self.header_height + self.footer_height
    }
}

/// Static branding printed in every header
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Branding {
    pub name: String,
    pub phone: String,
    pub address: String,
    /// Logo drawn centred in the header; skipped when unreadable
    pub logo_path: Option<PathBuf>,
    /// Logo edge length in pixels
    pub logo_size: f32,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            name: "Nombre de la Empresa".to_string(),
            phone: "Teléfono: 123-456-789".to_string(),
            address: "Dirección: Calle Principal, 123".to_string(),
            logo_path: Some(PathBuf::from("assets/icon/favicon.png")),
            logo_size: 45.0,
        }
    }
}

/// Language of the footer page label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Es,
    En,
}

impl Locale {
    /// Footer text for page `page` (1-indexed) of `total`.
    pub fn page_label(&self, page: usize, total: usize) -> String {
        match self {
            Locale::Es => format!("Página {} de {}", page, total),
            Locale::En => format!("Page {} of {}", page, total),
        }
    }
}

/// An opaque RGB colour, deserialised from `"#RRGGBB"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Components scaled to `0.0..=1.0` as PDF colour operators expect.
    pub fn unit(&self) -> (f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        let hex = value.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(format!("expected #RRGGBB, got '{}'", value));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| format!("expected #RRGGBB, got '{}'", value))
        };
        Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Geometry of the built-in raster surface
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaptureOptions {
    /// Width of every captured section in pixels
    pub width: u32,
    /// Height of each chart inside the chart section
    pub chart_height: u32,
    /// Vertical gap between stacked charts
    pub chart_gap: u32,
    /// Height of one table row or list line
    pub row_height: u32,
    /// Number of table rows per printable table section
    pub table_chunk: usize,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            width: 1000,
            chart_height: 400,
            chart_gap: 20,
            row_height: 24,
            table_chunk: 30,
        }
    }
}

/// One printable region of the rendered dashboard.
///
/// A section is a handle: its pixels are only produced when the owning
/// [`Surface`] captures it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Identifier unique within the surface
    pub id: String,
    /// Number of chart children inside the section
    pub chart_count: usize,
}

impl Section {
    pub fn new(id: impl Into<String>, chart_count: usize) -> Self {
        Self {
            id: id.into(),
            chart_count,
        }
    }

    /// Sections holding charts are eligible for splitting.
    pub fn is_multi_chart(&self) -> bool {
        self.chart_count > 0
    }
}

/// Rendering collaborator: draws the data-bound charts and captures printable
/// sections as raster images.
pub trait Surface {
    /// Render the category-bound charts from a complete series
    fn render_charts(&mut self, series: &ChartSeries) -> Result<()>;

    /// Ordered list of printable sections.
    ///
    /// Returns [`Error::MissingCaptureTarget`] when no container is mounted.
    fn printable_sections(&self) -> Result<Vec<Section>>;

    /// Capture one section as an immutable raster image
    fn capture(&mut self, section: &Section) -> Result<RasterImage>;
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn render_charts(&mut self, series: &ChartSeries) -> Result<()> {
        (**self).render_charts(series)
    }

    fn printable_sections(&self) -> Result<Vec<Section>> {
        (**self).printable_sections()
    }

    fn capture(&mut self, section: &Section) -> Result<RasterImage> {
        (**self).capture(section)
    }
}
