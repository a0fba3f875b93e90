//! newsboard CLI - collect news category figures and export the dashboard

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use newsboard::source::{fetch_all, CategorySource, StaticSource};
use newsboard::surface::{FileSurface, RasterSurface};
use newsboard::{export_document, Dashboard, DashboardConfig};

/// Figure every category reports in offline mode.
const OFFLINE_TOTAL: u64 = 100;

#[derive(Parser)]
#[command(name = "newsboard")]
#[command(version)]
#[command(about = "News category dashboard with PDF export", long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query every category and print the aggregate as JSON
    #[cfg(feature = "fetch")]
    Fetch,

    /// Export pre-rendered PNG sections to a PDF
    Export {
        /// Output file
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Single-block section, in order
        #[arg(long = "section", value_name = "PNG")]
        sections: Vec<PathBuf>,

        /// Multi-chart section, eligible for splitting; placed before plain sections
        #[arg(long = "chart-section", value_name = "PNG")]
        chart_sections: Vec<PathBuf>,
    },

    /// Collect figures, render the dashboard and export it
    Dashboard {
        /// Output file
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Use fixed figures instead of the news API
        #[arg(long)]
        offline: bool,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<DashboardConfig> {
    let mut config = match path {
        Some(p) => DashboardConfig::from_json_file(p).with_context(|| format!("loading {}", p.display()))?,
        None => DashboardConfig::default(),
    };
    if let Ok(key) = std::env::var("NEWS_API_KEY") {
        config.news.api_key = key;
    }
    Ok(config)
}

fn output_path(out: Option<PathBuf>, config: &DashboardConfig) -> PathBuf {
    out.unwrap_or_else(|| PathBuf::from(&config.export.file_name))
}

#[cfg(feature = "fetch")]
fn online_source(config: &DashboardConfig) -> anyhow::Result<Box<dyn CategorySource>> {
    Ok(Box::new(newsboard::news_api::NewsApiClient::new(config.news.clone())?))
}

#[cfg(not(feature = "fetch"))]
fn online_source(_config: &DashboardConfig) -> anyhow::Result<Box<dyn CategorySource>> {
    bail!("built without the `fetch` feature; use --offline")
}

#[cfg(feature = "fetch")]
fn run_fetch(config: DashboardConfig) -> anyhow::Result<()> {
    let source = online_source(&config)?;
    let mut aggregator = newsboard::CategoryAggregator::new(config.categories.len());
    fetch_all(source.as_ref(), &config.categories, |sample| {
        aggregator.record(sample);
    });
    if !aggregator.is_complete() {
        log::warn!(
            "only {}/{} categories reported",
            aggregator.snapshot().len(),
            aggregator.expected()
        );
    }
    println!("{}", serde_json::to_string_pretty(aggregator.snapshot())?);
    Ok(())
}

fn run_export(
    config: DashboardConfig,
    out: Option<PathBuf>,
    sections: Vec<PathBuf>,
    chart_sections: Vec<PathBuf>,
) -> anyhow::Result<()> {
    let mut surface = FileSurface::new();
    for path in chart_sections {
        surface.push(path, true);
    }
    for path in sections {
        surface.push(path, false);
    }
    let doc = export_document(&mut surface, &config.export)?;
    doc.save_as(output_path(out, &config))?;
    Ok(())
}

fn run_dashboard(config: DashboardConfig, out: Option<PathBuf>, offline: bool) -> anyhow::Result<()> {
    let source: Box<dyn CategorySource> = if offline {
        Box::new(StaticSource::uniform(config.categories.iter().cloned(), OFFLINE_TOTAL))
    } else {
        online_source(&config)?
    };
    let categories = config.categories.clone();
    let out = output_path(out, &config);
    let surface = RasterSurface::new(config.capture.clone());
    let mut dashboard = Dashboard::new(config, surface)?;

    let mut failure = None;
    fetch_all(source.as_ref(), &categories, |sample| {
        if failure.is_none() {
            if let Err(e) = dashboard.notify(sample) {
                failure = Some(e);
            }
        }
    });
    if let Some(e) = failure {
        return Err(e.into());
    }
    if !dashboard.is_complete() {
        log::warn!("category chart not rendered: some categories did not report");
    }

    let doc = dashboard.export()?;
    doc.save_as(&out)?;
    println!("{} ({} pages)", out.display(), doc.page_count);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        #[cfg(feature = "fetch")]
        Commands::Fetch => run_fetch(config),
        Commands::Export { out, sections, chart_sections } => {
            if sections.is_empty() && chart_sections.is_empty() {
                bail!("nothing to export: pass --section or --chart-section");
            }
            run_export(config, out, sections, chart_sections)
        }
        Commands::Dashboard { out, offline } => run_dashboard(config, out, offline),
    }
}
