//! Dashboard orchestration.
//!
//! Samples go into the aggregator; the first complete aggregate renders the
//! category charts on the surface exactly once; export captures whatever the
//! surface currently shows.

use crate::aggregator::{CategoryAggregator, CategorySample, CompletionLatch};
use crate::export::{export_document, ExportedDocument};
use crate::rendering::chart::ChartSeries;
use crate::{DashboardConfig, Result, Surface};

pub struct Dashboard<S: Surface> {
    config: DashboardConfig,
    aggregator: CategoryAggregator,
    latch: CompletionLatch,
    surface: S,
    chart_renders: usize,
}

impl<S: Surface> Dashboard<S> {
    /// Validate `config` and wire a fresh aggregator to `surface`.
    pub fn new(config: DashboardConfig, surface: S) -> Result<Self> {
        config.validate()?;
        let aggregator = CategoryAggregator::new(config.categories.len());
        Ok(Self {
            config,
            aggregator,
            latch: CompletionLatch::new(),
            surface,
            chart_renders: 0,
        })
    }

    /// Feed one sample. Returns true when this sample completed the data set
    /// and the charts were rendered.
    pub fn notify(&mut self, sample: CategorySample) -> Result<bool> {
        if !self.aggregator.record(sample) {
            return Ok(false);
        }
        if !self.latch.observe(self.aggregator.snapshot()) {
            return Ok(false);
        }

        let series = ChartSeries::from_samples(&self.aggregator.snapshot().samples, &self.config.categories);
        log::info!("all {} categories reported, rendering charts", series.len());
        self.surface.render_charts(&series)?;
        self.chart_renders += 1;
        Ok(true)
    }

    pub fn is_complete(&self) -> bool {
        self.aggregator.is_complete()
    }

    /// Number of times the category charts were rendered (0 or 1).
    pub fn chart_renders(&self) -> usize {
        self.chart_renders
    }

    pub fn aggregator(&self) -> &CategoryAggregator {
        &self.aggregator
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Export the surface as a PDF document.
    pub fn export(&mut self) -> Result<ExportedDocument> {
        if !self.latch.has_fired() {
            log::warn!(
                "exporting before all categories reported ({}/{})",
                self.aggregator.snapshot().len(),
                self.aggregator.expected()
            );
        }
        export_document(&mut self.surface, &self.config.export)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RasterImage, Section};

    #[derive(Default)]
    struct Recorder {
        renders: Vec<ChartSeries>,
    }

    impl Surface for Recorder {
        fn render_charts(&mut self, series: &ChartSeries) -> Result<()> {
            self.renders.push(series.clone());
            Ok(())
        }

        fn printable_sections(&self) -> Result<Vec<Section>> {
            Ok(vec![Section::new("only", 0)])
        }

        fn capture(&mut self, _section: &Section) -> Result<RasterImage> {
            Ok(RasterImage::solid(10, 10, [0, 0, 0, 255]))
        }
    }

    #[test]
    fn renders_once_after_all_categories() {
        let config = DashboardConfig::default();
        let categories = config.categories.clone();
        let mut dash = Dashboard::new(config, Recorder::default()).unwrap();

        for (i, c) in categories.iter().enumerate() {
            let fired = dash.notify(CategorySample::new(c.as_str(), 100)).unwrap();
            assert_eq!(fired, i == categories.len() - 1);
        }
        dash.notify(CategorySample::new("business", 5)).unwrap();

        assert!(dash.is_complete());
        assert_eq!(dash.chart_renders(), 1);
        assert_eq!(dash.surface().renders.len(), 1);
        assert_eq!(dash.surface().renders[0].labels[0], "Business");
        assert_eq!(dash.aggregator().snapshot().get("business"), Some(100));
    }

    #[test]
    fn partial_data_does_not_render() {
        let mut dash = Dashboard::new(DashboardConfig::default(), Recorder::default()).unwrap();
        dash.notify(CategorySample::new("business", 1)).unwrap();
        dash.notify(CategorySample::new("sports", 1)).unwrap();
        assert!(!dash.is_complete());
        assert_eq!(dash.chart_renders(), 0);
    }

    #[test]
    fn invalid_config_rejected() {
        let config = DashboardConfig {
            categories: Vec::new(),
            ..Default::default()
        };
        assert!(Dashboard::new(config, Recorder::default()).is_err());
    }
}
