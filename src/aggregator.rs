//! Category data aggregation.
//!
//! The aggregator keeps at most one sample per category and broadcasts the
//! updated aggregate to every subscriber whenever a new sample is stored.
//! Completion is a property of the aggregate (sample count equals the
//! expected count), consumers decide for themselves when to act on it.

use serde::Serialize;
use tokio::sync::watch;

/// One `totalResults` figure for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySample {
    pub category: String,
    #[serde(rename = "totalResults")]
    pub total_results: u64,
}

impl CategorySample {
    pub fn new(category: impl Into<String>, total_results: u64) -> Self {
        Self {
            category: category.into(),
            total_results,
        }
    }
}

/// Samples collected so far, in arrival order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Aggregate {
    pub samples: Vec<CategorySample>,
    pub expected: usize,
}

impl Aggregate {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// True once exactly the expected number of categories reported.
    pub fn is_complete(&self) -> bool {
        self.samples.len() == self.expected
    }

    pub fn get(&self, category: &str) -> Option<u64> {
        self.samples
            .iter()
            .find(|s| s.category == category)
            .map(|s| s.total_results)
    }
}

/// Collects one sample per category and broadcasts every stored update.
#[derive(Debug)]
pub struct CategoryAggregator {
    aggregate: Aggregate,
    tx: watch::Sender<Option<Aggregate>>,
}

impl CategoryAggregator {
    /// An empty aggregator waiting for `expected` distinct categories.
    pub fn new(expected: usize) -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            aggregate: Aggregate {
                samples: Vec::new(),
                expected,
            },
            tx,
        }
    }

    /// Store `sample` unless its category already reported.
    ///
    /// Returns whether the sample was stored. Duplicates never overwrite an
    /// existing sample and are not broadcast.
    pub fn record(&mut self, sample: CategorySample) -> bool {
        if self.aggregate.get(&sample.category).is_some() {
            log::debug!("ignoring duplicate sample for '{}'", sample.category);
            return false;
        }
        log::debug!(
            "stored '{}' = {} ({}/{})",
            sample.category,
            sample.total_results,
            self.aggregate.len() + 1,
            self.aggregate.expected
        );
        self.aggregate.samples.push(sample);
        self.tx.send_replace(Some(self.aggregate.clone()));
        true
    }

    pub fn is_complete(&self) -> bool {
        self.aggregate.is_complete()
    }

    pub fn expected(&self) -> usize {
        self.aggregate.expected
    }

    pub fn snapshot(&self) -> &Aggregate {
        &self.aggregate
    }

    /// Receiver of every aggregate stored from now on. Holds `None` until the
    /// first sample arrives.
    pub fn subscribe(&self) -> watch::Receiver<Option<Aggregate>> {
        self.tx.subscribe()
    }
}

/// Turns the completion condition into a one-shot trigger.
#[derive(Debug, Default)]
pub struct CompletionLatch {
    fired: bool,
}

impl CompletionLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// True for the first complete aggregate observed, false afterwards.
    pub fn observe(&mut self, aggregate: &Aggregate) -> bool {
        if self.fired || !aggregate.is_complete() {
            return false;
        }
        self.fired = true;
        true
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }
}
