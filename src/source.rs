//! Data sources for per-category statistics.

use std::collections::HashMap;
use std::sync::mpsc;

use crate::aggregator::CategorySample;
use crate::{Error, Result};

/// Data source collaborator: one request per category.
pub trait CategorySource: Sync {
    /// Fetch the `totalResults` figure for `category`.
    fn fetch(&self, category: &str) -> Result<u64>;
}

/// Fixed figures, used offline and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    values: HashMap<String, u64>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every category in `categories` answers with `value`.
    pub fn uniform<I, S>(categories: I, value: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = categories.into_iter().map(|c| (c.into(), value)).collect();
        Self { values }
    }

    pub fn with(mut self, category: impl Into<String>, value: u64) -> Self {
        self.values.insert(category.into(), value);
        self
    }
}

impl CategorySource for StaticSource {
    fn fetch(&self, category: &str) -> Result<u64> {
        self.values
            .get(category)
            .copied()
            .ok_or_else(|| Error::MalformedResponse {
                category: category.to_string(),
                detail: "totalResults is not defined".to_string(),
            })
    }
}

/// Request every category concurrently and hand each successful sample to
/// `on_sample` as it arrives, on the calling thread.
///
/// Failures are logged and dropped; no retries are made. Returns the number
/// of samples delivered.
pub fn fetch_all<S, F>(source: &S, categories: &[String], mut on_sample: F) -> usize
where
    S: CategorySource + ?Sized,
    F: FnMut(CategorySample),
{
    let (tx, rx) = mpsc::channel::<(String, Result<u64>)>();

    std::thread::scope(|scope| {
        for category in categories {
            let tx = tx.clone();
            scope.spawn(move || {
                let res = source.fetch(category);
                let _ = tx.send((category.clone(), res));
            });
        }
        drop(tx);

        let mut delivered = 0;
        for (category, res) in rx {
            match res {
                Ok(total) => {
                    on_sample(CategorySample::new(category, total));
                    delivered += 1;
                }
                Err(e) => log::error!("dropping category '{}': {}", category, e),
            }
        }
        delivered
    })
}
