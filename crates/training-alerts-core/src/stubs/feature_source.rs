//! In-memory comprehensive feature-percentile table.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::CoreResult;
use crate::traits::FeaturePercentileSource;
use crate::types::FeaturePercentileRow;

#[derive(Debug, Clone, Default)]
pub struct InMemoryFeatureSource {
    rows: Arc<RwLock<Vec<FeaturePercentileRow>>>,
}

impl InMemoryFeatureSource {
    pub fn new(rows: Vec<FeaturePercentileRow>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows)),
        }
    }

    pub fn push(&self, row: FeaturePercentileRow) {
        self.rows.write().push(row);
    }
}

impl FeaturePercentileSource for InMemoryFeatureSource {
    fn comprehensive_rows(&self) -> CoreResult<Vec<FeaturePercentileRow>> {
        Ok(self.rows.read().clone())
    }
}
