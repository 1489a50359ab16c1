//! In-memory session-percentile source.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::CoreResult;
use crate::traits::PercentileSource;
use crate::types::{SessionPercentileRow, SubjectId};

/// Session percentile rows keyed by subject. Inserting a row for an
/// existing subject replaces it.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPercentileSource {
    rows: Arc<RwLock<BTreeMap<SubjectId, SessionPercentileRow>>>,
}

impl InMemoryPercentileSource {
    pub fn new(rows: impl IntoIterator<Item = SessionPercentileRow>) -> Self {
        let source = Self::default();
        for row in rows {
            source.insert(row);
        }
        source
    }

    pub fn insert(&self, row: SessionPercentileRow) {
        self.rows.write().insert(row.subject_id.clone(), row);
    }
}

impl PercentileSource for InMemoryPercentileSource {
    fn session_overall_percentiles(
        &self,
        subject_ids: Option<&[SubjectId]>,
    ) -> CoreResult<Vec<SessionPercentileRow>> {
        let rows = self.rows.read();
        Ok(match subject_ids {
            None => rows.values().cloned().collect(),
            Some(ids) => ids.iter().filter_map(|id| rows.get(id).cloned()).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_lookup_skips_unknown_subjects() {
        let source = InMemoryPercentileSource::new([
            SessionPercentileRow::new("a", Some(10.0)),
            SessionPercentileRow::new("b", None),
        ]);
        let ids = vec!["b".to_string(), "missing".to_string()];
        let rows = source.session_overall_percentiles(Some(&ids)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].subject_id, "b");
        assert_eq!(source.session_overall_percentiles(None).unwrap().len(), 2);
    }
}
