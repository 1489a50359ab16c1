//! Optional collaborator bundle.

use std::fmt;
use std::sync::Arc;

use super::{FeaturePercentileSource, OffCurriculumRegistry, PercentileSource, SessionStore};

/// The collaborators available to the engine.
///
/// Every capability is optional. A missing capability degrades the
/// affected step (no threshold records, no enrichment, ...) rather than
/// failing the request.
#[derive(Clone, Default)]
pub struct AlertSources {
    pub sessions: Option<Arc<dyn SessionStore>>,
    pub percentiles: Option<Arc<dyn PercentileSource>>,
    pub features: Option<Arc<dyn FeaturePercentileSource>>,
    pub off_curriculum: Option<Arc<dyn OffCurriculumRegistry>>,
}

impl AlertSources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sessions(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.sessions = Some(store);
        self
    }

    pub fn with_percentiles(mut self, source: Arc<dyn PercentileSource>) -> Self {
        self.percentiles = Some(source);
        self
    }

    pub fn with_features(mut self, source: Arc<dyn FeaturePercentileSource>) -> Self {
        self.features = Some(source);
        self
    }

    pub fn with_off_curriculum(mut self, registry: Arc<dyn OffCurriculumRegistry>) -> Self {
        self.off_curriculum = Some(registry);
        self
    }
}

impl fmt::Debug for AlertSources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlertSources")
            .field("sessions", &self.sessions.is_some())
            .field("percentiles", &self.percentiles.is_some())
            .field("features", &self.features.is_some())
            .field("off_curriculum", &self.off_curriculum.is_some())
            .finish()
    }
}
