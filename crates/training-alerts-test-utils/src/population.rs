//! Seeded synthetic populations.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use training_alerts_core::stubs::{
    InMemoryFeatureSource, InMemoryOffCurriculum, InMemoryPercentileSource, InMemorySessionStore,
};
use training_alerts_core::types::{
    FeaturePercentileRow, SessionPercentileRow, SessionRecord, TRACKED_FEATURES,
};
use training_alerts_core::AlertSources;

use crate::fixtures::SessionBuilder;

/// Stubs holding one generated population.
#[derive(Debug, Clone)]
pub struct SyntheticPopulation {
    pub sessions: Arc<InMemorySessionStore>,
    pub percentiles: Arc<InMemoryPercentileSource>,
    pub features: Arc<InMemoryFeatureSource>,
    pub off_curriculum: Arc<InMemoryOffCurriculum>,
    pub subject_ids: Vec<String>,
}

impl SyntheticPopulation {
    /// All four collaborators wired in.
    pub fn sources(&self) -> AlertSources {
        AlertSources::new()
            .with_sessions(self.sessions.clone())
            .with_percentiles(self.percentiles.clone())
            .with_features(self.features.clone())
            .with_off_curriculum(self.off_curriculum.clone())
    }

    /// Everything except the feature source.
    pub fn sources_without_features(&self) -> AlertSources {
        AlertSources::new()
            .with_sessions(self.sessions.clone())
            .with_percentiles(self.percentiles.clone())
            .with_off_curriculum(self.off_curriculum.clone())
    }
}

/// Generates subjects with random histories and percentiles.
///
/// The same seed always produces the same population.
#[derive(Debug, Clone)]
pub struct PopulationBuilder {
    seed: u64,
    subjects: usize,
    max_sessions: u32,
    missing_percentile_rate: f64,
    off_curriculum_rate: f64,
    with_features: bool,
}

impl PopulationBuilder {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            subjects: 20,
            max_sessions: 50,
            missing_percentile_rate: 0.1,
            off_curriculum_rate: 0.05,
            with_features: false,
        }
    }

    pub fn subjects(mut self, subjects: usize) -> Self {
        self.subjects = subjects;
        self
    }

    pub fn max_sessions(mut self, max_sessions: u32) -> Self {
        self.max_sessions = max_sessions.max(1);
        self
    }

    pub fn missing_percentile_rate(mut self, rate: f64) -> Self {
        self.missing_percentile_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn off_curriculum_rate(mut self, rate: f64) -> Self {
        self.off_curriculum_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Also emit one current comprehensive row per subject.
    pub fn with_features(mut self) -> Self {
        self.with_features = true;
        self
    }

    pub fn build(self) -> SyntheticPopulation {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let stages = ["STAGE_1", "STAGE_2", "STAGE_3", "STAGE_4", "STAGE_FINAL"];

        let mut sessions: Vec<SessionRecord> = Vec::new();
        let mut percentile_rows = Vec::new();
        let mut feature_rows = Vec::new();
        let mut subject_ids = Vec::with_capacity(self.subjects);

        for index in 0..self.subjects {
            let subject_id = format!("subject_{:04}", index);
            let count = rng.gen_range(1..=self.max_sessions);
            let stage = stages[rng.gen_range(0..stages.len())];
            let off_curriculum = rng.gen_bool(self.off_curriculum_rate);

            for n in 1..=count {
                let mut builder = SessionBuilder::new(&subject_id, n)
                    .stage(stage)
                    .water(Some(rng.gen_range(0.0..5.0)));
                if off_curriculum && n == count {
                    builder = builder.off_curriculum();
                }
                sessions.push(builder.build());
            }

            let overall = (!rng.gen_bool(self.missing_percentile_rate))
                .then(|| rng.gen_range(0.0..100.0));
            let mut row = SessionPercentileRow::new(subject_id.clone(), overall)
                .with_strata(format!("Uncoupled Baiting_{}_v2", stage));
            for feature in TRACKED_FEATURES {
                row = row.with_feature(feature, Some(rng.gen_range(0.0..100.0)));
            }
            percentile_rows.push(row);

            if self.with_features {
                let mut feature_row =
                    FeaturePercentileRow::new(subject_id.clone(), format!("Uncoupled Baiting_{}_v2", stage), true);
                for feature in TRACKED_FEATURES {
                    let processed = rng.gen_range(0.1..10.0);
                    let half_width = rng.gen_range(0.0..processed);
                    feature_row = feature_row
                        .with_percentile(feature, Some(rng.gen_range(0.0..100.0)))
                        .with_processed(feature, Some(processed))
                        .with_ci(feature, processed - half_width, processed + half_width);
                }
                feature_rows.push(feature_row);
            }

            subject_ids.push(subject_id);
        }

        let off_curriculum = InMemoryOffCurriculum::from_sessions(&sessions);
        SyntheticPopulation {
            sessions: Arc::new(InMemorySessionStore::new(sessions)),
            percentiles: Arc::new(InMemoryPercentileSource::new(percentile_rows)),
            features: Arc::new(InMemoryFeatureSource::new(feature_rows)),
            off_curriculum: Arc::new(off_curriculum),
            subject_ids,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use training_alerts_core::traits::SessionStore;

    #[test]
    fn test_same_seed_same_population() {
        let a = PopulationBuilder::new(7).subjects(10).build();
        let b = PopulationBuilder::new(7).subjects(10).build();
        assert_eq!(a.sessions.all_sessions().unwrap(), b.sessions.all_sessions().unwrap());
        assert_eq!(a.subject_ids.len(), 10);
    }

    #[test]
    fn test_off_curriculum_rate_one_marks_everyone() {
        let population = PopulationBuilder::new(1).subjects(5).off_curriculum_rate(1.0).build();
        assert_eq!(population.off_curriculum.len(), 5);
    }
}
