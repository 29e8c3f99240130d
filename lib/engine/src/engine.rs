use crate::config::EngineConfig;
use crate::narrative::{NarrativeAdapter, NarrativeStatus};
use crate::result::Recommendation;
use crate::snapshot::Snapshot;
use crate::{EngineError, Result};
use modelmatch_schema::RawRecord;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Holds the active snapshot and answers queries against it.
///
/// Loading builds a complete snapshot off-lock and then swaps it in under
/// a short write lock. Queries clone the current `Arc` and never hold the
/// lock while computing, so a query sees exactly one snapshot.
pub struct MatchEngine {
    config: EngineConfig,
    active: RwLock<Option<Arc<Snapshot>>>,
    narrator: Option<NarrativeAdapter>,
}

/// Matches plus whatever narrative could be produced for them
#[derive(Debug, Clone, Serialize)]
pub struct ExplainedRecommendation {
    pub recommendation: Recommendation,
    pub narrative: NarrativeStatus,
}

impl MatchEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let narrator = config
            .narrative
            .as_ref()
            .map(NarrativeAdapter::from_config)
            .transpose()?;

        Ok(Self {
            config,
            active: RwLock::new(None),
            narrator,
        })
    }

    /// Replace the narrative generator (or install one)
    #[must_use]
    pub fn with_narrator(mut self, narrator: NarrativeAdapter) -> Self {
        self.narrator = Some(narrator);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Currently published snapshot
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.active.read().clone()
    }

    /// Build a snapshot from `records` and publish it.
    ///
    /// On error the previously active snapshot stays in place.
    pub fn load(&self, records: &[RawRecord]) -> Result<Arc<Snapshot>> {
        let snapshot = Snapshot::build(records).map_err(|e| {
            warn!("Dataset load rejected: {}", e);
            e
        })?;

        let mut active = self.active.write();
        let version = active.as_ref().map_or(0, |s| s.version()) + 1;
        let snapshot = Arc::new(snapshot.with_version(version));
        *active = Some(snapshot.clone());
        drop(active);

        info!(
            version,
            records = records.len(),
            profiles = snapshot.len(),
            dimensions = snapshot.schema().dim(),
            "Snapshot published"
        );
        Ok(snapshot)
    }

    /// Cross-brand neighbors of `model_id` in the active snapshot
    pub fn recommend(&self, model_id: &str, top_n: usize) -> Result<Recommendation> {
        let snapshot = self.snapshot().ok_or(EngineError::NoSnapshot)?;
        snapshot.recommend(model_id, top_n, self.config.over_fetch)
    }

    /// Recommend, then ask the narrative generator to explain the result.
    ///
    /// Narrative failure is reported in the returned status; the
    /// recommendation is returned regardless.
    pub async fn explain(&self, model_id: &str, top_n: usize) -> Result<ExplainedRecommendation> {
        let recommendation = self.recommend(model_id, top_n)?;

        let narrative = match (&self.narrator, recommendation.matches()) {
            (None, _) => NarrativeStatus::Disabled,
            (Some(_), None) => NarrativeStatus::Skipped,
            (Some(narrator), Some(result)) => match narrator.explain(model_id, result).await {
                Ok(text) => NarrativeStatus::Generated { text },
                Err(e) => {
                    warn!(model_id, "{}", e);
                    NarrativeStatus::Unavailable {
                        reason: e.to_string(),
                    }
                }
            },
        };
        debug!(model_id, narrative = ?narrative, "explain finished");

        Ok(ExplainedRecommendation {
            recommendation,
            narrative,
        })
    }
}
