//! Immutable per-load snapshot: profiles, encoding schema and index.

use crate::filter::{CandidateFilter, CrossBrandFilter};
use crate::result::{MatchQuery, MatchResult, MatchRow, Recommendation};
use crate::{EngineError, Result};
use ahash::AHashMap;
use modelmatch_core::{FlatIndex, Neighbor, Vector};
use modelmatch_schema::{EncodingSchema, FeatureEncoder, ProfileAggregator, RawRecord, RepresentativeProfile};
use serde::Serialize;

/// Everything one dataset load produces. Never mutated once published;
/// a new load builds a new snapshot.
#[derive(Debug)]
pub struct Snapshot {
    version: u64,
    profiles: Vec<RepresentativeProfile>,
    positions: AHashMap<String, usize>,
    encoder: FeatureEncoder,
    index: FlatIndex,
    records: usize,
}

/// Summary of a snapshot for status endpoints
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotInfo {
    pub version: u64,
    pub records: usize,
    pub profiles: usize,
    pub dimensions: usize,
    pub columns: Vec<String>,
}

impl Snapshot {
    /// Aggregate, fit, encode and index `records`.
    ///
    /// Any failure aborts the whole build. The snapshot starts at version 0
    /// and receives its real version when published.
    pub fn build(records: &[RawRecord]) -> Result<Self> {
        if records.is_empty() {
            return Err(EngineError::EmptyDataset);
        }

        let profiles = ProfileAggregator::build(records);
        let encoder = FeatureEncoder::fit(&profiles)?;
        let vectors = encoder.transform_all(&profiles)?;
        let index = FlatIndex::build(vectors)?;

        let positions: AHashMap<String, usize> = profiles
            .iter()
            .enumerate()
            .map(|(position, profile)| (profile.model_id.clone(), position))
            .collect();

        if positions.len() != profiles.len() || index.len() != profiles.len() {
            return Err(EngineError::Inconsistent(format!(
                "{} profiles, {} identifiers, {} vectors",
                profiles.len(),
                positions.len(),
                index.len()
            )));
        }

        Ok(Self {
            version: 0,
            profiles,
            positions,
            encoder,
            index,
            records: records.len(),
        })
    }

    pub(crate) fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn profiles(&self) -> &[RepresentativeProfile] {
        &self.profiles
    }

    pub fn schema(&self) -> &EncodingSchema {
        self.encoder.schema()
    }

    pub fn profile(&self, model_id: &str) -> Option<&RepresentativeProfile> {
        self.positions.get(model_id).map(|&p| &self.profiles[p])
    }

    pub fn vector(&self, model_id: &str) -> Option<&Vector> {
        self.positions.get(model_id).and_then(|&p| self.index.get(p))
    }

    pub fn info(&self) -> SnapshotInfo {
        SnapshotInfo {
            version: self.version,
            records: self.records,
            profiles: self.profiles.len(),
            dimensions: self.index.dim(),
            columns: self
                .schema()
                .column_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    /// Find up to `top_n` nearest items of other brands.
    ///
    /// Retrieves `over_fetch` neighbors, then walks them in ascending
    /// distance skipping the query itself and its brand. An empty walk is
    /// reported as [`Recommendation::NoCrossBrandMatches`]; a short one is
    /// flagged partial on the result.
    pub fn recommend(&self, model_id: &str, top_n: usize, over_fetch: usize) -> Result<Recommendation> {
        if top_n == 0 {
            return Err(EngineError::InvalidTopN);
        }

        let position = *self
            .positions
            .get(model_id)
            .ok_or_else(|| EngineError::NotFound(model_id.to_string()))?;
        let query = &self.profiles[position];
        let vector = self
            .index
            .get(position)
            .ok_or_else(|| EngineError::Inconsistent(format!("no vector for '{}'", model_id)))?;

        let neighbors = self.index.search(vector, over_fetch)?;
        let filter = CrossBrandFilter::new(position, query);
        let rows = self.collect_rows(&neighbors, &filter, top_n);

        tracing::debug!(
            model_id,
            candidates = neighbors.len(),
            matches = rows.len(),
            "cross-brand query"
        );

        if rows.is_empty() {
            return Ok(Recommendation::NoCrossBrandMatches {
                query: MatchQuery::from(query),
                candidates_scanned: neighbors.len(),
                snapshot_version: self.version,
            });
        }

        Ok(Recommendation::Matches(MatchResult::new(
            MatchQuery::from(query),
            rows,
            top_n,
            neighbors.len(),
            self.version,
        )))
    }

    fn collect_rows(
        &self,
        neighbors: &[Neighbor],
        filter: &dyn CandidateFilter,
        top_n: usize,
    ) -> Vec<MatchRow> {
        let mut rows = Vec::with_capacity(top_n.min(neighbors.len()));
        for neighbor in neighbors {
            let candidate = &self.profiles[neighbor.position];
            if !filter.accepts(neighbor.position, candidate) {
                continue;
            }
            rows.push(MatchRow::new(candidate, neighbor.distance));
            if rows.len() >= top_n {
                break;
            }
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, brand: &str, capacity: f64, product_type: &str) -> RawRecord {
        RawRecord {
            brand: Some(brand.to_string()),
            model_name: Some(format!("{} {}", brand, id)),
            capacity: Some(capacity),
            product_type: Some(product_type.to_string()),
            energy_grade: Some("A+".into()),
            ..RawRecord::new(id)
        }
    }

    fn fleet() -> Vec<RawRecord> {
        vec![
            record("ACM-500", "Acme", 500.0, "SBS"),
            record("ACM-510", "Acme", 510.0, "SBS"),
            record("ACM-300", "Acme", 300.0, "TMF"),
            record("ZEN-505", "Zen", 505.0, "SBS"),
            record("ZEN-700", "Zen", 700.0, "SBS"),
            record("NOR-480", "Nord", 480.0, "SBS"),
            record("NOR-310", "Nord", 310.0, "TMF"),
        ]
    }

    #[test]
    fn test_build_indexes_every_profile() {
        let snapshot = Snapshot::build(&fleet()).unwrap();
        assert_eq!(snapshot.len(), 7);
        assert_eq!(snapshot.info().dimensions, snapshot.schema().dim());
        assert!(snapshot.profile("ZEN-505").is_some());
        assert!(snapshot.vector("missing").is_none());
    }

    #[test]
    fn test_recommend_excludes_self_and_brand() {
        let snapshot = Snapshot::build(&fleet()).unwrap();
        let result = snapshot
            .recommend("ACM-500", 3, 30)
            .unwrap()
            .into_matches()
            .unwrap();

        let ids: Vec<&str> = result.rows.iter().map(|r| r.model_id.as_str()).collect();
        assert_eq!(ids, vec!["ZEN-505", "NOR-480", "ZEN-700"]);
        assert!(result.rows.iter().all(|r| r.brand.as_deref() != Some("Acme")));
        assert!(result.rows.windows(2).all(|w| w[0].distance <= w[1].distance));
        assert!(!result.is_partial());
    }

    #[test]
    fn test_over_fetch_limits_candidates() {
        let snapshot = Snapshot::build(&fleet()).unwrap();
        // the query is its own nearest neighbor, nothing else is retrieved
        let rec = snapshot.recommend("ACM-500", 5, 1).unwrap();
        assert!(matches!(
            rec,
            Recommendation::NoCrossBrandMatches { candidates_scanned: 1, .. }
        ));

        let partial = snapshot
            .recommend("ACM-500", 5, 3)
            .unwrap()
            .into_matches()
            .unwrap();
        assert_eq!(partial.len(), 1);
        assert!(partial.is_partial());
    }

    #[test]
    fn test_unknown_model_and_zero_top_n() {
        let snapshot = Snapshot::build(&fleet()).unwrap();
        assert!(matches!(
            snapshot.recommend("nope", 3, 30),
            Err(EngineError::NotFound(id)) if id == "nope"
        ));
        assert!(matches!(
            snapshot.recommend("ACM-500", 0, 30),
            Err(EngineError::InvalidTopN)
        ));
    }

    #[test]
    fn test_empty_dataset() {
        assert!(matches!(Snapshot::build(&[]), Err(EngineError::EmptyDataset)));
    }
}
