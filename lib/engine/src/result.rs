//! Match results
//!
//! Output structures for a cross-brand query. Distances are squared
//! Euclidean distances in standardized feature space, exactly as the index
//! reports them.

use modelmatch_schema::RepresentativeProfile;
use serde::Serialize;

/// The item a query was made for
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MatchQuery {
    pub model_id: String,
    pub model_name: Option<String>,
    pub brand: Option<String>,
    pub product_type: Option<String>,
    pub capacity: Option<f64>,
    pub energy_grade: Option<String>,
}

impl From<&RepresentativeProfile> for MatchQuery {
    fn from(profile: &RepresentativeProfile) -> Self {
        Self {
            model_id: profile.model_id.clone(),
            model_name: profile.model_name.clone(),
            brand: profile.brand.clone(),
            product_type: profile.product_type.clone(),
            capacity: profile.capacity,
            energy_grade: profile.energy_grade.clone(),
        }
    }
}

/// One recommended neighbor
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MatchRow {
    pub model_id: String,
    pub model_name: Option<String>,
    pub brand: Option<String>,
    pub product_type: Option<String>,
    pub color: Option<String>,
    pub energy_grade: Option<String>,
    pub capacity: Option<f64>,
    pub form_factor: Option<String>,
    /// Squared Euclidean distance to the query
    pub distance: f32,
}

impl MatchRow {
    pub fn new(profile: &RepresentativeProfile, distance: f32) -> Self {
        Self {
            model_id: profile.model_id.clone(),
            model_name: profile.model_name.clone(),
            brand: profile.brand.clone(),
            product_type: profile.product_type.clone(),
            color: profile.color.clone(),
            energy_grade: profile.energy_grade.clone(),
            capacity: profile.capacity,
            form_factor: profile.form_factor.clone(),
            distance,
        }
    }
}

/// Whether the over-fetch window held as many matches as were requested
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Completeness {
    Full,
    Partial { found: usize, requested: usize },
}

/// Cross-brand neighbors ordered by ascending distance, never empty
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MatchResult {
    pub query: MatchQuery,
    pub rows: Vec<MatchRow>,
    pub completeness: Completeness,
    /// Neighbors retrieved from the index before filtering
    pub candidates_scanned: usize,
    pub snapshot_version: u64,
}

impl MatchResult {
    pub(crate) fn new(
        query: MatchQuery,
        rows: Vec<MatchRow>,
        requested: usize,
        candidates_scanned: usize,
        snapshot_version: u64,
    ) -> Self {
        let completeness = if rows.len() < requested {
            Completeness::Partial {
                found: rows.len(),
                requested,
            }
        } else {
            Completeness::Full
        };
        Self {
            query,
            rows,
            completeness,
            candidates_scanned,
            snapshot_version,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_partial(&self) -> bool {
        matches!(self.completeness, Completeness::Partial { .. })
    }
}

/// Outcome of a cross-brand query
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Recommendation {
    Matches(MatchResult),
    /// Every over-fetched neighbor shared the query's brand
    NoCrossBrandMatches {
        query: MatchQuery,
        candidates_scanned: usize,
        snapshot_version: u64,
    },
}

impl Recommendation {
    pub fn matches(&self) -> Option<&MatchResult> {
        match self {
            Recommendation::Matches(result) => Some(result),
            Recommendation::NoCrossBrandMatches { .. } => None,
        }
    }

    pub fn into_matches(self) -> Option<MatchResult> {
        match self {
            Recommendation::Matches(result) => Some(result),
            Recommendation::NoCrossBrandMatches { .. } => None,
        }
    }

    pub fn query(&self) -> &MatchQuery {
        match self {
            Recommendation::Matches(result) => &result.query,
            Recommendation::NoCrossBrandMatches { query, .. } => query,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str, brand: &str) -> RepresentativeProfile {
        RepresentativeProfile {
            model_id: id.to_string(),
            brand: Some(brand.to_string()),
            capacity: Some(600.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_partial_flag() {
        let query = MatchQuery::from(&profile("A", "Acme"));
        let rows = vec![MatchRow::new(&profile("B", "Zen"), 0.5)];

        let partial = MatchResult::new(query.clone(), rows.clone(), 3, 30, 1);
        assert!(partial.is_partial());
        assert_eq!(partial.completeness, Completeness::Partial { found: 1, requested: 3 });

        let full = MatchResult::new(query, rows, 1, 30, 1);
        assert!(!full.is_partial());
        assert_eq!(full.completeness, Completeness::Full);
    }

    #[test]
    fn test_recommendation_serialization() {
        let query = MatchQuery::from(&profile("A", "Acme"));
        let rows = vec![MatchRow::new(&profile("B", "Zen"), 0.25)];
        let rec = Recommendation::Matches(MatchResult::new(query.clone(), rows, 2, 30, 7));

        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["status"], "matches");
        assert_eq!(json["completeness"]["kind"], "partial");
        assert_eq!(json["rows"][0]["brand"], "Zen");
        assert_eq!(json["snapshot_version"], 7);

        let empty = Recommendation::NoCrossBrandMatches {
            query,
            candidates_scanned: 3,
            snapshot_version: 7,
        };
        let json = serde_json::to_value(&empty).unwrap();
        assert_eq!(json["status"], "no_cross_brand_matches");
        assert!(empty.matches().is_none());
    }
}
