//! # ModelMatch
//!
//! Find the closest competing-brand catalog items by specification profile.
//!
//! Raw observation records are folded into one representative profile per
//! item, encoded into standardized feature vectors, and indexed for exact
//! Euclidean nearest-neighbor search. A query returns the nearest items of
//! *other* brands, optionally with a short generated explanation.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! modelmatch serve --dataset records.jsonl --http-port 8080
//! curl 'http://localhost:8080/models/ACM-500/matches?top_n=5'
//! ```
//!
//! ### From the Command Line
//!
//! ```bash
//! modelmatch recommend --dataset records.jsonl --model ACM-500 --top-n 5
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use modelmatch::prelude::*;
//!
//! let mut a = RawRecord::new("ACM-500");
//! a.brand = Some("Acme".into());
//! a.capacity = Some(500.0);
//! let mut b = RawRecord::new("ZEN-505");
//! b.brand = Some("Zen".into());
//! b.capacity = Some(505.0);
//!
//! let engine = MatchEngine::new(EngineConfig::default()).unwrap();
//! engine.load(&[a, b]).unwrap();
//! let recommendation = engine.recommend("ACM-500", 5).unwrap();
//! assert_eq!(recommendation.matches().unwrap().rows[0].model_id, "ZEN-505");
//! ```
//!
//! ## Crate Structure
//!
//! - `modelmatch-core` - vectors and the exact flat index
//! - `modelmatch-schema` - raw records, profile aggregation, feature encoding
//! - `modelmatch-engine` - snapshots, cross-brand ranking, narratives, dataset loading
//! - `modelmatch-api` - REST API

// Re-export core types
pub use modelmatch_core::{Error, FlatIndex, Neighbor, Result, Vector};

// Re-export schema
pub use modelmatch_schema::{
    Categorical, EncodingSchema, FeatureEncoder, ProfileAggregator, RawRecord, RepresentativeProfile,
    SchemaError,
};

// Re-export engine
pub use modelmatch_engine::{
    read_records, EngineConfig, EngineError, ExplainedRecommendation, MatchEngine, MatchResult,
    MatchRow, NarrativeAdapter, NarrativeConfig, NarrativeGenerator, NarrativeStatus, Recommendation,
    Snapshot,
};

// Re-export API
pub use modelmatch_api::RestApi;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        EngineConfig, EngineError, FeatureEncoder, MatchEngine, MatchResult, ProfileAggregator,
        RawRecord, Recommendation, RepresentativeProfile, RestApi,
    };
}
