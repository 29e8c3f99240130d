//! # ModelMatch Engine
//!
//! Cross-brand nearest-neighbor recommendations over an immutable snapshot
//! of encoded catalog items.
//!
//! ## Features
//!
//! - **Snapshots**: profiles, encoding schema and index built together per load
//! - **Atomic reload**: a new load replaces the active snapshot in one swap
//! - **Cross-brand ranking**: over-fetch, then skip the query item and its brand
//! - **Narratives**: optional, time-bounded text explanations of a result
//!
//! ## Example
//!
//! ```rust
//! use modelmatch_engine::{EngineConfig, MatchEngine};
//! use modelmatch_schema::RawRecord;
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
//!
//! let recommendation = engine.recommend("ACM-500", 5).unwrap();
//! let result = recommendation.matches().unwrap();
//! assert_eq!(result.rows[0].model_id, "ZEN-505");
//! assert!(result.is_partial());
//! ```
//!
//! ## Architecture
//!
//! ```text
//! records ──> Snapshot::build ──> Arc<Snapshot> ──(swap)──> MatchEngine
//!                                                              │
//!                            recommend ──> CrossBrandFilter ───┤
//!                            explain   ──> NarrativeAdapter ───┘
//! ```

pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod filter;
pub mod narrative;
pub mod result;
pub mod snapshot;

pub use config::{EngineConfig, NarrativeConfig, DEFAULT_OVER_FETCH, DEFAULT_TOP_N};
pub use dataset::{parse_records, read_records};
pub use engine::{ExplainedRecommendation, MatchEngine};
pub use error::{EngineError, Result};
pub use filter::{CandidateFilter, CrossBrandFilter};
pub use narrative::{
    ChatCompletionsGenerator, NarrativeAdapter, NarrativeError, NarrativeGenerator, NarrativeStatus,
};
pub use result::{Completeness, MatchQuery, MatchResult, MatchRow, Recommendation};
pub use snapshot::{Snapshot, SnapshotInfo};
