//! # ModelMatch Schema
//!
//! Turns raw specification records into one standardized feature vector per
//! catalog item.
//!
//! ## Overview
//!
//! 1. [`ProfileAggregator`] folds every raw observation of an item into a
//!    [`RepresentativeProfile`] (numeric mean, categorical mode)
//! 2. [`FeatureEncoder::fit`] lays out the feature columns over the whole
//!    corpus and learns the standardization statistics
//! 3. [`FeatureEncoder::transform`] encodes a profile under that schema
//!
//! ## Example
//!
//! ```rust
//! use modelmatch_schema::{FeatureEncoder, ProfileAggregator, RawRecord};
//!
//! let mut a = RawRecord::new("RF-1");
//! a.capacity = Some(500.0);
//! a.product_type = Some("SBS".into());
//! let mut b = RawRecord::new("RF-2");
//! b.capacity = Some(300.0);
//! b.product_type = Some("TMF".into());
//!
//! let profiles = ProfileAggregator::build(&[a, b]);
//! let encoder = FeatureEncoder::fit(&profiles).unwrap();
//! let vector = encoder.transform(&profiles[0]).unwrap();
//! assert_eq!(vector.dim(), encoder.vector_dim());
//! ```
//!
//! ## Column layout
//!
//! ```text
//! capacity | voltage energy_grade dispenser ice_mode ice_type wifi smart | product_type=* | color=* | form_factor=*
//! ```

pub mod aggregate;
pub mod encoder;
pub mod mapping;
pub mod record;
pub mod schema;

pub use aggregate::ProfileAggregator;
pub use encoder::FeatureEncoder;
pub use record::{AttributeEncoding, Categorical, RawRecord, RepresentativeProfile};
pub use schema::{Column, ColumnKind, EncodingSchema, SchemaError};
