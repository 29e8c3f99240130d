//! # ModelMatch Core
//!
//! Core data structures for the ModelMatch engine.
//!
//! - [`Vector`] - Dense feature vector with Euclidean distance
//! - [`FlatIndex`] - Exact nearest-neighbor index built once over a batch of vectors
//! - [`Neighbor`] - A search hit (insertion position and squared distance)
//!
//! ## Example
//!
//! ```rust
//! use modelmatch_core::{FlatIndex, Vector};
//!
//! let index = FlatIndex::build(vec![
//!     Vector::new(vec![0.0, 0.0]),
//!     Vector::new(vec![1.0, 1.0]),
//!     Vector::new(vec![5.0, 5.0]),
//! ]).unwrap();
//!
//! let hits = index.search(&Vector::new(vec![0.9, 0.9]), 2).unwrap();
//! assert_eq!(hits[0].position, 1);
//! ```

pub mod error;
pub mod index;
pub mod vector;

pub use error::{Error, Result};
pub use index::{FlatIndex, Neighbor};
pub use vector::Vector;
