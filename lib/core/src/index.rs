use crate::{Error, Result, Vector};
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use serde::Serialize;

/// Point counts at or above this scan in parallel.
const PARALLEL_SCAN_THRESHOLD: usize = 4_096;

/// A search hit: the insertion position of a stored vector and its
/// squared Euclidean distance to the query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    pub position: usize,
    pub distance: f32,
}

impl Neighbor {
    #[inline]
    fn sort_key(&self) -> (OrderedFloat<f32>, usize) {
        (OrderedFloat(self.distance), self.position)
    }
}

/// Exact nearest-neighbor index over a fixed batch of vectors.
///
/// Every query scans all stored vectors. Distances are **squared**
/// Euclidean; results are ordered ascending by distance with ties broken
/// by insertion position. The index is immutable once built.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    dim: usize,
    vectors: Vec<Vector>,
}

impl FlatIndex {
    /// Build an index from vectors that all share one dimension.
    pub fn build(vectors: Vec<Vector>) -> Result<Self> {
        let dim = match vectors.first() {
            Some(v) => v.dim(),
            None => return Err(Error::EmptyIndex),
        };

        for (index, vector) in vectors.iter().enumerate() {
            if vector.dim() != dim {
                return Err(Error::InvalidDimension {
                    expected: dim,
                    actual: vector.dim(),
                });
            }
            if vector.as_slice().iter().any(|x| !x.is_finite()) {
                return Err(Error::NonFinite { index });
            }
        }

        tracing::debug!(points = vectors.len(), dim, "flat index built");
        Ok(Self { dim, vectors })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Get a stored vector by insertion position
    pub fn get(&self, position: usize) -> Option<&Vector> {
        self.vectors.get(position)
    }

    /// Return the `k` nearest stored vectors to `query`.
    ///
    /// `k` larger than the point count returns every point.
    pub fn search(&self, query: &Vector, k: usize) -> Result<Vec<Neighbor>> {
        if query.dim() != self.dim {
            return Err(Error::InvalidDimension {
                expected: self.dim,
                actual: query.dim(),
            });
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let mut hits = self.scan(query);

        if k < hits.len() {
            hits.select_nth_unstable_by_key(k - 1, Neighbor::sort_key);
            hits.truncate(k);
        }
        hits.sort_unstable_by_key(Neighbor::sort_key);

        Ok(hits)
    }

    fn scan(&self, query: &Vector) -> Vec<Neighbor> {
        let score = |(position, vector): (usize, &Vector)| Neighbor {
            position,
            distance: vector.l2_squared(query),
        };

        if self.vectors.len() >= PARALLEL_SCAN_THRESHOLD {
            self.vectors.par_iter().enumerate().map(score).collect()
        } else {
            self.vectors.iter().enumerate().map(score).collect()
        }
    }
}
