//! Exact, append-only similarity index.
//!
//! Vectors are stored contiguously in insertion order and searched by brute
//! force under Euclidean distance. There is no removal by position; callers
//! that need deletion rebuild the index from scratch.

use crate::domain::error::DomainError;

#[derive(Debug, Clone, PartialEq)]
pub struct FlatIndex {
    dimension: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            data: Vec::new(),
        }
    }

    /// Rebuilds an index from a flat row-major buffer. The buffer length must
    /// be a multiple of `dimension`.
    pub fn from_raw(dimension: usize, data: Vec<f32>) -> Result<Self, DomainError> {
        if dimension == 0 || data.len() % dimension != 0 {
            return Err(DomainError::Dimension {
                expected: dimension,
                actual: data.len(),
            });
        }
        Ok(Self { dimension, data })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn size(&self) -> usize {
        if self.dimension == 0 {
            0
        } else {
            self.data.len() / self.dimension
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn raw(&self) -> &[f32] {
        &self.data
    }

    pub fn vector(&self, position: usize) -> Option<&[f32]> {
        let start = position.checked_mul(self.dimension)?;
        self.data.get(start..start + self.dimension)
    }

    /// Appends a vector and returns its position.
    pub fn insert(&mut self, vector: &[f32]) -> Result<usize, DomainError> {
        if vector.len() != self.dimension {
            return Err(DomainError::Dimension {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        let position = self.size();
        self.data.extend_from_slice(vector);
        Ok(position)
    }

    /// Drops every vector past `len`. Used to undo a failed append.
    pub fn truncate(&mut self, len: usize) {
        self.data.truncate(len * self.dimension);
    }

    pub fn reset(&mut self) {
        self.data.clear();
    }

    /// Returns up to `k` `(position, distance)` pairs, closest first.
    /// Equal distances keep insertion order.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>, DomainError> {
        if query.len() != self.dimension {
            return Err(DomainError::Dimension {
                expected: self.dimension,
                actual: query.len(),
            });
        }
        if k == 0 || self.is_empty() {
            return Ok(vec![]);
        }

        let mut results: Vec<(usize, f32)> = self
            .data
            .chunks_exact(self.dimension)
            .enumerate()
            .map(|(position, stored)| (position, euclidean_distance(query, stored)))
            .collect();

        results.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        results.truncate(k);
        Ok(results)
    }
}

pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum::<f32>()
        .sqrt()
}

/// Scales `v` to unit length. Zero vectors are returned unchanged.
pub fn l2_normalize(v: &[f32]) -> Vec<f32> {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm <= 0.0 {
        return v.to_vec();
    }
    v.iter().map(|x| x / norm).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_with(vectors: &[[f32; 2]]) -> FlatIndex {
        let mut index = FlatIndex::new(2);
        for v in vectors {
            index.insert(v).unwrap();
        }
        index
    }

    #[test]
    fn test_insert_returns_previous_length() {
        let mut index = FlatIndex::new(2);
        assert_eq!(index.insert(&[0.0, 0.0]).unwrap(), 0);
        assert_eq!(index.insert(&[1.0, 0.0]).unwrap(), 1);
        assert_eq!(index.size(), 2);
    }

    #[test]
    fn test_insert_rejects_wrong_dimension() {
        let mut index = FlatIndex::new(3);
        let err = index.insert(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, DomainError::Dimension { expected: 3, actual: 2 }));
        assert_eq!(index.size(), 0);
    }

    #[test]
    fn test_search_orders_by_distance() {
        let index = index_with(&[[5.0, 0.0], [1.0, 0.0], [3.0, 0.0]]);
        let results = index.search(&[0.0, 0.0], 3).unwrap();
        let positions: Vec<usize> = results.iter().map(|r| r.0).collect();
        assert_eq!(positions, vec![1, 2, 0]);
        assert!((results[0].1 - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_ties_broken_by_insertion_order() {
        let index = index_with(&[[0.0, 1.0], [1.0, 0.0], [0.0, -1.0]]);
        let results = index.search(&[0.0, 0.0], 3).unwrap();
        let positions: Vec<usize> = results.iter().map(|r| r.0).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn test_search_returns_all_when_fewer_than_k() {
        let index = index_with(&[[0.0, 1.0], [1.0, 0.0]]);
        assert_eq!(index.search(&[0.0, 0.0], 10).unwrap().len(), 2);
        assert!(index.search(&[0.0, 0.0], 0).unwrap().is_empty());
    }

    #[test]
    fn test_reset_keeps_dimension() {
        let mut index = index_with(&[[0.0, 1.0]]);
        index.reset();
        assert_eq!(index.size(), 0);
        assert_eq!(index.dimension(), 2);
        assert!(index.search(&[0.0, 0.0], 1).unwrap().is_empty());
    }

    #[test]
    fn test_truncate_undoes_append() {
        let mut index = index_with(&[[0.0, 1.0], [1.0, 0.0]]);
        index.truncate(1);
        assert_eq!(index.size(), 1);
        assert_eq!(index.vector(0), Some(&[0.0, 1.0][..]));
        assert_eq!(index.vector(1), None);
    }

    #[test]
    fn test_from_raw_rejects_ragged_buffer() {
        assert!(FlatIndex::from_raw(3, vec![0.0; 7]).is_err());
        assert_eq!(FlatIndex::from_raw(3, vec![0.0; 6]).unwrap().size(), 2);
    }

    #[test]
    fn test_l2_normalize() {
        let v = l2_normalize(&[3.0, 4.0]);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
        assert_eq!(l2_normalize(&[0.0, 0.0]), vec![0.0, 0.0]);
    }
}
