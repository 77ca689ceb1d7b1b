//! Hypervector buffer.
//!
//! A hypervector is a plain fixed-length buffer of small integers. Binary
//! vectors hold {0, 1}, bipolar vectors hold {-1, 1}. Stored as i8.

use crate::representation::Representation;
use std::ops::Index;

/// A high-dimensional vector of binary or bipolar elements.
///
/// There is no element-wise mutation API: a hypervector is built whole and
/// replaced whole.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hypervector {
    data: Vec<i8>,
}

impl Hypervector {
    /// Create a zero vector of given dimensionality.
    pub fn zeros(dimensions: usize) -> Self {
        Self {
            data: vec![0; dimensions],
        }
    }

    /// Create an all-ones vector of given dimensionality.
    pub fn ones(dimensions: usize) -> Self {
        Self {
            data: vec![1; dimensions],
        }
    }

    /// Create a vector from raw data.
    pub fn from_data(data: Vec<i8>) -> Self {
        Self { data }
    }

    /// Get the dimensionality.
    pub fn dimensions(&self) -> usize {
        self.data.len()
    }

    /// Get the raw data as a slice.
    pub fn data(&self) -> &[i8] {
        &self.data
    }

    /// Consume the vector and return its buffer.
    pub fn into_data(self) -> Vec<i8> {
        self.data
    }

    /// Iterate over the elements.
    pub fn iter(&self) -> std::slice::Iter<'_, i8> {
        self.data.iter()
    }

    /// Whether every element lies in the domain of `mode`.
    pub fn in_domain(&self, mode: Representation) -> bool {
        self.data.iter().all(|&v| mode.contains(v))
    }

    /// Count elements equal to `value`.
    pub fn count(&self, value: i8) -> usize {
        self.data.iter().filter(|&&v| v == value).count()
    }
}

impl Index<usize> for Hypervector {
    type Output = i8;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl From<Vec<i8>> for Hypervector {
    fn from(data: Vec<i8>) -> Self {
        Self::from_data(data)
    }
}

impl<'a> IntoIterator for &'a Hypervector {
    type Item = &'a i8;
    type IntoIter = std::slice::Iter<'a, i8>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}
