//! Sparse vectors
//!
//! Indices are 0-based inside the crate. Callers that speak 1-based
//! positions go through [`SparseVector::from_one_based`] and
//! [`SparseVector::to_one_based`].

use crate::error::{Error, Result};
use crate::scalar::VectorElement;

/// A sparse vector of length `len`
///
/// When `values` is `None` the vector is binary: each listed position holds one.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseVector<E> {
    pub len: usize,
    pub indices: Vec<usize>,
    pub values: Option<Vec<E>>,
}

impl<E: VectorElement> SparseVector<E> {
    /// # Panics
    ///
    /// Panics if an index is out of range or the lengths disagree
    pub fn new(len: usize, indices: Vec<usize>, values: Vec<E>) -> Self {
        match Self::try_new(len, indices, Some(values)) {
            Ok(vector) => vector,
            Err(err) => panic!("{}", err),
        }
    }

    /// # Panics
    ///
    /// Panics if an index is out of range
    pub fn binary(len: usize, indices: Vec<usize>) -> Self {
        match Self::try_new(len, indices, None) {
            Ok(vector) => vector,
            Err(err) => panic!("{}", err),
        }
    }

    pub fn try_new(len: usize, indices: Vec<usize>, values: Option<Vec<E>>) -> Result<Self> {
        let vector = Self {
            len,
            indices,
            values,
        };
        vector.validate()?;
        Ok(vector)
    }

    /// Checks that every index is below `len` and that values, when
    /// present, pair up with the indices
    pub fn validate(&self) -> Result<()> {
        let len = self.len;
        if let Some(&bad) = self.indices.iter().find(|&&idx| idx >= len) {
            return Err(Error::invalid(format!(
                "sparse vector index {bad} out of bounds (length = {len})"
            )));
        }
        if let Some(values) = &self.values {
            if values.len() != self.indices.len() {
                return Err(Error::invalid(format!(
                    "sparse vector has {} indices but {} values",
                    self.indices.len(),
                    values.len()
                )));
            }
        }
        Ok(())
    }

    /// Builds a vector from 1-based positions
    pub fn from_one_based(len: usize, indices_base1: &[usize], values: Option<Vec<E>>) -> Result<Self> {
        let indices = indices_base1
            .iter()
            .map(|&idx| {
                idx.checked_sub(1)
                    .ok_or_else(|| Error::invalid("1-based sparse vector index must be positive"))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::try_new(len, indices, values)
    }

    pub fn to_one_based(&self) -> Vec<usize> {
        self.indices.iter().map(|&idx| idx + 1).collect()
    }

    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_binary(&self) -> bool {
        self.values.is_none()
    }

    /// Whether the positions are strictly ascending
    pub fn has_sorted_indices(&self) -> bool {
        self.indices.windows(2).all(|pair| pair[0] < pair[1])
    }

    /// Sorts positions ascending, carrying values along
    pub fn sort_indices(&mut self) {
        if self.indices.windows(2).all(|pair| pair[0] <= pair[1]) {
            return;
        }
        match self.values.as_mut() {
            Some(values) => {
                let mut pairs: Vec<(usize, E)> = self
                    .indices
                    .iter()
                    .copied()
                    .zip(values.iter().copied())
                    .collect();
                pairs.sort_by_key(|&(idx, _)| idx);
                for (slot, (idx, val)) in pairs.into_iter().enumerate() {
                    self.indices[slot] = idx;
                    values[slot] = val;
                }
            }
            None => self.indices.sort_unstable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::NA_INTEGER;

    #[test]
    fn test_one_based_boundary() {
        let v = SparseVector::from_one_based(5, &[1, 3, 5], Some(vec![1.0, 2.0, 3.0])).unwrap();
        assert_eq!(v.indices, vec![0, 2, 4]);
        assert_eq!(v.to_one_based(), vec![1, 3, 5]);
    }

    #[test]
    fn test_zero_is_not_a_one_based_index() {
        let result = SparseVector::<f64>::from_one_based(5, &[0, 2], None);
        assert!(matches!(result, Err(Error::InvalidStructure { .. })));
    }

    #[test]
    fn test_out_of_range() {
        let result = SparseVector::try_new(3, vec![0, 3], Some(vec![1i32, 2]));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_catches_edited_fields() {
        let mut v = SparseVector::new(5, vec![0, 4], vec![1.0f64, 2.0]);
        assert!(v.validate().is_ok());
        v.values = Some(vec![1.0]);
        assert!(v.validate().is_err());
        v.values = None;
        v.indices.push(5);
        assert!(v.validate().is_err());
    }

    #[test]
    fn test_sort_carries_values() {
        let mut v = SparseVector::new(10, vec![7, 1, 4], vec![70, 10, NA_INTEGER]);
        assert!(!v.has_sorted_indices());
        v.sort_indices();
        assert_eq!(v.indices, vec![1, 4, 7]);
        assert_eq!(v.values, Some(vec![10, NA_INTEGER, 70]));
    }

    #[test]
    fn test_duplicates_are_not_sorted() {
        let v = SparseVector::<f64>::binary(4, vec![1, 1, 2]);
        assert!(!v.has_sorted_indices());
    }
}
