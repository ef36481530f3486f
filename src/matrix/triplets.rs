//! Raw compressed arrays returned by kernels that build a new sparse result

use crate::error::Result;
use crate::matrix::compressed::{CompressedMatrix, Orientation};
use crate::scalar::Scalar;

/// Pointer, index and value arrays of a freshly built sparse structure
///
/// The kernel that produced it does not know the caller's dimensions or
/// labels; [`SparseTriplets::into_matrix`] attaches them.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseTriplets<T> {
    pub indptr: Vec<usize>,
    pub indices: Vec<usize>,
    pub values: Vec<T>,
}

impl<T: Scalar> SparseTriplets<T> {
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Wraps the arrays as a matrix of the given orientation and shape
    pub fn into_matrix(
        self,
        orientation: Orientation,
        n_rows: usize,
        n_cols: usize,
    ) -> Result<CompressedMatrix<T>> {
        CompressedMatrix::try_new(
            orientation,
            n_rows,
            n_cols,
            self.indptr,
            self.indices,
            Some(self.values),
        )
    }
}
