//! Utilities for converting between our matrix formats and external libraries

use ndarray::{Array2, ShapeBuilder};
use sprs::CsMat;

use crate::error::{Error, Result};
use crate::matrix::compressed::{CompressedMatrix, Orientation};
use crate::matrix::dense::{DenseMatrix, Layout};
use crate::scalar::Scalar;

/// Converts a compressed matrix to sprs CsMat in the same orientation
///
/// sprs requires sorted, duplicate-free lanes, so unsorted input is sorted
/// on a copy first. Structural matrices get an explicit value of one per
/// entry.
pub fn to_sprs<V: Scalar>(matrix: &CompressedMatrix<V>) -> Result<CsMat<V>> {
    let mut sorted = matrix.clone();
    sorted.sort_indices();
    if !sorted.has_sorted_indices() {
        return Err(Error::invalid(format!(
            "{} matrix holds duplicate entries, which sprs does not accept",
            matrix.orientation.short_name()
        )));
    }

    let nnz = sorted.nnz();
    let values = sorted.values.unwrap_or_else(|| vec![V::one(); nnz]);
    let shape = (sorted.n_rows, sorted.n_cols);

    Ok(match sorted.orientation {
        Orientation::Row => CsMat::new(shape, sorted.indptr, sorted.indices, values),
        Orientation::Column => CsMat::new_csc(shape, sorted.indptr, sorted.indices, values),
    })
}

/// Converts sprs CsMat into our compressed format, keeping its orientation
pub fn from_sprs<V: Scalar>(matrix: CsMat<V>) -> Result<CompressedMatrix<V>> {
    let orientation = if matrix.is_csr() {
        Orientation::Row
    } else {
        Orientation::Column
    };
    let (n_rows, n_cols) = matrix.shape();
    let (indptr, indices, data) = matrix.into_raw_storage();

    CompressedMatrix::try_new(orientation, n_rows, n_cols, indptr, indices, Some(data))
}

/// Copies a dense matrix into an ndarray array with the same memory order
pub fn dense_to_array2<T: Scalar>(matrix: &DenseMatrix<T>) -> Result<Array2<T>> {
    let shape = (matrix.n_rows, matrix.n_cols);
    let array = match matrix.layout {
        Layout::RowMajor => Array2::from_shape_vec(shape, matrix.data.clone()),
        Layout::ColMajor => Array2::from_shape_vec(shape.f(), matrix.data.clone()),
    };
    array.map_err(|err| Error::invalid(format!("cannot view dense buffer as ndarray: {err}")))
}

/// Copies an ndarray array into a row-major dense matrix
pub fn dense_from_array2<T: Scalar>(array: &Array2<T>) -> DenseMatrix<T> {
    let (n_rows, n_cols) = array.dim();
    // iter() walks in logical (row-major) order whatever the memory order
    DenseMatrix::new(n_rows, n_cols, Layout::RowMajor, array.iter().copied().collect())
}
