//! Reference products computed with naive loops
//!
//! These provide a baseline for correctness testing and benchmarking.
//! Nothing here is parallel or clever; every entry is computed from its
//! definition.

use crate::matrix::dense::{DenseMatrix, Layout};
use crate::scalar::{Scalar, VectorElement};

/// Computes `a %*% b` with a triple loop, accumulating in double precision
pub fn reference_matmul<T: Scalar>(a: &DenseMatrix<T>, b: &DenseMatrix<T>) -> DenseMatrix<T> {
    assert_eq!(
        a.n_cols, b.n_rows,
        "Matrix dimensions must be compatible for multiplication"
    );

    DenseMatrix::from_fn(a.n_rows, b.n_cols, Layout::ColMajor, |i, j| {
        let mut acc = 0.0f64;
        for k in 0..a.n_cols {
            acc += a.get(i, k).widen() * b.get(k, j).widen();
        }
        T::cast_from(acc)
    })
}

/// Materialises the transpose by copying every entry
pub fn reference_transpose<T: Scalar>(a: &DenseMatrix<T>) -> DenseMatrix<T> {
    DenseMatrix::from_fn(a.n_cols, a.n_rows, a.layout, |i, j| a.get(j, i))
}

/// Computes `a %*% y` for a dense vector, treating missing elements the way
/// the kernels do
pub fn reference_matvec<E: VectorElement>(a: &DenseMatrix<f64>, y: &[E]) -> Vec<Option<f64>> {
    assert_eq!(a.n_cols, y.len(), "Vector length must match matrix columns");

    (0..a.n_rows)
        .map(|i| {
            let mut acc = 0.0f64;
            for (k, &yk) in y.iter().enumerate() {
                let aik = a.get(i, k);
                if aik == 0.0 {
                    continue;
                }
                acc += aik * yk.promote()?.widen();
            }
            Some(acc)
        })
        .collect()
}

/// Dot product of two (index, value) lists by comparing every pair
pub fn reference_sparse_dot(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    let mut acc = 0.0;
    for &(ia, va) in a {
        for &(ib, vb) in b {
            if ia == ib {
                acc += va * vb;
            }
        }
    }
    acc
}
