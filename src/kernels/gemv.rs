//! Dense-vector × sparse-row kernel
//!
//! Computes `out[r] = Σ a[r, idx] * y[idx]` for every row of a CSR operand.
//! Vector elements may be floating point, integer or logical; integer and
//! logical elements are promoted to double precision, and a missing element
//! touched by a stored entry turns the whole row into the missing value.

use num_traits::Zero;
use rayon::prelude::*;
use tracing::trace;

use crate::matrix::compressed::Lanes;
use crate::parallel::WorkerPool;
use crate::scalar::{Scalar, VectorElement};

/// Dot product of lane `row` with the dense vector, `None` if a missing
/// element was touched
#[inline]
fn row_dot<V: Scalar, E: VectorElement>(a: &Lanes<'_, V>, y: &[E], row: usize) -> Option<E::Output> {
    let mut acc = E::Output::zero();
    for ix in a.lane(row) {
        let yv = y[a.indices[ix]].promote()?;
        acc = acc + E::Output::cast_from(a.value(ix).widen()) * yv;
    }
    Some(acc)
}

/// Multiplies CSR `a` (m × k) by the dense vector `y` of length k
///
/// # Arguments
///
/// * `a` - Lanes of the sparse operand, one lane per output element
/// * `y` - Dense vector
/// * `pool` - Workers that rows are spread over
///
/// # Returns
///
/// One value per row of `a`; rows that touched a missing element of `y`
/// hold [`Scalar::missing`]
///
/// # Panics
///
/// Panics if `y.len()` differs from `a.minor()`
pub fn gemv_csr_dense_vector<V: Scalar, E: VectorElement>(
    a: Lanes<'_, V>,
    y: &[E],
    pool: &WorkerPool,
) -> Vec<E::Output> {
    assert_eq!(a.minor(), y.len(), "Vector length must match matrix columns");

    let m = a.major();
    if a.is_structurally_empty() {
        trace!(m, "gemv over empty structure");
        return vec![E::Output::zero(); m];
    }

    pool.install(|| {
        (0..m)
            .into_par_iter()
            .map(|row| row_dot(&a, y, row).unwrap_or_else(E::Output::missing))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::compressed::CompressedMatrix;
    use crate::scalar::{is_na_real, Logical, NA_INTEGER};

    fn sample() -> CompressedMatrix<f64> {
        // [1 0 2]
        // [0 0 0]
        // [0 3 0]
        // [4 0 0]
        CompressedMatrix::new_csr(
            4,
            3,
            vec![0, 2, 2, 3, 4],
            vec![0, 2, 1, 0],
            vec![1.0, 2.0, 3.0, 4.0],
        )
    }

    #[test]
    fn test_float_vector() {
        let pool = WorkerPool::new(2).unwrap();
        let out = gemv_csr_dense_vector(sample().lanes(), &[1.0f64, 10.0, 100.0], &pool);
        assert_eq!(out, vec![201.0, 0.0, 30.0, 4.0]);
    }

    #[test]
    fn test_single_precision_vector() {
        let pool = WorkerPool::new(2).unwrap();
        let out: Vec<f32> = gemv_csr_dense_vector(sample().lanes(), &[1.0f32, 0.5, 0.25], &pool);
        assert_eq!(out, vec![1.5, 0.0, 1.5, 4.0]);
    }

    #[test]
    fn test_integer_missing_only_hits_touching_rows() {
        let pool = WorkerPool::new(3).unwrap();
        let out = gemv_csr_dense_vector(sample().lanes(), &[2i32, NA_INTEGER, 5], &pool);

        assert_eq!(out[0], 12.0);
        assert_eq!(out[1], 0.0);
        assert!(is_na_real(out[2]));
        assert_eq!(out[3], 8.0);
    }

    #[test]
    fn test_logical_vector() {
        let pool = WorkerPool::new(1).unwrap();
        let y = [Logical::TRUE, Logical::FALSE, Logical::NA];
        let out = gemv_csr_dense_vector(sample().lanes(), &y, &pool);

        assert!(is_na_real(out[0]));
        assert_eq!(&out[1..], &[0.0, 0.0, 4.0]);
    }

    #[test]
    fn test_nan_propagates_natively() {
        let pool = WorkerPool::new(1).unwrap();
        let out = gemv_csr_dense_vector(sample().lanes(), &[f64::NAN, 1.0, 1.0], &pool);
        assert!(out[0].is_nan() && !is_na_real(out[0]));
        assert_eq!(out[2], 3.0);
    }
}
