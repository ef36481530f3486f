//! Degenerate products where one side is a single row or column
//!
//! A single sparse column times a dense or sparse row vector is an outer
//! product, and its result is as sparse as the column: only the slots that
//! hold a nonzero produce output. These kernels build the compressed arrays
//! of that result directly. A dense row vector times a CSC matrix collapses
//! to one dot product per column and is handled here too.

use num_traits::One;

use crate::kernels::axpy::axpy;
use crate::matrix::compressed::Lanes;
use crate::matrix::triplets::SparseTriplets;
use crate::matrix::vector::SparseVector;
use crate::scalar::{Scalar, VectorElement};
use crate::utils::exclusive_scan;

/// Outer product of a single sparse column with a dense vector
///
/// `x` holds one lane per slot of the sparse column, each lane having at
/// most one stored position (the column is stored as an `m × 1` CSR, or
/// mirrored as a `1 × n` CSC). Each non-empty slot `p` with value `v`
/// becomes a full lane `[v * y[0], ..., v * y[d - 1]]` of the result; empty
/// slots stay empty. Duplicate entries in a slot are summed.
///
/// # Arguments
///
/// * `x` - Lanes of the sparse column
/// * `y` - Dense vector of length d
///
/// # Returns
///
/// Compressed arrays with one lane per slot of `x` and minor dimension d,
/// in the same orientation as `x`
pub fn outer_sparse_dense<V: Scalar, T: Scalar>(x: Lanes<'_, V>, y: &[T]) -> SparseTriplets<T> {
    let d = y.len();
    let slots = x.major();

    let counts: Vec<usize> = (0..slots)
        .map(|p| if x.lane(p).is_empty() { 0 } else { d })
        .collect();
    let indptr = exclusive_scan(&counts);
    let nnz = indptr[slots];

    let mut indices = Vec::with_capacity(nnz);
    let mut values = vec![T::zero(); nnz];

    for p in 0..slots {
        if counts[p] == 0 {
            continue;
        }
        let v = T::cast_from(x.lane_sum(p).widen());
        axpy(d, v, y, 1, &mut values[indptr[p]..], 1);
        indices.extend(0..d);
    }

    SparseTriplets {
        indptr,
        indices,
        values,
    }
}

/// Outer product of a single sparse column with a sparse vector
///
/// `x` is the column as an `m × 1` CSR (one lane per row); `y` has length n
/// and strictly ascending indices. The result is the `m × n` product in CSC
/// form: column `j` is empty unless `y[j]` is stored, in which case it holds
/// every non-empty row `p` of `x` with value `x[p] * y[j]`. A missing `y[j]`
/// makes the whole column missing; a binary `y` contributes `x[p]` alone.
///
/// # Panics
///
/// Panics if the indices of `y` are not strictly ascending
pub fn outer_sparse_sparse<V: Scalar, E: VectorElement>(
    x: Lanes<'_, V>,
    y: &SparseVector<E>,
) -> SparseTriplets<E::Output> {
    assert!(y.has_sorted_indices(), "Sparse vector indices must be sorted and unique");

    let rows: Vec<(usize, E::Output)> = (0..x.major())
        .filter(|&p| !x.lane(p).is_empty())
        .map(|p| (p, E::Output::cast_from(x.lane_sum(p).widen())))
        .collect();

    let mut counts = vec![0; y.len];
    let mut indices = Vec::with_capacity(rows.len() * y.nnz());
    let mut values = Vec::with_capacity(rows.len() * y.nnz());

    for (k, &col) in y.indices.iter().enumerate() {
        let scale = match &y.values {
            Some(y_values) => y_values[k].promote(),
            None => Some(E::Output::one()),
        };
        for &(p, xv) in &rows {
            indices.push(p);
            values.push(match scale {
                Some(yv) => yv * xv,
                None => E::Output::missing(),
            });
        }
        counts[col] = rows.len();
    }

    SparseTriplets {
        indptr: exclusive_scan(&counts),
        indices,
        values,
    }
}

/// Dense row vector times a CSC matrix
///
/// `x` has length k and `y` is `k × n` with one lane per column. Returns
/// the n entries of the `1 × n` product; for a structural `y` each entry is
/// the sum of the selected elements of `x`.
///
/// # Panics
///
/// Panics if `x.len()` differs from `y.minor()`
pub fn rowvec_by_csc<V: Scalar, T: Scalar>(x: &[T], y: Lanes<'_, V>) -> Vec<T> {
    assert_eq!(x.len(), y.minor(), "Vector length must match matrix rows");

    (0..y.major())
        .map(|col| {
            let mut acc = T::zero();
            for ix in y.lane(col) {
                acc += T::cast_from(y.value(ix).widen()) * x[y.indices[ix]];
            }
            acc
        })
        .collect()
}
