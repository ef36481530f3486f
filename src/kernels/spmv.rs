//! Sparse-vector × sparse-row kernel
//!
//! Each row of the CSR operand is merge-joined against the nonzeros of the
//! sparse vector. When the two cursors disagree the lagging one jumps ahead
//! with a galloping lower-bound search, so long runs of non-matching
//! positions cost a logarithmic number of comparisons.

use num_traits::Zero;
use rayon::prelude::*;
use tracing::trace;

use crate::matrix::compressed::Lanes;
use crate::matrix::vector::SparseVector;
use crate::parallel::WorkerPool;
use crate::scalar::{Scalar, VectorElement};
use crate::utils::gallop_lower_bound;

/// Merge-joins lane `row` against `y`, `None` if a missing element matched
fn row_merge_dot<V: Scalar, E: VectorElement>(
    a: &Lanes<'_, V>,
    y: &SparseVector<E>,
    row: usize,
) -> Option<E::Output> {
    let lane = a.lane(row);
    let row_indices = &a.indices[..lane.end];
    let (mut i, end) = (lane.start, lane.end);
    let mut j = 0;
    let nnz_y = y.indices.len();
    let mut acc = E::Output::zero();

    while i < end && j < nnz_y {
        let (ci, cj) = (row_indices[i], y.indices[j]);
        if ci == cj {
            let xv = E::Output::cast_from(a.value(i).widen());
            match &y.values {
                Some(values) => acc = acc + xv * values[j].promote()?,
                None => acc = acc + xv,
            }
            // j stays put so repeated row positions all meet y[j]
            i += 1;
        } else if ci < cj {
            i = gallop_lower_bound(row_indices, i, cj);
        } else {
            j = gallop_lower_bound(&y.indices, j, ci);
        }
    }

    Some(acc)
}

/// Multiplies CSR `a` (m × k) by the sparse vector `y` of length k
///
/// The indices of every row of `a` must be sorted ascending (repeats are
/// summed) and the indices of `y` strictly ascending. A binary `y`
/// contributes the row value alone for each matched position.
///
/// # Returns
///
/// One value per row of `a`; rows that matched a missing element of `y`
/// hold [`Scalar::missing`]
///
/// # Panics
///
/// Panics if `y.len` differs from `a.minor()`
pub fn gemv_csr_sparse_vector<V: Scalar, E: VectorElement>(
    a: Lanes<'_, V>,
    y: &SparseVector<E>,
    pool: &WorkerPool,
) -> Vec<E::Output> {
    assert_eq!(a.minor(), y.len, "Vector length must match matrix columns");

    let m = a.major();
    if y.nnz() == 0 || a.is_structurally_empty() {
        trace!(m, nnz_y = y.nnz(), "sparse gemv has no possible matches");
        return vec![E::Output::zero(); m];
    }

    pool.install(|| {
        (0..m)
            .into_par_iter()
            .map(|row| row_merge_dot(&a, y, row).unwrap_or_else(E::Output::missing))
            .collect()
    })
}
