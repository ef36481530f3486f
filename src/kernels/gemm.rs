//! Dense-row accumulation: CSR × dense → dense
//!
//! For every row `r` of the sparse operand and every stored entry
//! `(idx, v)` of that row, row `idx` of the dense operand is scaled by `v`
//! and added to row `r` of the output. Rows are independent, so they are
//! spread over the worker pool; within a row the entries are visited in
//! stored order, which makes the result identical for any thread count.

use aligned_vec::AVec;
use rayon::prelude::*;
use tracing::trace;

use crate::kernels::axpy::axpy;
use crate::matrix::compressed::Lanes;
use crate::matrix::dense::DenseView;
use crate::parallel::WorkerPool;
use crate::scalar::Scalar;

/// Alignment of the scratch rows
const SCRATCH_ALIGN: usize = 64;

/// Multiplies CSR `a` (m × k) by the dense view `b` (k × n), adding the
/// result into row-major `out`
///
/// # Arguments
///
/// * `a` - Lanes of the sparse operand, one lane per output row
/// * `b` - Dense operand; any strides
/// * `out` - Row-major output; row `r` starts at `r * ldc`
/// * `ldc` - Leading dimension of `out` (at least n)
/// * `pool` - Workers that rows are spread over
///
/// # Panics
///
/// Panics if `b` does not have `a.minor()` rows or `out` cannot hold m rows
pub fn gemm_csr_dense_into_row_major<V: Scalar, T: Scalar>(
    a: Lanes<'_, V>,
    b: DenseView<'_, T>,
    out: &mut [T],
    ldc: usize,
    pool: &WorkerPool,
) {
    let m = a.major();
    let n = b.cols;
    if m == 0 || n == 0 || a.is_structurally_empty() {
        trace!(m, n, "row-major gemm has nothing to accumulate");
        return;
    }

    assert_eq!(a.minor(), b.rows, "Inner dimensions must agree");
    assert!(ldc >= n, "Leading dimension must cover a full row");
    assert!(
        out.len() >= (m - 1) * ldc + n,
        "Output buffer too short for {} rows",
        m
    );

    pool.install(|| {
        out.par_chunks_mut(ldc)
            .take(m)
            .enumerate()
            .for_each(|(row, c_row)| {
                for ix in a.lane(row) {
                    let alpha = T::cast_from(a.value(ix).widen());
                    axpy(n, alpha, b.row_start(a.indices[ix]), b.col_stride, c_row, 1);
                }
            });
    });
}

/// Shared handle for writing whole rows of a column-major buffer from
/// several workers
#[derive(Clone, Copy)]
struct ColumnMajorOut<T> {
    ptr: *mut T,
    len: usize,
    ldc: usize,
}

// Workers only ever write the slots of their own row.
unsafe impl<T: Send> Send for ColumnMajorOut<T> {}
unsafe impl<T: Send> Sync for ColumnMajorOut<T> {}

impl<T: Copy> ColumnMajorOut<T> {
    fn new(out: &mut [T], ldc: usize) -> Self {
        Self {
            ptr: out.as_mut_ptr(),
            len: out.len(),
            ldc,
        }
    }

    /// Writes `src[j]` to slot `(row, j)`
    ///
    /// # Safety
    ///
    /// No other thread may access row `row` of the buffer during the call,
    /// and the buffer must outlive the handle.
    unsafe fn write_row(&self, row: usize, src: &[T]) {
        for (j, &v) in src.iter().enumerate() {
            let pos = row + j * self.ldc;
            assert!(pos < self.len, "Output slot out of bounds");
            *self.ptr.add(pos) = v;
        }
    }
}

/// Multiplies CSR `a` (m × k) by the dense view `b` (k × n), writing the
/// result into column-major `out`
///
/// Each row is accumulated into an aligned scratch row and then scattered
/// into the output with stride `ldc`. A scratch row is allocated once per
/// rayon job and reused for every row that job processes.
/// Rows without stored entries are skipped and keep whatever `out` held.
///
/// # Arguments
///
/// * `a` - Lanes of the sparse operand, one lane per output row
/// * `b` - Dense operand; any strides
/// * `out` - Column-major output; column `j` starts at `j * ldc`
/// * `ldc` - Leading dimension of `out` (at least m)
/// * `pool` - Workers that rows are spread over
///
/// # Panics
///
/// Panics if `b` does not have `a.minor()` rows or `out` cannot hold n columns
pub fn gemm_csr_dense_into_col_major<V: Scalar, T: Scalar>(
    a: Lanes<'_, V>,
    b: DenseView<'_, T>,
    out: &mut [T],
    ldc: usize,
    pool: &WorkerPool,
) {
    let m = a.major();
    let n = b.cols;
    if m == 0 || n == 0 || a.is_structurally_empty() {
        trace!(m, n, "column-major gemm has nothing to accumulate");
        return;
    }

    assert_eq!(a.minor(), b.rows, "Inner dimensions must agree");
    assert!(ldc >= m, "Leading dimension must cover a full column");
    assert!(
        out.len() >= (n - 1) * ldc + m,
        "Output buffer too short for {} columns",
        n
    );

    let target = ColumnMajorOut::new(out, ldc);

    pool.install(|| {
        (0..m).into_par_iter().for_each_init(
            || AVec::<T>::from_iter(SCRATCH_ALIGN, (0..n).map(|_| T::zero())),
            |scratch, row| {
                let lane = a.lane(row);
                if lane.is_empty() {
                    return;
                }

                scratch.fill(T::zero());
                for ix in lane {
                    let alpha = T::cast_from(a.value(ix).widen());
                    axpy(n, alpha, b.row_start(a.indices[ix]), b.col_stride, scratch, 1);
                }

                // SAFETY: `row` is visited by exactly one worker and `out`
                // is borrowed for the whole parallel region.
                unsafe { target.write_row(row, scratch) };
            },
        );
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::compressed::CompressedMatrix;
    use crate::kernels::axpy::copy;
    use crate::matrix::dense::{DenseMatrix, Layout};

    // Same arithmetic one row at a time, scattering with a strided copy
    fn gemm_serial_col_major<V: Scalar, T: Scalar>(
        a: Lanes<'_, V>,
        b: DenseView<'_, T>,
        out: &mut [T],
        ldc: usize,
    ) {
        let n = b.cols;
        let mut scratch = vec![T::zero(); n];
        for row in 0..a.major() {
            scratch.fill(T::zero());
            for ix in a.lane(row) {
                let alpha = T::cast_from(a.value(ix).widen());
                axpy(n, alpha, b.row_start(a.indices[ix]), b.col_stride, &mut scratch, 1);
            }
            copy(n, &scratch, 1, &mut out[row..], ldc);
        }
    }

    fn sample() -> (CompressedMatrix<f64>, DenseMatrix<f64>) {
        // A = [1 0 2]
        //     [0 0 0]
        //     [0 3 0]
        let a = CompressedMatrix::new_csr(
            3,
            3,
            vec![0, 2, 2, 3],
            vec![0, 2, 1],
            vec![1.0, 2.0, 3.0],
        );
        let b = DenseMatrix::from_fn(3, 2, Layout::RowMajor, |i, j| (i * 2 + j + 1) as f64);
        (a, b)
    }

    #[test]
    fn test_row_major_output() {
        let (a, b) = sample();
        let pool = WorkerPool::new(2).unwrap();
        let mut out = vec![0.0; 6];

        gemm_csr_dense_into_row_major(a.lanes(), b.view(), &mut out, 2, &pool);

        // B = [1 2; 3 4; 5 6]
        assert_eq!(out, vec![11.0, 14.0, 0.0, 0.0, 9.0, 12.0]);
    }

    #[test]
    fn test_col_major_output_matches_serial() {
        let (a, b) = sample();
        let pool = WorkerPool::new(3).unwrap();
        let mut out = vec![0.0; 6];
        let mut serial = vec![0.0; 6];

        gemm_csr_dense_into_col_major(a.lanes(), b.view(), &mut out, 3, &pool);
        gemm_serial_col_major(a.lanes(), b.view(), &mut serial, 3);

        assert_eq!(out, vec![11.0, 0.0, 9.0, 14.0, 0.0, 12.0]);
        assert_eq!(out, serial);
    }

    #[test]
    fn test_padded_leading_dimension() {
        let (a, b) = sample();
        let pool = WorkerPool::new(1).unwrap();
        let mut out = vec![-1.0; 2 * 5];

        gemm_csr_dense_into_col_major(a.lanes(), b.view(), &mut out, 5, &pool);

        assert_eq!(&out[0..3], &[11.0, -1.0, 9.0]);
        assert_eq!(&out[5..8], &[14.0, -1.0, 12.0]);
        assert_eq!(&out[3..5], &[-1.0, -1.0]);
    }

    #[test]
    fn test_empty_structure_leaves_output() {
        let a = CompressedMatrix::<f64>::zeros(crate::matrix::compressed::Orientation::Row, 4, 3);
        let b = DenseMatrix::<f64>::zeros(3, 2, Layout::ColMajor);
        let pool = WorkerPool::new(2).unwrap();
        let mut out = vec![0.0; 8];

        gemm_csr_dense_into_row_major(a.lanes(), b.view(), &mut out, 2, &pool);
        gemm_csr_dense_into_col_major(a.lanes(), b.view(), &mut out, 4, &pool);
        assert!(out.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_mixed_precision_and_structural() {
        let a = CompressedMatrix::<f64>::binary(
            crate::matrix::compressed::Orientation::Row,
            2,
            2,
            vec![0, 2, 3],
            vec![0, 1, 1],
        );
        let b = DenseMatrix::<f32>::from_fn(2, 2, Layout::ColMajor, |i, j| (i + 2 * j) as f32);
        let pool = WorkerPool::new(2).unwrap();
        let mut out = vec![0.0f32; 4];

        gemm_csr_dense_into_row_major(a.lanes(), b.view(), &mut out, 2, &pool);

        // B = [0 2; 1 3]
        assert_eq!(out, vec![1.0, 5.0, 1.0, 3.0]);
    }
}
