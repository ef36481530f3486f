//! # Sparse × dense product entry points
//!
//! Every entry point follows the same sequence:
//!
//! 1. Pin the external BLAS backend to one thread ([`SingleThreadedBlas`]).
//!    The guard is taken before anything else so the previous setting is
//!    restored on every exit path, including precondition failures.
//! 2. Validate the operands' storage, then check operand orientation and
//!    inner dimensions; failures are reported before any kernel runs, so a
//!    malformed operand never reaches the worker pool.
//! 3. Build a worker pool sized by [`MatmulConfig::effective_threads`].
//! 4. Reduce the requested product to one of the kernels in
//!    [`crate::kernels`] by reinterpreting operands as their transposes
//!    where needed. No operand data is copied for these reductions.
//!
//! Dense results are column-major. The dense operand's element type is the
//! result type; sparse values are converted to it entry by entry.
//!
//! ## Reductions
//!
//! | product              | kernel call                                           |
//! |----------------------|-------------------------------------------------------|
//! | dense `%*%` CSC      | `t(out) = t(y) · t(x)`, row-major output == `out`      |
//! | `crossprod(dense, CSC)` | same, with `x` read through its transposed view    |
//! | `tcrossprod(dense, CSR)` | `t(out) = y · t(x)`                               |
//! | CSR `%*%` dense      | column-major output mode                              |
//! | `tcrossprod(CSR, dense)` | column-major output mode over `t(y)`              |

use std::borrow::Cow;

use tracing::debug;

use crate::backend::SingleThreadedBlas;
use crate::error::{Error, Result};
use crate::kernels;
use crate::matrix::compressed::{CompressedMatrix, Lanes, Orientation};
use crate::matrix::config::MatmulConfig;
use crate::matrix::dense::{DenseMatrix, DenseView, Layout};
use crate::matrix::names::DimNames;
use crate::matrix::vector::SparseVector;
use crate::parallel::WorkerPool;
use crate::scalar::{Scalar, VectorElement};

/// The shape of a two-operand product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductKind {
    /// `x %*% y`
    MatMul,
    /// `t(x) %*% y`
    CrossProd,
    /// `x %*% t(y)`
    TCrossProd,
}

impl ProductKind {
    pub fn name(self) -> &'static str {
        match self {
            ProductKind::MatMul => "matmul",
            ProductKind::CrossProd => "crossprod",
            ProductKind::TCrossProd => "tcrossprod",
        }
    }
}

/// Result of a product whose output may be dense or sparse
#[derive(Debug, Clone)]
pub enum VectorProduct<T> {
    Dense(Vec<T>),
    Sparse(CompressedMatrix<T>),
}

fn require_orientation<V: Scalar>(
    matrix: &CompressedMatrix<V>,
    expected: Orientation,
    op: &str,
) -> Result<()> {
    if matrix.orientation != expected {
        return Err(Error::invalid(format!(
            "{op} needs a {} operand, got {}",
            expected.short_name(),
            matrix.orientation.short_name()
        )));
    }
    Ok(())
}

fn require_inner(
    op: &'static str,
    lhs: (usize, usize),
    rhs: (usize, usize),
    lhs_inner: usize,
    rhs_inner: usize,
) -> Result<()> {
    if lhs_inner != rhs_inner {
        return Err(Error::DimensionMismatch { op, lhs, rhs });
    }
    Ok(())
}

/// Computes `t(out) = a · b` into a fresh column-major `out`
///
/// `a` supplies one lane per column of `out`, `b` is `k × m` where m is the
/// number of rows of `out`. Row-major `t(out)` and column-major `out` share
/// a buffer, so the row-major kernel writes the final result directly.
fn transposed_row_major_product<V: Scalar, T: Scalar>(
    op: &'static str,
    a: Lanes<'_, V>,
    b: DenseView<'_, T>,
    names: DimNames,
    config: &MatmulConfig,
) -> Result<DenseMatrix<T>> {
    let (m, n) = (b.cols, a.major());
    let pool = WorkerPool::new(config.effective_threads(n))?;
    debug!(op, m, k = b.rows, n, nnz = a.indices.len(), n_threads = pool.n_threads(), ty = T::NAME, "sparse-dense product");

    let mut out = DenseMatrix::zeros(m, n, Layout::ColMajor);
    kernels::gemm_csr_dense_into_row_major(a, b, &mut out.data, m, &pool);
    Ok(out.with_names(names))
}

/// Computes `out = a · b` into a fresh column-major `out` with the
/// column-major output kernel
fn col_major_product<V: Scalar, T: Scalar>(
    op: &'static str,
    a: Lanes<'_, V>,
    b: DenseView<'_, T>,
    names: DimNames,
    config: &MatmulConfig,
) -> Result<DenseMatrix<T>> {
    let (m, n) = (a.major(), b.cols);
    let pool = WorkerPool::new(config.effective_threads(m))?;
    debug!(op, m, k = b.rows, n, nnz = a.indices.len(), n_threads = pool.n_threads(), ty = T::NAME, "sparse-dense product");

    let mut out = DenseMatrix::zeros(m, n, Layout::ColMajor);
    kernels::gemm_csr_dense_into_col_major(a, b, &mut out.data, m, &pool);
    Ok(out.with_names(names))
}

/// Computes `x %*% y` for dense `x` and CSC `y`
///
/// # Arguments
///
/// * `x` - Dense left operand (m × k), either layout
/// * `y` - Sparse right operand (k × n) in CSC orientation
/// * `config` - Thread count and backend control
///
/// # Returns
///
/// Column-major m × n result labelled with x's row names and y's column names
pub fn matmul_dense_csc<T: Scalar, V: Scalar>(
    x: &DenseMatrix<T>,
    y: &CompressedMatrix<V>,
    config: &MatmulConfig,
) -> Result<DenseMatrix<T>> {
    let _blas = SingleThreadedBlas::acquire(config.blas.as_ref());
    x.validate()?;
    y.validate()?;
    require_orientation(y, Orientation::Column, "matmul(dense, sparse)")?;
    require_inner("matmul", x.shape(), y.shape(), x.n_cols, y.n_rows)?;

    let names = DimNames::new(x.names.rows.clone(), y.names.cols.clone());
    transposed_row_major_product("matmul_dense_csc", y.lanes(), x.view().t(), names, config)
}

/// Computes `t(x) %*% y` for dense `x` and CSC `y`
///
/// `x` is read through its transposed view; nothing is copied.
pub fn crossprod_dense_csc<T: Scalar, V: Scalar>(
    x: &DenseMatrix<T>,
    y: &CompressedMatrix<V>,
    config: &MatmulConfig,
) -> Result<DenseMatrix<T>> {
    let _blas = SingleThreadedBlas::acquire(config.blas.as_ref());
    x.validate()?;
    y.validate()?;
    require_orientation(y, Orientation::Column, "crossprod(dense, sparse)")?;
    require_inner("crossprod", x.shape(), y.shape(), x.n_rows, y.n_rows)?;

    // t(t(x)) is the plain view of x
    let names = DimNames::new(x.names.cols.clone(), y.names.cols.clone());
    transposed_row_major_product("crossprod_dense_csc", y.lanes(), x.view(), names, config)
}

/// Computes `x %*% t(y)` for dense `x` and CSR `y`
pub fn tcrossprod_dense_csr<T: Scalar, V: Scalar>(
    x: &DenseMatrix<T>,
    y: &CompressedMatrix<V>,
    config: &MatmulConfig,
) -> Result<DenseMatrix<T>> {
    let _blas = SingleThreadedBlas::acquire(config.blas.as_ref());
    x.validate()?;
    y.validate()?;
    require_orientation(y, Orientation::Row, "tcrossprod(dense, sparse)")?;
    require_inner("tcrossprod", x.shape(), y.shape(), x.n_cols, y.n_cols)?;

    let names = DimNames::new(x.names.rows.clone(), y.names.rows.clone());
    transposed_row_major_product("tcrossprod_dense_csr", y.lanes(), x.view().t(), names, config)
}

/// Computes `x %*% y` for CSR `x` and dense `y`
pub fn matmul_csr_dense<V: Scalar, T: Scalar>(
    x: &CompressedMatrix<V>,
    y: &DenseMatrix<T>,
    config: &MatmulConfig,
) -> Result<DenseMatrix<T>> {
    let _blas = SingleThreadedBlas::acquire(config.blas.as_ref());
    x.validate()?;
    y.validate()?;
    require_orientation(x, Orientation::Row, "matmul(sparse, dense)")?;
    require_inner("matmul", x.shape(), y.shape(), x.n_cols, y.n_rows)?;

    let names = DimNames::new(x.names.rows.clone(), y.names.cols.clone());
    col_major_product("matmul_csr_dense", x.lanes(), y.view(), names, config)
}

/// Computes `x %*% t(y)` for CSR `x` and dense `y`
pub fn tcrossprod_csr_dense<V: Scalar, T: Scalar>(
    x: &CompressedMatrix<V>,
    y: &DenseMatrix<T>,
    config: &MatmulConfig,
) -> Result<DenseMatrix<T>> {
    let _blas = SingleThreadedBlas::acquire(config.blas.as_ref());
    x.validate()?;
    y.validate()?;
    require_orientation(x, Orientation::Row, "tcrossprod(sparse, dense)")?;
    require_inner("tcrossprod", x.shape(), y.shape(), x.n_cols, y.n_cols)?;

    let names = DimNames::new(x.names.rows.clone(), y.names.rows.clone());
    col_major_product("tcrossprod_csr_dense", x.lanes(), y.view().t(), names, config)
}

/// Dense-left product selected by kind and by the sparse operand's orientation
///
/// Pairs without a kernel, such as `crossprod(dense, CSR)`, mean the caller
/// should have converted the operand first and are reported as
/// [`Error::Internal`].
pub fn dense_sparse_product<T: Scalar, V: Scalar>(
    kind: ProductKind,
    x: &DenseMatrix<T>,
    y: &CompressedMatrix<V>,
    config: &MatmulConfig,
) -> Result<DenseMatrix<T>> {
    match (kind, y.orientation) {
        (ProductKind::MatMul, Orientation::Column) => matmul_dense_csc(x, y, config),
        (ProductKind::CrossProd, Orientation::Column) => crossprod_dense_csc(x, y, config),
        (ProductKind::TCrossProd, Orientation::Row) => tcrossprod_dense_csr(x, y, config),
        (kind, orientation) => Err(Error::Internal(format!(
            "no kernel for {}(dense, {})",
            kind.name(),
            orientation.short_name()
        ))),
    }
}

/// Sparse-left product selected by kind and by the sparse operand's orientation
pub fn sparse_dense_product<V: Scalar, T: Scalar>(
    kind: ProductKind,
    x: &CompressedMatrix<V>,
    y: &DenseMatrix<T>,
    config: &MatmulConfig,
) -> Result<DenseMatrix<T>> {
    match (kind, x.orientation) {
        (ProductKind::MatMul, Orientation::Row) => matmul_csr_dense(x, y, config),
        (ProductKind::TCrossProd, Orientation::Row) => tcrossprod_csr_dense(x, y, config),
        (kind, orientation) => Err(Error::Internal(format!(
            "no kernel for {}({}, dense)",
            kind.name(),
            orientation.short_name()
        ))),
    }
}

/// Computes `x %*% y` for CSR `x` and a dense vector `y`
///
/// Integer and logical vectors give double-precision results; a row that
/// touches a missing element of `y` is missing in the result.
pub fn matmul_csr_dvec<V: Scalar, E: VectorElement>(
    x: &CompressedMatrix<V>,
    y: &[E],
    config: &MatmulConfig,
) -> Result<Vec<E::Output>> {
    let _blas = SingleThreadedBlas::acquire(config.blas.as_ref());
    x.validate()?;
    require_orientation(x, Orientation::Row, "matmul(sparse, vector)")?;
    require_inner("matvec", x.shape(), (y.len(), 1), x.n_cols, y.len())?;

    let pool = WorkerPool::new(config.effective_threads(x.n_rows))?;
    debug!(m = x.n_rows, k = x.n_cols, nnz = x.nnz(), n_threads = pool.n_threads(), "sparse-dense matvec");
    Ok(kernels::gemv_csr_dense_vector(x.lanes(), y, &pool))
}

/// Makes every lane of `x` sorted, either in place or on a private copy
fn merge_ready_matrix<V: Scalar>(x: &mut CompressedMatrix<V>, in_place: bool) -> Cow<'_, CompressedMatrix<V>> {
    let needs_sort = !x.has_sorted_indices();
    if needs_sort && !in_place {
        debug!("sorting a copy of the sparse matrix indices");
        let mut sorted = x.clone();
        sorted.sort_indices();
        return Cow::Owned(sorted);
    }
    if needs_sort {
        debug!("sorting the sparse matrix indices in place");
        x.sort_indices();
    }
    Cow::Borrowed(&*x)
}

/// Makes the positions of `y` strictly ascending, either in place or on a
/// private copy; repeated positions are rejected
fn merge_ready_vector<E: VectorElement>(
    y: &mut SparseVector<E>,
    in_place: bool,
) -> Result<Cow<'_, SparseVector<E>>> {
    let y = if y.has_sorted_indices() {
        Cow::Borrowed(&*y)
    } else if in_place {
        debug!("sorting the sparse vector indices in place");
        y.sort_indices();
        Cow::Borrowed(&*y)
    } else {
        debug!("sorting a copy of the sparse vector indices");
        let mut sorted = y.clone();
        sorted.sort_indices();
        Cow::Owned(sorted)
    };

    if !y.has_sorted_indices() {
        return Err(Error::invalid("sparse vector lists a position more than once"));
    }
    Ok(y)
}

/// Computes `x %*% y` for CSR `x` and a sparse vector `y`
///
/// The merge-join kernel needs sorted indices on both sides. Unsorted
/// operands are sorted according to [`MatmulConfig::sort_in_place`]: either
/// the caller's data is reordered, or a private sorted copy is used and the
/// caller's data is left alone.
pub fn matmul_csr_svec<V: Scalar, E: VectorElement>(
    x: &mut CompressedMatrix<V>,
    y: &mut SparseVector<E>,
    config: &MatmulConfig,
) -> Result<Vec<E::Output>> {
    let _blas = SingleThreadedBlas::acquire(config.blas.as_ref());
    x.validate()?;
    y.validate()?;
    require_orientation(x, Orientation::Row, "matmul(sparse, sparse vector)")?;
    require_inner("matvec", x.shape(), (y.len, 1), x.n_cols, y.len)?;

    let x = merge_ready_matrix(x, config.sort_in_place);
    let y = merge_ready_vector(y, config.sort_in_place)?;

    let pool = WorkerPool::new(config.effective_threads(x.n_rows))?;
    debug!(m = x.n_rows, k = x.n_cols, nnz = x.nnz(), nnz_y = y.nnz(), n_threads = pool.n_threads(), "sparse-sparse matvec");
    Ok(kernels::gemv_csr_sparse_vector(x.lanes(), &*y, &pool))
}

/// Outer product of a single sparse column (or row) with a dense vector
///
/// Accepts either an `m × 1` CSR matrix, giving the `m × d` product
/// `x %*% t(y)` in CSR form, or a `1 × n` CSC matrix, giving the `d × n`
/// product `y %*% x` in CSC form. Only slots of `x` holding a nonzero
/// produce entries.
pub fn outer_sparse_dense<V: Scalar, T: Scalar>(
    x: &CompressedMatrix<V>,
    y: &[T],
    config: &MatmulConfig,
) -> Result<CompressedMatrix<T>> {
    let _blas = SingleThreadedBlas::acquire(config.blas.as_ref());
    x.validate()?;
    let d = y.len();
    debug!(x_rows = x.n_rows, x_cols = x.n_cols, d, "sparse-dense outer product");

    match x.orientation {
        Orientation::Row if x.n_cols == 1 => {
            let out = kernels::outer_sparse_dense(x.lanes(), y).into_matrix(Orientation::Row, x.n_rows, d)?;
            Ok(out.with_names(DimNames::new(x.names.rows.clone(), None)))
        }
        Orientation::Column if x.n_rows == 1 => {
            let out = kernels::outer_sparse_dense(x.lanes(), y).into_matrix(Orientation::Column, d, x.n_cols)?;
            Ok(out.with_names(DimNames::new(None, x.names.cols.clone())))
        }
        _ => Err(Error::invalid(format!(
            "outer product needs an m × 1 CSR or a 1 × n CSC operand, got a {} × {} {}",
            x.n_rows,
            x.n_cols,
            x.orientation.short_name()
        ))),
    }
}

/// Outer product of a single sparse column with a sparse vector
///
/// `x` is an `m × 1` CSR matrix and `y` a sparse vector of length n; the
/// result is the `m × n` product in CSC form. Unsorted positions in `y` are
/// handled as in [`matmul_csr_svec`].
pub fn outer_sparse_sparse<V: Scalar, E: VectorElement>(
    x: &CompressedMatrix<V>,
    y: &mut SparseVector<E>,
    config: &MatmulConfig,
) -> Result<CompressedMatrix<E::Output>> {
    let _blas = SingleThreadedBlas::acquire(config.blas.as_ref());
    x.validate()?;
    y.validate()?;
    require_orientation(x, Orientation::Row, "outer(sparse, sparse vector)")?;
    if x.n_cols != 1 {
        return Err(Error::invalid(format!(
            "outer product needs a single sparse column, got {} columns",
            x.n_cols
        )));
    }

    let y = merge_ready_vector(y, config.sort_in_place)?;
    debug!(m = x.n_rows, n = y.len, nnz_x = x.nnz(), nnz_y = y.nnz(), "sparse-sparse outer product");

    let out = kernels::outer_sparse_sparse(x.lanes(), &*y).into_matrix(Orientation::Column, x.n_rows, y.len)?;
    Ok(out.with_names(DimNames::new(x.names.rows.clone(), None)))
}

/// Computes `x %*% y` for a dense row vector `x` and CSC `y`
///
/// # Returns
///
/// The 1 × n product, labelled with y's column names
pub fn matmul_rowvec_csc<T: Scalar, V: Scalar>(
    x: &[T],
    y: &CompressedMatrix<V>,
    config: &MatmulConfig,
) -> Result<DenseMatrix<T>> {
    let _blas = SingleThreadedBlas::acquire(config.blas.as_ref());
    y.validate()?;
    require_orientation(y, Orientation::Column, "matmul(vector, sparse)")?;
    require_inner("vecmat", (1, x.len()), y.shape(), x.len(), y.n_rows)?;
    debug!(k = x.len(), n = y.n_cols, nnz = y.nnz(), "dense row vector by CSC");

    let data = kernels::rowvec_by_csc(x, y.lanes());
    let out = DenseMatrix::try_new(1, y.n_cols, Layout::ColMajor, data)?;
    Ok(out.with_names(DimNames::new(None, y.names.cols.clone())))
}

/// Multiplies a sparse matrix by a bare dense vector on its right
///
/// A vector whose length matches the columns of `x` is a column vector and
/// gives a dense result. Otherwise, when `x` has a single column, the vector
/// is a row and the result is the sparse outer product. Any other length is
/// a dimension mismatch. Column-oriented operands are converted to CSR.
pub fn matvec_dispatch<V, T>(
    x: &CompressedMatrix<V>,
    y: &[T],
    config: &MatmulConfig,
) -> Result<VectorProduct<T>>
where
    V: Scalar,
    T: Scalar + VectorElement<Output = T>,
{
    x.validate()?;
    let x = as_orientation(x, Orientation::Row);
    if y.len() == x.n_cols {
        Ok(VectorProduct::Dense(matmul_csr_dvec(&*x, y, config)?))
    } else if x.n_cols == 1 {
        Ok(VectorProduct::Sparse(outer_sparse_dense(&*x, y, config)?))
    } else {
        Err(Error::DimensionMismatch {
            op: "matvec",
            lhs: x.shape(),
            rhs: (y.len(), 1),
        })
    }
}

/// Multiplies a sparse matrix by a bare dense vector on its left
///
/// A vector whose length matches the rows of `y` is a row vector and gives
/// a dense result. Otherwise, when `y` has a single row, the vector is a
/// column and the result is the sparse outer product.
pub fn vecmat_dispatch<T, V>(
    x: &[T],
    y: &CompressedMatrix<V>,
    config: &MatmulConfig,
) -> Result<VectorProduct<T>>
where
    T: Scalar,
    V: Scalar,
{
    y.validate()?;
    let y = as_orientation(y, Orientation::Column);
    if x.len() == y.n_rows {
        Ok(VectorProduct::Dense(matmul_rowvec_csc(x, &*y, config)?.data))
    } else if y.n_rows == 1 {
        Ok(VectorProduct::Sparse(outer_sparse_dense(&*y, x, config)?))
    } else {
        Err(Error::DimensionMismatch {
            op: "vecmat",
            lhs: (1, x.len()),
            rhs: y.shape(),
        })
    }
}

fn as_orientation<V: Scalar>(matrix: &CompressedMatrix<V>, orientation: Orientation) -> Cow<'_, CompressedMatrix<V>> {
    if matrix.orientation == orientation {
        Cow::Borrowed(matrix)
    } else {
        Cow::Owned(matrix.to_orientation(orientation))
    }
}
