//! # SPDM: Sparse × Dense Matrix products
//!
//! Multithreaded kernels for products between a compressed sparse matrix
//! (CSR or CSC) and a dense matrix or vector, in double and single
//! precision.
//!
//! ## Overview
//!
//! The library is built around a small family of kernels:
//!
//! 1. **Dense-row accumulation**: CSR × dense, writing either a row-major
//!    or a column-major result. Every matrix product shape reduces to this
//!    kernel by reading operands as their transposes.
//!
//! 2. **Matrix-vector**: CSR × dense vector, with integer and logical
//!    vectors promoted to double precision and missing values propagated
//!    per row, and CSR × sparse vector through a galloping merge-join.
//!
//! 3. **Degenerate shapes**: a single sparse column times a vector is an
//!    outer product whose result stays sparse.
//!
//! Rows are independent and are spread over a rayon pool sized per call.
//! Each row accumulates in stored order, so results do not depend on the
//! thread count.
//!
//! ## Usage
//!
//! ```
//! use spdm::{matmul_csr_dense, CompressedMatrix, DenseMatrix, Layout, MatmulConfig};
//!
//! // [1 0 2]
//! // [0 3 0]
//! let x = CompressedMatrix::new_csr(2, 3, vec![0, 2, 3], vec![0, 2, 1], vec![1.0, 2.0, 3.0]);
//! let y = DenseMatrix::new(3, 1, Layout::ColMajor, vec![1.0, 1.0, 1.0]);
//!
//! let out = matmul_csr_dense(&x, &y, &MatmulConfig::default()).unwrap();
//! assert_eq!(out.data, vec![3.0, 3.0]);
//! ```
//!
//! Naive reference products are available for checking results:
//!
//! ```
//! use spdm::{reference_matmul, DenseMatrix, Layout};
//!
//! let a = DenseMatrix::<f64>::new(1, 1, Layout::ColMajor, vec![2.0]);
//! let c = reference_matmul(&a, &a);
//! assert_eq!(c.data, vec![4.0]);
//! ```

pub mod backend;
pub mod error;
pub mod kernels;
pub mod matrix;
pub mod parallel;
pub mod product;
pub mod scalar;
pub mod utils;

// Re-export primary components
pub use backend::{BlasThreads, ProcessBlasThreads, SingleThreadedBlas};
pub use error::{Error, Result};
pub use matrix::{
    reference_matmul, reference_matvec, reference_sparse_dot, reference_transpose, CompressedMatrix,
    DenseMatrix, DenseView, DimNames, Lanes, Layout, MatmulConfig, Orientation, SparseTriplets,
    SparseVector,
};
pub use parallel::WorkerPool;
pub use product::{
    crossprod_dense_csc, dense_sparse_product, matmul_csr_dense, matmul_csr_dvec, matmul_csr_svec,
    matmul_dense_csc, matmul_rowvec_csc, matvec_dispatch, outer_sparse_dense, outer_sparse_sparse,
    sparse_dense_product, tcrossprod_csr_dense, tcrossprod_dense_csr, vecmat_dispatch, ProductKind,
    VectorProduct,
};
pub use scalar::{is_na_real, na_real, Logical, Scalar, VectorElement, NA_INTEGER, NA_LOGICAL};
pub use utils::formats::{dense_from_array2, dense_to_array2, from_sprs, to_sprs};

/// Version information for the SPDM library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
