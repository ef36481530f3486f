//! Product kernels
//!
//! Kernels borrow their inputs as [`Lanes`](crate::matrix::Lanes) and
//! [`DenseView`](crate::matrix::DenseView) and never fail: shape and
//! structure checks happen in [`crate::product`] before a kernel is entered.

pub mod axpy;
pub mod gemm;
pub mod gemv;
pub mod outer;
pub mod spmv;

pub use axpy::{axpy, copy};
pub use gemm::{gemm_csr_dense_into_col_major, gemm_csr_dense_into_row_major};
pub use gemv::gemv_csr_dense_vector;
pub use outer::{outer_sparse_dense, outer_sparse_sparse, rowvec_by_csc};
pub use spmv::gemv_csr_sparse_vector;
