//! The external backend's thread count is pinned during each call and
//! restored afterwards, whether the call succeeds or fails

use std::sync::{Arc, Mutex};

use spdm::{
    matmul_csr_dense, matmul_csr_dvec, matmul_csr_svec, matmul_dense_csc, outer_sparse_dense,
    tcrossprod_dense_csr, BlasThreads, CompressedMatrix, DenseMatrix, Layout, MatmulConfig,
    SparseVector,
};

/// Backend stand-in that records every change to its thread count
#[derive(Debug)]
struct RecordingBlas {
    current: Mutex<usize>,
    history: Mutex<Vec<usize>>,
}

impl RecordingBlas {
    fn new(n: usize) -> Arc<Self> {
        Arc::new(Self {
            current: Mutex::new(n),
            history: Mutex::new(Vec::new()),
        })
    }

    fn history(&self) -> Vec<usize> {
        self.history.lock().unwrap().clone()
    }
}

impl BlasThreads for RecordingBlas {
    fn threads(&self) -> usize {
        *self.current.lock().unwrap()
    }

    fn set_threads(&self, n: usize) {
        *self.current.lock().unwrap() = n;
        self.history.lock().unwrap().push(n);
    }
}

fn sample_csr() -> CompressedMatrix<f64> {
    // [1 0 2]
    // [0 3 0]
    CompressedMatrix::new_csr(2, 3, vec![0, 2, 3], vec![0, 2, 1], vec![1.0, 2.0, 3.0])
}

#[test]
fn test_restored_after_success() {
    let blas = RecordingBlas::new(6);
    let config = MatmulConfig::default().with_threads(2).with_blas(blas.clone());

    let y = DenseMatrix::<f64>::zeros(3, 2, Layout::ColMajor);
    matmul_csr_dense(&sample_csr(), &y, &config).unwrap();

    assert_eq!(blas.threads(), 6);
    assert_eq!(blas.history(), vec![1, 6]);
}

#[test]
fn test_restored_after_dimension_mismatch() {
    let blas = RecordingBlas::new(6);
    let config = MatmulConfig::default().with_blas(blas.clone());

    let y = DenseMatrix::<f64>::zeros(4, 2, Layout::ColMajor);
    let result = matmul_csr_dense(&sample_csr(), &y, &config);

    assert!(matches!(result, Err(spdm::Error::DimensionMismatch { .. })));
    assert_eq!(blas.threads(), 6);
    assert_eq!(blas.history(), vec![1, 6]);
}

#[test]
fn test_restored_after_wrong_orientation() {
    let blas = RecordingBlas::new(3);
    let config = MatmulConfig::default().with_blas(blas.clone());

    let x = DenseMatrix::<f64>::zeros(2, 2, Layout::ColMajor);
    let result = matmul_dense_csc(&x, &sample_csr(), &config);

    assert!(matches!(result, Err(spdm::Error::InvalidStructure { .. })));
    assert_eq!(blas.threads(), 3);
}

#[test]
fn test_every_entry_point_restores() {
    let blas = RecordingBlas::new(5);
    let config = MatmulConfig::default().with_blas(blas.clone());
    let csr = sample_csr();

    let x = DenseMatrix::<f64>::zeros(4, 3, Layout::RowMajor);
    tcrossprod_dense_csr(&x, &csr, &config).unwrap();
    matmul_csr_dvec(&csr, &[1i32, 2, 3], &config).unwrap();
    matmul_csr_svec(&mut csr.clone(), &mut SparseVector::<f64>::binary(3, vec![2, 0]), &config).unwrap();

    let column = CompressedMatrix::new_csr(2, 1, vec![0, 1, 1], vec![0], vec![1.0]);
    outer_sparse_dense(&column, &[1.0, 2.0], &config).unwrap();

    let history = blas.history();
    assert_eq!(history, vec![1, 5, 1, 5, 1, 5, 1, 5]);
    assert_eq!(blas.threads(), 5);
}
