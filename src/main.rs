use std::io;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use spdm::{
    matmul_csr_dense, matmul_csr_dvec, outer_sparse_dense, reference_matmul, CompressedMatrix,
    DenseMatrix, Layout, MatmulConfig, NA_INTEGER,
};

fn main() -> spdm::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_writer(io::stderr).with_env_filter(filter).init();

    println!("SPDM {}: sparse x dense products", spdm::VERSION);

    let config = MatmulConfig::from_env();
    info!(n_threads = config.n_threads, sort_in_place = config.sort_in_place, "configuration");

    // Create a simple example matrix
    // [1 0 2]
    // [0 3 0]
    // [4 0 5]
    let a = CompressedMatrix::new_csr(
        3,
        3,
        vec![0, 2, 3, 5],
        vec![0, 2, 1, 0, 2],
        vec![1.0, 2.0, 3.0, 4.0, 5.0],
    );
    let b = DenseMatrix::from_fn(3, 2, Layout::ColMajor, |i, j| (i + 3 * j + 1) as f64);

    println!("\nMatrix A:");
    println!("{:?}", a);

    let c = matmul_csr_dense(&a, &b, &config)?;
    let expected = reference_matmul(&a.to_dense(Layout::ColMajor), &b);
    println!("\nA %*% B (column-major): {:?}", c.data);
    println!("reference:              {:?}", expected.data);

    let v = matmul_csr_dvec(&a, &[1, NA_INTEGER, 2], &config)?;
    println!("\nA %*% [1, NA, 2]: {:?}", v);

    let column = CompressedMatrix::new_csr(4, 1, vec![0, 0, 0, 1, 1], vec![0], vec![3.0]);
    let outer = outer_sparse_dense(&column, &[1.0, 2.0], &config)?;
    println!("\n[0, 0, 3, 0] x [1, 2]:");
    println!("{:?}", outer);

    Ok(())
}
