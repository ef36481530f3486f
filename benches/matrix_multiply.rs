//! Benchmarks for sparse × dense products

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use spdm::{
    matmul_csr_dense, matmul_csr_dvec, matmul_csr_svec, matmul_dense_csc, CompressedMatrix,
    DenseMatrix, Layout, MatmulConfig, Orientation, SparseVector,
};

/// Random CSR matrix with roughly `density` of its entries stored
fn create_sparse(n_rows: usize, n_cols: usize, density: f64, seed: u64) -> CompressedMatrix<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut indptr = vec![0];
    let mut indices = Vec::new();
    let mut values = Vec::new();

    for _ in 0..n_rows {
        for col in 0..n_cols {
            if rng.gen_bool(density) {
                indices.push(col);
                values.push(rng.gen::<f64>());
            }
        }
        indptr.push(indices.len());
    }

    CompressedMatrix::new_csr(n_rows, n_cols, indptr, indices, values)
}

fn create_dense(n_rows: usize, n_cols: usize, layout: Layout, seed: u64) -> DenseMatrix<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    DenseMatrix::from_fn(n_rows, n_cols, layout, |_, _| rng.gen::<f64>())
}

fn bench_matrix_products(c: &mut Criterion) {
    let x = create_sparse(2000, 1000, 0.01, 1);
    let csc = create_sparse(1000, 2000, 0.01, 2).to_orientation(Orientation::Column);
    let rhs = create_dense(1000, 64, Layout::ColMajor, 3);
    let lhs = create_dense(64, 1000, Layout::ColMajor, 4);

    let mut group = c.benchmark_group("sparse_dense");
    for n_threads in [1, 2, 4, num_cpus::get()] {
        let config = MatmulConfig::default().with_threads(n_threads);

        group.bench_with_input(BenchmarkId::new("csr_x_dense", n_threads), &config, |bench, config| {
            bench.iter(|| matmul_csr_dense(black_box(&x), black_box(&rhs), config))
        });
        group.bench_with_input(BenchmarkId::new("dense_x_csc", n_threads), &config, |bench, config| {
            bench.iter(|| matmul_dense_csc(black_box(&lhs), black_box(&csc), config))
        });
    }
    group.finish();
}

fn bench_vector_products(c: &mut Criterion) {
    let x = create_sparse(20000, 5000, 0.002, 5);
    let dense_y: Vec<f64> = (0..5000).map(|i| (i % 13) as f64).collect();
    let sparse_y = SparseVector::new(5000, (0..5000).step_by(7).collect(), vec![1.5; 715]);

    let mut group = c.benchmark_group("sparse_vector");
    for n_threads in [1, 4] {
        let config = MatmulConfig::default().with_threads(n_threads);

        group.bench_with_input(BenchmarkId::new("csr_x_dense_vector", n_threads), &config, |bench, config| {
            bench.iter(|| matmul_csr_dvec(black_box(&x), black_box(&dense_y), config))
        });
        group.bench_with_input(BenchmarkId::new("csr_x_sparse_vector", n_threads), &config, |bench, config| {
            let mut x = x.clone();
            let mut y = sparse_y.clone();
            bench.iter(|| matmul_csr_svec(&mut x, &mut y, config))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_matrix_products, bench_vector_products);
criterion_main!(benches);
