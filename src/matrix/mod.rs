// Matrix and vector data structures

pub mod compressed;
pub mod config;
pub mod conversion;
pub mod dense;
pub mod names;
pub mod reference;
pub mod triplets;
pub mod vector;

pub use compressed::{CompressedMatrix, Lanes, Orientation};
pub use config::MatmulConfig;
pub use dense::{DenseMatrix, DenseView, Layout};
pub use names::DimNames;
pub use reference::{reference_matmul, reference_matvec, reference_sparse_dot, reference_transpose};
pub use triplets::SparseTriplets;
pub use vector::SparseVector;
