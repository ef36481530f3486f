//! Conversion between orientations and to/from dense storage

use crate::matrix::compressed::{CompressedMatrix, Orientation};
use crate::matrix::dense::{DenseMatrix, Layout};
use crate::scalar::Scalar;
use crate::utils::exclusive_scan;

impl<V: Scalar> CompressedMatrix<V> {
    /// Returns the same matrix stored in the requested orientation
    ///
    /// Indices in the result come out sorted within each lane.
    pub fn to_orientation(&self, orientation: Orientation) -> CompressedMatrix<V> {
        if orientation == self.orientation {
            return self.clone();
        }

        let new_major = self.minor_dim();

        // Count entries per new lane, then prefix-sum into pointers
        let mut counts = vec![0; new_major];
        for &idx in &self.indices {
            counts[idx] += 1;
        }
        let indptr = exclusive_scan(&counts);

        let nnz = self.nnz();
        let mut indices = vec![0; nnz];
        let mut values = self.values.as_ref().map(|_| vec![V::zero(); nnz]);

        // Fill the new lanes in order of the old lanes
        let mut next = indptr.clone();
        let lanes = self.lanes();
        for old_lane in 0..self.major_dim() {
            for ix in lanes.lane(old_lane) {
                let new_lane = self.indices[ix];
                let pos = next[new_lane];

                indices[pos] = old_lane;
                if let Some(values) = values.as_mut() {
                    values[pos] = lanes.value(ix);
                }

                next[new_lane] += 1;
            }
        }

        CompressedMatrix {
            orientation,
            n_rows: self.n_rows,
            n_cols: self.n_cols,
            indptr,
            indices,
            values,
            names: self.names.clone(),
        }
    }

    /// Expands into a dense matrix, summing duplicate entries
    pub fn to_dense(&self, layout: Layout) -> DenseMatrix<V> {
        let mut out = DenseMatrix::zeros(self.n_rows, self.n_cols, layout);
        let ld = out.leading_dim();
        let lanes = self.lanes();

        for k in 0..self.major_dim() {
            for ix in lanes.lane(k) {
                let (i, j) = match self.orientation {
                    Orientation::Row => (k, self.indices[ix]),
                    Orientation::Column => (self.indices[ix], k),
                };
                let pos = match layout {
                    Layout::RowMajor => i * ld + j,
                    Layout::ColMajor => j * ld + i,
                };
                out.data[pos] += lanes.value(ix);
            }
        }

        out.names = self.names.clone();
        out
    }

    /// Compresses the nonzero entries of a dense matrix
    pub fn from_dense(dense: &DenseMatrix<V>, orientation: Orientation) -> Self {
        let (major, minor) = match orientation {
            Orientation::Row => (dense.n_rows, dense.n_cols),
            Orientation::Column => (dense.n_cols, dense.n_rows),
        };

        let mut indptr = Vec::with_capacity(major + 1);
        let mut indices = Vec::new();
        let mut values = Vec::new();
        indptr.push(0);

        for k in 0..major {
            for m in 0..minor {
                let v = match orientation {
                    Orientation::Row => dense.get(k, m),
                    Orientation::Column => dense.get(m, k),
                };
                if v != V::zero() {
                    indices.push(m);
                    values.push(v);
                }
            }
            indptr.push(indices.len());
        }

        CompressedMatrix {
            orientation,
            n_rows: dense.n_rows,
            n_cols: dense.n_cols,
            indptr,
            indices,
            values: Some(values),
            names: dense.names.clone(),
        }
    }
}
