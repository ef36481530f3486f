//! Dense matrices and strided views over them

use crate::error::{Error, Result};
use crate::kernels::axpy;
use crate::matrix::names::DimNames;
use crate::scalar::Scalar;

/// Memory order of a dense buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    RowMajor,
    ColMajor,
}

impl Layout {
    pub fn flipped(self) -> Self {
        match self {
            Layout::RowMajor => Layout::ColMajor,
            Layout::ColMajor => Layout::RowMajor,
        }
    }
}

/// A dense matrix stored contiguously in row- or column-major order
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix<T> {
    pub n_rows: usize,
    pub n_cols: usize,
    pub layout: Layout,
    pub data: Vec<T>,
    pub names: DimNames,
}

impl<T: Scalar> DenseMatrix<T> {
    /// # Panics
    ///
    /// Panics if `data.len() != n_rows * n_cols`
    pub fn new(n_rows: usize, n_cols: usize, layout: Layout, data: Vec<T>) -> Self {
        match Self::try_new(n_rows, n_cols, layout, data) {
            Ok(matrix) => matrix,
            Err(err) => panic!("{}", err),
        }
    }

    pub fn try_new(n_rows: usize, n_cols: usize, layout: Layout, data: Vec<T>) -> Result<Self> {
        let matrix = Self {
            n_rows,
            n_cols,
            layout,
            data,
            names: DimNames::default(),
        };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Checks that the buffer holds exactly `n_rows * n_cols` entries
    pub fn validate(&self) -> Result<()> {
        let expected = self.n_rows.checked_mul(self.n_cols);
        if expected != Some(self.data.len()) {
            return Err(Error::invalid(format!(
                "dense buffer of length {} cannot hold a {} × {} matrix",
                self.data.len(),
                self.n_rows,
                self.n_cols
            )));
        }
        Ok(())
    }

    pub fn zeros(n_rows: usize, n_cols: usize, layout: Layout) -> Self {
        Self {
            n_rows,
            n_cols,
            layout,
            data: vec![T::zero(); n_rows * n_cols],
            names: DimNames::default(),
        }
    }

    /// Builds a matrix whose entry (i, j) is `f(i, j)`
    pub fn from_fn(
        n_rows: usize,
        n_cols: usize,
        layout: Layout,
        mut f: impl FnMut(usize, usize) -> T,
    ) -> Self {
        let mut data = Vec::with_capacity(n_rows * n_cols);
        match layout {
            Layout::RowMajor => {
                for i in 0..n_rows {
                    for j in 0..n_cols {
                        data.push(f(i, j));
                    }
                }
            }
            Layout::ColMajor => {
                for j in 0..n_cols {
                    for i in 0..n_rows {
                        data.push(f(i, j));
                    }
                }
            }
        }
        Self::new(n_rows, n_cols, layout, data)
    }

    pub fn with_names(mut self, names: DimNames) -> Self {
        self.names = names;
        self
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// Distance between consecutive rows (row-major) or columns (column-major)
    pub fn leading_dim(&self) -> usize {
        match self.layout {
            Layout::RowMajor => self.n_cols,
            Layout::ColMajor => self.n_rows,
        }
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> T {
        self.view().get(i, j)
    }

    pub fn view(&self) -> DenseView<'_, T> {
        let (row_stride, col_stride) = match self.layout {
            Layout::RowMajor => (self.n_cols, 1),
            Layout::ColMajor => (1, self.n_rows),
        };
        DenseView {
            data: &self.data,
            rows: self.n_rows,
            cols: self.n_cols,
            row_stride,
            col_stride,
        }
    }

    /// Reinterprets the buffer as the transpose: a row-major `m × n` buffer
    /// is the column-major `n × m` buffer of the transpose
    pub fn transposed(self) -> Self {
        Self {
            n_rows: self.n_cols,
            n_cols: self.n_rows,
            layout: self.layout.flipped(),
            data: self.data,
            names: self.names.transposed(),
        }
    }

    /// Copies the matrix into the requested memory order
    pub fn to_layout(&self, layout: Layout) -> Self {
        if layout == self.layout {
            return self.clone();
        }
        let mut out = Self::zeros(self.n_rows, self.n_cols, layout);
        if self.n_cols == 0 {
            return out.with_names(self.names.clone());
        }
        let src = self.view();
        let (dst_row_stride, dst_col_stride) = {
            let v = out.view();
            (v.row_stride, v.col_stride)
        };
        // Every source row becomes a strided run in the destination
        for i in 0..self.n_rows {
            axpy::copy(
                self.n_cols,
                src.row_start(i),
                src.col_stride,
                &mut out.data[i * dst_row_stride..],
                dst_col_stride,
            );
        }
        out.names = self.names.clone();
        out
    }
}

impl DenseMatrix<f32> {
    /// Loads single-precision values from a same-width integer container
    pub fn from_bits(n_rows: usize, n_cols: usize, layout: Layout, bits: &[i32]) -> Result<Self> {
        let data = bits.iter().map(|&b| f32::from_bits(b as u32)).collect();
        Self::try_new(n_rows, n_cols, layout, data)
    }

    /// Exports the values as their integer bit patterns
    pub fn to_bits(&self) -> Vec<i32> {
        self.data.iter().map(|v| v.to_bits() as i32).collect()
    }
}

/// Borrowed strided view: entry (i, j) lives at `i * row_stride + j * col_stride`
#[derive(Debug, Clone, Copy)]
pub struct DenseView<'a, T> {
    pub data: &'a [T],
    pub rows: usize,
    pub cols: usize,
    pub row_stride: usize,
    pub col_stride: usize,
}

impl<'a, T: Copy> DenseView<'a, T> {
    pub fn new(data: &'a [T], rows: usize, cols: usize, row_stride: usize, col_stride: usize) -> Self {
        Self {
            data,
            rows,
            cols,
            row_stride,
            col_stride,
        }
    }

    /// The transposed view over the same buffer
    pub fn t(self) -> Self {
        Self {
            data: self.data,
            rows: self.cols,
            cols: self.rows,
            row_stride: self.col_stride,
            col_stride: self.row_stride,
        }
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> T {
        self.data[i * self.row_stride + j * self.col_stride]
    }

    /// Buffer starting at the first entry of row i; step `col_stride` to walk it
    #[inline]
    pub fn row_start(&self, i: usize) -> &'a [T] {
        &self.data[i * self.row_stride..]
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
}
