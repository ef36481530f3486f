//! Compressed sparse storage shared by the CSR and CSC roles
//!
//! A compressed matrix stores a major axis (rows for CSR, columns for CSC)
//! as a pointer array `indptr` of length `major + 1`, and for every stored
//! entry its minor-axis position in `indices` and its value in `values`.
//! Which axis is major is carried by an explicit [`Orientation`] tag, so the
//! same arrays can be reinterpreted as the transposed matrix in the other
//! orientation without copying.

use std::fmt;
use std::ops::Range;

use crate::error::{Error, Result};
use crate::matrix::names::DimNames;
use crate::scalar::Scalar;

/// Which axis of the matrix is compressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Compressed sparse row: `indptr` runs over rows
    Row,
    /// Compressed sparse column: `indptr` runs over columns
    Column,
}

impl Orientation {
    pub fn flipped(self) -> Self {
        match self {
            Orientation::Row => Orientation::Column,
            Orientation::Column => Orientation::Row,
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Orientation::Row => "CSR",
            Orientation::Column => "CSC",
        }
    }
}

/// A sparse matrix in compressed (CSR or CSC) format
///
/// When `values` is `None` the matrix is structural: every stored entry
/// has value one.
#[derive(Clone)]
pub struct CompressedMatrix<V = f64> {
    /// Which axis `indptr` runs over
    pub orientation: Orientation,

    /// Number of rows in the matrix
    pub n_rows: usize,

    /// Number of columns in the matrix
    pub n_cols: usize,

    /// Lane pointers (size: major + 1)
    /// indptr[k] is the index in indices and values where lane k starts
    pub indptr: Vec<usize>,

    /// Minor-axis positions (size: nnz)
    pub indices: Vec<usize>,

    /// Stored values (size: nnz), absent for structural matrices
    pub values: Option<Vec<V>>,

    /// Optional row and column labels
    pub names: DimNames,
}

impl<V: Scalar> CompressedMatrix<V> {
    /// Creates a new CSR matrix
    ///
    /// # Panics
    ///
    /// Panics if the arrays are inconsistent, see [`CompressedMatrix::try_new`].
    pub fn new_csr(
        n_rows: usize,
        n_cols: usize,
        indptr: Vec<usize>,
        indices: Vec<usize>,
        values: Vec<V>,
    ) -> Self {
        Self::checked(Orientation::Row, n_rows, n_cols, indptr, indices, Some(values))
    }

    /// Creates a new CSC matrix
    ///
    /// # Panics
    ///
    /// Panics if the arrays are inconsistent, see [`CompressedMatrix::try_new`].
    pub fn new_csc(
        n_rows: usize,
        n_cols: usize,
        indptr: Vec<usize>,
        indices: Vec<usize>,
        values: Vec<V>,
    ) -> Self {
        Self::checked(Orientation::Column, n_rows, n_cols, indptr, indices, Some(values))
    }

    /// Creates a structural matrix, every stored entry counting as one
    ///
    /// # Panics
    ///
    /// Panics if the arrays are inconsistent, see [`CompressedMatrix::try_new`].
    pub fn binary(
        orientation: Orientation,
        n_rows: usize,
        n_cols: usize,
        indptr: Vec<usize>,
        indices: Vec<usize>,
    ) -> Self {
        Self::checked(orientation, n_rows, n_cols, indptr, indices, None)
    }

    fn checked(
        orientation: Orientation,
        n_rows: usize,
        n_cols: usize,
        indptr: Vec<usize>,
        indices: Vec<usize>,
        values: Option<Vec<V>>,
    ) -> Self {
        match Self::try_new(orientation, n_rows, n_cols, indptr, indices, values) {
            Ok(matrix) => matrix,
            Err(err) => panic!("{}", err),
        }
    }

    /// Creates a matrix after checking that the arrays describe a well-formed
    /// compressed structure:
    /// - indptr.len() must be major + 1 and start at 0
    /// - indptr must be non-decreasing and end at indices.len()
    /// - every index must be below the minor dimension
    /// - values, when present, must have one entry per index
    pub fn try_new(
        orientation: Orientation,
        n_rows: usize,
        n_cols: usize,
        indptr: Vec<usize>,
        indices: Vec<usize>,
        values: Option<Vec<V>>,
    ) -> Result<Self> {
        let matrix = Self {
            orientation,
            n_rows,
            n_cols,
            indptr,
            indices,
            values,
            names: DimNames::default(),
        };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Checks the structural invariants listed on [`CompressedMatrix::try_new`]
    pub fn validate(&self) -> Result<()> {
        let major = self.major_dim();
        let minor = self.minor_dim();
        let kind = self.orientation.short_name();

        if self.indptr.len() != major + 1 {
            return Err(Error::invalid(format!(
                "{kind} indptr.len() must be major + 1 = {}, got {}",
                major + 1,
                self.indptr.len()
            )));
        }
        if self.indptr[0] != 0 {
            return Err(Error::invalid(format!("{kind} indptr must start at 0")));
        }
        if self.indptr.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::invalid(format!("{kind} indptr must be non-decreasing")));
        }
        if self.indptr[major] != self.indices.len() {
            return Err(Error::invalid(format!(
                "{kind} indptr[{major}] must equal indices.len() = {}, got {}",
                self.indices.len(),
                self.indptr[major]
            )));
        }
        if let Some(&bad) = self.indices.iter().find(|&&idx| idx >= minor) {
            return Err(Error::invalid(format!(
                "{kind} index {bad} out of bounds (minor dimension = {minor})"
            )));
        }
        if let Some(values) = &self.values {
            if values.len() != self.indices.len() {
                return Err(Error::invalid(format!(
                    "{kind} values.len() must equal indices.len() = {}, got {}",
                    self.indices.len(),
                    values.len()
                )));
            }
        }
        Ok(())
    }

    /// Creates an empty matrix with the given dimensions
    pub fn zeros(orientation: Orientation, n_rows: usize, n_cols: usize) -> Self {
        let major = match orientation {
            Orientation::Row => n_rows,
            Orientation::Column => n_cols,
        };
        Self {
            orientation,
            n_rows,
            n_cols,
            indptr: vec![0; major + 1],
            indices: Vec::new(),
            values: Some(Vec::new()),
            names: DimNames::default(),
        }
    }

    /// Creates an identity matrix of the given size
    pub fn identity(orientation: Orientation, n: usize) -> Self {
        Self {
            orientation,
            n_rows: n,
            n_cols: n,
            indptr: (0..=n).collect(),
            indices: (0..n).collect(),
            values: Some(vec![V::one(); n]),
            names: DimNames::default(),
        }
    }

    pub fn with_names(mut self, names: DimNames) -> Self {
        self.names = names;
        self
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// Number of lanes: rows for CSR, columns for CSC
    pub fn major_dim(&self) -> usize {
        match self.orientation {
            Orientation::Row => self.n_rows,
            Orientation::Column => self.n_cols,
        }
    }

    /// Length of each lane: columns for CSR, rows for CSC
    pub fn minor_dim(&self) -> usize {
        match self.orientation {
            Orientation::Row => self.n_cols,
            Orientation::Column => self.n_rows,
        }
    }

    /// Returns the number of stored entries
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_binary(&self) -> bool {
        self.values.is_none()
    }

    /// Borrowed view over the compressed arrays, orientation left to the reader
    pub fn lanes(&self) -> Lanes<'_, V> {
        Lanes {
            indptr: &self.indptr,
            indices: &self.indices,
            values: self.values.as_deref(),
            n_minor: self.minor_dim(),
        }
    }

    /// Returns an iterator over the stored entries of lane k
    ///
    /// Each item is a tuple (minor index, value)
    pub fn lane_iter(&self, k: usize) -> impl Iterator<Item = (usize, V)> + '_ {
        assert!(k < self.major_dim(), "Lane index out of bounds");
        let lanes = self.lanes();
        lanes
            .lane(k)
            .map(move |ix| (lanes.indices[ix], lanes.value(ix)))
    }

    /// Whether every lane lists its indices in strictly ascending order
    pub fn has_sorted_indices(&self) -> bool {
        self.indptr.windows(2).all(|w| {
            self.indices[w[0]..w[1]]
                .windows(2)
                .all(|pair| pair[0] < pair[1])
        })
    }

    /// Sorts the indices of every lane, carrying values along
    pub fn sort_indices(&mut self) {
        let mut scratch: Vec<(usize, V)> = Vec::new();
        for k in 0..self.major_dim() {
            let (start, end) = (self.indptr[k], self.indptr[k + 1]);
            let lane = &mut self.indices[start..end];
            if lane.windows(2).all(|pair| pair[0] <= pair[1]) {
                continue;
            }
            match self.values.as_mut() {
                Some(values) => {
                    scratch.clear();
                    scratch.extend(lane.iter().copied().zip(values[start..end].iter().copied()));
                    scratch.sort_by_key(|&(idx, _)| idx);
                    for (offset, &(idx, val)) in scratch.iter().enumerate() {
                        lane[offset] = idx;
                        values[start + offset] = val;
                    }
                }
                None => lane.sort_unstable(),
            }
        }
    }

    /// Reinterprets the arrays as the transpose in the other orientation
    ///
    /// No data is moved: the CSR arrays of a matrix are the CSC arrays of
    /// its transpose.
    pub fn transposed(self) -> Self {
        Self {
            orientation: self.orientation.flipped(),
            n_rows: self.n_cols,
            n_cols: self.n_rows,
            indptr: self.indptr,
            indices: self.indices,
            values: self.values,
            names: self.names.transposed(),
        }
    }

    /// Converts stored values to another precision
    pub fn cast<U: Scalar>(&self) -> CompressedMatrix<U> {
        CompressedMatrix {
            orientation: self.orientation,
            n_rows: self.n_rows,
            n_cols: self.n_cols,
            indptr: self.indptr.clone(),
            indices: self.indices.clone(),
            values: self
                .values
                .as_ref()
                .map(|values| values.iter().map(|&v| U::cast_from(v.widen())).collect()),
            names: self.names.clone(),
        }
    }
}

/// Borrowed compressed arrays read lane by lane
///
/// Kernels take this view rather than a [`CompressedMatrix`] so that the
/// caller decides whether a lane is a row of the operand or a row of its
/// transpose.
#[derive(Debug, Clone, Copy)]
pub struct Lanes<'a, V> {
    pub indptr: &'a [usize],
    pub indices: &'a [usize],
    pub values: Option<&'a [V]>,
    pub n_minor: usize,
}

impl<'a, V: Scalar> Lanes<'a, V> {
    /// Number of lanes
    #[inline]
    pub fn major(&self) -> usize {
        self.indptr.len().saturating_sub(1)
    }

    /// Length of every lane
    #[inline]
    pub fn minor(&self) -> usize {
        self.n_minor
    }

    /// Positions in `indices`/`values` belonging to lane k
    #[inline]
    pub fn lane(&self, k: usize) -> Range<usize> {
        self.indptr[k]..self.indptr[k + 1]
    }

    /// Stored value at position ix, one for structural matrices
    #[inline]
    pub fn value(&self, ix: usize) -> V {
        match self.values {
            Some(values) => values[ix],
            None => V::one(),
        }
    }

    /// Sum of the values stored in lane k
    pub fn lane_sum(&self, k: usize) -> V {
        let mut acc = V::zero();
        for ix in self.lane(k) {
            acc += self.value(ix);
        }
        acc
    }

    /// True when no lane holds an entry
    #[inline]
    pub fn is_structurally_empty(&self) -> bool {
        let m = self.major();
        m == 0 || self.indptr[0] == self.indptr[m]
    }
}

impl<V: fmt::Debug> fmt::Debug for CompressedMatrix<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.orientation.short_name();
        let major = self.indptr.len().saturating_sub(1);
        let lane_name = match self.orientation {
            Orientation::Row => "row",
            Orientation::Column => "col",
        };

        writeln!(f, "CompressedMatrix ({kind}) {{")?;
        writeln!(f, "  dimensions: {} × {}", self.n_rows, self.n_cols)?;
        writeln!(f, "  nnz: {}", self.indices.len())?;
        if self.values.is_none() {
            writeln!(f, "  structural (no values)")?;
        }

        let max_lanes_to_print = 5.min(major);

        if max_lanes_to_print > 0 {
            writeln!(f, "  content sample:")?;

            for k in 0..max_lanes_to_print {
                write!(f, "    {} {}: ", lane_name, k)?;
                let start = self.indptr[k];
                let end = self.indptr[k + 1];

                if start == end {
                    writeln!(f, "(empty)")?;
                } else {
                    let max_elements = 5.min(end - start);

                    for ix in start..(start + max_elements) {
                        match &self.values {
                            Some(values) => write!(f, "({}, {:?}) ", self.indices[ix], values[ix])?,
                            None => write!(f, "({}) ", self.indices[ix])?,
                        }
                    }

                    if end - start > max_elements {
                        write!(f, "... ({} more)", end - start - max_elements)?;
                    }

                    writeln!(f)?;
                }
            }

            if major > max_lanes_to_print {
                writeln!(
                    f,
                    "    ... ({} more {}s)",
                    major - max_lanes_to_print,
                    lane_name
                )?;
            }
        }

        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_csr() -> CompressedMatrix<f64> {
        // [1 2 0]
        // [0 3 0]
        // [4 0 5]
        CompressedMatrix::new_csr(
            3,
            3,
            vec![0, 2, 3, 5],
            vec![0, 1, 1, 0, 2],
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
        )
    }

    #[test]
    fn test_new_matrix() {
        let matrix = sample_csr();

        assert_eq!(matrix.shape(), (3, 3));
        assert_eq!(matrix.nnz(), 5);
        assert_eq!(matrix.major_dim(), 3);
        assert!(!matrix.is_binary());
    }

    #[test]
    fn test_lane_iter() {
        let matrix = sample_csr();

        let row0: Vec<_> = matrix.lane_iter(0).collect();
        assert_eq!(row0, vec![(0, 1.0), (1, 2.0)]);

        let row2: Vec<_> = matrix.lane_iter(2).collect();
        assert_eq!(row2, vec![(0, 4.0), (2, 5.0)]);
    }

    #[test]
    fn test_binary_values_are_one() {
        let matrix = CompressedMatrix::<f64>::binary(
            Orientation::Column,
            2,
            2,
            vec![0, 1, 2],
            vec![1, 0],
        );
        let lanes = matrix.lanes();
        assert_eq!(lanes.value(0), 1.0);
        assert_eq!(lanes.lane_sum(1), 1.0);
    }

    #[test]
    fn test_identity() {
        let identity = CompressedMatrix::<f32>::identity(Orientation::Column, 3);

        assert_eq!(identity.indptr, vec![0, 1, 2, 3]);
        assert_eq!(identity.indices, vec![0, 1, 2]);
        assert_eq!(identity.values, Some(vec![1.0, 1.0, 1.0]));
    }

    #[test]
    fn test_transposed_swaps_roles_without_copy() {
        let names = DimNames::new(Some(vec!["a".into(), "b".into(), "c".into()]), None);
        let matrix = sample_csr().with_names(names);
        let indptr = matrix.indptr.clone();

        let t = matrix.transposed();
        assert_eq!(t.orientation, Orientation::Column);
        assert_eq!(t.indptr, indptr);
        assert!(t.names.rows.is_none());
        assert_eq!(t.names.cols.as_ref().map(|c| c.len()), Some(3));
    }

    #[test]
    fn test_sort_indices() {
        let mut matrix = CompressedMatrix::new_csr(
            2,
            4,
            vec![0, 3, 4],
            vec![3, 0, 2, 1],
            vec![30.0, 0.5, 20.0, 10.0],
        );
        assert!(!matrix.has_sorted_indices());

        matrix.sort_indices();
        assert!(matrix.has_sorted_indices());
        assert_eq!(matrix.indices, vec![0, 2, 3, 1]);
        assert_eq!(matrix.values, Some(vec![0.5, 20.0, 30.0, 10.0]));
    }

    #[test]
    fn test_structurally_empty() {
        let empty = CompressedMatrix::<f64>::zeros(Orientation::Row, 4, 3);
        assert!(empty.lanes().is_structurally_empty());
        assert!(!sample_csr().lanes().is_structurally_empty());
    }

    #[test]
    fn test_try_new_rejects_out_of_bounds_index() {
        let result = CompressedMatrix::<f64>::try_new(
            Orientation::Row,
            2,
            2,
            vec![0, 1, 2],
            vec![0, 2],
            Some(vec![1.0, 2.0]),
        );
        assert!(matches!(result, Err(Error::InvalidStructure { .. })));
    }

    #[test]
    #[should_panic(expected = "indptr.len() must be major + 1")]
    fn test_invalid_indptr() {
        CompressedMatrix::new_csr(
            3,
            3,
            vec![0, 2, 3], // Missing last element
            vec![0, 1, 1],
            vec![1.0, 2.0, 3.0],
        );
    }

    #[test]
    #[should_panic(expected = "values.len() must equal indices.len()")]
    fn test_inconsistent_lengths() {
        CompressedMatrix::new_csc(
            3,
            3,
            vec![0, 2, 4, 5],
            vec![0, 2, 0, 1, 2],
            vec![1.0, 4.0, 2.0, 3.0], // Missing last element
        );
    }
}
