//! Optional row and column labels carried alongside a matrix

/// Row and column labels; either side may be absent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DimNames {
    pub rows: Option<Vec<String>>,
    pub cols: Option<Vec<String>>,
}

impl DimNames {
    pub fn new(rows: Option<Vec<String>>, cols: Option<Vec<String>>) -> Self {
        Self { rows, cols }
    }

    /// Labels of the transposed matrix
    pub fn transposed(self) -> Self {
        Self {
            rows: self.cols,
            cols: self.rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_none() && self.cols.is_none()
    }
}
