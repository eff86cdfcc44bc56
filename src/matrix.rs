//! Dense distance matrix shared read-only by every solver.

use crate::error::{Result, TspError};

/// A dense `rows x columns` grid of non-negative edge weights.
///
/// Cell `(i, j)` is the cost of travelling from city `i` to city `j`.
/// Asymmetric weights are allowed and the diagonal is never read by the
/// solvers. The matrix itself may be rectangular; solvers reject anything
/// that is not square when they are constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMatrix {
    rows: usize,
    columns: usize,
    cells: Vec<u32>,
}

impl DistanceMatrix {
    /// Creates a matrix from row-major cells.
    ///
    /// # Errors
    /// Returns [`TspError::MatrixShape`] when `cells.len() != rows * columns`.
    pub fn new(rows: usize, columns: usize, cells: Vec<u32>) -> Result<Self> {
        let expected = rows * columns;
        if cells.len() != expected {
            return Err(TspError::MatrixShape {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            rows,
            columns,
            cells,
        })
    }

    /// Creates a matrix from nested rows.
    ///
    /// # Errors
    /// Returns [`TspError::MatrixShape`] when the rows are ragged.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_tsp::DistanceMatrix;
    ///
    /// let m = DistanceMatrix::from_rows(vec![vec![0, 3], vec![4, 0]]).unwrap();
    /// assert_eq!(m.get(1, 0), 4);
    /// assert!(m.is_square());
    /// ```
    pub fn from_rows(rows: Vec<Vec<u32>>) -> Result<Self> {
        let row_count = rows.len();
        let columns = rows.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(row_count * columns);
        for row in rows {
            if row.len() != columns {
                return Err(TspError::MatrixShape {
                    expected: row_count * columns,
                    actual: cells.len() + row.len(),
                });
            }
            cells.extend(row);
        }
        Self::new(row_count, columns, cells)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of cities. Only meaningful for square matrices.
    pub fn dimension(&self) -> usize {
        self.rows
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.columns
    }

    /// Checks the shape every solver requires: square with at least one city.
    pub fn ensure_square(&self) -> Result<()> {
        if self.rows == 0 || self.columns == 0 {
            return Err(TspError::EmptyMatrix);
        }
        if !self.is_square() {
            return Err(TspError::NonSquareMatrix {
                rows: self.rows,
                columns: self.columns,
            });
        }
        Ok(())
    }

    /// Weight of the edge `from -> to`.
    ///
    /// # Panics
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> u32 {
        assert!(
            from < self.rows && to < self.columns,
            "edge ({from}, {to}) out of bounds for {}x{} matrix",
            self.rows,
            self.columns
        );
        self.cells[from * self.columns + to]
    }

    /// Weight of the edge `from -> to` widened for accumulation.
    #[inline]
    pub fn cost(&self, from: usize, to: usize) -> u64 {
        u64::from(self.get(from, to))
    }

    /// Total cost of following `path` edge by edge.
    ///
    /// The path is not closed implicitly: pass a closed tour (ending at its
    /// start city) to get the round-trip cost. Paths shorter than two cities
    /// cost zero.
    pub fn path_cost(&self, path: &[usize]) -> u64 {
        path.windows(2).map(|w| self.cost(w[0], w[1])).sum()
    }

    /// Cost of the closed tour through `order`, including the return edge
    /// from the last city back to the first.
    pub fn tour_cost(&self, order: &[usize]) -> u64 {
        match (order.first(), order.last()) {
            (Some(&first), Some(&last)) if order.len() > 1 => {
                self.path_cost(order) + self.cost(last, first)
            }
            _ => 0,
        }
    }
}
