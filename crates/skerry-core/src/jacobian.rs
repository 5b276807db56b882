//! Constraint Jacobian storage with a representation-independent row scan.
//!
//! The Jacobian maps dof velocities to constraint-row velocities. It is
//! stored either densely (`nefc x nv`) or in compressed sparse rows. Island
//! discovery only needs to know which columns of a row are populated, so
//! both layouts expose the same [`RowDofs`] iterator.
//!
//! Dense rows report columns with a non-zero value. Sparse rows report
//! every stored column, including explicitly stored zeros.

use nalgebra::DMatrix;

use crate::error::ModelError;

/// Compressed sparse-row Jacobian.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SparseJacobian {
    ncols: usize,
    rownnz: Vec<usize>,
    rowadr: Vec<usize>,
    colind: Vec<usize>,
    values: Vec<f64>,
}

impl SparseJacobian {
    /// Create an empty sparse Jacobian with `ncols` columns.
    pub fn new(ncols: usize) -> Self {
        Self {
            ncols,
            ..Self::default()
        }
    }

    /// Append a row from `(column, value)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::IndexOutOfRange`] if a column is `>= ncols`.
    pub fn push_row(&mut self, entries: &[(usize, f64)]) -> Result<(), ModelError> {
        if let Some(&(col, _)) = entries.iter().find(|(col, _)| *col >= self.ncols) {
            return Err(ModelError::IndexOutOfRange {
                array: "efc_J_colind",
                index: self.colind.len(),
                value: col,
                bound: self.ncols,
            });
        }
        self.rowadr.push(self.colind.len());
        self.rownnz.push(entries.len());
        self.colind.extend(entries.iter().map(|&(col, _)| col));
        self.values.extend(entries.iter().map(|&(_, val)| val));
        Ok(())
    }

    /// Convert a dense matrix, storing only its non-zero entries.
    pub fn from_dense(dense: &DMatrix<f64>) -> Self {
        let mut sparse = Self::new(dense.ncols());
        for row in 0..dense.nrows() {
            sparse.rowadr.push(sparse.colind.len());
            let start = sparse.colind.len();
            for col in 0..dense.ncols() {
                let val = dense[(row, col)];
                if val != 0.0 {
                    sparse.colind.push(col);
                    sparse.values.push(val);
                }
            }
            sparse.rownnz.push(sparse.colind.len() - start);
        }
        sparse
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.rownnz.len()
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Stored column indices of `row`.
    pub fn row_colind(&self, row: usize) -> &[usize] {
        let adr = self.rowadr[row];
        &self.colind[adr..adr + self.rownnz[row]]
    }

    /// Stored values of `row`.
    pub fn row_values(&self, row: usize) -> &[f64] {
        let adr = self.rowadr[row];
        &self.values[adr..adr + self.rownnz[row]]
    }

    /// Expand into a dense matrix.
    pub fn to_dense(&self) -> DMatrix<f64> {
        let mut dense = DMatrix::zeros(self.nrows(), self.ncols);
        for row in 0..self.nrows() {
            for (&col, &val) in self.row_colind(row).iter().zip(self.row_values(row)) {
                dense[(row, col)] = val;
            }
        }
        dense
    }
}

/// Constraint Jacobian in either storage layout.
#[derive(Clone, Debug, PartialEq)]
pub enum Jacobian {
    /// Dense `nefc x nv` matrix.
    Dense(DMatrix<f64>),
    /// Compressed sparse rows.
    Sparse(SparseJacobian),
}

impl Jacobian {
    /// An empty dense Jacobian with `nv` columns.
    pub fn empty(nv: usize) -> Self {
        Self::Dense(DMatrix::zeros(0, nv))
    }

    /// Number of rows (`nefc`).
    pub fn nrows(&self) -> usize {
        match self {
            Self::Dense(m) => m.nrows(),
            Self::Sparse(s) => s.nrows(),
        }
    }

    /// Number of columns (`nv`).
    pub fn ncols(&self) -> usize {
        match self {
            Self::Dense(m) => m.ncols(),
            Self::Sparse(s) => s.ncols(),
        }
    }

    /// Whether the sparse layout is in use.
    pub fn is_sparse(&self) -> bool {
        matches!(self, Self::Sparse(_))
    }

    /// Populated columns of `row`, in ascending storage order.
    pub fn row_dofs(&self, row: usize) -> RowDofs<'_> {
        match self {
            Self::Dense(m) => RowDofs::Dense {
                matrix: m,
                row,
                col: 0,
            },
            Self::Sparse(s) => RowDofs::Sparse(s.row_colind(row).iter()),
        }
    }

    /// The same Jacobian in sparse layout.
    pub fn to_sparse(&self) -> Self {
        match self {
            Self::Dense(m) => Self::Sparse(SparseJacobian::from_dense(m)),
            Self::Sparse(s) => Self::Sparse(s.clone()),
        }
    }

    /// The same Jacobian in dense layout.
    pub fn to_dense(&self) -> Self {
        match self {
            Self::Dense(m) => Self::Dense(m.clone()),
            Self::Sparse(s) => Self::Dense(s.to_dense()),
        }
    }
}

/// Iterator over the populated columns of one Jacobian row.
pub enum RowDofs<'a> {
    /// Scan of a dense row, skipping zeros.
    Dense {
        /// The full matrix.
        matrix: &'a DMatrix<f64>,
        /// Row being scanned.
        row: usize,
        /// Next column to inspect.
        col: usize,
    },
    /// Stored column indices of a sparse row.
    Sparse(std::slice::Iter<'a, usize>),
}

impl Iterator for RowDofs<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        match self {
            Self::Dense { matrix, row, col } => {
                while *col < matrix.ncols() {
                    let j = *col;
                    *col += 1;
                    if matrix[(*row, j)] != 0.0 {
                        return Some(j);
                    }
                }
                None
            }
            Self::Sparse(iter) => iter.next().copied(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dense() -> DMatrix<f64> {
        DMatrix::from_row_slice(3, 4, &[
            0.0, 1.5, 0.0, -2.0, //
            0.0, 0.0, 0.0, 0.0, //
            3.0, 0.0, 0.0, 0.0,
        ])
    }

    #[test]
    fn dense_row_skips_zeros() {
        let jac = Jacobian::Dense(sample_dense());
        assert_eq!(jac.row_dofs(0).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(jac.row_dofs(1).count(), 0);
        assert_eq!(jac.row_dofs(2).collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn sparse_matches_dense_scan() {
        let dense = Jacobian::Dense(sample_dense());
        let sparse = dense.to_sparse();
        assert!(sparse.is_sparse());
        for row in 0..3 {
            assert_eq!(
                dense.row_dofs(row).collect::<Vec<_>>(),
                sparse.row_dofs(row).collect::<Vec<_>>()
            );
        }
        assert_eq!(sparse.to_dense(), dense);
    }

    #[test]
    fn sparse_reports_stored_zeros() {
        let mut s = SparseJacobian::new(3);
        s.push_row(&[(2, 0.0), (0, 1.0)]).unwrap();
        let jac = Jacobian::Sparse(s);
        assert_eq!(jac.row_dofs(0).collect::<Vec<_>>(), vec![2, 0]);
    }

    #[test]
    fn push_row_rejects_bad_column() {
        let mut s = SparseJacobian::new(2);
        assert!(matches!(
            s.push_row(&[(2, 1.0)]),
            Err(ModelError::IndexOutOfRange { value: 2, .. })
        ));
        assert_eq!(s.nrows(), 0);
    }

    #[test]
    fn empty_has_shape_zero_by_nv() {
        let jac = Jacobian::empty(7);
        assert_eq!(jac.nrows(), 0);
        assert_eq!(jac.ncols(), 7);
        assert!(!jac.is_sparse());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn layouts_scan_identically(
                rows in 1usize..6,
                cols in 1usize..8,
                mask in proptest::collection::vec(any::<bool>(), 48),
            ) {
                let dense = DMatrix::from_fn(rows, cols, |r, c| {
                    if mask[r * cols + c] { (r + c + 1) as f64 } else { 0.0 }
                });
                let dense = Jacobian::Dense(dense);
                let sparse = dense.to_sparse();
                for row in 0..rows {
                    let a: Vec<_> = dense.row_dofs(row).collect();
                    let b: Vec<_> = sparse.row_dofs(row).collect();
                    prop_assert_eq!(a, b);
                }
            }
        }
    }
}
