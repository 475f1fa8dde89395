#![allow(non_snake_case)]

use super::SparseMatrix;
use crate::algebra::{CapacityError, ScalarT, SparseMatrixError, StorageKind};

impl<T> SparseMatrix<'_, T>
where
    T: ScalarT,
{
    /// Number of entries in the fully populated matrix represented by
    /// triangular storage, i.e. `2·nnz − ndiag`.  For non-triangular
    /// storage this is just `nnz`.
    pub fn expanded_nnz(&self) -> usize {
        if !self.is_defined() || !self.kind.is_triangular() {
            return self.nnz();
        }
        let ndiag = (0..self.n)
            .filter(|&col| {
                self.rowval[self.colptr[col]..self.colptr[col + 1]]
                    .binary_search(&col)
                    .is_ok()
            })
            .count();
        2 * self.nnz() - ndiag
    }

    /// Expand triangular storage into `target` as a full symmetric matrix.
    ///
    /// Every stored off-diagonal entry `(r, c)` is also written to `(c, r)`,
    /// conjugated for complex element types, and `target` is marked
    /// [`ExpandedSymmetric`](StorageKind::ExpandedSymmetric).  A source
    /// that is not triangular is copied into `target` unchanged.
    ///
    /// The required size is computed before anything is written.  If
    /// `target` is too small the call fails with
    /// [`CapacityError::Insufficient`] and `target` is left untouched.
    pub fn expand(&self, target: &mut SparseMatrix<'_, T>) -> Result<(), SparseMatrixError> {
        self.ensure_defined()?;
        target.ensure_defined()?;

        if !self.kind.is_triangular() {
            return target.copy_from(self);
        }
        if !self.is_square() {
            return Err(SparseMatrixError::NotSquare);
        }
        if target.size() != self.size() {
            return Err(SparseMatrixError::IncompatibleSizes);
        }

        let n = self.n;
        let lower = self.kind == StorageKind::LowerTriangular;

        // number of mirrored entries landing in each column
        let mut extra = vec![0usize; n];
        for col in 0..n {
            for &row in &self.rowval[self.colptr[col]..self.colptr[col + 1]] {
                if row != col {
                    extra[row] += 1;
                }
            }
        }

        // new column pointers
        let mut colptr = vec![0usize; n + 1];
        for col in 0..n {
            let stored = self.colptr[col + 1] - self.colptr[col];
            colptr[col + 1] = colptr[col] + stored + extra[col];
        }

        let required = colptr[n];
        if required > target.capacity() {
            return Err(CapacityError::Insufficient {
                required,
                available: target.capacity(),
            }
            .into());
        }

        // copy the stored triangle.  Lower triangles go to the tail of each
        // output column, upper triangles to the head.  `next` is the first
        // free slot for mirrored entries in each column.
        let mut next = vec![0usize; n];
        for col in 0..n {
            let (first, last) = (self.colptr[col], self.colptr[col + 1]);
            let stored = last - first;
            let dest = if lower {
                colptr[col + 1] - stored
            } else {
                colptr[col]
            };
            target.rowval[dest..dest + stored].copy_from_slice(&self.rowval[first..last]);
            target.nzval[dest..dest + stored].copy_from_slice(&self.nzval[first..last]);
            next[col] = if lower { colptr[col] } else { dest + stored };
        }

        // mirrored deposit.  Walking source columns in order keeps the
        // mirrored rows sorted within each destination column.
        for col in 0..n {
            for k in self.colptr[col]..self.colptr[col + 1] {
                let row = self.rowval[k];
                if row == col {
                    continue;
                }
                let dest = next[row];
                target.rowval[dest] = col;
                target.nzval[dest] = self.nzval[k].conj();
                next[row] += 1;
            }
        }

        target.colptr.copy_from_slice(&colptr);
        target.kind = StorageKind::ExpandedSymmetric;
        target.diag.invalidate();

        Ok(())
    }
}
