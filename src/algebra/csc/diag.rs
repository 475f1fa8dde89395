use super::SparseMatrix;
use crate::algebra::{ScalarT, SparseMatrixError};

/// Location of the diagonal entry of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagIndex {
    /// storage index of the entry `(i,i)`
    Present(usize),
    /// no entry `(i,i)` is stored.  Holds the storage index at which it
    /// would be inserted to keep the rows of the column sorted.
    Missing(usize),
}

impl DiagIndex {
    pub fn is_present(&self) -> bool {
        matches!(self, DiagIndex::Present(_))
    }
}

/// Per-column diagonal positions, computed on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DiagIndexCache {
    pub(crate) indices: Vec<DiagIndex>,
    pub(crate) count: usize,
    pub(crate) dirty: bool,
}

impl Default for DiagIndexCache {
    fn default() -> Self {
        Self {
            indices: Vec::new(),
            count: 0,
            dirty: true,
        }
    }
}

impl DiagIndexCache {
    pub(crate) fn invalidate(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn is_clean(&self) -> bool {
        !self.dirty
    }
}

impl<T> SparseMatrix<'_, T>
where
    T: ScalarT,
{
    /// Locate the diagonal entry of every column.
    ///
    /// Returns `Ok(None)` without doing any work if the positions are already
    /// known and `update` is false.  Otherwise rescans the matrix and returns
    /// the number of columns holding an explicit diagonal entry.
    pub fn diag_indices(&mut self, update: bool) -> Result<Option<usize>, SparseMatrixError> {
        self.ensure_defined()?;

        if self.diag.is_clean() && !update {
            return Ok(None);
        }

        let cache = &mut self.diag;
        cache.indices.clear();
        cache.count = 0;

        for col in 0..self.n {
            let last = self.colptr[col + 1];
            let mut k = self.colptr[col];
            while k < last && self.rowval[k] < col {
                k += 1;
            }
            if k < last && self.rowval[k] == col {
                cache.indices.push(DiagIndex::Present(k));
                cache.count += 1;
            } else {
                cache.indices.push(DiagIndex::Missing(k));
            }
        }
        cache.dirty = false;

        Ok(Some(cache.count))
    }

    /// Number of columns with an explicit diagonal entry, computing the
    /// diagonal positions first if necessary.
    pub fn diag_count(&mut self) -> Result<usize, SparseMatrixError> {
        self.diag_indices(false)?;
        Ok(self.diag.count)
    }

    /// Cached diagonal position of column `i`, or `None` if the positions
    /// are not currently known.
    pub fn diag_index(&self, i: usize) -> Option<DiagIndex> {
        if self.diag.is_clean() {
            self.diag.indices.get(i).copied()
        } else {
            None
        }
    }
}
