#![allow(non_snake_case)]

use super::{DiagIndex, SparseMatrix};
use crate::algebra::{CapacityError, FloatT, ScalarT, SparseMatrixError, StorageKind};
use num_complex::Complex;

// markers for the linked list threaded through the work array of
// `prepare_add`.  Neither can collide with a row index.
const UNMARKED: usize = usize::MAX;
const END: usize = usize::MAX - 1;

impl<T> SparseMatrix<'_, T>
where
    T: ScalarT,
{
    /// In-place diagonal shift `A ← A + value·I`.
    ///
    /// Existing diagonal entries are updated in place.  Columns without a
    /// stored diagonal entry receive a new one at its sorted position, with
    /// all later entries shifted right inside the existing arrays.  The
    /// matrix must have capacity for `nnz + n − ndiag` entries, otherwise
    /// the call fails with [`CapacityError::Insufficient`] before
    /// anything is modified.
    ///
    /// Returns the new number of stored entries.
    pub fn add_diag(&mut self, value: T) -> Result<usize, SparseMatrixError> {
        self.ensure_defined()?;
        if !self.is_square() {
            return Err(SparseMatrixError::NotSquare);
        }

        let ndiag = self.diag_count()?;
        let nnz = self.nnz();
        let mut missing = self.n - ndiag;

        if nnz + missing > self.capacity() {
            return Err(CapacityError::Insufficient {
                required: nnz + missing,
                available: self.capacity(),
            }
            .into());
        }

        for idx in self.diag.indices.iter() {
            if let DiagIndex::Present(k) = *idx {
                self.nzval[k] += value;
            }
        }

        if missing == 0 {
            return Ok(nnz);
        }

        // shift entries right, last column first and last entry first, so
        // that nothing is overwritten before it has been moved.  `missing`
        // is the number of new diagonals in columns `0..=col`.
        for col in (0..self.n).rev() {
            let (first, last) = (self.colptr[col], self.colptr[col + 1]);
            self.colptr[col + 1] = last + missing;

            let idx = self.diag.indices[col];
            match idx {
                DiagIndex::Present(k) => {
                    self._shift_entries(first, last, missing);
                    self.diag.indices[col] = DiagIndex::Present(k + missing);
                }
                DiagIndex::Missing(k) => {
                    self._shift_entries(k, last, missing);
                    let dest = k + missing - 1;
                    self.rowval[dest] = col;
                    self.nzval[dest] = value;
                    self.diag.indices[col] = DiagIndex::Present(dest);
                    missing -= 1;
                    self._shift_entries(first, k, missing);
                }
            }
        }
        self.diag.count = self.n;

        Ok(self.nnz())
    }

    // move entries in first..last right by `shift`, last entry first
    fn _shift_entries(&mut self, first: usize, last: usize, shift: usize) {
        if shift == 0 {
            return;
        }
        for k in (first..last).rev() {
            self.rowval[k + shift] = self.rowval[k];
            self.nzval[k + shift] = self.nzval[k];
        }
    }

    /// Sparse sum `C = A + s·B`.
    ///
    /// `C` must already hold enough capacity, typically sized with
    /// [`prepare_add`](SparseMatrix::prepare_add) or
    /// [`sum_nnz`](SparseMatrix::sum_nnz).  If it runs out of room the call
    /// fails with [`CapacityError::Overflow`] naming the column being
    /// filled.  Column pointers of `C` are valid for all earlier columns.
    ///
    /// If `s` is zero, `C` becomes a copy of `A`.
    pub fn add(
        &self,
        s: T,
        B: &SparseMatrix<'_, T>,
        C: &mut SparseMatrix<'_, T>,
    ) -> Result<(), SparseMatrixError> {
        _check_add_dims(self, B, C)?;

        if s == T::zero() {
            return C.copy_from(self);
        }

        _csc_merge(self, B, C, |a, b| match (a, b) {
            (Some(a), Some(b)) => a + s * b,
            (Some(a), None) => a,
            (None, Some(b)) => s * b,
            (None, None) => T::zero(),
        })
    }

    /// Exact number of entries in each column of `A + B`.
    ///
    /// `count` has one entry per column and receives the per-column totals.
    /// `work` is scratch space with one entry per row.  Rows seen in the
    /// current column are chained into a linked list through `work`, so it
    /// is reset at a cost proportional to the column size.
    ///
    /// Returns the total number of entries.
    pub fn prepare_add(
        &self,
        B: &SparseMatrix<'_, T>,
        count: &mut [usize],
        work: &mut [usize],
    ) -> Result<usize, SparseMatrixError> {
        self.ensure_defined()?;
        B.ensure_defined()?;
        if self.size() != B.size() {
            return Err(SparseMatrixError::IncompatibleSizes);
        }
        assert_eq!(count.len(), self.n);
        assert_eq!(work.len(), self.m);

        work.fill(UNMARKED);
        let mut total = 0;

        for (col, count) in count.iter_mut().enumerate() {
            let mut head = END;
            let mut cnt = 0;

            let rowsA = &self.rowval[self.colptr[col]..self.colptr[col + 1]];
            let rowsB = &B.rowval[B.colptr[col]..B.colptr[col + 1]];

            for &row in rowsA.iter().chain(rowsB) {
                if work[row] == UNMARKED {
                    work[row] = head;
                    head = row;
                    cnt += 1;
                }
            }

            while head != END {
                let next = work[head];
                work[head] = UNMARKED;
                head = next;
            }

            *count = cnt;
            total += cnt;
        }

        Ok(total)
    }

    /// Total number of entries of `A + B`.  Allocating wrapper around
    /// [`prepare_add`](SparseMatrix::prepare_add).
    pub fn sum_nnz(&self, B: &SparseMatrix<'_, T>) -> Result<usize, SparseMatrixError> {
        let mut count = vec![0; self.n];
        let mut work = vec![0; self.m];
        self.prepare_add(B, &mut count, &mut work)
    }
}

impl<F> SparseMatrix<'_, F>
where
    F: FloatT + ScalarT,
{
    /// Complex shifted sum `C = A + (sr + i·si)·B` of two real matrices.
    ///
    /// Values of `A` and `B` are widened as they are merged, so no complex
    /// copy of either input is formed.  Capacity behaviour is that of
    /// [`add`](SparseMatrix::add).
    pub fn add_complex(
        &self,
        sr: F,
        si: F,
        B: &SparseMatrix<'_, F>,
        C: &mut SparseMatrix<'_, Complex<F>>,
    ) -> Result<(), SparseMatrixError> {
        _check_add_dims(self, B, C)?;

        let s = Complex::new(sr, si);
        let widen = |x: F| Complex::new(x, F::zero());

        if sr == F::zero() && si == F::zero() {
            let nnz = self.nnz();
            if C.capacity() < nnz {
                return Err(CapacityError::Insufficient {
                    required: nnz,
                    available: C.capacity(),
                }
                .into());
            }
            C.colptr.copy_from_slice(&self.colptr);
            C.rowval[..nnz].copy_from_slice(self.rowval());
            for (c, &a) in C.nzval[..nnz].iter_mut().zip(self.nzval()) {
                *c = widen(a);
            }
            C.kind = self.kind;
            C.diag.invalidate();
            return Ok(());
        }

        _csc_merge(self, B, C, |a, b| match (a, b) {
            (Some(a), Some(b)) => widen(a) + s * b,
            (Some(a), None) => widen(a),
            (None, Some(b)) => s * b,
            (None, None) => Complex::new(F::zero(), F::zero()),
        })
    }
}

fn _check_add_dims<S: ScalarT, U: ScalarT>(
    A: &SparseMatrix<'_, S>,
    B: &SparseMatrix<'_, S>,
    C: &SparseMatrix<'_, U>,
) -> Result<(), SparseMatrixError> {
    A.ensure_defined()?;
    B.ensure_defined()?;
    C.ensure_defined()?;
    if A.size() != B.size() || A.size() != C.size() {
        return Err(SparseMatrixError::IncompatibleSizes);
    }
    Ok(())
}

// storage kind of a sum.  A triangle survives only if both operands
// store the same one.
fn _sum_kind(a: StorageKind, b: StorageKind) -> StorageKind {
    if a == b {
        a
    } else {
        StorageKind::General
    }
}

// column-wise two-pointer merge of A and B into C.  An exhausted
// column reads as row `m`, which sorts after every real row.
fn _csc_merge<S, U, F>(
    A: &SparseMatrix<'_, S>,
    B: &SparseMatrix<'_, S>,
    C: &mut SparseMatrix<'_, U>,
    f: F,
) -> Result<(), SparseMatrixError>
where
    S: ScalarT,
    U: ScalarT,
    F: Fn(Option<S>, Option<S>) -> U,
{
    let m = A.m;
    let cap = C.capacity();
    let mut ptr = 0;

    C.colptr[0] = 0;
    C.kind = _sum_kind(A.kind, B.kind);
    C.diag.invalidate();

    for col in 0..A.n {
        let (mut pa, enda) = (A.colptr[col], A.colptr[col + 1]);
        let (mut pb, endb) = (B.colptr[col], B.colptr[col + 1]);

        while pa < enda || pb < endb {
            let ra = if pa < enda { A.rowval[pa] } else { m };
            let rb = if pb < endb { B.rowval[pb] } else { m };

            if ptr >= cap {
                return Err(CapacityError::Overflow { column: col }.into());
            }

            let (row, val) = if ra == rb {
                let v = f(Some(A.nzval[pa]), Some(B.nzval[pb]));
                pa += 1;
                pb += 1;
                (ra, v)
            } else if ra < rb {
                let v = f(Some(A.nzval[pa]), None);
                pa += 1;
                (ra, v)
            } else {
                let v = f(None, Some(B.nzval[pb]));
                pb += 1;
                (rb, v)
            };

            C.rowval[ptr] = row;
            C.nzval[ptr] = val;
            ptr += 1;
        }
        C.colptr[col + 1] = ptr;
    }

    Ok(())
}
