#![allow(non_snake_case)]

use super::{CscBuffer, DiagIndexCache};
use crate::algebra::{
    CapacityError, ScalarT, SparseFormatError, SparseMatrixError, StorageKind,
};
use itertools::Itertools;

/// Sparse matrix in standard Compressed Sparse Column (CSC) format
///
/// The three CSC arrays are each held in a [`CscBuffer`], so a matrix can
/// either own its data or operate directly on arrays supplied by the caller.
/// Arrays may be longer than the number of stored entries.  The spare room
/// is the matrix [`capacity`](SparseMatrix::capacity) and is used by the
/// in-place operations [`add_diag`](SparseMatrix::add_diag) and
/// [`add`](SparseMatrix::add) when they write into an existing matrix.
///
/// __Example usage__ : To construct the 3 x 3 matrix
/// ```text
/// A = [1.  3.  5.]
///     [2.  0.  6.]
///     [0.  4.  7.]
/// ```
///
/// ```
/// use arsparse::algebra::{SparseMatrix, StorageKind};
///
/// let A : SparseMatrix<f64> = SparseMatrix::new(
///    3,                                // m
///    3,                                // n
///    vec![0, 2, 4, 7],                 //colptr
///    vec![0, 1, 0, 2, 0, 1, 2],        //rowval
///    vec![1., 2., 3., 4., 5., 6., 7.], //nzval
///    StorageKind::General,
///  );
///
/// // optional correctness check
/// assert!(A.check());
/// ```
///
/// A matrix operating on borrowed arrays:
///
/// ```
/// use arsparse::algebra::{SparseMatrix, StorageKind};
///
/// let mut colptr = vec![0, 1, 2];
/// let mut rowval = vec![0, 1, 0];  // one spare slot
/// let mut nzval = vec![4., 4., 0.];
///
/// let mut A = SparseMatrix::from_slices(
///     2, 2, &mut colptr, &mut rowval, &mut nzval, StorageKind::LowerTriangular,
/// );
/// assert!(!A.is_owner());
/// assert_eq!(A.capacity(), 3);
/// A.add_diag(-1.0).unwrap();
/// drop(A);
/// assert_eq!(nzval[..2], [3., 3.]);
/// ```
#[derive(Debug, Clone)]
pub struct SparseMatrix<'a, T = f64> {
    /// number of rows
    pub(crate) m: usize,
    /// number of columns
    pub(crate) n: usize,
    /// column pointer, length `n+1`, or empty for an undefined matrix
    pub(crate) colptr: CscBuffer<'a, usize>,
    /// row indices, length at least `nnz`
    pub(crate) rowval: CscBuffer<'a, usize>,
    /// stored values, length at least `nnz`
    pub(crate) nzval: CscBuffer<'a, T>,
    /// which part of the matrix is stored
    pub(crate) kind: StorageKind,
    /// lazily computed diagonal positions
    pub(crate) diag: DiagIndexCache,
}

impl<'a, T> SparseMatrix<'a, T>
where
    T: ScalarT,
{
    /// `SparseMatrix` constructor taking ownership of the CSC arrays.
    ///
    /// The arrays may be longer than `colptr[n]`, in which case the extra
    /// entries are available as capacity for in-place growth.
    ///
    /// # Panics
    /// Makes rudimentary dimensional compatibility checks and panics on
    /// failure.   This constructor does __not__
    /// ensure that rows indices are all in bounds or that data is arranged
    /// such that entries within each column appear in order of increasing
    /// row index.   Use [`check`](SparseMatrix::check) for that.
    pub fn new(
        m: usize,
        n: usize,
        colptr: Vec<usize>,
        rowval: Vec<usize>,
        nzval: Vec<T>,
        kind: StorageKind,
    ) -> Self {
        Self::from_buffers(m, n, colptr.into(), rowval.into(), nzval.into(), kind)
    }

    /// `SparseMatrix` constructor operating on caller owned arrays.
    ///
    /// The matrix never releases the arrays.  Modifications made by in-place
    /// operations are visible to the caller once the matrix is dropped.
    ///
    /// # Panics
    /// Panics under the same conditions as [`new`](SparseMatrix::new).
    pub fn from_slices(
        m: usize,
        n: usize,
        colptr: &'a mut [usize],
        rowval: &'a mut [usize],
        nzval: &'a mut [T],
        kind: StorageKind,
    ) -> Self {
        Self::from_buffers(m, n, colptr.into(), rowval.into(), nzval.into(), kind)
    }

    fn from_buffers(
        m: usize,
        n: usize,
        colptr: CscBuffer<'a, usize>,
        rowval: CscBuffer<'a, usize>,
        nzval: CscBuffer<'a, T>,
        kind: StorageKind,
    ) -> Self {
        assert_eq!(colptr.len(), n + 1);
        assert!(colptr[n] <= rowval.len());
        assert!(colptr[n] <= nzval.len());
        SparseMatrix {
            m,
            n,
            colptr,
            rowval,
            nzval,
            kind,
            diag: DiagIndexCache::default(),
        }
    }

    /// allocate space for a sparse matrix with capacity for `nzmax` elements
    ///
    /// The matrix initially has no entries.  To make an m x n matrix
    /// with room for 10 entries, use
    /// ```
    /// use arsparse::algebra::{SparseMatrix, StorageKind};
    /// let A : SparseMatrix<f64> = SparseMatrix::spalloc(3, 4, 10, StorageKind::General);
    /// assert_eq!(A.nnz(), 0);
    /// assert_eq!(A.capacity(), 10);
    /// ```
    pub fn spalloc(m: usize, n: usize, nzmax: usize, kind: StorageKind) -> Self {
        let colptr = vec![0; n + 1];
        let rowval = vec![0; nzmax];
        let nzval = vec![T::zero(); nzmax];

        SparseMatrix::new(m, n, colptr, rowval, nzval, kind)
    }

    /// Identity matrix of size `n`
    pub fn identity(n: usize) -> Self {
        let colptr = (0usize..=n).collect();
        let rowval = (0usize..n).collect();
        let nzval = vec![T::one(); n];

        SparseMatrix::new(n, n, colptr, rowval, nzval, StorageKind::General)
    }

    /// An `m x n` matrix with no data attached.
    ///
    /// Operations on an undefined matrix report
    /// [`DataUndefined`](SparseMatrixError::DataUndefined).
    pub fn undefined(m: usize, n: usize) -> Self {
        SparseMatrix {
            m,
            n,
            colptr: CscBuffer::default(),
            rowval: CscBuffer::default(),
            nzval: CscBuffer::default(),
            kind: StorageKind::General,
            diag: DiagIndexCache::default(),
        }
    }

    /// true if the column pointer array is present
    pub fn is_defined(&self) -> bool {
        self.colptr.len() == self.n + 1
    }

    pub(crate) fn ensure_defined(&self) -> Result<(), SparseMatrixError> {
        if self.is_defined() {
            Ok(())
        } else {
            Err(SparseMatrixError::DataUndefined)
        }
    }

    /// number of rows
    pub fn nrows(&self) -> usize {
        self.m
    }

    /// number of columns
    pub fn ncols(&self) -> usize {
        self.n
    }

    /// (rows, columns)
    pub fn size(&self) -> (usize, usize) {
        (self.m, self.n)
    }

    /// true if rows == columns
    pub fn is_square(&self) -> bool {
        self.m == self.n
    }

    /// number of stored entries
    pub fn nnz(&self) -> usize {
        if self.is_defined() {
            self.colptr[self.n]
        } else {
            0
        }
    }

    /// number of entries the arrays can hold without reallocation
    pub fn capacity(&self) -> usize {
        usize::min(self.rowval.len(), self.nzval.len())
    }

    /// storage kind
    pub fn kind(&self) -> StorageKind {
        self.kind
    }

    /// Change the storage kind without touching the data.
    pub fn set_kind(&mut self, kind: StorageKind) {
        self.kind = kind;
    }

    /// true if all three arrays are released with the matrix
    pub fn is_owner(&self) -> bool {
        self.colptr.is_owned() && self.rowval.is_owned() && self.nzval.is_owned()
    }

    /// column pointer array, empty for an undefined matrix
    pub fn colptr(&self) -> &[usize] {
        &self.colptr
    }

    /// row indices of the stored entries
    pub fn rowval(&self) -> &[usize] {
        &self.rowval[..self.nnz()]
    }

    /// values of the stored entries
    pub fn nzval(&self) -> &[T] {
        let nnz = self.nnz();
        &self.nzval[..nnz]
    }

    /// mutable values of the stored entries.  The sparsity pattern is unaffected.
    pub fn nzval_mut(&mut self) -> &mut [T] {
        let nnz = self.nnz();
        &mut self.nzval[..nnz]
    }

    /// Mutable access to the pattern arrays.  The diagonal index cache is
    /// marked dirty since the caller may change the pattern.
    pub fn pattern_mut(&mut self) -> (&mut [usize], &mut [usize]) {
        self.diag.invalidate();
        (&mut self.colptr, &mut self.rowval)
    }

    /// Structural check of the matrix data.  Returns `false` on any
    /// violation reported by [`check_format`](SparseMatrix::check_format).
    pub fn check(&self) -> bool {
        self.check_format().is_ok()
    }

    /// Check that matrix data is correctly formatted.
    pub fn check_format(&self) -> Result<(), SparseFormatError> {
        if !self.is_defined() {
            return Err(SparseFormatError::Undefined);
        }

        if self.colptr[0] != 0 {
            return Err(SparseFormatError::BadColptr);
        }

        //check for colptr monotonicity
        if self.colptr.iter().tuple_windows().any(|(a, b)| a > b) {
            return Err(SparseFormatError::BadColptr);
        }

        if self.colptr[self.n] > self.capacity() {
            return Err(SparseFormatError::IncompatibleDimension);
        }

        for col in 0..self.n {
            let rows = &self.rowval[self.colptr[col]..self.colptr[col + 1]];

            //check for rowval monotonicity within each column
            if rows.iter().tuple_windows().any(|(a, b)| a >= b) {
                return Err(SparseFormatError::BadRowOrdering);
            }

            //check for row values out of bounds
            if let Some(&last) = rows.last() {
                if last >= self.m {
                    return Err(SparseFormatError::BadRowval);
                }
            }

            //check the declared triangle
            let violates = match self.kind {
                StorageKind::LowerTriangular => rows.first().is_some_and(|&r| r < col),
                StorageKind::UpperTriangular => rows.last().is_some_and(|&r| r > col),
                _ => false,
            };
            if violates {
                return Err(SparseFormatError::BadTriangle { column: col });
            }
        }

        Ok(())
    }

    /// Deep copy of `other` into the existing storage of `self`.
    ///
    /// Copies the column pointers, the stored entries, the storage kind and
    /// the diagonal index cache if `other` has a clean one.  The destination
    /// is never grown.
    pub fn copy_from(&mut self, other: &SparseMatrix<'_, T>) -> Result<(), SparseMatrixError> {
        other.ensure_defined()?;
        self.ensure_defined()?;

        if self.n != other.n {
            return Err(SparseMatrixError::IncompatibleSizes);
        }

        let nnz = other.nnz();
        if self.capacity() < nnz {
            return Err(CapacityError::Insufficient {
                required: nnz,
                available: self.capacity(),
            }
            .into());
        }

        self.m = other.m;
        self.colptr.copy_from_slice(&other.colptr);
        self.rowval[..nnz].copy_from_slice(other.rowval());
        self.nzval[..nnz].copy_from_slice(other.nzval());
        self.kind = other.kind;

        if other.diag.is_clean() {
            self.diag.clone_from(&other.diag);
        } else {
            self.diag.invalidate();
        }

        Ok(())
    }

    /// Returns the value at the given (row,col) index as an Option.
    /// Returns None if the given index is not a structural nonzero.
    ///
    /// # Panics
    /// Panics if the given index is out of bounds or the matrix is undefined.
    pub fn get_entry(&self, idx: (usize, usize)) -> Option<T> {
        let (row, col) = idx;
        assert!(row < self.nrows() && col < self.ncols());

        let first = self.colptr[col];
        let last = self.colptr[col + 1];
        let rows_in_this_column = &self.rowval[first..last];
        match rows_in_this_column.binary_search(&row) {
            Ok(idx) => Some(self.nzval[first + idx]),
            Err(_) => None,
        }
    }

    /// Dense copy of the stored entries, one `Vec` per row.  Triangular
    /// storage is not mirrored.
    pub fn to_dense(&self) -> Vec<Vec<T>> {
        let mut dense = vec![vec![T::zero(); self.n]; self.m];
        if !self.is_defined() {
            return dense;
        }
        for col in 0..self.n {
            for k in self.colptr[col]..self.colptr[col + 1] {
                dense[self.rowval[k]][col] = self.nzval[k];
            }
        }
        dense
    }
}

// Equality compares dimensions, storage kind and stored entries only.
// Spare capacity, ownership and cache state are ignored.
impl<T: ScalarT> PartialEq for SparseMatrix<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.m == other.m
            && self.n == other.n
            && self.kind == other.kind
            && self.colptr() == other.colptr()
            && self.rowval() == other.rowval()
            && self.nzval() == other.nzval()
    }
}

#[test]
fn test_csc_get_entry() {
    // A =
    //[ ⋅   4.0    ⋅    ⋅   12.0]
    //[1.0  5.0    ⋅    ⋅     ⋅ ]
    //[ ⋅   6.0    ⋅    ⋅   13.0]
    //[2.0  7.0  10.0   ⋅     ⋅ ]
    //[ ⋅   8.0  11.0   ⋅   14.0]
    //[3.0  9.0    ⋅    ⋅     ⋅ ]

    let A = SparseMatrix::new(
        6,                                                                 // m
        5,                                                                 // n
        vec![0, 3, 9, 11, 11, 14],                                         // colptr
        vec![1, 3, 5, 0, 1, 2, 3, 4, 5, 3, 4, 0, 2, 4],                    // rowval
        vec![1., 2., 3., 4., 5., 6., 7., 8., 9., 10., 11., 12., 13., 14.], // nzval
        StorageKind::General,
    );

    assert_eq!(A.get_entry((1, 0)).unwrap(), 1.);
    assert_eq!(A.get_entry((5, 0)).unwrap(), 3.);
    assert_eq!(A.get_entry((3, 1)).unwrap(), 7.);
    assert_eq!(A.get_entry((4, 4)).unwrap(), 14.);

    assert!(A.get_entry((0, 0)).is_none());
    assert!(A.get_entry((2, 2)).is_none());
    assert!(A.get_entry((1, 3)).is_none());
    assert!(A.get_entry((3, 4)).is_none());
}
