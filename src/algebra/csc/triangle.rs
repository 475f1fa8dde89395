#![allow(non_snake_case)]

use super::SparseMatrix;
use crate::algebra::{ScalarT, StorageKind};

impl<T> SparseMatrix<'_, T>
where
    T: ScalarT,
{
    /// Allocates the transpose of the stored entries.  Values are not
    /// conjugated.
    ///
    /// # Panics
    /// Panics if the matrix is undefined.
    pub fn transpose(&self) -> SparseMatrix<'static, T> {
        assert!(self.is_defined());
        let (m, n) = self.size();
        let nnz = self.nnz();

        // count entries in each row, i.e. each column of the transpose
        let mut colptr = vec![0; m + 1];
        for &row in self.rowval() {
            colptr[row + 1] += 1;
        }
        for i in 0..m {
            colptr[i + 1] += colptr[i];
        }

        let mut next = colptr[0..m].to_vec();
        let mut rowval = vec![0; nnz];
        let mut nzval = vec![T::zero(); nnz];

        for col in 0..n {
            for k in self.colptr[col]..self.colptr[col + 1] {
                let dest = next[self.rowval[k]];
                rowval[dest] = col;
                nzval[dest] = self.nzval[k];
                next[self.rowval[k]] += 1;
            }
        }

        let kind = match self.kind {
            StorageKind::LowerTriangular => StorageKind::UpperTriangular,
            StorageKind::UpperTriangular => StorageKind::LowerTriangular,
            kind => kind,
        };

        SparseMatrix::new(n, m, colptr, rowval, nzval, kind)
    }

    /// Allocates a new matrix holding the upper triangle of the symmetric
    /// (Hermitian) matrix represented by `self`.
    ///
    /// Lower triangular storage is mirrored into the upper triangle with
    /// conjugated values.  For any other storage kind the entries on or
    /// above the diagonal are taken as they are.
    ///
    /// # Panics
    /// Panics if the matrix is undefined or not square.
    pub fn to_triu(&self) -> SparseMatrix<'static, T> {
        assert!(self.is_defined());
        assert_eq!(self.m, self.n);

        if self.kind == StorageKind::LowerTriangular {
            let mut U = self.transpose();
            U.nzval_mut().iter_mut().for_each(|v| *v = v.conj());
            return U;
        }

        let n = self.n;
        let mut colptr = vec![0; n + 1];

        //count the number of entries in the upper triangle
        //and place the totals into colptr
        for col in 0..n {
            let rows = &self.rowval[self.colptr[col]..self.colptr[col + 1]];
            colptr[col + 1] = colptr[col] + rows.iter().filter(|&&row| row <= col).count();
        }

        //copy the upper triangle entries of each column.
        //NB! : assumes that entries in each column have
        //monotonically increasing row numbers
        let nnz = colptr[n];
        let mut rowval = vec![0; nnz];
        let mut nzval = vec![T::zero(); nnz];

        for col in 0..n {
            let ntriu = colptr[col + 1] - colptr[col];
            let (fdest, ldest) = (colptr[col], colptr[col + 1]);
            let fsrc = self.colptr[col];
            let lsrc = fsrc + ntriu;

            rowval[fdest..ldest].copy_from_slice(&self.rowval[fsrc..lsrc]);
            nzval[fdest..ldest].copy_from_slice(&self.nzval[fsrc..lsrc]);
        }

        SparseMatrix::new(n, n, colptr, rowval, nzval, StorageKind::UpperTriangular)
    }

    /// True if no entry lies below the diagonal
    pub fn is_triu(&self) -> bool {
        (0..self.n).all(|col| {
            self.rowval[self.colptr[col]..self.colptr[col + 1]]
                .last()
                .map_or(true, |&row| row <= col)
        })
    }
}

#[test]
fn test_to_triu() {
    use crate::algebra::MatrixShape;

    // A =
    //[ 4.0  -3.0   7.0    ⋅ ]
    //[  ⋅    8.0  -1.0    ⋅ ]
    //[ 1.0    ⋅    2.0  -3.0]
    //[  ⋅   -1.0    ⋅    1.0]
    let A = SparseMatrix::new(
        4,
        4,
        vec![0, 2, 5, 8, 10],
        vec![0, 2, 0, 1, 3, 0, 1, 2, 2, 3],
        vec![4., 1., -3., 8., -1., 7., -1., 2., -3., 1.],
        StorageKind::General,
    );
    let U = A.to_triu();
    assert!(U.is_triu());
    assert_eq!(U.colptr(), &[0, 1, 3, 6, 8]);
    assert_eq!(U.rowval(), &[0, 0, 1, 0, 1, 2, 2, 3]);
    assert_eq!(U.nzval(), &[4., -3., 8., 7., -1., 2., -3., 1.]);

    // lower storage gives the same upper triangle
    let L = U.transpose();
    assert_eq!(L.kind(), StorageKind::LowerTriangular);
    assert!(L.check());
    assert_eq!(L.to_triu(), U);

    // transpose agrees with the transposed product
    let x = vec![1., 2., 3., 4.];
    let (mut y1, mut y2) = (vec![0.; 4], vec![0.; 4]);
    A.gemv(&mut y1, MatrixShape::T, &x, 1., 0.).unwrap();
    A.transpose().mult_mv(&x, &mut y2).unwrap();
    assert_eq!(y1, y2);
}
