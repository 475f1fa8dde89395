use crate::algebra::*;
use std::iter::zip;

impl<T> SparseMatrix<'_, T>
where
    T: ScalarT,
{
    /// `w = A*v`.  Pure CSC product of the stored entries.
    ///
    /// # Panics
    /// Panics if `v` or `w` do not match the matrix dimensions.
    pub fn mult_mv(&self, v: &[T], w: &mut [T]) -> Result<(), SparseMatrixError> {
        self.gemv(w, MatrixShape::N, v, T::one(), T::zero())
    }

    /// `w = Aᵀ*v` (transpose, not conjugate transpose).
    ///
    /// # Panics
    /// Panics if `v` or `w` do not match the matrix dimensions.
    pub fn mult_mtv(&self, v: &[T], w: &mut [T]) -> Result<(), SparseMatrixError> {
        self.gemv(w, MatrixShape::T, v, T::one(), T::zero())
    }

    /// `y = a*op(A)*x + b*y` with `op` selected by `shape`.
    pub fn gemv(
        &self,
        y: &mut [T],
        shape: MatrixShape,
        x: &[T],
        a: T,
        b: T,
    ) -> Result<(), SparseMatrixError> {
        self.ensure_defined()?;
        match shape {
            MatrixShape::N => _csc_axpby_N(self, y, x, a, b),
            MatrixShape::T => _csc_axpby_T(self, y, x, a, b),
        }
        Ok(())
    }

    /// `w = A*v` for a symmetric (Hermitian for complex types) matrix held
    /// in triangular storage.  Each stored off-diagonal entry is applied
    /// both as stored and mirrored.  For other storage kinds this is the
    /// same as [`mult_mv`](SparseMatrix::mult_mv).
    pub fn mult_mv_sym(&self, v: &[T], w: &mut [T]) -> Result<(), SparseMatrixError> {
        self.ensure_defined()?;
        if !self.kind.is_triangular() {
            return self.mult_mv(v, w);
        }
        if !self.is_square() {
            return Err(SparseMatrixError::NotSquare);
        }
        _csc_symv(self, w, v);
        Ok(())
    }
}

#[allow(non_snake_case)]
fn _csc_symv<T: ScalarT>(A: &SparseMatrix<'_, T>, y: &mut [T], x: &[T]) {
    assert_eq!(x.len(), A.n);
    assert_eq!(y.len(), A.n);

    y.fill(T::zero());

    for (col, &xcol) in x.iter().enumerate() {
        let first = A.colptr[col];
        let last = A.colptr[col + 1];
        let rows = &A.rowval[first..last];
        let nzvals = &A.nzval[first..last];

        for (&row, &Aij) in zip(rows, nzvals) {
            y[row] += Aij * xcol;

            if row != col {
                //don't double up on the diagonal
                y[col] += Aij.conj() * x[row];
            }
        }
    }
}

fn _scale_y<T: ScalarT>(y: &mut [T], b: T) {
    if b == T::zero() {
        y.fill(T::zero());
    } else if b == T::one() {
    } else {
        y.iter_mut().for_each(|yi| *yi *= b);
    }
}

// sparse matrix-vector multiply, no transpose
#[allow(non_snake_case)]
fn _csc_axpby_N<T: ScalarT>(A: &SparseMatrix<'_, T>, y: &mut [T], x: &[T], a: T, b: T) {
    assert_eq!(x.len(), A.n);
    assert_eq!(y.len(), A.m);

    //first do the b*y part
    _scale_y(y, b);

    // if a is zero, we're done
    if a == T::zero() {
        return;
    }

    //y += A*x
    if a == T::one() {
        for (j, &xj) in x.iter().enumerate() {
            for i in A.colptr[j]..A.colptr[j + 1] {
                y[A.rowval[i]] += A.nzval[i] * xj;
            }
        }
    } else {
        for (j, &xj) in x.iter().enumerate() {
            let axj = a * xj;
            for i in A.colptr[j]..A.colptr[j + 1] {
                y[A.rowval[i]] += A.nzval[i] * axj;
            }
        }
    }
}

// sparse matrix-vector multiply, transposed
#[allow(non_snake_case)]
fn _csc_axpby_T<T: ScalarT>(A: &SparseMatrix<'_, T>, y: &mut [T], x: &[T], a: T, b: T) {
    assert_eq!(x.len(), A.m);
    assert_eq!(y.len(), A.n);

    //first do the b*y part
    _scale_y(y, b);

    // if a is zero, we're done
    if a == T::zero() {
        return;
    }

    //y += A'*x
    for (j, yj) in y.iter_mut().enumerate() {
        let mut acc = T::zero();
        for k in A.colptr[j]..A.colptr[j + 1] {
            acc += A.nzval[k] * x[A.rowval[k]];
        }
        *yj += a * acc;
    }
}
