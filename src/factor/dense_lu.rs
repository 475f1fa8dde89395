#![allow(non_snake_case)]
use super::{DirectSolver, FactorError, FactorSettings};
use crate::algebra::*;
use log::{debug, info};
use num_traits::Zero;

/// Dense LU factorization with threshold partial pivoting.
///
/// The sparse matrix is scattered into a dense row-major array, so this
/// back end suits small problems only.  It is selected with
/// `direct_solve_method = "dense"` and never chosen automatically.  Symmetric
/// storage kinds are mirrored into the full matrix (with conjugation for
/// complex values), making it usable for any [`StorageKind`].
///
/// At step `k` the diagonal entry is kept as pivot whenever its modulus is
/// at least `pivot_threshold` times the largest modulus in the column below
/// it.  Otherwise the row with the largest entry is swapped in.

#[derive(Debug)]
pub struct DenseLuFactorization<T = f64> {
    n: usize,
    // row-major LU factors, with the unit diagonal of L implied
    lu: Vec<T>,
    // row swapped with row k at step k
    pivot: Vec<usize>,
    pivot_threshold: f64,
    verbose: bool,
    is_analysed: bool,
    is_factored: bool,
}

impl<T> DenseLuFactorization<T>
where
    T: ScalarT,
{
    pub fn new(settings: &FactorSettings) -> Self {
        Self {
            n: 0,
            lu: Vec::new(),
            pivot: Vec::new(),
            pivot_threshold: settings.pivot_threshold,
            verbose: settings.verbose,
            is_analysed: false,
            is_factored: false,
        }
    }

    /// Number of row interchanges made by the last factorization
    pub fn swaps(&self) -> usize {
        self.pivot
            .iter()
            .enumerate()
            .filter(|&(k, &p)| p != k)
            .count()
    }

    // scatter A into the dense array, expanding symmetric storage
    fn scatter(&mut self, A: &SparseMatrix<'_, T>) {
        let n = self.n;
        let mirror = A.kind().is_triangular();
        self.lu.fill(T::zero());

        let (colptr, rowval, nzval) = (A.colptr(), A.rowval(), A.nzval());
        for col in 0..n {
            for k in colptr[col]..colptr[col + 1] {
                let row = rowval[k];
                self.lu[row * n + col] += nzval[k];
                if mirror && row != col {
                    self.lu[col * n + row] += nzval[k].conj();
                }
            }
        }
    }
}

impl<T> DirectSolver<T> for DenseLuFactorization<T>
where
    T: ScalarT,
{
    fn factor_symbolic(&mut self, A: &SparseMatrix<'_, T>) -> Result<(), FactorError> {
        if !A.is_defined() {
            return Err(FactorError::IncompatibleDimension);
        }
        if !A.is_square() {
            return Err(FactorError::NotSquare);
        }
        let n = A.nrows();
        self.n = n;
        self.lu = vec![T::zero(); n * n];
        self.pivot = (0..n).collect();
        self.is_analysed = true;
        self.is_factored = false;
        debug!("dense lu symbolic: n = {}, nnz(A) = {}", n, A.nnz());
        Ok(())
    }

    fn factor_numeric(&mut self, A: &SparseMatrix<'_, T>) -> Result<(), FactorError> {
        self.is_factored = false;
        if !self.is_analysed {
            return Err(FactorError::NotFactored);
        }
        if !A.is_defined() || A.size() != (self.n, self.n) {
            return Err(FactorError::IncompatibleDimension);
        }

        self.scatter(A);

        let n = self.n;
        let threshold: T::Real = self.pivot_threshold.as_T();
        let a = &mut self.lu;

        for k in 0..n {
            // Find pivot
            let mut max_val = T::Real::zero();
            let mut max_row = k;
            for i in k..n {
                let val = a[i * n + k].modulus();
                if val > max_val {
                    max_val = val;
                    max_row = i;
                }
            }
            if max_val == T::Real::zero() {
                return Err(FactorError::Singular);
            }

            // keep the diagonal if it is large enough
            if a[k * n + k].modulus() >= threshold * max_val {
                max_row = k;
            }
            self.pivot[k] = max_row;

            // Swap rows if needed
            if max_row != k {
                for j in 0..n {
                    a.swap(k * n + j, max_row * n + j);
                }
            }

            // Elimination
            let pivot = a[k * n + k];
            for i in (k + 1)..n {
                let factor = a[i * n + k] / pivot;
                a[i * n + k] = factor;
                if factor == T::zero() {
                    continue;
                }
                for j in (k + 1)..n {
                    let a_kj = a[k * n + j];
                    a[i * n + j] -= factor * a_kj;
                }
            }
        }

        self.is_factored = true;
        if self.verbose {
            info!("dense lu numeric: n = {}, row swaps = {}", n, self.swaps());
        } else {
            debug!("dense lu numeric: n = {}, row swaps = {}", n, self.swaps());
        }
        Ok(())
    }

    fn solve(&mut self, x: &mut [T], b: &[T]) -> Result<(), FactorError> {
        if !self.is_factored {
            return Err(FactorError::NotFactored);
        }
        let n = self.n;
        if x.len() != n || b.len() != n {
            return Err(FactorError::IncompatibleDimension);
        }
        let a = &self.lu;

        x.copy_from_slice(b);
        for (k, &p) in self.pivot.iter().enumerate() {
            x.swap(k, p);
        }

        // forward substitution with unit lower factor
        for i in 0..n {
            for j in 0..i {
                let xj = x[j];
                x[i] -= a[i * n + j] * xj;
            }
        }

        // Back substitution
        for i in (0..n).rev() {
            for j in (i + 1)..n {
                let xj = x[j];
                x[i] -= a[i * n + j] * xj;
            }
            x[i] /= a[i * n + i];
        }
        Ok(())
    }

    fn free(&mut self) {
        self.lu = Vec::new();
        self.pivot = Vec::new();
        self.n = 0;
        self.is_analysed = false;
        self.is_factored = false;
    }

    fn is_factored(&self) -> bool {
        self.is_factored
    }
}
