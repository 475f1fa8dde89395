#![allow(non_snake_case)]

use super::OperatorError;
use crate::algebra::*;
use crate::factor::{DirectSolver, FactorSettings, Factorization};
use log::{debug, warn};

/// General sparse matrix, square or rectangular.
///
/// Besides the plain products this provides the compound products used
/// for singular value problems: `AᵀA·v`, `AAᵀ·v` and the product with the
/// symmetric block matrix `[0 A; Aᵀ 0]`.  Square matrices can be factored
/// directly or after a diagonal shift.

#[derive(Debug)]
pub struct NonSymMatrix<'a, T = f64>
where
    T: ScalarT,
{
    A: SparseMatrix<'a, T>,
    settings: FactorSettings,
    // copy of A with room for a full diagonal
    AsI: Option<SparseMatrix<'static, T>>,
    solver: Option<Factorization<T>>,
}

impl<'a, T> NonSymMatrix<'a, T>
where
    T: ScalarT,
{
    /// Wrap a matrix.  When `settings.check` is set the arrays are checked
    /// with [`SparseMatrix::check_format`].
    pub fn new(A: SparseMatrix<'a, T>, settings: FactorSettings) -> Result<Self, OperatorError> {
        let mut op = Self::undefined(A.nrows(), A.ncols(), settings);
        op.define(A)?;
        Ok(op)
    }

    /// An `m x n` operator with no data.
    pub fn undefined(m: usize, n: usize, settings: FactorSettings) -> Self {
        Self {
            A: SparseMatrix::undefined(m, n),
            settings,
            AsI: None,
            solver: None,
        }
    }

    // wrap a matrix whose values are filled in later
    pub(super) fn unchecked(A: SparseMatrix<'a, T>, settings: FactorSettings) -> Self {
        Self {
            A,
            settings,
            AsI: None,
            solver: None,
        }
    }

    /// Replace the matrix data.  Any previous factorization is dropped.
    ///
    /// The matrix must be in full storage.  Triangular storage kinds are
    /// rejected with [`InconsistentData`](OperatorError::InconsistentData);
    /// use [`SymMatrix`](super::SymMatrix) for those.
    pub fn define(&mut self, A: SparseMatrix<'a, T>) -> Result<(), OperatorError> {
        if !A.is_defined() {
            return Err(OperatorError::DataUndefined);
        }
        if A.kind().is_triangular() {
            return Err(OperatorError::InconsistentData);
        }
        if self.settings.check && !A.check() {
            return Err(OperatorError::InconsistentData);
        }
        self.A = A;
        self.AsI = None;
        self.solver = None;
        Ok(())
    }

    pub fn is_defined(&self) -> bool {
        self.A.is_defined()
    }

    pub fn is_factored(&self) -> bool {
        self.solver.as_ref().is_some_and(|s| s.is_factored())
    }

    pub fn nrows(&self) -> usize {
        self.A.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.A.ncols()
    }

    pub fn nnz(&self) -> usize {
        self.A.nnz()
    }

    pub fn matrix(&self) -> &SparseMatrix<'a, T> {
        &self.A
    }

    pub(super) fn matrix_mut(&mut self) -> &mut SparseMatrix<'a, T> {
        self.solver = None;
        &mut self.A
    }

    pub fn settings(&self) -> &FactorSettings {
        &self.settings
    }

    pub fn into_matrix(self) -> SparseMatrix<'a, T> {
        self.A
    }

    /// Factor `A` for use by [`mult_inv_v`](NonSymMatrix::mult_inv_v).
    pub fn factor_a(&mut self) -> Result<(), OperatorError> {
        self.ensure_defined()?;
        if !self.A.is_square() {
            return Err(OperatorError::NotSquare);
        }
        self.solver = None;

        let mut solver = Factorization::from_settings(&self.settings, self.A.kind().is_symmetric());
        solver.factor(&self.A)?;
        debug!("factored A with {} back end", solver.name());
        self.solver = Some(solver);
        Ok(())
    }

    /// Form and factor `A − σI` for use by
    /// [`mult_inv_v`](NonSymMatrix::mult_inv_v).  `A` itself is not
    /// modified.
    pub fn factor_asi(&mut self, sigma: T) -> Result<(), OperatorError> {
        self.ensure_defined()?;
        if !self.A.is_square() {
            return Err(OperatorError::NotSquare);
        }
        self.solver = None;

        // room for every missing diagonal entry
        let n = self.A.ncols();
        let required = self.A.nnz() + n - self.A.diag_count()?;

        let mut AsI = match self.AsI.take() {
            Some(AsI) if AsI.capacity() >= required => AsI,
            Some(AsI) => {
                warn!(
                    "A - sigma*I needs {} entries, {} available.  Reallocating",
                    required,
                    AsI.capacity()
                );
                SparseMatrix::spalloc(n, n, required, StorageKind::General)
            }
            None => SparseMatrix::spalloc(n, n, required, StorageKind::General),
        };

        AsI.copy_from(&self.A)?;
        let nnz = AsI.add_diag(-sigma)?;
        debug!("A - sigma*I: n = {}, nnz = {}", n, nnz);

        let mut solver = Factorization::from_settings(&self.settings, AsI.kind().is_symmetric());
        let result = solver.factor(&AsI);
        self.AsI = Some(AsI);
        result?;

        debug!("factored A - sigma*I with {} back end", solver.name());
        self.solver = Some(solver);
        Ok(())
    }

    /// `w = A·v`
    pub fn mult_mv(&self, v: &[T], w: &mut [T]) -> Result<(), OperatorError> {
        self.ensure_defined()?;
        self.A.mult_mv(v, w)?;
        Ok(())
    }

    /// `w = Aᵀ·v`
    pub fn mult_mtv(&self, v: &[T], w: &mut [T]) -> Result<(), OperatorError> {
        self.ensure_defined()?;
        self.A.mult_mtv(v, w)?;
        Ok(())
    }

    /// `w = AᵀA·v`
    pub fn mult_mtmv(&self, v: &[T], w: &mut [T]) -> Result<(), OperatorError> {
        let mut t = vec![T::zero(); self.A.nrows()];
        self.mult_mv(v, &mut t)?;
        self.mult_mtv(&t, w)
    }

    /// `w = AAᵀ·v`
    pub fn mult_mmtv(&self, v: &[T], w: &mut [T]) -> Result<(), OperatorError> {
        let mut t = vec![T::zero(); self.A.ncols()];
        self.mult_mtv(v, &mut t)?;
        self.mult_mv(&t, w)
    }

    /// `w = [0 A; Aᵀ 0]·v`, with `v` and `w` of length `m + n`.
    pub fn mult_0mmt0v(&self, v: &[T], w: &mut [T]) -> Result<(), OperatorError> {
        let m = self.A.nrows();
        let (v1, v2) = v.split_at(m);
        let (w1, w2) = w.split_at_mut(m);
        self.mult_mv(v2, w1)?;
        self.mult_mtv(v1, w2)
    }

    /// Solve with the current factorization, `w = A⁻¹·v` or
    /// `w = (A − σI)⁻¹·v` depending on the last factor call.
    pub fn mult_inv_v(&mut self, v: &[T], w: &mut [T]) -> Result<(), OperatorError> {
        let solver = self.solver.as_mut().ok_or(OperatorError::NotFactored)?;
        solver.solve(w, v)?;
        Ok(())
    }

    fn ensure_defined(&self) -> Result<(), OperatorError> {
        if self.A.is_defined() {
            Ok(())
        } else {
            Err(OperatorError::DataUndefined)
        }
    }
}
