#![allow(non_snake_case)]

use super::OperatorError;
use crate::algebra::*;
use crate::factor::{DirectSolver, FactorSettings, Factorization};
use log::{debug, warn};

/// Symmetric (or Hermitian) matrix held in triangular storage.
///
/// Products use the stored triangle directly.  For shift-and-invert mode
/// the triangle is expanded into a private full-storage matrix which is
/// then shifted and factored.  That matrix is kept between calls so a new
/// shift reuses its allocation.
///
/// ```
/// use arsparse::algebra::{SparseMatrix, StorageKind};
/// use arsparse::factor::FactorSettings;
/// use arsparse::operators::SymMatrix;
///
/// // upper triangle of [2 -1; -1 2]
/// let A = SparseMatrix::new(
///     2,
///     2,
///     vec![0, 1, 3],
///     vec![0, 0, 1],
///     vec![2., -1., 2.],
///     StorageKind::UpperTriangular,
/// );
/// let mut op = SymMatrix::new(A, FactorSettings::default()).unwrap();
///
/// op.factor_asi(0.5).unwrap();
/// let mut w: Vec<f64> = vec![0.; 2];
/// op.mult_inv_v(&[1., 0.], &mut w).unwrap();
/// assert!((w[0] - 1.2).abs() < 1e-12);
/// assert!((w[1] - 0.8).abs() < 1e-12);
/// ```

#[derive(Debug)]
pub struct SymMatrix<'a, T = f64>
where
    T: ScalarT,
{
    A: SparseMatrix<'a, T>,
    settings: FactorSettings,
    // full storage of A - sigma*I
    AsI: Option<SparseMatrix<'static, T>>,
    solver: Option<Factorization<T>>,
}

impl<'a, T> SymMatrix<'a, T>
where
    T: ScalarT,
{
    /// Wrap a symmetric matrix.  `A` must be square and held in triangular
    /// or expanded symmetric storage.  When `settings.check` is set the
    /// arrays are checked with [`SparseMatrix::check_format`].
    pub fn new(A: SparseMatrix<'a, T>, settings: FactorSettings) -> Result<Self, OperatorError> {
        let mut op = Self::undefined(A.nrows(), settings);
        op.define(A)?;
        Ok(op)
    }

    /// An `n x n` operator with no data.  Every operation fails with
    /// [`DataUndefined`](OperatorError::DataUndefined) until
    /// [`define`](SymMatrix::define) is called.
    pub fn undefined(n: usize, settings: FactorSettings) -> Self {
        Self {
            A: SparseMatrix::undefined(n, n),
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
    pub fn define(&mut self, A: SparseMatrix<'a, T>) -> Result<(), OperatorError> {
        if !A.is_defined() {
            return Err(OperatorError::DataUndefined);
        }
        if !A.is_square() {
            return Err(OperatorError::NotSquare);
        }
        if !A.kind().is_symmetric() {
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

    /// entries in the stored triangle
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

    /// Release the wrapped matrix, dropping any factorization
    pub fn into_matrix(self) -> SparseMatrix<'a, T> {
        self.A
    }

    /// Factor `A` for use by [`mult_inv_v`](SymMatrix::mult_inv_v).
    pub fn factor_a(&mut self) -> Result<(), OperatorError> {
        self.ensure_defined()?;
        self.solver = None;

        let mut solver = Factorization::from_settings(&self.settings, true);
        solver.factor(&self.A)?;
        debug!("factored A with {} back end", solver.name());
        self.solver = Some(solver);
        Ok(())
    }

    /// Form and factor `A − σI` for use by
    /// [`mult_inv_v`](SymMatrix::mult_inv_v).
    pub fn factor_asi(&mut self, sigma: T) -> Result<(), OperatorError> {
        self.ensure_defined()?;
        self.solver = None;

        let n = self.A.ncols();
        let mut AsI = match self.AsI.take() {
            Some(AsI) => AsI,
            None => SparseMatrix::spalloc(n, n, self.A.expanded_nnz(), StorageKind::General),
        };

        match self.shift_into(&mut AsI, sigma) {
            Ok(nnz) => debug!("A - sigma*I: n = {}, nnz = {}", n, nnz),
            Err(SparseMatrixError::Capacity(CapacityError::Insufficient { required, available })) => {
                warn!(
                    "A - sigma*I needs {} entries, {} available.  Reallocating",
                    required, available
                );
                AsI = SparseMatrix::spalloc(n, n, required, StorageKind::General);
                self.shift_into(&mut AsI, sigma)?;
            }
            Err(e) => return Err(e.into()),
        }

        let mut solver = Factorization::from_settings(&self.settings, true);
        let result = solver.factor(&AsI);
        self.AsI = Some(AsI);
        result?;

        debug!("factored A - sigma*I with {} back end", solver.name());
        self.solver = Some(solver);
        Ok(())
    }

    // expand A into AsI and subtract sigma from the diagonal
    fn shift_into(
        &self,
        AsI: &mut SparseMatrix<'_, T>,
        sigma: T,
    ) -> Result<usize, SparseMatrixError> {
        self.A.expand(AsI)?;
        AsI.add_diag(-sigma)
    }

    /// `w = A·v`
    pub fn mult_mv(&self, v: &[T], w: &mut [T]) -> Result<(), OperatorError> {
        self.ensure_defined()?;
        self.A.mult_mv_sym(v, w)?;
        Ok(())
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
