#![allow(non_snake_case)]

use super::{OperatorError, SymMatrix};
use crate::algebra::*;
use log::debug;

/// Generalized problem `A·x = λ·B·x` with symmetric (Hermitian) `A` and
/// `B` held in triangular storage.
///
/// On the first call to [`factor_asb`](SymPencil::factor_asb) both
/// triangles are expanded to full storage and the pattern of their sum is
/// sized with [`prepare_add`](SparseMatrix::prepare_add).  Later shifts
/// reuse all three matrices and only redo the sum and the factorization.

#[derive(Debug)]
pub struct SymPencil<'a, T = f64>
where
    T: ScalarT,
{
    A: SymMatrix<'a, T>,
    B: SymMatrix<'a, T>,
    // full storage copies of A and B
    Afull: Option<SparseMatrix<'static, T>>,
    Bfull: Option<SparseMatrix<'static, T>>,
    AsB: Option<SymMatrix<'static, T>>,
}

impl<'a, T> SymPencil<'a, T>
where
    T: ScalarT,
{
    /// Pair `A` and `B`.  Both must have the same dimensions.
    pub fn new(A: SymMatrix<'a, T>, B: SymMatrix<'a, T>) -> Result<Self, OperatorError> {
        if A.nrows() != B.nrows() || A.ncols() != B.ncols() {
            return Err(OperatorError::IncompatibleSizes);
        }
        Ok(Self {
            A,
            B,
            Afull: None,
            Bfull: None,
            AsB: None,
        })
    }

    pub fn a(&self) -> &SymMatrix<'a, T> {
        &self.A
    }

    pub fn b(&self) -> &SymMatrix<'a, T> {
        &self.B
    }

    pub fn into_parts(self) -> (SymMatrix<'a, T>, SymMatrix<'a, T>) {
        (self.A, self.B)
    }

    pub fn is_factored(&self) -> bool {
        self.AsB.as_ref().is_some_and(|m| m.is_factored())
    }

    /// Form and factor `A − σB`.
    pub fn factor_asb(&mut self, sigma: T) -> Result<(), OperatorError> {
        if !(self.A.is_defined() && self.B.is_defined()) {
            return Err(OperatorError::DataUndefined);
        }

        let (Afull, Bfull, mut AsB) = match (self.Afull.take(), self.Bfull.take(), self.AsB.take()) {
            (Some(Afull), Some(Bfull), Some(AsB)) => (Afull, Bfull, AsB),
            _ => {
                let Afull = expand_full(self.A.matrix())?;
                let Bfull = expand_full(self.B.matrix())?;

                let n = Afull.ncols();
                let mut count = vec![0; n];
                let mut work = vec![0; n];
                let nnz = Afull.prepare_add(&Bfull, &mut count, &mut work)?;
                debug!("A - sigma*B: n = {}, nnz = {}", n, nnz);

                let S = SparseMatrix::spalloc(n, n, nnz, StorageKind::ExpandedSymmetric);
                let AsB = SymMatrix::unchecked(S, self.A.settings().clone());
                (Afull, Bfull, AsB)
            }
        };

        let result = Afull
            .add(-sigma, &Bfull, AsB.matrix_mut())
            .map_err(OperatorError::from)
            .and_then(|_| AsB.factor_a());

        self.Afull = Some(Afull);
        self.Bfull = Some(Bfull);
        self.AsB = Some(AsB);
        result
    }

    /// `w = A·v`
    pub fn mult_av(&self, v: &[T], w: &mut [T]) -> Result<(), OperatorError> {
        self.A.mult_mv(v, w)
    }

    /// `w = B·v`
    pub fn mult_bv(&self, v: &[T], w: &mut [T]) -> Result<(), OperatorError> {
        self.B.mult_mv(v, w)
    }

    /// `w = B⁻¹A·v`.  `B` is factored on first use.
    pub fn mult_inv_bav(&mut self, v: &[T], w: &mut [T]) -> Result<(), OperatorError> {
        if !self.B.is_factored() {
            self.B.factor_a()?;
        }
        let mut t = vec![T::zero(); w.len()];
        self.A.mult_mv(v, &mut t)?;
        self.B.mult_inv_v(&t, w)
    }

    /// `w = (A − σB)⁻¹·v`
    pub fn mult_inv_asbv(&mut self, v: &[T], w: &mut [T]) -> Result<(), OperatorError> {
        let AsB = self.AsB.as_mut().ok_or(OperatorError::NotFactored)?;
        AsB.mult_inv_v(v, w)
    }
}

fn expand_full<T: ScalarT>(M: &SparseMatrix<'_, T>) -> Result<SparseMatrix<'static, T>, OperatorError> {
    let n = M.ncols();
    let mut F = SparseMatrix::spalloc(n, n, M.expanded_nnz(), StorageKind::General);
    M.expand(&mut F)?;
    Ok(F)
}
