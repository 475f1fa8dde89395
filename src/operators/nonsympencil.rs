#![allow(non_snake_case)]

use super::{NonSymMatrix, OperatorError, ShiftPart};
use crate::algebra::*;
use log::debug;
use num_complex::Complex;
use num_traits::Zero;
use std::iter::zip;

/// Generalized problem `A·x = λ·B·x` with general square matrices.
///
/// The sum `A − σB` is held in a matrix sized once with
/// [`prepare_add`](SparseMatrix::prepare_add) and refilled on every new
/// shift.  For real pencils a complex shift can be applied with
/// [`factor_asb_complex`](NonSymPencil::factor_asb_complex), after which
/// [`mult_inv_asbv`](NonSymPencil::mult_inv_asbv) returns the selected
/// [`ShiftPart`] of the complex solution.

#[derive(Debug)]
pub struct NonSymPencil<'a, T = f64>
where
    T: ScalarT,
{
    A: NonSymMatrix<'a, T>,
    B: NonSymMatrix<'a, T>,
    AsB: Option<NonSymMatrix<'static, T>>,
    AsBc: Option<NonSymMatrix<'static, Complex<T::Real>>>,
    // None while the last shift was real
    part: Option<ShiftPart>,
}

impl<'a, T> NonSymPencil<'a, T>
where
    T: ScalarT,
{
    /// Pair `A` and `B`.  Both must have the same dimensions.
    pub fn new(A: NonSymMatrix<'a, T>, B: NonSymMatrix<'a, T>) -> Result<Self, OperatorError> {
        if A.nrows() != B.nrows() || A.ncols() != B.ncols() {
            return Err(OperatorError::IncompatibleSizes);
        }
        Ok(Self {
            A,
            B,
            AsB: None,
            AsBc: None,
            part: None,
        })
    }

    pub fn a(&self) -> &NonSymMatrix<'a, T> {
        &self.A
    }

    pub fn b(&self) -> &NonSymMatrix<'a, T> {
        &self.B
    }

    pub fn into_parts(self) -> (NonSymMatrix<'a, T>, NonSymMatrix<'a, T>) {
        (self.A, self.B)
    }

    pub fn is_factored(&self) -> bool {
        match self.part {
            None => self.AsB.as_ref().is_some_and(|m| m.is_factored()),
            Some(_) => self.AsBc.as_ref().is_some_and(|m| m.is_factored()),
        }
    }

    /// Form and factor `A − σB`.
    pub fn factor_asb(&mut self, sigma: T) -> Result<(), OperatorError> {
        self.check_square()?;

        let mut AsB = match self.AsB.take() {
            Some(AsB) => AsB,
            None => NonSymMatrix::unchecked(self.alloc_sum()?, self.A.settings().clone()),
        };

        self.A
            .matrix()
            .add(-sigma, self.B.matrix(), AsB.matrix_mut())?;
        self.part = None;

        let result = AsB.factor_a();
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

    /// `w = (A − σB)⁻¹·v`.
    ///
    /// After a complex shift only the part of the complex solution selected
    /// in [`factor_asb_complex`](NonSymPencil::factor_asb_complex) is
    /// returned.
    pub fn mult_inv_asbv(&mut self, v: &[T], w: &mut [T]) -> Result<(), OperatorError> {
        let part = match self.part {
            None => {
                let AsB = self.AsB.as_mut().ok_or(OperatorError::NotFactored)?;
                return AsB.mult_inv_v(v, w);
            }
            Some(part) => part,
        };

        let AsBc = self.AsBc.as_mut().ok_or(OperatorError::NotFactored)?;
        let zero = T::Real::zero();
        let tv: Vec<_> = v.iter().map(|x| Complex::new(x.re(), zero)).collect();
        let mut tw = vec![Complex::new(zero, zero); tv.len()];
        AsBc.mult_inv_v(&tv, &mut tw)?;

        for (w, tw) in zip(w, &tw) {
            *w = match part {
                ShiftPart::Real => T::from_real(tw.re),
                ShiftPart::Imag => T::from_real(tw.im),
            };
        }
        Ok(())
    }

    /// `w = (A − σB)⁻¹·v` with the complex factorization from
    /// [`factor_asb_complex`](NonSymPencil::factor_asb_complex).  Fails
    /// with [`NotFactored`](OperatorError::NotFactored) once a real shift
    /// has been factored since.
    pub fn mult_inv_asbv_complex(
        &mut self,
        v: &[Complex<T::Real>],
        w: &mut [Complex<T::Real>],
    ) -> Result<(), OperatorError> {
        if self.part.is_none() {
            return Err(OperatorError::NotFactored);
        }
        let AsBc = self.AsBc.as_mut().ok_or(OperatorError::NotFactored)?;
        AsBc.mult_inv_v(v, w)
    }

    fn check_square(&self) -> Result<(), OperatorError> {
        if !(self.A.is_defined() && self.B.is_defined()) {
            return Err(OperatorError::DataUndefined);
        }
        if self.A.nrows() != self.A.ncols() || self.B.nrows() != self.B.ncols() {
            return Err(OperatorError::NotSquare);
        }
        Ok(())
    }

    // storage for A + B with the exact pattern of the sum
    fn alloc_sum<S: ScalarT>(&self) -> Result<SparseMatrix<'static, S>, OperatorError> {
        let (m, n) = (self.A.nrows(), self.A.ncols());
        let mut count = vec![0; n];
        let mut work = vec![0; m];
        let nnz = self
            .A
            .matrix()
            .prepare_add(self.B.matrix(), &mut count, &mut work)?;
        debug!("A - sigma*B: n = {}, nnz = {}", n, nnz);
        Ok(SparseMatrix::spalloc(m, n, nnz, StorageKind::General))
    }
}

impl<'a, F> NonSymPencil<'a, F>
where
    F: FloatT + ScalarT<Real = F>,
{
    /// Form and factor `A − (σr + i·σi)·B` for a real pencil.  `part`
    /// selects what [`mult_inv_asbv`](NonSymPencil::mult_inv_asbv)
    /// returns until the next factorization.
    pub fn factor_asb_complex(
        &mut self,
        sigma_r: F,
        sigma_i: F,
        part: ShiftPart,
    ) -> Result<(), OperatorError> {
        self.check_square()?;

        let mut AsBc = match self.AsBc.take() {
            Some(AsBc) => AsBc,
            None => NonSymMatrix::unchecked(self.alloc_sum()?, self.A.settings().clone()),
        };

        self.A
            .matrix()
            .add_complex(-sigma_r, -sigma_i, self.B.matrix(), AsBc.matrix_mut())?;
        self.part = Some(part);

        let result = AsBc.factor_a();
        self.AsBc = Some(AsBc);
        result
    }
}
