//! Direct factorizations of sparse matrices.
//!
//! The operator adapters in [`operators`](crate::operators) hand their
//! assembled matrices to a [`DirectSolver`].  Three back ends are provided:
//!
//! * [`LdlFactorization`] : AMD-ordered sparse $LDL^T$ factorization for real
//!   symmetric matrices.
//! * [`SparseLuFactorization`] : sparse LU factorization with partial
//!   pivoting from `faer`, for general real or complex matrices.
//! * [`DenseLuFactorization`] : dense LU factorization with threshold partial
//!   pivoting.  A reference implementation for small problems, used only
//!   when selected explicitly.
//!
//! The back end used by an adapter is selected through
//! [`FactorSettings`].

#![allow(non_snake_case)]

use crate::algebra::{ScalarT, SparseMatrix};
use enum_dispatch::*;
use thiserror::Error;

mod dense_lu;
mod faer_lu;
mod ldl;
mod settings;
pub use dense_lu::*;
pub use faer_lu::*;
pub use ldl::*;
pub use settings::*;

/// Error codes returnable from factorization operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FactorError {
    #[error("Matrix dimension fields are incompatible")]
    IncompatibleDimension,
    #[error("Matrix is not square")]
    NotSquare,
    #[error("Matrix has a zero column")]
    EmptyColumn,
    #[error("Matrix factorization produced a zero pivot")]
    Singular,
    #[error("Invalid permutation vector")]
    InvalidPermutation,
    #[error("Fill reducing ordering failed")]
    Ordering,
    #[error("Matrix has not been factored")]
    NotFactored,
    #[error("Operation not supported: {0}")]
    Unsupported(&'static str),
    #[error("Factorization back end failed: {0}")]
    Backend(String),
}

/// Interface implemented by all direct factorization back ends.
///
/// Factorization happens in two phases.  `factor_symbolic` analyses the
/// sparsity pattern and allocates, `factor_numeric` computes the factors
/// for the values currently in the matrix.  The numeric phase may be
/// repeated for new values on an unchanged pattern.
#[enum_dispatch]
pub trait DirectSolver<T: ScalarT> {
    fn factor_symbolic(&mut self, A: &SparseMatrix<'_, T>) -> Result<(), FactorError>;
    fn factor_numeric(&mut self, A: &SparseMatrix<'_, T>) -> Result<(), FactorError>;

    /// solve `A*x = b` with the current factors
    fn solve(&mut self, x: &mut [T], b: &[T]) -> Result<(), FactorError>;

    /// release the factors
    fn free(&mut self);

    fn is_factored(&self) -> bool;
}

/// Direct solver back ends
#[enum_dispatch(DirectSolver<T>)]
#[derive(Debug)]
pub enum Factorization<T>
where
    T: ScalarT,
{
    Ldl(LdlFactorization<T>),
    SparseLu(SparseLuFactorization<T>),
    DenseLu(DenseLuFactorization<T>),
}

impl<T> Factorization<T>
where
    T: ScalarT,
{
    /// Choose a back end for a matrix.  With `"auto"` real symmetric
    /// matrices are factored with [`LdlFactorization`] and everything else
    /// with [`SparseLuFactorization`].
    pub fn from_settings(settings: &FactorSettings, symmetric: bool) -> Self {
        let case = settings.direct_solve_method.as_str();
        match case {
            "ldl" => Factorization::Ldl(LdlFactorization::new(settings)),
            "lu" => Factorization::SparseLu(SparseLuFactorization::new(settings)),
            "dense" => Factorization::DenseLu(DenseLuFactorization::new(settings)),
            _ => {
                if symmetric && !T::IS_COMPLEX {
                    Factorization::Ldl(LdlFactorization::new(settings))
                } else {
                    Factorization::SparseLu(SparseLuFactorization::new(settings))
                }
            }
        }
    }

    /// Symbolic and numeric factorization of `A`.
    pub fn factor(&mut self, A: &SparseMatrix<'_, T>) -> Result<(), FactorError> {
        self.factor_symbolic(A)?;
        self.factor_numeric(A)
    }

    /// Name of the selected back end
    pub fn name(&self) -> &'static str {
        match self {
            Factorization::Ldl(_) => "ldl",
            Factorization::SparseLu(_) => "lu",
            Factorization::DenseLu(_) => "dense",
        }
    }
}

#[cfg(test)]
mod test;
