//! Operator adapters for shift-and-invert eigenvalue computations.
//!
//! An Arnoldi or Lanczos iteration only needs to apply an operator to a
//! vector.  The types here wrap one or two [`SparseMatrix`](crate::algebra::SparseMatrix)
//! values and provide the products an eigensolver asks for:
//!
//! * [`SymMatrix`] and [`NonSymMatrix`] : standard problems `A·x = λ·x`,
//!   with `A − σI` factored for shift-and-invert mode.
//! * [`SymPencil`] and [`NonSymPencil`] : generalized problems
//!   `A·x = λ·B·x`, with `A − σB` factored for shift-and-invert mode.
//!
//! Factorizations are delegated to a [`Factorization`](crate::factor::Factorization)
//! chosen from the [`FactorSettings`](crate::factor::FactorSettings) given at
//! construction.

use crate::algebra::SparseMatrixError;
use crate::factor::FactorError;
use thiserror::Error;

mod nonsymmatrix;
mod nonsympencil;
mod symmatrix;
mod sympencil;
pub use nonsymmatrix::*;
pub use nonsympencil::*;
pub use symmatrix::*;
pub use sympencil::*;

/// Error codes returnable from the operator adapters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OperatorError {
    #[error("Matrix data has not been defined")]
    DataUndefined,
    #[error("Operator has not been factored")]
    NotFactored,
    #[error("Matrix data failed the structural check")]
    InconsistentData,
    #[error("Matrix dimensions are incompatible")]
    IncompatibleSizes,
    #[error("Matrix is not square")]
    NotSquare,
    #[error(transparent)]
    Matrix(#[from] SparseMatrixError),
    #[error(transparent)]
    Factor(#[from] FactorError),
}

/// Part of a complex solution returned to a real-valued eigensolver
/// after a complex shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShiftPart {
    #[default]
    Real,
    Imag,
}
