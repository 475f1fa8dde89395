//! __arsparse__ is a Rust implementation of the sparse matrix layer used to
//! build shift-and-invert operators for implicitly restarted Arnoldi
//! eigensolvers such as ARPACK.
//!
//! The Arnoldi iteration only ever asks its operator for products
//! $w = \mathrm{OP}\,v$.  For the spectral transformation
//!
//! $$
//! \mathrm{OP} = (A - \sigma B)^{-1} B
//! $$
//!
//! the operator must be able to assemble $A - \sigma I$ or $A - \sigma B$ from
//! matrices supplied in compressed sparse column (CSC) format, possibly with
//! only one triangle of a symmetric matrix stored, and hand the result to a
//! direct factorization.  This crate provides exactly that:
//!
//! * [`SparseMatrix`](crate::algebra::SparseMatrix) : CSC storage over real or
//!   complex scalars, either owning its arrays or borrowing them from the caller.
//! * triangular-to-full expansion, diagonal shifting with in-place pattern
//!   growth, and the two-phase sized sparse addition `C = A + sB`.
//! * a [`DirectSolver`](crate::factor::DirectSolver) seam with an AMD-ordered
//!   $LDL^T$ back end, a sparse LU back end from `faer` and a reference
//!   dense LU back end.
//! * the matrix and pencil adapters in [`operators`](crate::operators) that an
//!   eigensolver driver calls for `A*v`, `inv(A - sI)*v` and `inv(A - sB)*v`.
//!
//! ```
//! use arsparse::algebra::{SparseMatrix, StorageKind};
//!
//! // A = 2I stored in CSC form, B = I
//! let A = SparseMatrix::new(3, 3, vec![0, 1, 2, 3], vec![0, 1, 2], vec![2., 2., 2.], StorageKind::General);
//! let B = SparseMatrix::<f64>::identity(3);
//!
//! // size C = A - B exactly, then fill it
//! let nnz = A.sum_nnz(&B).unwrap();
//! let mut C = SparseMatrix::spalloc(3, 3, nnz, StorageKind::General);
//! A.add(-1.0, &B, &mut C).unwrap();
//!
//! assert_eq!(C.nzval(), &[1., 1., 1.]);
//! ```
//!
//! # License
//!
//! Licensed under Apache License, Version 2.0.

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version of the crate, as reported by Cargo.
pub fn version() -> &'static str {
    VERSION
}

pub mod algebra;
pub mod factor;
pub mod operators;
