//! Sparse matrix types and the scalar traits they are built on.
//!
//! All matrices in this crate are held in standard compressed sparse column
//! (CSC) format by [`SparseMatrix`].  Element types implement [`ScalarT`],
//! which covers the native `f32`/`f64` floats and their
//! [`Complex`](num_complex::Complex) counterparts.

mod error_types;
pub use error_types::*;
mod floats;
pub use floats::*;
mod scalar;
pub use scalar::*;
mod matrix_types;
pub use matrix_types::*;
mod csc;
pub use csc::*;
