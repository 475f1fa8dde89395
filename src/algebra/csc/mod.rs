#![allow(non_snake_case)]

mod buffer;
pub use buffer::*;
mod core;
pub use self::core::*;
mod diag;
pub use diag::*;
mod expand;
mod add;
mod matrix_math;
mod triangle;
