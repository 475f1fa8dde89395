#![allow(non_snake_case)]
use num_traits::{Float, FloatConst, FromPrimitive, NumAssign};
use std::fmt::{Debug, Display, LowerExp};

use crate::factor::SparseLuFloatT;

/// Core traits for internal floating point values.
///
/// This trait defines the bounds for the real floating point types used
/// throughout the crate, either as matrix elements directly or as the real
/// and imaginary parts of complex matrix elements.
pub trait CoreFloatT:
    'static
    + Send
    + Sync
    + Float
    + FloatConst
    + NumAssign
    + Default
    + FromPrimitive
    + Display
    + LowerExp
    + Debug
    + std::iter::Sum
    + Sized
{
}

impl<T> CoreFloatT for T where
    T: 'static
        + Send
        + Sync
        + Float
        + FloatConst
        + NumAssign
        + Default
        + FromPrimitive
        + Display
        + LowerExp
        + Debug
        + std::iter::Sum
        + Sized
{
}

/// Main trait for real floating point types.
///
/// `FloatT` combines the [`num_traits`](num_traits) bounds of [`CoreFloatT`]
/// with [`SparseLuFloatT`], which restricts it to the `f32` and `f64` types
/// supported by the faer sparse LU kernels.
pub trait FloatT: CoreFloatT + SparseLuFloatT {}

impl<T> FloatT for T where T: CoreFloatT + SparseLuFloatT {}

/// Trait for converting Rust primitives to [`FloatT`](crate::algebra::FloatT)
///
/// This convenience trait is implemented on f32/64 and u32/64, and is used
/// internally for converting constant primitives and
/// [settings](crate::factor::FactorSettings) fields to the working float type.

// NB: `AsFloatT` is a convenience trait for f32/64 and u32/64
// so that we can do things like (2.0).as_T() everywhere on
// constants, rather than the awful T::from_f32(2.0).unwrap()
pub trait AsFloatT<T>: 'static {
    fn as_T(&self) -> T;
}

macro_rules! impl_as_FloatT {
    ($ty:ty, $ident:ident) => {
        impl<T> AsFloatT<T> for $ty
        where
            T: std::ops::Mul<T, Output = T> + FromPrimitive + 'static,
        {
            #[inline]
            fn as_T(&self) -> T {
                T::$ident(*self).unwrap()
            }
        }
    };
}
impl_as_FloatT!(u32, from_u32);
impl_as_FloatT!(u64, from_u64);
impl_as_FloatT!(usize, from_usize);
impl_as_FloatT!(f32, from_f32);
impl_as_FloatT!(f64, from_f64);
