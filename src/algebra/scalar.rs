use crate::algebra::FloatT;
use crate::factor::SparseLuT;
use num_complex::Complex;
use num_traits::{Float, NumAssign, Zero};
use std::fmt::{Debug, Display};
use std::ops::Neg;

/// Element type of a [`SparseMatrix`](crate::algebra::SparseMatrix).
///
/// Implemented for the real types `f32` and `f64` and for
/// [`Complex<f32>`](num_complex::Complex) and
/// [`Complex<f64>`](num_complex::Complex).  Every scalar has an associated
/// real type [`ScalarT::Real`] used for magnitudes, pivot tests and for the
/// real and imaginary parts of complex shifts.
pub trait ScalarT:
    'static
    + Copy
    + Send
    + Sync
    + Debug
    + Display
    + Default
    + PartialEq
    + NumAssign
    + Neg<Output = Self>
    + SparseLuT
{
    /// underlying real type
    type Real: FloatT;

    /// true for complex element types
    const IS_COMPLEX: bool;

    /// embed a real value
    fn from_real(re: Self::Real) -> Self;

    /// complex conjugate.  Identity for real types.
    fn conj(self) -> Self;

    /// absolute value (complex modulus)
    fn modulus(self) -> Self::Real;

    /// real part
    fn re(self) -> Self::Real;

    /// imaginary part.  Always zero for real types.
    fn im(self) -> Self::Real;

    /// true if neither part is infinite or NaN
    fn is_finite(self) -> bool {
        self.re().is_finite() && self.im().is_finite()
    }
}

macro_rules! impl_real_scalar {
    ($ty:ty) => {
        impl ScalarT for $ty {
            type Real = $ty;
            const IS_COMPLEX: bool = false;

            #[inline]
            fn from_real(re: $ty) -> Self {
                re
            }
            #[inline]
            fn conj(self) -> Self {
                self
            }
            #[inline]
            fn modulus(self) -> $ty {
                self.abs()
            }
            #[inline]
            fn re(self) -> $ty {
                self
            }
            #[inline]
            fn im(self) -> $ty {
                <$ty>::zero()
            }
        }
    };
}
impl_real_scalar!(f32);
impl_real_scalar!(f64);

impl<F: FloatT> ScalarT for Complex<F> {
    type Real = F;
    const IS_COMPLEX: bool = true;

    #[inline]
    fn from_real(re: F) -> Self {
        Complex::new(re, F::zero())
    }
    #[inline]
    fn conj(self) -> Self {
        Complex::conj(&self)
    }
    #[inline]
    fn modulus(self) -> F {
        self.norm()
    }
    #[inline]
    fn re(self) -> F {
        self.re
    }
    #[inline]
    fn im(self) -> F {
        self.im
    }
}

#[test]
fn test_scalar_conj() {
    assert_eq!(ScalarT::conj(3.0_f64), 3.0);
    let z = Complex::new(1.0_f64, -2.0);
    assert_eq!(ScalarT::conj(z), Complex::new(1.0, 2.0));
    assert_eq!(z.modulus(), 5.0_f64.sqrt());
    assert!(<Complex<f32> as ScalarT>::IS_COMPLEX);
    assert!(!<f32 as ScalarT>::IS_COMPLEX);
}

#[test]
fn test_scalar_is_finite() {
    assert!(ScalarT::is_finite(1.0_f64));
    assert!(!ScalarT::is_finite(f64::NAN));
    assert!(ScalarT::is_finite(Complex::new(1.0_f32, -1.0)));
    assert!(!ScalarT::is_finite(Complex::new(1.0_f64, f64::INFINITY)));
    assert!(!ScalarT::is_finite(Complex::new(f64::NEG_INFINITY, 0.0)));
}
