#![allow(non_snake_case)]
use super::{DirectSolver, FactorError, FactorSettings};
use crate::algebra::*;
use faer::{
    linalg::solvers::Solve,
    sparse::{
        linalg::{
            solvers::{Lu, SymbolicLu},
            LuError,
        },
        SparseColMatRef, SymbolicSparseColMatRef,
    },
    MatMut,
};
use log::{debug, info};
use num_complex::Complex;

/// Sparse LU factorization with partial pivoting, computed by `faer`.
///
/// Works for general real and complex matrices.  Matrices in triangular
/// storage are expanded to full storage before factoring, so symmetric and
/// Hermitian matrices are accepted as well.
///
/// `faer` does not report numerically zero pivots.  After each numeric
/// factorization a trial solve is made, and non-finite values in its result
/// are reported as [`Singular`](FactorError::Singular).

#[derive(Debug)]
pub struct SparseLuFactorization<T = f64>
where
    T: ScalarT,
{
    n: usize,
    symbolic: Option<SymbolicLu<usize>>,
    numeric: Option<Lu<usize, T>>,
    // full storage copy of triangular input
    full: Option<SparseMatrix<'static, T>>,
    // pattern of the matrix given to the symbolic phase
    src_colptr: Vec<usize>,
    src_rowval: Vec<usize>,
    verbose: bool,
}

impl<T> SparseLuFactorization<T>
where
    T: ScalarT,
{
    pub fn new(settings: &FactorSettings) -> Self {
        Self {
            n: 0,
            symbolic: None,
            numeric: None,
            full: None,
            src_colptr: Vec::new(),
            src_rowval: Vec::new(),
            verbose: settings.verbose,
        }
    }

    /// true if the factored matrix was expanded from triangular storage
    pub fn is_expanded(&self) -> bool {
        self.full.is_some()
    }
}

// the matrix actually handed to faer
fn full_storage<'b, T: ScalarT>(
    full: &'b Option<SparseMatrix<'static, T>>,
    A: &'b SparseMatrix<'_, T>,
) -> (&'b [usize], &'b [usize], &'b [T]) {
    match full {
        Some(F) => (F.colptr(), F.rowval(), F.nzval()),
        None => (A.colptr(), A.rowval(), A.nzval()),
    }
}

impl<T> DirectSolver<T> for SparseLuFactorization<T>
where
    T: ScalarT,
{
    fn factor_symbolic(&mut self, A: &SparseMatrix<'_, T>) -> Result<(), FactorError> {
        self.free();
        if !A.is_defined() {
            return Err(FactorError::IncompatibleDimension);
        }
        if !A.is_square() {
            return Err(FactorError::NotSquare);
        }
        let n = A.nrows();

        if A.kind().is_triangular() {
            let mut F = SparseMatrix::spalloc(n, n, A.expanded_nnz(), StorageKind::General);
            A.expand(&mut F)
                .map_err(|_| FactorError::IncompatibleDimension)?;
            self.full = Some(F);
        }

        let (colptr, rowval, _) = full_storage(&self.full, A);
        let pattern = SymbolicSparseColMatRef::new_checked(n, n, colptr, None, rowval);
        let symbolic = SymbolicLu::try_new(pattern).map_err(|_| FactorError::Ordering)?;

        debug!(
            "sparse lu symbolic: n = {}, nnz(A) = {}, expanded = {}",
            n,
            rowval.len(),
            self.full.is_some()
        );

        self.n = n;
        self.symbolic = Some(symbolic);
        self.src_colptr = A.colptr().to_vec();
        self.src_rowval = A.rowval().to_vec();
        Ok(())
    }

    fn factor_numeric(&mut self, A: &SparseMatrix<'_, T>) -> Result<(), FactorError> {
        self.numeric = None;
        let symbolic = self.symbolic.clone().ok_or(FactorError::NotFactored)?;

        if !A.is_defined()
            || A.size() != (self.n, self.n)
            || A.colptr() != self.src_colptr
            || A.rowval() != self.src_rowval
        {
            return Err(FactorError::IncompatibleDimension);
        }

        if let Some(F) = self.full.as_mut() {
            A.expand(F)
                .map_err(|_| FactorError::IncompatibleDimension)?;
        }

        let n = self.n;
        let (colptr, rowval, nzval) = full_storage(&self.full, A);
        let pattern = SymbolicSparseColMatRef::new_checked(n, n, colptr, None, rowval);
        let lu = T::lu_numeric(symbolic, SparseColMatRef::new(pattern, nzval)).map_err(
            |e| match e {
                LuError::SymbolicSingular { .. } => FactorError::Singular,
                e => FactorError::Backend(e.to_string()),
            },
        )?;

        let mut trial = vec![T::one(); n];
        T::lu_solve_in_place(&lu, &mut trial);
        if !trial.iter().all(|x| x.is_finite()) {
            return Err(FactorError::Singular);
        }

        if self.verbose {
            info!("sparse lu numeric: n = {}, nnz(A) = {}", n, nzval.len());
        } else {
            debug!("sparse lu numeric: n = {}, nnz(A) = {}", n, nzval.len());
        }
        self.numeric = Some(lu);
        Ok(())
    }

    fn solve(&mut self, x: &mut [T], b: &[T]) -> Result<(), FactorError> {
        let lu = self.numeric.as_ref().ok_or(FactorError::NotFactored)?;
        if x.len() != self.n || b.len() != self.n {
            return Err(FactorError::IncompatibleDimension);
        }
        x.copy_from_slice(b);
        T::lu_solve_in_place(lu, x);
        Ok(())
    }

    fn free(&mut self) {
        self.n = 0;
        self.symbolic = None;
        self.numeric = None;
        self.full = None;
        self.src_colptr = Vec::new();
        self.src_rowval = Vec::new();
    }

    fn is_factored(&self) -> bool {
        self.numeric.is_some()
    }
}

// ---------------------------------------------------------------------
// element types of the faer kernels
// ---------------------------------------------------------------------

/// Element types that can be factored by [`SparseLuFactorization`].
///
/// Implemented for `f32`, `f64` and their complex counterparts.  The faer
/// kernels are reached through these two functions only, so no faer trait
/// bounds appear on [`ScalarT`].
pub trait SparseLuT: Sized {
    #[doc(hidden)]
    fn lu_numeric(
        symbolic: SymbolicLu<usize>,
        A: SparseColMatRef<'_, usize, Self>,
    ) -> Result<Lu<usize, Self>, LuError>;

    #[doc(hidden)]
    fn lu_solve_in_place(lu: &Lu<usize, Self>, x: &mut [Self]);
}

/// Real types whose complex counterparts are also [`SparseLuT`].
pub trait SparseLuFloatT: SparseLuT {
    #[doc(hidden)]
    fn lu_numeric_complex(
        symbolic: SymbolicLu<usize>,
        A: SparseColMatRef<'_, usize, Complex<Self>>,
    ) -> Result<Lu<usize, Complex<Self>>, LuError>;

    #[doc(hidden)]
    fn lu_solve_in_place_complex(lu: &Lu<usize, Complex<Self>>, x: &mut [Complex<Self>]);
}

macro_rules! impl_sparse_lu {
    ($ty:ty) => {
        impl SparseLuT for $ty {
            fn lu_numeric(
                symbolic: SymbolicLu<usize>,
                A: SparseColMatRef<'_, usize, $ty>,
            ) -> Result<Lu<usize, $ty>, LuError> {
                Lu::try_new_with_symbolic(symbolic, A)
            }

            fn lu_solve_in_place(lu: &Lu<usize, $ty>, x: &mut [$ty]) {
                let n = x.len();
                lu.solve_in_place(MatMut::from_column_major_slice_mut(x, n, 1));
            }
        }

        impl SparseLuFloatT for $ty {
            fn lu_numeric_complex(
                symbolic: SymbolicLu<usize>,
                A: SparseColMatRef<'_, usize, Complex<$ty>>,
            ) -> Result<Lu<usize, Complex<$ty>>, LuError> {
                Lu::try_new_with_symbolic(symbolic, A)
            }

            fn lu_solve_in_place_complex(lu: &Lu<usize, Complex<$ty>>, x: &mut [Complex<$ty>]) {
                let n = x.len();
                lu.solve_in_place(MatMut::from_column_major_slice_mut(x, n, 1));
            }
        }
    };
}
impl_sparse_lu!(f32);
impl_sparse_lu!(f64);

impl<F: SparseLuFloatT> SparseLuT for Complex<F> {
    fn lu_numeric(
        symbolic: SymbolicLu<usize>,
        A: SparseColMatRef<'_, usize, Self>,
    ) -> Result<Lu<usize, Self>, LuError> {
        F::lu_numeric_complex(symbolic, A)
    }

    fn lu_solve_in_place(lu: &Lu<usize, Self>, x: &mut [Self]) {
        F::lu_solve_in_place_complex(lu, x)
    }
}
