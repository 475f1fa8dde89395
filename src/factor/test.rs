use super::*;
use crate::algebra::StorageKind;
use num_complex::Complex64;
use num_traits::{Float, Zero};

fn general_3x3() -> SparseMatrix<'static, f64> {
    // A =
    //[  ⋅   2.0  1.0]
    //[ 1.0  1.0   ⋅ ]
    //[ 2.0   ⋅   3.0]
    SparseMatrix::new(
        3,
        3,
        vec![0, 2, 4, 6],
        vec![1, 2, 0, 1, 0, 2],
        vec![1., 2., 2., 1., 1., 3.],
        StorageKind::General,
    )
}

fn hermitian_2x2() -> SparseMatrix<'static, Complex64> {
    // A =
    //[ 2.0    1.0+1.0i]
    //[  ⋅     3.0     ]
    SparseMatrix::new(
        2,
        2,
        vec![0, 1, 3],
        vec![0, 0, 1],
        vec![
            Complex64::new(2., 0.),
            Complex64::new(1., 1.),
            Complex64::new(3., 0.),
        ],
        StorageKind::UpperTriangular,
    )
}

fn max_abs_diff<T: ScalarT>(a: &[T], b: &[T]) -> T::Real {
    std::iter::zip(a, b).fold(T::Real::zero(), |acc, (x, y)| {
        acc.max((*x - *y).modulus())
    })
}

#[test]
fn test_select_backend() {
    let settings = FactorSettings::default();
    assert_eq!(Factorization::<f64>::from_settings(&settings, true).name(), "ldl");
    assert_eq!(Factorization::<f64>::from_settings(&settings, false).name(), "lu");
    assert_eq!(
        Factorization::<Complex64>::from_settings(&settings, true).name(),
        "lu"
    );

    let settings = FactorSettingsBuilder::default()
        .direct_solve_method("lu")
        .build()
        .unwrap();
    assert_eq!(Factorization::<f64>::from_settings(&settings, true).name(), "lu");

    let settings = FactorSettingsBuilder::default()
        .direct_solve_method("dense")
        .build()
        .unwrap();
    assert_eq!(Factorization::<f64>::from_settings(&settings, false).name(), "dense");
    assert_eq!(
        Factorization::<Complex64>::from_settings(&settings, true).name(),
        "dense"
    );
}

#[test]
fn test_lu_general() {
    let A = general_3x3();
    let b = vec![7., 3., 11.];

    let mut lu = Factorization::from_settings(&FactorSettings::default(), false);
    assert!(matches!(lu, Factorization::SparseLu(_)));
    lu.factor(&A).unwrap();
    assert!(lu.is_factored());

    let mut x = vec![0.; 3];
    lu.solve(&mut x, &b).unwrap();
    assert!(max_abs_diff(&x, &[1., 2., 3.]) <= 1e-12);

    let settings = FactorSettingsBuilder::default()
        .direct_solve_method("dense")
        .build()
        .unwrap();
    let mut lu = Factorization::from_settings(&settings, false);
    lu.factor(&A).unwrap();

    let mut x = vec![0.; 3];
    lu.solve(&mut x, &b).unwrap();
    assert!(max_abs_diff(&x, &[1., 2., 3.]) <= 1e-12);

    // the zero diagonal must be pivoted away
    if let Factorization::DenseLu(inner) = &lu {
        assert!(inner.swaps() >= 1);
    } else {
        panic!("expected the dense LU back end");
    }
}

#[test]
fn test_sparse_lu_large_tridiagonal() {
    // nonsymmetric tridiagonal, too large for a dense n*n workspace to be
    // reasonable in a unit test
    let n = 20000;
    let mut colptr = vec![0];
    let mut rowval = Vec::new();
    let mut nzval = Vec::new();
    for j in 0..n {
        if j > 0 {
            rowval.push(j - 1);
            nzval.push(-1.);
        }
        rowval.push(j);
        nzval.push(4.);
        if j + 1 < n {
            rowval.push(j + 1);
            nzval.push(-2.);
        }
        colptr.push(rowval.len());
    }
    let A = SparseMatrix::new(n, n, colptr, rowval, nzval, StorageKind::General);

    let xtrue: Vec<f64> = (0..n).map(|i| ((i % 7) as f64) - 3.).collect();
    let mut b = vec![0.; n];
    A.mult_mv(&xtrue, &mut b).unwrap();

    let mut lu = SparseLuFactorization::<f64>::new(&FactorSettings::default());
    lu.factor_symbolic(&A).unwrap();
    lu.factor_numeric(&A).unwrap();
    assert!(!lu.is_expanded());

    let mut x = vec![0.; n];
    lu.solve(&mut x, &b).unwrap();
    assert!(max_abs_diff(&x, &xtrue) <= 1e-10);
}

#[test]
fn test_sparse_lu_refactor() {
    let mut A = general_3x3();
    let mut lu = SparseLuFactorization::<f64>::new(&FactorSettings::default());
    assert_eq!(lu.factor_numeric(&A), Err(FactorError::NotFactored));
    lu.factor_symbolic(&A).unwrap();
    lu.factor_numeric(&A).unwrap();

    // new values on the same pattern
    A.nzval_mut().iter_mut().for_each(|v| *v *= 2.);
    lu.factor_numeric(&A).unwrap();
    let mut x = vec![0.; 3];
    lu.solve(&mut x, &[14., 6., 22.]).unwrap();
    assert!(max_abs_diff(&x, &[1., 2., 3.]) <= 1e-12);

    // a different pattern needs a new symbolic phase
    let B = SparseMatrix::<f64>::identity(3);
    assert_eq!(lu.factor_numeric(&B), Err(FactorError::IncompatibleDimension));
    assert!(!lu.is_factored());

    let mut x = vec![0.; 2];
    assert_eq!(lu.solve(&mut x, &[1., 1.]), Err(FactorError::NotFactored));

    let A = SparseMatrix::<f64>::spalloc(2, 3, 0, StorageKind::General);
    assert_eq!(lu.factor_symbolic(&A), Err(FactorError::NotSquare));
}

#[test]
fn test_sparse_lu_triangular_storage() {
    let A = hermitian_2x2();
    let mut lu = SparseLuFactorization::<Complex64>::new(&FactorSettings::default());
    lu.factor_symbolic(&A).unwrap();
    lu.factor_numeric(&A).unwrap();
    assert!(lu.is_expanded());

    let b = vec![Complex64::new(1., 1.), Complex64::new(1., 2.)];
    let mut x = vec![Complex64::new(0., 0.); 2];
    lu.solve(&mut x, &b).unwrap();
    assert!(max_abs_diff(&x, &[Complex64::new(1., 0.), Complex64::new(0., 1.)]) <= 1e-12);
    assert!(x.iter().all(|v| v.is_finite()));

    lu.free();
    assert!(!lu.is_factored());
    assert!(!lu.is_expanded());
}

#[test]
fn test_lu_symmetric_storage() {
    // the LDL test matrix, solved by the LU back end
    let A = SparseMatrix::new(
        4,
        4,
        vec![0, 1, 3, 6, 8],
        vec![0, 0, 1, 0, 1, 2, 2, 3],
        vec![8., -3., 8., 2., -1., 8., -1., 1.],
        StorageKind::UpperTriangular,
    );
    let settings = FactorSettingsBuilder::default()
        .direct_solve_method("lu")
        .pivot_threshold(1.0)
        .build()
        .unwrap();
    let mut lu = Factorization::from_settings(&settings, true);
    lu.factor(&A).unwrap();

    let b = vec![20., -22., 32., -7.];
    let mut x = vec![0.; 4];
    lu.solve(&mut x, &b).unwrap();
    assert!(max_abs_diff(&x, &[1., -2., 3., -4.]) <= 1e-12);

    // and the same answer from LDL
    let mut ldl = Factorization::from_settings(&FactorSettings::default(), true);
    ldl.factor(&A).unwrap();
    let mut y = vec![0.; 4];
    ldl.solve(&mut y, &b).unwrap();
    assert!(max_abs_diff(&x, &y) <= 1e-12);
}

#[test]
fn test_lu_hermitian() {
    let A = hermitian_2x2();
    let mut lu = Factorization::from_settings(&FactorSettings::default(), true);
    assert_eq!(lu.name(), "lu");
    lu.factor(&A).unwrap();

    let b = vec![Complex64::new(1., 1.), Complex64::new(1., 2.)];
    let mut x = vec![Complex64::new(0., 0.); 2];
    lu.solve(&mut x, &b).unwrap();
    assert!(max_abs_diff(&x, &[Complex64::new(1., 0.), Complex64::new(0., 1.)]) <= 1e-12);
}

#[test]
fn test_lu_singular() {
    let A = SparseMatrix::new(
        2,
        2,
        vec![0, 2, 4],
        vec![0, 1, 0, 1],
        vec![1., 2., 2., 4.],
        StorageKind::General,
    );
    let mut lu = Factorization::from_settings(&FactorSettings::default(), false);
    assert_eq!(lu.factor(&A), Err(FactorError::Singular));
    assert!(!lu.is_factored());

    let mut x = vec![0.; 2];
    assert_eq!(lu.solve(&mut x, &[1., 1.]), Err(FactorError::NotFactored));
}

#[test]
fn test_lu_dimensions() {
    let mut lu = DenseLuFactorization::<f64>::new(&FactorSettings::default());

    let A = SparseMatrix::<f64>::spalloc(2, 3, 0, StorageKind::General);
    assert_eq!(lu.factor_symbolic(&A), Err(FactorError::NotSquare));

    let A = SparseMatrix::<f64>::undefined(2, 2);
    assert_eq!(lu.factor_symbolic(&A), Err(FactorError::IncompatibleDimension));

    let A = SparseMatrix::<f64>::identity(2);
    assert_eq!(lu.factor_numeric(&A), Err(FactorError::NotFactored));
    lu.factor_symbolic(&A).unwrap();
    lu.factor_numeric(&A).unwrap();

    let mut x = vec![0.; 3];
    assert_eq!(
        lu.solve(&mut x, &[1., 1., 1.]),
        Err(FactorError::IncompatibleDimension)
    );

    lu.free();
    assert!(!lu.is_factored());
}
