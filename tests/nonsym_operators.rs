#![allow(non_snake_case)]

use arsparse::{algebra::*, factor::*, operators::*};
use std::iter::zip;

fn rect_3x2() -> SparseMatrix<'static, f64> {
    // A =
    //[ 1.0  2.0]
    //[  ⋅   3.0]
    //[ 4.0   ⋅ ]
    SparseMatrix::new(
        3,
        2,
        vec![0, 2, 4],
        vec![0, 2, 0, 1],
        vec![1., 4., 2., 3.],
        StorageKind::General,
    )
}

fn square_3x3() -> SparseMatrix<'static, f64> {
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

// max |(A - sigma*I)w - v|
fn shifted_residual(op: &NonSymMatrix<f64>, sigma: f64, w: &[f64], v: &[f64]) -> f64 {
    let mut Aw = vec![0.; w.len()];
    op.mult_mv(w, &mut Aw).unwrap();
    zip(zip(&Aw, w), v).fold(0., |acc, ((Aw, w), v)| {
        f64::max(acc, (Aw - sigma * w - v).abs())
    })
}

#[test]
fn test_rectangular_products() {
    let op = NonSymMatrix::new(rect_3x2(), FactorSettings::default()).unwrap();
    assert_eq!((op.nrows(), op.ncols(), op.nnz()), (3, 2, 4));

    let mut w3 = vec![0.; 3];
    let mut w2 = vec![0.; 2];

    op.mult_mv(&[1., 1.], &mut w3).unwrap();
    assert_eq!(w3, vec![3., 3., 4.]);

    op.mult_mtv(&[1., 1., 1.], &mut w2).unwrap();
    assert_eq!(w2, vec![5., 5.]);

    op.mult_mtmv(&[1., 1.], &mut w2).unwrap();
    assert_eq!(w2, vec![19., 15.]);

    op.mult_mmtv(&[1., 1., 1.], &mut w3).unwrap();
    assert_eq!(w3, vec![15., 15., 20.]);

    let mut w5 = vec![0.; 5];
    op.mult_0mmt0v(&[1., 1., 1., 1., 1.], &mut w5).unwrap();
    assert_eq!(w5, vec![3., 3., 4., 5., 5.]);
}

#[test]
fn test_rectangular_factor() {
    let mut op = NonSymMatrix::new(rect_3x2(), FactorSettings::default()).unwrap();
    assert_eq!(op.factor_a(), Err(OperatorError::NotSquare));
    assert_eq!(op.factor_asi(1.0), Err(OperatorError::NotSquare));
}

#[test]
fn test_nonsym_factor_a() {
    let mut op = NonSymMatrix::new(square_3x3(), FactorSettings::default()).unwrap();
    op.factor_a().unwrap();
    assert!(op.is_factored());

    let v = vec![7., 3., 11.];
    let mut w = vec![0.; 3];
    op.mult_inv_v(&v, &mut w).unwrap();
    assert!(shifted_residual(&op, 0., &w, &v) <= 1e-12);
    assert!((w[0] - 1.).abs() <= 1e-12);
    assert!((w[1] - 2.).abs() <= 1e-12);
    assert!((w[2] - 3.).abs() <= 1e-12);
}

#[test]
fn test_nonsym_factor_asi() {
    // the (0,0) entry is missing, so the shifted copy grows by one
    let mut op = NonSymMatrix::new(square_3x3(), FactorSettings::default()).unwrap();
    let v = vec![1., 0., -1.];
    let mut w = vec![0.; 3];

    for sigma in [-1.0, 0.5, 2.0] {
        op.factor_asi(sigma).unwrap();
        op.mult_inv_v(&v, &mut w).unwrap();
        assert!(shifted_residual(&op, sigma, &w, &v) <= 1e-10);
    }

    // A itself keeps its pattern
    assert_eq!(op.nnz(), 6);
    assert_eq!(op.matrix().get_entry((0, 0)), None);
}

#[test]
fn test_nonsym_errors() {
    let mut op = NonSymMatrix::<f64>::undefined(3, 3, FactorSettings::default());
    assert!(!op.is_defined());
    assert_eq!(op.factor_a(), Err(OperatorError::DataUndefined));

    let mut w = vec![0.; 3];
    assert_eq!(op.mult_mv(&[0.; 3], &mut w), Err(OperatorError::DataUndefined));
    assert_eq!(op.mult_inv_v(&[0.; 3], &mut w), Err(OperatorError::NotFactored));

    op.define(square_3x3()).unwrap();
    assert!(op.is_defined());
    assert!(!op.is_factored());

    // row index out of range
    let A = SparseMatrix::new(2, 2, vec![0, 1, 2], vec![0, 5], vec![1., 1.], StorageKind::General);
    assert_eq!(
        op.define(A).unwrap_err(),
        OperatorError::InconsistentData
    );
}

#[test]
fn test_nonsym_rejects_triangular_storage() {
    // lower triangle of [2 1; 1 2], or the full matrix [2 0; 1 2]
    let tril = || {
        SparseMatrix::new(
            2,
            2,
            vec![0, 2, 3],
            vec![0, 1, 1],
            vec![2., 1., 2.],
            StorageKind::LowerTriangular,
        )
    };
    assert_eq!(
        NonSymMatrix::new(tril(), FactorSettings::default()).unwrap_err(),
        OperatorError::InconsistentData
    );

    let mut op = NonSymMatrix::<f64>::undefined(2, 2, FactorSettings::default());
    assert_eq!(op.define(tril()).unwrap_err(), OperatorError::InconsistentData);
    assert!(!op.is_defined());

    // the same arrays as a general matrix multiply and solve consistently
    let A = SparseMatrix::new(
        2,
        2,
        vec![0, 2, 3],
        vec![0, 1, 1],
        vec![2., 1., 2.],
        StorageKind::General,
    );
    let mut op = NonSymMatrix::new(A, FactorSettings::default()).unwrap();
    op.factor_a().unwrap();

    let mut Av = vec![0.; 2];
    op.mult_mv(&[0., 1.], &mut Av).unwrap();
    assert_eq!(Av, vec![0., 2.]);

    let mut w: Vec<f64> = vec![0.; 2];
    op.mult_inv_v(&Av, &mut w).unwrap();
    assert!(w[0].abs() <= 1e-12);
    assert!((w[1] - 1.).abs() <= 1e-12);
}
