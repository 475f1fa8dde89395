#![allow(non_snake_case)]

use arsparse::{algebra::*, factor::*, operators::*};
use num_complex::Complex64;
use std::iter::zip;

// upper triangle of tridiag(-1, 2, -1)
fn stiffness_triu(n: usize) -> SparseMatrix<'static, f64> {
    let mut colptr = vec![0];
    let (mut rowval, mut nzval) = (vec![], vec![]);
    for col in 0..n {
        if col > 0 {
            rowval.push(col - 1);
            nzval.push(-1.);
        }
        rowval.push(col);
        nzval.push(2.);
        colptr.push(rowval.len());
    }
    SparseMatrix::new(n, n, colptr, rowval, nzval, StorageKind::UpperTriangular)
}

// lower triangle of tridiag(1, 4, 1)
fn mass_tril(n: usize) -> SparseMatrix<'static, f64> {
    let mut colptr = vec![0];
    let (mut rowval, mut nzval) = (vec![], vec![]);
    for col in 0..n {
        rowval.push(col);
        nzval.push(4.);
        if col + 1 < n {
            rowval.push(col + 1);
            nzval.push(1.);
        }
        colptr.push(rowval.len());
    }
    SparseMatrix::new(n, n, colptr, rowval, nzval, StorageKind::LowerTriangular)
}

fn general_a() -> SparseMatrix<'static, f64> {
    // A =
    //[ 1.0  2.0   ⋅ ]
    //[  ⋅   3.0  1.0]
    //[ 1.0   ⋅   2.0]
    SparseMatrix::new(
        3,
        3,
        vec![0, 2, 4, 6],
        vec![0, 2, 0, 1, 1, 2],
        vec![1., 1., 2., 3., 1., 2.],
        StorageKind::General,
    )
}

fn general_b() -> SparseMatrix<'static, f64> {
    // B =
    //[ 2.0   ⋅    ⋅ ]
    //[ 1.0  2.0   ⋅ ]
    //[  ⋅    ⋅   2.0]
    SparseMatrix::new(
        3,
        3,
        vec![0, 2, 3, 4],
        vec![0, 1, 1, 2],
        vec![2., 1., 2., 2.],
        StorageKind::General,
    )
}

fn dense_mv(M: &SparseMatrix<f64>, v: &[Complex64]) -> Vec<Complex64> {
    M.to_dense()
        .iter()
        .map(|row| zip(row, v).map(|(a, x)| *x * *a).sum())
        .collect()
}

#[test]
fn test_sym_pencil() {
    let n = 5;
    let A = SymMatrix::new(stiffness_triu(n), FactorSettings::default()).unwrap();
    let B = SymMatrix::new(mass_tril(n), FactorSettings::default()).unwrap();
    let mut pencil = SymPencil::new(A, B).unwrap();
    assert!(!pencil.is_factored());

    let v = vec![1., 2., -1., 0., 3.];
    let mut w = vec![0.; n];
    let (mut Aw, mut Bw) = (vec![0.; n], vec![0.; n]);

    for sigma in [0.1, -0.5, 0.25] {
        pencil.factor_asb(sigma).unwrap();
        assert!(pencil.is_factored());
        pencil.mult_inv_asbv(&v, &mut w).unwrap();

        // (A - sigma*B)w = v
        pencil.mult_av(&w, &mut Aw).unwrap();
        pencil.mult_bv(&w, &mut Bw).unwrap();
        for ((a, b), v) in zip(zip(&Aw, &Bw), &v) {
            assert!((a - sigma * b - v).abs() <= 1e-10);
        }
    }

    // zero shift factors A alone
    pencil.factor_asb(0.0).unwrap();
    pencil.mult_inv_asbv(&v, &mut w).unwrap();
    pencil.mult_av(&w, &mut Aw).unwrap();
    for (a, v) in zip(&Aw, &v) {
        assert!((a - v).abs() <= 1e-10);
    }
}

#[test]
fn test_sym_pencil_inv_bav() {
    let n = 4;
    let A = SymMatrix::new(stiffness_triu(n), FactorSettings::default()).unwrap();
    let B = SymMatrix::new(mass_tril(n), FactorSettings::default()).unwrap();
    let mut pencil = SymPencil::new(A, B).unwrap();

    let v = vec![1., 2., 3., 4.];
    let mut w = vec![0.; n];
    pencil.mult_inv_bav(&v, &mut w).unwrap();
    assert!(pencil.b().is_factored());

    // B*w = A*v
    let (mut Av, mut Bw) = (vec![0.; n], vec![0.; n]);
    pencil.mult_av(&v, &mut Av).unwrap();
    pencil.mult_bv(&w, &mut Bw).unwrap();
    for (a, b) in zip(&Av, &Bw) {
        assert!((a - b).abs() <= 1e-12);
    }
}

#[test]
fn test_nonsym_pencil_real_shift() {
    let A = NonSymMatrix::new(general_a(), FactorSettings::default()).unwrap();
    let B = NonSymMatrix::new(general_b(), FactorSettings::default()).unwrap();
    let mut pencil = NonSymPencil::new(A, B).unwrap();

    let v = vec![1., -1., 2.];
    let mut w = vec![0.; 3];
    assert_eq!(
        pencil.mult_inv_asbv(&v, &mut w),
        Err(OperatorError::NotFactored)
    );

    let sigma = 0.75;
    pencil.factor_asb(sigma).unwrap();
    assert!(pencil.is_factored());
    pencil.mult_inv_asbv(&v, &mut w).unwrap();

    let (mut Aw, mut Bw) = (vec![0.; 3], vec![0.; 3]);
    pencil.mult_av(&w, &mut Aw).unwrap();
    pencil.mult_bv(&w, &mut Bw).unwrap();
    for ((a, b), v) in zip(zip(&Aw, &Bw), &v) {
        assert!((a - sigma * b - v).abs() <= 1e-12);
    }

    // B^{-1}A v
    pencil.mult_inv_bav(&v, &mut w).unwrap();
    let mut Av = vec![0.; 3];
    pencil.mult_av(&v, &mut Av).unwrap();
    pencil.mult_bv(&w, &mut Bw).unwrap();
    for (a, b) in zip(&Av, &Bw) {
        assert!((a - b).abs() <= 1e-12);
    }
}

#[test]
fn test_nonsym_pencil_complex_shift() {
    let A = NonSymMatrix::new(general_a(), FactorSettings::default()).unwrap();
    let B = NonSymMatrix::new(general_b(), FactorSettings::default()).unwrap();
    let mut pencil = NonSymPencil::new(A, B).unwrap();

    let sigma = Complex64::new(0.5, 1.0);
    pencil
        .factor_asb_complex(sigma.re, sigma.im, ShiftPart::Real)
        .unwrap();
    assert!(pencil.is_factored());

    let v = vec![1., -1., 2.];
    let vc: Vec<_> = v.iter().map(|&x| Complex64::new(x, 0.)).collect();
    let mut wc = vec![Complex64::new(0., 0.); 3];
    pencil.mult_inv_asbv_complex(&vc, &mut wc).unwrap();

    // (A - sigma*B)w = v in complex arithmetic
    let Aw = dense_mv(pencil.a().matrix(), &wc);
    let Bw = dense_mv(pencil.b().matrix(), &wc);
    for ((a, b), v) in zip(zip(&Aw, &Bw), &vc) {
        assert!((a - sigma * b - v).norm() <= 1e-12);
    }

    // the real solve returns the selected part
    let mut w = vec![0.; 3];
    pencil.mult_inv_asbv(&v, &mut w).unwrap();
    for (w, wc) in zip(&w, &wc) {
        assert!((w - wc.re).abs() <= 1e-12);
    }

    pencil
        .factor_asb_complex(sigma.re, sigma.im, ShiftPart::Imag)
        .unwrap();
    pencil.mult_inv_asbv(&v, &mut w).unwrap();
    for (w, wc) in zip(&w, &wc) {
        assert!((w - wc.im).abs() <= 1e-12);
    }

    // a real shift switches back to the real factorization
    pencil.factor_asb(0.5).unwrap();
    pencil.mult_inv_asbv(&v, &mut w).unwrap();
    let (mut Aw, mut Bw) = (vec![0.; 3], vec![0.; 3]);
    pencil.mult_av(&w, &mut Aw).unwrap();
    pencil.mult_bv(&w, &mut Bw).unwrap();
    for ((a, b), v) in zip(zip(&Aw, &Bw), &v) {
        assert!((a - 0.5 * b - v).abs() <= 1e-12);
    }

    // and the complex factors of the earlier shift are no longer used
    assert_eq!(
        pencil.mult_inv_asbv_complex(&vc, &mut wc),
        Err(OperatorError::NotFactored)
    );

    pencil
        .factor_asb_complex(sigma.re, sigma.im, ShiftPart::Real)
        .unwrap();
    pencil.mult_inv_asbv_complex(&vc, &mut wc).unwrap();
}

#[test]
fn test_pencil_errors() {
    let A = NonSymMatrix::new(general_a(), FactorSettings::default()).unwrap();
    let B = NonSymMatrix::new(SparseMatrix::identity(2), FactorSettings::default()).unwrap();
    assert_eq!(
        NonSymPencil::new(A, B).unwrap_err(),
        OperatorError::IncompatibleSizes
    );

    let A = SymMatrix::new(stiffness_triu(3), FactorSettings::default()).unwrap();
    let B = SymMatrix::new(mass_tril(4), FactorSettings::default()).unwrap();
    assert_eq!(
        SymPencil::new(A, B).unwrap_err(),
        OperatorError::IncompatibleSizes
    );

    let A = SymMatrix::<f64>::undefined(3, FactorSettings::default());
    let B = SymMatrix::new(mass_tril(3), FactorSettings::default()).unwrap();
    let mut pencil = SymPencil::new(A, B).unwrap();
    assert_eq!(pencil.factor_asb(1.0), Err(OperatorError::DataUndefined));

    let rect = |m, n| SparseMatrix::<f64>::spalloc(m, n, 0, StorageKind::General);
    let A = NonSymMatrix::new(rect(3, 2), FactorSettings::default()).unwrap();
    let B = NonSymMatrix::new(rect(3, 2), FactorSettings::default()).unwrap();
    let mut pencil = NonSymPencil::new(A, B).unwrap();
    assert_eq!(pencil.factor_asb(1.0), Err(OperatorError::NotSquare));
}
