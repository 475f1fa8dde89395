use super::*;
use crate::factor::FactorSettingsBuilder;

#[cfg(test)]

fn test_matrix_4x4() -> SparseMatrix<'static, f64> {
    // A =
    //[ 8.0  -3.0   2.0    ⋅ ]
    //[  ⋅    8.0  -1.0    ⋅ ]
    //[  ⋅     ⋅    8.0  -1.0]
    //[  ⋅     ⋅     ⋅    1.0]
    let Ap = vec![0, 1, 3, 6, 8];
    let Ai = vec![0, 0, 1, 0, 1, 2, 2, 3];
    let Ax = vec![8., -3., 8., 2., -1., 8., -1., 1.];
    SparseMatrix::new(4, 4, Ap, Ai, Ax, StorageKind::UpperTriangular)
}

fn inf_norm_diff(a: &[f64], b: &[f64]) -> f64 {
    zip(a, b).fold(0.0, |acc, (x, y)| f64::max(acc, f64::abs(*x - *y)))
}

// tests some of the private functions of the LDL back end.
// Configured as submodule of ldl.rs to expose internals.

#[test]
fn test_invperm() {
    let perm = vec![3, 0, 2, 1];
    assert_eq!(_invperm(&perm).unwrap(), vec![1, 3, 2, 0]);
}

//test fail on bad permutation
#[test]
fn test_invperm_bad_perm1() {
    let perm = vec![3, 0, 2, 0]; //repeated index
    assert_eq!(_invperm(&perm), Err(FactorError::InvalidPermutation));
}

#[test]
fn test_invperm_bad_perm2() {
    let perm = vec![4, 0, 2, 1]; //index too big
    assert_eq!(_invperm(&perm), Err(FactorError::InvalidPermutation));
}

#[test]
fn test_permute() {
    let perm = vec![3, 0, 2, 1];
    let b = vec![1., 2., 3., 4.];
    let mut x = vec![0.; 4];
    let mut y = vec![0.; 4];

    _permute(&mut x, &b, &perm);
    assert_eq!(x, vec![4., 1., 3., 2.]);

    _ipermute(&mut y, &x, &perm);
    assert_eq!(y, b);
}

#[test]
fn test_solve_from_factors() {
    //L =
    //[ ⋅    ⋅     ⋅    ⋅ ]
    //[1.0   ⋅     ⋅    ⋅ ]
    //[2.0  1.0    ⋅    ⋅ ]
    //[ ⋅   7.0  -3.0   ⋅ ]

    let Lp = vec![0, 2, 4, 5, 5];
    let Li = vec![1, 2, 2, 3, 3];
    let Lx = vec![1., 2., 1., 7., -3.];
    let dinv = [0.25, -1.0, -0.5, 1.0];
    let x = vec![-3., 2., 1., 4.];

    //(I+L)x = b.  Back solve on b in place.
    let mut b = vec![-3., -1., -3., 15.];
    _lsolve(&Lp, &Li, &Lx, &mut b);
    assert_eq!(b, x);

    //(I+L')x = b.  Back solve on b in place.
    let mut b = vec![1., 31., -11., 4.];
    _ltsolve(&Lp, &Li, &Lx, &mut b);
    assert_eq!(b, x);

    //(I+L)*D*(I+L)*x = b.  Back solve on b in place;
    let mut b = vec![4., -27., -1., -279.];
    _solve(&Lp, &Li, &Lx, &dinv, &mut b);
    assert_eq!(b, x);
}

#[test]
fn test_etree() {
    let n = 4;
    let A = test_matrix_4x4();
    let mut Lnz = vec![0; n];
    let mut iwork = vec![0; 3 * n];
    let mut etree = vec![0; n];

    _etree(
        A.nrows(),
        A.colptr(),
        A.rowval(),
        &mut iwork,
        &mut Lnz,
        &mut etree,
    );

    assert_eq!(etree, vec![1, 2, 3, LDL_UNKNOWN]);
    assert_eq!(Lnz, vec![2, 1, 1, 0]);
}

#[test]
fn test_amd() {
    let A = test_matrix_4x4();
    let (perm, iperm) = _get_amd_ordering(&A, 1.5).unwrap();
    assert_eq!(perm, [3, 0, 1, 2]);
    assert_eq!(iperm, [1, 2, 3, 0]);
}

#[test]
fn test_permute_symmetric() {
    //no permutation at all
    let A = test_matrix_4x4();
    let iperm: Vec<usize> = vec![0, 1, 2, 3];
    let (P, AtoPAPt) = _permute_symmetric(&A, &iperm);

    assert_eq!(A.colptr(), P.colptr());
    assert_eq!(A.rowval(), P.rowval());
    assert_eq!(A.nzval(), P.nzval());
    let linearidx: Vec<usize> = (0..AtoPAPt.len()).collect();
    assert_eq!(&linearidx, &AtoPAPt);

    //test with a permutation.  NB: the permutation
    //produces a result in which entries are not ordered
    //by increasing row number within each column

    let mut A = test_matrix_4x4();

    //set the problem data to increasing values columnwise
    for (i, v) in A.nzval_mut().iter_mut().enumerate() {
        *v = i as f64 + 1.;
    }

    let perm: Vec<usize> = vec![2, 3, 0, 1];
    let iperm = _invperm(&perm).unwrap();
    let (P, _) = _permute_symmetric(&A, &iperm);

    assert_eq!(P.colptr(), &[0, 1, 3, 5, 8]);
    assert_eq!(P.rowval(), &[0, 0, 1, 2, 0, 2, 3, 0]);
    assert_eq!(P.nzval(), &[6.0, 7.0, 8.0, 1.0, 4.0, 2.0, 3.0, 5.0]);
}

#[test]
fn test_solve_basic() {
    let A = test_matrix_4x4();
    let settings = FactorSettingsBuilder::default()
        .amd_dense_scale(1.5)
        .build()
        .unwrap();
    let mut factors = LdlFactorization::new(&settings);

    assert!(!factors.is_factored());
    factors.factor_symbolic(&A).unwrap();
    factors.factor_numeric(&A).unwrap();
    assert!(factors.is_factored());
    assert_eq!(factors.perm(), &[3, 0, 1, 2]);
    assert_eq!(factors.positive_inertia(), Some(4));

    let b = vec![20., -22., 32., -7.];
    let mut x = vec![0.; 4];
    factors.solve(&mut x, &b).unwrap();
    assert!(inf_norm_diff(&x, &[1., -2., 3., -4.]) <= 1e-12);
}

#[test]
fn test_refactor() {
    let mut A = test_matrix_4x4();
    let mut factors = LdlFactorization::new(&FactorSettings::default());
    factors.factor_symbolic(&A).unwrap();
    factors.factor_numeric(&A).unwrap();

    // same pattern, doubled values
    A.nzval_mut().iter_mut().for_each(|v| *v *= 2.);
    factors.factor_numeric(&A).unwrap();

    let b = vec![20., -22., 32., -7.];
    let mut x = vec![0.; 4];
    factors.solve(&mut x, &b).unwrap();
    assert!(inf_norm_diff(&x, &[0.5, -1., 1.5, -2.]) <= 1e-12);

    // a different pattern is rejected
    let B = SparseMatrix::<f64>::identity(4);
    let mut B = B;
    B.set_kind(StorageKind::UpperTriangular);
    assert_eq!(
        factors.factor_numeric(&B),
        Err(FactorError::IncompatibleDimension)
    );
    assert!(!factors.is_factored());
}

#[test]
fn test_lower_triangular() {
    // the same matrix supplied as its lower triangle
    let A = test_matrix_4x4().transpose();
    assert_eq!(A.kind(), StorageKind::LowerTriangular);

    let mut factors = LdlFactorization::new(&FactorSettings::default());
    factors.factor_symbolic(&A).unwrap();
    factors.factor_numeric(&A).unwrap();

    let b = vec![20., -22., 32., -7.];
    let mut x = vec![0.; 4];
    factors.solve(&mut x, &b).unwrap();
    assert!(inf_norm_diff(&x, &[1., -2., 3., -4.]) <= 1e-12);
}

#[test]
fn test_bad_numeric_pivot() {
    // A =
    //[ 1.0   1.0]
    //[ 1.0   1.0]
    let A = SparseMatrix::new(
        2,
        2,
        vec![0, 1, 3],
        vec![0, 0, 1],
        vec![1., 1., 1.],
        StorageKind::UpperTriangular,
    );
    let mut factors = LdlFactorization::new(&FactorSettings::default());
    factors.factor_symbolic(&A).unwrap();
    assert_eq!(factors.factor_numeric(&A), Err(FactorError::Singular));
    assert!(!factors.is_factored());
    assert_eq!(factors.positive_inertia(), None);

    let mut x = vec![0.; 2];
    assert_eq!(
        factors.solve(&mut x, &[1., 1.]),
        Err(FactorError::NotFactored)
    );
}

#[test]
fn test_zero_column_error() {
    let A = SparseMatrix::new(
        2,
        2,
        vec![0, 1, 1],
        vec![0],
        vec![1.],
        StorageKind::UpperTriangular,
    );
    let mut factors = LdlFactorization::new(&FactorSettings::default());
    assert_eq!(factors.factor_symbolic(&A), Err(FactorError::EmptyColumn));
}

#[test]
fn test_unsupported_kinds() {
    let mut factors = LdlFactorization::new(&FactorSettings::default());
    let A = SparseMatrix::<f64>::identity(3);
    assert!(matches!(
        factors.factor_symbolic(&A),
        Err(FactorError::Unsupported(_))
    ));

    let mut factors = LdlFactorization::<num_complex::Complex64>::new(&FactorSettings::default());
    let mut A = SparseMatrix::identity(3);
    A.set_kind(StorageKind::UpperTriangular);
    assert!(matches!(
        factors.factor_symbolic(&A),
        Err(FactorError::Unsupported(_))
    ));
}

#[test]
fn test_free() {
    let A = test_matrix_4x4();
    let mut factors = LdlFactorization::new(&FactorSettings::default());
    factors.factor_symbolic(&A).unwrap();
    factors.factor_numeric(&A).unwrap();
    assert!(factors.nnz_L() > 0);

    factors.free();
    assert!(!factors.is_factored());
    assert_eq!(factors.nnz_L(), 0);
    assert_eq!(factors.factor_numeric(&A), Err(FactorError::NotFactored));
}
