#![allow(non_snake_case)]
use super::{DirectSolver, FactorError, FactorSettings};
use crate::algebra::*;
use core::cmp::{max, min};
use log::{debug, info};
use num_traits::Zero;
use std::iter::zip;

/// Performs $LDL^T$ factorization of a real symmetric matrix
///
/// The matrix may be supplied in any storage kind.  Only its upper triangle
/// is used, after mirroring if the matrix holds its lower triangle.  Rows and
/// columns are reordered with AMD to reduce fill-in.  No pivoting is done
/// beyond the ordering, so a zero pivot fails with
/// [`Singular`](FactorError::Singular).

#[derive(Debug)]
pub struct LdlFactorization<T = f64>
where
    T: ScalarT,
{
    // permutation vector
    perm: Vec<usize>,
    // inverse permutation
    iperm: Vec<usize>,
    // lower triangular factor
    L: SparseMatrix<'static, T>,
    // D and is inverse for A = LDL^T
    D: Vec<T>,
    Dinv: Vec<T>,
    // workspace data, present after the symbolic phase
    workspace: Option<LdlWorkspace<T>>,
    amd_dense_scale: f64,
    verbose: bool,
    is_factored: bool,
}

#[derive(Debug)]
struct LdlWorkspace<T>
where
    T: ScalarT,
{
    etree: Vec<usize>,
    Lnz: Vec<usize>,
    iwork: Vec<usize>,
    bwork: Vec<bool>,
    fwork: Vec<T>,

    // number of positive values in D
    positive_inertia: usize,

    // upper triangle of the permuted matrix PAPt
    triuA: SparseMatrix<'static, T>,

    // pattern of the unpermuted upper triangle, used to
    // verify that numeric calls keep the symbolic pattern
    src_colptr: Vec<usize>,
    src_rowval: Vec<usize>,

    // mapping from entries in the unpermuted upper triangle
    // to the entries of triuA
    AtoPAPt: Vec<usize>,
}

impl<T> LdlFactorization<T>
where
    T: ScalarT,
{
    pub fn new(settings: &FactorSettings) -> Self {
        Self {
            perm: Vec::new(),
            iperm: Vec::new(),
            L: SparseMatrix::spalloc(0, 0, 0, StorageKind::LowerTriangular),
            D: Vec::new(),
            Dinv: Vec::new(),
            workspace: None,
            amd_dense_scale: settings.amd_dense_scale,
            verbose: settings.verbose,
            is_factored: false,
        }
    }

    /// Number of positive entries in `D`.  By Sylvester's law of inertia
    /// this is the number of positive eigenvalues of the factored matrix.
    pub fn positive_inertia(&self) -> Option<usize> {
        match (&self.workspace, self.is_factored) {
            (Some(ws), true) => Some(ws.positive_inertia),
            _ => None,
        }
    }

    /// The permutation applied to the rows and columns.
    pub fn perm(&self) -> &[usize] {
        &self.perm
    }

    /// nonzeros in the strictly lower triangular factor
    pub fn nnz_L(&self) -> usize {
        self.L.nnz()
    }
}

impl<T> DirectSolver<T> for LdlFactorization<T>
where
    T: ScalarT,
{
    fn factor_symbolic(&mut self, A: &SparseMatrix<'_, T>) -> Result<(), FactorError> {
        if T::IS_COMPLEX {
            return Err(FactorError::Unsupported("LDL factorization of complex matrices"));
        }
        if !A.kind().is_symmetric() {
            return Err(FactorError::Unsupported("LDL factorization of unsymmetric matrices"));
        }
        check_structure(A)?;

        self.is_factored = false;
        let n = A.nrows();
        let Atriu = A.to_triu();

        //Error if A doesn't have at least one entry in every column
        if Atriu.colptr().windows(2).any(|c| c[0] == c[1]) {
            return Err(FactorError::EmptyColumn);
        }

        let (perm, iperm) = _get_amd_ordering(&Atriu, self.amd_dense_scale)?;

        //permute to (another) upper triangular matrix and store the
        //index mapping the input's entries to the permutation's entries
        let (triuA, AtoPAPt) = _permute_symmetric(&Atriu, &iperm);

        let mut etree = vec![0; n];
        let mut Lnz = vec![0; n]; //nonzeros in each L column
        let mut iwork = vec![0; n * 3];

        // compute elimination tree
        _etree(n, triuA.colptr(), triuA.rowval(), &mut iwork, &mut Lnz, &mut etree);

        //total nonzeros in factorization
        let sumLnz: usize = Lnz.iter().sum();
        debug!("ldl symbolic: n = {}, nnz(triu A) = {}, nnz(L) = {}", n, Atriu.nnz(), sumLnz);

        self.L = SparseMatrix::spalloc(n, n, sumLnz, StorageKind::LowerTriangular);
        self.D = vec![T::zero(); n];
        self.Dinv = vec![T::zero(); n];
        self.perm = perm;
        self.iperm = iperm;
        self.workspace = Some(LdlWorkspace {
            etree,
            Lnz,
            iwork,
            bwork: vec![false; n],
            fwork: vec![T::zero(); n],
            positive_inertia: 0,
            triuA,
            src_colptr: Atriu.colptr().to_vec(),
            src_rowval: Atriu.rowval().to_vec(),
            AtoPAPt,
        });

        Ok(())
    }

    fn factor_numeric(&mut self, A: &SparseMatrix<'_, T>) -> Result<(), FactorError> {
        self.is_factored = false;
        let ws = self.workspace.as_mut().ok_or(FactorError::NotFactored)?;

        check_structure(A)?;
        let Atriu = A.to_triu();
        if Atriu.colptr() != ws.src_colptr || Atriu.rowval() != ws.src_rowval {
            return Err(FactorError::IncompatibleDimension);
        }

        // load new values into the permuted triangle
        let nzval = ws.triuA.nzval_mut();
        for (&v, &idx) in zip(Atriu.nzval(), &ws.AtoPAPt) {
            nzval[idx] = v;
        }

        let n = ws.triuA.ncols();
        let L = &mut self.L;
        L.diag.invalidate();

        let pos_d_count = _factor_inner(
            n,
            ws.triuA.colptr(),
            ws.triuA.rowval(),
            ws.triuA.nzval(),
            &mut L.colptr,
            &mut L.rowval,
            &mut L.nzval,
            &mut self.D,
            &mut self.Dinv,
            &ws.Lnz,
            &ws.etree,
            &mut ws.bwork,
            &mut ws.iwork,
            &mut ws.fwork,
        )?;

        ws.positive_inertia = pos_d_count;
        self.is_factored = true;

        if self.verbose {
            info!("ldl numeric: n = {}, nnz(L) = {}, positive pivots = {}", n, self.L.nnz(), pos_d_count);
        } else {
            debug!("ldl numeric: n = {}, nnz(L) = {}, positive pivots = {}", n, self.L.nnz(), pos_d_count);
        }

        Ok(())
    }

    // Solves Ax = b using LDL factors for A.
    fn solve(&mut self, x: &mut [T], b: &[T]) -> Result<(), FactorError> {
        if !self.is_factored {
            return Err(FactorError::NotFactored);
        }
        let ws = self.workspace.as_mut().ok_or(FactorError::NotFactored)?;
        if b.len() != self.D.len() || x.len() != self.D.len() {
            return Err(FactorError::IncompatibleDimension);
        }

        // permute b
        let tmp = &mut ws.fwork;
        _permute(tmp, b, &self.perm);

        //solve in place with tmp as permuted RHS
        _solve(
            self.L.colptr(),
            self.L.rowval(),
            self.L.nzval(),
            &self.Dinv,
            tmp,
        );

        // inverse permutation to put unpermuted soln in x
        _ipermute(x, tmp, &self.perm);
        Ok(())
    }

    fn free(&mut self) {
        self.workspace = None;
        self.L = SparseMatrix::spalloc(0, 0, 0, StorageKind::LowerTriangular);
        self.D.clear();
        self.Dinv.clear();
        self.perm.clear();
        self.iperm.clear();
        self.is_factored = false;
    }

    fn is_factored(&self) -> bool {
        self.is_factored
    }
}

fn check_structure<T: ScalarT>(A: &SparseMatrix<'_, T>) -> Result<(), FactorError> {
    if !A.is_defined() {
        return Err(FactorError::IncompatibleDimension);
    }
    if !A.is_square() {
        return Err(FactorError::NotSquare);
    }
    Ok(())
}

const LDL_UNKNOWN: usize = usize::MAX;
const LDL_USED: bool = true;
const LDL_UNUSED: bool = false;

// Compute the elimination tree for a symmetric matrix
// in compressed sparse column form (upper triangle).

fn _etree(
    n: usize,
    Ap: &[usize],
    Ai: &[usize],
    work: &mut [usize],
    Lnz: &mut [usize],
    etree: &mut [usize],
) {
    // zero out Lnz and work.  Set all etree values to unknown
    work.fill(0);
    Lnz.fill(0);
    etree.fill(LDL_UNKNOWN);

    // compute the elimination tree
    for j in 0..n {
        work[j] = j;
        for istart in Ai.iter().take(Ap[j + 1]).skip(Ap[j]) {
            let mut i = *istart;

            while work[i] != j {
                if etree[i] == LDL_UNKNOWN {
                    etree[i] = j;
                }
                Lnz[i] += 1; // nonzeros in this column
                work[i] = j;
                i = etree[i];
            }
        }
    }
}

// up-looking numeric factorization.  Returns the number of
// positive entries in D.
#[allow(clippy::too_many_arguments)]
fn _factor_inner<T: ScalarT>(
    n: usize,
    Ap: &[usize],
    Ai: &[usize],
    Ax: &[T],
    Lp: &mut [usize],
    Li: &mut [usize],
    Lx: &mut [T],
    D: &mut [T],
    Dinv: &mut [T],
    Lnz: &[usize],
    etree: &[usize],
    bwork: &mut [bool],
    iwork: &mut [usize],
    fwork: &mut [T],
) -> Result<usize, FactorError> {
    let mut positiveValuesInD = 0;

    // partition working memory into pieces
    let y_markers = bwork;
    let (y_idx, iwork) = iwork.split_at_mut(n);
    let (elim_buffer, next_colspace) = iwork.split_at_mut(n);
    let y_vals = fwork;

    //set Lp to cumsum(Lnz), starting from zero
    Lp[0] = 0;
    let mut acc = 0;
    for (Lp, Lnz) in zip(&mut Lp[1..], Lnz) {
        *Lp = acc + Lnz;
        acc = *Lp;
    }

    //  set all y_idx to be 'unused' initially
    // in each column of L, the next available space
    // to start is just the first space in the column
    y_markers.fill(LDL_UNUSED);
    y_vals.fill(T::zero());
    D.fill(T::zero());
    next_colspace.copy_from_slice(&Lp[0..n]);

    // column 0 holds at most the (0,0) entry, so the
    // first pass only sets D[0]
    for k in 0..n {
        // NB : For each k, we compute a solution to
        // y = L(0:(k-1),0:k-1))\b, where b is the kth
        // column of A that sits above the diagonal.
        // The solution y is then the kth row of L,
        // with an implied '1' at the diagonal entry.

        // number of nonzeros in this row of L
        let mut nnz_y = 0;

        // This loop determines where nonzeros
        // will go in the kth row of L, but doesn't
        // compute the actual values
        for i in Ap[k]..Ap[k + 1] {
            let bidx = Ai[i]; //we are working on this element of b

            // Initialize D[k] as the element of this column
            // corresponding to the diagonal place.  Don't use
            // this element as part of the elimination step
            // that computes the k^th row of L
            if bidx == k {
                D[k] = Ax[i];
                continue;
            }

            y_vals[bidx] = Ax[i]; // initialise y(bidx) = b(bidx)

            // use the forward elimination tree to figure
            // out which elements must be eliminated after
            // this element of b
            if y_markers[bidx] == LDL_UNUSED {
                //this y term not already visited
                y_markers[bidx] = LDL_USED;
                elim_buffer[0] = bidx; // It goes at the start of the current list
                let mut nnz_e = 1; //length of unvisited elimination path from here

                let mut next_idx = etree[bidx];

                while next_idx != LDL_UNKNOWN && next_idx < k {
                    if y_markers[next_idx] == LDL_USED {
                        break;
                    }

                    y_markers[next_idx] = LDL_USED;
                    elim_buffer[nnz_e] = next_idx; // It goes in the current list
                    next_idx = etree[next_idx]; // one step further along tree
                    nnz_e += 1; // the list is one longer than before
                }

                // now put the buffered elimination list into
                // my current ordering in reverse order
                while nnz_e != 0 {
                    nnz_e -= 1;
                    y_idx[nnz_y] = elim_buffer[nnz_e];
                    nnz_y += 1;
                }
            }
        }

        // This for loop places nonzeros values in the k^th row
        for i in (0..nnz_y).rev() {
            // which column are we working on?
            let cidx = y_idx[i];

            // loop along the elements in this
            // column of L and subtract to solve to y
            let tmp_idx = next_colspace[cidx];
            let y_vals_cidx = y_vals[cidx];

            for j in Lp[cidx]..tmp_idx {
                y_vals[Li[j]] -= Lx[j] * y_vals_cidx;
            }

            // Now I have the cidx^th element of y = L\b.
            // so compute the corresponding element of
            // this row of L and put it into the right place
            Lx[tmp_idx] = y_vals_cidx * Dinv[cidx];
            D[k] -= y_vals_cidx * Lx[tmp_idx];

            // record which row it went into
            Li[tmp_idx] = k;
            next_colspace[cidx] += 1;

            // reset the y_vals and indices back to zero and LDL_UNUSED
            // once I'm done with them
            y_vals[cidx] = T::zero();
            y_markers[cidx] = LDL_UNUSED;
        }

        // Maintain a count of the positive entries
        // in D.  If we hit a zero, we can't factor
        // this matrix, so abort
        if D[k] == T::zero() {
            return Err(FactorError::Singular);
        }
        if D[k].re() > T::Real::zero() {
            positiveValuesInD += 1;
        }

        // compute the inverse of the diagonal
        Dinv[k] = T::one() / D[k];
    }

    Ok(positiveValuesInD)
}

// Solves (L+I)x = b, with x replacing b
fn _lsolve<T: ScalarT>(Lp: &[usize], Li: &[usize], Lx: &[T], x: &mut [T]) {
    for i in 0..x.len() {
        let xi = x[i];
        let (f, l) = (Lp[i], Lp[i + 1]);
        for (&Lij, &Lxj) in zip(&Li[f..l], &Lx[f..l]) {
            x[Lij] -= Lxj * xi;
        }
    }
}

// Solves (L+I)'x = b, with x replacing b
fn _ltsolve<T: ScalarT>(Lp: &[usize], Li: &[usize], Lx: &[T], x: &mut [T]) {
    for i in (0..x.len()).rev() {
        let mut s = T::zero();
        let (f, l) = (Lp[i], Lp[i + 1]);
        for (&Lij, &Lxj) in zip(&Li[f..l], &Lx[f..l]) {
            s += Lxj * x[Lij];
        }
        x[i] -= s;
    }
}

// Solves Ax = b where A has given LDL factors, with x replacing b
fn _solve<T: ScalarT>(Lp: &[usize], Li: &[usize], Lx: &[T], Dinv: &[T], b: &mut [T]) {
    _lsolve(Lp, Li, Lx, b);
    zip(b.iter_mut(), Dinv).for_each(|(b, d)| *b *= *d);
    _ltsolve(Lp, Li, Lx, b);
}

// Construct an inverse permutation from a permutation
fn _invperm(p: &[usize]) -> Result<Vec<usize>, FactorError> {
    let mut b = vec![usize::MAX; p.len()];

    for (i, &j) in p.iter().enumerate() {
        if j < p.len() && b[j] == usize::MAX {
            b[j] = i;
        } else {
            return Err(FactorError::InvalidPermutation);
        }
    }
    Ok(b)
}

// internal permutation and inverse permutation
// functions that require no memory allocations

fn _permute<T: Copy>(x: &mut [T], b: &[T], p: &[usize]) {
    zip(p, x).for_each(|(p, x)| *x = b[*p]);
}

fn _ipermute<T: Copy>(x: &mut [T], b: &[T], p: &[usize]) {
    zip(p, b).for_each(|(p, b)| x[*p] = *b);
}

// Given a sparse symmetric matrix `A` (with only upper triangular entries), return
// permuted sparse symmetric matrix `P` (also only upper triangular) given the
// inverse permutation vector `iperm`.
fn _permute_symmetric<T: ScalarT>(
    A: &SparseMatrix<'_, T>,
    iperm: &[usize],
) -> (SparseMatrix<'static, T>, Vec<usize>) {
    let n = A.ncols();
    let nnz = A.nnz();

    // we will record a mapping of entries from A to PAPt
    let mut AtoPAPt = vec![0; nnz];
    let mut Pc = vec![0; n + 1];
    let mut Pr = vec![0; nnz];
    let mut Pv = vec![T::zero(); nnz];

    _permute_symmetric_inner(A, &mut AtoPAPt, iperm, &mut Pr, &mut Pc, &mut Pv);

    let P = SparseMatrix::new(n, n, Pc, Pr, Pv, StorageKind::UpperTriangular);
    (P, AtoPAPt)
}

// the main function without extra argument checks
// following the book: Timothy Davis - Direct Methods for Sparse Linear Systems

fn _permute_symmetric_inner<T: ScalarT>(
    A: &SparseMatrix<'_, T>,
    AtoPAPt: &mut [usize],
    iperm: &[usize],
    Pr: &mut [usize],
    Pc: &mut [usize],
    Pv: &mut [T],
) {
    // 1. count number of entries that each column of P will have
    let n = A.nrows();
    let mut num_entries = vec![0; n];
    let Ar = A.rowval();
    let Ac = A.colptr();
    let Av = A.nzval();

    // count the number of upper-triangle entries in columns of P,
    // keeping in mind the row permutation
    for colA in 0..n {
        let colP = iperm[colA];
        for rowA in Ar.iter().take(Ac[colA + 1]).skip(Ac[colA]) {
            let rowP = iperm[*rowA];
            if *rowA <= colA {
                // determine to which column the entry belongs after permutation
                let col_idx = max(rowP, colP);
                num_entries[col_idx] += 1;
            }
        }
    }

    // 2. calculate permuted Pc = P.colptr from number of entries
    Pc[0] = 0;
    let mut acc = 0;
    for (Pckp1, ne) in zip(&mut Pc[1..], &num_entries) {
        *Pckp1 = acc + ne;
        acc = *Pckp1;
    }
    // reuse this memory to keep track of free entries in rowval
    num_entries.copy_from_slice(&Pc[0..n]);
    let mut row_starts = num_entries;

    // 3. permute the row entries and position of corresponding nzval
    for colA in 0..n {
        let colP = iperm[colA];
        for rowA_idx in Ac[colA]..Ac[colA + 1] {
            let rowA = Ar[rowA_idx];
            if rowA <= colA {
                let rowP = iperm[rowA];
                let col_idx = max(colP, rowP);

                // find next free location in rowval (this results in unordered columns in the rowval)
                let rowP_idx = row_starts[col_idx];

                Pr[rowP_idx] = min(colP, rowP);
                Pv[rowP_idx] = Av[rowA_idx];

                //record this into the mapping vector
                AtoPAPt[rowA_idx] = rowP_idx;

                row_starts[col_idx] += 1;
            }
        }
    }
}

fn _get_amd_ordering<T: ScalarT>(
    A: &SparseMatrix<'_, T>,
    amd_dense_scale: f64,
) -> Result<(Vec<usize>, Vec<usize>), FactorError> {
    // computes a permutation for A using AMD default parameters
    let mut control = amd::Control::default();
    control.dense *= amd_dense_scale;
    let (perm, iperm, _info) = amd::order(A.nrows(), A.colptr(), A.rowval(), &control)
        .map_err(|_| FactorError::Ordering)?;
    Ok((perm, iperm))
}

//configure tests of internals
#[path = "ldl_test.rs"]
#[cfg(test)]
mod ldl_test;
