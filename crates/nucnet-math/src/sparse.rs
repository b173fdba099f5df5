// ─────────────────────────────────────────────────────────────────────
// SCPN Nucnet — Sparse Matrix
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Sparse matrix helpers over `sprs`.
//!
//! Matrices are assembled as triplets in a [`TriMat`] and compressed with
//! `to_csr()`, which sums duplicate (row, col) entries. Exact zeros are never
//! pushed. The helpers here add bounds checks and dimension checks that
//! return [`NucnetError`] instead of panicking.

use ndarray::Array1;
use nucnet_types::error::{NucnetError, NucnetResult};

pub use sprs::{CsMat, TriMat};

/// Exact zero test used for sparse storage and abundance bookkeeping.
#[inline]
pub fn value_is_zero(x: f64) -> bool {
    x == 0.0
}

/// Empty square triplet accumulator.
pub fn square_triplets(n: usize) -> TriMat<f64> {
    TriMat::new((n, n))
}

/// Push `value` at (row, col); it is summed with any earlier entry there
/// on compression. Zero contributions are skipped.
pub fn add_to_element(
    tri: &mut TriMat<f64>,
    row: usize,
    col: usize,
    value: f64,
) -> NucnetResult<()> {
    if row >= tri.rows() || col >= tri.cols() {
        return Err(NucnetError::MatrixOutOfBounds { row, col });
    }
    if !value_is_zero(value) {
        tri.add_triplet(row, col, value);
    }
    Ok(())
}

/// Element value; absent and out-of-range entries read as zero.
pub fn element(m: &CsMat<f64>, row: usize, col: usize) -> f64 {
    if row >= m.rows() || col >= m.cols() {
        return 0.0;
    }
    m.get(row, col).copied().unwrap_or(0.0)
}

/// `m + value * I`, e.g. 1/dt on the diagonal for an implicit step.
pub fn add_to_diagonal(m: &CsMat<f64>, value: f64) -> NucnetResult<CsMat<f64>> {
    if m.rows() != m.cols() {
        return Err(NucnetError::DimensionMismatch {
            expected: m.rows(),
            got: m.cols(),
        });
    }
    let mut diagonal: CsMat<f64> = CsMat::eye(m.rows());
    diagonal.map_inplace(|_| value);
    Ok(&m.to_csr() + &diagonal)
}

pub fn matrix_times_vector(m: &CsMat<f64>, x: &Array1<f64>) -> NucnetResult<Array1<f64>> {
    if x.len() != m.cols() {
        return Err(NucnetError::DimensionMismatch {
            expected: m.cols(),
            got: x.len(),
        });
    }
    Ok(m * x)
}

/// Transpose, kept in row-major storage.
pub fn transpose(m: &CsMat<f64>) -> CsMat<f64> {
    m.transpose_view().to_csr()
}

/// Non-zero entries of one column as (row, value).
pub fn column(m: &CsMat<f64>, col: usize) -> Vec<(usize, f64)> {
    let mut entries: Vec<(usize, f64)> = m
        .iter()
        .filter(|&(_, (_, j))| j == col)
        .map(|(&v, (i, _))| (i, v))
        .collect();
    entries.sort_by_key(|&(i, _)| i);
    entries
}
