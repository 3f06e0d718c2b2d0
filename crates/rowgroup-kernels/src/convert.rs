//! Sparse format conversions built on the parallel group builder.
//!
//! Entries are grouped by their major index without sorting: COO input keeps
//! its entry order within each row (or column), and duplicates are kept as
//! separate entries. Transposes of CSR/CSC come out with ascending minor
//! indices because shards are contiguous in storage order.

use rayon::prelude::*;
use rowgroup_core::{Coo, Csc, Csr, GroupError};

use crate::config::GroupOptions;
use crate::group_by::group_with;

#[inline]
fn i64_to_usize(x: i64) -> usize {
    debug_assert!(x >= 0);
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    {
        x as usize
    }
}

#[inline]
fn usize_to_i64(x: usize) -> i64 {
    debug_assert!(i64::try_from(x).is_ok());
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    {
        x as i64
    }
}

fn check_indices(idx: &[i64], bound: usize) -> Result<(), GroupError> {
    let bad = idx
        .par_iter()
        .find_first(|&&i| usize::try_from(i).map_or(true, |u| u >= bound));
    match bad {
        Some(&i) if i < 0 => Err(GroupError::NegativeIndex(i)),
        Some(&i) => Err(GroupError::IndexOutOfBounds { index: i, bound }),
        None => Ok(()),
    }
}

type Grouped3<T> = (Vec<i64>, Vec<i64>, Vec<T>);

/// Group entry `p` under `major[p]`, carrying `(minor[p], values[p])`.
fn group_entries<T>(
    major: &[i64],
    minor: &[i64],
    values: &[T],
    nmajor: usize,
    opts: &GroupOptions,
) -> Result<Grouped3<T>, GroupError>
where
    T: Clone + Default + Send + Sync,
{
    if major.len() != values.len() || minor.len() != values.len() {
        return Err(GroupError::LengthMismatch {
            keys: major.len(),
            values: values.len(),
        });
    }
    let opts = opts.clone().with_nkeys_hint(nmajor);
    let mut indptr: Vec<i64> = Vec::new();
    let mut entries: Vec<(i64, T)> = Vec::new();
    group_with(
        &mut indptr,
        &mut entries,
        values.len(),
        |p| i64_to_usize(major[p]),
        |p| (minor[p], values[p].clone()),
        &opts,
    )?;
    let (indices, data): (Vec<i64>, Vec<T>) = entries.into_par_iter().unzip();
    Ok((indptr, indices, data))
}

/// Major index of every stored entry of a compressed matrix, in storage order.
///
/// `indptr` must start at 0, be non-decreasing and end at `nnz`; it is not
/// trusted, since unchecked containers skip that validation.
fn expand_indptr(indptr: &[i64], nnz: usize) -> Result<Vec<i64>, GroupError> {
    if indptr.first().copied().unwrap_or(0) != 0 {
        return Err(GroupError::InvalidIndptr("first element must be 0"));
    }
    if indptr.par_windows(2).any(|w| w[1] < w[0]) {
        return Err(GroupError::InvalidIndptr("must be non-decreasing"));
    }
    let last = indptr.last().copied().unwrap_or(0);
    if usize::try_from(last).ok() != Some(nnz) {
        return Err(GroupError::InvalidIndptr("last element must equal nnz"));
    }
    // now 0 <= indptr[i] <= indptr[i + 1] <= nnz for every i
    let nmajor = indptr.len().saturating_sub(1);
    Ok((0..nmajor)
        .into_par_iter()
        .flat_map_iter(|i| {
            let n = i64_to_usize(indptr[i + 1] - indptr[i]);
            std::iter::repeat(usize_to_i64(i)).take(n)
        })
        .collect())
}

/// Convert COO -> CSR, keeping entry order and duplicates within rows.
///
/// # Errors
/// [`GroupError::NegativeIndex`] or [`GroupError::IndexOutOfBounds`] for bad
/// coordinates, plus the driver's errors.
pub fn coo_to_csr<T>(a: &Coo<T, i64>, opts: &GroupOptions) -> Result<Csr<T, i64>, GroupError>
where
    T: Clone + Default + Send + Sync,
{
    check_indices(&a.row, a.nrows)?;
    check_indices(&a.col, a.ncols)?;
    let (indptr, indices, data) = group_entries(&a.row, &a.col, &a.data, a.nrows, opts)?;
    Ok(Csr::from_parts_unchecked(a.nrows, a.ncols, indptr, indices, data))
}

/// Convert COO -> CSC, keeping entry order and duplicates within columns.
///
/// # Errors
/// Same as [`coo_to_csr`].
pub fn coo_to_csc<T>(a: &Coo<T, i64>, opts: &GroupOptions) -> Result<Csc<T, i64>, GroupError>
where
    T: Clone + Default + Send + Sync,
{
    check_indices(&a.row, a.nrows)?;
    check_indices(&a.col, a.ncols)?;
    let (indptr, indices, data) = group_entries(&a.col, &a.row, &a.data, a.ncols, opts)?;
    Ok(Csc::from_parts_unchecked(a.nrows, a.ncols, indptr, indices, data))
}

/// Convert CSR -> CSC. Row indices come out ascending within each column.
///
/// # Errors
/// [`GroupError::IndexOutOfBounds`] for a column index past `ncols`,
/// [`GroupError::InvalidIndptr`] for a malformed row pointer, plus the
/// driver's errors.
pub fn csr_to_csc<T>(a: &Csr<T, i64>, opts: &GroupOptions) -> Result<Csc<T, i64>, GroupError>
where
    T: Clone + Default + Send + Sync,
{
    check_indices(&a.indices, a.ncols)?;
    let rows = expand_indptr(&a.indptr, a.indices.len())?;
    let (indptr, indices, data) = group_entries(&a.indices, &rows, &a.data, a.ncols, opts)?;
    Ok(Csc::from_parts_unchecked(a.nrows, a.ncols, indptr, indices, data))
}

/// Convert CSC -> CSR. Column indices come out ascending within each row.
///
/// # Errors
/// [`GroupError::IndexOutOfBounds`] for a row index past `nrows`,
/// [`GroupError::InvalidIndptr`] for a malformed column pointer, plus the
/// driver's errors.
pub fn csc_to_csr<T>(a: &Csc<T, i64>, opts: &GroupOptions) -> Result<Csr<T, i64>, GroupError>
where
    T: Clone + Default + Send + Sync,
{
    check_indices(&a.indices, a.nrows)?;
    let cols = expand_indptr(&a.indptr, a.indices.len())?;
    let (indptr, indices, data) = group_entries(&a.indices, &cols, &a.data, a.nrows, opts)?;
    Ok(Csr::from_parts_unchecked(a.nrows, a.ncols, indptr, indices, data))
}
