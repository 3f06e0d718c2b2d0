//! CSC format definitions and constructors

use crate::offset::Offset;

#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Csc<T, I> {
    pub data: Vec<T>,
    pub indices: Vec<I>, // row indices per column
    pub indptr: Vec<I>,  // column pointer, length ncols + 1
    pub ncols: usize,
    pub nrows: usize,
}

impl<T, I> Csc<T, I> {
    #[inline]
    #[must_use]
    pub const fn nnz(&self) -> usize {
        self.data.len()
    }
    #[inline]
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }
}

impl<T> Csc<T, i64> {
    /// Row indices and values of column `j`.
    #[inline]
    #[must_use]
    pub fn col(&self, j: usize) -> (&[i64], &[T]) {
        let s = self.indptr[j].to_usize();
        let e = self.indptr[j + 1].to_usize();
        (&self.indices[s..e], &self.data[s..e])
    }

    /// Validate and assemble a CSC matrix.
    ///
    /// With `check`, row indices must be in bounds and strictly increasing
    /// within each column.
    #[inline]
    pub fn from_parts(
        nrows: usize,
        ncols: usize,
        indptr: Vec<i64>,
        indices: Vec<i64>,
        data: Vec<T>,
        check: bool,
    ) -> Result<Self, String> {
        let Some(expected_len) = ncols.checked_add(1) else {
            return Err("ncols overflow when adding 1".into());
        };
        if indptr.len() != expected_len {
            return Err("indptr length must be ncols + 1".into());
        }
        if indices.len() != data.len() {
            return Err("indices and data must have equal length".into());
        }
        let nnz = indices.len();
        if usize::try_from(indptr.last().copied().unwrap_or(0)).ok() != Some(nnz) {
            return Err("indptr last element must equal nnz".into());
        }
        if indptr.first().copied().unwrap_or(0) != 0 {
            return Err("indptr first element must be 0".into());
        }
        if check {
            for w in indptr.windows(2) {
                if w[0] > w[1] {
                    return Err("indptr must be non-decreasing".into());
                }
                if w[0] < 0 || w[1] < 0 {
                    return Err("indptr must be non-negative".into());
                }
            }
            for w in indptr.windows(2) {
                let start = w[0].to_usize();
                let end = w[1].to_usize();
                if start > nnz || end > nnz {
                    return Err("indptr elements must be within [0, nnz]".into());
                }
                let mut prev_row = -1_i64;
                for &i in &indices[start..end] {
                    let out_of_bounds = usize::try_from(i).map_or(true, |row| row >= nrows);
                    if out_of_bounds {
                        return Err("row index out of bounds".into());
                    }
                    if i <= prev_row {
                        return Err(
                            "row indices must be strictly increasing within each column".into()
                        );
                    }
                    prev_row = i;
                }
            }
        }
        Ok(Self {
            data,
            indices,
            indptr,
            ncols,
            nrows,
        })
    }

    #[inline]
    #[must_use]
    pub const fn from_parts_unchecked(
        nrows: usize,
        ncols: usize,
        indptr: Vec<i64>,
        indices: Vec<i64>,
        data: Vec<T>,
    ) -> Self {
        Self {
            data,
            indices,
            indptr,
            ncols,
            nrows,
        }
    }
}
