//! CSR format definitions and constructors

use crate::offset::Offset;

#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Csr<T, I> {
    pub data: Vec<T>,
    pub indices: Vec<I>, // column indices per row
    pub indptr: Vec<I>,  // row pointer, length nrows + 1
    pub ncols: usize,
    pub nrows: usize,
}

impl<T, I> Csr<T, I> {
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

impl<T> Csr<T, i64> {
    /// Column indices and values of row `i`.
    #[inline]
    #[must_use]
    pub fn row(&self, i: usize) -> (&[i64], &[T]) {
        let s = self.indptr[i].to_usize();
        let e = self.indptr[i + 1].to_usize();
        (&self.indices[s..e], &self.data[s..e])
    }

    /// Validate and assemble a CSR matrix.
    ///
    /// With `check`, column indices must be in bounds and strictly increasing
    /// within each row.
    #[inline]
    pub fn from_parts(
        nrows: usize,
        ncols: usize,
        indptr: Vec<i64>,
        indices: Vec<i64>,
        data: Vec<T>,
        check: bool,
    ) -> Result<Self, String> {
        let Some(expected_len) = nrows.checked_add(1) else {
            return Err("nrows overflow when adding 1".into());
        };
        if indptr.len() != expected_len {
            return Err("indptr length must be nrows + 1".into());
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
                let mut prev_col = -1_i64;
                for &j in &indices[start..end] {
                    let out_of_bounds = usize::try_from(j).map_or(true, |col| col >= ncols);
                    if out_of_bounds {
                        return Err("column index out of bounds".into());
                    }
                    if j <= prev_col {
                        return Err(
                            "column indices must be strictly increasing within each row".into()
                        );
                    }
                    prev_col = j;
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
