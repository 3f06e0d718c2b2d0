//! COO format definitions and constructors

#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Coo<T, I> {
    pub data: Vec<T>,
    pub row: Vec<I>, // length nnz
    pub col: Vec<I>, // length nnz
    pub ncols: usize,
    pub nrows: usize,
}

impl<T, I> Coo<T, I> {
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

impl<T> Coo<T, i64> {
    /// Assemble a COO matrix; entries may repeat and come in any order.
    #[inline]
    pub fn from_parts(
        nrows: usize,
        ncols: usize,
        row: Vec<i64>,
        col: Vec<i64>,
        data: Vec<T>,
        check: bool,
    ) -> Result<Self, String> {
        if row.len() != data.len() || col.len() != data.len() {
            return Err("row/col/data must have equal length".into());
        }
        if check {
            for (&i, &j) in row.iter().zip(&col) {
                if i < 0 || j < 0 {
                    return Err("indices must be non-negative".into());
                }
                let ok_i = usize::try_from(i).is_ok_and(|ii| ii < nrows);
                let ok_j = usize::try_from(j).is_ok_and(|jj| jj < ncols);
                if !ok_i || !ok_j {
                    return Err("indices out of bounds".into());
                }
            }
        }
        Ok(Self {
            data,
            row,
            col,
            ncols,
            nrows,
        })
    }

    #[inline]
    #[must_use]
    pub const fn from_parts_unchecked(
        nrows: usize,
        ncols: usize,
        row: Vec<i64>,
        col: Vec<i64>,
        data: Vec<T>,
    ) -> Self {
        Self {
            data,
            row,
            col,
            ncols,
            nrows,
        }
    }
}
