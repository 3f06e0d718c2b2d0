#![allow(clippy::redundant_pub_crate)]
use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use rowgroup_core::{Coo, Csr, GroupError};
use rowgroup_kernels::{
    coo_to_csr, csr_to_csc, group_by_key as group_by_key_impl, keys_from_i64, GroupOptions,
};

fn to_py_err(e: GroupError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn usize_to_i64(x: usize) -> i64 {
    debug_assert!(i64::try_from(x).is_ok());
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    {
        x as i64
    }
}

#[pyfunction]
#[pyo3(signature = (keys, values, nthread=None, nkeys=0))]
pub(crate) fn group_by_key<'py>(
    py: Python<'py>,
    keys: PyReadonlyArray1<'py, i64>,
    values: PyReadonlyArray1<'py, f64>,
    nthread: Option<usize>,
    nkeys: usize,
) -> PyResult<(Bound<'py, PyArray1<i64>>, Bound<'py, PyArray1<f64>>)> {
    let keys = keys_from_i64(keys.as_slice()?).map_err(to_py_err)?;
    let values: Vec<f64> = values.as_slice()?.to_vec();
    let opts = GroupOptions::from_env_with(nthread, nkeys);
    let g = py
        .detach(|| group_by_key_impl(&keys, &values, &opts))
        .map_err(to_py_err)?;
    let ptr: Vec<i64> = g.ptr.into_iter().map(usize_to_i64).collect();
    Ok((PyArray1::from_vec(py, ptr), PyArray1::from_vec(py, g.data)))
}

#[pyfunction]
#[pyo3(signature = (nrows, ncols, row, col, data, check=true, nthread=None))]
pub(crate) fn coo_to_csr_from_parts<'py>(
    py: Python<'py>,
    nrows: usize,
    ncols: usize,
    row: PyReadonlyArray1<'py, i64>,
    col: PyReadonlyArray1<'py, i64>,
    data: PyReadonlyArray1<'py, f64>,
    check: bool,
    nthread: Option<usize>,
) -> PyResult<(
    Bound<'py, PyArray1<i64>>,
    Bound<'py, PyArray1<i64>>,
    Bound<'py, PyArray1<f64>>,
    usize,
    usize,
)> {
    let a = Coo::from_parts(
        nrows,
        ncols,
        row.as_slice()?.to_vec(),
        col.as_slice()?.to_vec(),
        data.as_slice()?.to_vec(),
        check,
    )
    .map_err(PyErr::new::<PyValueError, _>)?;
    let opts = GroupOptions::from_env_with(nthread, 0);
    let c = py.detach(|| coo_to_csr(&a, &opts)).map_err(to_py_err)?;
    Ok((
        PyArray1::from_vec(py, c.indptr),
        PyArray1::from_vec(py, c.indices),
        PyArray1::from_vec(py, c.data),
        c.nrows,
        c.ncols,
    ))
}

#[pyfunction]
#[pyo3(signature = (nrows, ncols, indptr, indices, data, check=true, nthread=None))]
pub(crate) fn csr_to_csc_from_parts<'py>(
    py: Python<'py>,
    nrows: usize,
    ncols: usize,
    indptr: PyReadonlyArray1<'py, i64>,
    indices: PyReadonlyArray1<'py, i64>,
    data: PyReadonlyArray1<'py, f64>,
    check: bool,
    nthread: Option<usize>,
) -> PyResult<(
    Bound<'py, PyArray1<i64>>,
    Bound<'py, PyArray1<i64>>,
    Bound<'py, PyArray1<f64>>,
    usize,
    usize,
)> {
    let a = Csr::from_parts(
        nrows,
        ncols,
        indptr.as_slice()?.to_vec(),
        indices.as_slice()?.to_vec(),
        data.as_slice()?.to_vec(),
        check,
    )
    .map_err(PyErr::new::<PyValueError, _>)?;
    let opts = GroupOptions::from_env_with(nthread, 0);
    let c = py.detach(|| csr_to_csc(&a, &opts)).map_err(to_py_err)?;
    Ok((
        PyArray1::from_vec(py, c.indptr),
        PyArray1::from_vec(py, c.indices),
        PyArray1::from_vec(py, c.data),
        c.nrows,
        c.ncols,
    ))
}
