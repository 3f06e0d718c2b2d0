#![allow(
    clippy::type_complexity,
    reason = "pyo3 functions often return tuples of arrays and sizes"
)]
#![allow(
    clippy::too_many_arguments,
    reason = "Python-exposed functions map directly to multiple array arguments"
)]
#![allow(
    clippy::needless_pass_by_value,
    reason = "PyReadonlyArray types are thin wrappers passed by value in pyo3 idioms"
)]
#![allow(
    clippy::elidable_lifetime_names,
    reason = "Explicit 'py lifetimes are idiomatic and clear in PyO3 function signatures"
)]
use pyo3::prelude::*;
use pyo3::types::PyModule;

mod functions;

use functions::{coo_to_csr_from_parts, csr_to_csc_from_parts, group_by_key};

#[pymodule]
fn _core(m: &Bound<PyModule>) -> PyResult<()> {
    m.add("version", env!("CARGO_PKG_VERSION"))?;
    m.add_function(wrap_pyfunction!(group_by_key, m)?)?;
    m.add_function(wrap_pyfunction!(coo_to_csr_from_parts, m)?)?;
    m.add_function(wrap_pyfunction!(csr_to_csc_from_parts, m)?)?;
    Ok(())
}
