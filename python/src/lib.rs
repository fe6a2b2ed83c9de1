//! hourly-counter-python
//!
//! Python bindings for hourly-counter-core (PyO3).

use pyo3::prelude::*;

mod convert;
mod ffi;

/// Python module entry point
#[pymodule]
fn hourly_counter(py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    ffi::register(py, m)?;
    Ok(())
}
