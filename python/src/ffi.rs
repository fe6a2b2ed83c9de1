//! `State` class and helpers exposed to the Python exporter.
//!
//! The class keeps the method names the exporter already calls, so it can
//! replace a pure-Python state object without touching call sites.

use std::collections::BTreeMap;
use std::path::PathBuf;

use pyo3::exceptions::{PyOSError, PyValueError};
use pyo3::prelude::*;

use hourly_counter_core::config::StoreConfig;
use hourly_counter_core::logging::init_tracing;
use hourly_counter_core::snapshot::GroupPath;
use hourly_counter_core::store::StateStore;
use hourly_counter_core::types::StateError;

use crate::convert::{json_to_py, py_to_json};

pub fn register(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyState>()?;
    m.add_function(wrap_pyfunction!(init_logging, m)?)?;
    Ok(())
}

fn to_py_err(e: StateError) -> PyErr {
    match &e {
        StateError::Io { .. } => PyOSError::new_err(e.to_string()),
        _ => PyValueError::new_err(e.to_string()),
    }
}

/// Install the Rust log subscriber. Defaults to `LOG_LEVEL`.
#[pyfunction]
#[pyo3(signature = (level=None))]
fn init_logging(level: Option<&str>) -> bool {
    match level {
        Some(level) => init_tracing(level),
        None => init_tracing(&StoreConfig::from_env().log_level),
    }
}

/// Durable cumulative counter state.
///
/// Mutating methods need an exclusive borrow of the object, so concurrent
/// Python threads calling them on one instance get a runtime error instead
/// of a corrupted tree.
#[pyclass(name = "State", module = "hourly_counter")]
pub struct PyState {
    inner: StateStore,
}

#[pymethods]
impl PyState {
    /// Open the state image at `path`, or at `STATE_PATH` when omitted.
    #[new]
    #[pyo3(signature = (path=None))]
    fn new(path: Option<PathBuf>) -> Self {
        let inner = match path {
            Some(path) => StateStore::load(path),
            None => StoreConfig::from_env().open_store(),
        };
        Self { inner }
    }

    /// Fold one snapshot pair and persist. Returns the net increment.
    #[pyo3(signature = (state_key, current_hour_values, previous_hour_values=None))]
    fn update(
        &mut self,
        state_key: &str,
        current_hour_values: &Bound<'_, PyAny>,
        previous_hour_values: Option<&Bound<'_, PyAny>>,
    ) -> PyResult<u64> {
        let current = py_to_json(current_hour_values)?;
        let previous = previous_hour_values.map(py_to_json).transpose()?;
        let report = self
            .inner
            .update(state_key, &current, previous.as_ref())
            .map_err(to_py_err)?;
        Ok(report.increment)
    }

    fn get_time(&self, name: &str) -> Option<String> {
        self.inner.time(name).map(str::to_string)
    }

    fn update_time(&mut self, name: &str, time_str: &str) -> PyResult<()> {
        self.inner.update_time(name, time_str).map_err(to_py_err)
    }

    fn get_cache(&self, py: Python<'_>, name: &str, default: &Bound<'_, PyAny>) -> PyResult<PyObject> {
        match self.inner.tree().cache.get(name) {
            Some(value) => json_to_py(py, value),
            None => Ok(default.clone().unbind()),
        }
    }

    fn set_cache(&mut self, name: &str, obj: &Bound<'_, PyAny>) -> PyResult<()> {
        let value = py_to_json(obj)?;
        self.inner.set_cached(name, value).map_err(to_py_err)
    }

    /// Cumulative counter of leaf `key` in group `group_key`, 0 if unseen.
    fn get_counter(&self, group_key: &str, key: &str) -> u64 {
        self.inner.counter_at(group_key, key)
    }

    /// Tag -> counter for the breakdown group `<group_key>_<item_key>`,
    /// e.g. `item_key="countryMap_requests"`.
    fn get_map_counter(&self, group_key: &str, item_key: &str) -> BTreeMap<String, u64> {
        self.inner
            .group_counters(&GroupPath::root(group_key).field(item_key))
    }

    fn persist(&self) -> PyResult<()> {
        self.inner.persist().map_err(to_py_err)
    }

    fn __repr__(&self) -> String {
        let path = self
            .inner
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<memory>".to_string());
        format!(
            "State(path={:?}, groups={}, leaves={})",
            path,
            self.inner.tree().group_count(),
            self.inner.tree().leaf_count()
        )
    }
}
