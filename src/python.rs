//! Python-facing wrapper around [`FusedLru`].
//!
//! The class is `frozen`; all mutation goes through an internal mutex so
//! shared references handed to Python stay sound.

use parking_lot::Mutex;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::{FusedLru, DEFAULT_LOAD_FACTOR};

/// Integer-keyed LRU cache. Reads and writes are i32; `-1` is the
/// reserved "absent" sentinel on every return channel.
#[pyclass(frozen)]
pub struct FusedLruCache {
    inner: Mutex<FusedLru>,
}

#[pymethods]
impl FusedLruCache {
    #[new]
    #[pyo3(signature = (cache_size, load_factor=DEFAULT_LOAD_FACTOR))]
    fn new(cache_size: i32, load_factor: f32) -> PyResult<Self> {
        let inner = FusedLru::new(cache_size, load_factor)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(FusedLruCache {
            inner: Mutex::new(inner),
        })
    }

    /// Insert or update a key, returning the previous value or -1.
    fn put(&self, key: i32, value: i32) -> PyResult<i32> {
        if key < 0 {
            return Err(PyValueError::new_err("keys must be non-negative"));
        }
        Ok(self.inner.lock().put(key, value))
    }

    /// Look up a key, refreshing its recency. Returns the value or -1.
    fn get(&self, key: i32) -> i32 {
        self.inner.lock().get(key)
    }

    /// Look up a key without touching its recency. Returns the value or -1.
    fn peek(&self, key: i32) -> i32 {
        self.inner.lock().peek(key)
    }

    /// Remove a key, returning its value or -1.
    fn remove(&self, key: i32) -> i32 {
        self.inner.lock().remove(key)
    }

    /// Drop every entry, keeping the allocated storage.
    fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Number of entries currently held.
    fn size(&self) -> usize {
        self.inner.lock().len()
    }

    /// Entry count at which eviction fires.
    fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    fn __len__(&self) -> usize {
        self.inner.lock().len()
    }

    fn __repr__(&self) -> String {
        let cache = self.inner.lock();
        format!(
            "FusedLruCache(size={}, capacity={})",
            cache.len(),
            cache.capacity()
        )
    }
}
