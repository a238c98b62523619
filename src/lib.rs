//! Integer-keyed LRU cache that fuses an open-addressing hash table and a
//! doubly-linked recency list into one contiguous `i32` buffer.
//!
//! A single probe sequence both resolves a key and exposes the adjacency
//! pointers needed to splice the entry to the recency-list tail; deletion
//! is tombstone-free via backshift. No per-entry allocation, no work on
//! the hot path beyond the probe itself.
//!
//! ```
//! use _fused_lru_rs::{FusedLru, DEFAULT_LOAD_FACTOR, NIL};
//!
//! let mut cache = FusedLru::new(3, DEFAULT_LOAD_FACTOR)?;
//! assert_eq!(cache.put(1, 10), NIL);
//! assert_eq!(cache.get(1), 10);
//! assert_eq!(cache.get(2), NIL);
//! # Ok::<(), _fused_lru_rs::CacheError>(())
//! ```

mod error;
mod fused;

#[cfg(feature = "python")]
mod python;

pub use error::CacheError;
pub use fused::layout::{DEFAULT_LOAD_FACTOR, NIL};
pub use fused::FusedLru;

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
fn _fused_lru_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<python::FusedLruCache>()?;
    Ok(())
}
