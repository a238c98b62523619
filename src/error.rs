//! Construction-time errors.
//!
//! Hot-path operations never fail; absence is reported in-band via the
//! sentinel. Everything that can go wrong is rejected up front.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum CacheError {
    /// A cache smaller than two entries has no recency order to maintain.
    #[error("cache size must be at least 2, got {got}")]
    CacheSizeTooSmall { got: i32 },

    /// The load factor scales the table; 0 and 1 are both degenerate.
    #[error("load factor must be in (0, 1), got {got}")]
    LoadFactorOutOfRange { got: f32 },

    /// Slot indices and link fields are i32, so the table cannot grow past
    /// the i32-addressable range.
    #[error("required table capacity {required} exceeds the i32-addressable bound")]
    CapacityOverflow { required: u64 },
}
