//! Slot geometry and construction-time sizing.
//!
//! A slot is four consecutive i32s (key, value, left, right). A slot's
//! index is the absolute offset of its first field in the buffer, so every
//! slot index is a multiple of 4 and pointer arithmetic happens on raw
//! offsets. The buffer length is a power of two, which turns both the hash
//! fold and the probe advance into single mask operations.

use crate::error::CacheError;

/// Reserved marker: absent key, null recency link, empty list endpoint.
pub const NIL: i32 = -1;

/// Load factor used when callers have no reason to pick their own.
pub const DEFAULT_LOAD_FACTOR: f32 = 0.66;

/// Field offsets within a slot.
pub const KEY: usize = 0;
pub const VALUE: usize = 1;
pub const LEFT: usize = 2;
pub const RIGHT: usize = 3;

/// Ints per slot.
pub const SLOT_INTS: i32 = 4;

/// Largest permitted table capacity. Slot indices and the left/right link
/// fields are i32, so `capacity * 4` must stay i32-addressable.
pub const MAX_TABLE_CAPACITY: u64 = 1 << 28;

/// Precomputed masks for one table size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    /// `capacity - 1`; folds a mixed hash to a slot number.
    pub slot_mask: i32,
    /// `capacity * 4 - 1`; wraps an absolute offset advancing by 4.
    pub offset_mask: i32,
}

impl Geometry {
    /// Size the table for `cache_size` logical entries at `load_factor`.
    ///
    /// Capacity is the smallest power of two >= ceil(cache_size /
    /// load_factor). Because the load factor is below 1, capacity always
    /// exceeds `cache_size`, so a probe walk is guaranteed to reach an
    /// empty slot.
    pub fn for_cache(cache_size: i32, load_factor: f32) -> Result<Geometry, CacheError> {
        if cache_size < 2 {
            return Err(CacheError::CacheSizeTooSmall { got: cache_size });
        }
        if !(load_factor > 0.0 && load_factor < 1.0) {
            return Err(CacheError::LoadFactorOutOfRange { got: load_factor });
        }
        let desired = (f64::from(cache_size) / f64::from(load_factor)).ceil() as u64;
        if desired > MAX_TABLE_CAPACITY {
            return Err(CacheError::CapacityOverflow { required: desired });
        }
        let capacity = desired.next_power_of_two();
        Ok(Geometry {
            slot_mask: (capacity - 1) as i32,
            offset_mask: (capacity * SLOT_INTS as u64 - 1) as i32,
        })
    }

    /// Number of slots in the table.
    #[inline(always)]
    pub fn table_capacity(self) -> i32 {
        self.slot_mask + 1
    }

    /// Buffer length in ints.
    #[inline(always)]
    pub fn buf_len(self) -> usize {
        (self.offset_mask + 1) as usize
    }

    /// Home slot for `key`: Fibonacci multiplicative mix, folded to a slot
    /// number and scaled to an absolute offset. The multiply wraps mod 2^32.
    #[inline(always)]
    pub fn home_slot(self, key: i32) -> i32 {
        let h = (key as u32).wrapping_mul(0x9E37_79B9);
        let h = h ^ (h >> 16);
        ((h & self.slot_mask as u32) as i32) * SLOT_INTS
    }

    /// Next offset in a probe sequence.
    #[inline(always)]
    pub fn next(self, offset: i32) -> i32 {
        (offset + SLOT_INTS) & self.offset_mask
    }
}
