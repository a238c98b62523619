//! Fused LRU cache core.
//!
//! `FusedLru` folds an open-addressing hash table and a doubly-linked
//! recency list into one contiguous i32 buffer: each slot carries its key,
//! value, and both recency links, so the probe that resolves a key also
//! exposes the pointers needed to splice the entry to the list tail.

pub mod hashtable;
pub mod layout;
pub mod ordering;

use crate::error::CacheError;
use layout::{Geometry, KEY, NIL, VALUE};

/// Integer-keyed LRU cache over a single flat buffer.
///
/// Keys are `[0, i32::MAX]`; `-1` is the reserved sentinel and doubles as
/// the "absent" return value of [`get`](FusedLru::get),
/// [`peek`](FusedLru::peek), [`remove`](FusedLru::remove) and the
/// "no prior value" return of [`put`](FusedLru::put). All storage is
/// allocated once at construction; nothing is freed until drop.
pub struct FusedLru {
    buf: Box<[i32]>,
    geo: Geometry,
    cache_size: i32,
    size: i32,
    head: i32,
    tail: i32,
}

impl FusedLru {
    /// Build a cache holding up to `cache_size` entries.
    ///
    /// The hash table is over-allocated by `1 / load_factor` (rounded up
    /// to a power of two) to keep probe chains short; eviction still fires
    /// at `cache_size`.
    pub fn new(cache_size: i32, load_factor: f32) -> Result<FusedLru, CacheError> {
        let geo = Geometry::for_cache(cache_size, load_factor)?;
        Ok(FusedLru {
            buf: vec![NIL; geo.buf_len()].into_boxed_slice(),
            geo,
            cache_size,
            size: 0,
            head: NIL,
            tail: NIL,
        })
    }

    /// Insert or update `key`, making it the most recently used entry.
    ///
    /// Returns the previous value, or `NIL` if the key was absent. When
    /// the cache is full and the key is new, the least recently used
    /// entry is evicted first.
    ///
    /// # Panics
    /// Panics on a negative key: the sentinel (and with it the whole
    /// negative range) is reserved, and writing it would corrupt the
    /// table.
    pub fn put(&mut self, key: i32, value: i32) -> i32 {
        assert!(key >= 0, "keys must be non-negative, got {key}");
        debug_assert!(self.size <= self.cache_size);

        let mut off = self.geo.home_slot(key);
        for _ in 0..self.geo.table_capacity() {
            let k = self.buf[off as usize + KEY];
            if k == key {
                let prev = self.buf[off as usize + VALUE];
                self.buf[off as usize + VALUE] = value;
                ordering::move_to_tail(&mut self.buf, &mut self.head, &mut self.tail, off);
                return prev;
            }
            if k == NIL {
                if self.size == self.cache_size {
                    self.evict_lru();
                    // Backshift may have slid entries into the slot just
                    // found; the probe state is stale. Restart from the
                    // home slot.
                    off = hashtable::find_free(&self.buf, self.geo, key);
                }
                self.write_new_entry(off, key, value);
                return NIL;
            }
            off = self.geo.next(off);
        }
        unreachable!("probe sequence exhausted without a match or an empty slot");
    }

    /// Look up `key`, refreshing it to most recently used on a hit.
    /// Returns the value, or `NIL` if absent.
    pub fn get(&mut self, key: i32) -> i32 {
        if key < 0 {
            // The sentinel would match every empty slot; negatives are
            // simply never stored.
            return NIL;
        }
        match hashtable::lookup(&self.buf, self.geo, key) {
            Some(off) => {
                ordering::move_to_tail(&mut self.buf, &mut self.head, &mut self.tail, off);
                self.buf[off as usize + VALUE]
            }
            None => NIL,
        }
    }

    /// Look up `key` without touching its recency. Returns the value, or
    /// `NIL` if absent.
    pub fn peek(&self, key: i32) -> i32 {
        if key < 0 {
            return NIL;
        }
        match hashtable::lookup(&self.buf, self.geo, key) {
            Some(off) => self.buf[off as usize + VALUE],
            None => NIL,
        }
    }

    /// Remove `key`, returning its value or `NIL` if absent.
    pub fn remove(&mut self, key: i32) -> i32 {
        if key < 0 {
            return NIL;
        }
        let Some(off) = hashtable::lookup(&self.buf, self.geo, key) else {
            return NIL;
        };
        let value = self.buf[off as usize + VALUE];
        ordering::unlink(&mut self.buf, &mut self.head, &mut self.tail, off);
        hashtable::backshift(&mut self.buf, self.geo, &mut self.head, &mut self.tail, off);
        self.size -= 1;
        value
    }

    /// Drop every entry. Storage is retained for reuse.
    pub fn clear(&mut self) {
        self.buf.fill(NIL);
        self.size = 0;
        self.head = NIL;
        self.tail = NIL;
    }

    /// Number of entries currently held.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.size as usize
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Logical capacity: the entry count at which eviction fires.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.cache_size as usize
    }

    /// Evict the least recently used entry to make room for a new one.
    fn evict_lru(&mut self) {
        let victim = self.head;
        debug_assert_ne!(victim, NIL);
        ordering::unlink(&mut self.buf, &mut self.head, &mut self.tail, victim);
        hashtable::backshift(&mut self.buf, self.geo, &mut self.head, &mut self.tail, victim);
        self.size -= 1;
    }

    /// Write `(key, value)` into the empty slot `off` and link it at the
    /// recency tail.
    fn write_new_entry(&mut self, off: i32, key: i32, value: i32) {
        self.buf[off as usize + KEY] = key;
        self.buf[off as usize + VALUE] = value;
        ordering::push_tail(&mut self.buf, &mut self.head, &mut self.tail, off);
        self.size += 1;
    }
}

#[cfg(test)]
mod tests {
    use hashbrown::HashSet;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::layout::{DEFAULT_LOAD_FACTOR, KEY, LEFT, RIGHT};
    use super::*;

    /// Check every structural invariant: size bounds, slot census, list
    /// integrity in both directions, key uniqueness, and linear-probing
    /// reachability of every stored key.
    fn assert_invariants(c: &FusedLru) {
        assert!(c.size >= 0 && c.size <= c.cache_size);

        // Exactly `size` occupied slots.
        let cap = c.geo.table_capacity();
        let occupied = (0..cap)
            .filter(|s| c.buf[(s * 4) as usize + KEY] != NIL)
            .count();
        assert_eq!(occupied, c.size as usize);

        // Forward walk: visits `size` distinct slots, left links mirror
        // the walk, ends at tail.
        let mut forward = Vec::new();
        let mut prev = NIL;
        let mut cur = c.head;
        while cur != NIL {
            assert!(
                forward.len() < c.size as usize + 1,
                "recency list longer than size (cycle?)"
            );
            assert_eq!(c.buf[cur as usize + LEFT], prev);
            assert_ne!(c.buf[cur as usize + KEY], NIL, "empty slot on recency list");
            forward.push(cur);
            prev = cur;
            cur = c.buf[cur as usize + RIGHT];
        }
        assert_eq!(prev, c.tail);
        assert_eq!(forward.len(), c.size as usize);

        // Reverse walk mirrors the forward walk.
        let mut cur = c.tail;
        let mut i = forward.len();
        while cur != NIL {
            i -= 1;
            assert_eq!(cur, forward[i]);
            cur = c.buf[cur as usize + LEFT];
        }
        assert_eq!(i, 0);

        // Every occupied slot is on the list, keys are unique, and each
        // key's probe walk reaches its slot before any empty slot.
        let on_list: HashSet<i32> = forward.iter().copied().collect();
        let mut keys = HashSet::new();
        for s in 0..cap {
            let off = s * 4;
            let k = c.buf[off as usize + KEY];
            if k == NIL {
                continue;
            }
            assert!(keys.insert(k), "duplicate key {k}");
            assert!(on_list.contains(&off), "occupied slot {off} not on recency list");

            let mut p = c.geo.home_slot(k);
            let mut steps = 0;
            loop {
                assert!(steps < cap, "key {k} not on its probe chain");
                assert_ne!(
                    c.buf[p as usize + KEY],
                    NIL,
                    "key {k} hidden behind an empty slot"
                );
                if p == off {
                    break;
                }
                p = c.geo.next(p);
                steps += 1;
            }
        }
    }

    /// Keys in LRU -> MRU order, by walking the list.
    fn lru_order(c: &FusedLru) -> Vec<i32> {
        let mut order = Vec::new();
        let mut cur = c.head;
        while cur != NIL {
            order.push(c.buf[cur as usize + KEY]);
            cur = c.buf[cur as usize + RIGHT];
        }
        order
    }

    fn cache(cache_size: i32) -> FusedLru {
        FusedLru::new(cache_size, DEFAULT_LOAD_FACTOR).unwrap()
    }

    #[test]
    fn recency_walk_matches_access_order() {
        let mut c = cache(3);
        c.put(1, 10);
        c.put(2, 20);
        c.put(3, 30);
        assert_eq!(lru_order(&c), [1, 2, 3]);

        c.get(1);
        assert_eq!(lru_order(&c), [2, 3, 1]);

        // Overwrite also refreshes.
        c.put(2, 21);
        assert_eq!(lru_order(&c), [3, 1, 2]);

        // Peek does not.
        c.peek(3);
        assert_eq!(lru_order(&c), [3, 1, 2]);
        assert_invariants(&c);
    }

    #[test]
    fn eviction_takes_the_list_head() {
        let mut c = cache(3);
        for k in 1..=3 {
            c.put(k, k * 10);
        }
        c.put(4, 40);
        assert_eq!(lru_order(&c), [2, 3, 4]);
        assert_eq!(c.peek(1), NIL);
        assert_invariants(&c);
    }

    #[test]
    fn collision_chain_survives_middle_removal() {
        let mut c = FusedLru::new(3, 0.75).unwrap();
        assert_eq!(c.geo.table_capacity(), 4);

        // Three keys sharing one home slot fill a single probe chain.
        let home = c.geo.home_slot(0);
        let keys: Vec<i32> = (0..)
            .filter(|&k| c.geo.home_slot(k) == home)
            .take(3)
            .collect();
        for (i, &k) in keys.iter().enumerate() {
            c.put(k, i as i32);
        }
        assert_invariants(&c);

        assert_eq!(c.remove(keys[1]), 1);
        assert_invariants(&c);
        assert_eq!(c.peek(keys[0]), 0);
        assert_eq!(c.peek(keys[2]), 2);
    }

    #[test]
    fn clear_resets_every_slot_to_the_sentinel() {
        let mut c = cache(3);
        for k in 0..10 {
            c.put(k, k);
        }
        c.clear();
        assert!(c.buf.iter().all(|&w| w == NIL));
        assert_eq!((c.head, c.tail, c.size), (NIL, NIL, 0));
        assert!(c.is_empty());
        assert_invariants(&c);

        // The structure is fully reusable afterwards.
        c.put(7, 70);
        assert_eq!(c.get(7), 70);
        assert_invariants(&c);
    }

    #[test]
    fn randomized_ops_preserve_invariants() {
        for &cache_size in &[3, 17] {
            let mut c = cache(cache_size);
            let mut rng = StdRng::seed_from_u64(0x5EED ^ cache_size as u64);
            for _ in 0..4000 {
                let key = rng.gen_range(0..cache_size * 4);
                match rng.gen_range(0..8) {
                    0..=3 => {
                        c.put(key, rng.gen());
                    }
                    4..=5 => {
                        c.get(key);
                    }
                    6 => {
                        c.peek(key);
                    }
                    _ => {
                        c.remove(key);
                    }
                }
                assert_invariants(&c);
            }
            c.clear();
            assert_invariants(&c);
        }
    }

    #[test]
    fn negative_keys_read_as_absent() {
        let mut c = cache(3);
        c.put(1, 10);
        assert_eq!(c.get(-1), NIL);
        assert_eq!(c.peek(-7), NIL);
        assert_eq!(c.remove(i32::MIN), NIL);
        assert_eq!(c.len(), 1);
    }

    #[test]
    #[should_panic(expected = "non-negative")]
    fn put_rejects_the_sentinel_key() {
        cache(3).put(NIL, 0);
    }
}
