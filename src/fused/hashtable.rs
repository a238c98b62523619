//! Open-addressing hash index over the slot buffer.
//!
//! Linear probing: a key lives on the probe sequence starting at its home
//! slot, never past the first empty slot. Deletion is tombstone-free — a
//! vacated slot is closed by sliding later entries of the chain backward
//! (backshift), fixing up their recency links as they move.

use super::layout::{Geometry, KEY, LEFT, NIL, RIGHT};

/// Walk the probe sequence for `key`. Returns the slot index on a match,
/// or `None` once an empty slot is reached or the whole table has been
/// visited.
#[inline]
pub fn lookup(buf: &[i32], geo: Geometry, key: i32) -> Option<i32> {
    let mut off = geo.home_slot(key);
    for _ in 0..geo.table_capacity() {
        let k = buf[off as usize + KEY];
        if k == NIL {
            return None;
        }
        if k == key {
            return Some(off);
        }
        off = geo.next(off);
    }
    None
}

/// First empty slot on `key`'s probe sequence.
///
/// The table always holds at least one empty slot (capacity exceeds the
/// logical cache size), so the walk must land within `capacity` steps.
#[inline]
pub fn find_free(buf: &[i32], geo: Geometry, key: i32) -> i32 {
    let mut off = geo.home_slot(key);
    for _ in 0..geo.table_capacity() {
        if buf[off as usize + KEY] == NIL {
            return off;
        }
        off = geo.next(off);
    }
    unreachable!("probe sequence exhausted without reaching an empty slot");
}

/// Close the gap at `free` after its entry has been unlinked from the
/// recency list.
///
/// Walks forward from `free`; an occupied slot at `pos` may move backward
/// only if its home slot stays reachable from the new position:
/// no wrap between `free` and `pos` means `home <= free || home > pos`,
/// wrap means `pos < home <= free`. Each relocation copies all four
/// fields and redirects the recency neighbors (and `head`/`tail` when the
/// entry sat at either end) to the new slot. Stops at the first empty
/// slot and retires the final gap.
pub fn backshift(buf: &mut [i32], geo: Geometry, head: &mut i32, tail: &mut i32, mut free: i32) {
    let mut pos = geo.next(free);
    loop {
        let k = buf[pos as usize + KEY];
        if k == NIL {
            break;
        }
        let home = geo.home_slot(k);
        let should_move = if free <= pos {
            home <= free || home > pos
        } else {
            home <= free && home > pos
        };
        if should_move {
            buf.copy_within(pos as usize..pos as usize + 4, free as usize);

            let left = buf[free as usize + LEFT];
            let right = buf[free as usize + RIGHT];
            if left != NIL {
                buf[left as usize + RIGHT] = free;
            } else {
                *head = free;
            }
            if right != NIL {
                buf[right as usize + LEFT] = free;
            } else {
                *tail = free;
            }

            free = pos;
        }
        pos = geo.next(pos);
    }
    buf[free as usize + KEY] = NIL;
}
