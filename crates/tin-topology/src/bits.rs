//! The packed 32-bit edge-constraint word (spec.md §3's bit table).
//!
//! Kept exactly as documented — this layout is externally observable through
//! the wire format and the property tests in spec.md §8.6 ("the 2024 fix") —
//! so this module is the single place that knows the bit offsets; everything
//! else goes through the typed accessors below, never the raw `u32`
//! (Design Notes §9: "do not expose the raw word as part of the public API").

use tin_pool::{EdgePool, EdgeId};

const LOWER_INDEX_BITS: u32 = 15;
const LOWER_INDEX_MASK: u32 = (1 << LOWER_INDEX_BITS) - 1; // 0x7FFF
const LOWER_INDEX_UNSET: u32 = LOWER_INDEX_MASK; // all-ones sentinel, 32767

const LINE_INDEX_SHIFT: u32 = 15;
const LINE_INDEX_BITS: u32 = 12;
const LINE_INDEX_MASK: u32 = (1 << LINE_INDEX_BITS) - 1; // 0xFFF
const LINE_INDEX_UNSET: u32 = LINE_INDEX_MASK; // all-ones sentinel, 4095

const CONSTRAINED_BIT: u32 = 1 << 27;
const LINE_MEMBER_BIT: u32 = 1 << 28;
const REGION_MEMBER_BIT: u32 = 1 << 29;
const REGION_BORDER_BIT: u32 = 1 << 30;
const SYNTHETIC_BIT: u32 = 1 << 31;

/// Maximum representable region index (32766; `32767` is the unset sentinel).
pub const MAX_REGION_INDEX: i32 = (LOWER_INDEX_MASK - 1) as i32;
/// Maximum representable constraint-line index (4094; `4095` is the unset sentinel).
pub const MAX_LINE_INDEX: i32 = (LINE_INDEX_MASK - 1) as i32;

/// The constraint word a freshly-allocated edge must be reset to: both index
/// fields at their unset sentinel, every flag clear. `tin-pool::allocate`
/// zeroes the word (it doesn't know this layout), which would otherwise
/// decode as "region index 0" rather than "no index" — every caller that
/// allocates a quad-edge pair must call [`init_constraint_word`] on both
/// sides immediately after.
pub const UNSET_WORD: u32 = LOWER_INDEX_UNSET | (LINE_INDEX_UNSET << LINE_INDEX_SHIFT);

pub fn init_constraint_word(pool: &mut EdgePool, e: EdgeId) {
    set_word(pool, e, UNSET_WORD);
}

fn word(pool: &EdgePool, e: EdgeId) -> u32 {
    pool.constraint_word(e)
}

fn set_word(pool: &mut EdgePool, e: EdgeId, w: u32) {
    pool.set_constraint_word(e, w);
}

pub fn is_constrained(pool: &EdgePool, e: EdgeId) -> bool {
    word(pool, e) & CONSTRAINED_BIT != 0
}

pub fn set_constrained(pool: &mut EdgePool, e: EdgeId, value: bool) {
    let mut w = word(pool, e);
    if value {
        w |= CONSTRAINED_BIT;
    } else {
        w &= !CONSTRAINED_BIT;
    }
    set_word(pool, e, w);
}

pub fn is_line_member(pool: &EdgePool, e: EdgeId) -> bool {
    word(pool, e) & LINE_MEMBER_BIT != 0
}

pub fn is_region_member(pool: &EdgePool, e: EdgeId) -> bool {
    word(pool, e) & REGION_MEMBER_BIT != 0
}

pub fn is_region_border(pool: &EdgePool, e: EdgeId) -> bool {
    word(pool, e) & REGION_BORDER_BIT != 0
}

pub fn is_synthetic(pool: &EdgePool, e: EdgeId) -> bool {
    word(pool, e) & SYNTHETIC_BIT != 0
}

pub fn set_synthetic(pool: &mut EdgePool, e: EdgeId, value: bool) {
    let mut w = word(pool, e);
    if value {
        w |= SYNTHETIC_BIT;
    } else {
        w &= !SYNTHETIC_BIT;
    }
    set_word(pool, e, w);
}

/// `None` means "unset" (the all-ones sentinel), matching spec.md's wording.
pub fn line_index(pool: &EdgePool, e: EdgeId) -> Option<i32> {
    let raw = (word(pool, e) >> LINE_INDEX_SHIFT) & LINE_INDEX_MASK;
    if raw == LINE_INDEX_UNSET {
        None
    } else {
        Some(raw as i32)
    }
}

/// Sets the constraint-line index and `LINE_MEMBER`. Passing `-1` clears the
/// index back to the unset sentinel (symmetric with
/// [`set_region_border_index`]'s `-1` semantics) but, unlike the border
/// index, also clears `LINE_MEMBER` — a line either has an index or it isn't
/// a line member at all; there is no documented "flag survives a cleared
/// index" case for lines the way spec.md §9 Open Question 2 calls out for
/// borders.
pub fn set_line_index(pool: &mut EdgePool, e: EdgeId, index: i32) {
    let mut w = word(pool, e) & !(LINE_INDEX_MASK << LINE_INDEX_SHIFT);
    if index < 0 {
        w |= LINE_INDEX_UNSET << LINE_INDEX_SHIFT;
        w &= !LINE_MEMBER_BIT;
    } else {
        debug_assert!(index <= MAX_LINE_INDEX, "line index out of 12-bit range");
        w |= (index as u32 & LINE_INDEX_MASK) << LINE_INDEX_SHIFT;
        w |= LINE_MEMBER_BIT;
    }
    set_word(pool, e, w);
}

/// The "lower index" field read as a region border index. `None` if unset
/// *or* if the edge currently holds a region-interior index instead (callers
/// should check [`is_region_border`] first to disambiguate which
/// interpretation of the shared field applies).
pub fn region_border_index(pool: &EdgePool, e: EdgeId) -> Option<i32> {
    let raw = word(pool, e) & LOWER_INDEX_MASK;
    if raw == LOWER_INDEX_UNSET {
        None
    } else {
        Some(raw as i32)
    }
}

pub fn region_interior_index(pool: &EdgePool, e: EdgeId) -> Option<i32> {
    region_border_index(pool, e)
}

/// Sets the region-border index, implying `REGION_BORDER`, `REGION_MEMBER`,
/// and `CONSTRAINED` (spec.md §3: "implies REGION_MEMBER and CONSTRAINED").
///
/// Passing `-1` clears the index field back to the unset sentinel **but
/// preserves every flag bit**, matching spec.md §9 Open Question 2's
/// documented Java behaviour ("the 2024 fix" tested in §8.6 refers to the two
/// index fields not disturbing each other, not to this clearing rule, which
/// predates it and must still be preserved for wire-format test stability).
pub fn set_region_border_index(pool: &mut EdgePool, e: EdgeId, index: i32) {
    let mut w = word(pool, e) & !LOWER_INDEX_MASK;
    if index < 0 {
        w |= LOWER_INDEX_UNSET;
    } else {
        debug_assert!(index <= MAX_REGION_INDEX, "region index out of 15-bit range");
        w |= index as u32 & LOWER_INDEX_MASK;
        w |= REGION_BORDER_BIT | REGION_MEMBER_BIT | CONSTRAINED_BIT;
    }
    set_word(pool, e, w);
}

/// Sets the region-interior index: sets `REGION_MEMBER` but *clears*
/// `CONSTRAINED` and `REGION_BORDER` (spec.md §4.3: interior region edges are
/// members but not constrained; border and interior are mutually exclusive
/// uses of the same shared field so this clears `REGION_BORDER` too).
pub fn set_region_interior_index(pool: &mut EdgePool, e: EdgeId, index: i32) {
    let mut w = word(pool, e) & !LOWER_INDEX_MASK;
    w &= !(REGION_BORDER_BIT | CONSTRAINED_BIT);
    if index < 0 {
        w |= LOWER_INDEX_UNSET;
        w &= !REGION_MEMBER_BIT;
    } else {
        debug_assert!(index <= MAX_REGION_INDEX, "region index out of 15-bit range");
        w |= index as u32 & LOWER_INDEX_MASK;
        w |= REGION_MEMBER_BIT;
    }
    set_word(pool, e, w);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tin_kernel::VertexId;

    fn edge() -> (EdgePool, EdgeId) {
        let mut pool = EdgePool::new();
        let e = pool.allocate(VertexId(0), VertexId(1));
        init_constraint_word(&mut pool, e);
        (pool, e)
    }

    #[test]
    fn line_index_and_border_index_coexist_independently() {
        let (mut pool, e) = edge();
        set_line_index(&mut pool, e, 7);
        set_region_border_index(&mut pool, e, 3);
        assert_eq!(line_index(&pool, e), Some(7));
        assert_eq!(region_border_index(&pool, e), Some(3));
        assert!(is_region_border(&pool, e));
        assert!(is_constrained(&pool, e));

        // Changing one must not disturb the other ("the 2024 fix", spec.md §8.6).
        set_line_index(&mut pool, e, 9);
        assert_eq!(region_border_index(&pool, e), Some(3));
        set_region_border_index(&mut pool, e, 5);
        assert_eq!(line_index(&pool, e), Some(9));
    }

    #[test]
    fn clearing_border_index_with_negative_one_preserves_flags() {
        let (mut pool, e) = edge();
        set_region_border_index(&mut pool, e, 4);
        assert!(is_region_border(&pool, e));
        set_region_border_index(&mut pool, e, -1);
        assert_eq!(region_border_index(&pool, e), None);
        assert!(is_region_border(&pool, e), "flags survive -1 per spec.md §9 Open Question 2");
        assert!(is_constrained(&pool, e));
        assert!(is_region_member(&pool, e));
    }

    #[test]
    fn region_interior_index_clears_constrained_and_border() {
        let (mut pool, e) = edge();
        set_region_border_index(&mut pool, e, 2);
        set_region_interior_index(&mut pool, e, 6);
        assert!(!is_constrained(&pool, e));
        assert!(!is_region_border(&pool, e));
        assert!(is_region_member(&pool, e));
        assert_eq!(region_interior_index(&pool, e), Some(6));
    }

    #[test]
    fn default_indices_are_unset() {
        let (pool, e) = edge();
        assert_eq!(line_index(&pool, e), None);
        assert_eq!(region_border_index(&pool, e), None);
        assert!(!is_constrained(&pool, e));
    }
}
