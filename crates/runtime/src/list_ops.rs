//! Growable Lists
//!
//! Payload layout:
//!
//! ```text
//! ┌───────┬────────┬────────┬─────┬────────┬───────────────────┐
//! │ count │ item 1 │ item 2 │ ... │ item N │ spare capacity ...│
//! └───────┴────────┴────────┴─────┴────────┴───────────────────┘
//!  word 0   word 1                  word N              word capacity
//! ```
//!
//! capacity = payload words - 1. The header's word count is capacity, not
//! length, so every operation re-derives the usable count as
//! `min(stored count, capacity)` before touching items.
//!
//! Appending past capacity allocates a larger copy. The old object is not
//! reclaimed, and the caller must switch to the returned reference.

use crate::context::PrimContext;
use crate::error::{PrimError, PrimResult};
use crate::selector::Selector;
use mbvm_core::{Arena, ObjClass, ObjRef, Ref};
use tracing::trace;

/// Capacity of a list created without an explicit size
pub const MIN_LIST_CAPACITY: usize = 2;

/// Bounds for the extra capacity added on each growth
pub const MIN_GROWTH: usize = 4;
pub const MAX_GROWTH: usize = 100;

/// The list behind `r`, or `NeedsList`
#[inline]
pub fn as_list(arena: &Arena, r: Ref) -> Result<ObjRef, PrimError> {
    match r.as_obj() {
        Some(obj) if arena.class_of(obj) == ObjClass::List => Ok(obj),
        _ => Err(PrimError::NeedsList),
    }
}

/// Item slots available without growing
#[inline]
pub fn capacity(arena: &Arena, list: ObjRef) -> usize {
    arena.payload_words(list).saturating_sub(1)
}

/// Usable item count: the stored count clamped to `0..=capacity`
pub fn count(arena: &Arena, list: ObjRef) -> usize {
    if arena.payload_words(list) == 0 {
        return 0;
    }
    let stored = match arena.field_at(list, 0) {
        Ref::Int(n) if n > 0 => n as usize,
        _ => 0,
    };
    stored.min(capacity(arena, list))
}

#[inline]
fn set_count(arena: &mut Arena, list: ObjRef, n: usize) {
    arena.field_set(list, 0, Ref::from_count(n));
}

/// Extra capacity added when a full list grows
#[inline]
pub fn growth_increment(capacity: usize) -> usize {
    (capacity / 3).clamp(MIN_GROWTH, MAX_GROWTH)
}

/// Items `1..=count` as references
pub fn items(arena: &Arena, list: ObjRef) -> Vec<Ref> {
    (1..=count(arena, list))
        .map(|i| arena.field_at(list, i))
        .collect()
}

// =============================================================================
// Construction
// =============================================================================

/// A list holding exactly `items`, with no spare capacity
pub fn make_list(arena: &mut Arena, items: &[Ref]) -> ObjRef {
    let list = arena.allocate(ObjClass::List, items.len() + 1, Ref::False);
    set_count(arena, list, items.len());
    for (i, &item) in items.iter().enumerate() {
        arena.field_set(list, i + 1, item);
    }
    list
}

/// An empty list with room for `capacity` items (at least
/// [`MIN_LIST_CAPACITY`]); spare slots hold integer 0
pub fn new_list(arena: &mut Arena, capacity: usize) -> ObjRef {
    let capacity = capacity.max(MIN_LIST_CAPACITY);
    arena.allocate(ObjClass::List, capacity + 1, Ref::ZERO)
}

// =============================================================================
// Operations
// =============================================================================

/// Append `item`, growing if full. Returns the list to use from now on,
/// which is a new object when growth happened.
pub fn add_last(arena: &mut Arena, list: Ref, item: Ref) -> PrimResult {
    let mut list = as_list(arena, list)?;
    let n = count(arena, list);
    let cap = capacity(arena, list);
    if n >= cap {
        let new_cap = cap + growth_increment(cap);
        list = arena.grow(list, new_cap + 1, Ref::ZERO);
        trace!(old_capacity = cap, new_capacity = new_cap, "list grown");
    }
    arena.field_set(list, n + 1, item);
    set_count(arena, list, n + 1);
    Ok(Ref::Obj(list))
}

/// Delete by index, `"last"`, or `"all"`
pub fn delete(arena: &mut Arena, list: Ref, selector: Ref) -> PrimResult {
    let list = as_list(arena, list)?;
    let n = count(arena, list);

    match Selector::parse(arena, selector) {
        Some(Selector::All) => {
            let end = arena.payload_words(list);
            arena.fill_fields(list, 0..end, Ref::ZERO);
        }
        Some(Selector::Last) => {
            if n > 0 {
                arena.field_set(list, n, Ref::ZERO);
                set_count(arena, list, n - 1);
            }
        }
        Some(Selector::Index(i)) => {
            if i < 1 || i as usize > n {
                return Err(PrimError::IndexOutOfRange);
            }
            let i = i as usize;
            arena.copy_fields(list, i + 1, list, i, n - i);
            arena.field_set(list, n, Ref::ZERO);
            set_count(arena, list, n - 1);
        }
        Some(Selector::Random) | None => return Err(PrimError::NeedsInteger),
    }
    Ok(Ref::False)
}

/// Item at a selector (index, `"last"`, `"random"`)
pub fn at(ctx: &mut PrimContext, list: ObjRef, selector: Selector) -> PrimResult {
    let n = count(&ctx.arena, list);
    let i = selector.resolve(ctx, n)?;
    Ok(ctx.arena.field_at(list, i))
}

/// Store at a selector; `"all"` overwrites items `1..=count`. `"random"`
/// is not a store target.
pub fn at_put(ctx: &mut PrimContext, list: ObjRef, selector: Selector, value: Ref) -> PrimResult {
    let n = count(&ctx.arena, list);
    if selector == Selector::Random {
        return Err(PrimError::NeedsIntegerIndex);
    }
    if selector == Selector::All {
        ctx.arena.fill_fields(list, 1..n + 1, value);
        return Ok(Ref::False);
    }
    let i = selector.resolve(ctx, n)?;
    ctx.arena.field_set(list, i, value);
    Ok(Ref::False)
}

/// Overwrite every item slot, including spare capacity. The count is kept.
pub fn fill(arena: &mut Arena, list: ObjRef, value: Ref) {
    let end = arena.payload_words(list);
    if end > 1 {
        arena.fill_fields(list, 1..end, value);
    }
}

/// Items `first..=last` (1-based, clamped) as a new list with no spare
/// capacity. `last` defaults to the count.
pub fn copy_from_to(arena: &mut Arena, list: ObjRef, first: i32, last: Option<i32>) -> ObjRef {
    let n = count(arena, list) as i64;
    let first = (first as i64).max(1);
    let last = last.map_or(n, |e| (e as i64).min(n));
    let len = (last - first + 1).max(0) as usize;

    let result = arena.allocate(ObjClass::List, len + 1, Ref::ZERO);
    set_count(arena, result, len);
    if len > 0 {
        arena.copy_fields(list, first as usize, result, 1, len);
    }
    result
}

/// Concatenate lists into a new list sized exactly to the total count
pub fn join_lists(arena: &mut Arena, lists: &[ObjRef]) -> ObjRef {
    let total: usize = lists.iter().map(|&l| count(arena, l)).sum();
    let result = arena.allocate(ObjClass::List, total + 1, Ref::ZERO);
    set_count(arena, result, total);
    let mut dst = 1;
    for &list in lists {
        let n = count(arena, list);
        arena.copy_fields(list, 1, result, dst, n);
        dst += n;
    }
    result
}
