//! String operations
//!
//! Strings are immutable byte runs. Indexing and lengths count code points;
//! searching works on raw bytes and returns byte offsets.

use crate::context::PrimContext;
use crate::error::{PrimError, PrimResult};
use crate::selector::Selector;
use mbvm_core::{Arena, ObjClass, ObjRef, Ref, utf8};

/// The string behind `r`, or `None`
#[inline]
pub fn as_string(arena: &Arena, r: Ref) -> Option<ObjRef> {
    r.as_obj()
        .filter(|&obj| arena.class_of(obj) == ObjClass::String)
}

/// Code-point length
pub fn length(arena: &Arena, s: ObjRef) -> usize {
    utf8::count_code_points(&arena.string_bytes(s))
}

/// The code point at a selector, as a new one-code-point String
pub fn at(ctx: &mut PrimContext, s: ObjRef, selector: Selector) -> PrimResult {
    let bytes = ctx.arena.string_bytes(s);
    let n = utf8::count_code_points(&bytes);
    let i = selector.resolve(ctx, n)?;
    let range = utf8::code_point_range(&bytes, i, i);
    Ok(Ref::Obj(ctx.arena.new_string_from_bytes(&bytes[range])))
}

/// Code points `first..=last` (1-based, clamped) as a new String. `last`
/// defaults to the length.
pub fn copy_from_to(arena: &mut Arena, s: ObjRef, first: i32, last: Option<i32>) -> ObjRef {
    let bytes = arena.string_bytes(s);
    let n = utf8::count_code_points(&bytes) as i64;
    let first = (first as i64).max(1);
    let last = last.map_or(n, |e| (e as i64).min(n));
    if last < first {
        return arena.alloc_string(0);
    }
    let range = utf8::code_point_range(&bytes, first as usize, last as usize);
    arena.new_string_from_bytes(&bytes[range])
}

/// Text for a join item: string bytes, decimal integers, `true`/`false`
pub fn printed_bytes(arena: &Arena, r: Ref) -> Option<Vec<u8>> {
    match r {
        Ref::Int(n) => Some(n.to_string().into_bytes()),
        Ref::True => Some(b"true".to_vec()),
        Ref::False => Some(b"false".to_vec()),
        _ => as_string(arena, r).map(|s| arena.string_bytes(s)),
    }
}

/// Concatenate strings, integers and booleans into a new String
pub fn join_strings_of(arena: &mut Arena, parts: &[Ref]) -> PrimResult {
    let mut out = Vec::new();
    for &part in parts {
        let bytes = printed_bytes(arena, part).ok_or(PrimError::JoinArgsNotSameType)?;
        out.extend_from_slice(&bytes);
    }
    Ok(Ref::Obj(arena.new_string_from_bytes(&out)))
}

/// Join the items of `list` with `separator` between consecutive items.
/// A separator that is not a String counts as empty.
pub fn join_strings(arena: &mut Arena, items: &[Ref], separator: Option<Ref>) -> PrimResult {
    let sep = separator
        .and_then(|r| as_string(arena, r))
        .map(|s| arena.string_bytes(s))
        .unwrap_or_default();

    let mut out = Vec::new();
    for (i, &item) in items.iter().enumerate() {
        if i > 0 {
            out.extend_from_slice(&sep);
        }
        let bytes = printed_bytes(arena, item).ok_or(PrimError::NeedsString)?;
        out.extend_from_slice(&bytes);
    }
    Ok(Ref::Obj(arena.new_string_from_bytes(&out)))
}

/// 1-based byte offset of `needle` in `haystack` at or after `start`, or -1
pub fn find_in_string(needle: &[u8], haystack: &[u8], start: i32) -> i32 {
    let start = start.max(1) as usize;
    if start > haystack.len() {
        return -1;
    }
    let from = start - 1;
    if needle.is_empty() {
        return start as i32;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map_or(-1, |p| (from + p + 1) as i32)
}
