//! ByteArray access
//!
//! A ByteArray is a fixed run of raw bytes. Items are exposed to the
//! language as small integers in `0..=255`; any other value is refused
//! before the array is touched.

use crate::context::PrimContext;
use crate::error::{PrimError, PrimResult};
use crate::selector::Selector;
use mbvm_core::{ObjRef, Ref};

/// A value that can be stored in a ByteArray
pub fn byte_value(r: Ref) -> Result<u8, PrimError> {
    match r {
        Ref::Int(n) => u8::try_from(n).map_err(|_| PrimError::ByteArrayStore),
        _ => Err(PrimError::ByteArrayStore),
    }
}

pub fn at(ctx: &mut PrimContext, bytes: ObjRef, selector: Selector) -> PrimResult {
    let len = ctx.arena.byte_array_len(bytes);
    let i = selector.resolve(ctx, len)?;
    Ok(Ref::Int(ctx.arena.byte_at(bytes, i - 1) as i32))
}

/// Store one byte, or every byte for `"all"`. `"random"` is refused.
pub fn at_put(ctx: &mut PrimContext, bytes: ObjRef, selector: Selector, value: Ref) -> PrimResult {
    let byte = byte_value(value)?;
    if selector == Selector::Random {
        return Err(PrimError::NeedsIntegerIndex);
    }
    if selector == Selector::All {
        ctx.arena.fill_bytes(bytes, byte);
        return Ok(Ref::False);
    }
    let len = ctx.arena.byte_array_len(bytes);
    let i = selector.resolve(ctx, len)?;
    ctx.arena.set_byte_at(bytes, i - 1, byte);
    Ok(Ref::False)
}

pub fn fill(ctx: &mut PrimContext, bytes: ObjRef, value: Ref) -> PrimResult {
    let byte = byte_value(value)?;
    ctx.arena.fill_bytes(bytes, byte);
    Ok(Ref::False)
}
