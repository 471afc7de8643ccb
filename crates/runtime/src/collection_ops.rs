//! Indexable containers
//!
//! `at`, `atPut`, `fill`, `length`, `copyFromTo` and `join` accept any of
//! the three indexable classes and dispatch on the object's class tag.

use crate::context::PrimContext;
use crate::error::{PrimError, PrimResult};
use crate::selector::Selector;
use crate::{byte_array_ops, list_ops, string_ops};
use mbvm_core::{Arena, ObjClass, ObjRef, Ref};

/// An indexable object, classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    List(ObjRef),
    String(ObjRef),
    ByteArray(ObjRef),
}

impl Container {
    /// Classify `r`; `None` for integers, singletons and other classes
    pub fn classify(arena: &Arena, r: Ref) -> Option<Container> {
        let obj = r.as_obj()?;
        match arena.class_of(obj) {
            ObjClass::List => Some(Container::List(obj)),
            ObjClass::String => Some(Container::String(obj)),
            ObjClass::ByteArray => Some(Container::ByteArray(obj)),
            ObjClass::Other(_) => None,
        }
    }
}

fn index_selector(arena: &Arena, r: Ref) -> Result<Selector, PrimError> {
    Selector::parse(arena, r).ok_or(PrimError::NeedsIntegerIndex)
}

pub fn at(ctx: &mut PrimContext, container: Ref, selector: Ref) -> PrimResult {
    let target = Container::classify(&ctx.arena, container).ok_or(PrimError::NeedsList)?;
    let selector = index_selector(&ctx.arena, selector)?;
    match target {
        Container::List(list) => list_ops::at(ctx, list, selector),
        Container::String(s) => string_ops::at(ctx, s, selector),
        Container::ByteArray(bytes) => byte_array_ops::at(ctx, bytes, selector),
    }
}

pub fn at_put(ctx: &mut PrimContext, container: Ref, selector: Ref, value: Ref) -> PrimResult {
    let target = Container::classify(&ctx.arena, container).ok_or(PrimError::NeedsList)?;
    let selector = index_selector(&ctx.arena, selector)?;
    match target {
        Container::List(list) => list_ops::at_put(ctx, list, selector, value),
        Container::ByteArray(bytes) => byte_array_ops::at_put(ctx, bytes, selector, value),
        // strings are immutable
        Container::String(_) => Err(PrimError::NeedsList),
    }
}

pub fn fill(ctx: &mut PrimContext, container: Ref, value: Ref) -> PrimResult {
    match Container::classify(&ctx.arena, container) {
        Some(Container::List(list)) => {
            list_ops::fill(&mut ctx.arena, list, value);
            Ok(Ref::False)
        }
        Some(Container::ByteArray(bytes)) => byte_array_ops::fill(ctx, bytes, value),
        _ => Err(PrimError::NeedsList),
    }
}

/// List count, String code points, or ByteArray bytes
pub fn length(arena: &Arena, container: Ref) -> PrimResult {
    let n = match Container::classify(arena, container).ok_or(PrimError::NeedsList)? {
        Container::List(list) => list_ops::count(arena, list),
        Container::String(s) => string_ops::length(arena, s),
        Container::ByteArray(bytes) => arena.byte_array_len(bytes),
    };
    Ok(Ref::from_count(n))
}

/// Copy a 1-based inclusive slice of a List or String
pub fn copy_from_to(arena: &mut Arena, source: Ref, start: Ref, end: Option<Ref>) -> PrimResult {
    let start = start.small_int_value().ok_or(PrimError::NeedsInteger)?;
    let end = match end {
        Some(r) => Some(r.small_int_value().ok_or(PrimError::NeedsInteger)?),
        None => None,
    };
    match Container::classify(arena, source) {
        Some(Container::List(list)) => Ok(Ref::Obj(list_ops::copy_from_to(arena, list, start, end))),
        Some(Container::String(s)) => Ok(Ref::Obj(string_ops::copy_from_to(arena, s, start, end))),
        _ => Err(PrimError::NeedsIndexable),
    }
}

/// Concatenate two or more Lists, or two or more Strings. The first
/// argument picks the mode.
pub fn join(arena: &mut Arena, args: &[Ref]) -> PrimResult {
    if args.len() < 2 {
        return Err(PrimError::NotEnoughArguments);
    }
    match Container::classify(arena, args[0]) {
        Some(Container::List(_)) => {
            let lists = args
                .iter()
                .map(|&r| list_ops::as_list(arena, r).map_err(|_| PrimError::JoinArgsNotSameType))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Ref::Obj(list_ops::join_lists(arena, &lists)))
        }
        Some(Container::String(_)) => string_ops::join_strings_of(arena, args),
        _ => Err(PrimError::NeedsIndexable),
    }
}
