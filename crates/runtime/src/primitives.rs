//! Named primitive table
//!
//! The interpreter calls primitives by name with a positional argument
//! slice. Argument order follows the block language, where the container
//! usually comes last: `addLast(item, list)`, `at(index, list)`.
//!
//! All primitives live in one set named `"data"`.

use crate::collection_ops;
use crate::context::PrimContext;
use crate::error::{PrimError, PrimResult, require_args, set_last_failure};
use crate::list_ops::{self, MIN_LIST_CAPACITY};
use crate::string_ops;
use mbvm_core::Ref;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

/// A primitive: context plus positional arguments
pub type PrimFn = fn(&mut PrimContext, &[Ref]) -> PrimResult;

#[derive(Debug, Clone, Copy)]
pub struct PrimEntry {
    pub name: &'static str,
    pub func: PrimFn,
}

#[derive(Debug)]
pub struct PrimitiveSet {
    pub name: &'static str,
    pub entries: &'static [PrimEntry],
}

impl PrimitiveSet {
    pub fn get(&self, name: &str) -> Option<PrimFn> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.func)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.name)
    }
}

pub static DATA_PRIMITIVES: PrimitiveSet = PrimitiveSet {
    name: "data",
    entries: &[
        PrimEntry { name: "makeList", func: prim_make_list },
        PrimEntry { name: "newList", func: prim_new_list },
        PrimEntry { name: "addLast", func: prim_add_last },
        PrimEntry { name: "delete", func: prim_delete },
        PrimEntry { name: "join", func: prim_join },
        PrimEntry { name: "copyFromTo", func: prim_copy_from_to },
        PrimEntry { name: "findInString", func: prim_find_in_string },
        PrimEntry { name: "joinStrings", func: prim_join_strings },
        PrimEntry { name: "freeMemory", func: prim_free_memory },
        PrimEntry { name: "at", func: prim_at },
        PrimEntry { name: "atPut", func: prim_at_put },
        PrimEntry { name: "fill", func: prim_fill },
        PrimEntry { name: "length", func: prim_length },
    ],
};

/// Every registered set, by name
static PRIMITIVE_SETS: LazyLock<HashMap<&'static str, &'static PrimitiveSet>> =
    LazyLock::new(|| {
        let mut m = HashMap::new();
        m.insert(DATA_PRIMITIVES.name, &DATA_PRIMITIVES);
        m
    });

/// A registered primitive set by name
pub fn primitive_set(name: &str) -> Option<&'static PrimitiveSet> {
    PRIMITIVE_SETS.get(name).copied()
}

/// Find a primitive in any registered set
pub fn lookup(name: &str) -> Option<PrimFn> {
    PRIMITIVE_SETS.values().find_map(|set| set.get(name))
}

/// Run a primitive by name
pub fn invoke(ctx: &mut PrimContext, name: &str, args: &[Ref]) -> PrimResult {
    let func = lookup(name).ok_or(PrimError::UnknownPrimitive)?;
    func(ctx, args)
}

/// Interpreter entry point: like [`invoke`], but a failure is recorded in
/// the last-failure slot and `false` is returned in its place.
pub fn call(ctx: &mut PrimContext, name: &str, args: &[Ref]) -> Ref {
    match invoke(ctx, name, args) {
        Ok(r) => r,
        Err(err) => {
            debug!(primitive = name, code = err.code(), "primitive failed: {err}");
            set_last_failure(err);
            Ref::False
        }
    }
}

// =============================================================================
// Primitives
// =============================================================================

fn prim_make_list(ctx: &mut PrimContext, args: &[Ref]) -> PrimResult {
    Ok(Ref::Obj(list_ops::make_list(&mut ctx.arena, args)))
}

/// `newList(capacity?)`; a missing or non-integer capacity uses the minimum
fn prim_new_list(ctx: &mut PrimContext, args: &[Ref]) -> PrimResult {
    let capacity = match args.first().and_then(|r| r.small_int_value()) {
        Some(n) if n > 0 => n as usize,
        _ => MIN_LIST_CAPACITY,
    };
    Ok(Ref::Obj(list_ops::new_list(&mut ctx.arena, capacity)))
}

/// `addLast(item, list)`
fn prim_add_last(ctx: &mut PrimContext, args: &[Ref]) -> PrimResult {
    require_args(args, 2)?;
    list_ops::add_last(&mut ctx.arena, args[1], args[0])
}

/// `delete(selector, list)`
fn prim_delete(ctx: &mut PrimContext, args: &[Ref]) -> PrimResult {
    require_args(args, 2)?;
    list_ops::delete(&mut ctx.arena, args[1], args[0])
}

fn prim_join(ctx: &mut PrimContext, args: &[Ref]) -> PrimResult {
    collection_ops::join(&mut ctx.arena, args)
}

/// `copyFromTo(source, start, end?)`
fn prim_copy_from_to(ctx: &mut PrimContext, args: &[Ref]) -> PrimResult {
    require_args(args, 2)?;
    collection_ops::copy_from_to(&mut ctx.arena, args[0], args[1], args.get(2).copied())
}

/// `findInString(needle, haystack, start?)`
fn prim_find_in_string(ctx: &mut PrimContext, args: &[Ref]) -> PrimResult {
    require_args(args, 2)?;
    let arena = &ctx.arena;
    let needle = string_ops::as_string(arena, args[0]).ok_or(PrimError::NeedsString)?;
    let haystack = string_ops::as_string(arena, args[1]).ok_or(PrimError::NeedsString)?;
    let start = args.get(2).and_then(|r| r.small_int_value()).unwrap_or(1);
    let found = string_ops::find_in_string(
        &arena.string_bytes(needle),
        &arena.string_bytes(haystack),
        start,
    );
    Ok(Ref::Int(found))
}

/// `joinStrings(list, separator?)`
fn prim_join_strings(ctx: &mut PrimContext, args: &[Ref]) -> PrimResult {
    require_args(args, 1)?;
    let list = list_ops::as_list(&ctx.arena, args[0])?;
    let items = list_ops::items(&ctx.arena, list);
    string_ops::join_strings(&mut ctx.arena, &items, args.get(1).copied())
}

fn prim_free_memory(ctx: &mut PrimContext, _args: &[Ref]) -> PrimResult {
    Ok(Ref::from_count(ctx.arena.free_words()))
}

/// `at(selector, container)`
fn prim_at(ctx: &mut PrimContext, args: &[Ref]) -> PrimResult {
    require_args(args, 2)?;
    collection_ops::at(ctx, args[1], args[0])
}

/// `atPut(selector, container, value)`
fn prim_at_put(ctx: &mut PrimContext, args: &[Ref]) -> PrimResult {
    require_args(args, 3)?;
    collection_ops::at_put(ctx, args[1], args[0], args[2])
}

/// `fill(container, value)`
fn prim_fill(ctx: &mut PrimContext, args: &[Ref]) -> PrimResult {
    require_args(args, 2)?;
    collection_ops::fill(ctx, args[0], args[1])
}

fn prim_length(ctx: &mut PrimContext, args: &[Ref]) -> PrimResult {
    require_args(args, 1)?;
    collection_ops::length(&ctx.arena, args[0])
}
