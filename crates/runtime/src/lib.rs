//! mbvm Runtime: List, String and ByteArray primitives
//!
//! Key design principles:
//! - PrimContext: the arena plus the random source behind `"random"`
//! - PrimResult: a primitive returns a `Ref` or a `PrimError`, never panics
//!   on bad arguments
//! - Primitives are called by name with positional arguments (see
//!   [`primitives`])
//!
//! Growing a List may move it. `addLast` returns the list to keep using.

pub mod byte_array_ops;
pub mod collection_ops;
pub mod context;
pub mod error;
pub mod list_ops;
pub mod logging;
pub mod primitives;
pub mod selector;
pub mod string_ops;

pub use context::PrimContext;
pub use error::{
    PrimError, PrimResult, clear_last_failure, has_last_failure, set_last_failure,
    take_last_failure,
};
pub use primitives::{DATA_PRIMITIVES, PrimEntry, PrimFn, PrimitiveSet, call, invoke, lookup};
pub use selector::Selector;

// The object memory itself
pub use mbvm_core::{Arena, ArenaStats, ExhaustionAction, MemoryConfig, ObjClass, ObjRef, Ref};
