//! Primitive failures
//!
//! Primitives never panic on bad arguments and never stop the process.
//! They return a [`PrimError`] and the interpreter aborts the current task,
//! showing the failure's message.
//!
//! The interpreter-facing entry point ([`crate::primitives::call`]) also
//! keeps the most recent failure in a thread-local slot, so a dispatch loop
//! that only passes `Ref`s around can check for it afterwards:
//!
//! ```ignore
//! let result = primitives::call(&mut ctx, "at", &args);
//! if let Some(failure) = take_last_failure() {
//!     abort_task(failure.message());
//! }
//! ```

use mbvm_core::Ref;
use std::cell::Cell;
use std::fmt;

/// Why a primitive refused its arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimError {
    NotEnoughArguments,
    NeedsList,
    NeedsIndexable,
    NeedsInteger,
    NeedsIntegerIndex,
    NeedsString,
    IndexOutOfRange,
    ByteArrayStore,
    JoinArgsNotSameType,
    UnknownPrimitive,
}

impl PrimError {
    /// Stable numeric code reported to the IDE
    pub fn code(self) -> u8 {
        match self {
            PrimError::NotEnoughArguments => 1,
            PrimError::NeedsList => 2,
            PrimError::NeedsIndexable => 3,
            PrimError::NeedsInteger => 4,
            PrimError::NeedsIntegerIndex => 5,
            PrimError::NeedsString => 6,
            PrimError::IndexOutOfRange => 7,
            PrimError::ByteArrayStore => 8,
            PrimError::JoinArgsNotSameType => 9,
            PrimError::UnknownPrimitive => 10,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            PrimError::NotEnoughArguments => "Not enough arguments passed to primitive",
            PrimError::NeedsList => "Needs a list",
            PrimError::NeedsIndexable => "Needs an indexable type such as a string or list",
            PrimError::NeedsInteger => "Needs an integer",
            PrimError::NeedsIntegerIndex => "Index must be an integer, \"last\", or \"random\"",
            PrimError::NeedsString => "Needs a string",
            PrimError::IndexOutOfRange => "Index out of range",
            PrimError::ByteArrayStore => "A ByteArray can only store integers between 0 and 255",
            PrimError::JoinArgsNotSameType => "All arguments to join must be the same type",
            PrimError::UnknownPrimitive => "Unknown primitive",
        }
    }
}

impl fmt::Display for PrimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for PrimError {}

/// Result of a primitive: a reference or a failure
pub type PrimResult = Result<Ref, PrimError>;

/// Fail unless at least `n` arguments were passed
#[inline]
pub fn require_args(args: &[Ref], n: usize) -> Result<(), PrimError> {
    if args.len() < n {
        Err(PrimError::NotEnoughArguments)
    } else {
        Ok(())
    }
}

thread_local! {
    /// Failure recorded by the most recent failed `primitives::call`
    static LAST_FAILURE: Cell<Option<PrimError>> = const { Cell::new(None) };
}

/// Record a failure for the interpreter to pick up
pub fn set_last_failure(err: PrimError) {
    LAST_FAILURE.with(|f| f.set(Some(err)));
}

/// Take (and clear) the last recorded failure
pub fn take_last_failure() -> Option<PrimError> {
    LAST_FAILURE.with(|f| f.take())
}

/// Check if there's a pending failure
pub fn has_last_failure() -> bool {
    LAST_FAILURE.with(|f| f.get().is_some())
}

/// Clear any pending failure
pub fn clear_last_failure() {
    LAST_FAILURE.with(|f| f.set(None));
}
