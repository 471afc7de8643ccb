//! Index selectors
//!
//! `at`, `atPut` and `delete` take either a 1-based integer index or one of
//! the strings `"last"`, `"random"`, `"all"`.

use crate::context::PrimContext;
use crate::error::PrimError;
use mbvm_core::{Arena, Ref};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    Index(i32),
    Last,
    Random,
    All,
}

impl Selector {
    /// Decode a selector argument; `None` if it is neither an integer nor a
    /// recognised keyword.
    pub fn parse(arena: &Arena, r: Ref) -> Option<Selector> {
        if let Ref::Int(i) = r {
            return Some(Selector::Index(i));
        }
        [
            ("last", Selector::Last),
            ("random", Selector::Random),
            ("all", Selector::All),
        ]
        .into_iter()
        .find(|(name, _)| arena.string_matches(r, name))
        .map(|(_, sel)| sel)
    }

    /// Resolve to a 1-based index in `1..=count`.
    ///
    /// `All` has no single index and resolves to `NeedsIntegerIndex`.
    pub fn resolve(self, ctx: &mut PrimContext, count: usize) -> Result<usize, PrimError> {
        let i = match self {
            Selector::Index(i) if i >= 1 => i as usize,
            Selector::Index(_) => return Err(PrimError::IndexOutOfRange),
            Selector::Last => count,
            Selector::Random if count > 0 => ctx.random_index(count),
            Selector::Random => return Err(PrimError::IndexOutOfRange),
            Selector::All => return Err(PrimError::NeedsIntegerIndex),
        };
        if i < 1 || i > count {
            return Err(PrimError::IndexOutOfRange);
        }
        Ok(i)
    }
}
