//! Tagged References
//!
//! Every value the language talks about is a `Ref`: a small integer, one of
//! the three singletons, or a handle to an object living in an [`Arena`].
//!
//! ## Word Encoding
//!
//! Object payloads are arrays of 32-bit words, so a `Ref` stored in a List
//! slot is packed into a single word with a 2-bit tag:
//!
//! ```text
//! ┌──────────────────────────────┬────┐
//! │  payload (30 or 31 bits)     │tag │
//! └──────────────────────────────┴────┘
//!   ...xxxxxxx1   small integer (31-bit signed, value = word >> 1)
//!   ...00000000   nil    (word 0)
//!   ...00000100   true   (word 4)
//!   ...00001000   false  (word 8)
//!   ...xxxxxx10   object handle (arena word index = word >> 2)
//! ```
//!
//! Handles are arena indices, not machine addresses, so the singleton
//! encodings can never collide with a real object and no part of the arena
//! has to be reserved for them.
//!
//! Word 0 decodes as nil. A payload filled with nil is therefore all-zero
//! bytes, which is what freshly allocated Strings and ByteArrays rely on.
//!
//! [`Arena`]: crate::arena::Arena

use std::fmt;

/// One arena word.
pub type Word = u32;

// =============================================================================
// Constants
// =============================================================================

/// Mask for the 2-bit reference tag
const TAG_MASK: Word = 0b11;

/// Low bit set: small integer
const INT_BIT: Word = 0b1;

/// Tag for object handles
const OBJ_TAG: Word = 0b10;

/// Encoded singletons
pub const NIL_WORD: Word = 0;
pub const TRUE_WORD: Word = 4;
pub const FALSE_WORD: Word = 8;

/// Largest small integer: 2^30 - 1
pub const MAX_SMALL_INT: i32 = (1 << 30) - 1;

/// Smallest small integer: -2^30
pub const MIN_SMALL_INT: i32 = -(1 << 30);

/// Largest word index an object handle can encode (30 bits)
pub const MAX_HANDLE_INDEX: usize = (1 << 30) - 1;

// =============================================================================
// ObjRef
// =============================================================================

/// Handle to a heap object: the arena word index of its header.
///
/// Stable until the arena is reset or the object is replaced by a grow.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjRef(u32);

impl ObjRef {
    #[inline(always)]
    pub(crate) fn from_index(index: usize) -> Self {
        debug_assert!(index <= MAX_HANDLE_INDEX, "handle index overflow: {index}");
        ObjRef(index as u32)
    }

    /// Arena word index of the object's header.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ObjRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjRef(@{})", self.0)
    }
}

// =============================================================================
// Ref
// =============================================================================

/// A tagged reference: small integer, singleton, or object handle.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Ref {
    /// Inline 31-bit signed integer. Build with [`Ref::small_int`] so the
    /// value survives a round trip through an arena word.
    Int(i32),
    Nil,
    True,
    False,
    Obj(ObjRef),
}

impl Ref {
    /// Integer zero; the value cleared List slots read back as.
    pub const ZERO: Ref = Ref::Int(0);

    /// Make a small integer, wrapping `n` into the 31-bit range.
    #[inline]
    pub fn small_int(n: i32) -> Ref {
        Ref::Int(n.wrapping_shl(1) >> 1)
    }

    /// Make a small integer from a length or count, saturating at
    /// [`MAX_SMALL_INT`].
    #[inline]
    pub fn from_count(n: usize) -> Ref {
        Ref::Int(n.min(MAX_SMALL_INT as usize) as i32)
    }

    /// Map a Rust bool to the true/false singletons.
    #[inline]
    pub fn bool(b: bool) -> Ref {
        if b { Ref::True } else { Ref::False }
    }

    #[inline(always)]
    pub fn is_small_int(self) -> bool {
        matches!(self, Ref::Int(_))
    }

    /// The integer value, or `None` for non-integers.
    #[inline(always)]
    pub fn small_int_value(self) -> Option<i32> {
        match self {
            Ref::Int(n) => Some(n),
            _ => None,
        }
    }

    /// True for the `true` and `false` singletons.
    #[inline(always)]
    pub fn is_boolean(self) -> bool {
        matches!(self, Ref::True | Ref::False)
    }

    #[inline(always)]
    pub fn is_nil(self) -> bool {
        matches!(self, Ref::Nil)
    }

    /// The object handle, or `None` for immediates.
    #[inline(always)]
    pub fn as_obj(self) -> Option<ObjRef> {
        match self {
            Ref::Obj(obj) => Some(obj),
            _ => None,
        }
    }

    /// Pack into an arena word.
    #[inline]
    pub fn to_word(self) -> Word {
        match self {
            Ref::Int(n) => ((n as Word) << 1) | INT_BIT,
            Ref::Nil => NIL_WORD,
            Ref::True => TRUE_WORD,
            Ref::False => FALSE_WORD,
            Ref::Obj(obj) => (obj.0 << 2) | OBJ_TAG,
        }
    }

    /// Unpack an arena word.
    ///
    /// Words carrying the singleton tag other than true/false decode as nil;
    /// they only appear when a caller reads packed bytes as fields.
    #[inline]
    pub fn from_word(word: Word) -> Ref {
        if word & INT_BIT != 0 {
            return Ref::Int((word as i32) >> 1);
        }
        match word & TAG_MASK {
            OBJ_TAG => Ref::Obj(ObjRef(word >> 2)),
            _ => match word {
                TRUE_WORD => Ref::True,
                FALSE_WORD => Ref::False,
                _ => Ref::Nil,
            },
        }
    }
}

impl From<ObjRef> for Ref {
    fn from(obj: ObjRef) -> Self {
        Ref::Obj(obj)
    }
}

impl From<bool> for Ref {
    fn from(b: bool) -> Self {
        Ref::bool(b)
    }
}
