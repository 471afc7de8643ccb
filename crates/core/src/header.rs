//! Object headers
//!
//! Every heap object starts with one header word:
//!
//! ```text
//! ┌──────────────────────────────────┬──────────┐
//! │  payload word count (28 bits)    │ class (4)│
//! └──────────────────────────────────┴──────────┘
//! ```
//!
//! The word count is the allocated payload capacity and never changes after
//! allocation. Logical lengths (a List's item count, a String's byte count)
//! live in the payload.

use crate::reference::Word;

/// Words occupied by a header
pub const HEADER_WORDS: usize = 1;

const CLASS_BITS: u32 = 4;
const CLASS_MASK: Word = (1 << CLASS_BITS) - 1;

/// Largest payload a header can describe
pub const MAX_PAYLOAD_WORDS: usize = (1 << (Word::BITS - CLASS_BITS)) - 1;

/// Class tag stored in the low bits of a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjClass {
    /// NUL-terminated UTF-8 bytes packed 4 per word
    String,
    /// Growable list: word 0 is the item count, words 1.. are items
    List,
    /// Raw bytes packed 4 per word, length is always 4 x word count
    ByteArray,
    /// Opaque fixed-size record with the given 4-bit tag
    Other(u8),
}

impl ObjClass {
    pub const STRING_TAG: u8 = 4;
    pub const LIST_TAG: u8 = 5;
    pub const BYTE_ARRAY_TAG: u8 = 6;

    /// 4-bit tag for this class.
    pub const fn tag(self) -> u8 {
        match self {
            ObjClass::String => Self::STRING_TAG,
            ObjClass::List => Self::LIST_TAG,
            ObjClass::ByteArray => Self::BYTE_ARRAY_TAG,
            ObjClass::Other(tag) => tag & CLASS_MASK as u8,
        }
    }

    /// True for tags owned by String, List and ByteArray. An `Other` must
    /// not carry one.
    pub const fn is_reserved_tag(tag: u8) -> bool {
        matches!(
            tag & CLASS_MASK as u8,
            Self::STRING_TAG | Self::LIST_TAG | Self::BYTE_ARRAY_TAG
        )
    }

    pub const fn from_tag(tag: u8) -> ObjClass {
        match tag & CLASS_MASK as u8 {
            Self::STRING_TAG => ObjClass::String,
            Self::LIST_TAG => ObjClass::List,
            Self::BYTE_ARRAY_TAG => ObjClass::ByteArray,
            other => ObjClass::Other(other),
        }
    }
}

/// A packed header word.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Header(Word);

impl Header {
    /// Pack a header. `payload_words` must not exceed [`MAX_PAYLOAD_WORDS`],
    /// and an `Other` class must not use a reserved tag.
    #[inline]
    pub fn new(class: ObjClass, payload_words: usize) -> Header {
        debug_assert!(payload_words <= MAX_PAYLOAD_WORDS);
        debug_assert!(
            !matches!(class, ObjClass::Other(tag) if ObjClass::is_reserved_tag(tag)),
            "reserved class tag in {class:?}"
        );
        Header(((payload_words as Word) << CLASS_BITS) | class.tag() as Word)
    }

    #[inline(always)]
    pub fn from_word(word: Word) -> Header {
        Header(word)
    }

    #[inline(always)]
    pub fn word(self) -> Word {
        self.0
    }

    #[inline(always)]
    pub fn class(self) -> ObjClass {
        ObjClass::from_tag((self.0 & CLASS_MASK) as u8)
    }

    #[inline(always)]
    pub fn payload_words(self) -> usize {
        (self.0 >> CLASS_BITS) as usize
    }
}

impl std::fmt::Debug for Header {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Header {{ class: {:?}, words: {}, raw: 0x{:x} }}",
            self.class(),
            self.payload_words(),
            self.0
        )
    }
}
