//! String and ByteArray objects
//!
//! Both classes pack bytes little-endian, four to a word. A String ends at a
//! NUL byte and its word count is rounded up, so the real byte length has to
//! be found by scanning the last word. A ByteArray has no terminator: its
//! length is always 4 x word count.

use crate::arena::Arena;
use crate::header::ObjClass;
use crate::reference::{ObjRef, Ref, Word};

/// Words needed to hold `byte_count` bytes
#[inline]
pub fn words_for_bytes(byte_count: usize) -> usize {
    byte_count.div_ceil(4)
}

impl Arena {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Allocate a String holding `text`. Content past an embedded NUL is
    /// dropped.
    pub fn new_string(&mut self, text: &str) -> ObjRef {
        self.new_string_from_bytes(text.as_bytes())
    }

    /// Allocate a String from raw bytes (not validated as UTF-8), truncated
    /// at the first NUL.
    pub fn new_string_from_bytes(&mut self, bytes: &[u8]) -> ObjRef {
        let len = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        let obj = self.alloc_string(len);
        self.write_bytes(obj, 0, &bytes[..len]);
        obj
    }

    /// Allocate a zero-filled String with room for `byte_count` bytes plus
    /// the terminator.
    pub fn alloc_string(&mut self, byte_count: usize) -> ObjRef {
        // nil encodes as word 0: every byte starts out as a terminator
        self.allocate(ObjClass::String, words_for_bytes(byte_count + 1), Ref::Nil)
    }

    /// Allocate a zero-filled ByteArray of at least `byte_count` bytes
    pub fn new_byte_array(&mut self, byte_count: usize) -> ObjRef {
        self.allocate(ObjClass::ByteArray, words_for_bytes(byte_count), Ref::Nil)
    }

    // =========================================================================
    // Byte access
    // =========================================================================

    /// Byte `i` (0-based) of the packed payload
    #[inline]
    pub fn byte_at(&self, obj: ObjRef, i: usize) -> u8 {
        let word = self.payload_word(obj, i / 4);
        word.to_le_bytes()[i % 4]
    }

    /// Store byte `i` (0-based) of the packed payload
    #[inline]
    pub fn set_byte_at(&mut self, obj: ObjRef, i: usize, byte: u8) {
        let mut bytes = self.payload_word(obj, i / 4).to_le_bytes();
        bytes[i % 4] = byte;
        self.set_payload_word(obj, i / 4, Word::from_le_bytes(bytes));
    }

    /// Copy `bytes` into the payload starting at byte `offset`
    pub fn write_bytes(&mut self, obj: ObjRef, offset: usize, bytes: &[u8]) {
        for (i, &b) in bytes.iter().enumerate() {
            self.set_byte_at(obj, offset + i, b);
        }
    }

    /// Copy `len` payload bytes starting at byte `offset`
    pub fn read_bytes(&self, obj: ObjRef, offset: usize, len: usize) -> Vec<u8> {
        (offset..offset + len).map(|i| self.byte_at(obj, i)).collect()
    }

    /// Set every payload byte to `byte`
    pub fn fill_bytes(&mut self, obj: ObjRef, byte: u8) {
        let word = Word::from_le_bytes([byte; 4]);
        for i in 0..self.payload_words(obj) {
            self.set_payload_word(obj, i, word);
        }
    }

    /// Byte length of a ByteArray (4 x word count)
    #[inline]
    pub fn byte_array_len(&self, obj: ObjRef) -> usize {
        4 * self.payload_words(obj)
    }

    // =========================================================================
    // Strings
    // =========================================================================

    /// Byte length of a String, found by scanning the last word for NUL
    pub fn string_byte_len(&self, obj: ObjRef) -> usize {
        let words = self.payload_words(obj);
        if words == 0 {
            return 0;
        }
        let last = self.payload_word(obj, words - 1).to_le_bytes();
        let tail = last.iter().position(|&b| b == 0).unwrap_or(4);
        4 * (words - 1) + tail
    }

    /// The bytes of a String, without the terminator
    pub fn string_bytes(&self, obj: ObjRef) -> Vec<u8> {
        self.read_bytes(obj, 0, self.string_byte_len(obj))
    }

    /// A String's content as Rust text; invalid UTF-8 is replaced
    pub fn string_lossy(&self, obj: ObjRef) -> String {
        String::from_utf8_lossy(&self.string_bytes(obj)).into_owned()
    }

    /// True if `r` is a String whose bytes equal `text`
    pub fn string_matches(&self, r: Ref, text: &str) -> bool {
        match r.as_obj() {
            Some(obj) if self.class_of(obj) == ObjClass::String => {
                self.string_byte_len(obj) == text.len() && self.string_bytes(obj) == text.as_bytes()
            }
            _ => false,
        }
    }
}
