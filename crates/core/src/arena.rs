//! Arena Allocator - one preallocated block of words, bump allocated
//!
//! Every heap object lives in a single `Arena`:
//!
//! ```text
//! ┌────────┬─────────────┬────────┬──────────────────┬─────────────────┐
//! │ header │ payload ... │ header │ payload ...      │   free ...      │
//! └────────┴─────────────┴────────┴──────────────────┴─────────────────┘
//! 0                                                  ↑ free            ↑ end
//! ```
//!
//! Design:
//! - Allocation advances `free`; nothing is ever freed individually
//! - Growing an object allocates a larger copy and abandons the original
//! - `reset` rewinds `free` to 0, invalidating every handle issued so far
//! - Running out of words is fatal (see [`ExhaustionAction`])
//!
//! The arena is an owned value; all allocating operations take
//! `&mut Arena`, which serializes the allocation pointer for free. Hosts
//! that share an arena between threads must wrap it in a lock.

use crate::config::{ExhaustionAction, MAX_ARENA_WORDS, MemoryConfig};
use crate::header::{HEADER_WORDS, Header, MAX_PAYLOAD_WORDS, ObjClass};
use crate::memory_stats::{ArenaStats, Counters};
use crate::reference::{ObjRef, Ref, Word};
use std::fmt::Write as _;
use tracing::{debug, error, trace, warn};

/// A contiguous word store plus an allocation pointer
pub struct Arena {
    words: Box<[Word]>,
    free: usize,
    on_exhaustion: ExhaustionAction,
    counters: Counters,
}

impl Arena {
    /// Create an arena of `total_words` words with the default exhaustion
    /// action.
    pub fn new(total_words: usize) -> Self {
        let total_words = if total_words > MAX_ARENA_WORDS {
            warn!(
                requested = total_words,
                max = MAX_ARENA_WORDS,
                "arena size clamped"
            );
            MAX_ARENA_WORDS
        } else {
            total_words
        };
        debug!(words = total_words, "arena initialized");
        Arena {
            words: vec![0; total_words].into_boxed_slice(),
            free: 0,
            on_exhaustion: ExhaustionAction::default(),
            counters: Counters::default(),
        }
    }

    /// Create an arena sized and configured from a [`MemoryConfig`]
    pub fn with_config(config: &MemoryConfig) -> Self {
        let mut arena = Arena::new(config.arena_words);
        arena.on_exhaustion = config.exhaustion_action;
        arena
    }

    pub fn set_exhaustion_action(&mut self, action: ExhaustionAction) {
        self.on_exhaustion = action;
    }

    pub fn exhaustion_action(&self) -> ExhaustionAction {
        self.on_exhaustion
    }

    /// Rewind the allocation pointer to the start of the arena.
    ///
    /// Every reference issued before the reset is invalid afterwards. This
    /// is not checked; callers drop their references on program reload.
    pub fn reset(&mut self) {
        debug!(used = self.free, "arena reset");
        self.free = 0;
        self.counters.resets += 1;
    }

    // =========================================================================
    // Allocation
    // =========================================================================

    /// Allocate an object of `class` with `payload_words` words, every one
    /// of them set to `fill`.
    ///
    /// Never fails: if the object does not fit, the configured
    /// [`ExhaustionAction`] runs and this call does not return.
    pub fn allocate(&mut self, class: ObjClass, payload_words: usize, fill: Ref) -> ObjRef {
        let needed = HEADER_WORDS + payload_words;
        let new_free = match self.free.checked_add(needed) {
            Some(f) if f < self.words.len() && payload_words <= MAX_PAYLOAD_WORDS => f,
            _ => self.exhausted(needed),
        };

        let start = self.free;
        self.words[start] = Header::new(class, payload_words).word();
        self.words[start + HEADER_WORDS..new_free].fill(fill.to_word());
        self.free = new_free;
        self.counters.note_allocation(new_free);

        trace!(at = start, ?class, payload_words, "allocate");
        ObjRef::from_index(start)
    }

    /// Replace `obj` with a copy of `new_payload_words` words.
    ///
    /// The first `min(old, new)` payload words are copied; any extra words are
    /// set to `fill`. The original object is left in place and never
    /// reclaimed.
    pub fn grow(&mut self, obj: ObjRef, new_payload_words: usize, fill: Ref) -> ObjRef {
        let class = self.class_of(obj);
        let old_words = self.payload_words(obj);
        let replacement = self.allocate(class, new_payload_words, fill);

        let keep = old_words.min(new_payload_words);
        let src = obj.index() + HEADER_WORDS;
        let dst = replacement.index() + HEADER_WORDS;
        self.words.copy_within(src..src + keep, dst);

        self.counters
            .note_relocation(HEADER_WORDS + new_payload_words);
        debug!(
            from = obj.index(),
            to = replacement.index(),
            old_words,
            new_payload_words,
            "object relocated"
        );
        replacement
    }

    /// Report and stop. Exhaustion is not a recoverable condition.
    #[cold]
    fn exhausted(&self, requested: usize) -> ! {
        let report = format!(
            "{} words used out of {}",
            self.free.saturating_add(requested),
            self.words.len()
        );
        error!(
            used = self.free,
            requested,
            capacity = self.words.len(),
            "out of memory: {report}"
        );
        match self.on_exhaustion {
            ExhaustionAction::Exit => {
                eprintln!("{report}\nOut of memory!");
                std::process::exit(1);
            }
            ExhaustionAction::Halt => {
                eprintln!("{report}\nOut of memory!");
                // No way to recover; wait for an external reset.
                loop {
                    std::thread::park();
                }
            }
            ExhaustionAction::Panic => panic!("Out of memory! {report}"),
        }
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Usable size in words
    #[inline]
    pub fn capacity_words(&self) -> usize {
        self.words.len()
    }

    /// Words handed out since the last reset
    #[inline]
    pub fn used_words(&self) -> usize {
        self.free
    }

    /// Words remaining (`freeMemory`)
    #[inline]
    pub fn free_words(&self) -> usize {
        self.words.len() - self.free
    }

    pub fn stats(&self) -> ArenaStats {
        ArenaStats {
            capacity_words: self.capacity_words(),
            used_words: self.used_words(),
            free_words: self.free_words(),
            peak_used_words: self.counters.peak_used_words,
            allocations: self.counters.allocations,
            relocations: self.counters.relocations,
            relocated_words: self.counters.relocated_words,
            resets: self.counters.resets,
        }
    }

    /// True if `obj` points at an object allocated since the last reset
    #[inline]
    pub fn contains(&self, obj: ObjRef) -> bool {
        obj.index() < self.free
    }

    // =========================================================================
    // Object accessors
    // =========================================================================

    #[inline]
    pub fn header(&self, obj: ObjRef) -> Header {
        Header::from_word(self.words[obj.index()])
    }

    #[inline]
    pub fn class_of(&self, obj: ObjRef) -> ObjClass {
        self.header(obj).class()
    }

    /// Class of a reference, `None` for immediates
    #[inline]
    pub fn class_of_ref(&self, r: Ref) -> Option<ObjClass> {
        r.as_obj().map(|obj| self.class_of(obj))
    }

    /// True if `r` is a heap object of the given class
    #[inline]
    pub fn is_class(&self, r: Ref, class: ObjClass) -> bool {
        self.class_of_ref(r) == Some(class)
    }

    /// Allocated payload capacity in words
    #[inline]
    pub fn payload_words(&self, obj: ObjRef) -> usize {
        self.header(obj).payload_words()
    }

    /// Read payload word `i` (0-based) as a reference
    #[inline]
    pub fn field_at(&self, obj: ObjRef, i: usize) -> Ref {
        Ref::from_word(self.payload_word(obj, i))
    }

    /// Store a reference into payload word `i` (0-based)
    #[inline]
    pub fn field_set(&mut self, obj: ObjRef, i: usize, value: Ref) {
        self.set_payload_word(obj, i, value.to_word());
    }

    /// Raw payload word `i`; used by the byte views.
    ///
    /// Panics if `i` is outside the payload.
    #[inline]
    pub fn payload_word(&self, obj: ObjRef, i: usize) -> Word {
        assert!(
            i < self.payload_words(obj),
            "payload index {i} out of bounds for {obj:?}"
        );
        self.words[obj.index() + HEADER_WORDS + i]
    }

    #[inline]
    pub fn set_payload_word(&mut self, obj: ObjRef, i: usize, word: Word) {
        assert!(
            i < self.payload_words(obj),
            "payload index {i} out of bounds for {obj:?}"
        );
        self.words[obj.index() + HEADER_WORDS + i] = word;
    }

    /// Overwrite payload words `range` with `value`. An empty range is a
    /// no-op for any object, including one with no payload.
    pub fn fill_fields(&mut self, obj: ObjRef, range: std::ops::Range<usize>, value: Ref) {
        if range.is_empty() {
            return;
        }
        assert!(range.end <= self.payload_words(obj));
        let base = obj.index() + HEADER_WORDS;
        self.words[base + range.start..base + range.end].fill(value.to_word());
    }

    /// Copy `len` payload words from `src[src_start..]` to `dst[dst_start..]`.
    /// The ranges may belong to the same object and may overlap. Copying
    /// zero words never checks bounds.
    pub fn copy_fields(
        &mut self,
        src: ObjRef,
        src_start: usize,
        dst: ObjRef,
        dst_start: usize,
        len: usize,
    ) {
        if len == 0 {
            return;
        }
        assert!(src_start + len <= self.payload_words(src));
        assert!(dst_start + len <= self.payload_words(dst));
        let from = src.index() + HEADER_WORDS + src_start;
        let to = dst.index() + HEADER_WORDS + dst_start;
        self.words.copy_within(from..from + len, to);
    }

    // =========================================================================
    // Debugging
    // =========================================================================

    /// Render an object's header and payload words
    pub fn dump_object(&self, obj: ObjRef) -> String {
        if !self.contains(obj) {
            return format!("bad object at {}", obj.index());
        }
        let header = self.header(obj);
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:x}: {} words, class {:?}",
            obj.index(),
            header.payload_words(),
            header.class()
        );
        let _ = writeln!(out, "Header: {:x}", header.word());
        for i in 0..header.payload_words() {
            let _ = writeln!(out, "\t0x{:x},", self.payload_word(obj, i));
        }
        out
    }
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("capacity_words", &self.capacity_words())
            .field("used_words", &self.used_words())
            .field("on_exhaustion", &self.on_exhaustion)
            .finish()
    }
}
