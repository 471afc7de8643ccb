//! mbvm Core: word-arena object memory for a small microcontroller VM
//!
//! Every mutable value of the language lives in one preallocated [`Arena`]
//! of 32-bit words. Objects are bump allocated and never freed; the only way
//! to get memory back is to reset the whole arena when a program is
//! reloaded.
//!
//! Key design principles:
//! - Ref: what the language talks about (small Int, nil/true/false, object)
//! - Header: one word per object, class tag + payload word count
//! - Arena: owned word store; allocating operations take `&mut Arena`
//!
//! # Modules
//!
//! - `reference`: tagged `Ref` values and their word encoding
//! - `header`: object header layout and class tags
//! - `arena`: the bump allocator and field accessors
//! - `objects`: String/ByteArray constructors and byte views
//! - `utf8`: code-point scanning over raw string bytes
//! - `config`: environment-driven memory configuration
//! - `memory_stats`: arena usage snapshots

pub mod arena;
pub mod config;
pub mod header;
pub mod memory_stats;
pub mod objects;
pub mod reference;
pub mod utf8;

pub use arena::Arena;
pub use config::{ExhaustionAction, MemoryConfig};
pub use header::{HEADER_WORDS, Header, ObjClass};
pub use memory_stats::ArenaStats;
pub use reference::{MAX_SMALL_INT, MIN_SMALL_INT, ObjRef, Ref, Word};
