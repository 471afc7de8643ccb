//! Object memory configuration
//!
//! ## Configuration (Environment Variables)
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MBVM_ARENA_WORDS` | `100000` | Arena size in 32-bit words |
//! | `MBVM_EXHAUSTION_ACTION` | `exit` | On out-of-memory: `exit`, `halt`, or `panic` |
//! | `MBVM_RANDOM_SEED` | unset | Fixed seed for the `random` selector |
//!
//! ## Example
//!
//! ```bash
//! # Small arena, park forever on exhaustion like the embedded build does
//! MBVM_ARENA_WORDS=4096 MBVM_EXHAUSTION_ACTION=halt ./host
//!
//! # Reproducible "random" picks
//! MBVM_RANDOM_SEED=7 ./host
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default arena size in words
pub const DEFAULT_ARENA_WORDS: usize = 100_000;

/// Smallest arena size accepted from the environment
pub const MIN_ARENA_WORDS: usize = 16;

/// Largest arena: every payload that fits must also fit a header
pub const MAX_ARENA_WORDS: usize = 1 << 28;

/// What the allocator does when the arena is exhausted.
///
/// Exhaustion is never reported as a recoverable error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExhaustionAction {
    /// Terminate the process with a non-zero status (desktop)
    #[default]
    Exit,
    /// Spin forever awaiting an external reset (embedded)
    Halt,
    /// Panic with the exhaustion report
    Panic,
}

impl ExhaustionAction {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "exit" => Some(ExhaustionAction::Exit),
            "halt" => Some(ExhaustionAction::Halt),
            "panic" => Some(ExhaustionAction::Panic),
            _ => None,
        }
    }
}

/// Object memory configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Arena size in words
    pub arena_words: usize,
    /// Action taken when an allocation does not fit
    pub exhaustion_action: ExhaustionAction,
    /// Seed for the `random` selector; `None` seeds from entropy
    pub random_seed: Option<u64>,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            arena_words: DEFAULT_ARENA_WORDS,
            exhaustion_action: ExhaustionAction::Exit,
            random_seed: None,
        }
    }
}

impl MemoryConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let arena_words = match std::env::var("MBVM_ARENA_WORDS") {
            Ok(s) => match s.trim().parse::<usize>() {
                Ok(n) if (MIN_ARENA_WORDS..=MAX_ARENA_WORDS).contains(&n) => n,
                _ => {
                    warn!(value = %s, "MBVM_ARENA_WORDS not usable, using default");
                    defaults.arena_words
                }
            },
            Err(_) => defaults.arena_words,
        };

        let exhaustion_action = match std::env::var("MBVM_EXHAUSTION_ACTION") {
            Ok(s) => ExhaustionAction::parse(&s).unwrap_or_else(|| {
                warn!(value = %s, "MBVM_EXHAUSTION_ACTION not recognized, using exit");
                ExhaustionAction::Exit
            }),
            Err(_) => defaults.exhaustion_action,
        };

        let random_seed = std::env::var("MBVM_RANDOM_SEED")
            .ok()
            .and_then(|s| s.trim().parse().ok());

        Self {
            arena_words,
            exhaustion_action,
            random_seed,
        }
    }

    pub fn with_arena_words(mut self, words: usize) -> Self {
        self.arena_words = words;
        self
    }

    pub fn with_exhaustion_action(mut self, action: ExhaustionAction) -> Self {
        self.exhaustion_action = action;
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        // SAFETY: tests touching the environment are serialized
        unsafe {
            std::env::remove_var("MBVM_ARENA_WORDS");
            std::env::remove_var("MBVM_EXHAUSTION_ACTION");
            std::env::remove_var("MBVM_RANDOM_SEED");
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        assert_eq!(MemoryConfig::from_env(), MemoryConfig::default());
    }

    #[test]
    #[serial]
    fn test_from_env_reads_values() {
        clear_env();
        unsafe {
            std::env::set_var("MBVM_ARENA_WORDS", "4096");
            std::env::set_var("MBVM_EXHAUSTION_ACTION", "HALT");
            std::env::set_var("MBVM_RANDOM_SEED", "7");
        }
        let config = MemoryConfig::from_env();
        assert_eq!(config.arena_words, 4096);
        assert_eq!(config.exhaustion_action, ExhaustionAction::Halt);
        assert_eq!(config.random_seed, Some(7));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_bad_values() {
        clear_env();
        unsafe {
            std::env::set_var("MBVM_ARENA_WORDS", "3");
            std::env::set_var("MBVM_EXHAUSTION_ACTION", "reboot");
            std::env::set_var("MBVM_RANDOM_SEED", "not-a-number");
        }
        let config = MemoryConfig::from_env();
        assert_eq!(config.arena_words, DEFAULT_ARENA_WORDS);
        assert_eq!(config.exhaustion_action, ExhaustionAction::Exit);
        assert_eq!(config.random_seed, None);
        clear_env();
    }

    #[test]
    fn test_builders() {
        let config = MemoryConfig::default()
            .with_arena_words(64)
            .with_exhaustion_action(ExhaustionAction::Panic)
            .with_random_seed(1);
        assert_eq!(config.arena_words, 64);
        assert_eq!(config.exhaustion_action, ExhaustionAction::Panic);
        assert_eq!(config.random_seed, Some(1));
    }
}
