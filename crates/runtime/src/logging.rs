//! Log output for hosts embedding the object memory
//!
//! Logs go to stderr, filtered by `RUST_LOG`. When `RUST_LOG` is unset the
//! memory crates log at `info`. Set `RUST_LOG=mbvm=debug` to see arena
//! resets and list relocations, or `mbvm=trace` for every allocation.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or unparsable
pub const DEFAULT_DIRECTIVE: &str = "mbvm=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the stderr subscriber. Returns false if a global subscriber was
/// already installed.
pub fn init() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
