//! `tracing` subscriber setup for hosts that don't install their own.
//!
//! Operations log at `debug` on entry and `error` on platform failure;
//! store resets log at `info`.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

use crate::consts::DEFAULT_LOG_FILTER;

/// Filter from `RUST_LOG`, falling back to `fallback` when unset or invalid.
pub fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Install a global fmt subscriber. Fails if one is already installed.
pub fn init() -> Result<()> {
    init_with(env_filter(DEFAULT_LOG_FILTER))
}

pub fn init_with(filter: EnvFilter) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_fails() {
        // Either this test installed the subscriber or another one did first.
        let _ = init_with(EnvFilter::new("debug"));
        assert!(init().is_err());
    }
}
