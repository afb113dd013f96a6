//! Session configuration.

use crate::types::TICK_MS;

/// Seed and animation timing for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Seed for tile spawning
    pub seed: u32,
    /// Interval between animation ticks in milliseconds
    pub tick_ms: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            tick_ms: TICK_MS,
        }
    }
}

impl SessionConfig {
    /// Load configuration from environment variables.
    ///
    /// - `TUI_2048_SEED`: spawn seed (default 1)
    /// - `TUI_2048_TICK_MS`: animation tick in ms (default 16, minimum 1)
    ///
    /// Unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let seed = lookup("TUI_2048_SEED")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(defaults.seed);

        let tick_ms = lookup("TUI_2048_TICK_MS")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .map(|v| v.max(1))
            .unwrap_or(defaults.tick_ms);

        Self { seed, tick_ms }
    }
}
