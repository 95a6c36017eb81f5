//! Cache runtime configuration and loaders.
use std::env;

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Capacity of each aspect worker's command queue.
    pub command_buffer_size: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            command_buffer_size: 32,
        }
    }
}

impl CacheConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_COMMAND_BUFFER` - Per-aspect command queue size (default: 32)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(capacity) = read_env::<usize>("CACHE_COMMAND_BUFFER") {
            config.command_buffer_size = capacity.max(1);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
