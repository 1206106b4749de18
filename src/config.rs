//! # Server Configuration
//!
//! Process-wide tunables for the HTTP server, scoped to a [`ServerConfig`]
//! value that is passed into the server at construction time. Every field has
//! a documented default and can be overridden from `OXPRESS_*` environment
//! variables via [`ServerConfig::from_env`].
//!
//! Mutating a config after the server has been constructed has no effect on
//! the running server.

use std::env;
use std::time::Duration;

/// Tunables for the HTTP server and web layer.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Maximum cumulative header size per request, counted as the sum of
    /// `name.len() + value.len()` over all parsed headers (default: 8 KiB).
    pub max_header_size: usize,
    /// Maximum request body size in bytes (default: 1 MiB).
    pub max_body_size: usize,
    /// Idle threshold for in-flight requests; also the sweep interval of the
    /// idle reaper (default: 60 s).
    pub max_idle_time: Duration,
    /// Listen backlog passed to `listen(2)` (default: 128).
    pub backlog: i32,
    /// Capacity hint for the readiness multiplexer's event batch
    /// (default: 1024).
    pub max_events: usize,
    /// Upper bound on a single multiplexer wait (default: 1000 ms).
    pub poll_timeout: Duration,
    /// Size of the buffer used for each socket read (default: 8 KiB).
    pub read_buffer_size: usize,
    /// Number of worker threads executing request handlers
    /// (default: hardware parallelism).
    pub worker_threads: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_header_size: 8 * 1024,
            max_body_size: 1024 * 1024,
            max_idle_time: Duration::from_secs(60),
            backlog: 128,
            max_events: 1024,
            poll_timeout: Duration::from_millis(1000),
            read_buffer_size: 8 * 1024,
            worker_threads: default_workers(),
        }
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl ServerConfig {
    /// Load configuration from `OXPRESS_*` environment variables, falling
    /// back to the documented defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_header_size: env_usize("OXPRESS_MAX_HEADER_SIZE", defaults.max_header_size),
            max_body_size: env_usize("OXPRESS_MAX_BODY_SIZE", defaults.max_body_size),
            max_idle_time: Duration::from_secs(env_usize(
                "OXPRESS_MAX_IDLE_SECS",
                defaults.max_idle_time.as_secs() as usize,
            ) as u64),
            backlog: env_usize("OXPRESS_BACKLOG", defaults.backlog as usize) as i32,
            max_events: env_usize("OXPRESS_MAX_EVENTS", defaults.max_events),
            poll_timeout: Duration::from_millis(env_usize(
                "OXPRESS_POLL_TIMEOUT_MS",
                defaults.poll_timeout.as_millis() as usize,
            ) as u64),
            read_buffer_size: env_usize("OXPRESS_READ_BUFFER_SIZE", defaults.read_buffer_size),
            worker_threads: env_usize("OXPRESS_WORKERS", defaults.worker_threads).max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.max_header_size, 8 * 1024);
        assert_eq!(config.max_body_size, 1024 * 1024);
        assert_eq!(config.max_idle_time, Duration::from_secs(60));
        assert_eq!(config.backlog, 128);
        assert_eq!(config.poll_timeout, Duration::from_millis(1000));
        assert!(config.worker_threads >= 1);
    }

    #[test]
    fn test_from_env_overrides() {
        env::set_var("OXPRESS_MAX_BODY_SIZE", "4096");
        env::set_var("OXPRESS_MAX_IDLE_SECS", "5");
        let config = ServerConfig::from_env();
        env::remove_var("OXPRESS_MAX_BODY_SIZE");
        env::remove_var("OXPRESS_MAX_IDLE_SECS");
        assert_eq!(config.max_body_size, 4096);
        assert_eq!(config.max_idle_time, Duration::from_secs(5));
        // untouched fields keep their defaults
        assert_eq!(config.max_header_size, 8 * 1024);
    }

    #[test]
    fn test_from_env_rejects_garbage() {
        env::set_var("OXPRESS_MAX_EVENTS", "not-a-number");
        let config = ServerConfig::from_env();
        env::remove_var("OXPRESS_MAX_EVENTS");
        assert_eq!(config.max_events, 1024);
    }
}
