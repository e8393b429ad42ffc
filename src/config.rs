//! Service configuration
//!
//! Defaults are built in; each knob is overridable through an environment
//! variable. Unparseable values fall back to the default with a warning
//! rather than aborting startup.

use std::str::FromStr;

use tracing::warn;

use crate::broadcast::DEFAULT_CHANNEL_CAPACITY;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// TCP port the HTTP/WebSocket server binds to.
    pub port: u16,
    /// Broadcast channel capacity per the fan-out hub.
    pub broadcast_capacity: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: 5227,
            broadcast_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl ServiceConfig {
    /// Build a config from defaults plus `MONITOR_PORT` and
    /// `MONITOR_BROADCAST_CAPACITY` overrides.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: env_override("MONITOR_PORT", defaults.port),
            broadcast_capacity: env_override(
                "MONITOR_BROADCAST_CAPACITY",
                defaults.broadcast_capacity,
            ),
        }
    }
}

fn env_override<T: FromStr + Copy>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "unparseable env override, using default");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.port, 5227);
        assert_eq!(config.broadcast_capacity, DEFAULT_CHANNEL_CAPACITY);
    }

    #[test]
    fn test_env_override_falls_back_on_missing() {
        assert_eq!(env_override("MONITOR_TEST_UNSET_KEY", 42u16), 42);
    }
}
