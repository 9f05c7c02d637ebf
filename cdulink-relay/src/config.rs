//! Configuration for the CDULINK relay service.

use std::net::{AddrParseError, SocketAddr};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use cdulink_core::{CduServiceConfig, Destination, MAX_QUIET_CYCLES};

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Network settings.
    pub network: NetworkConfig,
    /// Transmit cadence.
    pub timing: TimingConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Network configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Local address to bind the outbound UDP socket.
    pub bind: String,
    /// Display client addresses, one datagram each per packet.
    pub destinations: Vec<String>,
}

/// Transmit cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Poll interval in milliseconds while the display is live.
    pub active_interval_ms: u64,
    /// Poll interval in milliseconds while idle or superseded.
    pub idle_interval_ms: u64,
    /// Quiet cycles tolerated before a heartbeat send.
    pub max_quiet_cycles: u32,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            timing: TimingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:0".into(),
            destinations: vec!["127.0.0.1:49020".into()],
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            active_interval_ms: 100,
            idle_interval_ms: 10_000,
            max_quiet_cycles: MAX_QUIET_CYCLES,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".into() }
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl RelayConfig {
    /// Load configuration from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("invalid config {}: {e}; using defaults", path.display());
                Self::default()
            }),
            Err(_) => {
                tracing::info!("no config at {}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Pipeline settings derived from the timing section.
    pub fn to_service_config(&self) -> CduServiceConfig {
        CduServiceConfig {
            active_interval: Duration::from_millis(self.timing.active_interval_ms.max(10)),
            idle_interval: Duration::from_millis(self.timing.idle_interval_ms.max(100)),
            max_quiet_cycles: self.timing.max_quiet_cycles,
            ..CduServiceConfig::default()
        }
    }

    /// Parse the configured destination list.
    pub fn destinations(&self) -> Result<Vec<Destination>, AddrParseError> {
        self.network
            .destinations
            .iter()
            .map(|s| s.parse::<SocketAddr>().map(Destination::new))
            .collect()
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let cfg = RelayConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        assert!(text.contains("destinations"));
        assert!(text.contains("active_interval_ms"));
    }

    #[test]
    fn roundtrip_config() {
        let cfg = RelayConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        let parsed: RelayConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.network.destinations, vec!["127.0.0.1:49020"]);
        assert_eq!(parsed.timing.max_quiet_cycles, MAX_QUIET_CYCLES);
    }

    #[test]
    fn destinations_parse() {
        let cfg = RelayConfig::default();
        let dests = cfg.destinations().unwrap();
        assert_eq!(dests.len(), 1);
        assert!(dests[0].enabled);
    }

    #[test]
    fn service_config_clamps_intervals() {
        let mut cfg = RelayConfig::default();
        cfg.timing.active_interval_ms = 0;
        let svc = cfg.to_service_config();
        assert_eq!(svc.active_interval, Duration::from_millis(10));
    }
}
