//! Session bridge configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::capture::KEYSYM_PAUSE;

/// Top-level configuration for the session bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Message pump timing.
    pub pump: PumpConfig,
    /// Input handling.
    pub input: InputConfig,
    /// Encoding preferences the embedder applies during negotiation.
    pub encoding: EncodingConfig,
    /// Logging.
    pub logging: LoggingConfig,
}

/// Message pump timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PumpConfig {
    /// Pump period in milliseconds.
    pub tick_ms: u64,
    /// Bounded wait for protocol data per tick, in milliseconds.
    pub poll_timeout_ms: u64,
}

/// Input handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Keysym of the capture-toggle hotkey (default: Pause).
    pub hotkey_keysym: u32,
}

/// Encoding preferences for the protocol connection.
///
/// The engine negotiates these itself; they are surfaced here so the
/// embedding application can apply them before the pump starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    /// Compression level (0 = none).
    pub compress_level: u8,
    /// Quality level (0-9, 9 = best).
    pub quality_level: u8,
    /// Let the remote side render the cursor.
    pub prefer_remote_cursor: bool,
}

/// Logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level.
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            pump: PumpConfig::default(),
            input: InputConfig::default(),
            encoding: EncodingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for PumpConfig {
    fn default() -> Self {
        Self {
            tick_ms: 10,
            poll_timeout_ms: 500,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            hotkey_keysym: KEYSYM_PAUSE,
        }
    }
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            compress_level: 0,
            quality_level: 9,
            prefer_remote_cursor: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

// ── Durations ────────────────────────────────────────────────────

impl PumpConfig {
    /// Pump period as a [`Duration`].
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Poll timeout as a [`Duration`].
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl SessionConfig {
    /// Load from a TOML file, falling back to defaults.
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
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let cfg = SessionConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        assert!(text.contains("tick_ms"));
        assert!(text.contains("hotkey_keysym"));
    }

    #[test]
    fn roundtrip_config() {
        let cfg = SessionConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        let parsed: SessionConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.pump.tick_ms, 10);
        assert_eq!(parsed.pump.poll_timeout_ms, 500);
        assert_eq!(parsed.input.hotkey_keysym, KEYSYM_PAUSE);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let parsed: SessionConfig = toml::from_str("[pump]\ntick_ms = 25\n").unwrap();
        assert_eq!(parsed.pump.tick_ms, 25);
        assert_eq!(parsed.pump.poll_timeout_ms, 500);
        assert_eq!(parsed.encoding.quality_level, 9);
    }

    #[test]
    fn durations() {
        let pump = PumpConfig::default();
        assert_eq!(pump.tick(), Duration::from_millis(10));
        assert_eq!(pump.poll_timeout(), Duration::from_millis(500));
    }
}
