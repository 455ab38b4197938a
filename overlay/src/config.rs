//! Runtime options, parsed from an optional JSON string handed to `start()`.
//!
//! Every field has a default, so an absent or empty options string yields a
//! working configuration. Unknown fields are rejected to catch typos early.

use serde::Deserialize;

use crate::consts::{DEFAULT_LOG_LEVEL, DEFAULT_PLACEHOLDER_SRC, LEGACY_FPS, MS_PER_SEC};
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlayConfig {
    /// Target rate of the fixed-timer fallback loop.
    pub legacy_fps: f64,
    /// Source shown while the real video is being retrieved.
    pub placeholder_src: String,
    /// Transport timeout; `None` leaves it to the transport.
    pub fetch_timeout_ms: Option<u32>,
    /// Skip the video-frame-callback probe and always use the timer loop.
    pub force_legacy: bool,
    /// Console log level: `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: String,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            legacy_fps: LEGACY_FPS,
            placeholder_src: DEFAULT_PLACEHOLDER_SRC.to_string(),
            fetch_timeout_ms: None,
            force_legacy: false,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl OverlayConfig {
    /// Parse options from JSON. A missing or blank string gives the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown fields and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_options(raw: Option<&str>) -> Result<Self, ConfigError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(json) => {
                let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.legacy_fps.is_finite() || self.legacy_fps <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "legacy_fps",
                reason: format!("must be a positive number, got {}", self.legacy_fps),
            });
        }
        if self.placeholder_src.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "placeholder_src", reason: "must not be empty".into() });
        }
        if self.fetch_timeout_ms == Some(0) {
            return Err(ConfigError::Invalid { field: "fetch_timeout_ms", reason: "must be greater than zero".into() });
        }
        self.log_level()?;
        Ok(())
    }

    /// Period of the fixed-timer loop in milliseconds.
    #[must_use]
    pub fn legacy_period_ms(&self) -> f64 {
        MS_PER_SEC / self.legacy_fps
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `log_level` is not a known level.
    pub fn log_level(&self) -> Result<log::Level, ConfigError> {
        self.log_level.parse::<log::Level>().map_err(|_| ConfigError::Invalid {
            field: "log_level",
            reason: format!("unknown level '{}'", self.log_level),
        })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
