#![forbid(unsafe_code)]

//! Synchronizer configuration, as supplied by the embedding host.

use core::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::host::ScrollBehavior;
use crate::{DEFAULT_OFFSET_PX, INITIAL_SYNC_DELAY};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse anchor scroll config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("offset_px must be a finite, non-negative number (got {0})")]
    InvalidOffset(f64),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Tuning knobs. The defaults reproduce the fixed page contract: a 120 px
/// sticky header and a 100 ms settle delay with smooth scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Pixels subtracted from the element's document-relative top.
    pub offset_px: f64,
    /// Delay between structural load completion and the first sync.
    pub initial_delay_ms: u64,
    pub behavior: ScrollBehavior,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            offset_px: DEFAULT_OFFSET_PX,
            initial_delay_ms: INITIAL_SYNC_DELAY.as_millis() as u64,
            behavior: ScrollBehavior::Smooth,
        }
    }
}

impl SyncConfig {
    /// Parse and validate a JSON object. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.offset_px.is_finite() || self.offset_px < 0.0 {
            return Err(ConfigError::InvalidOffset(self.offset_px));
        }
        Ok(())
    }

    #[must_use]
    pub const fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn default_matches_page_contract() {
        let config = SyncConfig::default();
        assert_eq!(config.offset_px, 120.0);
        assert_eq!(config.initial_delay(), Duration::from_millis(100));
        assert_eq!(config.behavior, ScrollBehavior::Smooth);
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(SyncConfig::from_json("{}").unwrap(), SyncConfig::default());
    }

    #[test]
    fn partial_override() {
        let config = SyncConfig::from_json(r#"{"offset_px":80,"behavior":"instant"}"#).unwrap();
        assert_eq!(config.offset_px, 80.0);
        assert_eq!(config.initial_delay_ms, 100);
        assert_eq!(config.behavior, ScrollBehavior::Instant);
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = SyncConfig::from_json(r#"{"offset":80}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "{err}");
    }

    #[test]
    fn rejects_negative_offset() {
        let err = SyncConfig::from_json(r#"{"offset_px":-1}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOffset(v) if v == -1.0));
    }

    #[test]
    fn rejects_non_finite_offset() {
        let config = SyncConfig {
            offset_px: f64::NAN,
            ..SyncConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
