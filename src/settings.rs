//! Run configuration supplied by the host
//!
//! Values coming from form fields are clamped here, before they reach the
//! engine. Only values that cannot be clamped (NaN, malformed JSON) are errors.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::KindCounts;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be a finite number")]
    NonFinite(&'static str),
    #[error("arena {width}x{height} cannot hold a token of size {min}")]
    ArenaTooSmall { width: f32, height: f32, min: f32 },
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Tokens spawned of each kind
    #[serde(deserialize_with = "saturating_count")]
    pub per_type_count: u32,
    /// Multiplier on spawn speed
    pub speed_scale: f32,
    /// Fixed seed for a reproducible run; fresh entropy when absent
    pub seed: Option<u64>,
    /// Interleave the kinds in scan order after spawning
    pub shuffle_spawn_order: bool,
    /// Swap velocities when two tokens of the same kind touch
    pub bounce_same_kind: bool,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            per_type_count: DEFAULT_PER_TYPE_COUNT,
            speed_scale: DEFAULT_SPEED_SCALE,
            seed: None,
            shuffle_spawn_order: false,
            bounce_same_kind: false,
        }
    }
}

impl ArenaConfig {
    /// Parse host JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.sanitized()
    }

    /// Clamp numeric fields into their accepted ranges
    pub fn sanitized(&self) -> Result<Self, ConfigError> {
        if !self.speed_scale.is_finite() {
            return Err(ConfigError::NonFinite("speed_scale"));
        }

        let mut config = self.clone();
        if config.per_type_count < 1 {
            log::warn!("per_type_count {} raised to 1", config.per_type_count);
            config.per_type_count = 1;
        } else if config.per_type_count > MAX_PER_TYPE_COUNT {
            log::warn!(
                "per_type_count {} lowered to {}",
                config.per_type_count,
                MAX_PER_TYPE_COUNT
            );
            config.per_type_count = MAX_PER_TYPE_COUNT;
        }

        let speed = self.speed_scale.clamp(MIN_SPEED_SCALE, MAX_SPEED_SCALE);
        if speed != self.speed_scale {
            log::warn!("speed_scale {} clamped to {}", self.speed_scale, speed);
            config.speed_scale = speed;
        }
        Ok(config)
    }

    /// Per-kind spawn counts
    pub fn spawn_counts(&self) -> KindCounts {
        KindCounts::uniform(self.per_type_count)
    }

    /// Configured seed, or a fresh one from OS entropy
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

/// Form fields may send negative counts; saturate into `u32` and let
/// `sanitized` raise the result to the minimum
fn saturating_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let raw = i64::deserialize(deserializer)?;
    if raw < 0 {
        log::warn!("per_type_count {} is negative", raw);
    }
    Ok(raw.clamp(0, u32::MAX as i64) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ArenaConfig::default();
        assert_eq!(config.per_type_count, 50);
        assert_eq!(config.speed_scale, 1.0);
        assert_eq!(config.spawn_counts().total(), 150);
    }

    #[test]
    fn test_from_json_huge_count_clamped() {
        let config = ArenaConfig::from_json(r#"{"per_type_count": 2000000000}"#).unwrap();
        assert_eq!(config.per_type_count, MAX_PER_TYPE_COUNT);
        assert_eq!(config.spawn_counts().total(), 3 * MAX_PER_TYPE_COUNT);

        let config = ArenaConfig::from_json(r#"{"per_type_count": 99999999999}"#).unwrap();
        assert_eq!(config.per_type_count, MAX_PER_TYPE_COUNT);
    }

    #[test]
    fn test_zero_count_raised_to_one() {
        let config = ArenaConfig {
            per_type_count: 0,
            ..Default::default()
        }
        .sanitized()
        .unwrap();
        assert_eq!(config.per_type_count, 1);
    }

    #[test]
    fn test_speed_clamped_to_slider_range() {
        let slow = ArenaConfig {
            speed_scale: 0.0,
            ..Default::default()
        };
        assert_eq!(slow.sanitized().unwrap().speed_scale, MIN_SPEED_SCALE);

        let fast = ArenaConfig {
            speed_scale: 40.0,
            ..Default::default()
        };
        assert_eq!(fast.sanitized().unwrap().speed_scale, MAX_SPEED_SCALE);

        let nan = ArenaConfig {
            speed_scale: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(nan.sanitized(), Err(ConfigError::NonFinite(_))));
    }

    #[test]
    fn test_from_json_partial() {
        let config = ArenaConfig::from_json(r#"{"per_type_count": 12, "seed": 9}"#).unwrap();
        assert_eq!(config.per_type_count, 12);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.speed_scale, DEFAULT_SPEED_SCALE);
        assert_eq!(config.resolve_seed(), 9);
    }

    #[test]
    fn test_from_json_negative_count() {
        let config = ArenaConfig::from_json(r#"{"per_type_count": -4}"#).unwrap();
        assert_eq!(config.per_type_count, 1);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            ArenaConfig::from_json("{not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
