//! Session configuration
//!
//! Fixed for the lifetime of a session. Loaded from JSON or built from a profile.

use std::path::Path;
use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::PerKind;

/// Session length presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Profile {
    Quick,
    Standard,
    #[default]
    Full,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Quick => "Quick",
            Profile::Standard => "Standard",
            Profile::Full => "Full",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "quick" | "short" => Some(Profile::Quick),
            "standard" | "std" => Some(Profile::Standard),
            "full" => Some(Profile::Full),
            _ => None,
        }
    }

    /// Display slots per object kind; also the number of spawns per kind
    pub fn slot_capacity(&self) -> usize {
        match self {
            Profile::Quick => 50,
            Profile::Standard => 100,
            Profile::Full => 200,
        }
    }
}

/// Per-session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Preset the capacities were taken from
    pub profile: Profile,
    /// Display slots per kind
    pub slot_capacity: PerKind<usize>,
    /// Score delta per caught object (good > 0, bad < 0)
    pub score: PerKind<i32>,
    /// Milliseconds between spawn ticks
    pub spawn_interval_ms: u64,
    /// Field width / height
    pub aspect_ratio: f32,
    /// Catcher y in display space
    pub catcher_ground_y: f32,
    /// Catcher |x| limit in display space
    pub catcher_bound: f32,
    /// Catcher sensing zone size in display units
    pub catcher_size: Vec2,
    /// Falling object radius in display units (horizontal)
    pub object_radius: f32,
    /// Downward acceleration in display units per second squared
    pub gravity: f32,
    /// RNG seed for spawn positions; `None` seeds from the clock
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from_profile(Profile::default())
    }
}

impl SessionConfig {
    /// Build a config with the given preset's capacities
    pub fn from_profile(profile: Profile) -> Self {
        let capacity = profile.slot_capacity();
        Self {
            profile,
            slot_capacity: PerKind::new(capacity, capacity),
            score: PerKind::new(10, -10),
            spawn_interval_ms: 1000,
            aspect_ratio: FIELD_ASPECT,
            catcher_ground_y: CATCHER_GROUND_Y,
            catcher_bound: CATCHER_BOUND,
            catcher_size: Vec2::new(0.4, 0.2),
            object_radius: 0.065,
            gravity: 0.5,
            seed: None,
        }
    }

    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }

    /// Parse a config from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded session config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Check the values a session depends on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        for (kind, capacity) in self.slot_capacity.iter() {
            if *capacity == 0 {
                return invalid(format!("slot_capacity.{kind} must be at least 1"));
            }
        }
        if self.score.good <= 0 {
            return invalid(format!("score.good must be positive, got {}", self.score.good));
        }
        if self.score.bad >= 0 {
            return invalid(format!("score.bad must be negative, got {}", self.score.bad));
        }
        if self.spawn_interval_ms == 0 {
            return invalid("spawn_interval_ms must be positive".to_string());
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return invalid(format!("aspect_ratio must be positive, got {}", self.aspect_ratio));
        }
        if !(self.catcher_bound > 0.0 && self.catcher_bound <= 1.0) {
            return invalid(format!("catcher_bound must be in (0, 1], got {}", self.catcher_bound));
        }
        if !(-1.0..=1.0).contains(&self.catcher_ground_y) {
            return invalid(format!(
                "catcher_ground_y must be in [-1, 1], got {}",
                self.catcher_ground_y
            ));
        }
        if self.catcher_size.x <= 0.0 || self.catcher_size.y <= 0.0 {
            return invalid("catcher_size must be positive".to_string());
        }
        if !(self.object_radius > 0.0 && self.object_radius < 1.0) {
            return invalid(format!("object_radius must be in (0, 1), got {}", self.object_radius));
        }
        if !(self.gravity.is_finite() && self.gravity > 0.0) {
            return invalid(format!("gravity must be positive, got {}", self.gravity));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles() {
        assert_eq!(Profile::from_str("QUICK"), Some(Profile::Quick));
        assert_eq!(Profile::from_str("std"), Some(Profile::Standard));
        assert_eq!(Profile::from_str("marathon"), None);
        assert_eq!(SessionConfig::default().slot_capacity.good, 200);
        assert_eq!(SessionConfig::from_profile(Profile::Quick).slot_capacity.bad, 50);
    }

    #[test]
    fn test_default_is_valid() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config =
            SessionConfig::from_json(r#"{ "spawn_interval_ms": 250, "seed": 7 }"#).unwrap();
        assert_eq!(config.spawn_interval(), Duration::from_millis(250));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.catcher_bound, CATCHER_BOUND);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = SessionConfig::from_json(r#"{ "score": { "good": 5, "bad": 3 } }"#);
        assert!(matches!(err, Err(ConfigError::Invalid(_))));

        let err = SessionConfig::from_json(r#"{ "slot_capacity": { "good": 0, "bad": 3 } }"#);
        assert!(matches!(err, Err(ConfigError::Invalid(_))));

        let err = SessionConfig::from_json("not json");
        assert!(matches!(err, Err(ConfigError::Parse(_))));
    }
}
