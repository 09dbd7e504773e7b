use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::operations::placement::{
    DEFAULT_DROP_STEP, DEFAULT_MAX_DROP_STEPS, DEFAULT_MAX_OVERLAP_ITERATIONS,
};
use crate::operations::rasterize::DEFAULT_CUSTOM_MIN_PIXELS;

/// Which placement rules a slice applies to each object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementMode {
    /// Drop under gravity with overlap resolution and sheet draping.
    #[default]
    Gravity,
    /// Resolve overlap at the spawn pose, no descent.
    OverlapOnly,
    /// Write the object at its spawn pose with no rules.
    Stamp,
}

/// Where objects enter the container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Rows below the interior top.
    pub row_offset: i64,
    /// Columns kept free at the right edge of the spawn range.
    pub col_margin: i64,
}

/// Settings shared by every slice of a packing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub seed: u64,
    pub slices: usize,
    pub placement: PlacementMode,
    pub drop_step: i64,
    pub max_drop_steps: usize,
    pub max_overlap_iterations: usize,
    pub spawn: SpawnConfig,
    /// Minimum foreground count for a custom mask section.
    pub custom_min_pixels: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            slices: 1,
            placement: PlacementMode::Gravity,
            drop_step: DEFAULT_DROP_STEP,
            max_drop_steps: DEFAULT_MAX_DROP_STEPS,
            max_overlap_iterations: DEFAULT_MAX_OVERLAP_ITERATIONS,
            spawn: SpawnConfig::default(),
            custom_min_pixels: DEFAULT_CUSTOM_MIN_PIXELS,
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_slices(mut self, slices: usize) -> Self {
        self.slices = slices;
        self
    }

    #[must_use]
    pub fn with_placement(mut self, placement: PlacementMode) -> Self {
        self.placement = placement;
        self
    }

    #[must_use]
    pub fn with_drop_step(mut self, drop_step: i64) -> Self {
        self.drop_step = drop_step;
        self
    }

    #[must_use]
    pub fn with_max_drop_steps(mut self, max_drop_steps: usize) -> Self {
        self.max_drop_steps = max_drop_steps;
        self
    }

    #[must_use]
    pub fn with_max_overlap_iterations(mut self, max_overlap_iterations: usize) -> Self {
        self.max_overlap_iterations = max_overlap_iterations;
        self
    }

    #[must_use]
    pub fn with_spawn(mut self, spawn: SpawnConfig) -> Self {
        self.spawn = spawn;
        self
    }

    #[must_use]
    pub fn with_custom_min_pixels(mut self, custom_min_pixels: usize) -> Self {
        self.custom_min_pixels = custom_min_pixels;
        self
    }

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidInput` for a zero slice count, a
    /// non-positive drop step or a zero iteration cap.
    pub fn validate(&self) -> Result<()> {
        let problem = if self.slices == 0 {
            Some("slices must be at least 1".to_string())
        } else if self.drop_step <= 0 {
            Some(format!("drop_step must be positive, got {}", self.drop_step))
        } else if self.max_drop_steps == 0 {
            Some("max_drop_steps must be at least 1".to_string())
        } else if self.max_overlap_iterations == 0 {
            Some("max_overlap_iterations must be at least 1".to_string())
        } else if self.spawn.row_offset < 0 || self.spawn.col_margin < 0 {
            Some("spawn offsets must be non-negative".to_string())
        } else {
            None
        };
        match problem {
            Some(msg) => Err(ConfigError::InvalidInput(msg).into()),
            None => Ok(()),
        }
    }

    /// Parses and validates a JSON configuration. Missing fields take their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` for malformed input and the errors of
    /// [`SessionConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::BagError;

    #[test]
    fn defaults_are_valid() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.drop_step, 50);
        assert_eq!(config.max_drop_steps, 50);
        assert_eq!(config.max_overlap_iterations, 10);
        assert_eq!(config.custom_min_pixels, 50);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = SessionConfig::from_json(
            r#"{"seed": 9, "slices": 4, "placement": "overlap_only", "spawn": {"col_margin": 30}}"#,
        )
        .unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.slices, 4);
        assert_eq!(config.placement, PlacementMode::OverlapOnly);
        assert_eq!(config.spawn.col_margin, 30);
        assert_eq!(config.spawn.row_offset, 0);
        assert_eq!(config.drop_step, 50);
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(SessionConfig::default().with_slices(0).validate().is_err());
        assert!(SessionConfig::default().with_drop_step(0).validate().is_err());
        assert!(SessionConfig::default()
            .with_max_overlap_iterations(0)
            .validate()
            .is_err());
        let err = SessionConfig::from_json(r#"{"placement": "teleport"}"#).unwrap_err();
        assert!(matches!(err, BagError::Config(ConfigError::Json(_))));
    }
}
