use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::state::{Bounds, Position};

/// Largest playfield side, and the largest magnitude any bound may take
pub const MAX_GRID_SIDE: i32 = 4096;

/// Configuration for a game session
///
/// Every constant the session needs lives here so independent sessions (and
/// tests) can run side by side with different layouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Body of the snake at the start of every session, head first
    pub initial_snake: Vec<Position>,
    /// Where the first food item sits
    pub initial_food: Position,
    /// Playable rectangle, inclusive on all sides
    pub bounds: Bounds,
    /// Delay between two ticks, in milliseconds
    pub tick_interval_ms: u64,
    /// Points awarded per food eaten
    pub score_increment: u32,
    /// Food is eaten when both axis deltas are below this many cells
    pub food_threshold: i32,
    /// Ignore turns straight back into the snake's neck
    pub guard_reversals: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_snake: vec![Position::new(5, 5)],
            initial_food: Position::new(5, 20),
            bounds: Bounds::new(0, 35, 0, 63),
            tick_interval_ms: 50,
            score_increment: 10,
            food_threshold: 2,
            guard_reversals: false,
        }
    }
}

impl GameConfig {
    /// Create a configuration with a custom playable rectangle anchored at the origin
    pub fn with_bounds(x_max: i32, y_max: i32) -> Self {
        Self {
            bounds: Bounds::new(0, x_max, 0, y_max),
            ..Default::default()
        }
    }

    /// Load overrides from a JSON file; missing fields keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject layouts the session cannot start from
    pub fn validate(&self) -> Result<()> {
        if self.initial_snake.is_empty() {
            anyhow::bail!("initial_snake must contain at least one cell");
        }
        let b = &self.bounds;
        if b.x_min > b.x_max || b.y_min > b.y_max {
            anyhow::bail!("bounds are inverted: {:?}", b);
        }
        if [b.x_min, b.x_max, b.y_min, b.y_max]
            .iter()
            .any(|v| v.unsigned_abs() > MAX_GRID_SIDE as u32)
            || b.width() > MAX_GRID_SIDE as usize
            || b.height() > MAX_GRID_SIDE as usize
        {
            anyhow::bail!(
                "bounds {:?} exceed the {}-cell grid limit",
                b,
                MAX_GRID_SIDE
            );
        }
        if let Some(cell) = self.initial_snake.iter().find(|p| !b.contains(**p)) {
            anyhow::bail!("initial_snake cell {:?} lies outside {:?}", cell, b);
        }
        if self.tick_interval_ms == 0 {
            anyhow::bail!("tick_interval_ms must be positive");
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.initial_snake, vec![Position::new(5, 5)]);
        assert_eq!(config.initial_food, Position::new(5, 20));
        assert_eq!(config.bounds, Bounds::new(0, 35, 0, 63));
        assert_eq!(config.tick_interval(), Duration::from_millis(50));
        assert_eq!(config.score_increment, 10);
        assert_eq!(config.food_threshold, 2);
        assert!(!config.guard_reversals);
    }

    #[test]
    fn test_custom_bounds() {
        let config = GameConfig::with_bounds(15, 20);
        assert_eq!(config.bounds, Bounds::new(0, 15, 0, 20));
        assert_eq!(config.score_increment, 10);
    }

    #[test]
    fn test_partial_json_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"tick_interval_ms": 120, "guard_reversals": true}}"#).unwrap();

        let config = GameConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.tick_interval_ms, 120);
        assert!(config.guard_reversals);
        assert_eq!(config.bounds, GameConfig::default().bounds);
    }

    #[test]
    fn test_rejects_empty_snake() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"initial_snake": []}}"#).unwrap();

        assert!(GameConfig::from_json_file(file.path()).is_err());
    }

    #[test]
    fn test_rejects_oversized_bounds() {
        let config = GameConfig {
            bounds: Bounds::new(0, i32::MAX, 0, 63),
            initial_snake: vec![Position::new(i32::MAX, 5)],
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());

        let far_away = GameConfig {
            bounds: Bounds::new(i32::MAX - 10, i32::MAX, 0, 63),
            initial_snake: vec![Position::new(i32::MAX - 5, 5)],
            ..GameConfig::default()
        };
        assert!(far_away.validate().is_err());

        assert!(GameConfig::with_bounds(MAX_GRID_SIDE - 1, 63).validate().is_ok());
        assert!(GameConfig::with_bounds(MAX_GRID_SIDE, 63).validate().is_err());
    }

    #[test]
    fn test_rejects_snake_outside_bounds() {
        let config = GameConfig {
            initial_snake: vec![Position::new(5, 5), Position::new(-1, 5)],
            ..GameConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("outside"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GameConfig::from_json_file(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
