//! World configuration: grid geometry, frame rate and building colors.

use crate::error::LoadError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Default size of one grid cell in pixels.
pub const DEFAULT_CELL_SIZE: u32 = 10;
/// Default number of grid rows.
pub const DEFAULT_NUM_ROWS: u32 = 44;
/// Default number of grid columns.
pub const DEFAULT_NUM_COLS: u32 = 44;
/// Default viewer redraw rate.
pub const DEFAULT_FRAME_RATE: u32 = 30;

/// An RGB color triple.
pub type Rgb = [u8; 3];

/// World configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Size of one grid cell in pixels.
    pub cell_size: u32,
    /// Number of grid rows.
    pub num_rows: u32,
    /// Number of grid columns.
    pub num_cols: u32,
    /// Viewer redraws per second.
    pub frame_rate: u32,
    /// Display color per building kind.
    pub building_colors: HashMap<String, Rgb>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            num_rows: DEFAULT_NUM_ROWS,
            num_cols: DEFAULT_NUM_COLS,
            frame_rate: DEFAULT_FRAME_RATE,
            building_colors: HashMap::new(),
        }
    }
}

/// Command-line overrides applied on top of a loaded config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Replacement cell size.
    pub cell_size: Option<u32>,
    /// Replacement row count.
    pub num_rows: Option<u32>,
    /// Replacement column count.
    pub num_cols: Option<u32>,
    /// Replacement frame rate.
    pub frame_rate: Option<u32>,
}

impl WorldConfig {
    /// Parse a config from JSON text. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid config.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Load a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), ?config, "loaded world config");
        Ok(config)
    }

    /// Apply command-line overrides.
    ///
    /// Zero values are ignored, as a zero-sized grid or cell cannot be drawn.
    #[must_use]
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        let pick = |value: Option<u32>, current: u32| value.filter(|v| *v > 0).unwrap_or(current);
        self.cell_size = pick(overrides.cell_size, self.cell_size);
        self.num_rows = pick(overrides.num_rows, self.num_rows);
        self.num_cols = pick(overrides.num_cols, self.num_cols);
        self.frame_rate = pick(overrides.frame_rate, self.frame_rate);
        self
    }

    /// Configured color of `kind`.
    #[must_use]
    pub fn color_of(&self, kind: &str) -> Option<Rgb> {
        self.building_colors.get(kind).copied()
    }

    /// Window size in pixels (width, height) for the configured grid.
    #[must_use]
    pub fn pixel_size(&self) -> (u64, u64) {
        let cell = u64::from(self.cell_size);
        (u64::from(self.num_cols) * cell, u64::from(self.num_rows) * cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = WorldConfig::from_json("{}").unwrap();
        assert_eq!(config, WorldConfig::default());
        assert_eq!(config.cell_size, 10);
        assert_eq!(config.num_rows, 44);
        assert_eq!(config.num_cols, 44);
    }

    #[test]
    fn test_partial_config() {
        let config = WorldConfig::from_json(
            r#"{"cell_size": 16, "building_colors": {"cannon": [120, 120, 120]}}"#,
        )
        .unwrap();
        assert_eq!(config.cell_size, 16);
        assert_eq!(config.num_cols, DEFAULT_NUM_COLS);
        assert_eq!(config.color_of("cannon"), Some([120, 120, 120]));
        assert_eq!(config.color_of("mortar"), None);
    }

    #[test]
    fn test_color_out_of_range_rejected() {
        assert!(WorldConfig::from_json(r#"{"building_colors": {"cannon": [300, 0, 0]}}"#).is_err());
    }

    #[test]
    fn test_overrides_replace_set_values_only() {
        let config = WorldConfig::default().with_overrides(Overrides {
            cell_size: Some(20),
            num_rows: None,
            num_cols: Some(0),
            frame_rate: Some(60),
        });
        assert_eq!(config.cell_size, 20);
        assert_eq!(config.num_rows, DEFAULT_NUM_ROWS);
        assert_eq!(config.num_cols, DEFAULT_NUM_COLS);
        assert_eq!(config.frame_rate, 60);
        assert_eq!(config.pixel_size(), (880, 880));
    }

    #[test]
    fn test_load_missing_file() {
        let err = WorldConfig::load(Path::new("/nonexistent/config.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
