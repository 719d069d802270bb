use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Canvas coordinates of a node, serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position(pub i64, pub i64);

impl Position {
    pub fn x(&self) -> i64 {
        self.0
    }

    pub fn y(&self) -> i64 {
        self.1
    }
}

/// Left-to-right grid: one column per sequential stage, one row per parallel lane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    pub origin: [i64; 2],
    pub horizontal_spacing: i64,
    pub vertical_spacing: i64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            origin: [250, 300],
            horizontal_spacing: 400,
            vertical_spacing: 200,
        }
    }
}

impl LayoutConfig {
    pub(crate) fn check(&self) -> Result<(), ConfigError> {
        for (setting, value) in [
            ("horizontalSpacing", self.horizontal_spacing),
            ("verticalSpacing", self.vertical_spacing),
        ] {
            if value <= 0 {
                return Err(ConfigError::InvalidLayout {
                    setting: setting.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }

    /// Lane 0 is the main row; positive lanes go down, negative lanes go up.
    pub fn position(&self, stage: usize, lane: i64) -> Position {
        Position(
            self.origin[0] + stage as i64 * self.horizontal_spacing,
            self.origin[1] + lane * self.vertical_spacing,
        )
    }
}
