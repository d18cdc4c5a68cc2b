use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

/// Settings picked before a game starts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// `(rows, columns)`
    pub size: Coord2,
    pub theme: ThemeId,
}

impl GameConfig {
    pub const DEFAULT: Self = Self::new_unchecked((2, 2), 0);

    pub const fn new_unchecked(size: Coord2, theme: ThemeId) -> Self {
        Self { size, theme }
    }

    pub fn new(size: Coord2, theme: ThemeId) -> Result<Self> {
        Ok(Self::new_unchecked(validate_size(size)?, theme))
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn total_pairs(&self) -> CellCount {
        self.total_cells() / 2
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridPreset {
    pub name: &'static str,
    pub size: Coord2,
}

/// Grid sizes offered by the new game menu.
pub const GRID_PRESETS: [GridPreset; 7] = [
    GridPreset { name: "2x2", size: (2, 2) },
    GridPreset { name: "2x3", size: (2, 3) },
    GridPreset { name: "3x4", size: (3, 4) },
    GridPreset { name: "4x4", size: (4, 4) },
    GridPreset { name: "4x5", size: (4, 5) },
    GridPreset { name: "5x6", size: (5, 6) },
    GridPreset { name: "6x6", size: (6, 6) },
];

pub fn preset_by_name(name: &str) -> Option<GridPreset> {
    GRID_PRESETS.iter().copied().find(|preset| preset.name == name)
}

/// Delays the state machine waits on, in milliseconds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Time both cards stay visible before the comparison resolves.
    pub flip_back_delay_ms: u32,
    /// Length of a single flip animation.
    pub flip_ms: u32,
    /// How long the board is shown before play starts.
    pub preview_ms: u32,
}

impl Timings {
    pub fn flip_back_delay(&self) -> Duration {
        Duration::from_millis(self.flip_back_delay_ms.into())
    }

    pub fn flip_duration(&self) -> Duration {
        Duration::from_millis(self.flip_ms.into())
    }

    pub fn preview_duration(&self) -> Duration {
        Duration::from_millis(self.preview_ms.into())
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            flip_back_delay_ms: 1000,
            flip_ms: 300,
            preview_ms: 3000,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    pub base_score: u32,
    /// Added once per combo step on top of `base_score`.
    pub combo_bonus: u32,
    /// Largest move gap between two matches that keeps the combo going.
    pub combo_window: u32,
}

impl ScoringRules {
    /// Points for a match given the combo step it landed on.
    pub const fn match_score(&self, combo_count: u32) -> u32 {
        self.base_score
            .saturating_add(self.combo_bonus.saturating_mul(combo_count))
    }
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            base_score: 10,
            combo_bonus: 5,
            combo_window: 2,
        }
    }
}

/// Everything a [`GameSession`] needs besides its collaborators.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Used when nothing else was selected, and as the fallback after a failed load.
    pub default_game: GameConfig,
    pub timings: Timings,
    pub scoring: ScoringRules,
    pub seed: u64,
}

impl SessionConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source).map_err(|err| {
            log::warn!("Failed to parse session config: {}", err);
            GameError::InvalidArgument("malformed session config")
        })?;
        validate_size(config.default_game.size)?;
        Ok(config)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_game: GameConfig::DEFAULT,
            timings: Timings::default(),
            scoring: ScoringRules::default(),
            seed: 0,
        }
    }
}
