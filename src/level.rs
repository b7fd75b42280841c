//! Per-level tuning table.
//!
//! Durations are authored in milliseconds and converted to ticks on read.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Wall-clock length of one simulation tick at base speed.
pub const TICK_MS: u32 = 80;

/// Levels at or above this number reuse the last built-in tier.
pub const EXTENDED_LEVEL: u32 = 21;

/// Global ghost behaviour phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlobalMode {
    Scatter,
    Chase,
}

/// One entry of a scatter/chase schedule. `duration_ms: None` never expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModePhase {
    pub mode: GlobalMode,
    pub duration_ms: Option<u32>,
}

impl ModePhase {
    pub const fn timed(mode: GlobalMode, duration_ms: u32) -> Self {
        Self {
            mode,
            duration_ms: Some(duration_ms),
        }
    }

    pub const fn infinite(mode: GlobalMode) -> Self {
        Self {
            mode,
            duration_ms: None,
        }
    }
}

/// Cumulative dots-eaten thresholds at which each penned ghost leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseDots {
    pub pinky: u32,
    pub inky: u32,
    pub clyde: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FruitKind {
    Cherry,
    Strawberry,
    Orange,
    Apple,
    Melon,
    Galaxian,
    Bell,
    Key,
}

/// Tuning for one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub pacman_step_ms: u32,
    pub pacman_tunnel_step_ms: u32,
    pub ghost_base_stride: u32,
    pub ghost_tunnel_stride_delta: i32,
    pub ghost_frightened_stride_delta: i32,
    pub ghost_eaten_stride_delta: i32,
    /// Added to Blinky's stride once per aggression phase.
    pub elroy_stride_bonus: i32,
    /// Remaining-pellet thresholds for aggression phases 1 and 2.
    pub elroy_dots: [u32; 2],
    pub frightened_ms: u32,
    #[serde(default)]
    pub mode_schedule: Option<Vec<ModePhase>>,
    pub release_dots: ReleaseDots,
    pub fruit: FruitKind,
    pub fruit_score: u32,
    /// Dots-eaten counts at which a fruit appears.
    pub fruit_dots: [u32; 2],
    pub ghost_eat_base_score: u32,
}

/// Converts a millisecond duration to ticks, rounding to nearest, minimum 1.
pub fn ms_to_ticks(ms: u32) -> u32 {
    (ms.saturating_add(TICK_MS / 2) / TICK_MS).max(1)
}

/// Like [`ms_to_ticks`] but `None` (infinite) stays `None`.
pub fn duration_to_ticks(ms: Option<u32>) -> Option<u32> {
    ms.map(ms_to_ticks)
}

/// Injectable level table. Starts with the built-in arcade tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTable {
    levels: Vec<LevelConfig>,
}

impl Default for LevelTable {
    fn default() -> Self {
        Self {
            levels: builtin_levels(),
        }
    }
}

impl LevelTable {
    pub fn new(levels: Vec<LevelConfig>) -> Self {
        Self { levels }
    }

    /// Parses a JSON array of level entries (level 1 first).
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let levels: Vec<LevelConfig> = serde_json::from_str(json)?;
        if levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        Ok(Self { levels })
    }

    /// Replaces every entry. An empty list leaves every consumer on its
    /// built-in fallback.
    pub fn set_levels(&mut self, levels: Vec<LevelConfig>) {
        log::debug!("level table overridden with {} entries", levels.len());
        self.levels = levels;
    }

    /// Restores the built-in arcade tiers.
    pub fn reset_levels(&mut self) {
        self.levels = builtin_levels();
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Entry for a 1-indexed level. Levels past the end reuse the last entry.
    pub fn get(&self, level: u32) -> Option<&LevelConfig> {
        if level == 0 {
            return None;
        }
        let idx = (level as usize - 1).min(self.levels.len().checked_sub(1)?);
        self.levels.get(idx)
    }
}

struct Tier {
    pacman_step_ms: u32,
    ghost_base_stride: u32,
    frightened_ms: u32,
    elroy_dots: [u32; 2],
    fruit: FruitKind,
    fruit_score: u32,
}

const TIERS: [Tier; EXTENDED_LEVEL as usize] = [
    tier(80, 2, 6000, [20, 10], FruitKind::Cherry, 100),
    tier(72, 2, 5000, [30, 15], FruitKind::Strawberry, 300),
    tier(72, 2, 4000, [40, 20], FruitKind::Orange, 500),
    tier(72, 2, 3000, [40, 20], FruitKind::Orange, 500),
    tier(64, 2, 2000, [40, 20], FruitKind::Apple, 700),
    tier(64, 2, 5000, [50, 25], FruitKind::Apple, 700),
    tier(64, 2, 2000, [50, 25], FruitKind::Melon, 1000),
    tier(64, 2, 2000, [50, 25], FruitKind::Melon, 1000),
    tier(64, 2, 1000, [60, 30], FruitKind::Galaxian, 2000),
    tier(64, 2, 5000, [60, 30], FruitKind::Galaxian, 2000),
    tier(64, 2, 2000, [60, 30], FruitKind::Bell, 3000),
    tier(64, 2, 1000, [80, 40], FruitKind::Bell, 3000),
    tier(64, 2, 1000, [80, 40], FruitKind::Key, 5000),
    tier(64, 2, 3000, [80, 40], FruitKind::Key, 5000),
    tier(64, 2, 1000, [100, 50], FruitKind::Key, 5000),
    tier(64, 2, 1000, [100, 50], FruitKind::Key, 5000),
    tier(64, 2, 1000, [100, 50], FruitKind::Key, 5000),
    tier(64, 2, 1000, [100, 50], FruitKind::Key, 5000),
    tier(64, 2, 1000, [120, 60], FruitKind::Key, 5000),
    tier(64, 2, 1000, [120, 60], FruitKind::Key, 5000),
    tier(72, 2, 1000, [120, 60], FruitKind::Key, 5000),
];

const fn tier(
    pacman_step_ms: u32,
    ghost_base_stride: u32,
    frightened_ms: u32,
    elroy_dots: [u32; 2],
    fruit: FruitKind,
    fruit_score: u32,
) -> Tier {
    Tier {
        pacman_step_ms,
        ghost_base_stride,
        frightened_ms,
        elroy_dots,
        fruit,
        fruit_score,
    }
}

/// Release thresholds used when a level carries none.
pub fn default_release_dots(level: u32) -> ReleaseDots {
    match level {
        0 | 1 => ReleaseDots {
            pinky: 0,
            inky: 30,
            clyde: 90,
        },
        2 => ReleaseDots {
            pinky: 0,
            inky: 0,
            clyde: 50,
        },
        _ => ReleaseDots {
            pinky: 0,
            inky: 0,
            clyde: 0,
        },
    }
}

fn builtin_levels() -> Vec<LevelConfig> {
    TIERS
        .iter()
        .enumerate()
        .map(|(i, t)| LevelConfig {
            pacman_step_ms: t.pacman_step_ms,
            pacman_tunnel_step_ms: t.pacman_step_ms + 20,
            ghost_base_stride: t.ghost_base_stride,
            ghost_tunnel_stride_delta: 2,
            ghost_frightened_stride_delta: 1,
            ghost_eaten_stride_delta: -1,
            elroy_stride_bonus: -1,
            elroy_dots: t.elroy_dots,
            frightened_ms: t.frightened_ms,
            mode_schedule: None,
            release_dots: default_release_dots(i as u32 + 1),
            fruit: t.fruit,
            fruit_score: t.fruit_score,
            fruit_dots: [70, 170],
            ghost_eat_base_score: 200,
        })
        .collect()
}
