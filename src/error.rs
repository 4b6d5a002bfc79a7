//! Construction-time errors
//!
//! Only match setup can fail. Once a `MatchState` exists, runtime oddities
//! (failed bonus placement, late collision events) are skipped, not raised.

/// Invalid match configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be finite")]
    NonFinite { field: &'static str },
    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },
    #[error("{field} range is inverted: [{min}, {max}]")]
    InvertedRange {
        field: &'static str,
        min: f32,
        max: f32,
    },
    #[error("{field} must be at least {min} (got {value})")]
    TooSmall {
        field: &'static str,
        min: usize,
        value: usize,
    },
    #[error("speed_up_factor must be > 1 (got {0})")]
    SpeedUpFactor(f32),
    #[error("speed_down_factor must be in (0, 1) (got {0})")]
    SpeedDownFactor(f32),
    #[error("{field} must be in [0, 1] (got {value})")]
    AlphaOutOfRange { field: &'static str, value: f32 },
    #[error("bonus palette is empty")]
    EmptyPalette,
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure to construct a match
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("arena bounds are degenerate: x [{min_x}, {max_x}], y [{min_y}, {max_y}]")]
    DegenerateBounds {
        min_x: f32,
        max_x: f32,
        min_y: f32,
        max_y: f32,
    },
    #[error("edge padding {0} leaves no spawnable area")]
    PaddingTooLarge(f32),
    #[error("player {player} spawn point ({x}, {y}) lies outside the arena")]
    SpawnOutsideArena { player: u8, x: f32, y: f32 },
}
