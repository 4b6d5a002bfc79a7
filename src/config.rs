//! Match configuration
//!
//! Static per-match parameters handed to the simulation by the host. The
//! struct is read-only to the core once a match is constructed.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::BonusKind;

/// Closed interval sampled uniformly (gap timings, spawn intervals)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Uniform sample in `[min, max]`; a collapsed range yields `min`
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f32 {
        if self.max <= self.min {
            self.min
        } else {
            rng.random_range(self.min..=self.max)
        }
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(ConfigError::NonFinite { field });
        }
        if self.min < 0.0 {
            return Err(ConfigError::Negative {
                field,
                value: self.min,
            });
        }
        if self.min > self.max {
            return Err(ConfigError::InvertedRange {
                field,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Match configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    // === Motion ===
    /// Base head speed (world units per second)
    pub speed: f32,
    /// Initial heading of both players (degrees, 90 = up)
    pub start_heading_deg: f32,
    /// Angular velocity while a turn is held
    pub turn_rate_deg_per_sec: f32,
    /// Instant heading change applied on a turn tap
    pub step_turn_deg: f32,
    /// Head hit-test radius
    pub head_radius: f32,
    pub spawn_p1: Vec2,
    pub spawn_p2: Vec2,

    // === Trail ===
    /// Collider thickness around the trail polyline
    pub trail_edge_radius: f32,
    /// Minimum distance between consecutive trail points
    pub resolution: f32,
    /// Freshest points withheld from the trail collider
    pub exclude_head_count: usize,
    /// Point count at which a segment becomes self-collidable
    pub min_points_before_arming: usize,
    /// Additional arming requirement: head distance from the segment seed
    pub arm_after_distance: f32,

    // === Gaps ===
    pub gap_interval: Range,
    pub gap_duration: Range,

    // === Bonuses ===
    pub bonuses_enabled: bool,
    pub bonus_interval: Range,
    pub bonus_max_concurrent: usize,
    pub bonus_initial_spawn_count: usize,
    pub bonus_radius: f32,
    /// Clearance from line-like obstacles (trail colliders)
    pub bonus_line_clearance: f32,
    /// Clearance from head-like obstacles (and anything unrecognized)
    pub bonus_head_clearance: f32,
    pub bonus_max_placement_attempts: usize,
    pub bonus_palette: Vec<BonusKind>,

    // === Effects ===
    pub speed_up_factor: f32,
    pub speed_down_factor: f32,
    pub effect_duration: f32,
    /// Trail alpha while the owner is invulnerable
    pub invulnerable_alpha: f32,

    // === End of match ===
    pub loser_fade_duration: f32,
    pub loser_fade_alpha: f32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            speed: 2.0,
            start_heading_deg: 90.0,
            turn_rate_deg_per_sec: 90.0,
            step_turn_deg: 15.0,
            head_radius: 0.05,
            spawn_p1: Vec2::new(-2.0, 0.0),
            spawn_p2: Vec2::new(2.0, 0.0),

            trail_edge_radius: 0.1,
            resolution: 0.1,
            exclude_head_count: 3,
            min_points_before_arming: 4,
            arm_after_distance: 0.0,

            gap_interval: Range::new(2.0, 3.0),
            gap_duration: Range::new(0.15, 0.35),

            bonuses_enabled: true,
            bonus_interval: Range::new(3.0, 6.0),
            bonus_max_concurrent: 3,
            bonus_initial_spawn_count: 1,
            bonus_radius: 0.5,
            bonus_line_clearance: 0.6,
            bonus_head_clearance: 1.0,
            bonus_max_placement_attempts: 24,
            bonus_palette: BonusKind::ALL.to_vec(),

            speed_up_factor: 1.3,
            speed_down_factor: 0.7,
            effect_duration: 5.0,
            invulnerable_alpha: 0.4,

            loser_fade_duration: 0.5,
            loser_fade_alpha: 0.0,
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn finite(field: &'static str, values: &[f32]) -> Result<(), ConfigError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field })
    }
}

fn alpha(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::AlphaOutOfRange { field, value })
    }
}

impl MatchConfig {
    /// Parse a JSON document (missing fields take defaults) and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every option for a usable value
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("speed", self.speed)?;
        finite("start_heading_deg", &[self.start_heading_deg])?;
        finite("spawn_p1", &self.spawn_p1.to_array())?;
        finite("spawn_p2", &self.spawn_p2.to_array())?;
        non_negative("turn_rate_deg_per_sec", self.turn_rate_deg_per_sec)?;
        non_negative("step_turn_deg", self.step_turn_deg)?;
        positive("head_radius", self.head_radius)?;
        positive("trail_edge_radius", self.trail_edge_radius)?;
        positive("resolution", self.resolution)?;
        non_negative("arm_after_distance", self.arm_after_distance)?;
        if self.min_points_before_arming < 1 {
            return Err(ConfigError::TooSmall {
                field: "min_points_before_arming",
                min: 1,
                value: self.min_points_before_arming,
            });
        }

        self.gap_interval.validate("gap_interval")?;
        self.gap_duration.validate("gap_duration")?;
        positive("gap_interval.max", self.gap_interval.max)?;

        self.bonus_interval.validate("bonus_interval")?;
        positive("bonus_interval.max", self.bonus_interval.max)?;
        positive("bonus_radius", self.bonus_radius)?;
        non_negative("bonus_line_clearance", self.bonus_line_clearance)?;
        non_negative("bonus_head_clearance", self.bonus_head_clearance)?;
        if self.bonus_max_placement_attempts < 1 {
            return Err(ConfigError::TooSmall {
                field: "bonus_max_placement_attempts",
                min: 1,
                value: self.bonus_max_placement_attempts,
            });
        }
        if self.bonus_palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }

        finite("speed_up_factor", &[self.speed_up_factor])?;
        if !(self.speed_up_factor > 1.0) {
            return Err(ConfigError::SpeedUpFactor(self.speed_up_factor));
        }
        if !(self.speed_down_factor > 0.0 && self.speed_down_factor < 1.0) {
            return Err(ConfigError::SpeedDownFactor(self.speed_down_factor));
        }
        positive("effect_duration", self.effect_duration)?;
        alpha("invulnerable_alpha", self.invulnerable_alpha)?;
        non_negative("loser_fade_duration", self.loser_fade_duration)?;
        alpha("loser_fade_alpha", self.loser_fade_alpha)?;
        Ok(())
    }

    pub fn turn_rate_rad(&self) -> f32 {
        self.turn_rate_deg_per_sec.to_radians()
    }

    pub fn step_turn_rad(&self) -> f32 {
        self.step_turn_deg.to_radians()
    }

    pub fn start_heading_rad(&self) -> f32 {
        self.start_heading_deg.to_radians()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(MatchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = MatchConfig::from_json(r#"{ "speed": 3.5, "bonuses_enabled": false }"#)
            .expect("valid config");
        assert_eq!(config.speed, 3.5);
        assert!(!config.bonuses_enabled);
        assert_eq!(config.exclude_head_count, 3);
        assert_eq!(config.bonus_palette.len(), 4);
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        assert!(matches!(
            MatchConfig::from_json("{ speed: }"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let config = MatchConfig {
            gap_duration: Range::new(0.5, 0.1),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedRange { field: "gap_duration", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_factors() {
        let config = MatchConfig {
            speed_up_factor: 0.9,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::SpeedUpFactor(_))));

        let config = MatchConfig {
            speed_down_factor: 1.2,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::SpeedDownFactor(_))));
    }

    #[test]
    fn test_from_json_rejects_overflowing_range() {
        // 1e39 does not fit in f32 and deserializes to infinity
        let json = r#"{ "gap_duration": { "min": 0.1, "max": 1e39 } }"#;
        assert!(matches!(
            MatchConfig::from_json(json),
            Err(ConfigError::NonFinite { field: "gap_duration" })
        ));
    }

    #[test]
    fn test_validate_rejects_non_finite_values() {
        let cases = [
            MatchConfig {
                start_heading_deg: f32::NAN,
                ..Default::default()
            },
            MatchConfig {
                spawn_p1: Vec2::new(f32::NAN, 0.0),
                ..Default::default()
            },
            MatchConfig {
                spawn_p2: Vec2::new(0.0, f32::INFINITY),
                ..Default::default()
            },
            MatchConfig {
                speed_up_factor: f32::INFINITY,
                ..Default::default()
            },
            MatchConfig {
                bonus_interval: Range::new(1.0, f32::INFINITY),
                ..Default::default()
            },
        ];
        for config in cases {
            assert!(matches!(config.validate(), Err(ConfigError::NonFinite { .. })));
        }

        let config = MatchConfig {
            invulnerable_alpha: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::AlphaOutOfRange { .. })));
    }

    #[test]
    fn test_validate_rejects_empty_palette() {
        let config = MatchConfig {
            bonus_palette: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyPalette)));
    }

    #[test]
    fn test_range_sample_stays_in_bounds() {
        use rand::SeedableRng;
        let mut rng = rand_pcg::Pcg32::seed_from_u64(7);
        let range = Range::new(0.15, 0.35);
        for _ in 0..200 {
            let v = range.sample(&mut rng);
            assert!((0.15..=0.35).contains(&v));
        }
        assert_eq!(Range::new(1.0, 1.0).sample(&mut rng), 1.0);
    }
}
