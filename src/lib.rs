//! Trail Duel - a two-player light-trail arena game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (players, trails, collisions, bonuses)
//! - `config`: Data-driven match parameters
//! - `scoreboard`: Points across matches
//! - `error`: Match construction errors

pub mod config;
pub mod error;
pub mod scoreboard;
pub mod sim;

pub use config::MatchConfig;
pub use error::{ConfigError, InitError};
pub use scoreboard::Scoreboard;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the driver will feed into the accumulator
    pub const MAX_FRAME_DT: f32 = 0.1;
}

/// Unit direction of travel for a heading in radians (0 = +x, CCW positive)
#[inline]
pub fn heading_to_dir(heading: f32) -> Vec2 {
    Vec2::from_angle(heading)
}

/// Normalize an angle to [-PI, PI)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    (angle + PI).rem_euclid(TAU) - PI
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_heading_to_dir() {
        assert!(heading_to_dir(0.0).abs_diff_eq(Vec2::X, 1e-6));
        assert!(heading_to_dir(FRAC_PI_2).abs_diff_eq(Vec2::Y, 1e-6));
        assert!(heading_to_dir(PI).abs_diff_eq(-Vec2::X, 1e-6));
    }

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(PI + 0.5) - (0.5 - PI)).abs() < 1e-5);
        assert!((normalize_angle(-FRAC_PI_2) + FRAC_PI_2).abs() < 1e-6);
        assert!((normalize_angle(5.0 * FRAC_PI_2) - FRAC_PI_2).abs() < 1e-5);
    }
}
