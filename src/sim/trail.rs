//! Trail segments
//!
//! A trail is one contiguous polyline piece of a player's path. It grows at
//! the head end while its owner draws and is frozen once the pen lifts. The
//! freshest `exclude_head_count` points are withheld from the collider so the
//! head does not immediately touch its own latest geometry.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arming::{ArmingRule, ArmingState};
use super::geometry::Polyline;
use super::player::PlayerId;

/// Geometry parameters shared by every segment of a match
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailParams {
    /// Minimum spacing between consecutive points
    pub resolution: f32,
    pub exclude_head_count: usize,
    /// Collider thickness around the polyline
    pub edge_radius: f32,
    pub arming: ArmingRule,
}

/// Linear alpha animation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fade {
    pub from: f32,
    pub to: f32,
    pub duration: f32,
    pub elapsed: f32,
}

impl Fade {
    fn current(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * t
    }

    fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// One trail segment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trail {
    pub owner: PlayerId,
    /// Index in the owner's segment list
    pub index: usize,
    pub color: [u8; 3],
    points: Vec<Vec2>,
    params: TrailParams,
    arming: ArmingState,
    closed: bool,
    alpha: f32,
    fade: Option<Fade>,
}

impl Trail {
    /// Start a segment with its first point at `seed`
    pub fn new(owner: PlayerId, index: usize, seed: Vec2, params: TrailParams, color: [u8; 3]) -> Self {
        Self {
            owner,
            index,
            color,
            points: vec![seed],
            params,
            arming: ArmingState::default(),
            closed: false,
            alpha: 1.0,
            fade: None,
        }
    }

    /// Append `pos` if it is farther than the resolution from the last point
    ///
    /// Returns whether a point was recorded. A closed segment ignores the call.
    pub fn set_position(&mut self, pos: Vec2) -> bool {
        if self.closed {
            log::warn!(
                "{} segment {} got a point after closing; ignored",
                self.owner,
                self.index
            );
            return false;
        }
        let too_close = self
            .points
            .last()
            .is_some_and(|last| last.distance(pos) <= self.params.resolution);
        if too_close {
            return false;
        }
        self.points.push(pos);
        true
    }

    /// Freeze the geometry; no further points are accepted
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn last_point(&self) -> Option<Vec2> {
        self.points.last().copied()
    }

    /// Number of points handed to the collider (0 when disabled)
    pub fn collider_len(&self) -> usize {
        let usable = self
            .points
            .len()
            .saturating_sub(self.params.exclude_head_count);
        if usable >= 2 { usable } else { 0 }
    }

    /// Collidable shape, or `None` while fewer than two usable points exist
    pub fn collider(&self) -> Option<Polyline<'_>> {
        match self.collider_len() {
            0 => None,
            n => Some(Polyline::new(&self.points[..n], self.params.edge_radius)),
        }
    }

    /// Update the arming state from the owner's head position
    ///
    /// Returns true on the call that arms the segment.
    pub fn observe_arming(&mut self, head: Vec2) -> bool {
        let from_seed = head.distance(self.points[0]);
        self.arming
            .observe(&self.params.arming, self.points.len(), from_seed)
    }

    pub fn is_armed(&self) -> bool {
        self.arming.is_armed()
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Set alpha immediately, cancelling any running fade
    pub fn set_alpha(&mut self, alpha: f32) {
        self.fade = None;
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    /// Animate alpha from its current value to `target` over `duration`
    pub fn fade_out(&mut self, duration: f32, target: f32) {
        let fade = Fade {
            from: self.alpha,
            to: target.clamp(0.0, 1.0),
            duration: duration.max(0.0),
            elapsed: 0.0,
        };
        self.alpha = fade.current();
        self.fade = (!fade.is_done()).then_some(fade);
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Advance the fade animation (visual only)
    pub fn update_fade(&mut self, dt: f32) {
        if let Some(fade) = &mut self.fade {
            fade.elapsed += dt;
            self.alpha = fade.current();
            if fade.is_done() {
                self.fade = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const PARAMS: TrailParams = TrailParams {
        resolution: 0.1,
        exclude_head_count: 3,
        edge_radius: 0.1,
        arming: ArmingRule {
            min_points: 4,
            min_distance: 0.0,
        },
    };

    fn trail() -> Trail {
        Trail::new(PlayerId::One, 0, Vec2::ZERO, PARAMS, [31, 255, 0])
    }

    #[test]
    fn test_seed_is_first_point() {
        let t = trail();
        assert_eq!(t.points(), &[Vec2::ZERO]);
    }

    #[test]
    fn test_resolution_filter() {
        let mut t = trail();
        assert!(!t.set_position(Vec2::new(0.05, 0.0)));
        assert!(!t.set_position(Vec2::new(0.1, 0.0)));
        assert!(t.set_position(Vec2::new(0.15, 0.0)));
        assert_eq!(t.point_count(), 2);
    }

    #[test]
    fn test_collider_excludes_head_points() {
        let mut t = trail();
        for i in 1..=4 {
            t.set_position(Vec2::new(i as f32 * 0.2, 0.0));
        }
        // 5 points, 3 withheld: 2 usable
        assert_eq!(t.collider_len(), 2);
        let collider = t.collider().expect("collider enabled");
        assert_eq!(collider.points, &t.points()[..2]);

        let mut short = trail();
        short.set_position(Vec2::new(0.2, 0.0));
        short.set_position(Vec2::new(0.4, 0.0));
        short.set_position(Vec2::new(0.6, 0.0));
        assert!(short.collider().is_none());
    }

    #[test]
    fn test_closed_segment_rejects_points() {
        let mut t = trail();
        t.close();
        assert!(!t.set_position(Vec2::new(5.0, 0.0)));
        assert_eq!(t.point_count(), 1);
    }

    #[test]
    fn test_arming_follows_point_count() {
        let mut t = trail();
        for i in 1..3 {
            t.set_position(Vec2::new(i as f32 * 0.2, 0.0));
            assert!(!t.observe_arming(Vec2::new(i as f32 * 0.2, 0.0)));
        }
        t.set_position(Vec2::new(0.6, 0.0));
        assert!(t.observe_arming(Vec2::new(0.6, 0.0)));
        assert!(t.is_armed());
    }

    #[test]
    fn test_fade_interpolates_and_finishes() {
        let mut t = trail();
        t.fade_out(0.5, 0.0);
        assert!(t.is_fading());
        t.update_fade(0.25);
        assert!((t.alpha() - 0.5).abs() < 1e-5);
        t.update_fade(0.5);
        assert_eq!(t.alpha(), 0.0);
        assert!(!t.is_fading());
    }

    #[test]
    fn test_fade_does_not_touch_collider() {
        let mut t = trail();
        for i in 1..=6 {
            t.set_position(Vec2::new(i as f32 * 0.2, 0.0));
        }
        let before = t.collider_len();
        t.fade_out(0.1, 0.0);
        t.update_fade(1.0);
        assert_eq!(t.collider_len(), before);
    }

    proptest! {
        #[test]
        fn prop_consecutive_points_respect_resolution(
            steps in prop::collection::vec((-0.3f32..0.3, -0.3f32..0.3), 1..200)
        ) {
            let mut t = trail();
            let mut pos = Vec2::ZERO;
            for (dx, dy) in steps {
                pos += Vec2::new(dx, dy);
                t.set_position(pos);
            }
            for w in t.points().windows(2) {
                prop_assert!(w[0].distance(w[1]) > PARAMS.resolution);
            }
        }
    }
}
