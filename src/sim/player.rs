//! Player simulation
//!
//! Heading integration, the pen state machine (scheduled gaps and the pen-off
//! effect), trail segment lifecycle, effect timers and the wall check.

use std::fmt;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::bonus::BonusKind;
use super::geometry::{Capsule, Circle};
use super::trail::{Trail, TrailParams};
use crate::config::MatchConfig;

/// Trail colors of the two players
pub const P1_COLOR: [u8; 3] = [31, 255, 0];
pub const P2_COLOR: [u8; 3] = [255, 0, 174];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub const BOTH: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    pub fn other(self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// Slot in per-player arrays
    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    /// Player number as shown to the host (1 or 2)
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.number())
    }
}

/// Turn direction; left is counter-clockwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Turn {
    #[default]
    None,
    Left,
    Right,
}

impl Turn {
    pub fn sign(self) -> f32 {
        match self {
            Turn::None => 0.0,
            Turn::Left => 1.0,
            Turn::Right => -1.0,
        }
    }

    /// Resolve two held keys; holding both cancels out
    pub fn from_keys(left: bool, right: bool) -> Turn {
        match (left, right) {
            (true, false) => Turn::Left,
            (false, true) => Turn::Right,
            _ => Turn::None,
        }
    }
}

/// Per-frame steering input for one player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TurnIntent {
    /// Continuous turn while a key is held
    pub held: Turn,
    /// Key pressed this frame: instant step turn
    pub tapped: Turn,
}

impl TurnIntent {
    pub fn hold(turn: Turn) -> Self {
        Self {
            held: turn,
            tapped: Turn::None,
        }
    }

    /// Key went down this frame (and is therefore also held)
    pub fn press(turn: Turn) -> Self {
        Self {
            held: turn,
            tapped: turn,
        }
    }
}

/// Gap scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GapState {
    Drawing,
    Gapped,
}

/// What happened during one player tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerTickReport {
    /// A new segment was started (index into `segments`)
    pub started_segment: Option<usize>,
    /// The current segment armed this frame
    pub armed_segment: Option<usize>,
    pub out_of_bounds: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub position: Vec2,
    /// Head position before the latest move
    pub prev_position: Vec2,
    /// Unbounded heading in radians; never wrapped so it stays continuous
    pub heading: f32,
    pub turn: Turn,
    pub speed: f32,
    pub speed_multiplier: f32,
    pub speed_multiplier_expiry: Option<f32>,
    pub invulnerable: bool,
    pub invulnerability_expiry: Option<f32>,
    pub pen_suppressed_until: Option<f32>,
    pub was_pen_suppressed_last_frame: bool,
    pub collision_radius: f32,
    pub color: [u8; 3],
    /// Every segment drawn so far, oldest first
    pub segments: Vec<Trail>,
    current: Option<usize>,
    pub gap_state: GapState,
    pub next_gap_at: f32,
    pub gap_end_at: f32,
    pub is_alive: bool,
    trail_params: TrailParams,
}

impl Player {
    /// Spawn a player drawing its first segment from `spawn`
    pub fn new<R: Rng>(
        id: PlayerId,
        spawn: Vec2,
        color: [u8; 3],
        config: &MatchConfig,
        now: f32,
        rng: &mut R,
    ) -> Self {
        let trail_params = TrailParams::from(config);
        let mut player = Self {
            id,
            position: spawn,
            prev_position: spawn,
            heading: config.start_heading_rad(),
            turn: Turn::None,
            speed: config.speed,
            speed_multiplier: 1.0,
            speed_multiplier_expiry: None,
            invulnerable: false,
            invulnerability_expiry: None,
            pen_suppressed_until: None,
            was_pen_suppressed_last_frame: false,
            collision_radius: config.head_radius,
            color,
            segments: Vec::new(),
            current: None,
            gap_state: GapState::Drawing,
            next_gap_at: now + config.gap_interval.sample(rng),
            gap_end_at: now,
            is_alive: true,
            trail_params,
        };
        player.start_segment(config);
        player
    }

    pub fn head(&self) -> Circle {
        Circle::new(self.position, self.collision_radius)
    }

    /// Head swept over the latest move, so a long step cannot skip a thin trail
    pub fn swept_head(&self) -> Capsule {
        Capsule::new(self.prev_position, self.position, self.collision_radius)
    }

    /// Segment currently receiving points
    pub fn current_segment(&self) -> Option<&Trail> {
        self.current.map(|i| &self.segments[i])
    }

    pub fn current_segment_index(&self) -> Option<usize> {
        self.current
    }

    pub fn is_pen_suppressed(&self, now: f32) -> bool {
        self.pen_suppressed_until.is_some_and(|until| now < until)
    }

    /// Trail is being drawn: no scheduled gap and no pen-off effect
    pub fn is_pen_down(&self, now: f32) -> bool {
        self.gap_state == GapState::Drawing && !self.is_pen_suppressed(now)
    }

    /// Direction of travel
    pub fn direction(&self) -> Vec2 {
        crate::heading_to_dir(self.heading)
    }

    /// Advance one frame: input, pen state, motion, trail, arming, effects, walls
    pub fn tick<R: Rng>(
        &mut self,
        now: f32,
        dt: f32,
        intent: TurnIntent,
        config: &MatchConfig,
        arena: &Arena,
        rng: &mut R,
    ) -> PlayerTickReport {
        let mut report = PlayerTickReport::default();

        self.turn = intent.held;
        self.heading += intent.tapped.sign() * config.step_turn_rad();

        self.update_pen(now, config, rng, &mut report);

        self.heading += self.turn.sign() * config.turn_rate_rad() * dt;
        self.prev_position = self.position;
        self.position += self.direction() * self.speed * self.speed_multiplier * dt;

        if let Some(i) = self.current {
            let head = self.position;
            let seg = &mut self.segments[i];
            seg.set_position(head);
            if seg.observe_arming(head) {
                log::debug!("{} segment {} armed ({} points)", self.id, i, seg.point_count());
                report.armed_segment = Some(i);
            }
        }

        self.expire_effects(now);

        report.out_of_bounds = arena.is_out_of_bounds(self.position, self.collision_radius);
        report
    }

    /// Gap scheduler and pen-off timer; closes or starts segments on pen edges
    fn update_pen<R: Rng>(
        &mut self,
        now: f32,
        config: &MatchConfig,
        rng: &mut R,
        report: &mut PlayerTickReport,
    ) {
        if self.gap_state == GapState::Drawing && now >= self.next_gap_at {
            self.gap_state = GapState::Gapped;
            self.gap_end_at = now + config.gap_duration.sample(rng);
            log::debug!("{} gap until {:.2}s", self.id, self.gap_end_at);
        }
        if self.gap_state == GapState::Gapped && now >= self.gap_end_at {
            self.gap_state = GapState::Drawing;
            self.next_gap_at = now + config.gap_interval.sample(rng);
        }

        let suppressed = self.is_pen_suppressed(now);
        if self.was_pen_suppressed_last_frame && !suppressed {
            log::debug!("{} pen-off expired", self.id);
        }
        self.was_pen_suppressed_last_frame = suppressed;

        if self.is_pen_down(now) {
            if self.current.is_none() {
                report.started_segment = Some(self.start_segment(config));
            }
        } else {
            self.lift_pen();
        }
    }

    /// Begin a new segment seeded at the head
    fn start_segment(&mut self, config: &MatchConfig) -> usize {
        let index = self.segments.len();
        let mut seg = Trail::new(self.id, index, self.position, self.trail_params, self.color);
        if self.invulnerable {
            seg.set_alpha(config.invulnerable_alpha);
        }
        self.segments.push(seg);
        self.current = Some(index);
        log::debug!("{} segment {} started at {:?}", self.id, index, self.position);
        index
    }

    /// Close the current segment, if any
    fn lift_pen(&mut self) {
        let Some(i) = self.current.take() else {
            return;
        };
        self.segments[i].close();
        log::debug!(
            "{} segment {} closed ({} points)",
            self.id,
            i,
            self.segments[i].point_count()
        );
    }

    /// Apply a collected bonus
    pub fn apply_bonus(&mut self, kind: BonusKind, now: f32, config: &MatchConfig) {
        let until = now + config.effect_duration;
        match kind {
            BonusKind::SpeedUp => {
                self.speed_multiplier = config.speed_up_factor;
                self.speed_multiplier_expiry = Some(until);
            }
            BonusKind::SpeedDown => {
                self.speed_multiplier = config.speed_down_factor;
                self.speed_multiplier_expiry = Some(until);
            }
            BonusKind::Invulnerability => {
                self.invulnerable = true;
                self.invulnerability_expiry = Some(until);
                for seg in &mut self.segments {
                    seg.set_alpha(config.invulnerable_alpha);
                }
            }
            BonusKind::PenOff => {
                let extended = self.pen_suppressed_until.map_or(until, |u| u.max(until));
                self.pen_suppressed_until = Some(extended);
                self.was_pen_suppressed_last_frame = true;
                self.lift_pen();
            }
        }
    }

    /// Reset speed and invulnerability once their windows have passed
    pub fn expire_effects(&mut self, now: f32) {
        if self.speed_multiplier_expiry.is_some_and(|t| now >= t) {
            self.speed_multiplier = 1.0;
            self.speed_multiplier_expiry = None;
            log::debug!("{} speed effect expired", self.id);
        }
        if self.invulnerability_expiry.is_some_and(|t| now >= t) {
            self.invulnerable = false;
            self.invulnerability_expiry = None;
            for seg in &mut self.segments {
                seg.set_alpha(1.0);
            }
            log::debug!("{} invulnerability expired", self.id);
        }
    }

    /// Stop drawing for good (match end)
    pub fn freeze(&mut self) {
        self.lift_pen();
    }

    /// Fade every segment (losing player's visuals)
    pub fn fade_trails(&mut self, duration: f32, target_alpha: f32) {
        for seg in &mut self.segments {
            seg.fade_out(duration, target_alpha);
        }
    }

    pub fn update_fades(&mut self, dt: f32) {
        for seg in &mut self.segments {
            seg.update_fade(dt);
        }
    }
}

impl From<&MatchConfig> for TrailParams {
    fn from(config: &MatchConfig) -> Self {
        TrailParams {
            resolution: config.resolution,
            exclude_head_count: config.exclude_head_count,
            edge_radius: config.trail_edge_radius,
            arming: super::arming::ArmingRule {
                min_points: config.min_points_before_arming,
                min_distance: config.arm_after_distance,
            },
        }
    }
}
