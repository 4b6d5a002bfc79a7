//! Bonus pickups
//!
//! The spawner drops pickups on a random schedule at positions that keep
//! clear of trails and heads. Collection is detected by the collision
//! registry; the spawner only owns the pickups themselves.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::geometry::{Circle, Clearance, Obstacle, is_clear};
use crate::config::{MatchConfig, Range};

/// Pickup effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BonusKind {
    SpeedUp,
    SpeedDown,
    Invulnerability,
    PenOff,
}

impl BonusKind {
    pub const ALL: [BonusKind; 4] = [
        BonusKind::SpeedUp,
        BonusKind::SpeedDown,
        BonusKind::Invulnerability,
        BonusKind::PenOff,
    ];
}

pub type BonusId = u32;

/// A pickup lying in the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bonus {
    pub id: BonusId,
    pub kind: BonusKind,
    pub position: Vec2,
    pub radius: f32,
}

impl Bonus {
    pub fn shape(&self) -> Circle {
        Circle::new(self.position, self.radius)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusSpawner {
    /// Active pickups, oldest first
    pub bonuses: Vec<Bonus>,
    pub next_spawn_at: f32,
    enabled: bool,
    interval: Range,
    max_concurrent: usize,
    radius: f32,
    line_clearance: f32,
    head_clearance: f32,
    max_attempts: usize,
    palette: Vec<BonusKind>,
    next_id: BonusId,
}

impl BonusSpawner {
    pub fn new<R: Rng>(config: &MatchConfig, now: f32, rng: &mut R) -> Self {
        let mut spawner = Self {
            bonuses: Vec::new(),
            next_spawn_at: now,
            enabled: config.bonuses_enabled,
            interval: config.bonus_interval,
            max_concurrent: config.bonus_max_concurrent,
            radius: config.bonus_radius,
            line_clearance: config.bonus_line_clearance,
            head_clearance: config.bonus_head_clearance,
            max_attempts: config.bonus_max_placement_attempts,
            palette: config.bonus_palette.clone(),
            next_id: 1,
        };
        spawner.schedule_next(now, rng);
        spawner
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn active_count(&self) -> usize {
        self.bonuses.len()
    }

    pub fn has_capacity(&self) -> bool {
        self.bonuses.len() < self.max_concurrent
    }

    pub fn get(&self, id: BonusId) -> Option<&Bonus> {
        self.bonuses.iter().find(|b| b.id == id)
    }

    pub fn clearance(&self) -> Clearance {
        Clearance {
            line: self.line_clearance,
            head: self.head_clearance,
        }
    }

    /// Enabled, scheduled time reached and below the concurrency cap
    pub fn is_due(&self, now: f32) -> bool {
        self.enabled && now >= self.next_spawn_at && self.has_capacity()
    }

    pub fn schedule_next<R: Rng>(&mut self, now: f32, rng: &mut R) {
        self.next_spawn_at = now + self.interval.sample(rng);
    }

    /// Scheduled spawn; returns the new pickup's id when one was placed
    pub fn tick<R: Rng>(
        &mut self,
        now: f32,
        arena: &Arena,
        obstacles: &[Obstacle],
        rng: &mut R,
    ) -> Option<BonusId> {
        if !self.is_due(now) {
            return None;
        }
        let spawned = self.try_spawn(arena, obstacles, rng);
        self.schedule_next(now, rng);
        spawned
    }

    /// One placement round of up to `max_attempts` random tries
    pub fn try_spawn<R: Rng>(
        &mut self,
        arena: &Arena,
        obstacles: &[Obstacle],
        rng: &mut R,
    ) -> Option<BonusId> {
        if !self.has_capacity() {
            return None;
        }
        let position = self.find_position(arena, obstacles, rng);
        let Some(position) = position else {
            log::warn!(
                "no clear bonus position after {} attempts; skipping spawn",
                self.max_attempts
            );
            return None;
        };
        let kind = self.palette[rng.random_range(0..self.palette.len())];
        Some(self.spawn_at(kind, position))
    }

    fn find_position<R: Rng>(
        &self,
        arena: &Arena,
        obstacles: &[Obstacle],
        rng: &mut R,
    ) -> Option<Vec2> {
        let clearance = self.clearance();
        (0..self.max_attempts)
            .map(|_| arena.random_spawn_point(rng))
            .find(|p| is_clear(*p, obstacles, &clearance))
    }

    /// Place a pickup of `kind` at `position` without any checks
    pub fn spawn_at(&mut self, kind: BonusKind, position: Vec2) -> BonusId {
        let id = self.next_id;
        self.next_id += 1;
        self.bonuses.push(Bonus {
            id,
            kind,
            position,
            radius: self.radius,
        });
        log::info!("bonus {} ({:?}) spawned at ({:.2}, {:.2})", id, kind, position.x, position.y);
        id
    }

    /// Remove a pickup (collected)
    pub fn take(&mut self, id: BonusId) -> Option<Bonus> {
        let pos = self.bonuses.iter().position(|b| b.id == id)?;
        Some(self.bonuses.remove(pos))
    }

    /// Destroy every active pickup; returns how many were removed
    pub fn despawn_all(&mut self) -> usize {
        let n = self.bonuses.len();
        self.bonuses.clear();
        n
    }
}
