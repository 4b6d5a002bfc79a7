//! Match state and the handlers that change it
//!
//! Everything a running duel needs lives in `MatchState`: both players, the
//! collision registry, the bonus spawner, the seeded RNG and the outgoing
//! event queue for the host.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::{Arena, Rect};
use super::bonus::{BonusId, BonusKind, BonusSpawner};
use super::geometry::{Obstacle, ObstacleKind, Shape};
use super::player::{P1_COLOR, P2_COLOR, Player, PlayerId};
use super::registry::{CollisionRegistry, Contact, ContactKind, ContactWorld, Registration, Target};
use crate::config::MatchConfig;
use crate::error::InitError;

/// Match lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    Running,
    Ended,
}

/// Why the match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    SelfHit,
    OpponentHit,
    HeadClash,
    OutOfBounds,
}

/// Final result of a match
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// `None` on a draw
    pub loser: Option<PlayerId>,
    pub reason: EndReason,
    /// Match time in seconds
    pub elapsed: f32,
}

impl MatchOutcome {
    pub fn winner(&self) -> Option<PlayerId> {
        self.loser.map(PlayerId::other)
    }
}

/// Events for the host (score, UI, sound)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BonusSpawned {
        id: BonusId,
        kind: BonusKind,
        position: Vec2,
    },
    BonusCollected {
        player: PlayerId,
        kind: BonusKind,
    },
    MatchEnded(MatchOutcome),
}

/// Complete duel state
#[derive(Debug, Clone)]
pub struct MatchState {
    pub seed: u64,
    pub config: MatchConfig,
    pub arena: Arena,
    pub phase: MatchPhase,
    /// Monotonic match clock (seconds)
    pub time: f32,
    pub time_ticks: u64,
    pub players: [Player; 2],
    pub registry: CollisionRegistry,
    pub spawner: BonusSpawner,
    pub outcome: Option<MatchOutcome>,
    pub(crate) rng: Pcg32,
    events: Vec<GameEvent>,
}

impl MatchState {
    /// Build a match inside `bounds`; fails rather than start half-initialized
    pub fn new(
        config: MatchConfig,
        bounds: Rect,
        edge_padding: f32,
        seed: u64,
    ) -> Result<Self, InitError> {
        config.validate()?;
        let arena = Arena::new(bounds, edge_padding)?;
        for (id, spawn) in [(PlayerId::One, config.spawn_p1), (PlayerId::Two, config.spawn_p2)] {
            if arena.is_out_of_bounds(spawn, config.head_radius) {
                return Err(InitError::SpawnOutsideArena {
                    player: id.number(),
                    x: spawn.x,
                    y: spawn.y,
                });
            }
        }

        let mut rng = Pcg32::seed_from_u64(seed);
        let p1 = Player::new(PlayerId::One, config.spawn_p1, P1_COLOR, &config, 0.0, &mut rng);
        let p2 = Player::new(PlayerId::Two, config.spawn_p2, P2_COLOR, &config, 0.0, &mut rng);
        let spawner = BonusSpawner::new(&config, 0.0, &mut rng);

        let mut state = Self {
            seed,
            config,
            arena,
            phase: MatchPhase::Running,
            time: 0.0,
            time_ticks: 0,
            players: [p1, p2],
            registry: CollisionRegistry::new(),
            spawner,
            outcome: None,
            rng,
            events: Vec::new(),
        };

        for id in PlayerId::BOTH {
            state.registry.register_head(id, &[]);
        }
        for id in PlayerId::BOTH {
            state.registry.register_segment(id, 0);
        }

        if state.spawner.is_enabled() {
            let count = state
                .config
                .bonus_initial_spawn_count
                .min(state.config.bonus_max_concurrent);
            for _ in 0..count {
                state.spawn_bonus_now();
            }
        }

        log::info!(
            "match started (seed {}), arena x [{}, {}] y [{}, {}]",
            seed,
            bounds.min_x,
            bounds.max_x,
            bounds.min_y,
            bounds.max_y
        );
        Ok(state)
    }

    pub fn is_running(&self) -> bool {
        self.phase == MatchPhase::Running
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id.index()]
    }

    /// Take all events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Every collidable shape except pickups, for bonus placement
    pub fn obstacles(&self) -> Vec<Obstacle> {
        let mut out = Vec::new();
        for player in &self.players {
            for seg in &player.segments {
                if let Some(line) = seg.collider() {
                    out.push(Obstacle {
                        kind: ObstacleKind::Line,
                        shape: Shape::Polyline {
                            points: line.points.to_vec(),
                            radius: line.radius,
                        },
                    });
                }
            }
            out.push(Obstacle {
                kind: ObstacleKind::Head,
                shape: Shape::Circle(player.head()),
            });
        }
        out
    }

    /// Attempt a placement right away and register the pickup on success
    pub(crate) fn spawn_bonus_now(&mut self) -> Option<BonusId> {
        let obstacles = self.obstacles();
        let id = self
            .spawner
            .try_spawn(&self.arena, &obstacles, &mut self.rng)?;
        self.on_bonus_spawned(id);
        Some(id)
    }

    pub(crate) fn on_bonus_spawned(&mut self, id: BonusId) {
        self.registry.register_bonus(id);
        if let Some(bonus) = self.spawner.get(id) {
            self.events.push(GameEvent::BonusSpawned {
                id,
                kind: bonus.kind,
                position: bonus.position,
            });
        }
    }

    /// Overlap pass for one head against its registrations
    pub fn detect_contacts(&mut self, head: PlayerId) -> Vec<Contact> {
        let view = WorldView {
            players: &self.players,
            spawner: &self.spawner,
            running: self.phase == MatchPhase::Running,
        };
        self.registry.detect(head, &view)
    }

    /// Apply an effect to a player as if it had been collected now
    pub fn apply_bonus(&mut self, player: PlayerId, kind: BonusKind) {
        let now = self.time;
        self.players[player.index()].apply_bonus(kind, now, &self.config);
    }

    /// A head reached a pickup
    pub fn on_bonus_collected(&mut self, player: PlayerId, bonus: BonusId) {
        if !self.is_running() {
            return;
        }
        let Some(kind) = self.spawner.get(bonus).map(|b| b.kind) else {
            return;
        };
        self.apply_bonus(player, kind);
        self.spawner.take(bonus);
        self.registry.remove_bonus(bonus);
        self.spawner.schedule_next(self.time, &mut self.rng);
        log::info!("{} collected {:?}", player, kind);
        self.events.push(GameEvent::BonusCollected { player, kind });
    }

    /// Head touched one of its own armed segments
    pub fn on_self_hit(&mut self, player: PlayerId, segment: usize) {
        let p = self.player(player);
        let armed = p.segments.get(segment).is_some_and(|s| s.is_armed());
        if !self.is_running() || !armed || p.invulnerable {
            return;
        }
        log::info!("{} ran into its own trail (segment {})", player, segment);
        self.end_match(Some(player), EndReason::SelfHit);
    }

    /// Head of `hitter` touched a segment of `victim_owner`
    pub fn on_opponent_hit(&mut self, hitter: PlayerId, victim_owner: PlayerId) {
        if !self.is_running() || self.player(hitter).invulnerable {
            return;
        }
        log::info!("{} ran into {}'s trail", hitter, victim_owner);
        self.end_match(Some(hitter), EndReason::OpponentHit);
    }

    /// Heads met: draw regardless of invulnerability
    pub fn on_heads_clash(&mut self) {
        if !self.is_running() {
            return;
        }
        log::info!("heads clashed: draw");
        self.end_match(None, EndReason::HeadClash);
    }

    /// Head left the arena; not affected by invulnerability
    pub fn on_out_of_bounds(&mut self, player: PlayerId) {
        if !self.is_running() {
            return;
        }
        log::info!("{} left the arena", player);
        self.end_match(Some(player), EndReason::OutOfBounds);
    }

    /// Route contacts from one pass; single-loser hits go before clashes
    pub fn dispatch_contacts(&mut self, mut contacts: Vec<Contact>) {
        contacts.sort_by_key(|c| c.kind());
        for contact in contacts {
            if !self.is_running() {
                break;
            }
            match (contact.kind(), contact.target) {
                (ContactKind::SelfHit, Target::Segment { index, .. }) => {
                    self.on_self_hit(contact.head, index)
                }
                (ContactKind::OpponentHit, Target::Segment { owner, .. }) => {
                    self.on_opponent_hit(contact.head, owner)
                }
                (ContactKind::HeadClash, _) => self.on_heads_clash(),
                (ContactKind::Pickup, Target::Bonus(id)) => self.on_bonus_collected(contact.head, id),
                (kind, target) => {
                    log::warn!("contact {:?} with unexpected target {:?}", kind, target)
                }
            }
        }
    }

    /// Destroy all pickups and their registrations; safe to repeat
    pub fn force_despawn_bonuses(&mut self) {
        let removed = self.spawner.despawn_all();
        self.registry.remove_all_bonuses();
        if removed > 0 {
            log::debug!("despawned {} bonuses", removed);
        }
    }

    /// Enter `Ended` exactly once and emit the single `MatchEnded` event
    pub fn end_match(&mut self, loser: Option<PlayerId>, reason: EndReason) {
        if !self.is_running() {
            return;
        }
        self.phase = MatchPhase::Ended;
        for player in &mut self.players {
            player.freeze();
        }
        if let Some(loser) = loser {
            let (duration, alpha) = (self.config.loser_fade_duration, self.config.loser_fade_alpha);
            let p = self.player_mut(loser);
            p.is_alive = false;
            p.fade_trails(duration, alpha);
        }
        self.force_despawn_bonuses();
        self.registry.clear();

        let outcome = MatchOutcome {
            loser,
            reason,
            elapsed: self.time,
        };
        self.outcome = Some(outcome);
        match loser {
            Some(id) => log::info!("match over after {:.2}s: {} lost ({:?})", self.time, id, reason),
            None => log::info!("match over after {:.2}s: draw", self.time),
        }
        self.events.push(GameEvent::MatchEnded(outcome));
    }
}

/// Read-only view used by the registry's overlap pass
struct WorldView<'a> {
    players: &'a [Player; 2],
    spawner: &'a BonusSpawner,
    running: bool,
}

impl ContactWorld for WorldView<'_> {
    fn is_interacting(&self, reg: &Registration) -> bool {
        if !self.running {
            return false;
        }
        let head = &self.players[reg.head.index()];
        match reg.target {
            Target::Segment { owner, index } if owner == reg.head => {
                !head.invulnerable && head.segments.get(index).is_some_and(|s| s.is_armed())
            }
            Target::Segment { .. } => !head.invulnerable,
            Target::Head(_) | Target::Bonus(_) => true,
        }
    }

    fn is_overlapping(&self, reg: &Registration) -> bool {
        let head = self.players[reg.head.index()].swept_head();
        match reg.target {
            Target::Segment { owner, index } => self.players[owner.index()]
                .segments
                .get(index)
                .and_then(|s| s.collider())
                .is_some_and(|line| head.overlaps_polyline(&line)),
            Target::Head(other) => head.overlaps_circle(&self.players[other.index()].head()),
            Target::Bonus(id) => self
                .spawner
                .get(id)
                .is_some_and(|b| head.overlaps_circle(&b.shape())),
        }
    }
}
