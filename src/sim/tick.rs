//! Fixed timestep match tick
//!
//! Advances the duel deterministically: player one fully (motion, trail,
//! arming, walls, contacts), then player two, then the bonus spawner.

use super::player::{PlayerId, TurnIntent};
use super::state::{MatchState, MatchPhase};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub p1: TurnIntent,
    pub p2: TurnIntent,
}

impl TickInput {
    pub fn new(p1: TurnIntent, p2: TurnIntent) -> Self {
        Self { p1, p2 }
    }

    pub fn intent(&self, id: PlayerId) -> TurnIntent {
        match id {
            PlayerId::One => self.p1,
            PlayerId::Two => self.p2,
        }
    }
}

/// Advance the match by `dt` seconds
pub fn tick(state: &mut MatchState, input: &TickInput, dt: f32) {
    if !(dt > 0.0) || !dt.is_finite() {
        return;
    }

    // Frozen match: only the loser's fade keeps animating
    if state.phase == MatchPhase::Ended {
        for player in &mut state.players {
            player.update_fades(dt);
        }
        return;
    }

    state.time += dt;
    state.time_ticks += 1;

    for id in PlayerId::BOTH {
        tick_player(state, id, input.intent(id), dt);
        if state.phase == MatchPhase::Ended {
            return;
        }
    }

    tick_bonuses(state);
}

fn tick_player(state: &mut MatchState, id: PlayerId, intent: TurnIntent, dt: f32) {
    let now = state.time;
    let report = {
        let MatchState {
            players,
            config,
            arena,
            rng,
            ..
        } = state;
        players[id.index()].tick(now, dt, intent, config, arena, rng)
    };

    if let Some(index) = report.started_segment {
        state.registry.register_segment(id, index);
    }

    // Walls win over anything this head touched on the same frame
    if report.out_of_bounds {
        state.on_out_of_bounds(id);
        return;
    }

    let contacts = state.detect_contacts(id);
    if !contacts.is_empty() {
        state.dispatch_contacts(contacts);
    }
}

fn tick_bonuses(state: &mut MatchState) {
    if !state.spawner.is_due(state.time) {
        return;
    }
    let obstacles = state.obstacles();
    let spawned = state
        .spawner
        .tick(state.time, &state.arena, &obstacles, &mut state.rng);
    if let Some(id) = spawned {
        state.on_bonus_spawned(id);
    }
}
