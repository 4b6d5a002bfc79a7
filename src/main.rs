//! Trail Duel headless driver
//!
//! Plays scripted rounds until one side reaches the target score, then prints
//! the scoreboard as JSON.
//!
//! Usage: `trail-duel [points_to_win] [seed] [config.json]`

use std::error::Error;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use trail_duel::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use trail_duel::sim::{
    GameEvent, MatchState, Player, PlayerId, Rect, TickInput, Turn, TurnIntent, tick,
};
use trail_duel::{MatchConfig, Scoreboard, normalize_angle};

/// Arena handed to the core, as a host camera would report it
const ARENA: Rect = Rect::new(-8.0, 8.0, -5.0, 5.0);
const EDGE_PADDING: f32 = 0.5;
/// Rounds stop after this much match time even without a result
const ROUND_TIME_LIMIT: f32 = 120.0;
const MAX_ROUNDS: u32 = 50;

/// Scripted pilot: wanders, and steers for the middle when a wall is close
struct Pilot {
    rng: Pcg32,
    turn: Turn,
    hold_for: f32,
}

impl Pilot {
    fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            turn: Turn::None,
            hold_for: 0.0,
        }
    }

    fn steer(&mut self, player: &Player, dt: f32) -> TurnIntent {
        let look_ahead = player.position + player.direction() * 1.5;
        let margin = 1.0;
        let near_wall = look_ahead.x < ARENA.min_x + margin
            || look_ahead.x > ARENA.max_x - margin
            || look_ahead.y < ARENA.min_y + margin
            || look_ahead.y > ARENA.max_y - margin;

        if near_wall {
            let to_center = Vec2::ZERO - player.position;
            let desired = to_center.y.atan2(to_center.x);
            let error = normalize_angle(desired - player.heading);
            let turn = if error > 0.0 { Turn::Left } else { Turn::Right };
            return TurnIntent::hold(turn);
        }

        self.hold_for -= dt;
        if self.hold_for <= 0.0 {
            let previous = self.turn;
            self.turn = match self.rng.random_range(0..3) {
                0 => Turn::Left,
                1 => Turn::Right,
                _ => Turn::None,
            };
            self.hold_for = self.rng.random_range(0.2..1.2);
            if self.turn != previous && self.turn != Turn::None {
                return TurnIntent::press(self.turn);
            }
        }
        TurnIntent::hold(self.turn)
    }
}

/// Play one round with a jittery host frame rate; returns the outcome events
fn play_round(
    config: &MatchConfig,
    seed: u64,
) -> Result<Vec<GameEvent>, Box<dyn Error>> {
    let mut state = MatchState::new(config.clone(), ARENA, EDGE_PADDING, seed)?;
    let mut pilots = [Pilot::new(seed ^ 0x5151), Pilot::new(seed ^ 0xA3A3)];
    let mut frame_rng = Pcg32::seed_from_u64(seed.wrapping_add(1));
    let mut events = state.drain_events();
    let mut accumulator = 0.0;

    while state.is_running() && state.time < ROUND_TIME_LIMIT {
        // Host frames between 30 and 144 Hz
        let frame_dt: f32 = frame_rng.random_range(1.0 / 144.0..1.0 / 30.0);
        accumulator += frame_dt.min(MAX_FRAME_DT);

        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = TickInput::new(
                pilots[0].steer(state.player(PlayerId::One), SIM_DT),
                pilots[1].steer(state.player(PlayerId::Two), SIM_DT),
            );
            tick(&mut state, &input, SIM_DT);
            events.extend(state.drain_events());
            accumulator -= SIM_DT;
            substeps += 1;
        }
    }

    if state.is_running() {
        log::warn!("round {} hit the time limit without a result", seed);
    }
    Ok(events)
}

fn load_config(path: Option<&str>) -> Result<MatchConfig, Box<dyn Error>> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            Ok(MatchConfig::from_json(&json)?)
        }
        None => Ok(MatchConfig::default()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let target: u32 = args.first().map(|s| s.parse::<u32>()).transpose()?.unwrap_or(3);
    let base_seed: u64 = args.get(1).map(|s| s.parse::<u64>()).transpose()?.unwrap_or(12345);
    let config = load_config(args.get(2).map(String::as_str))?;

    log::info!("Trail Duel (headless) first to {} points, seed {}", target, base_seed);

    let mut board = Scoreboard::new();
    let mut round = 0;
    while board.has_winner(target).is_none() && round < MAX_ROUNDS {
        let seed = base_seed.wrapping_add(round as u64);
        round += 1;
        for event in play_round(&config, seed)? {
            match event {
                GameEvent::BonusCollected { player, kind } => {
                    log::info!("round {}: {} picked up {:?}", round, player, kind)
                }
                GameEvent::MatchEnded(outcome) => {
                    let scorer = board.record(&outcome);
                    match scorer {
                        Some(id) => println!(
                            "round {}: {} wins ({:?}) after {:.2}s",
                            round, id, outcome.reason, outcome.elapsed
                        ),
                        None => println!("round {}: draw after {:.2}s", round, outcome.elapsed),
                    }
                }
                GameEvent::BonusSpawned { .. } => {}
            }
        }
    }

    match board.has_winner(target) {
        Some(id) => println!("{} takes the duel", id),
        None => println!("no winner after {} rounds", round),
    }
    println!("{}", board.to_json()?);
    Ok(())
}
