//! Match tally
//!
//! Consumes `MatchEnded` outcomes: the loser's opponent scores a point, a
//! draw scores nothing. Serializable so a host can keep it between sessions.

use serde::{Deserialize, Serialize};

use crate::sim::{MatchOutcome, PlayerId};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scoreboard {
    /// Points of P1 and P2
    pub points: [u32; 2],
    pub rounds: u32,
    pub draws: u32,
    /// Longest match so far in seconds
    pub longest_match: f32,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished match; returns the player who scored, if any
    pub fn record(&mut self, outcome: &MatchOutcome) -> Option<PlayerId> {
        self.rounds += 1;
        self.longest_match = self.longest_match.max(outcome.elapsed);
        let winner = outcome.winner();
        match winner {
            Some(id) => self.points[id.index()] += 1,
            None => self.draws += 1,
        }
        winner
    }

    pub fn points_of(&self, id: PlayerId) -> u32 {
        self.points[id.index()]
    }

    /// Player ahead on points, `None` when level
    pub fn leader(&self) -> Option<PlayerId> {
        let [p1, p2] = self.points;
        match p1.cmp(&p2) {
            std::cmp::Ordering::Greater => Some(PlayerId::One),
            std::cmp::Ordering::Less => Some(PlayerId::Two),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// First to `target` points
    pub fn has_winner(&self, target: u32) -> Option<PlayerId> {
        PlayerId::BOTH
            .into_iter()
            .find(|&id| self.points_of(id) >= target)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
