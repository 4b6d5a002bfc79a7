//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Player one always ticks before player two
//! - No rendering, input or platform dependencies

pub mod arena;
pub mod arming;
pub mod bonus;
pub mod geometry;
pub mod player;
pub mod registry;
pub mod state;
pub mod tick;
pub mod trail;

pub use arena::{Arena, Rect};
pub use arming::{ArmingRule, ArmingState};
pub use bonus::{Bonus, BonusId, BonusKind, BonusSpawner};
pub use geometry::{Capsule, Circle, Clearance, Obstacle, ObstacleKind, Polyline, Shape, is_clear};
pub use player::{GapState, P1_COLOR, P2_COLOR, Player, PlayerId, Turn, TurnIntent};
pub use registry::{CollisionRegistry, Contact, ContactKind, Target};
pub use state::{EndReason, GameEvent, MatchOutcome, MatchPhase, MatchState};
pub use tick::{TickInput, tick};
pub use trail::{Trail, TrailParams};
