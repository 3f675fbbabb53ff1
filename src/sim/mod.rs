//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod layers;
pub mod scheduler;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{BodyRef, Contact, circle_aabb_overlap};
pub use layers::{LayerKind, ScrollLayer};
pub use scheduler::{ScheduledAction, Scheduler};
pub use spawn::gap_for_score;
pub use state::{BodyTag, GameEvent, GamePhase, GameState, Obstacle, Particle, Player};
pub use tick::{TickInput, tick};
