//! Contact detection and resolution
//!
//! Contacts are gathered after physics integration, then resolved one at a
//! time. The resolver's decision order is load-bearing: score gates first,
//! then the stale-body guard, then fatal player contacts. A contact whose
//! bodies were removed by an earlier contact in the same tick is ignored.

use glam::Vec2;
use rand::Rng;

use super::state::{BodyTag, GameEvent, GamePhase, GameState, Particle};
use crate::consts::*;

/// One side of a contact. Obstacles are referenced by id and resolved
/// through the entity table at processing time, so a body removed earlier
/// in the tick simply fails to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyRef {
    Player,
    Obstacle(u32),
    /// The scrolling ground strip (static hazard)
    Ground,
}

/// A pairwise contact event
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub a: BodyRef,
    pub b: BodyRef,
}

/// Circle-vs-AABB overlap via closest point
pub fn circle_aabb_overlap(center: Vec2, radius: f32, box_center: Vec2, half: Vec2) -> bool {
    let closest = center.clamp(box_center - half, box_center + half);
    (center - closest).length_squared() < radius * radius
}

/// Gather every contact involving the player this tick, in obstacle id
/// order for determinism
pub fn gather_contacts(state: &GameState) -> Vec<Contact> {
    let Some(player) = &state.player else {
        return Vec::new();
    };
    if !player.dynamic {
        // Frozen intro player sits outside the simulation
        return Vec::new();
    }

    let mut contacts = Vec::new();
    for obstacle in &state.obstacles {
        if circle_aabb_overlap(player.pos, PLAYER_RADIUS, obstacle.pos, obstacle.half) {
            contacts.push(Contact {
                a: BodyRef::Player,
                b: BodyRef::Obstacle(obstacle.id),
            });
        }
    }
    if player.pos.y - PLAYER_RADIUS <= GROUND_HEIGHT {
        contacts.push(Contact {
            a: BodyRef::Player,
            b: BodyRef::Ground,
        });
    }
    contacts
}

/// Resolve a batch of contacts in order
pub fn resolve_contacts(state: &mut GameState, contacts: &[Contact]) {
    for contact in contacts {
        resolve_contact(state, contact);
    }
}

/// Resolve one contact. Cases are exclusive and checked in order:
///
/// 1. Either side is a live score gate: consume the gate and score. The
///    first matching side is authoritative; no death check this contact.
/// 2. Unless both sides still resolve to live bodies, ignore the contact.
///    Expected when physics removal races event delivery within a tick.
/// 3. Either side is the player: fatal collision.
fn resolve_contact(state: &mut GameState, contact: &Contact) {
    if let Some(gate_id) = [contact.a, contact.b].into_iter().find_map(|side| match side {
        BodyRef::Obstacle(id) if state.obstacle(id).map(|o| o.tag) == Some(BodyTag::ScoreGate) => {
            Some(id)
        }
        _ => None,
    }) {
        state.remove_obstacle(gate_id);
        state.score += 1;
        state.push_event(GameEvent::GateScored);
        return;
    }

    if !(resolves(state, contact.a) && resolves(state, contact.b)) {
        return;
    }

    if contact.a == BodyRef::Player || contact.b == BodyRef::Player {
        kill_player(state);
    }
}

/// Whether a body reference still points at a live entity
fn resolves(state: &GameState, body: BodyRef) -> bool {
    match body {
        BodyRef::Player => state.player.is_some(),
        BodyRef::Obstacle(id) => state.obstacle(id).is_some(),
        BodyRef::Ground => true,
    }
}

/// Fatal collision: freeze the world and end the run
fn kill_player(state: &mut GameState) {
    let Some(player) = state.player.take() else {
        return;
    };

    spawn_explosion(state, player.pos);

    state.game_over_visible = true;
    state.phase = GamePhase::Dead;
    // Time scale zero suspends every scheduled action atomically
    state.time_scale = 0.0;
    state.scheduler.cancel_all();

    let score = state.score;
    state.push_event(GameEvent::PlayerDied { score });
    if score > state.high_score {
        state.high_score = score;
        state.push_event(GameEvent::NewHighScore { score });
    }
    state.high_score_visible = true;
}

/// Burst of particles at the player's last position. Purely visual; they
/// freeze immediately along with everything else.
fn spawn_explosion(state: &mut GameState, pos: Vec2) {
    for _ in 0..16 {
        let angle = state.rng().random_range(0.0..std::f32::consts::TAU);
        let speed = state.rng().random_range(40.0..160.0);
        let size = state.rng().random_range(2.0..5.0);
        state.particles.push(Particle {
            pos,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            life: 1.0,
            size,
        });
    }
}
