//! Tessellate the game state into colored triangles
//!
//! Every visual is an axis-aligned or rotated quad in field coordinates;
//! the pipeline maps them to NDC. Score gates are invisible by design and
//! emit nothing.

use glam::Vec2;

use super::vertex::{Vertex, colors};
use crate::consts::*;
use crate::sim::{BodyTag, GamePhase, GameState, LayerKind};

/// Build the full vertex list for one frame, back to front
pub fn build_scene(state: &GameState) -> Vec<Vertex> {
    let mut verts = Vec::with_capacity(256);

    push_sky(&mut verts);
    push_layers(state, &mut verts);
    push_obstacles(state, &mut verts);
    push_particles(state, &mut verts);
    push_player(state, &mut verts);
    push_overlays(state, &mut verts);

    verts
}

/// Axis-aligned quad from center and half extents
fn push_quad(verts: &mut Vec<Vertex>, center: Vec2, half: Vec2, color: [f32; 4]) {
    let (l, r) = (center.x - half.x, center.x + half.x);
    let (b, t) = (center.y - half.y, center.y + half.y);
    verts.extend_from_slice(&[
        Vertex::new(l, b, color),
        Vertex::new(r, b, color),
        Vertex::new(r, t, color),
        Vertex::new(l, b, color),
        Vertex::new(r, t, color),
        Vertex::new(l, t, color),
    ]);
}

/// Quad rotated around its center
fn push_rotated_quad(
    verts: &mut Vec<Vertex>,
    center: Vec2,
    half: Vec2,
    angle: f32,
    color: [f32; 4],
) {
    let (sin, cos) = angle.sin_cos();
    let rot = |corner: Vec2| {
        let x = corner.x * cos - corner.y * sin;
        let y = corner.x * sin + corner.y * cos;
        center + Vec2::new(x, y)
    };
    let bl = rot(Vec2::new(-half.x, -half.y));
    let br = rot(Vec2::new(half.x, -half.y));
    let tr = rot(Vec2::new(half.x, half.y));
    let tl = rot(Vec2::new(-half.x, half.y));
    verts.extend_from_slice(&[
        Vertex::new(bl.x, bl.y, color),
        Vertex::new(br.x, br.y, color),
        Vertex::new(tr.x, tr.y, color),
        Vertex::new(bl.x, bl.y, color),
        Vertex::new(tr.x, tr.y, color),
        Vertex::new(tl.x, tl.y, color),
    ]);
}

fn push_sky(verts: &mut Vec<Vertex>) {
    // Two static tints, split a third of the way up
    let split = FIELD_HEIGHT * 0.33;
    push_quad(
        verts,
        Vec2::new(FIELD_WIDTH / 2.0, (FIELD_HEIGHT + split) / 2.0),
        Vec2::new(FIELD_WIDTH / 2.0, (FIELD_HEIGHT - split) / 2.0),
        colors::TOP_SKY,
    );
    push_quad(
        verts,
        Vec2::new(FIELD_WIDTH / 2.0, split / 2.0),
        Vec2::new(FIELD_WIDTH / 2.0, split / 2.0),
        colors::BOTTOM_SKY,
    );
}

fn push_layers(state: &GameState, verts: &mut Vec<Vertex>) {
    for layer in &state.layers {
        let (height, y, tints) = match layer.kind {
            LayerKind::Background => (
                FIELD_HEIGHT * 0.35,
                GROUND_HEIGHT + FIELD_HEIGHT * 0.175,
                [colors::CAVERN_WALL, colors::CAVERN_WALL_ALT],
            ),
            LayerKind::Ground => (
                GROUND_HEIGHT,
                GROUND_HEIGHT / 2.0,
                [colors::GROUND, colors::GROUND_ALT],
            ),
        };
        // Alternating tints make the wrap seam visible as texture, not a gap
        for (i, left) in layer.tile_positions().into_iter().enumerate() {
            push_quad(
                verts,
                Vec2::new(left + layer.tile_width / 2.0, y),
                Vec2::new(layer.tile_width / 2.0, height / 2.0),
                tints[i % 2],
            );
        }
    }
}

fn push_obstacles(state: &GameState, verts: &mut Vec<Vertex>) {
    for obstacle in &state.obstacles {
        if obstacle.tag == BodyTag::ScoreGate {
            continue;
        }
        push_quad(verts, obstacle.pos, obstacle.half, colors::ROCK);
    }
}

fn push_particles(state: &GameState, verts: &mut Vec<Vertex>) {
    for particle in &state.particles {
        let mut color = colors::PARTICLE;
        color[3] = particle.life;
        push_quad(
            verts,
            particle.pos,
            Vec2::splat(particle.size / 2.0),
            color,
        );
    }
}

fn push_player(state: &GameState, verts: &mut Vec<Vertex>) {
    let Some(player) = &state.player else { return };

    let half = Vec2::new(PLAYER_HALF_W, PLAYER_HALF_H);
    push_rotated_quad(verts, player.pos, half, player.rotation, colors::PLAYER);

    // Two-frame flap: the wing quad bobs between frames
    let wing_offset = if player.frame == 0 { 4.0 } else { -4.0 };
    push_rotated_quad(
        verts,
        player.pos + Vec2::new(-4.0, wing_offset),
        Vec2::new(PLAYER_HALF_W * 0.45, PLAYER_HALF_H * 0.4),
        player.rotation,
        colors::PLAYER_WING,
    );
}

fn push_overlays(state: &GameState, verts: &mut Vec<Vertex>) {
    let center = Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0);

    if state.logo_alpha > 0.0 {
        let mut color = colors::LOGO;
        color[3] = state.logo_alpha;
        push_quad(verts, center, Vec2::new(120.0, 40.0), color);
    }

    if state.game_over_visible && state.phase == GamePhase::Dead {
        push_quad(verts, center, Vec2::new(140.0, 36.0), colors::GAME_OVER);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn::spawn_obstacle_row;

    #[test]
    fn test_score_gates_are_invisible() {
        let mut state = GameState::new(3, 0);
        let base = build_scene(&state).len();
        spawn_obstacle_row(&mut state);
        // Two rocks add quads; the gate adds none
        let with_row = build_scene(&state).len();
        assert_eq!(with_row - base, 2 * 6);
    }

    #[test]
    fn test_quads_are_triangle_lists() {
        let state = GameState::new(3, 0);
        assert_eq!(build_scene(&state).len() % 3, 0);
    }

    #[test]
    fn test_game_over_overlay_only_when_dead() {
        let mut state = GameState::new(3, 0);
        let idle = build_scene(&state).len();
        state.logo_alpha = 0.0;
        state.game_over_visible = true;
        state.phase = GamePhase::Dead;
        let dead = build_scene(&state).len();
        // Logo dropped (one quad), game-over added (one quad)
        assert_eq!(idle, dead);
    }
}
