//! Procedural obstacle spawning
//!
//! Each row is two rock halves plus an invisible score gate, placed just
//! past the right edge and sent left at a fixed speed. Difficulty scales by
//! narrowing the gap at score thresholds.

use glam::Vec2;
use rand::Rng;

use super::state::{BodyTag, GameEvent, GameState, Obstacle};
use crate::consts::*;

/// Gap half-size for the current score.
///
/// Thresholds are evaluated highest-first; the first match wins. The
/// `> 5` arm duplicating the fallback is intentional; the table is
/// balanced as a whole, so the redundant arm stays.
pub fn gap_for_score(score: u32) -> f32 {
    if score > 20 {
        90.0
    } else if score > 15 {
        100.0
    } else if score > 10 {
        110.0
    } else if score > 5 {
        120.0
    } else {
        120.0
    }
}

/// Spawn one obstacle row: top rock, bottom rock, score gate.
///
/// The gap is a pure function of the score passed in with the state at the
/// moment of the spawn; vertical placement draws from the run RNG.
pub fn spawn_obstacle_row(state: &mut GameState) {
    let center = state.rng().random_range(SPAWN_CENTER_MIN..=SPAWN_CENTER_MAX) as f32;
    let gap = gap_for_score(state.score);

    let x = FIELD_WIDTH + ROCK_WIDTH;
    let vel = Vec2::new(-OBSTACLE_SPEED, 0.0);
    let rock_half = Vec2::new(ROCK_WIDTH / 2.0, ROCK_HEIGHT / 2.0);

    let top = Obstacle {
        id: state.next_entity_id(),
        tag: BodyTag::Hazard,
        pos: Vec2::new(x, center + ROCK_HEIGHT + gap),
        half: rock_half,
        vel,
    };
    let bottom = Obstacle {
        id: state.next_entity_id(),
        tag: BodyTag::Hazard,
        pos: Vec2::new(x, center - gap),
        half: rock_half,
        vel,
    };
    // Invisible trigger at the horizontal center of the pair, spanning the
    // full field height so the player cannot fly over it
    let gate = Obstacle {
        id: state.next_entity_id(),
        tag: BodyTag::ScoreGate,
        pos: Vec2::new(x + GATE_WIDTH, FIELD_HEIGHT / 2.0),
        half: Vec2::new(GATE_WIDTH / 2.0, FIELD_HEIGHT / 2.0),
        vel,
    };

    state.obstacles.push(top);
    state.obstacles.push(bottom);
    state.obstacles.push(gate);
    state.rows_spawned += 1;
    state.push_event(GameEvent::ObstaclesSpawned);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;

    #[test]
    fn test_gap_table_evaluated_high_to_low() {
        assert_eq!(gap_for_score(21), 90.0);
        assert_eq!(gap_for_score(16), 100.0);
        assert_eq!(gap_for_score(11), 110.0);
        assert_eq!(gap_for_score(6), 120.0);
        // Threshold values themselves fall through to the next arm
        assert_eq!(gap_for_score(20), 100.0);
        assert_eq!(gap_for_score(15), 110.0);
        assert_eq!(gap_for_score(10), 120.0);
        // Low scores hit the fallback, identical to the > 5 arm
        assert_eq!(gap_for_score(5), 120.0);
        assert_eq!(gap_for_score(3), 120.0);
        assert_eq!(gap_for_score(0), 120.0);
    }

    #[test]
    fn test_row_layout() {
        let mut state = GameState::new(7, 0);
        state.phase = GamePhase::Playing;
        spawn_obstacle_row(&mut state);

        assert_eq!(state.obstacles.len(), 3);
        assert_eq!(state.rows_spawned, 1);

        let rocks: Vec<_> = state
            .obstacles
            .iter()
            .filter(|o| o.tag == BodyTag::Hazard)
            .collect();
        let gates: Vec<_> = state
            .obstacles
            .iter()
            .filter(|o| o.tag == BodyTag::ScoreGate)
            .collect();
        assert_eq!(rocks.len(), 2);
        assert_eq!(gates.len(), 1);

        // Spawned just past the right edge
        for rock in &rocks {
            assert!(rock.pos.x - rock.half.x >= FIELD_WIDTH);
        }
        // Gate spans the full field height
        assert_eq!(gates[0].half.y * 2.0, FIELD_HEIGHT);

        // All three share the same leftward velocity
        for o in &state.obstacles {
            assert_eq!(o.vel.x, -OBSTACLE_SPEED);
            assert_eq!(o.vel.y, 0.0);
        }

        // Clearance between rock inner edges is twice the table value
        let top = rocks.iter().max_by(|a, b| a.pos.y.total_cmp(&b.pos.y)).unwrap();
        let bottom = rocks.iter().min_by(|a, b| a.pos.y.total_cmp(&b.pos.y)).unwrap();
        let inner_top = top.pos.y - top.half.y;
        let inner_bottom = bottom.pos.y + bottom.half.y;
        assert!((inner_top - inner_bottom - 2.0 * gap_for_score(0)).abs() < 1e-3);
    }

    #[test]
    fn test_vertical_center_within_range() {
        for seed in 0..32 {
            let mut state = GameState::new(seed, 0);
            spawn_obstacle_row(&mut state);
            let bottom = state
                .obstacles
                .iter()
                .filter(|o| o.tag == BodyTag::Hazard)
                .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                .unwrap();
            // bottom rock center = center - gap; recover the drawn center
            let center = bottom.pos.y + gap_for_score(0);
            assert!(center >= SPAWN_CENTER_MIN as f32);
            assert!(center <= SPAWN_CENTER_MAX as f32);
        }
    }
}
