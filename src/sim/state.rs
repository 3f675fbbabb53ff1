//! Game state and core simulation types
//!
//! Everything that drives a run lives here: the phase machine, the player
//! body, obstacle entities and the top-level [`GameState`] container.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::layers::ScrollLayer;
use super::scheduler::Scheduler;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen, player not yet created
    ShowingLogo,
    /// Active gameplay (includes the brief frozen intro)
    Playing,
    /// Run ended, world frozen until the restart tap
    Dead,
}

/// Typed tag on a physics body, resolved through the entity table instead
/// of comparing node name strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyTag {
    /// Touching this kills the player
    Hazard,
    /// Invisible trigger between rocks, consumed on first touch
    ScoreGate,
}

/// The player-controlled body
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// False while frozen on the intro; gravity and jumps are ignored
    pub dynamic: bool,
    /// Visual pitch (radians), eased toward vertical velocity each tick
    pub rotation: f32,
    /// Idle flap animation clock
    pub anim_clock: f32,
    /// Current animation frame (0 or 1)
    pub frame: u8,
}

impl Player {
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(PLAYER_X, PLAYER_START_Y),
            vel: Vec2::ZERO,
            dynamic: false,
            rotation: 0.0,
            anim_clock: 0.0,
            frame: 0,
        }
    }

    /// Zero vertical velocity, then apply the fixed jump impulse.
    ///
    /// The reset-then-impulse order makes every tap produce the same jump
    /// height regardless of current fall speed.
    pub fn jump(&mut self) {
        self.vel.y = 0.0;
        self.vel.y += JUMP_IMPULSE;
    }

    /// Gravity integration for one tick (no-op while frozen)
    pub fn integrate(&mut self, dt: f32) {
        if !self.dynamic {
            return;
        }
        self.vel.y += GRAVITY_Y * dt;
        self.pos += self.vel * dt;
    }

    /// Ease rotation toward `vel.y * ROTATION_TRACK` over ROTATION_EASE_SECS
    pub fn update_rotation(&mut self, dt: f32) {
        let target = self.vel.y * ROTATION_TRACK;
        let blend = (dt / ROTATION_EASE_SECS).min(1.0);
        self.rotation += (target - self.rotation) * blend;
    }

    /// Advance the two-frame idle animation, independent of physics
    pub fn advance_animation(&mut self, dt: f32) {
        self.anim_clock += dt;
        while self.anim_clock >= ANIM_FRAME_SECS {
            self.anim_clock -= ANIM_FRAME_SECS;
            self.frame = 1 - self.frame;
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// A scrolling obstacle body: a rock half or a score gate
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: u32,
    pub tag: BodyTag,
    /// Center position
    pub pos: Vec2,
    /// Half extents of the AABB collider
    pub half: Vec2,
    pub vel: Vec2,
}

impl Obstacle {
    /// True once the body has fully crossed the left field boundary
    pub fn exited_field(&self) -> bool {
        self.pos.x + self.half.x < 0.0
    }
}

/// A particle for the death explosion burst
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32, // 0-1, decreases over time
    pub size: f32,
}

/// Things that happened during a tick which the shell reacts to
/// (sounds, persistence writes, HUD updates). Keeps the sim platform-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Logo tapped, run is starting
    GameStarted,
    /// Jump impulse applied
    Jumped,
    /// A score gate was consumed
    GateScored,
    /// An obstacle row (two rocks + gate) entered the field
    ObstaclesSpawned,
    /// Fatal contact; carries the final score
    PlayerDied { score: u32 },
    /// The final score beat the stored best
    NewHighScore { score: u32 },
    /// Dead-screen tap, a fresh run begins
    Restarted,
}

/// Complete game state (deterministic given seed + input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub phase: GamePhase,
    /// Current run score, monotonically increasing
    pub score: u32,
    /// Best score this session (seeded from the store at startup)
    pub high_score: u32,
    /// Global multiplier on simulation advancement; 0 freezes everything
    pub time_scale: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// None on the logo screen and after death
    pub player: Option<Player>,
    /// Live obstacle bodies, sorted by id for deterministic iteration
    pub obstacles: Vec<Obstacle>,
    /// Parallax strips (background, ground)
    pub layers: Vec<ScrollLayer>,
    /// Death explosion particles (visual only)
    pub particles: Vec<Particle>,
    /// Cooperative timer queue; cancelled wholesale on death
    pub scheduler: Scheduler,
    /// Logo opacity, fades after the starting tap
    pub logo_alpha: f32,
    pub game_over_visible: bool,
    pub high_score_visible: bool,
    /// Total obstacle rows spawned this run
    pub rows_spawned: u32,
    /// Pending events, drained by the shell each frame
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a fresh state on the logo screen
    pub fn new(seed: u64, high_score: u32) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::ShowingLogo,
            score: 0,
            high_score,
            time_scale: 1.0,
            time_ticks: 0,
            player: None,
            obstacles: Vec::new(),
            layers: vec![
                ScrollLayer::background(FIELD_WIDTH),
                ScrollLayer::ground(FIELD_WIDTH),
            ],
            particles: Vec::new(),
            scheduler: Scheduler::new(),
            logo_alpha: 1.0,
            game_over_visible: false,
            // The logo screen shows the stored best
            high_score_visible: true,
            rows_spawned: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Look up a live obstacle by id
    pub fn obstacle(&self, id: u32) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    /// Remove an obstacle by id, returning whether it existed
    pub fn remove_obstacle(&mut self, id: u32) -> bool {
        let before = self.obstacles.len();
        self.obstacles.retain(|o| o.id != id);
        self.obstacles.len() != before
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Hand pending events to the shell
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
