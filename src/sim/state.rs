//! Game state and core simulation types
//!
//! Everything a step reads or mutates lives in [`GameState`]; the host owns one
//! of these and passes it to the step functions explicitly.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::tuning::Tuning;

/// Current phase of the lifecycle state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Skin selection screen, no simulation running
    Menu,
    /// Active gameplay, one step per frame
    Playing,
    /// Run ended, state frozen at the moment of collision
    GameOver,
}

/// Drawable area reported by the presentation side
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Opaque image reference for the avatar; only the renderer looks inside
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarSkin(pub String);

impl AvatarSkin {
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    pub fn source(&self) -> &str {
        &self.0
    }
}

/// The player-controlled falling square
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    /// Center position; x never changes after spawn
    pub pos: Vec2,
    /// Vertical velocity (positive = downward)
    pub vel: f32,
    /// Side of the square bounding box
    pub size: f32,
}

impl Avatar {
    pub fn new(pos: Vec2, size: f32) -> Self {
        Self { pos, vel: 0.0, size }
    }

    /// Spawn position for a viewport: one fifth across, vertically centered
    pub fn spawn(viewport: Viewport, tuning: &Tuning) -> Self {
        Self::new(
            Vec2::new(
                viewport.width * tuning.avatar_x_fraction,
                viewport.height / 2.0,
            ),
            tuning.avatar_size,
        )
    }

    #[inline]
    pub fn half(&self) -> f32 {
        self.size / 2.0
    }

    /// Bounding box centered on the avatar position
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.pos.x - self.half(),
            self.pos.y - self.half(),
            self.size,
            self.size,
        )
    }

    /// Apply an upward impulse (velocity override, not additive)
    pub fn flap(&mut self, impulse: f32) {
        self.vel = impulse;
    }

    /// One integration step: velocity first, then position
    pub fn integrate(&mut self, gravity: f32) {
        self.vel += gravity;
        self.pos.y += self.vel;
    }
}

/// A top/bottom barrier pair with a vertical gap between them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge
    pub x: f32,
    /// Height of the top barrier (gap starts here)
    pub top_height: f32,
    /// Top of the bottom barrier (gap ends here)
    pub bottom_y: f32,
    pub width: f32,
    /// Already counted toward the score
    pub passed: bool,
}

impl Obstacle {
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn gap(&self) -> f32 {
        self.bottom_y - self.top_height
    }

    /// Entirely past the left edge of the viewport
    pub fn is_off_screen(&self) -> bool {
        self.right() < 0.0
    }

    /// Upper barrier rectangle
    pub fn top_rect(&self) -> Rect {
        Rect::new(self.x, 0.0, self.width, self.top_height)
    }

    /// Lower barrier rectangle, reaching down to the viewport floor
    pub fn bottom_rect(&self, viewport_height: f32) -> Rect {
        Rect::new(
            self.x,
            self.bottom_y,
            self.width,
            (viewport_height - self.bottom_y).max(0.0),
        )
    }
}

/// Complete simulation context
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Gap placement RNG, advanced only by spawns
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub score: u32,
    pub avatar: Avatar,
    /// Sorted by ascending x; last = most recently spawned
    pub obstacles: Vec<Obstacle>,
    /// Vertical gap size, captured when the round starts
    pub gap: f32,
    /// Viewport as of the latest frame
    pub viewport: Viewport,
    /// Steps simulated in the current round
    pub time_ticks: u64,
    /// Skin chosen in the menu
    pub skin: Option<AvatarSkin>,
    /// Set once the game-over transition has run for this round
    pub game_over_latched: bool,
    next_id: u32,
}

impl GameState {
    /// Create a state sitting in the menu
    pub fn new(seed: u64, tuning: Tuning, viewport: Viewport) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            avatar: Avatar::spawn(viewport, &tuning),
            gap: viewport.height / tuning.gap_divisor,
            tuning,
            phase: GamePhase::Menu,
            score: 0,
            obstacles: Vec::new(),
            viewport,
            time_ticks: 0,
            skin: None,
            game_over_latched: false,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
