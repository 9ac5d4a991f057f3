//! Flappy Canvas - an endless flap-through-the-gaps arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacles, collisions, lifecycle)
//! - `driver`: Per-frame clock tying input, simulation, rendering and audio together
//! - `renderer`: Drawing contract and the frame/game-over scenes
//! - `audio`: Best-effort media playback
//! - `settings` / `tuning`: Persisted preferences and data-driven game balance
//! - `ui`: Screen-space widgets (restart button)

pub mod audio;
pub mod driver;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use driver::{Driver, FrameRequest, InputEvent, InputOutcome};
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Velocity added to the avatar every step (pixels/step²)
    pub const GRAVITY: f32 = 0.5;
    /// Velocity set by a flap (negative = upward)
    pub const JUMP_IMPULSE: f32 = -12.0;
    /// Obstacle scroll speed (pixels/step)
    pub const OBSTACLE_SPEED: f32 = 5.0;
    /// Distance between consecutive obstacle spawn positions
    pub const HORIZONTAL_SPACING: f32 = 400.0;
    pub const OBSTACLE_WIDTH: f32 = 80.0;
    /// Side of the avatar's square bounding box
    pub const AVATAR_SIZE: f32 = 80.0;
    /// Smallest possible top barrier height
    pub const MIN_TOP_HEIGHT: f32 = 50.0;
    /// Avatar x as a fraction of viewport width
    pub const AVATAR_X_FRACTION: f32 = 0.2;
    /// Gap is viewport height divided by this (captured at game start)
    pub const GAP_DIVISOR: f32 = 3.0;

    /// Restart button size
    pub const RESTART_BUTTON_WIDTH: f32 = 200.0;
    pub const RESTART_BUTTON_HEIGHT: f32 = 60.0;
}
