//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed per-frame step only
//! - Seeded RNG only
//! - Obstacles kept in spawn order
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod lifecycle;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{CollisionKind, CollisionResult, Rect, avatar_obstacle_collision};
pub use lifecycle::{enter_game_over, return_to_menu, start_game};
pub use spawn::{seed_obstacles, spawn_next};
pub use state::{Avatar, AvatarSkin, GamePhase, GameState, Obstacle, Viewport};
pub use tick::{GameEvent, TickInput, step, tick};
