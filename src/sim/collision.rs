//! Collision detection for axis-aligned boxes
//!
//! Pure functions of the avatar box, the obstacle and the viewport; nothing in
//! here mutates state.

use serde::{Deserialize, Serialize};

use super::state::{Obstacle, Viewport};

/// Axis-aligned rectangle in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strictly inside (edges excluded)
    pub fn contains_strict(&self, px: f32, py: f32) -> bool {
        px > self.left() && px < self.right() && py > self.top() && py < self.bottom()
    }
}

/// What the avatar ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionKind {
    /// Hit the barrier of the obstacle with this ID
    Obstacle { id: u32 },
    /// Left the top or bottom of the viewport
    Boundary,
}

/// Result of one physics step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionResult {
    Continuing,
    Collided(CollisionKind),
}

/// Avatar's horizontal span intersects the obstacle column
#[inline]
pub fn overlaps_horizontally(avatar: &Rect, obstacle: &Obstacle) -> bool {
    avatar.right() > obstacle.x && avatar.left() < obstacle.right()
}

/// Avatar pokes above the top barrier or below the bottom barrier's top edge
#[inline]
pub fn outside_gap(avatar: &Rect, obstacle: &Obstacle) -> bool {
    avatar.top() < obstacle.top_height || avatar.bottom() > obstacle.bottom_y
}

/// Avatar box vs one obstacle: overlap AND vertical miss
pub fn avatar_obstacle_collision(avatar: &Rect, obstacle: &Obstacle) -> bool {
    overlaps_horizontally(avatar, obstacle) && outside_gap(avatar, obstacle)
}

/// Avatar box leaves `[0, viewport.height]`
pub fn boundary_collision(avatar: &Rect, viewport: Viewport) -> bool {
    avatar.bottom() > viewport.height || avatar.top() < 0.0
}

/// Test the avatar against the viewport and every obstacle.
///
/// Boundary is reported first when both apply; either way the step ends the
/// game.
pub fn detect(avatar: &Rect, obstacles: &[Obstacle], viewport: Viewport) -> CollisionResult {
    if boundary_collision(avatar, viewport) {
        return CollisionResult::Collided(CollisionKind::Boundary);
    }
    obstacles
        .iter()
        .find(|o| avatar_obstacle_collision(avatar, o))
        .map(|o| CollisionResult::Collided(CollisionKind::Obstacle { id: o.id }))
        .unwrap_or(CollisionResult::Continuing)
}
