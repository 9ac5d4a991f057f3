//! Obstacle generation
//!
//! Gap placement is the only source of randomness in a round. Horizontal
//! placement is fully determined by the rightmost obstacle and the spacing.

use rand::Rng;

use super::state::{GameState, Obstacle, Viewport};
use crate::tuning::Tuning;

/// Number of obstacles placed when a round starts
pub const INITIAL_OBSTACLES: usize = 2;

/// Build the next obstacle to append to `obstacles`.
///
/// `top_height` is uniform in `[min_top_height, min_top_height + height / 2)`
/// and x sits one spacing to the right of the current rightmost obstacle (or at
/// the viewport's right edge when there is none).
pub fn spawn_next<R: Rng>(
    obstacles: &[Obstacle],
    viewport: Viewport,
    gap: f32,
    tuning: &Tuning,
    rng: &mut R,
    id: u32,
) -> Obstacle {
    let span = (viewport.height / 2.0).max(0.0);
    let top_height = tuning.min_top_height + rng.random::<f32>() * span;

    let x = match obstacles.last() {
        Some(last) => last.x + tuning.horizontal_spacing,
        None => viewport.width,
    };

    Obstacle {
        id,
        x,
        top_height,
        bottom_y: top_height + gap,
        width: tuning.obstacle_width,
        passed: false,
    }
}

/// Append one obstacle to the state's sequence
pub fn push_obstacle(state: &mut GameState) {
    let id = state.next_entity_id();
    let obstacle = spawn_next(
        &state.obstacles,
        state.viewport,
        state.gap,
        &state.tuning,
        &mut state.rng,
        id,
    );
    log::debug!(
        "Spawned obstacle {} at x={} (gap {}..{})",
        obstacle.id,
        obstacle.x,
        obstacle.top_height,
        obstacle.bottom_y
    );
    state.obstacles.push(obstacle);
}

/// Pre-seed the sequence at round start
pub fn seed_obstacles(state: &mut GameState) {
    for _ in 0..INITIAL_OBSTACLES {
        push_obstacle(state);
    }
}

/// Whether the rightmost obstacle has scrolled far enough to make room
pub fn needs_spawn(obstacles: &[Obstacle], viewport: Viewport, tuning: &Tuning) -> bool {
    match obstacles.last() {
        Some(last) => last.x < viewport.width - tuning.horizontal_spacing,
        None => true,
    }
}

/// Spawn at most one obstacle if the trigger condition holds.
///
/// Returns true when an obstacle was added.
pub fn maybe_spawn(state: &mut GameState) -> bool {
    if needs_spawn(&state.obstacles, state.viewport, &state.tuning) {
        push_obstacle(state);
        true
    } else {
        false
    }
}

/// Drop obstacles whose right edge has left the viewport.
///
/// The sequence is sorted by x, so only a prefix can be off screen; removal
/// stops at the first obstacle still partially visible.
pub fn recycle_obstacles(obstacles: &mut Vec<Obstacle>) -> usize {
    let off = obstacles
        .iter()
        .take_while(|o| o.is_off_screen())
        .count();
    obstacles.drain(..off);
    off
}
