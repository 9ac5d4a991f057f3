//! Idle/demo mode: a simple controller that flaps for the player
//!
//! Aims for the middle of the next gap that the avatar has not cleared yet and
//! flaps whenever the avatar is about to sink below it.

use super::state::GameState;

/// Decide whether to flap this step
pub fn should_flap(state: &GameState) -> bool {
    let avatar = &state.avatar;
    let bounds = avatar.bounds();

    let target = state
        .obstacles
        .iter()
        .find(|o| o.right() >= bounds.left())
        .map(|o| (o.top_height + o.bottom_y) / 2.0)
        .unwrap_or(state.viewport.height / 2.0);

    // Where the center will be after this step's integration
    let predicted = avatar.pos.y + avatar.vel + state.tuning.gravity;
    let slack = avatar.half() * 0.5;

    avatar.vel >= 0.0 && predicted > target + slack
}
