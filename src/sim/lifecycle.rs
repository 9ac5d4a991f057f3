//! Lifecycle state machine: Menu -> Playing -> GameOver -> Menu
//!
//! Each transition returns whether it actually happened. Requests that do not
//! match the current phase are rejected and leave the state untouched.

use super::spawn::seed_obstacles;
use super::state::{Avatar, AvatarSkin, GamePhase, GameState, Viewport};

/// Menu -> Playing, triggered by picking a skin.
///
/// Resets everything a round owns: score, avatar, obstacles, the captured gap
/// size and the game-over latch. Two obstacles are placed immediately.
pub fn start_game(state: &mut GameState, skin: AvatarSkin, viewport: Viewport) -> bool {
    if state.phase != GamePhase::Menu {
        log::debug!("Ignoring start request in {:?}", state.phase);
        return false;
    }

    state.viewport = viewport;
    state.avatar = Avatar::spawn(viewport, &state.tuning);
    state.gap = viewport.height / state.tuning.gap_divisor;
    state.obstacles.clear();
    state.score = 0;
    state.time_ticks = 0;
    state.game_over_latched = false;
    state.skin = Some(skin);
    state.phase = GamePhase::Playing;
    seed_obstacles(state);

    log::info!(
        "Round started ({}x{}, gap {})",
        viewport.width,
        viewport.height,
        state.gap
    );
    true
}

/// Playing -> GameOver. Only the first call in a round returns true.
pub fn enter_game_over(state: &mut GameState) -> bool {
    if state.game_over_latched || state.phase != GamePhase::Playing {
        return false;
    }
    state.game_over_latched = true;
    state.phase = GamePhase::GameOver;
    log::info!("Game over with score {}", state.score);
    true
}

/// GameOver -> Menu, from the restart button
pub fn return_to_menu(state: &mut GameState) -> bool {
    if state.phase != GamePhase::GameOver {
        log::debug!("Ignoring menu request in {:?}", state.phase);
        return false;
    }
    state.phase = GamePhase::Menu;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    fn skin() -> AvatarSkin {
        AvatarSkin::new("player1.png")
    }

    #[test]
    fn test_start_resets_round() {
        let mut state = GameState::new(1, Tuning::default(), viewport());
        state.score = 17;
        assert!(start_game(&mut state, skin(), viewport()));

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.gap, 200.0);
        assert_eq!(state.avatar.pos.x, 160.0);
        assert_eq!(state.avatar.pos.y, 300.0);
        assert_eq!(state.avatar.vel, 0.0);
        assert_eq!(state.skin, Some(skin()));
        let xs: Vec<f32> = state.obstacles.iter().map(|o| o.x).collect();
        assert_eq!(xs, vec![800.0, 1200.0]);
    }

    #[test]
    fn test_start_rejected_while_playing() {
        let mut state = GameState::new(1, Tuning::default(), viewport());
        assert!(start_game(&mut state, skin(), viewport()));
        state.score = 3;
        assert!(!start_game(&mut state, skin(), viewport()));
        assert_eq!(state.score, 3);
    }

    #[test]
    fn test_game_over_is_idempotent() {
        let mut state = GameState::new(1, Tuning::default(), viewport());
        start_game(&mut state, skin(), viewport());
        state.score = 4;

        assert!(enter_game_over(&mut state));
        let once = state.clone();
        assert!(!enter_game_over(&mut state));

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.score, once.score);
        assert_eq!(state.avatar, once.avatar);
        assert_eq!(state.obstacles, once.obstacles);
        assert_eq!(state.game_over_latched, once.game_over_latched);
    }

    #[test]
    fn test_game_over_requires_playing() {
        let mut state = GameState::new(1, Tuning::default(), viewport());
        assert!(!enter_game_over(&mut state));
        assert_eq!(state.phase, GamePhase::Menu);
    }

    #[test]
    fn test_full_cycle() {
        let mut state = GameState::new(1, Tuning::default(), viewport());
        assert!(!return_to_menu(&mut state));
        assert!(start_game(&mut state, skin(), viewport()));
        assert!(!return_to_menu(&mut state));
        assert!(enter_game_over(&mut state));
        assert!(return_to_menu(&mut state));
        assert_eq!(state.phase, GamePhase::Menu);

        // Second round gets a fresh latch and new obstacles
        assert!(start_game(&mut state, skin(), Viewport::new(1000.0, 900.0)));
        assert!(!state.game_over_latched);
        assert_eq!(state.gap, 300.0);
        assert_eq!(state.obstacles[0].x, 1000.0);
        assert!(enter_game_over(&mut state));
    }
}
