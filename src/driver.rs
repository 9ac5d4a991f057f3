//! Frame clock
//!
//! The host calls [`Driver::frame`] once per display refresh and forwards raw
//! input through [`Driver::handle_input`]. Input handlers are installed once at
//! startup; the current phase decides whether an event does anything.

use crate::audio::{Clip, MediaService};
use crate::renderer::{RenderSurface, Snapshot, draw_frame, draw_game_over};
use crate::sim::{
    AvatarSkin, GameEvent, GamePhase, GameState, TickInput, Viewport, return_to_menu,
    start_game, tick,
};
use crate::tuning::Tuning;
use crate::ui::restart_button;

/// Raw player input, already mapped from host events
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Key or pointer press that should make the avatar jump
    Flap,
    /// Pointer press at a position in viewport coordinates
    Activate { x: f32, y: f32 },
}

/// What an input event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Ignored,
    /// Flap queued for the next frame
    Queued,
    /// Restart button pressed; the host should show the menu again
    ReturnedToMenu,
}

/// Whether the host should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRequest {
    Continue,
    Halt,
}

/// Owns the simulation and the media backend for one session
pub struct Driver<M: MediaService> {
    state: GameState,
    media: M,
    pending: TickInput,
    background: Option<String>,
}

impl<M: MediaService> Driver<M> {
    pub fn new(seed: u64, tuning: Tuning, viewport: Viewport, media: M) -> Self {
        Self {
            state: GameState::new(seed, tuning, viewport),
            media,
            pending: TickInput::default(),
            background: None,
        }
    }

    /// Image stretched behind every frame once it has loaded
    pub fn with_background(mut self, image: impl Into<String>) -> Self {
        self.background = Some(image.into());
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state)
    }

    pub fn idle_mode(&self) -> bool {
        self.pending.idle_mode
    }

    pub fn set_idle_mode(&mut self, enabled: bool) {
        self.pending.idle_mode = enabled;
    }

    /// Flip autopilot, returning the new setting
    pub fn toggle_idle_mode(&mut self) -> bool {
        self.pending.idle_mode = !self.pending.idle_mode;
        log::info!("Idle mode: {}", self.pending.idle_mode);
        self.pending.idle_mode
    }

    /// Begin a round with the chosen skin. The host starts requesting frames
    /// when this returns true.
    pub fn start(&mut self, skin: AvatarSkin, viewport: Viewport) -> bool {
        if !start_game(&mut self.state, skin, viewport) {
            return false;
        }
        self.pending.flap = false;
        self.media.play_background_loop();
        true
    }

    pub fn handle_input(&mut self, event: InputEvent, viewport: Viewport) -> InputOutcome {
        match (event, self.state.phase) {
            (InputEvent::Flap, GamePhase::Playing) => {
                self.pending.flap = true;
                InputOutcome::Queued
            }
            (InputEvent::Activate { x, y }, GamePhase::GameOver) => {
                // No frames run after game over, so the transition happens here
                if restart_button(viewport).hit(x, y) && return_to_menu(&mut self.state) {
                    log::info!("Back to menu");
                    InputOutcome::ReturnedToMenu
                } else {
                    InputOutcome::Ignored
                }
            }
            _ => InputOutcome::Ignored,
        }
    }

    /// Run one step and draw it.
    ///
    /// On the frame the round ends the game-over overlay is drawn over the
    /// final scene and `Halt` is returned; later calls draw nothing.
    pub fn frame<S: RenderSurface + ?Sized>(&mut self, surface: &mut S) -> FrameRequest {
        if self.state.phase != GamePhase::Playing {
            return FrameRequest::Halt;
        }

        let viewport = surface.viewport();
        let events = tick(&mut self.state, &self.pending, viewport);
        self.pending.flap = false;

        let mut crashed = false;
        for event in events {
            match event {
                GameEvent::Flapped => self.media.play_one_shot(Clip::Flap),
                GameEvent::Scored { score } => {
                    log::debug!("Score {}", score);
                    self.media.play_one_shot(Clip::Point);
                }
                GameEvent::Crashed(_) => {
                    self.media.stop_background_loop();
                    self.media.play_one_shot(Clip::Death);
                    crashed = true;
                }
            }
        }

        let snapshot = Snapshot::capture(&self.state);
        draw_frame(surface, &snapshot, self.background.as_deref());

        if crashed {
            draw_game_over(surface);
            FrameRequest::Halt
        } else {
            FrameRequest::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::DisplayList;

    #[derive(Debug, Clone, PartialEq)]
    enum MediaCall {
        Play,
        Stop,
        OneShot(Clip),
    }

    #[derive(Default)]
    struct RecordingMedia {
        calls: Vec<MediaCall>,
    }

    impl MediaService for RecordingMedia {
        fn play_background_loop(&mut self) {
            self.calls.push(MediaCall::Play);
        }

        fn stop_background_loop(&mut self) {
            self.calls.push(MediaCall::Stop);
        }

        fn play_one_shot(&mut self, clip: Clip) {
            self.calls.push(MediaCall::OneShot(clip));
        }
    }

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    fn driver() -> Driver<RecordingMedia> {
        Driver::new(21, Tuning::default(), viewport(), RecordingMedia::default())
            .with_background("cute.png")
    }

    fn started() -> Driver<RecordingMedia> {
        let mut driver = driver();
        assert!(driver.start(AvatarSkin::new("player1.png"), viewport()));
        driver
    }

    /// Free-fall until the round ends
    fn run_to_halt(driver: &mut Driver<RecordingMedia>, list: &mut DisplayList) -> usize {
        for frame in 1..=200 {
            list.commands.clear();
            if driver.frame(list) == FrameRequest::Halt {
                return frame;
            }
        }
        panic!("round never ended");
    }

    #[test]
    fn test_no_frames_in_menu() {
        let mut driver = driver();
        let mut list = DisplayList::new(viewport());
        assert_eq!(driver.frame(&mut list), FrameRequest::Halt);
        assert!(list.commands.is_empty());
        assert!(driver.media().calls.is_empty());
    }

    #[test]
    fn test_start_plays_music_and_renders() {
        let mut driver = started();
        assert_eq!(driver.media().calls, vec![MediaCall::Play]);

        let mut list = DisplayList::new(viewport());
        assert_eq!(driver.frame(&mut list), FrameRequest::Continue);
        assert_eq!(list.texts(), vec!["Score: 0"]);
        assert_eq!(driver.state().time_ticks, 1);
    }

    #[test]
    fn test_start_rejected_while_playing() {
        let mut driver = started();
        assert!(!driver.start(AvatarSkin::new("player2.png"), viewport()));
        assert_eq!(driver.media().calls, vec![MediaCall::Play]);
    }

    #[test]
    fn test_flap_only_queued_while_playing() {
        let mut driver = driver();
        assert_eq!(
            driver.handle_input(InputEvent::Flap, viewport()),
            InputOutcome::Ignored
        );

        assert!(driver.start(AvatarSkin::new("player1.png"), viewport()));
        assert_eq!(
            driver.handle_input(InputEvent::Flap, viewport()),
            InputOutcome::Queued
        );

        let mut list = DisplayList::new(viewport());
        driver.frame(&mut list);
        assert_eq!(driver.state().avatar.vel, -11.5);
        assert_eq!(driver.media().calls.last(), Some(&MediaCall::OneShot(Clip::Flap)));

        // Consumed: the next frame just falls
        driver.frame(&mut list);
        assert_eq!(driver.state().avatar.vel, -11.0);
    }

    #[test]
    fn test_crash_halts_with_overlay_and_stops_music_once() {
        let mut driver = started();
        let mut list = DisplayList::new(viewport());
        run_to_halt(&mut driver, &mut list);

        assert_eq!(driver.phase(), GamePhase::GameOver);
        assert_eq!(list.texts(), vec!["Score: 0", "Game Over", "Restart"]);
        assert_eq!(
            driver.media().calls,
            vec![
                MediaCall::Play,
                MediaCall::Stop,
                MediaCall::OneShot(Clip::Death)
            ]
        );

        // Nothing runs after the overlay
        list.commands.clear();
        assert_eq!(driver.frame(&mut list), FrameRequest::Halt);
        assert!(list.commands.is_empty());
        assert_eq!(driver.media().calls.len(), 3);
    }

    #[test]
    fn test_restart_button_returns_to_menu() {
        let mut driver = started();
        let mut list = DisplayList::new(viewport());

        // Not game over yet: pointer presses do nothing
        assert_eq!(
            driver.handle_input(InputEvent::Activate { x: 400.0, y: 350.0 }, viewport()),
            InputOutcome::Ignored
        );

        run_to_halt(&mut driver, &mut list);
        assert_eq!(
            driver.handle_input(InputEvent::Flap, viewport()),
            InputOutcome::Ignored
        );
        // Button edge is not inside
        assert_eq!(
            driver.handle_input(InputEvent::Activate { x: 300.0, y: 350.0 }, viewport()),
            InputOutcome::Ignored
        );
        assert_eq!(driver.phase(), GamePhase::GameOver);

        assert_eq!(
            driver.handle_input(InputEvent::Activate { x: 400.0, y: 350.0 }, viewport()),
            InputOutcome::ReturnedToMenu
        );
        assert_eq!(driver.phase(), GamePhase::Menu);

        // A fresh round restarts the music from the top
        assert!(driver.start(AvatarSkin::new("player2.png"), viewport()));
        assert_eq!(driver.state().score, 0);
        assert_eq!(driver.media().calls.last(), Some(&MediaCall::Play));
        assert_eq!(driver.frame(&mut list), FrameRequest::Continue);
    }

    #[test]
    fn test_restart_hit_uses_current_viewport() {
        let mut driver = started();
        let mut list = DisplayList::new(viewport());
        run_to_halt(&mut driver, &mut list);

        // Window grew to 1000x900 after the overlay was drawn
        let resized = Viewport::new(1000.0, 900.0);
        assert_eq!(
            driver.handle_input(InputEvent::Activate { x: 350.0, y: 350.0 }, resized),
            InputOutcome::Ignored
        );
        assert_eq!(
            driver.handle_input(InputEvent::Activate { x: 500.0, y: 500.0 }, resized),
            InputOutcome::ReturnedToMenu
        );
    }

    #[test]
    fn test_resize_keeps_gap_but_moves_bounds() {
        let mut driver = started();
        let mut list = DisplayList::new(viewport());
        assert_eq!(driver.state().gap, 200.0);

        // Free fall: center 548, bottom edge 588
        for _ in 0..31 {
            assert_eq!(driver.frame(&mut list), FrameRequest::Continue);
        }

        let resized = Viewport::new(1000.0, 900.0);
        list.set_viewport(resized);
        // Bottom edge reaches 604: past the old floor, above the new one
        assert_eq!(driver.frame(&mut list), FrameRequest::Continue);
        assert_eq!(driver.phase(), GamePhase::Playing);
        assert!(driver.state().avatar.bounds().bottom() > 600.0);

        assert_eq!(driver.state().viewport, resized);
        assert_eq!(driver.state().gap, 200.0);
        for obstacle in &driver.state().obstacles {
            assert!((obstacle.gap() - 200.0).abs() < 1e-3);
        }

        let snapshot = driver.snapshot();
        assert_eq!(snapshot.viewport, resized);
        for view in &snapshot.obstacles {
            assert!((view.bottom.bottom() - 900.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_idle_mode_flaps_for_player() {
        let mut driver = started();
        assert!(driver.toggle_idle_mode());

        let mut list = DisplayList::new(viewport());
        for _ in 0..32 {
            driver.frame(&mut list);
        }
        assert!(
            driver
                .media()
                .calls
                .contains(&MediaCall::OneShot(Clip::Flap))
        );

        driver.set_idle_mode(false);
        assert!(!driver.idle_mode());
    }
}
