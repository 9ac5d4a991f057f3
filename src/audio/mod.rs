//! Best-effort media playback
//!
//! The game calls into a [`MediaService`] and never waits on it. Backends must
//! swallow playback failures (autoplay policies, missing elements) so sound can
//! never stall or abort a frame.

#[cfg(target_arch = "wasm32")]
pub mod web;

/// One-shot sound clips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clip {
    /// Avatar crashed
    Death,
    /// Flap impulse applied
    Flap,
    /// Obstacle cleared
    Point,
}

/// Fire-and-forget audio output
pub trait MediaService {
    /// Restart the background track from the beginning and loop it
    fn play_background_loop(&mut self);

    fn stop_background_loop(&mut self);

    fn play_one_shot(&mut self, clip: Clip);
}

/// Plays nothing; used natively and when audio is unavailable
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentMedia;

impl MediaService for SilentMedia {
    fn play_background_loop(&mut self) {
        log::debug!("(silent) background loop started");
    }

    fn stop_background_loop(&mut self) {
        log::debug!("(silent) background loop stopped");
    }

    fn play_one_shot(&mut self, clip: Clip) {
        log::trace!("(silent) one-shot {:?}", clip);
    }
}
