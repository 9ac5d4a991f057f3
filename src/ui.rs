//! Screen-space widgets drawn over the game
//!
//! Layout is recomputed from the current viewport whenever it is needed, so a
//! resize between drawing and clicking still hits the right spot.

use crate::consts::{RESTART_BUTTON_HEIGHT, RESTART_BUTTON_WIDTH};
use crate::sim::{Rect, Viewport};

/// A clickable rectangle with a centered label
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub rect: Rect,
    pub label: &'static str,
}

impl Button {
    /// Pointer strictly inside the button (edges do not count)
    pub fn hit(&self, x: f32, y: f32) -> bool {
        self.rect.contains_strict(x, y)
    }

    /// Where the label text is anchored (center-aligned baseline)
    pub fn label_anchor(&self) -> (f32, f32) {
        (self.rect.x + self.rect.w / 2.0, self.rect.y + 40.0)
    }
}

/// The game-over "Restart" button, centered just below the middle
pub fn restart_button(viewport: Viewport) -> Button {
    Button {
        rect: Rect::new(
            viewport.width / 2.0 - RESTART_BUTTON_WIDTH / 2.0,
            viewport.height / 2.0 + 20.0,
            RESTART_BUTTON_WIDTH,
            RESTART_BUTTON_HEIGHT,
        ),
        label: "Restart",
    }
}
