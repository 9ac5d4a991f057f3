//! Frame and game-over scenes
//!
//! Both functions only read a [`Snapshot`]; nothing here can touch the
//! simulation.

use serde::Serialize;

use super::{Font, RenderSurface, TextAlign, colors};
use crate::sim::{GamePhase, GameState, Rect, Viewport};
use crate::ui::restart_button;

const SCORE_FONT: Font = Font::new(40, "Arial");
const TITLE_FONT: Font = Font::new(80, "Arial");
const BUTTON_FONT: Font = Font::new(30, "Arial");

/// Screen-space rectangles for one obstacle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObstacleView {
    pub top: Rect,
    pub bottom: Rect,
}

/// Immutable copy of everything a frame draws
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u32,
    pub viewport: Viewport,
    pub avatar: Rect,
    /// Image source for the avatar, if a skin was chosen
    pub skin: Option<String>,
    pub obstacles: Vec<ObstacleView>,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let viewport = state.viewport;
        Self {
            phase: state.phase,
            score: state.score,
            viewport,
            avatar: state.avatar.bounds(),
            skin: state.skin.as_ref().map(|s| s.source().to_string()),
            obstacles: state
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    top: o.top_rect(),
                    bottom: o.bottom_rect(viewport.height),
                })
                .collect(),
        }
    }
}

/// Draw one gameplay frame: background, avatar, obstacles, score
pub fn draw_frame<S: RenderSurface + ?Sized>(
    surface: &mut S,
    snapshot: &Snapshot,
    background: Option<&str>,
) {
    let drew_background = background
        .map(|image| surface.fill_background(image))
        .unwrap_or(false);
    if !drew_background {
        surface.clear(colors::SKY);
    }

    let drew_skin = snapshot
        .skin
        .as_deref()
        .map(|skin| surface.draw_image(skin, snapshot.avatar))
        .unwrap_or(false);
    if !drew_skin {
        surface.draw_rect(snapshot.avatar, colors::AVATAR_FALLBACK);
    }

    for obstacle in &snapshot.obstacles {
        surface.draw_rect(obstacle.top, colors::PIPE);
        surface.draw_rect(obstacle.bottom, colors::PIPE);
    }

    surface.draw_text(
        &format!("Score: {}", snapshot.score),
        30.0,
        50.0,
        SCORE_FONT,
        TextAlign::Left,
        colors::TEXT,
    );
}

/// Draw the game-over overlay on top of the last frame. Called once.
pub fn draw_game_over<S: RenderSurface + ?Sized>(surface: &mut S) {
    let viewport = surface.viewport();
    surface.draw_rect(
        Rect::new(0.0, 0.0, viewport.width, viewport.height),
        colors::VEIL,
    );

    surface.draw_text(
        "Game Over",
        viewport.width / 2.0,
        viewport.height / 2.0 - 50.0,
        TITLE_FONT,
        TextAlign::Center,
        colors::TEXT,
    );

    let button = restart_button(viewport);
    surface.draw_rect(button.rect, colors::BUTTON);
    let (lx, ly) = button.label_anchor();
    surface.draw_text(
        button.label,
        lx,
        ly,
        BUTTON_FONT,
        TextAlign::Center,
        colors::TEXT,
    );
}
