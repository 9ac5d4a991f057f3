//! Rendering module
//!
//! The simulation never draws. Each frame the driver captures an immutable
//! [`Snapshot`] and hands it to the scene functions, which talk to whatever
//! [`RenderSurface`] the host provides (a 2D canvas in the browser, a
//! [`DisplayList`] natively and in tests).

pub mod display_list;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use display_list::{DisplayList, DrawCommand};
pub use scene::{ObstacleView, Snapshot, draw_frame, draw_game_over};

use serde::Serialize;

use crate::sim::{Rect, Viewport};

/// sRGB color with CSS-style alpha
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// CSS color string, e.g. `rgba(0, 0, 0, 0.7)`
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const SKY: Color = Color::rgb(112, 197, 206);
    pub const PIPE: Color = Color::rgb(0, 128, 0);
    pub const AVATAR_FALLBACK: Color = Color::rgb(245, 200, 66);
    pub const TEXT: Color = Color::rgb(255, 255, 255);
    pub const VEIL: Color = Color::rgba(0, 0, 0, 0.7);
    pub const BUTTON: Color = Color::rgb(0, 128, 0);
}

/// Font size and family
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Font {
    pub size_px: u32,
    pub family: &'static str,
}

impl Font {
    pub const fn new(size_px: u32, family: &'static str) -> Self {
        Self { size_px, family }
    }

    /// CSS font shorthand, e.g. `80px Arial`
    pub fn to_css(&self) -> String {
        format!("{}px {}", self.size_px, self.family)
    }
}

/// Horizontal text anchoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// Drawing primitives the scene needs from the host.
///
/// Image methods return false when the image cannot be drawn yet (still
/// loading, missing); callers fall back to flat colors.
pub trait RenderSurface {
    /// Current drawable size; may change between frames
    fn viewport(&self) -> Viewport;

    fn clear(&mut self, color: Color);

    /// Stretch an image over the whole viewport
    fn fill_background(&mut self, image: &str) -> bool;

    fn draw_rect(&mut self, rect: Rect, color: Color);

    fn draw_image(&mut self, image: &str, rect: Rect) -> bool;

    fn draw_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        font: Font,
        align: TextAlign,
        color: Color,
    );
}
