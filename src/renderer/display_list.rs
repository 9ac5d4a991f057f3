//! Recording surface
//!
//! Captures draw calls instead of rasterizing them. Used by the headless
//! native build and by tests that assert on what a frame would draw.

use std::collections::HashSet;

use serde::Serialize;

use super::{Color, Font, RenderSurface, TextAlign};
use crate::sim::{Rect, Viewport};

/// One recorded draw call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCommand {
    Clear(Color),
    Background(String),
    Rect(Rect, Color),
    Image(String, Rect),
    Text {
        text: String,
        x: f32,
        y: f32,
        font: Font,
        align: TextAlign,
        color: Color,
    },
}

/// In-memory [`RenderSurface`]
#[derive(Debug, Clone)]
pub struct DisplayList {
    viewport: Viewport,
    /// Images that count as loaded; `None` = every image is ready
    loaded: Option<HashSet<String>>,
    pub commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            loaded: None,
            commands: Vec::new(),
        }
    }

    /// Only the listed images are treated as loaded
    pub fn with_loaded_images<I, S>(mut self, images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.loaded = Some(images.into_iter().map(Into::into).collect());
        self
    }

    /// Simulate a host resize
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Drain recorded commands
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// All text drawn so far, in order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn is_loaded(&self, image: &str) -> bool {
        self.loaded
            .as_ref()
            .map(|set| set.contains(image))
            .unwrap_or(true)
    }
}

impl RenderSurface for DisplayList {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_background(&mut self, image: &str) -> bool {
        if !self.is_loaded(image) {
            return false;
        }
        self.commands.push(DrawCommand::Background(image.to_string()));
        true
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Rect(rect, color));
    }

    fn draw_image(&mut self, image: &str, rect: Rect) -> bool {
        if !self.is_loaded(image) {
            return false;
        }
        self.commands.push(DrawCommand::Image(image.to_string(), rect));
        true
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        font: Font,
        align: TextAlign,
        color: Color,
    ) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            font,
            align,
            color,
        });
    }
}
