//! HTML canvas 2D backend

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::{Color, Font, RenderSurface, TextAlign};
use crate::sim::{Rect, Viewport};

/// [`RenderSurface`] drawing into a `<canvas>` element
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// Images by source, created on first use and drawn once loaded
    images: HashMap<String, HtmlImageElement>,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, wasm_bindgen::JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| wasm_bindgen::JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        Ok(Self {
            canvas,
            ctx,
            images: HashMap::new(),
        })
    }

    /// Match the backing store to the window's inner size
    pub fn resize_to_window(&self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let width = window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(self.canvas.width() as f64);
        let height = window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(self.canvas.height() as f64);
        self.canvas.set_width(width as u32);
        self.canvas.set_height(height as u32);
        log::debug!("Canvas resized to {}x{}", width, height);
    }

    /// Start loading an image ahead of its first draw
    pub fn preload(&mut self, src: &str) {
        self.image(src);
    }

    /// Cached image element if it has finished loading
    fn image(&mut self, src: &str) -> Option<&HtmlImageElement> {
        if !self.images.contains_key(src) {
            match HtmlImageElement::new() {
                Ok(img) => {
                    img.set_src(src);
                    self.images.insert(src.to_string(), img);
                }
                Err(e) => {
                    log::warn!("Failed to create image for {}: {:?}", src, e);
                    return None;
                }
            }
        }
        self.images
            .get(src)
            .filter(|img| img.complete() && img.natural_width() > 0)
    }
}

impl RenderSurface for CanvasSurface {
    fn viewport(&self) -> Viewport {
        Viewport::new(self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn clear(&mut self, color: Color) {
        let Viewport { width, height } = self.viewport();
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn fill_background(&mut self, image: &str) -> bool {
        let Viewport { width, height } = self.viewport();
        let rect = Rect::new(0.0, 0.0, width, height);
        self.draw_image(image, rect)
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx
            .fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
    }

    fn draw_image(&mut self, image: &str, rect: Rect) -> bool {
        let Some(img) = self.image(image).cloned() else {
            return false;
        };
        self.ctx
            .draw_image_with_html_image_element_and_dw_and_dh(
                &img,
                rect.x as f64,
                rect.y as f64,
                rect.w as f64,
                rect.h as f64,
            )
            .is_ok()
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
        self.ctx.set_font(&font.to_css());
        self.ctx.set_text_align(align.as_str());
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_text(text, x as f64, y as f64).ok();
    }
}
