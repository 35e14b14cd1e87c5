use glyph_core::{Bounds, Color, Ellipse, RenderSurface, Vector2D};
use std::f64::consts::TAU;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// [`RenderSurface`] over an HTML canvas 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    font: String,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let context = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        Ok(Self {
            canvas,
            context,
            font: "14px monospace".to_string(),
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// CSS font used for glyphs, e.g. `"14px monospace"`.
    pub fn set_font(&mut self, font: &str) {
        self.font = font.to_string();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }
}

impl RenderSurface for CanvasSurface {
    fn size(&self) -> Option<Bounds> {
        let (width, height) = (self.canvas.width(), self.canvas.height());
        if !self.canvas.is_connected() || width == 0 || height == 0 {
            return None;
        }
        Some(Bounds::new(width as f32, height as f32))
    }

    fn clear(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.context
            .clear_rect(x as f64, y as f64, width as f64, height as f64);
    }

    fn draw_glyph(&mut self, glyph: char, at: Vector2D, color: Color) {
        let mut buf = [0u8; 4];
        self.context.set_font(&self.font);
        self.context.set_text_align("center");
        self.context.set_text_baseline("middle");
        self.context.set_fill_style_str(&color.to_string());
        if let Err(err) = self
            .context
            .fill_text(glyph.encode_utf8(&mut buf), at.x as f64, at.y as f64)
        {
            web_sys::console::warn_1(&err);
        }
    }

    fn stroke_polyline(&mut self, points: &[Vector2D], color: Color, line_width: f32) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };

        self.context.begin_path();
        self.context.move_to(first.x as f64, first.y as f64);
        for point in rest {
            self.context.line_to(point.x as f64, point.y as f64);
        }
        self.context.set_stroke_style_str(&color.to_string());
        self.context.set_line_width(line_width as f64);
        self.context.set_line_cap("round");
        self.context.stroke();
    }

    fn fill_ellipse(&mut self, ellipse: &Ellipse, color: Color) {
        self.context.begin_path();
        let traced = self.context.ellipse(
            ellipse.center.x as f64,
            ellipse.center.y as f64,
            ellipse.radius_x as f64,
            ellipse.radius_y as f64,
            ellipse.rotation as f64,
            0.0,
            TAU,
        );
        if traced.is_ok() {
            self.context.set_fill_style_str(&color.to_string());
            self.context.fill();
        }
    }
}
