//! Canvas 2D drawing surface

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::renderer::{ColorStop, Rgba, Surface, SurfaceError};

fn js_err(e: JsValue) -> String {
    format!("{:?}", e)
}

/// `Surface` backed by an HTML canvas, drawing in CSS pixels
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: Option<CanvasRenderingContext2d>,
    dpr: f64,
    /// Logical size in CSS pixels
    size: (u32, u32),
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok());
        if ctx.is_none() {
            log::warn!("Canvas has no 2d context; frames will be skipped");
        }
        let dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0);

        Self {
            canvas,
            ctx,
            dpr,
            size: (1, 1),
        }
    }

    fn ctx(&self) -> Result<&CanvasRenderingContext2d, SurfaceError> {
        self.ctx.as_ref().ok_or(SurfaceError::ContextLost)
    }

    fn stroke_path(
        &self,
        color: Rgba,
        width: f32,
        opacity: f32,
        path: impl FnOnce(&CanvasRenderingContext2d),
    ) -> Result<(), SurfaceError> {
        let ctx = self.ctx()?;
        ctx.set_global_alpha(opacity.clamp(0.0, 1.0) as f64);
        ctx.set_stroke_style_str(&color.to_css());
        ctx.set_line_width(width as f64);
        ctx.begin_path();
        path(ctx);
        ctx.stroke();
        ctx.set_global_alpha(1.0);
        Ok(())
    }
}

impl Surface for CanvasSurface {
    fn is_ready(&self) -> bool {
        self.ctx.is_some()
    }

    fn resize(&mut self, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        self.size = (width, height);
        self.dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(self.dpr);

        // Backing store in physical pixels; resetting it also resets the context
        self.canvas.set_width((width as f64 * self.dpr) as u32);
        self.canvas.set_height((height as f64 * self.dpr) as u32);
        if let Some(ctx) = &self.ctx
            && let Err(e) = ctx.set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0)
        {
            log::warn!("Failed to scale canvas context: {}", js_err(e));
        }
    }

    fn clear(&mut self) {
        if let Some(ctx) = &self.ctx {
            ctx.clear_rect(0.0, 0.0, self.size.0 as f64, self.size.1 as f64);
        }
    }

    fn draw_radial_glow(
        &mut self,
        center: Vec2,
        inner_radius: f32,
        outer_radius: f32,
        stops: &[ColorStop],
    ) -> Result<(), SurfaceError> {
        let ctx = self.ctx()?;
        let (x, y) = (center.x as f64, center.y as f64);
        let outer = outer_radius.max(0.0) as f64;
        let inner = (inner_radius.max(0.0) as f64).min(outer);

        let gradient = ctx
            .create_radial_gradient(x, y, inner, x, y, outer)
            .map_err(|e| SurfaceError::Gradient(js_err(e)))?;
        for stop in stops {
            gradient
                .add_color_stop(stop.offset.clamp(0.0, 1.0), &stop.color.to_css())
                .map_err(|e| SurfaceError::Gradient(js_err(e)))?;
        }

        ctx.set_fill_style_canvas_gradient(&gradient);
        ctx.begin_path();
        ctx.arc(x, y, outer, 0.0, TAU)
            .map_err(|e| SurfaceError::Draw(js_err(e)))?;
        ctx.fill();
        Ok(())
    }

    fn draw_curve(
        &mut self,
        a: Vec2,
        control: Vec2,
        b: Vec2,
        color: Rgba,
        width: f32,
        opacity: f32,
    ) -> Result<(), SurfaceError> {
        self.stroke_path(color, width, opacity, |ctx| {
            ctx.move_to(a.x as f64, a.y as f64);
            ctx.quadratic_curve_to(control.x as f64, control.y as f64, b.x as f64, b.y as f64);
        })
    }

    fn draw_line(
        &mut self,
        a: Vec2,
        b: Vec2,
        color: Rgba,
        width: f32,
        opacity: f32,
    ) -> Result<(), SurfaceError> {
        self.stroke_path(color, width, opacity, |ctx| {
            ctx.move_to(a.x as f64, a.y as f64);
            ctx.line_to(b.x as f64, b.y as f64);
        })
    }
}
