//! In-memory surface that records draw commands
//!
//! Used by the headless runner and by tests to observe what a frame drew.

use glam::Vec2;

use super::surface::{ColorStop, Rgba, Surface, SurfaceError};

/// One recorded draw operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Glow {
        center: Vec2,
        inner_radius: f32,
        outer_radius: f32,
        stops: Vec<ColorStop>,
    },
    Curve {
        a: Vec2,
        control: Vec2,
        b: Vec2,
        color: Rgba,
        width: f32,
        opacity: f32,
    },
    Line {
        a: Vec2,
        b: Vec2,
        color: Rgba,
        width: f32,
        opacity: f32,
    },
}

/// Surface that keeps the commands of the current frame
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    pub size: (u32, u32),
    /// Commands since the last `clear()`, `Clear` included
    pub commands: Vec<DrawCommand>,
    pub clears: u64,
    pub resizes: u64,
    /// Simulates a missing context
    pub ready: bool,
    /// Makes every draw call fail
    pub fail_draws: bool,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self {
            size: (0, 0),
            commands: Vec::new(),
            clears: 0,
            resizes: 0,
            ready: true,
            fail_draws: false,
        }
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn glow_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Glow { .. }))
            .count()
    }

    pub fn curve_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Curve { .. }))
            .count()
    }

    pub fn line_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count()
    }

    fn record(&mut self, command: DrawCommand) -> Result<(), SurfaceError> {
        if !self.ready {
            return Err(SurfaceError::ContextLost);
        }
        if self.fail_draws {
            return Err(SurfaceError::Draw("recording surface set to fail".into()));
        }
        self.commands.push(command);
        Ok(())
    }
}

impl Surface for RecordingSurface {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width.max(1), height.max(1));
        self.resizes += 1;
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
        self.clears += 1;
    }

    fn draw_radial_glow(
        &mut self,
        center: Vec2,
        inner_radius: f32,
        outer_radius: f32,
        stops: &[ColorStop],
    ) -> Result<(), SurfaceError> {
        self.record(DrawCommand::Glow {
            center,
            inner_radius,
            outer_radius,
            stops: stops.to_vec(),
        })
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
        self.record(DrawCommand::Curve {
            a,
            control,
            b,
            color,
            width,
            opacity,
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
        self.record(DrawCommand::Line {
            a,
            b,
            color,
            width,
            opacity,
        })
    }
}
