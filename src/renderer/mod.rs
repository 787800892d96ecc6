//! Rendering module
//!
//! Backend-neutral drawing surface plus glyph styling shared by both layers.

pub mod glyphs;
pub mod recording;
pub mod surface;

pub use glyphs::{EdgeStroke, Glow, Palette};
pub use recording::{DrawCommand, RecordingSurface};
pub use surface::{ColorStop, Rgba, Surface, SurfaceError};
