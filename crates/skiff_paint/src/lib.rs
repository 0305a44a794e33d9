//! Skiff drawing context
//!
//! [`PaintContext`] is the call surface of the library: it holds the
//! current pen, brush, text colors, font, and pattern texture, and routes
//! every primitive to the backend bound at construction — a retained 2D
//! canvas that strokes and fills natively, or a GPU tier that receives
//! generated geometry.
//!
//! On the GPU path, curved primitives materialize through the shape
//! generators, fills go through the polygon tessellator, strokes through
//! the extrusion engine, and everything batches through one scratch
//! buffer before submission.

mod config;
mod context;

pub use config::PaintConfig;
pub use context::{PaintContext, PatternTexture};

pub use skiff_core::{
    Brush, BrushStyle, Color, FontId, LineCap, Pen, PenStyle, Point, Rect, Size,
};
pub use skiff_tess::WindingRule;
