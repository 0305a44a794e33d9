//! Skiff core types
//!
//! This crate carries the types shared by every Skiff backend:
//! - Geometry value types (`Point`, `Size`, `Rect`)
//! - Colors
//! - Pen and brush state
//! - POD vertex types and primitive topologies
//! - The external collaborator traits (canvas surface, GPU queues,
//!   font and texture services)
//!
//! It deliberately contains no rendering logic; geometry generation lives
//! in `skiff_tess` and dispatch in `skiff_paint`.

pub mod backend;
pub mod color;
pub mod error;
pub mod geometry;
pub mod paint;
pub mod vertex;

pub use backend::{
    AlphaMask, BasicSurface, CanvasSurface, FontId, FontService, GlyphRun, ImmediateQueue,
    PixelFormat, ShaderQueue, TextureHandle, TextureService,
};
pub use color::Color;
pub use error::{Error, Result};
pub use geometry::{Point, Rect, Size};
pub use paint::{Brush, BrushStyle, LineCap, Pen, PenStyle};
pub use vertex::{ColorVertex, TexturedVertex, Topology};
