//! External collaborator traits
//!
//! Skiff issues draw calls; it does not own surfaces, shader compilers, or
//! texture memory. The embedder supplies exactly one of:
//!
//! - a [`CanvasSurface`] (retained 2D canvas that strokes and fills
//!   natively),
//! - an [`ImmediateQueue`] (fixed-function begin/vertex/end submission),
//! - a [`ShaderQueue`] (programmable pipeline taking whole vertex arrays),
//! - a [`BasicSurface`] (minimal rect/ellipse/line target used by the
//!   emulation tier).
//!
//! Text and textures arrive through the opaque [`FontService`] and
//! [`TextureService`] contracts.

use crate::color::Color;
use crate::geometry::{Point, Rect, Size};
use crate::paint::{Brush, Pen};
use crate::vertex::{ColorVertex, TexturedVertex, Topology};

/// Opaque texture identifier issued by the embedder's texture service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Opaque font identifier; meaningful only to the font service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FontId(pub u32);

/// Pixel layout of uploaded texture data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    Rgba8,
    Alpha8,
}

/// Single-channel coverage mask produced by the font service.
#[derive(Clone, Debug)]
pub struct AlphaMask {
    pub width: u32,
    pub height: u32,
    /// Row-major, one byte per pixel.
    pub pixels: Vec<u8>,
}

impl AlphaMask {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A text run the font service has already rendered into a texture.
#[derive(Clone, Copy, Debug)]
pub struct GlyphRun {
    pub texture: TextureHandle,
    /// Extent of the run in device units.
    pub size: Size,
    /// UV bounds of the run within `texture`: `[u0, v0, u1, v1]`.
    pub uv: [f32; 4],
}

/// Opaque measure/rasterize text service.
///
/// Glyph shaping and rasterization internals are out of scope; this trait
/// is the whole contract.
pub trait FontService {
    /// Extent of `text` in device units.
    fn measure(&mut self, text: &str, font: FontId) -> Size;

    /// Rasterize `text` to a coverage mask at its measured extent.
    fn rasterize(&mut self, text: &str, font: FontId) -> AlphaMask;

    /// Pre-rendered run for the atlas path, if the service keeps one.
    /// Returning `None` routes the caller to the software path.
    fn glyph_run(&mut self, _text: &str, _font: FontId) -> Option<GlyphRun> {
        None
    }
}

/// Texture upload service. Skiff binds the handles it is given; lifetime
/// management stays with the embedder.
pub trait TextureService {
    fn upload(&mut self, pixels: &[u8], width: u32, height: u32, format: PixelFormat)
        -> TextureHandle;

    /// Hint that a transient texture (e.g. a software-rendered text quad)
    /// is no longer needed.
    fn release(&mut self, _texture: TextureHandle) {}
}

/// Retained-mode 2D canvas backend.
///
/// The canvas owns its own pen/brush/text state; the drawing context
/// pushes state before forwarding each primitive. A canvas strokes and
/// fills natively, so no geometry generation happens on this path.
pub trait CanvasSurface {
    fn size(&self) -> Size;

    fn clear(&mut self);
    fn set_background(&mut self, brush: &Brush);
    fn set_pen(&mut self, pen: &Pen);
    fn set_brush(&mut self, brush: &Brush);
    fn set_text_foreground(&mut self, color: Color);
    fn set_text_background(&mut self, color: Color);

    fn draw_line(&mut self, a: Point, b: Point);
    fn draw_lines(&mut self, points: &[Point]);
    /// Arc from `start` to `end`, counter-clockwise around `center`.
    fn draw_arc(&mut self, start: Point, end: Point, center: Point);
    fn draw_rectangle(&mut self, rect: Rect);
    fn draw_rounded_rectangle(&mut self, rect: Rect, radius: f32);
    fn draw_ellipse(&mut self, rect: Rect);
    fn draw_polygon(&mut self, points: &[Point]);
    /// Multi-contour polygon; `counts[i]` points belong to contour `i`.
    fn draw_poly_polygon(&mut self, counts: &[usize], points: &[Point]);
    fn draw_text(&mut self, text: &str, pos: Point);
    fn text_extent(&mut self, text: &str) -> Size;

    fn reset_bounding_box(&mut self);
    fn calc_bounding_box(&mut self, p: Point);
}

/// Fixed-function immediate submission queue.
///
/// Models a begin/vertex/end pipeline with global color, line width, and
/// texture state. Every call is submitted as issued; nothing is batched on
/// the queue side.
pub trait ImmediateQueue {
    fn viewport(&self) -> Size;

    /// Widest line the queue renders natively; wider strokes are extruded
    /// into triangles by the caller.
    fn max_line_width(&self) -> f32;
    /// Narrowest visible line width (hairline floor).
    fn min_line_width(&self) -> f32 {
        1.0
    }

    fn set_color(&mut self, color: Color);
    fn set_line_width(&mut self, width: f32);
    /// Line/polygon smoothing and blending hint.
    fn set_smooth(&mut self, enabled: bool);
    fn bind_texture(&mut self, texture: Option<TextureHandle>);

    fn begin(&mut self, topology: Topology);
    fn vertex(&mut self, p: Point);
    /// Texture coordinate for the next `vertex` call.
    fn tex_coord(&mut self, u: f32, v: f32);
    fn end(&mut self);
}

/// Programmable-pipeline batched submission queue.
///
/// Receives whole vertex arrays per draw; the caller owns batching. The
/// queue compiles and binds its own shader programs — one per method:
/// uniform-color, per-vertex-color, textured, and analytic filled-circle.
pub trait ShaderQueue {
    fn viewport(&self) -> Size;

    fn max_line_width(&self) -> f32;
    fn min_line_width(&self) -> f32 {
        1.0
    }

    /// Uniform-color draw; `positions` is `[x0, y0, x1, y1, ..]`.
    fn draw_color(&mut self, topology: Topology, positions: &[f32], color: Color, line_width: f32);

    /// Per-vertex-color draw (line arrays).
    fn draw_color_per_vertex(
        &mut self,
        topology: Topology,
        vertices: &[ColorVertex],
        line_width: f32,
    );

    /// Textured draw with a uniform tint (pattern fills, text quads).
    fn draw_textured(
        &mut self,
        topology: Topology,
        vertices: &[TexturedVertex],
        texture: TextureHandle,
        tint: Color,
    );

    /// Analytic circle: a screen-space quad evaluated by the filled-circle
    /// program.
    fn draw_circle(
        &mut self,
        quad: &[TexturedVertex],
        center: Point,
        radius: f32,
        fill: Color,
        border: Color,
        border_width: f32,
    );
}

/// Minimal target for the emulation tier: axis-aligned rectangles,
/// ellipses, and single lines. Everything else is approximated or skipped.
pub trait BasicSurface {
    fn viewport(&self) -> Size;
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn fill_ellipse(&mut self, rect: Rect, color: Color);
    fn stroke_line(&mut self, a: Point, b: Point, color: Color, width: f32);
}
