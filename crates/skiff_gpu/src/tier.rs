//! The polymorphic capability interface over GPU submission tiers.

use skiff_core::{Color, ColorVertex, Point, Rect, Result, Size, TexturedVertex, TextureHandle,
    Topology};

/// One GPU submission tier.
///
/// Primitive methods come in two shapes: infallible-by-skip (`fill_rect`,
/// `fill_ellipse`, `fill_circle` return whether the tier handled the
/// primitive natively, `false` routing the caller to a generic path) and
/// generic submission (`draw_lines`, `fill_triangles`, `fill_textured`),
/// whose only failure mode is scratch exhaustion.
pub trait GpuTier {
    fn viewport(&self) -> Size;

    /// Widest native line; wider pens are extruded into triangles.
    fn max_native_line_width(&self) -> f32;

    /// Hairline floor applied to native line submissions.
    fn min_native_line_width(&self) -> f32;

    /// Smoothing/blending quality hint; a no-op where unsupported.
    fn set_smooth(&mut self, enabled: bool);

    /// Submit line geometry (`LineList` pairs, `LineStrip`, `LineLoop`).
    fn draw_lines(
        &mut self,
        topology: Topology,
        points: &[Point],
        color: Color,
        width: f32,
    ) -> Result<()>;

    /// Submit a per-vertex-colored line array.
    fn draw_line_array(&mut self, vertices: &[ColorVertex], width: f32) -> Result<()>;

    /// Submit filled geometry as interleaved `[x0, y0, x1, y1, ..]`.
    fn fill_triangles(&mut self, topology: Topology, positions: &[f32], color: Color)
        -> Result<()>;

    /// Submit textured filled geometry with a uniform tint.
    fn fill_textured(
        &mut self,
        topology: Topology,
        vertices: &[TexturedVertex],
        texture: TextureHandle,
        tint: Color,
    ) -> Result<()>;

    /// Native filled circle with optional border. Returns `false` when the
    /// tier has no analytic circle and the caller should tessellate an
    /// ellipse instead.
    fn fill_circle(
        &mut self,
        center: Point,
        radius: f32,
        fill: Color,
        border: Color,
        border_width: f32,
    ) -> bool;

    /// Native axis-aligned rectangle fill; `false` routes to triangles.
    fn fill_rect(&mut self, rect: Rect, color: Color) -> bool;

    /// Native ellipse fill; `false` routes to the fan path.
    fn fill_ellipse(&mut self, rect: Rect, color: Color) -> bool;
}
