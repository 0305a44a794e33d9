//! Generic-canvas emulation tier.
//!
//! Used when neither a fixed-function nor a programmable queue is
//! available. The target only knows rectangles, ellipses, and single
//! lines, so curved primitives approximate to those and arbitrary
//! tessellated fills are skipped with a one-shot debug notice.

use skiff_core::{BasicSurface, Color, ColorVertex, Point, Rect, Result, Size, TextureHandle,
    TexturedVertex, Topology};

use crate::tier::GpuTier;

pub struct EmulationTier<S: BasicSurface> {
    surface: S,
    warned_fill: bool,
    warned_texture: bool,
}

impl<S: BasicSurface> EmulationTier<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            warned_fill: false,
            warned_texture: false,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

impl<S: BasicSurface> GpuTier for EmulationTier<S> {
    fn viewport(&self) -> Size {
        self.surface.viewport()
    }

    fn max_native_line_width(&self) -> f32 {
        // The surface strokes at any width; extrusion never pays off here.
        f32::INFINITY
    }

    fn min_native_line_width(&self) -> f32 {
        1.0
    }

    fn set_smooth(&mut self, _enabled: bool) {}

    fn draw_lines(
        &mut self,
        topology: Topology,
        points: &[Point],
        color: Color,
        width: f32,
    ) -> Result<()> {
        match topology {
            Topology::LineList => {
                for pair in points.chunks_exact(2) {
                    self.surface.stroke_line(pair[0], pair[1], color, width);
                }
            }
            Topology::LineStrip | Topology::LineLoop => {
                for w in points.windows(2) {
                    self.surface.stroke_line(w[0], w[1], color, width);
                }
                if topology == Topology::LineLoop && points.len() > 2 {
                    self.surface.stroke_line(
                        *points.last().expect("len > 2"),
                        points[0],
                        color,
                        width,
                    );
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn draw_line_array(&mut self, vertices: &[ColorVertex], width: f32) -> Result<()> {
        for pair in vertices.chunks_exact(2) {
            let [r, g, b, a] = pair[0].color;
            self.surface.stroke_line(
                Point::new(pair[0].position[0], pair[0].position[1]),
                Point::new(pair[1].position[0], pair[1].position[1]),
                Color::rgba(r, g, b, a),
                width,
            );
        }
        Ok(())
    }

    fn fill_triangles(
        &mut self,
        _topology: Topology,
        _positions: &[f32],
        _color: Color,
    ) -> Result<()> {
        if !self.warned_fill {
            tracing::debug!("emulation tier cannot fill arbitrary polygons; skipping");
            self.warned_fill = true;
        }
        Ok(())
    }

    fn fill_textured(
        &mut self,
        _topology: Topology,
        _vertices: &[TexturedVertex],
        _texture: TextureHandle,
        _tint: Color,
    ) -> Result<()> {
        if !self.warned_texture {
            tracing::debug!("emulation tier cannot draw textures; skipping");
            self.warned_texture = true;
        }
        Ok(())
    }

    fn fill_circle(
        &mut self,
        center: Point,
        radius: f32,
        fill: Color,
        _border: Color,
        _border_width: f32,
    ) -> bool {
        if radius > 0.0 {
            self.surface.fill_ellipse(
                Rect::new(center.x - radius, center.y - radius, radius * 2.0, radius * 2.0),
                fill,
            );
        }
        true
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> bool {
        self.surface.fill_rect(rect, color);
        true
    }

    fn fill_ellipse(&mut self, rect: Rect, color: Color) -> bool {
        self.surface.fill_ellipse(rect, color);
        true
    }
}
