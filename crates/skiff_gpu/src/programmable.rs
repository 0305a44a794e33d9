//! Programmable-pipeline batched submission tier.
//!
//! Geometry accumulates in a scratch buffer and goes to the queue as one
//! array per draw, with a shader program selected per call. Circles use
//! the analytic filled-circle program: a screen-space quad whose fragment
//! evaluation needs only center, radius, and border uniforms.

use skiff_core::{Color, ColorVertex, Point, Rect, Result, ShaderQueue, Size, TexturedVertex,
    TextureHandle, Topology};
use skiff_tess::ScratchBuffer;

use crate::tier::GpuTier;

pub struct ProgrammableTier<Q: ShaderQueue> {
    queue: Q,
    scratch: ScratchBuffer,
}

impl<Q: ShaderQueue> ProgrammableTier<Q> {
    pub fn new(queue: Q) -> Self {
        Self {
            queue,
            scratch: ScratchBuffer::new(),
        }
    }

    pub fn queue(&self) -> &Q {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut Q {
        &mut self.queue
    }

    /// Drop per-frame scratch state, retaining capacity.
    pub fn end_frame(&mut self) {
        self.scratch.reset();
    }
}

impl<Q: ShaderQueue> GpuTier for ProgrammableTier<Q> {
    fn viewport(&self) -> Size {
        self.queue.viewport()
    }

    fn max_native_line_width(&self) -> f32 {
        self.queue.max_line_width()
    }

    fn min_native_line_width(&self) -> f32 {
        self.queue.min_line_width()
    }

    fn set_smooth(&mut self, _enabled: bool) {
        // Quality is the shader's concern on this tier.
    }

    fn draw_lines(
        &mut self,
        topology: Topology,
        points: &[Point],
        color: Color,
        width: f32,
    ) -> Result<()> {
        if points.len() < 2 {
            return Ok(());
        }
        self.scratch.reset();
        self.scratch.extend_points(points)?;
        self.queue
            .draw_color(topology, self.scratch.as_slice(), color, width);
        Ok(())
    }

    fn draw_line_array(&mut self, vertices: &[ColorVertex], width: f32) -> Result<()> {
        if vertices.len() < 2 {
            return Ok(());
        }
        self.queue
            .draw_color_per_vertex(Topology::LineList, vertices, width);
        Ok(())
    }

    fn fill_triangles(
        &mut self,
        topology: Topology,
        positions: &[f32],
        color: Color,
    ) -> Result<()> {
        if positions.len() < 6 {
            return Ok(());
        }
        self.queue.draw_color(topology, positions, color, 1.0);
        Ok(())
    }

    fn fill_textured(
        &mut self,
        topology: Topology,
        vertices: &[TexturedVertex],
        texture: TextureHandle,
        tint: Color,
    ) -> Result<()> {
        if vertices.len() < 3 {
            return Ok(());
        }
        self.queue.draw_textured(topology, vertices, texture, tint);
        Ok(())
    }

    fn fill_circle(
        &mut self,
        center: Point,
        radius: f32,
        fill: Color,
        border: Color,
        border_width: f32,
    ) -> bool {
        if radius <= 0.0 {
            return true; // handled: nothing visible
        }
        // Strip-ordered screen-space quad around the circle.
        let quad = [
            TexturedVertex {
                position: [center.x - radius, center.y + radius],
                uv: [0.0, 1.0],
            },
            TexturedVertex {
                position: [center.x + radius, center.y + radius],
                uv: [1.0, 1.0],
            },
            TexturedVertex {
                position: [center.x - radius, center.y - radius],
                uv: [0.0, 0.0],
            },
            TexturedVertex {
                position: [center.x + radius, center.y - radius],
                uv: [1.0, 0.0],
            },
        ];
        self.queue
            .draw_circle(&quad, center, radius, fill, border, border_width);
        true
    }

    fn fill_rect(&mut self, _rect: Rect, _color: Color) -> bool {
        false // rectangles go through the triangle path
    }

    fn fill_ellipse(&mut self, _rect: Rect, _color: Color) -> bool {
        false
    }
}
