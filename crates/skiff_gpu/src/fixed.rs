//! Fixed-function immediate submission tier.
//!
//! Mirrors a begin/vertex/end pipeline: state (color, line width, bound
//! texture) is set up front, then vertices stream one at a time. Nothing
//! is batched on this side; the queue is expected to be cheap per call.

use skiff_core::{Color, ColorVertex, ImmediateQueue, Point, Rect, Result, Size, TexturedVertex,
    TextureHandle, Topology};

use crate::tier::GpuTier;

pub struct FixedFunctionTier<Q: ImmediateQueue> {
    queue: Q,
}

impl<Q: ImmediateQueue> FixedFunctionTier<Q> {
    pub fn new(queue: Q) -> Self {
        Self { queue }
    }

    pub fn queue(&self) -> &Q {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut Q {
        &mut self.queue
    }
}

impl<Q: ImmediateQueue> GpuTier for FixedFunctionTier<Q> {
    fn viewport(&self) -> Size {
        self.queue.viewport()
    }

    fn max_native_line_width(&self) -> f32 {
        self.queue.max_line_width()
    }

    fn min_native_line_width(&self) -> f32 {
        self.queue.min_line_width()
    }

    fn set_smooth(&mut self, enabled: bool) {
        self.queue.set_smooth(enabled);
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
        self.queue.set_color(color);
        self.queue.set_line_width(width);
        self.queue.begin(topology);
        for p in points {
            self.queue.vertex(*p);
        }
        self.queue.end();
        Ok(())
    }

    fn draw_line_array(&mut self, vertices: &[ColorVertex], width: f32) -> Result<()> {
        if vertices.len() < 2 {
            return Ok(());
        }
        self.queue.set_line_width(width);
        self.queue.begin(Topology::LineList);
        for v in vertices {
            let [r, g, b, a] = v.color;
            self.queue.set_color(Color::rgba(r, g, b, a));
            self.queue.vertex(Point::new(v.position[0], v.position[1]));
        }
        self.queue.end();
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
        self.queue.set_color(color);
        self.queue.begin(topology);
        for xy in positions.chunks_exact(2) {
            self.queue.vertex(Point::new(xy[0], xy[1]));
        }
        self.queue.end();
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
        self.queue.bind_texture(Some(texture));
        self.queue.set_color(tint);
        self.queue.begin(topology);
        for v in vertices {
            self.queue.tex_coord(v.uv[0], v.uv[1]);
            self.queue.vertex(Point::new(v.position[0], v.position[1]));
        }
        self.queue.end();
        self.queue.bind_texture(None);
        Ok(())
    }

    fn fill_circle(
        &mut self,
        _center: Point,
        _radius: f32,
        _fill: Color,
        _border: Color,
        _border_width: f32,
    ) -> bool {
        false // no analytic circle program; the ellipse fan path applies
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> bool {
        self.queue.set_color(color);
        self.queue.begin(Topology::TriangleFan);
        self.queue.vertex(Point::new(rect.x, rect.y));
        self.queue.vertex(Point::new(rect.right(), rect.y));
        self.queue.vertex(Point::new(rect.right(), rect.bottom()));
        self.queue.vertex(Point::new(rect.x, rect.bottom()));
        self.queue.end();
        true
    }

    fn fill_ellipse(&mut self, _rect: Rect, _color: Color) -> bool {
        false
    }
}
