//! The drawing context: state + backend dispatch.

use skiff_core::{
    Brush, BrushStyle, CanvasSurface, Color, ColorVertex, FontId, FontService, Pen, Point, Rect,
    Result, Size, TexturedVertex, TextureHandle, TextureService, Topology,
};
use skiff_gpu::GpuTier;
use skiff_tess::{shapes, stroke, ScratchBuffer, Tessellator, TriangleMesh, WindingRule};
use skiff_text::TextRenderer;

use crate::config::PaintConfig;

/// Pattern texture bound for fills with a pattern-style brush.
#[derive(Clone, Copy, Debug)]
pub struct PatternTexture {
    pub texture: TextureHandle,
    /// Texture extent in device units, used for coordinate generation.
    pub size: Size,
}

enum Binding {
    Canvas(Box<dyn CanvasSurface>),
    Gpu(Box<dyn GpuTier>),
}

/// A drawing context bound to exactly one backend.
///
/// Construction fixes the binding for the context's lifetime; there is no
/// rebinding. Pen and brush setters mutate state only — nothing reaches
/// the backend until a draw call. An unset pen and a transparent brush
/// are the two "nothing to draw" signals: the corresponding geometry
/// generation is skipped silently, never reported as an error.
pub struct PaintContext {
    binding: Binding,
    config: PaintConfig,

    pen: Pen,
    brush: Brush,
    background: Brush,
    text_foreground: Color,
    text_background: Color,
    font: FontId,
    pattern: Option<PatternTexture>,
    viewport_override: Option<Size>,

    font_service: Option<Box<dyn FontService>>,
    texture_service: Option<Box<dyn TextureService>>,
    text_renderer: TextRenderer,

    scratch: ScratchBuffer,
    tessellator: Tessellator,

    bounding_box: Option<Rect>,
    warned_no_font: bool,
    warned_canvas_array: bool,
}

impl PaintContext {
    /// Bind to a retained 2D canvas; primitives forward to it wholesale.
    pub fn with_canvas(canvas: Box<dyn CanvasSurface>) -> Self {
        Self::new(Binding::Canvas(canvas))
    }

    /// Bind to a GPU tier; primitives become generated geometry.
    pub fn with_gpu(tier: Box<dyn GpuTier>) -> Self {
        Self::new(Binding::Gpu(tier))
    }

    fn new(binding: Binding) -> Self {
        Self {
            binding,
            config: PaintConfig::default(),
            pen: Pen::none(),
            brush: Brush::transparent(),
            background: Brush::solid(Color::BLACK),
            text_foreground: Color::BLACK,
            text_background: Color::TRANSPARENT,
            font: FontId::default(),
            pattern: None,
            viewport_override: None,
            font_service: None,
            texture_service: None,
            text_renderer: TextRenderer::new(),
            scratch: ScratchBuffer::new(),
            tessellator: Tessellator::new(),
            bounding_box: None,
            warned_no_font: false,
            warned_canvas_array: false,
        }
    }

    pub fn with_config(mut self, config: PaintConfig) -> Self {
        self.config = config;
        self
    }

    pub fn set_font_service(&mut self, service: Box<dyn FontService>) {
        self.font_service = Some(service);
    }

    pub fn set_texture_service(&mut self, service: Box<dyn TextureService>) {
        self.texture_service = Some(service);
    }

    // ── state ─────────────────────────────────────────────────────────────

    pub fn set_pen(&mut self, pen: Pen) {
        self.pen = pen;
    }

    pub fn set_brush(&mut self, brush: Brush) {
        self.brush = brush;
    }

    pub fn set_background(&mut self, brush: Brush) {
        if let Binding::Canvas(canvas) = &mut self.binding {
            canvas.set_background(&brush);
        }
        self.background = brush;
    }

    pub fn set_text_foreground(&mut self, color: Color) {
        self.text_foreground = color;
    }

    pub fn set_text_background(&mut self, color: Color) {
        self.text_background = color;
    }

    pub fn set_font(&mut self, font: FontId) {
        self.font = font;
    }

    /// Bind or clear the pattern texture consumed by pattern fills.
    pub fn set_pattern_texture(&mut self, pattern: Option<PatternTexture>) {
        self.pattern = pattern;
    }

    pub fn set_viewport(&mut self, size: Size) {
        self.viewport_override = Some(size);
    }

    pub fn pen(&self) -> &Pen {
        &self.pen
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn font(&self) -> FontId {
        self.font
    }

    pub fn size(&self) -> Size {
        if let Some(size) = self.viewport_override {
            return size;
        }
        match &self.binding {
            Binding::Canvas(canvas) => canvas.size(),
            Binding::Gpu(tier) => tier.viewport(),
        }
    }

    /// Drop per-frame scratch state, retaining capacity.
    pub fn end_frame(&mut self) {
        self.scratch.reset();
    }

    // ── configure helpers ─────────────────────────────────────────────────

    /// True exactly when the current pen produces a stroke. A `false`
    /// return is the sole "skip stroking" signal.
    fn configure_pen(&self) -> bool {
        self.pen.is_ok()
    }

    /// True exactly when the current brush produces a fill. A `false`
    /// return is the sole "skip filling" signal; no tessellation work
    /// happens for a transparent brush.
    fn configure_brush(&self) -> bool {
        self.brush.is_ok()
    }

    // ── bounding box ──────────────────────────────────────────────────────

    pub fn reset_bounding_box(&mut self) {
        if let Binding::Canvas(canvas) = &mut self.binding {
            canvas.reset_bounding_box();
        }
        self.bounding_box = None;
    }

    pub fn calc_bounding_box(&mut self, p: Point) {
        if let Binding::Canvas(canvas) = &mut self.binding {
            canvas.calc_bounding_box(p);
        }
        self.accumulate(p);
    }

    /// Dirty extent of everything drawn since the last reset.
    pub fn bounding_box(&self) -> Option<Rect> {
        self.bounding_box
    }

    fn accumulate(&mut self, p: Point) {
        self.bounding_box = Some(match self.bounding_box {
            Some(bb) => bb.union_point(p),
            None => Rect::new(p.x, p.y, 0.0, 0.0),
        });
    }

    fn accumulate_rect(&mut self, rect: Rect) {
        self.accumulate(Point::new(rect.x, rect.y));
        self.accumulate(Point::new(rect.right(), rect.bottom()));
    }

    // ── clear / background ────────────────────────────────────────────────

    /// Fill the whole target with the background brush.
    pub fn clear(&mut self) -> Result<()> {
        match &mut self.binding {
            Binding::Canvas(canvas) => {
                canvas.clear();
                Ok(())
            }
            Binding::Gpu(_) => {
                let size = self.size();
                let saved = self.brush;
                self.brush = self.background;
                let result = self.draw_rectangle(Rect::new(0.0, 0.0, size.width, size.height));
                self.brush = saved;
                result
            }
        }
    }

    // ── lines ─────────────────────────────────────────────────────────────

    pub fn draw_line(&mut self, a: Point, b: Point, hi_quality: bool) -> Result<()> {
        if let Binding::Canvas(canvas) = &mut self.binding {
            canvas.set_pen(&self.pen);
            canvas.draw_line(a, b);
            return Ok(());
        }
        if !self.configure_pen() {
            return Ok(());
        }
        self.gpu_line(a, b, hi_quality)?;
        self.accumulate(a);
        self.accumulate(b);
        Ok(())
    }

    pub fn draw_lines(&mut self, points: &[Point], hi_quality: bool) -> Result<()> {
        if let Binding::Canvas(canvas) = &mut self.binding {
            canvas.set_pen(&self.pen);
            canvas.draw_lines(points);
            return Ok(());
        }
        if points.len() < 2 || !self.configure_pen() {
            return Ok(());
        }

        let pen = self.pen;
        let (min_w, max_w) = self.line_width_range();
        let width = min_w.max(pen.width);

        self.set_smooth(hi_quality);
        if pen.width > max_w {
            let mut tris = Vec::new();
            match pen.scaled_dashes() {
                Some(dashes) => {
                    // Dashed thick polylines extrude segment by segment.
                    for w in points.windows(2) {
                        stroke::extrude_segment(
                            w[0],
                            w[1],
                            pen.width,
                            Some(dashes),
                            pen.cap,
                            &self.config.stroke,
                            &mut tris,
                        );
                    }
                }
                None => stroke::extrude_polyline(
                    points,
                    pen.width,
                    pen.cap,
                    &self.config.stroke,
                    &mut tris,
                ),
            }
            self.submit_triangles(Topology::TriangleList, &tris, pen.color)?;
        } else {
            match pen.scaled_dashes() {
                Some(dashes) => {
                    let mut segs = Vec::new();
                    for w in points.windows(2) {
                        stroke::dash_segments(w[0], w[1], dashes, &self.config.stroke, &mut segs);
                    }
                    let flat: Vec<Point> = segs.iter().flat_map(|(a, b)| [*a, *b]).collect();
                    self.submit_lines(Topology::LineList, &flat, pen.color, width)?;
                }
                None => self.submit_lines(Topology::LineStrip, points, pen.color, width)?,
            }
        }
        self.set_smooth(false);

        for p in points {
            self.accumulate(*p);
        }
        Ok(())
    }

    pub fn stroke_line(&mut self, a: Point, b: Point) -> Result<()> {
        self.draw_line(a, b, true)?;
        self.calc_bounding_box(a);
        self.calc_bounding_box(b);
        Ok(())
    }

    pub fn stroke_lines(&mut self, points: &[Point]) -> Result<()> {
        if points.len() < 2 {
            return Ok(());
        }
        self.draw_lines(points, true)
    }

    /// Per-vertex-colored line list. Canvas backends have no equivalent;
    /// the call is skipped there with a one-shot notice.
    pub fn draw_line_array(&mut self, vertices: &[ColorVertex], hi_quality: bool) -> Result<()> {
        match &mut self.binding {
            Binding::Canvas(_) => {
                if !self.warned_canvas_array {
                    tracing::debug!("line arrays are not supported on the canvas binding");
                    self.warned_canvas_array = true;
                }
                Ok(())
            }
            Binding::Gpu(tier) => {
                if !self.pen.is_ok() {
                    return Ok(());
                }
                let width = tier.min_native_line_width().max(self.pen.width);
                tier.set_smooth(hi_quality);
                tier.draw_line_array(vertices, width)?;
                tier.set_smooth(false);
                for v in vertices {
                    self.accumulate(Point::new(v.position[0], v.position[1]));
                }
                Ok(())
            }
        }
    }

    fn gpu_line(&mut self, a: Point, b: Point, hi_quality: bool) -> Result<()> {
        let pen = self.pen;
        let (min_w, max_w) = self.line_width_range();
        let width = min_w.max(pen.width);

        self.set_smooth(hi_quality);
        if width > max_w {
            let mut tris = Vec::new();
            stroke::extrude_segment(
                a,
                b,
                pen.width,
                pen.scaled_dashes(),
                pen.cap,
                &self.config.stroke,
                &mut tris,
            );
            self.submit_triangles(Topology::TriangleList, &tris, pen.color)?;
        } else {
            match pen.scaled_dashes() {
                Some(dashes) => {
                    let mut segs = Vec::new();
                    stroke::dash_segments(a, b, dashes, &self.config.stroke, &mut segs);
                    let flat: Vec<Point> = segs.iter().flat_map(|(a, b)| [*a, *b]).collect();
                    self.submit_lines(Topology::LineList, &flat, pen.color, width)?;
                }
                None => self.submit_lines(Topology::LineList, &[a, b], pen.color, width)?,
            }
        }
        self.set_smooth(false);
        Ok(())
    }

    // ── arcs and sectors ──────────────────────────────────────────────────

    /// Arc between `p1` and `p2` around `center`. Canvas backends draw the
    /// true arc; the GPU path renders the chord with the current pen, as
    /// callers supply pre-flattened arcs there.
    pub fn draw_arc(&mut self, center: Point, p1: Point, p2: Point, hi_quality: bool) -> Result<()> {
        if let Binding::Canvas(canvas) = &mut self.binding {
            canvas.set_pen(&self.pen);
            canvas.draw_arc(p1, p2, center);
            return Ok(());
        }
        self.draw_line(p1, p2, hi_quality)
    }

    pub fn stroke_arc(&mut self, center: Point, p1: Point, p2: Point) -> Result<()> {
        self.draw_arc(center, p1, p2, true)?;
        self.calc_bounding_box(p1);
        self.calc_bounding_box(p2);
        Ok(())
    }

    /// Filled sector bounded by two radii and two arcs; `p1`/`p2` sit on
    /// the first bounding radius (inner, outer), `p3`/`p4` on the second
    /// (outer, inner).
    pub fn draw_sector(
        &mut self,
        center: Point,
        p1: Point,
        p2: Point,
        p3: Point,
        p4: Point,
    ) -> Result<()> {
        let mut points = Vec::new();
        shapes::arc_sector_points(center, p1, p2, p3, p4, true, &mut points);
        if let Binding::Canvas(canvas) = &mut self.binding {
            canvas.set_pen(&self.pen);
            canvas.set_brush(&self.brush);
            canvas.draw_polygon(&points);
            return Ok(());
        }
        self.draw_lines(&points, true)?;
        self.draw_polygon(&points)
    }

    pub fn stroke_sector(
        &mut self,
        center: Point,
        p1: Point,
        p2: Point,
        p3: Point,
        p4: Point,
    ) -> Result<()> {
        self.draw_sector(center, p1, p2, p3, p4)?;
        self.calc_bounding_box(p1);
        self.calc_bounding_box(p3);
        Ok(())
    }

    // ── rectangles ────────────────────────────────────────────────────────

    pub fn draw_rectangle(&mut self, rect: Rect) -> Result<()> {
        if let Binding::Canvas(canvas) = &mut self.binding {
            canvas.set_pen(&self.pen);
            canvas.set_brush(&self.brush);
            canvas.draw_rectangle(rect);
            return Ok(());
        }

        let corners = [
            Point::new(rect.x, rect.y),
            Point::new(rect.right(), rect.y),
            Point::new(rect.right(), rect.bottom()),
            Point::new(rect.x, rect.bottom()),
        ];
        if self.configure_brush() {
            let color = self.brush.color;
            let handled = match &mut self.binding {
                Binding::Gpu(tier) => tier.fill_rect(rect, color),
                Binding::Canvas(_) => unreachable!("canvas handled above"),
            };
            if !handled {
                self.submit_triangles(Topology::TriangleFan, &corners, color)?;
            }
        }
        if self.configure_pen() {
            let pen = self.pen;
            let width = self.line_width_range().0.max(pen.width);
            self.submit_lines(Topology::LineLoop, &corners, pen.color, width)?;
        }
        self.accumulate_rect(rect);
        Ok(())
    }

    pub fn draw_rounded_rectangle(&mut self, rect: Rect, radius: f32) -> Result<()> {
        if let Binding::Canvas(canvas) = &mut self.binding {
            canvas.set_pen(&self.pen);
            canvas.set_brush(&self.brush);
            canvas.draw_rounded_rectangle(rect, radius);
            return Ok(());
        }

        let mut points = Vec::new();
        shapes::rounded_rect_points(rect.x, rect.y, rect.width, rect.height, radius, &mut points);

        if self.configure_brush() {
            let color = self.brush.color;
            self.submit_triangles(Topology::TriangleFan, &points, color)?;
        }
        if self.configure_pen() {
            let pen = self.pen;
            let width = self.line_width_range().0.max(pen.width);
            self.submit_lines(Topology::LineLoop, &points, pen.color, width)?;
        }
        self.accumulate_rect(rect);
        Ok(())
    }

    // ── circles, ellipses, disks ──────────────────────────────────────────

    pub fn draw_circle(&mut self, center: Point, radius: f32) -> Result<()> {
        let rect = Rect::new(
            center.x - radius,
            center.y - radius,
            radius * 2.0,
            radius * 2.0,
        );
        match &mut self.binding {
            Binding::Canvas(canvas) => {
                canvas.set_pen(&self.pen);
                canvas.set_brush(&self.brush);
                canvas.draw_ellipse(rect);
                Ok(())
            }
            Binding::Gpu(tier) => {
                // The fill alpha collapses to zero for a transparent
                // brush; the border still draws.
                let mut fill = self.brush.color;
                if self.brush.style == BrushStyle::Transparent {
                    fill.a = 0.0;
                }
                let handled =
                    tier.fill_circle(center, radius, fill, self.pen.color, self.pen.width);
                if handled {
                    self.accumulate_rect(rect);
                    Ok(())
                } else {
                    self.draw_ellipse(rect)
                }
            }
        }
    }

    pub fn stroke_circle(&mut self, center: Point, radius: f32) -> Result<()> {
        self.draw_circle(center, radius)?;
        // Pad the dirty box so the anti-aliased rim is invalidated too.
        self.calc_bounding_box(Point::new(center.x + radius + 2.0, center.y + radius + 2.0));
        self.calc_bounding_box(Point::new(center.x - radius - 2.0, center.y - radius - 2.0));
        Ok(())
    }

    pub fn draw_ellipse(&mut self, rect: Rect) -> Result<()> {
        if let Binding::Canvas(canvas) = &mut self.binding {
            canvas.set_pen(&self.pen);
            canvas.set_brush(&self.brush);
            canvas.draw_ellipse(rect);
            return Ok(());
        }

        let center = Point::new(rect.x + rect.width / 2.0, rect.y + rect.height / 2.0);
        let (rx, ry) = (rect.width / 2.0, rect.height / 2.0);
        let steps = shapes::ellipse_steps(rect.width, rect.height);

        self.set_smooth(true);
        if self.configure_brush() {
            let color = self.brush.color;
            let handled = match &mut self.binding {
                Binding::Gpu(tier) => tier.fill_ellipse(rect, color),
                Binding::Canvas(_) => unreachable!("canvas handled above"),
            };
            if !handled {
                let mut ring = vec![center];
                shapes::ellipse_ring(center, rx, ry, steps, &mut ring);
                self.submit_triangles(Topology::TriangleFan, &ring, color)?;
            }
        }
        if self.configure_pen() {
            let mut ring = Vec::new();
            shapes::ellipse_ring(center, rx, ry, steps, &mut ring);
            let pen = self.pen;
            let width = self.line_width_range().0.max(pen.width);
            self.submit_lines(Topology::LineStrip, &ring, pen.color, width)?;
        }
        self.set_smooth(false);
        self.accumulate_rect(rect);
        Ok(())
    }

    /// Filled annulus. Emitted as a 2-contour polygon with opposed ring
    /// windings so the hole punches under the winding rule.
    pub fn draw_disk(&mut self, center: Point, inner_radius: f32, outer_radius: f32) -> Result<()> {
        let mut points = Vec::new();
        let counts = shapes::disk_contours(center, inner_radius, outer_radius, &mut points);

        match &mut self.binding {
            Binding::Canvas(canvas) => {
                canvas.set_pen(&self.pen);
                canvas.set_brush(&self.brush);
                canvas.draw_poly_polygon(&counts, &points);
                Ok(())
            }
            Binding::Gpu(_) => {
                if let Some(pattern) = self.pattern {
                    return self.draw_disk_pattern(center, inner_radius, outer_radius, pattern);
                }
                self.fill_contours(&counts, &points, WindingRule::OddEven)?;
                self.accumulate_rect(Rect::new(
                    center.x - outer_radius,
                    center.y - outer_radius,
                    outer_radius * 2.0,
                    outer_radius * 2.0,
                ));
                Ok(())
            }
        }
    }

    /// Annulus filled with a pattern texture.
    pub fn draw_disk_pattern(
        &mut self,
        center: Point,
        inner_radius: f32,
        outer_radius: f32,
        pattern: PatternTexture,
    ) -> Result<()> {
        if matches!(self.binding, Binding::Canvas(_)) {
            return self.draw_disk(center, inner_radius, outer_radius);
        }
        let mut points = Vec::new();
        let counts = shapes::disk_contours(center, inner_radius, outer_radius, &mut points);
        self.fill_contours_pattern(&counts, &points, pattern)?;
        self.accumulate_rect(Rect::new(
            center.x - outer_radius,
            center.y - outer_radius,
            outer_radius * 2.0,
            outer_radius * 2.0,
        ));
        Ok(())
    }

    // ── polygons ──────────────────────────────────────────────────────────

    pub fn draw_polygon(&mut self, points: &[Point]) -> Result<()> {
        self.draw_polygon_transformed(points, Point::ZERO, 1.0, 0.0)
    }

    /// Polygon with an offset, uniform scale, and rotation about the
    /// origin applied up front.
    pub fn draw_polygon_transformed(
        &mut self,
        points: &[Point],
        offset: Point,
        scale: f32,
        angle: f32,
    ) -> Result<()> {
        let transformed = transform_points(points, offset, scale, angle);
        let points = transformed.as_slice();

        if let Binding::Canvas(canvas) = &mut self.binding {
            canvas.set_pen(&self.pen);
            canvas.set_brush(&self.brush);
            canvas.draw_polygon(points);
            return Ok(());
        }
        if points.len() < 3 {
            return Ok(());
        }

        if let Some(pattern) = self.pattern {
            return self.gpu_polygon_pattern(points, pattern);
        }

        self.set_smooth(true);
        if self.configure_brush() {
            let color = self.brush.color;
            if points.len() > 4 {
                let mesh = self.tessellator.tessellate(&[points], WindingRule::NonZero);
                self.submit_mesh(&mesh, color)?;
            } else if points.len() == 4 {
                // Convex-quad fast path: swizzle into a triangle strip.
                let strip = [points[0], points[1], points[3], points[2]];
                self.submit_triangles(Topology::TriangleStrip, &strip, color)?;
            } else {
                self.submit_triangles(Topology::TriangleList, points, color)?;
            }
        }
        if self.configure_pen() {
            let pen = self.pen;
            let width = self.line_width_range().0.max(pen.width);
            self.submit_lines(Topology::LineLoop, points, pen.color, width)?;
        }
        self.set_smooth(false);

        for p in points {
            self.accumulate(*p);
        }
        Ok(())
    }

    pub fn stroke_polygon(&mut self, points: &[Point], offset: Point) -> Result<()> {
        self.draw_polygon_transformed(points, offset, 1.0, 0.0)?;
        for p in points {
            self.calc_bounding_box(p.offset(offset.x, offset.y));
        }
        Ok(())
    }

    /// Multi-contour polygon set sharing one fill; `counts[i]` points
    /// belong to contour `i`.
    pub fn draw_polygons(&mut self, counts: &[usize], points: &[Point]) -> Result<()> {
        if let Binding::Canvas(canvas) = &mut self.binding {
            canvas.set_pen(&self.pen);
            canvas.set_brush(&self.brush);
            canvas.draw_poly_polygon(counts, points);
            return Ok(());
        }
        if let Some(pattern) = self.pattern {
            return self.draw_polygons_pattern(counts, points, pattern);
        }
        self.draw_polygons_tessellated(counts, points)
    }

    /// Single tessellated contour under the non-zero rule.
    pub fn draw_polygon_tessellated(&mut self, points: &[Point]) -> Result<()> {
        if let Binding::Canvas(canvas) = &mut self.binding {
            canvas.set_pen(&self.pen);
            canvas.set_brush(&self.brush);
            canvas.draw_polygon(points);
            return Ok(());
        }
        if !self.configure_brush() {
            return Ok(());
        }
        let color = self.brush.color;
        let mesh = self.tessellator.tessellate(&[points], WindingRule::NonZero);
        self.submit_mesh(&mesh, color)?;
        for p in points {
            self.accumulate(*p);
        }
        Ok(())
    }

    /// Multiple tessellated contours under the odd-even rule.
    pub fn draw_polygons_tessellated(&mut self, counts: &[usize], points: &[Point]) -> Result<()> {
        if let Binding::Canvas(canvas) = &mut self.binding {
            canvas.set_pen(&self.pen);
            canvas.set_brush(&self.brush);
            let mut start = 0;
            for &count in counts {
                canvas.draw_polygon(&points[start..start + count]);
                start += count;
            }
            return Ok(());
        }
        self.fill_contours(counts, points, WindingRule::OddEven)?;
        for p in points {
            self.accumulate(*p);
        }
        Ok(())
    }

    pub fn draw_polygon_pattern(
        &mut self,
        points: &[Point],
        pattern: PatternTexture,
        offset: Point,
        scale: f32,
        angle: f32,
    ) -> Result<()> {
        let transformed = transform_points(points, offset, scale, angle);
        let points = transformed.as_slice();
        if let Binding::Canvas(canvas) = &mut self.binding {
            canvas.set_pen(&self.pen);
            canvas.set_brush(&self.brush);
            canvas.draw_polygon(points);
            return Ok(());
        }
        if points.len() < 3 {
            return Ok(());
        }
        self.gpu_polygon_pattern(points, pattern)
    }

    pub fn draw_polygons_pattern(
        &mut self,
        counts: &[usize],
        points: &[Point],
        pattern: PatternTexture,
    ) -> Result<()> {
        if let Binding::Canvas(canvas) = &mut self.binding {
            canvas.set_pen(&self.pen);
            canvas.set_brush(&self.brush);
            canvas.draw_poly_polygon(counts, points);
            return Ok(());
        }
        self.fill_contours_pattern(counts, points, pattern)?;
        for p in points {
            self.accumulate(*p);
        }
        Ok(())
    }

    fn gpu_polygon_pattern(&mut self, points: &[Point], pattern: PatternTexture) -> Result<()> {
        self.fill_contours_pattern(&[points.len()], points, pattern)?;
        if self.configure_pen() {
            let pen = self.pen;
            let width = self.line_width_range().0.max(pen.width);
            self.submit_lines(Topology::LineLoop, points, pen.color, width)?;
        }
        for p in points {
            self.accumulate(*p);
        }
        Ok(())
    }

    // ── textured quads ────────────────────────────────────────────────────

    /// Draw a texture region as an untinted quad of the given extent.
    pub fn draw_texture(
        &mut self,
        texture: TextureHandle,
        tex_rect: Rect,
        width: f32,
        height: f32,
        position: Point,
    ) -> Result<()> {
        self.textured_quad(texture, tex_rect, width, height, position, Color::WHITE)
    }

    /// Draw an alpha texture region tinted with the current pen color.
    pub fn draw_texture_alpha(
        &mut self,
        texture: TextureHandle,
        tex_rect: Rect,
        width: f32,
        height: f32,
        position: Point,
    ) -> Result<()> {
        let tint = self.pen.color;
        self.textured_quad(texture, tex_rect, width, height, position, tint)
    }

    fn textured_quad(
        &mut self,
        texture: TextureHandle,
        tex_rect: Rect,
        width: f32,
        height: f32,
        position: Point,
        tint: Color,
    ) -> Result<()> {
        let Binding::Gpu(tier) = &mut self.binding else {
            return Ok(()); // canvas bitmaps are the embedder's concern
        };
        if tex_rect.is_empty() || width <= 0.0 || height <= 0.0 {
            return Ok(());
        }
        let u = width / tex_rect.width;
        let v = height / tex_rect.height;
        let quad = [
            TexturedVertex { position: [position.x, position.y], uv: [0.0, 0.0] },
            TexturedVertex { position: [position.x + width, position.y], uv: [u, 0.0] },
            TexturedVertex { position: [position.x + width, position.y + height], uv: [u, v] },
            TexturedVertex { position: [position.x, position.y + height], uv: [0.0, v] },
        ];
        tier.fill_textured(Topology::TriangleFan, &quad, texture, tint)?;
        self.accumulate_rect(Rect::new(position.x, position.y, width, height));
        Ok(())
    }

    /// Draw a pre-computed textured quad rotated by `angle` and offset by
    /// `delta`; corner order is fan order.
    pub fn render_single_texture(
        &mut self,
        texture: TextureHandle,
        corners: &[Point; 4],
        uv: &[[f32; 2]; 4],
        delta: Point,
        angle: f32,
    ) -> Result<()> {
        let Binding::Gpu(tier) = &mut self.binding else {
            return Ok(());
        };
        let (sin, cos) = angle.sin_cos();
        let mut quad = [TexturedVertex { position: [0.0, 0.0], uv: [0.0, 0.0] }; 4];
        for (i, p) in corners.iter().enumerate() {
            let x = p.x * cos - p.y * sin + delta.x;
            let y = p.x * sin + p.y * cos + delta.y;
            quad[i] = TexturedVertex { position: [x, y], uv: uv[i] };
        }
        tier.fill_textured(Topology::TriangleFan, &quad, texture, Color::WHITE)?;
        for v in quad {
            self.accumulate(Point::new(v.position[0], v.position[1]));
        }
        Ok(())
    }

    // ── text ──────────────────────────────────────────────────────────────

    pub fn draw_text(&mut self, text: &str, position: Point) -> Result<()> {
        self.draw_text_scaled(text, position, 1.0)
    }

    pub fn draw_text_scaled(&mut self, text: &str, position: Point, scale: f32) -> Result<()> {
        if let Binding::Canvas(canvas) = &mut self.binding {
            canvas.set_text_foreground(self.text_foreground);
            canvas.set_text_background(self.text_background);
            canvas.draw_text(text, position);
            return Ok(());
        }
        if text.is_empty() {
            return Ok(());
        }

        let Some(font) = self.font_service.as_deref_mut() else {
            if !self.warned_no_font {
                tracing::debug!("no font service bound; text is skipped");
                self.warned_no_font = true;
            }
            return Ok(());
        };
        // Raw extent here: an empty measurement means nothing to draw, so
        // the defensive defaults of `text_extent` must not apply.
        let measured = font.measure(text, self.font);
        if measured.is_empty() {
            return Ok(());
        }

        // Background fill first, with a transient transparent pen so only
        // the fill lands.
        if self.text_background.a != 0.0 {
            let saved_pen = self.pen;
            let saved_brush = self.brush;
            self.pen = Pen::none();
            self.brush = Brush::solid(self.text_background);
            let rect = Rect::new(
                position.x,
                position.y,
                measured.width * scale,
                measured.height * scale,
            );
            let result = self.draw_rounded_rectangle(rect, self.config.text_background_radius);
            self.pen = saved_pen;
            self.brush = saved_brush;
            result?;
        }

        let Some(font) = self.font_service.as_deref_mut() else {
            return Ok(());
        };
        let prepared = self.text_renderer.prepare(
            font,
            self.texture_service.as_deref_mut(),
            self.font,
            text,
            self.text_foreground,
        );
        let Some(prepared) = prepared else {
            return Ok(());
        };

        let w = prepared.size.width * scale;
        let h = prepared.size.height * scale;
        let [u0, v0, u1, v1] = prepared.uv;
        let quad = [
            TexturedVertex { position: [position.x, position.y], uv: [u0, v0] },
            TexturedVertex { position: [position.x + w, position.y], uv: [u1, v0] },
            TexturedVertex { position: [position.x + w, position.y + h], uv: [u1, v1] },
            TexturedVertex { position: [position.x, position.y + h], uv: [u0, v1] },
        ];
        // Glyph-run atlases are alpha masks tinted here; software quads
        // carry their color already.
        let tint = if prepared.transient {
            Color::WHITE
        } else {
            self.text_foreground
        };

        let Binding::Gpu(tier) = &mut self.binding else {
            unreachable!("canvas handled above");
        };
        tier.set_smooth(true);
        tier.fill_textured(Topology::TriangleFan, &quad, prepared.texture, tint)?;
        tier.set_smooth(false);

        if prepared.transient {
            if let Some(textures) = self.texture_service.as_deref_mut() {
                textures.release(prepared.texture);
            }
        }
        self.accumulate_rect(Rect::new(position.x, position.y, w, h));
        Ok(())
    }

    /// Text extent with the defensive default and clamps applied on every
    /// path.
    pub fn text_extent(&mut self, text: &str) -> Size {
        match &mut self.binding {
            Binding::Canvas(canvas) => TextRenderer::sanitize(canvas.text_extent(text)),
            Binding::Gpu(_) => match self.font_service.as_deref_mut() {
                Some(font) => self.text_renderer.measure(font, self.font, text),
                None => Size::new(100.0, 100.0),
            },
        }
    }

    // ── submission helpers (GPU binding only) ─────────────────────────────

    fn line_width_range(&self) -> (f32, f32) {
        match &self.binding {
            Binding::Gpu(tier) => (tier.min_native_line_width(), tier.max_native_line_width()),
            Binding::Canvas(_) => (1.0, f32::INFINITY),
        }
    }

    fn set_smooth(&mut self, enabled: bool) {
        if let Binding::Gpu(tier) = &mut self.binding {
            tier.set_smooth(enabled);
        }
    }

    fn submit_lines(
        &mut self,
        topology: Topology,
        points: &[Point],
        color: Color,
        width: f32,
    ) -> Result<()> {
        if let Binding::Gpu(tier) = &mut self.binding {
            tier.draw_lines(topology, points, color, width)?;
        }
        Ok(())
    }

    fn submit_triangles(&mut self, topology: Topology, points: &[Point], color: Color) -> Result<()> {
        let Binding::Gpu(tier) = &mut self.binding else {
            return Ok(());
        };
        self.scratch.reset();
        self.scratch.extend_points(points)?;
        tier.fill_triangles(topology, self.scratch.as_slice(), color)
    }

    fn submit_mesh(&mut self, mesh: &TriangleMesh, color: Color) -> Result<()> {
        if mesh.is_empty() {
            return Ok(());
        }
        let Binding::Gpu(tier) = &mut self.binding else {
            return Ok(());
        };
        self.scratch.reset();
        self.scratch.reserve(mesh.vertices.len() * 2)?;
        for v in &mesh.vertices {
            self.scratch.push_point(v.position)?;
        }
        tier.fill_triangles(Topology::TriangleList, self.scratch.as_slice(), color)
    }

    /// Tessellate contours and submit the fill, honoring the transparent
    /// brush skip.
    fn fill_contours(
        &mut self,
        counts: &[usize],
        points: &[Point],
        rule: WindingRule,
    ) -> Result<()> {
        if !self.configure_brush() {
            return Ok(());
        }
        let color = self.brush.color;
        let contours = split_contours(counts, points);
        let mesh = self.tessellator.tessellate(&contours, rule);
        self.submit_mesh(&mesh, color)
    }

    /// Pattern fill: odd-even tessellation with texture coordinates
    /// generated from the position relative to the contour minimum.
    fn fill_contours_pattern(
        &mut self,
        counts: &[usize],
        points: &[Point],
        pattern: PatternTexture,
    ) -> Result<()> {
        if !self.configure_brush() || points.is_empty() {
            return Ok(());
        }
        if pattern.size.is_empty() {
            return Ok(());
        }
        let tint = self.brush.color;

        let contours = split_contours(counts, points);
        let mesh = self.tessellator.tessellate(&contours, WindingRule::OddEven);
        if mesh.is_empty() {
            return Ok(());
        }

        let min_x = points.iter().map(|p| p.x).fold(f32::INFINITY, f32::min);
        let min_y = points.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);

        let vertices: Vec<TexturedVertex> = mesh
            .vertices
            .iter()
            .map(|v| TexturedVertex {
                position: [v.position.x, v.position.y],
                uv: [
                    (v.position.x - min_x) / pattern.size.width / 2.0,
                    (v.position.y - min_y) / pattern.size.height / 2.0,
                ],
            })
            .collect();

        let Binding::Gpu(tier) = &mut self.binding else {
            return Ok(());
        };
        tier.fill_textured(Topology::TriangleList, &vertices, pattern.texture, tint)
    }
}

fn transform_points(points: &[Point], offset: Point, scale: f32, angle: f32) -> Vec<Point> {
    if offset == Point::ZERO && scale == 1.0 && angle == 0.0 {
        return points.to_vec();
    }
    let (sin, cos) = angle.sin_cos();
    points
        .iter()
        .map(|p| {
            let x = p.x * scale;
            let y = p.y * scale;
            Point::new(x * cos - y * sin + offset.x, x * sin + y * cos + offset.y)
        })
        .collect()
}

fn split_contours<'a>(counts: &[usize], points: &'a [Point]) -> Vec<&'a [Point]> {
    let mut out = Vec::with_capacity(counts.len());
    let mut start = 0;
    for &count in counts {
        let end = (start + count).min(points.len());
        if end > start {
            out.push(&points[start..end]);
        }
        start = end;
    }
    out
}
