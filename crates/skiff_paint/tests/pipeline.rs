//! End-to-end geometry checks through the drawing context: everything a
//! GPU tier receives is recorded and measured for area/coverage parity.

use std::cell::RefCell;
use std::f32::consts::PI;
use std::rc::Rc;

use skiff_core::{
    Color, ColorVertex, Point, Rect, Result, Size, TexturedVertex, TextureHandle, Topology,
};
use skiff_gpu::GpuTier;
use skiff_paint::{Brush, PaintContext, Pen, PenStyle};
use skiff_tess::shapes;

#[derive(Default)]
struct Recorded {
    fills: Vec<(Topology, Vec<f32>)>,
    lines: Vec<(Topology, Vec<f32>)>,
}

struct RecordingTier {
    recorded: Rc<RefCell<Recorded>>,
    max_width: f32,
}

impl RecordingTier {
    fn new(max_width: f32) -> (Box<dyn GpuTier>, Rc<RefCell<Recorded>>) {
        let recorded = Rc::new(RefCell::new(Recorded::default()));
        (
            Box::new(RecordingTier {
                recorded: recorded.clone(),
                max_width,
            }),
            recorded,
        )
    }
}

impl GpuTier for RecordingTier {
    fn viewport(&self) -> Size {
        Size::new(1024.0, 768.0)
    }
    fn max_native_line_width(&self) -> f32 {
        self.max_width
    }
    fn min_native_line_width(&self) -> f32 {
        1.0
    }
    fn set_smooth(&mut self, _enabled: bool) {}
    fn draw_lines(
        &mut self,
        topology: Topology,
        points: &[Point],
        _color: Color,
        _width: f32,
    ) -> Result<()> {
        let flat: Vec<f32> = points.iter().flat_map(|p| [p.x, p.y]).collect();
        self.recorded.borrow_mut().lines.push((topology, flat));
        Ok(())
    }
    fn draw_line_array(&mut self, _vertices: &[ColorVertex], _width: f32) -> Result<()> {
        Ok(())
    }
    fn fill_triangles(
        &mut self,
        topology: Topology,
        positions: &[f32],
        _color: Color,
    ) -> Result<()> {
        self.recorded
            .borrow_mut()
            .fills
            .push((topology, positions.to_vec()));
        Ok(())
    }
    fn fill_textured(
        &mut self,
        _topology: Topology,
        _vertices: &[TexturedVertex],
        _texture: TextureHandle,
        _tint: Color,
    ) -> Result<()> {
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
        false
    }
    fn fill_rect(&mut self, _rect: Rect, _color: Color) -> bool {
        false
    }
    fn fill_ellipse(&mut self, _rect: Rect, _color: Color) -> bool {
        false
    }
}

fn triangle_area(a: [f32; 2], b: [f32; 2], c: [f32; 2]) -> f32 {
    ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])).abs() / 2.0
}

/// Unsigned area covered by one recorded fill, expanded per topology.
fn fill_area(topology: Topology, floats: &[f32]) -> f32 {
    let pts: Vec<[f32; 2]> = floats.chunks_exact(2).map(|c| [c[0], c[1]]).collect();
    match topology {
        Topology::TriangleList => pts
            .chunks_exact(3)
            .map(|t| triangle_area(t[0], t[1], t[2]))
            .sum(),
        Topology::TriangleStrip => (2..pts.len())
            .map(|i| triangle_area(pts[i - 2], pts[i - 1], pts[i]))
            .sum(),
        Topology::TriangleFan => (2..pts.len())
            .map(|i| triangle_area(pts[0], pts[i - 1], pts[i]))
            .sum(),
        _ => 0.0,
    }
}

fn total_fill_area(recorded: &Recorded) -> f32 {
    recorded
        .fills
        .iter()
        .map(|(topology, floats)| fill_area(*topology, floats))
        .sum()
}

#[test]
fn rectangle_fast_path_matches_tessellated_area() {
    // The n = 4 strip shortcut and the generic tessellated path must
    // cover the same region.
    let rect = [
        Point::new(10.0, 10.0),
        Point::new(110.0, 10.0),
        Point::new(110.0, 60.0),
        Point::new(10.0, 60.0),
    ];

    let (tier, fast) = RecordingTier::new(4.0);
    let mut ctx = PaintContext::with_gpu(tier);
    ctx.set_brush(Brush::solid(Color::WHITE));
    ctx.draw_polygon(&rect).unwrap();

    let (tier, tessellated) = RecordingTier::new(4.0);
    let mut ctx = PaintContext::with_gpu(tier);
    ctx.set_brush(Brush::solid(Color::WHITE));
    ctx.draw_polygon_tessellated(&rect).unwrap();

    let fast_area = total_fill_area(&fast.borrow());
    let tess_area = total_fill_area(&tessellated.borrow());
    assert!((fast_area - 5000.0).abs() < 1e-2);
    assert!((fast_area - tess_area).abs() < 1e-2);
}

#[test]
fn disk_covers_annulus_area() {
    let (tier, recorded) = RecordingTier::new(4.0);
    let mut ctx = PaintContext::with_gpu(tier);
    ctx.set_brush(Brush::solid(Color::WHITE));
    ctx.draw_disk(Point::new(200.0, 200.0), 10.0, 20.0).unwrap();

    // Discretized rings undershoot the ideal annulus slightly.
    let ideal = PI * (20.0 * 20.0 - 10.0 * 10.0);
    let area = total_fill_area(&recorded.borrow());
    assert!(area > ideal * 0.95 && area < ideal * 1.01, "area {area} vs {ideal}");
}

#[test]
fn quarter_sector_covers_quarter_annulus() {
    // Sector between radii 10 and 20 spanning 90°, boundary points on the
    // axes. Covered area must match (π/4)(20² − 10²) within the step
    // heuristic's discretization error.
    let c = Point::new(300.0, 300.0);
    let p1 = Point::new(c.x + 10.0, c.y);
    let p2 = Point::new(c.x + 20.0, c.y);
    let p3 = Point::new(c.x, c.y + 20.0);
    let p4 = Point::new(c.x, c.y + 10.0);

    let (tier, recorded) = RecordingTier::new(4.0);
    let mut ctx = PaintContext::with_gpu(tier);
    ctx.set_pen(Pen::new(Color::BLACK, 1.0));
    ctx.set_brush(Brush::solid(Color::WHITE));
    ctx.draw_sector(c, p1, p2, p3, p4).unwrap();

    let ideal = (PI / 4.0) * (20.0 * 20.0 - 10.0 * 10.0);
    let area = total_fill_area(&recorded.borrow());
    assert!(
        (area - ideal).abs() / ideal < 0.05,
        "area {area} vs {ideal}"
    );

    // The outline polyline went out as one strip of the generated points.
    let mut expected = Vec::new();
    shapes::arc_sector_points(c, p1, p2, p3, p4, true, &mut expected);
    let recorded = recorded.borrow();
    assert_eq!(recorded.lines.len(), 2); // sector outline + polygon loop
    assert_eq!(recorded.lines[0].1.len(), expected.len() * 2);
}

#[test]
fn dashed_wide_line_produces_expected_quads() {
    // Width 4 pen, (2, 1) pattern: dashes of 8 and gaps of 4 over a
    // 100-unit run → 8 full quads and a 4-unit tail.
    let (tier, recorded) = RecordingTier::new(2.0);
    let mut ctx = PaintContext::with_gpu(tier);
    ctx.set_pen(Pen::new(Color::BLACK, 4.0).with_style(PenStyle::Dash(2.0, 1.0)));
    ctx.draw_line(Point::new(0.0, 50.0), Point::new(100.0, 50.0), true)
        .unwrap();

    let recorded = recorded.borrow();
    assert_eq!(recorded.fills.len(), 1);
    let (topology, floats) = &recorded.fills[0];
    assert_eq!(*topology, Topology::TriangleList);
    assert_eq!(floats.len() / 12, 9);
    // 8 dashes of 8×4 plus a 4×4 tail.
    let area = fill_area(*topology, floats);
    assert!((area - (8.0 * 32.0 + 16.0)).abs() < 1e-2);
}

#[test]
fn straight_stroke_area_is_width_times_length() {
    let (tier, recorded) = RecordingTier::new(2.0);
    let mut ctx = PaintContext::with_gpu(tier);
    ctx.set_pen(Pen::new(Color::BLACK, 6.0));
    ctx.draw_lines(
        &[
            Point::new(0.0, 0.0),
            Point::new(30.0, 0.0),
            Point::new(80.0, 0.0),
        ],
        true,
    )
    .unwrap();

    let recorded = recorded.borrow();
    let area = total_fill_area(&recorded);
    assert!((area - 480.0).abs() < 1e-2);
}
