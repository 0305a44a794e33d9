//! Parametric shape generators
//!
//! Pure functions producing point sequences for curved primitives. Step
//! counts scale sub-linearly with size so large shapes stay smooth without
//! a fixed constant blowing up small ones.

use std::f32::consts::PI;

use skiff_core::Point;

/// Step count for an ellipse of the given extent:
/// `floor(max(sqrt(sqrt(w² + h²)), 1) · π)`.
pub fn ellipse_steps(width: f32, height: f32) -> usize {
    ((width * width + height * height).sqrt().sqrt().max(1.0) * PI).floor() as usize
}

/// Step count for a full ring of the given radius. Same heuristic as
/// [`ellipse_steps`] applied to the ring's bounding square diagonal.
pub fn ring_steps(radius: f32) -> usize {
    let d = radius * 2.0;
    (((d * d) * 2.0).sqrt().sqrt().max(1.0) * PI).floor() as usize
}

/// Closed ellipse ring starting on the +Y axis. `steps + 1` points; the
/// last point repeats the first so line strips close without holes.
pub fn ellipse_ring(center: Point, rx: f32, ry: f32, steps: usize, out: &mut Vec<Point>) {
    let steps = steps.max(3);
    let da = 2.0 * PI / steps as f32;
    for i in 0..=steps {
        let a = da * i as f32;
        out.push(Point::new(center.x + rx * a.sin(), center.y + ry * a.cos()));
    }
}

/// Annulus as a 2-contour polygon: inner ring traced with increasing
/// angle, outer ring with decreasing angle (opposed winding, so a winding
/// rule punches the hole). The outer ring continues from the inner ring's
/// accumulated angle rather than restarting at zero.
///
/// Returns the two contour lengths `[inner, outer]`; points are appended
/// inner-first.
pub fn disk_contours(
    center: Point,
    inner_radius: f32,
    outer_radius: f32,
    out: &mut Vec<Point>,
) -> [usize; 2] {
    let inner_steps = ring_steps(inner_radius).max(3);
    let outer_steps = ring_steps(outer_radius).max(3);

    let mut a = 0.0f32;
    for _ in 0..inner_steps {
        out.push(Point::new(
            center.x + inner_radius * a.sin(),
            center.y + inner_radius * a.cos(),
        ));
        a += 2.0 * PI / inner_steps as f32;
    }
    for _ in 0..outer_steps {
        out.push(Point::new(
            center.x + outer_radius * a.sin(),
            center.y + outer_radius * a.cos(),
        ));
        a -= 2.0 * PI / outer_steps as f32;
    }
    [inner_steps, outer_steps]
}

/// Outline of a sector bounded by two radii and two arcs.
///
/// `p1`/`p2` lie on the first bounding radius (inner then outer), `p3`/`p4`
/// on the second (outer then inner). Angles come from `atan2` against
/// `center`; the signed angular span is normalized to `[0, 2π)` and each
/// ring contributes points in proportion to its share of a full circle's
/// step budget. The original corner points are kept verbatim so the
/// outline closes without seams.
pub fn arc_sector_points(
    center: Point,
    p1: Point,
    p2: Point,
    p3: Point,
    p4: Point,
    high_quality: bool,
    out: &mut Vec<Point>,
) {
    let first_angle = (p1.y - center.y).atan2(p1.x - center.x);
    let second_angle = (p4.y - center.y).atan2(p4.x - center.x);

    let outer_radius = center.distance(p2);
    let inner_radius = center.distance(p1);

    let (inner_steps, outer_steps) = if high_quality {
        (
            ring_steps(inner_radius) as f32,
            ring_steps(outer_radius) as f32,
        )
    } else {
        (24.0, 24.0)
    };

    let dxc1 = center.x - p1.x;
    let dyc1 = center.y - p1.y;
    let dxc4 = center.x - p4.x;
    let dyc4 = center.y - p4.y;
    let mut span = (dxc1 * dyc4 - dyc1 * dxc4).atan2(dxc1 * dxc4 + dyc1 * dyc4);
    if span < 0.0 {
        span += 2.0 * PI;
    }

    let numpoints_outer = (outer_steps * (span / (2.0 * PI))).abs().ceil() as usize;
    let numpoints_inner = (inner_steps * (span / (2.0 * PI))).abs().ceil() as usize;

    out.push(p1);
    let mut a = first_angle;
    for _ in 0..numpoints_outer {
        out.push(Point::new(
            center.x + outer_radius * a.cos(),
            center.y + outer_radius * a.sin(),
        ));
        a += 2.0 * PI / outer_steps;
    }
    out.push(p3);
    out.push(p4);
    a = second_angle;
    for _ in 0..numpoints_inner {
        out.push(Point::new(
            center.x + inner_radius * a.cos(),
            center.y + inner_radius * a.sin(),
        ));
        a -= 2.0 * PI / inner_steps;
    }
    out.push(p1);
}

/// Quarter-circle corner arc by forward differencing.
///
/// Quadrants are numbered 0..3 starting at +X and proceeding
/// counter-clockwise in a +Y-down frame: 0 = right-to-top, 1 = top-to-left,
/// 2 = left-to-bottom, 3 = bottom-to-right. Emits `steps + 1` points with
/// floor-snapped coordinates.
pub fn corner_arc(center: Point, r: f32, quadrant: u8, steps: usize, out: &mut Vec<Point>) {
    let steps = steps.max(1);
    let step = 1.0 / steps as f32;
    let rs = 2.0 * r * step;
    let rss = rs * step;

    let (mut x, mut y, mut dx, mut dy, ddx, ddy) = match quadrant {
        0 => (r, 0.0, 0.0, -rs, -rss, rss),
        1 => (0.0, -r, -rs, 0.0, rss, rss),
        2 => (-r, 0.0, 0.0, rs, rss, -rss),
        3 => (0.0, r, rs, 0.0, -rss, -rss),
        _ => return,
    };

    for _ in 0..steps {
        out.push(Point::new(center.x + x.floor(), center.y + y.floor()));
        x += dx + ddx / 2.0;
        y += dy + ddy / 2.0;
        dx += ddx;
        dy += ddy;
    }
    out.push(Point::new(center.x + x.floor(), center.y + y.floor()));
}

/// Closed rounded-rectangle outline: four corner arcs with
/// `ceil(sqrt(r))` steps each, straight edges implied by point order.
/// Usable both as a triangle fan and as a line loop.
pub fn rounded_rect_points(
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    radius: f32,
    out: &mut Vec<Point>,
) {
    let r = radius + 1.0;
    let steps = r.sqrt().ceil() as usize;

    let x1 = x + r;
    let x2 = x + w - r;
    let y1 = y + r;
    let y2 = y + h - r;

    corner_arc(Point::new(x2, y1), r, 0, steps, out);
    corner_arc(Point::new(x1, y1), r, 1, steps, out);
    corner_arc(Point::new(x1, y2), r, 2, steps, out);
    corner_arc(Point::new(x2, y2), r, 3, steps, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ellipse_steps_scale_sublinearly() {
        let small = ellipse_steps(10.0, 10.0);
        let large = ellipse_steps(1000.0, 1000.0);
        assert!(small >= 10);
        assert!(large > small);
        assert!(large < 100 * small);
    }

    #[test]
    fn ellipse_ring_closes() {
        let mut pts = Vec::new();
        ellipse_ring(Point::new(0.0, 0.0), 10.0, 10.0, 16, &mut pts);
        assert_eq!(pts.len(), 17);
        let first = pts[0];
        let last = pts[pts.len() - 1];
        assert!(first.distance(last) < 1e-3);
    }

    #[test]
    fn disk_contours_are_opposed() {
        let mut pts = Vec::new();
        let [inner, outer] = disk_contours(Point::new(0.0, 0.0), 10.0, 20.0, &mut pts);
        assert_eq!(pts.len(), inner + outer);

        // Signed areas of the two rings must have opposite sign.
        let signed_area = |ring: &[Point]| {
            let mut s = 0.0f32;
            for i in 0..ring.len() {
                let a = ring[i];
                let b = ring[(i + 1) % ring.len()];
                s += a.x * b.y - b.x * a.y;
            }
            s / 2.0
        };
        let inner_area = signed_area(&pts[..inner]);
        let outer_area = signed_area(&pts[inner..]);
        assert!(inner_area * outer_area < 0.0);
    }

    #[test]
    fn sector_point_count_tracks_span() {
        // Quarter annulus: inner radius 10, outer 20, 0° to 90°.
        let c = Point::new(0.0, 0.0);
        let mut pts = Vec::new();
        arc_sector_points(
            c,
            Point::new(10.0, 0.0),
            Point::new(20.0, 0.0),
            Point::new(0.0, 20.0),
            Point::new(0.0, 10.0),
            true,
            &mut pts,
        );
        let inner_budget = ring_steps(10.0) as f32;
        let outer_budget = ring_steps(20.0) as f32;
        let expect =
            (outer_budget / 4.0).ceil() as usize + (inner_budget / 4.0).ceil() as usize + 4;
        assert_eq!(pts.len(), expect);
        assert_eq!(pts[0], Point::new(10.0, 0.0));
        assert_eq!(*pts.last().unwrap(), Point::new(10.0, 0.0));
    }

    #[test]
    fn corner_arc_spans_quadrant() {
        let mut pts = Vec::new();
        corner_arc(Point::new(0.0, 0.0), 16.0, 0, 4, &mut pts);
        assert_eq!(pts.len(), 5);
        // Starts at +X, ends at -Y (top in +Y-down frame).
        assert_eq!(pts[0], Point::new(16.0, 0.0));
        let end = *pts.last().unwrap();
        assert!(end.x.abs() <= 1.0);
        assert!((end.y + 16.0).abs() <= 1.0);
    }

    #[test]
    fn rounded_rect_outline_is_closed_loop() {
        let mut pts = Vec::new();
        rounded_rect_points(0.0, 0.0, 100.0, 50.0, 8.0, &mut pts);
        // 4 corners × (steps + 1) points.
        let steps = (9.0f32).sqrt().ceil() as usize;
        assert_eq!(pts.len(), 4 * (steps + 1));
        // All points within the rectangle bounds (floor snapping stays inside).
        for p in &pts {
            assert!(p.x >= -1.0 && p.x <= 101.0);
            assert!(p.y >= -1.0 && p.y <= 51.0);
        }
    }
}
