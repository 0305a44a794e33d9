//! Stroke extrusion engine
//!
//! Converts pen semantics (width, dash pattern, cap) into triangle
//! geometry for backends with no native thick or dashed stroking. Output
//! is always a flat triangle list appended to the caller's buffer.
//!
//! Joint policy: adjoining segments share extrusion vertices computed
//! along the bisector of the two segment directions, with the half-width
//! scaled by `1 / max(cos(θ/2), 0.4)`. The 0.4 clamp bounds miter spikes
//! at sharp joints; downstream output depends on this exact behavior, so
//! it is not a conventional miter-limit-with-bevel-fallback.

use std::f32::consts::PI;

use smallvec::SmallVec;

use skiff_core::{LineCap, Point};

/// Tuning knobs for the extrusion engine.
#[derive(Clone, Copy, Debug)]
pub struct StrokeConfig {
    /// Angular resolution of round end caps (half-disk fan steps).
    pub cap_steps: usize,
    /// Lower bound on `cos(θ/2)` at joints; bounds miter spike length.
    pub miter_clamp: f32,
    /// Minimum dash draw/space length in device units on the native-line
    /// dash path.
    pub min_dash_length: f32,
    /// Cap on the total dash run length, preventing runaway loops on
    /// degenerate geometry.
    pub dash_run_cap: f32,
}

impl Default for StrokeConfig {
    fn default() -> Self {
        Self {
            cap_steps: 16,
            miter_clamp: 0.4,
            min_dash_length: 4.0,
            dash_run_cap: 2000.0,
        }
    }
}

/// Half-disk fan around an endpoint, facing away from `angle`.
fn end_cap(p: Point, width: f32, angle: f32, steps: usize, out: &mut Vec<Point>) {
    let mut prev: Option<Point> = None;
    for i in 0..=steps {
        let a = angle + PI / 2.0 + PI / steps as f32 * i as f32;
        let q = Point::new(p.x + width / 2.0 * a.cos(), p.y + width / 2.0 * a.sin());
        if let Some(prev) = prev {
            out.push(p);
            out.push(prev);
            out.push(q);
        }
        prev = Some(q);
    }
}

/// Two triangles forming the rectangle of one extruded sub-segment.
fn push_rect(a: Point, b: Point, sx: f32, cy: f32, out: &mut Vec<Point>) {
    out.push(Point::new(a.x + sx, a.y - cy));
    out.push(Point::new(b.x + sx, b.y - cy));
    out.push(Point::new(b.x - sx, b.y + cy));

    out.push(Point::new(b.x - sx, b.y + cy));
    out.push(Point::new(a.x - sx, a.y + cy));
    out.push(Point::new(a.x + sx, a.y - cy));
}

/// Extrude a single segment of the given width into triangles.
///
/// `dashes` is the already-scaled (draw, space) pattern in device units;
/// `None` produces a solid rectangle. Round caps are fanned onto solid
/// strokes only — dashed strokes keep butt ends. The final dash
/// sub-segment is clamped to the true endpoint.
pub fn extrude_segment(
    a: Point,
    b: Point,
    width: f32,
    dashes: Option<[f32; 2]>,
    cap: LineCap,
    cfg: &StrokeConfig,
    out: &mut Vec<Point>,
) {
    let angle = (b.y - a.y).atan2(b.x - a.x);
    let sx = width / 2.0 * angle.sin();
    let cy = width / 2.0 * angle.cos();

    match dashes {
        Some([ldraw, lspace]) if ldraw > 0.0 && lspace > 0.0 => {
            let lpix = a.distance(b);
            let mut lrun = 0.0f32;
            let mut pa = a;
            while lrun < lpix {
                let mut pb = Point::new(pa.x + ldraw * angle.cos(), pa.y + ldraw * angle.sin());
                if lrun + ldraw >= lpix {
                    pb = b;
                }
                push_rect(pa, pb, sx, cy, out);

                lrun += ldraw;
                pa = Point::new(pb.x + lspace * angle.cos(), pb.y + lspace * angle.sin());
                lrun += lspace;
            }
        }
        _ => {
            push_rect(a, b, sx, cy, out);
            if cap == LineCap::Round {
                end_cap(a, width, angle, cfg.cap_steps, out);
                end_cap(b, width, angle + PI, cfg.cap_steps, out);
            }
        }
    }
}

/// Extrude a solid polyline into triangles with gap-free joints.
///
/// Zero-length segments are culled first. Each interior vertex is extruded
/// along the bisector of its two segment directions with the clamped-miter
/// half-width; the trailing wedge triangle flips orientation by the dot
/// product of consecutive offset vectors so joints neither gap nor fold.
pub fn extrude_polyline(
    points: &[Point],
    width: f32,
    cap: LineCap,
    cfg: &StrokeConfig,
    out: &mut Vec<Point>,
) {
    if points.len() < 2 {
        return;
    }

    // Cull zero segments.
    let mut pts: SmallVec<[Point; 16]> = SmallVec::with_capacity(points.len());
    pts.push(points[0]);
    for p in &points[1..] {
        let last = *pts.last().expect("seeded with first point");
        if p.x != last.x || p.y != last.y {
            pts.push(*p);
        }
    }
    if pts.len() < 2 {
        return;
    }

    let (mut x0, mut y0) = (pts[0].x, pts[0].y);
    let (mut x1, mut y1) = (pts[1].x, pts[1].y);
    let mut a0 = (y1 - y0).atan2(x1 - x0);
    let first_angle = a0;

    let mut t2sina0 = width / 2.0 * a0.sin();
    let mut t2cosa0 = width / 2.0 * a0.cos();

    for i in 1..pts.len() {
        let (x2, y2, a1);
        if i < pts.len() - 1 {
            x2 = pts[i + 1].x;
            y2 = pts[i + 1].y;
            a1 = (y2 - y1).atan2(x2 - x1);
        } else {
            x2 = x1;
            y2 = y1;
            a1 = a0;
        }

        let aa = (a0 + a1) / 2.0;
        let mut diff = (a0 - a1).abs();
        if diff > PI {
            diff -= 2.0 * PI;
        }
        let rad = width / 2.0 / (diff / 2.0).cos().max(cfg.miter_clamp);

        let t2sina1 = rad * aa.sin();
        let t2cosa1 = rad * aa.cos();

        out.push(Point::new(x1 + t2sina1, y1 - t2cosa1));
        out.push(Point::new(x1 - t2sina1, y1 + t2cosa1));
        out.push(Point::new(x0 + t2sina0, y0 - t2cosa0));

        out.push(Point::new(x0 - t2sina0, y0 + t2cosa0));
        out.push(Point::new(x0 + t2sina0, y0 - t2cosa0));

        let dot = t2sina0 * t2sina1 + t2cosa0 * t2cosa1;
        if dot > 0.0 {
            out.push(Point::new(x1 - t2sina1, y1 + t2cosa1));
        } else {
            out.push(Point::new(x1 + t2sina1, y1 - t2cosa1));
        }

        x0 = x1;
        y0 = y1;
        x1 = x2;
        y1 = y2;
        a0 = a1;
        t2sina0 = t2sina1;
        t2cosa0 = t2cosa1;
    }

    if cap == LineCap::Round {
        end_cap(pts[0], width, first_angle + PI, cfg.cap_steps, out);
        end_cap(*pts.last().expect("len >= 2"), width, a0, cfg.cap_steps, out);
    }
}

/// Dash walk for strokes thin enough to stay native lines.
///
/// Emits (start, end) pairs for a line-list submission. Draw and space
/// lengths are clamped up to `cfg.min_dash_length` and the walked run is
/// capped at `cfg.dash_run_cap` so degenerate geometry cannot loop
/// unbounded. The final dash is clamped to the true endpoint.
pub fn dash_segments(
    a: Point,
    b: Point,
    dashes: [f32; 2],
    cfg: &StrokeConfig,
    out: &mut Vec<(Point, Point)>,
) {
    let angle = (b.y - a.y).atan2(b.x - a.x);
    let cosa = angle.cos();
    let sina = angle.sin();

    let ldraw = dashes[0].max(cfg.min_dash_length);
    let lspace = dashes[1].max(cfg.min_dash_length);
    let lpix = a.distance(b).min(cfg.dash_run_cap);

    let mut lrun = 0.0f32;
    let mut pa = a;
    while lrun < lpix {
        let mut pb = Point::new(pa.x + ldraw * cosa, pa.y + ldraw * sina);
        if lrun + ldraw >= lpix {
            pb = b;
        }
        out.push((pa, pb));

        pa = Point::new(pa.x + (lspace + ldraw) * cosa, pa.y + (lspace + ldraw) * sina);
        lrun += lspace + ldraw;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_area(a: Point, b: Point, c: Point) -> f32 {
        ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)).abs() / 2.0
    }

    fn total_area(tris: &[Point]) -> f32 {
        tris.chunks_exact(3)
            .map(|t| triangle_area(t[0], t[1], t[2]))
            .sum()
    }

    #[test]
    fn segment_rectangle_area() {
        let mut out = Vec::new();
        extrude_segment(
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            4.0,
            None,
            LineCap::Butt,
            &StrokeConfig::default(),
            &mut out,
        );
        assert_eq!(out.len(), 6);
        assert!((total_area(&out) - 200.0).abs() < 1e-3);
    }

    #[test]
    fn round_caps_add_half_disks() {
        let cfg = StrokeConfig::default();
        let mut out = Vec::new();
        extrude_segment(
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            4.0,
            None,
            LineCap::Round,
            &cfg,
            &mut out,
        );
        // Rectangle + two fans of cap_steps triangles each.
        assert_eq!(out.len(), 6 + 2 * 3 * cfg.cap_steps);
        let disk = std::f32::consts::PI * 2.0 * 2.0; // full disk of radius w/2
        let expect = 200.0 + disk;
        // The fan underestimates the disk slightly.
        assert!((total_area(&out) - expect).abs() < 1.0);
    }

    #[test]
    fn dash_counts_match_pattern() {
        // Width 4, pattern (2, 1) → draw 8, space 4 over a 100-unit run.
        let mut out = Vec::new();
        extrude_segment(
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            4.0,
            Some([8.0, 4.0]),
            LineCap::Butt,
            &StrokeConfig::default(),
            &mut out,
        );
        let rects = out.len() / 6;
        assert_eq!(rects, 9); // floor(100 / 12) = 8 full + 1 partial tail

        // Tail rectangle runs from x = 96 to x = 100: length 4.
        let tail = &out[8 * 6..];
        let min_x = tail.iter().map(|p| p.x).fold(f32::INFINITY, f32::min);
        let max_x = tail.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max);
        assert!((min_x - 96.0).abs() < 1e-3);
        assert!((max_x - 100.0).abs() < 1e-3);

        // 8 full dashes of 8×4 plus a 4×4 tail.
        assert!((total_area(&out) - (8.0 * 32.0 + 16.0)).abs() < 1e-2);
    }

    #[test]
    fn degenerate_dash_is_solid() {
        let mut out = Vec::new();
        extrude_segment(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            2.0,
            Some([0.0, 3.0]),
            LineCap::Butt,
            &StrokeConfig::default(),
            &mut out,
        );
        assert_eq!(out.len(), 6);
    }

    #[test]
    fn polyline_straight_matches_segment() {
        // A straight two-segment polyline extrudes to the same area as one
        // rectangle; the collinear joint must not add or remove coverage.
        let mut out = Vec::new();
        extrude_polyline(
            &[
                Point::new(0.0, 0.0),
                Point::new(40.0, 0.0),
                Point::new(100.0, 0.0),
            ],
            6.0,
            LineCap::Butt,
            &StrokeConfig::default(),
            &mut out,
        );
        assert!((total_area(&out) - 600.0).abs() < 1e-2);
    }

    #[test]
    fn polyline_culls_zero_segments() {
        let mut out = Vec::new();
        extrude_polyline(
            &[
                Point::new(0.0, 0.0),
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
            ],
            2.0,
            LineCap::Butt,
            &StrokeConfig::default(),
            &mut out,
        );
        assert!((total_area(&out) - 20.0).abs() < 1e-3);
    }

    #[test]
    fn right_angle_joint_is_clamped() {
        // 90° joint: cos(45°) ≈ 0.707 > 0.4, so the joint half-width is
        // w/2 / cos(45°), not a spike.
        let mut out = Vec::new();
        extrude_polyline(
            &[
                Point::new(0.0, 0.0),
                Point::new(50.0, 0.0),
                Point::new(50.0, 50.0),
            ],
            4.0,
            LineCap::Butt,
            &StrokeConfig::default(),
            &mut out,
        );
        // No vertex near the corner may exceed the bisector half-width
        // w/2 / cos(45°).
        let corner = Point::new(50.0, 0.0);
        let expect = 2.0 / (std::f32::consts::FRAC_PI_4).cos();
        assert!(out
            .iter()
            .filter(|p| p.distance(corner) < 10.0)
            .all(|p| p.distance(corner) <= expect + 1e-3));
    }

    #[test]
    fn sharp_joint_spike_is_bounded() {
        // Near-reversal joint: cos(θ/2) ≈ 0, clamp 0.4 bounds the radius
        // to w/2 / 0.4.
        let mut out = Vec::new();
        extrude_polyline(
            &[
                Point::new(0.0, 0.0),
                Point::new(50.0, 0.0),
                Point::new(0.0, 1.0),
            ],
            4.0,
            LineCap::Butt,
            &StrokeConfig::default(),
            &mut out,
        );
        let corner = Point::new(50.0, 0.0);
        let max_rad = out
            .iter()
            .filter(|p| p.distance(corner) < 10.0)
            .map(|p| p.distance(corner))
            .fold(0.0f32, f32::max);
        assert!(max_rad <= 2.0 / 0.4 + 1e-2);
    }

    #[test]
    fn native_dash_walk_clamps_and_caps() {
        let cfg = StrokeConfig::default();
        let mut out = Vec::new();
        // Lengths below the minimum are raised to it.
        dash_segments(
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            [1.0, 1.0],
            &cfg,
            &mut out,
        );
        // Raised to (4, 4): dashes start every 8 units → 13 segments.
        assert_eq!(out.len(), 13);
        // Tail clamped to the endpoint.
        assert_eq!(out.last().unwrap().1, Point::new(100.0, 0.0));

        // The run cap bounds pathological lengths.
        out.clear();
        dash_segments(
            Point::new(0.0, 0.0),
            Point::new(1.0e7, 0.0),
            [8.0, 4.0],
            &cfg,
            &mut out,
        );
        assert!(out.len() <= (cfg.dash_run_cap / 12.0).ceil() as usize + 1);
    }
}
