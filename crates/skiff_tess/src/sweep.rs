//! Polygon tessellator
//!
//! Triangulates one or more contours — possibly self-intersecting,
//! multiply wound, or inconsistently oriented — into the region selected
//! by a winding rule. The result is a plain triangle-list value; there are
//! no per-vertex callbacks and no module state, so a `Tessellator` can be
//! kept per drawing context and reused across calls.
//!
//! Pipeline:
//! 1. Edge collection with consecutive-duplicate removal; horizontal edges
//!    are dropped (they never change a horizontal sweep's winding).
//! 2. Pairwise crossing detection; each crossing splits both edges at a
//!    synthesized vertex whose attributes are the blend of the edge's own
//!    endpoints, weighted by the parametric position along that edge.
//! 3. A sweep over the event rows (all endpoint ys after splitting)
//!    accumulates signed winding across the ordered active edges per slab
//!    and collects the interior spans.
//! 4. Interior spans are stitched across slabs into y-monotone pieces
//!    while their bounding edges persist; any topology change closes the
//!    affected pieces with boundary cuts. Closed pieces are triangulated
//!    by the two-chain stack algorithm, so a convex N-gon comes out as
//!    exactly N − 2 triangles.
//!
//! Degenerate input (fewer than 3 effective points, zero area) yields an
//! empty mesh, never an error.

use skiff_core::Point;

/// Which winding counts select the interior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WindingRule {
    /// Interior where the signed winding is non-zero (default for fills).
    #[default]
    NonZero,
    /// Interior where the winding is odd (even-odd fill semantics).
    OddEven,
}

impl WindingRule {
    #[inline]
    fn is_interior(self, winding: i32) -> bool {
        match self {
            WindingRule::NonZero => winding != 0,
            WindingRule::OddEven => winding % 2 != 0,
        }
    }
}

/// An emitted vertex. Positions are synthesized — they do not index back
/// into the input, because crossings and rule evaluation can require
/// points not present in it.
#[derive(Clone, Copy, Debug)]
pub struct TessVertex {
    pub position: Point,
    /// Carried per-vertex payload (e.g. future color blending); blended at
    /// synthesized crossings.
    pub attr: [f32; 4],
}

/// Triangle-list output of a tessellation call.
#[derive(Clone, Debug, Default)]
pub struct TriangleMesh {
    /// Flat triangle list; `len() % 3 == 0`.
    pub vertices: Vec<TessVertex>,
}

impl TriangleMesh {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Sum of unsigned triangle areas.
    pub fn area(&self) -> f32 {
        self.vertices
            .chunks_exact(3)
            .map(|t| {
                let (a, b, c) = (t[0].position, t[1].position, t[2].position);
                ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)).abs() / 2.0
            })
            .sum()
    }

    /// Number of triangles whose closed interior contains `p`.
    pub fn coverage(&self, p: Point) -> usize {
        self.vertices
            .chunks_exact(3)
            .filter(|t| {
                let (a, b, c) = (t[0].position, t[1].position, t[2].position);
                let s0 = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
                let s1 = (c.x - b.x) * (p.y - b.y) - (c.y - b.y) * (p.x - b.x);
                let s2 = (a.x - c.x) * (p.y - c.y) - (a.y - c.y) * (p.x - c.x);
                (s0 >= 0.0 && s1 >= 0.0 && s2 >= 0.0) || (s0 <= 0.0 && s1 <= 0.0 && s2 <= 0.0)
            })
            .count()
    }
}

// Sweep math runs in f64; input and output stay f32.
const EVENT_EPS: f64 = 1e-7;
const POS_EPS: f64 = 1e-6;
const PARAM_EPS: f64 = 1e-9;

#[derive(Clone, Copy, Debug)]
struct V {
    x: f64,
    y: f64,
    attr: [f32; 4],
}

impl V {
    fn same_pos(&self, other: &V) -> bool {
        (self.x - other.x).abs() <= POS_EPS && (self.y - other.y).abs() <= POS_EPS
    }

    fn to_vertex(self) -> TessVertex {
        TessVertex {
            position: Point::new(self.x as f32, self.y as f32),
            attr: self.attr,
        }
    }
}

fn lerp_attr(a: [f32; 4], b: [f32; 4], t: f64) -> [f32; 4] {
    let t = t as f32;
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ]
}

#[derive(Clone, Copy, Debug)]
struct Edge {
    top: V,
    bottom: V,
    /// +1 where the contour ran downward, −1 upward.
    winding: i32,
}

impl Edge {
    fn x_at(&self, y: f64) -> f64 {
        let dy = self.bottom.y - self.top.y;
        if dy.abs() < f64::EPSILON {
            return self.top.x;
        }
        self.top.x + (self.bottom.x - self.top.x) * (y - self.top.y) / dy
    }

    /// Interpolated point on the edge at row `y` (clamped), attributes
    /// blended by the parametric position.
    fn point_at(&self, y: f64) -> V {
        let dy = self.bottom.y - self.top.y;
        let t = if dy.abs() < f64::EPSILON {
            0.0
        } else {
            ((y - self.top.y) / dy).clamp(0.0, 1.0)
        };
        V {
            x: self.top.x + (self.bottom.x - self.top.x) * t,
            y: self.top.y + dy * t,
            attr: lerp_attr(self.top.attr, self.bottom.attr, t),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Span {
    left: usize,
    right: usize,
}

/// An open y-monotone piece: both chains run top to bottom.
#[derive(Clone, Debug)]
struct Region {
    left_edge: usize,
    right_edge: usize,
    left_chain: Vec<V>,
    right_chain: Vec<V>,
}

/// Reusable tessellation context. Holds no results between calls; only
/// working storage survives for reuse.
#[derive(Debug, Default)]
pub struct Tessellator {
    edges: Vec<Edge>,
    events: Vec<f64>,
}

impl Tessellator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tessellate contours under `rule` with zeroed vertex attributes.
    pub fn tessellate(&mut self, contours: &[&[Point]], rule: WindingRule) -> TriangleMesh {
        self.collect_edges(contours, &[]);
        self.run(rule)
    }

    /// Tessellate with per-point attribute payloads. `attrs[i]` parallels
    /// `contours[i]`; shorter attribute slices are zero-padded.
    pub fn tessellate_attributed(
        &mut self,
        contours: &[&[Point]],
        attrs: &[&[[f32; 4]]],
        rule: WindingRule,
    ) -> TriangleMesh {
        self.collect_edges(contours, attrs);
        self.run(rule)
    }

    fn collect_edges(&mut self, contours: &[&[Point]], attrs: &[&[[f32; 4]]]) {
        self.edges.clear();

        for (ci, contour) in contours.iter().enumerate() {
            let contour_attrs = attrs.get(ci).copied().unwrap_or(&[]);

            // Dedup consecutive duplicates, including the wrap-around pair.
            let mut pts: Vec<V> = Vec::with_capacity(contour.len());
            for (pi, p) in contour.iter().enumerate() {
                let v = V {
                    x: p.x as f64,
                    y: p.y as f64,
                    attr: contour_attrs.get(pi).copied().unwrap_or([0.0; 4]),
                };
                if pts.last().map_or(true, |last: &V| !last.same_pos(&v)) {
                    pts.push(v);
                }
            }
            while pts.len() > 1 && pts[0].same_pos(pts.last().expect("len > 1")) {
                pts.pop();
            }
            if pts.len() < 3 {
                tracing::debug!(
                    points = contour.len(),
                    "contour has fewer than 3 effective points; dropped"
                );
                continue;
            }

            for i in 0..pts.len() {
                let a = pts[i];
                let b = pts[(i + 1) % pts.len()];
                if (a.y - b.y).abs() <= f64::EPSILON {
                    continue; // horizontal: never crossed by the sweep
                }
                if a.y < b.y {
                    self.edges.push(Edge {
                        top: a,
                        bottom: b,
                        winding: 1,
                    });
                } else {
                    self.edges.push(Edge {
                        top: b,
                        bottom: a,
                        winding: -1,
                    });
                }
            }
        }

        self.split_crossings();

        self.events.clear();
        for e in &self.edges {
            self.events.push(e.top.y);
            self.events.push(e.bottom.y);
        }
        self.events.sort_by(|a, b| a.partial_cmp(b).expect("finite ys"));
        self.events.dedup_by(|a, b| (*a - *b).abs() <= EVENT_EPS);
    }

    /// Split every pair of crossing edges at the intersection point. The
    /// synthesized vertex carries, per edge, the attribute blend of that
    /// edge's endpoints weighted by the crossing's parametric position —
    /// the "combine" contract.
    fn split_crossings(&mut self) {
        let n = self.edges.len();
        let mut cuts: Vec<Vec<(f64, V)>> = vec![Vec::new(); n];

        for i in 0..n {
            for j in (i + 1)..n {
                let (ei, ej) = (self.edges[i], self.edges[j]);
                let rx = ei.bottom.x - ei.top.x;
                let ry = ei.bottom.y - ei.top.y;
                let sx = ej.bottom.x - ej.top.x;
                let sy = ej.bottom.y - ej.top.y;
                let denom = rx * sy - ry * sx;
                if denom.abs() < 1e-12 {
                    continue; // parallel or collinear
                }
                let qpx = ej.top.x - ei.top.x;
                let qpy = ej.top.y - ei.top.y;
                let t = (qpx * sy - qpy * sx) / denom;
                let u = (qpx * ry - qpy * rx) / denom;

                let t_interior = t > PARAM_EPS && t < 1.0 - PARAM_EPS;
                let u_interior = u > PARAM_EPS && u < 1.0 - PARAM_EPS;
                let t_on = (-PARAM_EPS..=1.0 + PARAM_EPS).contains(&t);
                let u_on = (-PARAM_EPS..=1.0 + PARAM_EPS).contains(&u);
                if !(t_on && u_on) || !(t_interior || u_interior) {
                    continue;
                }

                let px = ei.top.x + rx * t;
                let py = ei.top.y + ry * t;
                if t_interior {
                    cuts[i].push((
                        t,
                        V {
                            x: px,
                            y: py,
                            attr: lerp_attr(ei.top.attr, ei.bottom.attr, t),
                        },
                    ));
                }
                if u_interior {
                    cuts[j].push((
                        u,
                        V {
                            x: px,
                            y: py,
                            attr: lerp_attr(ej.top.attr, ej.bottom.attr, u),
                        },
                    ));
                }
            }
        }

        if cuts.iter().all(|c| c.is_empty()) {
            return;
        }

        let mut split: Vec<Edge> = Vec::with_capacity(n + 8);
        for (i, edge) in self.edges.iter().enumerate() {
            if cuts[i].is_empty() {
                split.push(*edge);
                continue;
            }
            cuts[i].sort_by(|a, b| a.0.partial_cmp(&b.0).expect("finite params"));
            cuts[i].dedup_by(|a, b| (a.0 - b.0).abs() <= PARAM_EPS);

            let mut top = edge.top;
            for &(_, v) in &cuts[i] {
                if !top.same_pos(&v) {
                    split.push(Edge {
                        top,
                        bottom: v,
                        winding: edge.winding,
                    });
                    top = v;
                }
            }
            if !top.same_pos(&edge.bottom) {
                split.push(Edge {
                    top,
                    bottom: edge.bottom,
                    winding: edge.winding,
                });
            }
        }
        self.edges = split;
    }

    fn run(&mut self, rule: WindingRule) -> TriangleMesh {
        let mut mesh = TriangleMesh::default();
        if self.edges.is_empty() || self.events.len() < 2 {
            return mesh;
        }

        let mut regions: Vec<Region> = Vec::new();
        let mut active: Vec<(usize, f64)> = Vec::new();
        let mut spans: Vec<Span> = Vec::new();

        for w in self.events.windows(2) {
            let (ya, yb) = (w[0], w[1]);
            if yb - ya <= EVENT_EPS {
                continue;
            }
            let ymid = 0.5 * (ya + yb);

            active.clear();
            for (idx, e) in self.edges.iter().enumerate() {
                if e.top.y <= ya + EVENT_EPS && e.bottom.y >= yb - EVENT_EPS {
                    active.push((idx, e.x_at(ymid)));
                }
            }
            active.sort_by(|a, b| a.1.partial_cmp(&b.1).expect("finite xs"));

            spans.clear();
            let mut winding = 0;
            for k in 0..active.len().saturating_sub(1) {
                winding += self.edges[active[k].0].winding;
                if rule.is_interior(winding) {
                    let (left, right) = (active[k].0, active[k + 1].0);
                    // Zero-width spans come from degenerate contours;
                    // nothing to fill.
                    let zero = (self.edges[left].x_at(ya) - self.edges[right].x_at(ya)).abs()
                        <= POS_EPS
                        && (self.edges[left].x_at(yb) - self.edges[right].x_at(yb)).abs()
                            <= POS_EPS;
                    if !zero {
                        spans.push(Span { left, right });
                    }
                }
            }

            self.advance_regions(&mut regions, &spans, ya, &mut mesh);
        }

        // Close whatever is still open at the bottom of the sweep.
        let bottom = *self.events.last().expect("events nonempty");
        for region in regions.drain(..) {
            Self::close_region(&self.edges, region, bottom, &mut mesh);
        }
        mesh
    }

    /// Match this slab's interior spans against the open regions:
    /// unchanged or vertex-connected boundaries continue, anything else
    /// closes at `ya` and reopens.
    fn advance_regions(
        &self,
        regions: &mut Vec<Region>,
        spans: &[Span],
        ya: f64,
        mesh: &mut TriangleMesh,
    ) {
        let edges = &self.edges;
        let connects = |old: usize, new: usize| -> bool {
            let ob = edges[old].bottom;
            (ob.y - ya).abs() <= EVENT_EPS && ob.same_pos(&edges[new].top)
        };

        let mut next: Vec<Region> = Vec::with_capacity(spans.len());
        let mut claimed: Vec<bool> = vec![false; regions.len()];

        for span in spans {
            let found = regions.iter().enumerate().position(|(ri, r)| {
                !claimed[ri]
                    && (r.left_edge == span.left || connects(r.left_edge, span.left))
                    && (r.right_edge == span.right || connects(r.right_edge, span.right))
            });

            if let Some(ri) = found {
                claimed[ri] = true;
                let mut region = regions[ri].clone();
                if region.left_edge != span.left {
                    region.left_chain.push(edges[span.left].top);
                    region.left_edge = span.left;
                }
                if region.right_edge != span.right {
                    region.right_chain.push(edges[span.right].top);
                    region.right_edge = span.right;
                }
                next.push(region);
            } else {
                next.push(Region {
                    left_edge: span.left,
                    right_edge: span.right,
                    left_chain: vec![edges[span.left].point_at(ya)],
                    right_chain: vec![edges[span.right].point_at(ya)],
                });
            }
        }

        for (ri, region) in regions.drain(..).enumerate() {
            if !claimed[ri] {
                Self::close_region(edges, region, ya, mesh);
            }
        }
        *regions = next;
    }

    fn close_region(edges: &[Edge], mut region: Region, y: f64, mesh: &mut TriangleMesh) {
        let lv = edges[region.left_edge].point_at(y);
        if region.left_chain.last().map_or(true, |l| !l.same_pos(&lv)) {
            region.left_chain.push(lv);
        }
        let rv = edges[region.right_edge].point_at(y);
        if region.right_chain.last().map_or(true, |r| !r.same_pos(&rv)) {
            region.right_chain.push(rv);
        }
        triangulate_monotone(&region.left_chain, &region.right_chain, mesh);
    }
}

/// Triangulate a y-monotone piece given as its two boundary chains (both
/// top → bottom) with the standard two-chain stack algorithm.
fn triangulate_monotone(left: &[V], right: &[V], mesh: &mut TriangleMesh) {
    // Merge by row; shared apex/bottom vertices appear on both chains and
    // collapse in the dedup.
    let mut verts: Vec<(V, bool)> = Vec::with_capacity(left.len() + right.len());
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        if left[i].y <= right[j].y {
            verts.push((left[i], true));
            i += 1;
        } else {
            verts.push((right[j], false));
            j += 1;
        }
    }
    verts.extend(left[i..].iter().map(|v| (*v, true)));
    verts.extend(right[j..].iter().map(|v| (*v, false)));
    verts.dedup_by(|a, b| a.0.same_pos(&b.0));
    if verts.len() < 3 {
        return;
    }

    let mut push = |a: V, b: V, c: V| {
        mesh.vertices.push(a.to_vertex());
        mesh.vertices.push(b.to_vertex());
        mesh.vertices.push(c.to_vertex());
    };

    let mut stack: Vec<(V, bool)> = vec![verts[0], verts[1]];
    for k in 2..verts.len() {
        let (v, side) = verts[k];
        let last = k == verts.len() - 1;
        let top_side = stack.last().expect("stack seeded").1;

        if last || side != top_side {
            // Fan across the whole stack; the bottom vertex sees every
            // stacked vertex in a monotone piece.
            while stack.len() >= 2 {
                let a = stack[stack.len() - 1].0;
                let b = stack[stack.len() - 2].0;
                push(v, a, b);
                stack.pop();
            }
            stack.clear();
            stack.push(verts[k - 1]);
            stack.push((v, side));
        } else {
            // Same chain: cut ears while the turn stays convex toward the
            // interior.
            while stack.len() >= 2 {
                let a = stack[stack.len() - 1].0;
                let b = stack[stack.len() - 2].0;
                let ux = a.x - b.x;
                let uy = a.y - b.y;
                let wx = v.x - a.x;
                let wy = v.y - a.y;
                let cross = ux * wy - uy * wx;
                let convex = if side { cross < -1e-12 } else { cross > 1e-12 };
                if !convex {
                    break;
                }
                push(v, a, b);
                stack.pop();
            }
            stack.push((v, side));
        }
    }
}
