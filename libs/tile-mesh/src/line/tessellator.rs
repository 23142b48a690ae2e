//! # Ribbon Tessellator
//!
//! Walks a polyline once, carrying the previous vertex and segment normal,
//! the distance walked and the last two emitted indices of the strip.
//!
//! Open lines start and end with caps. Closed rings treat every vertex as
//! a join: the first vertex only opens the ribbon and the walk revisits it
//! at the end to close the ribbon with the same join.
//!
//! Corners sharper than the configured angle get an extra pair set back
//! along each adjacent segment that is long enough, so the miter cannot
//! fold over the neighbouring quads.

use super::join::{miter_length, resolve_join, JoinRole, ResolvedJoin};
use super::LineStyle;
use crate::error::Result;
use crate::feature::{Feature, TileContext};
use crate::geometry::{is_on_tile_edge, perpendicular, strip_closing_point, UP};
use crate::mesh_data::{MeshData, Vertex};
use config::constants::{MeshConfig, PARALLEL_MITER_LIMIT, TILE_EDGE_TOLERANCE};
use glam::{DVec2, DVec3};
use std::ops::Range;

/// Reusable buffers for [`LineTessellator`].
///
/// Owned by one worker and passed in by reference; nothing is shared.
#[derive(Debug, Default)]
pub struct LineScratch {
    points: Vec<DVec3>,
    pieces: Vec<Range<usize>>,
    ribbon: MeshData,
}

/// Tessellates polylines into ribbons.
///
/// Immutable once built, so one tessellator can serve every worker.
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use tile_mesh::line::{CapType, LineScratch, LineStyle, LineTessellator};
/// use tile_mesh::MeshData;
///
/// let style = LineStyle { width: 2.0, cap: CapType::Butt, ..Default::default() };
/// let tessellator = LineTessellator::new(style, &Default::default()).unwrap();
///
/// let mut md = MeshData::new();
/// let line = [DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0)];
/// tessellator.tessellate(&line, 1.0, &mut md, &mut LineScratch::default());
/// assert_eq!(md.vertex_count(), 4);
/// assert_eq!(md.triangle_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LineTessellator {
    style: LineStyle,
    sharp_corner_offset: f64,
    cos_half_sharp_corner: f64,
}

impl LineTessellator {
    /// Creates a tessellator after validating the style.
    pub fn new(style: LineStyle, config: &MeshConfig) -> Result<Self> {
        style.validate()?;
        Ok(Self {
            style,
            sharp_corner_offset: config.sharp_corner_offset,
            cos_half_sharp_corner: config.cos_half_sharp_corner(),
        })
    }

    /// Returns the style in use.
    pub fn style(&self) -> &LineStyle {
        &self.style
    }

    /// Appends the ribbon of an open polyline to `md`.
    ///
    /// Repeated consecutive points are dropped; fewer than two distinct
    /// points produce nothing.
    pub fn tessellate(&self, points: &[DVec3], scale: f64, md: &mut MeshData, scratch: &mut LineScratch) {
        dedup_into(points, &mut scratch.points);
        let points = std::mem::take(&mut scratch.points);
        if points.len() >= 2 {
            self.emit(&points, false, scale, md, &mut scratch.ribbon);
        }
        scratch.points = points;
    }

    /// Appends the closed ribbon around a ring to `md`.
    ///
    /// A closing point repeating the first is ignored. Rings with two
    /// distinct points are drawn as an open line.
    pub fn tessellate_ring(&self, ring: &[DVec3], scale: f64, md: &mut MeshData, scratch: &mut LineScratch) {
        dedup_into(strip_closing_point(ring), &mut scratch.points);
        let points = std::mem::take(&mut scratch.points);
        match points.len() {
            0 | 1 => {}
            2 => self.emit(&points, false, scale, md, &mut scratch.ribbon),
            _ => self.emit(&points, true, scale, md, &mut scratch.ribbon),
        }
        scratch.points = points;
    }

    /// Appends every ring of `feature`, dropping segments that run along a
    /// tile border.
    ///
    /// A ring cut at the border is drawn as open pieces. With `closed`,
    /// rings are polygon outlines and uncut rings are closed ribbons.
    pub fn tessellate_feature(
        &self,
        feature: &Feature,
        tile: &TileContext,
        closed: bool,
        md: &mut MeshData,
        scratch: &mut LineScratch,
    ) {
        let half_size = tile.local_size() / 2.0;
        let on_border = |a: DVec3, b: DVec3| is_on_tile_edge(a, b, half_size, TILE_EDGE_TOLERANCE);

        for ring in &feature.rings {
            let mut points = std::mem::take(&mut scratch.points);

            if closed {
                dedup_into(strip_closing_point(ring), &mut points);
                let n = points.len();
                let cut = (0..n).find(|&k| n >= 3 && on_border(points[k], points[(k + 1) % n]));
                match cut {
                    None if n >= 3 => {
                        self.emit(&points, true, tile.scale, md, &mut scratch.ribbon);
                        scratch.points = points;
                        continue;
                    }
                    None => {}
                    Some(k) => points.rotate_left(k + 1),
                }
            } else {
                dedup_into(ring, &mut points);
            }

            scratch.pieces.clear();
            let mut start = 0;
            for i in 0..points.len().saturating_sub(1) {
                if on_border(points[i], points[i + 1]) {
                    scratch.pieces.push(start..i + 1);
                    start = i + 1;
                }
            }
            scratch.pieces.push(start..points.len());

            let pieces = std::mem::take(&mut scratch.pieces);
            for piece in pieces.iter().filter(|r| r.len() >= 2) {
                self.emit(&points[piece.clone()], false, tile.scale, md, &mut scratch.ribbon);
            }
            scratch.pieces = pieces;
            scratch.points = points;
        }
    }

    /// Walks `points` into `ribbon` and appends the result to `md`.
    fn emit(&self, points: &[DVec3], closed: bool, scale: f64, md: &mut MeshData, ribbon: &mut MeshData) {
        ribbon.clear();
        let mut strip = Strip::new(ribbon, self.style.width * scale / 2.0, self.style.push_up);
        self.walk(points, closed, &mut strip);

        let count = ribbon.vertex_count() as u32;
        if !closed && count >= 2 {
            ribbon.add_edge(0, 1);
            ribbon.add_edge(count - 1, count - 2);
        }
        md.append(ribbon);

        tracing::trace!(
            points = points.len(),
            closed,
            vertices = count,
            triangles = ribbon.triangle_count(),
            "ribbon tessellated"
        );
    }

    fn walk(&self, points: &[DVec3], closed: bool, strip: &mut Strip<'_>) {
        let n = points.len();
        let steps = if closed { n + 1 } else { n };
        let offset = self.sharp_corner_offset;

        let mut prev_vertex = closed.then(|| points[n - 1]);
        let mut prev_normal = closed.then(|| perpendicular((points[0] - points[n - 1]).normalize_or_zero()));
        let mut current: Option<DVec3> = None;
        let mut next_normal: Option<DVec3> = None;

        for i in 0..steps {
            let mut cur = points[i % n];
            let next = if closed {
                Some(points[(i + 1) % n])
            } else {
                points.get(i + 1).copied()
            };
            if next_normal.is_some() {
                prev_normal = next_normal;
            }
            if current.is_some() {
                prev_vertex = current;
            }

            let next_n = next
                .map(|v| perpendicular((v - cur).normalize_or_zero()))
                .or(prev_normal)
                .unwrap_or(DVec3::ZERO);
            let prev_n = prev_normal.unwrap_or(next_n);
            next_normal = Some(next_n);

            let join_normal = (prev_n + next_n).normalize_or_zero();
            let cos_half_angle = join_normal.x * next_n.x + join_normal.z * next_n.z;
            let miter = miter_length(cos_half_angle);

            let middle = prev_vertex.is_some() && next.is_some();
            let closing = i > 0;
            let opening = i + 1 < steps;
            let sharp = middle && cos_half_angle < self.cos_half_sharp_corner;

            if let Some(prev) = prev_vertex.filter(|_| sharp && closing) {
                let length = cur.distance(prev);
                if length > 2.0 * offset {
                    let moved = cur - (cur - prev) * (offset / length);
                    strip.distance += moved.distance(prev);
                    strip.add_pair(moved, prev_n, 0.0, 0.0);
                    prev_vertex = Some(moved);
                }
            }

            let role = if middle {
                JoinRole::Middle
            } else if i == 0 {
                JoinRole::Start
            } else {
                JoinRole::End
            };
            let join = resolve_join(cos_half_angle, role, &self.style);

            if let Some(prev) = prev_vertex.filter(|_| closing) {
                strip.distance += cur.distance(prev);
            }

            let corner = Corner {
                position: cur,
                prev_normal: prev_n,
                next_normal: next_n,
                join_normal,
                cos_half_angle,
                miter,
                closing,
                opening,
            };
            emit_join(strip, join, role, &corner);

            if let Some(next) = next.filter(|_| sharp && opening) {
                let length = cur.distance(next);
                if length > 2.0 * offset {
                    let moved = cur + (next - cur) * (offset / length);
                    strip.distance += moved.distance(cur);
                    strip.add_pair(moved, next_n, 0.0, 0.0);
                    cur = moved;
                }
            }

            current = Some(cur);
        }
    }
}

/// Geometry of the ribbon at one vertex.
struct Corner {
    position: DVec3,
    prev_normal: DVec3,
    next_normal: DVec3,
    join_normal: DVec3,
    cos_half_angle: f64,
    miter: f64,
    /// The visit ends the incoming segment.
    closing: bool,
    /// The visit starts the outgoing segment.
    opening: bool,
}

/// Emits the pairs and fans of a resolved join into `strip`.
fn emit_join(strip: &mut Strip<'_>, join: ResolvedJoin, role: JoinRole, c: &Corner) {
    match join {
        ResolvedJoin::Miter => {
            strip.add_pair(c.position, c.join_normal * c.miter, 0.0, 0.0);
        }
        ResolvedJoin::FlipBevel => {
            let flipped = if c.miter > PARALLEL_MITER_LIMIT {
                -c.next_normal
            } else {
                let (prev_n, next_n) = (c.prev_normal, c.next_normal);
                let direction = if turns_left(prev_n, next_n) { -1.0 } else { 1.0 };
                let bevel = c.miter * (prev_n + next_n).length() / (prev_n - next_n).length();
                perpendicular(c.join_normal) * (bevel * direction)
            };
            if c.closing {
                strip.add_pair(c.position, flipped, 0.0, 0.0);
            }
            if c.opening {
                strip.add_pair(c.position, -flipped, 0.0, 0.0);
            }
        }
        ResolvedJoin::Bevel | ResolvedJoin::FakeRound => {
            let left = turns_left(c.prev_normal, c.next_normal);
            let inset = -(c.miter * c.miter - 1.0).max(0.0).sqrt();
            let (a, b) = if left { (inset, 0.0) } else { (0.0, inset) };

            if c.closing {
                strip.add_pair(c.position, c.prev_normal, a, b);
                if join == ResolvedJoin::FakeRound {
                    // More slices for sharper corners.
                    let slices = ((1.0 - c.cos_half_angle) * 8.0).floor().max(0.0) as i32;
                    let total = f64::from(slices + 1);
                    for m in 0..slices {
                        let fraction = f64::from(m + 1) / total;
                        let normal = (c.next_normal * fraction + c.prev_normal).normalize_or_zero();
                        strip.add_pie_slice(c.position, normal, left);
                    }
                    strip.add_pie_slice(c.position, c.join_normal, left);
                    for k in (-1..slices).rev() {
                        let fraction = f64::from(k + 1) / total;
                        let normal = (c.prev_normal * fraction + c.next_normal).normalize_or_zero();
                        strip.add_pie_slice(c.position, normal, left);
                    }
                    strip.break_strip();
                }
            }
            if c.opening {
                strip.add_pair(c.position, c.next_normal, -a, -b);
            }
        }
        ResolvedJoin::Butt => {
            if c.closing {
                strip.add_pair(c.position, c.prev_normal, 0.0, 0.0);
            }
            if c.opening {
                strip.add_pair(c.position, c.next_normal, 0.0, 0.0);
            }
        }
        ResolvedJoin::Square => {
            if c.closing {
                strip.add_pair(c.position, c.prev_normal, 1.0, 1.0);
                strip.break_strip();
            }
            if c.opening {
                strip.add_pair(c.position, c.next_normal, -1.0, -1.0);
            }
        }
        ResolvedJoin::Round => match role {
            JoinRole::Start => {
                strip.add_pair(c.position, c.prev_normal * 0.33, -2.0, -2.0);
                strip.add_pair(c.position, c.prev_normal * 0.66, -0.7, -0.7);
                strip.add_pair(c.position, c.prev_normal, 0.0, 0.0);
            }
            JoinRole::End => {
                strip.add_pair(c.position, c.prev_normal, 0.0, 0.0);
                strip.add_pair(c.position, c.prev_normal * 0.66, 0.7, 0.7);
                strip.add_pair(c.position, c.prev_normal * 0.33, 2.0, 2.0);
                strip.break_strip();
            }
            JoinRole::Middle => {
                if c.closing {
                    strip.add_pair(c.position, c.prev_normal, 0.0, 0.0);
                }
                if c.opening {
                    strip.add_pair(c.position, c.next_normal, 0.0, 0.0);
                }
            }
        },
    }
}

/// Whether the turn from `prev` to `next` normal goes left.
#[inline]
fn turns_left(prev: DVec3, next: DVec3) -> bool {
    prev.x * next.z - prev.z * next.x > 0.0
}

/// Copies `points` into `out` without consecutive repeats.
fn dedup_into(points: &[DVec3], out: &mut Vec<DVec3>) {
    out.clear();
    out.extend_from_slice(points);
    out.dedup();
}

// =============================================================================
// STRIP EMISSION
// =============================================================================

/// Triangle strip state for one ribbon.
struct Strip<'a> {
    md: &'a mut MeshData,
    half_width: f64,
    push_up: f64,
    distance: f64,
    /// Older of the last two strip vertices.
    i1: Option<u32>,
    /// Newer of the last two strip vertices.
    i2: Option<u32>,
}

impl<'a> Strip<'a> {
    fn new(md: &'a mut MeshData, half_width: f64, push_up: f64) -> Self {
        Self {
            md,
            half_width,
            push_up,
            distance: 0.0,
            i1: None,
            i2: None,
        }
    }

    fn push(&mut self, position: DVec3, extrude: DVec3, normal: DVec3, u: f64) -> u32 {
        let lifted = position + extrude * self.half_width + DVec3::new(0.0, self.push_up, 0.0);
        self.md.push_vertex(
            Vertex::new(lifted)
                .with_normal(UP)
                .with_tangent(-perpendicular(normal).normalize_or_zero())
                .with_uv(DVec2::new(u, self.distance)),
        )
    }

    /// Adds the left and right rail vertices of one cross-section.
    ///
    /// `end_left` and `end_right` slide the vertices along the segment, in
    /// half widths, forwards for positive values.
    fn add_pair(&mut self, position: DVec3, normal: DVec3, end_left: f64, end_right: f64) {
        let along = perpendicular(normal);

        let left = self.push(position, normal - along * end_left, normal, 1.0);
        if let (Some(i1), Some(i2)) = (self.i1, self.i2) {
            self.md.add_triangle(0, i1, left, i2);
            self.md.add_edge(left, i1);
        }
        self.i1 = self.i2;
        self.i2 = Some(left);

        let right = self.push(position, -normal - along * end_right, normal, 0.0);
        if let (Some(i1), Some(i2)) = (self.i1, self.i2) {
            self.md.add_triangle(0, i1, i2, right);
            self.md.add_edge(i1, right);
        }
        self.i1 = self.i2;
        self.i2 = Some(right);
    }

    /// Adds one fan vertex on the outside of a corner.
    fn add_pie_slice(&mut self, position: DVec3, normal: DVec3, turns_left: bool) {
        let extrude = if turns_left { -normal } else { normal };
        let slice = self.push(position, extrude, normal, 1.0);

        if let (Some(i1), Some(i2)) = (self.i1, self.i2) {
            self.md.add_triangle(0, i1, slice, i2);
            if turns_left {
                self.md.add_edge(i2, slice);
            } else {
                self.md.add_edge(slice, i1);
            }
        }

        if turns_left {
            self.i2 = Some(slice);
        } else {
            self.i1 = Some(slice);
        }
    }

    /// Disconnects the next pair from everything emitted so far.
    fn break_strip(&mut self) {
        self.i1 = None;
        self.i2 = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight(position: DVec3, closing: bool, opening: bool) -> Corner {
        Corner {
            position,
            prev_normal: DVec3::Z,
            next_normal: DVec3::Z,
            join_normal: DVec3::Z,
            cos_half_angle: 1.0,
            miter: 1.0,
            closing,
            opening,
        }
    }

    #[test]
    fn test_emit_join_in_isolation() {
        let mut md = MeshData::new();
        let mut strip = Strip::new(&mut md, 1.0, 0.0);

        emit_join(&mut strip, ResolvedJoin::Butt, JoinRole::Start, &straight(DVec3::ZERO, false, true));
        emit_join(
            &mut strip,
            ResolvedJoin::Miter,
            JoinRole::Middle,
            &straight(DVec3::new(5.0, 0.0, 0.0), true, true),
        );
        emit_join(
            &mut strip,
            ResolvedJoin::Square,
            JoinRole::End,
            &straight(DVec3::new(10.0, 0.0, 0.0), true, false),
        );
        assert!(strip.i1.is_none() && strip.i2.is_none());

        assert_eq!(md.vertex_count(), 6);
        assert_eq!(md.triangle_count(), 4);
        assert_eq!(md.vertices()[4], DVec3::new(11.0, 0.0, 1.0));
    }
}
