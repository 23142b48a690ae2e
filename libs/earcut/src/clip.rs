//! # Ear Clipping
//!
//! The main clipping walk plus the fallback strategies it escalates through
//! when a full lap finds no ear. Strategies are tried in order over the same
//! arena state; a split hands both halves back to the work queue instead of
//! recursing.

use crate::arena::{NodeArena, NodeId};
use crate::zorder::ZFrame;

/// What to try after a lap around the ring found no clean ear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fallback {
    /// Drop duplicate and collinear points, then clip again.
    FilterPoints,
    /// Remove locally self-intersecting edge pairs, then clip again.
    CureIntersections,
    /// Split the ring along a valid diagonal and clip both halves.
    SplitRing,
}

impl Fallback {
    /// Escalation order.
    pub const ORDER: [Fallback; 3] = [
        Fallback::FilterPoints,
        Fallback::CureIntersections,
        Fallback::SplitRing,
    ];
}

/// Result of one clipping walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Clip {
    /// Two or fewer nodes remain.
    Done,
    /// A full lap found no ear; clipping stopped at this node.
    Stuck(NodeId),
}

/// Emits the vertex indices of triangle `(a, b, c)`.
#[inline]
fn emit(arena: &NodeArena, out: &mut Vec<usize>, dim: usize, a: NodeId, b: NodeId, c: NodeId) {
    out.push(arena.get(a).i / dim);
    out.push(arena.get(b).i / dim);
    out.push(arena.get(c).i / dim);
}

impl NodeArena {
    /// Clips ears starting at `ear` until the ring is exhausted or a full
    /// lap finds nothing to clip.
    pub(crate) fn clip_ears(
        &mut self,
        mut ear: NodeId,
        frame: Option<&ZFrame>,
        dim: usize,
        out: &mut Vec<usize>,
    ) -> Clip {
        let mut stop = ear;

        while self.prev(ear) != self.next(ear) {
            let prev = self.prev(ear);
            let next = self.next(ear);

            let clean = match frame {
                Some(frame) => self.is_ear_hashed(ear, frame),
                None => self.is_ear(ear),
            };

            if clean {
                emit(self, out, dim, prev, ear, next);
                self.remove(ear);

                // Skipping the next vertex leads to fewer sliver triangles.
                ear = self.next(next);
                stop = ear;
                continue;
            }

            ear = next;
            if ear == stop {
                return Clip::Stuck(ear);
            }
        }

        Clip::Done
    }

    /// Whether `ear` forms a convex corner with no other vertex inside.
    fn is_ear(&self, ear: NodeId) -> bool {
        let a = self.prev(ear);
        let c = self.next(ear);

        if self.area(a, ear, c) >= 0.0 {
            return false;
        }

        let mut p = self.next(c);
        while p != a {
            if self.contains(a, ear, c, p) && self.area(self.prev(p), p, self.next(p)) >= 0.0 {
                return false;
            }
            p = self.next(p);
        }
        true
    }

    /// [`Self::is_ear`] restricted to vertices whose Z value lies inside the
    /// candidate triangle's bounding box.
    fn is_ear_hashed(&self, ear: NodeId, frame: &ZFrame) -> bool {
        let a = self.prev(ear);
        let c = self.next(ear);

        if self.area(a, ear, c) >= 0.0 {
            return false;
        }

        let (na, nb, nc) = (self.get(a), self.get(ear), self.get(c));
        let min_x = na.x.min(nb.x).min(nc.x);
        let min_y = na.y.min(nb.y).min(nc.y);
        let max_x = na.x.max(nb.x).max(nc.x);
        let max_y = na.y.max(nb.y).max(nc.y);

        let min_z = frame.z_order(min_x, min_y);
        let max_z = frame.z_order(max_x, max_y);

        let blocks = |p: NodeId| {
            p != a
                && p != c
                && self.contains(a, ear, c, p)
                && self.area(self.prev(p), p, self.next(p)) >= 0.0
        };

        let mut p = self.get(ear).prev_z;
        let mut n = self.get(ear).next_z;

        // Walk both directions of the Z-order list at once.
        while let (Some(pp), Some(nn)) = (p, n) {
            if self.get(pp).z < min_z || self.get(nn).z > max_z {
                break;
            }
            if blocks(pp) {
                return false;
            }
            p = self.get(pp).prev_z;
            if blocks(nn) {
                return false;
            }
            n = self.get(nn).next_z;
        }

        while let Some(pp) = p {
            if self.get(pp).z < min_z {
                break;
            }
            if blocks(pp) {
                return false;
            }
            p = self.get(pp).prev_z;
        }

        while let Some(nn) = n {
            if self.get(nn).z > max_z {
                break;
            }
            if blocks(nn) {
                return false;
            }
            n = self.get(nn).next_z;
        }

        true
    }

    /// Removes pairs of edges that cross each other next to `start`,
    /// emitting a patch triangle for each removed pair.
    pub(crate) fn cure_local_intersections(
        &mut self,
        start: NodeId,
        dim: usize,
        out: &mut Vec<usize>,
    ) -> NodeId {
        let mut start = start;
        let mut p = start;

        loop {
            let a = self.prev(p);
            let pn = self.next(p);
            let b = self.next(pn);

            if !self.equals(a, b)
                && self.intersects(a, p, pn, b)
                && self.locally_inside(a, b)
                && self.locally_inside(b, a)
            {
                emit(self, out, dim, a, p, b);
                self.remove(p);
                self.remove(pn);
                p = b;
                start = b;
            }

            p = self.next(p);
            if p == start {
                break;
            }
        }

        self.filter_points(p, None)
    }

    /// Finds a valid diagonal and splits the ring along it, returning the
    /// two halves (already filtered), or `None` when no diagonal exists.
    pub(crate) fn split_on_diagonal(&mut self, start: NodeId) -> Option<(NodeId, NodeId)> {
        let mut a = start;
        loop {
            let mut b = self.next(self.next(a));
            while b != self.prev(a) {
                if self.get(a).i != self.get(b).i && self.is_valid_diagonal(a, b) {
                    let c = self.split(a, b);

                    let a_next = self.next(a);
                    let a = self.filter_points(a, Some(a_next));
                    let c_next = self.next(c);
                    let c = self.filter_points(c, Some(c_next));
                    return Some((a, c));
                }
                b = self.next(b);
            }
            a = self.next(a);
            if a == start {
                return None;
            }
        }
    }
}
