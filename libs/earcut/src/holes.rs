//! # Hole Elimination
//!
//! Each hole is spliced into the outer ring through a bridge: a zero-width
//! corridor from the hole's leftmost vertex to a visible outer vertex. After
//! all holes are bridged the polygon is a single (weakly) simple ring.

use crate::arena::{point_in_triangle, NodeArena, NodeId};

impl NodeArena {
    /// Bridges every hole into the ring at `outer` and returns the new
    /// start node of the merged ring.
    pub(crate) fn eliminate_holes(
        &mut self,
        data: &[f64],
        hole_indices: &[usize],
        outer: NodeId,
        dim: usize,
    ) -> NodeId {
        let mut queue = Vec::with_capacity(hole_indices.len());

        for (n, &hole) in hole_indices.iter().enumerate() {
            let start = hole * dim;
            let end = hole_indices
                .get(n + 1)
                .map_or(data.len(), |&next| next * dim);
            if let Some(list) = self.linked_list(data, start, end, dim, false) {
                if list == self.next(list) {
                    self.get_mut(list).steiner = true;
                }
                queue.push(self.leftmost(list));
            }
        }

        queue.sort_by(|&a, &b| {
            let (a, b) = (self.get(a), self.get(b));
            a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y))
        });

        let mut outer = outer;
        for hole in queue {
            outer = self.eliminate_hole(hole, outer);
        }
        outer
    }

    fn eliminate_hole(&mut self, hole: NodeId, outer: NodeId) -> NodeId {
        let Some(bridge) = self.find_hole_bridge(hole, outer) else {
            return outer;
        };
        let bridge_reverse = self.split(bridge, hole);

        // Clean up collinear points on both sides of the new corridor.
        let after = self.next(bridge_reverse);
        self.filter_points(bridge_reverse, Some(after));
        let after = self.next(bridge);
        self.filter_points(bridge, Some(after))
    }

    /// Finds an outer vertex visible from the hole's leftmost vertex.
    ///
    /// A ray is cast leftward from the hole vertex to the nearest outer edge;
    /// among outer vertices inside the triangle spanned by the hole vertex,
    /// the hit point and the edge endpoint, the one with the smallest angle
    /// to the ray wins.
    fn find_hole_bridge(&self, hole: NodeId, outer: NodeId) -> Option<NodeId> {
        let hx = self.get(hole).x;
        let hy = self.get(hole).y;
        let mut qx = f64::NEG_INFINITY;
        let mut m: Option<NodeId> = None;

        let mut p = outer;
        loop {
            let (px, py) = (self.get(p).x, self.get(p).y);
            let next = self.next(p);
            let (nx, ny) = (self.get(next).x, self.get(next).y);
            if hy <= py && hy >= ny && ny != py {
                let x = px + (hy - py) * (nx - px) / (ny - py);
                if x <= hx && x > qx {
                    qx = x;
                    m = Some(if px < nx { p } else { next });
                    if x == hx {
                        // The hole touches the outer segment.
                        return m;
                    }
                }
            }
            p = next;
            if p == outer {
                break;
            }
        }

        let mut m = m?;

        let stop = m;
        let (mx, my) = (self.get(m).x, self.get(m).y);
        let mut tan_min = f64::INFINITY;

        let mut p = m;
        loop {
            let (px, py) = (self.get(p).x, self.get(p).y);
            let (ax, cx) = if hy < my { (hx, qx) } else { (qx, hx) };
            if hx >= px
                && px >= mx
                && hx != px
                && point_in_triangle(ax, hy, mx, my, cx, hy, px, py)
            {
                let tan = (hy - py).abs() / (hx - px);
                let m_x = self.get(m).x;
                if self.locally_inside(p, hole)
                    && (tan < tan_min
                        || (tan == tan_min
                            && (px > m_x || (px == m_x && self.sector_contains_sector(m, p)))))
                {
                    m = p;
                    tan_min = tan;
                }
            }
            p = self.next(p);
            if p == stop {
                break;
            }
        }

        Some(m)
    }

    /// Whether the sector at `m` contains the sector at `p`, used to break
    /// ties between coincident bridge candidates.
    fn sector_contains_sector(&self, m: NodeId, p: NodeId) -> bool {
        self.area(self.prev(m), m, self.prev(p)) < 0.0
            && self.area(self.next(p), m, self.next(m)) < 0.0
    }

    fn leftmost(&self, start: NodeId) -> NodeId {
        let mut p = start;
        let mut leftmost = start;
        loop {
            let (n, l) = (self.get(p), self.get(leftmost));
            if n.x < l.x || (n.x == l.x && n.y < l.y) {
                leftmost = p;
            }
            p = n.next;
            if p == start {
                return leftmost;
            }
        }
    }
}
