//! # Node Arena
//!
//! Polygon vertices live in a flat `Vec<Node>` and link to each other by
//! index. Removing a node only unlinks it; its slot stays allocated until the
//! arena is cleared for the next polygon, so no index is ever invalidated
//! during a triangulation call.

/// Index of a node inside [`NodeArena`].
pub(crate) type NodeId = usize;

/// A polygon vertex in the circular ring and the auxiliary Z-order list.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Node {
    /// Offset of the vertex's first coordinate in the flat input array.
    pub i: usize,
    pub x: f64,
    pub y: f64,
    pub prev: NodeId,
    pub next: NodeId,
    /// Z-order curve value, valid once the ring has been indexed.
    pub z: u32,
    pub prev_z: Option<NodeId>,
    pub next_z: Option<NodeId>,
    /// Set on single-point holes, which must never be filtered away.
    pub steiner: bool,
}

/// Index-addressed storage for the linked vertex rings of one polygon.
#[derive(Debug, Default)]
pub(crate) struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    #[inline]
    pub fn next(&self, id: NodeId) -> NodeId {
        self.nodes[id].next
    }

    #[inline]
    pub fn prev(&self, id: NodeId) -> NodeId {
        self.nodes[id].prev
    }

    fn alloc(&mut self, i: usize, x: f64, y: f64) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            i,
            x,
            y,
            prev: id,
            next: id,
            z: 0,
            prev_z: None,
            next_z: None,
            steiner: false,
        });
        id
    }

    /// Creates a node and links it after `last`, or as a one-node ring.
    pub fn insert_after(&mut self, i: usize, x: f64, y: f64, last: Option<NodeId>) -> NodeId {
        let p = self.alloc(i, x, y);
        if let Some(last) = last {
            let after = self.nodes[last].next;
            self.nodes[p].next = after;
            self.nodes[p].prev = last;
            self.nodes[after].prev = p;
            self.nodes[last].next = p;
        }
        p
    }

    /// Unlinks a node from both the ring and the Z-order list.
    pub fn remove(&mut self, p: NodeId) {
        let Node {
            prev,
            next,
            prev_z,
            next_z,
            ..
        } = self.nodes[p];
        self.nodes[next].prev = prev;
        self.nodes[prev].next = next;
        if let Some(pz) = prev_z {
            self.nodes[pz].next_z = next_z;
        }
        if let Some(nz) = next_z {
            self.nodes[nz].prev_z = prev_z;
        }
    }

    /// Links `a` to `b` with a diagonal, splitting the ring in two.
    ///
    /// `a` and `b` are duplicated; the returned node is the copy of `b`,
    /// which sits on the second ring.
    pub fn split(&mut self, a: NodeId, b: NodeId) -> NodeId {
        let (ai, ax, ay) = (self.nodes[a].i, self.nodes[a].x, self.nodes[a].y);
        let (bi, bx, by) = (self.nodes[b].i, self.nodes[b].x, self.nodes[b].y);
        let a2 = self.alloc(ai, ax, ay);
        let b2 = self.alloc(bi, bx, by);
        let an = self.nodes[a].next;
        let bp = self.nodes[b].prev;

        self.nodes[a].next = b;
        self.nodes[b].prev = a;

        self.nodes[a2].next = an;
        self.nodes[an].prev = a2;

        self.nodes[b2].next = a2;
        self.nodes[a2].prev = b2;

        self.nodes[bp].next = b2;
        self.nodes[b2].prev = bp;

        b2
    }

    // =========================================================================
    // PREDICATES
    // =========================================================================

    /// Doubled signed area of triangle `(p, q, r)`.
    #[inline]
    pub fn area(&self, p: NodeId, q: NodeId, r: NodeId) -> f64 {
        let (p, q, r) = (&self.nodes[p], &self.nodes[q], &self.nodes[r]);
        (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y)
    }

    #[inline]
    pub fn equals(&self, a: NodeId, b: NodeId) -> bool {
        let (a, b) = (&self.nodes[a], &self.nodes[b]);
        a.x == b.x && a.y == b.y
    }

    /// Whether node `p` lies inside (or on) triangle `(a, b, c)`.
    #[inline]
    pub fn contains(&self, a: NodeId, b: NodeId, c: NodeId, p: NodeId) -> bool {
        let (a, b, c, p) = (&self.nodes[a], &self.nodes[b], &self.nodes[c], &self.nodes[p]);
        point_in_triangle(a.x, a.y, b.x, b.y, c.x, c.y, p.x, p.y)
    }

    /// Whether segments `p1-q1` and `p2-q2` intersect, touching included.
    pub fn intersects(&self, p1: NodeId, q1: NodeId, p2: NodeId, q2: NodeId) -> bool {
        let o1 = sign(self.area(p1, q1, p2));
        let o2 = sign(self.area(p1, q1, q2));
        let o3 = sign(self.area(p2, q2, p1));
        let o4 = sign(self.area(p2, q2, q1));

        if o1 != o2 && o3 != o4 {
            return true;
        }
        (o1 == 0 && self.on_segment(p1, p2, q1))
            || (o2 == 0 && self.on_segment(p1, q2, q1))
            || (o3 == 0 && self.on_segment(p2, p1, q2))
            || (o4 == 0 && self.on_segment(p2, q1, q2))
    }

    /// For collinear `p`, `q`, `r`: whether `q` lies on segment `p-r`.
    fn on_segment(&self, p: NodeId, q: NodeId, r: NodeId) -> bool {
        let (p, q, r) = (&self.nodes[p], &self.nodes[q], &self.nodes[r]);
        q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.y <= p.y.max(r.y) && q.y >= p.y.min(r.y)
    }

    /// Whether diagonal `a-b` crosses any edge of the ring containing `a`.
    pub fn intersects_ring(&self, a: NodeId, b: NodeId) -> bool {
        let (ai, bi) = (self.nodes[a].i, self.nodes[b].i);
        let mut p = a;
        loop {
            let next = self.nodes[p].next;
            let (pi, ni) = (self.nodes[p].i, self.nodes[next].i);
            if pi != ai && ni != ai && pi != bi && ni != bi && self.intersects(p, next, a, b) {
                return true;
            }
            p = next;
            if p == a {
                return false;
            }
        }
    }

    /// Whether diagonal `a-b` starts into the polygon interior at `a`.
    pub fn locally_inside(&self, a: NodeId, b: NodeId) -> bool {
        let (prev, next) = (self.nodes[a].prev, self.nodes[a].next);
        if self.area(prev, a, next) < 0.0 {
            self.area(a, b, next) >= 0.0 && self.area(a, prev, b) >= 0.0
        } else {
            self.area(a, b, prev) < 0.0 || self.area(a, next, b) < 0.0
        }
    }

    /// Whether the midpoint of diagonal `a-b` lies inside the ring.
    pub fn middle_inside(&self, a: NodeId, b: NodeId) -> bool {
        let px = (self.nodes[a].x + self.nodes[b].x) / 2.0;
        let py = (self.nodes[a].y + self.nodes[b].y) / 2.0;
        let mut inside = false;
        let mut p = a;
        loop {
            let n = &self.nodes[self.nodes[p].next];
            let c = &self.nodes[p];
            if (c.y > py) != (n.y > py)
                && n.y != c.y
                && px < (n.x - c.x) * (py - c.y) / (n.y - c.y) + c.x
            {
                inside = !inside;
            }
            p = c.next;
            if p == a {
                return inside;
            }
        }
    }

    /// Whether `a-b` can split the ring into two valid polygons.
    pub fn is_valid_diagonal(&self, a: NodeId, b: NodeId) -> bool {
        let bi = self.nodes[b].i;
        self.nodes[self.nodes[a].next].i != bi
            && self.nodes[self.nodes[a].prev].i != bi
            && !self.intersects_ring(a, b)
            && self.locally_inside(a, b)
            && self.locally_inside(b, a)
            && self.middle_inside(a, b)
    }
}

/// Whether point `p` lies inside (or on) triangle `(a, b, c)`.
#[allow(clippy::too_many_arguments)]
#[inline]
pub(crate) fn point_in_triangle(
    ax: f64,
    ay: f64,
    bx: f64,
    by: f64,
    cx: f64,
    cy: f64,
    px: f64,
    py: f64,
) -> bool {
    (cx - px) * (ay - py) - (ax - px) * (cy - py) >= 0.0
        && (ax - px) * (by - py) - (bx - px) * (ay - py) >= 0.0
        && (bx - px) * (cy - py) - (cx - px) * (by - py) >= 0.0
}

#[inline]
fn sign(value: f64) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}
