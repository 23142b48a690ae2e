//! # Z-Order Index
//!
//! Large polygons get a second linked list through their nodes, sorted by
//! the Z-order (Morton) value of each vertex. Ear tests then only scan the
//! nodes whose Z values fall inside the candidate triangle's bounding box.

use crate::arena::{NodeArena, NodeId};
use config::constants::Z_ORDER_RESOLUTION;

/// Bounding box frame used to quantise coordinates onto the Z-order grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ZFrame {
    pub min_x: f64,
    pub min_y: f64,
    /// `Z_ORDER_RESOLUTION / max(width, height)`.
    pub inv_size: f64,
}

impl ZFrame {
    /// Frames the first `end` coordinates of `data`, or `None` when every
    /// point coincides and no grid can be built.
    pub fn from_coords(data: &[f64], end: usize, dim: usize) -> Option<Self> {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for chunk in data[..end].chunks_exact(dim) {
            min_x = min_x.min(chunk[0]);
            min_y = min_y.min(chunk[1]);
            max_x = max_x.max(chunk[0]);
            max_y = max_y.max(chunk[1]);
        }
        let size = (max_x - min_x).max(max_y - min_y);
        if size > 0.0 && size.is_finite() {
            Some(Self {
                min_x,
                min_y,
                inv_size: Z_ORDER_RESOLUTION / size,
            })
        } else {
            None
        }
    }

    /// Z-order value of a point: its quantised coordinates with bits
    /// interleaved, x on even bits and y on odd bits.
    pub fn z_order(&self, x: f64, y: f64) -> u32 {
        let x = spread_bits(((x - self.min_x) * self.inv_size) as u32);
        let y = spread_bits(((y - self.min_y) * self.inv_size) as u32);
        x | (y << 1)
    }
}

#[inline]
fn spread_bits(mut v: u32) -> u32 {
    v = (v | (v << 8)) & 0x00FF_00FF;
    v = (v | (v << 4)) & 0x0F0F_0F0F;
    v = (v | (v << 2)) & 0x3333_3333;
    v = (v | (v << 1)) & 0x5555_5555;
    v
}

impl NodeArena {
    /// Assigns Z values to the ring starting at `start` and threads the
    /// Z-order list through it, sorted ascending.
    pub(crate) fn index_curve(&mut self, start: NodeId, frame: &ZFrame) {
        let mut p = start;
        loop {
            let (x, y, prev, next) = {
                let n = self.get(p);
                (n.x, n.y, n.prev, n.next)
            };
            let node = self.get_mut(p);
            node.z = frame.z_order(x, y);
            node.prev_z = Some(prev);
            node.next_z = Some(next);
            p = next;
            if p == start {
                break;
            }
        }

        // Break the circular list so it can be merge-sorted.
        if let Some(tail) = self.get(p).prev_z {
            self.get_mut(tail).next_z = None;
        }
        self.get_mut(p).prev_z = None;

        self.sort_linked(p);
    }

    /// Bottom-up merge sort of the Z-order list headed by `list`.
    fn sort_linked(&mut self, list: NodeId) {
        let mut list = Some(list);
        let mut in_size = 1;

        loop {
            let mut p = list;
            list = None;
            let mut tail: Option<NodeId> = None;
            let mut merges = 0;

            while let Some(p_start) = p {
                merges += 1;
                let mut q = Some(p_start);
                let mut p_size = 0;
                for _ in 0..in_size {
                    p_size += 1;
                    q = q.and_then(|n| self.get(n).next_z);
                    if q.is_none() {
                        break;
                    }
                }
                let mut q_size = in_size;

                while p_size > 0 || (q_size > 0 && q.is_some()) {
                    let take_p = match (p, q) {
                        (Some(pn), Some(qn)) => {
                            p_size != 0 && (q_size == 0 || self.get(pn).z <= self.get(qn).z)
                        }
                        (Some(_), None) => p_size != 0,
                        _ => false,
                    };

                    let e = if take_p {
                        let Some(e) = p else { break };
                        p = self.get(e).next_z;
                        p_size -= 1;
                        e
                    } else {
                        let Some(e) = q else { break };
                        q = self.get(e).next_z;
                        q_size -= 1;
                        e
                    };

                    match tail {
                        Some(t) => self.get_mut(t).next_z = Some(e),
                        None => list = Some(e),
                    }
                    self.get_mut(e).prev_z = tail;
                    tail = Some(e);
                }

                p = q;
            }

            if let Some(t) = tail {
                self.get_mut(t).next_z = None;
            }

            if merges <= 1 {
                return;
            }
            in_size *= 2;
        }
    }
}
