//! Ring construction and cleanup.

use crate::arena::{NodeArena, NodeId};

/// Doubled signed area of the ring stored in `data[start..end]`.
///
/// Positive for counter-clockwise rings in a y-up frame.
///
/// # Example
///
/// ```rust
/// use earcut::signed_area;
///
/// let square = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
/// assert_eq!(signed_area(&square, 0, square.len(), 2), 2.0);
/// ```
pub fn signed_area(data: &[f64], start: usize, end: usize, dim: usize) -> f64 {
    if dim < 2 || end <= start {
        return 0.0;
    }
    let mut sum = 0.0;
    let mut j = end - dim;
    for i in (start..end).step_by(dim) {
        sum += (data[j] - data[i]) * (data[i + 1] + data[j + 1]);
        j = i;
    }
    sum
}

impl NodeArena {
    /// Builds a circular list from `data[start..end]` in the requested
    /// winding, reversing the input when its signed area disagrees.
    ///
    /// With `positive` set the ring is linked with positive signed area
    /// (outer contours); otherwise with negative signed area (holes).
    pub(crate) fn linked_list(
        &mut self,
        data: &[f64],
        start: usize,
        end: usize,
        dim: usize,
        positive: bool,
    ) -> Option<NodeId> {
        let mut last = None;
        self.reserve((end.saturating_sub(start)) / dim);

        if positive == (signed_area(data, start, end, dim) > 0.0) {
            for i in (start..end).step_by(dim) {
                last = Some(self.insert_after(i, data[i], data[i + 1], last));
            }
        } else {
            for i in (start..end).step_by(dim).rev() {
                last = Some(self.insert_after(i, data[i], data[i + 1], last));
            }
        }

        if let Some(l) = last {
            let next = self.next(l);
            if self.equals(l, next) {
                self.remove(l);
                last = Some(next);
            }
        }
        last
    }

    /// Removes duplicate and collinear points between `start` and `end`
    /// (the whole ring when `end` is `None`), returning a surviving node.
    pub(crate) fn filter_points(&mut self, start: NodeId, end: Option<NodeId>) -> NodeId {
        let mut end = end.unwrap_or(start);
        let mut p = start;

        loop {
            let mut again = false;
            let (prev, next) = (self.prev(p), self.next(p));

            if !self.get(p).steiner && (self.equals(p, next) || self.area(prev, p, next) == 0.0) {
                self.remove(p);
                p = prev;
                end = prev;
                if p == self.next(p) {
                    break;
                }
                again = true;
            } else {
                p = next;
            }

            if !again && p == end {
                break;
            }
        }

        end
    }
}
