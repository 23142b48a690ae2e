//! # Triangulator
//!
//! Reusable triangulation state. The node arena and the pending work queue
//! are kept between calls so a worker triangulating many polygons in a row
//! allocates only when a polygon outgrows every previous one.

use crate::arena::{NodeArena, NodeId};
use crate::clip::{Clip, Fallback};
use crate::zorder::ZFrame;
use config::constants::EARCUT_HASH_THRESHOLD;

/// Tunables for [`Triangulator`].
///
/// # Example
///
/// ```rust
/// use earcut::EarcutOptions;
///
/// let options = EarcutOptions { hash_threshold: 10 };
/// assert!(options.uses_index(2 * 11, 2));
/// assert!(!EarcutOptions::default().uses_index(2 * 11, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EarcutOptions {
    /// Polygons with more than `hash_threshold * dim` coordinates are
    /// Z-order indexed.
    pub hash_threshold: usize,
}

impl Default for EarcutOptions {
    fn default() -> Self {
        Self {
            hash_threshold: EARCUT_HASH_THRESHOLD,
        }
    }
}

impl EarcutOptions {
    /// Whether a polygon with `coord_count` coordinates gets a Z-order index.
    #[inline]
    pub fn uses_index(&self, coord_count: usize, dim: usize) -> bool {
        coord_count > self.hash_threshold.saturating_mul(dim)
    }
}

/// A sub-polygon waiting to be clipped.
#[derive(Debug, Clone, Copy)]
struct Pending {
    start: NodeId,
    /// Index of the next fallback to try in [`Fallback::ORDER`].
    stage: usize,
    /// Whether the Z-order list must be rebuilt before clipping.
    reindex: bool,
}

/// Ear clipping triangulator with caller-owned scratch state.
///
/// # Example
///
/// ```rust
/// use earcut::Triangulator;
///
/// let mut triangulator = Triangulator::default();
/// let mut triangles = Vec::new();
/// let square = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
/// triangulator.triangulate(&square, &[], 2, &mut triangles);
/// assert_eq!(triangles.len(), 6);
/// ```
#[derive(Debug, Default)]
pub struct Triangulator {
    options: EarcutOptions,
    arena: NodeArena,
    queue: Vec<Pending>,
}

impl Triangulator {
    /// Creates a triangulator with the given options.
    pub fn new(options: EarcutOptions) -> Self {
        Self {
            options,
            arena: NodeArena::default(),
            queue: Vec::new(),
        }
    }

    /// Returns the options in use.
    pub fn options(&self) -> &EarcutOptions {
        &self.options
    }

    /// Triangulates a flat coordinate array.
    ///
    /// `data` holds `dim` values per vertex; only the first two are used.
    /// `hole_indices` lists the vertex index at which each hole starts.
    /// Triangle vertex indices are appended to `out` in groups of three,
    /// wound like the outer contour after it is normalised to positive
    /// signed area. Degenerate input appends nothing.
    pub fn triangulate(&mut self, data: &[f64], hole_indices: &[usize], dim: usize, out: &mut Vec<usize>) {
        if dim < 2 {
            return;
        }
        let data = &data[..data.len() - data.len() % dim];
        let vertex_count = data.len() / dim;

        // Hole starts must be increasing and inside the data.
        let mut holes: Vec<usize> = Vec::with_capacity(hole_indices.len());
        for &h in hole_indices {
            if h < vertex_count && holes.last().map_or(h > 0, |&last| h > last) {
                holes.push(h);
            }
        }

        self.arena.clear();
        self.queue.clear();

        let outer_len = holes.first().map_or(data.len(), |&h| h * dim);
        let Some(mut outer) = self.arena.linked_list(data, 0, outer_len, dim, true) else {
            return;
        };
        if self.arena.next(outer) == self.arena.prev(outer) {
            return;
        }

        if !holes.is_empty() {
            outer = self.arena.eliminate_holes(data, &holes, outer, dim);
        }

        let frame = if self.options.uses_index(data.len(), dim) {
            ZFrame::from_coords(data, outer_len, dim)
        } else {
            None
        };

        out.reserve(vertex_count.saturating_sub(2) * 3);
        self.queue.push(Pending {
            start: outer,
            stage: 0,
            reindex: true,
        });
        self.drain(frame.as_ref(), dim, out);
    }

    /// Clips every pending sub-polygon, escalating through the fallback
    /// strategies for each one that gets stuck.
    fn drain(&mut self, frame: Option<&ZFrame>, dim: usize, out: &mut Vec<usize>) {
        while let Some(Pending {
            mut start,
            mut stage,
            reindex,
        }) = self.queue.pop()
        {
            if reindex {
                if let Some(frame) = frame {
                    self.arena.index_curve(start, frame);
                }
            }

            loop {
                let stuck = match self.arena.clip_ears(start, frame, dim, out) {
                    Clip::Done => break,
                    Clip::Stuck(at) => at,
                };

                let Some(&strategy) = Fallback::ORDER.get(stage) else {
                    break;
                };
                stage += 1;
                tracing::trace!(?strategy, "no ear found, escalating");

                match strategy {
                    Fallback::FilterPoints => {
                        start = self.arena.filter_points(stuck, None);
                    }
                    Fallback::CureIntersections => {
                        let filtered = self.arena.filter_points(stuck, None);
                        start = self.arena.cure_local_intersections(filtered, dim, out);
                    }
                    Fallback::SplitRing => {
                        if let Some((a, c)) = self.arena.split_on_diagonal(stuck) {
                            for half in [c, a] {
                                self.queue.push(Pending {
                                    start: half,
                                    stage: 0,
                                    reindex: true,
                                });
                            }
                        }
                        break;
                    }
                }
            }
        }
    }
}
