//! Join and cap resolution.
//!
//! The cascade per inner vertex:
//!
//! - `Round` becomes `Miter` below the round limit and `FakeRound` up to a
//!   miter length of 2
//! - `Miter` becomes `Bevel` above the miter limit
//! - `Bevel` becomes `FlipBevel` above a miter length of 2, or `Miter`
//!   when the corner is too shallow for a bevel to show
//!
//! Line ends take the cap type instead.

use super::{CapType, JoinType, LineStyle};
use config::constants::{BEVEL_MITER_LIMIT, FLIP_BEVEL_MITER_LIMIT};

/// Position of a vertex along the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinRole {
    /// First vertex of an open line.
    Start,
    /// Vertex with segments on both sides.
    Middle,
    /// Last vertex of an open line.
    End,
}

/// Geometry emitted at one vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolvedJoin {
    /// One pair on the miter.
    Miter,
    /// Closing and opening pairs with one corner triangle.
    Bevel,
    /// Bevel with the extrusion flipped, for near reversals.
    FlipBevel,
    /// Bevel filled with a pie-slice fan.
    FakeRound,
    /// Round join in the middle, round cap at the ends.
    Round,
    /// Flat cap.
    Butt,
    /// Cap extended by half the width.
    Square,
}

/// Miter length for a join, infinite for a full reversal.
///
/// # Example
///
/// ```rust
/// use tile_mesh::line::miter_length;
///
/// assert_eq!(miter_length(0.5), 2.0);
/// assert_eq!(miter_length(0.0), f64::INFINITY);
/// ```
#[inline]
pub fn miter_length(cos_half_angle: f64) -> f64 {
    if cos_half_angle != 0.0 {
        1.0 / cos_half_angle
    } else {
        f64::INFINITY
    }
}

/// Resolves the geometry emitted at a vertex.
///
/// A pure function of its inputs: the same half-angle cosine, role and
/// style always give the same join.
///
/// # Example
///
/// ```rust
/// use tile_mesh::line::{resolve_join, JoinRole, JoinType, LineStyle, ResolvedJoin};
///
/// let style = LineStyle { join: JoinType::Bevel, ..Default::default() };
/// let right_angle = std::f64::consts::FRAC_1_SQRT_2;
/// assert_eq!(resolve_join(right_angle, JoinRole::Middle, &style), ResolvedJoin::Bevel);
/// assert_eq!(resolve_join(0.0, JoinRole::Middle, &style), ResolvedJoin::FlipBevel);
/// ```
pub fn resolve_join(cos_half_angle: f64, role: JoinRole, style: &LineStyle) -> ResolvedJoin {
    if role != JoinRole::Middle {
        return match style.cap {
            CapType::Butt => ResolvedJoin::Butt,
            CapType::Square => ResolvedJoin::Square,
            CapType::Round => ResolvedJoin::Round,
        };
    }

    let miter = miter_length(cos_half_angle);
    let mut join = match style.join {
        JoinType::Miter => ResolvedJoin::Miter,
        JoinType::Bevel => ResolvedJoin::Bevel,
        JoinType::Round => ResolvedJoin::Round,
    };

    if join == ResolvedJoin::Round {
        if miter < style.round_limit {
            join = ResolvedJoin::Miter;
        } else if miter <= FLIP_BEVEL_MITER_LIMIT {
            join = ResolvedJoin::FakeRound;
        }
    }

    if join == ResolvedJoin::Miter && miter > style.miter_limit {
        join = ResolvedJoin::Bevel;
    }

    if join == ResolvedJoin::Bevel {
        let shallow = if style.join == JoinType::Bevel {
            BEVEL_MITER_LIMIT
        } else {
            style.miter_limit
        };
        if miter > FLIP_BEVEL_MITER_LIMIT {
            join = ResolvedJoin::FlipBevel;
        } else if miter < shallow {
            join = ResolvedJoin::Miter;
        }
    }

    join
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(join: JoinType) -> LineStyle {
        LineStyle {
            join,
            ..Default::default()
        }
    }

    #[test]
    fn test_round_cascade() {
        let round = style(JoinType::Round);
        assert_eq!(resolve_join(1.0, JoinRole::Middle, &round), ResolvedJoin::Miter);
        assert_eq!(resolve_join(0.8, JoinRole::Middle, &round), ResolvedJoin::FakeRound);
        assert_eq!(resolve_join(0.4, JoinRole::Middle, &round), ResolvedJoin::Round);
    }

    #[test]
    fn test_miter_cascade() {
        let miter = style(JoinType::Miter);
        assert_eq!(resolve_join(0.8, JoinRole::Middle, &miter), ResolvedJoin::Miter);
        assert_eq!(resolve_join(0.4, JoinRole::Middle, &miter), ResolvedJoin::FlipBevel);

        let tight = LineStyle {
            miter_limit: 1.2,
            ..miter
        };
        assert_eq!(resolve_join(0.75, JoinRole::Middle, &tight), ResolvedJoin::Bevel);
    }

    #[test]
    fn test_bevel_cascade() {
        let bevel = style(JoinType::Bevel);
        assert_eq!(resolve_join(0.99, JoinRole::Middle, &bevel), ResolvedJoin::Miter);
        assert_eq!(resolve_join(0.8, JoinRole::Middle, &bevel), ResolvedJoin::Bevel);
        assert_eq!(resolve_join(0.4, JoinRole::Middle, &bevel), ResolvedJoin::FlipBevel);
        assert_eq!(resolve_join(0.0, JoinRole::Middle, &bevel), ResolvedJoin::FlipBevel);
    }

    #[test]
    fn test_ends_take_the_cap() {
        for (cap, expected) in [
            (CapType::Butt, ResolvedJoin::Butt),
            (CapType::Square, ResolvedJoin::Square),
            (CapType::Round, ResolvedJoin::Round),
        ] {
            let s = LineStyle {
                cap,
                join: JoinType::Miter,
                ..Default::default()
            };
            assert_eq!(resolve_join(1.0, JoinRole::Start, &s), expected);
            assert_eq!(resolve_join(0.3, JoinRole::End, &s), expected);
        }
    }

    #[test]
    fn test_resolution_is_pure() {
        let s = style(JoinType::Round);
        for k in 0..=100 {
            let cos = k as f64 / 100.0;
            assert_eq!(
                resolve_join(cos, JoinRole::Middle, &s),
                resolve_join(cos, JoinRole::Middle, &s)
            );
        }
    }
}
