//! Nearest-first ray casting against a [`Model`].

use float_ord::FloatOrd;
use solidmath::prelude::*;

mod interval_list;
mod root_finder;

pub use interval_list::{Crossing, SortedIntervalList, Span};
pub use root_finder::{RayQuery, RootFinder};

use crate::model::{Division, Model, SetIndex};
use crate::{KernelError, KernelResult, Set, SetSpace};

/// First surface hit by a ray.
#[derive(Debug, Clone, PartialEq)]
pub struct RayHit {
    /// Index of the hit set in the model's set list.
    pub set_index: SetIndex,
    /// Hit set, as pruned in the leaf where it was hit.
    pub set: Set,
    /// Primitive whose surface was hit.
    pub primitive: Set,
    /// Ray parameter of the hit.
    pub t: Float,
    /// Point of the hit.
    pub point: Point,
    /// Whether the ray enters the set (rather than leaving it).
    pub entering: bool,
}

/// Result of [`Model::fire_ray()`].
#[derive(Debug, Clone, PartialEq)]
pub struct RayCast {
    /// Nearest hit, if any.
    pub hit: Option<RayHit>,
    /// Whether every root search along the ray was complete. If not, the hit
    /// may be missing or not the nearest.
    pub status: RootStatus,
}

impl Model {
    /// Returns the first surface of any of the model's sets that `line`
    /// crosses within `interval`.
    ///
    /// The ray is first clipped to the model's box. If it starts inside a
    /// set, the hit for that set is where the ray leaves it.
    #[tracing::instrument(level = "debug", skip_all, fields(line = %line, interval = %interval))]
    pub fn fire_ray(
        &self,
        space: &SetSpace,
        line: &Line,
        interval: Interval,
    ) -> KernelResult<RayCast> {
        if line.is_degenerate() {
            return Err(KernelError::DegenerateRay);
        }
        let clipped = self.bounds().clip_line(line, interval);
        let mut query = RayQuery::new(space, *line, clipped);
        if clipped.is_empty() {
            return Ok(RayCast {
                hit: None,
                status: RootStatus::Complete,
            });
        }

        let start = line.point_at(clipped.lo);
        let inside = self
            .sets()
            .map_ref(|_, &s| space.member(s, start) == Membership::Solid);
        let hit = fire_node(self, &mut query, &inside, clipped);
        Ok(RayCast {
            hit,
            status: query.status(),
        })
    }
}

fn fire_node(
    node: &Model,
    query: &mut RayQuery<'_>,
    inside: &GenericVec<SetIndex, bool>,
    interval: Interval,
) -> Option<RayHit> {
    if interval.is_empty() {
        return None;
    }
    match node.division() {
        Division::Leaf => fire_leaf(node, query, inside, interval),
        Division::Split {
            axis,
            cut,
            children: [lo, hi],
        } => {
            let o = query.line().origin[*axis];
            let d = query.line().direction[*axis];
            if d == 0.0 {
                let child = if o <= *cut { lo } else { hi };
                return fire_node(child, query, inside, interval);
            }
            let t_cut = (cut - o) / d;
            let before = interval & Interval::new(Float::NEG_INFINITY, t_cut);
            let after = interval & Interval::new(t_cut, Float::INFINITY);
            let (near, far) = if d > 0.0 { (lo, hi) } else { (hi, lo) };
            fire_node(near, query, inside, before).or_else(|| fire_node(far, query, inside, after))
        }
    }
}

fn fire_leaf(
    leaf: &Model,
    query: &mut RayQuery<'_>,
    inside: &GenericVec<SetIndex, bool>,
    interval: Interval,
) -> Option<RayHit> {
    leaf.sets()
        .iter()
        .filter_map(|(set_index, &set)| {
            // The list spans the whole query so that a crossing exactly on a
            // cut is seen from both sides.
            let list = query.intervals(set, query.interval());
            let crossing = list
                .first_crossing(interval.lo, inside[set_index])
                .filter(|c| c.t <= interval.hi)?;
            Some(RayHit {
                set_index,
                set,
                primitive: crossing.primitive,
                t: crossing.t,
                point: query.line().point_at(crossing.t),
                entering: crossing.entering,
            })
        })
        .min_by_key(|hit| FloatOrd(hit.t))
}
