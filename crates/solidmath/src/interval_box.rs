//! Axis-aligned boxes built from three [`Interval`]s.

use std::fmt;
use std::ops::{BitAnd, BitOr, Index, IndexMut};

use crate::{Axis, Float, Interval, Line, Membership, Point, Vector};

/// Corner indices of the six tetrahedra that tile a box. Every tetrahedron
/// shares the main diagonal from corner `0` to corner `7`.
///
/// Corner `i` takes the high end of X if bit 2 of `i` is set, of Y if bit 1
/// is set, and of Z if bit 0 is set.
pub const TETRAHEDRA: [[usize; 4]; 6] = [
    [0, 1, 3, 7],
    [0, 2, 3, 7],
    [0, 2, 6, 7],
    [0, 4, 6, 7],
    [0, 4, 5, 7],
    [0, 1, 5, 7],
];

/// Vertex index pairs (into a `[Point; 4]`) for the six edges of a
/// tetrahedron.
pub const TETRAHEDRON_EDGES: [[usize; 2]; 6] = [[0, 1], [0, 2], [0, 3], [1, 2], [1, 3], [2, 3]];

/// Corner index pairs for the twelve edges of a box.
pub const BOX_EDGES: [[usize; 2]; 12] = [
    [0, 1],
    [2, 3],
    [4, 5],
    [6, 7],
    [0, 2],
    [1, 3],
    [4, 6],
    [5, 7],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];

/// Axis-aligned box.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntervalBox(pub [Interval; 3]);

impl fmt::Display for IntervalBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.0;
        write!(f, "{x} × {y} × {z}")
    }
}

impl Index<Axis> for IntervalBox {
    type Output = Interval;

    fn index(&self, axis: Axis) -> &Self::Output {
        &self.0[axis.index()]
    }
}
impl IndexMut<Axis> for IntervalBox {
    fn index_mut(&mut self, axis: Axis) -> &mut Self::Output {
        &mut self.0[axis.index()]
    }
}

impl IntervalBox {
    /// Empty box.
    pub const EMPTY: Self = Self([Interval::EMPTY; 3]);
    /// Box containing all of space.
    pub const EVERYTHING: Self = Self([Interval::EVERYTHING; 3]);

    /// Constructs a box from its three intervals.
    pub const fn new(x: Interval, y: Interval, z: Interval) -> Self {
        Self([x, y, z])
    }
    /// Constructs the smallest box containing two points, given in any order.
    pub fn spanning(a: Point, b: Point) -> Self {
        Self([0, 1, 2].map(|i| Interval::spanning(a[i], b[i])))
    }
    /// Constructs a box containing a single point.
    pub fn point(p: Point) -> Self {
        Self(p.0.map(Interval::point))
    }
    /// Constructs a cube centered on `center` with half-width `radius`.
    pub fn cube(center: Point, radius: Float) -> Self {
        Self(center.0.map(|c| Interval::new(c - radius, c + radius)))
    }

    /// Returns the interval along the X axis.
    pub fn x(&self) -> Interval {
        self.0[0]
    }
    /// Returns the interval along the Y axis.
    pub fn y(&self) -> Interval {
        self.0[1]
    }
    /// Returns the interval along the Z axis.
    pub fn z(&self) -> Interval {
        self.0[2]
    }

    /// Returns whether the box is empty.
    pub fn is_empty(&self) -> bool {
        self.0.iter().any(|i| i.is_empty())
    }
    /// Returns the corner with the lowest coordinates.
    pub fn lo(&self) -> Point {
        Vector(self.0.map(|i| i.lo))
    }
    /// Returns the corner with the highest coordinates.
    pub fn hi(&self) -> Point {
        Vector(self.0.map(|i| i.hi))
    }
    /// Returns the width of the box along each axis.
    pub fn size(&self) -> Vector {
        Vector(self.0.map(Interval::width))
    }
    /// Returns the volume of the box.
    pub fn volume(&self) -> Float {
        self.0.iter().map(|i| i.width()).product()
    }
    /// Returns the squared length of the box's main diagonal.
    pub fn diag2(&self) -> Float {
        self.size().mag2()
    }
    /// Returns the center of the box.
    pub fn centroid(&self) -> Point {
        Vector(self.0.map(Interval::mid))
    }
    /// Returns the longest axis of the box. Ties go to the earliest axis.
    pub fn longest_axis(&self) -> Axis {
        let size = self.size();
        let mut best = Axis::X;
        for axis in [Axis::Y, Axis::Z] {
            if size[axis] > size[best] {
                best = axis;
            }
        }
        best
    }

    /// Returns corner `i` (`0..8`) of the box. Bit 2 selects X, bit 1 selects
    /// Y, and bit 0 selects Z.
    pub fn corner(&self, i: usize) -> Point {
        let pick = |interval: Interval, bit: usize| match i >> bit & 1 {
            0 => interval.lo,
            _ => interval.hi,
        };
        vector![pick(self.x(), 2), pick(self.y(), 1), pick(self.z(), 0)]
    }
    /// Returns all eight corners of the box in lexical order.
    pub fn corners(&self) -> [Point; 8] {
        std::array::from_fn(|i| self.corner(i))
    }
    /// Returns the six tetrahedra that tile the box.
    pub fn tetrahedra(&self) -> [[Point; 4]; 6] {
        let corners = self.corners();
        TETRAHEDRA.map(|tet| tet.map(|i| corners[i]))
    }

    /// Returns whether the box contains a point, including its boundary.
    pub fn contains(&self, p: Point) -> bool {
        self.0.iter().zip(p.0).all(|(i, x)| i.contains(x))
    }
    /// Returns the membership of a point in the box. Points on any face of the
    /// box are [`Membership::Surface`]; this uses exact comparison.
    pub fn member(&self, p: Point) -> Membership {
        let mut ret = Membership::Solid;
        for (interval, x) in self.0.iter().zip(p.0) {
            match interval.member(x) {
                Membership::Air => return Membership::Air,
                Membership::Surface => ret = Membership::Surface,
                Membership::Solid => (),
            }
        }
        ret
    }

    /// Returns the box grown by `amount` on every side.
    #[must_use]
    pub fn expand(&self, amount: Float) -> Self {
        Self(self.0.map(|i| i.expand(amount)))
    }
    /// Splits the box in two along `axis` at coordinate `cut`.
    pub fn split(&self, axis: Axis, cut: Float) -> [Self; 2] {
        let mut lo = *self;
        let mut hi = *self;
        lo[axis].hi = cut;
        hi[axis].lo = cut;
        [lo, hi]
    }
    /// Splits the box in two along `axis` at coordinate `cut`, then grows each
    /// half across the cut by `fraction` of the box's width along `axis`, so
    /// that the halves overlap.
    pub fn split_swollen(&self, axis: Axis, cut: Float, fraction: Float) -> [Self; 2] {
        let swell = self[axis].width() * fraction;
        let [mut lo, mut hi] = self.split(axis, cut);
        lo[axis].hi = (cut + swell).min(self[axis].hi);
        hi[axis].lo = (cut - swell).max(self[axis].lo);
        [lo, hi]
    }

    /// Returns the range of parameters `t` in `t_range` for which
    /// `line.point_at(t)` is inside the box.
    ///
    /// This is the closed-form slab method; the result is exact up to
    /// floating-point rounding.
    pub fn clip_line(&self, line: &Line, t_range: Interval) -> Interval {
        let mut ret = t_range;
        for (interval, (o, d)) in self.0.iter().zip(line.origin.0.into_iter().zip(line.direction.0)) {
            if d == 0.0 {
                if !interval.contains(o) {
                    return Interval::EMPTY;
                }
            } else {
                ret = ret & Interval::spanning((interval.lo - o) / d, (interval.hi - o) / d);
            }
            if ret.is_empty() {
                return Interval::EMPTY;
            }
        }
        ret
    }

    /// Returns a box containing `p / |p|` for every point `p` in this box.
    ///
    /// The result is only meaningful if the box does not contain the origin.
    /// If it does, the box bounding all unit vectors is returned.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mag = (self.x().pow(2) + self.y().pow(2) + self.z().pow(2)).sqrt();
        match mag.recip_nonzero() {
            Some(recip) => Self(self.0.map(|i| (i * recip) & Interval::new(-1.0, 1.0))),
            None => Self([Interval::new(-1.0, 1.0); 3]),
        }
    }
}

/// Intersection.
impl BitAnd for IntervalBox {
    type Output = IntervalBox;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self([0, 1, 2].map(|i| self.0[i] & rhs.0[i]))
    }
}
/// Hull.
impl BitOr for IntervalBox {
    type Output = IntervalBox;

    fn bitor(self, rhs: Self) -> Self::Output {
        if self.is_empty() {
            return rhs;
        }
        if rhs.is_empty() {
            return self;
        }
        Self([0, 1, 2].map(|i| self.0[i] | rhs.0[i]))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn unit_box() -> IntervalBox {
        IntervalBox::spanning(vector![-1.0, -2.0, -3.0], vector![1.0, 2.0, 3.0])
    }

    #[test]
    fn test_box_measures() {
        let b = unit_box();
        assert_eq!(b.volume(), 48.0);
        assert_eq!(b.diag2(), 4.0 + 16.0 + 36.0);
        assert_eq!(b.centroid(), Vector::ZERO);
        assert_eq!(b.longest_axis(), Axis::Z);
    }

    #[test]
    fn test_corner_order() {
        let b = unit_box();
        assert_eq!(b.corner(0), vector![-1.0, -2.0, -3.0]);
        assert_eq!(b.corner(1), vector![-1.0, -2.0, 3.0]);
        assert_eq!(b.corner(2), vector![-1.0, 2.0, -3.0]);
        assert_eq!(b.corner(4), vector![1.0, -2.0, -3.0]);
        assert_eq!(b.corner(7), vector![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_tetrahedra_tile_box() {
        let b = unit_box();
        let total: Float = b
            .tetrahedra()
            .iter()
            .map(|[a, p, q, r]| ((*p - *a).cross(*q - *a).dot(*r - *a) / 6.0).abs())
            .sum();
        crate::assert_approx_eq!(total, b.volume());
        for [i, j] in BOX_EDGES {
            assert_eq!((i ^ j).count_ones(), 1);
        }
    }

    #[test]
    fn test_clip_line() {
        let b = IntervalBox::cube(Vector::ZERO, 1.0);
        let line = Line::new(vector![-5.0, 0.5, 0.0], Vector::X);
        let t = b.clip_line(&line, Interval::EVERYTHING);
        crate::assert_approx_eq!(t, Interval::new(4.0, 6.0));
        let t = b.clip_line(&line, Interval::new(5.0, 10.0));
        crate::assert_approx_eq!(t, Interval::new(5.0, 6.0));
        let miss = Line::new(vector![-5.0, 2.0, 0.0], Vector::X);
        assert!(b.clip_line(&miss, Interval::EVERYTHING).is_empty());
    }

    #[test]
    fn test_split_swollen() {
        let b = IntervalBox::cube(Vector::ZERO, 1.0);
        let [lo, hi] = b.split_swollen(Axis::Y, 0.0, 0.01);
        crate::assert_approx_eq!(lo.y(), Interval::new(-1.0, 0.02));
        crate::assert_approx_eq!(hi.y(), Interval::new(-0.02, 1.0));
        assert_eq!(lo.x(), b.x());
    }

    #[test]
    fn test_normalized() {
        let b = IntervalBox::spanning(vector![1.0, 0.0, 0.0], vector![2.0, 0.0, 0.0]);
        assert_eq!(b.normalized().x(), Interval::new(0.5, 1.0));
        let unit = IntervalBox::cube(Vector::ZERO, 1.0).normalized();
        assert_eq!(unit.x(), Interval::new(-1.0, 1.0));
    }

    proptest! {
        #[test]
        fn proptest_member_inside_box(
            x in -1.0..=1.0_f64,
            y in -2.0..=2.0_f64,
            z in -3.0..=3.0_f64,
            snap in 0..4_usize,
        ) {
            let b = unit_box();
            let mut p = vector![x, y, z];
            if snap < 3 {
                p[snap] = b.0[snap].hi;
            }
            let on_face = (0..3).any(|i| p[i] == b.0[i].lo || p[i] == b.0[i].hi);
            let m = b.member(p);
            prop_assert_ne!(m, Membership::Air);
            prop_assert_eq!(m == Membership::Surface, on_face);
        }
    }
}
