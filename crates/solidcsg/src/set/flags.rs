use bitflags::bitflags;

bitflags! {
    /// Cheap classification of a set node, computed once when the node is
    /// created.
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct SetFlags: u8 {
        /// Every primitive in the set is planar.
        const ALL_PLANAR = 1 << 0;
        /// Every primitive in the set is polynomial.
        const POLYNOMIAL = 1 << 1;
        /// The set is an intersection of half-spaces, so its boundary can be
        /// faceted as a convex polyhedron.
        const CONVEX = 1 << 2;
    }
}

impl SetFlags {
    /// Flags that hold for a set exactly when they hold for both operands of
    /// any Boolean combination.
    pub(super) const INHERITED: Self = Self::ALL_PLANAR.union(Self::POLYNOMIAL);
}
