use std::sync::Arc;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use solidmath::assert_approx_eq;
use solidmath::prelude::*;

use super::*;
use crate::field::Expr;

fn new_space() -> Arc<SetSpace> {
    crate::tests::init_test_logging();
    SetSpace::new(KernelConfig::default()).unwrap()
}

fn x_half_space(space: &SetSpace, offset: Float) -> Set {
    space
        .primitive(Expr::half_space(vector![offset, 0.0, 0.0], Vector::X))
        .unwrap()
}

fn unit_sphere(space: &SetSpace) -> Set {
    space.primitive(Expr::sphere(Vector::ZERO, 1.0)).unwrap()
}

/// Primitives with deliberate relationships: `[1]` is the same as `[0]` up to
/// tolerance, `[2]` is its complement, and `[4]` is the absolute value of
/// `[3]`.
fn related_primitives(space: &SetSpace) -> Vec<Set> {
    let sphere = Expr::sphere(Vector::ZERO, 1.0);
    [
        Expr::half_space(Vector::ZERO, Vector::X),
        Expr::half_space(vector![1e-9, 0.0, 0.0], Vector::X),
        Expr::half_space(Vector::ZERO, -Vector::X),
        sphere.clone(),
        sphere.abs(),
        Expr::cylinder(Line::new(Vector::ZERO, Vector::Z), 0.5),
    ]
    .into_iter()
    .map(|e| space.primitive(e).unwrap())
    .collect()
}

#[derive(Debug, Clone)]
enum TreeShape {
    Leaf(usize),
    Not(Box<TreeShape>),
    Union(Box<TreeShape>, Box<TreeShape>),
    Intersection(Box<TreeShape>, Box<TreeShape>),
}
impl TreeShape {
    fn build(&self, space: &SetSpace, leaves: &[Set]) -> Set {
        match self {
            TreeShape::Leaf(i) => leaves[*i],
            TreeShape::Not(a) => -a.build(space, leaves),
            TreeShape::Union(a, b) => {
                let (a, b) = (a.build(space, leaves), b.build(space, leaves));
                space.union(a, b).unwrap()
            }
            TreeShape::Intersection(a, b) => {
                let (a, b) = (a.build(space, leaves), b.build(space, leaves));
                space.intersection(a, b).unwrap()
            }
        }
    }
}

fn arbitrary_tree() -> impl Strategy<Value = TreeShape> {
    (0..6_usize)
        .prop_map(TreeShape::Leaf)
        .prop_recursive(
            3, // 3 levels deep
            6, // max size of 6 nodes
            2, // 2 items per branch
            |inner| {
                prop_oneof![
                    inner.clone().prop_map(|a| TreeShape::Not(Box::new(a))),
                    (inner.clone(), inner.clone())
                        .prop_map(|(a, b)| TreeShape::Union(Box::new(a), Box::new(b))),
                    (inner.clone(), inner)
                        .prop_map(|(a, b)| TreeShape::Intersection(Box::new(a), Box::new(b))),
                ]
            },
        )
}

proptest! {
    #[test]
    fn proptest_quick_paths(tree in arbitrary_tree()) {
        let space = new_space();
        let leaves = related_primitives(&space);
        let a = tree.build(&space, &leaves);

        let len = space.len();
        prop_assert_eq!(space.union(a, a).unwrap(), a);
        prop_assert_eq!(space.intersection(a, a).unwrap(), a);
        prop_assert_eq!(-(-a), a);
        prop_assert_eq!(space.union(a, -a).unwrap(), Set::EVERYTHING);
        prop_assert_eq!(space.intersection(a, -a).unwrap(), Set::NOTHING);
        prop_assert_eq!(space.len(), len, "quick paths must not allocate");
    }

    #[test]
    fn proptest_same_symmetry(t1 in arbitrary_tree(), t2 in arbitrary_tree()) {
        let space = new_space();
        let leaves = related_primitives(&space);
        let (a, b) = (t1.build(&space, &leaves), t2.build(&space, &leaves));

        prop_assert_eq!(space.same(a, a), Same::Identical);
        prop_assert_eq!(space.same(a, -a), Same::Complement);
        if space.same(a, b) == Same::Complement {
            prop_assert_eq!(space.same(b, a), Same::Complement);
        }
        if space.same(a, b) == Same::Identical {
            prop_assert_eq!(space.same(b, a), Same::Identical);
        }
    }

    #[test]
    fn proptest_regularize_idempotent(tree in arbitrary_tree()) {
        let space = new_space();
        let leaves = related_primitives(&space);
        let s = tree.build(&space, &leaves);
        prop_assume!(space.primitive_count(s) <= MAX_REGULARIZE_PRIMITIVES);

        let once = space.regularize(s).unwrap();
        let twice = space.regularize(once).unwrap();
        prop_assert_eq!(once, twice);
        prop_assert!(space.primitive_count(once) <= space.primitive_count(s));
    }

    #[test]
    fn proptest_regularize_preserves_membership(
        tree in arbitrary_tree(),
        p in prop::array::uniform3(-2.0..2.0_f64),
    ) {
        let space = new_space();
        let leaves = related_primitives(&space);
        let s = tree.build(&space, &leaves);
        let r = space.regularize(s).unwrap();
        let p = Vector(p);

        // Tolerance-equal primitives may disagree within the tolerance of
        // their boundary, so only check points away from every surface.
        let away_from_surfaces = leaves
            .iter()
            .all(|&leaf| space.value(leaf, p).0.abs() > 1e-3);
        prop_assume!(away_from_surfaces);
        prop_assert_eq!(space.member(r, p), space.member(s, p));
    }
}

#[test]
fn test_child_ordering() {
    let space = new_space();
    let sphere = unit_sphere(&space);
    let plane = x_half_space(&space, 0.0);
    let other_plane = x_half_space(&space, 0.5);

    // Lower degree first.
    let u = space.union(sphere, plane).unwrap();
    let SetData::Compound { children, .. } = space.data(u) else {
        panic!("expected compound");
    };
    assert_eq!(children, [plane, sphere]);
    assert_eq!(space.union(plane, sphere).unwrap(), u);

    // Fewer primitives first.
    let pair = space.intersection(plane, other_plane).unwrap();
    let nested = space.union(pair, sphere).unwrap();
    let SetData::Compound { children, .. } = space.data(nested) else {
        panic!("expected compound");
    };
    assert_eq!(children, [sphere, pair]);
    assert_eq!(space.primitive_count(nested), 3);
    assert_eq!(space.degree(nested), Some(2));
}

#[test]
fn test_constants() {
    let space = new_space();
    let a = unit_sphere(&space);
    assert_eq!(space.union(a, Set::NOTHING).unwrap(), a);
    assert_eq!(space.union(a, Set::EVERYTHING).unwrap(), Set::EVERYTHING);
    assert_eq!(space.intersection(Set::EVERYTHING, a).unwrap(), a);
    assert_eq!(space.intersection(a, Set::NOTHING).unwrap(), Set::NOTHING);
    assert_eq!(space.complement(Set::EVERYTHING), Set::NOTHING);
    assert_eq!(space.union_all([]).unwrap(), Set::NOTHING);
    assert_eq!(space.intersection_all([]).unwrap(), Set::EVERYTHING);
}

#[test]
fn test_member_and_value() {
    let space = new_space();
    let sphere = unit_sphere(&space);
    let plane = x_half_space(&space, 0.0);
    let half_ball = space.intersection(sphere, plane).unwrap();
    let ball_or_half_space = space.union(sphere, plane).unwrap();

    assert_eq!(space.member(half_ball, vector![-0.5, 0.0, 0.0]), Membership::Solid);
    assert_eq!(space.member(half_ball, vector![0.5, 0.0, 0.0]), Membership::Air);
    assert_eq!(space.member(half_ball, vector![0.0, 0.5, 0.0]), Membership::Surface);
    assert_eq!(space.member(half_ball, vector![-1.0, 0.0, 0.0]), Membership::Surface);
    assert_eq!(space.member(-half_ball, vector![0.5, 0.0, 0.0]), Membership::Solid);
    assert_eq!(space.member(ball_or_half_space, vector![0.5, 0.0, 0.0]), Membership::Solid);
    assert_eq!(space.member(ball_or_half_space, vector![2.0, 0.0, 0.0]), Membership::Air);

    let (value, leaf) = space.value(half_ball, vector![-0.5, 0.0, 0.0]);
    assert_approx_eq!(value, -0.5);
    assert_eq!(leaf, Some(plane));
    let (value, leaf) = space.value(-half_ball, vector![-0.9, 0.0, 0.0]);
    assert_approx_eq!(value, 0.19);
    assert_eq!(leaf, Some(-sphere));
    assert_eq!(space.value(Set::EVERYTHING, Vector::ZERO), (Float::NEG_INFINITY, None));

    let far = IntervalBox::cube(vector![5.0, 0.0, 0.0], 1.0);
    assert_eq!(space.classify_box(half_ball, &far), Membership::Air);
    assert_eq!(space.classify_box(-half_ball, &far), Membership::Solid);
    let near = IntervalBox::cube(Vector::ZERO, 0.1);
    assert_eq!(space.classify_box(half_ball, &near), Membership::Surface);
}

#[test]
fn test_same() {
    let space = new_space();
    let leaves = related_primitives(&space);
    let [plane, nearly_plane, anti_plane, sphere, abs_sphere, cylinder] = leaves[..] else {
        panic!("wrong number of primitives");
    };

    assert_eq!(space.same(plane, nearly_plane), Same::Identical);
    assert_eq!(space.same(plane, anti_plane), Same::Complement);
    assert_eq!(space.same(anti_plane, plane), Same::Complement);
    assert_eq!(space.same(plane, -anti_plane), Same::Identical);
    assert_eq!(space.same(abs_sphere, sphere), Same::AbsOf);
    assert_eq!(space.same(abs_sphere, -sphere), Same::AbsOf);
    assert_eq!(space.same(-abs_sphere, sphere), Same::Different);
    assert_eq!(space.same(sphere, abs_sphere), Same::Different);
    assert_eq!(space.same(sphere, cylinder), Same::Different);

    // Compounds compare operand-wise, in either order.
    let a = space.union(plane, sphere).unwrap();
    let b = space.union(sphere, nearly_plane).unwrap();
    assert_ne!(a, b);
    assert_eq!(space.same(a, b), Same::Identical);
    assert_eq!(space.same(a, -b), Same::Complement);

    // De Morgan
    let c = space.intersection(-plane, -sphere).unwrap();
    assert_eq!(space.same(a, c), Same::Complement);
    assert_eq!(space.same(c, a), Same::Complement);
}

#[test]
fn test_regularize() {
    let space = new_space();
    let leaves = related_primitives(&space);
    let [plane, nearly_plane, anti_plane, sphere, abs_sphere, cylinder] = leaves[..] else {
        panic!("wrong number of primitives");
    };
    let reg = |s| space.regularize(s).unwrap();
    let union = |a, b| space.union(a, b).unwrap();
    let intersection = |a, b| space.intersection(a, b).unwrap();

    // Duplicates are removed across nesting levels.
    let s = union(plane, union(cylinder, nearly_plane));
    assert_eq!(reg(s), union(plane, cylinder));

    // Complementary operands collapse the whole subtree.
    assert_eq!(reg(union(anti_plane, union(cylinder, plane))), Set::EVERYTHING);
    assert_eq!(reg(intersection(anti_plane, intersection(cylinder, plane))), Set::NOTHING);

    // `|x|` is empty as a solid.
    assert_eq!(reg(union(abs_sphere, sphere)), sphere);
    assert_eq!(reg(intersection(abs_sphere, sphere)), abs_sphere);

    // Complemented subtrees are flattened through De Morgan.
    let s = intersection(cylinder, -union(-plane, sphere));
    let r = reg(s);
    assert_eq!(space.primitive_count(r), 3);
    assert_eq!(reg(r), r);

    // Nothing to simplify.
    let s = intersection(cylinder, sphere);
    assert_eq!(reg(s), s);
    assert_eq!(reg(sphere), sphere);
}

#[test]
fn test_prune() {
    let space = new_space();
    let sphere = unit_sphere(&space);
    let plane = x_half_space(&space, 0.0);
    let half_ball = space.intersection(sphere, plane).unwrap();

    let outside = IntervalBox::cube(vector![3.0, 3.0, 3.0], 0.5);
    assert_eq!(space.prune(half_ball, &outside).unwrap(), Set::NOTHING);
    assert_eq!(space.prune(-half_ball, &outside).unwrap(), Set::EVERYTHING);

    // Deep inside the ball, only the plane matters.
    let inside = IntervalBox::cube(Vector::ZERO, 0.25);
    assert_eq!(space.prune(half_ball, &inside).unwrap(), plane);
    assert_eq!(space.prune(-half_ball, &inside).unwrap(), -plane);

    // Unchanged trees come back as the same handle.
    let straddling = IntervalBox::cube(vector![0.0, 1.0, 0.0], 0.25);
    assert_eq!(space.prune(half_ball, &straddling).unwrap(), half_ball);
}

#[test]
fn test_prune_then_regularize() {
    let config = KernelConfig {
        regularize_after_prune: true,
        ..KernelConfig::default()
    };
    let space = SetSpace::new(config).unwrap();
    let leaves = related_primitives(&space);
    let far_sphere = space.primitive(Expr::sphere(vector![10.0, 0.0, 0.0], 1.0)).unwrap();
    let s = space
        .union_all([leaves[0], leaves[5], leaves[1], far_sphere])
        .unwrap();

    let b = IntervalBox::cube(Vector::ZERO, 1.0);
    let pruned = space.prune(s, &b).unwrap();
    assert_eq!(space.primitive_count(pruned), 2);
}

#[test]
fn test_flags() {
    let space = new_space();
    let a = x_half_space(&space, 0.0);
    let b = space
        .primitive(Expr::half_space(Vector::ZERO, Vector::Y))
        .unwrap();
    let sphere = unit_sphere(&space);

    let wedge = space.intersection(a, -b).unwrap();
    assert!(space.flags(wedge).contains(SetFlags::CONVEX | SetFlags::ALL_PLANAR));
    assert!(!space.flags(-wedge).contains(SetFlags::CONVEX));
    assert!(space.flags(-wedge).contains(SetFlags::ALL_PLANAR));
    assert!(!space.flags(space.union(a, b).unwrap()).contains(SetFlags::CONVEX));

    let rounded = space.intersection(wedge, sphere).unwrap();
    assert_eq!(space.flags(rounded), SetFlags::POLYNOMIAL);

    let wavy = space.primitive(Expr::coordinate(Axis::X).sin()).unwrap();
    assert_eq!(space.flags(space.union(wavy, a).unwrap()), SetFlags::empty());
    assert_eq!(space.degree(wavy), None);
}

#[test]
fn test_attributes_and_percolate() {
    let space = new_space();
    let sphere = unit_sphere(&space);
    let plane = x_half_space(&space, 0.0);
    let red_plane = space.with_attribute(plane, Attribute::colour([255, 0, 0])).unwrap();
    assert_ne!(red_plane, plane);
    assert!(space.geometry_eq(red_plane, plane));
    assert_eq!(space.attributes(plane), Attributes::new());
    assert_eq!(space.attribute(-red_plane, "colour"), Some(AttributeValue::Colour([255, 0, 0])));
    assert_eq!(space.without_attributes(red_plane).unwrap(), plane);

    let s = space.intersection(sphere, red_plane).unwrap();
    let s = space.with_attribute(s, Attribute::colour([0, 0, 255])).unwrap();
    let s = space.with_attribute(s, Attribute::name("half ball")).unwrap();
    assert_eq!(space.attribute(sphere, "colour"), None);

    let percolated = space.percolate(s).unwrap();
    assert!(space.geometry_eq(percolated, s));
    let SetData::Compound { children: [c1, c2], .. } = space.data(percolated) else {
        panic!("expected compound");
    };
    for leaf in [c1, c2] {
        let expected_colour = match space.geometry_eq(leaf, plane) {
            true => [255, 0, 0],
            false => [0, 0, 255],
        };
        assert_eq!(space.attribute(leaf, "colour"), Some(AttributeValue::Colour(expected_colour)));
        assert_eq!(space.attribute(leaf, "name"), Some(AttributeValue::Name("half ball".into())));
    }
    assert_eq!(space.percolate(percolated).unwrap(), percolated);
}

#[test]
fn test_transform() {
    let space = new_space();
    let sphere = unit_sphere(&space);
    let plane = x_half_space(&space, 0.0);
    let named = space.with_attribute(sphere, Attribute::name("ball")).unwrap();
    let s = space.intersection(named, -plane).unwrap();

    let moved = space.translate(s, vector![0.0, 0.0, 5.0]).unwrap();
    assert_eq!(space.member(moved, vector![0.5, 0.0, 5.0]), Membership::Solid);
    assert_eq!(space.member(moved, vector![0.5, 0.0, 0.0]), Membership::Air);
    assert_eq!(space.member(moved, vector![-0.5, 0.0, 5.0]), Membership::Air);

    let mirrored = space.mirror(s, Plane::new(Vector::X, 0.0)).unwrap();
    assert_eq!(space.member(mirrored, vector![-0.5, 0.0, 0.0]), Membership::Solid);

    let spun = space
        .spin(s, Line::new(Vector::ZERO, Vector::Z), std::f64::consts::FRAC_PI_2)
        .unwrap();
    assert_eq!(space.member(spun, vector![0.0, 0.5, 0.0]), Membership::Solid);
    assert_eq!(space.member(spun, vector![0.0, -0.5, 0.0]), Membership::Air);

    let scaled = space.scale(s, Vector::ZERO, 2.0).unwrap();
    assert_eq!(space.member(scaled, vector![1.5, 0.0, 0.0]), Membership::Solid);

    let names: Vec<_> = space
        .primitives(moved)
        .iter()
        .filter_map(|id| space.attribute(id.into(), "name"))
        .collect();
    assert_eq!(names, vec![AttributeValue::Name("ball".into())]);

    // A primitive used twice is transformed once.
    let cylinder = space
        .primitive(Expr::cylinder(Line::new(Vector::ZERO, Vector::Z), 0.5))
        .unwrap();
    let twice = space
        .intersection(space.union(sphere, plane).unwrap(), space.union(sphere, cylinder).unwrap())
        .unwrap();
    let moved = space.translate(twice, Vector::X).unwrap();
    assert_eq!(space.primitives(moved).len(), 3);
}

#[test]
fn test_display_and_dump() {
    let space = new_space();
    let sphere = unit_sphere(&space);
    let plane = x_half_space(&space, 0.0);
    let s = space.intersection(sphere, -plane).unwrap();
    let s = space.with_attribute(s, Attribute::name("cap")).unwrap();

    let shown = space.get(s).to_string();
    assert!(shown.starts_with("(-["), "{shown}");
    assert!(shown.contains(" & "), "{shown}");

    let dump = space.dump_to_string(s);
    let lines: Vec<&str> = dump.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with(": & {name=\"cap\"}"), "{dump}");
    assert!(lines[1].starts_with("  -#"));
    assert!(lines[2].starts_with("  +#"));
    assert_eq!(space.dump_to_string(Set::NOTHING), "-#0: nothing\n");

    let a = space.get(sphere);
    let b = space.get(plane);
    assert_eq!((a | b).unwrap().set, space.union(sphere, plane).unwrap());
    assert_eq!((a & -b).unwrap(), space.get(space.intersection(sphere, -plane).unwrap()));
}

#[test]
fn test_symmetric_difference() {
    let space = new_space();
    let sphere = unit_sphere(&space);
    let plane = x_half_space(&space, 0.0);

    let s = space.symmetric_difference(sphere, plane).unwrap();
    let t = space.symmetric_difference(plane, sphere).unwrap();
    for (p, expected) in [
        (vector![-0.5, 0.0, 0.0], Membership::Air),
        (vector![0.5, 0.0, 0.0], Membership::Solid),
        (vector![-2.0, 0.0, 0.0], Membership::Solid),
        (vector![2.0, 0.0, 0.0], Membership::Air),
    ] {
        assert_eq!(space.member(s, p), expected, "{p}");
        assert_eq!(space.member(t, p), expected, "{p}");
    }

    assert_eq!(space.symmetric_difference(sphere, sphere).unwrap(), Set::NOTHING);
    assert_eq!(space.symmetric_difference(sphere, Set::NOTHING).unwrap(), sphere);
    assert_eq!(space.symmetric_difference(sphere, -sphere).unwrap(), Set::EVERYTHING);
}

#[test]
fn test_gc_reclaims_dropped_results() {
    let space = new_space();
    let sphere = unit_sphere(&space);
    let plane = x_half_space(&space, 0.0);
    let s = space.intersection(sphere, -plane).unwrap();
    let baseline = space.len();

    for i in 1..=100 {
        space.translate(s, vector![i as Float, 0.0, 0.0]).unwrap();
    }
    let grown = space.len();
    assert!(grown > baseline);
    assert_eq!(space.gc([s]), grown - baseline);
    assert_eq!(space.len(), baseline);
    assert_eq!(space.member(s, vector![0.5, 0.0, 0.0]), Membership::Solid);

    // Results that are still in use survive, and freed IDs are reused.
    let moved = space.translate(s, vector![0.0, 0.0, 5.0]).unwrap();
    assert_eq!(space.gc([s, moved]), 0);
    assert_eq!(space.member(moved, vector![0.5, 0.0, 5.0]), Membership::Solid);
    assert_eq!(space.gc([moved]), 3);
    assert_eq!(space.member(moved, vector![0.5, 0.0, 5.0]), Membership::Solid);
    assert_eq!(space.len(), baseline);

    assert_eq!(space.gc(std::iter::empty::<Set>()), baseline - 1);
    assert!(space.is_empty());
}
