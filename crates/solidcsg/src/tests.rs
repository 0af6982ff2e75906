use std::sync::{Arc, Once};

use pretty_assertions::assert_eq;
use solidmath::assert_approx_eq;
use solidmath::prelude::*;

use super::*;

pub(crate) fn init_test_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        // Initialize tracing
        use tracing_error::ErrorLayer;
        use tracing_subscriber::prelude::*;
        use tracing_subscriber::{EnvFilter, fmt};

        let fmt_layer = fmt::layer().with_target(false).with_test_writer();
        let filter_layer = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new("info"))
            .unwrap();

        tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt_layer)
            .with(ErrorLayer::default())
            .init();

        // Initialize color_eyre. Fails if an `eyre::Report` was created
        // before this ran, in which case eyre's default hook stays.
        let _ = color_eyre::install();
    });
}

#[test]
fn test_logging_init_after_eyre_report() {
    // Creating a report installs eyre's default hook.
    let report = eyre::eyre!("loading kernel config");
    assert_eq!(report.to_string(), "loading kernel config");
    init_test_logging();
    init_test_logging();
}

fn new_space() -> Arc<SetSpace> {
    init_test_logging();
    SetSpace::new(KernelConfig::default()).unwrap()
}

fn ray_x(origin: Point) -> Line {
    Line::new(origin, Vector::X)
}

const FORWARD: Interval = Interval::new(0.0, Float::INFINITY);

#[test]
fn test_ray_enters_half_space() {
    let space = new_space();
    let half = space
        .primitive(Expr::half_space(vector![1.0, 0.0, 0.0], Vector::X))
        .unwrap();
    let beyond = -half;
    let bounds = IntervalBox::cube(Vector::ZERO, 4.0);
    let model = Model::build(&space, bounds, [beyond], &MaxContentsPolicy::default()).unwrap();

    let cast = model.fire_ray(&space, &ray_x(vector![-3.0, 0.0, 0.0]), FORWARD).unwrap();
    assert_eq!(cast.status, RootStatus::Complete);
    let hit = cast.hit.unwrap();
    assert_eq!(hit.set_index, SetIndex(0));
    assert_eq!(hit.set, beyond);
    assert_eq!(hit.primitive, half);
    assert!(hit.entering);
    assert_approx_eq!(hit.t, 4.0);
    assert_approx_eq!(hit.point, vector![1.0, 0.0, 0.0]);

    // Pointing away from the surface.
    let cast = model.fire_ray(&space, &Line::new(vector![-3.0, 0.0, 0.0], -Vector::X), FORWARD);
    assert_eq!(cast.unwrap().hit, None);
}

#[test]
fn test_ray_inside_reports_exit() {
    let space = new_space();
    let ball = space.primitive(Expr::sphere(Vector::ZERO, 1.0)).unwrap();
    let bounds = IntervalBox::cube(Vector::ZERO, 2.0);
    let model = Model::new(&space, bounds, [ball]).unwrap();

    let hit = model.fire_ray(&space, &ray_x(Vector::ZERO), FORWARD).unwrap().hit.unwrap();
    assert!(!hit.entering);
    assert_approx_eq!(hit.t, 1.0);

    // Starting outside the box, the ray is clipped to it first.
    let hit = model
        .fire_ray(&space, &ray_x(vector![-3.0, 0.0, 0.0]), FORWARD)
        .unwrap()
        .hit
        .unwrap();
    assert!(hit.entering);
    assert_approx_eq!(hit.t, 2.0);
}

#[test]
fn test_nearest_hit_across_leaves() {
    let space = new_space();
    let left = space.primitive(Expr::sphere(vector![-1.0, 0.0, 0.0], 0.5)).unwrap();
    let right = space.primitive(Expr::sphere(vector![1.0, 0.0, 0.0], 0.5)).unwrap();
    let bounds = IntervalBox::cube(Vector::ZERO, 2.0);
    let policy = MaxContentsPolicy {
        max_primitives: 0,
        max_depth: 3,
        ..MaxContentsPolicy::default()
    };
    let model = Model::build(&space, bounds, [right, left], &policy).unwrap();
    assert!(model.leaf_count() > 1);

    let hit = model
        .fire_ray(&space, &ray_x(vector![-5.0, 0.0, 0.0]), FORWARD)
        .unwrap()
        .hit
        .unwrap();
    assert_eq!(hit.set_index, SetIndex(1));
    assert_eq!(hit.primitive, left);
    assert_approx_eq!(hit.t, 3.5);

    let backward = Line::new(vector![5.0, 0.0, 0.0], -Vector::X);
    let hit = model.fire_ray(&space, &backward, FORWARD).unwrap().hit.unwrap();
    assert_eq!(hit.set_index, SetIndex(0));
    assert_approx_eq!(hit.point, vector![1.5, 0.0, 0.0]);

    // Passes between the two spheres.
    let between = Line::new(vector![0.0, -5.0, 0.0], Vector::Y);
    let cast = model.fire_ray(&space, &between, FORWARD).unwrap();
    assert_eq!(cast.hit, None);
    assert_eq!(cast.status, RootStatus::Complete);

    // Misses the box entirely.
    let outside = ray_x(vector![10.0, 10.0, 10.0]);
    assert_eq!(model.fire_ray(&space, &outside, Interval::EVERYTHING).unwrap().hit, None);
}

#[test]
fn test_compound_set_hit() {
    let space = new_space();
    let ball = space.primitive(Expr::sphere(Vector::ZERO, 1.0)).unwrap();
    let half = space
        .primitive(Expr::half_space(Vector::ZERO, Vector::X))
        .unwrap();
    // Ball with the `x < 0` half removed.
    let dome = space.difference(ball, half).unwrap();
    let bounds = IntervalBox::cube(Vector::ZERO, 2.0);
    let model = Model::build(&space, bounds, [dome], &MaxContentsPolicy::default()).unwrap();

    // Enters through the flat face.
    let hit = model
        .fire_ray(&space, &ray_x(vector![-3.0, 0.0, 0.0]), FORWARD)
        .unwrap()
        .hit
        .unwrap();
    assert_eq!(hit.primitive, half);
    assert_approx_eq!(hit.t, 3.0);

    // Enters through the curved face.
    let down = Line::new(vector![0.5, 0.0, 3.0], -Vector::Z);
    let hit = model.fire_ray(&space, &down, FORWARD).unwrap().hit.unwrap();
    assert_eq!(hit.primitive, ball);
    assert!(hit.entering);
    assert_approx_eq!(hit.t, 3.0 - 0.75_f64.sqrt());
}

#[test]
fn test_torus_ray() {
    let space = new_space();
    let torus = space
        .primitive(Expr::torus(Line::new(Vector::ZERO, Vector::Z), 1.0, 0.25))
        .unwrap();
    let bounds = IntervalBox::cube(Vector::ZERO, 2.0);
    let model = Model::build(&space, bounds, [torus], &MaxContentsPolicy::default()).unwrap();

    let hit = model
        .fire_ray(&space, &ray_x(vector![-3.0, 0.0, 0.0]), FORWARD)
        .unwrap()
        .hit
        .unwrap();
    assert!(hit.entering);
    assert_approx_eq!(hit.t, 1.75);

    // From the hole.
    let hit = model.fire_ray(&space, &ray_x(Vector::ZERO), FORWARD).unwrap().hit.unwrap();
    assert!(hit.entering);
    assert_approx_eq!(hit.t, 0.75);

    let line = ray_x(Vector::ZERO);
    let mut query = RayQuery::new(&space, line, Interval::new(-2.0, 2.0));
    let list = query.intervals(torus, query.interval());
    let spans = list.spans();
    assert_eq!(spans.len(), 2, "{list}");
    assert_approx_eq!(spans[0].interval.lo, -1.25);
    assert_approx_eq!(spans[0].interval.hi, -0.75);
    assert_approx_eq!(spans[1].interval.lo, 0.75);
    assert_approx_eq!(spans[1].interval.hi, 1.25);
    assert_eq!(query.status(), RootStatus::Complete);
}

#[test]
fn test_non_polynomial_ray() {
    let space = new_space();
    // Solid wherever `sin(x) < 0`.
    let waves = space.primitive(Expr::coordinate(Axis::X).sin()).unwrap();
    let bounds = IntervalBox::cube(Vector::ZERO, 4.0);
    let model = Model::build(&space, bounds, [waves], &MaxContentsPolicy::default()).unwrap();

    let cast = model.fire_ray(&space, &ray_x(vector![0.5, 0.0, 0.0]), FORWARD).unwrap();
    assert_eq!(cast.status, RootStatus::Complete);
    let hit = cast.hit.unwrap();
    assert!(hit.entering);
    assert_approx_eq!(hit.t, std::f64::consts::PI - 0.5);
}

#[test]
fn test_too_many_roots() {
    init_test_logging();
    let space = SetSpace::new(KernelConfig {
        max_roots: 2,
        ..KernelConfig::default()
    })
    .unwrap();
    let waves = space.primitive(Expr::coordinate(Axis::X).sin()).unwrap();
    let bounds = IntervalBox::cube(Vector::ZERO, 20.0);
    let model = Model::new(&space, bounds, [waves]).unwrap();

    let cast = model.fire_ray(&space, &ray_x(vector![0.5, 0.0, 0.0]), FORWARD).unwrap();
    assert!(!cast.status.is_complete());
    assert_approx_eq!(cast.hit.unwrap().t, std::f64::consts::PI - 0.5);
}

#[test]
fn test_degenerate_ray() {
    let space = new_space();
    let ball = space.primitive(Expr::sphere(Vector::ZERO, 1.0)).unwrap();
    let model = Model::new(&space, IntervalBox::cube(Vector::ZERO, 2.0), [ball]).unwrap();

    let result = model.fire_ray(&space, &Line::new(Vector::ZERO, Vector::ZERO), FORWARD);
    assert!(matches!(result, Err(KernelError::DegenerateRay)));
}

#[test]
fn test_concurrent_rays() {
    let space = new_space();
    let a = space.primitive(Expr::sphere(vector![-0.5, 0.0, 0.0], 1.0)).unwrap();
    let b = space.primitive(Expr::sphere(vector![0.5, 0.3, 0.0], 0.8)).unwrap();
    let sets = [space.union(a, b).unwrap(), space.intersection(a, b).unwrap()];
    let bounds = IntervalBox::cube(Vector::ZERO, 2.0);
    let model = Model::build(&space, bounds, sets, &MaxContentsPolicy::default()).unwrap();

    let rays: Vec<Line> = (0..16)
        .map(|i| ray_x(vector![-5.0, -1.2 + 0.15 * i as Float, 0.1]))
        .collect();
    let fire_all = || {
        rays.iter()
            .map(|ray| model.fire_ray(&space, ray, FORWARD).unwrap())
            .collect::<Vec<_>>()
    };

    let expected = fire_all();
    assert!(expected.iter().any(|cast| cast.hit.is_some()));
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4).map(|_| s.spawn(fire_all)).collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
