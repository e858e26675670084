//! Property-based tests for membership functions, combinators, domains and sets.

use fuzzylogic::combinators::Combinator;
use fuzzylogic::functions::{
    bounded_linear, constant, gauss, inv, linear, rectangular, sigmoid, singleton, trapezoid, triangular,
};
use fuzzylogic::{Domain, Membership, Set};
use proptest::prelude::*;

const TOLERANCE: f64 = 1e-12;

/// Strategy for the leaf families that must stay within [0,1] everywhere
fn arb_membership() -> impl Strategy<Value = Membership> {
    prop_oneof![
        (0.0..=1.0f64).prop_map(|c| constant(c).unwrap()),
        (-10.0..10.0f64, -10.0..10.0f64).prop_map(|(m, b)| linear(m, b).unwrap()),
        (-100.0..100.0f64, 0.1..50.0f64, 0.0..0.5f64, 0.5..=1.0f64)
            .prop_map(|(low, width, no_m, c_m)| rectangular(low, low + width, c_m, no_m).unwrap()),
        (-100.0..100.0f64, 0.1..50.0f64, 0.1..50.0f64, 0.0..0.5f64, 0.5..=1.0f64).prop_map(
            |(low, rise, fall, no_m, c_m)| triangular(low, low + rise + fall, low + rise, c_m, no_m).unwrap()
        ),
        (-100.0..100.0f64, 0.1..20.0f64, 0.0..20.0f64, 0.1..20.0f64, 0.0..0.5f64, 0.5..=1.0f64).prop_map(
            |(low, rise, core, fall, no_m, c_m)| {
                let c_low = low + rise;
                let c_high = c_low + core;
                trapezoid(low, c_low, c_high, c_high + fall, c_m, no_m).unwrap()
            }
        ),
        (0.01..=1.0f64, -10.0..10.0f64, -100.0..100.0f64).prop_map(|(l, k, x0)| sigmoid(l, k, x0).unwrap()),
        arb_wide_triangular(),
    ]
}

/// Triangles whose slopes span most of the representable range
fn arb_wide_triangular() -> impl Strategy<Value = Membership> {
    (-1.7e308..-1e300f64, 1e300..1.7e308f64, 0.01..0.99f64, 0.0..0.5f64, 0.5..=1.0f64).prop_map(
        |(low, high, t, no_m, c_m)| triangular(low, high, low * (1. - t) + high * t, c_m, no_m).unwrap(),
    )
}

fn t_norms() -> [Combinator; 5] {
    [
        Combinator::Min,
        Combinator::Product,
        Combinator::LukasiewiczAnd,
        Combinator::EinsteinProduct,
        Combinator::HamacherProduct,
    ]
}

fn t_conorms() -> [Combinator; 4] {
    [
        Combinator::Max,
        Combinator::BoundedSum,
        Combinator::LukasiewiczOr,
        Combinator::EinsteinSum,
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn bounded_linear_hits_its_ends(
        low in -100.0..100.0f64,
        width in 0.001..100.0f64,
        no_m in 0.0..0.5f64,
        c_m in 0.5..=1.0f64,
        mut xs in prop::collection::vec(-200.0..300.0f64, 2..32),
    ) {
        let high = low + width;
        let f = bounded_linear(low, high, c_m, no_m, false).unwrap();

        prop_assert_eq!(f.evaluate(low), no_m);
        prop_assert_eq!(f.evaluate(high), c_m);

        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let values: Vec<f64> = xs.iter().map(|x| f.evaluate(*x)).collect();
        prop_assert!(values.windows(2).all(|w| w[0] <= w[1]), "not monotonic: {:?}", values);
    }

    #[test]
    fn memberships_stay_in_unit_interval(f in arb_membership(), x in -1000.0..1000.0f64) {
        let m = f.evaluate(x);
        prop_assert!((0.0..=1.0).contains(&m), "{} gave {} at {}", f, m, x);
    }

    #[test]
    fn wide_triangles_stay_in_unit_interval(
        f in arb_wide_triangular(),
        x in prop::num::f64::NORMAL | prop::num::f64::ZERO,
    ) {
        let m = f.evaluate(x);
        prop_assert!((0.0..=1.0).contains(&m), "{} gave {} at {}", f, m, x);
    }

    #[test]
    fn double_inversion_is_identity(f in arb_membership(), x in -1000.0..1000.0f64) {
        let twice = inv(inv(f.clone()));
        prop_assert!((twice.evaluate(x) - f.evaluate(x)).abs() < TOLERANCE);
    }

    #[test]
    fn t_norms_stay_below_min(u in 0.0..=1.0f64, v in 0.0..=1.0f64) {
        for op in t_norms() {
            let m = op.call(u, v);
            prop_assert!(m >= -TOLERANCE && m <= f64::min(u, v) + TOLERANCE, "{} gave {}", op.name(), m);
        }
    }

    #[test]
    fn t_conorms_stay_above_max(u in 0.0..=1.0f64, v in 0.0..=1.0f64) {
        for op in t_conorms() {
            let m = op.call(u, v);
            prop_assert!(m <= 1. + TOLERANCE && m >= f64::max(u, v) - TOLERANCE, "{} gave {}", op.name(), m);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn range_covers_both_ends(low in -1000.0..1000.0f64, width in 0.5..1000.0f64, res in 0.05..2000.0f64) {
        let high = low + width;
        let d = Domain::new("d", low, high, res).unwrap();
        let range = d.range();
        let ratio = width / res;

        prop_assert_eq!(range[0], low);
        prop_assert_eq!(*range.last().unwrap(), high);
        prop_assert!(range.windows(2).all(|w| w[0] < w[1]));

        let steps = range.len() - 1;
        let floor = (ratio.floor() as usize).max(1);
        let round = (ratio.round() as usize).max(1);
        prop_assert!(steps == floor || steps == round, "{} for {}", steps, ratio);
        prop_assert!(d.step() > 0.);
    }

    #[test]
    fn too_many_points_are_rejected(low in -1000.0..1000.0f64, width in 0.5..1000.0f64, res in 1e-300..1e-8f64) {
        prop_assert!(Domain::new("d", low, low + width, res).is_err());
    }

    #[test]
    fn sets_of_the_same_function_are_equal(c in 0.0..10.0f64, b in 0.01..10.0f64, c_m in 0.01..=1.0f64) {
        let d = Domain::new("d", 0., 10., 0.5).unwrap();
        let a = Set::new(gauss(c, b, c_m).unwrap());
        let twin = Set::new(gauss(c, b, c_m).unwrap());

        prop_assert!(a.is_equal_to(&twin).is_err());

        a.bind_domain(&d).unwrap();
        twin.bind_domain(&d).unwrap();
        prop_assert_ne!(&a, &twin);
        prop_assert!(a.is_equal_to(&twin).unwrap());
    }

    #[test]
    fn singleton_center_of_gravity_is_its_location(c in 0.0..=10.0f64) {
        let unbound = singleton(c, 0., 1.).unwrap();
        prop_assert_eq!(unbound.center_of_gravity().unwrap(), c);

        let d = Domain::new("d", 0., 10., 1.).unwrap();
        let bound = d.add_set("spike", singleton(c, 0., 1.).unwrap()).unwrap();
        prop_assert_eq!(bound.center_of_gravity().unwrap(), c);
        prop_assert!(bound.sample_points().unwrap().contains(&c));
    }

    #[test]
    fn normalizing_twice_changes_nothing(
        low in 0.0..5.0f64,
        width in 1.0..5.0f64,
        c_m in 0.1..=1.0f64,
    ) {
        let d = Domain::new("d", 0., 10., 0.5).unwrap();
        let s = d.add_set("s", triangular(low, low + width, None, c_m, 0.).unwrap()).unwrap();
        let once = s.normalized().unwrap();
        let twice = once.normalized().unwrap();

        prop_assert!(twice.is_equal_to(&once).unwrap());
    }
}
