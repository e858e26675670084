//! Odds and ends for turning memberships into ratings.

use indexmap::IndexMap;

use crate::domain::Domain;
use crate::error::{configuration, Result};

/// Round `value` to any step, `round_partial(1.38, 0.25) == 1.5`.
///
/// A step of 0 or infinity leaves the value as is.
pub fn round_partial(value: f64, res: f64) -> f64 {
    if res == 0. || res.is_infinite() {
        return value;
    }

    (value / res).round() * res
}

/// Affine map from `[in_min, in_max]` (default `[0, 1]`) onto `[out_min, out_max]`.
///
/// Factorized as `(a*d - a*x - b*c + b*x) / (d - c)`, which holds up better against
/// over- and underflow than the textbook form.
pub fn rescale(
    out_min: f64,
    out_max: f64,
    in_min: impl Into<Option<f64>>,
    in_max: impl Into<Option<f64>>,
) -> Result<impl Fn(f64) -> f64> {
    let c = in_min.into().unwrap_or(0.);
    let d = in_max.into().unwrap_or(1.);

    if !(c < d) {
        return Err(configuration(format!("rescale needs in_min < in_max, got {c} and {d}")));
    }

    let (a, b) = (out_min, out_max);
    let m = d - c;
    let n = a * d;
    let o = b * c;

    Ok(move |x: f64| (n - a * x - o + b * x) / m)
}

/// Weighs named factors in [0,1] into a rating on a target domain, for decision trees and
/// the like.
#[derive(Clone, Debug)]
pub struct WeightedSum {
    weights: IndexMap<String, f64>,
    low: f64,
    high: f64,
    res: f64,
}

impl WeightedSum {
    /// The weights must add up to 1.
    pub fn new<S: Into<String>>(weights: impl IntoIterator<Item = (S, f64)>, target: &Domain) -> Result<Self> {
        let weights: IndexMap<String, f64> = weights.into_iter().map(|(name, w)| (name.into(), w)).collect();
        let total: f64 = weights.values().sum();

        if (total - 1.).abs() > 1e-9 {
            return Err(configuration(format!("weights must add up to 1, got {total}")));
        }

        Ok(WeightedSum {
            weights,
            low: target.low(),
            high: target.high(),
            res: target.res(),
        })
    }

    /// Rates the given memberships, rounded to the target domain's resolution.
    ///
    /// Factors without a weight are an error, factors left out count as 0.
    pub fn call<'n>(&self, memberships: impl IntoIterator<Item = (&'n str, f64)>) -> Result<f64> {
        let mut result = 0.;

        for (name, m) in memberships {
            let weight = self
                .weights
                .get(name)
                .ok_or_else(|| configuration(format!("no weight for factor {name}")))?;
            result += m * weight;
        }

        let rsc = rescale(self.low, self.high, None, None)?;

        Ok(round_partial(rsc(result), self.res))
    }
}

#[test]
fn test_round_partial() {
    assert_eq!(round_partial(0.405, 0.02), 0.4);
    assert_eq!(round_partial(0.412, 0.02), 0.42);
    assert_eq!(round_partial(1.38, 0.25), 1.5);
    assert_eq!(round_partial(1.12, 0.25), 1.);
    assert_eq!(round_partial(9.24, 0.25), 9.25);
    assert_eq!(round_partial(7.76, 0.25), 7.75);
    assert_eq!(round_partial(987654321., 100.), 987654300.);
    assert_eq!(round_partial(3.14, 0.), 3.14);
    assert_eq!(round_partial(3.14, f64::INFINITY), 3.14);
}

#[test]
fn test_rescale() {
    let f = rescale(1., 10., None, None).unwrap();

    assert_eq!(f(0.), 1.);
    assert_eq!(f(1.), 10.);
    assert_eq!(f(0.5), 5.5);

    let g = rescale(0., 1., -10., 10.).unwrap();
    assert_eq!(g(0.), 0.5);
    assert!(rescale(0., 1., 1., 1.).is_err());
}

#[test]
fn test_ratings() {
    use crate::functions::bounded_linear;

    let rating = Domain::new("rating", 1., 10., 0.1).unwrap();
    rating.add_set("norm", bounded_linear(1., 10., 1., 0., false).unwrap()).unwrap();

    let weights = [("beverage", 0.3), ("atmosphere", 0.2), ("looks", 0.2), ("taste", 0.3)];
    let w_func = WeightedSum::new(weights, &rating).unwrap();

    let ratings = [
        ("beverage", rating.min(9.).unwrap()),
        ("atmosphere", rating.min(5.).unwrap()),
        ("looks", rating.min(4.).unwrap()),
        ("taste", rating.min(8.).unwrap()),
    ];
    assert_eq!(w_func.call(ratings).unwrap(), 6.9);
    assert!(w_func.call([("price", 0.5)]).is_err());
    assert!(WeightedSum::new([("a", 0.5), ("b", 0.6)], &rating).is_err());
}
