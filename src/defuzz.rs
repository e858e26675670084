//! Turning fuzzy results back into crisp values.

use std::fmt;
use std::str::FromStr;

use num::Float;
use serde::{Deserialize, Serialize};

use crate::error::{configuration, FuzzyError, Result};
use crate::set::Set;

/// Memberships this close to the maximum count as maximal.
const MAX_TOLERANCE: f64 = 1e-6;

/// Method for defuzzificating the result of a rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Center of Gravity. For rules: the centroids of the firing consequents, weighted by
    /// their firing strength
    #[default]
    Cog,
    /// Bisector of Area
    Bisector,
    /// Mean of the values for which the membership function is maximum
    Mom,
    /// Smallest value for which the membership function is maximum
    Som,
    /// Largest value for which the membership function is maximum
    Lom,
}

impl Method {
    pub fn name(self) -> &'static str {
        match self {
            Self::Cog => "cog",
            Self::Bisector => "bisector",
            Self::Mom => "mom",
            Self::Som => "som",
            Self::Lom => "lom",
        }
    }

    /// Defuzzificates a sampled membership curve. `None` for an empty curve, and for
    /// [`Method::Cog`] when there is no area at all.
    pub fn call<F: Float>(self, points: &[F], membership: &[F], step: F) -> Option<F> {
        match self {
            Self::Cog => centroid(points, membership),
            Self::Bisector => bisector(points, membership, step),
            Self::Mom => mom(points, membership),
            Self::Som => som(points, membership),
            Self::Lom => lom(points, membership),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = FuzzyError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "cog" => Ok(Self::Cog),
            "bisector" => Ok(Self::Bisector),
            "mom" => Ok(Self::Mom),
            "som" => Ok(Self::Som),
            "lom" => Ok(Self::Lom),
            _ => Err(configuration(format!("unknown defuzzification method {s:?}"))),
        }
    }
}

/// Weighted average of the consequents' own centers of gravity.
pub fn cog(target_weights: &[(Set, f64)]) -> Result<f64> {
    let sum_weights: f64 = target_weights.iter().map(|(_, w)| w).sum();

    if sum_weights == 0. {
        return Err(FuzzyError::Defuzzification(
            "total weight is zero, there is no center of gravity".to_owned(),
        ));
    }

    let mut sum_weighted_cogs = 0.;

    for (set, weight) in target_weights {
        sum_weighted_cogs += set.center_of_gravity()? * weight;
    }

    Ok(sum_weighted_cogs / sum_weights)
}

/// `sum(x * m) / sum(m)`, `None` if all memberships are 0.
pub fn centroid<F: Float>(points: &[F], membership: &[F]) -> Option<F> {
    let (num, den) = points
        .iter()
        .zip(membership)
        .fold((F::zero(), F::zero()), |(num, den), (x, m)| (num + *x * *m, den + *m));

    if den == F::zero() {
        None
    } else {
        Some(num / den)
    }
}

/// First point at which the accumulated area reaches half of the total.
///
/// With no area at all that is the first point.
pub fn bisector<F: Float>(points: &[F], membership: &[F], step: F) -> Option<F> {
    let total_area = membership.iter().fold(F::zero(), |acc, m| acc + *m * step);
    let half_area = total_area / (F::one() + F::one());
    let mut cumulative = F::zero();

    for (x, m) in points.iter().zip(membership) {
        cumulative = cumulative + *m * step;
        if cumulative >= half_area {
            return Some(*x);
        }
    }

    points.last().copied()
}

fn max_points<F: Float>(points: &[F], membership: &[F]) -> Vec<F> {
    let Some(maximum) = membership.iter().copied().reduce(F::max) else {
        return Vec::new();
    };
    let tol = F::from(MAX_TOLERANCE).unwrap_or_else(F::epsilon);

    points
        .iter()
        .zip(membership)
        .filter_map(|(x, m)| if (*m - maximum).abs() < tol { Some(*x) } else { None })
        .collect()
}

/// Mean of the points where the membership is maximal.
pub fn mom<F: Float>(points: &[F], membership: &[F]) -> Option<F> {
    let maxima = max_points(points, membership);
    let (len, sum) = maxima
        .iter()
        .fold((F::zero(), F::zero()), |(len, sum), x| (len + F::one(), sum + *x));

    if maxima.is_empty() {
        None
    } else {
        Some(sum / len)
    }
}

/// Smallest of the points where the membership is maximal.
pub fn som<F: Float>(points: &[F], membership: &[F]) -> Option<F> {
    max_points(points, membership).into_iter().reduce(F::min)
}

/// Largest of the points where the membership is maximal.
pub fn lom<F: Float>(points: &[F], membership: &[F]) -> Option<F> {
    max_points(points, membership).into_iter().reduce(F::max)
}

/// Max-min aggregation: every consequent clipped at its firing strength, then the pointwise maximum.
pub(crate) fn aggregate(points: &[f64], target_weights: &[(Set, f64)]) -> Vec<f64> {
    points
        .iter()
        .map(|x| {
            target_weights
                .iter()
                .map(|(set, weight)| f64::min(*weight, set.call(*x)))
                .fold(0., f64::max)
        })
        .collect()
}

#[cfg(test)]
fn triangle() -> (Vec<f64>, Vec<f64>) {
    let points: Vec<f64> = (0..=10).map(f64::from).collect();
    let membership = vec![0., 0., 0.25, 0.5, 0.75, 1., 0.75, 0.5, 0.25, 0., 0.];

    (points, membership)
}

#[test]
fn test_method_names() {
    for method in [Method::Cog, Method::Bisector, Method::Mom, Method::Som, Method::Lom] {
        assert_eq!(method.name().parse::<Method>().unwrap(), method);
    }
    assert_eq!(Method::default(), Method::Cog);
    assert!("median".parse::<Method>().is_err());
}

#[test]
fn test_centroid() {
    let (points, membership) = triangle();

    assert_eq!(centroid(&points, &membership), Some(5.));
    assert_eq!(centroid(&points, &[0.; 11]), None);
    assert_eq!(Method::Cog.call(&points, &membership, 1.), Some(5.));
}

#[test]
fn test_bisector() {
    let (points, membership) = triangle();

    assert_eq!(bisector(&points, &membership, 1.), Some(5.));
    // no area at all
    assert_eq!(bisector(&points, &[0.; 11], 1.), Some(0.));
    assert_eq!(bisector::<f64>(&[], &[], 1.), None);

    // everything sits on the right end
    let mut right = [0.; 11];
    right[10] = 1.;
    assert_eq!(bisector(&points, &right, 1.), Some(10.));
}

#[test]
fn test_maxima() {
    let points = [0., 1., 2., 3., 4., 5.];
    let membership = [0.2, 0.9, 0.9, 0.3, 0.9 - 1e-8, 0.1];

    assert_eq!(mom(&points, &membership), Some(7. / 3.));
    assert_eq!(som(&points, &membership), Some(1.));
    assert_eq!(lom(&points, &membership), Some(4.));
    assert_eq!(mom::<f64>(&[], &[]), None);
    assert_eq!(Method::Lom.call(&points[..3], &membership[..3], 1.), Some(2.));
}

#[test]
fn test_f32() {
    let points = [0f32, 0.5, 1.];
    let membership = [0f32, 1., 0.];

    assert_eq!(Method::Mom.call(&points, &membership, 0.5), Some(0.5));
    assert_eq!(Method::Bisector.call(&points, &membership, 0.5), Some(0.5));
}

#[test]
fn test_cog() {
    use crate::functions::singleton;

    let low = singleton(2., 0., 1.).unwrap();
    let high = singleton(8., 0., 1.).unwrap();

    assert_eq!(cog(&[(low.clone(), 0.75), (high.clone(), 0.25)]).unwrap(), 3.5);
    assert!(matches!(
        cog(&[(low, 0.), (high, 0.)]),
        Err(FuzzyError::Defuzzification(_))
    ));
    assert!(matches!(cog(&[]), Err(FuzzyError::Defuzzification(_))));
}
