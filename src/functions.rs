//! Membership functions mapping R -> [0,1].
//!
//! Every family is a variant of [`Membership`] carrying its already validated parameters.
//! Constructors check their preconditions and fail with [`FuzzyError::Configuration`];
//! [`Membership::evaluate`] never fails and stays within [0,1] for finite inputs.
//!
//! Vocabulary used for the parameters: the interval with m == 1 (or its stand-in `core_m`)
//! is the core, the interval with m == 0 (or `unsupported_m`) is unsupported.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::combinators::Combinator;
use crate::error::{configuration, FuzzyError, Result};
use crate::math::interp;
use crate::set::Set;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum Membership {
    /// Identity, mostly useful for poking at combinators
    Noop,
    Constant {
        c: f64,
    },
    Linear {
        m: f64,
        b: f64,
    },
    Rectangular {
        low: f64,
        high: f64,
        core_m: f64,
        unsupported_m: f64,
    },
    Triangular {
        low: f64,
        high: f64,
        c: f64,
        core_m: f64,
        unsupported_m: f64,
    },
    Trapezoid {
        low: f64,
        c_low: f64,
        c_high: f64,
        high: f64,
        core_m: f64,
        unsupported_m: f64,
    },
    BoundedLinear {
        low: f64,
        high: f64,
        core_m: f64,
        unsupported_m: f64,
        inverse: bool,
    },
    #[serde(rename = "R")]
    R {
        low: f64,
        high: f64,
    },
    #[serde(rename = "S")]
    S {
        low: f64,
        high: f64,
    },
    Sigmoid {
        #[serde(rename = "L")]
        l: f64,
        k: f64,
        x0: f64,
    },
    BoundedSigmoid {
        low: f64,
        high: f64,
        inverse: bool,
    },
    SimpleSigmoid {
        k: f64,
    },
    TriangularSigmoid {
        low: f64,
        high: f64,
        c: f64,
    },
    Gauss {
        c: f64,
        b: f64,
        c_m: f64,
    },
    BoundedExponential {
        k: f64,
        limit: f64,
    },
    Singleton {
        c: f64,
        no_m: f64,
        c_m: f64,
    },
    /// Linear interpolation between `(x, m)` breakpoints, flat beyond the ends
    Piecewise {
        points: Vec<(f64, f64)>,
    },
    Inv {
        func: Box<Membership>,
    },
    Alpha {
        floor: f64,
        ceiling: f64,
        floor_clip: f64,
        ceiling_clip: f64,
        func: Box<Membership>,
    },
    Normalize {
        height: f64,
        func: Box<Membership>,
    },
    Moderate {
        func: Box<Membership>,
    },
    Power {
        exponent: f64,
        func: Box<Membership>,
    },
    /// Contrast intensification: squash below 0.5, boost above
    Intensify {
        func: Box<Membership>,
    },
    Combination {
        op: Combinator,
        operands: Vec<Membership>,
    },
}

fn ensure(cond: bool, msg: impl FnOnce() -> String) -> Result<()> {
    if cond {
        Ok(())
    } else {
        Err(FuzzyError::Configuration(msg()))
    }
}

fn ensure_heights(core_m: f64, unsupported_m: f64, strict: bool) -> Result<()> {
    let ordered = if strict { unsupported_m < core_m } else { unsupported_m <= core_m };

    ensure(0. <= unsupported_m && ordered && core_m <= 1., || {
        format!("need 0 <= unsupported_m {} core_m <= 1, got {unsupported_m} and {core_m}", if strict { "<" } else { "<=" })
    })
}

fn ensure_bounds(low: f64, high: f64) -> Result<()> {
    ensure(low < high, || format!("low must be less than high, got {low} and {high}"))
}

fn ensure_peak(low: f64, c: f64, high: f64) -> Result<()> {
    ensure(low < c && c < high, || format!("peak {c} must be strictly between {low} and {high}"))
}

fn bounded_linear_at(x: f64, low: f64, high: f64, core_m: f64, unsupported_m: f64, inverse: bool) -> f64 {
    let (c_m, no_m) = if inverse { (unsupported_m, core_m) } else { (core_m, unsupported_m) };
    let midpoint = (c_m + no_m) / 2.;

    // special cases: no slope at all, and a vertical one
    if c_m == no_m {
        return midpoint;
    }

    let gradient = (c_m - no_m) / (high - low);

    if gradient == 0. {
        return midpoint;
    }
    if !gradient.is_finite() {
        let asymptote = (high + low) / 2.;
        return if x < asymptote {
            no_m
        } else if x > asymptote {
            c_m
        } else {
            midpoint
        };
    }

    if x <= low {
        no_m
    } else if x >= high {
        c_m
    } else {
        (gradient * (x - low) + no_m).clamp(c_m.min(no_m), c_m.max(no_m))
    }
}

/// Ramp for the degenerate widths of R and S: `None` when the width is regular.
fn degenerate_ramp(x: f64, low: f64, high: f64, rising: bool) -> Option<f64> {
    let width = high - low;

    if width.is_infinite() {
        return Some(0.5);
    }
    if width != 0. {
        return None;
    }

    let m = if x < low {
        0.
    } else if x > low {
        1.
    } else {
        0.5
    };

    Some(if rising { m } else { 1. - m })
}

fn bounded_sigmoid_at(x: f64, low: f64, high: f64, inverse: bool) -> f64 {
    let (low, high) = if inverse { (high, low) } else { (low, high) };
    let k = (4. * 3f64.ln()) / (low - high);
    let p = if k.is_infinite() {
        // high - low underflowed to 0
        0.
    } else {
        let e = -k * low;
        if e.is_nan() {
            1.
        } else {
            e.exp()
        }
    };
    // e^(0 * inf) = 1 for both -inf and +inf
    let q = if (k.is_infinite() && x == 0.) || (k == 0. && x.is_infinite()) {
        1.
    } else {
        (x * k).exp()
    };
    // e^(inf) * e^(-inf) = 1
    let r = p * q;
    let r = if r.is_nan() { 1. } else { r };

    1. / (1. + 9. * r)
}

impl Membership {
    /// Degree of membership of `x`.
    pub fn evaluate(&self, x: f64) -> f64 {
        match self {
            Self::Noop => x,
            Self::Constant { c } => *c,
            Self::Linear { m, b } => {
                let y = if *m == 0. { *b } else { m * x + b };
                if y <= 0. {
                    0.
                } else if y >= 1. {
                    1.
                } else {
                    y
                }
            },
            Self::Rectangular {
                low,
                high,
                core_m,
                unsupported_m,
            } => {
                if x < *low || *high < x {
                    *unsupported_m
                } else {
                    *core_m
                }
            },
            Self::Triangular {
                low,
                high,
                c,
                core_m,
                unsupported_m,
            } => {
                if x <= *low || x >= *high {
                    *unsupported_m
                } else if x == *c {
                    *core_m
                } else if x < *c {
                    bounded_linear_at(x, *low, *c, *core_m, *unsupported_m, false)
                } else {
                    bounded_linear_at(x, *c, *high, *core_m, *unsupported_m, true)
                }
            },
            Self::Trapezoid {
                low,
                c_low,
                c_high,
                high,
                core_m,
                unsupported_m,
            } => {
                if x < *low || *high < x {
                    *unsupported_m
                } else if x < *c_low {
                    bounded_linear_at(x, *low, *c_low, *core_m, *unsupported_m, false)
                } else if x > *c_high {
                    bounded_linear_at(x, *c_high, *high, *core_m, *unsupported_m, true)
                } else {
                    *core_m
                }
            },
            Self::BoundedLinear {
                low,
                high,
                core_m,
                unsupported_m,
                inverse,
            } => bounded_linear_at(x, *low, *high, *core_m, *unsupported_m, *inverse),
            Self::R { low, high } => degenerate_ramp(x, *low, *high, true).unwrap_or_else(|| {
                if x < *low {
                    0.
                } else if x <= *high {
                    ((x - low) / (high - low)).clamp(0., 1.)
                } else {
                    1.
                }
            }),
            Self::S { low, high } => degenerate_ramp(x, *low, *high, false).unwrap_or_else(|| {
                if x <= *low {
                    1.
                } else if x < *high {
                    // factorized to avoid nan
                    (high / (high - low) - x / (high - low)).clamp(0., 1.)
                } else {
                    0.
                }
            }),
            Self::Sigmoid { l, k, x0 } => {
                let e = -k * (x - x0);
                // e^(0 * inf) = 1, overflow is fine: l / (1 + inf) == 0
                let o = if e.is_nan() { 1. } else { e.exp() };
                l / (1. + o)
            },
            Self::BoundedSigmoid { low, high, inverse } => bounded_sigmoid_at(x, *low, *high, *inverse),
            Self::SimpleSigmoid { k } => {
                if x.is_infinite() && *k == 0. {
                    0.5
                } else {
                    1. / (1. + (x * -k).exp())
                }
            },
            Self::TriangularSigmoid { low, high, c } => {
                if x <= *c {
                    bounded_sigmoid_at(x, *low, *c, false)
                } else {
                    1. - bounded_sigmoid_at(x, *c, *high, false)
                }
            },
            Self::Gauss { c, b, c_m } => c_m * (-b * (x - c).powi(2)).exp(),
            Self::BoundedExponential { k, limit } => limit - limit / (k * x).exp(),
            Self::Singleton { c, no_m, c_m } => {
                if x == *c {
                    *c_m
                } else {
                    *no_m
                }
            },
            Self::Piecewise { points } => interp(x, points),
            Self::Inv { func } => 1. - func.evaluate(x),
            Self::Alpha {
                floor,
                ceiling,
                floor_clip,
                ceiling_clip,
                func,
            } => {
                let m = func.evaluate(x);
                if m >= *ceiling {
                    *ceiling_clip
                } else if m <= *floor {
                    *floor_clip
                } else {
                    m
                }
            },
            Self::Normalize { height, func } => (func.evaluate(x) / height).min(1.),
            Self::Moderate { func } => 0.5 + 4. * (func.evaluate(x) - 0.5).powi(3),
            Self::Power { exponent, func } => func.evaluate(x).powf(*exponent),
            Self::Intensify { func } => {
                let m = func.evaluate(x);
                if m < 0.5 {
                    2. * m.powi(2)
                } else {
                    1. - 2. * (1. - m).powi(2)
                }
            },
            Self::Combination { op, operands } => op.reduce(operands.iter().map(|f| f.evaluate(x))),
        }
    }

    /// Checks the parameters of this function and everything it is built from.
    ///
    /// Constructors call this before handing out a value; deserialized functions
    /// must go through it as well.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Noop => Ok(()),
            Self::Constant { c } => ensure((0. ..=1.).contains(c), || format!("constant {c} is not within [0, 1]")),
            Self::Linear { m, b } => ensure(m.is_finite() && b.is_finite(), || format!("linear({m}, {b}) must be finite")),
            Self::Rectangular {
                low,
                high,
                core_m,
                unsupported_m,
            } => {
                ensure_bounds(*low, *high)?;
                ensure_heights(*core_m, *unsupported_m, false)
            },
            Self::Triangular {
                low,
                high,
                c,
                core_m,
                unsupported_m,
            } => {
                ensure_bounds(*low, *high)?;
                ensure_peak(*low, *c, *high)?;
                ensure_heights(*core_m, *unsupported_m, true)
            },
            Self::Trapezoid {
                low,
                c_low,
                c_high,
                high,
                core_m,
                unsupported_m,
            } => {
                ensure(low < c_low && c_low <= c_high && c_high < high, || {
                    format!("need low < c_low <= c_high < high, got {low}, {c_low}, {c_high}, {high}")
                })?;
                ensure_heights(*core_m, *unsupported_m, true)
            },
            Self::BoundedLinear {
                low,
                high,
                core_m,
                unsupported_m,
                ..
            } => {
                ensure(low <= high, || format!("low must not exceed high, got {low} and {high}"))?;
                ensure_heights(*core_m, *unsupported_m, false)
            },
            Self::R { low, high } | Self::S { low, high } => {
                ensure(low <= high, || format!("low must not exceed high, got {low} and {high}"))
            },
            Self::Sigmoid { l, k, x0 } => {
                ensure(0. < *l && *l <= 1., || format!("L must be within (0, 1], got {l}"))?;
                ensure(!k.is_nan() && !x0.is_nan(), || "sigmoid parameters must not be NaN".to_owned())
            },
            Self::BoundedSigmoid { low, high, .. } => ensure_bounds(*low, *high),
            Self::SimpleSigmoid { k } => ensure(!k.is_nan(), || "steepness must not be NaN".to_owned()),
            Self::TriangularSigmoid { low, high, c } => {
                ensure_bounds(*low, *high)?;
                ensure_peak(*low, *c, *high)
            },
            Self::Gauss { c, b, c_m } => {
                ensure(!c.is_nan(), || "center must not be NaN".to_owned())?;
                ensure(*b > 0., || format!("b must be greater than 0, got {b}"))?;
                ensure(0. < *c_m && *c_m <= 1., || format!("c_m must be within (0, 1], got {c_m}"))
            },
            Self::BoundedExponential { k, limit } => {
                ensure(*k > 0., || format!("k must be greater than 0, got {k}"))?;
                ensure(0. < *limit && *limit <= 1., || format!("limit must be within (0, 1], got {limit}"))
            },
            Self::Singleton { c, no_m, c_m } => {
                ensure(!c.is_nan(), || "singleton location must not be NaN".to_owned())?;
                ensure(0. <= *no_m && no_m < c_m && *c_m <= 1., || {
                    format!("need 0 <= no_m < c_m <= 1, got {no_m} and {c_m}")
                })
            },
            Self::Piecewise { points } => {
                ensure(points.len() >= 2, || "piecewise needs at least two points".to_owned())?;
                ensure(points.windows(2).all(|w| w[0].0 < w[1].0), || {
                    "piecewise x coordinates must be strictly increasing".to_owned()
                })?;
                ensure(points.iter().all(|(_, m)| (0. ..=1.).contains(m)), || {
                    "piecewise memberships must be within [0, 1]".to_owned()
                })
            },
            Self::Inv { func } | Self::Moderate { func } | Self::Intensify { func } => func.validate(),
            Self::Alpha {
                floor,
                ceiling,
                floor_clip,
                ceiling_clip,
                func,
            } => {
                ensure(0. <= *floor && floor <= ceiling && *ceiling <= 1., || {
                    format!("need 0 <= floor <= ceiling <= 1, got {floor} and {ceiling}")
                })?;
                ensure(
                    (0. ..=1.).contains(floor_clip) && (0. ..=1.).contains(ceiling_clip),
                    || format!("clip values {floor_clip} and {ceiling_clip} must be within [0, 1]"),
                )?;
                func.validate()
            },
            Self::Normalize { height, func } => {
                ensure(0. < *height && *height <= 1., || format!("height must be within (0, 1], got {height}"))?;
                func.validate()
            },
            Self::Power { exponent, func } => {
                ensure(exponent.is_finite() && *exponent >= 0., || {
                    format!("exponent must be finite and non-negative, got {exponent}")
                })?;
                func.validate()
            },
            Self::Combination { op, operands } => {
                op.validate(operands.len())?;
                operands.iter().try_for_each(Membership::validate)
            },
        }
    }

    fn checked(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }

    /// Name of the family as used by [`Membership::from_parameters`] and in configs.
    pub fn family(&self) -> &'static str {
        match self {
            Self::Noop => "noop",
            Self::Constant { .. } => "constant",
            Self::Linear { .. } => "linear",
            Self::Rectangular { .. } => "rectangular",
            Self::Triangular { .. } => "triangular",
            Self::Trapezoid { .. } => "trapezoid",
            Self::BoundedLinear { .. } => "bounded_linear",
            Self::R { .. } => "R",
            Self::S { .. } => "S",
            Self::Sigmoid { .. } => "sigmoid",
            Self::BoundedSigmoid { .. } => "bounded_sigmoid",
            Self::SimpleSigmoid { .. } => "simple_sigmoid",
            Self::TriangularSigmoid { .. } => "triangular_sigmoid",
            Self::Gauss { .. } => "gauss",
            Self::BoundedExponential { .. } => "bounded_exponential",
            Self::Singleton { .. } => "singleton",
            Self::Piecewise { .. } => "piecewise",
            Self::Inv { .. } => "inv",
            Self::Alpha { .. } => "alpha",
            Self::Normalize { .. } => "normalize",
            Self::Moderate { .. } => "moderate",
            Self::Power { .. } => "power",
            Self::Intensify { .. } => "intensify",
            Self::Combination { .. } => "combination",
        }
    }

    /// Positional parameters of a leaf family, `None` for composite ones.
    ///
    /// Booleans are encoded as 0 or 1.
    pub fn parameters(&self) -> Option<Vec<f64>> {
        let flag = |b: bool| if b { 1. } else { 0. };

        Some(match *self {
            Self::Noop => vec![],
            Self::Constant { c } => vec![c],
            Self::Linear { m, b } => vec![m, b],
            Self::Rectangular {
                low,
                high,
                core_m,
                unsupported_m,
            } => vec![low, high, core_m, unsupported_m],
            Self::Triangular {
                low,
                high,
                c,
                core_m,
                unsupported_m,
            } => vec![low, high, c, core_m, unsupported_m],
            Self::Trapezoid {
                low,
                c_low,
                c_high,
                high,
                core_m,
                unsupported_m,
            } => vec![low, c_low, c_high, high, core_m, unsupported_m],
            Self::BoundedLinear {
                low,
                high,
                core_m,
                unsupported_m,
                inverse,
            } => vec![low, high, core_m, unsupported_m, flag(inverse)],
            Self::R { low, high } | Self::S { low, high } => vec![low, high],
            Self::Sigmoid { l, k, x0 } => vec![l, k, x0],
            Self::BoundedSigmoid { low, high, inverse } => vec![low, high, flag(inverse)],
            Self::SimpleSigmoid { k } => vec![k],
            Self::TriangularSigmoid { low, high, c } => vec![low, high, c],
            Self::Gauss { c, b, c_m } => vec![c, b, c_m],
            Self::BoundedExponential { k, limit } => vec![k, limit],
            Self::Singleton { c, no_m, c_m } => vec![c, no_m, c_m],
            _ => return None,
        })
    }

    /// Rebuilds a leaf family from its name and positional parameters, see [`Membership::parameters`].
    pub fn from_parameters(family: &str, params: &[f64]) -> Result<Self> {
        let arity = |n: usize| {
            ensure(params.len() == n, || format!("{family} takes {n} parameters, got {}", params.len()))
        };
        let flag = |v: f64| v != 0.;

        match family {
            "noop" => arity(0).map(|_| noop()),
            "constant" => arity(1).and_then(|_| constant(params[0])),
            "linear" => arity(2).and_then(|_| linear(params[0], params[1])),
            "rectangular" => arity(4).and_then(|_| rectangular(params[0], params[1], params[2], params[3])),
            "triangular" => {
                arity(5).and_then(|_| triangular(params[0], params[1], params[2], params[3], params[4]))
            },
            "trapezoid" => arity(6)
                .and_then(|_| trapezoid(params[0], params[1], params[2], params[3], params[4], params[5])),
            "bounded_linear" => arity(5).and_then(|_| {
                bounded_linear(params[0], params[1], params[2], params[3], flag(params[4]))
            }),
            "R" => arity(2).and_then(|_| R(params[0], params[1])),
            "S" => arity(2).and_then(|_| S(params[0], params[1])),
            "sigmoid" => arity(3).and_then(|_| sigmoid(params[0], params[1], params[2])),
            "bounded_sigmoid" => arity(3).and_then(|_| bounded_sigmoid(params[0], params[1], flag(params[2]))),
            "simple_sigmoid" => arity(1).and_then(|_| simple_sigmoid(params[0])),
            "triangular_sigmoid" => arity(3).and_then(|_| triangular_sigmoid(params[0], params[1], params[2])),
            "gauss" => arity(3).and_then(|_| gauss(params[0], params[1], params[2])),
            "bounded_exponential" => arity(2).and_then(|_| bounded_exponential(params[0], params[1])),
            "singleton" => arity(3).and_then(|_| {
                Self::Singleton {
                    c: params[0],
                    no_m: params[1],
                    c_m: params[2],
                }
                .checked()
            }),
            _ => Err(configuration(format!("unknown membership family {family}"))),
        }
    }
}

impl fmt::Display for Membership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(params) = self.parameters() {
            let params: Vec<_> = params.iter().map(f64::to_string).collect();
            return write!(f, "{}({})", self.family(), params.join(", "));
        }

        match self {
            Self::Piecewise { points } => write!(f, "piecewise({points:?})"),
            Self::Inv { func } | Self::Moderate { func } | Self::Intensify { func } => {
                write!(f, "{}({func})", self.family())
            },
            Self::Alpha {
                floor, ceiling, func, ..
            } => write!(f, "alpha({floor}, {ceiling}, {func})"),
            Self::Normalize { height, func } => write!(f, "normalize({height}, {func})"),
            Self::Power { exponent, func } => write!(f, "({func})^{exponent}"),
            Self::Combination { op, operands } => {
                let operands: Vec<_> = operands.iter().map(Membership::to_string).collect();
                write!(f, "{}({})", op.name(), operands.join(", "))
            },
            // leaves are handled above
            _ => write!(f, "{}", self.family()),
        }
    }
}

/// Return the value as is.
pub fn noop() -> Membership {
    Membership::Noop
}

/// Always the same value, no matter the input.
pub fn constant(c: f64) -> Result<Membership> {
    Membership::Constant { c }.checked()
}

/// `m * x + b`, clipped to [0,1].
pub fn linear(m: f64, b: f64) -> Result<Membership> {
    Membership::Linear { m, b }.checked()
}

/// `core_m` within `[low, high]`, `unsupported_m` elsewhere.
pub fn rectangular(low: f64, high: f64, core_m: f64, unsupported_m: f64) -> Result<Membership> {
    Membership::Rectangular {
        low,
        high,
        core_m,
        unsupported_m,
    }
    .checked()
}

/// Rises from `low` to a peak at `c` (midpoint of the bounds if not given) and falls to `high`.
pub fn triangular(
    low: f64,
    high: f64,
    c: impl Into<Option<f64>>,
    core_m: f64,
    unsupported_m: f64,
) -> Result<Membership> {
    let c = c.into().unwrap_or((low + high) / 2.);

    Membership::Triangular {
        low,
        high,
        c,
        core_m,
        unsupported_m,
    }
    .checked()
}

/// Rises from `low` to `c_low`, holds `core_m` until `c_high` and falls to `high`.
pub fn trapezoid(
    low: f64,
    c_low: f64,
    c_high: f64,
    high: f64,
    core_m: f64,
    unsupported_m: f64,
) -> Result<Membership> {
    Membership::Trapezoid {
        low,
        c_low,
        c_high,
        high,
        core_m,
        unsupported_m,
    }
    .checked()
}

/// General ramp from `unsupported_m` at `low` to `core_m` at `high` (the other way round if `inverse`).
///
/// Stays total for degenerate slopes: equal heights or an infinitely wide ramp give the
/// constant midpoint, `low == high` gives a step centred on the asymptote that returns the
/// midpoint exactly at the asymptote.
pub fn bounded_linear(low: f64, high: f64, core_m: f64, unsupported_m: f64, inverse: bool) -> Result<Membership> {
    Membership::BoundedLinear {
        low,
        high,
        core_m,
        unsupported_m,
        inverse,
    }
    .checked()
}

/// Ramp rising from 0 at `low` to 1 at `high`. Use [`S`] for a falling one.
#[allow(non_snake_case)]
pub fn R(low: f64, high: f64) -> Result<Membership> {
    Membership::R { low, high }.checked()
}

/// Ramp falling from 1 at `low` to 0 at `high`. Use [`R`] for a rising one.
#[allow(non_snake_case)]
pub fn S(low: f64, high: f64) -> Result<Membership> {
    Membership::S { low, high }.checked()
}

/// Logistic function `L / (1 + e^(-k * (x - x0)))`.
pub fn sigmoid(l: f64, k: f64, x0: f64) -> Result<Membership> {
    Membership::Sigmoid { l, k, x0 }.checked()
}

/// Logistic function with f(low) == 0.1 and f(high) == 0.9.
pub fn bounded_sigmoid(low: f64, high: f64, inverse: bool) -> Result<Membership> {
    Membership::BoundedSigmoid { low, high, inverse }.checked()
}

/// Sigmoid with its midpoint at 0 and only a steepness. The default steepness used to be 0.229756.
pub fn simple_sigmoid(k: f64) -> Result<Membership> {
    Membership::SimpleSigmoid { k }.checked()
}

/// Triangular made of two bounded sigmoids, peaks at 0.9.
pub fn triangular_sigmoid(low: f64, high: f64, c: impl Into<Option<f64>>) -> Result<Membership> {
    let c = c.into().unwrap_or((low + high) / 2.);

    Membership::TriangularSigmoid { low, high, c }.checked()
}

/// `c_m * e^(-b * (x - c)^2)`
pub fn gauss(c: f64, b: f64, c_m: f64) -> Result<Membership> {
    Membership::Gauss { c, b, c_m }.checked()
}

/// Goes through the origin and approaches `limit`: `limit - limit / e^(k * x)`.
///
/// Only meaningful for `x >= 0`, which is not checked.
pub fn bounded_exponential(k: f64, limit: f64) -> Result<Membership> {
    Membership::BoundedExponential { k, limit }.checked()
}

/// A single spike of `c_m` at exactly `c`, `no_m` everywhere else.
///
/// Returns a [`Set`] rather than a bare function: sampling and the center of gravity of a
/// spike need special treatment, see [`Set::center_of_gravity`].
pub fn singleton(c: f64, no_m: f64, c_m: f64) -> Result<Set> {
    let func = Membership::Singleton { c, no_m, c_m }.checked()?;

    Ok(Set::new(func))
}

/// Linear interpolation between `(x, membership)` points, flat beyond the first and last.
pub fn piecewise(points: impl IntoIterator<Item = (f64, f64)>) -> Result<Membership> {
    Membership::Piecewise {
        points: points.into_iter().collect(),
    }
    .checked()
}

/// Complement within the unit interval.
pub fn inv(func: Membership) -> Membership {
    Membership::Inv { func: Box::new(func) }
}

/// Clip a function's values: at or above `ceiling` it yields `ceiling_clip`, at or below
/// `floor` it yields `floor_clip`. The clips default to the thresholds themselves.
pub fn alpha(
    floor: f64,
    ceiling: f64,
    func: Membership,
    floor_clip: impl Into<Option<f64>>,
    ceiling_clip: impl Into<Option<f64>>,
) -> Result<Membership> {
    Membership::Alpha {
        floor,
        ceiling,
        floor_clip: floor_clip.into().unwrap_or(floor),
        ceiling_clip: ceiling_clip.into().unwrap_or(ceiling),
        func: Box::new(func),
    }
    .checked()
}

/// Rescale so that a function peaking at `height` peaks at 1.
pub fn normalize(height: f64, func: Membership) -> Result<Membership> {
    Membership::Normalize {
        height,
        func: Box::new(func),
    }
    .checked()
}

/// Pull values towards 0.5 to dampen extremes.
pub fn moderate(func: Membership) -> Membership {
    Membership::Moderate { func: Box::new(func) }
}

/// Pointwise power, the building block of hedges.
pub fn power(func: Membership, exponent: f64) -> Result<Membership> {
    Membership::Power {
        exponent,
        func: Box::new(func),
    }
    .checked()
}

/// Push values above 0.5 towards 1 and values below it towards 0.
pub fn intensify(func: Membership) -> Membership {
    Membership::Intensify { func: Box::new(func) }
}

#[cfg(test)]
fn assert_close(got: f64, want: f64) {
    assert!((got - want).abs() < 1e-9, "{got} != {want}");
}

#[test]
fn test_linear_clipping() {
    let f = linear(1., -1.).unwrap();

    assert_eq!(f.evaluate(-2.), 0.);
    assert_eq!(f.evaluate(0.), 0.);
    assert_eq!(f.evaluate(1.), 0.);
    assert_eq!(f.evaluate(1.5), 0.5);
    assert_eq!(f.evaluate(2.), 1.);
    assert_eq!(f.evaluate(3.), 1.);
    assert_eq!(linear(0., 0.5).unwrap().evaluate(f64::INFINITY), 0.5);
}

#[test]
fn test_bounded_linear() {
    let f = bounded_linear(2., 3., 1., 0., false).unwrap();

    assert_eq!(f.evaluate(1.), 0.);
    assert_eq!(f.evaluate(2.), 0.);
    assert_eq!(f.evaluate(2.5), 0.5);
    assert_eq!(f.evaluate(3.), 1.);
    assert_eq!(f.evaluate(4.), 1.);

    let f = bounded_linear(2., 3., 1., 0., true).unwrap();

    assert_eq!(f.evaluate(2.), 1.);
    assert_eq!(f.evaluate(3.), 0.);
}

#[test]
fn test_bounded_linear_degenerate() {
    // zero slope
    let flat = bounded_linear(0., 10., 0.6, 0.6, false).unwrap();
    assert_eq!(flat.evaluate(-5.), 0.6);
    let wide = bounded_linear(f64::MIN, f64::MAX, 1., 0., false).unwrap();
    assert_eq!(wide.evaluate(0.), 0.5);

    // vertical slope
    let step = bounded_linear(5., 5., 1., 0., false).unwrap();
    assert_eq!(step.evaluate(4.999), 0.);
    assert_eq!(step.evaluate(5.), 0.5);
    assert_eq!(step.evaluate(5.001), 1.);

    let step = bounded_linear(5., 5., 0.8, 0.2, true).unwrap();
    assert_eq!(step.evaluate(4.), 0.8);
    assert_eq!(step.evaluate(6.), 0.2);
}

#[test]
fn test_bounded_linear_rejects() {
    assert!(bounded_linear(3., 2., 1., 0., false).is_err());
    assert!(bounded_linear(2., 3., 0., 1., false).is_err());
    assert!(bounded_linear(f64::NAN, 3., 1., 0., false).is_err());
}

#[test]
fn test_r_and_s() {
    let r = R(10., 30.).unwrap();
    let s = S(0., 15.).unwrap();

    assert_eq!(r.evaluate(6.), 0.);
    assert_eq!(r.evaluate(20.), 0.5);
    assert_eq!(r.evaluate(31.), 1.);
    assert_eq!(s.evaluate(6.), 0.6);
    assert_eq!(s.evaluate(-1.), 1.);
    assert_eq!(s.evaluate(15.), 0.);

    let r = R(1., 1.).unwrap();
    assert_eq!(r.evaluate(1.), 0.5);
    assert_eq!(r.evaluate(2.), 1.);
    let s = S(1., 1.).unwrap();
    assert_eq!(s.evaluate(0.), 1.);
    assert_eq!(s.evaluate(2.), 0.);
    assert!(R(2., 1.).is_err());
}

#[test]
fn test_rectangular_triangular_trapezoid() {
    let rect = rectangular(1., 2., 0.9, 0.1).unwrap();
    assert_eq!(rect.evaluate(0.), 0.1);
    assert_eq!(rect.evaluate(1.5), 0.9);

    let tri = triangular(0., 10., None, 1., 0.).unwrap();
    assert_eq!(tri.evaluate(0.), 0.);
    assert_eq!(tri.evaluate(2.5), 0.5);
    assert_eq!(tri.evaluate(5.), 1.);
    assert_eq!(tri.evaluate(7.5), 0.5);
    assert_eq!(tri.evaluate(11.), 0.);
    assert!(triangular(0., 10., 10., 1., 0.).is_err());

    // slopes too wide to represent
    let wide = triangular(-1e308, 1.7e308, 1e308, 1., 0.).unwrap();
    for x in [-9e307, 0., 9e307, 1.5e308] {
        assert!((0. ..=1.).contains(&wide.evaluate(x)), "{} at {x}", wide.evaluate(x));
    }

    let trap = trapezoid(-0.5, 0., 0., 0.5, 1., 0.).unwrap();
    assert_eq!(trap.evaluate(-0.5), 0.);
    assert_eq!(trap.evaluate(-0.25), 0.5);
    assert_eq!(trap.evaluate(0.), 1.);
    assert_eq!(trap.evaluate(0.25), 0.5);
    assert_eq!(trap.evaluate(0.6), 0.);
    assert!(trapezoid(0., 2., 1., 3., 1., 0.).is_err());
}

#[test]
fn test_sigmoids() {
    let f = bounded_sigmoid(0., 1., false).unwrap();
    assert_close(f.evaluate(0.), 0.1);
    assert_close(f.evaluate(1.), 0.9);
    assert_close(f.evaluate(100_000.), 1.);
    assert_close(f.evaluate(-100_000.), 0.);
    let inverse = bounded_sigmoid(0., 1., true).unwrap();
    assert_close(inverse.evaluate(0.), 0.9);

    let f = simple_sigmoid(0.229756).unwrap();
    assert_close(f.evaluate(-1000.), 0.);
    assert_eq!(f.evaluate(0.), 0.5);
    assert_close(f.evaluate(1000.), 1.);
    assert_eq!((f.evaluate(-20.) * 100.).round() / 100., 0.01);
    assert_eq!((f.evaluate(20.) * 100.).round() / 100., 0.99);
    assert_eq!(simple_sigmoid(0.).unwrap().evaluate(f64::INFINITY), 0.5);

    let f = sigmoid(1., 1., 0.).unwrap();
    assert_eq!(f.evaluate(0.), 0.5);
    assert_eq!(f.evaluate(-1e6), 0.);
    // 0 * inf in the exponent counts as e^0
    assert_eq!(sigmoid(1., 0., 0.).unwrap().evaluate(f64::INFINITY), 0.5);
    assert!(sigmoid(0., 1., 0.).is_err());

    let g = triangular_sigmoid(2., 4., None).unwrap();
    assert_close(g.evaluate(2.), 0.1);
    assert_close(g.evaluate(3.), 0.9);
}

#[test]
fn test_gauss_and_exponential() {
    let g = gauss(5., 1., 1.).unwrap();
    assert_eq!(g.evaluate(5.), 1.);
    assert_eq!(g.evaluate(f64::MAX), 0.);
    assert!(gauss(0., 0., 1.).is_err());

    let e = bounded_exponential(0.1, 1.).unwrap();
    assert_eq!(e.evaluate(0.), 0.);
    assert_eq!(e.evaluate(1e6), 1.);
}

#[test]
fn test_modifiers() {
    let f = rectangular(0., 1., 0.8, 0.).unwrap();

    assert_eq!(inv(f.clone()).evaluate(0.5), 1. - 0.8);
    assert_eq!(normalize(0.8, f.clone()).unwrap().evaluate(0.5), 1.);
    assert_eq!(moderate(constant(0.5).unwrap()).evaluate(0.), 0.5);
    assert_eq!(moderate(constant(1.).unwrap()).evaluate(0.), 1.);

    let clipped = alpha(0.2, 0.7, f.clone(), None, None).unwrap();
    assert_eq!(clipped.evaluate(0.5), 0.7);
    assert_eq!(clipped.evaluate(2.), 0.2);
    let remapped = alpha(0.2, 0.7, f, 0., 1.).unwrap();
    assert_eq!(remapped.evaluate(0.5), 1.);
    assert_eq!(remapped.evaluate(2.), 0.);
    assert!(alpha(0.8, 0.7, noop(), None, None).is_err());
    assert!(normalize(0., noop()).is_err());
}

#[test]
fn test_piecewise() {
    let f = piecewise([(175., 0.), (180., 0.2), (185., 0.7), (190., 1.)]).unwrap();

    assert_eq!(f.evaluate(170.), 0.);
    assert_close(f.evaluate(182.5), 0.45);
    assert_eq!(f.evaluate(195.), 1.);
    assert!(piecewise([(1., 0.), (1., 1.)]).is_err());
}

#[test]
fn test_introspection() {
    let f = trapezoid(0., 1., 2., 3., 1., 0.).unwrap();

    assert_eq!(f.family(), "trapezoid");
    let params = f.parameters().unwrap();
    assert_eq!(Membership::from_parameters(f.family(), &params).unwrap(), f);
    assert_eq!(f.to_string(), "trapezoid(0, 1, 2, 3, 1, 0)");
    assert!(inv(f).parameters().is_none());
    assert!(Membership::from_parameters("trapezoid", &[1.]).is_err());
    assert!(Membership::from_parameters("wobbly", &[]).is_err());
}
