//! Easing functions for animations

use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CadenceError;

/// Easing function type
#[derive(Clone, Copy, Debug, Default)]
pub enum Easing {
    #[default]
    Linear,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInQuint,
    EaseOutQuint,
    EaseInOutQuint,
    CubicBezier(f32, f32, f32, f32),
    /// Caller supplied curve
    Custom(fn(f32) -> f32),
}

/// Named curves, in the order the CLI lists them
pub const NAMED: &[(&str, Easing)] = &[
    ("linear", Easing::Linear),
    ("easeInSine", Easing::EaseInSine),
    ("easeOutSine", Easing::EaseOutSine),
    ("easeInOutSine", Easing::EaseInOutSine),
    ("easeInQuad", Easing::EaseInQuad),
    ("easeOutQuad", Easing::EaseOutQuad),
    ("easeInOutQuad", Easing::EaseInOutQuad),
    ("easeInCubic", Easing::EaseInCubic),
    ("easeOutCubic", Easing::EaseOutCubic),
    ("easeInOutCubic", Easing::EaseInOutCubic),
    ("easeInQuart", Easing::EaseInQuart),
    ("easeOutQuart", Easing::EaseOutQuart),
    ("easeInOutQuart", Easing::EaseInOutQuart),
    ("easeInQuint", Easing::EaseInQuint),
    ("easeOutQuint", Easing::EaseOutQuint),
    ("easeInOutQuint", Easing::EaseInOutQuint),
];

/// CSS keyword curves
const CSS_KEYWORDS: &[(&str, Easing)] = &[
    ("ease", Easing::CubicBezier(0.25, 0.1, 0.25, 1.0)),
    ("easein", Easing::CubicBezier(0.42, 0.0, 1.0, 1.0)),
    ("easeout", Easing::CubicBezier(0.0, 0.0, 0.58, 1.0)),
    ("easeinout", Easing::CubicBezier(0.42, 0.0, 0.58, 1.0)),
];

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    ///
    /// Polynomial curves are not clamped and extrapolate outside `0..=1`.
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseInSine => 1.0 - (t * PI / 2.0).cos(),
            Easing::EaseOutSine => (t * PI / 2.0).sin(),
            Easing::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => t * (2.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => (t - 1.0).powi(3) + 1.0,
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    (t - 1.0) * (2.0 * t - 2.0) * (2.0 * t - 2.0) + 1.0
                }
            }
            Easing::EaseInQuart => t.powi(4),
            Easing::EaseOutQuart => 1.0 - (t - 1.0).powi(4),
            Easing::EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - 8.0 * (t - 1.0).powi(4)
                }
            }
            Easing::EaseInQuint => t.powi(5),
            Easing::EaseOutQuint => 1.0 + (t - 1.0).powi(5),
            Easing::EaseInOutQuint => {
                if t < 0.5 {
                    16.0 * t.powi(5)
                } else {
                    1.0 + 16.0 * (t - 1.0).powi(5)
                }
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier_ease(t, *x1, *y1, *x2, *y2),
            Easing::Custom(f) => f(t),
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::CubicBezier(x1, y1, x2, y2) => {
                write!(f, "cubic-bezier({x1}, {y1}, {x2}, {y2})")
            }
            Easing::Custom(_) => f.write_str("custom"),
            named => {
                let name = NAMED
                    .iter()
                    .find(|(_, e)| std::mem::discriminant(e) == std::mem::discriminant(named))
                    .map(|(name, _)| *name)
                    .unwrap_or("linear");
                f.write_str(name)
            }
        }
    }
}

impl FromStr for Easing {
    type Err = CadenceError;

    /// Accepts camelCase, kebab-case and snake_case names, the CSS keywords
    /// (`ease`, `ease-in`, ...) and `cubic-bezier(x1, y1, x2, y2)`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();

        for prefix in ["cubic-bezier(", "cubic_bezier(", "cubicbezier("] {
            if let Some(rest) = lower.strip_prefix(prefix) {
                return parse_bezier_args(s, rest);
            }
        }

        let key: String = lower.chars().filter(|c| *c != '-' && *c != '_').collect();

        NAMED
            .iter()
            .chain(CSS_KEYWORDS.iter())
            .find(|(name, _)| name.to_ascii_lowercase() == key)
            .map(|(_, easing)| *easing)
            .ok_or_else(|| CadenceError::UnknownEasing(s.to_string()))
    }
}

fn parse_bezier_args(original: &str, rest: &str) -> Result<Easing, CadenceError> {
    let invalid = || CadenceError::InvalidBezier(original.to_string());

    let args = rest.strip_suffix(')').ok_or_else(invalid)?;
    let values = args
        .split(',')
        .map(|part| part.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| invalid())?;

    match values.as_slice() {
        // x coordinates must stay inside the unit interval for the curve to be a function of time
        [x1, y1, x2, y2] if (0.0..=1.0).contains(x1) && (0.0..=1.0).contains(x2) => {
            Ok(Easing::CubicBezier(*x1, *y1, *x2, *y2))
        }
        _ => Err(invalid()),
    }
}

impl Serialize for Easing {
    /// `Custom` curves have no name to read back and are rejected
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Easing::Custom(_) => Err(serde::ser::Error::custom(
                "custom easing functions cannot be serialized",
            )),
            _ => serializer.collect_str(self),
        }
    }
}

impl<'de> Deserialize<'de> for Easing {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Cubic bezier easing calculation (matches CSS spec / browser implementations).
///
/// Newton-Raphson first, bisection when the slope flattens out.
fn cubic_bezier_ease(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let x = t as f64;
    let (x1, y1, x2, y2) = (x1 as f64, y1 as f64, x2 as f64, y2 as f64);

    let mut p = x;
    for _ in 0..8 {
        let err = bezier_sample(p, x1, x2) - x;
        if err.abs() < 1e-7 {
            return bezier_sample(p, y1, y2) as f32;
        }
        let slope = bezier_slope(p, x1, x2);
        if slope.abs() < 1e-7 {
            break;
        }
        p -= err / slope;
    }

    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    p = x;
    for _ in 0..20 {
        let val = bezier_sample(p, x1, x2);
        if (val - x).abs() < 1e-7 {
            break;
        }
        if val < x {
            lo = p;
        } else {
            hi = p;
        }
        p = (lo + hi) * 0.5;
    }

    bezier_sample(p, y1, y2) as f32
}

/// B(t) = 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³ in Horner form
#[inline]
fn bezier_sample(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

#[inline]
fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * t + 2.0 * b) * t + c
}
