#![forbid(unsafe_code)]

//! Timing curves for CSS transitions.
//!
//! An [`Easing`] is both something the headless host can evaluate (to know
//! where an element is mid-flight) and something a real host can hand to the
//! browser verbatim via [`Easing::to_css`].
//!
//! # Invariants
//!
//! - `apply(0.0) == 0.0` and `apply(1.0) == 1.0` for every curve.
//! - Inputs outside [0.0, 1.0] are clamped.

use std::fmt;

/// Timing function of a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    /// Constant velocity.
    Linear,
    /// `cubic-bezier(x1, y1, x2, y2)` with endpoints fixed at (0,0) and (1,1).
    CubicBezier(f64, f64, f64, f64),
}

/// The deceleration curve used by edge UI and pane resize transitions.
pub const EDGE_UI: Easing = Easing::CubicBezier(0.1, 0.9, 0.2, 1.0);

impl Default for Easing {
    fn default() -> Self {
        EDGE_UI
    }
}

impl Easing {
    /// Evaluate the curve at progress `t`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::CubicBezier(x1, y1, x2, y2) => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let s = solve_parameter(t, x1, x2);
                bezier(s, y1, y2)
            }
        }
    }

    /// Render as a CSS `<easing-function>`.
    pub fn to_css(self) -> String {
        self.to_string()
    }

    /// Parse a CSS `<easing-function>`. Only `linear` and `cubic-bezier()` are
    /// recognized.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s == "linear" {
            return Some(Self::Linear);
        }
        let inner = s.strip_prefix("cubic-bezier(")?.strip_suffix(')')?;
        let mut parts = inner.split(',').map(|p| p.trim().parse::<f64>());
        let x1 = parts.next()?.ok()?;
        let y1 = parts.next()?.ok()?;
        let x2 = parts.next()?.ok()?;
        let y2 = parts.next()?.ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self::CubicBezier(x1, y1, x2, y2))
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("linear"),
            Self::CubicBezier(x1, y1, x2, y2) => {
                write!(f, "cubic-bezier({x1}, {y1}, {x2}, {y2})")
            }
        }
    }
}

/// One coordinate of a cubic Bézier with fixed endpoints 0 and 1.
#[inline]
fn bezier(s: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

#[inline]
fn bezier_slope(s: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Find the curve parameter whose x coordinate equals `x`.
///
/// Newton iterations first, bisection as a fallback for flat slopes.
fn solve_parameter(x: f64, x1: f64, x2: f64) -> f64 {
    let mut s = x;
    for _ in 0..8 {
        let err = bezier(s, x1, x2) - x;
        if err.abs() < 1e-7 {
            return s;
        }
        let slope = bezier_slope(s, x1, x2);
        if slope.abs() < 1e-6 {
            break;
        }
        s = (s - err / slope).clamp(0.0, 1.0);
    }

    let (mut lo, mut hi) = (0.0, 1.0);
    s = x;
    for _ in 0..64 {
        let value = bezier(s, x1, x2);
        if (value - x).abs() < 1e-7 {
            break;
        }
        if value < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    s
}
