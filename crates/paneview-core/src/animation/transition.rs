#![forbid(unsafe_code)]

//! Typed CSS transition declarations.
//!
//! The animator never builds style strings by hand: it describes the target
//! with [`Transform`] / [`AnimatedProperty`] and the timing with
//! [`TransitionSpec`], and renders them through `to_css`. Headless hosts parse
//! the same strings back to simulate the transition.

use std::fmt;
use std::time::Duration;

use super::Easing;
use crate::geometry::Axis;

/// A 2D transform restricted to what pane animations need.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Transform {
    /// No transform (`""`, the element's resting position).
    #[default]
    None,
    /// Translate along one axis by the given number of pixels.
    Translate(Axis, f64),
}

impl Transform {
    /// Render as a CSS `transform` value. [`Transform::None`] renders as the
    /// empty string, which removes the inline override.
    pub fn to_css(self) -> String {
        match self {
            Self::None => String::new(),
            Self::Translate(axis, px) => format!("{}({px}px)", axis.translate_fn()),
        }
    }

    /// Parse a `transform` value produced by [`Transform::to_css`].
    ///
    /// `none` and the empty string both map to [`Transform::None`].
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() || s == "none" {
            return Some(Self::None);
        }
        let (axis, rest) = if let Some(rest) = s.strip_prefix("translateX(") {
            (Axis::Horizontal, rest)
        } else if let Some(rest) = s.strip_prefix("translateY(") {
            (Axis::Vertical, rest)
        } else {
            return None;
        };
        let px = rest.strip_suffix(')')?.trim().strip_suffix("px")?;
        px.trim().parse().ok().map(|v| Self::Translate(axis, v))
    }

    /// Offset in pixels along `axis` (zero for other axes).
    pub fn offset_along(self, axis: Axis) -> f64 {
        match self {
            Self::Translate(a, px) if a == axis => px,
            _ => 0.0,
        }
    }
}

/// Which style property a transition animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionProperty {
    Transform,
    Opacity,
}

impl TransitionProperty {
    /// CSS property name.
    pub const fn css_name(self) -> &'static str {
        match self {
            Self::Transform => "transform",
            Self::Opacity => "opacity",
        }
    }

    fn from_css_name(s: &str) -> Option<Self> {
        match s {
            "transform" => Some(Self::Transform),
            "opacity" => Some(Self::Opacity),
            _ => None,
        }
    }
}

/// Target value of an animated property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimatedProperty {
    Transform(Transform),
    Opacity(f64),
}

impl AnimatedProperty {
    /// The property this value belongs to.
    pub const fn property(&self) -> TransitionProperty {
        match self {
            Self::Transform(_) => TransitionProperty::Transform,
            Self::Opacity(_) => TransitionProperty::Opacity,
        }
    }

    /// Render the value as CSS.
    pub fn to_css(&self) -> String {
        match self {
            Self::Transform(t) => t.to_css(),
            Self::Opacity(o) => format!("{o}"),
        }
    }

    /// Parse an inline value of `property`. An empty opacity is fully opaque.
    pub fn parse(property: TransitionProperty, s: &str) -> Option<Self> {
        match property {
            TransitionProperty::Transform => Transform::parse(s).map(Self::Transform),
            TransitionProperty::Opacity => {
                let s = s.trim();
                if s.is_empty() {
                    return Some(Self::Opacity(1.0));
                }
                s.parse().ok().map(Self::Opacity)
            }
        }
    }

    /// The value `progress` of the way from `self` to `to`.
    ///
    /// Returns `None` when the two values belong to different properties.
    /// Progress at or beyond `1.0` yields `to` exactly.
    pub fn lerp(self, to: Self, progress: f64) -> Option<Self> {
        if progress >= 1.0 {
            return (self.property() == to.property()).then_some(to);
        }
        match (self, to) {
            (Self::Opacity(a), Self::Opacity(b)) => Some(Self::Opacity(a + (b - a) * progress)),
            (Self::Transform(a), Self::Transform(b)) => {
                let axis = match (a, b) {
                    (Transform::Translate(axis, _), _) | (_, Transform::Translate(axis, _)) => axis,
                    (Transform::None, Transform::None) => return Some(Self::Transform(Transform::None)),
                };
                let from = a.offset_along(axis);
                let offset = from + (b.offset_along(axis) - from) * progress;
                Some(Self::Transform(Transform::Translate(axis, offset)))
            }
            _ => None,
        }
    }
}

/// A single-property `transition` declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionSpec {
    pub property: TransitionProperty,
    pub duration: Duration,
    pub easing: Easing,
}

impl TransitionSpec {
    /// Create a new transition declaration.
    pub const fn new(property: TransitionProperty, duration: Duration, easing: Easing) -> Self {
        Self {
            property,
            duration,
            easing,
        }
    }

    /// Render as a CSS `transition` value, e.g.
    /// `367ms transform cubic-bezier(0.1, 0.9, 0.2, 1)`.
    pub fn to_css(&self) -> String {
        self.to_string()
    }

    /// Parse a value produced by [`TransitionSpec::to_css`].
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let (duration, rest) = s.split_once(' ')?;
        let (property, easing) = rest.trim_start().split_once(' ')?;
        let ms: f64 = duration.strip_suffix("ms")?.parse().ok()?;
        if !ms.is_finite() || ms < 0.0 {
            return None;
        }
        Some(Self {
            property: TransitionProperty::from_css_name(property)?,
            duration: Duration::from_nanos((ms * 1_000_000.0).round() as u64),
            easing: Easing::parse(easing)?,
        })
    }
}

impl fmt::Display for TransitionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.duration.as_nanos() as f64 / 1_000_000.0;
        write!(f, "{ms}ms {} {}", self.property.css_name(), self.easing)
    }
}
