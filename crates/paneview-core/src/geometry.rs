#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All lengths are CSS pixels (`f64`). Positions are relative to a reference
//! container, usually the split view's root element.

/// Layout axis along which a pane collapses and expands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// Width is the relevant dimension (left/right placements).
    Horizontal,
    /// Height is the relevant dimension (top/bottom placements).
    Vertical,
}

impl Axis {
    /// Pick the component of a `(width, height)` pair that lies on this axis.
    #[inline]
    pub const fn pick(self, width: f64, height: f64) -> f64 {
        match self {
            Self::Horizontal => width,
            Self::Vertical => height,
        }
    }

    /// The CSS translate function that moves along this axis.
    #[inline]
    pub const fn translate_fn(self) -> &'static str {
        match self {
            Self::Horizontal => "translateX",
            Self::Vertical => "translateY",
        }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Length along `axis`.
    #[inline]
    pub const fn along(&self, axis: Axis) -> f64 {
        axis.pick(self.width, self.height)
    }

    /// Return a copy with `delta` added along `axis`.
    #[inline]
    pub fn grown(self, axis: Axis, delta: f64) -> Self {
        match axis {
            Axis::Horizontal => Self::new(self.width + delta, self.height),
            Axis::Vertical => Self::new(self.width, self.height + delta),
        }
    }
}

/// A left/top offset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub left: f64,
    pub top: f64,
}

impl Position {
    /// Create a new position.
    #[inline]
    pub const fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }

    /// Return a copy moved by `delta` along `axis`.
    #[inline]
    pub fn shifted(self, axis: Axis, delta: f64) -> Self {
        match axis {
            Axis::Horizontal => Self::new(self.left + delta, self.top),
            Axis::Vertical => Self::new(self.left, self.top + delta),
        }
    }
}

/// Size of an element along one axis, in content-box and margin-box terms.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Thickness {
    /// Content-box length.
    pub content: f64,
    /// Length including padding, border, and margin.
    pub total: f64,
}

impl Thickness {
    /// A thickness of zero in both terms.
    pub const ZERO: Self = Self {
        content: 0.0,
        total: 0.0,
    };

    /// Create a new thickness.
    #[inline]
    pub const fn new(content: f64, total: f64) -> Self {
        Self { content, total }
    }

    /// Whether something remains visible at this thickness.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.content > 0.0
    }
}

/// Geometry of an element captured in a single layout query.
///
/// Holds position plus both content-box and margin-box sizes so that an
/// animation can be planned without touching layout again.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub content_width: f64,
    pub content_height: f64,
    pub total_width: f64,
    pub total_height: f64,
}

impl Rect {
    /// Assemble a rect from a position and its two sizes.
    #[inline]
    pub const fn new(position: Position, content: Size, total: Size) -> Self {
        Self {
            left: position.left,
            top: position.top,
            content_width: content.width,
            content_height: content.height,
            total_width: total.width,
            total_height: total.height,
        }
    }

    /// Left/top offset.
    #[inline]
    pub const fn position(&self) -> Position {
        Position::new(self.left, self.top)
    }

    /// Content-box size.
    #[inline]
    pub const fn content_size(&self) -> Size {
        Size::new(self.content_width, self.content_height)
    }

    /// Margin-box size.
    #[inline]
    pub const fn total_size(&self) -> Size {
        Size::new(self.total_width, self.total_height)
    }

    /// Project onto `axis`.
    #[inline]
    pub const fn thickness(&self, axis: Axis) -> Thickness {
        Thickness::new(
            axis.pick(self.content_width, self.content_height),
            axis.pick(self.total_width, self.total_height),
        )
    }

    /// Grow both sizes by `delta` along `axis`, keeping the position.
    pub fn resized(self, axis: Axis, delta: f64) -> Self {
        Self::new(
            self.position(),
            self.content_size().grown(axis, delta),
            self.total_size().grown(axis, delta),
        )
    }

    /// Move by `delta` along `axis`, keeping the sizes.
    pub fn shifted(self, axis: Axis, delta: f64) -> Self {
        Self::new(
            self.position().shifted(axis, delta),
            self.content_size(),
            self.total_size(),
        )
    }
}
