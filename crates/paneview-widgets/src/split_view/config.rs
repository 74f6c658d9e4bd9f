#![forbid(unsafe_code)]

//! SplitView options and configuration-as-data.
//!
//! [`SplitViewOptions`] are the per-instance construction options.
//! [`SplitViewConfig`] adds animation timings and, with the `config` feature,
//! loads from TOML or JSON:
//!
//! ```toml
//! [options]
//! hidden = false
//! placement = "right"
//! display_mode = "inline"
//!
//! [animation]
//! factor = 0.5
//! ```
//!
//! Every field has a default matching the stock control, so
//! `SplitViewConfig::default()` behaves like an unconfigured split view.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use paneview_core::animation::scaled;
use paneview_core::geometry::Axis;

use crate::animator::AnimatorTimings;
#[cfg(feature = "config")]
use crate::error::SplitViewError;

/// Error returned when a string names no known option value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} {value:?}")]
pub struct ParseOptionError {
    kind: &'static str,
    value: String,
}

impl ParseOptionError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }

    /// The rejected input.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Edge of the split view the pane is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum Placement {
    /// Start edge.
    #[default]
    Left,
    /// End edge.
    Right,
    /// Before edge.
    Top,
    /// After edge.
    Bottom,
}

impl Placement {
    pub const ALL: [Placement; 4] = [Self::Left, Self::Right, Self::Top, Self::Bottom];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }

    /// Axis along which the pane expands and collapses.
    pub const fn axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis::Horizontal,
            Self::Top | Self::Bottom => Axis::Vertical,
        }
    }

    /// Whether the pane precedes the content in document order.
    pub const fn pane_is_first(self) -> bool {
        matches!(self, Self::Left | Self::Top)
    }

    /// Whether the pane sits on the physical right or bottom edge.
    ///
    /// Right-to-left direction mirrors the horizontal placements only.
    pub const fn is_trailing(self, rtl: bool) -> bool {
        match self {
            Self::Left => rtl,
            Self::Right => !rtl,
            Self::Top => false,
            Self::Bottom => true,
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Placement {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ParseOptionError::new("placement", s))
    }
}

/// How a shown pane shares space with the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum DisplayMode {
    /// The shown pane floats over the content.
    #[default]
    Overlay,
    /// The shown pane displaces the content.
    Inline,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 2] = [Self::Overlay, Self::Inline];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overlay => "overlay",
            Self::Inline => "inline",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayMode {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ParseOptionError::new("display mode", s))
    }
}

/// Construction-time options of one split view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct SplitViewOptions {
    /// Whether the pane starts hidden.
    pub hidden: bool,
    pub placement: Placement,
    pub display_mode: DisplayMode,
}

impl Default for SplitViewOptions {
    fn default() -> Self {
        Self {
            hidden: true,
            placement: Placement::Left,
            display_mode: DisplayMode::Overlay,
        }
    }
}

impl SplitViewOptions {
    #[must_use]
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    #[must_use]
    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    #[must_use]
    pub fn display_mode(mut self, display_mode: DisplayMode) -> Self {
        self.display_mode = display_mode;
        self
    }
}

/// Animation timings in milliseconds, before the speed factor is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct AnimationConfig {
    /// Global speed multiplier; `0.0` disables motion.
    pub factor: f64,
    /// Pane resize and slide duration.
    pub resize_ms: u64,
    /// Content fade-in duration.
    pub fade_in_ms: u64,
    /// Delay before inline content fades in while showing.
    pub show_fade_delay_ms: u64,
    /// Delay before inline content fades in while hiding.
    pub hide_fade_delay_ms: u64,
    /// Grace period before a silent transition is settled.
    pub watchdog_grace_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            factor: 1.0,
            resize_ms: 367,
            fade_in_ms: 167,
            show_fade_delay_ms: 350,
            hide_fade_delay_ms: 267,
            watchdog_grace_ms: 50,
        }
    }
}

impl AnimationConfig {
    /// Timings for the animator that drives the pane.
    pub fn animator_timings(&self) -> AnimatorTimings {
        AnimatorTimings {
            factor: self.factor,
            edge_ui: Duration::from_millis(self.resize_ms),
            fade_in: Duration::from_millis(self.fade_in_ms),
            watchdog_grace: Duration::from_millis(self.watchdog_grace_ms),
        }
    }

    pub fn show_fade_delay(&self) -> Duration {
        scaled(Duration::from_millis(self.show_fade_delay_ms), self.factor)
    }

    pub fn hide_fade_delay(&self) -> Duration {
        scaled(Duration::from_millis(self.hide_fade_delay_ms), self.factor)
    }
}

/// Complete split view configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct SplitViewConfig {
    pub options: SplitViewOptions,
    pub animation: AnimationConfig,
}

impl SplitViewConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, SplitViewError> {
        toml::from_str(s).map_err(|e| SplitViewError::ConfigParse {
            format: "TOML",
            message: e.to_string(),
        })
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SplitViewError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, SplitViewError> {
        serde_json::from_str(s).map_err(|e| SplitViewError::ConfigParse {
            format: "JSON",
            message: e.to_string(),
        })
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SplitViewError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let a = &self.animation;
        if !a.factor.is_finite() || a.factor < 0.0 {
            errors.push(format!(
                "animation.factor must be finite and >= 0, got {}",
                a.factor
            ));
        }
        if a.resize_ms == 0 {
            errors.push("animation.resize_ms must be > 0".to_string());
        }
        if a.fade_in_ms == 0 {
            errors.push("animation.fade_in_ms must be > 0".to_string());
        }
        errors
    }
}
