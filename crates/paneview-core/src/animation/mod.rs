#![forbid(unsafe_code)]

//! Animation value types: timing curves and typed transition declarations.
//!
//! Nothing here drives time. Transitions are executed by a host (a browser,
//! or the headless `paneview-web` surface) and tracked by the widget-level
//! animator.

mod easing;
mod transition;

pub use easing::{EDGE_UI, Easing};
pub use transition::{AnimatedProperty, Transform, TransitionProperty, TransitionSpec};

use std::time::Duration;

/// Scale a nominal duration by a global animation speed factor.
///
/// A factor of `0.0` disables motion; negative and non-finite factors are
/// treated as `0.0`.
#[must_use]
pub fn scaled(duration: Duration, factor: f64) -> Duration {
    if !factor.is_finite() || factor <= 0.0 {
        return Duration::ZERO;
    }
    Duration::from_nanos((duration.as_nanos() as f64 * factor).round() as u64)
}
