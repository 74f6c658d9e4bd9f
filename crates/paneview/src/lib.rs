#![forbid(unsafe_code)]

//! paneview public facade crate.
//!
//! Re-exports the types an embedder needs to mount a split view, drive it,
//! and observe it, plus a prelude for day-to-day usage.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use paneview_core::animation::{Easing, Transform};
pub use paneview_core::geometry::{Axis, Position, Rect, Size, Thickness};
pub use paneview_core::scheduler::{Clock, DeterministicClock};

// --- Backend re-exports ----------------------------------------------------

pub use paneview_backend::{Direction, DomEvent, ElementId, StyleProp, Surface};

// --- Headless surface re-exports -------------------------------------------

pub use paneview_web::{BoxModel, LayoutEngine, LayoutView, MemoryDom};

// --- Widget re-exports -----------------------------------------------------

pub use paneview_widgets::split_view::{
    AnimationConfig, BEFORE_HIDE, BEFORE_SHOW, DisplayMode, PaneState, Placement, SplitView,
    SplitViewConfig, SplitViewOptions, SplitViewStylesheet,
};
pub use paneview_widgets::SplitViewError;

// --- Errors ---------------------------------------------------------------

/// Top-level error type for paneview embedders.
#[derive(Debug)]
pub enum Error {
    /// Split view construction or configuration failed.
    SplitView(SplitViewError),
    /// I/O failure outside configuration loading.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SplitView(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SplitView(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<SplitViewError> for Error {
    fn from(err: SplitViewError) -> Self {
        Self::SplitView(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Standard result type for paneview APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Mount a split view on a fresh element appended to `dom`'s body.
///
/// The element receives `children` (the first becomes the pane) before the
/// split view takes it over.
pub fn mount(
    dom: &MemoryDom,
    children: &[ElementId],
    options: SplitViewOptions,
) -> Result<SplitView<MemoryDom>> {
    let mut surface = dom.clone();
    let host = surface.create_element();
    for child in children {
        surface.append_child(host, *child);
    }
    let body = surface.body();
    surface.append_child(body, host);
    Ok(SplitView::new(surface, host, options)?)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        DisplayMode, ElementId, Error, MemoryDom, PaneState, Placement, Result, SplitView,
        SplitViewConfig, SplitViewOptions, Surface,
    };

    pub use crate::{backend, core, web, widgets};
}

pub use paneview_backend as backend;
pub use paneview_core as core;
pub use paneview_web as web;
pub use paneview_widgets as widgets;
