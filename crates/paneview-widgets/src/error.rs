#![forbid(unsafe_code)]

//! Errors raised by paneview widgets.
//!
//! Only construction and configuration loading can fail. Requests such as
//! showing or hiding a pane are intents and never return errors.

use paneview_backend::ElementId;

/// Errors from [`SplitView`](crate::split_view::SplitView) construction and
/// configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum SplitViewError {
    /// The host element already has a control bound to it.
    #[error(
        "Invalid argument: Controls may only be instantiated one time for each DOM element (host {host})"
    )]
    DuplicateConstruction { host: ElementId },

    /// A configuration document could not be parsed.
    #[error("invalid {format} configuration: {message}")]
    ConfigParse {
        format: &'static str,
        message: String,
    },

    /// A configuration file could not be read.
    #[error("configuration I/O: {0}")]
    ConfigIo(#[from] std::io::Error),
}
