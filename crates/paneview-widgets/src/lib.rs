#![forbid(unsafe_code)]

//! Widgets for paneview.
//!
//! The only control so far is [`SplitView`](split_view::SplitView): a pane
//! that shows and hides along one edge of its host, announcing each change
//! through cancelable events and animating between arrangements.
//!
//! Supporting modules:
//! - [`animator`]: transition bookkeeping with watchdog completion.
//! - [`probe`]: geometry reads from a [`Surface`](paneview_backend::Surface).

pub mod animator;
pub mod error;
pub mod probe;
pub mod split_view;

pub use error::SplitViewError;
pub use split_view::{DisplayMode, Placement, SplitView, SplitViewConfig, SplitViewOptions};
