#![forbid(unsafe_code)]

//! `paneview-web` provides a headless, host-driven element tree for paneview.
//!
//! Design goals:
//! - **Host-driven time**: the embedder passes a monotonic `now` to every
//!   [`drain_transition_ends`](paneview_backend::Surface::drain_transition_ends)
//!   call; simulated CSS transitions finish relative to it.
//! - **Deterministic layout**: geometry comes from a pluggable
//!   [`LayoutEngine`] instead of a CSS implementation.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown` and
//!   for unit tests.
//!
//! This crate intentionally does not bind to `wasm-bindgen`. A browser host
//! implements [`Surface`](paneview_backend::Surface) over the real DOM; this
//! crate is what controls run against everywhere else.

pub mod layout;
pub mod memory_dom;

pub use layout::{BoxModel, LayoutEngine, LayoutView};
pub use memory_dom::{ListenerId, LoggedEvent, MemoryDom};
