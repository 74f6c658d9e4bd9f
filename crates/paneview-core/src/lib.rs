#![forbid(unsafe_code)]

//! Core: geometry, animation value types, cancellation, and scheduling.
//!
//! # Role in paneview
//! `paneview-core` holds the platform-independent vocabulary shared by every
//! other crate. It knows nothing about elements or the DOM.
//!
//! # Primary responsibilities
//! - **geometry**: [`Rect`](geometry::Rect) and
//!   [`Thickness`](geometry::Thickness) captured from layout queries.
//! - **animation**: easing curves and typed CSS transition declarations.
//! - **cancellation**: nested cooperative cancellation scopes.
//! - **scheduler**: host-driven clocks and a cancellation-aware task queue.
//!
//! # How it fits in the system
//! `paneview-backend` defines the element-tree boundary in terms of these
//! types; `paneview-widgets` builds the split view on top of both.

pub mod animation;
pub mod cancellation;
pub mod geometry;
pub mod scheduler;
