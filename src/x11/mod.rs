//! X11 implementation of the display-server seam.
//!
//! This module provides the concrete backend for the
//! [`DisplayServer`](crate::traits::DisplayServer) trait, talking EWMH to
//! the window manager and Xinerama for the monitor layout.
//!
//! Nothing outside this module should reference X11 directly.

pub mod display;

pub use display::{X11Display, X11DisplayError};
