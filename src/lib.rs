//! **monhop**: move the focused window to the neighbouring monitor.
//!
//! The window keeps its proportional position and size: a window covering
//! the left half of one monitor covers the left half of the next one, even
//! when the two differ in resolution.  Maximized and fullscreen state is
//! stripped for the move and restored afterwards.
//!
//! # Architecture
//!
//! * [`geometry`]: rectangles and the relative-geometry transform.
//! * [`selector`]: picks the next monitor in a compass direction.
//! * [`mover`]: [`WindowMover`](mover::WindowMover) sequences the whole
//!   relocation against the [`traits::DisplayServer`] abstraction, so the
//!   logic is not coupled to any specific windowing system.
//!
//! The concrete backend lives in [`x11`] (EWMH + Xinerama via `x11rb`).

pub mod command;
pub mod config;
pub mod geometry;
pub mod mover;
pub mod selector;
pub mod traits;
pub mod x11;
