//! The seam between the move logic and the display server.
//!
//! [`WindowMover`](crate::mover::WindowMover) only depends on
//! [`DisplayServer`].  The X11 backend lives in [`x11`](crate::x11); tests
//! use in-memory doubles that record every call.

use crate::command::{ClientSource, StateAction};
use crate::geometry::Rect;

/// Display-server window identifier.
pub type WindowId = u32;

/// Abstraction over the queries and requests needed to relocate a window.
///
/// Every method is a blocking round trip.  Implementations do not retry.
pub trait DisplayServer {
    /// The error type produced by this backend.
    type Error: std::error::Error + Send + 'static;

    /// The window that currently has input focus.
    fn focused_window(&self) -> Result<WindowId, Self::Error>;

    /// Geometry of `window` including the frame the window manager drew
    /// around it.
    fn decorated_geometry(&self, window: WindowId) -> Result<Rect, Self::Error>;

    /// Bounds of every physical monitor.
    fn monitors(&self) -> Result<Vec<Rect>, Self::Error>;

    /// Names of the state flags (`_NET_WM_STATE_*`) currently set on
    /// `window`.
    fn window_state(&self, window: WindowId) -> Result<Vec<String>, Self::Error>;

    /// Send a single state change request.
    ///
    /// The underlying message carries at most two flags; `second` is `None`
    /// for the empty slot.  Use
    /// [`request_state_change`](crate::mover::request_state_change) to
    /// change an arbitrary number of flags.
    fn send_state_change(
        &self,
        window: WindowId,
        action: StateAction,
        source: ClientSource,
        first: &str,
        second: Option<&str>,
    ) -> Result<(), Self::Error>;

    /// Move and resize `window` so that its *decorated* frame ends up at
    /// `target`.
    ///
    /// Implementations compensate for decoration overhead themselves.
    fn move_resize_window(&self, window: WindowId, target: Rect) -> Result<(), Self::Error>;
}
