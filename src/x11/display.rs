//! [`DisplayServer`] implementation backed by an X11 connection.
//!
//! Window state and geometry changes are requested from the window manager
//! with EWMH client messages sent to the root window, so that reparenting
//! window managers apply them to their frames.  Monitors come from
//! Xinerama, which RandR-based setups also expose.

use crate::command::{ClientSource, StateAction};
use crate::config::X11Config;
use crate::geometry::{client_size_for_frame, Rect};
use crate::traits::{DisplayServer, WindowId};
use log::debug;
use x11rb::connection::{Connection, RequestConnection};
use x11rb::errors::{ConnectError, ConnectionError, ReplyError};
use x11rb::protocol::xinerama::{self, ConnectionExt as _};
use x11rb::protocol::xproto::{Atom, AtomEnum, ClientMessageEvent, ConnectionExt as _, EventMask};
use x11rb::rust_connection::RustConnection;

x11rb::atom_manager! {
    Atoms: AtomsCookie {
        _NET_ACTIVE_WINDOW,
        _NET_WM_STATE,
        _NET_MOVERESIZE_WINDOW,
    }
}

/// `_NET_MOVERESIZE_WINDOW` flag bits: x, y, width and height are all set.
const MOVERESIZE_ALL_FIELDS: u32 = (1 << 8) | (1 << 9) | (1 << 10) | (1 << 11);

/// Keep the window manager's default gravity.
const GRAVITY_FORGET: u32 = 0;

/// Source indication for `_NET_MOVERESIZE_WINDOW`.
const MOVERESIZE_SOURCE: ClientSource = ClientSource::Pager;

/// Errors that can occur when talking to the X server.
#[derive(Debug, thiserror::Error)]
pub enum X11DisplayError {
    #[error("error connecting to display: {0}")]
    Connect(#[from] ConnectError),

    #[error("X11 connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("X11 request failed: {0}")]
    Reply(#[from] ReplyError),

    #[error("screen {0} does not exist")]
    NoScreen(usize),

    /// `_NET_ACTIVE_WINDOW` is missing or set to `None`.
    #[error("no active window")]
    NoActiveWindow,

    /// The parent walk did not reach the root window.
    #[error("window {window:#x} has no top-level frame within {depth} ancestors")]
    TreeTooDeep { window: WindowId, depth: u32 },
}

/// X11-backed display server.
///
/// Holds a single connection for the whole run; every method is a blocking
/// round trip on it.
pub struct X11Display {
    conn: RustConnection,
    root: WindowId,
    atoms: Atoms,
    max_tree_depth: u32,
}

impl X11Display {
    /// Connect to `$DISPLAY` and intern the EWMH atoms.
    pub fn connect(config: &X11Config) -> Result<Self, X11DisplayError> {
        let (conn, screen_num) = x11rb::connect(None)?;
        let root = conn
            .setup()
            .roots
            .get(screen_num)
            .map(|s| s.root)
            .ok_or(X11DisplayError::NoScreen(screen_num))?;
        let atoms = Atoms::new(&conn)?.reply()?;
        debug!("connected to screen {} (root {:#x})", screen_num, root);
        Ok(Self {
            conn,
            root,
            atoms,
            max_tree_depth: config.max_tree_depth,
        })
    }

    /// Geometry of `window` as reported by the server, relative to its
    /// parent.
    fn raw_geometry(&self, window: WindowId) -> Result<Rect, X11DisplayError> {
        let g = self.conn.get_geometry(window)?.reply()?;
        Ok(Rect::new(
            g.x.into(),
            g.y.into(),
            g.width.into(),
            g.height.into(),
        ))
    }

    /// Find the top-level ancestor of `window`, i.e. the frame a reparenting
    /// window manager draws decorations in.
    ///
    /// Returns `window` itself when it is already a child of the root.  The
    /// tree is walked fresh on every call since window managers reparent at
    /// will.
    fn frame_window(&self, window: WindowId) -> Result<WindowId, X11DisplayError> {
        find_frame(window, self.max_tree_depth, |w| {
            let tree = self.conn.query_tree(w)?.reply()?;
            if tree.parent == tree.root || tree.parent == x11rb::NONE {
                Ok(None)
            } else {
                Ok(Some(tree.parent))
            }
        })
    }

    fn intern(&self, name: &str) -> Result<Atom, X11DisplayError> {
        Ok(self.conn.intern_atom(false, name.as_bytes())?.reply()?.atom)
    }

    fn atom_name(&self, atom: Atom) -> Result<String, X11DisplayError> {
        let reply = self.conn.get_atom_name(atom)?.reply()?;
        Ok(String::from_utf8_lossy(&reply.name).into_owned())
    }

    /// Send an EWMH client message about `window` to the root window.
    fn send_client_message(
        &self,
        window: WindowId,
        message_type: Atom,
        data: [u32; 5],
    ) -> Result<(), X11DisplayError> {
        let event = ClientMessageEvent::new(32, window, message_type, data);
        self.conn
            .send_event(
                false,
                self.root,
                EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY,
                event,
            )?
            .check()?;
        self.conn.flush()?;
        Ok(())
    }

    fn xinerama_heads(&self) -> Result<Vec<Rect>, X11DisplayError> {
        if self
            .conn
            .extension_information(xinerama::X11_EXTENSION_NAME)?
            .is_none()
        {
            return Ok(Vec::new());
        }
        if self.conn.xinerama_is_active()?.reply()?.state == 0 {
            return Ok(Vec::new());
        }
        let reply = self.conn.xinerama_query_screens()?.reply()?;
        let mut heads: Vec<Rect> = reply
            .screen_info
            .iter()
            .map(|s| {
                Rect::new(
                    s.x_org.into(),
                    s.y_org.into(),
                    s.width.into(),
                    s.height.into(),
                )
            })
            .collect();
        heads.sort_by_key(|r| (r.x, r.y));
        Ok(heads)
    }
}

/// Follow parent links from `window` until reaching a window whose parent is
/// the root.
///
/// `parent_of` returns `None` for a child of the root and the parent id
/// otherwise.  At most `max_depth` lookups are made.
fn find_frame<F>(window: WindowId, max_depth: u32, mut parent_of: F) -> Result<WindowId, X11DisplayError>
where
    F: FnMut(WindowId) -> Result<Option<WindowId>, X11DisplayError>,
{
    let mut current = window;
    for _ in 0..max_depth {
        match parent_of(current)? {
            None => return Ok(current),
            Some(parent) => current = parent,
        }
    }
    Err(X11DisplayError::TreeTooDeep {
        window,
        depth: max_depth,
    })
}

/// Data words of a `_NET_WM_STATE` client message.
fn state_message_data(
    action: StateAction,
    first: Atom,
    second: Atom,
    source: ClientSource,
) -> [u32; 5] {
    [action as u32, first, second, source as u32, 0]
}

/// Data words of a `_NET_MOVERESIZE_WINDOW` client message.
///
/// Coordinates are sent as two's-complement so monitors left of or above
/// the origin work.
fn moveresize_message_data(x: i32, y: i32, width: i32, height: i32) -> [u32; 5] {
    let flags = GRAVITY_FORGET | MOVERESIZE_ALL_FIELDS | ((MOVERESIZE_SOURCE as u32) << 12);
    [flags, x as u32, y as u32, width as u32, height as u32]
}

//  DisplayServer implementation

impl DisplayServer for X11Display {
    type Error = X11DisplayError;

    fn focused_window(&self) -> Result<WindowId, Self::Error> {
        let reply = self
            .conn
            .get_property(
                false,
                self.root,
                self.atoms._NET_ACTIVE_WINDOW,
                AtomEnum::WINDOW,
                0,
                1,
            )?
            .reply()?;
        let active = reply
            .value32()
            .and_then(|mut v| v.next())
            .filter(|&w| w != x11rb::NONE);
        active.ok_or(X11DisplayError::NoActiveWindow)
    }

    fn decorated_geometry(&self, window: WindowId) -> Result<Rect, Self::Error> {
        let frame = self.frame_window(window)?;
        self.raw_geometry(frame)
    }

    fn monitors(&self) -> Result<Vec<Rect>, Self::Error> {
        let heads = self.xinerama_heads()?;
        if !heads.is_empty() {
            return Ok(heads);
        }
        debug!("xinerama unavailable, using the root window as the only monitor");
        Ok(vec![self.raw_geometry(self.root)?])
    }

    fn window_state(&self, window: WindowId) -> Result<Vec<String>, Self::Error> {
        let reply = self
            .conn
            .get_property(
                false,
                window,
                self.atoms._NET_WM_STATE,
                AtomEnum::ATOM,
                0,
                u32::MAX,
            )?
            .reply()?;
        let atoms: Vec<Atom> = reply.value32().map(|v| v.collect()).unwrap_or_default();
        atoms.into_iter().map(|a| self.atom_name(a)).collect()
    }

    fn send_state_change(
        &self,
        window: WindowId,
        action: StateAction,
        source: ClientSource,
        first: &str,
        second: Option<&str>,
    ) -> Result<(), Self::Error> {
        let first = self.intern(first)?;
        let second = match second {
            Some(name) => self.intern(name)?,
            None => x11rb::NONE,
        };
        let data = state_message_data(action, first, second, source);
        self.send_client_message(window, self.atoms._NET_WM_STATE, data)
    }

    fn move_resize_window(&self, window: WindowId, target: Rect) -> Result<(), Self::Error> {
        let client = self.raw_geometry(window)?;
        let frame = self.raw_geometry(self.frame_window(window)?)?;
        let (width, height) = client_size_for_frame(target.width, target.height, frame, client);
        debug!(
            "moveresize {:#x} to {} (client {}x{}, frame {}, client area {})",
            window, target, width, height, frame, client
        );
        let data = moveresize_message_data(target.x, target.y, width, height);
        self.send_client_message(window, self.atoms._NET_MOVERESIZE_WINDOW, data)
    }
}
