//! Directions and EWMH vocabulary shared by all components.
//!
//! [`Direction`] is the only piece of user input; [`StateAction`] and
//! [`ClientSource`] mirror the integer codes of the `_NET_WM_STATE` client
//! message.

use serde::{Deserialize, Serialize};
use std::fmt;

/// `_NET_WM_STATE` atoms that pin a window's geometry and have to be
/// cleared before a cross-monitor move is honoured.
pub const BLOCKING_STATES: [&str; 3] = [
    "_NET_WM_STATE_MAXIMIZED_HORZ",
    "_NET_WM_STATE_MAXIMIZED_VERT",
    "_NET_WM_STATE_FULLSCREEN",
];

/// Compass direction to search for the next monitor in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    North,
    South,
    #[default]
    East,
    West,
}

impl Direction {
    /// Parse a `--direction` value by its first letter.
    ///
    /// Matching is case-sensitive (`N`, `S`, `E`, `W`).  Anything else,
    /// including an empty string, falls back to [`Direction::East`].
    pub fn from_flag(s: &str) -> Self {
        match s.chars().next() {
            Some('N') => Direction::North,
            Some('S') => Direction::South,
            Some('W') => Direction::West,
            _ => Direction::East,
        }
    }

    /// Whether the search runs along the X axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::East | Direction::West)
    }

    /// `+1` when searching towards increasing coordinates (east, south),
    /// `-1` otherwise.
    pub fn sign(self) -> i64 {
        match self {
            Direction::East | Direction::South => 1,
            Direction::West | Direction::North => -1,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::North => write!(f, "North"),
            Direction::South => write!(f, "South"),
            Direction::East => write!(f, "East"),
            Direction::West => write!(f, "West"),
        }
    }
}

/// Action code of a `_NET_WM_STATE` client message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateAction {
    Remove = 0,
    Add = 1,
}

impl fmt::Display for StateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateAction::Remove => write!(f, "remove"),
            StateAction::Add => write!(f, "add"),
        }
    }
}

/// Source indication sent along with EWMH client messages.
///
/// Window managers may treat requests from pagers differently from
/// requests made by the application itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientSource {
    Unknown = 0,
    Application = 1,
    #[default]
    Pager = 2,
}
