//! Application configuration.
//!
//! The configuration is loaded from a JSON file, either the one passed with
//! `--config <path>` or `$XDG_CONFIG_HOME/monhop/config.json`.  The
//! direction and wrap behaviour are command-line only; the file tunes how a
//! move is carried out.
//!
//! # Example
//!
//! ```json
//! {
//!   "mover": {
//!     "restore_state_on_failure": true,
//!     "blocking_states": [
//!       "_NET_WM_STATE_MAXIMIZED_HORZ",
//!       "_NET_WM_STATE_MAXIMIZED_VERT",
//!       "_NET_WM_STATE_FULLSCREEN"
//!     ],
//!     "source": "pager"
//!   },
//!   "x11": { "max_tree_depth": 64 }
//! }
//! ```

use crate::command::{ClientSource, BLOCKING_STATES};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
///
/// Every field is optional; a minimal `{}` file is valid and all sections
/// fall back to their compiled-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// How the focused window is relocated.
    #[serde(default)]
    pub mover: MoverConfig,

    /// X11 backend settings.
    #[serde(default)]
    pub x11: X11Config,
}

/// Settings for [`WindowMover`](crate::mover::WindowMover).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoverConfig {
    /// Re-add the stripped state flags when the move request itself fails.
    ///
    /// Off by default: a failed move leaves the window un-maximized.
    pub restore_state_on_failure: bool,
    /// State flags removed before the move and re-added afterwards.
    pub blocking_states: Vec<String>,
    /// Source indication sent with state change requests.
    pub source: ClientSource,
}

impl Default for MoverConfig {
    fn default() -> Self {
        Self {
            restore_state_on_failure: false,
            blocking_states: BLOCKING_STATES.iter().map(|s| s.to_string()).collect(),
            source: ClientSource::Pager,
        }
    }
}

/// Settings for [`X11Display`](crate::x11::X11Display).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct X11Config {
    /// Upper bound on parent links followed while looking for a window's
    /// frame.  Protects against malformed or cyclic window trees.
    pub max_tree_depth: u32,
}

impl Default for X11Config {
    fn default() -> Self {
        Self { max_tree_depth: 64 }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
