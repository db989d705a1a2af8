//! The orchestrator that relocates the focused window.
//!
//! [`WindowMover`] resolves the window's monitor, asks the
//! [`selector`](crate::selector) for the next one, rescales the window's
//! geometry and issues the protocol requests through a [`DisplayServer`].
//!
//! Maximized and fullscreen windows ignore geometry requests, so those state
//! flags are stripped before the move and put back afterwards.

use crate::command::{ClientSource, Direction, StateAction};
use crate::config::MoverConfig;
use crate::geometry::{build_absolute, build_relative, largest_overlap_index, Rect};
use crate::selector::find_next;
use crate::traits::{DisplayServer, WindowId};
use log::{debug, info, warn};
use std::fmt;

/// Possible errors from the mover.
///
/// Backend errors are carried as strings, prefixed with the step that
/// failed.
#[derive(Debug, thiserror::Error)]
pub enum MoveError {
    /// A query to the display server failed.
    #[error("error getting {what}: {message}")]
    Query { what: &'static str, message: String },

    /// The focused window does not overlap any monitor.
    #[error("active window does not overlap any monitor")]
    NoOverlap,

    /// A request to the display server failed.
    #[error("unable to {what}: {message}")]
    Command { what: &'static str, message: String },
}

fn query_failed<E: fmt::Display>(what: &'static str) -> impl FnOnce(E) -> MoveError {
    move |e| MoveError::Query {
        what,
        message: e.to_string(),
    }
}

fn command_failed<E: fmt::Display>(what: &'static str) -> impl FnOnce(E) -> MoveError {
    move |e| MoveError::Command {
        what,
        message: e.to_string(),
    }
}

/// Progress of a single relocation.
///
/// `MonitorResolved` jumps straight to `Done` when the target monitor is the
/// current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveStage {
    Idle,
    MonitorResolved,
    TargetComputed,
    StateStripped,
    Moved,
    StateRestored,
    Done,
}

impl MoveStage {
    /// Transition to `next`, logging the step.
    pub fn advance(&mut self, next: MoveStage) {
        debug!("{} -> {}", self, next);
        *self = next;
    }
}

impl fmt::Display for MoveStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MoveStage::Idle => "idle",
            MoveStage::MonitorResolved => "monitor resolved",
            MoveStage::TargetComputed => "target computed",
            MoveStage::StateStripped => "state stripped",
            MoveStage::Moved => "moved",
            MoveStage::StateRestored => "state restored",
            MoveStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// What [`WindowMover::relocate`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// No monitor in the requested direction; nothing was changed.
    Unchanged { monitor: Rect },
    /// The window was moved from one monitor to another.
    Moved {
        from: Rect,
        to: Rect,
        /// Decorated geometry requested for the window.
        geometry: Rect,
        /// State flags that were stripped for the move and re-added.
        restored: Vec<String>,
    },
}

/// Change an arbitrary number of state flags on `window`.
///
/// The state change message carries two flags, so `flags` is sent in
/// pairs; an odd trailing flag goes out with an empty second slot.  An empty
/// list sends nothing.
pub fn request_state_change<D: DisplayServer + ?Sized>(
    display: &D,
    window: WindowId,
    action: StateAction,
    source: ClientSource,
    flags: &[String],
) -> Result<(), D::Error> {
    for pair in flags.chunks(2) {
        let second = pair.get(1).map(String::as_str);
        debug!("state {} {} {:?}", action, pair[0], second);
        display.send_state_change(window, action, source, &pair[0], second)?;
    }
    Ok(())
}

/// Relocates the focused window between monitors.
///
/// The mover is generic over any [`DisplayServer`] implementation.
///
/// # Typical usage
///
/// ```ignore
/// let display = X11Display::connect(&config.x11)?;
/// let mover = WindowMover::new(display, config.mover);
/// mover.relocate(Direction::East, true)?;
/// ```
pub struct WindowMover<D: DisplayServer> {
    display: D,
    config: MoverConfig,
}

impl<D: DisplayServer> WindowMover<D> {
    pub fn new(display: D, config: MoverConfig) -> Self {
        Self { display, config }
    }

    /// Return a shared reference to the underlying display server.
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Move the focused window to the next monitor in `direction`.
    ///
    /// Any failing step aborts the rest of the sequence.  State flags that
    /// were already stripped are only put back on a failed move when
    /// [`MoverConfig::restore_state_on_failure`] is set.
    pub fn relocate(&self, direction: Direction, wrap: bool) -> Result<MoveOutcome, MoveError> {
        let mut stage = MoveStage::Idle;

        let window = self
            .display
            .focused_window()
            .map_err(query_failed("active window"))?;
        let geometry = self
            .display
            .decorated_geometry(window)
            .map_err(query_failed("active window geometry"))?;
        let monitors = self
            .display
            .monitors()
            .map_err(query_failed("list of monitors"))?;
        debug!("window {:#x} at {} across {} monitor(s)", window, geometry, monitors.len());

        let current = largest_overlap_index(&geometry, &monitors)
            .map(|i| monitors[i])
            .ok_or(MoveError::NoOverlap)?;
        stage.advance(MoveStage::MonitorResolved);

        let next = find_next(current, &monitors, direction, wrap);
        if next == current {
            stage.advance(MoveStage::Done);
            debug!("no monitor {} of {} (wrap: {})", direction, current, wrap);
            return Ok(MoveOutcome::Unchanged { monitor: current });
        }

        let target = build_absolute(build_relative(geometry, current), next);
        stage.advance(MoveStage::TargetComputed);
        info!("moving {:#x} {} from {} to {}: {} -> {}", window, direction, current, next, geometry, target);

        let state = self
            .display
            .window_state(window)
            .map_err(query_failed("active window's state"))?;
        let blocking: Vec<String> = state
            .into_iter()
            .filter(|s| self.config.blocking_states.contains(s))
            .collect();

        request_state_change(&self.display, window, StateAction::Remove, self.config.source, &blocking)
            .map_err(command_failed("update _NET_WM_STATE to make window moveable"))?;
        stage.advance(MoveStage::StateStripped);

        if let Err(e) = self.display.move_resize_window(window, target) {
            if self.config.restore_state_on_failure && !blocking.is_empty() {
                if let Err(restore) = request_state_change(
                    &self.display,
                    window,
                    StateAction::Add,
                    self.config.source,
                    &blocking,
                ) {
                    warn!("could not restore state after failed move: {}", restore);
                }
            }
            return Err(command_failed("move active window")(e));
        }
        stage.advance(MoveStage::Moved);

        request_state_change(&self.display, window, StateAction::Add, self.config.source, &blocking)
            .map_err(command_failed("restore _NET_WM_STATE after moving window"))?;
        stage.advance(MoveStage::StateRestored);
        stage.advance(MoveStage::Done);

        Ok(MoveOutcome::Moved {
            from: current,
            to: next,
            geometry: target,
            restored: blocking,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        State {
            action: StateAction,
            source: ClientSource,
            first: String,
            second: Option<String>,
        },
        MoveResize(Rect),
    }

    /// Record-keeping mock display server.
    #[derive(Debug)]
    struct RecorderDisplay {
        window: Rect,
        monitors: Vec<Rect>,
        state: Vec<String>,
        fail_monitors: bool,
        fail_move: bool,
        calls: RefCell<Vec<Call>>,
    }

    impl RecorderDisplay {
        fn new(window: Rect, monitors: Vec<Rect>, state: &[&str]) -> Self {
            Self {
                window,
                monitors,
                state: state.iter().map(|s| s.to_string()).collect(),
                fail_monitors: false,
                fail_move: false,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("recorder error")]
    struct RecorderErr;

    impl DisplayServer for RecorderDisplay {
        type Error = RecorderErr;

        fn focused_window(&self) -> Result<WindowId, RecorderErr> {
            Ok(0x1a00007)
        }

        fn decorated_geometry(&self, _: WindowId) -> Result<Rect, RecorderErr> {
            Ok(self.window)
        }

        fn monitors(&self) -> Result<Vec<Rect>, RecorderErr> {
            if self.fail_monitors {
                return Err(RecorderErr);
            }
            Ok(self.monitors.clone())
        }

        fn window_state(&self, _: WindowId) -> Result<Vec<String>, RecorderErr> {
            Ok(self.state.clone())
        }

        fn send_state_change(
            &self,
            _: WindowId,
            action: StateAction,
            source: ClientSource,
            first: &str,
            second: Option<&str>,
        ) -> Result<(), RecorderErr> {
            self.calls.borrow_mut().push(Call::State {
                action,
                source,
                first: first.into(),
                second: second.map(Into::into),
            });
            Ok(())
        }

        fn move_resize_window(&self, _: WindowId, target: Rect) -> Result<(), RecorderErr> {
            self.calls.borrow_mut().push(Call::MoveResize(target));
            if self.fail_move {
                return Err(RecorderErr);
            }
            Ok(())
        }
    }

    fn state(action: StateAction, first: &str, second: Option<&str>) -> Call {
        Call::State {
            action,
            source: ClientSource::Pager,
            first: first.into(),
            second: second.map(Into::into),
        }
    }

    fn side_by_side() -> Vec<Rect> {
        vec![Rect::new(0, 0, 1920, 1080), Rect::new(1920, 0, 2560, 1440)]
    }

    const HORZ: &str = "_NET_WM_STATE_MAXIMIZED_HORZ";
    const VERT: &str = "_NET_WM_STATE_MAXIMIZED_VERT";
    const FULL: &str = "_NET_WM_STATE_FULLSCREEN";

    #[test]
    fn odd_flag_count_is_batched_in_pairs() {
        let display = RecorderDisplay::new(Rect::new(0, 0, 1, 1), vec![], &[]);
        let flags: Vec<String> = [HORZ, VERT, FULL].iter().map(|s| s.to_string()).collect();
        request_state_change(&display, 1, StateAction::Add, ClientSource::Pager, &flags).unwrap();
        assert_eq!(
            *display.calls.borrow(),
            vec![
                state(StateAction::Add, HORZ, Some(VERT)),
                state(StateAction::Add, FULL, None),
            ]
        );
    }

    #[test]
    fn empty_flag_list_sends_nothing() {
        let display = RecorderDisplay::new(Rect::new(0, 0, 1, 1), vec![], &[]);
        request_state_change(&display, 1, StateAction::Remove, ClientSource::Pager, &[]).unwrap();
        assert!(display.calls.borrow().is_empty());
    }

    #[test]
    fn maximized_window_is_stripped_moved_and_restored() {
        let display = RecorderDisplay::new(
            Rect::new(0, 0, 1920, 1080),
            side_by_side(),
            &["_NET_WM_STATE_ABOVE", VERT, HORZ],
        );
        let mover = WindowMover::new(display, MoverConfig::default());
        let outcome = mover.relocate(Direction::East, false).unwrap();

        let target = Rect::new(1920, 0, 2560, 1440);
        assert_eq!(
            outcome,
            MoveOutcome::Moved {
                from: Rect::new(0, 0, 1920, 1080),
                to: target,
                geometry: target,
                restored: vec![VERT.to_string(), HORZ.to_string()],
            }
        );
        assert_eq!(
            *mover.display().calls.borrow(),
            vec![
                state(StateAction::Remove, VERT, Some(HORZ)),
                Call::MoveResize(target),
                state(StateAction::Add, VERT, Some(HORZ)),
            ]
        );
    }

    #[test]
    fn plain_window_only_moves() {
        let display = RecorderDisplay::new(Rect::new(2240, 180, 1280, 720), side_by_side(), &[]);
        let mover = WindowMover::new(display, MoverConfig::default());
        let outcome = mover.relocate(Direction::West, false).unwrap();

        // 320/2560 * 1920 = 240, 180/1440 * 1080 = 135
        let expected = Rect::new(240, 135, 960, 540);
        assert!(matches!(outcome, MoveOutcome::Moved { geometry, .. } if geometry == expected));
        assert_eq!(*mover.display().calls.borrow(), vec![Call::MoveResize(expected)]);
    }

    #[test]
    fn no_monitor_in_direction_issues_no_requests() {
        let display = RecorderDisplay::new(Rect::new(100, 100, 800, 600), side_by_side(), &[FULL]);
        let mover = WindowMover::new(display, MoverConfig::default());
        let outcome = mover.relocate(Direction::West, false).unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::Unchanged {
                monitor: Rect::new(0, 0, 1920, 1080)
            }
        );
        assert!(mover.display().calls.borrow().is_empty());
    }

    #[test]
    fn wrap_moves_past_the_edge() {
        let display = RecorderDisplay::new(Rect::new(100, 100, 800, 600), side_by_side(), &[]);
        let mover = WindowMover::new(display, MoverConfig::default());
        let outcome = mover.relocate(Direction::West, true).unwrap();
        assert!(matches!(outcome, MoveOutcome::Moved { to, .. } if to == Rect::new(1920, 0, 2560, 1440)));
    }

    #[test]
    fn window_on_the_boundary_belongs_to_larger_share() {
        // 300 px on the left monitor, 500 px on the right one.
        let display = RecorderDisplay::new(Rect::new(1620, 0, 800, 600), side_by_side(), &[]);
        let mover = WindowMover::new(display, MoverConfig::default());
        let outcome = mover.relocate(Direction::East, false).unwrap();
        assert!(matches!(outcome, MoveOutcome::Unchanged { monitor } if monitor == side_by_side()[1]));
    }

    #[test]
    fn offscreen_window_is_an_error() {
        let display = RecorderDisplay::new(Rect::new(9000, 9000, 100, 100), side_by_side(), &[]);
        let mover = WindowMover::new(display, MoverConfig::default());
        let err = mover.relocate(Direction::East, true).unwrap_err();
        assert!(matches!(err, MoveError::NoOverlap));
        assert!(mover.display().calls.borrow().is_empty());
    }

    #[test]
    fn query_failure_is_reported_with_context() {
        let mut display = RecorderDisplay::new(Rect::new(0, 0, 100, 100), side_by_side(), &[]);
        display.fail_monitors = true;
        let mover = WindowMover::new(display, MoverConfig::default());
        let err = mover.relocate(Direction::East, true).unwrap_err();
        assert_eq!(err.to_string(), "error getting list of monitors: recorder error");
    }

    #[test]
    fn failed_move_leaves_state_stripped_by_default() {
        let mut display = RecorderDisplay::new(Rect::new(0, 0, 1920, 1080), side_by_side(), &[FULL]);
        display.fail_move = true;
        let mover = WindowMover::new(display, MoverConfig::default());
        let err = mover.relocate(Direction::East, false).unwrap_err();
        assert_eq!(err.to_string(), "unable to move active window: recorder error");
        assert_eq!(
            *mover.display().calls.borrow(),
            vec![
                state(StateAction::Remove, FULL, None),
                Call::MoveResize(Rect::new(1920, 0, 2560, 1440)),
            ]
        );
    }

    #[test]
    fn failed_move_restores_state_when_configured() {
        let mut display = RecorderDisplay::new(Rect::new(0, 0, 1920, 1080), side_by_side(), &[FULL]);
        display.fail_move = true;
        let config = MoverConfig {
            restore_state_on_failure: true,
            ..MoverConfig::default()
        };
        let mover = WindowMover::new(display, config);
        assert!(matches!(
            mover.relocate(Direction::East, false),
            Err(MoveError::Command { .. })
        ));
        assert_eq!(
            *mover.display().calls.borrow(),
            vec![
                state(StateAction::Remove, FULL, None),
                Call::MoveResize(Rect::new(1920, 0, 2560, 1440)),
                state(StateAction::Add, FULL, None),
            ]
        );
    }

    #[test]
    fn configured_blocking_states_and_source_are_used() {
        let display = RecorderDisplay::new(Rect::new(0, 0, 1920, 1080), side_by_side(), &[VERT, FULL]);
        let config = MoverConfig {
            blocking_states: vec![FULL.to_string()],
            source: ClientSource::Application,
            ..MoverConfig::default()
        };
        let mover = WindowMover::new(display, config);
        mover.relocate(Direction::East, false).unwrap();
        let calls = mover.display().calls.borrow();
        assert_eq!(calls.len(), 3);
        assert_eq!(
            calls[0],
            Call::State {
                action: StateAction::Remove,
                source: ClientSource::Application,
                first: FULL.into(),
                second: None,
            }
        );
    }

    #[test]
    fn stage_advance_replaces_current_stage() {
        let mut stage = MoveStage::Idle;
        stage.advance(MoveStage::MonitorResolved);
        assert_eq!(stage, MoveStage::MonitorResolved);
        stage.advance(MoveStage::Done);
        assert_eq!(stage, MoveStage::Done);
    }

    #[test]
    fn stage_display() {
        assert_eq!(MoveStage::MonitorResolved.to_string(), "monitor resolved");
        assert_eq!(MoveStage::Done.to_string(), "done");
    }
}
