//! Collection window state machine.

use std::time::Duration;

use tokio::time::Instant;

/// Why a window stopped collecting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The window length elapsed after the first accepted beacon
    WindowElapsed,
    /// No datagram arrived within the idle bound
    IdleTimeout,
}

impl CloseReason {
    /// Metric / log label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WindowElapsed => "window_elapsed",
            Self::IdleTimeout => "idle_timeout",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WindowState {
    /// No beacon accepted yet
    WaitingFirst,
    /// Anchored at the first accepted beacon
    Collecting { anchor: Instant },
    Closed {
        reason: CloseReason,
        anchor: Option<Instant>,
        at: Instant,
    },
}

/// `WaitingFirst -> Collecting{anchor} -> Closed`
///
/// The window only advances on accepted beacons; rejected datagrams never
/// touch it. The elapsed check runs after each acceptance, so a window
/// whose last beacon arrives just before the deadline stays open until the
/// next accepted beacon or an idle timeout.
#[derive(Debug, Clone)]
pub struct CollectionWindow {
    length: Duration,
    state: WindowState,
}

impl CollectionWindow {
    pub fn new(length: Duration) -> Self {
        Self {
            length,
            state: WindowState::WaitingFirst,
        }
    }

    /// Register an accepted beacon at `now`.
    ///
    /// The first call anchors the window. Returns `true` once
    /// `now - anchor >= length`, after which the window is closed.
    pub fn on_accepted(&mut self, now: Instant) -> bool {
        match self.state {
            WindowState::WaitingFirst => {
                self.state = WindowState::Collecting { anchor: now };
                if self.length.is_zero() {
                    self.close_at(CloseReason::WindowElapsed, now);
                }
            }
            WindowState::Collecting { anchor } => {
                if now.saturating_duration_since(anchor) >= self.length {
                    self.close_at(CloseReason::WindowElapsed, now);
                }
            }
            WindowState::Closed { .. } => {}
        }
        self.is_closed()
    }

    /// Close for `reason`. No-op if already closed.
    pub fn close(&mut self, reason: CloseReason) {
        self.close_at(reason, Instant::now());
    }

    fn close_at(&mut self, reason: CloseReason, at: Instant) {
        let anchor = match self.state {
            WindowState::WaitingFirst => None,
            WindowState::Collecting { anchor } => Some(anchor),
            WindowState::Closed { .. } => return,
        };
        self.state = WindowState::Closed { reason, anchor, at };
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, WindowState::Closed { .. })
    }

    /// Anchor instant, if any beacon was accepted
    pub fn anchor(&self) -> Option<Instant> {
        match self.state {
            WindowState::WaitingFirst => None,
            WindowState::Collecting { anchor } => Some(anchor),
            WindowState::Closed { anchor, .. } => anchor,
        }
    }

    pub fn close_reason(&self) -> Option<CloseReason> {
        match self.state {
            WindowState::Closed { reason, .. } => Some(reason),
            _ => None,
        }
    }

    /// Time between the anchor and the close (or now, while open).
    pub fn open_for(&self) -> Option<Duration> {
        match self.state {
            WindowState::WaitingFirst => None,
            WindowState::Collecting { anchor } => Some(anchor.elapsed()),
            WindowState::Closed { anchor, at, .. } => {
                anchor.map(|anchor| at.saturating_duration_since(anchor))
            }
        }
    }

    pub fn length(&self) -> Duration {
        self.length
    }
}
