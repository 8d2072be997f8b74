//! External Change Debouncing
//!
//! File watchers deliver bursts of raw notifications for a single logical
//! change. The debouncer coalesces each burst into one `FileChange` per
//! path, ready a fixed window after the burst's first event. A pending
//! window is not re-armed by later events, so a refresh never double-fires.
//!
//! Time is passed in explicitly, which keeps the component deterministic
//! under test and free of any timer machinery.

use std::path::PathBuf;
use std::time::{Duration, Instant};

/// What happened to a watched file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Modified,
    Created,
    Deleted,
}

/// One coalesced change notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

#[derive(Debug)]
struct Pending {
    path: PathBuf,
    kind: ChangeKind,
    ready_at: Instant,
}

/// Coalesces raw watch events into at most one change per path per window
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    pending: Vec<Pending>,
}

impl Debouncer {
    /// Create a debouncer with the given coalescing window
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: Vec::new(),
        }
    }

    /// Record a raw watch event. Events for a path already pending update
    /// its kind (the latest wins) without re-arming the window.
    pub fn push(&mut self, path: PathBuf, kind: ChangeKind, now: Instant) {
        if let Some(pending) = self.pending.iter_mut().find(|p| p.path == path) {
            pending.kind = kind;
        } else {
            self.pending.push(Pending {
                path,
                kind,
                ready_at: now + self.window,
            });
        }
    }

    /// Drain the changes whose window has elapsed
    pub fn poll(&mut self, now: Instant) -> Vec<FileChange> {
        let (ready, pending): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|pending| pending.ready_at <= now);
        self.pending = pending;
        ready
            .into_iter()
            .map(|pending| FileChange {
                path: pending.path,
                kind: pending.kind,
            })
            .collect()
    }

    /// Earliest instant at which `poll` will return something
    pub fn next_ready(&self) -> Option<Instant> {
        self.pending.iter().map(|pending| pending.ready_at).min()
    }

    /// True when nothing is pending
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}
