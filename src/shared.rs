//! Shared state between the tick thread and planner workers.
//!
//! Each agent owns one [`PathSlot`]: a single-writer handoff cell a
//! planner worker completes into and the tick thread drains. The
//! in-flight guard enforces at most one running search per agent; the
//! launch/completion counters exist so tests can verify that invariant
//! under stress.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use crate::planning::PlannedPath;

/// Outcome of one completed search.
#[derive(Clone, Debug)]
pub enum SearchOutcome {
    /// A full path from start to goal
    Found(PlannedPath),
    /// The frontier emptied without reaching the goal
    NoPath,
}

/// Per-agent handoff cell for asynchronous search results.
///
/// The tick thread sets the guard before launching a search; the worker
/// stores its outcome and clears the guard exactly once, success or
/// failure. The next tick observes the result — last write wins, no
/// cancellation.
#[derive(Debug)]
pub struct PathSlot {
    /// In-flight guard: true while a search runs for this agent
    in_flight: AtomicBool,
    /// Completed result awaiting pickup by the tick thread
    result: Mutex<Option<SearchOutcome>>,
    /// Searches launched (instrumentation)
    launches: AtomicU32,
    /// Searches completed (instrumentation)
    completions: AtomicU32,
}

impl PathSlot {
    pub fn new() -> Self {
        Self {
            in_flight: AtomicBool::new(false),
            result: Mutex::new(None),
            launches: AtomicU32::new(0),
            completions: AtomicU32::new(0),
        }
    }

    /// Claim the in-flight guard. Returns false if a search is already
    /// running, in which case the trigger must be suppressed.
    pub fn try_begin(&self) -> bool {
        let claimed = self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if claimed {
            self.launches.fetch_add(1, Ordering::Relaxed);
        }
        claimed
    }

    /// Store a finished outcome and release the guard.
    ///
    /// The result is written before the guard clears, so a tick that
    /// observes the guard down also sees the outcome.
    pub fn complete(&self, outcome: SearchOutcome) {
        if let Ok(mut slot) = self.result.lock() {
            *slot = Some(outcome);
        }
        self.completions.fetch_add(1, Ordering::Relaxed);
        self.in_flight.store(false, Ordering::Release);
    }

    /// Release the guard without an outcome, for a launch that never
    /// reached a worker (e.g. the request queue was full).
    pub fn abandon(&self) {
        self.completions.fetch_add(1, Ordering::Relaxed);
        self.in_flight.store(false, Ordering::Release);
    }

    /// Whether a search is currently running for this agent.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Take the completed outcome, if any.
    pub fn take(&self) -> Option<SearchOutcome> {
        self.result.lock().ok().and_then(|mut slot| slot.take())
    }

    pub fn launches(&self) -> u32 {
        self.launches.load(Ordering::Relaxed)
    }

    pub fn completions(&self) -> u32 {
        self.completions.load(Ordering::Relaxed)
    }
}

impl Default for PathSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle to an agent's handoff cell.
pub type SharedPathSlot = Arc<PathSlot>;
