//! Per-agent motion state.
//!
//! An agent owns its continuous position, the discrete tile path most
//! recently published by the planner, and the step buffer of interpolated
//! positions drained one element per simulation tick. The path is only
//! ever replaced wholesale by a completed search result, never merged.

use std::collections::VecDeque;
use std::time::Duration;

use crate::grid::{Position, TileCoord};
use crate::planning::PlannedPath;

/// Observable state of an agent's motion, derived from its buffers and
/// the in-flight search guard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionState {
    /// No path, no buffered steps, no search running
    Idle,
    /// A search is in flight
    Searching,
    /// Path held, step buffer empty
    PathReady,
    /// Step buffer non-empty, consuming one position per tick
    Moving,
    /// Goal reached; terminal for goal-seeking agents
    Arrived,
}

/// Mutable motion state exclusively owned by one agent.
#[derive(Debug)]
pub struct AgentMotion {
    position: Position,
    pub(crate) path: VecDeque<TileCoord>,
    pub(crate) steps: VecDeque<Position>,
    /// Time accumulated since the last replanning trigger
    since_replan: Duration,
}

impl AgentMotion {
    /// Create motion state at an initial position.
    pub fn new(position: Position) -> Self {
        Self {
            position,
            path: VecDeque::new(),
            steps: VecDeque::new(),
            // Saturated so the first tick is immediately eligible to replan
            since_replan: Duration::MAX,
        }
    }

    /// Current continuous position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Replace the discrete path with a freshly completed search result.
    /// Buffered steps keep draining; the new path takes effect at the
    /// next refill.
    pub fn set_path(&mut self, path: PlannedPath) {
        self.path = path.tiles.into();
    }

    /// Drop the discrete path, forcing a retry on the next eligible tick.
    pub fn clear_path(&mut self) {
        self.path.clear();
    }

    pub fn has_path(&self) -> bool {
        !self.path.is_empty()
    }

    pub fn steps_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Pop the next buffered step and move onto it.
    pub fn advance(&mut self) -> Option<Position> {
        let next = self.steps.pop_front()?;
        self.position = next;
        Some(next)
    }

    /// Accumulate tick time toward the replanning interval.
    pub fn elapse(&mut self, dt: Duration) {
        self.since_replan = self.since_replan.saturating_add(dt);
    }

    /// Time since the last replanning trigger.
    pub fn since_replan(&self) -> Duration {
        self.since_replan
    }

    /// Mark a replanning trigger, restarting the interval clock.
    pub fn mark_replan(&mut self) {
        self.since_replan = Duration::ZERO;
    }

    /// Derive the motion state; the caller supplies the in-flight guard
    /// and arrival check since those live outside this struct.
    pub fn state(&self, search_in_flight: bool, arrived: bool) -> MotionState {
        if arrived {
            MotionState::Arrived
        } else if !self.steps.is_empty() {
            MotionState::Moving
        } else if self.has_path() {
            MotionState::PathReady
        } else if search_in_flight {
            MotionState::Searching
        } else {
            MotionState::Idle
        }
    }
}
