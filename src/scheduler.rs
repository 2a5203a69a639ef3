//! Asynchronous replanning scheduler.
//!
//! Searches never run on the tick thread. The [`Navigator`] decides each
//! tick whether an agent is due for replanning, claims the agent's
//! in-flight guard, and submits a snapshot-carrying request to the
//! [`PlannerPool`]. Workers complete into the agent's [`PathSlot`]; the
//! next tick drains the outcome and publishes the new path atomically.

use std::sync::mpsc::{self, SyncSender, TrySendError};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::config::{AgentConfig, NavConfig, PlannerConfig};
use crate::error::{NavError, Result};
use crate::grid::{ObstacleGrid, Position, Region, TileCoord};
use crate::motion::{AgentMotion, MotionState};
use crate::planning::{self, AStarConfig, AStarPlanner};
use crate::policy::{Direction, MoveFeatures, PolicyOracle};
use crate::shared::{PathSlot, SearchOutcome, SharedPathSlot};

/// What to do with the agent's held path when a search fails.
///
/// The asymmetry is deliberate: a goal-seeker clears its path to force a
/// retry next eligible tick, while a pursuer keeps its stale path so it
/// does not oscillate when its moving target is briefly unreachable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplanPolicy {
    /// Clear the discrete path on failure (goal-seeking agents)
    ClearOnFailure,
    /// Keep the previous discrete path on failure (pursuit agents)
    KeepOnFailure,
}

/// One search job handed to the worker pool.
pub struct SearchRequest {
    pub start: TileCoord,
    pub goal: TileCoord,
    /// Owned obstacle snapshot; never shared with the tick thread
    pub grid: ObstacleGrid,
    pub slot: SharedPathSlot,
}

/// Fixed pool of planner worker threads fed by a bounded queue.
pub struct PlannerPool {
    tx: Option<SyncSender<SearchRequest>>,
    workers: Vec<JoinHandle<()>>,
}

impl PlannerPool {
    /// Spawn the worker threads.
    pub fn new(config: &PlannerConfig) -> Self {
        let (tx, rx) = mpsc::sync_channel::<SearchRequest>(config.queue_depth);
        let rx = Arc::new(Mutex::new(rx));
        let astar_config = AStarConfig {
            max_iterations: config.max_iterations,
        };

        let mut workers = Vec::with_capacity(config.workers);
        for i in 0..config.workers {
            let rx = Arc::clone(&rx);
            let planner = AStarPlanner::new(astar_config.clone());
            let handle = thread::Builder::new()
                .name(format!("planner-{}", i))
                .spawn(move || loop {
                    let request = match rx.lock() {
                        Ok(guard) => guard.recv(),
                        Err(_) => break,
                    };
                    let Ok(request) = request else {
                        break;
                    };

                    let outcome =
                        match planner.find_path(&request.grid, request.start, request.goal) {
                            Some(path) => SearchOutcome::Found(path),
                            None => {
                                tracing::warn!(
                                    start = ?request.start,
                                    goal = ?request.goal,
                                    "search found no path"
                                );
                                SearchOutcome::NoPath
                            }
                        };
                    request.slot.complete(outcome);
                })
                .expect("Failed to spawn planner worker");
            workers.push(handle);
        }

        Self {
            tx: Some(tx),
            workers,
        }
    }

    /// Submit a request without blocking the tick thread.
    ///
    /// A full queue suppresses the trigger: the guard is released and the
    /// agent simply retries on a later tick.
    pub fn submit(&self, request: SearchRequest) -> Result<()> {
        let Some(tx) = self.tx.as_ref() else {
            request.slot.abandon();
            return Err(NavError::PoolShutDown);
        };
        match tx.try_send(request) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(request)) => {
                tracing::debug!("planner queue full, trigger suppressed");
                request.slot.abandon();
                Ok(())
            }
            Err(TrySendError::Disconnected(request)) => {
                request.slot.abandon();
                Err(NavError::PoolShutDown)
            }
        }
    }
}

impl Drop for PlannerPool {
    fn drop(&mut self) {
        // Closing the channel lets the workers drain and exit.
        drop(self.tx.take());
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

/// A navigating agent: motion state plus its handoff cell and profile.
pub struct NavAgent {
    pub(crate) motion: AgentMotion,
    pub(crate) slot: SharedPathSlot,
    config: AgentConfig,
    policy: ReplanPolicy,
    goal: Option<Position>,
    oracle: Option<Box<dyn PolicyOracle + Send>>,
}

impl NavAgent {
    fn new(position: Position, config: AgentConfig, policy: ReplanPolicy) -> Self {
        Self {
            motion: AgentMotion::new(position),
            slot: Arc::new(PathSlot::new()),
            config,
            policy,
            goal: None,
            oracle: None,
        }
    }

    /// Install an optional move-policy oracle. Navigation works the same
    /// without one.
    pub fn set_policy_oracle(&mut self, oracle: Box<dyn PolicyOracle + Send>) {
        self.oracle = Some(oracle);
    }

    /// Ask the installed oracle for a move suggestion at the agent's
    /// current tile. `None` when no oracle is installed, no goal is set,
    /// or the oracle abstains.
    pub fn policy_hint(&self, tile_size: i32) -> Option<Direction> {
        let oracle = self.oracle.as_ref()?;
        let goal = self.goal?;
        let features = MoveFeatures::new(
            self.motion.position().snap_to_grid(tile_size),
            goal.snap_to_grid(tile_size),
        );
        oracle.predict(&features)
    }

    /// The agent's current navigation target.
    pub fn goal(&self) -> Option<Position> {
        self.goal
    }

    /// Whether this agent navigates to a fixed goal rather than chasing
    /// a moving target.
    fn is_goal_seeking(&self) -> bool {
        self.policy == ReplanPolicy::ClearOnFailure
    }
}

/// Public navigation surface driving all agents from the tick thread.
pub struct Navigator {
    config: NavConfig,
    pool: PlannerPool,
}

impl Navigator {
    /// Create a navigator and spawn its planner pool.
    pub fn new(config: NavConfig) -> Result<Self> {
        config.validate()?;
        let pool = PlannerPool::new(&config.planner);
        Ok(Self { config, pool })
    }

    /// Create a goal-seeking agent (clears its path when a search fails).
    pub fn seeker(&self, position: Position) -> NavAgent {
        NavAgent::new(
            position,
            self.config.seeker.clone(),
            ReplanPolicy::ClearOnFailure,
        )
    }

    /// Create a pursuit agent (keeps its stale path when a search fails).
    pub fn pursuer(&self, position: Position) -> NavAgent {
        NavAgent::new(
            position,
            self.config.pursuer.clone(),
            ReplanPolicy::KeepOnFailure,
        )
    }

    /// Set or update the agent's navigation target. Pursuers call this
    /// every tick with their quarry's latest position.
    pub fn start_path(&self, agent: &mut NavAgent, goal: Position) {
        agent.goal = Some(goal);
    }

    /// The agent's continuous position.
    pub fn current_position(&self, agent: &NavAgent) -> Position {
        agent.motion.position()
    }

    /// Whether the agent is within half a tile of its goal.
    pub fn has_arrived(&self, agent: &NavAgent) -> bool {
        let Some(goal) = agent.goal else {
            return false;
        };
        agent.motion.position().distance(&goal) < self.config.grid.tile_size as f32 / 2.0
    }

    /// Observable motion state for collaborators.
    pub fn state(&self, agent: &NavAgent) -> MotionState {
        agent
            .motion
            .state(agent.slot.is_in_flight(), self.has_arrived(agent))
    }

    /// Advance the agent by one simulation tick.
    ///
    /// Drains any completed search, decides whether to trigger a new one
    /// against the supplied obstacle snapshot, refills the step buffer if
    /// it drained, and applies at most one buffered step. Never blocks on
    /// a running search.
    pub fn tick(&self, agent: &mut NavAgent, dt: Duration, obstacles: &[Region]) {
        agent.motion.elapse(dt);
        self.drain_search_result(agent);

        let Some(goal) = agent.goal else {
            return;
        };

        // Arrival is terminal for goal-seekers only. A pursuer's target
        // keeps moving, so it stays eligible for replanning even inside
        // the arrival radius.
        if agent.is_goal_seeking() && self.has_arrived(agent) {
            return;
        }

        let tile_size = self.config.grid.tile_size;
        let start_tile = agent.motion.position().snap_to_grid(tile_size);
        let goal_tile = goal.snap_to_grid(tile_size);

        // Final approach: a goal-seeker already sharing a tile with its
        // goal walks straight to the continuous goal position instead of
        // searching. Pursuers fall through and replan instead.
        if agent.is_goal_seeking() && start_tile == goal_tile {
            if agent.motion.steps_empty() && !agent.slot.is_in_flight() {
                agent.motion.clear_path();
                if let Err(e) =
                    planning::refill_to_point(&mut agent.motion, goal, agent.config.speed)
                {
                    tracing::warn!("final approach refill failed: {}", e);
                }
            }
            agent.motion.advance();
            return;
        }

        if self.replan_due(agent, goal) {
            self.launch_search(agent, start_tile, goal_tile, obstacles);
        }

        if agent.motion.steps_empty() && agent.motion.has_path() {
            if let Err(e) =
                planning::refill(&mut agent.motion, agent.config.speed, agent.config.lookahead)
            {
                tracing::warn!("step buffer refill failed: {}", e);
            }
        }

        agent.motion.advance();
    }

    /// Publish a completed search outcome into the agent's motion state.
    fn drain_search_result(&self, agent: &mut NavAgent) {
        match agent.slot.take() {
            Some(SearchOutcome::Found(path)) => {
                tracing::info!(
                    tiles = path.tiles.len(),
                    cost = path.cost,
                    "publishing new path"
                );
                agent.motion.set_path(path);
            }
            Some(SearchOutcome::NoPath) => match agent.policy {
                ReplanPolicy::ClearOnFailure => agent.motion.clear_path(),
                ReplanPolicy::KeepOnFailure => {}
            },
            None => {}
        }
    }

    /// Replanning trigger: interval elapsed, no path held, or the goal is
    /// close enough that the current path needs a refresh.
    fn replan_due(&self, agent: &NavAgent, goal: Position) -> bool {
        agent.motion.since_replan() >= agent.config.replan_interval()
            || !agent.motion.has_path()
            || agent.motion.position().distance(&goal) < self.config.grid.tile_size as f32 / 2.0
    }

    /// Claim the guard and enqueue a search over a fresh obstacle
    /// snapshot. A trigger while one is in flight is dropped silently.
    fn launch_search(
        &self,
        agent: &mut NavAgent,
        start: TileCoord,
        goal: TileCoord,
        obstacles: &[Region],
    ) {
        if !agent.slot.try_begin() {
            tracing::debug!("replanning trigger suppressed: search already in flight");
            return;
        }

        let (width, height) = (self.config.grid.screen_width, self.config.grid.screen_height);
        let mut grid = ObstacleGrid::new(self.config.grid.tile_size, width, height);
        grid.add_obstacles(obstacles.iter().copied());

        agent.motion.mark_replan();

        let request = SearchRequest {
            start,
            goal,
            grid,
            slot: Arc::clone(&agent.slot),
        };
        if let Err(e) = self.pool.submit(request) {
            tracing::warn!("search submission failed: {}", e);
        }
    }
}
