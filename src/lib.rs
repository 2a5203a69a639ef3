//! Tilenav - Real-time navigation engine for tile-grid worlds
//!
//! Given a start and goal position, grid bounds, and a snapshot of
//! static and dynamic rectangular obstacles, tilenav computes a shortest
//! 4-directional tile path, smooths it into per-tick positions bounded
//! by the agent's speed, and replans continuously as obstacles move.
//!
//! ## Architecture
//!
//! One tick thread drives all agents; searches run out-of-band:
//!
//! - **Tick thread**: per agent, drains completed search results,
//!   decides whether a replan is due, refills the step buffer when it
//!   empties, and applies one buffered position per tick. Never blocks
//!   on a running search.
//! - **Planner workers**: a fixed pool consuming search requests from a
//!   bounded queue. Each request carries its own obstacle snapshot, so
//!   searches for different agents are fully independent.
//! - **Handoff**: one [`shared::PathSlot`] per agent — an in-flight
//!   guard plus a result cell — guarantees at most one running search
//!   per agent and atomic wholesale path replacement.
//!
//! Rendering, input, map parsing, and game rules live outside this
//! crate; collaborators drive it through [`Navigator`] and observe
//! agents through [`Navigator::current_position`] and
//! [`Navigator::has_arrived`].

pub mod config;
pub mod error;
pub mod grid;
pub mod motion;
pub mod planning;
pub mod policy;
pub mod scheduler;
pub mod shared;

pub use config::{AgentConfig, GridConfig, NavConfig, PlannerConfig};
pub use error::{NavError, Result};
pub use grid::{GridOracle, ObstacleGrid, Position, Region, TileCoord};
pub use motion::{AgentMotion, MotionState};
pub use planning::{AStarConfig, AStarPlanner, PlannedPath};
pub use policy::{Direction, MoveFeatures, PolicyOracle, TrainingSample};
pub use scheduler::{NavAgent, Navigator, PlannerPool, ReplanPolicy, SearchRequest};
pub use shared::{PathSlot, SearchOutcome, SharedPathSlot};
