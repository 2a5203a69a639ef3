//! Path planning for tile-grid navigation.
//!
//! This module provides:
//! - Stateless A* search over 4-directional tile moves
//! - Step-buffer interpolation turning tile paths into smooth per-tick motion

mod astar;
mod interpolate;

pub use astar::{AStarConfig, AStarPlanner, PlannedPath};
pub use interpolate::{refill, refill_to_point};
