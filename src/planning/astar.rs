//! Stateless A* planner over the tile grid.
//!
//! Every search keeps its bookkeeping (g-costs, parents, closed set) in
//! local maps that live for exactly one call, so the planner tolerates
//! obstacles appearing or disappearing between calls without maintaining
//! a persistent graph. Safe to run concurrently against independent
//! obstacle snapshots.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::grid::{GridOracle, TileCoord};

/// Configuration for the A* planner.
#[derive(Clone, Debug)]
pub struct AStarConfig {
    /// Maximum iterations before giving up
    pub max_iterations: usize,
}

impl Default for AStarConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50_000,
        }
    }
}

/// Result of path planning.
#[derive(Clone, Debug)]
pub struct PlannedPath {
    /// Tile sequence from start to goal inclusive
    pub tiles: Vec<TileCoord>,
    /// Total step cost in pixels (tile size per step)
    pub cost: i32,
}

/// Node in the search frontier.
#[derive(Clone, Debug)]
struct SearchNode {
    coord: TileCoord,
    f_score: f32,
}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord
    }
}

impl Eq for SearchNode {}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (lower f_score = higher priority),
        // with coordinate order as a deterministic tie-break.
        other
            .f_score
            .partial_cmp(&self.f_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.coord.cmp(&other.coord))
    }
}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* path planner for 4-directional grid movement.
pub struct AStarPlanner {
    config: AStarConfig,
}

impl AStarPlanner {
    /// Create a new planner with configuration.
    pub fn new(config: AStarConfig) -> Self {
        Self { config }
    }

    /// Create a new planner with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(AStarConfig::default())
    }

    /// Plan a path from start tile to goal tile.
    ///
    /// The start tile itself is never validated against bounds or
    /// obstacles; only neighbor expansion checks them. An unreachable or
    /// blocked goal exhausts the frontier and returns `None`.
    pub fn find_path<G: GridOracle>(
        &self,
        grid: &G,
        start: TileCoord,
        goal: TileCoord,
    ) -> Option<PlannedPath> {
        let tile_size = grid.tile_size();
        let (width, height) = grid.bounds();

        let mut open_set = BinaryHeap::new();
        let mut g_costs: HashMap<TileCoord, i32> = HashMap::new();
        let mut parents: HashMap<TileCoord, Option<TileCoord>> = HashMap::new();
        let mut closed_set: HashSet<TileCoord> = HashSet::new();

        g_costs.insert(start, 0);
        parents.insert(start, None);
        open_set.push(SearchNode {
            coord: start,
            f_score: start.distance(&goal),
        });

        // 4-connected neighbors, one tile step each
        let neighbors = [(0, -1), (0, 1), (-1, 0), (1, 0)];

        let mut iterations = 0;

        while let Some(current_node) = open_set.pop() {
            iterations += 1;
            if iterations > self.config.max_iterations {
                tracing::warn!("A* exceeded max iterations");
                return None;
            }

            let current = current_node.coord;

            // Skip if already settled (stale heap entry)
            if !closed_set.insert(current) {
                continue;
            }

            // Goal is only final once popped, which guarantees the first
            // path found is cost-optimal under the heuristic.
            if current == goal {
                return Some(self.reconstruct_path(&parents, current, tile_size));
            }

            let current_g = *g_costs.get(&current).unwrap_or(&i32::MAX);

            for &(dx, dy) in &neighbors {
                let neighbor =
                    TileCoord::new(current.x + dx * tile_size, current.y + dy * tile_size);

                if neighbor.x < 0 || neighbor.x >= width || neighbor.y < 0 || neighbor.y >= height {
                    continue;
                }

                if grid.is_region_blocked(&neighbor.region(tile_size)) {
                    continue;
                }

                // Uniform edge cost: one tile per step
                let new_g = current_g.saturating_add(tile_size);

                let existing_g = *g_costs.get(&neighbor).unwrap_or(&i32::MAX);
                if new_g < existing_g {
                    g_costs.insert(neighbor, new_g);
                    parents.insert(neighbor, Some(current));

                    let f_score = new_g as f32 + neighbor.distance(&goal);
                    open_set.push(SearchNode {
                        coord: neighbor,
                        f_score,
                    });
                }
            }
        }

        // Frontier exhausted without reaching the goal
        None
    }

    /// Reconstruct path from the parent map.
    fn reconstruct_path(
        &self,
        parents: &HashMap<TileCoord, Option<TileCoord>>,
        goal: TileCoord,
        tile_size: i32,
    ) -> PlannedPath {
        let mut tiles = Vec::new();
        let mut current = Some(goal);

        while let Some(coord) = current {
            tiles.push(coord);
            current = parents.get(&coord).copied().flatten();
        }

        tiles.reverse();
        let cost = tile_size * (tiles.len().saturating_sub(1)) as i32;

        PlannedPath { tiles, cost }
    }
}
