//! Optional move-policy oracle.
//!
//! A learned model may bias or replace move decisions, but navigation
//! must work identically without one — the oracle is an opaque
//! collaborator behind a trait. This module also generates labeled
//! training samples for such a model by running the planner on random
//! reachable tile pairs and taking the first optimal step as the label.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::grid::{GridOracle, ObstacleGrid, TileCoord};
use crate::planning::AStarPlanner;

/// A discrete move class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Right,
    Left,
}

impl Direction {
    /// Class encoding used for model labels: up=0, down=1, right=2,
    /// left=3.
    pub fn class_id(self) -> u8 {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Right => 2,
            Direction::Left => 3,
        }
    }

    /// Tile-step displacement, in screen coordinates (y grows downward).
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Right => (1, 0),
            Direction::Left => (-1, 0),
        }
    }

    /// Classify a single tile step. `None` when the tiles coincide or
    /// the step is not axis-aligned.
    pub fn from_step(from: TileCoord, to: TileCoord) -> Option<Direction> {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        match (dx.signum(), dy.signum()) {
            (1, 0) => Some(Direction::Right),
            (-1, 0) => Some(Direction::Left),
            (0, 1) => Some(Direction::Down),
            (0, -1) => Some(Direction::Up),
            _ => None,
        }
    }
}

/// Feature vector a policy model consumes: current tile, goal tile, and
/// the heuristic distance between them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveFeatures {
    pub x: i32,
    pub y: i32,
    pub goal_x: i32,
    pub goal_y: i32,
    pub distance: f32,
}

impl MoveFeatures {
    pub fn new(current: TileCoord, goal: TileCoord) -> Self {
        Self {
            x: current.x,
            y: current.y,
            goal_x: goal.x,
            goal_y: goal.y,
            distance: current.distance(&goal),
        }
    }

    /// Flat representation for model input.
    pub fn as_array(&self) -> [f32; 5] {
        [
            self.x as f32,
            self.y as f32,
            self.goal_x as f32,
            self.goal_y as f32,
            self.distance,
        ]
    }
}

/// An opaque move-decision model. Implementations may abstain by
/// returning `None`.
pub trait PolicyOracle {
    fn predict(&self, features: &MoveFeatures) -> Option<Direction>;
}

/// One labeled sample for supervised training.
#[derive(Clone, Debug)]
pub struct TrainingSample {
    pub features: MoveFeatures,
    pub label: Direction,
}

/// Retries when a sampled pair lands on identical tiles.
const MAX_RETRIES_PER_SAMPLE: usize = 10;

/// Generate labeled training samples from random reachable tile pairs.
///
/// Free tiles are enumerated against the obstacle snapshot; each sample
/// plans an optimal path between a random pair and labels the start
/// features with the direction of the path's first step. Pairs with no
/// path or a trivial one are skipped, so fewer than `num_samples`
/// results may come back.
pub fn generate_training_data<R: Rng>(
    grid: &ObstacleGrid,
    planner: &AStarPlanner,
    num_samples: usize,
    rng: &mut R,
) -> Vec<TrainingSample> {
    let tile_size = grid.tile_size();
    let (width, height) = grid.bounds();

    let mut free_tiles = Vec::new();
    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let tile = TileCoord::new(x, y);
            if !grid.is_region_blocked(&tile.region(tile_size)) {
                free_tiles.push(tile);
            }
            x += tile_size;
        }
        y += tile_size;
    }

    if free_tiles.is_empty() {
        tracing::warn!("no free tiles available for training data");
        return Vec::new();
    }

    let mut samples = Vec::with_capacity(num_samples);

    for _ in 0..num_samples {
        let Some(&start) = free_tiles.choose(rng) else {
            break;
        };
        let mut goal = start;
        let mut retries = 0;
        while goal == start && retries < MAX_RETRIES_PER_SAMPLE {
            if let Some(&candidate) = free_tiles.choose(rng) {
                goal = candidate;
            }
            retries += 1;
        }
        if goal == start {
            continue;
        }

        let Some(path) = planner.find_path(grid, start, goal) else {
            continue;
        };
        if path.tiles.len() < 2 {
            continue;
        }

        let Some(label) = Direction::from_step(path.tiles[0], path.tiles[1]) else {
            continue;
        };
        samples.push(TrainingSample {
            features: MoveFeatures::new(start, goal),
            label,
        });
    }

    tracing::debug!(
        requested = num_samples,
        generated = samples.len(),
        "training data generated"
    );
    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Region;
    use crate::planning::AStarPlanner;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_direction_from_step() {
        let origin = TileCoord::new(64, 64);
        assert_eq!(
            Direction::from_step(origin, TileCoord::new(96, 64)),
            Some(Direction::Right)
        );
        assert_eq!(
            Direction::from_step(origin, TileCoord::new(64, 32)),
            Some(Direction::Up)
        );
        assert_eq!(Direction::from_step(origin, origin), None);
    }

    #[test]
    fn test_class_ids_match_label_encoding() {
        assert_eq!(Direction::Up.class_id(), 0);
        assert_eq!(Direction::Down.class_id(), 1);
        assert_eq!(Direction::Right.class_id(), 2);
        assert_eq!(Direction::Left.class_id(), 3);
    }

    #[test]
    fn test_features_include_heuristic_distance() {
        let features = MoveFeatures::new(TileCoord::new(0, 0), TileCoord::new(96, 128));
        assert_eq!(features.as_array()[..4], [0.0, 0.0, 96.0, 128.0]);
        assert!((features.distance - 160.0).abs() < 1e-4);
    }

    #[test]
    fn test_training_labels_are_optimal_first_steps() {
        let grid = ObstacleGrid::new(32, 320, 320);
        let planner = AStarPlanner::with_defaults();
        let mut rng = StdRng::seed_from_u64(7);

        let samples = generate_training_data(&grid, &planner, 50, &mut rng);
        assert!(!samples.is_empty());

        for sample in &samples {
            let (dx, dy) = sample.label.delta();
            let current = TileCoord::new(sample.features.x, sample.features.y);
            let goal = TileCoord::new(sample.features.goal_x, sample.features.goal_y);
            let next = TileCoord::new(current.x + dx * 32, current.y + dy * 32);

            // On an open grid the optimal first step strictly reduces
            // Manhattan distance to the goal.
            let before = (goal.x - current.x).abs() + (goal.y - current.y).abs();
            let after = (goal.x - next.x).abs() + (goal.y - next.y).abs();
            assert_eq!(after, before - 32);
        }
    }

    #[test]
    fn test_fully_blocked_grid_yields_no_samples() {
        let mut grid = ObstacleGrid::new(32, 64, 64);
        grid.add_obstacle(Region::new(0, 0, 64, 64));
        let planner = AStarPlanner::with_defaults();
        let mut rng = StdRng::seed_from_u64(7);

        let samples = generate_training_data(&grid, &planner, 10, &mut rng);
        assert!(samples.is_empty());
    }

    struct GreedyOracle;

    impl PolicyOracle for GreedyOracle {
        fn predict(&self, features: &MoveFeatures) -> Option<Direction> {
            let dx = features.goal_x - features.x;
            let dy = features.goal_y - features.y;
            if dx.abs() >= dy.abs() {
                Direction::from_step(
                    TileCoord::new(features.x, features.y),
                    TileCoord::new(features.x + dx.signum(), features.y),
                )
            } else {
                Direction::from_step(
                    TileCoord::new(features.x, features.y),
                    TileCoord::new(features.x, features.y + dy.signum()),
                )
            }
        }
    }

    #[test]
    fn test_oracle_trait_object() {
        let oracle: Box<dyn PolicyOracle> = Box::new(GreedyOracle);
        let features = MoveFeatures::new(TileCoord::new(0, 0), TileCoord::new(96, 32));
        assert_eq!(oracle.predict(&features), Some(Direction::Right));
    }
}
