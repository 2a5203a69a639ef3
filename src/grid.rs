//! Tile geometry and the obstacle oracle.
//!
//! Positions come in two flavors: continuous pixel positions used for
//! rendering and per-tick movement, and tile coordinates snapped to the
//! grid for search. Obstacles are axis-aligned pixel rectangles collected
//! into a fresh snapshot for every search, so obstacles may move freely
//! between planner invocations.

/// A tile coordinate in pixel units, always a multiple of the tile size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another tile, in pixels.
    #[inline]
    pub fn distance(&self, other: &TileCoord) -> f32 {
        let dx = (other.x - self.x) as f32;
        let dy = (other.y - self.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// The tile-sized region this coordinate covers.
    pub fn region(&self, tile_size: i32) -> Region {
        Region::new(self.x, self.y, tile_size, tile_size)
    }
}

/// A continuous position in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    #[inline]
    pub fn distance(&self, other: &Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Snap to the top-left corner of the containing tile.
    pub fn snap_to_grid(&self, tile_size: i32) -> TileCoord {
        let ts = tile_size as f32;
        TileCoord::new(
            (self.x / ts).floor() as i32 * tile_size,
            (self.y / ts).floor() as i32 * tile_size,
        )
    }
}

impl From<TileCoord> for Position {
    fn from(tile: TileCoord) -> Self {
        Position::new(tile.x as f32, tile.y as f32)
    }
}

/// An axis-aligned rectangular region in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Region {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Overlap test with half-open edges: regions that merely touch
    /// along an edge do not intersect.
    #[inline]
    pub fn intersects(&self, other: &Region) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }

    /// Grow the region by `dx`/`dy` pixels while keeping its center.
    pub fn inflate(&self, dx: i32, dy: i32) -> Region {
        Region::new(self.x - dx / 2, self.y - dy / 2, self.w + dx, self.h + dy)
    }

    /// Region of the given size centered on a continuous position.
    pub fn centered_at(pos: Position, w: i32, h: i32) -> Region {
        Region::new(
            (pos.x - w as f32 / 2.0).round() as i32,
            (pos.y - h as f32 / 2.0).round() as i32,
            w,
            h,
        )
    }
}

/// Read-only view of the grid a search runs against.
///
/// Implementations must not be mutated while a search holds the view;
/// [`ObstacleGrid`] satisfies this by being an owned snapshot.
pub trait GridOracle {
    /// Tile edge length in pixels.
    fn tile_size(&self) -> i32;

    /// Screen bounds as (width, height) in pixels.
    fn bounds(&self) -> (i32, i32);

    /// Whether the region intersects any obstacle.
    fn is_region_blocked(&self, region: &Region) -> bool;
}

/// Obstacle snapshot for one planner invocation.
///
/// Holds static walls plus dynamic danger zones in insertion order.
/// Rebuilt fresh for every search rather than mutated in place.
#[derive(Clone, Debug)]
pub struct ObstacleGrid {
    tile_size: i32,
    width: i32,
    height: i32,
    obstacles: Vec<Region>,
}

impl ObstacleGrid {
    /// Create an empty snapshot with the given geometry.
    pub fn new(tile_size: i32, width: i32, height: i32) -> Self {
        Self {
            tile_size,
            width,
            height,
            obstacles: Vec::new(),
        }
    }

    /// Add a single obstacle region.
    pub fn add_obstacle(&mut self, region: Region) {
        self.obstacles.push(region);
    }

    /// Add a batch of obstacle regions, preserving order.
    pub fn add_obstacles<I: IntoIterator<Item = Region>>(&mut self, regions: I) {
        self.obstacles.extend(regions);
    }

    /// Add an inflated danger zone around another agent's position.
    ///
    /// The zone is the agent's tile-sized rect grown by two tiles on each
    /// axis, so planned paths keep clear of moving agents.
    pub fn add_danger_zone(&mut self, center: Position) {
        let rect = Region::centered_at(center, self.tile_size, self.tile_size);
        self.obstacles
            .push(rect.inflate(self.tile_size * 2, self.tile_size * 2));
    }

    /// Number of obstacle regions in the snapshot.
    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }
}

impl GridOracle for ObstacleGrid {
    fn tile_size(&self) -> i32 {
        self.tile_size
    }

    fn bounds(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn is_region_blocked(&self, region: &Region) -> bool {
        self.obstacles.iter().any(|o| o.intersects(region))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_to_grid() {
        assert_eq!(
            Position::new(33.7, 95.9).snap_to_grid(32),
            TileCoord::new(32, 64)
        );
        assert_eq!(
            Position::new(32.0, 64.0).snap_to_grid(32),
            TileCoord::new(32, 64)
        );
        assert_eq!(
            Position::new(0.0, 0.0).snap_to_grid(32),
            TileCoord::new(0, 0)
        );
    }

    #[test]
    fn test_region_intersects() {
        let a = Region::new(0, 0, 32, 32);
        assert!(a.intersects(&Region::new(16, 16, 32, 32)));
        assert!(a.intersects(&Region::new(0, 0, 32, 32)));
        // Touching edges do not collide.
        assert!(!a.intersects(&Region::new(32, 0, 32, 32)));
        assert!(!a.intersects(&Region::new(0, 32, 32, 32)));
        assert!(!a.intersects(&Region::new(64, 64, 32, 32)));
    }

    #[test]
    fn test_inflate_keeps_center() {
        let zone = Region::new(32, 32, 32, 32).inflate(64, 64);
        assert_eq!(zone, Region::new(0, 0, 96, 96));
    }

    #[test]
    fn test_obstacle_grid_blocking() {
        let mut grid = ObstacleGrid::new(32, 800, 600);
        grid.add_obstacle(Region::new(64, 64, 32, 32));
        assert!(grid.is_region_blocked(&Region::new(64, 64, 32, 32)));
        assert!(grid.is_region_blocked(&Region::new(80, 80, 32, 32)));
        assert!(!grid.is_region_blocked(&Region::new(0, 0, 32, 32)));
        assert!(!grid.is_region_blocked(&Region::new(96, 64, 32, 32)));
    }

    #[test]
    fn test_danger_zone_blocks_surrounding_tiles() {
        let mut grid = ObstacleGrid::new(32, 800, 600);
        grid.add_danger_zone(Position::new(144.0, 144.0));
        // Center tile and immediate neighbors fall inside the zone.
        assert!(grid.is_region_blocked(&TileCoord::new(128, 128).region(32)));
        assert!(grid.is_region_blocked(&TileCoord::new(96, 128).region(32)));
        // Tiles two steps out are clear.
        assert!(!grid.is_region_blocked(&TileCoord::new(32, 128).region(32)));
    }
}
