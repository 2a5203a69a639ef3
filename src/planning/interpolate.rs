//! Step-buffer interpolation.
//!
//! Turns the leading tiles of a discrete path into a bounded buffer of
//! continuous positions matching the agent's speed, drained one per
//! simulation tick. Consumed tiles are removed from the path, so the
//! path shrinks monotonically as the agent walks it.

use crate::error::{NavError, Result};
use crate::grid::Position;
use crate::motion::AgentMotion;

/// Refill the agent's step buffer from up to `lookahead` leading path
/// tiles.
///
/// Intended to be called only when the step buffer is empty and the path
/// is non-empty; calling it otherwise is harmless but appends further
/// steps. Rejects `speed <= 0` before any step arithmetic.
pub fn refill(agent: &mut AgentMotion, speed: f32, lookahead: usize) -> Result<()> {
    if speed <= 0.0 {
        return Err(NavError::DegenerateSpeed(speed));
    }

    let take = agent.path.len().min(lookahead);
    let mut current = agent.position();

    for _ in 0..take {
        let Some(node) = agent.path.pop_front() else {
            break;
        };
        let target = Position::from(node);
        emit_segment(agent, current, target, speed);
        current = target;
    }

    tracing::debug!(
        steps = agent.steps.len(),
        path_remaining = agent.path.len(),
        "step buffer refilled"
    );
    Ok(())
}

/// Interpolate directly toward a continuous point, bypassing the tile
/// path. Used for the final approach once the agent shares a tile with
/// its goal.
pub fn refill_to_point(agent: &mut AgentMotion, target: Position, speed: f32) -> Result<()> {
    if speed <= 0.0 {
        return Err(NavError::DegenerateSpeed(speed));
    }
    let current = agent.position();
    emit_segment(agent, current, target, speed);
    Ok(())
}

/// Append the interpolated steps for one segment, ending exactly on the
/// target. `num_steps >= 1` always, so zero-length segments still emit a
/// single step and cannot divide by zero.
fn emit_segment(agent: &mut AgentMotion, from: Position, to: Position, speed: f32) {
    let dx = (to.x - from.x).abs();
    let dy = (to.y - from.y).abs();

    let num_steps = ((dx / speed) as usize)
        .max((dy / speed) as usize)
        .max(1);

    for i in 1..=num_steps {
        let t = i as f32 / num_steps as f32;
        agent.steps.push_back(Position::new(
            from.x + (to.x - from.x) * t,
            from.y + (to.y - from.y) * t,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileCoord;
    use crate::planning::PlannedPath;

    fn agent_with_path(start: Position, tiles: Vec<TileCoord>) -> AgentMotion {
        let mut agent = AgentMotion::new(start);
        let cost = 32 * (tiles.len().saturating_sub(1)) as i32;
        agent.set_path(PlannedPath { tiles, cost });
        agent
    }

    #[test]
    fn test_segment_endpoints_reproduce_tiles() {
        let tiles = vec![
            TileCoord::new(32, 0),
            TileCoord::new(64, 0),
            TileCoord::new(64, 32),
        ];
        let mut agent = agent_with_path(Position::new(0.0, 0.0), tiles.clone());

        refill(&mut agent, 4.0, 5).unwrap();

        // Each 32-pixel segment at speed 4 yields 8 steps; the last step
        // of each segment lands exactly on the tile.
        assert_eq!(agent.steps.len(), 24);
        for (i, tile) in tiles.iter().enumerate() {
            let endpoint = agent.steps[(i + 1) * 8 - 1];
            assert_eq!(endpoint, Position::from(*tile));
        }
        assert!(agent.path.is_empty());
    }

    #[test]
    fn test_step_distance_bounded_by_speed() {
        let tiles = vec![
            TileCoord::new(32, 0),
            TileCoord::new(32, 32),
            TileCoord::new(64, 32),
        ];
        let mut agent = agent_with_path(Position::new(0.0, 0.0), tiles);
        let speed = 8.0;

        refill(&mut agent, speed, 5).unwrap();

        let mut prev = Position::new(0.0, 0.0);
        for step in agent.steps.iter() {
            assert!(prev.distance(step) <= speed + 1e-4);
            prev = *step;
        }
    }

    #[test]
    fn test_lookahead_truncates_prefix_only() {
        let tiles: Vec<TileCoord> = (1..=8).map(|i| TileCoord::new(i * 32, 0)).collect();
        let mut agent = agent_with_path(Position::new(0.0, 0.0), tiles);

        refill(&mut agent, 4.0, 5).unwrap();

        // Five tiles consumed, three remain, in order.
        assert_eq!(agent.path.len(), 3);
        assert_eq!(agent.path[0], TileCoord::new(192, 0));
        let last = *agent.steps.back().unwrap();
        assert_eq!(last, Position::new(160.0, 0.0));
    }

    #[test]
    fn test_short_path_consumed_entirely() {
        let mut agent = agent_with_path(
            Position::new(0.0, 0.0),
            vec![TileCoord::new(32, 0), TileCoord::new(64, 0)],
        );

        refill(&mut agent, 4.0, 5).unwrap();
        assert!(agent.path.is_empty());
        assert_eq!(*agent.steps.back().unwrap(), Position::new(64.0, 0.0));
    }

    #[test]
    fn test_zero_length_segment_emits_single_step() {
        let mut agent = agent_with_path(Position::new(32.0, 0.0), vec![TileCoord::new(32, 0)]);

        refill(&mut agent, 4.0, 5).unwrap();
        assert_eq!(agent.steps.len(), 1);
        assert_eq!(agent.steps[0], Position::new(32.0, 0.0));
    }

    #[test]
    fn test_degenerate_speed_rejected() {
        let mut agent = agent_with_path(Position::new(0.0, 0.0), vec![TileCoord::new(32, 0)]);

        assert!(matches!(
            refill(&mut agent, 0.0, 5),
            Err(NavError::DegenerateSpeed(_))
        ));
        assert!(matches!(
            refill(&mut agent, -3.0, 5),
            Err(NavError::DegenerateSpeed(_))
        ));
        // Nothing was consumed or emitted.
        assert_eq!(agent.path.len(), 1);
        assert!(agent.steps.is_empty());
    }

    #[test]
    fn test_refill_to_point_final_approach() {
        let mut agent = AgentMotion::new(Position::new(64.0, 64.0));

        refill_to_point(&mut agent, Position::new(70.0, 64.0), 3.0).unwrap();
        // 6 pixels at speed 3: two steps, ending exactly on the target.
        assert_eq!(agent.steps.len(), 2);
        assert_eq!(*agent.steps.back().unwrap(), Position::new(70.0, 64.0));
    }
}
