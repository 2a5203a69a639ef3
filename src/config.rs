//! Configuration loading for tilenav

use crate::error::{NavError, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Clone, Debug, Deserialize)]
pub struct NavConfig {
    #[serde(default)]
    pub grid: GridConfig,
    /// Profile for the goal-seeking agent
    #[serde(default = "default_seeker")]
    pub seeker: AgentConfig,
    /// Profile for pursuit agents chasing a moving target
    #[serde(default = "default_pursuer")]
    pub pursuer: AgentConfig,
    #[serde(default)]
    pub planner: PlannerConfig,
}

/// Grid dimensions and tile geometry
#[derive(Clone, Debug, Deserialize)]
pub struct GridConfig {
    /// Tile edge length in pixels (default: 32)
    #[serde(default = "default_tile_size")]
    pub tile_size: i32,

    /// Screen width in pixels (default: 800)
    #[serde(default = "default_screen_width")]
    pub screen_width: i32,

    /// Screen height in pixels (default: 600)
    #[serde(default = "default_screen_height")]
    pub screen_height: i32,
}

/// Per-agent movement and replanning parameters
#[derive(Clone, Debug, Deserialize)]
pub struct AgentConfig {
    /// Movement speed in pixels per tick (default: 3.0)
    #[serde(default = "default_speed")]
    pub speed: f32,

    /// Minimum interval between replanning triggers in milliseconds
    #[serde(default = "default_seeker_interval")]
    pub replan_interval_ms: u64,

    /// Number of leading path tiles interpolated per refill (default: 5)
    #[serde(default = "default_lookahead")]
    pub lookahead: usize,
}

/// Planner worker pool parameters
#[derive(Clone, Debug, Deserialize)]
pub struct PlannerConfig {
    /// Number of worker threads (default: 2)
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Bound on queued search requests (default: 8)
    #[serde(default = "default_queue_depth")]
    pub queue_depth: usize,

    /// Maximum search iterations before giving up (default: 50000)
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

impl AgentConfig {
    /// Replanning interval as a `Duration`.
    pub fn replan_interval(&self) -> Duration {
        Duration::from_millis(self.replan_interval_ms)
    }
}

// Default value functions
fn default_tile_size() -> i32 {
    32
}
fn default_screen_width() -> i32 {
    800
}
fn default_screen_height() -> i32 {
    600
}
fn default_speed() -> f32 {
    3.0
}
fn default_seeker_interval() -> u64 {
    350
}
fn default_pursuer_interval() -> u64 {
    200
}
fn default_lookahead() -> usize {
    5
}
fn default_workers() -> usize {
    2
}
fn default_queue_depth() -> usize {
    8
}
fn default_max_iterations() -> usize {
    50_000
}

fn default_seeker() -> AgentConfig {
    AgentConfig {
        speed: default_speed(),
        replan_interval_ms: default_seeker_interval(),
        lookahead: default_lookahead(),
    }
}

fn default_pursuer() -> AgentConfig {
    AgentConfig {
        speed: default_speed(),
        replan_interval_ms: default_pursuer_interval(),
        lookahead: default_lookahead(),
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            tile_size: default_tile_size(),
            screen_width: default_screen_width(),
            screen_height: default_screen_height(),
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            queue_depth: default_queue_depth(),
            max_iterations: default_max_iterations(),
        }
    }
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            seeker: default_seeker(),
            pursuer: default_pursuer(),
            planner: PlannerConfig::default(),
        }
    }
}

impl NavConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: NavConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants the rest of the crate relies on.
    pub fn validate(&self) -> Result<()> {
        if self.grid.tile_size <= 0 {
            return Err(NavError::Config(format!(
                "tile_size must be positive, got {}",
                self.grid.tile_size
            )));
        }
        if self.grid.screen_width <= 0 || self.grid.screen_height <= 0 {
            return Err(NavError::Config(format!(
                "screen bounds must be positive, got {}x{}",
                self.grid.screen_width, self.grid.screen_height
            )));
        }
        for agent in [&self.seeker, &self.pursuer] {
            if agent.speed <= 0.0 {
                return Err(NavError::DegenerateSpeed(agent.speed));
            }
            if agent.lookahead == 0 {
                return Err(NavError::Config("lookahead must be at least 1".into()));
            }
        }
        if self.planner.workers == 0 {
            return Err(NavError::Config("planner.workers must be at least 1".into()));
        }
        Ok(())
    }
}
