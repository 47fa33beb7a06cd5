//! Waypoint following for path-driven movers
//!
//! A follower caches the last path it was given and only asks for a new one
//! when the path is invalidated or a visible target moves to another cell.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::astar::find_path;
use crate::consts::WAYPOINT_ARRIVAL_DISTANCE;
use crate::world::NavGrid;

/// Cached path plus progress along it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathFollower {
    waypoints: Vec<IVec2>,
    current_index: usize,
    valid: bool,
    /// Cell the cached path leads to
    target_cell: Option<IVec2>,
    /// Waypoints closer than this count as reached
    pub arrival_distance: f32,
}

impl Default for PathFollower {
    fn default() -> Self {
        Self::new(WAYPOINT_ARRIVAL_DISTANCE)
    }
}

impl PathFollower {
    pub fn new(arrival_distance: f32) -> Self {
        Self {
            waypoints: Vec::new(),
            current_index: 0,
            valid: false,
            target_cell: None,
            arrival_distance,
        }
    }

    pub fn waypoints(&self) -> &[IVec2] {
        &self.waypoints
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn target_cell(&self) -> Option<IVec2> {
        self.target_cell
    }

    /// Waypoint currently being approached
    pub fn current_waypoint(&self) -> Option<IVec2> {
        self.waypoints.get(self.current_index).copied()
    }

    /// All waypoints consumed (or no path)
    pub fn is_finished(&self) -> bool {
        self.current_index >= self.waypoints.len()
    }

    /// Force a replan on the next check
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Whether the cached path should be recomputed
    ///
    /// A visible target that has left the cached target cell triggers a
    /// replan; a hidden one keeps the old path so the mover checks the last
    /// known position.
    pub fn needs_replan(&self, target_cell: IVec2, target_visible: bool) -> bool {
        !self.valid || (target_visible && self.target_cell != Some(target_cell))
    }

    /// Compute a fresh path from `from` to `target`
    ///
    /// Returns false and clears the cached path when the target is unreachable.
    pub fn replan<G: NavGrid + ?Sized>(&mut self, from: IVec2, target: IVec2, grid: &G) -> bool {
        let path = find_path(from, target, grid);
        self.current_index = 0;
        if path.is_empty() {
            self.waypoints.clear();
            self.valid = false;
            self.target_cell = None;
            return false;
        }
        self.waypoints = path;
        self.valid = true;
        self.target_cell = Some(target);
        true
    }

    /// Velocity toward the current waypoint's cell center
    ///
    /// Waypoints within the arrival distance are skipped. Returns zero once the
    /// path is exhausted.
    pub fn steer<G: NavGrid + ?Sized>(&mut self, position: Vec2, speed: f32, grid: &G) -> Vec2 {
        while let Some(cell) = self.current_waypoint() {
            let delta = grid.cell_to_world(cell) - position;
            let dist = delta.length();
            if dist > self.arrival_distance {
                return delta / dist * speed;
            }
            self.current_index += 1;
        }
        Vec2::ZERO
    }
}
