//! Gridsight - spatial reasoning for top-down grid maps
//!
//! Core modules:
//! - `world`: Traversability grid and world/grid coordinate conversion
//! - `collision`: Broad phase spatial hash, narrow phase SAT tests, wall response
//! - `nav`: A* pathfinding, line of sight, waypoint following
//! - `settings`: Data-driven engine configuration

pub mod collision;
pub mod nav;
pub mod settings;
pub mod world;

pub use collision::{Body, BodyHandle, CollisionRecord, Shape, SpatialHashGrid, run_collision_pass};
pub use nav::{PathFollower, find_path, has_line_of_sight};
pub use settings::{EngineSettings, SettingsError};
pub use world::{NavGrid, TileGrid, TileKind};

use glam::Vec2;

/// Engine configuration constants
pub mod consts {
    /// Default spatial hash bucket size (world units)
    pub const DEFAULT_HASH_CELL_SIZE: f32 = 100.0;
    /// Default navigation grid cell size (world units)
    pub const DEFAULT_GRID_CELL_SIZE: f32 = 64.0;

    /// A* step costs
    pub const CARDINAL_COST: f32 = 1.0;
    pub const DIAGONAL_COST: f32 = std::f32::consts::SQRT_2;

    /// Distance at which a path follower considers a waypoint reached
    pub const WAYPOINT_ARRIVAL_DISTANCE: f32 = 30.0;
}

/// Rotate a vector by an angle given in degrees (counter-clockwise)
#[inline]
pub fn rotate_degrees(v: Vec2, degrees: f32) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    rotate_point(v, sin, cos)
}

/// Rotate a vector using a precomputed sine/cosine pair
#[inline]
pub fn rotate_point(v: Vec2, sin: f32, cos: f32) -> Vec2 {
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}
