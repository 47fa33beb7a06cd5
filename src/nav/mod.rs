//! Navigation queries over the tile grid
//!
//! Invoked on demand (when a cached path goes stale), not every tick. Both
//! queries run to completion synchronously; an unreachable goal on a large
//! map explores every reachable cell before giving up.

pub mod astar;
pub mod follow;
pub mod sight;

pub use astar::{can_step, find_path, path_cost};
pub use follow::PathFollower;
pub use sight::{GridLine, has_line_of_sight, has_line_of_sight_cells};
