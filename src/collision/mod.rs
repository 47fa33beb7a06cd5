//! Collision detection
//!
//! Broad phase over static geometry, exact narrow phase tests, and the
//! wall response used to slide bodies along static surfaces. Deterministic and
//! single-threaded: the hash is never queried while it is being rebuilt.

pub mod broad;
pub mod narrow;
pub mod pass;
pub mod resolve;
pub mod shape;

pub use broad::SpatialHashGrid;
pub use narrow::{PairTest, bodies_overlap, pair_test};
pub use pass::{CollisionRecord, StaticLookup, dedup_records, run_collision_pass};
pub use resolve::{reflect_velocity, ricochet, slide_against, slide_velocity, wall_normal_for};
pub use shape::{Aabb, Body, BodyHandle, Shape, ShapeKind};
