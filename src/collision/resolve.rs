//! Collision response against static walls
//!
//! Walls never move and have no mass here: bodies either slide along them
//! (velocity projection) or ricochet off them (mirror reflection).

use glam::Vec2;

use super::shape::Body;

/// Push-out normal for a point touching an axis-aligned wall rectangle
///
/// The point is clamped onto the rectangle to find the nearest boundary
/// point; the normal runs from there back to the query point. A point that
/// coincides with its clamped position (inside the wall) gets `(0, 1)`.
pub fn wall_normal_for(point: Vec2, wall_center: Vec2, wall_half_extent: Vec2) -> Vec2 {
    let closest = point
        .max(wall_center - wall_half_extent)
        .min(wall_center + wall_half_extent);
    let relative = point - closest;

    if relative == Vec2::ZERO {
        return Vec2::Y;
    }

    relative.normalize()
}

/// Remove the velocity component driving into a surface
///
/// Velocity already moving away from (or along) the surface is returned
/// unchanged. No bounce, no friction.
#[inline]
pub fn slide_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    let into = velocity.dot(normal);
    if into >= 0.0 {
        return velocity;
    }
    velocity - into * normal
}

/// Slide a moving point along a static wall body
///
/// The wall rectangle is the static body's axis-aligned footprint.
pub fn slide_against(point: Vec2, velocity: Vec2, wall: &Body) -> Vec2 {
    let footprint = wall.aabb();
    let normal = wall_normal_for(point, footprint.center(), footprint.half_extent());
    slide_velocity(velocity, normal)
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Reflect velocity and scale the result (ricochet with energy loss)
pub fn ricochet(velocity: Vec2, normal: Vec2, restitution: f32) -> Vec2 {
    reflect_velocity(velocity, normal) * restitution
}
