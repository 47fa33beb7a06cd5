//! Narrow phase overlap tests
//!
//! Pairwise exact tests over circles, rotated rectangles and convex polygons.
//! Touching shapes count as overlapping. None of these compute contact data;
//! see [`super::resolve`] for the wall push-out normal.

use glam::Vec2;

use super::shape::{Body, Shape, ShapeKind, rect_corners};

/// Projection interval of a shape on an axis
type Interval = (f32, f32);

#[inline]
fn project_points(points: &[Vec2], axis: Vec2) -> Interval {
    points.iter().fold((f32::MAX, f32::MIN), |(lo, hi), p| {
        let d = p.dot(axis);
        (lo.min(d), hi.max(d))
    })
}

#[inline]
fn project_circle(center: Vec2, radius: f32, axis: Vec2) -> Interval {
    let d = center.dot(axis);
    (d - radius, d + radius)
}

#[inline]
fn disjoint(a: Interval, b: Interval) -> bool {
    a.1 < b.0 || b.1 < a.0
}

/// Unnormalized edge normals of a closed polygon
fn edge_normals(vertices: &[Vec2]) -> impl Iterator<Item = Vec2> + '_ {
    let n = vertices.len();
    (0..n).map(move |i| {
        let edge = vertices[(i + 1) % n] - vertices[i];
        Vec2::new(-edge.y, edge.x)
    })
}

/// Swept circle test over one frame
///
/// Both circles move at constant velocity for `dt`. Solves
/// `|Δp + Δv·t|² = (r1 + r2)²` for `t` in the unit frame interval.
pub fn swept_circles(
    center_a: Vec2,
    radius_a: f32,
    vel_a: Vec2,
    center_b: Vec2,
    radius_b: f32,
    vel_b: Vec2,
    dt: f32,
) -> bool {
    let radius_sum = radius_a + radius_b;
    let rel_pos = center_a - center_b;
    let rel_vel = (vel_a - vel_b) * dt;

    let a = rel_vel.dot(rel_vel);
    let b = 2.0 * rel_pos.dot(rel_vel);
    let c = rel_pos.dot(rel_pos) - radius_sum * radius_sum;

    // Already overlapping at frame start
    if c <= 0.0 {
        return true;
    }
    // No relative motion and apart
    if a == 0.0 {
        return false;
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return false;
    }

    // With c > 0 both roots share a sign, so the earlier root decides
    let t = (-b - discriminant.sqrt()) / (2.0 * a);
    (0.0..=1.0).contains(&t)
}

/// SAT between two rotated rectangles given as world corners
///
/// `bound_a`/`bound_b` are the half-diagonals used for the bounding circle
/// rejection. Axes stay unnormalized: both shapes project on the same vector.
pub fn rects_overlap(
    center_a: Vec2,
    corners_a: &[Vec2; 4],
    bound_a: f32,
    center_b: Vec2,
    corners_b: &[Vec2; 4],
    bound_b: f32,
) -> bool {
    let reach = bound_a + bound_b;
    if center_a.distance_squared(center_b) > reach * reach {
        return false;
    }

    // Two edges per rectangle; the opposite edges are parallel
    let axes = [
        edge_normal(corners_a[0], corners_a[1]),
        edge_normal(corners_a[1], corners_a[2]),
        edge_normal(corners_b[0], corners_b[1]),
        edge_normal(corners_b[1], corners_b[2]),
    ];

    for axis in axes {
        if axis.length_squared() == 0.0 {
            continue;
        }
        if disjoint(project_points(corners_a, axis), project_points(corners_b, axis)) {
            return false;
        }
    }
    true
}

/// SAT between a rotated rectangle and a moving circle
///
/// Axes: the rectangle's two edge normals plus the axis from the circle center
/// to the nearest rectangle corner, all normalized. An axis only separates when
/// the circle is clear of the rectangle at both its current and its next-frame
/// position, so a fast circle cannot skip over the rectangle within one frame.
pub fn rect_circle_overlap(
    rect_center: Vec2,
    corners: &[Vec2; 4],
    circle_center: Vec2,
    radius: f32,
    circle_vel: Vec2,
    dt: f32,
) -> bool {
    let step = circle_vel * dt;
    let rect_bound = corners
        .iter()
        .map(|c| c.distance(rect_center))
        .fold(0.0_f32, f32::max);
    let reach = rect_bound + radius + step.length();
    if rect_center.distance_squared(circle_center) > reach * reach {
        return false;
    }

    let nearest_corner = corners
        .iter()
        .copied()
        .min_by(|a, b| {
            a.distance_squared(circle_center)
                .total_cmp(&b.distance_squared(circle_center))
        })
        .unwrap_or(rect_center);

    let axes = [
        edge_normal(corners[0], corners[1]),
        edge_normal(corners[1], corners[2]),
        nearest_corner - circle_center,
    ];

    let next_center = circle_center + step;
    for axis in axes {
        let len_sq = axis.length_squared();
        if len_sq == 0.0 {
            continue;
        }
        let axis = axis / len_sq.sqrt();

        let rect = project_points(corners, axis);
        let now = project_circle(circle_center, radius, axis);
        let next = project_circle(next_center, radius, axis);
        if disjoint(rect, now) && disjoint(rect, next) {
            return false;
        }
    }
    true
}

#[inline]
fn edge_normal(from: Vec2, to: Vec2) -> Vec2 {
    let edge = to - from;
    Vec2::new(-edge.y, edge.x)
}

/// SAT between two convex vertex sets using the normalized edge normals of both
pub fn convex_overlap(verts_a: &[Vec2], verts_b: &[Vec2]) -> bool {
    if verts_a.is_empty() || verts_b.is_empty() {
        return false;
    }
    for axis in edge_normals(verts_a).chain(edge_normals(verts_b)) {
        let Some(axis) = axis.try_normalize() else {
            continue;
        };
        if disjoint(project_points(verts_a, axis), project_points(verts_b, axis)) {
            return false;
        }
    }
    true
}

/// SAT between a convex polygon and a circle on the polygon's edge normals
pub fn polygon_circle_overlap(verts: &[Vec2], center: Vec2, radius: f32) -> bool {
    if verts.is_empty() {
        return false;
    }
    for axis in edge_normals(verts) {
        let Some(axis) = axis.try_normalize() else {
            continue;
        };
        if disjoint(project_points(verts, axis), project_circle(center, radius, axis)) {
            return false;
        }
    }
    true
}

// Body-level tests. Each expects the shapes named in its signature and
// reports no collision when handed anything else.

/// Circle vs circle, swept over `dt`
pub fn circle_circle(a: &Body, b: &Body, dt: f32) -> bool {
    match (a.radius(), b.radius()) {
        (Some(ra), Some(rb)) => swept_circles(
            a.world_center(),
            ra,
            a.velocity,
            b.world_center(),
            rb,
            b.velocity,
            dt,
        ),
        _ => false,
    }
}

/// Rotated rectangle vs rotated rectangle
pub fn rect_rect(a: &Body, b: &Body, _dt: f32) -> bool {
    match (rect_geometry(a), rect_geometry(b)) {
        (Some((ca, corners_a, ba)), Some((cb, corners_b, bb))) => {
            rects_overlap(ca, &corners_a, ba, cb, &corners_b, bb)
        }
        _ => false,
    }
}

/// Rotated rectangle vs (possibly fast) circle
pub fn rect_circle(rect: &Body, circle: &Body, dt: f32) -> bool {
    match (rect_geometry(rect), circle.radius()) {
        (Some((center, corners, _)), Some(radius)) => rect_circle_overlap(
            center,
            &corners,
            circle.world_center(),
            radius,
            circle.velocity,
            dt,
        ),
        _ => false,
    }
}

/// Convex polygon vs rotated rectangle
pub fn polygon_rect(poly: &Body, rect: &Body, _dt: f32) -> bool {
    if poly.shape.kind() != ShapeKind::ConvexPolygon {
        return false;
    }
    match rect.world_corners() {
        Some(corners) => convex_overlap(&poly.world_vertices(), &corners),
        None => false,
    }
}

/// Convex polygon vs circle
pub fn polygon_circle(poly: &Body, circle: &Body, _dt: f32) -> bool {
    if poly.shape.kind() != ShapeKind::ConvexPolygon {
        return false;
    }
    match circle.radius() {
        Some(radius) => polygon_circle_overlap(&poly.world_vertices(), circle.world_center(), radius),
        None => false,
    }
}

/// Convex polygon vs convex polygon
pub fn polygon_polygon(a: &Body, b: &Body, _dt: f32) -> bool {
    if a.shape.kind() != ShapeKind::ConvexPolygon || b.shape.kind() != ShapeKind::ConvexPolygon {
        return false;
    }
    convex_overlap(&a.world_vertices(), &b.world_vertices())
}

fn rect_geometry(body: &Body) -> Option<(Vec2, [Vec2; 4], f32)> {
    match body.shape {
        Shape::RotatedRect { half_extent, .. } => {
            let center = body.world_center();
            Some((
                center,
                rect_corners(center, half_extent, body.rotation),
                half_extent.length(),
            ))
        }
        _ => None,
    }
}

/// Pairwise test signature: `(first, second, dt)`
pub type PairTest = fn(&Body, &Body, f32) -> bool;

/// Dispatch table entry for an ordered shape pair
///
/// Returns the test and whether the bodies must be swapped to match the
/// test's argument order.
pub fn pair_test(a: ShapeKind, b: ShapeKind) -> (PairTest, bool) {
    use ShapeKind::*;
    match (a, b) {
        (Circle, Circle) => (circle_circle, false),
        (RotatedRect, RotatedRect) => (rect_rect, false),
        (RotatedRect, Circle) => (rect_circle, false),
        (Circle, RotatedRect) => (rect_circle, true),
        (ConvexPolygon, RotatedRect) => (polygon_rect, false),
        (RotatedRect, ConvexPolygon) => (polygon_rect, true),
        (ConvexPolygon, Circle) => (polygon_circle, false),
        (Circle, ConvexPolygon) => (polygon_circle, true),
        (ConvexPolygon, ConvexPolygon) => (polygon_polygon, false),
    }
}

/// Run the narrow phase test matching the two bodies' shapes
pub fn bodies_overlap(a: &Body, b: &Body, dt: f32) -> bool {
    let (test, swap) = pair_test(a.shape.kind(), b.shape.kind());
    if swap { test(b, a, dt) } else { test(a, b, dt) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{BodyHandle, Shape};

    fn circle(id: u32, pos: Vec2, radius: f32) -> Body {
        Body::new(BodyHandle(id), pos, Shape::circle(radius))
    }

    fn rect(id: u32, pos: Vec2, half: Vec2) -> Body {
        Body::new(BodyHandle(id), pos, Shape::rect(half))
    }

    fn square_poly(id: u32, pos: Vec2, half: f32) -> Body {
        let verts = vec![
            Vec2::new(-half, -half),
            Vec2::new(half, -half),
            Vec2::new(half, half),
            Vec2::new(-half, half),
        ];
        Body::new(BodyHandle(id), pos, Shape::polygon(verts))
    }

    #[test]
    fn test_swept_circles_tunneling_is_caught() {
        // Radius 5 circles 100 apart, A covers 100 units this frame
        let a = circle(1, Vec2::ZERO, 5.0).with_velocity(Vec2::new(2000.0, 0.0));
        let b = circle(2, Vec2::new(100.0, 0.0), 5.0);
        assert!(circle_circle(&a, &b, 0.05));
        assert!(bodies_overlap(&b, &a, 0.05));
    }

    #[test]
    fn test_swept_circles_already_overlapping() {
        let a = circle(1, Vec2::ZERO, 5.0);
        let b = circle(2, Vec2::new(9.0, 0.0), 5.0);
        assert!(circle_circle(&a, &b, 0.0));
    }

    #[test]
    fn test_swept_circles_miss() {
        // Moving away
        let a = circle(1, Vec2::ZERO, 5.0).with_velocity(Vec2::new(-500.0, 0.0));
        let b = circle(2, Vec2::new(50.0, 0.0), 5.0);
        assert!(!circle_circle(&a, &b, 0.1));

        // Moving toward but too slow to arrive this frame
        let a = a.with_velocity(Vec2::new(100.0, 0.0));
        assert!(!circle_circle(&a, &b, 0.1));

        // Passing alongside
        let a = circle(1, Vec2::new(0.0, 20.0), 5.0).with_velocity(Vec2::new(1000.0, 0.0));
        assert!(!circle_circle(&a, &b, 0.1));
    }

    #[test]
    fn test_swept_circles_static_apart() {
        let a = circle(1, Vec2::ZERO, 5.0);
        let b = circle(2, Vec2::new(11.0, 0.0), 5.0);
        assert!(!circle_circle(&a, &b, 1.0));
    }

    #[test]
    fn test_rect_rect_axis_aligned() {
        let a = rect(1, Vec2::ZERO, Vec2::new(10.0, 5.0));
        let b = rect(2, Vec2::new(19.0, 0.0), Vec2::new(10.0, 5.0));
        let c = rect(3, Vec2::new(21.0, 0.0), Vec2::new(10.0, 5.0));
        assert!(rect_rect(&a, &b, 0.0));
        assert!(!rect_rect(&a, &c, 0.0));
    }

    #[test]
    fn test_rect_rect_rotation_separates() {
        // Parallel bars turned upright: bounding circles overlap, edges do not
        let a = rect(1, Vec2::ZERO, Vec2::new(20.0, 2.0)).with_rotation(90.0);
        let b = rect(2, Vec2::new(5.0, 0.0), Vec2::new(20.0, 2.0)).with_rotation(90.0);
        assert!(!rect_rect(&a, &b, 0.0));

        // Diamond tip pokes into an axis-aligned square
        let a = rect(1, Vec2::ZERO, Vec2::splat(10.0)).with_rotation(45.0);
        let b = rect(2, Vec2::new(22.0, 0.0), Vec2::splat(10.0));
        assert!(rect_rect(&a, &b, 0.0));
    }

    #[test]
    fn test_rect_rect_bounding_circle_rejects() {
        let a = rect(1, Vec2::ZERO, Vec2::splat(10.0));
        let b = rect(2, Vec2::new(100.0, 100.0), Vec2::splat(10.0));
        assert!(!rect_rect(&a, &b, 0.0));
    }

    #[test]
    fn test_rect_circle_static() {
        let wall = rect(1, Vec2::ZERO, Vec2::splat(50.0));
        assert!(rect_circle(&wall, &circle(2, Vec2::new(0.0, 58.0), 10.0), 0.0));
        assert!(!rect_circle(&wall, &circle(2, Vec2::new(0.0, 61.0), 10.0), 0.0));
        // Near the corner but outside the rounded region
        assert!(!rect_circle(&wall, &circle(2, Vec2::new(59.0, 59.0), 10.0), 0.0));
    }

    #[test]
    fn test_rect_circle_next_position_catches_tunneling() {
        let wall = rect(1, Vec2::ZERO, Vec2::splat(50.0));
        let ball = circle(2, Vec2::new(0.0, 70.0), 10.0).with_velocity(Vec2::new(0.0, -2000.0));
        assert!(rect_circle(&wall, &ball, 0.05));
        assert!(bodies_overlap(&ball, &wall, 0.05));

        // Same circle at rest does not touch
        assert!(!rect_circle(&wall, &ball, 0.0));
    }

    #[test]
    fn test_rect_circle_moving_away() {
        let wall = rect(1, Vec2::ZERO, Vec2::splat(50.0));
        let ball = circle(2, Vec2::new(0.0, 70.0), 10.0).with_velocity(Vec2::new(0.0, 2000.0));
        assert!(!rect_circle(&wall, &ball, 0.05));
    }

    #[test]
    fn test_polygon_rect() {
        let poly = square_poly(1, Vec2::ZERO, 10.0).with_rotation(45.0);
        let touching = rect(2, Vec2::new(20.0, 0.0), Vec2::splat(10.0));
        let apart = rect(3, Vec2::new(25.0, 0.0), Vec2::splat(10.0));
        assert!(polygon_rect(&poly, &touching, 0.0));
        assert!(!polygon_rect(&poly, &apart, 0.0));
        assert!(bodies_overlap(&touching, &poly, 0.0));
    }

    #[test]
    fn test_polygon_circle() {
        let tri = Body::new(
            BodyHandle(1),
            Vec2::ZERO,
            Shape::polygon(vec![Vec2::new(0.0, 0.0), Vec2::new(20.0, 0.0), Vec2::new(0.0, 20.0)]),
        );
        assert!(polygon_circle(&tri, &circle(2, Vec2::new(5.0, -4.0), 5.0), 0.0));
        assert!(!polygon_circle(&tri, &circle(2, Vec2::new(5.0, -6.0), 5.0), 0.0));
        // Beyond the hypotenuse
        assert!(!polygon_circle(&tri, &circle(2, Vec2::new(15.0, 15.0), 5.0), 0.0));
    }

    #[test]
    fn test_polygon_polygon() {
        let a = square_poly(1, Vec2::ZERO, 10.0);
        let b = square_poly(2, Vec2::new(15.0, 15.0), 10.0);
        let c = square_poly(3, Vec2::new(25.0, 0.0), 10.0);
        assert!(bodies_overlap(&a, &b, 0.0));
        assert!(!bodies_overlap(&a, &c, 0.0));
    }

    #[test]
    fn test_degenerate_shapes_do_not_panic() {
        let flat = rect(1, Vec2::ZERO, Vec2::ZERO);
        let other = rect(2, Vec2::ZERO, Vec2::ZERO);
        assert!(rect_rect(&flat, &other, 0.0));

        let dot = circle(3, Vec2::new(-50.0, -50.0), 0.5);
        let wall = rect(4, Vec2::ZERO, Vec2::splat(50.0));
        // Circle center sits exactly on a corner: the corner axis is zero length
        assert!(rect_circle(&wall, &dot, 0.0));

        let empty = Body::new(BodyHandle(5), Vec2::ZERO, Shape::polygon(Vec::new()));
        assert!(!polygon_circle(&empty, &dot, 0.0));
    }

    #[test]
    fn test_dispatch_table_is_symmetric() {
        let kinds = [ShapeKind::Circle, ShapeKind::RotatedRect, ShapeKind::ConvexPolygon];
        for a in kinds {
            for b in kinds {
                let (_, swap_ab) = pair_test(a, b);
                let (_, swap_ba) = pair_test(b, a);
                if a != b {
                    assert_ne!(swap_ab, swap_ba);
                } else {
                    assert!(!swap_ab);
                }
            }
        }
    }
}
