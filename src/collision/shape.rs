//! Collision bodies and their world-space geometry
//!
//! A body carries exactly one shape. Shape offsets and polygon vertices are
//! local to the body and follow its rotation (degrees, counter-clockwise).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{rotate_degrees, rotate_point};

/// Opaque handle to an externally owned body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// Collision shape attached to a body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32, offset: Vec2 },
    RotatedRect { half_extent: Vec2, offset: Vec2 },
    /// Convex, wound consistently (either direction works for SAT)
    ConvexPolygon { local_vertices: Vec<Vec2> },
}

/// Shape variant without payload, used as the narrow phase dispatch key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Circle,
    RotatedRect,
    ConvexPolygon,
}

impl Shape {
    pub fn circle(radius: f32) -> Self {
        Shape::Circle {
            radius,
            offset: Vec2::ZERO,
        }
    }

    pub fn rect(half_extent: Vec2) -> Self {
        Shape::RotatedRect {
            half_extent,
            offset: Vec2::ZERO,
        }
    }

    pub fn polygon(local_vertices: Vec<Vec2>) -> Self {
        Shape::ConvexPolygon { local_vertices }
    }

    #[inline]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Circle { .. } => ShapeKind::Circle,
            Shape::RotatedRect { .. } => ShapeKind::RotatedRect,
            Shape::ConvexPolygon { .. } => ShapeKind::ConvexPolygon,
        }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, half_extent: Vec2) -> Self {
        Self {
            min: center - half_extent,
            max: center + half_extent,
        }
    }

    /// Tight box around a point set. An empty set yields a zero box at the origin.
    pub fn from_points(points: &[Vec2]) -> Self {
        let Some(&first) = points.first() else {
            return Self {
                min: Vec2::ZERO,
                max: Vec2::ZERO,
            };
        };
        points.iter().fold(
            Self {
                min: first,
                max: first,
            },
            |acc, &p| Self {
                min: acc.min.min(p),
                max: acc.max.max(p),
            },
        )
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn half_extent(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn translated(&self, delta: Vec2) -> Aabb {
        Aabb {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }
}

/// A moving or static collision body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub handle: BodyHandle,
    pub position: Vec2,
    /// Rotation in degrees
    pub rotation: f32,
    pub velocity: Vec2,
    pub shape: Shape,
}

impl Body {
    pub fn new(handle: BodyHandle, position: Vec2, shape: Shape) -> Self {
        Self {
            handle,
            position,
            rotation: 0.0,
            velocity: Vec2::ZERO,
            shape,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    /// Shape center in world space (position plus rotated offset)
    pub fn world_center(&self) -> Vec2 {
        match &self.shape {
            Shape::Circle { offset, .. } | Shape::RotatedRect { offset, .. } => {
                self.position + rotate_degrees(*offset, self.rotation)
            }
            Shape::ConvexPolygon { .. } => self.position,
        }
    }

    /// Circle radius, `None` for other shapes
    pub fn radius(&self) -> Option<f32> {
        match self.shape {
            Shape::Circle { radius, .. } => Some(radius),
            _ => None,
        }
    }

    /// World-space corners of a rotated rectangle, in winding order
    pub fn world_corners(&self) -> Option<[Vec2; 4]> {
        match self.shape {
            Shape::RotatedRect { half_extent, .. } => Some(rect_corners(
                self.world_center(),
                half_extent,
                self.rotation,
            )),
            _ => None,
        }
    }

    /// World-space polygon vertices (rectangles yield their corners)
    pub fn world_vertices(&self) -> Vec<Vec2> {
        match &self.shape {
            Shape::ConvexPolygon { local_vertices } => {
                let (sin, cos) = self.rotation.to_radians().sin_cos();
                local_vertices
                    .iter()
                    .map(|&v| rotate_point(v, sin, cos) + self.position)
                    .collect()
            }
            Shape::RotatedRect { .. } => self.world_corners().map(Vec::from).unwrap_or_default(),
            Shape::Circle { .. } => Vec::new(),
        }
    }

    /// Axis-aligned footprint at the current position
    pub fn aabb(&self) -> Aabb {
        match self.shape {
            Shape::Circle { radius, .. } => Aabb::from_center(self.world_center(), Vec2::splat(radius)),
            _ => Aabb::from_points(&self.world_vertices()),
        }
    }

    /// Footprint covering both the current and the next-frame position
    pub fn swept_aabb(&self, dt: f32) -> Aabb {
        let now = self.aabb();
        now.union(&now.translated(self.velocity * dt))
    }
}

/// Corners of a rectangle rotated about its center
///
/// Order is (-x,-y), (+x,-y), (+x,+y), (-x,+y) before rotation.
pub fn rect_corners(center: Vec2, half_extent: Vec2, degrees: f32) -> [Vec2; 4] {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let h = half_extent;
    [
        Vec2::new(-h.x, -h.y),
        Vec2::new(h.x, -h.y),
        Vec2::new(h.x, h.y),
        Vec2::new(-h.x, h.y),
    ]
    .map(|c| rotate_point(c, sin, cos) + center)
}
