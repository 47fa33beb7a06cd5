//! Broad phase: uniform grid over static bodies
//!
//! Only static geometry is indexed. The grid is rebuilt wholesale whenever the
//! map changes or a static body appears or disappears; there is no incremental
//! update. World positions outside the map clamp to the border buckets.

use std::collections::HashSet;

use glam::{IVec2, Vec2};

use super::shape::{Aabb, Body, BodyHandle};
use crate::consts::DEFAULT_HASH_CELL_SIZE;

/// Uniform bucket grid of static body handles
#[derive(Debug, Clone)]
pub struct SpatialHashGrid {
    cell_size: f32,
    width: i32,
    height: i32,
    /// Row-major buckets
    buckets: Vec<Vec<BodyHandle>>,
}

impl Default for SpatialHashGrid {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_CELL_SIZE)
    }
}

impl SpatialHashGrid {
    /// Empty grid; every query returns nothing until the first rebuild
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            width: 0,
            height: 0,
            buckets: Vec::new(),
        }
    }

    /// Build a grid in one call
    pub fn build(static_bodies: &[Body], map_extents: Vec2, cell_size: f32) -> Self {
        let mut grid = Self::new(cell_size);
        grid.rebuild(static_bodies, map_extents, cell_size);
        grid
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Clear every bucket and re-insert all static bodies
    ///
    /// A body lands in every bucket its axis-aligned footprint touches.
    /// A non-positive or non-finite `cell_size` falls back to the default.
    pub fn rebuild(&mut self, static_bodies: &[Body], map_extents: Vec2, cell_size: f32) {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            log::warn!("Invalid spatial hash cell size {}, using {}", cell_size, DEFAULT_HASH_CELL_SIZE);
            DEFAULT_HASH_CELL_SIZE
        };
        self.cell_size = cell_size;
        self.width = ((map_extents.x / cell_size).ceil() as i32).max(1);
        self.height = ((map_extents.y / cell_size).ceil() as i32).max(1);

        self.buckets.clear();
        self.buckets.resize_with(
            (self.width as usize).saturating_mul(self.height as usize),
            Vec::new,
        );

        let mut entries = 0usize;
        for body in static_bodies {
            let (lo, hi) = self.cell_range(&body.aabb());
            for y in lo.y..=hi.y {
                for x in lo.x..=hi.x {
                    let key = self.bucket_key(IVec2::new(x, y));
                    self.buckets[key].push(body.handle);
                    entries += 1;
                }
            }
        }

        log::debug!(
            "Spatial hash rebuilt: {}x{} cells of {}, {} static bodies, {} bucket entries",
            self.width,
            self.height,
            cell_size,
            static_bodies.len(),
            entries
        );
    }

    /// Bucket containing a world point, clamped into the grid
    pub fn world_to_bucket(&self, pos: Vec2) -> IVec2 {
        let x = (pos.x / self.cell_size).floor() as i32;
        let y = (pos.y / self.cell_size).floor() as i32;
        IVec2::new(x.clamp(0, self.width - 1), y.clamp(0, self.height - 1))
    }

    /// Handles stored in one bucket (empty outside the grid)
    pub fn bucket(&self, cell: IVec2) -> &[BodyHandle] {
        if cell.x < 0 || cell.y < 0 || cell.x >= self.width || cell.y >= self.height {
            return &[];
        }
        &self.buckets[self.bucket_key(cell)]
    }

    /// Static bodies that might overlap the body's current footprint
    ///
    /// Each handle appears once; the body's own handle is excluded.
    pub fn query_candidates(&self, body: &Body) -> Vec<BodyHandle> {
        self.query_region(&body.aabb(), Some(body.handle))
    }

    /// Like [`Self::query_candidates`], over the current and next-frame footprint
    pub fn query_swept(&self, body: &Body, dt: f32) -> Vec<BodyHandle> {
        self.query_region(&body.swept_aabb(dt), Some(body.handle))
    }

    /// Deduplicated handles from every bucket the region touches
    pub fn query_region(&self, region: &Aabb, exclude: Option<BodyHandle>) -> Vec<BodyHandle> {
        if self.buckets.is_empty() {
            return Vec::new();
        }

        let (lo, hi) = self.cell_range(region);
        let mut visited = HashSet::new();
        let mut candidates = Vec::with_capacity(10);

        for y in lo.y..=hi.y {
            for x in lo.x..=hi.x {
                for &handle in &self.buckets[self.bucket_key(IVec2::new(x, y))] {
                    if Some(handle) == exclude || !visited.insert(handle) {
                        continue;
                    }
                    candidates.push(handle);
                }
            }
        }
        candidates
    }

    #[inline]
    fn cell_range(&self, region: &Aabb) -> (IVec2, IVec2) {
        (self.world_to_bucket(region.min), self.world_to_bucket(region.max))
    }

    #[inline]
    fn bucket_key(&self, cell: IVec2) -> usize {
        cell.y as usize * self.width as usize + cell.x as usize
    }
}
