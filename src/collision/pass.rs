//! Per-tick collision pass
//!
//! Runs after motion integration. Every moving body is tested against the
//! static candidates the broad phase offers, then against every later moving
//! body (moving counts are small, so that part stays exhaustive).
//!
//! Records are not deduplicated. A pair can show up more than once in a single
//! pass (for instance when a body is listed as both moving and static), so
//! consumers must handle records idempotently or call [`dedup_records`].

use std::collections::{HashMap, HashSet};

use super::broad::SpatialHashGrid;
use super::narrow::bodies_overlap;
use super::shape::{Body, BodyHandle};

/// Unordered pair of colliding bodies, valid for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionRecord {
    pub a: BodyHandle,
    pub b: BodyHandle,
}

impl CollisionRecord {
    pub fn new(a: BodyHandle, b: BodyHandle) -> Self {
        Self { a, b }
    }

    /// Pair in canonical order, equal for (a, b) and (b, a)
    pub fn unordered_key(&self) -> (BodyHandle, BodyHandle) {
        if self.a <= self.b { (self.a, self.b) } else { (self.b, self.a) }
    }

    pub fn involves(&self, handle: BodyHandle) -> bool {
        self.a == handle || self.b == handle
    }

    /// The partner of `handle` in this record
    pub fn other(&self, handle: BodyHandle) -> Option<BodyHandle> {
        if self.a == handle {
            Some(self.b)
        } else if self.b == handle {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Run broad and narrow phase for every moving body
///
/// `static_candidates` maps a moving body to the static bodies it might touch,
/// typically [`StaticLookup::candidates`].
pub fn run_collision_pass<'s, F>(moving: &[Body], dt: f32, mut static_candidates: F) -> Vec<CollisionRecord>
where
    F: FnMut(&Body) -> Vec<&'s Body>,
{
    let mut records = Vec::new();

    for (i, body) in moving.iter().enumerate() {
        for other in static_candidates(body) {
            if other.handle != body.handle && bodies_overlap(body, other, dt) {
                records.push(CollisionRecord::new(body.handle, other.handle));
            }
        }

        for other in &moving[i + 1..] {
            if other.handle != body.handle && bodies_overlap(body, other, dt) {
                records.push(CollisionRecord::new(body.handle, other.handle));
            }
        }
    }

    log::trace!(
        "Collision pass: {} moving bodies, {} records",
        moving.len(),
        records.len()
    );
    records
}

/// Keep the first record of every unordered pair
pub fn dedup_records(records: &mut Vec<CollisionRecord>) {
    let mut seen = HashSet::with_capacity(records.len());
    records.retain(|r| seen.insert(r.unordered_key()));
}

/// Spatial hash bound to the static bodies it was built from
///
/// Resolves candidate handles back to bodies for the collision pass.
pub struct StaticLookup<'a> {
    hash: &'a SpatialHashGrid,
    bodies: HashMap<BodyHandle, &'a Body>,
    swept_dt: Option<f32>,
}

impl<'a> StaticLookup<'a> {
    pub fn new(hash: &'a SpatialHashGrid, static_bodies: &'a [Body]) -> Self {
        Self {
            hash,
            bodies: static_bodies.iter().map(|b| (b.handle, b)).collect(),
            swept_dt: None,
        }
    }

    /// Query the footprint swept over `dt` instead of the current one
    pub fn swept(mut self, dt: f32) -> Self {
        self.swept_dt = Some(dt);
        self
    }

    /// Static bodies the broad phase reports near `body`
    ///
    /// Handles missing from the bound slice are skipped.
    pub fn candidates(&self, body: &Body) -> Vec<&'a Body> {
        let handles = match self.swept_dt {
            Some(dt) => self.hash.query_swept(body, dt),
            None => self.hash.query_candidates(body),
        };
        handles
            .into_iter()
            .filter_map(|h| self.bodies.get(&h).copied())
            .collect()
    }
}
