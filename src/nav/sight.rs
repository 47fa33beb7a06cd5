//! Grid line of sight
//!
//! Visibility uses the same traversability predicate as pathfinding: a cell
//! that blocks movement also blocks sight.

use glam::{IVec2, Vec2};

use crate::world::NavGrid;

/// Cells visited by an integer Bresenham line, both endpoints included
///
/// The error terms run in `i64` so endpoints anywhere in `i32` range are safe.
#[derive(Debug, Clone)]
pub struct GridLine {
    current: IVec2,
    end: IVec2,
    dx: i64,
    dy: i64,
    step: IVec2,
    err: i64,
    done: bool,
}

impl GridLine {
    pub fn new(start: IVec2, end: IVec2) -> Self {
        let dx = (i64::from(end.x) - i64::from(start.x)).abs();
        let dy = -(i64::from(end.y) - i64::from(start.y)).abs();
        Self {
            current: start,
            end,
            dx,
            dy,
            step: IVec2::new(
                if start.x < end.x { 1 } else { -1 },
                if start.y < end.y { 1 } else { -1 },
            ),
            err: dx + dy,
            done: false,
        }
    }
}

impl Iterator for GridLine {
    type Item = IVec2;

    fn next(&mut self) -> Option<IVec2> {
        if self.done {
            return None;
        }
        let cell = self.current;
        if cell == self.end {
            self.done = true;
            return Some(cell);
        }

        let e2 = 2 * self.err;
        if e2 >= self.dy {
            self.err += self.dy;
            self.current.x += self.step.x;
        }
        if e2 <= self.dx {
            self.err += self.dx;
            self.current.y += self.step.y;
        }
        Some(cell)
    }
}

/// Whether every cell between two grid cells is traversable
///
/// An endpoint off the grid is never visible, so the line is not walked.
pub fn has_line_of_sight_cells<G: NavGrid + ?Sized>(from: IVec2, to: IVec2, grid: &G) -> bool {
    if !grid.is_traversable(from) || !grid.is_traversable(to) {
        return false;
    }
    GridLine::new(from, to).all(|cell| grid.is_traversable(cell))
}

/// Whether two world points can see each other across the grid
pub fn has_line_of_sight<G: NavGrid + ?Sized>(a: Vec2, b: Vec2, grid: &G) -> bool {
    has_line_of_sight_cells(grid.world_to_cell(a), grid.world_to_cell(b), grid)
}
