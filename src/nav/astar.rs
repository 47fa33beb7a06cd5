//! A* over the 8-connected navigation grid
//!
//! Cardinal steps cost 1, diagonal steps cost √2. A diagonal step is refused
//! when either orthogonal cell it squeezes past is blocked, so paths never
//! clip a wall corner. The heuristic is the Euclidean distance to the goal.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use glam::IVec2;

use crate::consts::{CARDINAL_COST, DIAGONAL_COST};
use crate::world::NavGrid;

/// Step offsets and their costs
const MOVES: [(IVec2, f32); 8] = [
    (IVec2::new(0, -1), CARDINAL_COST),
    (IVec2::new(0, 1), CARDINAL_COST),
    (IVec2::new(-1, 0), CARDINAL_COST),
    (IVec2::new(1, 0), CARDINAL_COST),
    (IVec2::new(1, 1), DIAGONAL_COST),
    (IVec2::new(1, -1), DIAGONAL_COST),
    (IVec2::new(-1, 1), DIAGONAL_COST),
    (IVec2::new(-1, -1), DIAGONAL_COST),
];

/// Open set entry
#[derive(Debug, Clone, Copy)]
struct OpenNode {
    f: f32,
    g: f32,
    /// Push order, last tie-break
    seq: u32,
    cell: IVec2,
}

impl Ord for OpenNode {
    // BinaryHeap pops the greatest: lowest f, then highest g, then oldest push
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| self.g.total_cmp(&other.g))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

#[inline]
fn heuristic(a: IVec2, b: IVec2) -> f32 {
    (a - b).as_vec2().length()
}

/// Whether a single step between neighbouring cells is legal
///
/// The destination must be traversable, and a diagonal step additionally needs
/// both cells it passes between to be traversable.
pub fn can_step<G: NavGrid + ?Sized>(from: IVec2, delta: IVec2, grid: &G) -> bool {
    if delta.x != 0 && delta.y != 0 {
        let horizontal = IVec2::new(from.x + delta.x, from.y);
        let vertical = IVec2::new(from.x, from.y + delta.y);
        if !grid.is_traversable(horizontal) || !grid.is_traversable(vertical) {
            return false;
        }
    }
    grid.is_traversable(from + delta)
}

/// Find a shortest path from `start` to `goal`
///
/// Returns every cell from start to goal inclusive, `[start]` when the two
/// coincide, or an empty vector when the goal cannot be reached.
pub fn find_path<G: NavGrid + ?Sized>(start: IVec2, goal: IVec2, grid: &G) -> Vec<IVec2> {
    if start == goal {
        return vec![start];
    }
    if !grid.is_traversable(start) || !grid.is_traversable(goal) {
        log::trace!("No path {start} -> {goal}: endpoint blocked");
        return Vec::new();
    }

    let mut open = BinaryHeap::new();
    let mut g_score: HashMap<usize, f32> = HashMap::new();
    let mut came_from: HashMap<usize, IVec2> = HashMap::new();
    let mut seq = 0u32;
    let mut expanded = 0usize;

    g_score.insert(grid.cell_key(start), 0.0);
    open.push(OpenNode {
        f: heuristic(start, goal),
        g: 0.0,
        seq,
        cell: start,
    });

    while let Some(current) = open.pop() {
        if current.cell == goal {
            let path = reconstruct_path(&came_from, goal, grid);
            log::trace!(
                "Path {start} -> {goal}: {} cells, {expanded} nodes expanded",
                path.len()
            );
            return path;
        }

        // Superseded by a cheaper push of the same cell
        if g_score
            .get(&grid.cell_key(current.cell))
            .is_some_and(|&best| current.g > best)
        {
            continue;
        }
        expanded += 1;

        for &(delta, cost) in &MOVES {
            if !can_step(current.cell, delta, grid) {
                continue;
            }
            let neighbor = current.cell + delta;
            let tentative_g = current.g + cost;
            let key = grid.cell_key(neighbor);

            // Strict improvement only: ties keep the first predecessor
            if g_score.get(&key).is_none_or(|&g| tentative_g < g) {
                came_from.insert(key, current.cell);
                g_score.insert(key, tentative_g);
                seq += 1;
                open.push(OpenNode {
                    f: tentative_g + heuristic(neighbor, goal),
                    g: tentative_g,
                    seq,
                    cell: neighbor,
                });
            }
        }
    }

    log::trace!("No path {start} -> {goal}: {expanded} nodes expanded");
    Vec::new()
}

/// Walk predecessors back from the goal, then reverse
fn reconstruct_path<G: NavGrid + ?Sized>(
    came_from: &HashMap<usize, IVec2>,
    goal: IVec2,
    grid: &G,
) -> Vec<IVec2> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&grid.cell_key(current)) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Total movement cost of a path (sum of cardinal and diagonal step costs)
pub fn path_cost(path: &[IVec2]) -> f32 {
    path.windows(2)
        .map(|w| {
            let d = w[1] - w[0];
            if d.x != 0 && d.y != 0 { DIAGONAL_COST } else { CARDINAL_COST }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{TileGrid, TileKind};
    use proptest::prelude::*;

    #[test]
    fn test_open_grid_diagonal() {
        let grid = TileGrid::open(10, 10);
        let path = find_path(IVec2::new(0, 0), IVec2::new(9, 9), &grid);
        assert_eq!(path.len(), 10);
        for (i, cell) in path.iter().enumerate() {
            assert_eq!(*cell, IVec2::splat(i as i32));
        }
        assert!((path_cost(&path) - 9.0 * std::f32::consts::SQRT_2).abs() < 1e-3);
    }

    #[test]
    fn test_start_equals_goal() {
        let grid = TileGrid::open(3, 3);
        assert_eq!(find_path(IVec2::ONE, IVec2::ONE, &grid), vec![IVec2::ONE]);
    }

    #[test]
    fn test_corner_cut_blocked_in_pocket() {
        // Walls at (1,0) and (0,1) seal the corner cell
        let grid = TileGrid::from_ascii(&[".#..", "#...", "....", "...."], 1.0);
        assert!(find_path(IVec2::new(0, 0), IVec2::new(1, 1), &grid).is_empty());
        assert!(!can_step(IVec2::new(0, 0), IVec2::new(1, 1), &grid));
    }

    #[test]
    fn test_corner_cut_forces_detour() {
        let grid = TileGrid::from_ascii(&["....", "..#.", "....", "...."], 1.0);
        let path = find_path(IVec2::new(1, 1), IVec2::new(2, 2), &grid);
        assert_eq!(path, vec![IVec2::new(1, 1), IVec2::new(1, 2), IVec2::new(2, 2)]);
        assert!((path_cost(&path) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_wall_detour() {
        let grid = TileGrid::from_ascii(
            &[
                ".....", //
                "####.", //
                ".....",
            ],
            1.0,
        );
        let path = find_path(IVec2::new(0, 0), IVec2::new(0, 2), &grid);
        assert_eq!(path.first(), Some(&IVec2::new(0, 0)));
        assert_eq!(path.last(), Some(&IVec2::new(0, 2)));
        assert!(path.contains(&IVec2::new(4, 1)));
        assert!((path_cost(&path) - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_unreachable_goal() {
        let grid = TileGrid::from_ascii(&["..#..", "..#..", "..#.."], 1.0);
        assert!(find_path(IVec2::new(0, 0), IVec2::new(4, 2), &grid).is_empty());
    }

    #[test]
    fn test_blocked_or_outside_endpoints() {
        let mut grid = TileGrid::open(4, 4);
        grid.set_tile(IVec2::new(3, 3), TileKind::ClosedDoor);
        assert!(find_path(IVec2::new(0, 0), IVec2::new(3, 3), &grid).is_empty());
        assert!(find_path(IVec2::new(0, 0), IVec2::new(7, 0), &grid).is_empty());
        assert!(find_path(IVec2::new(-1, 0), IVec2::new(2, 0), &grid).is_empty());

        grid.set_tile(IVec2::new(3, 3), TileKind::OpenDoor);
        assert_eq!(find_path(IVec2::new(0, 0), IVec2::new(3, 3), &grid).len(), 4);
    }

    #[test]
    fn test_open_set_order() {
        let low_f = OpenNode { f: 1.0, g: 0.0, seq: 5, cell: IVec2::ZERO };
        let high_f = OpenNode { f: 2.0, g: 1.0, seq: 0, cell: IVec2::ZERO };
        assert!(low_f > high_f);
        let deeper = OpenNode { f: 1.0, g: 0.5, seq: 9, cell: IVec2::ZERO };
        assert!(deeper > low_f);
    }

    /// Reference search: plain Dijkstra with the same step rule
    fn dijkstra_cost(grid: &TileGrid, start: IVec2, goal: IVec2) -> Option<f32> {
        if !grid.is_traversable(start) || !grid.is_traversable(goal) {
            return None;
        }
        let n = (grid.width() * grid.height()) as usize;
        let mut dist = vec![f32::INFINITY; n];
        let mut done = vec![false; n];
        dist[grid.cell_key(start)] = 0.0;
        loop {
            let Some(k) = (0..n)
                .filter(|&k| !done[k] && dist[k].is_finite())
                .min_by(|&a, &b| dist[a].total_cmp(&dist[b]))
            else {
                break;
            };
            done[k] = true;
            let cell = IVec2::new(k as i32 % grid.width(), k as i32 / grid.width());
            for &(delta, cost) in &MOVES {
                if can_step(cell, delta, grid) {
                    let nk = grid.cell_key(cell + delta);
                    dist[nk] = dist[nk].min(dist[k] + cost);
                }
            }
        }
        let d = dist[grid.cell_key(goal)];
        d.is_finite().then_some(d)
    }

    fn grid_from(width: i32, height: i32, walls: &[bool]) -> TileGrid {
        let mut grid = TileGrid::new(width, height, 1.0);
        for y in 0..height {
            for x in 0..width {
                if walls[(y * width + x) as usize] {
                    grid.set_tile(IVec2::new(x, y), TileKind::Wall);
                }
            }
        }
        grid
    }

    proptest! {
        #[test]
        fn prop_path_matches_reference(
            width in 1i32..10,
            height in 1i32..10,
            walls in proptest::collection::vec(proptest::bool::weighted(0.3), 100),
            sx in 0i32..10, sy in 0i32..10, gx in 0i32..10, gy in 0i32..10,
        ) {
            let grid = grid_from(width, height, &walls);
            let start = IVec2::new(sx % width, sy % height);
            let goal = IVec2::new(gx % width, gy % height);
            let path = find_path(start, goal, &grid);

            if start == goal {
                prop_assert_eq!(path, vec![start]);
                return Ok(());
            }

            let reference = dijkstra_cost(&grid, start, goal);
            prop_assert_eq!(!path.is_empty(), reference.is_some());

            if let Some(best) = reference {
                prop_assert_eq!(path[0], start);
                prop_assert_eq!(*path.last().unwrap(), goal);
                for cell in &path {
                    prop_assert!(grid.is_traversable(*cell));
                }
                for step in path.windows(2) {
                    let delta = step[1] - step[0];
                    prop_assert!(delta.x.abs() <= 1 && delta.y.abs() <= 1 && delta != IVec2::ZERO);
                    prop_assert!(can_step(step[0], delta, &grid));
                }
                prop_assert!((path_cost(&path) - best).abs() < 1e-3);
            }
        }
    }
}
