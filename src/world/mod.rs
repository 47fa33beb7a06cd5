//! Navigation grid model
//!
//! The map layer owns the tiles; pathfinding and line of sight only ever read
//! them through [`NavGrid`]. Cells are addressed as `IVec2 { x: column, y: row }`.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_GRID_CELL_SIZE;

/// Read-only view of a traversability grid
pub trait NavGrid {
    /// Grid width in cells
    fn width(&self) -> i32;
    /// Grid height in cells
    fn height(&self) -> i32;
    /// Edge length of one cell in world units
    fn cell_size(&self) -> f32;
    /// Whether a body may occupy the cell. Must be false outside the grid.
    fn is_traversable(&self, cell: IVec2) -> bool;

    #[inline]
    fn in_bounds(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width() && cell.y < self.height()
    }

    /// Flattened cell index (`y * width + x`)
    #[inline]
    fn cell_key(&self, cell: IVec2) -> usize {
        (cell.y * self.width() + cell.x) as usize
    }

    /// Cell containing a world point. Negative coordinates land outside the grid.
    #[inline]
    fn world_to_cell(&self, pos: Vec2) -> IVec2 {
        let size = self.cell_size();
        IVec2::new((pos.x / size).floor() as i32, (pos.y / size).floor() as i32)
    }

    /// World-space center of a cell
    #[inline]
    fn cell_to_world(&self, cell: IVec2) -> Vec2 {
        let size = self.cell_size();
        cell.as_vec2() * size + Vec2::splat(size / 2.0)
    }

    /// Map extents in world units
    fn world_extents(&self) -> Vec2 {
        Vec2::new(self.width() as f32, self.height() as f32) * self.cell_size()
    }
}

/// Tile types relevant to movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TileKind {
    #[default]
    Floor,
    Wall,
    ClosedDoor,
    OpenDoor,
}

impl TileKind {
    /// Walls and closed doors block movement and sight
    #[inline]
    pub fn is_traversable(self) -> bool {
        !matches!(self, TileKind::Wall | TileKind::ClosedDoor)
    }
}

/// Row-major tile grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileGrid {
    width: i32,
    height: i32,
    cell_size: f32,
    tiles: Vec<TileKind>,
}

impl TileGrid {
    /// Create an all-floor grid
    pub fn new(width: i32, height: i32, cell_size: f32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            cell_size,
            tiles: vec![TileKind::Floor; (width * height) as usize],
        }
    }

    /// All-floor grid with the default cell size
    pub fn open(width: i32, height: i32) -> Self {
        Self::new(width, height, DEFAULT_GRID_CELL_SIZE)
    }

    /// Parse an ASCII layout: `#` wall, `D` closed door, `d` open door, anything else floor.
    /// Short rows are padded with floor.
    pub fn from_ascii(rows: &[&str], cell_size: f32) -> Self {
        let height = rows.len() as i32;
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as i32;
        let mut grid = Self::new(width, height, cell_size);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let kind = match ch {
                    '#' => TileKind::Wall,
                    'D' => TileKind::ClosedDoor,
                    'd' => TileKind::OpenDoor,
                    _ => TileKind::Floor,
                };
                grid.set_tile(IVec2::new(x as i32, y as i32), kind);
            }
        }
        grid
    }

    /// Tile at a cell, `None` outside the grid
    pub fn tile(&self, cell: IVec2) -> Option<TileKind> {
        if self.in_bounds(cell) {
            Some(self.tiles[self.cell_key(cell)])
        } else {
            None
        }
    }

    /// Replace a tile (e.g. a door opening). Out-of-range cells are ignored.
    ///
    /// Static collision geometry derived from the grid must be rebuilt afterwards.
    pub fn set_tile(&mut self, cell: IVec2, kind: TileKind) {
        if self.in_bounds(cell) {
            let key = self.cell_key(cell);
            self.tiles[key] = kind;
        }
    }

    /// Iterate all cells holding a given tile kind, row by row
    pub fn cells_of(&self, kind: TileKind) -> impl Iterator<Item = IVec2> + '_ {
        let width = self.width.max(1);
        self.tiles
            .iter()
            .enumerate()
            .filter(move |(_, t)| **t == kind)
            .map(move |(i, _)| IVec2::new(i as i32 % width, i as i32 / width))
    }
}

impl NavGrid for TileGrid {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn cell_size(&self) -> f32 {
        self.cell_size
    }

    fn is_traversable(&self, cell: IVec2) -> bool {
        self.tile(cell).is_some_and(TileKind::is_traversable)
    }
}
