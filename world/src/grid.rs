//! Tile layout of a single level.

use rand::{seq::SliceRandom, Rng};
use snaze_core::{Position, TileKind};

use crate::reachability::ReachabilityField;

/// Fixed-size rectangular tile layout with a spawn point and at most one food tile.
///
/// The grid is the single source of truth for tile kinds. Positions outside
/// the layout read as [`TileKind::OutOfBounds`], so levels without a border
/// wall stay safe to query with any neighbouring position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    columns: usize,
    tiles: Vec<TileKind>,
    spawn: Position,
    food: Option<Position>,
}

impl Grid {
    pub(crate) fn from_tiles(
        rows: usize,
        columns: usize,
        tiles: Vec<TileKind>,
        spawn: Position,
    ) -> Self {
        debug_assert_eq!(tiles.len(), rows * columns, "tile count must match dimensions");
        let food = tiles
            .iter()
            .position(|kind| *kind == TileKind::Food)
            .map(|index| position_of(index, columns));
        Self {
            rows,
            columns,
            tiles,
            spawn,
            food,
        }
    }

    /// Number of rows in the layout.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns in the layout.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Position the snake spawns on. Fixed for the lifetime of the level.
    #[must_use]
    pub const fn spawn(&self) -> Position {
        self.spawn
    }

    /// Position of the live food tile, if any.
    #[must_use]
    pub const fn food(&self) -> Option<Position> {
        self.food
    }

    /// Tile kinds in row-major order.
    #[must_use]
    pub fn tiles(&self) -> &[TileKind] {
        &self.tiles
    }

    /// Tile kind at the provided position.
    #[must_use]
    pub fn tile_at(&self, position: Position) -> TileKind {
        self.index(position)
            .and_then(|index| self.tiles.get(index).copied())
            .unwrap_or(TileKind::OutOfBounds)
    }

    /// Overwrites the tile kind at the provided position.
    ///
    /// Writes outside the layout are ignored. Writing [`TileKind::Food`]
    /// clears any previous food tile so that at most one exists.
    pub fn set_tile(&mut self, position: Position, kind: TileKind) {
        let Some(index) = self.index(position) else {
            debug_assert!(false, "set_tile outside of the level at {position:?}");
            return;
        };

        let previous = self.tiles[index];
        self.tiles[index] = kind;

        if kind == TileKind::Food {
            if let Some(stale) = self.food.replace(position) {
                if stale != position {
                    if let Some(stale_index) = self.index(stale) {
                        self.tiles[stale_index] = TileKind::Empty;
                    }
                }
            }
        } else if previous == TileKind::Food {
            self.food = None;
        }
    }

    /// All positions currently marked empty, in row-major order.
    #[must_use]
    pub fn empty_positions(&self) -> Vec<Position> {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, kind)| **kind == TileKind::Empty)
            .map(|(index, _)| position_of(index, self.columns))
            .collect()
    }

    /// Marks a uniformly chosen empty tile, other than the spawn, as food.
    ///
    /// Returns the chosen position, or `None` when no eligible tile exists, in
    /// which case the grid is left untouched.
    pub fn place_food<R>(&mut self, rng: &mut R) -> Option<Position>
    where
        R: Rng + ?Sized,
    {
        let candidates: Vec<Position> = self
            .empty_positions()
            .into_iter()
            .filter(|position| *position != self.spawn)
            .collect();
        let chosen = candidates.choose(rng).copied()?;
        self.set_tile(chosen, TileKind::Food);
        Some(chosen)
    }

    /// Reports whether entering the position would be a crash.
    #[must_use]
    pub fn is_blocking(&self, position: Position) -> bool {
        self.tile_at(position).is_blocking()
    }

    /// Reports whether the position holds the food tile.
    #[must_use]
    pub fn is_food(&self, position: Position) -> bool {
        self.tile_at(position) == TileKind::Food
    }

    /// Reports whether the position is a wall or lies outside the playable area.
    ///
    /// Unlike [`Grid::is_blocking`], snake segments are ignored: they move.
    #[must_use]
    pub fn is_static_obstacle(&self, position: Position) -> bool {
        matches!(
            self.tile_at(position),
            TileKind::Wall | TileKind::OutOfBounds
        )
    }

    /// Reports whether `to` can be reached from `from` around walls alone.
    ///
    /// Snake segments are ignored, so `false` proves that no route exists
    /// for any body configuration.
    #[must_use]
    pub fn is_reachable(&self, from: Position, to: Position) -> bool {
        self.distance_between(from, to).is_some()
    }

    /// Length of the shortest wall-avoiding route between two positions.
    #[must_use]
    pub fn distance_between(&self, from: Position, to: Position) -> Option<u32> {
        let mut field = ReachabilityField::default();
        field.rebuild_with(self.rows, self.columns, &[from], |position| {
            self.is_static_obstacle(position)
        });
        field.distance(to)
    }

    fn index(&self, position: Position) -> Option<usize> {
        let row = usize::try_from(position.row()).ok()?;
        let column = usize::try_from(position.column()).ok()?;
        if row < self.rows && column < self.columns {
            Some(row * self.columns + column)
        } else {
            None
        }
    }
}

fn position_of(index: usize, columns: usize) -> Position {
    let columns = columns.max(1);
    let row = i32::try_from(index / columns).unwrap_or(i32::MAX);
    let column = i32::try_from(index % columns).unwrap_or(i32::MAX);
    Position::new(row, column)
}
