//! The snake: an ordered body, a heading and a life counter.

use std::collections::VecDeque;

use snaze_core::{Direction, Position, TileKind};

use crate::grid::Grid;

/// Outcome of a single [`Actor::advance`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    /// Head position before the step.
    pub from: Position,
    /// Head position after the step.
    pub to: Position,
    /// Whether the tail was retained because the step landed on food.
    pub grew: bool,
}

/// Snake body, head first, together with its heading and remaining lives.
///
/// The actor never holds a reference to the level it occupies. Every call
/// that touches tiles receives the grid explicitly and keeps it consistent
/// with the body: the head tile reads [`TileKind::SnakeHead`] and every other
/// segment reads [`TileKind::SnakeBody`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    head: Position,
    trail: VecDeque<Position>,
    heading: Option<Direction>,
    lives: u32,
}

impl Actor {
    /// Creates a single-segment actor on the grid's spawn tile.
    pub fn spawned(grid: &mut Grid, lives: u32) -> Self {
        let spawn = grid.spawn();
        let mut actor = Self {
            head: spawn,
            trail: VecDeque::new(),
            heading: None,
            lives,
        };
        actor.reset(grid, spawn);
        actor
    }

    /// Creates an actor occupying `body`, head first, and marks its tiles.
    ///
    /// An empty `body` places the actor on the spawn tile.
    pub fn with_body<I>(grid: &mut Grid, body: I, heading: Option<Direction>, lives: u32) -> Self
    where
        I: IntoIterator<Item = Position>,
    {
        let mut segments = body.into_iter();
        let head = segments.next().unwrap_or_else(|| grid.spawn());
        let trail: VecDeque<Position> = segments.collect();

        for segment in &trail {
            grid.set_tile(*segment, TileKind::SnakeBody);
        }
        grid.set_tile(head, TileKind::SnakeHead);

        Self {
            head,
            trail,
            heading,
            lives,
        }
    }

    /// Current head position.
    #[must_use]
    pub const fn head(&self) -> Position {
        self.head
    }

    /// Last body segment. Equals the head for a single-segment actor.
    #[must_use]
    pub fn tail(&self) -> Position {
        self.trail.back().copied().unwrap_or(self.head)
    }

    /// Body positions, head first.
    pub fn body(&self) -> impl Iterator<Item = Position> + '_ {
        std::iter::once(self.head).chain(self.trail.iter().copied())
    }

    /// Number of segments including the head.
    #[must_use]
    pub fn body_len(&self) -> usize {
        self.trail.len() + 1
    }

    /// Current heading, `None` while neutral.
    #[must_use]
    pub const fn heading(&self) -> Option<Direction> {
        self.heading
    }

    /// Points the actor in a new direction without moving it.
    pub fn set_heading(&mut self, direction: Direction) {
        self.heading = Some(direction);
    }

    /// Lives remaining.
    #[must_use]
    pub const fn lives(&self) -> u32 {
        self.lives
    }

    /// Removes a life and returns how many remain.
    pub fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    /// Head position one step away in `direction`. No bounds check.
    #[must_use]
    pub const fn next_head(&self, direction: Direction) -> Position {
        self.head.step(direction)
    }

    /// Moves the head one tile in `direction`.
    ///
    /// The old head becomes body and the new head is marked on the grid. When
    /// the new head lands on food the tail is kept and the body grows by one;
    /// otherwise the tail tile is cleared and dropped. This is the only way
    /// the body changes shape during play.
    pub fn advance(&mut self, grid: &mut Grid, direction: Direction) -> Step {
        let from = self.head;
        let to = self.next_head(direction);
        let grew = grid.is_food(to);

        grid.set_tile(from, TileKind::SnakeBody);
        self.trail.push_front(from);
        self.head = to;

        if !grew {
            if let Some(tail) = self.trail.pop_back() {
                grid.set_tile(tail, TileKind::Empty);
            }
        }

        grid.set_tile(to, TileKind::SnakeHead);
        Step { from, to, grew }
    }

    /// Collapses the body onto `spawn` with a neutral heading.
    ///
    /// Tiles of the previous body are left as they are; see [`Actor::vacate`].
    pub fn reset(&mut self, grid: &mut Grid, spawn: Position) {
        self.trail.clear();
        self.head = spawn;
        self.heading = None;
        grid.set_tile(spawn, TileKind::SnakeHead);
    }

    /// Clears every tile the body occupies back to empty.
    pub fn vacate(&self, grid: &mut Grid) {
        for segment in self.body() {
            grid.set_tile(segment, TileKind::Empty);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::parse_levels;

    fn open_grid() -> Grid {
        parse_levels("5 5\n#####\n#   #\n# * #\n#   #\n#####\n")
            .expect("level parses")
            .remove(0)
    }

    fn assert_consistent(actor: &Actor, grid: &Grid) {
        let body: Vec<Position> = actor.body().collect();
        let distinct: HashSet<Position> = body.iter().copied().collect();
        assert_eq!(distinct.len(), body.len(), "body overlaps itself");
        assert_eq!(grid.tile_at(actor.head()), TileKind::SnakeHead);
        for segment in body.iter().skip(1) {
            assert_eq!(grid.tile_at(*segment), TileKind::SnakeBody);
        }
    }

    #[test]
    fn spawned_actor_occupies_spawn_with_neutral_heading() {
        let mut grid = open_grid();
        let actor = Actor::spawned(&mut grid, 3);
        assert_eq!(actor.head(), Position::new(2, 2));
        assert_eq!(actor.body_len(), 1);
        assert_eq!(actor.heading(), None);
        assert_eq!(actor.lives(), 3);
        assert_consistent(&actor, &grid);
    }

    #[test]
    fn advance_slides_without_food() {
        let mut grid = open_grid();
        let mut actor = Actor::spawned(&mut grid, 3);

        let step = actor.advance(&mut grid, Direction::East);

        assert_eq!(
            step,
            Step {
                from: Position::new(2, 2),
                to: Position::new(2, 3),
                grew: false,
            }
        );
        assert_eq!(actor.body_len(), 1);
        assert_eq!(grid.tile_at(Position::new(2, 2)), TileKind::Empty);
        assert_consistent(&actor, &grid);
    }

    #[test]
    fn advance_grows_onto_food() {
        let mut grid = open_grid();
        let mut actor = Actor::spawned(&mut grid, 3);
        grid.set_tile(Position::new(1, 2), TileKind::Food);

        let step = actor.advance(&mut grid, Direction::North);

        assert!(step.grew);
        assert_eq!(actor.body_len(), 2);
        assert_eq!(actor.tail(), Position::new(2, 2));
        assert_eq!(grid.food(), None);
        assert_consistent(&actor, &grid);
    }

    #[test]
    fn advance_onto_own_tail_keeps_body_distinct() {
        let mut grid = open_grid();
        let body = [
            Position::new(1, 1),
            Position::new(1, 2),
            Position::new(2, 2),
            Position::new(2, 1),
        ];
        let mut actor = Actor::with_body(&mut grid, body, Some(Direction::West), 3);
        assert_eq!(actor.tail(), Position::new(2, 1));

        let _ = actor.advance(&mut grid, Direction::South);

        assert_eq!(actor.head(), Position::new(2, 1));
        assert_eq!(actor.body_len(), 4);
        assert_consistent(&actor, &grid);
    }

    #[test]
    fn reset_after_vacate_leaves_single_segment_at_spawn() {
        let mut grid = open_grid();
        let body = [Position::new(1, 3), Position::new(1, 2), Position::new(1, 1)];
        let mut actor = Actor::with_body(&mut grid, body, Some(Direction::East), 2);

        let spawn = grid.spawn();
        actor.vacate(&mut grid);
        actor.reset(&mut grid, spawn);

        assert_eq!(actor.body().collect::<Vec<_>>(), vec![grid.spawn()]);
        assert_eq!(actor.heading(), None);
        for position in body {
            assert_eq!(grid.tile_at(position), TileKind::Empty);
        }
        assert_consistent(&actor, &grid);
    }

    #[test]
    fn lose_life_saturates_at_zero() {
        let mut grid = open_grid();
        let mut actor = Actor::spawned(&mut grid, 1);
        assert_eq!(actor.lose_life(), 0);
        assert_eq!(actor.lose_life(), 0);
    }
}
