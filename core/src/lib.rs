#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Snaze engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. The session orchestrator submits
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then reports [`Event`] values
//! describing what actually changed. Adapters never reach into the world;
//! they draw the [`Frame`] snapshot the world produces on request.

mod config;

use serde::{Deserialize, Serialize};

pub use config::{ConfigError, GameConfig, ParseStrategyError, Scoring, Strategy, VisitedPolicy};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to the classic Snaze Game";

/// States of the turn-based session state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// Session created; the first level has not been activated yet.
    Start,
    /// Pure compute tick in which the planner runs. Never drawn.
    Thinking,
    /// The snake moves one tile per tick.
    Run,
    /// The snake hit a blocking tile and still has lives left.
    Crash,
    /// The food quota of a non-final level was met.
    LevelUp,
    /// Terminal state, reached on zero lives or after clearing the last level.
    GameOver,
}

impl SessionState {
    /// Reports whether adapters pause for an acknowledgement before the next tick.
    #[must_use]
    pub const fn awaits_acknowledgement(self) -> bool {
        matches!(self, Self::Start | Self::Crash | Self::LevelUp)
    }

    /// Reports whether a renderer should draw frames captured in this state.
    #[must_use]
    pub const fn is_drawn(self) -> bool {
        !matches!(self, Self::Thinking)
    }

    /// Reports whether the session has ended.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::GameOver)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Moves the session state machine into the provided state.
    TransitionTo {
        /// State that becomes current.
        state: SessionState,
    },
    /// Binds the actor to a level, resets its food counter and places food.
    ActivateLevel {
        /// Zero-based index of the level in play order.
        level: usize,
    },
    /// Places a new food tile on the current level.
    PlaceFood,
    /// Explicitly changes the actor's heading.
    SetHeading {
        /// Heading the actor faces afterwards.
        direction: Direction,
    },
    /// Advances the actor one tile along its current heading.
    AdvanceActor,
    /// Credits the consumption of a food tile to the session.
    ConsumeFood,
    /// Removes one life from the actor.
    LoseLife,
    /// Clears the actor's body from the grid and respawns it.
    ResetActor,
}

/// Events reported by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// The session state machine moved between two states.
    StateChanged {
        /// State before the transition.
        from: SessionState,
        /// State after the transition.
        to: SessionState,
    },
    /// A level became the current level.
    LevelActivated {
        /// Zero-based index of the activated level.
        level: usize,
        /// Spawn position of the activated level.
        spawn: Position,
    },
    /// A level activation request named a level that does not exist.
    LevelActivationRejected {
        /// Index provided in the request.
        level: usize,
    },
    /// A food tile was placed.
    FoodPlaced {
        /// Position of the new food tile.
        position: Position,
    },
    /// No eligible tile was available for food on the current level.
    FoodPlacementFailed {
        /// Zero-based index of the level that is full.
        level: usize,
    },
    /// The actor's heading changed.
    HeadingChanged {
        /// New heading.
        direction: Direction,
    },
    /// The actor moved one tile.
    ActorAdvanced {
        /// Head position before the step.
        from: Position,
        /// Head position after the step.
        to: Position,
        /// Whether the body grew because the step landed on food.
        grew: bool,
    },
    /// A food tile was credited to the score.
    FoodConsumed {
        /// Points awarded for this food tile.
        points: u32,
        /// Food consumed on the current level so far.
        consumed: u32,
    },
    /// The actor lost a life.
    LifeLost {
        /// Lives left after the loss.
        remaining: u32,
    },
    /// The actor was collapsed onto the spawn tile.
    ActorReset {
        /// Spawn position the actor occupies.
        spawn: Position,
    },
}

/// Cardinal directions a snake can move in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Order in which the pathfinder expands successor states.
    pub const SEARCH_ORDER: [Direction; 4] = [
        Direction::South,
        Direction::North,
        Direction::West,
        Direction::East,
    ];

    /// Column and row deltas, in that order, of a single step.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// Resolves a unit column/row delta into a direction.
    #[must_use]
    pub const fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (0, -1) => Some(Self::North),
            (1, 0) => Some(Self::East),
            (0, 1) => Some(Self::South),
            (-1, 0) => Some(Self::West),
            _ => None,
        }
    }

    /// Direction after a quarter turn counter-clockwise.
    #[must_use]
    pub const fn turn_left(self) -> Self {
        let (dx, dy) = self.delta();
        match Self::from_delta(dy, -dx) {
            Some(direction) => direction,
            None => self,
        }
    }

    /// Direction after a quarter turn clockwise.
    #[must_use]
    pub const fn turn_right(self) -> Self {
        let (dx, dy) = self.delta();
        match Self::from_delta(-dy, dx) {
            Some(direction) => direction,
            None => self,
        }
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Reports whether moving in `self` would reverse into `heading`.
    ///
    /// A neutral heading (`None`) has no reverse.
    #[must_use]
    pub fn reverses(self, heading: Option<Direction>) -> bool {
        heading.is_some_and(|heading| heading.opposite() == self)
    }
}

/// Location of a single tile expressed as row and column indices.
///
/// Coordinates are signed so that a step off the edge of a level produces a
/// representable position that the grid reports as out of bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    row: i32,
    column: i32,
}

impl Position {
    /// Creates a new tile position.
    #[must_use]
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Zero-based column index.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Position one step away in the provided direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            row: self.row.saturating_add(dy),
            column: self.column.saturating_add(dx),
        }
    }

    /// Computes the Manhattan distance between two positions.
    #[must_use]
    pub fn manhattan_distance(self, other: Position) -> u32 {
        self.row.abs_diff(other.row) + self.column.abs_diff(other.column)
    }
}

/// Semantic content of a single grid tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Free floor.
    #[default]
    Empty,
    /// Solid wall.
    Wall,
    /// Tile outside the playable area. Also reported for positions off the grid.
    OutOfBounds,
    /// The live food tile.
    Food,
    /// The snake's head.
    SnakeHead,
    /// A snake body segment behind the head.
    SnakeBody,
}

impl TileKind {
    /// Reports whether entering a tile of this kind is a crash.
    #[must_use]
    pub const fn is_blocking(self) -> bool {
        matches!(self, Self::Wall | Self::OutOfBounds | Self::SnakeBody)
    }
}

/// Render snapshot of a session, sufficient to draw a frame without touching the world.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Frame {
    /// State the session was in when the snapshot was captured.
    pub state: SessionState,
    /// Number of rows in the current level.
    pub rows: usize,
    /// Number of columns in the current level.
    pub columns: usize,
    /// Tile kinds of the current level in row-major order.
    pub tiles: Vec<TileKind>,
    /// Heading of the snake, `None` while neutral.
    pub heading: Option<Direction>,
    /// Lives remaining.
    pub lives: u32,
    /// Lives the session started with.
    pub starting_lives: u32,
    /// Cumulative score.
    pub score: u32,
    /// Food consumed on the current level.
    pub consumed: u32,
    /// Food required to clear a level.
    pub quota: u32,
    /// Zero-based index of the current level.
    pub level: usize,
    /// Number of levels in the session.
    pub level_count: usize,
}

impl Frame {
    /// Tile kind at the provided row and column, if it lies within the level.
    #[must_use]
    pub fn tile(&self, row: usize, column: usize) -> Option<TileKind> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        self.tiles.get(row * self.columns + column).copied()
    }

    /// Iterator over the rows of the level.
    pub fn tile_rows(&self) -> impl Iterator<Item = &[TileKind]> {
        self.tiles.chunks(self.columns.max(1))
    }

    /// Reports whether the session ended by clearing every level.
    #[must_use]
    pub const fn is_won(&self) -> bool {
        matches!(self.state, SessionState::GameOver) && self.lives > 0
    }

    /// Reports whether the session ended by running out of lives.
    #[must_use]
    pub const fn is_lost(&self) -> bool {
        matches!(self.state, SessionState::GameOver) && self.lives == 0
    }
}

#[cfg(test)]
mod tests {
    use super::{Direction, Frame, Position, SessionState, TileKind};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = Position::new(1, 1);
        let destination = Position::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn turning_left_from_east_faces_north() {
        assert_eq!(Direction::East.turn_left(), Direction::North);
        assert_eq!(Direction::North.turn_left(), Direction::West);
        assert_eq!(Direction::West.turn_left(), Direction::South);
        assert_eq!(Direction::South.turn_left(), Direction::East);
    }

    #[test]
    fn turning_right_undoes_turning_left() {
        for direction in Direction::SEARCH_ORDER {
            assert_eq!(direction.turn_left().turn_right(), direction);
            assert_eq!(direction.turn_right().turn_right(), direction.opposite());
        }
    }

    #[test]
    fn neutral_heading_has_no_reverse() {
        for direction in Direction::SEARCH_ORDER {
            assert!(!direction.reverses(None));
        }
        assert!(Direction::West.reverses(Some(Direction::East)));
        assert!(!Direction::North.reverses(Some(Direction::East)));
    }

    #[test]
    fn step_follows_row_and_column_deltas() {
        let origin = Position::new(2, 2);
        assert_eq!(origin.step(Direction::North), Position::new(1, 2));
        assert_eq!(origin.step(Direction::East), Position::new(2, 3));
        assert_eq!(origin.step(Direction::South), Position::new(3, 2));
        assert_eq!(origin.step(Direction::West), Position::new(2, 1));
        assert_eq!(Position::new(0, 0).step(Direction::West), Position::new(0, -1));
    }

    #[test]
    fn blocking_kinds_match_crash_rules() {
        assert!(TileKind::Wall.is_blocking());
        assert!(TileKind::OutOfBounds.is_blocking());
        assert!(TileKind::SnakeBody.is_blocking());
        assert!(!TileKind::Empty.is_blocking());
        assert!(!TileKind::Food.is_blocking());
        assert!(!TileKind::SnakeHead.is_blocking());
    }

    #[test]
    fn frame_reports_outcome_only_when_game_over() {
        let mut frame = Frame {
            state: SessionState::Run,
            rows: 1,
            columns: 2,
            tiles: vec![TileKind::SnakeHead, TileKind::Food],
            heading: None,
            lives: 0,
            starting_lives: 3,
            score: 0,
            consumed: 0,
            quota: 1,
            level: 0,
            level_count: 1,
        };
        assert!(!frame.is_lost());
        frame.state = SessionState::GameOver;
        assert!(frame.is_lost());
        assert!(!frame.is_won());
        assert_eq!(frame.tile(0, 1), Some(TileKind::Food));
        assert_eq!(frame.tile(1, 0), None);
    }

    #[test]
    fn only_pause_states_await_acknowledgement() {
        assert!(SessionState::Start.awaits_acknowledgement());
        assert!(SessionState::Crash.awaits_acknowledgement());
        assert!(SessionState::LevelUp.awaits_acknowledgement());
        assert!(!SessionState::Run.awaits_acknowledgement());
        assert!(!SessionState::Thinking.is_drawn());
        assert!(SessionState::GameOver.is_terminal());
    }
}
