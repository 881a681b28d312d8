#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Snaze.
//!
//! The world owns every level grid and the snake that occupies the current
//! one. It changes only through [`apply`], which executes a single
//! [`Command`] and reports what happened as [`Event`] values. Read access is
//! provided by the [`query`] module.

mod actor;
mod grid;
mod levels;
mod reachability;

use rand::Rng;
use snaze_core::{Command, Event, GameConfig, Scoring, SessionState};

pub use actor::{Actor, Step};
pub use grid::Grid;
pub use levels::{parse_levels, LevelError, MAX_DIMENSION};

/// Represents the authoritative Snaze world state.
#[derive(Clone, Debug)]
pub struct World {
    levels: Vec<Grid>,
    current: usize,
    actor: Actor,
    state: SessionState,
    score: u32,
    consumed: u32,
    quota: u32,
    starting_lives: u32,
    scoring: Scoring,
}

impl World {
    /// Creates a world holding `levels` in play order with the snake on the first one.
    ///
    /// The first level is occupied but not activated: no food is placed until
    /// [`Command::ActivateLevel`] is applied.
    pub fn new(mut levels: Vec<Grid>, config: &GameConfig) -> Result<Self, LevelError> {
        let first = levels.first_mut().ok_or(LevelError::NoLevels)?;
        let actor = Actor::spawned(first, config.lives);

        Ok(Self {
            levels,
            current: 0,
            actor,
            state: SessionState::Start,
            score: 0,
            consumed: 0,
            quota: config.food_per_level,
            starting_lives: config.lives,
            scoring: config.scoring,
        })
    }

    fn grid_mut(&mut self) -> &mut Grid {
        &mut self.levels[self.current]
    }

    fn place_food<R>(&mut self, rng: &mut R, out_events: &mut Vec<Event>)
    where
        R: Rng + ?Sized,
    {
        let level = self.current;
        match self.grid_mut().place_food(rng) {
            Some(position) => out_events.push(Event::FoodPlaced { position }),
            None => {
                tracing::warn!(level, "no free tile left for food");
                out_events.push(Event::FoodPlacementFailed { level });
            }
        }
    }

    fn respawn(&mut self, out_events: &mut Vec<Event>) {
        let grid = &mut self.levels[self.current];
        let spawn = grid.spawn();
        self.actor.vacate(grid);
        self.actor.reset(grid, spawn);
        out_events.push(Event::ActorReset { spawn });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Randomness is drawn only from `rng`, and only by commands that place food.
pub fn apply<R>(world: &mut World, command: Command, rng: &mut R, out_events: &mut Vec<Event>)
where
    R: Rng + ?Sized,
{
    match command {
        Command::TransitionTo { state } => {
            let from = world.state;
            world.state = state;
            if from != state {
                out_events.push(Event::StateChanged { from, to: state });
            }
        }
        Command::ActivateLevel { level } => {
            if level >= world.levels.len() {
                out_events.push(Event::LevelActivationRejected { level });
                return;
            }

            world.actor.vacate(&mut world.levels[world.current]);
            world.current = level;
            world.consumed = 0;

            let grid = &mut world.levels[level];
            let spawn = grid.spawn();
            world.actor.reset(grid, spawn);
            out_events.push(Event::LevelActivated { level, spawn });
            out_events.push(Event::ActorReset { spawn });
            world.place_food(rng, out_events);
        }
        Command::PlaceFood => world.place_food(rng, out_events),
        Command::SetHeading { direction } => {
            if world.actor.heading() != Some(direction) {
                world.actor.set_heading(direction);
                out_events.push(Event::HeadingChanged { direction });
            }
        }
        Command::AdvanceActor => {
            let Some(direction) = world.actor.heading() else {
                return;
            };
            let grid = &mut world.levels[world.current];
            let Step { from, to, grew } = world.actor.advance(grid, direction);
            out_events.push(Event::ActorAdvanced { from, to, grew });
        }
        Command::ConsumeFood => {
            let points = world.scoring.points(world.actor.body_len());
            world.score = world.score.saturating_add(points);
            world.consumed = world.consumed.saturating_add(1);
            out_events.push(Event::FoodConsumed {
                points,
                consumed: world.consumed,
            });
        }
        Command::LoseLife => {
            let remaining = world.actor.lose_life();
            out_events.push(Event::LifeLost { remaining });
        }
        Command::ResetActor => world.respawn(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use snaze_core::{Frame, SessionState};

    use super::{Actor, Grid, World};

    /// Grid of the level currently in play.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.levels[world.current]
    }

    /// Level at the provided play-order index, if it exists.
    #[must_use]
    pub fn level(world: &World, index: usize) -> Option<&Grid> {
        world.levels.get(index)
    }

    /// The snake.
    #[must_use]
    pub fn actor(world: &World) -> &Actor {
        &world.actor
    }

    /// Current state of the session state machine.
    #[must_use]
    pub fn state(world: &World) -> SessionState {
        world.state
    }

    /// Cumulative score.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Lives remaining.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.actor.lives()
    }

    /// Food consumed on the current level.
    #[must_use]
    pub fn consumed(world: &World) -> u32 {
        world.consumed
    }

    /// Food required to clear a level.
    #[must_use]
    pub fn quota(world: &World) -> u32 {
        world.quota
    }

    /// Reports whether the food quota of the current level has been met.
    #[must_use]
    pub fn quota_met(world: &World) -> bool {
        world.consumed >= world.quota
    }

    /// Zero-based index of the level in play.
    #[must_use]
    pub fn level_index(world: &World) -> usize {
        world.current
    }

    /// Number of levels in the session.
    #[must_use]
    pub fn level_count(world: &World) -> usize {
        world.levels.len()
    }

    /// Reports whether the level in play is the final one.
    #[must_use]
    pub fn is_last_level(world: &World) -> bool {
        world.current + 1 >= world.levels.len()
    }

    /// Captures a render snapshot of the current level and counters.
    #[must_use]
    pub fn frame(world: &World) -> Frame {
        let grid = grid(world);
        Frame {
            state: world.state,
            rows: grid.rows(),
            columns: grid.columns(),
            tiles: grid.tiles().to_vec(),
            heading: world.actor.heading(),
            lives: world.actor.lives(),
            starting_lives: world.starting_lives,
            score: world.score,
            consumed: world.consumed,
            quota: world.quota,
            level: world.current,
            level_count: world.levels.len(),
        }
    }
}
