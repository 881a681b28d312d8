#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn-based orchestration of a Snaze session.
//!
//! A [`Session`] owns the world, the random source and the pathfinder. Each
//! call to [`Session::tick`] performs exactly one transition of the session
//! state machine and submits the resulting mutations to the world as
//! commands.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use snaze_core::{
    Command, ConfigError, Direction, Event, Frame, GameConfig, SessionState, Strategy,
};
use snaze_system_pathfinding::{random_move, Pathfinder, PathfinderConfig};
use snaze_world::{self as world, query, Grid, LevelError, World};
use thiserror::Error;

/// Reasons a session cannot be started.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The level list was unusable.
    #[error(transparent)]
    Levels(#[from] LevelError),
}

/// One play-through across every level until the game is over.
#[derive(Debug)]
pub struct Session<R = ChaCha8Rng> {
    world: World,
    rng: R,
    pathfinder: Pathfinder,
    strategy: Strategy,
    plan: VecDeque<Direction>,
    events: Vec<Event>,
}

impl Session<ChaCha8Rng> {
    /// Creates a session whose random source is seeded with `seed`.
    pub fn seeded(levels: Vec<Grid>, config: &GameConfig, seed: u64) -> Result<Self, SessionError> {
        Self::new(levels, config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R> Session<R>
where
    R: Rng,
{
    /// Creates a session over `levels`, in play order, drawing randomness from `rng`.
    pub fn new(levels: Vec<Grid>, config: &GameConfig, rng: R) -> Result<Self, SessionError> {
        config.validate()?;
        let world = World::new(levels, config)?;
        let pathfinder = Pathfinder::new(PathfinderConfig {
            visited: config.visited,
            ..PathfinderConfig::default()
        });

        tracing::debug!(
            levels = query::level_count(&world),
            strategy = %config.strategy,
            visited = ?config.visited,
            "session created"
        );

        Ok(Self {
            world,
            rng,
            pathfinder,
            strategy: config.strategy,
            plan: VecDeque::new(),
            events: Vec::new(),
        })
    }

    /// Performs one state-machine transition and returns the resulting state.
    ///
    /// Ticking a finished session changes nothing.
    pub fn tick(&mut self) -> SessionState {
        self.events.clear();

        match self.state() {
            SessionState::Start => {
                self.activate_level(0);
                self.transition(SessionState::Thinking);
            }
            SessionState::Thinking => {
                self.think();
                self.transition(SessionState::Run);
            }
            SessionState::Run => self.run(),
            SessionState::Crash => {
                self.apply(Command::ResetActor);
                self.transition(SessionState::Thinking);
            }
            SessionState::LevelUp => {
                self.activate_level(query::level_index(&self.world) + 1);
                self.transition(SessionState::Thinking);
            }
            SessionState::GameOver => {}
        }

        self.state()
    }

    /// Current state of the state machine.
    #[must_use]
    pub fn state(&self) -> SessionState {
        query::state(&self.world)
    }

    /// Reports whether the session reached its terminal state.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.state().is_terminal()
    }

    /// Render snapshot of the current state.
    #[must_use]
    pub fn frame(&self) -> Frame {
        query::frame(&self.world)
    }

    /// Read-only access to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Events reported by the world during the most recent tick.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Moves still cached from the last plan, next move first.
    pub fn planned_moves(&self) -> impl Iterator<Item = Direction> + '_ {
        self.plan.iter().copied()
    }

    fn apply(&mut self, command: Command) {
        world::apply(&mut self.world, command, &mut self.rng, &mut self.events);
    }

    fn transition(&mut self, state: SessionState) {
        let from = self.state();
        self.apply(Command::TransitionTo { state });
        tracing::trace!(?from, to = ?state, "state transition");
    }

    fn activate_level(&mut self, level: usize) {
        self.apply(Command::ActivateLevel { level });
        tracing::info!(
            level = level + 1,
            of = query::level_count(&self.world),
            "level started"
        );
    }

    fn think(&mut self) {
        self.plan.clear();
        if self.strategy != Strategy::Backtracking {
            return;
        }

        let plan = self
            .pathfinder
            .plan(query::grid(&self.world), query::actor(&self.world));
        if plan.is_empty() {
            tracing::debug!("no plan found, falling back to random moves");
        }
        self.plan.extend(plan);
    }

    fn next_direction(&mut self) -> Direction {
        if self.strategy == Strategy::Backtracking {
            if let Some(direction) = self.plan.pop_front() {
                return direction;
            }
        }
        random_move(
            query::grid(&self.world),
            query::actor(&self.world),
            &mut self.rng,
        )
    }

    fn run(&mut self) {
        let direction = self.next_direction();
        let actor = query::actor(&self.world);
        let grid = query::grid(&self.world);
        let next = actor.next_head(direction);

        if grid.is_food(next) {
            self.apply(Command::SetHeading { direction });
            self.apply(Command::ConsumeFood);

            if query::quota_met(&self.world) {
                self.apply(Command::AdvanceActor);
                if query::is_last_level(&self.world) {
                    tracing::info!(score = query::score(&self.world), "all levels cleared");
                    self.transition(SessionState::GameOver);
                } else {
                    tracing::info!(score = query::score(&self.world), "level cleared");
                    self.transition(SessionState::LevelUp);
                }
                return;
            }

            self.apply(Command::AdvanceActor);
            self.apply(Command::PlaceFood);
            self.transition(SessionState::Thinking);
            return;
        }

        if grid.is_blocking(next) && next != actor.tail() {
            self.plan.clear();
            self.apply(Command::LoseLife);
            let lives = query::lives(&self.world);
            tracing::info!(?next, lives, "snake crashed");
            if lives == 0 {
                self.transition(SessionState::GameOver);
            } else {
                self.transition(SessionState::Crash);
            }
            return;
        }

        self.apply(Command::SetHeading { direction });
        self.apply(Command::AdvanceActor);
    }
}
