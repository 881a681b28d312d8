#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Move planning for the snake.
//!
//! [`Pathfinder`] runs a breadth-first search over simulated snake states and
//! returns the shortest direction sequence that brings the head onto the food
//! tile. [`random_move`] picks a single safe step when no plan is available.

mod local;

use std::collections::{HashSet, VecDeque};

use snaze_core::{Direction, Position, VisitedPolicy};
use snaze_world::{Actor, Grid};

pub use local::random_move;

/// Tuning knobs of the path search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathfinderConfig {
    /// Key used to deduplicate explored states.
    pub visited: VisitedPolicy,
    /// Number of states the search may expand before giving up.
    pub expansion_limit: usize,
}

impl PathfinderConfig {
    /// Default number of states expanded per plan.
    pub const DEFAULT_EXPANSION_LIMIT: usize = 250_000;
}

impl Default for PathfinderConfig {
    fn default() -> Self {
        Self {
            visited: VisitedPolicy::default(),
            expansion_limit: Self::DEFAULT_EXPANSION_LIMIT,
        }
    }
}

/// Breadth-first planner over simulated snake bodies.
#[derive(Clone, Debug, Default)]
pub struct Pathfinder {
    config: PathfinderConfig,
}

impl Pathfinder {
    /// Creates a pathfinder with the provided configuration.
    #[must_use]
    pub const fn new(config: PathfinderConfig) -> Self {
        Self { config }
    }

    /// Plans the shortest move sequence from the actor's head to the food tile.
    ///
    /// Returns an empty sequence when the grid has no food, when walls cut the
    /// head off from the food, when every route is closed by the simulated
    /// body, or when the expansion limit is exhausted. The grid and actor are
    /// never modified.
    #[must_use]
    pub fn plan(&self, grid: &Grid, actor: &Actor) -> Vec<Direction> {
        let Some(food) = grid.food() else {
            return Vec::new();
        };

        if !grid.is_reachable(actor.head(), food) {
            tracing::debug!(?food, "food is walled off from the head");
            return Vec::new();
        }

        let mut search = Search::new(self.config.visited);
        let root = search.push(Node {
            body: actor.body().collect(),
            heading: actor.heading(),
            parent: None,
            via: None,
        });
        let Some(root) = root else {
            return Vec::new();
        };

        let mut queue = VecDeque::from([root]);
        let mut expanded = 0_usize;

        while let Some(index) = queue.pop_front() {
            if search.nodes[index].head() == food {
                let plan = search.directions_to(index);
                tracing::trace!(steps = plan.len(), expanded, "plan found");
                return plan;
            }

            if expanded >= self.config.expansion_limit {
                tracing::debug!(expanded, "expansion limit reached");
                return Vec::new();
            }
            expanded += 1;

            for direction in Direction::SEARCH_ORDER {
                let Some(child) = search.nodes[index].successor(grid, index, direction) else {
                    continue;
                };
                if let Some(child) = search.push(child) {
                    queue.push_back(child);
                }
            }
        }

        tracing::debug!(expanded, "no route to food");
        Vec::new()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum VisitedKey {
    Head(Position, Option<Direction>),
    Body(Vec<Position>, Option<Direction>),
}

#[derive(Clone, Debug)]
struct Node {
    body: VecDeque<Position>,
    heading: Option<Direction>,
    parent: Option<usize>,
    via: Option<Direction>,
}

impl Node {
    fn head(&self) -> Position {
        self.body.front().copied().unwrap_or(Position::new(-1, -1))
    }

    fn successor(&self, grid: &Grid, index: usize, direction: Direction) -> Option<Node> {
        if direction.reverses(self.heading) {
            return None;
        }

        let next = self.head().step(direction);
        if grid.is_static_obstacle(next) {
            return None;
        }

        let trailing = self.body.len().saturating_sub(1);
        if self.body.iter().take(trailing).any(|segment| *segment == next) {
            return None;
        }

        let mut body = self.body.clone();
        body.push_front(next);
        let _ = body.pop_back();

        Some(Node {
            body,
            heading: Some(direction),
            parent: Some(index),
            via: Some(direction),
        })
    }

    fn key(&self, policy: VisitedPolicy) -> VisitedKey {
        match policy {
            VisitedPolicy::HeadAndHeading => VisitedKey::Head(self.head(), self.heading),
            VisitedPolicy::FullBody => {
                VisitedKey::Body(self.body.iter().copied().collect(), self.heading)
            }
        }
    }
}

#[derive(Debug)]
struct Search {
    policy: VisitedPolicy,
    nodes: Vec<Node>,
    visited: HashSet<VisitedKey>,
}

impl Search {
    fn new(policy: VisitedPolicy) -> Self {
        Self {
            policy,
            nodes: Vec::new(),
            visited: HashSet::new(),
        }
    }

    fn push(&mut self, node: Node) -> Option<usize> {
        if !self.visited.insert(node.key(self.policy)) {
            return None;
        }
        self.nodes.push(node);
        Some(self.nodes.len() - 1)
    }

    fn directions_to(&self, mut index: usize) -> Vec<Direction> {
        let mut directions = Vec::new();
        while let Some(node) = self.nodes.get(index) {
            let (Some(parent), Some(via)) = (node.parent, node.via) else {
                break;
            };
            directions.push(via);
            index = parent;
        }
        directions.reverse();
        directions
    }
}
