//! Static reachability field used to rule out hopeless searches.

use std::collections::VecDeque;

use snaze_core::{Direction, Position};

/// Dense breadth-first distance grid seeded from one or more source tiles.
///
/// Distances default to `u16::MAX` for unreachable or blocked tiles.
#[derive(Clone, Debug, Default)]
pub(crate) struct ReachabilityField {
    rows: usize,
    columns: usize,
    distances: Vec<u16>,
}

impl ReachabilityField {
    /// Rebuilds the distances using a breadth-first flood from `sources`.
    pub(crate) fn rebuild_with<F>(
        &mut self,
        rows: usize,
        columns: usize,
        sources: &[Position],
        mut is_blocked: F,
    ) where
        F: FnMut(Position) -> bool,
    {
        let cell_count = rows.checked_mul(columns).unwrap_or(0);
        self.rows = rows;
        self.columns = columns;

        if cell_count == 0 {
            self.distances.clear();
            return;
        }

        if self.distances.len() != cell_count {
            self.distances = vec![u16::MAX; cell_count];
        } else {
            self.distances.fill(u16::MAX);
        }

        let mut queue = VecDeque::new();

        for &source in sources {
            let Some(index) = self.index(source) else {
                continue;
            };
            if is_blocked(source) || self.distances[index] == 0 {
                continue;
            }

            self.distances[index] = 0;
            queue.push_back(source);
        }

        while let Some(position) = queue.pop_front() {
            let Some(current_index) = self.index(position) else {
                continue;
            };
            let current_distance = self.distances[current_index];

            if current_distance >= u16::MAX.saturating_sub(1) {
                continue;
            }

            let next_distance = current_distance + 1;

            for direction in Direction::SEARCH_ORDER {
                let neighbor = position.step(direction);
                let Some(neighbor_index) = self.index(neighbor) else {
                    continue;
                };

                if self.distances[neighbor_index] <= next_distance || is_blocked(neighbor) {
                    continue;
                }

                self.distances[neighbor_index] = next_distance;
                queue.push_back(neighbor);
            }
        }
    }

    /// Distance captured for the provided position, if it was reached.
    #[must_use]
    pub(crate) fn distance(&self, position: Position) -> Option<u32> {
        let index = self.index(position)?;
        match self.distances.get(index).copied() {
            Some(u16::MAX) | None => None,
            Some(distance) => Some(u32::from(distance)),
        }
    }

    fn index(&self, position: Position) -> Option<usize> {
        let row = usize::try_from(position.row()).ok()?;
        let column = usize::try_from(position.column()).ok()?;
        if row < self.rows && column < self.columns {
            row.checked_mul(self.columns)?.checked_add(column)
        } else {
            None
        }
    }
}
