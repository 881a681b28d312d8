//! Randomized local mover.

use rand::{seq::SliceRandom, Rng};
use snaze_core::Direction;
use snaze_world::{Actor, Grid};

const NEUTRAL_CANDIDATES: [Direction; 4] = [
    Direction::South,
    Direction::North,
    Direction::East,
    Direction::West,
];

/// Picks a uniformly random safe direction for the next step.
///
/// With a neutral heading every direction is a candidate. Otherwise the
/// candidates are a left turn, straight ahead and a right turn, so the snake
/// never reverses. A step is safe when its target tile does not block or is
/// the tail that moves away during the same step. When nothing is safe the
/// snake keeps going straight, or south from a neutral heading.
pub fn random_move<R>(grid: &Grid, actor: &Actor, rng: &mut R) -> Direction
where
    R: Rng + ?Sized,
{
    let (candidates, fallback) = match actor.heading() {
        None => (NEUTRAL_CANDIDATES.to_vec(), Direction::South),
        Some(heading) => (
            vec![heading.turn_left(), heading, heading.turn_right()],
            heading,
        ),
    };

    let safe: Vec<Direction> = candidates
        .into_iter()
        .filter(|direction| is_safe(grid, actor, *direction))
        .collect();

    safe.choose(rng).copied().unwrap_or(fallback)
}

fn is_safe(grid: &Grid, actor: &Actor, direction: Direction) -> bool {
    let next = actor.next_head(direction);
    !grid.is_blocking(next) || next == actor.tail()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use snaze_core::Position;
    use snaze_world::parse_levels;

    fn grid(source: &str) -> Grid {
        parse_levels(source).expect("level parses").remove(0)
    }

    #[test]
    fn neutral_heading_in_corridor_picks_open_side() {
        let mut grid = grid("3 4\n####\n#* #\n####\n");
        let actor = Actor::spawned(&mut grid, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..16 {
            assert_eq!(random_move(&grid, &actor, &mut rng), Direction::East);
        }
    }

    #[test]
    fn trapped_snake_falls_back_to_straight() {
        let mut grid = grid("3 3\n###\n#*#\n###\n");
        let mut actor = Actor::spawned(&mut grid, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(random_move(&grid, &actor, &mut rng), Direction::South);

        actor.set_heading(Direction::West);
        assert_eq!(random_move(&grid, &actor, &mut rng), Direction::West);
    }

    #[test]
    fn never_reverses_and_never_picks_unsafe_tiles() {
        let mut grid = grid("5 5\n#####\n#   #\n# * #\n#   #\n#####\n");
        let body = [Position::new(2, 2), Position::new(2, 1), Position::new(1, 1)];
        let actor = Actor::with_body(&mut grid, body, Some(Direction::East), 1);
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        for _ in 0..64 {
            let direction = random_move(&grid, &actor, &mut rng);
            assert_ne!(direction, Direction::West);
            assert!(!grid.is_blocking(actor.next_head(direction)));
        }
    }

    #[test]
    fn stepping_into_the_tail_counts_as_safe() {
        let mut grid = grid("4 4\n####\n#* #\n#  #\n####\n");
        let body = [
            Position::new(1, 1),
            Position::new(1, 2),
            Position::new(2, 2),
            Position::new(2, 1),
        ];
        let actor = Actor::with_body(&mut grid, body, Some(Direction::West), 1);
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        assert_eq!(random_move(&grid, &actor, &mut rng), Direction::South);
    }
}
