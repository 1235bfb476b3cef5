/// SnakeWorld: the complete state of one round.
///
/// The snake is an ordered body of cells, head at the front. All cells are
/// pairwise distinct; the food cell is never a body cell. Both invariants
/// are re-asserted after every committed tick (debug builds fail loudly,
/// see `step`). Mutation happens only through `reset` and the tick
/// algorithm in `sim::step`.
///
/// The world owns its random source: one PCG stream per session, seeded
/// from the wall clock at construction. Nothing requires reproducibility
/// across runs; tests pin the seed instead.

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::domain::grid::{Cell, Direction};

pub const START_LEN: usize = 4;

pub struct SnakeWorld {
    pub width: i32,
    pub height: i32,

    /// Body cells, head first.
    pub snake: VecDeque<Cell>,
    /// Committed heading, adopted from the arbiter at each tick.
    pub heading: Direction,
    pub food: Cell,
    pub score: u32,
    /// Tail removals still to skip; one per food not yet grown out.
    pub pending_growth: u32,
    /// False once the round is terminal (collision or full board).
    pub alive: bool,

    rng: Pcg32,
}

impl SnakeWorld {
    pub fn new(width: i32, height: i32) -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x70756d70);
        Self::with_seed(width, height, seed)
    }

    /// Deterministic constructor; the seeded path tests rely on.
    pub fn with_seed(width: i32, height: i32, seed: u64) -> Self {
        let mut world = SnakeWorld {
            width,
            height,
            snake: VecDeque::new(),
            heading: Direction::Right,
            food: Cell::new(0, 0),
            score: 0,
            pending_growth: 0,
            alive: true,
            rng: Pcg32::seed_from_u64(seed),
        };
        world.reset();
        world
    }

    /// Fresh round: centered snake of START_LEN heading right, score zero,
    /// food on a random free cell.
    pub fn reset(&mut self) {
        let cx = self.width / 2;
        let cy = self.height / 2;
        self.snake.clear();
        for i in 0..START_LEN as i32 {
            self.snake.push_back(Cell::new(cx - i, cy));
        }
        self.heading = Direction::Right;
        self.score = 0;
        self.pending_growth = 0;
        self.alive = true;
        // START_LEN never fills the grid at playable sizes.
        let _ = self.relocate_food();
    }

    pub fn head(&self) -> Cell {
        // The body is never empty after construction.
        self.snake[0]
    }

    pub fn in_bounds(&self, c: Cell) -> bool {
        c.x >= 0 && c.x < self.width && c.y >= 0 && c.y < self.height
    }

    pub fn is_full(&self) -> bool {
        self.snake.len() >= (self.width as usize) * (self.height as usize)
    }

    /// Would `c` hit the body? The tail cell is excluded when no growth is
    /// pending: it vacates this very tick, so it is not an obstacle.
    pub fn hits_body(&self, c: Cell) -> bool {
        let last = self.snake.len() - 1;
        self.snake.iter().enumerate().any(|(i, &cell)| {
            if self.pending_growth == 0 && i == last {
                false
            } else {
                cell == c
            }
        })
    }

    /// Move the food to a uniformly random unoccupied cell by rejection
    /// sampling. Returns None without sampling when the board is full —
    /// the caller turns that into a terminal BoardFull outcome.
    pub fn relocate_food(&mut self) -> Option<Cell> {
        if self.is_full() {
            return None;
        }
        loop {
            let c = Cell::new(
                self.rng.random_range(0..self.width),
                self.rng.random_range(0..self.height),
            );
            if !self.snake.contains(&c) {
                self.food = c;
                return Some(c);
            }
        }
    }

    /// All body cells pairwise distinct? Cheap at snake scale; used by the
    /// post-tick debug assertion.
    pub fn cells_distinct(&self) -> bool {
        for (i, a) in self.snake.iter().enumerate() {
            if self.snake.iter().skip(i + 1).any(|b| b == a) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_builds_centered_snake() {
        let w = SnakeWorld::with_seed(10, 10, 7);
        assert_eq!(w.snake.len(), START_LEN);
        assert_eq!(w.head(), Cell::new(5, 5));
        assert_eq!(*w.snake.back().unwrap(), Cell::new(2, 5));
        assert_eq!(w.heading, Direction::Right);
        assert_eq!(w.score, 0);
        assert!(w.cells_distinct());
        assert!(!w.snake.contains(&w.food));
    }

    #[test]
    fn relocate_food_avoids_snake() {
        let mut w = SnakeWorld::with_seed(5, 5, 42);
        for _ in 0..200 {
            let c = w.relocate_food().expect("board not full");
            assert!(w.in_bounds(c));
            assert!(!w.snake.contains(&c));
        }
    }

    #[test]
    fn relocate_food_on_full_board_refuses() {
        let mut w = SnakeWorld::with_seed(2, 2, 1);
        w.snake = [(0, 0), (1, 0), (1, 1), (0, 1)]
            .iter()
            .map(|&(x, y)| Cell::new(x, y))
            .collect();
        assert!(w.is_full());
        assert_eq!(w.relocate_food(), None);
    }

    #[test]
    fn tail_cell_ignored_only_without_pending_growth() {
        let mut w = SnakeWorld::with_seed(10, 10, 3);
        let tail = *w.snake.back().unwrap();
        assert!(!w.hits_body(tail));
        w.pending_growth = 1;
        assert!(w.hits_body(tail));
    }
}
