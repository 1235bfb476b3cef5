/// The tick function: advances the snake by one cell.
///
/// Order per tick:
///   1. Adopt the queued heading (reversal-filtered upstream by the arbiter)
///   2. Bounds check the new head
///   3. Body check (tail cell exempt when no growth is pending)
///   4. Commit the move: prepend head
///   5. Food: score +1, growth +1, relocate food — or BoardFull when the
///      snake now covers every cell
///   6. Otherwise consume pending growth, or pop the tail
///
/// A terminal outcome (Collided / BoardFull) freezes the world; further
/// ticks are no-ops until `reset`.

use crate::domain::grid::Direction;

use super::event::GameEvent;
use super::world::SnakeWorld;

pub fn tick(world: &mut SnakeWorld, heading: Direction) -> Vec<GameEvent> {
    if !world.alive {
        return vec![];
    }

    let mut events = Vec::new();
    world.heading = heading;

    let new_head = world.head().step(heading);

    if !world.in_bounds(new_head) {
        world.alive = false;
        events.push(GameEvent::Collided);
        return events;
    }
    if world.hits_body(new_head) {
        world.alive = false;
        events.push(GameEvent::Collided);
        return events;
    }

    world.snake.push_front(new_head);

    if new_head == world.food {
        world.score += 1;
        world.pending_growth += 1;
        events.push(GameEvent::Ate { at: new_head });
        match world.relocate_food() {
            Some(c) => events.push(GameEvent::FoodPlaced { at: c }),
            None => {
                // Grid fully occupied: a win, not an infinite sampling loop.
                world.alive = false;
                events.push(GameEvent::BoardFull);
            }
        }
    } else if world.pending_growth > 0 {
        world.pending_growth -= 1;
    } else {
        world.snake.pop_back();
    }

    debug_assert!(world.cells_distinct(), "snake self-overlap after tick");
    debug_assert!(
        !world.alive || !world.snake.contains(&world.food),
        "food placed on snake"
    );

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::Cell;

    fn cells(layout: &[(i32, i32)]) -> std::collections::VecDeque<Cell> {
        layout.iter().map(|&(x, y)| Cell::new(x, y)).collect()
    }

    /// 10x10, body (5,5)..(2,5), heading right.
    fn world_10x10() -> SnakeWorld {
        let mut w = SnakeWorld::with_seed(10, 10, 99);
        w.snake = cells(&[(5, 5), (4, 5), (3, 5), (2, 5)]);
        w.heading = Direction::Right;
        w
    }

    #[test]
    fn plain_move_keeps_length() {
        let mut w = world_10x10();
        w.food = Cell::new(0, 0);
        let events = tick(&mut w, Direction::Right);
        assert!(events.is_empty());
        assert_eq!(w.head(), Cell::new(6, 5));
        assert_eq!(w.snake.len(), 4);
        assert_eq!(*w.snake.back().unwrap(), Cell::new(3, 5));
        assert_eq!(w.score, 0);
    }

    #[test]
    fn eating_scores_grows_and_relocates_food() {
        let mut w = world_10x10();
        w.food = Cell::new(6, 5);
        let events = tick(&mut w, Direction::Right);

        assert_eq!(w.head(), Cell::new(6, 5));
        assert_eq!(w.score, 1);
        assert_eq!(w.snake.len(), 5);
        assert!(matches!(events[0], GameEvent::Ate { at } if at == Cell::new(6, 5)));
        assert!(matches!(events[1], GameEvent::FoodPlaced { .. }));
        assert!(!w.snake.contains(&w.food));
        assert!(w.cells_distinct());
    }

    #[test]
    fn growth_is_consumed_on_the_following_tick() {
        let mut w = world_10x10();
        w.food = Cell::new(6, 5);
        tick(&mut w, Direction::Right);
        // The eating tick skips the pop and banks one more growth.
        assert_eq!(w.pending_growth, 1);
        w.food = Cell::new(0, 0);
        tick(&mut w, Direction::Right);
        assert_eq!(w.snake.len(), 6);
        assert_eq!(w.pending_growth, 0);
        tick(&mut w, Direction::Right);
        assert_eq!(w.snake.len(), 6); // steady length afterwards
    }

    #[test]
    fn wall_hit_is_terminal_without_mutation() {
        let mut w = world_10x10();
        w.snake = cells(&[(9, 5), (8, 5), (7, 5), (6, 5)]);
        w.food = Cell::new(0, 0);
        let events = tick(&mut w, Direction::Right);
        assert_eq!(events, vec![GameEvent::Collided]);
        assert!(!w.alive);
        assert_eq!(w.head(), Cell::new(9, 5));
        assert_eq!(w.snake.len(), 4);
        // Terminal world ignores further ticks.
        assert!(tick(&mut w, Direction::Left).is_empty());
    }

    #[test]
    fn body_hit_is_terminal() {
        let mut w = SnakeWorld::with_seed(10, 10, 5);
        // Hook shape: moving up from (1,1) lands on (1,0), a body cell.
        w.snake = cells(&[(1, 1), (2, 1), (2, 0), (1, 0), (0, 0)]);
        w.food = Cell::new(9, 9);
        let events = tick(&mut w, Direction::Up);
        assert_eq!(events, vec![GameEvent::Collided]);
        assert!(!w.alive);
    }

    #[test]
    fn vacating_tail_cell_is_not_a_collision() {
        let mut w = SnakeWorld::with_seed(10, 10, 5);
        // Closed square: head (1,1), tail (1,2); stepping down enters the
        // cell the tail leaves this tick.
        w.snake = cells(&[(1, 1), (2, 1), (2, 2), (1, 2)]);
        w.food = Cell::new(9, 9);
        let events = tick(&mut w, Direction::Down);
        assert!(events.is_empty());
        assert!(w.alive);
        assert_eq!(w.head(), Cell::new(1, 2));
        assert!(w.cells_distinct());
    }

    #[test]
    fn tail_cell_collides_while_growing() {
        let mut w = SnakeWorld::with_seed(10, 10, 5);
        w.snake = cells(&[(1, 1), (2, 1), (2, 2), (1, 2)]);
        w.food = Cell::new(9, 9);
        w.pending_growth = 1;
        let events = tick(&mut w, Direction::Down);
        assert_eq!(events, vec![GameEvent::Collided]);
        assert!(!w.alive);
    }

    #[test]
    fn reversal_is_a_body_hit_if_it_slips_through() {
        // The arbiter guards reversals upstream; if one ever reached the
        // tick it must still resolve as a collision, not corruption.
        let mut w = world_10x10();
        w.food = Cell::new(0, 0);
        let events = tick(&mut w, Direction::Left);
        assert_eq!(events, vec![GameEvent::Collided]);
    }

    #[test]
    fn final_food_emits_board_full_and_ends_the_round() {
        let mut w = SnakeWorld::with_seed(2, 2, 11);
        w.snake = cells(&[(0, 0), (0, 1), (1, 1)]);
        w.food = Cell::new(1, 0);
        w.heading = Direction::Right;
        let events = tick(&mut w, Direction::Right);
        assert!(matches!(events[0], GameEvent::Ate { .. }));
        assert_eq!(events[1], GameEvent::BoardFull);
        assert!(!w.alive);
        assert_eq!(w.score, 1);
        assert!(w.is_full());
        assert!(w.cells_distinct());
    }

    #[test]
    fn body_stays_distinct_over_a_run() {
        let mut w = SnakeWorld::with_seed(8, 8, 77);
        let route = [
            Direction::Right,
            Direction::Down,
            Direction::Left,
            Direction::Left,
            Direction::Up,
            Direction::Up,
            Direction::Right,
        ];
        let mut last_score = 0;
        for &dir in route.iter().cycle().take(40) {
            if !w.alive {
                break;
            }
            let events = tick(&mut w, dir);
            assert!(w.cells_distinct());
            // Score moves by exactly the number of Ate events, never down.
            let ate = events
                .iter()
                .filter(|e| matches!(e, GameEvent::Ate { .. }))
                .count() as u32;
            assert_eq!(w.score, last_score + ate);
            last_score = w.score;
        }
    }
}
