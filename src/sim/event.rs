/// Outcome events emitted by a simulation tick.
/// The frame loop consumes these for screen transitions and sound.

use crate::domain::grid::Cell;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameEvent {
    /// Food consumed this tick (score and length already updated).
    Ate { at: Cell },
    /// Food relocated to a fresh unoccupied cell.
    FoodPlaced { at: Cell },
    /// Wall or body hit; the world is terminal.
    Collided,
    /// Every grid cell is snake; terminal win, food placement impossible.
    BoardFull,
}
