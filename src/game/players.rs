use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::board::Cell;
use crate::coords::BOARD_SIZE;
use crate::types::PlayerId;

pub const START_CELL: Cell = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,
    pub position: Cell,
    pub ladders_climbed: u32,
    pub snakes_hit: u32,
    pub overshoots: u32,
}

impl PlayerState {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            position: START_CELL,
            ladders_climbed: 0,
            snakes_hit: 0,
            overshoots: 0,
        }
    }

    /// Cells the token passes through when moving `die` cells forward, ending
    /// on the target. `None` when the target lies beyond the last cell.
    pub fn path_for(&self, die: u8) -> Option<RangeInclusive<Cell>> {
        let target = self.position.checked_add(die)?;
        (target <= BOARD_SIZE).then(|| self.position + 1..=target)
    }

    pub fn has_finished(&self) -> bool {
        self.position == BOARD_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn players_start_on_the_first_cell() {
        let player = PlayerState::new(PlayerId::Two);
        assert_eq!(player.position, START_CELL);
        assert!(!player.has_finished());
    }

    #[test]
    fn path_lists_every_intermediate_cell() {
        let mut player = PlayerState::new(PlayerId::One);
        player.position = 7;
        let path: Vec<_> = player.path_for(4).unwrap().collect();
        assert_eq!(path, [8, 9, 10, 11]);
    }

    #[test]
    fn path_past_the_last_cell_is_refused() {
        let mut player = PlayerState::new(PlayerId::One);
        player.position = 97;
        assert!(player.path_for(5).is_none());
        assert_eq!(player.path_for(3).unwrap().last(), Some(BOARD_SIZE));
    }
}
