use std::collections::HashSet;
use std::ops::RangeInclusive;

use rand::Rng;

use super::{BoardError, Cell, Jump, JumpTable};

pub const DEFAULT_LADDERS: u8 = 7;
pub const DEFAULT_SNAKES: u8 = 7;

/// Cells 2..=99; the first and last cell are never endpoints.
pub const USABLE_CELLS: usize = 98;

pub const MAX_GENERATION_ATTEMPTS: u32 = 10_000;

const LADDER_STARTS: RangeInclusive<Cell> = 2..=80;
const LADDER_TOP: Cell = 99;
const SNAKE_HEADS: RangeInclusive<Cell> = 21..=99;
const SNAKE_TAIL_MIN: Cell = 2;

/// Rejection-samples `ladders` ladders and `snakes` snakes with pairwise
/// distinct endpoints.
pub fn generate_jumps(
    rng: &mut impl Rng,
    ladders: u8,
    snakes: u8,
) -> Result<JumpTable, BoardError> {
    generate_jumps_within(rng, ladders, snakes, MAX_GENERATION_ATTEMPTS)
}

/// Same as [`generate_jumps`] with an explicit attempt budget shared by both kinds.
pub fn generate_jumps_within(
    rng: &mut impl Rng,
    ladders: u8,
    snakes: u8,
    max_attempts: u32,
) -> Result<JumpTable, BoardError> {
    if 2 * (usize::from(ladders) + usize::from(snakes)) > USABLE_CELLS {
        return Err(BoardError::TooManyJumps { ladders, snakes });
    }

    let mut sampler = Sampler {
        used: HashSet::new(),
        jumps: Vec::with_capacity(usize::from(ladders) + usize::from(snakes)),
        attempts: 0,
        max_attempts,
    };

    let placed = sampler.place(rng, ladders, |rng| {
        let start = rng.gen_range(LADDER_STARTS);
        Jump::new(start, rng.gen_range(start + 1..=LADDER_TOP))
    }) && sampler.place(rng, snakes, |rng| {
        let start = rng.gen_range(SNAKE_HEADS);
        Jump::new(start, rng.gen_range(SNAKE_TAIL_MIN..start))
    });

    if !placed {
        log::warn!(
            "jump generation gave up after {} attempts ({ladders} ladders, {snakes} snakes)",
            sampler.attempts
        );
        return Err(BoardError::Generation {
            ladders,
            snakes,
            attempts: sampler.attempts,
        });
    }

    log::debug!(
        "generated {} jumps in {} attempts",
        sampler.jumps.len(),
        sampler.attempts
    );
    JumpTable::from_jumps(sampler.jumps)
}

struct Sampler {
    used: HashSet<Cell>,
    jumps: Vec<Jump>,
    attempts: u32,
    max_attempts: u32,
}

impl Sampler {
    fn place<R: Rng>(
        &mut self,
        rng: &mut R,
        count: u8,
        mut candidate: impl FnMut(&mut R) -> Jump,
    ) -> bool {
        let mut placed = 0;
        while placed < count {
            if self.attempts >= self.max_attempts {
                return false;
            }
            self.attempts += 1;
            let jump = candidate(rng);
            if self.used.contains(&jump.start) || self.used.contains(&jump.end) {
                continue;
            }
            self.used.insert(jump.start);
            self.used.insert(jump.end);
            self.jumps.push(jump);
            placed += 1;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::types::JumpKind;

    #[test]
    fn generates_requested_counts() {
        let mut rng = StdRng::seed_from_u64(42);
        let table = generate_jumps(&mut rng, 7, 7).unwrap();
        assert_eq!(table.ladders().len(), 7);
        assert_eq!(table.snakes().len(), 7);
    }

    #[test]
    fn endpoints_respect_ranges() {
        let mut rng = StdRng::seed_from_u64(3);
        let table = generate_jumps(&mut rng, 16, 16).unwrap();
        for ladder in table.ladders() {
            assert!(LADDER_STARTS.contains(&ladder.start));
            assert!(ladder.end > ladder.start && ladder.end <= LADDER_TOP);
        }
        for snake in table.snakes() {
            assert!(SNAKE_HEADS.contains(&snake.start));
            assert!(snake.end >= SNAKE_TAIL_MIN && snake.end < snake.start);
        }
    }

    #[test]
    fn same_seed_same_table() {
        let a = generate_jumps(&mut StdRng::seed_from_u64(11), 5, 9).unwrap();
        let b = generate_jumps(&mut StdRng::seed_from_u64(11), 5, 9).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn zero_counts_give_an_empty_table() {
        let table = generate_jumps(&mut StdRng::seed_from_u64(1), 0, 0).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn counts_beyond_free_cells_fail_fast() {
        let err = generate_jumps(&mut StdRng::seed_from_u64(1), 30, 20).unwrap_err();
        assert_eq!(
            err,
            BoardError::TooManyJumps {
                ladders: 30,
                snakes: 20
            }
        );
    }

    #[test]
    fn exhausted_budget_is_a_generation_error() {
        // 32 jumps need at least 32 draws.
        let err = generate_jumps_within(&mut StdRng::seed_from_u64(5), 16, 16, 20).unwrap_err();
        assert_eq!(
            err,
            BoardError::Generation {
                ladders: 16,
                snakes: 16,
                attempts: 20
            }
        );
    }

    #[test]
    fn every_generated_jump_has_a_direction() {
        let table = generate_jumps(&mut StdRng::seed_from_u64(9), 7, 7).unwrap();
        assert!(
            table
                .jumps()
                .iter()
                .all(|jump| matches!(jump.kind(), Some(JumpKind::Ladder | JumpKind::Snake)))
        );
    }
}
