use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use once_cell::sync::Lazy;
use rand::thread_rng;
use serde::{Deserialize, Serialize};

use crate::coords::{BOARD_SIZE, DomainError, is_on_board};
use crate::types::JumpKind;

mod generate;

pub use generate::{
    DEFAULT_LADDERS, DEFAULT_SNAKES, MAX_GENERATION_ATTEMPTS, USABLE_CELLS, generate_jumps,
    generate_jumps_within,
};

pub type Cell = u8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Jump {
    pub start: Cell,
    pub end: Cell,
}

impl Jump {
    pub fn new(start: Cell, end: Cell) -> Self {
        Self { start, end }
    }

    /// `None` only for a degenerate jump, which validation never lets through.
    pub fn kind(&self) -> Option<JumpKind> {
        JumpKind::between(self.start, self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("invalid jump {start} -> {end}: {reason}")]
    InvalidJump {
        start: Cell,
        end: Cell,
        reason: &'static str,
    },
    #[error("{ladders} ladders and {snakes} snakes need more than the 98 free cells")]
    TooManyJumps { ladders: u8, snakes: u8 },
    #[error("could not place {ladders} ladders and {snakes} snakes within {attempts} attempts")]
    Generation {
        ladders: u8,
        snakes: u8,
        attempts: u32,
    },
}

/// Start cell to destination cell. Every destination is a resting cell: no
/// destination is itself the start of another jump.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JumpTable {
    jumps: HashMap<Cell, Cell>,
}

impl JumpTable {
    pub fn from_jumps(jumps: impl IntoIterator<Item = Jump>) -> Result<Self, BoardError> {
        let mut table = HashMap::new();
        for jump in jumps {
            validate_jump(jump)?;
            if table.insert(jump.start, jump.end).is_some() {
                return Err(BoardError::InvalidJump {
                    start: jump.start,
                    end: jump.end,
                    reason: "start cell already has a jump",
                });
            }
        }
        for (&start, &end) in &table {
            if table.contains_key(&end) {
                return Err(BoardError::InvalidJump {
                    start,
                    end,
                    reason: "destination is the start of another jump",
                });
            }
        }
        Ok(Self { jumps: table })
    }

    pub fn classic() -> Self {
        Self {
            jumps: CLASSIC_JUMPS.iter().map(|j| (j.start, j.end)).collect(),
        }
    }

    pub fn resolve(&self, cell: Cell) -> Option<Cell> {
        self.jumps.get(&cell).copied()
    }

    pub fn jump_at(&self, cell: Cell) -> Option<Jump> {
        self.resolve(cell).map(|end| Jump::new(cell, end))
    }

    /// All jumps ordered by start cell.
    pub fn jumps(&self) -> Vec<Jump> {
        self.jumps
            .iter()
            .map(|(&start, &end)| Jump::new(start, end))
            .sorted()
            .collect()
    }

    pub fn ladders(&self) -> Vec<Jump> {
        self.of_kind(JumpKind::Ladder)
    }

    pub fn snakes(&self) -> Vec<Jump> {
        self.of_kind(JumpKind::Snake)
    }

    fn of_kind(&self, kind: JumpKind) -> Vec<Jump> {
        self.jumps()
            .into_iter()
            .filter(|jump| jump.kind() == Some(kind))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.jumps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jumps.is_empty()
    }
}

fn validate_jump(jump: Jump) -> Result<(), BoardError> {
    for cell in [jump.start, jump.end] {
        if !is_on_board(cell) {
            return Err(DomainError::CellOutOfRange(cell).into());
        }
    }
    let reason = if jump.start == 1 {
        "jumps cannot start on the first cell"
    } else if jump.start == BOARD_SIZE {
        "jumps cannot start on the last cell"
    } else if jump.start == jump.end {
        "a cell cannot jump to itself"
    } else {
        return Ok(());
    };
    Err(BoardError::InvalidJump {
        start: jump.start,
        end: jump.end,
        reason,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpLayout {
    Classic,
    Fixed(Vec<Jump>),
    Procedural { ladders: u8, snakes: u8 },
}

impl Default for JumpLayout {
    fn default() -> Self {
        JumpLayout::Procedural {
            ladders: DEFAULT_LADDERS,
            snakes: DEFAULT_SNAKES,
        }
    }
}

impl JumpLayout {
    pub fn is_procedural(&self) -> bool {
        matches!(self, JumpLayout::Procedural { .. })
    }
}

impl fmt::Display for JumpLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JumpLayout::Classic => write!(f, "CLASSIC"),
            JumpLayout::Fixed(jumps) => write!(f, "FIXED({} jumps)", jumps.len()),
            JumpLayout::Procedural { ladders, snakes } => write!(f, "RANDOM:{ladders}:{snakes}"),
        }
    }
}

/// Accepts `classic`, `random`, or `random:<ladders>:<snakes>`.
impl FromStr for JumpLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        let mut parts = lower.split(':');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some("classic"), None, None, None) => Ok(JumpLayout::Classic),
            (Some("random"), None, None, None) => Ok(JumpLayout::default()),
            (Some("random"), Some(ladders), Some(snakes), None) => {
                let ladders = ladders
                    .parse()
                    .map_err(|_| format!("invalid ladder count: {ladders}"))?;
                let snakes = snakes
                    .parse()
                    .map_err(|_| format!("invalid snake count: {snakes}"))?;
                Ok(JumpLayout::Procedural { ladders, snakes })
            }
            _ => Err(format!("unknown jump layout: {s}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Board {
    pub size: u8,
    pub layout: JumpLayout,
    pub jumps: JumpTable,
}

impl Board {
    pub fn build(layout: JumpLayout) -> Result<Self, BoardError> {
        let mut rng = thread_rng();
        Self::build_with_rng(layout, &mut rng)
    }

    pub fn build_with_rng(layout: JumpLayout, rng: &mut impl rand::Rng) -> Result<Self, BoardError> {
        let jumps = match &layout {
            JumpLayout::Classic => JumpTable::classic(),
            JumpLayout::Fixed(jumps) => JumpTable::from_jumps(jumps.iter().copied())?,
            JumpLayout::Procedural { ladders, snakes } => generate_jumps(rng, *ladders, *snakes)?,
        };
        Ok(Self {
            size: BOARD_SIZE,
            layout,
            jumps,
        })
    }

    pub fn resolve(&self, cell: Cell) -> Option<Cell> {
        self.jumps.resolve(cell)
    }
}

static CLASSIC_JUMPS: Lazy<Vec<Jump>> = Lazy::new(|| {
    [
        (4, 14),
        (9, 31),
        (21, 42),
        (28, 84),
        (36, 44),
        (51, 67),
        (71, 91),
        (80, 100),
        (16, 6),
        (47, 26),
        (49, 11),
        (56, 53),
        (62, 19),
        (64, 60),
        (87, 24),
        (93, 73),
        (95, 75),
        (98, 78),
    ]
    .into_iter()
    .map(|(start, end)| Jump::new(start, end))
    .collect()
});
