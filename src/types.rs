use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumIter,
)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub const ORDERED: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    /// 1-based player number as shown to users.
    pub fn number(self) -> u8 {
        match self {
            PlayerId::One => 1,
            PlayerId::Two => 2,
        }
    }

    pub fn index(self) -> usize {
        usize::from(self.number() - 1)
    }

    pub fn other(self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    pub fn from_number(number: u8) -> Option<PlayerId> {
        match number {
            1 => Some(PlayerId::One),
            2 => Some(PlayerId::Two),
            _ => None,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum JumpKind {
    Ladder,
    Snake,
}

impl JumpKind {
    /// Kind of a jump from `start` to `end`; `None` when the two coincide.
    pub fn between(start: u8, end: u8) -> Option<JumpKind> {
        match end.cmp(&start) {
            std::cmp::Ordering::Greater => Some(JumpKind::Ladder),
            std::cmp::Ordering::Less => Some(JumpKind::Snake),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            JumpKind::Ladder => "climbed",
            JumpKind::Snake => "slid",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    AwaitingRoll,
    Rolling,
    Stepping,
    JumpResolution,
    TurnSettled,
    GameWon,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::GameWon)
    }
}
