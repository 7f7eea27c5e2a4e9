use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::types::{JumpKind, PlayerId};

pub const HISTORY_CAPACITY: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryKind {
    Move,
    Ladder,
    Snake,
    Overshoot,
}

impl From<JumpKind> for EntryKind {
    fn from(kind: JumpKind) -> Self {
        match kind {
            JumpKind::Ladder => EntryKind::Ladder,
            JumpKind::Snake => EntryKind::Snake,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub sequence: u64,
    pub player: PlayerId,
    pub kind: EntryKind,
    pub description: String,
}

/// Most-recent-first log that keeps at most `capacity` entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
    next_sequence: u64,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
            next_sequence: 0,
        }
    }

    pub fn append(
        &mut self,
        player: PlayerId,
        kind: EntryKind,
        description: impl Into<String>,
    ) {
        let entry = HistoryEntry {
            sequence: self.next_sequence,
            player,
            kind,
            description: description.into(),
        };
        self.next_sequence += 1;
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_sequence = 0;
    }
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new()
    }
}
