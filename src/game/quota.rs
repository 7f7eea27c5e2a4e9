use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::PlayerId;

pub const DAILY_ROLL_CAP: u32 = 10;

/// Counters are partitioned by day through the key itself; a new date simply
/// has no entry yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DailyQuotaKey {
    pub player: PlayerId,
    pub day: NaiveDate,
}

impl DailyQuotaKey {
    pub fn new(player: PlayerId, day: NaiveDate) -> Self {
        Self { player, day }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QuotaError {
    #[error("quota ledger I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("quota ledger is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LedgerEntry {
    player: PlayerId,
    day: NaiveDate,
    rolls: u32,
}

#[derive(Debug, Clone)]
pub struct QuotaTracker {
    cap: u32,
    counts: HashMap<DailyQuotaKey, u32>,
    ledger: Option<PathBuf>,
}

impl QuotaTracker {
    pub fn new(cap: u32) -> Self {
        Self {
            cap,
            counts: HashMap::new(),
            ledger: None,
        }
    }

    /// Tracker backed by a JSON ledger file. A missing file starts empty.
    pub fn with_ledger(cap: u32, path: impl Into<PathBuf>) -> Result<Self, QuotaError> {
        let path = path.into();
        let counts = if path.exists() {
            read_ledger(&path)?
        } else {
            HashMap::new()
        };
        log::debug!(
            "loaded {} quota entries from {}",
            counts.len(),
            path.display()
        );
        Ok(Self {
            cap,
            counts,
            ledger: Some(path),
        })
    }

    pub fn cap(&self) -> u32 {
        self.cap
    }

    pub fn rolls_used(&self, player: PlayerId, today: NaiveDate) -> u32 {
        self.counts
            .get(&DailyQuotaKey::new(player, today))
            .copied()
            .unwrap_or(0)
    }

    pub fn remaining(&self, player: PlayerId, today: NaiveDate) -> u32 {
        self.cap.saturating_sub(self.rolls_used(player, today))
    }

    pub fn can_roll(&self, player: PlayerId, today: NaiveDate) -> bool {
        self.rolls_used(player, today) < self.cap
    }

    /// Records one roll and returns the new count for the day. Callers check
    /// [`QuotaTracker::can_roll`] first; a capped counter is left as is.
    pub fn record_roll(&mut self, player: PlayerId, today: NaiveDate) -> u32 {
        let cap = self.cap;
        let count = self
            .counts
            .entry(DailyQuotaKey::new(player, today))
            .or_insert(0);
        if *count < cap {
            *count += 1;
        }
        let updated = *count;
        self.persist();
        updated
    }

    pub fn clear_day(&mut self, today: NaiveDate) {
        self.counts.retain(|key, _| key.day != today);
        self.persist();
    }

    pub fn save(&self) -> Result<(), QuotaError> {
        let Some(path) = &self.ledger else {
            return Ok(());
        };
        let mut entries: Vec<LedgerEntry> = self
            .counts
            .iter()
            .map(|(key, rolls)| LedgerEntry {
                player: key.player,
                day: key.day,
                rolls: *rolls,
            })
            .collect();
        entries.sort_by_key(|entry| (entry.day, entry.player));
        fs::write(path, serde_json::to_vec_pretty(&entries)?)?;
        Ok(())
    }

    // Ledger writes are best effort; the in-memory counts stay authoritative.
    fn persist(&self) {
        if let Err(err) = self.save() {
            log::warn!("could not write quota ledger: {err}");
        }
    }
}

impl Default for QuotaTracker {
    fn default() -> Self {
        Self::new(DAILY_ROLL_CAP)
    }
}

fn read_ledger(path: &Path) -> Result<HashMap<DailyQuotaKey, u32>, QuotaError> {
    let raw = fs::read(path)?;
    let entries: Vec<LedgerEntry> = serde_json::from_slice(&raw)?;
    Ok(entries
        .into_iter()
        .map(|entry| (DailyQuotaKey::new(entry.player, entry.day), entry.rolls))
        .collect())
}
