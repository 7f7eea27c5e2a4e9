use std::collections::HashMap;
use std::time::Duration;

use crate::game::{Game, PlayResult};
use crate::types::PlayerId;

#[derive(Debug, Default, Clone)]
pub struct GameStats {
    pub wins: HashMap<PlayerId, u32>,
    pub ladders_by_player: HashMap<PlayerId, u32>,
    pub snakes_by_player: HashMap<PlayerId, u32>,
    pub games: u32,
    pub unfinished: u32,
    pub total_rolls: u64,
    pub total_days: u64,
    pub total_overshoots: u64,
    pub total_duration: Duration,
}

impl GameStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_game(&mut self, game: &Game, result: PlayResult, duration: Duration) {
        self.games += 1;
        self.total_duration += duration;
        self.total_rolls += u64::from(game.state.rolls);
        self.total_days += u64::from(result.days);

        match result.winner {
            Some(winner) => *self.wins.entry(winner).or_insert(0) += 1,
            None => self.unfinished += 1,
        }

        for player in &game.state.players {
            *self.ladders_by_player.entry(player.id).or_insert(0) += player.ladders_climbed;
            *self.snakes_by_player.entry(player.id).or_insert(0) += player.snakes_hit;
            self.total_overshoots += u64::from(player.overshoots);
        }
    }

    pub fn merge(&mut self, other: GameStats) {
        for (player, wins) in other.wins {
            *self.wins.entry(player).or_insert(0) += wins;
        }
        for (player, ladders) in other.ladders_by_player {
            *self.ladders_by_player.entry(player).or_insert(0) += ladders;
        }
        for (player, snakes) in other.snakes_by_player {
            *self.snakes_by_player.entry(player).or_insert(0) += snakes;
        }
        self.games += other.games;
        self.unfinished += other.unfinished;
        self.total_rolls += other.total_rolls;
        self.total_days += other.total_days;
        self.total_overshoots += other.total_overshoots;
        self.total_duration += other.total_duration;
    }

    pub fn win_rate(&self, player: PlayerId) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        let wins = self.wins.get(&player).copied().unwrap_or(0);
        f64::from(wins) / f64::from(self.games) * 100.0
    }

    pub fn get_avg_rolls(&self) -> f64 {
        self.per_game(self.total_rolls)
    }

    pub fn get_avg_days(&self) -> f64 {
        self.per_game(self.total_days)
    }

    pub fn get_avg_overshoots(&self) -> f64 {
        self.per_game(self.total_overshoots)
    }

    pub fn get_avg_duration(&self) -> Duration {
        if self.games == 0 {
            return Duration::ZERO;
        }
        self.total_duration / self.games
    }

    fn per_game(&self, total: u64) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        total as f64 / f64::from(self.games)
    }
}

pub struct StatisticsAccumulator {
    pub stats: GameStats,
}

impl StatisticsAccumulator {
    pub fn new() -> Self {
        Self {
            stats: GameStats::new(),
        }
    }

    pub fn after(&mut self, game: &Game, result: PlayResult, duration: Duration) {
        self.stats.record_game(game, result, duration);
    }
}

impl Default for StatisticsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
