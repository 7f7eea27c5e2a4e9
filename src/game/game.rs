use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::env::{Observation, SnapshotObserver, SnapshotStream, observation_from_state};
use crate::game::{GameConfig, GameError, GameState, RollOutcome, RollReport};
use crate::types::PlayerId;

const ROLLS_LIMIT: u32 = 10_000;

/// The host runtime embedding the game. It is told once that the game is ready.
pub trait HostRuntime {
    fn signal_ready(&mut self) -> Result<(), HostError>;
}

#[derive(Debug, thiserror::Error)]
#[error("host handshake failed: {0}")]
pub struct HostError(pub String);

/// Host that needs no handshake.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHost;

impl HostRuntime for NoHost {
    fn signal_ready(&mut self) -> Result<(), HostError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayResult {
    pub winner: Option<PlayerId>,
    pub days: u32,
}

pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

pub struct Game {
    pub id: Uuid,
    pub state: GameState,
    stream: SnapshotStream,
    ready_signalled: bool,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        let state = GameState::new(config)?;
        let id = Uuid::new_v4();
        log::info!(
            "game {id} started on {} board (seed {})",
            state.board.layout,
            state.config.seed
        );
        Ok(Self {
            id,
            state,
            stream: SnapshotStream::default(),
            ready_signalled: false,
        })
    }

    /// Builds the game, then tells the host it is ready. A failed handshake is
    /// logged and otherwise ignored.
    pub fn start(config: GameConfig, host: &mut dyn HostRuntime) -> Result<Self, GameError> {
        let mut game = Self::new(config)?;
        game.signal_ready(host);
        Ok(game)
    }

    pub fn signal_ready(&mut self, host: &mut dyn HostRuntime) {
        if self.ready_signalled {
            return;
        }
        self.ready_signalled = true;
        if let Err(err) = host.signal_ready() {
            log::warn!("game {}: {err}", self.id);
        }
    }

    pub fn is_ready_signalled(&self) -> bool {
        self.ready_signalled
    }

    pub fn subscribe(&mut self, observer: impl SnapshotObserver + 'static) {
        self.stream.subscribe(observer);
    }

    pub fn roll(&mut self) -> RollReport {
        self.roll_on(today_utc())
    }

    pub fn roll_on(&mut self, today: NaiveDate) -> RollReport {
        let report = self.state.roll(today);
        self.stream.publish(&report.snapshots);
        report
    }

    pub fn roll_with(&mut self, die: u8, today: NaiveDate) -> RollReport {
        let report = self.state.roll_with(die, today);
        self.stream.publish(&report.snapshots);
        report
    }

    pub fn reset(&mut self) -> Result<(), GameError> {
        self.reset_on(today_utc())
    }

    pub fn reset_on(&mut self, today: NaiveDate) -> Result<(), GameError> {
        self.state.reset(today)?;
        self.stream.publish(&[observation_from_state(&self.state)]);
        Ok(())
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.state.winner()
    }

    pub fn rolls_used_today(&self, player: PlayerId, today: NaiveDate) -> u32 {
        self.state.quota.rolls_used(player, today)
    }

    pub fn observation(&self) -> Observation {
        observation_from_state(&self.state)
    }

    /// Rolls until someone wins, moving on to the next day whenever the
    /// current player's quota runs out.
    pub fn play(&mut self, first_day: NaiveDate) -> PlayResult {
        let mut today = first_day;
        let mut days = 1;
        while !self.state.phase().is_terminal() && self.state.rolls < ROLLS_LIMIT {
            match self.roll_on(today).outcome {
                RollOutcome::Denied { .. } => match today.succ_opt() {
                    Some(next) => {
                        today = next;
                        days += 1;
                    }
                    None => break,
                },
                RollOutcome::Rejected { .. } => break,
                RollOutcome::Overshoot { .. } | RollOutcome::Moved { .. } => {}
            }
        }
        PlayResult {
            winner: self.winner(),
            days,
        }
    }
}
