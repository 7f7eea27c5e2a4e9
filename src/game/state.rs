use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{
    board::{Board, BoardError, Cell, Jump, JumpLayout},
    coords::{BOARD_SIZE, DomainError, is_on_board},
    env::{Observation, observation_from_state},
    types::{JumpKind, Phase, PlayerId},
};

use super::{
    history::{EntryKind, HistoryLog},
    players::PlayerState,
    quota::{DAILY_ROLL_CAP, QuotaError, QuotaTracker},
};

pub const DIE_FACES: u8 = 6;

pub const WELCOME_MESSAGE: &str = "Welcome! Player 1 rolls first.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub jumps: JumpLayout,
    pub daily_roll_cap: u32,
    pub seed: u64,
    pub quota_ledger: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            jumps: JumpLayout::default(),
            daily_roll_cap: DAILY_ROLL_CAP,
            seed: 42,
            quota_ledger: None,
        }
    }
}

impl GameConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|err| GameError::Config(format!("{}: {err}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|err| GameError::Config(format!("{}: {err}", path.display())))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    pub current_player: PlayerId,
    pub phase: Phase,
    pub last_roll: Option<u8>,
}

impl Default for TurnState {
    fn default() -> Self {
        Self {
            current_player: PlayerId::One,
            phase: Phase::AwaitingRoll,
            last_roll: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    RollDenied {
        player: PlayerId,
        rolls_used: u32,
    },
    DiceRolled {
        player: PlayerId,
        die: u8,
        rolls_used: u32,
    },
    Stepped {
        player: PlayerId,
        position: Cell,
    },
    Overshot {
        player: PlayerId,
        die: u8,
        position: Cell,
    },
    Jumped {
        player: PlayerId,
        kind: JumpKind,
        from: Cell,
        to: Cell,
    },
    TurnAdvanced {
        next_player: PlayerId,
    },
    GameWon {
        winner: PlayerId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollOutcome {
    /// A roll was requested outside `AwaitingRoll`; nothing changed.
    Rejected { phase: Phase },
    /// The player has used up today's rolls; nothing changed.
    Denied { player: PlayerId, rolls_used: u32 },
    /// The die would carry the token past the last cell. The roll is spent
    /// and the same player rolls again.
    Overshoot {
        player: PlayerId,
        die: u8,
        position: Cell,
    },
    Moved {
        player: PlayerId,
        die: u8,
        path: SmallVec<[Cell; DIE_FACES as usize]>,
        jump: Option<Jump>,
        position: Cell,
        won: bool,
    },
}

#[derive(Debug, Clone)]
pub struct RollReport {
    pub outcome: RollOutcome,
    pub events: Vec<GameEvent>,
    /// One snapshot per transition, in order, including every unit step.
    pub snapshots: Vec<Observation>,
}

impl RollReport {
    fn refused(outcome: RollOutcome) -> Self {
        Self {
            outcome,
            events: Vec::new(),
            snapshots: Vec::new(),
        }
    }

    pub fn was_accepted(&self) -> bool {
        matches!(
            self.outcome,
            RollOutcome::Overshoot { .. } | RollOutcome::Moved { .. }
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Quota(#[from] QuotaError),
    #[error("invalid config {0}")]
    Config(String),
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub board: Board,
    pub players: [PlayerState; 2],
    pub turn: TurnState,
    pub history: HistoryLog,
    pub quota: QuotaTracker,
    pub status: String,
    pub rolls: u32,
    rng: StdRng,
}

impl GameState {
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let board = Board::build_with_rng(config.jumps.clone(), &mut rng)?;
        let quota = match &config.quota_ledger {
            Some(path) => QuotaTracker::with_ledger(config.daily_roll_cap, path)?,
            None => QuotaTracker::new(config.daily_roll_cap),
        };
        log::debug!(
            "board ready: {} ({} ladders, {} snakes)",
            board.layout,
            board.jumps.ladders().len(),
            board.jumps.snakes().len()
        );

        Ok(Self {
            config,
            board,
            players: PlayerId::ORDERED.map(PlayerState::new),
            turn: TurnState::default(),
            history: HistoryLog::new(),
            quota,
            status: WELCOME_MESSAGE.to_string(),
            rolls: 0,
            rng,
        })
    }

    /// Starts over on a fresh board. Procedural layouts draw new jumps; today's
    /// quota is cleared for both players.
    pub fn reset(&mut self, today: NaiveDate) -> Result<(), GameError> {
        self.board = Board::build_with_rng(self.config.jumps.clone(), &mut self.rng)?;
        self.players = PlayerId::ORDERED.map(PlayerState::new);
        self.turn = TurnState::default();
        self.history.clear();
        self.quota.clear_day(today);
        self.status = "Game reset.".to_string();
        self.rolls = 0;
        if self.board.layout.is_procedural() {
            log::info!("game reset with {} freshly drawn jumps", self.board.jumps.len());
        } else {
            log::info!("game reset on {} board", self.board.layout);
        }
        Ok(())
    }

    pub fn current_player(&self) -> PlayerId {
        self.turn.current_player
    }

    pub fn phase(&self) -> Phase {
        self.turn.phase
    }

    pub fn player(&self, id: PlayerId) -> &PlayerState {
        &self.players[id.index()]
    }

    pub fn positions(&self) -> [Cell; 2] {
        self.players.map(|player| player.position)
    }

    pub fn winner(&self) -> Option<PlayerId> {
        if self.turn.phase == Phase::GameWon {
            Some(self.turn.current_player)
        } else {
            None
        }
    }

    /// Puts a token on an arbitrary cell, e.g. to resume a saved position.
    pub fn place_player(&mut self, id: PlayerId, cell: Cell) -> Result<(), GameError> {
        if !is_on_board(cell) {
            return Err(DomainError::CellOutOfRange(cell).into());
        }
        self.players[id.index()].position = cell;
        Ok(())
    }

    pub fn roll(&mut self, today: NaiveDate) -> RollReport {
        if let Some(report) = self.refuse_roll(today) {
            return report;
        }
        let die = self.rng.gen_range(1..=DIE_FACES);
        self.play_die(die, today)
    }

    /// Plays a roll with a known die value.
    ///
    /// # Panics
    ///
    /// Panics if `die` is not a face of a six-sided die.
    pub fn roll_with(&mut self, die: u8, today: NaiveDate) -> RollReport {
        assert!(
            (1..=DIE_FACES).contains(&die),
            "die value {die} outside 1..={DIE_FACES}"
        );
        if let Some(report) = self.refuse_roll(today) {
            return report;
        }
        self.play_die(die, today)
    }

    fn refuse_roll(&mut self, today: NaiveDate) -> Option<RollReport> {
        let player = self.turn.current_player;
        if self.turn.phase != Phase::AwaitingRoll {
            log::debug!("ignoring roll request in phase {}", self.turn.phase);
            return Some(RollReport::refused(RollOutcome::Rejected {
                phase: self.turn.phase,
            }));
        }
        if !self.quota.can_roll(player, today) {
            let rolls_used = self.quota.rolls_used(player, today);
            self.status = format!("{player} daily limit reached.");
            log::info!("{player} denied a roll: {rolls_used} rolls used on {today}");
            let mut report = RollReport::refused(RollOutcome::Denied { player, rolls_used });
            report
                .events
                .push(GameEvent::RollDenied { player, rolls_used });
            return Some(report);
        }
        None
    }

    fn play_die(&mut self, die: u8, today: NaiveDate) -> RollReport {
        let player = self.turn.current_player;
        let idx = player.index();
        let mut report = RollReport::refused(RollOutcome::Rejected {
            phase: Phase::AwaitingRoll,
        });

        self.turn.phase = Phase::Rolling;
        self.turn.last_roll = Some(die);
        let rolls_used = self.quota.record_roll(player, today);
        self.rolls += 1;
        log::debug!("{player} rolled {die} ({rolls_used} today)");
        report.events.push(GameEvent::DiceRolled {
            player,
            die,
            rolls_used,
        });
        self.capture(&mut report);

        let start = self.players[idx].position;
        let Some(steps) = self.players[idx].path_for(die) else {
            self.players[idx].overshoots += 1;
            self.status = format!("{player} rolled {die}, need exact roll.");
            self.history.append(
                player,
                EntryKind::Overshoot,
                format!("{player} rolled {die} at {start}, needs an exact roll"),
            );
            report.events.push(GameEvent::Overshot {
                player,
                die,
                position: start,
            });
            self.turn.phase = Phase::AwaitingRoll;
            self.capture(&mut report);
            report.outcome = RollOutcome::Overshoot {
                player,
                die,
                position: start,
            };
            return report;
        };

        self.turn.phase = Phase::Stepping;
        let mut path = SmallVec::new();
        for cell in steps {
            self.players[idx].position = cell;
            path.push(cell);
            report.events.push(GameEvent::Stepped {
                player,
                position: cell,
            });
            self.capture(&mut report);
        }
        let landed = self.players[idx].position;
        self.status = format!("{player} rolled {die}. Reached {landed}.");

        let jump = self.board.jumps.jump_at(landed);
        match jump.and_then(|jump| jump.kind().map(|kind| (jump, kind))) {
            Some((jump, kind)) => self.resolve_jump(player, jump, kind, &mut report),
            None => self.history.append(
                player,
                EntryKind::Move,
                format!("{player} rolled {die} to {landed}"),
            ),
        }

        self.turn.phase = Phase::TurnSettled;
        self.capture(&mut report);

        let position = self.players[idx].position;
        let won = self.players[idx].has_finished();
        if won {
            self.turn.phase = Phase::GameWon;
            self.status = format!("{player} wins!");
            log::info!("{player} won after {} rolls", self.rolls);
            report.events.push(GameEvent::GameWon { winner: player });
        } else {
            let next_player = player.other();
            self.turn.current_player = next_player;
            self.turn.phase = Phase::AwaitingRoll;
            report.events.push(GameEvent::TurnAdvanced { next_player });
        }
        self.capture(&mut report);

        report.outcome = RollOutcome::Moved {
            player,
            die,
            path,
            jump,
            position,
            won,
        };
        report
    }

    fn resolve_jump(
        &mut self,
        player: PlayerId,
        jump: Jump,
        kind: JumpKind,
        report: &mut RollReport,
    ) {
        self.turn.phase = Phase::JumpResolution;
        let state = &mut self.players[player.index()];
        state.position = jump.end;
        match kind {
            JumpKind::Ladder => {
                state.ladders_climbed += 1;
                self.status = format!("{player} climbs to {}", jump.end);
            }
            JumpKind::Snake => {
                state.snakes_hit += 1;
                self.status = format!("{player} bitten! Down to {}", jump.end);
            }
        }
        self.history.append(
            player,
            kind.into(),
            format!("{player} {} from {} to {}", kind.verb(), jump.start, jump.end),
        );
        log::debug!("{player} {} from {} to {}", kind.verb(), jump.start, jump.end);
        report.events.push(GameEvent::Jumped {
            player,
            kind,
            from: jump.start,
            to: jump.end,
        });
        self.capture(report);
    }

    fn capture(&self, report: &mut RollReport) {
        report.snapshots.push(observation_from_state(self));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::history::HISTORY_CAPACITY;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn fixed(jumps: &[(Cell, Cell)]) -> GameState {
        let config = GameConfig {
            jumps: JumpLayout::Fixed(jumps.iter().map(|&(s, e)| Jump::new(s, e)).collect()),
            ..GameConfig::default()
        };
        GameState::new(config).unwrap()
    }

    #[test]
    fn starts_awaiting_player_one() {
        let state = fixed(&[]);
        assert_eq!(state.phase(), Phase::AwaitingRoll);
        assert_eq!(state.current_player(), PlayerId::One);
        assert_eq!(state.positions(), [1, 1]);
        assert_eq!(state.turn.last_roll, None);
        assert!(state.history.is_empty());
    }

    #[test]
    fn plain_move_steps_and_hands_over() {
        let mut state = fixed(&[]);
        let report = state.roll_with(4, today());
        match &report.outcome {
            RollOutcome::Moved {
                path, position, won, ..
            } => {
                assert_eq!(path.as_slice(), &[2, 3, 4, 5]);
                assert_eq!(*position, 5);
                assert!(!won);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(state.current_player(), PlayerId::Two);
        assert_eq!(state.phase(), Phase::AwaitingRoll);
        assert_eq!(state.turn.last_roll, Some(4));
        assert_eq!(
            state.history.latest().map(|e| e.description.as_str()),
            Some("Player 1 rolled 4 to 5")
        );
    }

    #[test]
    fn ladder_relocates_after_stepping() {
        let mut state = fixed(&[(4, 14)]);
        let report = state.roll_with(3, today());
        assert_eq!(state.player(PlayerId::One).position, 14);
        assert_eq!(state.history.len(), 1);
        let entry = state.history.latest().unwrap();
        assert_eq!(entry.kind, EntryKind::Ladder);
        assert!(entry.description.contains("climbed from 4 to 14"));
        assert_eq!(state.status, "Player 1 climbs to 14");
        assert!(report.events.contains(&GameEvent::Jumped {
            player: PlayerId::One,
            kind: JumpKind::Ladder,
            from: 4,
            to: 14,
        }));
    }

    #[test]
    fn snake_relocates_backwards() {
        let mut state = fixed(&[(7, 2)]);
        state.roll_with(6, today());
        assert_eq!(state.player(PlayerId::One).position, 2);
        assert_eq!(state.player(PlayerId::One).snakes_hit, 1);
        assert_eq!(state.status, "Player 1 bitten! Down to 2");
        assert!(
            state
                .history
                .latest()
                .unwrap()
                .description
                .contains("slid from 7 to 2")
        );
    }

    #[test]
    fn overshoot_keeps_position_and_turn() {
        let mut state = fixed(&[]);
        state.place_player(PlayerId::One, 97).unwrap();
        let report = state.roll_with(5, today());
        assert_eq!(
            report.outcome,
            RollOutcome::Overshoot {
                player: PlayerId::One,
                die: 5,
                position: 97
            }
        );
        assert_eq!(state.player(PlayerId::One).position, 97);
        assert_eq!(state.current_player(), PlayerId::One);
        assert_eq!(state.phase(), Phase::AwaitingRoll);
        assert_eq!(state.quota.rolls_used(PlayerId::One, today()), 1);
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.history.latest().unwrap().kind, EntryKind::Overshoot);
    }

    #[test]
    fn exact_roll_wins_and_ends_the_game() {
        let mut state = fixed(&[]);
        state.place_player(PlayerId::One, 94).unwrap();
        let report = state.roll_with(6, today());
        assert!(matches!(report.outcome, RollOutcome::Moved { won: true, .. }));
        assert_eq!(state.phase(), Phase::GameWon);
        assert_eq!(state.winner(), Some(PlayerId::One));
        assert_eq!(state.status, "Player 1 wins!");

        for die in [1, 6] {
            let again = state.roll_with(die, today());
            assert_eq!(
                again.outcome,
                RollOutcome::Rejected {
                    phase: Phase::GameWon
                }
            );
        }
        assert_eq!(state.positions(), [100, 1]);
        assert_eq!(state.rolls, 1);
    }

    #[test]
    fn ladder_onto_last_cell_wins() {
        let mut state = fixed(&[(80, 100)]);
        state.place_player(PlayerId::One, 78).unwrap();
        state.roll_with(2, today());
        assert_eq!(state.winner(), Some(PlayerId::One));
    }

    #[test]
    fn quota_denial_leaves_state_untouched() {
        let config = GameConfig {
            jumps: JumpLayout::Fixed(Vec::new()),
            daily_roll_cap: 1,
            ..GameConfig::default()
        };
        let mut state = GameState::new(config).unwrap();
        state.roll_with(2, today());
        state.roll_with(2, today());
        assert_eq!(state.current_player(), PlayerId::One);
        let before = state.positions();
        let history = state.history.len();

        let report = state.roll_with(3, today());
        assert_eq!(
            report.outcome,
            RollOutcome::Denied {
                player: PlayerId::One,
                rolls_used: 1
            }
        );
        assert!(!report.was_accepted());
        assert!(report.snapshots.is_empty());
        assert_eq!(state.positions(), before);
        assert_eq!(state.current_player(), PlayerId::One);
        assert_eq!(state.phase(), Phase::AwaitingRoll);
        assert_eq!(state.history.len(), history);
        assert_eq!(state.status, "Player 1 daily limit reached.");
    }

    #[test]
    fn snapshots_follow_every_transition() {
        let mut state = fixed(&[(4, 14)]);
        let report = state.roll_with(3, today());
        let phases: Vec<_> = report.snapshots.iter().map(|s| s.phase).collect();
        assert_eq!(
            phases,
            [
                Phase::Rolling,
                Phase::Stepping,
                Phase::Stepping,
                Phase::Stepping,
                Phase::JumpResolution,
                Phase::TurnSettled,
                Phase::AwaitingRoll,
            ]
        );
        let stepped: Vec<_> = report.snapshots[1..4]
            .iter()
            .map(|s| s.players[0].position)
            .collect();
        assert_eq!(stepped, [2, 3, 4]);
        assert_eq!(report.snapshots[4].players[0].position, 14);
    }

    #[test]
    fn reset_restores_a_fresh_game() {
        let mut state = fixed(&[]);
        state.place_player(PlayerId::One, 94).unwrap();
        state.roll_with(6, today());
        assert_eq!(state.phase(), Phase::GameWon);

        state.reset(today()).unwrap();
        assert_eq!(state.positions(), [1, 1]);
        assert_eq!(state.current_player(), PlayerId::One);
        assert_eq!(state.phase(), Phase::AwaitingRoll);
        assert!(state.history.is_empty());
        assert_eq!(state.quota.rolls_used(PlayerId::One, today()), 0);
        assert_eq!(state.status, "Game reset.");
    }

    #[test]
    fn reset_draws_a_new_procedural_board() {
        let mut state = GameState::new(GameConfig::default()).unwrap();
        let before = state.board.jumps.clone();
        state.reset(today()).unwrap();
        assert_eq!(state.board.jumps.len(), before.len());
        assert_ne!(state.board.jumps, before);
    }

    #[test]
    fn same_seed_same_game() {
        let mut a = GameState::new(GameConfig::default()).unwrap();
        let mut b = GameState::new(GameConfig::default()).unwrap();
        for _ in 0..8 {
            assert_eq!(a.roll(today()).outcome, b.roll(today()).outcome);
        }
    }

    #[test]
    fn history_is_bounded() {
        let config = GameConfig {
            jumps: JumpLayout::Fixed(Vec::new()),
            daily_roll_cap: 100,
            ..GameConfig::default()
        };
        let mut state = GameState::new(config).unwrap();
        for _ in 0..30 {
            state.roll_with(1, today());
        }
        assert_eq!(state.history.len(), HISTORY_CAPACITY);
    }

    #[test]
    fn placing_off_board_is_a_domain_error() {
        let mut state = fixed(&[]);
        let err = state.place_player(PlayerId::Two, 0).unwrap_err();
        assert!(matches!(
            err,
            GameError::Domain(DomainError::CellOutOfRange(0))
        ));
    }

    #[test]
    #[should_panic(expected = "die value 7")]
    fn impossible_die_values_panic() {
        let mut state = fixed(&[]);
        state.roll_with(7, today());
    }

    #[test]
    fn config_loads_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.json");
        fs::write(
            &path,
            r#"{ "jumps": { "Procedural": { "ladders": 3, "snakes": 4 } }, "seed": 9 }"#,
        )
        .unwrap();
        let config = GameConfig::from_json_file(&path).unwrap();
        assert_eq!(
            config.jumps,
            JumpLayout::Procedural {
                ladders: 3,
                snakes: 4
            }
        );
        assert_eq!(config.seed, 9);
        assert_eq!(config.daily_roll_cap, DAILY_ROLL_CAP);
        assert!(GameConfig::from_json_file(dir.path().join("missing.json")).is_err());
    }
}
