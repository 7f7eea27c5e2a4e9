pub mod game;
pub mod history;
pub mod players;
pub mod quota;
pub mod state;

pub use game::{Game, HostError, HostRuntime, NoHost, PlayResult, today_utc};
pub use history::{EntryKind, HISTORY_CAPACITY, HistoryEntry, HistoryLog};
pub use players::{PlayerState, START_CELL};
pub use quota::{DAILY_ROLL_CAP, DailyQuotaKey, QuotaError, QuotaTracker};
pub use state::{
    DIE_FACES, GameConfig, GameError, GameEvent, GameState, RollOutcome, RollReport, TurnState,
};
