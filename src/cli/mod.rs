pub mod stats;

pub use stats::{GameStats, StatisticsAccumulator};
