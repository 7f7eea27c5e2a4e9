use std::sync::mpsc::Sender;

use serde::{Deserialize, Serialize};

use crate::board::Cell;
use crate::game::{GameState, HistoryEntry};
use crate::types::{Phase, PlayerId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerObservation {
    pub id: PlayerId,
    pub position: Cell,
}

/// What a presentation layer needs after each transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub phase: Phase,
    pub current_player: PlayerId,
    pub players: [PlayerObservation; 2],
    pub last_die: Option<u8>,
    pub latest_history: Option<HistoryEntry>,
    pub status: String,
}

pub fn observation_from_state(state: &GameState) -> Observation {
    Observation {
        phase: state.turn.phase,
        current_player: state.turn.current_player,
        players: state.players.map(|player| PlayerObservation {
            id: player.id,
            position: player.position,
        }),
        last_die: state.turn.last_roll,
        latest_history: state.history.latest().cloned(),
        status: state.status.clone(),
    }
}

pub trait SnapshotObserver {
    fn on_snapshot(&mut self, snapshot: &Observation);
}

impl<F: FnMut(&Observation)> SnapshotObserver for F {
    fn on_snapshot(&mut self, snapshot: &Observation) {
        self(snapshot)
    }
}

/// Forwards snapshots over a channel; a hung-up receiver is ignored.
#[derive(Debug, Clone)]
pub struct ChannelObserver(pub Sender<Observation>);

impl SnapshotObserver for ChannelObserver {
    fn on_snapshot(&mut self, snapshot: &Observation) {
        let _ = self.0.send(snapshot.clone());
    }
}

#[derive(Default)]
pub struct SnapshotStream {
    observers: Vec<Box<dyn SnapshotObserver>>,
}

impl SnapshotStream {
    pub fn subscribe(&mut self, observer: impl SnapshotObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn publish(&mut self, snapshots: &[Observation]) {
        for snapshot in snapshots {
            for observer in &mut self.observers {
                observer.on_snapshot(snapshot);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}
