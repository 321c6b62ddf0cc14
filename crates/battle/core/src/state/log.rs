//! Rolling combat log.

use std::collections::VecDeque;

use crate::action::ActionResult;
use crate::ai::DecisionSource;
use crate::outcome::OutcomeKind;
use crate::state::CombatantId;
use crate::status::{StatusKind, TickEvent};

/// Something that happened during a battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatEvent {
    BattleStarted {
        encounter: String,
        seed: u64,
    },
    RoundStarted {
        round: u32,
        order: Vec<CombatantId>,
    },
    /// Guard expired at the start of its owner's turn.
    GuardLowered {
        actor: CombatantId,
    },
    TurnSkipped {
        actor: CombatantId,
        status: StatusKind,
    },
    PhaseChanged {
        actor: CombatantId,
        phase: usize,
    },
    AiDecided {
        actor: CombatantId,
        source: DecisionSource,
    },
    ActionResolved(ActionResult),
    StatusTicked {
        actor: CombatantId,
        event: TickEvent,
    },
    BattleEnded {
        outcome: OutcomeKind,
    },
}

/// A log entry stamped with the round it happened in.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogEntry {
    pub round: u32,
    pub event: CombatEvent,
}

/// Bounded combat log; the oldest entries are dropped once full.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    /// Entries discarded to respect `capacity`.
    dropped: u64,
}

impl CombatLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
            dropped: 0,
        }
    }

    pub fn push(&mut self, round: u32, event: CombatEvent) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
            self.dropped += 1;
        }
        self.entries.push_back(LogEntry { round, event });
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn events(&self) -> impl Iterator<Item = &CombatEvent> {
        self.entries.iter().map(|entry| &entry.event)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn to_vec(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }
}
