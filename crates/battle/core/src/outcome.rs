//! Terminal-condition checks and reward packaging.

use crate::action::ItemId;
use crate::env::{BattleEnv, compute_seed};
use crate::state::{BattlePhase, BattleState, LogEntry, Side};

/// Roll context reserved for drop rolls; never used by an acting combatant.
const DROP_ACTOR: u32 = u32::MAX;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[derive(strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutcomeKind {
    Victory,
    Defeat,
    Fled,
    Spared,
}

impl OutcomeKind {
    pub const fn phase(self) -> BattlePhase {
        match self {
            Self::Victory => BattlePhase::Victory,
            Self::Defeat => BattlePhase::Defeat,
            Self::Fled => BattlePhase::Fled,
            Self::Spared => BattlePhase::Spared,
        }
    }

    pub const fn from_phase(phase: BattlePhase) -> Option<Self> {
        match phase {
            BattlePhase::Victory => Some(Self::Victory),
            BattlePhase::Defeat => Some(Self::Defeat),
            BattlePhase::Fled => Some(Self::Fled),
            BattlePhase::Spared => Some(Self::Spared),
            _ => None,
        }
    }

    /// Whether this ending pays out the encounter's reward table.
    pub const fn grants_rewards(self) -> bool {
        matches!(self, Self::Victory | Self::Spared)
    }

    /// Whether the party's post-battle state is written back.
    pub const fn writes_back(self) -> bool {
        !matches!(self, Self::Defeat)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rewards {
    pub experience: u32,
    pub currency: u32,
    pub items: Vec<(ItemId, u32)>,
}

impl Rewards {
    pub fn is_empty(&self) -> bool {
        self.experience == 0 && self.currency == 0 && self.items.is_empty()
    }
}

/// Final result of a battle, handed to progression and presentation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Outcome {
    pub kind: OutcomeKind,
    pub rewards: Rewards,
    pub log: Vec<LogEntry>,
}

/// Reads a [`BattleState`] and decides whether and how it ended.
///
/// Never mutates the state.
pub struct OutcomeEvaluator;

impl OutcomeEvaluator {
    /// First terminal condition that holds, checked in the order
    /// Defeat, Spared, Victory, Fled.
    pub fn terminal(state: &BattleState) -> Option<OutcomeKind> {
        if state.active_on(Side::Player).next().is_none() {
            return Some(OutcomeKind::Defeat);
        }
        let enemies = state.enemies();
        if !enemies.is_empty() && enemies.iter().all(|enemy| enemy.spared) {
            return Some(OutcomeKind::Spared);
        }
        if enemies.iter().all(|enemy| !enemy.is_active()) {
            return Some(OutcomeKind::Victory);
        }
        if state.fled {
            return Some(OutcomeKind::Fled);
        }
        None
    }

    /// Packages the outcome of a finished battle.
    ///
    /// Returns `None` while the battle is still running. Drop rolls derive
    /// their seeds from the final nonce, so evaluating twice gives the same
    /// rewards.
    pub fn evaluate(state: &BattleState, env: &BattleEnv<'_>) -> Option<Outcome> {
        let kind = OutcomeKind::from_phase(state.phase)?;
        let rewards = if kind.grants_rewards() {
            Self::rewards(state, env)
        } else {
            Rewards::default()
        };
        Some(Outcome {
            kind,
            rewards,
            log: state.log.to_vec(),
        })
    }

    fn rewards(state: &BattleState, env: &BattleEnv<'_>) -> Rewards {
        let table = &state.encounter.rewards;
        let items = table
            .drops
            .iter()
            .enumerate()
            .filter(|(index, drop)| {
                let seed = compute_seed(state.seed, state.nonce, DROP_ACTOR, *index as u32);
                env.rng().check(seed, drop.chance)
            })
            .filter(|(_, drop)| drop.quantity > 0)
            .map(|(_, drop)| (drop.item.clone(), drop.quantity))
            .collect();

        Rewards {
            experience: table.experience,
            currency: table.currency,
            items,
        }
    }
}
