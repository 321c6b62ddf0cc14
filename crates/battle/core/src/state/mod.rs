//! Authoritative battle state.
//!
//! [`BattleState`] is plain data: the roster, the turn queue, the current
//! phase and the log. Only [`BattleEngine`](crate::engine::BattleEngine) and
//! the resolvers it calls mutate it.
mod combatant;
mod log;

pub use combatant::Combatant;
pub use log::{CombatEvent, CombatLog, LogEntry};

use crate::ai::Blackboard;
use crate::encounter::{EncounterDefinition, RewardTable, validate_party};
use crate::env::BattleEnv;
use crate::error::ConfigError;

/// Roster index of a combatant: party members first, then enemies, in the
/// order they were supplied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantId(pub u8);

impl CombatantId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl core::fmt::Display for CombatantId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[derive(strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub const fn opposing(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}

/// Battle lifecycle. The last four variants are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[derive(strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattlePhase {
    Setup,
    AwaitingPlayerInput,
    ResolvingAction,
    CheckingOutcome,
    Victory,
    Defeat,
    Fled,
    Spared,
}

impl BattlePhase {
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Victory | Self::Defeat | Self::Fled | Self::Spared
        )
    }
}

/// Acting order for the current round.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnQueue {
    order: Vec<CombatantId>,
    cursor: usize,
}

impl TurnQueue {
    pub fn new(order: Vec<CombatantId>) -> Self {
        Self { order, cursor: 0 }
    }

    /// Combatant whose turn it currently is.
    pub fn current(&self) -> Option<CombatantId> {
        self.order.get(self.cursor).copied()
    }

    pub fn advance(&mut self) {
        if self.cursor < self.order.len() {
            self.cursor += 1;
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.order.len()
    }

    pub fn order(&self) -> &[CombatantId] {
        &self.order
    }
}

/// Encounter data the battle keeps after setup.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterInfo {
    pub id: String,
    pub name: String,
    pub boss: bool,
    pub rewards: RewardTable,
}

/// Complete state of one battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    pub encounter: EncounterInfo,
    /// Fixed at construction; every roll derives from it.
    pub seed: u64,
    /// Advances once per resolved turn.
    pub nonce: u64,
    /// 0 during setup, then 1-based.
    pub round: u32,
    pub phase: BattlePhase,
    pub combatants: Vec<Combatant>,
    /// Number of party members at the front of `combatants`.
    pub party_size: usize,
    pub turns: TurnQueue,
    pub blackboard: Blackboard,
    pub log: CombatLog,
    /// Set when a player Flee succeeds.
    pub fled: bool,
    /// Set once the party has received its post-battle state.
    pub written_back: bool,
}

impl BattleState {
    /// Builds a battle in [`BattlePhase::Setup`].
    ///
    /// Validates the configuration, the encounter and the party against the
    /// skill/item catalogs so malformed data fails here, never mid-battle.
    pub fn new(
        encounter: &EncounterDefinition,
        party: &[Combatant],
        seed: u64,
        env: &BattleEnv<'_>,
    ) -> Result<Self, ConfigError> {
        let config = env.config();
        config.validate()?;
        encounter.validate(env)?;
        validate_party(party, env)?;

        let mut combatants = Vec::with_capacity(party.len() + encounter.enemies.len());
        for (index, member) in party.iter().enumerate() {
            let mut member = member.clone();
            member.id = CombatantId(index as u8);
            member.side = Side::Player;
            member.morale = 0;
            member.spared = false;
            member.ai = None;
            combatants.push(member);
        }
        for (offset, template) in encounter.enemies.iter().enumerate() {
            let id = CombatantId((party.len() + offset) as u8);
            combatants.push(template.instantiate(id, config));
        }

        Ok(Self {
            encounter: EncounterInfo {
                id: encounter.id.clone(),
                name: encounter.name.clone(),
                boss: encounter.boss,
                rewards: encounter.rewards.clone(),
            },
            seed,
            nonce: 0,
            round: 0,
            phase: BattlePhase::Setup,
            combatants,
            party_size: party.len(),
            turns: TurnQueue::default(),
            blackboard: Blackboard::default(),
            log: CombatLog::new(config.log_capacity),
            fled: false,
            written_back: false,
        })
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.get(id.index())
    }

    pub fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.get_mut(id.index())
    }

    pub fn party(&self) -> &[Combatant] {
        &self.combatants[..self.party_size]
    }

    pub fn enemies(&self) -> &[Combatant] {
        &self.combatants[self.party_size..]
    }

    /// Active (not downed, not spared) combatants on `side`, in roster order.
    pub fn active_on(&self, side: Side) -> impl Iterator<Item = &Combatant> {
        self.combatants
            .iter()
            .filter(move |c| c.side == side && c.is_active())
    }

    /// The party member the engine is waiting on, if any.
    pub fn awaiting_actor(&self) -> Option<CombatantId> {
        match self.phase {
            BattlePhase::AwaitingPlayerInput => self.turns.current(),
            _ => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }

    pub(crate) fn log_event(&mut self, event: CombatEvent) {
        tracing::trace!(round = self.round, ?event, "combat event");
        self.log.push(self.round, event);
    }

    /// SHA-256 of the bincode encoding of the whole state.
    ///
    /// Two battles built from the same inputs and fed the same actions have
    /// identical digests.
    #[cfg(feature = "serde")]
    pub fn digest(&self) -> Result<[u8; 32], bincode::Error> {
        use sha2::{Digest, Sha256};

        let encoded = bincode::serialize(self)?;
        let mut hasher = Sha256::new();
        hasher.update(&encoded);
        Ok(hasher.finalize().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BattleConfig;
    use crate::encounter::EnemyTemplate;
    use crate::env::{FixedRng, ItemCatalog, SkillCatalog};
    use crate::stats::BaseStats;

    fn stats(max_hp: u32) -> BaseStats {
        BaseStats {
            max_hp,
            attack: 3,
            speed: 2,
            ..BaseStats::default()
        }
    }

    fn battle(seed: u64) -> BattleState {
        let skills = SkillCatalog::new();
        let items = ItemCatalog::new();
        let config = BattleConfig::default();
        let rng = FixedRng::always();
        let env = BattleEnv::new(&skills, &items, &rng, &config);
        let encounter = EncounterDefinition {
            id: "pair".into(),
            name: "Pair".into(),
            boss: false,
            enemies: vec![EnemyTemplate::new("Rat", stats(6)), EnemyTemplate::new("Rat", stats(6))],
            rewards: RewardTable::default(),
        };
        let party = [Combatant::new("Hero", Side::Enemy, stats(20))];
        BattleState::new(&encounter, &party, seed, &env).unwrap()
    }

    #[test]
    fn roster_ids_follow_party_then_enemies() {
        let state = battle(1);
        let ids: Vec<_> = state.combatants.iter().map(|c| c.id).collect();
        assert_eq!(ids, [CombatantId(0), CombatantId(1), CombatantId(2)]);
        assert_eq!(state.party()[0].side, Side::Player);
        assert_eq!(state.enemies().len(), 2);
        assert_eq!(state.phase, BattlePhase::Setup);
        assert_eq!(state.round, 0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn digest_tracks_every_field() {
        let a = battle(1);
        let b = battle(1);
        assert_eq!(hex::encode(a.digest().unwrap()), hex::encode(b.digest().unwrap()));
        assert_eq!(hex::encode(a.digest().unwrap()).len(), 64);

        let reseeded = battle(2);
        assert_ne!(a.digest().unwrap(), reseeded.digest().unwrap());

        let mut hurt = battle(1);
        hurt.combatants[2].set_hp(3);
        assert_ne!(a.digest().unwrap(), hurt.digest().unwrap());
    }
}
