use super::{AdaptiveState, AiState, Intent};
use crate::env::BattleEnv;
use crate::state::{BattleState, Combatant};

/// Read-only view of the battle from one AI combatant's perspective.
pub struct AiContext<'a> {
    me: &'a Combatant,
    ai: &'a AiState,
    state: &'a BattleState,
    env: BattleEnv<'a>,
}

impl<'a> AiContext<'a> {
    pub fn new(
        me: &'a Combatant,
        ai: &'a AiState,
        state: &'a BattleState,
        env: BattleEnv<'a>,
    ) -> Self {
        Self { me, ai, state, env }
    }

    pub fn me(&self) -> &'a Combatant {
        self.me
    }

    pub fn state(&self) -> &'a BattleState {
        self.state
    }

    pub fn env(&self) -> BattleEnv<'a> {
        self.env
    }

    pub fn round(&self) -> u32 {
        self.state.round
    }

    /// Active opponents in roster order.
    pub fn opponents(&self) -> impl Iterator<Item = &'a Combatant> + 'a {
        self.state.active_on(self.me.side.opposing())
    }

    /// Active allies in roster order, self included.
    pub fn allies(&self) -> impl Iterator<Item = &'a Combatant> + 'a {
        self.state.active_on(self.me.side)
    }

    /// Intents posted this round by other members of this combatant's group.
    pub fn group_intents(&self) -> impl Iterator<Item = &'a Intent> + 'a {
        let me = self.me.id;
        let intents = match &self.ai.profile.group {
            Some(group) => self.state.blackboard.intents(group),
            None => &[],
        };
        intents.iter().filter(move |intent| intent.actor != me)
    }

    pub fn adaptive(&self) -> Option<&'a AdaptiveState> {
        self.ai.adaptive.as_ref()
    }
}
