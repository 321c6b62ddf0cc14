use std::collections::BTreeMap;

use crate::ai::CoordinationGroup;
use crate::state::{BattleState, CombatantId};

/// Acting order for a new round.
///
/// Active combatants sort by effective speed descending, ties broken by roster
/// index ascending. Members of a coordination group then take over the slots
/// their group earned, reassigned in roster-index order, so the group always
/// acts in a fixed sub-order regardless of individual speed.
pub fn turn_order(state: &BattleState) -> Vec<CombatantId> {
    let mut ranked: Vec<(u32, CombatantId)> = state
        .combatants
        .iter()
        .filter(|combatant| combatant.is_active())
        .map(|combatant| (combatant.speed(), combatant.id))
        .collect();
    ranked.sort_by(|(speed_a, id_a), (speed_b, id_b)| {
        speed_b.cmp(speed_a).then(id_a.cmp(id_b))
    });
    let mut order: Vec<CombatantId> = ranked.into_iter().map(|(_, id)| id).collect();

    let mut groups: BTreeMap<&CoordinationGroup, Vec<usize>> = BTreeMap::new();
    for (slot, id) in order.iter().enumerate() {
        let group = state
            .combatant(*id)
            .and_then(|combatant| combatant.ai.as_ref())
            .and_then(|ai| ai.profile.group.as_ref());
        if let Some(group) = group {
            groups.entry(group).or_default().push(slot);
        }
    }

    for slots in groups.values() {
        let mut members: Vec<CombatantId> = slots.iter().map(|&slot| order[slot]).collect();
        members.sort();
        for (&slot, member) in slots.iter().zip(members) {
            order[slot] = member;
        }
    }

    order
}
