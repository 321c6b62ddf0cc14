//! Turn-end status resolution.

use super::{StatusCategory, StatusKind};
use crate::combat::Element;
use crate::state::Combatant;

/// What a status did to its owner during one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TickEffect {
    Damaged { amount: u32, hp_after: u32 },
    Healed { amount: u32, hp_after: u32 },
    Expired,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickEvent {
    pub kind: StatusKind,
    pub effect: TickEffect,
}

/// Advances every status on `combatant` by one of its turns.
///
/// Order within a tick:
/// 1. damage-over-time effects, in [`StatusKind`] declaration order
/// 2. healing-over-time effects
/// 3. every duration except Guard decrements; effects reaching zero are
///    removed after their final effect has applied
///
/// A combatant downed by periodic damage loses its statuses immediately and
/// the tick stops there. Downed combatants do not tick.
pub fn resolve_tick(combatant: &mut Combatant) -> Vec<TickEvent> {
    let mut events = Vec::new();
    if combatant.is_downed() {
        return events;
    }

    for kind in StatusKind::ALL {
        if kind.category() != StatusCategory::DamageOverTime {
            continue;
        }
        let Some(potency) = combatant.statuses.get(kind).map(|e| e.potency) else {
            continue;
        };
        let element = kind.element().unwrap_or(Element::True);
        let amount = combatant.apply_damage(potency, element);
        events.push(TickEvent {
            kind,
            effect: TickEffect::Damaged {
                amount,
                hp_after: combatant.hp(),
            },
        });
        if combatant.is_downed() {
            tracing::debug!(combatant = %combatant.id, status = %kind, "downed by periodic damage");
            return events;
        }
    }

    for kind in StatusKind::ALL {
        if kind.category() != StatusCategory::HealOverTime {
            continue;
        }
        let Some(potency) = combatant.statuses.get(kind).map(|e| e.potency) else {
            continue;
        };
        let amount = combatant.apply_healing(potency);
        events.push(TickEvent {
            kind,
            effect: TickEffect::Healed {
                amount,
                hp_after: combatant.hp(),
            },
        });
    }

    let mut expired = Vec::new();
    for effect in combatant.statuses.iter_mut() {
        if !effect.kind.ticks_down() {
            continue;
        }
        effect.remaining = effect.remaining.saturating_sub(1);
        if effect.remaining == 0 {
            expired.push(effect.kind);
        }
    }
    for kind in expired {
        combatant.statuses.remove(kind);
        events.push(TickEvent {
            kind,
            effect: TickEffect::Expired,
        });
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Side;
    use crate::stats::BaseStats;
    use crate::status::StatusEffect;

    fn knight(hp: u32) -> Combatant {
        Combatant::new(
            "Knight",
            Side::Player,
            BaseStats {
                max_hp: 30,
                speed: 5,
                ..BaseStats::default()
            },
        )
        .with_hp(hp)
    }

    #[test]
    fn poison_ticks_exactly_its_duration() {
        let mut knight = knight(30).with_status(StatusEffect::new(StatusKind::Poison, 2, 3));

        let first = resolve_tick(&mut knight);
        assert_eq!(knight.hp(), 27);
        assert_eq!(first.len(), 1);

        let second = resolve_tick(&mut knight);
        assert_eq!(knight.hp(), 24);
        assert_eq!(
            second.last().map(|e| e.effect),
            Some(TickEffect::Expired)
        );
        assert!(!knight.statuses.has(StatusKind::Poison));

        assert!(resolve_tick(&mut knight).is_empty());
        assert_eq!(knight.hp(), 24);
    }

    #[test]
    fn damage_over_time_resolves_in_declared_order() {
        let mut knight = knight(30)
            .with_status(StatusEffect::new(StatusKind::Bleed, 3, 1))
            .with_status(StatusEffect::new(StatusKind::Poison, 3, 2))
            .with_status(StatusEffect::new(StatusKind::Burn, 3, 3));

        let kinds: Vec<_> = resolve_tick(&mut knight).iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![StatusKind::Poison, StatusKind::Burn, StatusKind::Bleed]
        );
        assert_eq!(knight.hp(), 24);
    }

    #[test]
    fn regen_applies_after_damage() {
        let mut knight = knight(20)
            .with_status(StatusEffect::new(StatusKind::Regen, 3, 5))
            .with_status(StatusEffect::new(StatusKind::Burn, 3, 2));

        let events = resolve_tick(&mut knight);
        assert_eq!(
            events.iter().map(|e| e.kind).collect::<Vec<_>>(),
            vec![StatusKind::Burn, StatusKind::Regen]
        );
        assert_eq!(knight.hp(), 23);
    }

    #[test]
    fn lethal_poison_stops_the_tick() {
        let mut knight = knight(2)
            .with_status(StatusEffect::new(StatusKind::Poison, 3, 5))
            .with_status(StatusEffect::new(StatusKind::Regen, 3, 5));

        let events = resolve_tick(&mut knight);
        assert_eq!(events.len(), 1);
        assert!(knight.is_downed());
        assert!(knight.statuses.is_empty());
    }

    #[test]
    fn guard_does_not_tick_down() {
        let mut knight = knight(30).with_status(StatusEffect::new(StatusKind::Guard, 1, 0));
        resolve_tick(&mut knight);
        resolve_tick(&mut knight);
        assert!(knight.statuses.has(StatusKind::Guard));
    }

    #[test]
    fn control_expires_after_one_tick() {
        let mut knight = knight(30).with_status(StatusEffect::new(StatusKind::Stun, 1, 0));
        let events = resolve_tick(&mut knight);
        assert_eq!(
            events,
            vec![TickEvent {
                kind: StatusKind::Stun,
                effect: TickEffect::Expired,
            }]
        );
    }
}
