//! Human-readable rendering of combat logs and outcomes.

use battle_core::{
    BattleState, CombatEvent, CombatantId, LogEntry, Outcome, OutcomeKind, ResolvedEffect,
    TickEffect,
};
use console::style;

use crate::driver::Played;

fn name(state: &BattleState, id: CombatantId) -> String {
    state
        .combatant(id)
        .map_or_else(|| id.to_string(), |c| c.name.clone())
}

/// One line per log entry; action results add an indented line per target.
pub fn render_entry(state: &BattleState, entry: &LogEntry) -> Vec<String> {
    let line = match &entry.event {
        CombatEvent::BattleStarted { encounter, seed } => format!(
            "{} {} (seed {seed})",
            style("Battle:").bold(),
            style(encounter).cyan()
        ),
        CombatEvent::RoundStarted { round, order } => {
            let order: Vec<_> = order.iter().map(|id| name(state, *id)).collect();
            format!(
                "{} {}",
                style(format!("-- Round {round} --")).bold(),
                style(order.join(", ")).dim()
            )
        }
        CombatEvent::GuardLowered { actor } => format!("{} lowers its guard", name(state, *actor)),
        CombatEvent::TurnSkipped { actor, status } => format!(
            "{} is held by {} and loses the turn",
            name(state, *actor),
            style(status).magenta()
        ),
        CombatEvent::PhaseChanged { actor, phase } => format!(
            "{} {} enters phase {phase}",
            style("!").red().bold(),
            name(state, *actor)
        ),
        CombatEvent::AiDecided { actor, source } => {
            style(format!("{} decides ({source:?})", name(state, *actor)))
                .dim()
                .to_string()
        }
        CombatEvent::ActionResolved(result) => {
            let mut lines = vec![format!(
                "{} uses {}",
                style(name(state, result.actor)).bold(),
                style(&result.action).yellow()
            )];
            lines.extend(
                result
                    .outcomes
                    .iter()
                    .map(|outcome| format!("    {} {}", name(state, outcome.target), effect(&outcome.effect))),
            );
            return lines;
        }
        CombatEvent::StatusTicked { actor, event } => {
            let what = match event.effect {
                TickEffect::Damaged { amount, hp_after } => {
                    format!("takes {} ({hp_after} HP left)", style(amount).red())
                }
                TickEffect::Healed { amount, hp_after } => {
                    format!("recovers {} ({hp_after} HP)", style(amount).green())
                }
                TickEffect::Expired => "wears off".to_string(),
            };
            format!("{}: {} {what}", name(state, *actor), style(event.kind).magenta())
        }
        CombatEvent::BattleEnded { outcome } => {
            format!("{} {}", style("Battle over:").bold(), outcome_label(*outcome))
        }
    };
    vec![line]
}

fn effect(effect: &ResolvedEffect) -> String {
    match effect {
        ResolvedEffect::Damaged {
            amount,
            element,
            multiplier,
            guarded,
            hp_after,
            downed,
            woke,
        } => {
            let mut text = format!("takes {} {element} damage", style(amount).red());
            match multiplier {
                0 => text.push_str(" (immune)"),
                m if *m > 100 => text.push_str(" (weak)"),
                m if *m < 100 => text.push_str(" (resists)"),
                _ => {}
            }
            if *guarded {
                text.push_str(" through guard");
            }
            text.push_str(&format!(", {hp_after} HP left"));
            if *woke {
                text.push_str(", wakes up");
            }
            if *downed {
                text.push_str(&format!(", {}", style("DOWN").red().bold()));
            }
            text
        }
        ResolvedEffect::Missed => "is missed".to_string(),
        ResolvedEffect::Healed { amount, hp_after } => {
            format!("recovers {} HP ({hp_after})", style(amount).green())
        }
        ResolvedEffect::SpRestored { amount, sp_after } => {
            format!("recovers {} SP ({sp_after})", style(amount).blue())
        }
        ResolvedEffect::StatusApplied { kind, application } => {
            format!("gains {} ({application:?})", style(kind).magenta())
        }
        ResolvedEffect::StatusResisted { kind } => format!("resists {kind}"),
        ResolvedEffect::Cured { removed } => {
            let removed: Vec<_> = removed.iter().map(ToString::to_string).collect();
            format!("is cured of {}", removed.join(", "))
        }
        ResolvedEffect::Revived { hp } => format!("is revived with {hp} HP"),
        ResolvedEffect::Guarding => "braces".to_string(),
        ResolvedEffect::MoraleRaised { morale, spared } => {
            if *spared {
                format!("is {} (morale {morale})", style("spared").green())
            } else {
                format!("listens (morale {morale})")
            }
        }
        ResolvedEffect::FleeAttempt { chance, success } => {
            let verdict = if *success { "escapes" } else { "fails to escape" };
            format!("{verdict} ({chance}% chance)")
        }
    }
}

fn outcome_label(kind: OutcomeKind) -> String {
    let label = kind.to_string();
    match kind {
        OutcomeKind::Victory | OutcomeKind::Spared => style(label).green().bold().to_string(),
        OutcomeKind::Defeat => style(label).red().bold().to_string(),
        OutcomeKind::Fled => style(label).yellow().bold().to_string(),
    }
}

/// Full text report: the log, then rewards and the party afterwards.
pub fn render(played: &Played) -> String {
    let state = &played.state;
    let mut lines = Vec::new();
    if state.log.dropped() > 0 {
        lines.push(
            style(format!("({} earlier entries dropped)", state.log.dropped()))
                .dim()
                .to_string(),
        );
    }
    for entry in state.log.iter() {
        lines.extend(render_entry(state, entry));
    }

    lines.push(String::new());
    lines.extend(render_outcome(&played.outcome));
    lines.push(style("Party:").bold().to_string());
    for member in &played.party {
        let statuses: Vec<_> = member.statuses.iter().map(|e| e.kind.to_string()).collect();
        lines.push(format!(
            "  {:<12} HP {:>3}/{:<3} SP {:>3}/{:<3} {}",
            member.name,
            member.hp(),
            member.max_hp(),
            member.sp(),
            member.max_sp(),
            statuses.join(" ")
        ));
    }
    lines.push(style("Inventory:").bold().to_string());
    for (item, count) in played.inventory.iter() {
        lines.push(format!("  {item} x{count}"));
    }
    lines.join("\n")
}

fn render_outcome(outcome: &Outcome) -> Vec<String> {
    let mut lines = vec![format!("{} {}", style("Outcome:").bold(), outcome_label(outcome.kind))];
    if !outcome.rewards.is_empty() {
        lines.push(format!(
            "  {} XP, {} currency",
            outcome.rewards.experience, outcome.rewards.currency
        ));
        for (item, quantity) in &outcome.rewards.items {
            lines.push(format!("  dropped {item} x{quantity}"));
        }
    }
    lines
}
