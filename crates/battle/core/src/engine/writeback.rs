use super::BattleError;
use crate::outcome::OutcomeKind;
use crate::state::{BattleState, Combatant};

/// Copies the party's post-battle condition back onto the persistent roster.
///
/// Allowed once, and only after Victory, Fled or Spared. HP and SP carry
/// over; of the statuses only those that persist after battle (Poison)
/// survive. `party` must be the roster the battle was built from, in the
/// same order.
pub fn write_back(state: &mut BattleState, party: &mut [Combatant]) -> Result<(), BattleError> {
    let outcome = OutcomeKind::from_phase(state.phase).ok_or(BattleError::NotFinished)?;
    if !outcome.writes_back() {
        return Err(BattleError::NotWritable { outcome });
    }
    if state.written_back {
        return Err(BattleError::AlreadyWrittenBack);
    }
    if party.len() != state.party_size {
        return Err(BattleError::PartyMismatch {
            expected: state.party_size,
            got: party.len(),
        });
    }

    for (member, fought) in party.iter_mut().zip(state.party()) {
        member.set_hp(fought.hp());
        member.set_sp(fought.sp());
        member.statuses = fought.statuses.clone();
        member
            .statuses
            .retain(|effect| effect.kind.persists_after_battle());
    }
    state.written_back = true;

    tracing::info!(
        encounter = %state.encounter.id,
        %outcome,
        members = party.len(),
        "party state written back"
    );
    Ok(())
}
