//! Party roster loader.
//!
//! The party file lists the members that enter battle and the shared
//! starting inventory:
//!
//! ```ron
//! (
//!     members: [
//!         (name: "Aria", stats: (max_hp: 40, max_sp: 12, attack: 8, speed: 7),
//!          skills: ["fire"]),
//!     ],
//!     inventory: [("potion", 2)],
//! )
//! ```

use std::path::Path;

use battle_core::{
    Action, Affinities, BaseStats, Combatant, ItemBag, ItemId, ItemOracle, Side, SkillId,
    SkillOracle, StatModifier, StatusEffect,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One party member as written in content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyMemberSpec {
    pub name: String,
    pub stats: BaseStats,
    #[serde(default)]
    pub skills: Vec<SkillId>,
    #[serde(default)]
    pub equipment: Vec<StatModifier>,
    #[serde(default)]
    pub affinities: Affinities,
    #[serde(default)]
    pub status_resistance: u32,
    /// Current HP when carried over from an earlier battle; full when absent.
    #[serde(default)]
    pub hp: Option<u32>,
    #[serde(default)]
    pub sp: Option<u32>,
    #[serde(default)]
    pub statuses: Vec<StatusEffect>,
}

impl PartyMemberSpec {
    /// Builds the combatant. Party members know every basic command.
    pub fn build(&self) -> Combatant {
        let mut actions = vec![
            Action::Attack,
            Action::Guard,
            Action::Talk,
            Action::Memory,
            Action::Flee,
        ];
        actions.extend(self.skills.iter().cloned().map(Action::Skill));

        let mut member = Combatant::new(self.name.clone(), Side::Player, self.stats)
            .with_actions(actions)
            .with_equipment(self.equipment.iter().copied())
            .with_affinities(self.affinities.clone())
            .with_status_resistance(self.status_resistance);
        if let Some(hp) = self.hp {
            member = member.with_hp(hp);
        }
        if let Some(sp) = self.sp {
            member = member.with_sp(sp);
        }
        for effect in &self.statuses {
            member = member.with_status(*effect);
        }
        member
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyFile {
    pub members: Vec<PartyMemberSpec>,
    #[serde(default)]
    pub inventory: Vec<(ItemId, u32)>,
}

/// A loaded party: combatants plus the items they share.
#[derive(Debug, Clone)]
pub struct Party {
    pub members: Vec<Combatant>,
    pub inventory: ItemBag,
}

/// Loader for the party roster.
pub struct PartyLoader;

impl PartyLoader {
    /// Load the party from a RON file, checking references against the
    /// catalogs.
    pub fn load(
        path: &Path,
        skills: &dyn SkillOracle,
        items: &dyn ItemOracle,
    ) -> LoadResult<Party> {
        let content = read_file(path)?;
        Self::parse(&content, skills, items)
            .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))
    }

    pub fn parse(
        content: &str,
        skills: &dyn SkillOracle,
        items: &dyn ItemOracle,
    ) -> LoadResult<Party> {
        let file: PartyFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse party RON: {}", e))?;

        let mut problems = Vec::new();
        for (index, member) in file.members.iter().enumerate() {
            for skill in member.skills.iter().filter(|id| skills.skill(id).is_none()) {
                problems.push(format!(
                    "party member #{index} ({}): unknown skill '{skill}'",
                    member.name
                ));
            }
        }
        for (item, _) in file.inventory.iter().filter(|(id, _)| items.item(id).is_none()) {
            problems.push(format!("party inventory: unknown item '{item}'"));
        }
        if !problems.is_empty() {
            anyhow::bail!("Invalid party:\n  {}", problems.join("\n  "));
        }

        let inventory = file
            .inventory
            .iter()
            .fold(ItemBag::new(), |bag, (item, count)| bag.with(item.clone(), *count));
        let members = file.members.iter().map(PartyMemberSpec::build).collect();

        Ok(Party { members, inventory })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{Inventory, ItemCatalog, SkillCatalog, StatusKind};

    use crate::loaders::{ItemLoader, SkillLoader};

    fn catalogs() -> (SkillCatalog, ItemCatalog) {
        (
            SkillLoader::parse(include_str!("../../data/skills.ron")).unwrap(),
            ItemLoader::parse(include_str!("../../data/items.ron")).unwrap(),
        )
    }

    #[test]
    fn bundled_party_parses() {
        let (skills, items) = catalogs();
        let party = PartyLoader::parse(include_str!("../../data/party.ron"), &skills, &items).unwrap();
        assert!(!party.members.is_empty());
        assert!(party.members.iter().all(|m| m.hp() == m.max_hp()));
        assert!(party.inventory.quantity(&ItemId::new("potion")) > 0);
    }

    #[test]
    fn carried_over_hp_and_statuses_are_kept() {
        let (skills, items) = catalogs();
        let ron = r#"(members: [
            (name: "Bram", stats: (max_hp: 40, max_sp: 6, attack: 7, speed: 4),
             hp: Some(12),
             statuses: [(kind: Poison, remaining: 2, potency: 3, policy: Stack(cap: 30))]),
        ])"#;
        let party = PartyLoader::parse(ron, &skills, &items).unwrap();
        let bram = &party.members[0];
        assert_eq!(bram.hp(), 12);
        assert!(bram.statuses.has(StatusKind::Poison));
        assert!(bram.can_use(&Action::Flee));
    }

    #[test]
    fn every_unknown_reference_is_reported() {
        let (skills, items) = catalogs();
        let ron = r#"(
            members: [(name: "Cid", stats: (max_hp: 30), skills: ["meteor", "fire", "quake"])],
            inventory: [("elixir", 1)],
        )"#;
        let err = PartyLoader::parse(ron, &skills, &items).unwrap_err().to_string();
        assert!(err.contains("unknown skill 'meteor'"));
        assert!(err.contains("unknown skill 'quake'"));
        assert!(err.contains("unknown item 'elixir'"));
        assert!(!err.contains("'fire'"));
    }
}
