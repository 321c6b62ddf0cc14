//! Elements and per-combatant elemental affinities.

/// Element carried by damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(strum::Display, strum::EnumString, strum::AsRefStr)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Element {
    Physical,
    Fire,
    Ice,
    Lightning,
    Poison,
    Holy,
    Dark,
    /// Ignores every affinity.
    True,
}

/// How strongly a combatant reacts to an element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[derive(strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Affinity {
    #[default]
    Neutral,
    Weak,
    Resist,
    Immune,
}

impl Affinity {
    /// Damage multiplier as a percent.
    pub const fn multiplier(self) -> u32 {
        match self {
            Self::Neutral => 100,
            Self::Weak => 150,
            Self::Resist => 50,
            Self::Immune => 0,
        }
    }
}

/// Elemental affinities of one combatant. Unlisted elements are neutral.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Affinities {
    entries: Vec<(Element, Affinity)>,
}

impl Affinities {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, element: Element, affinity: Affinity) -> Self {
        self.set(element, affinity);
        self
    }

    /// Sets the affinity for `element`, replacing any earlier entry.
    pub fn set(&mut self, element: Element, affinity: Affinity) {
        match self.entries.iter_mut().find(|(e, _)| *e == element) {
            Some(entry) => entry.1 = affinity,
            None => {
                self.entries.push((element, affinity));
                self.entries.sort_by_key(|(e, _)| *e);
            }
        }
    }

    pub fn get(&self, element: Element) -> Affinity {
        if element == Element::True {
            return Affinity::Neutral;
        }
        self.entries
            .iter()
            .find(|(e, _)| *e == element)
            .map(|(_, affinity)| *affinity)
            .unwrap_or_default()
    }

    /// Damage multiplier percent for `element`.
    pub fn multiplier(&self, element: Element) -> u32 {
        self.get(element).multiplier()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlisted_elements_are_neutral() {
        let affinities = Affinities::new().with(Element::Fire, Affinity::Weak);
        assert_eq!(affinities.multiplier(Element::Fire), 150);
        assert_eq!(affinities.multiplier(Element::Ice), 100);
    }

    #[test]
    fn true_damage_ignores_immunity() {
        let affinities = Affinities::new().with(Element::True, Affinity::Immune);
        assert_eq!(affinities.multiplier(Element::True), 100);
    }

    #[test]
    fn set_replaces_existing_entry() {
        let mut affinities = Affinities::new().with(Element::Dark, Affinity::Resist);
        affinities.set(Element::Dark, Affinity::Immune);
        assert_eq!(affinities.get(Element::Dark), Affinity::Immune);
    }
}
