use std::collections::BTreeMap;

use crate::action::ItemId;

/// Party inventory consulted and consumed by Item actions.
///
/// Lives outside [`BattleState`](crate::state::BattleState) because it belongs
/// to the party across battles; the engine only borrows it per resolution.
pub trait Inventory {
    /// Number of `item` currently held.
    fn quantity(&self, item: &ItemId) -> u32;

    /// Removes one `item`. Returns false (and changes nothing) if none is held.
    fn consume(&mut self, item: &ItemId) -> bool;

    /// Adds `count` of `item`, used when rewards are granted.
    fn add(&mut self, item: &ItemId, count: u32);
}

/// Ordered item-count map; ordering keeps iteration and digests stable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ItemBag {
    counts: BTreeMap<ItemId, u32>,
}

impl ItemBag {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, item: impl Into<ItemId>, count: u32) -> Self {
        self.add(&item.into(), count);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, u32)> {
        self.counts.iter().map(|(id, count)| (id, *count))
    }
}

impl Inventory for ItemBag {
    fn quantity(&self, item: &ItemId) -> u32 {
        self.counts.get(item).copied().unwrap_or(0)
    }

    fn consume(&mut self, item: &ItemId) -> bool {
        match self.counts.get_mut(item) {
            Some(count) if *count > 0 => {
                *count -= 1;
                if *count == 0 {
                    self.counts.remove(item);
                }
                true
            }
            _ => false,
        }
    }

    fn add(&mut self, item: &ItemId, count: u32) {
        if count == 0 {
            return;
        }
        let entry = self.counts.entry(item.clone()).or_insert(0);
        *entry = entry.saturating_add(count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consume_stops_at_zero() {
        let potion = ItemId::new("potion");
        let mut bag = ItemBag::new().with("potion", 1);

        assert!(bag.consume(&potion));
        assert!(!bag.consume(&potion));
        assert_eq!(bag.quantity(&potion), 0);
        assert_eq!(bag.iter().count(), 0);
    }
}
