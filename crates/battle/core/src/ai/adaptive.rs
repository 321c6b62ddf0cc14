//! Player-behavior tracking for adaptive enemies.

use std::collections::VecDeque;

use crate::action::ActionCategory;

/// Weight of a fresh observation; decay scales it down each round.
const FRESH_WEIGHT: u32 = 1_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct Observation {
    category: ActionCategory,
    weight: u32,
}

/// Sliding window of recent player actions with per-round decay.
///
/// Integer weights only; the same observations always produce the same shares.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdaptiveState {
    window: usize,
    decay_percent: u32,
    observations: VecDeque<Observation>,
}

impl AdaptiveState {
    pub fn new(window: usize, decay_percent: u32) -> Self {
        Self {
            window: window.max(1),
            decay_percent: decay_percent.min(100),
            observations: VecDeque::new(),
        }
    }

    /// Records one player action, evicting the oldest beyond the window.
    pub fn observe(&mut self, category: ActionCategory) {
        self.observations.push_back(Observation {
            category,
            weight: FRESH_WEIGHT,
        });
        while self.observations.len() > self.window {
            self.observations.pop_front();
        }
    }

    /// Ages every observation by one round.
    pub fn decay(&mut self) {
        if self.decay_percent == 100 {
            return;
        }
        for observation in &mut self.observations {
            observation.weight = observation.weight * self.decay_percent / 100;
        }
        self.observations.retain(|o| o.weight > 0);
    }

    /// Weighted share of `category`, as a whole percent.
    pub fn share_percent(&self, category: ActionCategory) -> u32 {
        let total: u64 = self.observations.iter().map(|o| u64::from(o.weight)).sum();
        if total == 0 {
            return 0;
        }
        let matching: u64 = self
            .observations
            .iter()
            .filter(|o| o.category == category)
            .map(|o| u64::from(o.weight))
            .sum();
        (matching * 100 / total) as u32
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_evicts_oldest() {
        let mut adaptive = AdaptiveState::new(2, 100);
        adaptive.observe(ActionCategory::Skill);
        adaptive.observe(ActionCategory::Attack);
        adaptive.observe(ActionCategory::Attack);

        assert_eq!(adaptive.len(), 2);
        assert_eq!(adaptive.share_percent(ActionCategory::Attack), 100);
        assert_eq!(adaptive.share_percent(ActionCategory::Skill), 0);
    }

    #[test]
    fn decay_favors_recent_actions() {
        let mut adaptive = AdaptiveState::new(8, 50);
        adaptive.observe(ActionCategory::Skill);
        adaptive.decay();
        adaptive.observe(ActionCategory::Attack);

        // 1000 vs 500
        assert_eq!(adaptive.share_percent(ActionCategory::Attack), 66);
    }

    #[test]
    fn full_retention_disables_decay() {
        let mut adaptive = AdaptiveState::new(8, 100);
        adaptive.observe(ActionCategory::Skill);
        adaptive.observe(ActionCategory::Attack);
        adaptive.decay();
        adaptive.decay();

        assert_eq!(adaptive.share_percent(ActionCategory::Skill), 50);
    }

    #[test]
    fn empty_tracker_has_no_preference() {
        let adaptive = AdaptiveState::new(4, 80);
        assert_eq!(adaptive.share_percent(ActionCategory::Attack), 0);
        assert!(adaptive.is_empty());
    }
}
