//! RNG oracle for deterministic random rolls.
//!
//! Every random decision in a battle (hit checks, status infliction, flee
//! attempts, drop rolls) derives its seed from [`compute_seed`], so a battle
//! replays identically from the same seed and action log.

/// RNG oracle for deterministic random number generation.
///
/// Implementations must produce the same value for the same seed.
pub trait RngOracle: Send + Sync {
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a d100 (1-100 inclusive).
    ///
    /// Percentage checks succeed when `roll_d100(seed) <= chance`, so a chance
    /// of 0 never succeeds and 100 always does.
    fn roll_d100(&self, seed: u64) -> u32 {
        (self.next_u32(seed) % 100) + 1
    }

    /// Returns true when a percentage check against `chance` succeeds.
    fn check(&self, seed: u64, chance: u32) -> bool {
        self.roll_d100(seed) <= chance
    }
}

/// PCG-XSH-RR generator: 64-bit LCG state, 32-bit permuted output.
///
/// Stateless; each call steps once from the supplied seed.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation.
    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::output(Self::step(seed))
    }
}

/// RNG that always rolls the same d100 value.
///
/// Used by tests and scripted scenarios to force hits, misses, resisted
/// statuses or flee results without hunting for seeds.
#[derive(Clone, Copy, Debug)]
pub struct FixedRng {
    roll: u32,
}

impl FixedRng {
    /// Every `roll_d100` returns `roll` (clamped to 1..=100).
    pub fn new(roll: u32) -> Self {
        Self {
            roll: roll.clamp(1, 100),
        }
    }

    /// Every percentage check with a non-zero chance succeeds.
    pub fn always() -> Self {
        Self::new(1)
    }

    /// Every percentage check below 100% fails.
    pub fn never() -> Self {
        Self::new(100)
    }
}

impl RngOracle for FixedRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        self.roll - 1
    }
}

/// Compute a deterministic seed for one random roll.
///
/// # Arguments
///
/// * `battle_seed` - Seed fixed when the battle is constructed
/// * `nonce` - Resolution counter (advances once per resolved turn)
/// * `actor` - Roster index of the acting combatant
/// * `context` - Distinguishes independent rolls within one resolution
///   (per-target hit and infliction checks, flee, drops)
pub fn compute_seed(battle_seed: u64, nonce: u64, actor: u32, context: u32) -> u64 {
    // SplitMix64 / FxHash style mixing
    let mut hash = battle_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (actor as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}
