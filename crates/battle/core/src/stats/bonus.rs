//! Layered stat modifiers.
//!
//! Every effective stat is computed the same way:
//! Flat → Increased → More → Less → Clamp.

/// A single modifier applied to a stat.
///
/// Percentages are integers: `Increased(20)` is +20%, `More(50)` is ×1.5,
/// `Less(10)` is ×0.9.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bonus {
    /// Added to the base before any multiplier.
    Flat(i32),

    /// Summed with every other `Increased`, then applied once.
    Increased(i32),

    /// Applied multiplicatively, one at a time.
    More(i32),

    /// Applied multiplicatively as a reduction, one at a time.
    Less(i32),
}

impl Bonus {
    pub fn flat(value: i32) -> Self {
        Bonus::Flat(value)
    }

    pub fn increased(percent: i32) -> Self {
        Bonus::Increased(percent)
    }

    pub fn more(percent: i32) -> Self {
        Bonus::More(percent)
    }

    pub fn less(percent: i32) -> Self {
        Bonus::Less(percent)
    }
}

/// Ordered collection of bonuses for one stat.
///
/// # Example
/// ```
/// # use battle_core::stats::BonusStack;
/// // equipment +4 attack, Weaken -25%
/// let attack = BonusStack::new().flat(4).less(25).apply(12, 0, 999);
/// assert_eq!(attack, 12);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BonusStack {
    bonuses: Vec<Bonus>,
}

impl BonusStack {
    pub fn new() -> Self {
        Self {
            bonuses: Vec::new(),
        }
    }

    pub fn add(&mut self, bonus: Bonus) {
        self.bonuses.push(bonus);
    }

    pub fn extend(&mut self, bonuses: impl IntoIterator<Item = Bonus>) {
        self.bonuses.extend(bonuses);
    }

    pub fn is_empty(&self) -> bool {
        self.bonuses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bonuses.len()
    }

    /// Applies every bonus to `base` and clamps the result.
    ///
    /// # Formula
    /// ```text
    /// result = clamp((base + Σflat) × (100 + Σinc)/100 × Π(100 + more)/100 × Π(100 - less)/100, min, max)
    /// ```
    ///
    /// Each multiplication truncates toward zero, in the order shown.
    pub fn apply(&self, base: i32, min: i32, max: i32) -> i32 {
        let mut flat = 0i64;
        let mut increased = 0i64;
        for bonus in &self.bonuses {
            match *bonus {
                Bonus::Flat(value) => flat += i64::from(value),
                Bonus::Increased(percent) => increased += i64::from(percent),
                Bonus::More(_) | Bonus::Less(_) => {}
            }
        }

        let mut value = i64::from(base) + flat;
        if increased != 0 {
            value = value * (100 + increased) / 100;
        }
        for bonus in &self.bonuses {
            if let Bonus::More(percent) = *bonus {
                value = value * (100 + i64::from(percent)) / 100;
            }
        }
        for bonus in &self.bonuses {
            if let Bonus::Less(percent) = *bonus {
                value = value * (100 - i64::from(percent)) / 100;
            }
        }

        value.clamp(i64::from(min), i64::from(max)) as i32
    }

    pub fn flat(mut self, value: i32) -> Self {
        self.add(Bonus::flat(value));
        self
    }

    pub fn increased(mut self, percent: i32) -> Self {
        self.add(Bonus::increased(percent));
        self
    }

    pub fn more(mut self, percent: i32) -> Self {
        self.add(Bonus::more(percent));
        self
    }

    pub fn less(mut self, percent: i32) -> Self {
        self.add(Bonus::less(percent));
        self
    }
}

impl FromIterator<Bonus> for BonusStack {
    fn from_iter<I: IntoIterator<Item = Bonus>>(iter: I) -> Self {
        Self {
            bonuses: iter.into_iter().collect(),
        }
    }
}
