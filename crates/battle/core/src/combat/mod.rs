//! Combat formulas: damage, guard mitigation and elemental affinity.
mod damage;
mod element;

pub use damage::{
    calculate_damage, calculate_healing, guarded, percent_of, scale_by_affinity,
};
pub use element::{Affinities, Affinity, Element};
