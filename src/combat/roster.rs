//! Initiative ordering.

use super::types::UnitRef;
use rand::seq::SliceRandom;
use rand::Rng;

/// A living unit and its speed at the moment the round starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitiativeEntry {
    pub unit: UnitRef,
    pub speed: u32,
}

/// Orders units by speed (descending), then player before companion before
/// enemies. Remaining ties are settled by shuffling before the stable sort,
/// so every tied ordering is equally likely.
pub fn build_turn_order(mut entries: Vec<InitiativeEntry>, rng: &mut impl Rng) -> Vec<UnitRef> {
    entries.shuffle(rng);
    entries.sort_by(|a, b| {
        b.speed
            .cmp(&a.speed)
            .then_with(|| a.unit.type_priority().cmp(&b.unit.type_priority()))
    });
    entries.into_iter().map(|e| e.unit).collect()
}
