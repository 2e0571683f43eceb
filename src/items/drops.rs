use super::catalog::{get_medicine, DROP_POOL};
use crate::core::constants::DROP_CHANCE;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDrop {
    pub id: String,
    pub name: String,
    pub count: u32,
}

/// Rolls a single enemy's drop. Returns the item id on success.
pub fn roll_drop(rng: &mut impl Rng) -> Option<&'static str> {
    if rng.gen::<f64>() >= DROP_CHANCE {
        return None;
    }
    Some(DROP_POOL[rng.gen_range(0..DROP_POOL.len())])
}

/// Rolls drops for `defeated` enemies independently and merges them by item id,
/// keeping first-seen order.
pub fn roll_drops(defeated: usize, rng: &mut impl Rng) -> Vec<ItemDrop> {
    let mut drops: Vec<ItemDrop> = Vec::new();
    for _ in 0..defeated {
        let Some(id) = roll_drop(rng) else {
            continue;
        };
        match drops.iter_mut().find(|d| d.id == id) {
            Some(existing) => existing.count += 1,
            None => drops.push(ItemDrop {
                id: id.to_string(),
                name: get_medicine(id).map(|m| m.name).unwrap_or(id).to_string(),
                count: 1,
            }),
        }
    }
    drops
}
