use serde::{Deserialize, Serialize};

/// What a consumable does when used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemEffect {
    RestoreHp(u32),
    RestoreMp(u32),
    FullHp,
    FullMp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Medicine {
    pub id: &'static str,
    pub name: &'static str,
    pub effect: ItemEffect,
    pub price: u32,
}

pub const SMALL_HP: &str = "small_hp";
pub const LARGE_HP: &str = "large_hp";
pub const SMALL_MP: &str = "small_mp";
pub const LARGE_MP: &str = "large_mp";
pub const FULL_HP: &str = "full_hp";
pub const FULL_MP: &str = "full_mp";

const MEDICINES: [Medicine; 6] = [
    Medicine {
        id: SMALL_HP,
        name: "Minor Healing Pill",
        effect: ItemEffect::RestoreHp(50),
        price: 50,
    },
    Medicine {
        id: LARGE_HP,
        name: "Greater Healing Pill",
        effect: ItemEffect::RestoreHp(150),
        price: 150,
    },
    Medicine {
        id: SMALL_MP,
        name: "Minor Spirit Pill",
        effect: ItemEffect::RestoreMp(30),
        price: 50,
    },
    Medicine {
        id: LARGE_MP,
        name: "Greater Spirit Pill",
        effect: ItemEffect::RestoreMp(80),
        price: 150,
    },
    Medicine {
        id: FULL_HP,
        name: "Life Restoring Elixir",
        effect: ItemEffect::FullHp,
        price: 500,
    },
    Medicine {
        id: FULL_MP,
        name: "Spirit Restoring Elixir",
        effect: ItemEffect::FullMp,
        price: 500,
    },
];

/// Items an enemy can drop on defeat.
pub const DROP_POOL: [&str; 2] = [SMALL_HP, SMALL_MP];

pub fn all_medicines() -> &'static [Medicine] {
    &MEDICINES
}

pub fn get_medicine(id: &str) -> Option<&'static Medicine> {
    MEDICINES.iter().find(|m| m.id == id)
}

impl ItemEffect {
    /// Returns the (hp, mp) after applying this effect, capped at the maxima.
    pub fn apply(&self, hp: u32, max_hp: u32, mp: u32, max_mp: u32) -> (u32, u32) {
        match *self {
            ItemEffect::RestoreHp(amount) => (hp.saturating_add(amount).min(max_hp), mp),
            ItemEffect::RestoreMp(amount) => (hp, mp.saturating_add(amount).min(max_mp)),
            ItemEffect::FullHp => (max_hp, mp),
            ItemEffect::FullMp => (hp, max_mp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_medicines() {
        assert_eq!(
            get_medicine(SMALL_HP).map(|m| m.effect),
            Some(ItemEffect::RestoreHp(50))
        );
        assert_eq!(
            get_medicine(LARGE_MP).map(|m| m.effect),
            Some(ItemEffect::RestoreMp(80))
        );
        assert!(get_medicine("dragon_scale").is_none());
    }

    #[test]
    fn test_catalog_ids_unique() {
        let mut ids: Vec<_> = all_medicines().iter().map(|m| m.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), all_medicines().len());
    }

    #[test]
    fn test_restore_caps_at_max() {
        assert_eq!(ItemEffect::RestoreHp(50).apply(170, 180, 10, 75), (180, 10));
        assert_eq!(ItemEffect::RestoreMp(30).apply(100, 180, 60, 75), (100, 75));
        assert_eq!(ItemEffect::FullHp.apply(1, 180, 0, 75), (180, 0));
        assert_eq!(ItemEffect::FullMp.apply(1, 180, 0, 75), (1, 75));
    }

    #[test]
    fn test_drop_pool_is_in_catalog() {
        for id in DROP_POOL {
            assert!(get_medicine(id).is_some(), "{id} missing from catalog");
        }
    }
}
