//! Five-element advantage cycle and affinity point bonuses.
//!
//! The cycle is metal > wood > earth > water > fire > metal. Advantage is
//! one step only: metal beats wood but does not beat earth.

use crate::core::constants::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Metal,
    Wood,
    Water,
    Fire,
    Earth,
}

impl Element {
    pub fn all() -> [Element; 5] {
        [
            Element::Metal,
            Element::Wood,
            Element::Water,
            Element::Fire,
            Element::Earth,
        ]
    }

    /// The single element this one directly overcomes.
    pub fn beats(&self) -> Element {
        match self {
            Element::Metal => Element::Wood,
            Element::Wood => Element::Earth,
            Element::Earth => Element::Water,
            Element::Water => Element::Fire,
            Element::Fire => Element::Metal,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Element::Metal => "metal",
            Element::Wood => "wood",
            Element::Water => "water",
            Element::Fire => "fire",
            Element::Earth => "earth",
        }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub fn is_advantageous(attacker: Element, defender: Element) -> bool {
    attacker.beats() == defender
}

/// One value per element.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct ElementMap<T> {
    pub metal: T,
    pub wood: T,
    pub water: T,
    pub fire: T,
    pub earth: T,
}

impl<T: Copy> ElementMap<T> {
    pub fn splat(value: T) -> Self {
        Self {
            metal: value,
            wood: value,
            water: value,
            fire: value,
            earth: value,
        }
    }

    pub fn get(&self, element: Element) -> T {
        match element {
            Element::Metal => self.metal,
            Element::Wood => self.wood,
            Element::Water => self.water,
            Element::Fire => self.fire,
            Element::Earth => self.earth,
        }
    }

    pub fn set(&mut self, element: Element, value: T) {
        match element {
            Element::Metal => self.metal = value,
            Element::Wood => self.wood = value,
            Element::Water => self.water = value,
            Element::Fire => self.fire = value,
            Element::Earth => self.earth = value,
        }
    }

    pub fn map<U: Copy>(&self, f: impl Fn(T) -> U) -> ElementMap<U> {
        ElementMap {
            metal: f(self.metal),
            wood: f(self.wood),
            water: f(self.water),
            fire: f(self.fire),
            earth: f(self.earth),
        }
    }
}

/// Affinity points spent per element.
pub type AffinityPoints = ElementMap<u32>;

impl AffinityPoints {
    pub fn total(&self) -> u32 {
        self.metal + self.wood + self.water + self.fire + self.earth
    }
}

/// Bonuses granted by affinity points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffinityBonus {
    /// Per-element spell damage multiplier (1.0 = no bonus).
    pub spell_damage: ElementMap<f64>,
    /// Per-element spell resistance fraction (0.0 = none).
    pub spell_resistance: ElementMap<f64>,
    pub attack_multiplier: f64,
    pub magic_multiplier: f64,
    pub hp_bonus: f64,
    pub defense_bonus: f64,
    pub speed_bonus: f64,
}

impl AffinityBonus {
    pub fn from_points(points: &AffinityPoints) -> Self {
        let total = points.total() as f64;
        Self {
            spell_damage: points.map(|p| 1.0 + p as f64 * AFFINITY_SPELL_DAMAGE_PER_POINT),
            spell_resistance: points.map(|p| p as f64 * AFFINITY_RESISTANCE_PER_POINT),
            attack_multiplier: 1.0 + total * AFFINITY_ATTACK_PERCENT_PER_POINT,
            magic_multiplier: 1.0 + total * AFFINITY_ATTACK_PERCENT_PER_POINT,
            hp_bonus: total * AFFINITY_HP_PER_POINT,
            defense_bonus: total * AFFINITY_DEFENSE_PER_POINT,
            speed_bonus: total * AFFINITY_SPEED_PER_POINT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_advantages() {
        assert!(is_advantageous(Element::Metal, Element::Wood));
        assert!(is_advantageous(Element::Wood, Element::Earth));
        assert!(is_advantageous(Element::Earth, Element::Water));
        assert!(is_advantageous(Element::Water, Element::Fire));
        assert!(is_advantageous(Element::Fire, Element::Metal));
    }

    #[test]
    fn test_advantage_is_not_symmetric() {
        assert!(!is_advantageous(Element::Wood, Element::Metal));
        for e in Element::all() {
            assert!(!is_advantageous(e.beats(), e));
        }
    }

    #[test]
    fn test_advantage_is_not_transitive() {
        // metal > wood > earth, but metal does not beat earth
        assert!(!is_advantageous(Element::Metal, Element::Earth));
    }

    #[test]
    fn test_no_self_advantage() {
        for e in Element::all() {
            assert!(!is_advantageous(e, e), "{e} should not beat itself");
        }
    }

    #[test]
    fn test_each_element_beats_exactly_one() {
        for attacker in Element::all() {
            let wins = Element::all()
                .iter()
                .filter(|d| is_advantageous(attacker, **d))
                .count();
            assert_eq!(wins, 1);
        }
    }

    #[test]
    fn test_affinity_bonus_zero_points() {
        let bonus = AffinityBonus::from_points(&AffinityPoints::default());
        assert_eq!(bonus.attack_multiplier, 1.0);
        assert_eq!(bonus.hp_bonus, 0.0);
        assert_eq!(bonus.spell_damage.get(Element::Fire), 1.0);
        assert_eq!(bonus.spell_resistance.get(Element::Fire), 0.0);
    }

    #[test]
    fn test_affinity_bonus_scales_with_points() {
        let mut points = AffinityPoints::default();
        points.set(Element::Fire, 10);
        points.set(Element::Water, 10);
        let bonus = AffinityBonus::from_points(&points);

        assert!((bonus.spell_damage.get(Element::Fire) - 1.2).abs() < 1e-9);
        assert!((bonus.spell_resistance.get(Element::Water) - 0.1).abs() < 1e-9);
        assert_eq!(bonus.spell_damage.get(Element::Metal), 1.0);
        assert!((bonus.attack_multiplier - 1.1).abs() < 1e-9);
        assert!((bonus.hp_bonus - 200.0).abs() < 1e-9);
        assert!((bonus.defense_bonus - 6.0).abs() < 1e-9);
        assert!((bonus.speed_bonus - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_element_serializes_lowercase() {
        let json = serde_json::to_string(&Element::Metal).unwrap();
        assert_eq!(json, "\"metal\"");
    }
}
