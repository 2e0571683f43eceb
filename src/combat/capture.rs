use super::types::Enemy;
use crate::character::{Aptitude, Combatant, Companion, CompanionId};
use crate::core::constants::*;
use rand::Rng;

/// Capture probability for an enemy at `hp` of `max_hp`.
/// Rises linearly with missing hp, clamped to [0.3, 0.8].
pub fn capture_chance(hp: u32, max_hp: u32) -> f64 {
    let ratio = hp as f64 / max_hp.max(1) as f64;
    (CAPTURE_BASE_CHANCE + CAPTURE_MISSING_HP_WEIGHT * (1.0 - ratio))
        .clamp(CAPTURE_BASE_CHANCE, CAPTURE_MAX_CHANCE)
}

pub fn roll_capture(enemy: &Enemy, rng: &mut impl Rng) -> bool {
    rng.gen::<f64>() < capture_chance(enemy.hp(), enemy.stats.max_hp)
}

/// Builds a companion from a captured enemy. Current hp/mp carry over, clamped
/// into the recalculated maxima.
pub fn companion_from_enemy(id: CompanionId, enemy: &Enemy) -> Companion {
    let aptitude = if enemy.is_baby {
        Aptitude::with_growth(BABY_GROWTH)
    } else {
        Aptitude::default()
    };
    let mut companion = Companion::new(
        id,
        enemy.name.clone(),
        enemy.element,
        enemy.level,
        enemy.attributes,
        aptitude,
        enemy.skills.clone(),
    );
    companion.is_baby = enemy.is_baby;
    companion.vitals.hp = enemy.vitals.hp;
    companion.vitals.mp = enemy.vitals.mp;
    companion.vitals.clamp_to(&companion.stats);
    companion
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{Attributes, Element};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn frog() -> Enemy {
        Enemy::new(
            3,
            "frog",
            "Frog 1",
            Element::Water,
            4,
            Attributes::from_values(2, 3, 4, 4),
            Vec::new(),
        )
    }

    #[test]
    fn test_capture_chance_bounds() {
        assert!((capture_chance(100, 100) - 0.3).abs() < 1e-9);
        assert!((capture_chance(50, 100) - 0.55).abs() < 1e-9);
        assert!((capture_chance(10, 100) - 0.75).abs() < 1e-9);
        assert!((capture_chance(0, 100) - 0.8).abs() < 1e-9);
        assert!((capture_chance(1, 0) - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_capture_rate_at_ten_percent_hp() {
        let mut enemy = frog();
        enemy.vitals.hp = enemy.stats.max_hp / 10;
        let expected = capture_chance(enemy.vitals.hp, enemy.stats.max_hp);
        let mut rng = ChaCha8Rng::seed_from_u64(12345);
        let trials = 10000;
        let successes = (0..trials)
            .filter(|_| roll_capture(&enemy, &mut rng))
            .count();
        let rate = successes as f64 / trials as f64;
        assert!(
            (rate - expected).abs() < 0.02,
            "Capture rate should be ~{expected:.2}, got {rate:.3}"
        );
    }

    #[test]
    fn test_companion_inherits_enemy() {
        let mut enemy = frog();
        enemy.vitals.hp = 12;
        let companion = companion_from_enemy(9, &enemy);
        assert_eq!(companion.id, 9);
        assert_eq!(companion.element, Element::Water);
        assert_eq!(companion.level, 4);
        assert_eq!(companion.attributes, enemy.attributes);
        assert_eq!(companion.exp, 0);
        assert_eq!(companion.exp_max, 110);
        assert_eq!(companion.vitals.hp, 12);
        assert_eq!(companion.aptitude.growth, 1.0);
    }

    #[test]
    fn test_baby_capture_gets_growth() {
        let mut enemy = frog();
        enemy.is_baby = true;
        let companion = companion_from_enemy(1, &enemy);
        assert!(companion.is_baby);
        assert_eq!(companion.aptitude.growth, BABY_GROWTH);
        assert!(companion.stats.max_hp > enemy.stats.max_hp);
    }
}
