use super::data::{get_enemy_templates, get_zone, EnemyTemplate};
use crate::combat::{Enemy, EnemyId};
use crate::core::constants::*;
use crate::core::error::ZoneError;
use rand::Rng;

/// Generates a fresh enemy group for `zone_id`.
///
/// Safe zones and zones without templates are refused; nothing is generated
/// as a fallback.
pub fn generate_enemies(zone_id: &str, rng: &mut impl Rng) -> Result<Vec<Enemy>, ZoneError> {
    let zone = get_zone(zone_id).ok_or_else(|| ZoneError::UnknownZone(zone_id.to_string()))?;
    if zone.is_safe {
        return Err(ZoneError::Safe(zone.name.to_string()));
    }
    let templates = get_enemy_templates(zone.id);
    if templates.is_empty() {
        return Err(ZoneError::NoTemplates(zone.name.to_string()));
    }

    let (min_size, max_size) = zone.group_size;
    let count = rng.gen_range(min_size.max(1)..=max_size.max(min_size).max(1));

    let enemies = (0..count)
        .map(|i| {
            let template = &templates[rng.gen_range(0..templates.len())];
            spawn_enemy(i, template, zone.enemy_levels, rng)
        })
        .collect();
    Ok(enemies)
}

/// Whether battles can start in `zone_id`.
pub fn zone_supports_combat(zone_id: &str) -> bool {
    get_zone(zone_id)
        .map(|z| !z.is_safe && !get_enemy_templates(z.id).is_empty())
        .unwrap_or(false)
}

fn spawn_enemy(
    id: EnemyId,
    template: &EnemyTemplate,
    levels: (u32, u32),
    rng: &mut impl Rng,
) -> Enemy {
    let is_baby = rng.gen::<f64>() < BABY_CHANCE;
    let level = if is_baby {
        BABY_LEVEL
    } else {
        template
            .fixed_level
            .unwrap_or_else(|| rng.gen_range(levels.0..=levels.1.max(levels.0)).max(1))
    };
    let (name, attributes) = if is_baby {
        (
            format!("Baby {}", template.name),
            template.attributes.scaled(BABY_GROWTH),
        )
    } else {
        (format!("{} {}", template.name, id + 1), template.attributes)
    };

    let mut enemy = Enemy::new(
        id,
        template.kind,
        name,
        template.element,
        level,
        attributes,
        template.skills.clone(),
    );
    enemy.is_baby = is_baby;
    enemy
}
