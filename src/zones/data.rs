//! Zone and enemy template definitions.

use crate::character::{Attributes, Element, Skill};

/// A map area. Battles can only start in zones that are not safe.
#[derive(Debug, Clone)]
pub struct Zone {
    pub id: &'static str,
    pub name: &'static str,
    pub is_safe: bool,
    /// Inclusive enemy level range for templates without a fixed level.
    pub enemy_levels: (u32, u32),
    /// Inclusive enemy group size range.
    pub group_size: (u32, u32),
    pub connected: &'static [&'static str],
}

#[derive(Debug, Clone)]
pub struct EnemyTemplate {
    pub kind: &'static str,
    pub name: &'static str,
    pub element: Element,
    pub attributes: Attributes,
    pub fixed_level: Option<u32>,
    pub skills: Vec<Skill>,
}

pub fn get_all_zones() -> Vec<Zone> {
    vec![
        Zone {
            id: "town",
            name: "Lanxian Town",
            is_safe: true,
            enemy_levels: (0, 0),
            group_size: (0, 0),
            connected: &["outskirts"],
        },
        Zone {
            id: "outskirts",
            name: "Town Outskirts",
            is_safe: false,
            enemy_levels: (1, 5),
            group_size: (1, 2),
            connected: &["town", "valley"],
        },
        Zone {
            id: "valley",
            name: "Lanxian Valley",
            is_safe: false,
            enemy_levels: (5, 10),
            group_size: (1, 2),
            connected: &["outskirts", "wilds"],
        },
        Zone {
            id: "wilds",
            name: "Uncharted Wilds",
            is_safe: false,
            enemy_levels: (3, 6),
            group_size: (1, 3),
            connected: &["valley"],
        },
    ]
}

pub fn get_zone(zone_id: &str) -> Option<Zone> {
    get_all_zones().into_iter().find(|z| z.id == zone_id)
}

/// Enemy templates for a zone. Empty for zones without wildlife.
pub fn get_enemy_templates(zone_id: &str) -> Vec<EnemyTemplate> {
    match zone_id {
        "outskirts" => vec![
            EnemyTemplate {
                kind: "squirrel",
                name: "Squirrel",
                element: Element::Wood,
                attributes: Attributes::from_values(3, 4, 2, 5),
                fixed_level: None,
                skills: Vec::new(),
            },
            EnemyTemplate {
                kind: "frog",
                name: "Frog",
                element: Element::Water,
                attributes: Attributes::from_values(2, 3, 4, 4),
                fixed_level: None,
                skills: vec![Skill {
                    id: 901,
                    name: "Water Bolt".to_string(),
                    element: Element::Water,
                    mp_cost: 10,
                    damage_multiplier: 1.3,
                    level_req: 0,
                }],
            },
        ],
        "valley" => vec![
            EnemyTemplate {
                kind: "rabbit",
                name: "Rabbit",
                element: Element::Wood,
                attributes: Attributes::from_values(5, 5, 3, 7),
                fixed_level: Some(6),
                skills: Vec::new(),
            },
            EnemyTemplate {
                kind: "snake",
                name: "Snake",
                element: Element::Fire,
                attributes: Attributes::from_values(6, 4, 5, 6),
                fixed_level: Some(8),
                skills: vec![Skill {
                    id: 902,
                    name: "Fireball".to_string(),
                    element: Element::Fire,
                    mp_cost: 15,
                    damage_multiplier: 1.5,
                    level_req: 0,
                }],
            },
        ],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_ids_unique() {
        let zones = get_all_zones();
        let mut ids: Vec<_> = zones.iter().map(|z| z.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), zones.len());
    }

    #[test]
    fn test_connections_point_at_real_zones() {
        for zone in get_all_zones() {
            for target in zone.connected {
                assert!(get_zone(target).is_some(), "{} -> {target}", zone.id);
            }
        }
    }

    #[test]
    fn test_only_town_is_safe() {
        let safe: Vec<_> = get_all_zones()
            .into_iter()
            .filter(|z| z.is_safe)
            .map(|z| z.id)
            .collect();
        assert_eq!(safe, vec!["town"]);
    }

    #[test]
    fn test_valley_templates_have_fixed_levels() {
        for template in get_enemy_templates("valley") {
            assert!(template.fixed_level.is_some(), "{}", template.kind);
        }
        assert!(get_enemy_templates("wilds").is_empty());
    }
}
