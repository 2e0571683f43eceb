//! Skills and the sect catalog.
//!
//! Each element has one sect teaching three skills. Sect skill ids are
//! `element_index * 10 + tier` so they stay unique across sects.

use super::element::Element;
use crate::core::constants::SECT_JOIN_LEVEL;
use serde::{Deserialize, Serialize};

pub type SkillId = u32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    pub element: Element,
    pub mp_cost: u32,
    pub damage_multiplier: f64,
    /// Level needed to learn it. Zero for innate enemy skills.
    #[serde(default)]
    pub level_req: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sect {
    pub name: &'static str,
    pub element: Element,
    pub skills: Vec<Skill>,
}

const SKILL_TIERS: [(u32, u32, f64); 3] = [
    (SECT_JOIN_LEVEL, 20, 1.5),
    (SECT_JOIN_LEVEL + 5, 30, 2.0),
    (SECT_JOIN_LEVEL + 10, 40, 2.5),
];

fn sect_info(element: Element) -> (&'static str, [&'static str; 3]) {
    match element {
        Element::Metal => (
            "Cloud Peak Cavern",
            ["Golden Flash", "Rainbow Pierce", "Sealed Palm"],
        ),
        Element::Wood => (
            "Jade Pillar Cavern",
            ["Flying Leaves", "Tangled Roots", "Spring Bloom"],
        ),
        Element::Water => (
            "Phoenix Hill Palace",
            ["Dripping Stone", "Rising Tide", "Churning Sea"],
        ),
        Element::Fire => (
            "Golden Light Cavern",
            ["Skyward Flame", "Prairie Fire", "Searing Heart"],
        ),
        Element::Earth => (
            "Bone Mountain Cavern",
            ["Earth Escape", "Mountain Split", "Moving Peaks"],
        ),
    }
}

fn element_index(element: Element) -> u32 {
    match element {
        Element::Metal => 1,
        Element::Wood => 2,
        Element::Water => 3,
        Element::Fire => 4,
        Element::Earth => 5,
    }
}

pub fn get_sect(element: Element) -> Sect {
    let (name, skill_names) = sect_info(element);
    let skills = SKILL_TIERS
        .iter()
        .zip(skill_names)
        .enumerate()
        .map(|(i, (&(level_req, mp_cost, damage_multiplier), skill_name))| Skill {
            id: element_index(element) * 10 + i as u32 + 1,
            name: skill_name.to_string(),
            element,
            mp_cost,
            damage_multiplier,
            level_req,
        })
        .collect();
    Sect {
        name,
        element,
        skills,
    }
}

pub fn get_all_sects() -> Vec<Sect> {
    Element::all().into_iter().map(get_sect).collect()
}

pub fn find_sect_skill(id: SkillId) -> Option<Skill> {
    get_all_sects()
        .into_iter()
        .flat_map(|s| s.skills)
        .find(|s| s.id == id)
}
