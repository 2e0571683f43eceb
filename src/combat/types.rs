use crate::character::{Attributes, Combatant, DerivedStats, Element, Skill, Vitals};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type EnemyId = u32;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EnemyId,
    /// Template kind, e.g. "squirrel".
    pub kind: String,
    pub name: String,
    pub element: Element,
    pub level: u32,
    pub attributes: Attributes,
    pub stats: DerivedStats,
    pub vitals: Vitals,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub is_baby: bool,
}

impl Enemy {
    pub fn new(
        id: EnemyId,
        kind: impl Into<String>,
        name: impl Into<String>,
        element: Element,
        level: u32,
        attributes: Attributes,
        skills: Vec<Skill>,
    ) -> Self {
        let stats = DerivedStats::from_attributes(&attributes, level);
        Self {
            id,
            kind: kind.into(),
            name: name.into(),
            element,
            level,
            attributes,
            vitals: Vitals::full(&stats),
            stats,
            skills,
            is_baby: false,
        }
    }
}

impl Combatant for Enemy {
    fn name(&self) -> &str {
        &self.name
    }

    fn element(&self) -> Element {
        self.element
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn stats(&self) -> &DerivedStats {
        &self.stats
    }

    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn vitals_mut(&mut self) -> &mut Vitals {
        &mut self.vitals
    }

    fn skills(&self) -> &[Skill] {
        &self.skills
    }
}

/// Reference to a battle participant. Always resolved against the current
/// roster at the moment it is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum UnitRef {
    Player,
    Companion,
    Enemy(EnemyId),
}

impl UnitRef {
    /// Initiative tie-break rank: player, then companion, then enemies.
    pub fn type_priority(&self) -> u8 {
        match self {
            UnitRef::Player => 0,
            UnitRef::Companion => 1,
            UnitRef::Enemy(_) => 2,
        }
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self, UnitRef::Enemy(_))
    }
}

impl fmt::Display for UnitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitRef::Player => write!(f, "player"),
            UnitRef::Companion => write!(f, "companion"),
            UnitRef::Enemy(id) => write!(f, "enemy#{id}"),
        }
    }
}

/// A single action a unit can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Attack { target: UnitRef },
    Skill { skill_id: u32, target: UnitRef },
    Defend,
    Capture { target: EnemyId },
}
