use super::attributes::{AttributeType, Attributes};
use super::combatant::{Combatant, Vitals};
use super::derived_stats::{Aptitude, DerivedStats};
use super::element::Element;
use super::progression::companion_exp_max;
use super::skills::{Skill, SkillId};
use crate::core::error::{BattleError, Result};
use crate::items::EquipmentBonus;
use serde::{Deserialize, Serialize};

pub type CompanionId = u32;

/// How the companion behaves when acting on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanionStance {
    #[default]
    Balanced,
    Aggressive,
    /// Defends instead of attacking when hp is low.
    Defensive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Companion {
    pub id: CompanionId,
    pub name: String,
    pub element: Element,
    pub level: u32,
    pub exp: u64,
    pub exp_max: u64,
    /// Experience banked while the companion sits at its level ceiling.
    pub stored_exp: u64,
    pub attribute_points: u32,
    pub attributes: Attributes,
    pub aptitude: Aptitude,
    pub stats: DerivedStats,
    pub vitals: Vitals,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub stance: CompanionStance,
    #[serde(default)]
    pub preferred_skill: Option<SkillId>,
    #[serde(default)]
    pub is_baby: bool,
}

impl Companion {
    /// A fresh companion at full hp/mp with no experience.
    pub fn new(
        id: CompanionId,
        name: impl Into<String>,
        element: Element,
        level: u32,
        attributes: Attributes,
        aptitude: Aptitude,
        skills: Vec<Skill>,
    ) -> Self {
        let stats = Self::derive(&attributes, level, &aptitude);
        Self {
            id,
            name: name.into(),
            element,
            level,
            exp: 0,
            exp_max: companion_exp_max(level),
            stored_exp: 0,
            attribute_points: 0,
            attributes,
            aptitude,
            vitals: Vitals::full(&stats),
            stats,
            skills,
            stance: CompanionStance::default(),
            preferred_skill: None,
            is_baby: false,
        }
    }

    fn derive(attributes: &Attributes, level: u32, aptitude: &Aptitude) -> DerivedStats {
        DerivedStats::calculate_derived_stats(
            attributes,
            level,
            None,
            &EquipmentBonus::default(),
            aptitude,
        )
    }

    pub fn recalculate_stats(&mut self) {
        self.stats = Self::derive(&self.attributes, self.level, &self.aptitude);
        self.vitals.clamp_to(&self.stats);
    }

    pub fn restore_full(&mut self) {
        self.vitals.restore_full(&self.stats);
    }

    pub fn allocate_point(&mut self, attr: AttributeType) -> Result<()> {
        if self.attribute_points == 0 {
            return Err(BattleError::InvalidAction(format!(
                "{} has no unspent attribute points",
                self.name
            )));
        }
        self.attribute_points -= 1;
        self.attributes.increment(attr);
        self.recalculate_stats();
        Ok(())
    }
}

impl Combatant for Companion {
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
