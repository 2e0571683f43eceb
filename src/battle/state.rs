use crate::character::{Combatant, CompanionId, Element, Party};
use crate::combat::{Enemy, EnemyId, UnitRef};
use crate::core::constants::BATTLE_LOG_CAPACITY;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Victory,
    Defeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "detail", rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Initializing,
    RoundStart,
    UnitActing(UnitRef),
    AwaitingPlayerInput,
    RoundExhausted,
    Settling,
    Concluded(Outcome),
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Initializing => "initializing",
            Phase::RoundStart => "round_start",
            Phase::UnitActing(_) => "unit_acting",
            Phase::AwaitingPlayerInput => "awaiting_player_input",
            Phase::RoundExhausted => "round_exhausted",
            Phase::Settling => "settling",
            Phase::Concluded(_) => "concluded",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Idle | Phase::Concluded(_))
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    System,
    Round,
    Action,
    Reward,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub round: u32,
    pub kind: LogKind,
    pub message: String,
}

/// Human-readable battle log. Entries are only ever appended; the oldest
/// are evicted once the capacity is reached.
#[derive(Debug, Clone, Default)]
pub struct BattleLog {
    entries: VecDeque<LogEntry>,
}

impl BattleLog {
    pub fn push(&mut self, round: u32, kind: LogKind, message: impl Into<String>) {
        if self.entries.len() >= BATTLE_LOG_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            round,
            kind,
            message: message.into(),
        });
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    pub fn contains(&self, kind: LogKind) -> bool {
        self.entries.iter().any(|e| e.kind == kind)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// An enemy killed in this battle, kept for reward settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefeatedEnemy {
    pub name: String,
    pub level: u32,
}

/// One encounter. Player and companions live in the `Party`; the battle
/// owns the enemies and the turn bookkeeping.
#[derive(Debug, Clone)]
pub struct Battle {
    pub enemies: Vec<Enemy>,
    /// Active companion taking part, fixed when the battle starts.
    pub companion: Option<CompanionId>,
    pub turn_order: Vec<UnitRef>,
    pub cursor: usize,
    pub round: u32,
    pub phase: Phase,
    pub chain_requested: bool,
    pub stopped: bool,
    pub settled: bool,
    pub selected_target: Option<EnemyId>,
    pub defeated: Vec<DefeatedEnemy>,
    pub captured: Vec<CompanionId>,
}

impl Battle {
    pub fn new(enemies: Vec<Enemy>, companion: Option<CompanionId>, chain_requested: bool) -> Self {
        let selected_target = enemies.first().map(|e| e.id);
        Self {
            enemies,
            companion,
            turn_order: Vec::new(),
            cursor: 0,
            round: 1,
            phase: Phase::Initializing,
            chain_requested,
            stopped: false,
            settled: false,
            selected_target,
            defeated: Vec::new(),
            captured: Vec::new(),
        }
    }

    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn living_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.is_alive())
    }

    pub fn first_living_enemy(&self) -> Option<EnemyId> {
        self.living_enemies().next().map(|e| e.id)
    }

    /// The selected enemy if it is still alive, otherwise the first living one.
    pub fn live_target(&self) -> Option<EnemyId> {
        self.selected_target
            .filter(|id| self.enemy(*id).is_some_and(|e| e.is_alive()))
            .or_else(|| self.first_living_enemy())
    }

    pub fn current_unit(&self) -> Option<UnitRef> {
        match self.phase {
            Phase::UnitActing(unit) => Some(unit),
            Phase::AwaitingPlayerInput => Some(UnitRef::Player),
            _ => None,
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Concluded(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn is_live(&self) -> bool {
        !self.stopped && !self.phase.is_terminal()
    }
}

/// Looks a unit up in the current roster. `None` if it is not in the battle.
pub fn lookup<'a>(party: &'a Party, battle: &'a Battle, unit: UnitRef) -> Option<&'a dyn Combatant> {
    match unit {
        UnitRef::Player => Some(&party.player),
        UnitRef::Companion => battle
            .companion
            .and_then(|id| party.companion(id))
            .map(|c| c as &dyn Combatant),
        UnitRef::Enemy(id) => battle.enemy(id).map(|e| e as &dyn Combatant),
    }
}

pub fn lookup_mut<'a>(
    party: &'a mut Party,
    battle: &'a mut Battle,
    unit: UnitRef,
) -> Option<&'a mut dyn Combatant> {
    match unit {
        UnitRef::Player => Some(&mut party.player),
        UnitRef::Companion => {
            let id = battle.companion?;
            party.companion_mut(id).map(|c| c as &mut dyn Combatant)
        }
        UnitRef::Enemy(id) => battle
            .enemies
            .iter_mut()
            .find(|e| e.id == id)
            .map(|e| e as &mut dyn Combatant),
    }
}

pub fn is_alive(party: &Party, battle: &Battle, unit: UnitRef) -> bool {
    lookup(party, battle, unit).is_some_and(|u| u.is_alive())
}

/// Every unit in the battle, living or not, player side first.
pub fn all_units(party: &Party, battle: &Battle) -> Vec<UnitRef> {
    let mut units = vec![UnitRef::Player];
    if battle.companion.and_then(|id| party.companion(id)).is_some() {
        units.push(UnitRef::Companion);
    }
    units.extend(battle.enemies.iter().map(|e| UnitRef::Enemy(e.id)));
    units
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitView {
    pub unit: UnitRef,
    pub name: String,
    pub level: u32,
    pub element: Element,
    pub hp: u32,
    pub max_hp: u32,
    pub mp: u32,
    pub max_mp: u32,
    pub defending: bool,
}

/// Read-only snapshot of the current battle for presentation layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleView {
    pub phase: Phase,
    pub round: u32,
    pub current_unit: Option<UnitRef>,
    pub units: Vec<UnitView>,
    pub outcome: Option<Outcome>,
    pub selected_target: Option<EnemyId>,
    pub clock_ms: u64,
}

impl BattleView {
    pub fn idle(clock_ms: u64) -> Self {
        Self {
            phase: Phase::Idle,
            round: 0,
            current_unit: None,
            units: Vec::new(),
            outcome: None,
            selected_target: None,
            clock_ms,
        }
    }

    pub fn build(party: &Party, battle: &Battle, clock_ms: u64) -> Self {
        let units = all_units(party, battle)
            .into_iter()
            .filter_map(|unit| {
                let c = lookup(party, battle, unit)?;
                Some(UnitView {
                    unit,
                    name: c.name().to_string(),
                    level: c.level(),
                    element: c.element(),
                    hp: c.hp(),
                    max_hp: c.stats().max_hp,
                    mp: c.mp(),
                    max_mp: c.stats().max_mp,
                    defending: c.is_defending(),
                })
            })
            .collect();
        Self {
            phase: battle.phase,
            round: battle.round,
            current_unit: battle.current_unit(),
            units,
            outcome: battle.outcome(),
            selected_target: battle.selected_target,
            clock_ms,
        }
    }

    pub fn unit(&self, unit: UnitRef) -> Option<&UnitView> {
        self.units.iter().find(|u| u.unit == unit)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
