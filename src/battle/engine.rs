//! The battle state machine.
//!
//! The engine owns the party, the current battle, the rng and a logical clock.
//! Autonomous units act through delayed continuations that fire as the clock
//! advances; the player suspends the machine in `AwaitingPlayerInput` until
//! one of the `player_*` handlers is called.

use super::actions::Turn;
use super::scheduler::{Continuation, ContinuationQueue, Step};
use super::settings::BattleSettings;
use super::settlement::{settle_victory, Rewards};
use super::state::{
    all_units, is_alive, lookup, lookup_mut, Battle, BattleLog, BattleView, LogKind, Outcome,
    Phase,
};
use crate::character::{Combatant, Party, SkillId};
use crate::combat::{
    auto_player_decide, build_turn_order, companion_decide, enemy_decide, Action, EnemyId,
    InitiativeEntry, UnitRef,
};
use crate::core::constants::MIN_CONTINUATION_DELAY_MS;
use crate::core::error::{BattleError, Result};
use crate::zones::{generate_enemies, zone_supports_combat};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Running totals across every battle the engine has driven.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleRecord {
    pub started: u32,
    pub victories: u32,
    pub defeats: u32,
    pub stopped: u32,
    pub captures: u32,
    pub exp_gained: u64,
    pub money_gained: u64,
}

pub struct BattleEngine<R: Rng = ChaCha8Rng> {
    party: Party,
    settings: BattleSettings,
    rng: R,
    battle: Option<Battle>,
    queue: ContinuationQueue,
    clock_ms: u64,
    epoch: u64,
    log: BattleLog,
    record: BattleRecord,
    last_rewards: Option<Rewards>,
}

impl BattleEngine<ChaCha8Rng> {
    pub fn with_seed(party: Party, settings: BattleSettings, seed: u64) -> Self {
        Self::new(party, settings, ChaCha8Rng::seed_from_u64(seed))
    }
}

/// Victory once no enemy stands; defeat once the player and any companion are down.
fn termination(party: &Party, battle: &Battle) -> Option<Outcome> {
    if battle.living_enemies().next().is_none() {
        return Some(Outcome::Victory);
    }
    let player_down = !party.player.is_alive();
    let companion_down = !is_alive(party, battle, UnitRef::Companion);
    (player_down && companion_down).then_some(Outcome::Defeat)
}

impl<R: Rng> BattleEngine<R> {
    pub fn new(party: Party, settings: BattleSettings, rng: R) -> Self {
        Self {
            party,
            settings,
            rng,
            battle: None,
            queue: ContinuationQueue::default(),
            clock_ms: 0,
            epoch: 0,
            log: BattleLog::default(),
            record: BattleRecord::default(),
            last_rewards: None,
        }
    }

    // ===== Accessors =====

    pub fn party(&self) -> &Party {
        &self.party
    }

    /// Mutable party access, refused while a battle is running.
    pub fn party_mut(&mut self) -> Result<&mut Party> {
        if let Some(battle) = self.battle.as_ref().filter(|b| b.is_live()) {
            return Err(BattleError::WrongPhase {
                expected: "idle",
                actual: battle.phase.name().to_string(),
            });
        }
        Ok(&mut self.party)
    }

    pub fn settings(&self) -> &BattleSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut BattleSettings {
        &mut self.settings
    }

    pub fn battle(&self) -> Option<&Battle> {
        self.battle.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.battle.as_ref().map_or(Phase::Idle, |b| b.phase)
    }

    pub fn is_running(&self) -> bool {
        self.battle.as_ref().is_some_and(|b| b.is_live())
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    /// Continuations that will still do something when they come due.
    pub fn pending_continuations(&self) -> usize {
        self.queue.pending_in_epoch(self.epoch)
    }

    pub fn log(&self) -> &BattleLog {
        &self.log
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    pub fn record(&self) -> &BattleRecord {
        &self.record
    }

    pub fn last_rewards(&self) -> Option<&Rewards> {
        self.last_rewards.as_ref()
    }

    pub fn view(&self) -> BattleView {
        match &self.battle {
            Some(battle) => BattleView::build(&self.party, battle, self.clock_ms),
            None => BattleView::idle(self.clock_ms),
        }
    }

    /// Whether the player acts on its own this battle.
    pub fn is_auto(&self) -> bool {
        self.settings.auto_battle || self.battle.as_ref().is_some_and(|b| b.chain_requested)
    }

    // ===== Lifecycle =====

    /// Starts an encounter in the party's current zone. `chain` keeps
    /// starting new encounters after each victory while chain battles are
    /// enabled in the settings.
    pub fn start_battle(&mut self, chain: bool) -> Result<()> {
        if self.is_running() {
            return self.reject(BattleError::InvalidAction(
                "a battle is already in progress".to_string(),
            ));
        }
        if !self.party.player.is_alive() && !self.settings.heal_on_entry {
            return self.reject(BattleError::InvalidAction(format!(
                "{} is too wounded to fight",
                self.party.player.name
            )));
        }

        self.epoch += 1;
        let zone = self.party.current_zone.clone();
        let enemies = match generate_enemies(&zone, &mut self.rng) {
            Ok(enemies) => enemies,
            Err(err) => {
                self.battle = None;
                return self.reject(err.into());
            }
        };

        let companion = self.party.active_companion().map(|c| c.id);
        let mut battle = Battle::new(enemies, companion, chain);

        if self.settings.heal_on_entry {
            self.party.player.restore_full();
            if let Some(companion) = self.party.active_companion_mut() {
                companion.restore_full();
            }
        }

        let names: Vec<_> = battle.enemies.iter().map(|e| e.name.as_str()).collect();
        self.log.push(
            battle.round,
            LogKind::System,
            format!("Encountered {}", names.join(", ")),
        );
        info!(zone = %zone, enemies = battle.enemies.len(), chain, "battle started");

        battle.phase = Phase::RoundStart;
        self.battle = Some(battle);
        self.record.started += 1;

        if self.begin_round() {
            self.schedule(self.settings.pacing.turn_delay_ms, Step::ProcessNextTurn);
        }
        Ok(())
    }

    /// Cancels the current battle and any pending chain restart. Every
    /// continuation already scheduled becomes a no-op. Returns whether
    /// anything was running.
    pub fn stop_battle(&mut self) -> bool {
        let pending = self.pending_continuations() > 0;
        let Some(battle) = self.battle.as_mut() else {
            return false;
        };
        let live = battle.is_live();
        if !live && !pending {
            return false;
        }

        battle.stopped = true;
        if live {
            battle.phase = Phase::Idle;
        }
        let round = battle.round;
        self.epoch += 1;
        if live {
            self.record.stopped += 1;
        }
        self.log.push(round, LogKind::System, "Battle stopped");
        info!(round, "battle stopped");
        true
    }

    pub fn select_target(&mut self, enemy_id: EnemyId) -> Result<()> {
        let Some(battle) = self.battle.as_mut().filter(|b| b.is_live()) else {
            return self.reject(BattleError::InvalidAction(
                "no battle in progress".to_string(),
            ));
        };
        if !battle.enemy(enemy_id).is_some_and(|e| e.is_alive()) {
            return self.reject(BattleError::StaleReference(format!(
                "{} is no longer in the fight",
                UnitRef::Enemy(enemy_id)
            )));
        }
        battle.selected_target = Some(enemy_id);
        Ok(())
    }

    // ===== Player input =====

    pub fn player_attack(&mut self) -> Result<()> {
        self.player_action(|turn| {
            let target = turn.selected_target()?;
            turn.strike(UnitRef::Player, UnitRef::Enemy(target), None)
        })
    }

    pub fn player_defend(&mut self) -> Result<()> {
        self.player_action(|turn| turn.defend(UnitRef::Player))
    }

    pub fn player_use_skill(&mut self, skill_id: SkillId) -> Result<()> {
        self.player_action(|turn| {
            let target = turn.selected_target()?;
            turn.strike(UnitRef::Player, UnitRef::Enemy(target), Some(skill_id))
        })
    }

    pub fn player_capture(&mut self) -> Result<()> {
        self.player_action(|turn| {
            let target = turn.selected_target()?;
            turn.capture(target).map(|_| ())
        })
    }

    pub fn player_use_item(&mut self, item_id: &str) -> Result<()> {
        self.player_action(|turn| turn.use_item(item_id))
    }

    fn player_action<F>(&mut self, act: F) -> Result<()>
    where
        F: FnOnce(&mut Turn<'_, R>) -> Result<()>,
    {
        let phase = self.phase();
        if !self.is_running() || phase != Phase::AwaitingPlayerInput {
            return self.reject(BattleError::WrongPhase {
                expected: "awaiting_player_input",
                actual: phase.name().to_string(),
            });
        }

        let result = match self.turn() {
            Some(mut turn) => act(&mut turn),
            None => Err(BattleError::InvalidAction("no battle in progress".to_string())),
        };
        if let Err(err) = result {
            return self.reject(err);
        }

        if let Some(battle) = self.battle.as_mut() {
            battle.phase = Phase::UnitActing(UnitRef::Player);
        }
        self.finish_action();
        Ok(())
    }

    // ===== Clock =====

    /// Moves the clock forward, firing every continuation that comes due in
    /// order. Returns how many continuations did any work.
    pub fn advance(&mut self, delta_ms: u64) -> usize {
        let target = self.clock_ms.saturating_add(delta_ms);
        let mut fired = 0;
        while let Some(continuation) = self.queue.pop_due(target) {
            self.clock_ms = self.clock_ms.max(continuation.due_ms);
            if self.fire(continuation) {
                fired += 1;
            }
        }
        self.clock_ms = target;
        fired
    }

    /// Advances until nothing is pending or `max_ms` has elapsed. Stops early
    /// when the machine waits for player input. Returns elapsed time.
    pub fn run_until_idle(&mut self, max_ms: u64) -> u64 {
        let start = self.clock_ms;
        let deadline = start.saturating_add(max_ms);
        while let Some(due) = self.queue.next_due() {
            if due > deadline {
                break;
            }
            self.advance(due.saturating_sub(self.clock_ms));
        }
        self.clock_ms - start
    }

    fn schedule(&mut self, delay_ms: u64, step: Step) {
        let due = self.clock_ms + delay_ms.max(MIN_CONTINUATION_DELAY_MS);
        debug!(due, epoch = self.epoch, ?step, "scheduled continuation");
        self.queue.schedule(due, self.epoch, step);
    }

    fn fire(&mut self, continuation: Continuation) -> bool {
        if continuation.epoch != self.epoch {
            debug!(
                epoch = continuation.epoch,
                current = self.epoch,
                step = ?continuation.step,
                "dropped cancelled continuation"
            );
            return false;
        }

        match continuation.step {
            Step::ChainRestart => {
                // failures are logged by start_battle
                let _ = self.start_battle(true);
            }
            Step::ProcessNextTurn => {
                if !self.is_running() {
                    return false;
                }
                self.process_next_turn();
            }
            Step::ResolveUnit(unit) => {
                if !self.is_running() || self.phase() != Phase::UnitActing(unit) {
                    return false;
                }
                self.resolve_unit(unit);
            }
        }
        true
    }

    // ===== State machine =====

    fn turn(&mut self) -> Option<Turn<'_, R>> {
        let battle = self.battle.as_mut()?;
        Some(Turn {
            party: &mut self.party,
            battle,
            rng: &mut self.rng,
            log: &mut self.log,
        })
    }

    /// Rebuilds the turn order from living units. Returns false if the
    /// battle had to halt because nobody can act.
    fn begin_round(&mut self) -> bool {
        let Some(battle) = self.battle.as_mut() else {
            return false;
        };
        battle.phase = Phase::RoundStart;

        for unit in all_units(&self.party, battle) {
            if let Some(combatant) = lookup_mut(&mut self.party, battle, unit) {
                combatant.vitals_mut().defending = false;
            }
        }

        let entries: Vec<InitiativeEntry> = {
            let roster: &Battle = battle;
            all_units(&self.party, roster)
                .into_iter()
                .filter_map(|unit| {
                    let combatant = lookup(&self.party, roster, unit)?;
                    combatant.is_alive().then(|| InitiativeEntry {
                        unit,
                        speed: combatant.stats().speed,
                    })
                })
                .collect()
        };
        battle.turn_order = build_turn_order(entries, &mut self.rng);
        battle.cursor = 0;
        let round = battle.round;

        if battle.turn_order.is_empty() {
            battle.stopped = true;
            battle.phase = Phase::Idle;
            self.epoch += 1;
            warn!(round, "turn order is empty, halting battle");
            self.log.push(
                round,
                LogKind::System,
                format!("Battle halted: {}", BattleError::EmptyInitiative),
            );
            return false;
        }

        debug!(round, order = ?battle.turn_order, "round started");
        self.log.push(round, LogKind::Round, format!("Round {round}"));
        true
    }

    fn process_next_turn(&mut self) {
        let auto = self.is_auto();
        loop {
            let Some(battle) = self.battle.as_mut() else {
                return;
            };
            if let Some(outcome) = termination(&self.party, battle) {
                self.conclude(outcome);
                return;
            }

            if battle.cursor >= battle.turn_order.len() {
                battle.phase = Phase::RoundExhausted;
                battle.round += 1;
                if !self.begin_round() {
                    return;
                }
                continue;
            }

            let unit = battle.turn_order[battle.cursor];
            if !is_alive(&self.party, battle, unit) {
                debug!(%unit, "skipping fallen unit");
                battle.cursor += 1;
                continue;
            }

            if unit == UnitRef::Player && !auto {
                battle.phase = Phase::AwaitingPlayerInput;
                let round = battle.round;
                self.log.push(round, LogKind::System, "Your turn");
                return;
            }

            battle.phase = Phase::UnitActing(unit);
            self.schedule(self.settings.pacing.action_delay_ms, Step::ResolveUnit(unit));
            return;
        }
    }

    fn decide(&mut self, unit: UnitRef) -> Option<Action> {
        let battle = self.battle.as_ref()?;
        match unit {
            UnitRef::Player => {
                let target = battle.enemy(battle.live_target()?)?;
                Some(auto_player_decide(
                    &self.party.player,
                    target,
                    self.settings.auto_capture,
                    self.settings.auto_skill_id,
                ))
            }
            UnitRef::Companion => {
                let companion = self.party.companion(battle.companion?)?;
                companion_decide(
                    companion,
                    &battle.enemies,
                    self.settings.auto_companion_skill_id,
                )
            }
            UnitRef::Enemy(id) => {
                let enemy = battle.enemy(id)?;
                let targets: Vec<UnitRef> = [UnitRef::Player, UnitRef::Companion]
                    .into_iter()
                    .filter(|u| is_alive(&self.party, battle, *u))
                    .collect();
                enemy_decide(enemy, &targets, &mut self.rng)
            }
        }
    }

    fn resolve_unit(&mut self, unit: UnitRef) {
        let action = self.decide(unit);
        let result = match (action, self.turn()) {
            (Some(action), Some(mut turn)) => turn.execute(unit, action),
            (None, _) => {
                debug!(%unit, "no action available");
                Ok(())
            }
            (Some(_), None) => return,
        };
        if let Err(err) = result {
            // autonomous choices are validated before they are made
            warn!(%unit, error = %err, "autonomous action failed");
            let round = self.battle.as_ref().map_or(0, |b| b.round);
            self.log
                .push(round, LogKind::System, format!("{unit} hesitates: {err}"));
        }
        self.finish_action();
    }

    /// Advances the cursor and either concludes or schedules the next turn.
    fn finish_action(&mut self) {
        let auto = self.is_auto();
        let Some(battle) = self.battle.as_mut() else {
            return;
        };
        if !battle.is_live() {
            return;
        }
        battle.cursor += 1;
        if let Some(outcome) = termination(&self.party, battle) {
            self.conclude(outcome);
            return;
        }
        let delay = if auto {
            self.settings.pacing.fast_turn_delay_ms
        } else {
            self.settings.pacing.turn_delay_ms
        };
        self.schedule(delay, Step::ProcessNextTurn);
    }

    /// Settles the battle exactly once and cancels its pending turns.
    fn conclude(&mut self, outcome: Outcome) {
        let Some(battle) = self.battle.as_mut() else {
            return;
        };
        if battle.settled || battle.stopped {
            return;
        }
        battle.phase = Phase::Settling;
        battle.stopped = true;
        self.epoch += 1;
        let round = battle.round;

        let rewards = match outcome {
            Outcome::Victory => Some(settle_victory(&mut self.party, battle, &mut self.rng)),
            Outcome::Defeat => None,
        };
        battle.settled = true;
        battle.phase = Phase::Concluded(outcome);
        let chain = outcome == Outcome::Victory
            && battle.chain_requested
            && self.settings.auto_chain_battle;

        match &rewards {
            Some(rewards) => {
                self.record.victories += 1;
                self.record.captures += rewards.captured.len() as u32;
                self.record.exp_gained += rewards.exp;
                self.record.money_gained += rewards.money;
                self.log_rewards(round, rewards);
                self.log.push(round, LogKind::System, "Victory!");
            }
            None => {
                self.record.defeats += 1;
                self.log.push(round, LogKind::System, "Defeat...");
            }
        }
        info!(?outcome, round, "battle concluded");
        self.last_rewards = rewards;

        if chain {
            if zone_supports_combat(&self.party.current_zone) {
                self.log
                    .push(round, LogKind::System, "Searching for the next battle...");
                self.schedule(self.settings.pacing.chain_delay_ms, Step::ChainRestart);
            } else {
                self.log.push(
                    round,
                    LogKind::System,
                    "No more enemies here, chain battle ended",
                );
            }
        }
    }

    fn log_rewards(&mut self, round: u32, rewards: &Rewards) {
        if rewards.exp > 0 {
            self.log
                .push(round, LogKind::Reward, format!("Gained {} exp", rewards.exp));
        }
        if rewards.player_levels > 0 {
            let message = format!("Level up! Now level {}", self.party.player.level);
            self.log.push(round, LogKind::Reward, message);
        }
        let companion = self
            .battle
            .as_ref()
            .and_then(|b| b.companion)
            .and_then(|id| self.party.companion(id));
        if let Some(companion) = companion {
            let mut message = format!("{} gained {} exp", companion.name, rewards.companion_exp);
            if rewards.companion_levels > 0 {
                message.push_str(&format!(", now level {}", companion.level));
            }
            if companion.stored_exp > 0 {
                message.push_str(&format!(" ({} exp banked)", companion.stored_exp));
            }
            self.log.push(round, LogKind::Reward, message);
        }
        for drop in &rewards.drops {
            self.log.push(
                round,
                LogKind::Reward,
                format!("Obtained {} x{}", drop.name, drop.count),
            );
        }
        if rewards.money > 0 {
            self.log
                .push(round, LogKind::Reward, format!("Gained {} coins", rewards.money));
        }
    }

    fn reject(&mut self, err: BattleError) -> Result<()> {
        warn!(error = %err, "action rejected");
        let round = self.battle.as_ref().map_or(0, |b| b.round);
        self.log.push(round, LogKind::Rejected, err.to_string());
        Err(err)
    }
}
