//! Battle controller - the round state machine
//!
//! Tactics (roll, boost) -> Combat (one attack per step) -> Tactics again,
//! until one side is eliminated and the battle rests in Victory.

use std::collections::VecDeque;
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::battle::constants::BOOST_COST;
use crate::battle::economy::ActionEconomy;
use crate::battle::events::{BattleEventLog, BattleEventSink, BattleEventType};
use crate::battle::initiative::{initiative_order, InitiativePolicy};
use crate::battle::resolution::{resolve_attack, AttackOutcome};
use crate::battle::units::BattleUnit;
use crate::battle::victory::{check_victory, VictoryOutcome};
use crate::battle::wheel;
use crate::core::config::BattleConfig;
use crate::core::error::{BattleError, Result};
use crate::core::types::{Round, Team, UnitId};
use crate::roster::{DefinitionProvider, UnitDefinition};

/// Battle phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BattlePhase {
    #[default]
    Tactics, // Rolling and boosting
    Combat,  // Executing the initiative order
    Victory, // Battle over
}

/// Result of one combat step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatStep {
    /// One attack resolved; `victory` is set if it ended the battle
    Attack {
        outcome: AttackOutcome,
        victory: Option<VictoryOutcome>,
    },
    /// The initiative order ran out and a new tactics phase began
    RoundComplete { next_round: Round },
}

impl CombatStep {
    /// Does this step end the combat phase?
    pub fn ends_phase(&self) -> bool {
        matches!(
            self,
            CombatStep::RoundComplete { .. }
                | CombatStep::Attack {
                    victory: Some(_),
                    ..
                }
        )
    }
}

fn deploy(definitions: &[Arc<UnitDefinition>], team: Team) -> Vec<BattleUnit> {
    definitions
        .iter()
        .enumerate()
        .map(|(slot, def)| BattleUnit::new(Arc::clone(def), team, slot))
        .collect()
}

/// Complete battle state, exposed read-only as a snapshot
#[derive(Debug, Clone, Serialize)]
pub struct BattleState {
    pub player_team: Vec<BattleUnit>,
    pub enemy_team: Vec<BattleUnit>,
    pub phase: BattlePhase,
    pub economy: ActionEconomy,
    pub outcome: Option<VictoryOutcome>,
    pub round: Round,

    // Remaining attackers of the current combat phase
    initiative: VecDeque<UnitId>,
}

impl BattleState {
    fn new(
        player: &[Arc<UnitDefinition>],
        enemy: &[Arc<UnitDefinition>],
        action_points: u32,
    ) -> Self {
        Self {
            player_team: deploy(player, Team::Player),
            enemy_team: deploy(enemy, Team::Enemy),
            phase: BattlePhase::Tactics,
            economy: ActionEconomy::new(action_points),
            outcome: None,
            round: 1,
            initiative: VecDeque::new(),
        }
    }

    /// Is the battle finished?
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, BattlePhase::Victory)
    }

    pub fn team(&self, team: Team) -> &[BattleUnit] {
        match team {
            Team::Player => &self.player_team,
            Team::Enemy => &self.enemy_team,
        }
    }

    /// All units, players first, in slot order
    pub fn units(&self) -> impl Iterator<Item = &BattleUnit> {
        self.player_team.iter().chain(self.enemy_team.iter())
    }

    fn units_mut(&mut self) -> impl Iterator<Item = &mut BattleUnit> {
        self.player_team.iter_mut().chain(self.enemy_team.iter_mut())
    }

    /// Get a unit from either team
    pub fn get_unit(&self, unit_id: UnitId) -> Option<&BattleUnit> {
        self.units().find(|u| u.id == unit_id)
    }

    fn get_unit_mut(&mut self, unit_id: UnitId) -> Option<&mut BattleUnit> {
        self.units_mut().find(|u| u.id == unit_id)
    }

    pub fn living_count(&self, team: Team) -> usize {
        self.team(team).iter().filter(|u| u.is_alive()).count()
    }

    /// Attackers still waiting to act this combat phase
    pub fn pending_initiative(&self) -> impl Iterator<Item = &UnitId> {
        self.initiative.iter()
    }

    /// Let `attacker_id` hit a random living opponent
    fn attack<R: Rng + ?Sized>(&mut self, attacker_id: UnitId, rng: &mut R) -> Option<AttackOutcome> {
        let team = self.get_unit(attacker_id)?.team;
        let (attackers, defenders) = match team {
            Team::Player => (&self.player_team, &mut self.enemy_team),
            Team::Enemy => (&self.enemy_team, &mut self.player_team),
        };

        let attacker = attackers.iter().find(|u| u.id == attacker_id)?;
        if !attacker.is_alive() {
            return None;
        }
        resolve_attack(attacker, defenders, rng)
    }
}

/// Owns the battle state and drives it through its phases
///
/// Randomness comes from `R`, so a seeded generator replays a battle exactly.
pub struct BattleController<R = ChaCha8Rng> {
    config: BattleConfig,
    player_lineup: Vec<Arc<UnitDefinition>>,
    enemy_lineup: Vec<Arc<UnitDefinition>>,
    state: BattleState,
    rng: R,
    battle_log: BattleEventLog,
    sinks: Vec<Box<dyn BattleEventSink>>,
}

impl BattleController<ChaCha8Rng> {
    /// Build a battle from the configured lineups
    ///
    /// Unknown definition ids fall back to the default definition. The RNG is
    /// seeded from `config.seed`, or from entropy when no seed is set.
    pub fn from_config<P: DefinitionProvider + ?Sized>(config: BattleConfig, provider: &P) -> Result<Self> {
        config.validate()?;

        let player = config.lineup.player.iter().map(|&id| provider.resolve(id)).collect();
        let enemy = config.lineup.enemy.iter().map(|&id| provider.resolve(id)).collect();
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Self::with_rng(config, player, enemy, rng)
    }
}

impl<R: Rng> BattleController<R> {
    /// Deploy both teams and enter the first tactics phase
    pub fn with_rng(
        config: BattleConfig,
        player: Vec<Arc<UnitDefinition>>,
        enemy: Vec<Arc<UnitDefinition>>,
        rng: R,
    ) -> Result<Self> {
        if config.action_points_per_turn == 0 {
            return Err(BattleError::InvalidConfig(
                "action_points_per_turn must be positive".into(),
            ));
        }
        if player.is_empty() {
            return Err(BattleError::EmptyTeam(Team::Player));
        }
        if enemy.is_empty() {
            return Err(BattleError::EmptyTeam(Team::Enemy));
        }
        for definition in player.iter().chain(enemy.iter()) {
            definition.validate()?;
        }

        let state = BattleState::new(&player, &enemy, config.action_points_per_turn);
        let mut controller = Self {
            config,
            player_lineup: player,
            enemy_lineup: enemy,
            state,
            rng,
            battle_log: BattleEventLog::new(),
            sinks: Vec::new(),
        };
        controller.start_tactics()?;
        Ok(controller)
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn phase(&self) -> BattlePhase {
        self.state.phase
    }

    pub fn round(&self) -> Round {
        self.state.round
    }

    pub fn outcome(&self) -> Option<VictoryOutcome> {
        self.state.outcome
    }

    pub fn action_points(&self) -> u32 {
        self.state.economy.current()
    }

    pub fn unit(&self, unit_id: UnitId) -> Option<&BattleUnit> {
        self.state.get_unit(unit_id)
    }

    /// Unit deployed in `slot` of `team`
    pub fn unit_at(&self, team: Team, slot: usize) -> Option<&BattleUnit> {
        self.state.team(team).get(slot)
    }

    pub fn event_log(&self) -> &BattleEventLog {
        &self.battle_log
    }

    /// Attach a sink; it first receives every event logged so far
    pub fn subscribe(&mut self, mut sink: Box<dyn BattleEventSink>) {
        for event in self.battle_log.iter() {
            event.event_type.dispatch(sink.as_mut());
        }
        self.sinks.push(sink);
    }

    fn emit(&mut self, event_type: BattleEventType) {
        self.battle_log.push(event_type, self.state.round);
        for sink in self.sinks.iter_mut() {
            event_type.dispatch(sink.as_mut());
        }
    }

    fn set_phase(&mut self, phase: BattlePhase) {
        self.state.phase = phase;
        tracing::info!("Round {}: {:?} phase", self.state.round, phase);
        self.emit(BattleEventType::PhaseChanged { phase });
    }

    /// Refill action points and roll every living unit
    fn start_tactics(&mut self) -> Result<()> {
        self.state.economy.reset();
        self.state.initiative.clear();
        self.set_phase(BattlePhase::Tactics);

        let mut rolls = Vec::new();
        let rng = &mut self.rng;
        for unit in self.state.units_mut() {
            if unit.is_alive() {
                let value = wheel::roll(&unit.definition, &mut *rng)?;
                unit.set_roll(value);
                rolls.push((unit.id, value));
            } else {
                unit.reset_wheel();
            }
        }

        for (unit, value) in rolls {
            tracing::debug!("Unit {} rolled {}", unit, value);
            self.emit(BattleEventType::Rolled { unit, value });
        }
        Ok(())
    }

    /// Spend an action point to boost a living player unit
    ///
    /// Returns the boosted wheel value. A rejected request changes nothing.
    pub fn request_boost(&mut self, unit_id: UnitId) -> Result<u32> {
        let unit = self
            .state
            .get_unit(unit_id)
            .ok_or(BattleError::UnitNotFound(unit_id))?;

        let ineligible = |reason: String| BattleError::UnitNotEligible {
            unit: unit_id,
            reason,
        };
        if self.state.phase != BattlePhase::Tactics {
            return Err(ineligible(format!(
                "boosts are only accepted in tactics, not {:?}",
                self.state.phase
            )));
        }
        if !unit.is_player() {
            return Err(ineligible("unit is not player-controlled".into()));
        }
        if !unit.is_alive() {
            return Err(ineligible("unit is knocked out".into()));
        }
        if unit.is_boosted {
            return Err(BattleError::UnitAlreadyBoosted(unit_id));
        }

        let value = wheel::boost(&unit.definition)?;
        self.state.economy.spend(BOOST_COST)?;
        self.state
            .get_unit_mut(unit_id)
            .ok_or(BattleError::UnitNotFound(unit_id))?
            .apply_boost(value);

        tracing::debug!(
            "Unit {} boosted to {} ({} action points left)",
            unit_id,
            value,
            self.state.economy.current()
        );
        self.emit(BattleEventType::Boosted {
            unit: unit_id,
            value,
        });
        Ok(value)
    }

    /// Move from tactics to combat and fix the initiative order
    ///
    /// Returns false (and does nothing) outside the tactics phase.
    pub fn advance_phase(&mut self) -> bool {
        if self.state.phase != BattlePhase::Tactics {
            tracing::debug!("Advance ignored in {:?} phase", self.state.phase);
            return false;
        }

        let policy = InitiativePolicy {
            player_always_starts: self.config.player_always_starts,
        };
        let order = initiative_order(self.state.units(), policy, &mut self.rng);
        self.state.initiative = order.into();

        self.set_phase(BattlePhase::Combat);
        true
    }

    /// Resolve the next attack in the initiative order
    ///
    /// Entries whose unit has died, or who find no living target, are
    /// skipped. Returns `None` outside the combat phase.
    pub fn resolve_next_attack(&mut self) -> Result<Option<CombatStep>> {
        if self.state.phase != BattlePhase::Combat {
            return Ok(None);
        }

        while let Some(attacker) = self.state.initiative.pop_front() {
            let Some(outcome) = self.state.attack(attacker, &mut self.rng) else {
                tracing::debug!("Unit {} skipped (down or no target)", attacker);
                continue;
            };

            tracing::debug!(
                "Unit {} hit {} for {} (hp left {}{})",
                outcome.attacker,
                outcome.target,
                outcome.damage,
                outcome.remaining_health,
                if outcome.target_knocked_out { ", KO" } else { "" }
            );
            self.emit(BattleEventType::Attacked {
                attacker: outcome.attacker,
                target: outcome.target,
                damage: outcome.damage,
                knocked_out: outcome.target_knocked_out,
            });

            let victory = check_victory(&self.state.player_team, &self.state.enemy_team);
            if let Some(result) = victory {
                self.end_battle(result);
            }
            return Ok(Some(CombatStep::Attack { outcome, victory }));
        }

        self.state.round += 1;
        self.start_tactics()?;
        Ok(Some(CombatStep::RoundComplete {
            next_round: self.state.round,
        }))
    }

    /// Resolve attacks until the combat phase ends
    pub fn run_combat(&mut self) -> Result<Vec<CombatStep>> {
        let mut steps = Vec::new();
        while let Some(step) = self.resolve_next_attack()? {
            steps.push(step);
            if step.ends_phase() {
                break;
            }
        }
        Ok(steps)
    }

    /// Advance to combat and play it out
    pub fn fight(&mut self) -> Result<Vec<CombatStep>> {
        if !self.advance_phase() {
            return Ok(Vec::new());
        }
        self.run_combat()
    }

    fn end_battle(&mut self, outcome: VictoryOutcome) {
        self.state.outcome = Some(outcome);
        self.state.initiative.clear();
        self.set_phase(BattlePhase::Victory);
        tracing::info!("Battle ended in round {}: {} wins", self.state.round, outcome);
        self.emit(BattleEventType::BattleEnded { outcome });
    }

    /// Redeploy the original lineups at full health and start over
    ///
    /// Accepted in any phase. Subscribed sinks stay attached.
    pub fn restart_battle(&mut self) -> Result<()> {
        self.state = BattleState::new(
            &self.player_lineup,
            &self.enemy_lineup,
            self.config.action_points_per_turn,
        );
        self.battle_log.clear();
        tracing::info!("Battle restarted");
        self.start_tactics()
    }
}
