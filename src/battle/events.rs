//! Battle events for presentation layers
//!
//! The controller forwards every event to subscribed sinks and keeps its own
//! ordered log. Sinks are fire-and-forget: they cannot influence the battle.

use serde::{Deserialize, Serialize};

use crate::battle::controller::BattlePhase;
use crate::battle::victory::VictoryOutcome;
use crate::core::types::{Round, UnitId};

/// Receiver of battle events
///
/// Every callback defaults to a no-op so a sink implements only what it shows.
pub trait BattleEventSink {
    fn on_roll(&mut self, _unit: UnitId, _value: u32) {}

    fn on_boost(&mut self, _unit: UnitId, _value: u32) {}

    fn on_attack(&mut self, _attacker: UnitId, _target: UnitId, _damage: u32, _knocked_out: bool) {}

    fn on_phase_change(&mut self, _phase: BattlePhase) {}

    fn on_victory(&mut self, _outcome: VictoryOutcome) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleEventType {
    Rolled { unit: UnitId, value: u32 },
    Boosted { unit: UnitId, value: u32 },
    Attacked {
        attacker: UnitId,
        target: UnitId,
        damage: u32,
        knocked_out: bool,
    },
    PhaseChanged { phase: BattlePhase },
    BattleEnded { outcome: VictoryOutcome },
}

impl BattleEventType {
    /// Replay this event into a sink
    pub fn dispatch(&self, sink: &mut dyn BattleEventSink) {
        match *self {
            BattleEventType::Rolled { unit, value } => sink.on_roll(unit, value),
            BattleEventType::Boosted { unit, value } => sink.on_boost(unit, value),
            BattleEventType::Attacked {
                attacker,
                target,
                damage,
                knocked_out,
            } => sink.on_attack(attacker, target, damage, knocked_out),
            BattleEventType::PhaseChanged { phase } => sink.on_phase_change(phase),
            BattleEventType::BattleEnded { outcome } => sink.on_victory(outcome),
        }
    }
}

/// Log entry for battle events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleEvent {
    pub round: Round,
    pub event_type: BattleEventType,
}

/// Ordered record of everything that happened in a battle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BattleEventLog {
    pub events: Vec<BattleEvent>,
}

impl BattleEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event_type: BattleEventType, round: Round) {
        self.events.push(BattleEvent { round, event_type });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &BattleEvent> {
        self.events.iter()
    }

    /// Attack events only, in order
    pub fn attacks(&self) -> impl Iterator<Item = &BattleEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e.event_type, BattleEventType::Attacked { .. }))
    }

    /// Events of one round
    pub fn in_round(&self, round: Round) -> impl Iterator<Item = &BattleEvent> {
        self.events.iter().filter(move |e| e.round == round)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        rolls: u32,
        attacks: u32,
        phases: Vec<BattlePhase>,
    }

    impl BattleEventSink for Counter {
        fn on_roll(&mut self, _unit: UnitId, _value: u32) {
            self.rolls += 1;
        }

        fn on_attack(&mut self, _a: UnitId, _t: UnitId, _d: u32, _k: bool) {
            self.attacks += 1;
        }

        fn on_phase_change(&mut self, phase: BattlePhase) {
            self.phases.push(phase);
        }
    }

    #[test]
    fn test_dispatch_routes_to_callbacks() {
        let mut counter = Counter::default();
        let events = [
            BattleEventType::PhaseChanged {
                phase: BattlePhase::Tactics,
            },
            BattleEventType::Rolled {
                unit: UnitId::new(),
                value: 3,
            },
            BattleEventType::Boosted {
                unit: UnitId::new(),
                value: 7,
            },
            BattleEventType::Attacked {
                attacker: UnitId::new(),
                target: UnitId::new(),
                damage: 3,
                knocked_out: false,
            },
        ];
        for event in &events {
            event.dispatch(&mut counter);
        }

        assert_eq!(counter.rolls, 1);
        assert_eq!(counter.attacks, 1);
        assert_eq!(counter.phases, vec![BattlePhase::Tactics]);
    }

    #[test]
    fn test_log_filters() {
        let mut log = BattleEventLog::new();
        log.push(
            BattleEventType::Rolled {
                unit: UnitId::new(),
                value: 2,
            },
            1,
        );
        log.push(
            BattleEventType::Attacked {
                attacker: UnitId::new(),
                target: UnitId::new(),
                damage: 2,
                knocked_out: true,
            },
            1,
        );
        log.push(
            BattleEventType::PhaseChanged {
                phase: BattlePhase::Tactics,
            },
            2,
        );

        assert_eq!(log.len(), 3);
        assert_eq!(log.attacks().count(), 1);
        assert_eq!(log.in_round(1).count(), 2);
        assert_eq!(log.in_round(2).count(), 1);
    }
}
