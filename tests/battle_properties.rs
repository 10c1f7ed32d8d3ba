//! Property tests for initiative ordering, damage bounds and full battles

use std::sync::Arc;

use open_battle_tactics::battle::*;
use open_battle_tactics::core::types::{DefinitionId, Team, UnitId};
use open_battle_tactics::core::BattleConfig;
use open_battle_tactics::roster::UnitDefinition;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn unit(team: Team, slot: usize, wheel_value: u32) -> BattleUnit {
    let definition = Arc::new(UnitDefinition::new(DefinitionId(1), "Prop", 10, vec![1]));
    let mut unit = BattleUnit::new(definition, team, slot);
    unit.set_roll(wheel_value);
    unit
}

fn lineup(specs: &[(u32, Vec<u32>)]) -> Vec<Arc<UnitDefinition>> {
    specs
        .iter()
        .enumerate()
        .map(|(i, (health, wheel))| {
            Arc::new(UnitDefinition::new(
                DefinitionId(i as u32 + 1),
                format!("Unit{}", i),
                *health,
                wheel.clone(),
            ))
        })
        .collect()
}

fn team_strategy() -> impl Strategy<Value = Vec<(u32, Vec<u32>)>> {
    prop::collection::vec(
        (1u32..60, prop::collection::vec(1u32..12, 1..6)),
        1..5,
    )
}

proptest! {
    #[test]
    fn prop_players_precede_enemies(
        players in prop::collection::vec(1u32..20, 0..6),
        enemies in prop::collection::vec(1u32..20, 0..6),
        seed in any::<u64>(),
    ) {
        let mut units = Vec::new();
        units.extend(players.iter().enumerate().map(|(i, &v)| unit(Team::Player, i, v)));
        units.extend(enemies.iter().enumerate().map(|(i, &v)| unit(Team::Enemy, i, v)));

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let order = initiative_order(&units, InitiativePolicy::default(), &mut rng);
        prop_assert_eq!(order.len(), units.len());

        let team_of = |id: UnitId| units.iter().find(|u| u.id == id).map(|u| u.team);
        let teams: Vec<_> = order.iter().map(|&id| team_of(id)).collect();
        let first_enemy = teams.iter().position(|t| *t == Some(Team::Enemy)).unwrap_or(teams.len());
        prop_assert!(teams[..first_enemy].iter().all(|t| *t == Some(Team::Player)));
        prop_assert!(teams[first_enemy..].iter().all(|t| *t == Some(Team::Enemy)));
    }

    #[test]
    fn prop_values_descend_within_team(
        values in prop::collection::vec(1u32..50, 1..10),
        seed in any::<u64>(),
    ) {
        let units: Vec<_> = values.iter().enumerate().map(|(i, &v)| unit(Team::Enemy, i, v)).collect();

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let order = initiative_order(&units, InitiativePolicy::default(), &mut rng);
        let ordered: Vec<u32> = order
            .iter()
            .filter_map(|&id| units.iter().find(|u| u.id == id))
            .map(|u| u.wheel_value)
            .collect();

        prop_assert!(ordered.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn prop_dead_units_never_act(
        values in prop::collection::vec(1u32..20, 1..8),
        dead_mask in prop::collection::vec(any::<bool>(), 8),
        seed in any::<u64>(),
    ) {
        let mut units: Vec<_> = values.iter().enumerate().map(|(i, &v)| unit(Team::Player, i, v)).collect();
        for (u, &dead) in units.iter_mut().zip(dead_mask.iter()) {
            if dead {
                u.take_damage(u.max_health());
            }
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let order = initiative_order(&units, InitiativePolicy::default(), &mut rng);
        let living = units.iter().filter(|u| u.is_alive()).count();
        prop_assert_eq!(order.len(), living);
        for id in order {
            prop_assert!(units.iter().any(|u| u.id == id && u.is_alive()));
        }
    }

    #[test]
    fn prop_health_stays_in_bounds(hits in prop::collection::vec(0u32..40, 0..20)) {
        let mut target = unit(Team::Enemy, 0, 1);
        let mut knockouts = 0;
        for hit in hits {
            let was_alive = target.is_alive();
            if target.take_damage(hit) {
                knockouts += 1;
                prop_assert!(was_alive);
            }
            prop_assert!(target.health() <= target.max_health());
        }
        prop_assert!(knockouts <= 1);
    }

    #[test]
    fn prop_battles_keep_invariants(
        player in team_strategy(),
        enemy in team_strategy(),
        seed in any::<u64>(),
        boost_slot in 0usize..4,
    ) {
        let mut controller = BattleController::with_rng(
            BattleConfig::default(),
            lineup(&player),
            lineup(&enemy),
            ChaCha8Rng::seed_from_u64(seed),
        ).unwrap();

        for _ in 0..60 {
            if controller.state().is_finished() {
                break;
            }
            let round = controller.round();
            if let Some(id) = controller.unit_at(Team::Player, boost_slot).map(|u| u.id) {
                let before = controller.action_points();
                match controller.request_boost(id) {
                    Ok(value) => {
                        prop_assert_eq!(controller.action_points(), before - BOOST_COST);
                        prop_assert_eq!(controller.unit(id).map(|u| u.wheel_value), Some(value));
                    }
                    Err(_) => {
                        prop_assert_eq!(controller.action_points(), before);
                    }
                }
            }

            prop_assert!(controller.advance_phase());
            while let Some(step) = controller.resolve_next_attack().unwrap() {
                for u in controller.state().units() {
                    prop_assert!(u.health() <= u.max_health());
                }
                if step.ends_phase() {
                    if let CombatStep::RoundComplete { next_round } = step {
                        prop_assert_eq!(next_round, round + 1);
                    }
                    break;
                }
            }
        }

        if let Some(outcome) = controller.outcome() {
            prop_assert_eq!(controller.phase(), BattlePhase::Victory);
            let players = controller.state().living_count(Team::Player);
            let enemies = controller.state().living_count(Team::Enemy);
            match outcome {
                VictoryOutcome::Player => {
                    prop_assert!(players > 0 && enemies == 0);
                }
                VictoryOutcome::Enemy => {
                    prop_assert!(enemies > 0 && players == 0);
                }
                VictoryOutcome::Draw => {
                    prop_assert!(players == 0 && enemies == 0);
                }
            }
        }
    }
}
