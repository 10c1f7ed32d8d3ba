//! Open Battle Tactics - Entry Point
//!
//! Terminal front-end for the battle engine. It loads the configured
//! lineups, prints the battlefield, and turns typed commands into boost,
//! advance and restart intents.

use open_battle_tactics::battle::{BattleController, BattleEventType, BattlePhase, BattleUnit};
use open_battle_tactics::core::error::Result;
use open_battle_tactics::core::types::{Team, UnitId};
use open_battle_tactics::core::{load_config, BattleConfig};
use open_battle_tactics::roster::{load_roster, Roster};

use std::io::{self, Write};
use std::path::Path;
use tracing_subscriber::EnvFilter;

const CONFIG_PATH: &str = "data/battle.toml";
const ROSTER_PATH: &str = "data/units.toml";

fn main() -> Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("open_battle_tactics=warn")),
        )
        .init();

    let config = load_config(Path::new(CONFIG_PATH)).unwrap_or_else(|e| {
        tracing::warn!("Failed to load {}: {} - using defaults", CONFIG_PATH, e);
        BattleConfig::default()
    });
    let roster = load_roster(Path::new(ROSTER_PATH)).unwrap_or_else(|e| {
        tracing::warn!("Failed to load {}: {} - every unit uses the fallback", ROSTER_PATH, e);
        Roster::new()
    });

    let mut controller = BattleController::from_config(config, &roster)?;

    println!("\n=== OPEN BATTLE TACTICS ===");
    print_help();

    let mut printed = 0;
    loop {
        printed = print_new_events(&controller, printed);
        display_status(&controller);

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let mut words = input.split_whitespace();
        let command = words.next().unwrap_or_default();
        match command {
            "quit" | "q" => break,
            "help" | "h" => print_help(),
            "status" | "s" => {}
            "boost" | "b" => match words.next().and_then(|w| w.parse::<usize>().ok()) {
                Some(slot) => boost_slot(&mut controller, slot),
                None => println!("Usage: boost <slot>"),
            },
            "fight" | "f" => match controller.phase() {
                BattlePhase::Tactics => {
                    controller.fight()?;
                }
                // Finish a phase already started with `step`
                BattlePhase::Combat => {
                    controller.run_combat()?;
                }
                BattlePhase::Victory => println!("The battle is over. Type 'restart' for a new one."),
            },
            "step" | "n" => match controller.phase() {
                BattlePhase::Tactics => {
                    controller.advance_phase();
                }
                BattlePhase::Combat => {
                    controller.resolve_next_attack()?;
                }
                BattlePhase::Victory => println!("The battle is over. Type 'restart' for a new one."),
            },
            "restart" | "r" => {
                controller.restart_battle()?;
                printed = 0;
                println!("\n--- NEW BATTLE ---");
            }
            other => println!("Unknown command '{}'. Type 'help' for commands.", other),
        }
    }

    println!("Goodbye, commander.");
    Ok(())
}

fn print_help() {
    println!();
    println!("Commands:");
    println!("  boost <n> / b <n>  - Spend 1 AP to boost player unit in slot n");
    println!("  fight / f          - Engage: resolve the whole combat phase");
    println!("  step / n           - Engage, or resolve a single attack");
    println!("  status / s         - Show the battlefield");
    println!("  restart / r        - Start a fresh battle");
    println!("  quit / q           - Exit");
    println!();
}

fn boost_slot(controller: &mut BattleController, slot: usize) {
    let Some(unit_id) = slot
        .checked_sub(1)
        .and_then(|index| controller.unit_at(Team::Player, index))
        .map(|u| u.id)
    else {
        println!("No player unit in slot {}", slot);
        return;
    };

    if let Err(e) = controller.request_boost(unit_id) {
        println!("Rejected: {}", e);
    }
}

fn label(controller: &BattleController, unit_id: UnitId) -> String {
    match controller.unit(unit_id) {
        Some(unit) => {
            let side = if unit.is_player() { "P" } else { "E" };
            format!("{} [{}{}]", unit.name(), side, unit.slot + 1)
        }
        None => "unknown unit".to_string(),
    }
}

/// Print events logged since index `from`; returns the new cursor
fn print_new_events(controller: &BattleController, from: usize) -> usize {
    let log = controller.event_log();
    for event in log.iter().skip(from) {
        match event.event_type {
            BattleEventType::PhaseChanged { phase } => {
                println!("\n== ROUND {} - {:?} ==", event.round, phase)
            }
            // Rolls are visible in the status table
            BattleEventType::Rolled { .. } => {}
            BattleEventType::Boosted { unit, value } => {
                println!("{} OVERCLOCKED to {}!", label(controller, unit), value)
            }
            BattleEventType::Attacked {
                attacker,
                target,
                damage,
                knocked_out,
            } => {
                println!(
                    "{} hits {} for {}{}",
                    label(controller, attacker),
                    label(controller, target),
                    damage,
                    if knocked_out { " - DESTROYED" } else { "" }
                );
            }
            BattleEventType::BattleEnded { outcome } => {
                println!("\n*** BATTLE OVER: {} ***", outcome.to_string().to_uppercase())
            }
        }
    }
    log.len()
}

fn wheel_display(unit: &BattleUnit) -> String {
    if !unit.is_alive() {
        "KO".to_string()
    } else if !unit.has_rolled() {
        "?".to_string()
    } else if unit.is_boosted {
        format!("{}!", unit.wheel_value)
    } else {
        unit.wheel_value.to_string()
    }
}

fn display_status(controller: &BattleController) {
    let state = controller.state();
    let economy = state.economy;
    let pips: String = (0..economy.max())
        .map(|i| if i < economy.current() { '*' } else { '.' })
        .collect();

    println!();
    println!(
        "Round {} | Phase: {:?} | AP: [{}] {}/{}",
        state.round,
        state.phase,
        pips,
        economy.current(),
        economy.max()
    );
    for team in [Team::Player, Team::Enemy] {
        println!("  {}:", if team == Team::Player { "PLAYER" } else { "ENEMY" });
        for unit in state.team(team) {
            let faces: Vec<String> = unit.definition.wheel_values.iter().map(|v| v.to_string()).collect();
            println!(
                "    {}. {:<10} {:>3}/{:<3} wheel {:>3}   [{}]",
                unit.slot + 1,
                unit.name(),
                unit.health(),
                unit.max_health(),
                wheel_display(unit),
                faces.join(" ")
            );
        }
    }
}
