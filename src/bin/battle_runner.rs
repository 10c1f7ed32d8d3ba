//! Headless Battle Runner
//!
//! Plays complete battles with an automatic boost policy and outputs
//! per-battle results plus a summary as JSON or text.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use clap::{Parser, ValueEnum};
use open_battle_tactics::battle::{
    wheel, BattleController, BattleEventSink, BattlePhase, VictoryOutcome, BOOST_COST,
};
use open_battle_tactics::core::error::Result;
use open_battle_tactics::core::types::{Team, UnitId};
use open_battle_tactics::core::{load_config, BattleConfig};
use open_battle_tactics::roster::{load_roster, Roster};
use rayon::prelude::*;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// How the runner spends action points during tactics
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BoostPolicy {
    /// Never boost
    #[value(name = "none")]
    Off,
    /// Boost the units that gain the most over their current roll
    Strongest,
}

/// Headless Battle Runner - automatic battles for balance checks
#[derive(Parser, Debug)]
#[command(name = "battle_runner")]
#[command(about = "Play headless battles and report outcomes")]
struct Args {
    /// Battle configuration file
    #[arg(long, default_value = "data/battle.toml")]
    config: PathBuf,

    /// Unit roster file
    #[arg(long, default_value = "data/units.toml")]
    roster: PathBuf,

    /// Base random seed; battle i uses seed + i
    #[arg(long)]
    seed: Option<u64>,

    /// Number of battles to play
    #[arg(long, default_value_t = 1)]
    battles: u32,

    /// Rounds before a battle is called a timeout
    #[arg(long, default_value_t = 200)]
    max_rounds: u32,

    /// Boost policy for the player side
    #[arg(long, value_enum, default_value_t = BoostPolicy::Strongest)]
    boost: BoostPolicy,

    /// Let initiative ignore team and use wheel values only
    #[arg(long)]
    no_player_priority: bool,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Enable debug battle logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// Per-battle counters fed by the event sink
#[derive(Debug, Default)]
struct BattleStats {
    attacks: u32,
    damage_dealt: u32,
    knockouts: u32,
    boosts: u32,
}

struct StatsSink(Rc<RefCell<BattleStats>>);

impl BattleEventSink for StatsSink {
    fn on_boost(&mut self, _unit: UnitId, _value: u32) {
        self.0.borrow_mut().boosts += 1;
    }

    fn on_attack(&mut self, _attacker: UnitId, _target: UnitId, damage: u32, knocked_out: bool) {
        let mut stats = self.0.borrow_mut();
        stats.attacks += 1;
        stats.damage_dealt += damage;
        if knocked_out {
            stats.knockouts += 1;
        }
    }
}

/// JSON output for one battle
#[derive(Debug, Serialize)]
struct BattleResult {
    seed: u64,
    outcome: String,
    rounds: u32,
    attacks: u32,
    damage_dealt: u32,
    knockouts: u32,
    boosts: u32,
    player_survivors: usize,
    enemy_survivors: usize,
}

/// JSON output for the whole run
#[derive(Debug, Serialize)]
struct RunSummary {
    battles: usize,
    player_wins: usize,
    enemy_wins: usize,
    draws: usize,
    timeouts: usize,
    average_rounds: f32,
    boost_policy: String,
    player_priority: bool,
    results: Vec<BattleResult>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        "open_battle_tactics=debug"
    } else {
        "open_battle_tactics=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let mut config = load_config(&args.config).unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config {:?}: {}", args.config, e);
        eprintln!("Using default configuration");
        BattleConfig::default()
    });
    if args.no_player_priority {
        config.player_always_starts = false;
    }

    let roster = load_roster(&args.roster).unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load roster {:?}: {}", args.roster, e);
        eprintln!("Every unit will use the fallback definition");
        Roster::new()
    });

    let base_seed = args.seed.or(config.seed).unwrap_or_else(rand::random);

    let results = (0..args.battles)
        .into_par_iter()
        .map(|i| run_battle(&config, &roster, base_seed.wrapping_add(u64::from(i)), &args))
        .collect::<Result<Vec<_>>>()?;

    let summary = summarize(results, &args, config.player_always_starts);

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_text(&summary);
    }
    Ok(())
}

fn run_battle(config: &BattleConfig, roster: &Roster, seed: u64, args: &Args) -> Result<BattleResult> {
    let config = BattleConfig {
        seed: Some(seed),
        ..config.clone()
    };
    let mut controller = BattleController::from_config(config, roster)?;

    let stats = Rc::new(RefCell::new(BattleStats::default()));
    controller.subscribe(Box::new(StatsSink(Rc::clone(&stats))));

    while controller.phase() != BattlePhase::Victory && controller.round() <= args.max_rounds {
        if args.boost == BoostPolicy::Strongest {
            boost_strongest(&mut controller)?;
        }
        controller.fight()?;
    }

    let outcome = match controller.outcome() {
        Some(outcome) => outcome.to_string(),
        None => "timeout".to_string(),
    };
    let state = controller.state();
    let stats = stats.borrow();

    Ok(BattleResult {
        seed,
        outcome,
        rounds: controller.round(),
        attacks: stats.attacks,
        damage_dealt: stats.damage_dealt,
        knockouts: stats.knockouts,
        boosts: stats.boosts,
        player_survivors: state.living_count(Team::Player),
        enemy_survivors: state.living_count(Team::Enemy),
    })
}

/// Spend all action points on the living player units that gain the most
fn boost_strongest(controller: &mut BattleController) -> Result<()> {
    let mut candidates = Vec::new();
    for unit in controller.state().team(Team::Player) {
        if !unit.is_alive() || unit.is_boosted {
            continue;
        }
        let gain = wheel::boost(&unit.definition)?.saturating_sub(unit.wheel_value);
        if gain > 0 {
            candidates.push((gain, unit.id));
        }
    }
    candidates.sort_by(|a, b| b.0.cmp(&a.0));

    for (_, unit_id) in candidates {
        if controller.action_points() < BOOST_COST {
            break;
        }
        controller.request_boost(unit_id)?;
    }
    Ok(())
}

fn summarize(results: Vec<BattleResult>, args: &Args, player_priority: bool) -> RunSummary {
    let count = |name: &str| results.iter().filter(|r| r.outcome == name).count();
    let total_rounds: u32 = results.iter().map(|r| r.rounds).sum();

    RunSummary {
        battles: results.len(),
        player_wins: count(&VictoryOutcome::Player.to_string()),
        enemy_wins: count(&VictoryOutcome::Enemy.to_string()),
        draws: count(&VictoryOutcome::Draw.to_string()),
        timeouts: count("timeout"),
        average_rounds: if results.is_empty() {
            0.0
        } else {
            total_rounds as f32 / results.len() as f32
        },
        boost_policy: match args.boost {
            BoostPolicy::Off => "none".to_string(),
            BoostPolicy::Strongest => "strongest".to_string(),
        },
        player_priority,
        results,
    }
}

fn print_text(summary: &RunSummary) {
    for r in &summary.results {
        println!(
            "seed {:>20}  {:<7} rounds {:>3}  attacks {:>3}  KOs {:>2}  boosts {:>2}  survivors {}v{}",
            r.seed,
            r.outcome,
            r.rounds,
            r.attacks,
            r.knockouts,
            r.boosts,
            r.player_survivors,
            r.enemy_survivors
        );
    }
    println!();
    println!(
        "{} battles: player {} / enemy {} / draw {} / timeout {}  (avg {:.1} rounds, boost {}, player priority {})",
        summary.battles,
        summary.player_wins,
        summary.enemy_wins,
        summary.draws,
        summary.timeouts,
        summary.average_rounds,
        summary.boost_policy,
        summary.player_priority
    );
}
