// Standalone replay tool for re-deciding recorded Battlesnake turns
//
// Usage:
//   cargo run --bin replay -- <log_file> [options]
//
// Options:
//   --all                  Replay all turns
//   --turns <turn1,turn2>  Replay specific turns (comma-separated)
//   --validate             Check recorded moves against expected ones
//   --bot <slug>           Replay with the strategy of a configured bot
//   --set <name=value>     Override one strategy parameter (repeatable)
//   --verbose              Show detailed output for each turn
//   --config <path>        Path to Snake.toml (default: Snake.toml)

use serde_json::{Map, Value};
use std::env;
use std::process;

use battlesnake_strategist::config::Config;
use battlesnake_strategist::replay::ReplayEngine;
use battlesnake_strategist::strategy::resolve;
use battlesnake_strategist::types::Direction;

fn print_usage() {
    eprintln!("Battlesnake Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <log_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --all                   Replay all turns in the log");
    eprintln!("  --turns <T1,T2,...>     Replay specific turns (comma-separated)");
    eprintln!("  --validate <T:M,...>    Validate expected moves (format: turn:move,...)");
    eprintln!("  --bot <slug>            Use the strategy of a [[bots]] profile");
    eprintln!("  --set <name=value>      Override a strategy parameter (repeatable)");
    eprintln!("  --verbose               Show detailed output for each turn");
    eprintln!("  --config <path>         Path to Snake.toml (default: Snake.toml)");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  # Replay all turns");
    eprintln!("  replay battlesnake_turns.jsonl --all");
    eprintln!();
    eprintln!("  # Would a hungrier snake have moved differently?");
    eprintln!("  replay battlesnake_turns.jsonl --all --set healthThreshold=60");
    eprintln!();
    eprintln!("  # Validate expected moves");
    eprintln!("  replay battlesnake_turns.jsonl --validate 5:up,10:right|down");
}

fn parse_turns(s: &str) -> Result<Vec<i32>, String> {
    s.split(',')
        .map(|t| {
            t.trim()
                .parse::<i32>()
                .map_err(|e| format!("Invalid turn number '{}': {}", t, e))
        })
        .collect()
}

fn parse_expected_moves(s: &str) -> Result<Vec<(i32, Vec<Direction>)>, String> {
    s.split(',')
        .map(|pair| {
            let (turn, moves) = pair
                .trim()
                .split_once(':')
                .ok_or_else(|| format!("Invalid format '{}'. Expected 'turn:move'", pair))?;

            let turn = turn
                .parse::<i32>()
                .map_err(|e| format!("Invalid turn number '{}': {}", turn, e))?;

            // Support multiple acceptable moves separated by '|'
            let moves = moves
                .split('|')
                .map(|m| m.trim().parse::<Direction>())
                .collect::<Result<Vec<_>, _>>()?;

            Ok((turn, moves))
        })
        .collect()
}

/// `name=value` into the override map. Values stay strings; coercion happens in resolve.
fn parse_override(s: &str, overrides: &mut Map<String, Value>) -> Result<(), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid override '{}'. Expected 'name=value'", s))?;
    overrides.insert(name.trim().to_string(), Value::String(value.trim().to_string()));
    Ok(())
}

enum Mode {
    All,
    Turns(String),
    Validate(String),
}

fn next_arg(args: &[String], i: usize, flag: &str) -> String {
    match args.get(i + 1) {
        Some(value) => value.clone(),
        None => {
            eprintln!("Error: {} requires an argument", flag);
            process::exit(1);
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(if args.contains(&"--help".to_string()) {
            0
        } else {
            1
        });
    }

    let log_file = &args[1];
    let mut config_path = "Snake.toml".to_string();
    let mut bot_slug: Option<String> = None;
    let mut overrides = Map::new();
    let mut verbose = false;
    let mut mode = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--all" => mode = Some(Mode::All),
            "--turns" => {
                mode = Some(Mode::Turns(next_arg(&args, i, "--turns")));
                i += 1;
            }
            "--validate" => {
                mode = Some(Mode::Validate(next_arg(&args, i, "--validate")));
                i += 1;
            }
            "--config" => {
                config_path = next_arg(&args, i, "--config");
                i += 1;
            }
            "--bot" => {
                bot_slug = Some(next_arg(&args, i, "--bot"));
                i += 1;
            }
            "--set" => {
                if let Err(e) = parse_override(&next_arg(&args, i, "--set"), &mut overrides) {
                    eprintln!("Error: {}", e);
                    process::exit(1);
                }
                i += 1;
            }
            "--verbose" => verbose = true,
            _ => {
                eprintln!("Error: Unknown option '{}'", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let Some(mode) = mode else {
        eprintln!("Error: Must specify --all, --turns, or --validate");
        print_usage();
        process::exit(1);
    };

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        eprintln!("Using default configuration");
        Config::default_hardcoded()
    });

    let base = match &bot_slug {
        Some(slug) => match config.bots.iter().find(|b| &b.slug == slug) {
            Some(profile) => config.strategy_for(profile),
            None => {
                eprintln!("Error: No bot '{}' in {}", slug, config_path);
                process::exit(1);
            }
        },
        None => config.base_strategy(),
    };
    let strategy = resolve(&base, &overrides);

    println!("Loaded configuration from: {}", config_path);
    println!("Replay log file: {}", log_file);
    if !overrides.is_empty() {
        println!("Strategy overrides: {}", Value::Object(overrides.clone()));
    }
    println!();

    let engine = ReplayEngine::new(strategy, verbose);

    let records = match engine.load_log_file(log_file) {
        Ok(records) => records,
        Err(e) => {
            eprintln!("Error loading log file: {}", e);
            process::exit(1);
        }
    };

    if records.is_empty() {
        eprintln!("Error: Log file is empty");
        process::exit(1);
    }

    println!("Loaded {} turn records\n", records.len());

    match mode {
        Mode::All => {
            let results = engine.replay_all(&records);
            println!("Replayed {} turns\n", results.len());
            engine.print_report(&results);
        }
        Mode::Turns(turn_arg) => {
            let turns = match parse_turns(&turn_arg) {
                Ok(t) => t,
                Err(e) => {
                    eprintln!("Error parsing turns: {}", e);
                    process::exit(1);
                }
            };

            println!("Replaying {} specific turn(s)...\n", turns.len());
            match engine.replay_turns(&records, &turns) {
                Ok(results) => engine.print_report(&results),
                Err(e) => {
                    eprintln!("Error during replay: {}", e);
                    process::exit(1);
                }
            }
        }
        Mode::Validate(validate_arg) => {
            let expected_moves = match parse_expected_moves(&validate_arg) {
                Ok(m) => m,
                Err(e) => {
                    eprintln!("Error parsing expected moves: {}", e);
                    process::exit(1);
                }
            };

            println!("Validating {} expected move(s)...\n", expected_moves.len());
            match engine.validate_expected_moves(&records, &expected_moves) {
                Ok(()) => println!("✓ All expected moves validated successfully!"),
                Err(e) => {
                    eprintln!("✗ Validation failed: {}", e);
                    process::exit(1);
                }
            }
        }
    }
}
