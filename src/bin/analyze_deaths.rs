//! Death Pattern Analysis Tool
//!
//! Reads turn logs and reports, per game, who won, who died, how and to whom.
//!
//! Usage:
//!   cargo run --release --bin analyze_deaths -- <log_file_or_directory>
//!
//! Output:
//!   - Per-game participant summaries
//!   - Death cause totals
//!   - Win/loss/draw record per snake

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use battlesnake_strategist::outcome::{summarize_games, GameResult, GameSummary};
use battlesnake_strategist::replay::ReplayEngine;
use battlesnake_strategist::strategy::StrategyConfig;
use battlesnake_strategist::turn_log::TurnRecord;

fn log_files(path: &Path) -> Result<Vec<PathBuf>, String> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files: Vec<PathBuf> = fs::read_dir(path)
        .map_err(|e| format!("Failed to read directory: {}", e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("jsonl"))
        .collect();
    files.sort();
    Ok(files)
}

fn load_records(files: &[PathBuf]) -> Vec<TurnRecord> {
    let loader = ReplayEngine::new(StrategyConfig::default(), false);
    let mut records = Vec::new();
    for file in files {
        match loader.load_log_file(file) {
            Ok(mut recs) => records.append(&mut recs),
            Err(e) => eprintln!("Skipping {}: {}", file.display(), e),
        }
    }
    records
}

fn print_game(summary: &GameSummary) {
    let status = if summary.finished { "finished" } else { "in progress" };
    println!(
        "{} ({} after turn {})",
        summary.game_id, status, summary.last_turn
    );

    for p in &summary.participants {
        let result = p
            .result
            .map(|r| format!("{:?}", r))
            .unwrap_or_else(|| "-".to_string());
        print!(
            "  {:<16} {:<5} turns={:<4} length={:<3} health={:<3} kills={} food={}",
            p.name, result, p.turns_survived, p.final_length, p.final_health, p.kills, p.food_eaten
        );
        if let Some(cause) = p.death_cause {
            print!("  died: {}", cause.as_str());
            if let Some(killer) = &p.killed_by {
                print!(" (by {})", killer);
            }
        }
        println!();
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <log_file_or_directory>", args[0]);
        eprintln!("Example: {} battlesnake_turns.jsonl", args[0]);
        std::process::exit(1);
    }

    let files = match log_files(Path::new(&args[1])) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("============================================================");
    println!("Death Pattern Analysis");
    println!("============================================================");
    println!();
    println!("Analyzing {} log file(s)", files.len());
    println!();

    let records = load_records(&files);
    let games = summarize_games(&records);

    for game in &games {
        print_game(game);
    }
    println!();

    let mut by_cause: BTreeMap<&str, usize> = BTreeMap::new();
    let mut record: BTreeMap<&str, (usize, usize, usize)> = BTreeMap::new();
    for p in games.iter().flat_map(|g| g.participants.iter()) {
        if let Some(cause) = p.death_cause {
            *by_cause.entry(cause.as_str()).or_default() += 1;
        }
        let entry = record.entry(p.name.as_str()).or_default();
        match p.result {
            Some(GameResult::Win) => entry.0 += 1,
            Some(GameResult::Loss) => entry.1 += 1,
            Some(GameResult::Draw) => entry.2 += 1,
            None => {}
        }
    }

    println!("============================================================");
    println!("DEATH CAUSES");
    println!("============================================================");
    for (cause, count) in &by_cause {
        println!("{:<20} {}", cause, count);
    }
    println!();

    println!("============================================================");
    println!("RECORD (W-L-D)");
    println!("============================================================");
    for (name, (wins, losses, draws)) in &record {
        println!("{:<20} {}-{}-{}", name, wins, losses, draws);
    }
    println!("============================================================");
}
