// Replay module for re-running the engine over recorded turns
//
// This module provides functionality to:
// 1. Parse JSONL turn logs
// 2. Re-decide each recorded snapshot with a given strategy
// 3. Compare recorded vs replayed moves
// 4. Generate match statistics and reports

use log::{info, warn};
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::engine;
use crate::strategy::StrategyConfig;
use crate::trace::{DebugTrace, Tier};
use crate::turn_log::TurnRecord;
use crate::types::Direction;

/// Result of replaying a single turn
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub game_id: String,
    pub turn: i32,
    pub original_move: Direction,
    pub replayed_move: Direction,
    pub matches: bool,
    pub tier: Option<Tier>,
    pub computation_time_us: u128,
    pub trace: Option<DebugTrace>,
}

/// Statistics for a complete replay session
#[derive(Debug, Default, PartialEq)]
pub struct ReplayStats {
    pub total_turns: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
}

/// Replay engine for analyzing turn logs
pub struct ReplayEngine {
    strategy: StrategyConfig,
    verbose: bool,
}

impl ReplayEngine {
    /// Creates a new replay engine deciding with `strategy`
    pub fn new(strategy: StrategyConfig, verbose: bool) -> Self {
        ReplayEngine { strategy, verbose }
    }

    pub fn strategy(&self) -> &StrategyConfig {
        &self.strategy
    }

    /// Loads all records from a JSONL file, end-of-game markers included
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<TurnRecord>, String> {
        let file = File::open(log_path.as_ref())
            .map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let record: TurnRecord = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            records.push(record);
        }

        info!("Loaded {} turn records", records.len());
        Ok(records)
    }

    /// Re-decides one recorded move
    pub fn replay_entry(&self, record: &TurnRecord) -> Result<ReplayResult, String> {
        let original_move = record
            .chosen_move
            .ok_or_else(|| format!("Turn {} is an end-of-game record", record.turn))?;

        let start_time = Instant::now();
        let decision = engine::decide(&record.request, &self.strategy, true);
        let computation_time_us = start_time.elapsed().as_micros();

        let replayed_move = decision.direction;
        let matches = original_move == replayed_move;
        let tier = decision.trace.as_ref().map(|t| t.decision.tier);

        if self.verbose {
            if matches {
                info!(
                    "Turn {}: MATCH - {} ({:?}, {}us)",
                    record.turn, replayed_move, tier, computation_time_us
                );
            } else {
                warn!(
                    "Turn {}: MISMATCH - Original: {}, Replayed: {} ({:?}, {}us)",
                    record.turn, original_move, replayed_move, tier, computation_time_us
                );
            }
        }

        Ok(ReplayResult {
            game_id: record.game_id.clone(),
            turn: record.turn,
            original_move,
            replayed_move,
            matches,
            tier,
            computation_time_us,
            trace: decision.trace,
        })
    }

    /// Replays every move record in parallel, keeping log order
    pub fn replay_all(&self, records: &[TurnRecord]) -> Vec<ReplayResult> {
        records
            .par_iter()
            .filter(|r| !r.is_end())
            .filter_map(|r| match self.replay_entry(r) {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!("Failed to replay turn {}: {}", r.turn, e);
                    None
                }
            })
            .collect()
    }

    /// Replays specific turns. A turn present in several games is replayed once per game.
    pub fn replay_turns(
        &self,
        records: &[TurnRecord],
        turn_numbers: &[i32],
    ) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::new();

        for turn_num in turn_numbers {
            let matching: Vec<&TurnRecord> = records
                .iter()
                .filter(|r| r.turn == *turn_num && !r.is_end())
                .collect();
            if matching.is_empty() {
                return Err(format!("Turn {} not found in log file", turn_num));
            }

            for record in matching {
                results.push(self.replay_entry(record)?);
            }
        }

        Ok(results)
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_turns = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let mismatches = total_turns - matches;
        let match_rate = if total_turns > 0 {
            (matches as f64 / total_turns as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_turns,
            matches,
            mismatches,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Turns:    {}", stats.total_turns);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("═══════════════════════════════════════════════════════════\n");

        if !results.is_empty() {
            let avg_time: f64 = results
                .iter()
                .map(|r| r.computation_time_us as f64)
                .sum::<f64>()
                / results.len() as f64;
            println!("Average Decision Time:   {:.1}us\n", avg_time);
        }

        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches).collect();
        if !mismatches.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in mismatches {
                println!(
                    "{} turn {}: {} → {} ({:?})",
                    result.game_id,
                    result.turn,
                    result.original_move,
                    result.replayed_move,
                    result.tier
                );
            }
            println!();
        }
    }

    /// Checks that the recorded moves at the given turns are among the acceptable ones
    pub fn validate_expected_moves(
        &self,
        records: &[TurnRecord],
        expected_moves: &[(i32, Vec<Direction>)],
    ) -> Result<(), String> {
        for (turn, acceptable) in expected_moves {
            let actual_move = records
                .iter()
                .find(|r| r.turn == *turn && !r.is_end())
                .and_then(|r| r.chosen_move)
                .ok_or_else(|| format!("Turn {} not found in log", turn))?;

            if !acceptable.contains(&actual_move) {
                return Err(format!(
                    "Turn {}: Expected one of {:?}, but got {}",
                    turn,
                    acceptable.iter().map(|d| d.as_str()).collect::<Vec<_>>(),
                    actual_move
                ));
            }
        }

        Ok(())
    }
}
