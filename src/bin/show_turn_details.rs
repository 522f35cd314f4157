// Prints one recorded turn: the board, the recorded move, and the engine's
// reasoning for that snapshot.
//
// Usage:
//   cargo run --bin show_turn_details -- <log_file.jsonl> <turn_number> [game_id]

use std::process;

use battlesnake_strategist::ascii;
use battlesnake_strategist::config::Config;
use battlesnake_strategist::engine;
use battlesnake_strategist::replay::ReplayEngine;
use battlesnake_strategist::trace::DebugTrace;

fn print_trace(trace: &DebugTrace) {
    println!(
        "Mode: {:?} (health={}, length={}, threshold={:.1})",
        trace.mode, trace.health, trace.length, trace.effective_threshold
    );
    if let Some(food) = trace.food_target {
        println!("Food target: ({}, {})", food.x, food.y);
    }
    if let Some(target) = trace.aggression_target {
        println!("Hunting toward: ({}, {})", target.x, target.y);
    }
    println!();

    for m in &trace.moves {
        match (&m.rejected_reason, &m.evaluation) {
            (Some(reason), _) => println!("  {:<6} rejected: {:?}", m.direction.as_str(), reason),
            (None, Some(eval)) => println!(
                "  {:<6} score={:>8.1} area={:<3} escapes={} risk={:?}",
                m.direction.as_str(),
                eval.score,
                eval.area,
                eval.escape_routes,
                m.collision_risk
            ),
            (None, None) => println!("  {:<6} (not scored)", m.direction.as_str()),
        }
    }
    println!();
    println!(
        "Decision: {} [{:?}] {}",
        trace.decision.direction, trace.decision.tier, trace.decision.reason
    );
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: show_turn_details <log_file.jsonl> <turn_number> [game_id]");
        process::exit(1);
    }

    let target_turn: i32 = match args[2].parse() {
        Ok(turn) => turn,
        Err(_) => {
            eprintln!("Turn must be a number");
            process::exit(1);
        }
    };
    let game_filter = args.get(3);

    let config = Config::load_or_default();
    let loader = ReplayEngine::new(config.base_strategy(), false);
    let records = match loader.load_log_file(&args[1]) {
        Ok(records) => records,
        Err(e) => {
            eprintln!("Error loading log file: {}", e);
            process::exit(1);
        }
    };

    let Some(record) = records.iter().find(|r| {
        r.turn == target_turn && !r.is_end() && game_filter.map_or(true, |g| &r.game_id == g)
    }) else {
        eprintln!("Turn {} not found", target_turn);
        process::exit(1);
    };

    println!("═══════════════════════════════════════════════════════════");
    println!("              TURN {} FULL DETAILS", record.turn);
    println!("═══════════════════════════════════════════════════════════\n");

    println!("Game: {} (bot '{}')", record.game_id, record.bot);
    println!(
        "Our Snake: {} (health={})",
        record.request.you.name, record.request.you.health
    );
    if let Some(chosen) = record.chosen_move {
        println!("Recorded move: {}", chosen);
    }
    println!();
    print!("{}", ascii::render(&record.request));
    println!();

    // Prefer the trace captured live; otherwise recompute it
    let trace = match &record.trace {
        Some(trace) => trace.clone(),
        None => match engine::decide(&record.request, loader.strategy(), true).trace {
            Some(trace) => trace,
            None => {
                eprintln!("Engine produced no trace");
                process::exit(1);
            }
        },
    };
    print_trace(&trace);
}
