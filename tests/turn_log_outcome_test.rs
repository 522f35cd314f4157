// Turn log persistence feeding the offline tools
//
// Records go through the async TurnLogger to a JSONL file, then come back
// through the replay loader and the game outcome summary.

use std::path::PathBuf;
use std::time::Duration;

use battlesnake_strategist::ascii;
use battlesnake_strategist::outcome::{summarize_games, DeathCause, GameResult};
use battlesnake_strategist::replay::ReplayEngine;
use battlesnake_strategist::strategy::StrategyConfig;
use battlesnake_strategist::turn_log::{TurnLogger, TurnRecord};
use battlesnake_strategist::types::{Direction, GameState};

fn temp_log(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("{}_{}.jsonl", name, std::process::id()));
    let _ = std::fs::remove_file(&path);
    path
}

async fn wait_for_lines(path: &PathBuf, expected: usize) -> usize {
    for _ in 0..100 {
        let lines = std::fs::read_to_string(path)
            .map(|s| s.lines().filter(|l| !l.trim().is_empty()).count())
            .unwrap_or(0);
        if lines >= expected {
            return lines;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    0
}

/// Our snake hugs the left wall and steps off the board on turn 0
fn wall_death_game() -> (GameState, GameState) {
    let start = ascii::parse(
        "
        ....
        Y.Aa
        ....
        ",
    )
    .unwrap();

    let mut end = start.clone();
    end.turn = 1;
    end.board.snakes.retain(|s| s.id != ascii::YOU_ID);
    (start, end)
}

#[tokio::test]
async fn test_logged_game_round_trips_into_summary() {
    let path = temp_log("turn_log_outcome");
    let logger = TurnLogger::new(true, &path).await;
    assert!(logger.is_enabled());

    let (start, end) = wall_death_game();
    logger.record(TurnRecord::for_move("default", start, Direction::Left, None));
    logger.record(TurnRecord::for_end("default", end));

    assert_eq!(wait_for_lines(&path, 2).await, 2);

    let loader = ReplayEngine::new(StrategyConfig::default(), false);
    let records = loader.load_log_file(&path).unwrap();
    assert_eq!(records.len(), 2);
    assert!(records[1].is_end());

    let games = summarize_games(&records);
    assert_eq!(games.len(), 1);
    let game = &games[0];
    assert!(game.finished);
    assert_eq!(game.last_turn, 1);

    let us = game.participant(ascii::YOU_ID).unwrap();
    assert_eq!(us.result, Some(GameResult::Loss));
    assert_eq!(us.death_cause, Some(DeathCause::WallCollision));
    assert_eq!(us.killed_by, None);

    let enemy = game.participant(&ascii::enemy_id('A')).unwrap();
    assert_eq!(enemy.result, Some(GameResult::Win));
    assert_eq!(enemy.death_cause, None);

    // The engine would not have walked into the wall
    let replayed = loader.replay_all(&records);
    assert_eq!(replayed.len(), 1);
    assert_ne!(replayed[0].replayed_move, Direction::Left);
    assert!(!replayed[0].matches);

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_disabled_logger_writes_nothing() {
    let path = temp_log("turn_log_disabled");
    let logger = TurnLogger::new(false, &path).await;
    assert!(!logger.is_enabled());

    let (start, _) = wall_death_game();
    logger.record(TurnRecord::for_move("default", start, Direction::Up, None));
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(!path.exists());
}

#[test]
fn test_unfinished_game_has_no_winner() {
    let (start, _) = wall_death_game();
    let records = vec![TurnRecord::for_move("default", start, Direction::Down, None)];

    let games = summarize_games(&records);
    assert!(!games[0].finished);
    assert!(games[0].participants.iter().all(|p| p.result.is_none()));
}
