// Bot registry and move deadline behavior
//
// Bots come from Snake.toml profiles or explicit registration. A brain that
// misses the deadline is answered for by the quick fallback move.

use std::sync::Arc;
use std::time::{Duration, Instant};

use battlesnake_strategist::ascii;
use battlesnake_strategist::bot::respond_to_move;
use battlesnake_strategist::brain::{BotRegistry, SnakeBrain};
use battlesnake_strategist::config::Config;
use battlesnake_strategist::engine::{fallback_direction, Decision};
use battlesnake_strategist::types::{Direction, GameState, InfoResponse};

fn open_board() -> GameState {
    ascii::parse(
        "
        .....
        .....
        ..Y..
        ..y..
        .....
        ",
    )
    .unwrap()
}

#[test]
fn test_profiles_from_snake_toml() {
    let config = Config::from_file("Snake.toml").expect("Snake.toml should be parseable");
    let registry = BotRegistry::from_config(&config);

    assert_eq!(registry.slugs(), vec!["default", "grower", "hunter"]);
    assert_eq!(registry.get("hunter").unwrap().info().color, "#C0392B");
    assert_eq!(
        registry.get("grower").unwrap().info().author,
        config.appearance.author
    );
    assert!(registry.get("nobody").is_none());

    let state = open_board();
    let default_trace = registry.default_bot().unwrap().decide_move(&state).trace.unwrap();
    let hunter_trace = registry.get("hunter").unwrap().decide_move(&state).trace.unwrap();
    let grower_trace = registry.get("grower").unwrap().decide_move(&state).trace.unwrap();

    assert_eq!(default_trace.strategy.aggression, 0.0);
    assert_eq!(hunter_trace.strategy.aggression, 0.7);
    assert_eq!(hunter_trace.strategy.trapping_aggression, 1.0);
    assert_eq!(grower_trace.strategy.target_lead, 4);
    assert_eq!(grower_trace.strategy.food_weight, 1.5);
}

struct SlowBrain;

impl SnakeBrain for SlowBrain {
    fn info(&self) -> InfoResponse {
        Config::default_hardcoded().appearance.to_info()
    }

    fn decide_move(&self, _state: &GameState) -> Decision {
        std::thread::sleep(Duration::from_millis(300));
        Decision {
            direction: Direction::Down,
            trace: None,
        }
    }
}

#[tokio::test]
async fn test_slow_brain_falls_back_within_budget() {
    let registry = BotRegistry::new();
    registry.register("slow", Arc::new(SlowBrain));

    let state = open_board();
    let expected = fallback_direction(&state);
    assert_eq!(expected, Direction::Up);

    let start = Instant::now();
    let (response, trace) = respond_to_move(registry.get("slow").unwrap(), state, 30).await;

    assert!(start.elapsed() < Duration::from_millis(250));
    assert_eq!(response.direction, expected);
    assert!(trace.is_none());
}

#[tokio::test]
async fn test_registered_bot_replaces_previous() {
    let config = Config::default_hardcoded();
    let registry = BotRegistry::from_config(&config);
    registry.register("default", Arc::new(SlowBrain));

    assert_eq!(registry.slugs(), vec!["default"]);
    let (response, _) = respond_to_move(registry.default_bot().unwrap(), open_board(), 1_000).await;
    assert_eq!(response.direction, Direction::Down);
}
