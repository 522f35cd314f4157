// Decision engine scenarios drawn as ASCII boards
//
// Grid space has (0,0) at the top-left, so the first line of each picture
// holds grid row 0 and "up" points toward it.

use battlesnake_strategist::ascii;
use battlesnake_strategist::engine::{decide, Decision};
use battlesnake_strategist::geometry::Pos;
use battlesnake_strategist::scoring::Mode;
use battlesnake_strategist::strategy::StrategyConfig;
use battlesnake_strategist::threat::CollisionRisk;
use battlesnake_strategist::trace::{RejectReason, Tier};
use battlesnake_strategist::types::Direction;

fn decide_picture(picture: &str) -> Decision {
    let state = ascii::parse(picture).expect("picture should parse");
    decide(&state, &StrategyConfig::default(), true)
}

#[test]
fn test_head_in_top_left_corner_rejects_walls() {
    let decision = decide_picture(
        "
        Y..
        ...
        ...
        ",
    );
    let trace = decision.trace.unwrap();

    for direction in [Direction::Up, Direction::Left] {
        let m = trace.move_for(direction).unwrap();
        assert!(!m.valid);
        assert_eq!(m.rejected_reason, Some(RejectReason::OutOfBounds));
    }
    for direction in [Direction::Down, Direction::Right] {
        assert!(trace.move_for(direction).unwrap().valid);
    }
    assert!(matches!(decision.direction, Direction::Down | Direction::Right));
    assert_eq!(trace.decision.tier, Tier::Safe);
}

#[test]
fn test_neck_above_head_is_never_chosen() {
    // Left and right are contested by equal snakes, down is open
    let decision = decide_picture(
        "
        .....
        ..y..
        A.Y.B
        a...b
        ",
    );
    let trace = decision.trace.unwrap();

    assert_ne!(decision.direction, Direction::Up);
    assert_eq!(
        trace.move_for(Direction::Up).unwrap().rejected_reason,
        Some(RejectReason::NeckCollision)
    );
}

#[test]
fn test_contested_cell_between_equal_snakes_is_a_tie() {
    let decision = decide_picture(
        "
        .....
        yY.Aa
        .....
        ",
    );
    let trace = decision.trace.unwrap();

    let contested = trace.move_for(Direction::Right).unwrap();
    assert_eq!(contested.collision_risk, Some(CollisionRisk::Tie));
    assert_eq!(CollisionRisk::Tie.level(), 2);

    assert!(trace
        .categorization
        .risky
        .iter()
        .any(|m| m.direction == Direction::Right));
    assert_eq!(trace.decision.tier, Tier::Safe);
    assert_ne!(decision.direction, Direction::Right);
}

#[test]
fn test_contested_cell_against_shorter_snake_is_safe() {
    let decision = decide_picture(
        "
        ........
        yyyyY.Aa
        ........
        ",
    );
    let trace = decision.trace.unwrap();

    let contested = trace.move_for(Direction::Right).unwrap();
    assert_eq!(contested.collision_risk, Some(CollisionRisk::Win));
    assert_eq!(CollisionRisk::Win.level(), 1);
    assert!(trace
        .categorization
        .safe
        .iter()
        .any(|m| m.direction == Direction::Right));
    assert!(trace.categorization.risky.is_empty());
}

#[test]
fn test_fully_enclosed_snake_still_answers() {
    let decision = decide_picture(
        "
        ..A..
        ..a..
        BbYcC
        ..d..
        ..D..
        ",
    );
    let trace = decision.trace.unwrap();

    assert!(trace.moves.iter().all(|m| !m.valid));
    assert_eq!(trace.decision.tier, Tier::Trapped);
    // First in-bounds direction in evaluation order
    assert_eq!(decision.direction, Direction::Up);
}

#[test]
fn test_low_health_heads_for_food() {
    let mut state = ascii::parse(
        "
        .....
        .....
        yY..F
        .....
        ",
    )
    .unwrap();
    ascii::set_health(&mut state, ascii::YOU_ID, 10);

    let decision = decide(&state, &StrategyConfig::default(), true);
    let trace = decision.trace.unwrap();

    assert_eq!(trace.mode, Mode::FoodSeeking);
    assert!(trace.food_target.is_some());
    assert_eq!(decision.direction, Direction::Right);
}

#[test]
fn test_decision_is_deterministic() {
    let picture = "
        .......
        ..F....
        .yY..A.
        .y...a.
        .......
        ";
    let first = decide_picture(picture);
    for _ in 0..5 {
        assert_eq!(decide_picture(picture).direction, first.direction);
    }
}

#[test]
fn test_neck_is_refused_even_when_it_is_the_only_way_out() {
    // Every other neighbor is an enemy body; all the open room lies past the neck
    let decision = decide_picture(
        "
        .....
        ..y..
        AaYbB
        ..c..
        ..C..
        ",
    );
    let trace = decision.trace.unwrap();

    assert_eq!(
        trace.move_for(Direction::Up).unwrap().rejected_reason,
        Some(RejectReason::NeckCollision)
    );
    for direction in [Direction::Left, Direction::Right, Direction::Down] {
        assert_eq!(
            trace.move_for(direction).unwrap().rejected_reason,
            Some(RejectReason::EnemyBody)
        );
    }
    assert_eq!(trace.decision.tier, Tier::Trapped);
    assert_eq!(decision.direction, Direction::Left);
}

#[test]
fn test_hunting_steers_toward_smaller_snake() {
    let picture = "
        .......
        .......
        .......
        A..Y...
        a..y...
        ...y...
        ...y...
        ";
    let state = ascii::parse(picture).unwrap();

    let calm = decide(&state, &StrategyConfig::default(), true);
    assert_eq!(calm.trace.unwrap().aggression_target, None);
    assert_ne!(calm.direction, Direction::Left);

    let hunter = StrategyConfig {
        aggression: 1.0,
        ..Default::default()
    };
    let decision = decide(&state, &hunter, true);
    let trace = decision.trace.unwrap();

    assert_eq!(trace.aggression_target, Some(Pos::new(0, 3)));
    assert_eq!(decision.direction, Direction::Left);

    // (98 - dist²) * aggression * 0.5 toward the enemy head
    let bonus = |d: Direction| {
        trace
            .move_for(d)
            .and_then(|m| m.evaluation.as_ref())
            .and_then(|e| e.components.aggression_bonus)
    };
    assert_eq!(bonus(Direction::Left), Some(47.0));
    assert_eq!(bonus(Direction::Up), Some(44.0));
    assert_eq!(bonus(Direction::Right), Some(41.0));
}

#[test]
fn test_food_mode_breaks_ties_toward_center() {
    let mut state = ascii::parse(
        "
        .....
        ..Y..
        ..y..
        .....
        ..F..
        ",
    )
    .unwrap();
    ascii::set_health(&mut state, ascii::YOU_ID, 10);

    // Left and right score the same before the center bonus
    let decision = decide(&state, &StrategyConfig::default(), true);
    let trace = decision.trace.unwrap();
    assert_eq!(trace.mode, Mode::FoodSeeking);
    let base = |d: Direction| {
        trace
            .move_for(d)
            .and_then(|m| m.evaluation.as_ref())
            .map(|e| e.score)
    };
    assert_eq!(base(Direction::Left), base(Direction::Right));
    assert!(trace
        .move_for(Direction::Right)
        .and_then(|m| m.evaluation.as_ref())
        .and_then(|e| e.components.center_bonus)
        .is_some());
    assert_eq!(decision.direction, Direction::Right);

    let indifferent = StrategyConfig {
        center_preference: 0.0,
        ..Default::default()
    };
    assert_eq!(decide(&state, &indifferent, false).direction, Direction::Left);
}
