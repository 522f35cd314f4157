// Move scoring
//
// Turns the space and threat measurements for one candidate cell into a single
// additive score. Every term is gated or weighted by a strategy parameter and
// recorded in a ScoreBreakdown so traces can show where a score came from.

use serde::{Deserialize, Serialize};

use crate::geometry::{self, Pos};
use crate::space;
use crate::state::{BoardState, Grid, SnakeState};
use crate::strategy::StrategyConfig;
use crate::threat;

/// Cap on the growth-adjusted health threshold
const MAX_EFFECTIVE_THRESHOLD: f64 = 95.0;
/// Threshold boost per missing length unit, before growthPriority
const GROWTH_THRESHOLD_STEP: f64 = 8.0;
/// Reachable area under which the center bonus is tripled
const CRAMPED_AREA: usize = 20;
const MIN_AGGRESSION: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    FoodSeeking,
    SpaceMaximizing,
}

/// Health threshold after the growth adjustment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub effective: f64,
    /// Length still missing to reach the target lead; None when growthPriority is off
    pub gap_from_target: Option<i32>,
    pub max_opponent_length: usize,
}

/// Raises `healthThreshold` while we are short of our target lead over the
/// longest opponent, so a lagging snake hunts food at higher health.
pub fn effective_health_threshold(
    strategy: &StrategyConfig,
    you: &SnakeState,
    board: &BoardState,
) -> Threshold {
    let max_opponent_length = board.max_opponent_length(&you.id);
    let mut effective = strategy.health_threshold as f64;
    let mut gap_from_target = None;

    if strategy.growth_priority > 0.0 {
        let gap = length_as_i64(max_opponent_length)
            .saturating_add(strategy.target_lead as i64)
            .saturating_sub(length_as_i64(you.length));
        if gap > 0 {
            let boost = gap as f64 * strategy.growth_priority * GROWTH_THRESHOLD_STEP;
            effective = (effective + boost).min(MAX_EFFECTIVE_THRESHOLD);
        }
        gap_from_target = Some(gap.clamp(i32::MIN as i64, i32::MAX as i64) as i32);
    }

    Threshold {
        effective,
        gap_from_target,
        max_opponent_length,
    }
}

fn length_as_i64(length: usize) -> i64 {
    i64::try_from(length).unwrap_or(i64::MAX)
}

pub fn select_mode(health: i32, threshold: &Threshold) -> Mode {
    if (health as f64) < threshold.effective {
        Mode::FoodSeeking
    } else {
        Mode::SpaceMaximizing
    }
}

/// Score terms for one candidate. Optional terms are None when not applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub area_term: f64,
    pub escape_bonus: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openness_bonus: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_penalty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enemy_penalty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub larger_snake_penalty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trap_penalty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lookahead_bonus: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trapping_bonus: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_bonus: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_factor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggression_bonus: Option<f64>,
}

/// Measurements and score for a candidate cell that passed the hard filters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveEvaluation {
    pub area: usize,
    pub escape_routes: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub immediate_area: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_area: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_to_food: Option<i32>,
    pub score: f64,
    pub components: ScoreBreakdown,
}

/// Everything a scoring function reads, passed explicitly
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub board: &'a BoardState,
    pub you: &'a SnakeState,
    pub grid: &'a Grid,
    pub strategy: &'a StrategyConfig,
}

impl<'a> ScoringContext<'a> {
    fn opponent_count(&self) -> usize {
        self.board.opponents(&self.you.id).count()
    }
}

/// Flat penalty for 0 or 1 escape routes, only when there is someone to trap us
pub fn trap_penalty(escape_routes: usize, opponent_count: usize, strategy: &StrategyConfig) -> f64 {
    if strategy.trap_avoidance <= 0.0 || opponent_count == 0 {
        return 0.0;
    }
    match escape_routes {
        0 => 20.0 * strategy.trap_avoidance,
        1 => 10.0 * strategy.trap_avoidance,
        _ => 0.0,
    }
}

/// Largest diamond a fill of depth `d` can cover: 2d² + 2d + 1
fn max_theoretical_area(depth: usize) -> usize {
    2 * depth * depth + 2 * depth + 1
}

/// Space-maximizing score for moving the head to `pos`
pub fn score_space_move(ctx: &ScoringContext, pos: Pos) -> MoveEvaluation {
    let strategy = ctx.strategy;
    let you = ctx.you;

    let area = space::flood_fill(pos, ctx.grid);
    let depth = you.length.min(strategy.openness_depth_cap.max(0) as usize);
    let immediate_area = space::flood_fill_with_depth(pos, ctx.grid, depth);
    let escape_routes = space::count_escape_routes(pos, ctx.grid, you.length);

    let openness = immediate_area as f64 / max_theoretical_area(depth).min(area).max(1) as f64;

    let mut components = ScoreBreakdown {
        area_term: area as f64 * strategy.space_weight,
        escape_bonus: escape_routes as f64 * strategy.escape_route_weight * 10.0,
        openness_bonus: Some(openness * strategy.openness_weight * 10.0),
        ..Default::default()
    };
    let mut predicted_area = None;

    if strategy.enemy_prediction_weight > 0.0 {
        let likelihood = threat::enemy_likelihood_at(pos, ctx.board, you, ctx.grid);
        components.enemy_penalty = Some(likelihood * strategy.enemy_prediction_weight * 20.0);
    }

    if strategy.avoid_larger_snakes {
        components.larger_snake_penalty =
            Some(threat::larger_snake_head_penalty(pos, ctx.board, you));
    }

    let trap = trap_penalty(escape_routes, ctx.opponent_count(), strategy);
    if trap > 0.0 {
        components.trap_penalty = Some(trap);
    }

    if strategy.lookahead_depth > 0 && area < you.length * 2 {
        let predicted = space::flood_fill_with_tail_prediction(
            pos,
            ctx.grid,
            &ctx.board.snakes,
            strategy.lookahead_depth as usize,
        );
        predicted_area = Some(predicted);
        if predicted > area {
            components.lookahead_bonus = Some((predicted - area) as f64 * 0.5);
        }
    }

    if strategy.trapping_aggression > 0.0
        && you.length >= ctx.board.max_opponent_length(&you.id)
    {
        let bonus = space::opponent_area_reduction(pos, ctx.grid, ctx.board, &you.id)
            * strategy.trapping_aggression;
        if bonus > 0.0 {
            components.trapping_bonus = Some(bonus);
        }
    }

    MoveEvaluation {
        area,
        escape_routes,
        immediate_area: Some(immediate_area),
        predicted_area,
        distance_to_food: None,
        score: total(&components),
        components,
    }
}

/// Food-seeking score: room plus escape routes, minus squared distance to the target food
pub fn score_food_move(ctx: &ScoringContext, pos: Pos, food_target: Option<Pos>) -> MoveEvaluation {
    let strategy = ctx.strategy;

    let area = space::flood_fill(pos, ctx.grid);
    let escape_routes = space::count_escape_routes(pos, ctx.grid, ctx.you.length);
    let distance = food_target.map_or(0, |food| geometry::distance_squared(pos, food));

    let mut components = ScoreBreakdown {
        area_term: area as f64,
        escape_bonus: escape_routes as f64 * strategy.escape_route_weight * 10.0,
        food_penalty: Some(distance as f64 * strategy.food_weight),
        ..Default::default()
    };

    let trap = trap_penalty(escape_routes, ctx.opponent_count(), strategy);
    if trap > 0.0 {
        components.trap_penalty = Some(trap);
    }

    MoveEvaluation {
        area,
        escape_routes,
        immediate_area: None,
        predicted_area: None,
        distance_to_food: Some(distance),
        score: total(&components),
        components,
    }
}

/// Sum of the main-tier terms. Center and aggression bonuses are added later.
fn total(c: &ScoreBreakdown) -> f64 {
    c.area_term + c.escape_bonus + c.openness_bonus.unwrap_or(0.0)
        - c.food_penalty.unwrap_or(0.0)
        - c.enemy_penalty.unwrap_or(0.0)
        - c.larger_snake_penalty.unwrap_or(0.0)
        - c.trap_penalty.unwrap_or(0.0)
        + c.lookahead_bonus.unwrap_or(0.0)
        + c.trapping_bonus.unwrap_or(0.0)
}

/// Food closest to `head` by squared distance; the first listed wins ties
pub fn nearest_food(board: &BoardState, head: Pos) -> Option<Pos> {
    board
        .food
        .iter()
        .copied()
        .min_by_key(|&food| geometry::distance_squared(food, head))
}

/// Bonus for staying near the middle of the board.
///
/// # Arguments
/// * `pos` - Candidate cell
/// * `board` - Board dimensions
/// * `reachable` - Area currently reachable from our head
/// * `strategy` - Supplies centerPreference
///
/// # Returns
/// * `(bonus, area_factor)` - area_factor is 3 when `reachable` is under 20 cells
pub fn center_bonus(
    pos: Pos,
    board: &BoardState,
    reachable: usize,
    strategy: &StrategyConfig,
) -> (f64, f64) {
    let center_x = board.width as f64 / 2.0;
    let center_y = board.height as f64 / 2.0;
    let max_dist = center_x + center_y;
    let area_factor = if reachable < CRAMPED_AREA { 3.0 } else { 1.0 };

    if max_dist <= 0.0 {
        return (0.0, area_factor);
    }

    let dist = (pos.x as f64 - center_x).abs() + (pos.y as f64 - center_y).abs();
    let bonus = (max_dist - dist) / max_dist * 5.0 * strategy.center_preference * area_factor;
    (bonus, area_factor)
}

/// Head of the opponent worth hunting, if any. Only opponents at least two
/// shorter qualify; the one minimizing `dist² / (sizeDiff * aggression)` wins.
pub fn aggression_target(
    board: &BoardState,
    you: &SnakeState,
    strategy: &StrategyConfig,
) -> Option<Pos> {
    if strategy.aggression < MIN_AGGRESSION || you.health < strategy.health_threshold {
        return None;
    }

    let mut best: Option<(f64, Pos)> = None;
    for opponent in board.opponents(&you.id) {
        if opponent.body.is_empty() || opponent.length + 1 >= you.length {
            continue;
        }
        let size_diff = (you.length - opponent.length) as f64;
        let distance = geometry::distance_squared(you.head, opponent.head) as f64;
        let effective = distance / (size_diff * strategy.aggression);
        if best.map_or(true, |(d, _)| effective < d) {
            best = Some((effective, opponent.head));
        }
    }

    best.map(|(_, head)| head)
}

/// Proximity bonus toward the hunted head
pub fn aggression_bonus(pos: Pos, target: Pos, board: &BoardState, strategy: &StrategyConfig) -> f64 {
    let width = board.width as f64;
    let height = board.height as f64;
    let max_dist = width * width + height * height;
    let distance = geometry::distance_squared(pos, target) as f64;
    (max_dist - distance) * strategy.aggression * 0.5
}
