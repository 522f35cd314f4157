// Decision engine
//
// One synchronous pass per turn: pick a mode, evaluate the four directions,
// then take the best move from the first non-empty tier (safe, risky, valid).
// When nothing is valid it still answers with an in-bounds direction, or
// "down" as the last resort. Nothing here can fail.

use log::debug;

use crate::geometry::{self, Pos};
use crate::scoring::{self, Mode, MoveEvaluation, ScoringContext, Threshold};
use crate::space;
use crate::state::{Cell, Grid, Turn};
use crate::strategy::StrategyConfig;
use crate::threat::{self, CollisionRisk};
use crate::trace::{
    Categorization, DebugTrace, DecisionTrace, MoveTrace, RejectReason, ScoredMove, Tier,
};
use crate::types::{Direction, GameState};

/// The engine's answer for one turn
#[derive(Debug, Clone)]
pub struct Decision {
    pub direction: Direction,
    /// Present when a trace was requested
    pub trace: Option<DebugTrace>,
}

/// A direction that survived the hard filters
#[derive(Debug, Clone, Copy)]
struct Candidate {
    slot: usize,
    direction: Direction,
    pos: Pos,
    score: f64,
    risk: CollisionRisk,
}

/// Chooses a move for the snapshot.
///
/// # Arguments
/// * `state` - Turn snapshot in wire coordinates
/// * `strategy` - Resolved strategy parameters
/// * `with_trace` - Whether to return the DebugTrace
///
/// # Returns
/// * `Decision` - Always holds one of the four directions
pub fn decide(state: &GameState, strategy: &StrategyConfig, with_trace: bool) -> Decision {
    let turn = Turn::from_request(state);
    decide_turn(&turn, strategy, with_trace)
}

/// Same as `decide` for an already normalized turn
pub fn decide_turn(turn: &Turn, strategy: &StrategyConfig, with_trace: bool) -> Decision {
    let grid = turn.grid();
    let you = &turn.you;
    let ctx = ScoringContext {
        board: &turn.board,
        you,
        grid: &grid,
        strategy,
    };

    // ModeSelect
    let threshold = scoring::effective_health_threshold(strategy, you, &turn.board);
    let mode = scoring::select_mode(you.health, &threshold);
    let food_target = match mode {
        Mode::FoodSeeking => scoring::nearest_food(&turn.board, you.head),
        Mode::SpaceMaximizing => None,
    };

    // Evaluate
    let (mut moves, candidates) = evaluate(&ctx, mode, food_target);
    let categorization = categorize(&candidates);

    // SelectTier
    let aggression_target = scoring::aggression_target(&turn.board, you, strategy);
    let (direction, tier, reason) =
        select_tier(&ctx, &candidates, aggression_target, &mut moves);

    debug!(
        "Turn {}: {:?} mode, {:?} tier -> {} ({})",
        turn.turn, mode, tier, direction, reason
    );

    let trace = with_trace.then(|| {
        build_trace(
            turn,
            strategy,
            mode,
            &threshold,
            food_target,
            aggression_target,
            moves,
            categorization,
            DecisionTrace {
                direction,
                tier,
                reason,
            },
        )
    });

    Decision { direction, trace }
}

/// Cheap answer used when the full decision cannot run in time: the first
/// passable non-neck neighbor, then the same ladder as a trapped snake.
pub fn fallback_direction(state: &GameState) -> Direction {
    let turn = Turn::from_request(state);
    let grid = turn.grid();
    let neck = turn.you.neck();

    geometry::neighbors(turn.you.head)
        .into_iter()
        .find(|(_, pos)| Some(*pos) != neck && grid.is_passable(*pos))
        .map(|(d, _)| d)
        .unwrap_or_else(|| last_resort(&turn, &grid).0)
}

fn reject_reason(cell: Cell) -> Option<RejectReason> {
    match cell {
        Cell::Empty | Cell::Food => None,
        Cell::Hazard => Some(RejectReason::Hazard),
        Cell::OwnHead | Cell::OwnBody => Some(RejectReason::OwnBody),
        Cell::EnemyHead => Some(RejectReason::EnemyHead),
        Cell::EnemyBody => Some(RejectReason::EnemyBody),
    }
}

fn evaluate(
    ctx: &ScoringContext,
    mode: Mode,
    food_target: Option<Pos>,
) -> (Vec<MoveTrace>, Vec<Candidate>) {
    let neck = ctx.you.neck();
    let mut moves = Vec::with_capacity(4);
    let mut candidates = Vec::with_capacity(4);

    for (slot, (direction, pos)) in geometry::neighbors(ctx.you.head).into_iter().enumerate() {
        let rejection = if neck == Some(pos) {
            Some(RejectReason::NeckCollision)
        } else {
            match ctx.grid.get(pos) {
                None => Some(RejectReason::OutOfBounds),
                Some(cell) => reject_reason(cell),
            }
        };
        if let Some(reason) = rejection {
            moves.push(MoveTrace::rejected(direction, pos, reason));
            continue;
        }

        let evaluation: MoveEvaluation = match mode {
            Mode::SpaceMaximizing => scoring::score_space_move(ctx, pos),
            Mode::FoodSeeking => scoring::score_food_move(ctx, pos, food_target),
        };
        let risk = threat::collision_risk(pos, ctx.board, ctx.you);

        candidates.push(Candidate {
            slot,
            direction,
            pos,
            score: evaluation.score,
            risk,
        });
        moves.push(MoveTrace {
            direction,
            position: pos,
            valid: true,
            rejected_reason: None,
            collision_risk: Some(risk),
            evaluation: Some(evaluation),
        });
    }

    (moves, candidates)
}

fn categorize(candidates: &[Candidate]) -> Categorization {
    let scored = |c: &Candidate| ScoredMove {
        direction: c.direction,
        score: c.score,
    };
    Categorization {
        safe: candidates.iter().filter(|c| c.risk.is_safe()).map(scored).collect(),
        risky: candidates.iter().filter(|c| !c.risk.is_safe()).map(scored).collect(),
        valid: candidates.iter().map(scored).collect(),
    }
}

/// Highest score, first one wins ties
fn best_by_score<'a>(candidates: impl Iterator<Item = &'a Candidate>) -> Option<&'a Candidate> {
    candidates.fold(None::<&'a Candidate>, |best, c| match best {
        Some(b) if b.score >= c.score => Some(b),
        _ => Some(c),
    })
}

fn select_tier(
    ctx: &ScoringContext,
    candidates: &[Candidate],
    aggression_target: Option<Pos>,
    moves: &mut [MoveTrace],
) -> (Direction, Tier, String) {
    let mut safe: Vec<Candidate> = candidates
        .iter()
        .copied()
        .filter(|c| c.risk.is_safe())
        .collect();

    if !safe.is_empty() {
        let reachable = space::area_around(ctx.you.head, ctx.grid);
        for c in safe.iter_mut() {
            let (bonus, factor) = scoring::center_bonus(c.pos, ctx.board, reachable, ctx.strategy);
            let aggression = aggression_target
                .map(|target| scoring::aggression_bonus(c.pos, target, ctx.board, ctx.strategy));
            c.score += bonus + aggression.unwrap_or(0.0);

            if let Some(evaluation) = moves[c.slot].evaluation.as_mut() {
                evaluation.components.center_bonus = Some(bonus);
                evaluation.components.area_factor = Some(factor);
                evaluation.components.aggression_bonus = aggression;
            }
        }

        if let Some(best) = best_by_score(safe.iter()) {
            let reason = match aggression_target {
                Some(_) => format!(
                    "Highest scoring safe move with center and hunt bonus (score: {:.1})",
                    best.score
                ),
                None => format!(
                    "Highest scoring safe move with center bonus (score: {:.1})",
                    best.score
                ),
            };
            return (best.direction, Tier::Safe, reason);
        }
    }

    let best_risky = candidates
        .iter()
        .filter(|c| !c.risk.is_safe())
        .fold(None::<&Candidate>, |best, c| match best {
            Some(b) if b.risk < c.risk || (b.risk == c.risk && b.score >= c.score) => Some(b),
            _ => Some(c),
        });
    if let Some(best) = best_risky {
        let label = match best.risk {
            CollisionRisk::Tie => "tie",
            _ => "lose",
        };
        return (
            best.direction,
            Tier::Risky,
            format!(
                "Best risky move (risk {}={}, score: {:.1}), no safe moves",
                best.risk.level(),
                label,
                best.score
            ),
        );
    }

    if let Some(best) = best_by_score(candidates.iter()) {
        return (
            best.direction,
            Tier::Valid,
            format!("Best valid move regardless of risk (score: {:.1})", best.score),
        );
    }

    last_resort_for(ctx.you.head, ctx.you.neck(), ctx.grid)
}

fn last_resort(turn: &Turn, grid: &Grid) -> (Direction, Tier, String) {
    last_resort_for(turn.you.head, turn.you.neck(), grid)
}

/// In-bounds and not the neck, then any in-bounds, then down
fn last_resort_for(head: Pos, neck: Option<Pos>, grid: &Grid) -> (Direction, Tier, String) {
    let in_bounds: Vec<(Direction, Pos)> = geometry::neighbors(head)
        .into_iter()
        .filter(|(_, pos)| grid.in_bounds(*pos))
        .collect();

    let pick = in_bounds
        .iter()
        .find(|(_, pos)| Some(*pos) != neck)
        .or_else(|| in_bounds.first());

    match pick {
        Some((direction, _)) => (
            *direction,
            Tier::Trapped,
            format!("No valid moves, trapped; chose {} to stay in bounds", direction),
        ),
        None => (
            Direction::Down,
            Tier::Cornered,
            "Every direction leaves the board; defaulting to down".to_string(),
        ),
    }
}

#[allow(clippy::too_many_arguments)]
fn build_trace(
    turn: &Turn,
    strategy: &StrategyConfig,
    mode: Mode,
    threshold: &Threshold,
    food_target: Option<Pos>,
    aggression_target: Option<Pos>,
    moves: Vec<MoveTrace>,
    categorization: Categorization,
    decision: DecisionTrace,
) -> DebugTrace {
    DebugTrace {
        strategy: *strategy,
        turn: turn.turn,
        mode,
        health: turn.you.health,
        length: turn.you.length,
        head: turn.you.head,
        neck: turn.you.neck(),
        effective_threshold: threshold.effective,
        gap_from_target: threshold.gap_from_target,
        target_lead: strategy.target_lead,
        max_opponent_length: threshold.max_opponent_length,
        food_target,
        aggression_target,
        moves,
        categorization,
        decision,
    }
}
