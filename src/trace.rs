// Decision traces
//
// A serializable record of how one move was chosen: per-direction measurements,
// the buckets they fell into and the tier that produced the answer. Written to
// the turn log and compared by the replay tool.

use serde::{Deserialize, Serialize};

use crate::geometry::Pos;
use crate::scoring::{Mode, MoveEvaluation};
use crate::strategy::StrategyConfig;
use crate::threat::CollisionRisk;
use crate::types::Direction;

/// Why a direction was thrown out before scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    NeckCollision,
    OutOfBounds,
    OwnBody,
    Hazard,
    EnemyBody,
    EnemyHead,
}

/// Fallback level that produced the decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Safe,
    Risky,
    Valid,
    /// No valid direction; picked something in bounds
    Trapped,
    /// Every direction leaves the board
    Cornered,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveTrace {
    pub direction: Direction,
    pub position: Pos,
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_reason: Option<RejectReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collision_risk: Option<CollisionRisk>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<MoveEvaluation>,
}

impl MoveTrace {
    pub fn rejected(direction: Direction, position: Pos, reason: RejectReason) -> Self {
        MoveTrace {
            direction,
            position,
            valid: false,
            rejected_reason: Some(reason),
            collision_risk: None,
            evaluation: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredMove {
    pub direction: Direction,
    pub score: f64,
}

/// Main-tier scores per bucket, before center and aggression bonuses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Categorization {
    pub safe: Vec<ScoredMove>,
    pub risky: Vec<ScoredMove>,
    pub valid: Vec<ScoredMove>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTrace {
    pub direction: Direction,
    pub tier: Tier,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugTrace {
    pub strategy: StrategyConfig,
    pub turn: i32,
    pub mode: Mode,
    pub health: i32,
    pub length: usize,
    pub head: Pos,
    #[serde(default)]
    pub neck: Option<Pos>,
    pub effective_threshold: f64,
    #[serde(default)]
    pub gap_from_target: Option<i32>,
    pub target_lead: i32,
    pub max_opponent_length: usize,
    #[serde(default)]
    pub food_target: Option<Pos>,
    #[serde(default)]
    pub aggression_target: Option<Pos>,
    pub moves: Vec<MoveTrace>,
    pub categorization: Categorization,
    pub decision: DecisionTrace,
}

impl DebugTrace {
    pub fn move_for(&self, direction: Direction) -> Option<&MoveTrace> {
        self.moves.iter().find(|m| m.direction == direction)
    }
}
