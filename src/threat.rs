// Threat assessment
//
// Head-on collision classification and a soft model of where each opponent's
// head is likely to land next turn.

use serde::{Deserialize, Serialize};

use crate::geometry::{self, Pos, EVALUATION_ORDER};
use crate::state::{BoardState, Grid, SnakeState};
use crate::types::Direction;

/// Outcome of a possible head-on collision at a cell, ordered by danger
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionRisk {
    /// No opponent can reach the cell
    None = 0,
    /// A shorter opponent can reach it; we would win
    Win = 1,
    /// An equal-length opponent can reach it; both die
    Tie = 2,
    /// A longer opponent can reach it; we die
    Lose = 3,
}

impl CollisionRisk {
    pub fn level(self) -> u8 {
        self as u8
    }

    /// Winning a head-on is not a threat
    pub fn is_safe(self) -> bool {
        self <= CollisionRisk::Win
    }

    fn versus(own_length: usize, opponent_length: usize) -> Self {
        use std::cmp::Ordering;
        match opponent_length.cmp(&own_length) {
            Ordering::Greater => CollisionRisk::Lose,
            Ordering::Equal => CollisionRisk::Tie,
            Ordering::Less => CollisionRisk::Win,
        }
    }
}

fn can_reach(snake: &SnakeState, pos: Pos) -> bool {
    !snake.body.is_empty() && geometry::manhattan(snake.head, pos) == 1
}

/// Worst head-on outcome at `pos` across all opponents
pub fn collision_risk(pos: Pos, board: &BoardState, you: &SnakeState) -> CollisionRisk {
    board
        .opponents(&you.id)
        .filter(|o| can_reach(o, pos))
        .map(|o| CollisionRisk::versus(you.length, o.length))
        .max()
        .unwrap_or(CollisionRisk::None)
}

/// True when an opponent at least as long as us could move onto `pos`
pub fn is_dangerous_move(pos: Pos, board: &BoardState, you: &SnakeState) -> bool {
    board
        .opponents(&you.id)
        .any(|o| o.length >= you.length && can_reach(o, pos))
}

/// Probability of a snake's next move in each direction
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MoveLikelihood {
    pub up: f64,
    pub down: f64,
    pub left: f64,
    pub right: f64,
}

impl MoveLikelihood {
    pub fn uniform() -> Self {
        MoveLikelihood {
            up: 0.25,
            down: 0.25,
            left: 0.25,
            right: 0.25,
        }
    }

    pub fn get(&self, direction: Direction) -> f64 {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    fn slot(&mut self, direction: Direction) -> &mut f64 {
        match direction {
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }

    pub fn total(&self) -> f64 {
        self.up + self.down + self.left + self.right
    }

    /// Scales the remaining mass back to 1. All-zero stays all-zero.
    fn normalize(&mut self) {
        let total = self.total();
        if total > 0.0 {
            for d in EVALUATION_ORDER {
                *self.slot(d) /= total;
            }
        }
    }
}

/// Soft guess at where `snake` moves next. Reversing onto the neck is ruled out
/// first, then walls and occupied cells, and what is left is renormalized.
pub fn predict_enemy_move_likelihood(snake: &SnakeState, grid: &Grid) -> MoveLikelihood {
    let mut likelihood = MoveLikelihood::uniform();

    if let Some(reverse) = snake
        .neck()
        .and_then(|neck| geometry::direction_between(snake.head, neck))
    {
        *likelihood.slot(reverse) = 0.0;
        likelihood.normalize();
    }

    for (direction, next) in geometry::neighbors(snake.head) {
        if !grid.is_passable(next) {
            *likelihood.slot(direction) = 0.0;
        }
    }
    likelihood.normalize();

    likelihood
}

/// Combined chance that any opponent's head lands on `pos`. Can exceed 1.
pub fn enemy_likelihood_at(pos: Pos, board: &BoardState, you: &SnakeState, grid: &Grid) -> f64 {
    board
        .opponents(&you.id)
        .filter(|o| can_reach(o, pos))
        .map(|o| {
            let likelihood = predict_enemy_move_likelihood(o, grid);
            geometry::direction_between(o.head, pos).map_or(0.0, |d| likelihood.get(d))
        })
        .sum()
}

/// `15 + 5 * sizeDiff` for each opponent at least our length whose head is next to `pos`
pub fn larger_snake_head_penalty(pos: Pos, board: &BoardState, you: &SnakeState) -> f64 {
    board
        .opponents(&you.id)
        .filter(|o| o.length >= you.length && can_reach(o, pos))
        .map(|o| 15.0 + 5.0 * (o.length - you.length) as f64)
        .sum()
}

/// A snake at full health just ate, so its tail stays put this turn
pub fn will_tail_likely_move(snake: &SnakeState) -> bool {
    snake.health < 100
}
