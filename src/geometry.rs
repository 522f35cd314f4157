// Coordinate helpers
//
// Grid space: y = 0 is the top row, "up" is y - 1. Every algorithm in the engine
// works here. The `raw` sub-module mirrors the same operations for wire
// coordinates (y = 0 at the bottom) and is only used when analyzing logged turns.

use serde::{Deserialize, Serialize};

use crate::types::{Coord, Direction};

/// Order in which candidate directions are evaluated; ties keep the earlier one
pub const EVALUATION_ORDER: [Direction; 4] =
    [Direction::Up, Direction::Left, Direction::Right, Direction::Down];

/// A cell in grid space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Pos { x, y }
    }
}

/// Moves one cell in grid space
pub fn step(pos: Pos, direction: Direction) -> Pos {
    match direction {
        Direction::Up => Pos::new(pos.x, pos.y.saturating_sub(1)),
        Direction::Down => Pos::new(pos.x, pos.y.saturating_add(1)),
        Direction::Left => Pos::new(pos.x.saturating_sub(1), pos.y),
        Direction::Right => Pos::new(pos.x.saturating_add(1), pos.y),
    }
}

/// The four neighbors of `pos`, in evaluation order
pub fn neighbors(pos: Pos) -> [(Direction, Pos); 4] {
    EVALUATION_ORDER.map(|d| (d, step(pos, d)))
}

/// Direction that leads from `from` to an adjacent `to`, or None when not adjacent
pub fn direction_between(from: Pos, to: Pos) -> Option<Direction> {
    EVALUATION_ORDER
        .into_iter()
        .find(|&d| step(from, d) == to)
}

/// Saturates at i32::MAX for coordinates far outside any real board
pub fn distance_squared(a: Pos, b: Pos) -> i32 {
    squared_span(a.x, a.y, b.x, b.y)
}

pub fn manhattan(a: Pos, b: Pos) -> i32 {
    let dx = (a.x as i64 - b.x as i64).abs();
    let dy = (a.y as i64 - b.y as i64).abs();
    clamp_i32(dx + dy)
}

fn squared_span(ax: i32, ay: i32, bx: i32, by: i32) -> i32 {
    let dx = ax as i64 - bx as i64;
    let dy = ay as i64 - by as i64;
    clamp_i32(dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy)))
}

fn clamp_i32(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Flips a y value between raw and grid space. The flip is its own inverse.
pub fn flip_y(y: i32, height: i32) -> i32 {
    clamp_i32(height as i64 - y as i64 - 1)
}

pub fn to_grid(coord: Coord, height: i32) -> Pos {
    Pos::new(coord.x, flip_y(coord.y, height))
}

pub fn to_raw(pos: Pos, height: i32) -> Coord {
    Coord::new(pos.x, flip_y(pos.y, height))
}

/// Raw (wire) coordinate operations. Never feed these grid positions.
pub mod raw {
    use crate::types::{Coord, Direction};

    pub fn step(coord: Coord, direction: Direction) -> Coord {
        direction.apply(&coord)
    }

    pub fn neighbors(coord: Coord) -> [(Direction, Coord); 4] {
        super::EVALUATION_ORDER.map(|d| (d, step(coord, d)))
    }

    pub fn direction_between(from: Coord, to: Coord) -> Option<Direction> {
        super::EVALUATION_ORDER
            .into_iter()
            .find(|&d| step(from, d) == to)
    }

    pub fn distance_squared(a: Coord, b: Coord) -> i32 {
        super::squared_span(a.x, a.y, b.x, b.y)
    }

    pub fn in_bounds(coord: Coord, width: i32, height: i32) -> bool {
        coord.x >= 0 && coord.x < width && coord.y >= 0 && coord.y < height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_up_decreases_y() {
        let p = Pos::new(2, 2);
        assert_eq!(step(p, Direction::Up), Pos::new(2, 1));
        assert_eq!(step(p, Direction::Down), Pos::new(2, 3));
        assert_eq!(raw::step(Coord::new(2, 2), Direction::Up), Coord::new(2, 3));
    }

    #[test]
    fn test_neighbors_follow_evaluation_order() {
        let dirs: Vec<Direction> = neighbors(Pos::new(1, 1)).iter().map(|(d, _)| *d).collect();
        assert_eq!(
            dirs,
            vec![Direction::Up, Direction::Left, Direction::Right, Direction::Down]
        );
    }

    #[test]
    fn test_direction_between() {
        assert_eq!(
            direction_between(Pos::new(1, 1), Pos::new(1, 0)),
            Some(Direction::Up)
        );
        assert_eq!(direction_between(Pos::new(1, 1), Pos::new(3, 1)), None);
        assert_eq!(direction_between(Pos::new(1, 1), Pos::new(1, 1)), None);
        assert_eq!(
            raw::direction_between(Coord::new(1, 1), Coord::new(1, 2)),
            Some(Direction::Up)
        );
    }

    #[test]
    fn test_raw_grid_round_trip() {
        for height in 1..12 {
            for y in 0..height {
                let c = Coord::new(3, y);
                assert_eq!(to_raw(to_grid(c, height), height), c);
            }
        }
        assert_eq!(to_grid(Coord::new(0, 0), 11), Pos::new(0, 10));
    }

    #[test]
    fn test_squared_distance() {
        assert_eq!(distance_squared(Pos::new(0, 0), Pos::new(3, 4)), 25);
        assert_eq!(raw::distance_squared(Coord::new(1, 1), Coord::new(1, 1)), 0);
        assert_eq!(manhattan(Pos::new(0, 0), Pos::new(3, 4)), 7);
    }

    #[test]
    fn test_far_coordinates_saturate() {
        let far = Pos::new(i32::MAX, i32::MIN);
        assert_eq!(distance_squared(Pos::new(0, 0), far), i32::MAX);
        assert_eq!(manhattan(Pos::new(0, 0), far), i32::MAX);
        assert_eq!(step(far, Direction::Right), far);
        assert_eq!(step(far, Direction::Up), far);
        assert_eq!(flip_y(i32::MIN, i32::MAX), i32::MAX);
    }
}
