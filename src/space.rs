// Space analysis
//
// Breadth-first flood fills over a Grid. All variants share one traversal and
// the same notion of danger: out of bounds, hazards and any snake segment.

use std::collections::VecDeque;

use crate::geometry::{neighbors, Pos};
use crate::state::{BoardState, Cell, Grid, SnakeState};
use crate::threat;

/// Scale applied to each opponent's area-reduction ratio
const TRAPPING_REDUCTION_SCALE: f64 = 50.0;

/// Counts passable cells reachable from the seeds. Seeds that are dangerous are
/// skipped. With `max_depth`, only cells within that many steps are counted.
fn bfs(grid: &Grid, seeds: &[Pos], max_depth: Option<usize>) -> usize {
    let mut visited = vec![false; grid.len()];
    let mut queue = VecDeque::new();

    for &seed in seeds {
        if let Some(i) = grid.index(seed) {
            if !visited[i] && grid.is_passable(seed) {
                visited[i] = true;
                queue.push_back((seed, 0usize));
            }
        }
    }

    let mut area = 0;
    while let Some((pos, depth)) = queue.pop_front() {
        area += 1;
        if max_depth.map_or(false, |max| depth >= max) {
            continue;
        }
        for (_, next) in neighbors(pos) {
            let Some(i) = grid.index(next) else {
                continue;
            };
            if !visited[i] && grid.is_passable(next) {
                visited[i] = true;
                queue.push_back((next, depth + 1));
            }
        }
    }

    area
}

/// Number of cells reachable from `start`, including `start` itself.
/// Zero when `start` is dangerous or out of bounds.
pub fn flood_fill(start: Pos, grid: &Grid) -> usize {
    bfs(grid, &[start], None)
}

/// Like `flood_fill`, but only counts cells at most `max_depth` steps away.
pub fn flood_fill_with_depth(start: Pos, grid: &Grid, max_depth: usize) -> usize {
    bfs(grid, &[start], Some(max_depth))
}

/// Room available to a snake whose head sits on `head`: a fill seeded from the
/// head's passable neighbors. A plain fill from an occupied cell counts nothing.
pub fn area_around(head: Pos, grid: &Grid) -> usize {
    let seeds: Vec<Pos> = neighbors(head).iter().map(|(_, p)| *p).collect();
    bfs(grid, &seeds, None)
}

/// Passable neighbors of `pos` whose own fill is at least `min_area` cells
pub fn count_escape_routes(pos: Pos, grid: &Grid, min_area: usize) -> usize {
    neighbors(pos)
        .iter()
        .filter(|(_, next)| grid.is_passable(*next))
        .filter(|(_, next)| flood_fill(*next, grid) >= min_area)
        .count()
}

/// Flood fill on a copy of `grid` where the last `turns_ahead` tail segments of
/// every snake whose tail will likely move are treated as empty.
pub fn flood_fill_with_tail_prediction(
    start: Pos,
    grid: &Grid,
    snakes: &[SnakeState],
    turns_ahead: usize,
) -> usize {
    let mut predicted = grid.clone();

    for snake in snakes {
        if !threat::will_tail_likely_move(snake) || snake.body.is_empty() {
            continue;
        }
        let remaining = snake.body.len() - turns_ahead.min(snake.body.len() - 1);
        let (kept, vacated) = snake.body.split_at(remaining);
        for tail in vacated {
            // Stacked segments stay put until the last copy leaves
            if !kept.contains(tail) {
                predicted.set(*tail, Cell::Empty);
            }
        }
    }

    flood_fill(start, &predicted)
}

/// How much moving our head to `target` shrinks the opponents' room.
///
/// # Arguments
/// * `target` - Candidate head position
/// * `grid` - Current grid
/// * `board` - Board holding the opponents
/// * `you_id` - Id of the acting snake
///
/// # Returns
/// * `f64` - Sum over opponents of `reduction / current * 50`, counting only
///   opponents that currently have room and lose some of it
pub fn opponent_area_reduction(target: Pos, grid: &Grid, board: &BoardState, you_id: &str) -> f64 {
    let mut hypothetical: Option<Grid> = None;
    let mut total = 0.0;

    for opponent in board.opponents(you_id) {
        if opponent.body.is_empty() {
            continue;
        }
        let current = area_around(opponent.head, grid);
        if current == 0 {
            continue;
        }

        let what_if = hypothetical.get_or_insert_with(|| {
            let mut g = grid.clone();
            g.set(target, Cell::OwnHead);
            g
        });
        let after = area_around(opponent.head, what_if);

        if after < current {
            let reduction = (current - after) as f64;
            total += reduction / current as f64 * TRAPPING_REDUCTION_SCALE;
        }
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with_wall(width: i32, height: i32, wall: &[(i32, i32)]) -> Grid {
        let mut grid = Grid::new(width, height);
        for &(x, y) in wall {
            grid.set(Pos::new(x, y), Cell::EnemyBody);
        }
        grid
    }

    #[test]
    fn test_flood_fill_open_board() {
        let grid = Grid::new(5, 5);
        assert_eq!(flood_fill(Pos::new(2, 2), &grid), 25);
        assert_eq!(flood_fill(Pos::new(2, 2), &grid), 25);
    }

    #[test]
    fn test_flood_fill_never_counts_dangerous_cells() {
        let grid = grid_with_wall(3, 3, &[(1, 0), (1, 1), (1, 2)]);
        assert_eq!(flood_fill(Pos::new(0, 0), &grid), 3);
        assert_eq!(flood_fill(Pos::new(1, 1), &grid), 0);
        assert_eq!(flood_fill(Pos::new(5, 5), &grid), 0);
    }

    #[test]
    fn test_depth_limited_fill_distinguishes_corridors() {
        let grid = Grid::new(7, 7);
        // Diamond of radius 2: 1 + 4 + 8
        assert_eq!(flood_fill_with_depth(Pos::new(3, 3), &grid, 2), 13);
        assert_eq!(flood_fill_with_depth(Pos::new(3, 3), &grid, 0), 1);

        let corridor = Grid::new(7, 1);
        assert_eq!(flood_fill_with_depth(Pos::new(0, 0), &corridor, 2), 3);
    }

    #[test]
    fn test_area_around_occupied_head() {
        let mut grid = Grid::new(3, 3);
        grid.set(Pos::new(1, 1), Cell::OwnHead);
        assert_eq!(flood_fill(Pos::new(1, 1), &grid), 0);
        assert_eq!(area_around(Pos::new(1, 1), &grid), 8);
    }

    #[test]
    fn test_escape_routes_ignore_dead_ends() {
        // Column x=1 is a wall except at the top; pos (0,2) can only go up
        let grid = grid_with_wall(3, 3, &[(1, 1), (1, 2)]);
        assert_eq!(count_escape_routes(Pos::new(0, 2), &grid, 3), 1);
        assert_eq!(count_escape_routes(Pos::new(0, 2), &grid, 20), 0);
    }
}
