// Text boards
//
// Parses small ASCII pictures into snapshots and renders snapshots back to
// text. The top line of a picture is the top row of the board.
//
//   .  empty            F  food            H or #  hazard
//   Y  our head         y  our body
//   A-Z enemy head      a-z body of the enemy with the same letter

use std::collections::BTreeMap;

use crate::geometry::raw;
use crate::types::{Battlesnake, Board, Coord, GameState};

pub const YOU_ID: &str = "you";
/// Health given to every parsed snake
pub const DEFAULT_HEALTH: i32 = 100;

#[derive(Default)]
struct SnakeCells {
    head: Option<Coord>,
    body: Vec<Coord>,
}

/// Id used for the enemy drawn with `letter`
pub fn enemy_id(letter: char) -> String {
    format!("snake-{}", letter.to_ascii_lowercase())
}

/// Parses a picture into a snapshot.
///
/// # Returns
/// * `Result<GameState, String>` - Error on ragged rows, unknown symbols, or a
///   snake drawn with body but no head (or two heads)
pub fn parse(picture: &str) -> Result<GameState, String> {
    let rows: Vec<&str> = picture
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let height = rows.len() as i32;
    let width = rows.first().map_or(0, |r| r.chars().count()) as i32;

    let mut food = Vec::new();
    let mut hazards = Vec::new();
    let mut snakes: BTreeMap<char, SnakeCells> = BTreeMap::new();

    for (row, line) in rows.iter().enumerate() {
        if line.chars().count() as i32 != width {
            return Err(format!(
                "Row {} has {} cells, expected {}",
                row + 1,
                line.chars().count(),
                width
            ));
        }
        let y = height - row as i32 - 1;

        for (x, symbol) in line.chars().enumerate() {
            let coord = Coord::new(x as i32, y);
            match symbol {
                '.' => {}
                'F' => food.push(coord),
                'H' | '#' => hazards.push(coord),
                c if c.is_ascii_alphabetic() => {
                    let cells = snakes.entry(c.to_ascii_uppercase()).or_default();
                    if c.is_ascii_uppercase() {
                        if cells.head.is_some() {
                            return Err(format!("Snake '{}' has more than one head", c));
                        }
                        cells.head = Some(coord);
                    } else {
                        cells.body.push(coord);
                    }
                }
                other => return Err(format!("Unknown board symbol '{}'", other)),
            }
        }
    }

    let mut you = Battlesnake {
        id: YOU_ID.to_string(),
        name: YOU_ID.to_string(),
        health: DEFAULT_HEALTH,
        ..Default::default()
    };
    let mut board_snakes = Vec::new();

    for (letter, cells) in snakes {
        let head = cells
            .head
            .ok_or_else(|| format!("Snake '{}' has a body but no head", letter))?;
        let body = order_body(head, cells.body);
        let (id, name) = if letter == 'Y' {
            (YOU_ID.to_string(), YOU_ID.to_string())
        } else {
            (enemy_id(letter), letter.to_string())
        };

        let snake = Battlesnake {
            id,
            name,
            health: DEFAULT_HEALTH,
            length: body.len() as i32,
            head: Some(head),
            body,
            ..Default::default()
        };
        if letter == 'Y' {
            you = snake.clone();
            board_snakes.insert(0, snake);
        } else {
            board_snakes.push(snake);
        }
    }

    let mut state = GameState {
        turn: 0,
        board: Board {
            width,
            height,
            food,
            hazards,
            snakes: board_snakes,
        },
        you,
        ..Default::default()
    };
    state.game.id = "ascii".to_string();
    Ok(state)
}

/// Chains segments outward from the head through adjacent cells. Segments
/// that cannot be chained are appended in reading order.
fn order_body(head: Coord, mut rest: Vec<Coord>) -> Vec<Coord> {
    let mut body = vec![head];
    let mut current = head;

    while !rest.is_empty() {
        let next = raw::neighbors(current)
            .iter()
            .find_map(|(_, n)| rest.iter().position(|c| c == n));
        match next {
            Some(i) => {
                current = rest.remove(i);
                body.push(current);
            }
            None => {
                body.append(&mut rest);
            }
        }
    }

    body
}

/// Sets a snake's health both on the board and, when it is us, in `you`
pub fn set_health(state: &mut GameState, snake_id: &str, health: i32) {
    for snake in state.board.snakes.iter_mut().filter(|s| s.id == snake_id) {
        snake.health = health;
    }
    if state.you.id == snake_id {
        state.you.health = health;
    }
}

/// Draws a snapshot with the same symbols `parse` reads. Enemies get letters
/// A, B, C... in board order.
pub fn render(state: &GameState) -> String {
    let board = &state.board;
    let width = board.width.max(0) as usize;
    let height = board.height.max(0) as usize;
    let mut cells = vec![vec!['.'; width]; height];

    let mut put = |c: Coord, symbol: char| {
        if raw::in_bounds(c, board.width, board.height) {
            let row = height - 1 - c.y as usize;
            cells[row][c.x as usize] = symbol;
        }
    };

    for &f in &board.food {
        put(f, 'F');
    }
    for &h in &board.hazards {
        put(h, 'H');
    }

    let mut letters = ('A'..='Z').filter(|c| !matches!(c, 'F' | 'H' | 'Y'));
    for snake in &board.snakes {
        let letter = if snake.id == state.you.id {
            'Y'
        } else {
            letters.next().unwrap_or('Z')
        };
        for &segment in snake.body.iter().skip(1) {
            put(segment, letter.to_ascii_lowercase());
        }
        if let Some(head) = snake.head_or_body() {
            put(head, letter);
        }
    }

    cells
        .into_iter()
        .map(|row| row.into_iter().collect::<String>() + "\n")
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flips_rows_into_raw_space() {
        let state = parse(
            "
            F..
            .Yy
            a.A
            ",
        )
        .unwrap();

        assert_eq!(state.board.width, 3);
        assert_eq!(state.board.height, 3);
        assert_eq!(state.board.food, vec![Coord::new(0, 2)]);
        assert_eq!(state.you.head, Some(Coord::new(1, 1)));
        assert_eq!(state.you.body, vec![Coord::new(1, 1), Coord::new(2, 1)]);
        assert_eq!(state.board.snakes[0].id, YOU_ID);

        let enemy = state.board.snake(&enemy_id('A')).unwrap();
        assert_eq!(enemy.head, Some(Coord::new(2, 0)));
        assert_eq!(enemy.length, 2);
    }

    #[test]
    fn test_body_is_chained_from_head() {
        let state = parse(
            "
            yyy
            y.Y
            ",
        )
        .unwrap();
        assert_eq!(
            state.you.body,
            vec![
                Coord::new(2, 0),
                Coord::new(2, 1),
                Coord::new(1, 1),
                Coord::new(0, 1),
                Coord::new(0, 0),
            ]
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse("..\n...").is_err());
        assert!(parse("y..").is_err());
        assert!(parse("Y.Y").is_err());
        assert!(parse(".?.").is_err());
    }

    #[test]
    fn test_render_matches_picture() {
        let picture = "F..\n.Yy\na.A\n";
        let state = parse(picture).unwrap();
        assert_eq!(render(&state), picture);
    }
}
