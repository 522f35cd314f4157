// Battlesnake API Types
// See https://docs.battlesnake.com/api
//
// Everything here is in raw (wire) coordinates: y = 0 is the bottom row.
// Every struct tolerates missing fields so a partial snapshot still decodes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Game metadata including ID, ruleset, and timeout
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct Game {
    pub id: String,
    pub ruleset: Ruleset,
    pub map: String,
    pub timeout: u32,
    pub source: String,
}

impl Default for Game {
    fn default() -> Self {
        Game {
            id: String::new(),
            ruleset: Ruleset::default(),
            map: String::new(),
            timeout: 500,
            source: String::new(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Ruleset {
    pub name: String,
    pub version: String,
    pub settings: RulesetSettings,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct RulesetSettings {
    pub food_spawn_chance: i32,
    pub minimum_food: i32,
    pub hazard_damage_per_turn: i32,
    pub royale: Value,
    pub squad: Value,
}

impl Default for RulesetSettings {
    fn default() -> Self {
        RulesetSettings {
            food_spawn_chance: 15,
            minimum_food: 1,
            hazard_damage_per_turn: 1,
            royale: Value::Null,
            squad: Value::Null,
        }
    }
}

/// Board state including dimensions, food, snakes, and hazards
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Board {
    pub height: i32,
    pub width: i32,
    pub food: Vec<Coord>,
    pub snakes: Vec<Battlesnake>,
    pub hazards: Vec<Coord>,
}

impl Board {
    pub fn snake(&self, id: &str) -> Option<&Battlesnake> {
        self.snakes.iter().find(|s| s.id == id)
    }
}

/// Snake representation with all state information
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Battlesnake {
    pub id: String,
    pub name: String,
    pub health: i32,
    pub body: Vec<Coord>,
    pub head: Option<Coord>,
    pub length: i32,
    pub latency: Value,
    pub shout: Option<String>,
}

impl Battlesnake {
    /// Head as sent on the wire, or the first body segment when it is missing
    pub fn head_or_body(&self) -> Option<Coord> {
        self.head.or_else(|| self.body.first().copied())
    }

    /// Declared length, or the body length when the field is absent
    pub fn effective_length(&self) -> usize {
        if self.length > 0 {
            self.length as usize
        } else {
            self.body.len()
        }
    }
}

/// 2D coordinate on the board
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }
}

/// Represents the four possible movement directions for a Battlesnake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Converts direction to string representation for API response
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Calculates the next raw coordinate when moving in this direction
    pub fn apply(&self, coord: &Coord) -> Coord {
        match self {
            Direction::Up => Coord { x: coord.x, y: coord.y.saturating_add(1) },
            Direction::Down => Coord { x: coord.x, y: coord.y.saturating_sub(1) },
            Direction::Left => Coord { x: coord.x.saturating_sub(1), y: coord.y },
            Direction::Right => Coord { x: coord.x.saturating_add(1), y: coord.y },
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(format!("Invalid direction: {}", s)),
        }
    }
}

/// Complete game state received from the API
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct GameState {
    pub game: Game,
    pub turn: i32,
    pub board: Board,
    pub you: Battlesnake,
}

/// Response body for GET /
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InfoResponse {
    pub apiversion: String,
    pub author: String,
    pub color: String,
    pub head: String,
    pub tail: String,
    pub version: String,
}

/// Response body for POST /move
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MoveResponse {
    #[serde(rename = "move")]
    pub direction: Direction,
    pub shout: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_snapshot_decodes_with_defaults() {
        let state: GameState = serde_json::from_value(json!({
            "board": { "width": 5 },
            "you": { "id": "me", "body": [{"x": 1, "y": 2}] }
        }))
        .unwrap();

        assert_eq!(state.game.timeout, 500);
        assert_eq!(state.game.ruleset.settings.food_spawn_chance, 15);
        assert_eq!(state.board.height, 0);
        assert!(state.board.snakes.is_empty());
        assert_eq!(state.you.head_or_body(), Some(Coord::new(1, 2)));
        assert_eq!(state.you.effective_length(), 1);
    }

    #[test]
    fn test_numeric_latency_is_accepted() {
        let snake: Battlesnake =
            serde_json::from_value(json!({ "id": "a", "latency": 42 })).unwrap();
        assert_eq!(snake.latency, json!(42));
    }

    #[test]
    fn test_direction_parsing_and_serialization() {
        assert_eq!("UP".parse::<Direction>().unwrap(), Direction::Up);
        assert_eq!(" left ".parse::<Direction>().unwrap(), Direction::Left);
        assert!("north".parse::<Direction>().is_err());

        let response = MoveResponse {
            direction: Direction::Right,
            shout: String::new(),
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "move": "right", "shout": "" })
        );
    }

    #[test]
    fn test_raw_apply_moves_up_toward_higher_y() {
        let c = Coord::new(3, 3);
        assert_eq!(Direction::Up.apply(&c), Coord::new(3, 4));
        assert_eq!(Direction::Down.apply(&c), Coord::new(3, 2));
        assert_eq!(Direction::Left.opposite(), Direction::Right);
    }
}
