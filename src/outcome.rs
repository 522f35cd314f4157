// Outcome and death analysis
//
// Post-game forensics over logged turns. Works purely in raw (wire) coordinates
// because it reads snapshots exactly as they were received. Used for
// statistics and tooling, never during a live decision.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::geometry::raw;
use crate::turn_log::TurnRecord;
use crate::types::{Battlesnake, Board, Coord};

/// Board size assumed when a logged snapshot lacks dimensions
const STANDARD_BOARD_SIZE: i32 = 11;
/// Every snake starts with this many segments
const STARTING_LENGTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    Starvation,
    WallCollision,
    SelfCollision,
    SnakeCollision,
    HeadCollision,
    /// Died moving into a cell nothing in the last snapshot explains
    Collision,
    Unknown,
}

impl DeathCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeathCause::Starvation => "starvation",
            DeathCause::WallCollision => "wall_collision",
            DeathCause::SelfCollision => "self_collision",
            DeathCause::SnakeCollision => "snake_collision",
            DeathCause::HeadCollision => "head_collision",
            DeathCause::Collision => "collision",
            DeathCause::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    Win,
    Loss,
    Draw,
}

fn board_dimensions(board: &Board) -> (i32, i32) {
    let width = if board.width > 0 { board.width } else { STANDARD_BOARD_SIZE };
    let height = if board.height > 0 { board.height } else { STANDARD_BOARD_SIZE };
    (width, height)
}

/// Classifies a snake whose head already sits on its final cell
pub fn death_cause_at_rest(snake: &Battlesnake, board: &Board) -> DeathCause {
    if snake.health <= 0 {
        return DeathCause::Starvation;
    }
    let Some(head) = snake.head_or_body() else {
        return DeathCause::Unknown;
    };

    let (width, height) = board_dimensions(board);
    if !raw::in_bounds(head, width, height) {
        return DeathCause::WallCollision;
    }
    if snake.body.iter().skip(1).any(|s| *s == head) {
        return DeathCause::SelfCollision;
    }

    for other in board.snakes.iter().filter(|s| s.id != snake.id) {
        if other.head_or_body() == Some(head) {
            return DeathCause::HeadCollision;
        }
        if other.body.contains(&head) {
            return DeathCause::SnakeCollision;
        }
    }

    DeathCause::Unknown
}

/// Where the recorded move took the snake's head
pub fn predicted_head(record: &TurnRecord) -> Option<Coord> {
    let direction = record.chosen_move?;
    let head = record.request.you.head_or_body()?;
    Some(raw::step(head, direction))
}

/// Classifies a death from the snake's last recorded move.
///
/// # Arguments
/// * `final_health` - Last health seen for the snake
/// * `record` - The snake's last turn record that carries a move
///
/// # Returns
/// * `DeathCause` - `Collision` when the move looked legal in the snapshot
pub fn death_cause_after_move(final_health: i32, record: &TurnRecord) -> DeathCause {
    if final_health <= 0 {
        return DeathCause::Starvation;
    }
    let Some(next) = predicted_head(record) else {
        return DeathCause::Unknown;
    };

    let you = &record.request.you;
    let board = &record.request.board;
    let (width, height) = board_dimensions(board);

    if !raw::in_bounds(next, width, height) {
        return DeathCause::WallCollision;
    }
    if you.body.contains(&next) {
        return DeathCause::SelfCollision;
    }

    for other in board.snakes.iter().filter(|s| s.id != you.id) {
        if other.body.contains(&next) {
            return DeathCause::SnakeCollision;
        }
        if could_reach(other, next) {
            return DeathCause::HeadCollision;
        }
    }

    DeathCause::Collision
}

fn could_reach(snake: &Battlesnake, cell: Coord) -> bool {
    snake
        .head_or_body()
        .map_or(false, |head| raw::neighbors(head).iter().any(|(_, n)| *n == cell))
}

/// Opponent credited with the kill. Body collisions credit the body's owner;
/// head collisions credit only a strictly longer opponent.
pub fn find_killer(cause: DeathCause, record: &TurnRecord) -> Option<String> {
    let next = predicted_head(record)?;
    let victim = &record.request.you;
    let mut opponents = record
        .request
        .board
        .snakes
        .iter()
        .filter(|s| s.id != victim.id);

    match cause {
        DeathCause::SnakeCollision => opponents
            .find(|s| s.body.contains(&next))
            .map(|s| s.id.clone()),
        DeathCause::HeadCollision => opponents
            .find(|s| {
                could_reach(s, next) && s.effective_length() > victim.effective_length()
            })
            .map(|s| s.id.clone()),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantSummary {
    pub snake_id: String,
    pub name: String,
    /// None while the game has not finished in the log
    pub result: Option<GameResult>,
    pub death_cause: Option<DeathCause>,
    pub killed_by: Option<String>,
    pub turns_survived: i32,
    pub final_length: usize,
    pub final_health: i32,
    pub kills: u32,
    pub food_eaten: usize,
}

impl ParticipantSummary {
    fn new(snake: &Battlesnake, turn: i32) -> Self {
        ParticipantSummary {
            snake_id: snake.id.clone(),
            name: snake.name.clone(),
            result: None,
            death_cause: None,
            killed_by: None,
            turns_survived: turn,
            final_length: snake.effective_length(),
            final_health: snake.health,
            kills: 0,
            food_eaten: 0,
        }
    }

    fn observe(&mut self, snake: &Battlesnake, turn: i32) {
        self.turns_survived = turn;
        self.final_length = snake.effective_length();
        self.final_health = snake.health;
        self.food_eaten = self.final_length.saturating_sub(STARTING_LENGTH);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub game_id: String,
    pub finished: bool,
    pub last_turn: i32,
    pub participants: Vec<ParticipantSummary>,
}

impl GameSummary {
    pub fn participant(&self, snake_id: &str) -> Option<&ParticipantSummary> {
        self.participants.iter().find(|p| p.snake_id == snake_id)
    }
}

/// Groups records by game, in order of first appearance, and summarizes each
pub fn summarize_games(records: &[TurnRecord]) -> Vec<GameSummary> {
    let mut order: Vec<&str> = Vec::new();
    let mut by_game: HashMap<&str, Vec<&TurnRecord>> = HashMap::new();
    for record in records {
        let entry = by_game.entry(record.game_id.as_str()).or_insert_with(|| {
            order.push(record.game_id.as_str());
            Vec::new()
        });
        entry.push(record);
    }

    order
        .into_iter()
        .filter_map(|id| by_game.get(id).map(|recs| summarize_game(id, recs)))
        .collect()
}

/// Replays one game's records: snakes that vanish from the board lose with a
/// classified cause and credit their killer; at the end marker a lone survivor
/// wins and several survivors draw.
pub fn summarize_game(game_id: &str, records: &[&TurnRecord]) -> GameSummary {
    let mut sorted: Vec<&TurnRecord> = records.to_vec();
    sorted.sort_by_key(|r| r.turn);

    let mut participants: Vec<ParticipantSummary> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut last_turn = 0;
    let mut alive: HashSet<String> = HashSet::new();

    let mut turns: Vec<i32> = sorted.iter().map(|r| r.turn).collect();
    turns.dedup();

    for turn in turns {
        let at_turn: Vec<&TurnRecord> = sorted.iter().copied().filter(|r| r.turn == turn).collect();
        let Some(view) = at_turn.first() else {
            continue;
        };
        last_turn = turn;
        alive = view.request.board.snakes.iter().map(|s| s.id.clone()).collect();

        for snake in &view.request.board.snakes {
            let i = *index.entry(snake.id.clone()).or_insert_with(|| {
                participants.push(ParticipantSummary::new(snake, turn));
                participants.len() - 1
            });
            if participants[i].result.is_none() {
                participants[i].observe(snake, turn);
            }
        }

        let vanished: Vec<usize> = participants
            .iter()
            .enumerate()
            .filter(|(_, p)| p.result.is_none() && !alive.contains(&p.snake_id))
            .map(|(i, _)| i)
            .collect();

        for i in vanished {
            let snake_id = participants[i].snake_id.clone();
            let end_view = at_turn
                .iter()
                .find(|r| r.is_end() && r.request.you.id == snake_id);
            let last_move = sorted
                .iter()
                .rev()
                .find(|r| r.turn < turn && !r.is_end() && r.request.you.id == snake_id);

            let mut cause = end_view
                .map(|r| death_cause_at_rest(&r.request.you, &r.request.board))
                .unwrap_or(DeathCause::Unknown);
            if cause == DeathCause::Unknown {
                cause = match last_move {
                    Some(record) => death_cause_after_move(participants[i].final_health, record),
                    None if participants[i].final_health <= 0 => DeathCause::Starvation,
                    None => DeathCause::Unknown,
                };
            }
            let killer = last_move.and_then(|record| find_killer(cause, record));

            let p = &mut participants[i];
            p.result = Some(GameResult::Loss);
            p.death_cause = Some(cause);
            p.turns_survived = turn;
            p.killed_by = killer.clone();

            if let Some(k) = killer.and_then(|k| index.get(&k).copied()) {
                participants[k].kills += 1;
            }
        }
    }

    let finished = sorted.last().map_or(false, |r| r.is_end());
    if finished {
        let survivors: Vec<usize> = participants
            .iter()
            .enumerate()
            .filter(|(_, p)| p.result.is_none() && alive.contains(&p.snake_id))
            .map(|(i, _)| i)
            .collect();
        let result = if survivors.len() == 1 {
            GameResult::Win
        } else {
            GameResult::Draw
        };
        for i in survivors {
            participants[i].result = Some(result);
        }
    }

    GameSummary {
        game_id: game_id.to_string(),
        finished,
        last_turn,
        participants,
    }
}
