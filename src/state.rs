// State model built from a turn snapshot
//
// Converts wire types into grid space exactly once. The board height is passed
// explicitly to the conversion so nothing here needs to know its owner.

use crate::geometry::{self, Pos};
use crate::types::{Battlesnake, Coord, GameState};

/// Informational game data. Not used in scoring.
#[derive(Debug, Clone, Default)]
pub struct GameInfo {
    pub id: String,
    pub ruleset: String,
    pub map: String,
    pub timeout: u32,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnakeState {
    pub id: String,
    pub name: String,
    pub health: i32,
    pub body: Vec<Pos>,
    pub head: Pos,
    pub length: usize,
}

impl SnakeState {
    /// Normalizes a wire snake. `board_height` drives the Y flip.
    pub fn from_wire(snake: &Battlesnake, board_height: i32) -> Self {
        let body: Vec<Pos> = snake
            .body
            .iter()
            .map(|c| geometry::to_grid(*c, board_height))
            .collect();
        let head = snake
            .head_or_body()
            .map(|c| geometry::to_grid(c, board_height))
            .unwrap_or_default();

        SnakeState {
            id: snake.id.clone(),
            name: snake.name.clone(),
            health: snake.health,
            length: snake.effective_length(),
            body,
            head,
        }
    }

    /// Body segment directly behind the head
    pub fn neck(&self) -> Option<Pos> {
        self.body.get(1).copied()
    }
}

#[derive(Debug, Clone, Default)]
pub struct BoardState {
    pub width: i32,
    pub height: i32,
    pub food: Vec<Pos>,
    pub hazards: Vec<Pos>,
    pub snakes: Vec<SnakeState>,
    /// Used when drawing the grid, not for decisions
    pub you_id: String,
}

impl BoardState {
    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Every snake except the one with `you_id`
    pub fn opponents<'a>(&'a self, you_id: &'a str) -> impl Iterator<Item = &'a SnakeState> + 'a {
        self.snakes.iter().filter(move |s| s.id != you_id)
    }

    pub fn max_opponent_length(&self, you_id: &str) -> usize {
        self.opponents(you_id).map(|s| s.length).max().unwrap_or(0)
    }
}

/// One decision's worth of normalized state
#[derive(Debug, Clone)]
pub struct Turn {
    pub game: GameInfo,
    pub turn: i32,
    pub board: BoardState,
    pub you: SnakeState,
}

impl Turn {
    pub fn from_request(state: &GameState) -> Self {
        let height = state.board.height.max(0);
        let flip = |c: &Coord| geometry::to_grid(*c, height);

        let board = BoardState {
            width: state.board.width.max(0),
            height,
            food: state.board.food.iter().map(flip).collect(),
            hazards: state.board.hazards.iter().map(flip).collect(),
            snakes: state
                .board
                .snakes
                .iter()
                .map(|s| SnakeState::from_wire(s, height))
                .collect(),
            you_id: state.you.id.clone(),
        };

        Turn {
            game: GameInfo {
                id: state.game.id.clone(),
                ruleset: state.game.ruleset.name.clone(),
                map: state.game.map.clone(),
                timeout: state.game.timeout,
                source: state.game.source.clone(),
            },
            turn: state.turn,
            you: SnakeState::from_wire(&state.you, height),
            board,
        }
    }

    pub fn grid(&self) -> Grid {
        Grid::build(&self.board, &self.you)
    }
}

/// Classification of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Food,
    Hazard,
    OwnHead,
    OwnBody,
    EnemyHead,
    EnemyBody,
}

impl Cell {
    pub fn is_dangerous(self) -> bool {
        !matches!(self, Cell::Empty | Cell::Food)
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Food => 'F',
            Cell::Hazard => 'H',
            Cell::OwnHead => 'Y',
            Cell::OwnBody => 'y',
            Cell::EnemyHead => 'E',
            Cell::EnemyBody => 'e',
        }
    }
}

/// Largest board the grid will allocate. Anything bigger is treated as having
/// no cells, so every move reads as out of bounds.
pub const MAX_GRID_CELLS: usize = 1 << 20;

/// Dense per-cell classification of a board, row-major in grid space
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let cells = (width as usize)
            .checked_mul(height as usize)
            .filter(|&n| n <= MAX_GRID_CELLS);

        match cells {
            Some(n) => Grid {
                width,
                height,
                cells: vec![Cell::Empty; n],
            },
            None => Grid {
                width: 0,
                height: 0,
                cells: Vec::new(),
            },
        }
    }

    /// Draws food, hazards and every snake. Heads are drawn over bodies.
    /// The acting snake is drawn even if the board list omits it.
    pub fn build(board: &BoardState, you: &SnakeState) -> Self {
        let mut grid = Grid::new(board.width, board.height);

        for &food in &board.food {
            grid.set(food, Cell::Food);
        }
        for &hazard in &board.hazards {
            grid.set(hazard, Cell::Hazard);
        }

        let mut drew_you = false;
        for snake in &board.snakes {
            let own = snake.id == you.id;
            drew_you |= own;
            grid.draw_snake(snake, own);
        }
        if !drew_you {
            grid.draw_snake(you, true);
        }

        grid
    }

    fn draw_snake(&mut self, snake: &SnakeState, own: bool) {
        let (head_cell, body_cell) = if own {
            (Cell::OwnHead, Cell::OwnBody)
        } else {
            (Cell::EnemyHead, Cell::EnemyBody)
        };
        for &segment in snake.body.iter().skip(1) {
            self.set(segment, body_cell);
        }
        if !snake.body.is_empty() {
            self.set(snake.head, head_cell);
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn index(&self, pos: Pos) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width || pos.y >= self.height {
            return None;
        }
        Some(pos.y as usize * self.width as usize + pos.x as usize)
    }

    /// None when out of bounds
    pub fn get(&self, pos: Pos) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Out-of-bounds writes are ignored
    pub fn set(&mut self, pos: Pos, cell: Cell) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = cell;
        }
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        self.index(pos).is_some()
    }

    pub fn is_passable(&self, pos: Pos) -> bool {
        matches!(self.get(pos), Some(cell) if !cell.is_dangerous())
    }

    /// Text rendering, top row first
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.height as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                out.push(self.cells[(y * self.width + x) as usize].symbol());
            }
            out.push('\n');
        }
        out
    }
}
