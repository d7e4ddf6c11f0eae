use std::collections::VecDeque;

use super::board::Board;
use super::direction::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position one cell in a direction
    pub fn moved_in(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake's body, ordered tail to head
///
/// The front of the deque is the oldest segment (tail), the back is the head.
/// While the snake is alive the body never contains duplicate positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Position>,
}

impl Snake {
    /// Create a snake from a tail-to-head path
    pub fn new(path: impl IntoIterator<Item = Position>) -> Self {
        Self {
            body: path.into_iter().collect(),
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        *self.body.back().unwrap()
    }

    /// Candidate head one cell away in `direction`; does not mutate the body
    pub fn next_head(&self, direction: Direction) -> Position {
        self.head().moved_in(direction)
    }

    /// Commit a new head (growth step)
    pub fn push_head(&mut self, position: Position) {
        self.body.push_back(position);
    }

    /// Remove the oldest segment (movement without growth)
    pub fn cut_tail(&mut self) {
        self.body.pop_front();
    }

    /// Check if a position is occupied by any body segment, head included
    pub fn contains(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Iterate segments tail to head
    pub fn segments(&self) -> impl Iterator<Item = Position> + '_ {
        self.body.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Running score for the current game
///
/// Monotonically non-decreasing while a game is in progress; a new game
/// starts from a fresh zeroed score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    value: u32,
}

impl Score {
    pub fn increase(&mut self, amount: u32) {
        self.value += amount;
    }

    pub fn set(&mut self, value: u32) {
        self.value = value;
    }

    pub fn value(&self) -> u32 {
        self.value
    }
}

/// A time-limited bonus collectible
///
/// `ttl` counts remaining ticks; the engine decrements it every tick and
/// removes the bonus when it reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BonusFood {
    pub position: Position,
    pub ttl: u32,
}

/// Type of collision that ended a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Head left the board
    Wall,
    /// Head ran into the body
    SelfCollision,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub board: Board,
    pub snake: Snake,
    pub main_food: Option<Position>,
    pub bonus_food: Option<BonusFood>,
    pub score: Score,
    pub food_eaten: u32,
    pub playing: bool,
}

impl GameState {
    /// Create a fresh in-progress state with no food placed yet
    pub fn new(board: Board, snake: Snake) -> Self {
        Self {
            board,
            snake,
            main_food: None,
            bonus_food: None,
            score: Score::default(),
            food_eaten: 0,
            playing: true,
        }
    }
}
