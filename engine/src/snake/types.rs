use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbouring cell in `direction`, without any boundary policy applied.
    pub fn offset(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit vector in grid coordinates; y grows downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    pub fn is_opposite(&self, other: &Direction) -> bool {
        self.opposite() == *other
    }

    /// Resolves a free-form vector (swipe, analog stick) to the dominant
    /// cardinal axis. Exact diagonals resolve horizontally.
    pub fn from_delta(dx: f32, dy: f32) -> Option<Direction> {
        if !dx.is_finite() || !dy.is_finite() || (dx == 0.0 && dy == 0.0) {
            return None;
        }
        if dx.abs() >= dy.abs() {
            Some(if dx > 0.0 { Direction::Right } else { Direction::Left })
        } else {
            Some(if dy > 0.0 { Direction::Down } else { Direction::Up })
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallCollisionMode {
    Death,
    #[default]
    WrapAround,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathReason {
    WallCollision,
    SelfCollision,
}

impl fmt::Display for DeathReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeathReason::WallCollision => write!(f, "hit a wall"),
            DeathReason::SelfCollision => write!(f, "ran into itself"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnRejection {
    Reversal,
    Throttled,
    NotRunning,
}

impl fmt::Display for TurnRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnRejection::Reversal => write!(f, "cannot reverse into the body"),
            TurnRejection::Throttled => write!(f, "direction changed too recently"),
            TurnRejection::NotRunning => write!(f, "game is not running"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    NotStarted,
    Running,
    Paused,
    Lost(DeathReason),
    Won,
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        matches!(self, GameStatus::Lost(_) | GameStatus::Won)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::NotStarted => write!(f, "Not Started"),
            GameStatus::Running => write!(f, "Playing"),
            GameStatus::Paused => write!(f, "Paused"),
            GameStatus::Lost(reason) => write!(f, "Game Over ({})", reason),
            GameStatus::Won => write!(f, "Won"),
        }
    }
}
