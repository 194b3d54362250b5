use std::fmt;

use serde::Serialize;

use super::types::{Direction, GameStatus, Point};

/// Owned copy of everything a renderer needs for one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub segments: Vec<Point>,
    pub food: Option<Point>,
    pub score: u32,
    pub high_score: u32,
    pub status: GameStatus,
    pub direction: Direction,
    pub tick_interval_ms: u64,
}

impl GameSnapshot {
    pub fn head(&self) -> Option<Point> {
        self.segments.first().copied()
    }
}

/// Debug overlay text, one `key: value` pair per line.
impl fmt::Display for GameSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Game Speed: {}", self.tick_interval_ms)?;
        writeln!(f, "Score: {}", self.score)?;
        writeln!(f, "High Score: {}", self.high_score)?;
        writeln!(f, "Snake Length: {}", self.segments.len())?;
        match self.head() {
            Some(head) => writeln!(f, "Snake Head: {}", head)?,
            None => writeln!(f, "Snake Head: none")?,
        }
        match self.food {
            Some(food) => writeln!(f, "Food Position: {}", food)?,
            None => writeln!(f, "Food Position: none")?,
        }
        write!(f, "Game State: {}", self.status)
    }
}
