use std::collections::{HashSet, VecDeque};

use super::grid::Grid;
use super::input::InputArbiter;
use super::types::{DeathReason, Direction, Point, TurnRejection};

/// Ordered body (head first) with an occupancy set kept in step with it.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Point>,
    body_set: HashSet<Point>,
    direction: Direction,
    input: InputArbiter,
    growth_pending: bool,
}

impl Snake {
    pub fn new(start_pos: Point, direction: Direction, turn_delay_ms: Option<u64>) -> Self {
        Self {
            body: VecDeque::from([start_pos]),
            body_set: HashSet::from([start_pos]),
            direction,
            input: InputArbiter::new(turn_delay_ms),
            growth_pending: false,
        }
    }

    /// Builds a snake from explicit segments, head first.
    pub fn from_segments(
        segments: &[Point],
        direction: Direction,
        turn_delay_ms: Option<u64>,
    ) -> Result<Self, String> {
        if segments.is_empty() {
            return Err("Snake needs at least one segment".to_string());
        }
        let body: VecDeque<Point> = segments.iter().copied().collect();
        let body_set: HashSet<Point> = segments.iter().copied().collect();
        if body_set.len() != body.len() {
            return Err("Snake segments must not overlap".to_string());
        }

        Ok(Self {
            body,
            body_set,
            direction,
            input: InputArbiter::new(turn_delay_ms),
            growth_pending: false,
        })
    }

    pub fn set_direction(
        &mut self,
        direction: Direction,
        now_ms: u64,
    ) -> Result<(), TurnRejection> {
        self.input.request(direction, self.direction, now_ms)
    }

    pub fn grow(&mut self) {
        self.growth_pending = true;
    }

    /// Moves one cell. On a collision the body is left untouched and the
    /// reason is returned; otherwise the new head is returned.
    pub fn advance(&mut self, grid: &Grid) -> Result<Point, DeathReason> {
        if let Some(next_direction) = self.input.take_pending()
            && !next_direction.is_opposite(&self.direction)
        {
            self.direction = next_direction;
        }

        let next_head = grid
            .step(self.head(), self.direction)
            .ok_or(DeathReason::WallCollision)?;

        // The tail cell is vacated this tick unless the snake is growing.
        let hits_body = self.body_set.contains(&next_head)
            && (self.growth_pending || next_head != self.tail());
        if hits_body {
            return Err(DeathReason::SelfCollision);
        }

        if !self.growth_pending
            && let Some(tail) = self.body.pop_back()
        {
            self.body_set.remove(&tail);
        }
        self.body.push_front(next_head);
        self.body_set.insert(next_head);
        self.growth_pending = false;

        debug_assert_eq!(self.body.len(), self.body_set.len());
        Ok(next_head)
    }

    pub fn head(&self) -> Point {
        self.body[0]
    }

    pub fn tail(&self) -> Point {
        self.body[self.body.len() - 1]
    }

    pub fn segments(&self) -> &VecDeque<Point> {
        &self.body
    }

    pub fn occupied(&self) -> &HashSet<Point> {
        &self.body_set
    }

    pub fn contains(&self, cell: Point) -> bool {
        self.body_set.contains(&cell)
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.input.pending()
    }

    pub fn is_growing(&self) -> bool {
        self.growth_pending
    }
}
