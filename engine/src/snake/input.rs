use super::types::{Direction, TurnRejection};

/// Buffers at most one direction change between ticks.
///
/// Requests arrive at input-event frequency, ticks at simulation frequency;
/// only the last accepted request before a tick is applied by that tick.
/// With a turn delay configured, a request arriving sooner than
/// `turn_delay_ms` after the previous accepted one is dropped.
#[derive(Clone, Debug, Default)]
pub struct InputArbiter {
    pending: Option<Direction>,
    turn_delay_ms: Option<u64>,
    last_accepted_at: Option<u64>,
}

impl InputArbiter {
    pub fn new(turn_delay_ms: Option<u64>) -> Self {
        Self {
            pending: None,
            turn_delay_ms,
            last_accepted_at: None,
        }
    }

    /// `current` is the direction the snake moved in on the last tick.
    pub fn request(
        &mut self,
        direction: Direction,
        current: Direction,
        now_ms: u64,
    ) -> Result<(), TurnRejection> {
        if let (Some(delay), Some(last)) = (self.turn_delay_ms, self.last_accepted_at)
            && now_ms.saturating_sub(last) < delay
        {
            return Err(TurnRejection::Throttled);
        }

        if direction.is_opposite(&current) {
            return Err(TurnRejection::Reversal);
        }

        self.pending = Some(direction);
        self.last_accepted_at = Some(now_ms);
        Ok(())
    }

    pub fn pending(&self) -> Option<Direction> {
        self.pending
    }

    pub fn take_pending(&mut self) -> Option<Direction> {
        self.pending.take()
    }

    pub fn turn_delay_ms(&self) -> Option<u64> {
        self.turn_delay_ms
    }
}
