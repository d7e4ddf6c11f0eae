use std::collections::VecDeque;

use super::direction::Direction;

/// Pending-direction queue fed by input events
///
/// Key presses arrive between ticks; each accepted press is queued and the
/// queue drains one entry per tick, so rapid input is applied over successive
/// ticks instead of being lost. A request equal or opposite to the effective
/// last direction (the most recently queued entry, or the current direction
/// when nothing is queued) is rejected, which rules out instant U-turns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movement {
    direction: Direction,
    queue: VecDeque<Direction>,
}

impl Movement {
    pub const START_DIRECTION: Direction = Direction::Down;

    pub fn new() -> Self {
        Self {
            direction: Self::START_DIRECTION,
            queue: VecDeque::new(),
        }
    }

    /// The direction currently in effect
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Queue a turn request from the input source
    pub fn queue_turn(&mut self, requested: Direction) {
        let effective_last = self.queue.back().copied().unwrap_or(self.direction);

        if requested == effective_last || requested.is_opposite(effective_last) {
            return;
        }

        self.queue.push_back(requested);
    }

    /// Consume one queued turn and return the direction for this tick
    ///
    /// Called exactly once per tick. With an empty queue the current
    /// direction is unchanged.
    pub fn advance(&mut self) -> Direction {
        if let Some(next) = self.queue.pop_front() {
            self.direction = next;
        }

        self.direction
    }

    /// Back to the startup direction with an empty queue
    pub fn reset(&mut self) {
        self.direction = Self::START_DIRECTION;
        self.queue.clear();
    }
}

impl Default for Movement {
    fn default() -> Self {
        Self::new()
    }
}
