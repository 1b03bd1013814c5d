//! Input intent mapping
//!
//! Translates keyboard and touch gestures into cardinal directions. Kept
//! free of browser types so it tests natively; the engine applies its own
//! debounce and reversal filtering on top of whatever arrives here.

use crate::sim::Direction;

/// Map a `KeyboardEvent::key` value to a direction
pub fn direction_from_key(key: &str) -> Option<Direction> {
    match key {
        "ArrowUp" => Some(Direction::Up),
        "ArrowDown" => Some(Direction::Down),
        "ArrowLeft" => Some(Direction::Left),
        "ArrowRight" => Some(Direction::Right),
        _ => None,
    }
}

/// Recognizes swipes from touch start/end coordinates.
///
/// A gesture counts once the finger travels past the threshold on either
/// axis; the dominant axis picks the direction.
#[derive(Debug)]
pub struct SwipeTracker {
    start: Option<(f32, f32)>,
    threshold: f32,
}

impl SwipeTracker {
    pub fn new(threshold: f32) -> Self {
        Self {
            start: None,
            threshold,
        }
    }

    /// Touch went down
    pub fn begin(&mut self, x: f32, y: f32) {
        self.start = Some((x, y));
    }

    /// Touch lifted; returns the swipe direction if the gesture qualifies
    pub fn end(&mut self, x: f32, y: f32) -> Option<Direction> {
        let (start_x, start_y) = self.start.take()?;
        let dx = x - start_x;
        let dy = y - start_y;

        if dx.abs() <= self.threshold && dy.abs() <= self.threshold {
            return None;
        }

        if dx.abs() > dy.abs() {
            Some(if dx > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            })
        } else {
            Some(if dy > 0.0 {
                Direction::Down
            } else {
                Direction::Up
            })
        }
    }
}
