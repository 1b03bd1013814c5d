//! Board occupancy predicates
//!
//! Pure helpers shared by the step transition and the food placer.

use glam::IVec2;
use std::collections::VecDeque;

/// True when `pos` lies inside the `[0, tiles)` square on both axes
#[inline]
pub fn in_bounds(pos: IVec2, tiles: i32) -> bool {
    pos.x >= 0 && pos.x < tiles && pos.y >= 0 && pos.y < tiles
}

/// True when `pos` coincides with any body segment
#[inline]
pub fn hits_body(pos: IVec2, snake: &VecDeque<IVec2>) -> bool {
    snake.iter().any(|&segment| segment == pos)
}
