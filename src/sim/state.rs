//! Game state and core simulation types
//!
//! Everything the snake engine mutates lives here; the step transition
//! itself is in [`super::tick`].

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::hits_body;
use crate::config::{ConfigError, GameConfig};
use std::collections::VecDeque;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// No direction chosen yet, snake motionless
    Idle,
    /// Actively ticking
    Running,
    /// Terminal; snake and food frozen, further steps rejected
    Over,
}

/// Why the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverCause {
    /// Head left the board
    OutOfBounds,
    /// Head ran into the body
    SelfCollision,
    /// Snake fills the board, nowhere left to place food (a win)
    BoardFull,
}

/// Outcome of a single engine step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    Moved { ate_food: bool },
    GameOver(GameOverCause),
}

/// Cardinal movement direction. "Not moving yet" is `Option::None`
/// on [`GameState::direction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit cell delta, y grows downward (canvas convention)
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Complete game state (deterministic under a fixed seed)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Board width/height in tiles
    pub board_tiles: i32,
    /// Body cells, head first. Never empty, never self-overlapping
    /// outside a single step.
    pub snake: VecDeque<IVec2>,
    /// Food cell, never on the snake
    pub food: IVec2,
    /// Current heading; `None` until the first accepted input
    pub direction: Option<Direction>,
    /// One direction change already accepted this tick (debounce)
    pub direction_locked: bool,
    /// Food eaten this run
    pub score: u32,
    /// Current phase
    pub phase: GamePhase,
    /// Set exactly when `phase` is `Over`
    pub over_cause: Option<GameOverCause>,
    /// Completed movement steps
    pub time_ticks: u64,
    rng: Pcg32,
}

impl GameState {
    /// Create a fresh game on a validated board.
    pub fn new(config: &GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut state = Self {
            seed,
            board_tiles: config.board_tiles,
            snake: VecDeque::new(),
            food: IVec2::ZERO,
            direction: None,
            direction_locked: false,
            score: 0,
            phase: GamePhase::Idle,
            over_cause: None,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
        };
        state.snake.push_front(state.start_cell());
        // a validated board (>= 2x2) always has a free cell for a 1-segment snake
        state.place_food();
        Ok(state)
    }

    /// Starting cell: board center
    pub fn start_cell(&self) -> IVec2 {
        IVec2::splat(self.board_tiles / 2)
    }

    /// Cells not covered by the snake
    pub fn free_cells(&self) -> usize {
        (self.board_tiles as usize * self.board_tiles as usize) - self.snake.len()
    }

    /// Place food on a uniformly random free cell via rejection sampling.
    /// Returns `false` when the board is full (no placement happened);
    /// callers report that as [`GameOverCause::BoardFull`].
    pub fn place_food(&mut self) -> bool {
        if self.free_cells() == 0 {
            return false;
        }
        loop {
            let candidate = IVec2::new(
                self.rng.random_range(0..self.board_tiles),
                self.rng.random_range(0..self.board_tiles),
            );
            if !hits_body(candidate, &self.snake) {
                self.food = candidate;
                return true;
            }
        }
    }

    /// Back to Idle: single segment at the start cell, no heading, score
    /// cleared, fresh food. The RNG stream continues from where it was.
    pub fn reset(&mut self) {
        self.snake.clear();
        self.snake.push_front(self.start_cell());
        self.direction = None;
        self.direction_locked = false;
        self.score = 0;
        self.phase = GamePhase::Idle;
        self.over_cause = None;
        self.time_ticks = 0;
        self.place_food();
    }

    /// Head cell. The snake is never empty.
    pub fn head(&self) -> IVec2 {
        *self.snake.front().unwrap_or(&IVec2::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(&GameConfig::default(), 7).expect("default config is valid")
    }

    #[test]
    fn test_new_game_starts_idle_at_center() {
        let state = state();
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.head(), IVec2::new(10, 10));
        assert_eq!(state.direction, None);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_food_never_on_snake() {
        let state = state();
        assert!(!state.snake.contains(&state.food));
    }

    #[test]
    fn test_food_placement_deterministic_under_seed() {
        let a = GameState::new(&GameConfig::default(), 42).unwrap();
        let b = GameState::new(&GameConfig::default(), 42).unwrap();
        assert_eq!(a.food, b.food);
    }

    #[test]
    fn test_place_food_reports_full_board() {
        let mut state = state();
        state.snake.clear();
        for y in 0..state.board_tiles {
            for x in 0..state.board_tiles {
                state.snake.push_back(IVec2::new(x, y));
            }
        }
        assert_eq!(state.free_cells(), 0);
        assert!(!state.place_food());
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut state = state();
        state.phase = GamePhase::Over;
        state.over_cause = Some(GameOverCause::OutOfBounds);
        state.score = 9;
        state.direction = Some(Direction::Left);
        state.reset();
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.over_cause, None);
        assert_eq!(state.score, 0);
        assert_eq!(state.direction, None);
        assert_eq!(state.snake.len(), 1);
        assert!(!state.snake.contains(&state.food));
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(GameState::new(
            &GameConfig {
                board_tiles: 0,
                ..GameConfig::default()
            },
            1
        )
        .is_err());
    }
}
