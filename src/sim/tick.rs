//! Snake engine step transition
//!
//! One call to [`step`] advances the snake by exactly one cell. Direction
//! intents go through [`set_direction`], which debounces to one accepted
//! change per tick so a pair of quick key presses cannot reverse the snake
//! into itself before the next redraw.

use super::collision::{hits_body, in_bounds};
use super::state::{Direction, GameOverCause, GamePhase, GameState, StepResult};

/// Request a heading change. Returns whether the request was accepted.
///
/// Rejected (and silently dropped - this is expected contention, not a
/// fault) when:
/// - the game is over,
/// - a change was already accepted since the last completed step, or
/// - the request is the exact opposite of the current heading.
///
/// The first accepted direction moves the game from Idle to Running.
pub fn set_direction(state: &mut GameState, requested: Direction) -> bool {
    if state.phase == GamePhase::Over {
        return false;
    }
    if state.direction_locked {
        return false;
    }
    if let Some(current) = state.direction {
        if requested == current.opposite() {
            return false;
        }
    }
    state.direction = Some(requested);
    state.direction_locked = true;
    if state.phase == GamePhase::Idle {
        state.phase = GamePhase::Running;
    }
    true
}

fn terminal(state: &mut GameState, cause: GameOverCause) -> StepResult {
    state.phase = GamePhase::Over;
    state.over_cause = Some(cause);
    StepResult::GameOver(cause)
}

/// Advance the simulation by one tick.
///
/// After game over this is an idempotent no-op that keeps reporting the
/// original cause, so a timer that fires late mutates nothing.
pub fn step(state: &mut GameState) -> StepResult {
    if state.phase == GamePhase::Over {
        return StepResult::GameOver(state.over_cause.unwrap_or(GameOverCause::SelfCollision));
    }

    // Tick opens: the next direction change may be accepted.
    state.direction_locked = false;

    let Some(direction) = state.direction else {
        // No input yet, simulation paused.
        return StepResult::Moved { ate_food: false };
    };

    let new_head = state.head() + direction.delta();
    if !in_bounds(new_head, state.board_tiles) {
        return terminal(state, GameOverCause::OutOfBounds);
    }
    // Checked against the pre-pop body: the tail cell still blocks this tick.
    if hits_body(new_head, &state.snake) {
        return terminal(state, GameOverCause::SelfCollision);
    }

    state.snake.push_front(new_head);
    state.time_ticks += 1;

    if new_head == state.food {
        state.score += 1;
        if !state.place_food() {
            // Snake now covers the whole board.
            return terminal(state, GameOverCause::BoardFull);
        }
        StepResult::Moved { ate_food: true }
    } else {
        state.snake.pop_back();
        StepResult::Moved { ate_food: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use glam::IVec2;
    use proptest::prelude::*;
    use std::collections::{HashSet, VecDeque};

    fn state() -> GameState {
        GameState::new(&GameConfig::default(), 12345).expect("default config is valid")
    }

    fn state_with_snake(cells: &[(i32, i32)], direction: Direction) -> GameState {
        let mut state = state();
        state.snake = cells
            .iter()
            .map(|&(x, y)| IVec2::new(x, y))
            .collect::<VecDeque<_>>();
        state.direction = Some(direction);
        state.phase = GamePhase::Running;
        state
    }

    #[test]
    fn test_step_without_input_is_noop() {
        let mut state = state();
        let snake_before = state.snake.clone();
        let food_before = state.food;

        assert_eq!(step(&mut state), StepResult::Moved { ate_food: false });
        assert_eq!(state.snake, snake_before);
        assert_eq!(state.food, food_before);
        assert_eq!(state.score, 0);
        assert_eq!(state.phase, GamePhase::Idle);
    }

    #[test]
    fn test_first_accepted_direction_starts_running() {
        let mut state = state();
        state.food = IVec2::ZERO; // keep food out of the snake's path

        assert!(set_direction(&mut state, Direction::Right));
        assert_eq!(state.phase, GamePhase::Running);

        assert_eq!(step(&mut state), StepResult::Moved { ate_food: false });
        assert_eq!(state.head(), IVec2::new(11, 10));
        assert_eq!(state.direction, Some(Direction::Right));
        assert_eq!(state.score, 0);
        assert_eq!(state.snake.len(), 1);
    }

    #[test]
    fn test_debounce_one_change_per_tick() {
        let mut state = state();
        state.food = IVec2::ZERO;

        assert!(set_direction(&mut state, Direction::Right));
        // Second request within the same tick is dropped, even a legal one.
        assert!(!set_direction(&mut state, Direction::Up));
        assert_eq!(state.direction, Some(Direction::Right));

        step(&mut state);
        // Tick completed, input reopens.
        assert!(set_direction(&mut state, Direction::Up));
    }

    #[test]
    fn test_reverse_request_rejected() {
        let mut state = state();
        state.food = IVec2::ZERO;
        assert!(set_direction(&mut state, Direction::Right));
        step(&mut state);

        assert!(!set_direction(&mut state, Direction::Left));
        assert_eq!(state.direction, Some(Direction::Right));
        // Same direction again is not a reversal and passes the filter.
        assert!(set_direction(&mut state, Direction::Right));
    }

    #[test]
    fn test_eating_food_grows_and_replaces() {
        let mut state = state_with_snake(&[(5, 5), (4, 5), (3, 5)], Direction::Right);
        state.food = IVec2::new(6, 5);

        assert_eq!(step(&mut state), StepResult::Moved { ate_food: true });
        assert_eq!(
            state.snake,
            [IVec2::new(6, 5), IVec2::new(5, 5), IVec2::new(4, 5), IVec2::new(3, 5)]
                .into_iter()
                .collect::<VecDeque<_>>()
        );
        assert_eq!(state.score, 1);
        assert!(!state.snake.contains(&state.food));
    }

    #[test]
    fn test_wall_hit_is_out_of_bounds() {
        let mut state = state_with_snake(&[(0, 5)], Direction::Left);

        assert_eq!(
            step(&mut state),
            StepResult::GameOver(GameOverCause::OutOfBounds)
        );
        assert_eq!(state.phase, GamePhase::Over);

        // Frozen and idempotent from here on.
        let snake_before = state.snake.clone();
        assert_eq!(
            step(&mut state),
            StepResult::GameOver(GameOverCause::OutOfBounds)
        );
        assert_eq!(state.snake, snake_before);
        assert!(!set_direction(&mut state, Direction::Up));
    }

    #[test]
    fn test_body_hit_is_self_collision() {
        // Head at (5,5) with body hooked around so Left runs into (4,5).
        let mut state =
            state_with_snake(&[(5, 5), (5, 6), (4, 6), (4, 5)], Direction::Left);
        state.food = IVec2::ZERO;

        assert_eq!(
            step(&mut state),
            StepResult::GameOver(GameOverCause::SelfCollision)
        );
        assert_eq!(state.snake.len(), 4);
    }

    #[test]
    fn test_tail_cell_blocks_before_pop() {
        // Moving into the cell the tail occupies this tick is a collision;
        // the tail only leaves after the head has moved.
        let mut state =
            state_with_snake(&[(5, 5), (4, 5), (4, 6), (5, 6)], Direction::Down);
        state.food = IVec2::ZERO;

        assert_eq!(
            step(&mut state),
            StepResult::GameOver(GameOverCause::SelfCollision)
        );
    }

    #[test]
    fn test_filling_the_board_wins() {
        let config = GameConfig {
            board_tiles: 2,
            ..GameConfig::default()
        };
        let mut state = GameState::new(&config, 99).unwrap();
        state.snake = [(0, 1), (1, 1), (1, 0)]
            .into_iter()
            .map(|(x, y)| IVec2::new(x, y))
            .collect();
        state.food = IVec2::new(0, 0);
        state.direction = Some(Direction::Up);
        state.phase = GamePhase::Running;

        assert_eq!(
            step(&mut state),
            StepResult::GameOver(GameOverCause::BoardFull)
        );
        assert_eq!(state.score, 1);
        assert_eq!(state.snake.len(), 4);
        assert_eq!(state.free_cells(), 0);
    }

    #[test]
    fn test_reset_after_game_over_allows_play() {
        let mut state = state_with_snake(&[(0, 5)], Direction::Left);
        step(&mut state);
        assert_eq!(state.phase, GamePhase::Over);

        state.reset();
        assert!(set_direction(&mut state, Direction::Down));
        assert!(matches!(step(&mut state), StepResult::Moved { .. }));
    }

    fn dir(index: u8) -> Direction {
        match index % 4 {
            0 => Direction::Up,
            1 => Direction::Down,
            2 => Direction::Left,
            _ => Direction::Right,
        }
    }

    proptest! {
        /// Whatever the input sequence, the board invariants hold after
        /// every tick: no duplicate segments, length >= 1, food off the
        /// snake, and score tracks growth exactly.
        #[test]
        fn prop_board_invariants(seed in any::<u64>(), moves in prop::collection::vec(0u8..4, 1..200)) {
            let mut state = GameState::new(&GameConfig::default(), seed).unwrap();

            for &m in &moves {
                set_direction(&mut state, dir(m));
                step(&mut state);
                if state.phase == GamePhase::Over {
                    break;
                }

                let unique: HashSet<_> = state.snake.iter().map(|p| (p.x, p.y)).collect();
                prop_assert_eq!(unique.len(), state.snake.len());
                prop_assert!(!state.snake.is_empty());
                prop_assert!(!state.snake.contains(&state.food));
                prop_assert_eq!(state.score as usize, state.snake.len() - 1);
            }
        }

        /// A step after game over never mutates anything.
        #[test]
        fn prop_game_over_is_frozen(seed in any::<u64>(), moves in prop::collection::vec(0u8..4, 1..300)) {
            let mut state = GameState::new(&GameConfig::default(), seed).unwrap();

            for &m in &moves {
                set_direction(&mut state, dir(m));
                if let StepResult::GameOver(cause) = step(&mut state) {
                    let snake = state.snake.clone();
                    let food = state.food;
                    let score = state.score;
                    prop_assert_eq!(step(&mut state), StepResult::GameOver(cause));
                    prop_assert_eq!(&state.snake, &snake);
                    prop_assert_eq!(state.food, food);
                    prop_assert_eq!(state.score, score);
                    break;
                }
            }
        }
    }
}
