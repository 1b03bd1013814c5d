//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Discrete ticks only, no internal timers
//! - Seeded RNG only
//! - No rendering, DOM, or transport dependencies
//!
//! The browser harness drives three independent cadences against this
//! module: the variable-rate tick loop (`tick::step`), the fixed one-second
//! measurement window (`signal::SignalAggregator::close_window`), and the
//! speed recomputation that links them (`speed::SpeedController`).

pub mod collision;
pub mod signal;
pub mod speed;
pub mod state;
pub mod tick;

pub use collision::{hits_body, in_bounds};
pub use signal::{RateSample, SignalAggregator};
pub use speed::{RatePolicy, SpeedController};
pub use state::{Direction, GameOverCause, GamePhase, GameState, StepResult};
pub use tick::{set_direction, step};
