//! Crypto Snake - classic snake, paced by the Bitcoin mempool
//!
//! Core modules:
//! - `sim`: Deterministic simulation (snake engine, rate aggregation, speed control)
//! - `config`: Static game configuration with validation
//! - `input`: Keyboard/swipe intent mapping
//! - `highscores`: Local leaderboard
//! - `feed`: Blockchain WebSocket transport (wasm only)
//! - `render`: Canvas 2D drawing (wasm only)

pub mod config;
#[cfg(target_arch = "wasm32")]
pub mod feed;
pub mod highscores;
pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod render;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use highscores::HighScores;

/// Game configuration constants
pub mod consts {
    /// Board width/height in tiles (400 px canvas / 20 px tiles)
    pub const BOARD_TILES: i32 = 20;
    /// Tile edge length in pixels
    pub const TILE_SIZE: u32 = 20;
    /// Base ticks per second before any rate boost
    pub const BASE_TICKS_PER_SECOND: f32 = 1.3;
    /// Fixed measurement window for the transaction rate
    pub const WINDOW_MS: u32 = 1000;
    /// Raw tx count is divided by this before becoming the multiplier
    pub const RATE_DIVISOR: f32 = 2.0;
    /// Minimum finger travel (px) for a touch to count as a swipe
    pub const SWIPE_THRESHOLD: f32 = 20.0;
}

/// Convert a board cell coordinate to its top-left pixel coordinate
#[inline]
pub fn cell_to_px(cell: i32, tile_size: u32) -> f64 {
    (cell as i64 * tile_size as i64) as f64
}
