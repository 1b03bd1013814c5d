//! Static game configuration
//!
//! Set once at construction; validated before the engine or the speed
//! controller will start. Persisted to LocalStorage so rate-policy tuning
//! survives reloads.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::RatePolicy;

/// Construction-time configuration faults. Fatal: the game must not start
/// with any of these.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Board must be at least 2x2 to hold the snake plus a food cell
    BoardTooSmall(i32),
    NonPositiveTickRate(f32),
    NonPositiveRateDivisor(f32),
    NonPositiveRateCap(f32),
    ZeroWindow,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::BoardTooSmall(tiles) => {
                write!(f, "board must be at least 2x2 tiles, got {tiles}")
            }
            ConfigError::NonPositiveTickRate(tps) => {
                write!(f, "base tick rate must be positive, got {tps}")
            }
            ConfigError::NonPositiveRateDivisor(d) => {
                write!(f, "rate divisor must be positive, got {d}")
            }
            ConfigError::NonPositiveRateCap(c) => {
                write!(f, "rate cap must be positive, got {c}")
            }
            ConfigError::ZeroWindow => write!(f, "measurement window must be non-zero"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Board width/height in tiles
    pub board_tiles: i32,
    /// Tile edge length in pixels (rendering only)
    pub tile_size: u32,
    /// Tick rate with no transaction boost
    pub base_ticks_per_second: f32,
    /// Measurement window length in milliseconds
    pub window_ms: u32,
    /// Rate normalization: count / divisor
    pub rate_divisor: f32,
    /// Optional multiplier ceiling
    pub rate_cap: Option<f32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_tiles: BOARD_TILES,
            tile_size: TILE_SIZE,
            base_ticks_per_second: BASE_TICKS_PER_SECOND,
            window_ms: WINDOW_MS,
            rate_divisor: RATE_DIVISOR,
            rate_cap: None,
        }
    }
}

impl GameConfig {
    /// Check every construction invariant. Called by `GameState::new` and
    /// `SpeedController::new`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_tiles < 2 {
            return Err(ConfigError::BoardTooSmall(self.board_tiles));
        }
        if !(self.base_ticks_per_second > 0.0) {
            return Err(ConfigError::NonPositiveTickRate(self.base_ticks_per_second));
        }
        if !(self.rate_divisor > 0.0) {
            return Err(ConfigError::NonPositiveRateDivisor(self.rate_divisor));
        }
        if let Some(cap) = self.rate_cap {
            if !(cap > 0.0) {
                return Err(ConfigError::NonPositiveRateCap(cap));
            }
        }
        if self.window_ms == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        Ok(())
    }

    /// Normalization policy for the speed controller
    pub fn rate_policy(&self) -> RatePolicy {
        RatePolicy {
            divisor: self.rate_divisor,
            cap: self.rate_cap,
        }
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "crypto_snake_config";

    /// Load config from LocalStorage, falling back to defaults (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(config) = serde_json::from_str::<GameConfig>(&json) {
                    if config.validate().is_ok() {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    log::warn!("Stored config invalid, using defaults");
                }
            }
        }

        Self::default()
    }

    /// Save config to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Config saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_board_too_small() {
        for tiles in [-1, 0, 1] {
            let config = GameConfig {
                board_tiles: tiles,
                ..GameConfig::default()
            };
            assert_eq!(config.validate(), Err(ConfigError::BoardTooSmall(tiles)));
        }
    }

    #[test]
    fn test_non_positive_tick_rate() {
        let config = GameConfig {
            base_ticks_per_second: 0.0,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositiveTickRate(0.0))
        );
    }

    #[test]
    fn test_nan_tick_rate_rejected() {
        let config = GameConfig {
            base_ticks_per_second: f32::NAN,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_rate_policy_fields() {
        let config = GameConfig {
            rate_divisor: 0.0,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositiveRateDivisor(0.0))
        );

        let config = GameConfig {
            rate_cap: Some(-1.0),
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NonPositiveRateCap(-1.0)));
    }

    #[test]
    fn test_zero_window_rejected() {
        let config = GameConfig {
            window_ms: 0,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroWindow));
    }
}
