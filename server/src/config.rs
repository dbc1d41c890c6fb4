//! Runtime settings for the server and its simulation.

use crate::error::{Result, ServerError};
use shared::{Arena, STEP, STRIKE_REACH, TICK_RATE};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the listener binds to
    pub bind_addr: String,
    /// Simulation steps per second
    pub tick_rate: u32,
    pub arena: Arena,
    /// Units moved per accepted move command
    pub step: i32,
    /// Horizontal reach of a strike beyond the sprite
    pub strike_reach: i32,
    /// Fixed seed for spawn placement, random when absent
    pub seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
            tick_rate: TICK_RATE,
            arena: Arena::default(),
            step: STEP,
            strike_reach: STRIKE_REACH,
            seed: None,
        }
    }
}

impl ServerConfig {
    pub fn tick_duration(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / self.tick_rate.max(1) as u64)
    }

    /// Rejects arenas with no legal spawn position.
    pub fn validate(&self) -> Result<()> {
        let (min_x, max_x) = self.arena.legal_x();
        let (min_y, max_y) = self.arena.legal_y();
        if min_x > max_x || min_y > max_y {
            return Err(ServerError::InvalidConfig(format!(
                "a {}x{} arena cannot fit a {}x{} sprite",
                self.arena.width,
                self.arena.height,
                self.arena.sprite_width,
                self.arena.sprite_height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, "127.0.0.1:8000");
        assert_eq!(config.tick_rate, 20);
        assert_eq!(config.arena.width, 1024);
        assert_eq!(config.arena.height, 768);
        assert_eq!(config.step, 5);
        assert_eq!(config.strike_reach, 5);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_tick_duration() {
        let config = ServerConfig::default();
        assert_eq!(config.tick_duration(), Duration::from_millis(50));

        let zero = ServerConfig {
            tick_rate: 0,
            ..ServerConfig::default()
        };
        assert_eq!(zero.tick_duration(), Duration::from_secs(1));
    }

    #[test]
    fn test_validate() {
        assert!(ServerConfig::default().validate().is_ok());

        let arena = |width, height| ServerConfig {
            arena: Arena {
                width,
                height,
                ..Arena::default()
            },
            ..ServerConfig::default()
        };
        // Smallest arena with exactly one legal spot.
        assert!(arena(52, 112).validate().is_ok());
        for (width, height) in [(0, 768), (-10, 768), (1024, 0), (51, 768), (1024, 111)] {
            let err = arena(width, height).validate().unwrap_err();
            assert!(matches!(err, ServerError::InvalidConfig(_)));
        }
    }
}
