//! Dirt Dash - A side-scrolling dirt racing simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain, vehicles, obstacles, bots, race flow)
//! - `controller`: Frame clock, race commands and best-time bookkeeping
//! - `persistence`: Best-time storage backends
//! - `config`: Race configuration and difficulty presets

pub mod config;
pub mod controller;
pub mod persistence;
pub mod sim;

pub use config::{ConfigError, Difficulty, RaceConfig};
pub use controller::{FrameInput, RaceController};
pub use persistence::{BestTimeStore, MemoryStore, PersistenceError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz; all tuning assumes this rate)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the controller will accept (stalled tab, debugger, ...)
    pub const MAX_FRAME_DT: f32 = 0.25;

    /// Track defaults
    pub const TRACK_LENGTH: f32 = 4000.0;
    /// Screen-space pivot of the terrain (y grows downward)
    pub const GROUND_Y: f32 = 720.0;
    /// Where every vehicle lines up
    pub const START_POSITION: f32 = 40.0;

    /// Vehicle tuning (units per second / per second²)
    pub const MAX_SPEED: f32 = 1320.0;
    pub const ACCEL: f32 = 900.0;
    pub const BRAKE: f32 = 1260.0;
    /// Exponential rolling decay rate (1/s) when coasting
    pub const ROLLING_RESISTANCE: f32 = 0.6;
    pub const GRAVITY: f32 = 2160.0;
    pub const JUMP_VELOCITY: f32 = 960.0;
    /// Gap between the wheels and the ground line used for obstacle contact
    pub const CONTACT_CLEARANCE: f32 = 2.0;

    /// Rock/log bump response
    pub const BUMP_SPEED_PENALTY: f32 = 132.0;
    pub const BUMP_VELOCITY: f32 = 300.0;
    pub const BUMP_LIFT: f32 = 6.0;
    /// Ramp launch response
    pub const RAMP_LAUNCH_VELOCITY: f32 = 1056.0;
    pub const RAMP_SPEED_BOOST: f32 = 60.0;

    /// Race flow
    pub const COUNTDOWN_SECS: f32 = 3.2;
    pub const TIME_LIMIT_SECS: f32 = 300.0;
    pub const BOT_COUNT: usize = 3;
    pub const MAX_BOTS: usize = 8;

    /// Camera
    pub const VIEWPORT_WIDTH: f32 = 1920.0;
    /// Fraction of the viewport kept behind the player
    pub const CAMERA_LEAD: f32 = 0.4;
    /// Per-frame easing factor at 60 Hz
    pub const CAMERA_EASE: f32 = 0.08;
}

/// Default display name for a player who leaves the name blank
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// Trim a free-text display name, falling back to [`DEFAULT_PLAYER_NAME`]
pub fn sanitize_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        DEFAULT_PLAYER_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Format race seconds the way the HUD shows them ("12.34s")
pub fn format_race_time(secs: f32) -> String {
    format!("{:.2}s", secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("  Ada "), "Ada");
        assert_eq!(sanitize_name("   "), DEFAULT_PLAYER_NAME);
        assert_eq!(sanitize_name(""), DEFAULT_PLAYER_NAME);
    }

    #[test]
    fn test_format_race_time() {
        assert_eq!(format_race_time(12.345), "12.35s");
        assert_eq!(format_race_time(0.0), "0.00s");
    }
}
