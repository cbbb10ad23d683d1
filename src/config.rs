//! Race configuration and difficulty presets
//!
//! Configs may come from a JSON file. Problems are either reported
//! (`validate`) or clamped with a warning (`sanitized`) before a race is set
//! up; nothing is checked mid-race.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::bot::PersonalityRange;
use crate::sim::obstacle::CourseLayout;

/// Shortest track that still leaves room to race
pub const MIN_TRACK_LENGTH: f32 = 500.0;
/// Longest track; keeps f32 track coordinates precise and a race finishable
/// well inside the default time limit
pub const MAX_TRACK_LENGTH: f32 = 100_000.0;
/// Smallest allowed obstacle gap
pub const MIN_OBSTACLE_GAP: f32 = 50.0;
pub const MAX_COUNTDOWN_SECS: f32 = 10.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Track length must be between 500 and 100000, got {0}")]
    InvalidTrackLength(f32),
    #[error("Too many bots: {count} (max {max})")]
    TooManyBots { count: usize, max: usize },
    #[error("Invalid obstacle spacing: min {min}, max {max}")]
    InvalidSpacing { min: f32, max: f32 },
    #[error("Invalid {field}: {value}")]
    InvalidDuration { field: &'static str, value: f32 },
    #[error("Viewport width must be positive, got {0}")]
    InvalidViewport(f32),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Opponent difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "norm" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Ranges bot personalities are drawn from
    pub fn personality_range(&self) -> PersonalityRange {
        match self {
            Difficulty::Easy => PersonalityRange {
                speed_min: 0.50,
                speed_max: 0.75,
                jump_min: 0.40,
                jump_max: 0.70,
            },
            Difficulty::Normal => PersonalityRange::default(),
            Difficulty::Hard => PersonalityRange {
                speed_min: 0.75,
                speed_max: 0.95,
                jump_min: 0.75,
                jump_max: 0.95,
            },
        }
    }
}

/// Everything needed to set up a race
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    pub track_length: f32,
    /// Number of computer opponents (zero makes a solo time trial)
    pub bot_count: usize,
    pub countdown_secs: f32,
    /// Race is called after this long; unfinished racers are DNF
    pub time_limit_secs: f32,
    /// Spawn an obstacle course at all
    pub obstacles: bool,
    pub start_offset: f32,
    pub end_buffer: f32,
    pub min_gap: f32,
    pub max_gap: f32,
    /// Fixed course seed; `None` draws a fresh course each race
    pub course_seed: Option<u64>,
    pub difficulty: Difficulty,
    pub viewport_width: f32,
}

impl Default for RaceConfig {
    fn default() -> Self {
        let layout = CourseLayout::default();
        Self {
            track_length: TRACK_LENGTH,
            bot_count: BOT_COUNT,
            countdown_secs: COUNTDOWN_SECS,
            time_limit_secs: TIME_LIMIT_SECS,
            obstacles: true,
            start_offset: layout.start_offset,
            end_buffer: layout.end_buffer,
            min_gap: layout.min_gap,
            max_gap: layout.max_gap,
            course_seed: None,
            difficulty: Difficulty::Normal,
            viewport_width: VIEWPORT_WIDTH,
        }
    }
}

impl RaceConfig {
    /// Apply a difficulty preset
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Course generation parameters
    pub fn layout(&self) -> CourseLayout {
        CourseLayout {
            track_length: self.track_length,
            start_offset: self.start_offset,
            end_buffer: self.end_buffer,
            min_gap: self.min_gap,
            max_gap: self.max_gap,
        }
    }

    /// Report the first problem with this config
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_TRACK_LENGTH..=MAX_TRACK_LENGTH).contains(&self.track_length) {
            return Err(ConfigError::InvalidTrackLength(self.track_length));
        }
        if self.bot_count > MAX_BOTS {
            return Err(ConfigError::TooManyBots {
                count: self.bot_count,
                max: MAX_BOTS,
            });
        }
        if !(self.min_gap >= MIN_OBSTACLE_GAP && self.max_gap >= self.min_gap && self.max_gap.is_finite()) {
            return Err(ConfigError::InvalidSpacing {
                min: self.min_gap,
                max: self.max_gap,
            });
        }
        if !(0.0..=MAX_COUNTDOWN_SECS).contains(&self.countdown_secs) {
            return Err(ConfigError::InvalidDuration {
                field: "countdown_secs",
                value: self.countdown_secs,
            });
        }
        if !(self.time_limit_secs.is_finite() && self.time_limit_secs > 0.0) {
            return Err(ConfigError::InvalidDuration {
                field: "time_limit_secs",
                value: self.time_limit_secs,
            });
        }
        if !(self.viewport_width.is_finite() && self.viewport_width > 0.0) {
            return Err(ConfigError::InvalidViewport(self.viewport_width));
        }
        Ok(())
    }

    /// Clamp every field into range, warning about each fix
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !self.track_length.is_finite() || self.track_length < MIN_TRACK_LENGTH {
            log::warn!("Track length {} out of range, using {}", self.track_length, MIN_TRACK_LENGTH);
            self.track_length = if self.track_length.is_finite() {
                MIN_TRACK_LENGTH
            } else {
                defaults.track_length
            };
        }
        if self.track_length > MAX_TRACK_LENGTH {
            log::warn!("Track length {} out of range, using {}", self.track_length, MAX_TRACK_LENGTH);
            self.track_length = MAX_TRACK_LENGTH;
        }
        if self.bot_count > MAX_BOTS {
            log::warn!("Bot count {} clamped to {}", self.bot_count, MAX_BOTS);
            self.bot_count = MAX_BOTS;
        }
        if !(self.min_gap.is_finite() && self.min_gap >= MIN_OBSTACLE_GAP) {
            log::warn!("Obstacle min gap {} clamped to {}", self.min_gap, MIN_OBSTACLE_GAP);
            self.min_gap = MIN_OBSTACLE_GAP;
        }
        if !(self.max_gap.is_finite() && self.max_gap >= self.min_gap) {
            log::warn!("Obstacle max gap {} clamped to {}", self.max_gap, self.min_gap);
            self.max_gap = self.min_gap;
        }
        if !(self.start_offset.is_finite() && self.start_offset >= 0.0) {
            self.start_offset = defaults.start_offset;
        }
        if !(self.end_buffer.is_finite() && self.end_buffer >= 0.0) {
            self.end_buffer = defaults.end_buffer;
        }
        if !self.countdown_secs.is_finite() {
            self.countdown_secs = defaults.countdown_secs;
        }
        self.countdown_secs = self.countdown_secs.clamp(0.0, MAX_COUNTDOWN_SECS);
        if !(self.time_limit_secs.is_finite() && self.time_limit_secs > 0.0) {
            log::warn!("Time limit {} invalid, using {}", self.time_limit_secs, defaults.time_limit_secs);
            self.time_limit_secs = defaults.time_limit_secs;
        }
        if !(self.viewport_width.is_finite() && self.viewport_width > 0.0) {
            self.viewport_width = defaults.viewport_width;
        }
        self
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded race config from {}", path.display());
        Ok(config)
    }
}
