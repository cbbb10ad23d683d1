//! Computer-controlled opponents
//!
//! A bang-bang speed governor plus a look-ahead jump policy. Randomness comes
//! from the caller so tests (and replays of the same seed) are deterministic.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::obstacle::{ObstacleField, ObstacleKind};
use super::vehicle::{Controls, Personality, Vehicle};
use crate::consts::MAX_SPEED;

/// Base look-ahead distance
const LOOKAHEAD_BASE: f32 = 90.0;
/// Extra look-ahead per unit of speed (two 60 Hz frames of travel)
const LOOKAHEAD_PER_SPEED: f32 = 2.0 / 60.0;
/// Rocks/logs are only jumped once this close
const PROXIMITY_BASE: f32 = 60.0;
const PROXIMITY_PER_SPEED: f32 = 0.02;
/// Bots like jumping ramps a little more than rocks
const RAMP_JUMP_BONUS: f32 = 0.1;

/// Personality ranges used when rolling a new bot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonalityRange {
    pub speed_min: f32,
    pub speed_max: f32,
    pub jump_min: f32,
    pub jump_max: f32,
}

impl Default for PersonalityRange {
    fn default() -> Self {
        Self {
            speed_min: 0.60,
            speed_max: 0.88,
            jump_min: 0.55,
            jump_max: 0.85,
        }
    }
}

impl PersonalityRange {
    /// Draw a personality; the result always satisfies the personality bounds
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> Personality {
        let speed_lo = self.speed_min.clamp(0.05, 0.99);
        let speed_hi = self.speed_max.clamp(speed_lo, 0.99);
        let jump_lo = self.jump_min.clamp(0.0, 1.0);
        let jump_hi = self.jump_max.clamp(jump_lo, 1.0);
        Personality {
            target_speed_fraction: rng.random_range(speed_lo..=speed_hi),
            jump_bias: rng.random_range(jump_lo..=jump_hi),
        }
    }
}

/// Decision policy for one bot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotController {
    pub personality: Personality,
}

impl BotController {
    pub fn new(personality: Personality) -> Self {
        Self { personality }
    }

    /// Speed the governor holds
    pub fn target_speed(&self) -> f32 {
        self.personality.target_speed_fraction * MAX_SPEED
    }

    /// Choose controls for the next tick
    pub fn decide<R: Rng + ?Sized>(
        &self,
        vehicle: &Vehicle,
        field: &ObstacleField,
        rng: &mut R,
    ) -> Controls {
        if vehicle.finished {
            return Controls::none();
        }

        let throttle = vehicle.speed < self.target_speed();
        let lookahead = vehicle.position + LOOKAHEAD_BASE + vehicle.speed * LOOKAHEAD_PER_SPEED;

        let jump = match field.next_ahead(vehicle.position) {
            Some((_, obstacle)) if obstacle.position <= lookahead => match obstacle.kind {
                ObstacleKind::Ramp => rng.random::<f32>() < self.personality.jump_bias + RAMP_JUMP_BONUS,
                ObstacleKind::Rock | ObstacleKind::Log => {
                    let proximity = PROXIMITY_BASE + vehicle.speed * PROXIMITY_PER_SPEED;
                    obstacle.position - vehicle.position < proximity
                        && rng.random::<f32>() < self.personality.jump_bias
                }
            },
            _ => false,
        };

        Controls {
            throttle,
            brake: false,
            jump,
        }
    }
}
