//! Vehicle state and per-tick integration
//!
//! Player and bots share this shape. Vertical values are screen space, so a
//! jump sets a negative vertical velocity and gravity pulls it positive.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::terrain;
use crate::consts::*;

/// Control intents for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub throttle: bool,
    pub brake: bool,
    /// Edge-triggered; honoured at most once per press
    pub jump: bool,
}

impl Controls {
    pub fn none() -> Self {
        Self::default()
    }
}

/// Fixed per-race bot personality
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Personality {
    /// Fraction of [`MAX_SPEED`] the bot cruises at, in (0, 1)
    pub target_speed_fraction: f32,
    /// Probability of jumping an obstacle, in [0, 1]
    pub jump_bias: f32,
}

/// What a tick of physics did, for cue emission
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub jumped: bool,
    pub landed: bool,
    pub crossed_finish: bool,
}

/// A racing vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Track coordinate (forward-only)
    pub position: f32,
    /// Vertical position of the wheels' ground line
    pub y: f32,
    pub vertical_velocity: f32,
    /// Horizontal speed, always within [0, MAX_SPEED]
    pub speed: f32,
    pub grounded: bool,
    pub finished: bool,
    /// Race time (seconds) stamped by the race when `finished` flips
    pub finish_time: Option<f32>,
    /// Obstacles below this index can no longer affect the vehicle
    pub obstacle_cursor: usize,
}

impl Default for Vehicle {
    fn default() -> Self {
        Self::at(START_POSITION)
    }
}

impl Vehicle {
    /// A grounded, stationary vehicle at `position`
    pub fn at(position: f32) -> Self {
        Self {
            position,
            y: terrain::height(position),
            vertical_velocity: 0.0,
            speed: 0.0,
            grounded: true,
            finished: false,
            finish_time: None,
            obstacle_cursor: 0,
        }
    }

    /// Point tested against obstacles
    pub fn contact_point(&self) -> Vec2 {
        Vec2::new(self.position, self.y - CONTACT_CLEARANCE)
    }

    /// Current ground height under the vehicle
    pub fn ground(&self) -> f32 {
        terrain::height(self.position)
    }

    /// Record the finish time; ignored if already stamped
    pub fn stamp_finish(&mut self, race_time: f32) -> bool {
        if self.finished && self.finish_time.is_none() {
            self.finish_time = Some(race_time);
            true
        } else {
            false
        }
    }

    /// Leave the ground with the given (upward, positive) launch speed
    pub fn launch(&mut self, upward: f32) {
        self.grounded = false;
        self.vertical_velocity = -upward;
    }

    /// Advance the vehicle by `dt` seconds
    pub fn step(&mut self, controls: Controls, dt: f32, track_length: f32) -> StepOutcome {
        let mut outcome = StepOutcome::default();
        if self.finished {
            return outcome;
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        // Horizontal
        if controls.throttle {
            self.speed += ACCEL * dt;
        }
        if controls.brake {
            self.speed -= BRAKE * dt;
        }
        if !controls.throttle && !controls.brake {
            self.speed *= (-ROLLING_RESISTANCE * dt).exp();
        }
        self.speed = self.speed.clamp(0.0, MAX_SPEED);

        self.position += self.speed * dt;
        let ground = terrain::height(self.position);

        // Vertical
        if self.grounded {
            if controls.jump {
                self.launch(JUMP_VELOCITY);
                outcome.jumped = true;
            } else {
                self.y = ground;
            }
        } else {
            self.vertical_velocity += GRAVITY * dt;
            let next_y = self.y + self.vertical_velocity * dt;
            if next_y >= ground && self.vertical_velocity >= 0.0 {
                self.y = ground;
                self.vertical_velocity = 0.0;
                self.grounded = true;
                outcome.landed = true;
            } else {
                self.y = next_y;
            }
        }

        if self.position >= track_length {
            self.finished = true;
            outcome.crossed_finish = true;
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THROTTLE: Controls = Controls {
        throttle: true,
        brake: false,
        jump: false,
    };

    #[test]
    fn test_throttle_accelerates_and_clamps() {
        let mut v = Vehicle::default();
        v.step(THROTTLE, SIM_DT, TRACK_LENGTH);
        assert!((v.speed - ACCEL * SIM_DT).abs() < 1e-3);
        for _ in 0..600 {
            v.step(THROTTLE, SIM_DT, TRACK_LENGTH);
        }
        assert!(v.speed <= MAX_SPEED);
    }

    #[test]
    fn test_brake_never_goes_negative() {
        let mut v = Vehicle::default();
        v.speed = 10.0;
        let brake = Controls {
            brake: true,
            ..Default::default()
        };
        v.step(brake, SIM_DT, TRACK_LENGTH);
        assert_eq!(v.speed, 0.0);
    }

    #[test]
    fn test_coasting_decays() {
        let mut v = Vehicle::default();
        v.speed = 600.0;
        v.step(Controls::none(), SIM_DT, TRACK_LENGTH);
        assert!(v.speed < 600.0 && v.speed > 590.0);
    }

    #[test]
    fn test_grounded_tracks_terrain() {
        let mut v = Vehicle::default();
        for _ in 0..120 {
            v.step(THROTTLE, SIM_DT, TRACK_LENGTH);
            assert!(v.grounded);
            assert_eq!(v.y, terrain::height(v.position));
        }
    }

    #[test]
    fn test_jump_and_land() {
        let mut v = Vehicle::default();
        let jump = Controls {
            jump: true,
            ..THROTTLE
        };
        let out = v.step(jump, SIM_DT, TRACK_LENGTH);
        assert!(out.jumped);
        assert!(!v.grounded);
        assert_eq!(v.vertical_velocity, -JUMP_VELOCITY);

        // Holding jump while airborne does nothing extra
        let mut landed = false;
        for _ in 0..240 {
            let out = v.step(jump, SIM_DT, TRACK_LENGTH);
            assert!(!out.jumped || landed);
            if out.landed {
                landed = true;
                assert!(v.grounded);
                assert_eq!(v.y, terrain::height(v.position));
                assert_eq!(v.vertical_velocity, 0.0);
                break;
            }
        }
        assert!(landed);
    }

    #[test]
    fn test_negative_dt_is_ignored() {
        let mut v = Vehicle::default();
        v.speed = 100.0;
        let before = v.clone();
        v.step(THROTTLE, -1.0, TRACK_LENGTH);
        assert_eq!(v.position, before.position);
        v.step(THROTTLE, f32::NAN, TRACK_LENGTH);
        assert_eq!(v.position, before.position);
    }

    #[test]
    fn test_finish_flag_and_freeze() {
        let mut v = Vehicle::at(990.0);
        v.speed = 900.0;
        let out = v.step(THROTTLE, 0.1, 1000.0);
        assert!(out.crossed_finish);
        assert!(v.finished);
        assert!(v.stamp_finish(4.2));
        assert!(!v.stamp_finish(9.9));
        assert_eq!(v.finish_time, Some(4.2));

        let frozen = v.clone();
        v.step(THROTTLE, 0.1, 1000.0);
        assert_eq!(v, frozen);
    }
}
