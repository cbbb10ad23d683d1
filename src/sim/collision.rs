//! Vehicle/obstacle interaction
//!
//! Only obstacles in a small window around the vehicle are tested. Each
//! vehicle keeps a monotonic obstacle cursor: once an obstacle fires, it and
//! everything behind it are ignored for the rest of the race. Because vehicles
//! never move backward this means "once per approach".

use serde::{Deserialize, Serialize};

use super::obstacle::ObstacleField;
use super::vehicle::Vehicle;
use crate::consts::*;

/// Response applied to a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    /// Rock or log: slowed and knocked into the air
    Bump { obstacle: usize },
    /// Ramp: launched high with a small boost
    Launch { obstacle: usize },
}

/// Test the vehicle against nearby obstacles and apply at most one response
pub fn resolve_obstacles(vehicle: &mut Vehicle, field: &ObstacleField) -> Option<Impact> {
    if vehicle.finished || !vehicle.grounded {
        return None;
    }

    let contact = vehicle.contact_point();
    let window = field.near(vehicle.position);
    let start = window.start.max(vehicle.obstacle_cursor);

    for idx in start..window.end {
        let Some(obstacle) = field.get(idx) else { break };
        if !obstacle.contains(contact) {
            continue;
        }

        vehicle.obstacle_cursor = idx + 1;
        let impact = if obstacle.kind.launches() {
            vehicle.launch(RAMP_LAUNCH_VELOCITY);
            vehicle.speed = (vehicle.speed + RAMP_SPEED_BOOST).min(MAX_SPEED);
            Impact::Launch { obstacle: idx }
        } else {
            vehicle.speed = (vehicle.speed - BUMP_SPEED_PENALTY).max(0.0);
            vehicle.y -= BUMP_LIFT;
            vehicle.launch(BUMP_VELOCITY);
            Impact::Bump { obstacle: idx }
        };
        log::debug!(
            "{:?} on {:?} at {:.1}",
            impact,
            obstacle.kind,
            obstacle.position
        );
        return Some(impact);
    }

    None
}
