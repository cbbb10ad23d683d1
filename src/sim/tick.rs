//! Simulation tick
//!
//! Advances the race by one step. Only the Countdown and Running phases move
//! anything; every other phase is a no-op apart from the pause toggle.

use serde::{Deserialize, Serialize};

use super::collision::{Impact, resolve_obstacles};
use super::state::{Driver, RaceEvent, RacePhase, RaceState};
use super::vehicle::Controls;

/// Player intents for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub throttle: bool,
    pub brake: bool,
    /// Jump press (true for exactly one tick per press)
    pub jump: bool,
    /// Throttle only drives the bike while the engine is on
    pub engine_on: bool,
    /// Pause toggle
    pub pause: bool,
}

impl TickInput {
    /// Controls actually applied to the player's vehicle
    pub fn player_controls(&self) -> Controls {
        Controls {
            throttle: self.throttle && self.engine_on,
            brake: self.brake,
            jump: self.jump,
        }
    }
}

/// Advance the race state by `dt` seconds
pub fn tick(state: &mut RaceState, input: &TickInput, dt: f32) {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

    if input.pause && state.toggle_pause() && state.phase == RacePhase::Paused {
        return;
    }

    match state.phase {
        RacePhase::Countdown => {
            if state.advance_countdown(dt) {
                state.begin_running();
            }
        }
        RacePhase::Running => run_race(state, input, dt),
        RacePhase::Home | RacePhase::Paused | RacePhase::Results => {}
    }
}

fn run_race(state: &mut RaceState, input: &TickInput, dt: f32) {
    state.race_elapsed += dt;
    let race_time = state.race_elapsed;
    let track_length = state.config.track_length;
    let player_controls = input.player_controls();

    let mut events = Vec::new();
    for (idx, racer) in state.racers.iter_mut().enumerate() {
        if racer.vehicle.finished {
            continue;
        }

        let controls = match &racer.driver {
            Driver::Player => player_controls,
            Driver::Bot(bot) => bot.decide(&racer.vehicle, &state.field, &mut state.rng),
        };

        let outcome = racer.vehicle.step(controls, dt, track_length);
        if outcome.jumped {
            events.push(RaceEvent::Jump { racer: idx });
        } else if outcome.landed {
            events.push(RaceEvent::Landed { racer: idx });
        }

        match resolve_obstacles(&mut racer.vehicle, &state.field) {
            Some(Impact::Bump { obstacle }) => events.push(RaceEvent::Bump { racer: idx, obstacle }),
            Some(Impact::Launch { obstacle }) => {
                events.push(RaceEvent::RampLaunch { racer: idx, obstacle })
            }
            None => {}
        }

        if racer.vehicle.stamp_finish(race_time) {
            log::info!("{} finished in {}", racer.name, crate::format_race_time(race_time));
            events.push(RaceEvent::Finished {
                racer: idx,
                time: race_time,
            });
        }
    }
    for event in events {
        state.push_event(event);
    }

    let player = &state.racers[0].vehicle;
    let (player_x, player_speed) = (player.position, player.speed);
    state.camera.follow(player_x, track_length, dt);
    state.engine_level = if input.engine_on { player_speed } else { 0.0 };

    if state.all_finished() {
        state.enter_results();
    } else if state.race_elapsed >= state.config.time_limit_secs {
        log::warn!("Time limit reached, calling the race");
        state.enter_results();
    }
}
