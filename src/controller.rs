//! Race controller
//!
//! Owns the race state and drives it from an external frame clock: clamps the
//! frame delta, runs fixed-step ticks, clears one-shot inputs and records the
//! best time when a race ends.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::RaceConfig;
use crate::consts::*;
use crate::persistence::{self, BestTimeStore};
use crate::sim::{Obstacle, RaceEvent, RacePhase, RaceSnapshot, RaceState, TickInput, tick};

/// Input sampled once per rendered frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInput {
    pub throttle: bool,
    pub brake: bool,
    /// True on the frame the jump button went down
    pub jump: bool,
    pub engine_on: bool,
}

/// The single owner of all mutable race state
pub struct RaceController {
    state: RaceState,
    store: Box<dyn BestTimeStore>,
    best_time: Option<Duration>,
    accumulator: f32,
    /// Jump press waiting for the next simulation step
    pending_jump: bool,
    last_phase: RacePhase,
}

impl RaceController {
    /// Build a controller and read the stored best time once
    pub fn new(config: RaceConfig, session_seed: u64, store: Box<dyn BestTimeStore>) -> Self {
        let best_time = match store.load_best_time() {
            Ok(best) => best,
            Err(e) => {
                log::warn!("Best time unavailable, continuing without one: {}", e);
                None
            }
        };
        let state = RaceState::new(config, session_seed);
        let last_phase = state.phase;
        Self {
            state,
            store,
            best_time,
            accumulator: 0.0,
            pending_jump: false,
            last_phase,
        }
    }

    pub fn start(&mut self, name: &str) -> bool {
        self.reset_clock();
        self.state.start(name)
    }

    /// Start from Home with a different config; ignored outside Home
    pub fn start_with(&mut self, name: &str, config: RaceConfig) -> bool {
        self.reset_clock();
        self.state.start_with(name, config)
    }

    pub fn restart(&mut self) -> bool {
        self.reset_clock();
        self.state.restart()
    }

    pub fn exit_to_home(&mut self) -> bool {
        self.reset_clock();
        self.state.exit_to_home()
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.pending_jump = false;
        self.state.toggle_pause()
    }

    fn reset_clock(&mut self) {
        self.accumulator = 0.0;
        self.pending_jump = false;
    }

    /// Advance by one rendered frame; returns the number of ticks run
    pub fn update(&mut self, frame_dt: f32, input: &FrameInput) -> u32 {
        let frame_dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };

        if input.jump && self.state.phase == RacePhase::Running {
            self.pending_jump = true;
        }

        self.accumulator += frame_dt;
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let tick_input = TickInput {
                throttle: input.throttle,
                brake: input.brake,
                jump: self.pending_jump,
                engine_on: input.engine_on,
                pause: false,
            };
            tick(&mut self.state, &tick_input, SIM_DT);
            // Consumed whether or not it produced a jump
            self.pending_jump = false;
            self.accumulator -= SIM_DT;
            substeps += 1;
            self.observe_phase();
        }
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// React to phase changes made inside the tick
    fn observe_phase(&mut self) {
        let phase = self.state.phase;
        if phase == RacePhase::Results && self.last_phase != RacePhase::Results {
            self.record_best_time();
        }
        self.last_phase = phase;
    }

    fn record_best_time(&mut self) {
        let Some(secs) = self.state.player_finish_time() else {
            return;
        };
        let time = Duration::from_secs_f32(secs);
        if !persistence::beats(self.best_time, time) {
            return;
        }

        log::info!("New best time: {}", crate::format_race_time(secs));
        self.best_time = Some(time);
        self.state.push_event(RaceEvent::NewBestTime { time: secs });
        if let Err(e) = self.store.save_best_time(time) {
            log::warn!("Failed to save best time: {}", e);
        }
    }

    pub fn phase(&self) -> RacePhase {
        self.state.phase
    }

    pub fn state(&self) -> &RaceState {
        &self.state
    }

    pub fn best_time(&self) -> Option<Duration> {
        self.best_time
    }

    pub fn snapshot(&self) -> RaceSnapshot {
        self.state.snapshot()
    }

    /// Static course for the current race
    pub fn obstacles(&self) -> &[Obstacle] {
        self.state.obstacles()
    }

    /// Cues for audio/effects since the last call
    pub fn drain_events(&mut self) -> Vec<RaceEvent> {
        self.state.drain_events()
    }
}
