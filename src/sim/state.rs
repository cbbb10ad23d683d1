//! Race state and flow
//!
//! Everything a race mutates lives in [`RaceState`]. Clocks are accumulated
//! simulated time, never wall clock, so pausing simply stops accumulation.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bot::BotController;
use super::camera::Camera;
use super::obstacle::{Obstacle, ObstacleField};
use super::ranking::{self, DNF_TIME, RankingEntry};
use super::terrain;
use super::vehicle::Vehicle;
use crate::config::RaceConfig;
use crate::consts::START_POSITION;
use crate::sanitize_name;

/// Salt separating the bot decision stream from course generation
const DECISION_STREAM_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Countdown labels, one per equal slice of the countdown
const COUNTDOWN_LABELS: [&str; 4] = ["3", "2", "1", "GO!"];

/// Current phase of the race
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RacePhase {
    /// Title screen, waiting for a start
    Home,
    /// Lined up, counting down
    Countdown,
    /// Simulation advancing
    Running,
    /// Race frozen mid-run
    Paused,
    /// Everyone finished (or time ran out); ranking available
    Results,
}

/// Discrete cues for the presentation layer (audio, effects)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RaceEvent {
    /// Countdown label changed; `last` is the "GO!" beep
    CountdownBeep { last: bool },
    RaceStarted,
    Jump { racer: usize },
    /// Touched down after a jump, bump or launch
    Landed { racer: usize },
    Bump { racer: usize, obstacle: usize },
    RampLaunch { racer: usize, obstacle: usize },
    Finished { racer: usize, time: f32 },
    /// Results are in
    RaceOver { player_place: usize },
    /// The player won
    Victory,
    /// Player set a new best (emitted by the controller)
    NewBestTime { time: f32 },
}

/// Who drives a vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Driver {
    Player,
    Bot(BotController),
}

/// A named vehicle in the race
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Racer {
    pub name: String,
    pub vehicle: Vehicle,
    pub driver: Driver,
}

impl Racer {
    pub fn is_player(&self) -> bool {
        matches!(self.driver, Driver::Player)
    }
}

/// Complete race state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct RaceState {
    pub config: RaceConfig,
    pub phase: RacePhase,
    pub player_name: String,
    /// Seed of the current course
    pub race_seed: u64,
    /// Draws a course seed per race when none is fixed
    session_rng: Pcg32,
    /// Bot decision randomness for the current race
    pub rng: Pcg32,
    pub field: ObstacleField,
    /// Player first, then bots in registration order
    pub racers: Vec<Racer>,
    pub countdown_elapsed: f32,
    pub race_elapsed: f32,
    pub camera: Camera,
    /// Player speed while the engine runs, for the engine sound
    pub engine_level: f32,
    /// Filled on entering Results
    pub ranking: Vec<RankingEntry>,
    events: Vec<RaceEvent>,
}

impl RaceState {
    /// Create a race sitting at Home.
    ///
    /// `session_seed` is used to pick courses when the config has no fixed seed.
    pub fn new(config: RaceConfig, session_seed: u64) -> Self {
        let config = config.sanitized();
        let camera = Camera::new(config.viewport_width);
        let mut state = Self {
            config,
            phase: RacePhase::Home,
            player_name: crate::DEFAULT_PLAYER_NAME.to_string(),
            race_seed: 0,
            session_rng: Pcg32::seed_from_u64(session_seed),
            rng: Pcg32::seed_from_u64(0),
            field: ObstacleField::empty(),
            racers: Vec::new(),
            countdown_elapsed: 0.0,
            race_elapsed: 0.0,
            camera,
            engine_level: 0.0,
            ranking: Vec::new(),
            events: Vec::new(),
        };
        state.setup();
        state
    }

    /// Line everyone up on a fresh course and reset clocks
    pub fn setup(&mut self) {
        self.race_seed = match self.config.course_seed {
            Some(seed) => seed,
            None => self.session_rng.random(),
        };
        let mut course_rng = Pcg32::seed_from_u64(self.race_seed);

        self.field = if self.config.obstacles {
            ObstacleField::generate(&self.config.layout(), &mut course_rng)
        } else {
            ObstacleField::empty()
        };

        let range = self.config.difficulty.personality_range();
        self.racers.clear();
        self.racers.push(Racer {
            name: self.player_name.clone(),
            vehicle: Vehicle::at(START_POSITION),
            driver: Driver::Player,
        });
        for i in 0..self.config.bot_count {
            self.racers.push(Racer {
                name: format!("Bot {}", i + 1),
                vehicle: Vehicle::at(START_POSITION),
                driver: Driver::Bot(BotController::new(range.roll(&mut course_rng))),
            });
        }

        self.rng = Pcg32::seed_from_u64(self.race_seed ^ DECISION_STREAM_SALT);
        self.countdown_elapsed = 0.0;
        self.race_elapsed = 0.0;
        self.camera.reset();
        self.engine_level = 0.0;
        self.ranking.clear();

        log::debug!(
            "Race set up: seed {}, {} obstacles, {} bots ({})",
            self.race_seed,
            self.field.len(),
            self.config.bot_count,
            self.config.difficulty.as_str()
        );
    }

    /// Home -> Countdown with the given display name
    pub fn start(&mut self, name: &str) -> bool {
        if self.phase != RacePhase::Home {
            log::debug!("Ignoring start in {:?}", self.phase);
            return false;
        }
        self.player_name = sanitize_name(name);
        self.begin_countdown();
        true
    }

    /// Home -> Countdown with a new config for this and later races
    pub fn start_with(&mut self, name: &str, config: RaceConfig) -> bool {
        if self.phase != RacePhase::Home {
            log::debug!("Ignoring start in {:?}", self.phase);
            return false;
        }
        self.config = config.sanitized();
        self.camera = Camera::new(self.config.viewport_width);
        self.start(name)
    }

    /// Results -> Countdown, same player
    pub fn restart(&mut self) -> bool {
        if self.phase != RacePhase::Results {
            log::debug!("Ignoring restart in {:?}", self.phase);
            return false;
        }
        self.begin_countdown();
        true
    }

    /// Abandon or leave a race back to Home
    pub fn exit_to_home(&mut self) -> bool {
        match self.phase {
            RacePhase::Countdown | RacePhase::Paused | RacePhase::Results => {
                log::info!("Back to home from {:?}", self.phase);
                self.phase = RacePhase::Home;
                self.engine_level = 0.0;
                true
            }
            _ => false,
        }
    }

    /// Running <-> Paused
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            RacePhase::Running => {
                self.phase = RacePhase::Paused;
                self.engine_level = 0.0;
                log::info!("Paused at {:.2}s", self.race_elapsed);
                true
            }
            RacePhase::Paused => {
                self.phase = RacePhase::Running;
                log::info!("Resumed at {:.2}s", self.race_elapsed);
                true
            }
            _ => false,
        }
    }

    fn begin_countdown(&mut self) {
        self.setup();
        self.phase = RacePhase::Countdown;
        self.push_event(RaceEvent::CountdownBeep { last: false });
        log::info!(
            "Countdown for {} against {} bots",
            self.player_name,
            self.config.bot_count
        );
    }

    /// Which countdown label is showing (0-based)
    pub fn countdown_step(&self) -> usize {
        let slice = self.config.countdown_secs / COUNTDOWN_LABELS.len() as f32;
        if slice <= 0.0 {
            return COUNTDOWN_LABELS.len() - 1;
        }
        ((self.countdown_elapsed / slice) as usize).min(COUNTDOWN_LABELS.len() - 1)
    }

    pub fn countdown_remaining(&self) -> f32 {
        (self.config.countdown_secs - self.countdown_elapsed).max(0.0)
    }

    pub fn countdown_label(&self) -> Option<&'static str> {
        (self.phase == RacePhase::Countdown).then(|| COUNTDOWN_LABELS[self.countdown_step()])
    }

    /// Advance the countdown clock, returning true once it has run out
    pub(crate) fn advance_countdown(&mut self, dt: f32) -> bool {
        let before = self.countdown_step();
        self.countdown_elapsed += dt;
        let after = self.countdown_step();
        if after != before {
            self.push_event(RaceEvent::CountdownBeep {
                last: after == COUNTDOWN_LABELS.len() - 1,
            });
        }
        self.countdown_elapsed >= self.config.countdown_secs
    }

    /// Countdown -> Running
    pub(crate) fn begin_running(&mut self) {
        self.phase = RacePhase::Running;
        self.race_elapsed = 0.0;
        self.push_event(RaceEvent::RaceStarted);
        log::info!("Race started");
    }

    pub fn all_finished(&self) -> bool {
        self.racers.iter().all(|r| r.vehicle.finished)
    }

    /// Running -> Results: stamp, rank, announce
    pub(crate) fn enter_results(&mut self) {
        for (idx, racer) in self.racers.iter_mut().enumerate() {
            if racer.vehicle.stamp_finish(self.race_elapsed) {
                self.events.push(RaceEvent::Finished {
                    racer: idx,
                    time: self.race_elapsed,
                });
            }
        }

        let entries = self
            .racers
            .iter()
            .enumerate()
            .map(|(idx, r)| RankingEntry {
                name: r.name.clone(),
                time: r.vehicle.finish_time.unwrap_or(DNF_TIME),
                racer: idx,
                is_player: r.is_player(),
            })
            .collect();
        self.ranking = ranking::rank(entries);
        self.phase = RacePhase::Results;
        self.engine_level = 0.0;

        let place = self.player_place().unwrap_or(self.ranking.len());
        self.push_event(RaceEvent::RaceOver { player_place: place });
        if self.player_won() {
            self.push_event(RaceEvent::Victory);
        }
        log::info!(
            "Race over after {:.2}s, {} placed {}/{}",
            self.race_elapsed,
            self.player_name,
            place,
            self.ranking.len()
        );
    }

    pub fn player(&self) -> &Racer {
        &self.racers[0]
    }

    /// Player's 1-based place once results are in
    pub fn player_place(&self) -> Option<usize> {
        ranking::player_place(&self.ranking)
    }

    /// Player finished first (a DNF never wins)
    pub fn player_won(&self) -> bool {
        self.ranking
            .first()
            .is_some_and(|e| e.is_player && !e.is_dnf())
    }

    /// Player's finish time in seconds, if they finished
    pub fn player_finish_time(&self) -> Option<f32> {
        self.player().vehicle.finish_time
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        self.field.as_slice()
    }

    pub fn push_event(&mut self, event: RaceEvent) {
        self.events.push(event);
    }

    /// Take all pending cues
    pub fn drain_events(&mut self) -> Vec<RaceEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only view for a renderer
    pub fn snapshot(&self) -> RaceSnapshot {
        RaceSnapshot {
            phase: self.phase,
            countdown_remaining: self.countdown_remaining(),
            countdown_label: self.countdown_label(),
            race_time: self.race_elapsed,
            camera_offset: self.camera.offset,
            engine_level: self.engine_level,
            racers: self
                .racers
                .iter()
                .map(|r| RacerView {
                    name: r.name.clone(),
                    is_player: r.is_player(),
                    position: r.vehicle.position,
                    y: r.vehicle.y,
                    slope: terrain::slope(r.vehicle.position),
                    speed: r.vehicle.speed,
                    grounded: r.vehicle.grounded,
                    finished: r.vehicle.finished,
                    finish_time: r.vehicle.finish_time,
                })
                .collect(),
            ranking: (self.phase == RacePhase::Results).then(|| self.ranking.clone()),
        }
    }
}

/// Per-racer render data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RacerView {
    pub name: String,
    pub is_player: bool,
    pub position: f32,
    pub y: f32,
    pub slope: f32,
    pub speed: f32,
    pub grounded: bool,
    pub finished: bool,
    pub finish_time: Option<f32>,
}

/// Everything a renderer reads once per frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceSnapshot {
    pub phase: RacePhase,
    pub countdown_remaining: f32,
    pub countdown_label: Option<&'static str>,
    pub race_time: f32,
    pub camera_offset: f32,
    pub engine_level: f32,
    pub racers: Vec<RacerView>,
    pub ranking: Option<Vec<RankingEntry>>,
}
