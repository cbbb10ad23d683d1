//! Deterministic simulation module
//!
//! All race logic lives here. This module must be pure and deterministic:
//! - Time only advances through `tick`'s dt
//! - Seeded RNG only
//! - Stable iteration order (player first, then bots by registration)
//! - No rendering, audio or platform dependencies

pub mod bot;
pub mod camera;
pub mod collision;
pub mod obstacle;
pub mod ranking;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod vehicle;

pub use bot::{BotController, PersonalityRange};
pub use camera::Camera;
pub use collision::{Impact, resolve_obstacles};
pub use obstacle::{CourseLayout, Obstacle, ObstacleField, ObstacleKind};
pub use ranking::{DNF_TIME, RankingEntry, rank};
pub use state::{Driver, RaceEvent, RacePhase, RaceSnapshot, RaceState, Racer, RacerView};
pub use tick::{TickInput, tick};
pub use vehicle::{Controls, Personality, Vehicle};
