//! Obstacle course generation and geometry
//!
//! The course is an ordered run of rocks, logs and ramps generated once per
//! race from a seed. Geometry is evaluated in obstacle-local coordinates:
//! `dx` is the horizontal offset from the obstacle's anchor and `h` is how far
//! above the local ground a point sits (positive = up).

use std::ops::Range;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::terrain;

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Round boulder, bumps grounded vehicles
    Rock,
    /// Fallen log, bumps grounded vehicles
    Log,
    /// Wedge that launches grounded vehicles
    Ramp,
}

/// Spawn weights: rocks and logs twice as common as ramps
const KIND_WEIGHTS: [(ObstacleKind, u32); 3] = [
    (ObstacleKind::Rock, 2),
    (ObstacleKind::Log, 2),
    (ObstacleKind::Ramp, 1),
];

pub const ROCK_RADIUS: f32 = 24.0;

pub const LOG_BACK: f32 = 28.0;
pub const LOG_FRONT: f32 = 26.0;
pub const LOG_MIN_H: f32 = 2.0;
pub const LOG_MAX_H: f32 = 22.0;

pub const RAMP_BACK: f32 = 10.0;
pub const RAMP_FRONT: f32 = 100.0;
/// Wedge height at its lip and at its peak
pub const RAMP_LIP_H: f32 = 4.0;
pub const RAMP_PEAK_H: f32 = 64.0;

impl ObstacleKind {
    /// Horizontal span relative to the anchor as (behind, ahead)
    pub fn extent(self) -> (f32, f32) {
        match self {
            ObstacleKind::Rock => (ROCK_RADIUS, ROCK_RADIUS),
            ObstacleKind::Log => (LOG_BACK, LOG_FRONT),
            ObstacleKind::Ramp => (RAMP_BACK, RAMP_FRONT),
        }
    }

    /// Ramps launch, everything else bumps
    pub fn launches(self) -> bool {
        self == ObstacleKind::Ramp
    }

    fn pick<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let total: u32 = KIND_WEIGHTS.iter().map(|(_, w)| w).sum();
        let mut roll = rng.random_range(0..total);
        for &(kind, weight) in &KIND_WEIGHTS {
            if roll < weight {
                return kind;
            }
            roll -= weight;
        }
        ObstacleKind::Rock
    }
}

/// Widest trailing extent of any kind (how far back an obstacle can still be touched)
pub fn max_back_extent() -> f32 {
    KIND_WEIGHTS.iter().map(|(k, _)| k.extent().0).fold(0.0, f32::max)
}

/// Widest leading extent of any kind
pub fn max_front_extent() -> f32 {
    KIND_WEIGHTS.iter().map(|(k, _)| k.extent().1).fold(0.0, f32::max)
}

/// A single obstacle on the course
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    /// Track coordinate of the anchor
    pub position: f32,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, position: f32) -> Self {
        Self { kind, position }
    }

    /// Track range this obstacle can be touched in
    pub fn span(&self) -> (f32, f32) {
        let (back, front) = self.kind.extent();
        (self.position - back, self.position + front)
    }

    /// Does the contact point overlap this obstacle?
    ///
    /// The vertical reference is the terrain under the contact point, so the
    /// shapes sit on the ground even where it slopes.
    pub fn contains(&self, contact: Vec2) -> bool {
        let dx = contact.x - self.position;
        let h = terrain::height(contact.x) - contact.y;

        match self.kind {
            ObstacleKind::Rock => Vec2::new(dx, h).length_squared() < ROCK_RADIUS * ROCK_RADIUS,
            ObstacleKind::Log => {
                (-LOG_BACK..=LOG_FRONT).contains(&dx) && (LOG_MIN_H..=LOG_MAX_H).contains(&h)
            }
            ObstacleKind::Ramp => {
                if !(-RAMP_BACK..=RAMP_FRONT).contains(&dx) {
                    return false;
                }
                let t = (dx + RAMP_BACK) / (RAMP_BACK + RAMP_FRONT);
                let top = RAMP_LIP_H + (RAMP_PEAK_H - RAMP_LIP_H) * t;
                (0.0..=top).contains(&h)
            }
        }
    }
}

/// Parameters for course generation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CourseLayout {
    pub track_length: f32,
    /// Cursor start (first obstacle lands at least one gap past this)
    pub start_offset: f32,
    /// No obstacle is placed within this distance of the finish
    pub end_buffer: f32,
    pub min_gap: f32,
    pub max_gap: f32,
}

impl Default for CourseLayout {
    fn default() -> Self {
        Self {
            track_length: crate::consts::TRACK_LENGTH,
            start_offset: 400.0,
            end_buffer: 200.0,
            min_gap: 280.0,
            max_gap: 520.0,
        }
    }
}

/// The ordered obstacle course for one race
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    /// An empty course (time trials, tests)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a field from explicit obstacles; they are sorted by position
    pub fn from_obstacles(mut obstacles: Vec<Obstacle>) -> Self {
        obstacles.sort_by(|a, b| a.position.total_cmp(&b.position));
        Self { obstacles }
    }

    /// Generate a course from the layout using the given RNG
    pub fn generate<R: Rng + ?Sized>(layout: &CourseLayout, rng: &mut R) -> Self {
        let limit = layout.track_length - layout.end_buffer;
        let mut obstacles = Vec::new();
        let mut cursor = layout.start_offset;

        loop {
            let gap = if layout.max_gap > layout.min_gap {
                rng.random_range(layout.min_gap..=layout.max_gap)
            } else {
                layout.min_gap
            };
            let next = cursor + gap;
            // The widest shape must still end before the finish buffer
            if gap <= 0.0 || next <= cursor || next + max_front_extent() > limit {
                break;
            }
            cursor = next;
            obstacles.push(Obstacle::new(ObstacleKind::pick(rng), cursor));
        }

        log::debug!(
            "Generated course: {} obstacles over {} units",
            obstacles.len(),
            layout.track_length
        );
        Self { obstacles }
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Obstacle> {
        self.obstacles.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn as_slice(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Index range of obstacles anchored in `[from, to]` (binary search, no full scan)
    pub fn indices_between(&self, from: f32, to: f32) -> Range<usize> {
        let start = self.obstacles.partition_point(|o| o.position < from);
        let end = self.obstacles.partition_point(|o| o.position <= to);
        start..end.max(start)
    }

    /// Obstacles that could touch a vehicle at `position`
    pub fn near(&self, position: f32) -> Range<usize> {
        // An obstacle anchored ahead reaches back, one behind reaches forward
        self.indices_between(position - max_front_extent(), position + max_back_extent())
    }

    /// First obstacle anchored at or after `position`
    pub fn next_ahead(&self, position: f32) -> Option<(usize, &Obstacle)> {
        let idx = self.obstacles.partition_point(|o| o.position < position);
        self.obstacles.get(idx).map(|o| (idx, o))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn field(seed: u64) -> ObstacleField {
        ObstacleField::generate(&CourseLayout::default(), &mut Pcg32::seed_from_u64(seed))
    }

    #[test]
    fn test_same_seed_same_course() {
        let a = field(7);
        let b = field(7);
        assert_eq!(a.as_slice(), b.as_slice());
        assert!(!a.is_empty());
    }

    #[test]
    fn test_spacing_and_buffers() {
        let layout = CourseLayout::default();
        for seed in 0..50 {
            let f = field(seed);
            let first = f.get(0).unwrap();
            assert!(first.position >= layout.start_offset + layout.min_gap);
            for pair in f.as_slice().windows(2) {
                let gap = pair[1].position - pair[0].position;
                assert!(gap >= layout.min_gap, "gap {gap} too small");
                assert!(gap <= layout.max_gap, "gap {gap} too large");
            }
            let last = f.as_slice().last().unwrap();
            assert!(last.span().1 <= layout.track_length - layout.end_buffer);
        }
    }

    #[test]
    fn test_kind_mix_favors_rocks_and_logs() {
        let mut ramps = 0;
        let mut others = 0;
        for seed in 0..40 {
            for o in field(seed).iter() {
                if o.kind == ObstacleKind::Ramp {
                    ramps += 1;
                } else {
                    others += 1;
                }
            }
        }
        assert!(others > ramps * 2);
    }

    #[test]
    fn test_degenerate_gap_terminates() {
        let layout = CourseLayout {
            min_gap: 0.0,
            max_gap: 0.0,
            ..Default::default()
        };
        let f = ObstacleField::generate(&layout, &mut Pcg32::seed_from_u64(1));
        assert!(f.is_empty());
    }

    #[test]
    fn test_rock_contains_grounded_contact() {
        let rock = Obstacle::new(ObstacleKind::Rock, 1000.0);
        let on_ground = Vec2::new(1000.0, terrain::height(1000.0) - 2.0);
        assert!(rock.contains(on_ground));
        let high_above = Vec2::new(1000.0, terrain::height(1000.0) - 80.0);
        assert!(!rock.contains(high_above));
        let far = Vec2::new(1100.0, terrain::height(1100.0) - 2.0);
        assert!(!rock.contains(far));
    }

    #[test]
    fn test_log_box() {
        let log = Obstacle::new(ObstacleKind::Log, 500.0);
        assert!(log.contains(Vec2::new(480.0, terrain::height(480.0) - 2.0)));
        assert!(!log.contains(Vec2::new(530.0, terrain::height(530.0) - 2.0)));
        // Resting exactly on the ground sits below the log's band
        assert!(!log.contains(Vec2::new(500.0, terrain::height(500.0))));
    }

    #[test]
    fn test_ramp_wedge() {
        let ramp = Obstacle::new(ObstacleKind::Ramp, 800.0);
        assert!(ramp.contains(Vec2::new(790.0, terrain::height(790.0) - 2.0)));
        // 50 units up near the lip is over the wedge, near the peak it is inside
        assert!(!ramp.contains(Vec2::new(795.0, terrain::height(795.0) - 50.0)));
        assert!(ramp.contains(Vec2::new(895.0, terrain::height(895.0) - 50.0)));
    }

    #[test]
    fn test_window_queries() {
        let f = ObstacleField::from_obstacles(vec![
            Obstacle::new(ObstacleKind::Log, 900.0),
            Obstacle::new(ObstacleKind::Rock, 300.0),
            Obstacle::new(ObstacleKind::Ramp, 600.0),
        ]);
        assert_eq!(f.get(0).unwrap().position, 300.0);
        assert_eq!(f.indices_between(250.0, 650.0), 0..2);
        assert_eq!(f.near(650.0), 1..2);
        assert_eq!(f.next_ahead(301.0).map(|(i, _)| i), Some(1));
        assert!(f.next_ahead(901.0).is_none());
    }
}
