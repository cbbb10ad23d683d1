//! Side-scrolling camera
//!
//! A single eased scroll offset that keeps the player a fixed fraction into
//! the viewport.

use serde::{Deserialize, Serialize};

use crate::consts::{CAMERA_EASE, CAMERA_LEAD};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// World x drawn at the left edge of the viewport
    pub offset: f32,
    pub viewport_width: f32,
}

impl Camera {
    pub fn new(viewport_width: f32) -> Self {
        Self {
            offset: 0.0,
            viewport_width,
        }
    }

    pub fn reset(&mut self) {
        self.offset = 0.0;
    }

    /// Where the camera wants to be for a subject at `x`
    pub fn target_for(&self, x: f32, track_length: f32) -> f32 {
        let max = (track_length - self.viewport_width * 0.2).max(0.0);
        (x - self.viewport_width * CAMERA_LEAD).clamp(0.0, max)
    }

    /// Ease toward the subject; the easing is frame-rate independent
    pub fn follow(&mut self, x: f32, track_length: f32, dt: f32) {
        let target = self.target_for(x, track_length);
        let blend = 1.0 - (1.0 - CAMERA_EASE).powf(dt.max(0.0) * 60.0);
        self.offset += (target - self.offset) * blend;
    }
}
