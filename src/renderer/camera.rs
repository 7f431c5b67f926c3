//! Horizontal camera that keeps the car on screen
//!
//! The offset is recomputed from `position` every frame; the cached value is
//! only read back by the follow policy to hold still once the run ends.

use serde::{Deserialize, Serialize};

use crate::config::ViewConfig;
use crate::sim::{Phase, SimulationState};

/// How the camera tracks the car
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CameraPolicy {
    /// Offset trails the car by a fixed lead and freezes when the run stops
    FollowWithLead,
    /// Car moves freely until the surface midline, then stays on it
    #[default]
    ClampToMidpoint,
}

impl CameraPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CameraPolicy::FollowWithLead => "follow",
            CameraPolicy::ClampToMidpoint => "midpoint",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "follow" | "lead" => Some(CameraPolicy::FollowWithLead),
            "midpoint" | "clamp" => Some(CameraPolicy::ClampToMidpoint),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Camera {
    policy: CameraPolicy,
    /// Last computed offset (pixels)
    offset: f32,
}

impl Camera {
    pub fn new(policy: CameraPolicy) -> Self {
        Self { policy, offset: 0.0 }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Recompute the offset for this frame and return it
    pub fn update(
        &mut self,
        state: &SimulationState,
        view: &ViewConfig,
        surface_width: f32,
    ) -> f32 {
        let raw = state.position as f32 * view.pixels_per_meter;
        self.offset = match self.policy {
            CameraPolicy::FollowWithLead if state.phase == Phase::Stopped => self.offset,
            CameraPolicy::FollowWithLead => (raw - view.lead_px).max(0.0),
            CameraPolicy::ClampToMidpoint => (raw - surface_width / 2.0).max(0.0),
        };
        self.offset
    }

    /// Screen x of a world position (meters)
    #[inline]
    pub fn to_screen_x(&self, meters: f64, view: &ViewConfig) -> f32 {
        meters as f32 * view.pixels_per_meter - self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rolling_at(position: f64) -> SimulationState {
        let mut state = SimulationState::default();
        state.start();
        state.position = position;
        state
    }

    #[test]
    fn test_midpoint_before_and_after_midline() {
        let view = ViewConfig::default();
        let mut camera = Camera::new(CameraPolicy::ClampToMidpoint);

        // 100 m * 3 px/m = 300 px, left of the 450 px midline
        let state = rolling_at(100.0);
        assert_eq!(camera.update(&state, &view, 900.0), 0.0);
        assert_eq!(camera.to_screen_x(state.position, &view), 300.0);

        // 400 m = 1200 px, car pinned to the midline
        let state = rolling_at(400.0);
        assert_eq!(camera.update(&state, &view, 900.0), 750.0);
        assert_eq!(camera.to_screen_x(state.position, &view), 450.0);
    }

    #[test]
    fn test_midpoint_tracks_surface_width() {
        let view = ViewConfig::default();
        let mut camera = Camera::new(CameraPolicy::ClampToMidpoint);
        let state = rolling_at(400.0);
        camera.update(&state, &view, 600.0);
        assert_eq!(camera.to_screen_x(state.position, &view), 300.0);
    }

    #[test]
    fn test_follow_with_lead() {
        let view = ViewConfig::default();
        let mut camera = Camera::new(CameraPolicy::FollowWithLead);

        let state = rolling_at(20.0);
        assert_eq!(camera.update(&state, &view, 900.0), 0.0);

        let state = rolling_at(200.0);
        assert_eq!(camera.update(&state, &view, 900.0), 500.0);
        assert_eq!(camera.to_screen_x(state.position, &view), 100.0);
    }

    #[test]
    fn test_follow_freezes_when_stopped() {
        let view = ViewConfig::default();
        let mut camera = Camera::new(CameraPolicy::FollowWithLead);
        let mut state = rolling_at(200.0);
        camera.update(&state, &view, 900.0);

        state.phase = Phase::Stopped;
        state.speed = 0.0;
        state.position = 300.0;
        assert_eq!(camera.update(&state, &view, 900.0), 500.0);

        // A restart recomputes from the idle position
        state.restart();
        assert_eq!(camera.update(&state, &view, 900.0), 0.0);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(CameraPolicy::from_str("Follow"), Some(CameraPolicy::FollowWithLead));
        assert_eq!(CameraPolicy::from_str("midpoint"), Some(CameraPolicy::ClampToMidpoint));
        assert_eq!(CameraPolicy::from_str("orbit"), None);
        for policy in [CameraPolicy::FollowWithLead, CameraPolicy::ClampToMidpoint] {
            assert_eq!(CameraPolicy::from_str(policy.as_str()), Some(policy));
        }
    }
}
