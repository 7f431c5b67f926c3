//! Simulation and view configuration
//!
//! `SimConfig` holds the physical constants of a run. `ViewConfig` holds the
//! pixel geometry the projector draws with. Both deserialize from JSON with
//! per-field defaults, so a page can override only what it needs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::kmh_to_ms;

/// Errors raised while loading a [`SimConfig`] or [`ViewConfig`]
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid value for {field}: {value}")]
    Invalid { field: &'static str, value: f64 },
}

/// Physical constants, fixed for the lifetime of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Tire/road friction coefficient (μ)
    pub friction_coefficient: f64,
    /// Gravitational acceleration (m/s²)
    pub gravity: f64,
    /// Vehicle mass (kg). Only displayed; braking deceleration is mass-independent.
    pub mass_kg: f64,
    /// Speed reached on start (km/h)
    pub initial_speed_kmh: f64,
    /// Distance after which the run ends regardless of phase (m)
    pub max_distance: f64,
    /// Speed at or below which a braking car counts as stopped (m/s)
    pub stop_threshold: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            friction_coefficient: 0.7811,
            gravity: 9.81,
            mass_kg: 1300.0,
            initial_speed_kmh: 240.0,
            max_distance: 1500.0,
            stop_threshold: 0.1,
        }
    }
}

impl SimConfig {
    /// Initial speed in m/s
    #[inline]
    pub fn initial_speed(&self) -> f64 {
        kmh_to_ms(self.initial_speed_kmh)
    }

    /// Braking deceleration μ·g (m/s²)
    #[inline]
    pub fn deceleration(&self) -> f64 {
        self.friction_coefficient * self.gravity
    }

    /// Closed-form stopping distance v₀² / 2a (m)
    pub fn theoretical_braking_distance(&self) -> f64 {
        let v0 = self.initial_speed();
        v0 * v0 / (2.0 * self.deceleration())
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every constant is finite and in range
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("friction_coefficient", self.friction_coefficient),
            ("gravity", self.gravity),
            ("mass_kg", self.mass_kg),
            ("initial_speed_kmh", self.initial_speed_kmh),
            ("max_distance", self.max_distance),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid { field, value });
            }
        }
        if !self.stop_threshold.is_finite() || self.stop_threshold < 0.0 {
            return Err(ConfigError::Invalid {
                field: "stop_threshold",
                value: self.stop_threshold,
            });
        }
        Ok(())
    }
}

/// Pixel geometry of the scene (all values in CSS pixels at scale 1)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// World-to-screen scale
    pub pixels_per_meter: f32,
    /// Road drawn past `max_distance` by this many meters
    pub road_buffer_m: f32,
    pub road_y: f32,
    pub road_height: f32,
    pub car_width: f32,
    pub car_height: f32,
    pub skid_y: f32,
    pub skid_height: f32,
    /// Marker triangle tip y; the base sits `marker_size * 2` above it
    pub marker_tip_y: f32,
    pub marker_size: f32,
    /// Label baseline y and x shift relative to the marker
    pub marker_label_y: f32,
    pub marker_label_dx: f32,
    /// Camera lead for the follow-with-lead policy
    pub lead_px: f32,
    pub text_x: f32,
    pub text_y: f32,
    pub text_line_height: f32,
    pub text_size: f32,
    /// Surface size used before the host reports one
    pub default_width: u32,
    pub default_height: u32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            pixels_per_meter: 3.0,
            road_buffer_m: 500.0,
            road_y: 150.0,
            road_height: 100.0,
            car_width: 50.0,
            car_height: 25.0,
            skid_y: 170.0,
            skid_height: 5.0,
            marker_tip_y: 140.0,
            marker_size: 5.0,
            marker_label_y: 125.0,
            marker_label_dx: -20.0,
            lead_px: 100.0,
            text_x: 10.0,
            text_y: 20.0,
            text_line_height: 20.0,
            text_size: 13.0,
            default_width: 900,
            default_height: 250,
        }
    }
}

impl ViewConfig {
    /// Parse and validate a JSON view config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let view: ViewConfig = serde_json::from_str(json)?;
        view.validate()?;
        Ok(view)
    }

    /// Scale, sizes and fallback surface must be positive; offsets only finite
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("pixels_per_meter", self.pixels_per_meter),
            ("car_width", self.car_width),
            ("car_height", self.car_height),
            ("marker_size", self.marker_size),
            ("text_size", self.text_size),
            ("default_width", self.default_width as f32),
            ("default_height", self.default_height as f32),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid { field, value: value as f64 });
            }
        }
        let finite = [
            ("road_buffer_m", self.road_buffer_m),
            ("road_y", self.road_y),
            ("road_height", self.road_height),
            ("skid_y", self.skid_y),
            ("skid_height", self.skid_height),
            ("marker_tip_y", self.marker_tip_y),
            ("marker_label_y", self.marker_label_y),
            ("marker_label_dx", self.marker_label_dx),
            ("lead_px", self.lead_px),
            ("text_x", self.text_x),
            ("text_y", self.text_y),
            ("text_line_height", self.text_line_height),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::Invalid { field, value: value as f64 });
            }
        }
        Ok(())
    }
}
