//! Brake Sim - vehicle braking-distance visualization
//!
//! Core modules:
//! - `sim`: Deterministic kinematics (phases, commands, fixed-step tick)
//! - `renderer`: Camera, draw-list projection and WebGPU pipeline
//! - `driver`: Per-frame command queue and fixed-step accumulator
//! - `i18n`: English/German labels and readout formatting
//! - `config`: Physical constants and view geometry
//! - `settings`: Persisted user preferences

pub mod config;
pub mod driver;
pub mod i18n;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use config::{ConfigError, SimConfig, ViewConfig};
pub use driver::{FrameDriver, StepMode};
pub use i18n::{LabelKey, Labels, Locale};
pub use settings::Settings;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display frame)
    pub const SIM_DT: f64 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest host frame fed to the accumulator (seconds)
    pub const MAX_FRAME_TIME: f64 = 0.1;

    /// km/h per m/s
    pub const KMH_PER_MS: f64 = 3.6;
}

/// Convert km/h to m/s
#[inline]
pub fn kmh_to_ms(kmh: f64) -> f64 {
    kmh / consts::KMH_PER_MS
}

/// Convert m/s to km/h
#[inline]
pub fn ms_to_kmh(ms: f64) -> f64 {
    ms * consts::KMH_PER_MS
}
