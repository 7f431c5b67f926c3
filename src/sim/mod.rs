//! Deterministic braking simulation
//!
//! All kinematics live here. This module must stay pure:
//! - Time only advances through `tick`
//! - Commands are applied between ticks, never during one
//! - No rendering or platform dependencies

pub mod state;
pub mod tick;

pub use state::{Controls, Phase, SimCommand, SimulationState, StopReason};
pub use tick::tick;
