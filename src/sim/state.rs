//! Simulation state and core types
//!
//! One authoritative mutable `SimulationState` per run. Commands and ticks are
//! the only things that change it.

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;

/// Current regime of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Not started, or just restarted
    #[default]
    Idle,
    /// Constant-velocity motion at the initial speed
    Rolling,
    /// Decelerating at μ·g
    Braking,
    /// Run ended (terminal until restart)
    Stopped,
}

impl Phase {
    /// Whether ticks advance the simulation in this phase
    pub fn is_moving(&self) -> bool {
        matches!(self, Phase::Rolling | Phase::Braking)
    }

    /// Phase a command leads to; unchanged when the command is a no-op here
    pub fn after(self, command: SimCommand) -> Phase {
        match (self, command) {
            (Phase::Idle, SimCommand::Start) => Phase::Rolling,
            (Phase::Rolling, SimCommand::Brake) => Phase::Braking,
            (_, SimCommand::Restart) => Phase::Idle,
            (phase, _) => phase,
        }
    }
}

/// Why a run reached `Phase::Stopped`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// Braking brought the car to rest
    Halted,
    /// Position passed the maximum simulated distance
    DistanceCap,
}

/// UI-triggered commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimCommand {
    Start,
    Brake,
    Restart,
}

/// Which buttons the UI should offer in the current phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Controls {
    pub start_visible: bool,
    pub brake_visible: bool,
    pub brake_enabled: bool,
    pub restart_visible: bool,
}

impl Controls {
    pub fn for_phase(phase: Phase) -> Self {
        Self {
            start_visible: phase == Phase::Idle,
            brake_visible: phase.is_moving(),
            brake_enabled: phase == Phase::Rolling,
            restart_visible: phase != Phase::Idle,
        }
    }
}

/// Complete state of one braking run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Physical constants for this run
    pub config: SimConfig,
    /// Current speed (m/s, ≥ 0)
    pub speed: f64,
    /// Distance travelled since start (m, ≥ 0)
    pub position: f64,
    pub phase: Phase,
    /// Position at which braking began
    pub brake_start_position: Option<f64>,
    /// Set exactly when `phase == Stopped`
    pub stop_reason: Option<StopReason>,
    /// Ticks simulated since start
    pub time_ticks: u64,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

impl SimulationState {
    /// Create an idle run with the given constants
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            speed: 0.0,
            position: 0.0,
            phase: Phase::Idle,
            brake_start_position: None,
            stop_reason: None,
            time_ticks: 0,
        }
    }

    /// Begin rolling at the initial speed. Only valid from `Idle`.
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::Idle {
            log::debug!("start ignored in {:?}", self.phase);
            return false;
        }
        self.speed = self.config.initial_speed();
        self.phase = Phase::Rolling;
        log::info!("Run started at {:.2} m/s", self.speed);
        true
    }

    /// Begin braking at the current position. Only valid from `Rolling`.
    pub fn brake(&mut self) -> bool {
        if self.phase != Phase::Rolling {
            log::debug!("brake ignored in {:?}", self.phase);
            return false;
        }
        self.brake_start_position = Some(self.position);
        self.phase = Phase::Braking;
        log::info!("Braking at {:.2} m, {:.2} m/s", self.position, self.speed);
        true
    }

    /// Reset to the freshly constructed idle state, keeping the constants
    pub fn restart(&mut self) -> bool {
        *self = Self::new(self.config);
        log::info!("Run restarted");
        true
    }

    /// Dispatch a command; returns whether it changed the state
    pub fn apply(&mut self, command: SimCommand) -> bool {
        match command {
            SimCommand::Start => self.start(),
            SimCommand::Brake => self.brake(),
            SimCommand::Restart => self.restart(),
        }
    }

    /// Braking distance to display: the closed-form value until braking starts,
    /// then the distance actually covered since the brake point
    pub fn braking_distance(&self) -> f64 {
        match self.brake_start_position {
            Some(start) => self.position - start,
            None => self.config.theoretical_braking_distance(),
        }
    }

    /// Whether the run ended by braking to rest
    pub fn halted_by_braking(&self) -> bool {
        self.stop_reason == Some(StopReason::Halted)
    }

    /// Button availability for the current phase
    pub fn controls(&self) -> Controls {
        Controls::for_phase(self.phase)
    }

    /// Panic (debug builds only) if the state breaks a phase invariant
    pub(crate) fn debug_check_invariants(&self) {
        debug_assert!(self.speed >= 0.0, "negative speed {}", self.speed);
        debug_assert!(self.position >= 0.0, "negative position {}", self.position);
        match self.phase {
            Phase::Idle => {
                debug_assert!(self.speed == 0.0 && self.position == 0.0);
                debug_assert!(self.brake_start_position.is_none());
            }
            Phase::Braking => {
                debug_assert!(
                    self.brake_start_position
                        .is_some_and(|start| start <= self.position)
                );
            }
            Phase::Stopped => {
                debug_assert!(self.speed == 0.0);
                debug_assert!(self.stop_reason.is_some());
            }
            Phase::Rolling => {}
        }
        debug_assert_eq!(self.phase == Phase::Stopped, self.stop_reason.is_some());
    }
}
