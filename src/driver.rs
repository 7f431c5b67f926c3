//! Frame driver: commands, fixed-step accumulation and rendering
//!
//! The host calls `update` then `render` once per animation frame. Commands
//! raised by UI events are queued and applied at the start of the next update,
//! before any tick runs.

use serde::{Deserialize, Serialize};

use crate::config::{SimConfig, ViewConfig};
use crate::consts::{MAX_FRAME_TIME, MAX_SUBSTEPS, SIM_DT};
use crate::renderer::{CameraPolicy, DrawList, Projector};
use crate::sim::{Controls, Phase, SimCommand, SimulationState, tick};

/// How host frame time is turned into ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StepMode {
    /// Accumulate elapsed time and tick in `SIM_DT` steps
    #[default]
    Fixed,
    /// One tick per frame with the measured frame time
    Variable,
}

impl StepMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepMode::Fixed => "fixed",
            StepMode::Variable => "variable",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fixed" => Some(StepMode::Fixed),
            "variable" => Some(StepMode::Variable),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FrameDriver {
    state: SimulationState,
    projector: Projector,
    step_mode: StepMode,
    accumulator: f64,
    pending: Vec<SimCommand>,
    last_phase: Phase,
}

impl FrameDriver {
    pub fn new(config: SimConfig, view: ViewConfig, policy: CameraPolicy) -> Self {
        Self {
            state: SimulationState::new(config),
            projector: Projector::new(view, policy),
            step_mode: StepMode::Fixed,
            accumulator: 0.0,
            pending: Vec::new(),
            last_phase: Phase::Idle,
        }
    }

    pub fn with_step_mode(mut self, step_mode: StepMode) -> Self {
        self.step_mode = step_mode;
        self
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    /// Button availability, including commands still waiting to be applied
    pub fn controls(&self) -> Controls {
        let phase = self
            .pending
            .iter()
            .fold(self.state.phase, |phase, &cmd| phase.after(cmd));
        Controls::for_phase(phase)
    }

    /// Queue a command for the next update
    pub fn queue(&mut self, command: SimCommand) {
        self.pending.push(command);
    }

    /// Apply queued commands, then advance by `elapsed` seconds of host time.
    /// Returns the number of ticks run.
    pub fn update(&mut self, elapsed: f64) -> u32 {
        for cmd in self.pending.drain(..) {
            if self.state.apply(cmd) && cmd == SimCommand::Restart {
                self.accumulator = 0.0;
            }
        }

        let elapsed = if elapsed.is_finite() {
            elapsed.clamp(0.0, MAX_FRAME_TIME)
        } else {
            SIM_DT
        };

        let mut substeps = 0;
        match self.step_mode {
            StepMode::Fixed => {
                if !self.state.phase.is_moving() {
                    // Don't bank idle time
                    self.accumulator = 0.0;
                } else {
                    self.accumulator += elapsed;
                    while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                        tick(&mut self.state, SIM_DT);
                        self.accumulator -= SIM_DT;
                        substeps += 1;
                    }
                    if substeps == MAX_SUBSTEPS {
                        self.accumulator = self.accumulator.min(SIM_DT);
                    }
                }
            }
            StepMode::Variable => {
                if self.state.phase.is_moving() && elapsed > 0.0 {
                    tick(&mut self.state, elapsed);
                    substeps = 1;
                }
            }
        }

        if self.state.phase != self.last_phase {
            log::info!("Phase {:?} -> {:?}", self.last_phase, self.state.phase);
            self.last_phase = self.state.phase;
        }

        substeps
    }

    /// Draw list for a `width` × `height` surface (CSS pixels)
    pub fn render(&mut self, width: f32, height: f32) -> DrawList {
        self.projector.render(&self.state, width, height)
    }
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new(SimConfig::default(), ViewConfig::default(), CameraPolicy::default())
    }
}
