//! Fixed timestep simulation tick
//!
//! Advances the run by one step. All fields are updated together inside
//! `tick`; the stop check reads the speed after this step's decrement.

use super::state::{Phase, SimulationState, StopReason};

/// Advance the state by `dt` seconds
///
/// No-op unless the car is rolling or braking, and for non-finite or
/// non-positive `dt`.
pub fn tick(state: &mut SimulationState, dt: f64) {
    if !state.phase.is_moving() || !dt.is_finite() || dt <= 0.0 {
        return;
    }

    state.time_ticks += 1;

    match state.phase {
        Phase::Rolling => {
            state.position += state.speed * dt;
        }
        Phase::Braking => {
            if state.speed > 0.0 {
                state.position += state.speed * dt;
                state.speed = (state.speed - state.config.deceleration() * dt).max(0.0);
            }
            if state.speed <= state.config.stop_threshold {
                state.speed = 0.0;
                stop(state, StopReason::Halted);
            }
        }
        Phase::Idle | Phase::Stopped => unreachable!("guarded above"),
    }

    if state.phase != Phase::Stopped && state.position >= state.config.max_distance {
        state.speed = 0.0;
        stop(state, StopReason::DistanceCap);
    }

    state.debug_check_invariants();
}

fn stop(state: &mut SimulationState, reason: StopReason) {
    state.phase = Phase::Stopped;
    state.stop_reason = Some(reason);
    match reason {
        StopReason::Halted => log::info!(
            "Car stopped at {:.2} m after braking {:.2} m (theory {:.2} m)",
            state.position,
            state.braking_distance(),
            state.config.theoretical_braking_distance()
        ),
        StopReason::DistanceCap => log::info!(
            "Run ended at distance cap ({:.2} m)",
            state.position
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::consts::SIM_DT;
    use crate::sim::SimCommand;
    use proptest::prelude::*;

    fn run_until_stopped(state: &mut SimulationState, dt: f64) -> u32 {
        let mut ticks = 0;
        while state.phase != Phase::Stopped {
            tick(state, dt);
            ticks += 1;
            assert!(ticks < 1_000_000, "run never stopped");
        }
        ticks
    }

    #[test]
    fn test_idle_tick_is_noop() {
        let mut state = SimulationState::default();
        let before = state.clone();
        tick(&mut state, SIM_DT);
        assert_eq!(state, before);
    }

    #[test]
    fn test_one_second_of_rolling() {
        let mut state = SimulationState::default();
        state.start();
        for _ in 0..60 {
            tick(&mut state, SIM_DT);
        }
        assert_eq!(state.phase, Phase::Rolling);
        assert_eq!(state.speed, state.config.initial_speed());
        assert!((state.position - state.config.initial_speed()).abs() < 1e-9);
        assert_eq!(state.time_ticks, 60);
    }

    #[test]
    fn test_brake_at_start_matches_theory() {
        let mut state = SimulationState::default();
        state.start();
        assert!(state.brake());
        run_until_stopped(&mut state, SIM_DT);

        assert_eq!(state.speed, 0.0);
        assert_eq!(state.stop_reason, Some(StopReason::Halted));
        let theory = state.config.theoretical_braking_distance();
        let step_travel = state.config.initial_speed() * SIM_DT;
        assert!(
            (state.position - theory).abs() < step_travel,
            "stopped at {} vs theory {}",
            state.position,
            theory
        );
        assert_eq!(state.braking_distance(), state.position);
    }

    #[test]
    fn test_stop_uses_post_decrement_speed() {
        let config = SimConfig::default();
        let mut state = SimulationState::new(config);
        state.start();
        state.brake();
        // Just above threshold + one step of deceleration: lands under threshold now
        state.speed = config.stop_threshold + config.deceleration() * SIM_DT * 0.5;
        tick(&mut state, SIM_DT);
        assert_eq!(state.phase, Phase::Stopped);
        assert_eq!(state.speed, 0.0);
    }

    #[test]
    fn test_rolling_hits_distance_cap() {
        let mut state = SimulationState::default();
        state.start();
        let ticks = run_until_stopped(&mut state, SIM_DT);

        assert_eq!(state.stop_reason, Some(StopReason::DistanceCap));
        assert_eq!(state.speed, 0.0);
        assert!(state.position >= state.config.max_distance);
        assert_eq!(state.brake_start_position, None);
        // 1500 m at 66.67 m/s is 22.5 s
        assert!((1350..=1351).contains(&ticks), "ticks = {}", ticks);

        let before = state.clone();
        tick(&mut state, SIM_DT);
        assert_eq!(state, before);
    }

    #[test]
    fn test_late_brake_hits_distance_cap() {
        let mut state = SimulationState::default();
        state.start();
        while state.position < 1400.0 {
            tick(&mut state, SIM_DT);
        }
        state.brake();
        run_until_stopped(&mut state, SIM_DT);
        assert_eq!(state.stop_reason, Some(StopReason::DistanceCap));
        assert!(!state.halted_by_braking());
    }

    #[test]
    fn test_invalid_dt_ignored() {
        let mut state = SimulationState::default();
        state.start();
        let before = state.clone();
        tick(&mut state, 0.0);
        tick(&mut state, -1.0);
        tick(&mut state, f64::NAN);
        tick(&mut state, f64::INFINITY);
        assert_eq!(state, before);
    }

    fn apply_op(state: &mut SimulationState, op: u8) {
        match op {
            0 => tick(state, SIM_DT),
            1 => {
                state.apply(SimCommand::Start);
            }
            2 => {
                state.apply(SimCommand::Brake);
            }
            3 => {
                state.apply(SimCommand::Restart);
            }
            _ => {
                for _ in 0..240 {
                    tick(state, SIM_DT);
                }
            }
        }
    }

    fn allowed_transition(from: Phase, to: Phase, op: u8) -> bool {
        if from == to {
            return true;
        }
        if op == 3 {
            return to == Phase::Idle;
        }
        matches!(
            (from, to),
            (Phase::Idle, Phase::Rolling)
                | (Phase::Rolling, Phase::Braking)
                | (Phase::Rolling, Phase::Stopped)
                | (Phase::Braking, Phase::Stopped)
        )
    }

    proptest! {
        #[test]
        fn prop_rolling_keeps_speed_and_advances(dt in 1e-4f64..0.1, steps in 1usize..200) {
            let mut state = SimulationState::default();
            state.start();
            let speed = state.speed;
            let mut last = state.position;
            for _ in 0..steps {
                tick(&mut state, dt);
                prop_assert_eq!(state.phase, Phase::Rolling);
                prop_assert_eq!(state.speed, speed);
                prop_assert!(state.position > last);
                last = state.position;
            }
        }

        #[test]
        fn prop_braking_speed_monotone_and_reaches_zero(
            dt in 1e-3f64..0.05,
            rolling_ticks in 0usize..300,
        ) {
            let mut state = SimulationState::default();
            state.start();
            for _ in 0..rolling_ticks {
                tick(&mut state, dt);
            }
            state.brake();
            let mut last_speed = state.speed;
            let mut last_pos = state.position;
            let mut ticks = 0u32;
            while state.phase != Phase::Stopped {
                tick(&mut state, dt);
                prop_assert!(state.speed <= last_speed);
                prop_assert!(state.position >= last_pos);
                last_speed = state.speed;
                last_pos = state.position;
                ticks += 1;
                prop_assert!(ticks < 100_000);
            }
            prop_assert_eq!(state.speed, 0.0);
            prop_assert_eq!(state.stop_reason, Some(StopReason::Halted));
        }

        #[test]
        fn prop_phase_transitions_follow_lifecycle(ops in prop::collection::vec(0u8..5, 0..60)) {
            let mut state = SimulationState::default();
            for op in ops {
                let from = state.phase;
                apply_op(&mut state, op);
                prop_assert!(
                    allowed_transition(from, state.phase, op),
                    "{:?} -> {:?} via op {}", from, state.phase, op
                );
            }
        }

        #[test]
        fn prop_restart_restores_fresh_state(ops in prop::collection::vec(0u8..5, 0..60)) {
            let mut state = SimulationState::default();
            for op in ops {
                apply_op(&mut state, op);
            }
            state.restart();
            prop_assert_eq!(state, SimulationState::default());
        }
    }
}
