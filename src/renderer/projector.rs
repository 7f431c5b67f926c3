//! World-to-screen projection and per-frame draw list
//!
//! Paint order:
//! 1. Background
//! 2. Road
//! 3. Skid mark and brake-start marker (once braking has begun)
//! 4. Car
//! 5. Stop marker (only when braking brought the car to rest)
//! 6. Text readout

use glam::Vec2;

use super::camera::{Camera, CameraPolicy};
use super::draw::{Color, DrawCommand, DrawList, colors};
use crate::config::ViewConfig;
use crate::i18n::{LabelKey, ReadoutLine};
use crate::sim::{Phase, SimulationState};

#[derive(Debug, Clone, Default)]
pub struct Projector {
    view: ViewConfig,
    camera: Camera,
}

impl Projector {
    pub fn new(view: ViewConfig, policy: CameraPolicy) -> Self {
        Self {
            view,
            camera: Camera::new(policy),
        }
    }

    pub fn view(&self) -> &ViewConfig {
        &self.view
    }

    /// Build the draw list for `state` on a `width` × `height` surface
    pub fn render(&mut self, state: &SimulationState, width: f32, height: f32) -> DrawList {
        let view = self.view;
        self.camera.update(state, &view, width);

        let mut commands = Vec::with_capacity(16);
        commands.push(DrawCommand::Clear(colors::BACKGROUND));

        let road_len =
            (state.config.max_distance as f32 + view.road_buffer_m) * view.pixels_per_meter;
        commands.push(DrawCommand::Rect {
            min: Vec2::new(-self.camera.offset(), view.road_y),
            size: Vec2::new(road_len, view.road_height),
            color: colors::ROAD,
        });

        let car_x = self.camera.to_screen_x(state.position, &view);

        if let Some(brake_pos) = state.brake_start_position {
            let start_x = self.camera.to_screen_x(brake_pos, &view);
            commands.push(DrawCommand::Rect {
                min: Vec2::new(start_x, view.skid_y),
                size: Vec2::new(car_x - start_x, view.skid_height),
                color: colors::SKID_MARK,
            });
            let key = LabelKey::BrakeStart;
            push_marker(&mut commands, &view, start_x, key, colors::BRAKE_MARKER);
        }

        commands.push(DrawCommand::Rect {
            min: Vec2::new(car_x, view.road_y - view.car_height / 2.0),
            size: Vec2::new(view.car_width, view.car_height),
            color: colors::CAR,
        });

        if state.phase == Phase::Stopped && state.halted_by_braking() {
            let key = LabelKey::CarStopped;
            push_marker(&mut commands, &view, car_x, key, colors::STOP_MARKER);
        }

        let lines = [
            ReadoutLine::Speed(state.speed),
            ReadoutLine::Position(state.position),
            ReadoutLine::Friction(state.config.friction_coefficient),
            ReadoutLine::Mass(state.config.mass_kg),
            ReadoutLine::BrakingDistance(state.braking_distance()),
        ];
        for (i, line) in lines.into_iter().enumerate() {
            commands.push(DrawCommand::Readout {
                pos: Vec2::new(view.text_x, view.text_y + i as f32 * view.text_line_height),
                line,
                color: colors::TEXT,
                size: view.text_size,
            });
        }

        DrawList {
            width,
            height,
            commands,
        }
    }
}

/// Downward-pointing triangle at `x` with a label above it
fn push_marker(
    commands: &mut Vec<DrawCommand>,
    view: &ViewConfig,
    x: f32,
    key: LabelKey,
    color: Color,
) {
    let tip = Vec2::new(x, view.marker_tip_y);
    let base_y = view.marker_tip_y - view.marker_size * 2.0;
    commands.push(DrawCommand::Triangle {
        points: [
            tip,
            Vec2::new(x - view.marker_size, base_y),
            Vec2::new(x + view.marker_size, base_y),
        ],
        color,
    });
    commands.push(DrawCommand::Label {
        pos: Vec2::new(x + view.marker_label_dx, view.marker_label_y),
        key,
        color,
        size: view.text_size,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::tick;

    fn labels(list: &DrawList) -> Vec<LabelKey> {
        list.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Label { key, .. } => Some(*key),
                _ => None,
            })
            .collect()
    }

    fn car_rect(list: &DrawList) -> (Vec2, Vec2) {
        list.commands
            .iter()
            .find_map(|cmd| match cmd {
                DrawCommand::Rect { min, size, color } if *color == colors::CAR => {
                    Some((*min, *size))
                }
                _ => None,
            })
            .expect("car is always drawn")
    }

    #[test]
    fn test_idle_frame() {
        let mut projector = Projector::default();
        let state = SimulationState::default();
        let list = projector.render(&state, 900.0, 250.0);

        assert_eq!(list.commands.len(), 8);
        assert_eq!(list.commands[0], DrawCommand::Clear(colors::BACKGROUND));
        assert!(matches!(
            list.commands[1],
            DrawCommand::Rect { color, .. } if color == colors::ROAD
        ));
        let (min, size) = car_rect(&list);
        assert_eq!(min, Vec2::new(0.0, 137.5));
        assert_eq!(size, Vec2::new(50.0, 25.0));
        assert!(labels(&list).is_empty());
        assert_eq!(list.clear_color(), Some(colors::BACKGROUND));
    }

    #[test]
    fn test_road_spans_past_max_distance() {
        let mut projector = Projector::default();
        let list = projector.render(&SimulationState::default(), 900.0, 250.0);
        match list.commands[1] {
            DrawCommand::Rect { min, size, .. } => {
                assert_eq!(min, Vec2::new(0.0, 150.0));
                assert_eq!(size, Vec2::new(6000.0, 100.0));
            }
            ref other => panic!("expected road, got {:?}", other),
        }
    }

    #[test]
    fn test_readout_shows_theoretical_distance_before_braking() {
        let mut projector = Projector::default();
        let state = SimulationState::default();
        let list = projector.render(&state, 900.0, 250.0);
        let readouts: Vec<ReadoutLine> = list
            .commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Readout { line, .. } => Some(*line),
                _ => None,
            })
            .collect();
        assert_eq!(
            readouts,
            vec![
                ReadoutLine::Speed(0.0),
                ReadoutLine::Position(0.0),
                ReadoutLine::Friction(0.7811),
                ReadoutLine::Mass(1300.0),
                ReadoutLine::BrakingDistance(state.config.theoretical_braking_distance()),
            ]
        );
    }

    #[test]
    fn test_skid_mark_and_brake_marker() {
        let mut projector = Projector::default();
        let mut state = SimulationState::default();
        state.start();
        for _ in 0..60 {
            tick(&mut state, SIM_DT);
        }
        state.brake();
        for _ in 0..30 {
            tick(&mut state, SIM_DT);
        }

        let list = projector.render(&state, 900.0, 250.0);
        let skid = list
            .commands
            .iter()
            .find_map(|cmd| match cmd {
                DrawCommand::Rect { min, size, color } if *color == colors::SKID_MARK => {
                    Some((*min, *size))
                }
                _ => None,
            })
            .expect("skid mark drawn while braking");
        let (car_min, _) = car_rect(&list);
        assert!((skid.0.x + skid.1.x - car_min.x).abs() < 1e-3);
        assert_eq!(skid.0.y, 170.0);
        assert!(skid.1.x > 0.0);
        assert_eq!(labels(&list), vec![LabelKey::BrakeStart]);

        // Skid mark is painted before the car
        let skid_idx = list
            .commands
            .iter()
            .position(|c| {
                matches!(c, DrawCommand::Rect { color, .. } if *color == colors::SKID_MARK)
            });
        let car_idx = list
            .commands
            .iter()
            .position(|c| matches!(c, DrawCommand::Rect { color, .. } if *color == colors::CAR));
        assert!(skid_idx < car_idx);
    }

    #[test]
    fn test_stop_marker_only_after_braking_to_rest() {
        let mut projector = Projector::default();

        let mut state = SimulationState::default();
        state.start();
        state.brake();
        while state.phase != Phase::Stopped {
            tick(&mut state, SIM_DT);
        }
        let list = projector.render(&state, 900.0, 250.0);
        assert_eq!(labels(&list), vec![LabelKey::BrakeStart, LabelKey::CarStopped]);

        let mut state = SimulationState::default();
        state.start();
        while state.phase != Phase::Stopped {
            tick(&mut state, SIM_DT);
        }
        let list = projector.render(&state, 900.0, 250.0);
        assert!(labels(&list).is_empty());
    }

    #[test]
    fn test_marker_geometry() {
        let mut commands = Vec::new();
        let view = ViewConfig::default();
        push_marker(&mut commands, &view, 100.0, LabelKey::BrakeStart, colors::BRAKE_MARKER);
        assert_eq!(
            commands[0],
            DrawCommand::Triangle {
                points: [
                    Vec2::new(100.0, 140.0),
                    Vec2::new(95.0, 130.0),
                    Vec2::new(105.0, 130.0)
                ],
                color: colors::BRAKE_MARKER,
            }
        );
        assert!(matches!(
            commands[1],
            DrawCommand::Label { pos, .. } if pos == Vec2::new(80.0, 125.0)
        ));
    }

    #[test]
    fn test_resize_keeps_car_on_midline() {
        let mut projector = Projector::default();
        let mut state = SimulationState::default();
        state.start();
        state.position = 600.0;
        let before = state.clone();

        for width in [500.0, 900.0, 1400.0] {
            let list = projector.render(&state, width, 250.0);
            let (min, _) = car_rect(&list);
            assert_eq!(min.x, width / 2.0);
            assert_eq!(list.width, width);
        }
        assert_eq!(state, before);
    }
}
