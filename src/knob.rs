// src/knob.rs
//! One rotary knob: its value, its drag session and the render plan derived
//! from the value. Every knob owns all of its mutable state, so two knobs on
//! the same page never observe each other's drags.

use std::rc::Rc;

use crate::bridge::HostBridge;
use crate::config::KnobConfig;
use crate::mapping::{self, Point};

/// A knob position, always within `[0, 100]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct ControlValue(f64);

impl ControlValue {
    pub const ZERO: ControlValue = ControlValue(mapping::MIN_VALUE);

    pub fn new(v: f64) -> Self {
        Self(mapping::clamp_value(v))
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    pub origin_y: f64,
    pub origin_value: ControlValue,
}

/// Everything the view needs to draw a knob at one value.
#[derive(Clone, Debug, PartialEq)]
pub struct KnobFrame {
    pub indicator: Point,
    pub arc_path: String,
    pub stroke: String,
    pub label: String,
}

impl KnobFrame {
    pub fn at(value: ControlValue, config: &KnobConfig) -> Self {
        let v = value.get();
        let geometry = &config.geometry;
        Self {
            indicator: mapping::polar_point(
                geometry.center,
                geometry.indicator_radius,
                mapping::value_to_angle(v),
            ),
            arc_path: mapping::arc_path(geometry.center, geometry.arc_radius, v),
            stroke: mapping::arc_stroke(v),
            label: mapping::percent_label(v),
        }
    }
}

pub struct Knob {
    config: KnobConfig,
    value: ControlValue,
    drag: Option<DragSession>,
    bridge: Rc<dyn HostBridge>,
}

impl Knob {
    pub fn new(config: KnobConfig, bridge: Rc<dyn HostBridge>) -> Self {
        Self {
            config,
            value: ControlValue::ZERO,
            drag: None,
            bridge,
        }
    }

    pub fn config(&self) -> &KnobConfig {
        &self.config
    }

    pub fn value(&self) -> f64 {
        self.value.get()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn frame(&self) -> KnobFrame {
        KnobFrame::at(self.value, &self.config)
    }

    pub fn pointer_down(&mut self, y: f64) {
        self.drag = Some(DragSession {
            origin_y: y,
            origin_value: self.value,
        });
    }

    /// Returns `None` when no drag is in progress.
    pub fn pointer_move(&mut self, y: f64) -> Option<KnobFrame> {
        let session = self.drag?;
        let delta = (session.origin_y - y) * self.config.drag_sensitivity;
        Some(self.commit(session.origin_value.get() + delta))
    }

    /// Ends this knob's drag. Returns whether a drag was active.
    pub fn pointer_up(&mut self) -> bool {
        self.drag.take().is_some()
    }

    pub fn wheel(&mut self, delta_y: f64) -> KnobFrame {
        let step = if delta_y < 0.0 {
            self.config.wheel_step
        } else {
            -self.config.wheel_step
        };
        self.commit(self.value.get() + step)
    }

    pub fn reset(&mut self) -> KnobFrame {
        self.commit(mapping::MIN_VALUE)
    }

    /// Resync from the host. Never echoes back to the bridge.
    pub fn set_from_host(&mut self, v: f64) -> KnobFrame {
        self.value = ControlValue::new(v);
        self.frame()
    }

    fn commit(&mut self, v: f64) -> KnobFrame {
        self.value = ControlValue::new(v);
        self.bridge.emit(self.config.param_id, self.value.get());
        self.frame()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::testing::RecordingBridge;
    use crate::bridge::NoopBridge;
    use crate::config::{BUILDUP_PARAM, DRIVE_PARAM};
    use proptest::prelude::*;

    fn knob(config: KnobConfig) -> (Knob, Rc<RecordingBridge>) {
        let bridge = Rc::new(RecordingBridge::default());
        (Knob::new(config, bridge.clone()), bridge)
    }

    #[test]
    fn drag_up_fifty_pixels_from_zero() {
        let (mut k, bridge) = knob(KnobConfig::main());
        k.pointer_down(100.0);
        assert!(k.is_dragging());
        let frame = k.pointer_move(50.0).expect("dragging");
        assert_eq!(k.value(), 25.0);
        assert_eq!(frame.label, "25%");
        assert_eq!(bridge.last(), Some((BUILDUP_PARAM.to_string(), 25.0)));
    }

    #[test]
    fn drag_is_relative_to_origin_not_previous_move() {
        let (mut k, _) = knob(KnobConfig::main());
        k.set_from_host(40.0);
        k.pointer_down(200.0);
        k.pointer_move(180.0);
        k.pointer_move(220.0);
        assert_eq!(k.value(), 30.0);
    }

    #[test]
    fn move_without_drag_is_ignored() {
        let (mut k, bridge) = knob(KnobConfig::main());
        assert!(k.pointer_move(10.0).is_none());
        assert_eq!(k.value(), 0.0);
        assert!(bridge.calls().is_empty());
    }

    #[test]
    fn pointer_up_ends_session() {
        let (mut k, _) = knob(KnobConfig::main());
        k.pointer_down(0.0);
        assert!(k.pointer_up());
        assert!(!k.is_dragging());
        assert!(!k.pointer_up());
        assert!(k.pointer_move(-100.0).is_none());
    }

    #[test]
    fn drag_clamps_both_ends() {
        let (mut k, _) = knob(KnobConfig::main());
        k.pointer_down(500.0);
        k.pointer_move(0.0);
        assert_eq!(k.value(), 100.0);
        k.pointer_move(2000.0);
        assert_eq!(k.value(), 0.0);
    }

    #[test]
    fn wheel_steps_per_knob() {
        let (mut main, main_bridge) = knob(KnobConfig::main());
        let (mut drive, drive_bridge) = knob(KnobConfig::drive());
        main.set_from_host(50.0);
        drive.set_from_host(50.0);

        main.wheel(-120.0);
        drive.wheel(-120.0);
        assert_eq!(main.value(), 51.0);
        assert_eq!(drive.value(), 52.0);
        assert_eq!(main_bridge.last(), Some((BUILDUP_PARAM.to_string(), 51.0)));
        assert_eq!(drive_bridge.last(), Some((DRIVE_PARAM.to_string(), 52.0)));

        main.wheel(120.0);
        drive.wheel(120.0);
        assert_eq!(main.value(), 50.0);
        assert_eq!(drive.value(), 50.0);
    }

    #[test]
    fn wheel_clamps_at_bounds() {
        let (mut drive, bridge) = knob(KnobConfig::drive());
        drive.set_from_host(99.0);
        drive.wheel(-1.0);
        assert_eq!(drive.value(), 100.0);
        drive.set_from_host(1.0);
        drive.wheel(1.0);
        assert_eq!(drive.value(), 0.0);
        assert_eq!(bridge.last(), Some((DRIVE_PARAM.to_string(), 0.0)));
    }

    #[test]
    fn wheel_works_during_drag() {
        let (mut k, _) = knob(KnobConfig::main());
        k.pointer_down(0.0);
        k.wheel(-1.0);
        assert_eq!(k.value(), 1.0);
        assert!(k.is_dragging());
    }

    #[test]
    fn double_click_resets_and_pushes_zero() {
        let (mut k, bridge) = knob(KnobConfig::main());
        k.set_from_host(73.0);
        let frame = k.reset();
        assert_eq!(k.value(), 0.0);
        assert_eq!(frame.arc_path, "");
        assert_eq!(bridge.calls(), vec![(BUILDUP_PARAM.to_string(), 0.0)]);
    }

    #[test]
    fn host_push_clamps_and_stays_silent() {
        let (mut k, bridge) = knob(KnobConfig::drive());
        k.set_from_host(250.0);
        assert_eq!(k.value(), 100.0);
        k.set_from_host(-4.0);
        assert_eq!(k.value(), 0.0);
        k.set_from_host(f64::NAN);
        assert_eq!(k.value(), 0.0);
        assert!(bridge.calls().is_empty());
    }

    #[test]
    fn knobs_do_not_share_drag_state() {
        let bridge: Rc<dyn HostBridge> = Rc::new(NoopBridge);
        let mut main = Knob::new(KnobConfig::main(), bridge.clone());
        let mut drive = Knob::new(KnobConfig::drive(), bridge);

        drive.pointer_down(100.0);
        assert!(main.pointer_move(0.0).is_none());
        assert!(drive.pointer_move(80.0).is_some());
        assert_eq!(main.value(), 0.0);
        assert_eq!(drive.value(), 10.0);

        main.pointer_down(0.0);
        assert!(main.pointer_up());
        assert!(drive.is_dragging());
    }

    #[test]
    fn frame_uses_knob_geometry() {
        let (mut drive, _) = knob(KnobConfig::drive());
        let frame = drive.set_from_host(50.0);
        // 50 maps straight up.
        assert!((frame.indicator.x - 40.0).abs() < 1e-9);
        assert!((frame.indicator.y - 12.0).abs() < 1e-9);
        assert!(frame.arc_path.contains("A 32 32 0 0 0"));
    }

    proptest! {
        #[test]
        fn inputs_never_escape_range(
            start in -50.0f64..150.0,
            origin in -1000.0f64..1000.0,
            moves in proptest::collection::vec(-5000.0f64..5000.0, 1..8),
            wheels in proptest::collection::vec(-3.0f64..3.0, 0..40),
        ) {
            let mut k = Knob::new(KnobConfig::drive(), Rc::new(NoopBridge));
            k.set_from_host(start);
            k.pointer_down(origin);
            for y in moves {
                k.pointer_move(y);
                prop_assert!((0.0..=100.0).contains(&k.value()));
            }
            k.pointer_up();
            for dy in wheels {
                k.wheel(dy);
                prop_assert!((0.0..=100.0).contains(&k.value()));
            }
        }
    }
}
