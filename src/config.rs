// src/config.rs
//! Static layout of the control surface: parameter ids, knob geometry and the
//! DOM selectors the view binds to.

use crate::mapping::Point;

pub const BUILDUP_PARAM: &str = "buildup";
pub const DRIVE_PARAM: &str = "filterDrive";
pub const SLOPE_PARAM: &str = "filterSlope";

/// How long the label keeps the pulse class after a render.
pub const PULSE_MS: i32 = 200;
pub const PULSE_CLASS: &str = "value-changing";
pub const ACTIVE_CLASS: &str = "active";
pub const SLOPE_ATTR: &str = "data-slope";

/// Events a nested knob keeps to itself. `click` is listed because a press
/// and release on the knob would otherwise open the filter popup.
pub const ISOLATED_EVENTS: [&str; 4] = ["mousedown", "wheel", "dblclick", "click"];

/// Value change per pixel of vertical drag.
pub const DRAG_SENSITIVITY: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KnobGeometry {
    pub center: Point,
    pub indicator_radius: f64,
    pub arc_radius: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KnobConfig {
    pub param_id: &'static str,
    pub geometry: KnobGeometry,
    pub wheel_step: f64,
    pub drag_sensitivity: f64,
    /// Keep the `ISOLATED_EVENTS` from bubbling to the enclosing section.
    pub stop_propagation: bool,
}

impl KnobConfig {
    pub fn main() -> Self {
        Self {
            param_id: BUILDUP_PARAM,
            geometry: KnobGeometry {
                center: Point::new(100.0, 100.0),
                indicator_radius: 70.0,
                arc_radius: 80.0,
            },
            wheel_step: 1.0,
            drag_sensitivity: DRAG_SENSITIVITY,
            stop_propagation: false,
        }
    }

    pub fn drive() -> Self {
        Self {
            param_id: DRIVE_PARAM,
            geometry: KnobGeometry {
                center: Point::new(40.0, 40.0),
                indicator_radius: 28.0,
                arc_radius: 32.0,
            },
            wheel_step: 2.0,
            drag_sensitivity: DRAG_SENSITIVITY,
            stop_propagation: true,
        }
    }

    /// Whether the knob's handler for `event` should stop propagation.
    pub fn stops(&self, event: &str) -> bool {
        self.stop_propagation && ISOLATED_EVENTS.contains(&event)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SlopeCode {
    pub code: i32,
    pub label: &'static str,
}

pub const SLOPE_CODES: [SlopeCode; 4] = [
    SlopeCode { code: 0, label: "6 dB/oct" },
    SlopeCode { code: 1, label: "12 dB/oct" },
    SlopeCode { code: 2, label: "18 dB/oct" },
    SlopeCode { code: 3, label: "24 dB/oct" },
];

#[derive(Clone, Copy, Debug)]
pub struct SlopeConfig {
    pub param_id: &'static str,
    pub codes: &'static [SlopeCode],
    pub default_code: i32,
}

impl Default for SlopeConfig {
    fn default() -> Self {
        Self {
            param_id: SLOPE_PARAM,
            codes: &SLOPE_CODES,
            default_code: 1,
        }
    }
}

/// CSS selectors for one knob's elements.
#[derive(Clone, Copy, Debug)]
pub struct KnobIds {
    pub container: &'static str,
    pub indicator: &'static str,
    pub arc: &'static str,
    pub label: &'static str,
}

#[derive(Clone, Copy, Debug)]
pub struct DomIds {
    pub main: KnobIds,
    pub drive: KnobIds,
    pub filter_section: &'static str,
    pub settings_button: &'static str,
    pub popup_overlay: &'static str,
    pub close_popup: &'static str,
    pub slope_buttons: &'static str,
}

impl Default for DomIds {
    fn default() -> Self {
        Self {
            main: KnobIds {
                container: ".knob-container",
                indicator: "#indicator",
                arc: "#progress-arc",
                label: "#value-text",
            },
            drive: KnobIds {
                container: "#drive-knob-container",
                indicator: "#drive-indicator",
                arc: "#drive-arc",
                label: "#drive-value",
            },
            filter_section: "#filter-section",
            settings_button: "#filter-settings-btn",
            popup_overlay: "#popup-overlay",
            close_popup: "#close-popup",
            slope_buttons: ".slope-btn",
        }
    }
}
