// src/mapping.rs
//! Value/angle mapping and the SVG geometry derived from it.
//!
//! A knob value in `[0, 100]` sweeps 270 degrees, from 225 at zero down to
//! -45 at full scale, leaving a 90 degree gap at the bottom of the dial.

pub const MIN_VALUE: f64 = 0.0;
pub const MAX_VALUE: f64 = 100.0;
pub const START_ANGLE: f64 = 225.0;
pub const SWEEP_DEGREES: f64 = 270.0;

const DEGREES_PER_UNIT: f64 = SWEEP_DEGREES / MAX_VALUE;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Clamp to `[0, 100]`. NaN maps to zero.
#[inline]
pub fn clamp_value(v: f64) -> f64 {
    if v.is_nan() {
        return MIN_VALUE;
    }
    v.clamp(MIN_VALUE, MAX_VALUE)
}

#[inline]
pub fn value_to_angle(v: f64) -> f64 {
    START_ANGLE - v * DEGREES_PER_UNIT
}

#[inline]
pub fn angle_to_value(angle: f64) -> f64 {
    clamp_value((START_ANGLE - angle) / SWEEP_DEGREES * MAX_VALUE)
}

/// Point on a circle at `angle_deg`, measured counter-clockwise from +x.
/// SVG y grows downward, hence the subtraction.
pub fn polar_point(center: Point, radius: f64, angle_deg: f64) -> Point {
    let rad = angle_deg.to_radians();
    Point::new(center.x + radius * rad.cos(), center.y - radius * rad.sin())
}

#[inline]
pub fn large_arc_flag(start_deg: f64, end_deg: f64) -> u8 {
    if (end_deg - start_deg).abs() > 180.0 {
        1
    } else {
        0
    }
}

/// Path `d` for the progress arc, empty at zero so nothing is stroked.
pub fn arc_path(center: Point, radius: f64, value: f64) -> String {
    if value <= MIN_VALUE {
        return String::new();
    }
    let end_angle = value_to_angle(value);
    let start = polar_point(center, radius, START_ANGLE);
    let end = polar_point(center, radius, end_angle);
    let flag = large_arc_flag(START_ANGLE, end_angle);
    format!(
        "M {} {} A {} {} 0 {} 0 {} {}",
        start.x, start.y, radius, radius, flag, end.x, end.y
    )
}

/// Stroke colour ramp: hue 240 -> 180, saturation 50% -> 100%.
pub fn arc_stroke(value: f64) -> String {
    let hue = 240.0 - value * 0.6;
    let saturation = 50.0 + value * 0.5;
    format!("hsl({}, {}%, 60%)", hue, saturation)
}

pub fn percent_label(value: f64) -> String {
    format!("{}%", value.round() as i64)
}
