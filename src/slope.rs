// src/slope.rs
//! Mutually exclusive filter-slope buttons.

use std::rc::Rc;

use crate::bridge::HostBridge;
use crate::config::SlopeConfig;
use crate::error::UiError;

pub struct SlopeSelector {
    config: SlopeConfig,
    /// Codes that can be shown as active; the active code is always one of
    /// these while the set is non-empty.
    available: Vec<i32>,
    active: i32,
    bridge: Rc<dyn HostBridge>,
}

impl SlopeSelector {
    pub fn new(config: SlopeConfig, bridge: Rc<dyn HostBridge>) -> Self {
        Self {
            available: config.codes.iter().map(|c| c.code).collect(),
            active: config.default_code,
            config,
            bridge,
        }
    }

    /// Narrows the selectable codes to those with a button on the page. If
    /// the current code has no button the first bound code takes over.
    pub fn restrict_to(&mut self, bound: &[i32]) {
        self.available.retain(|c| bound.contains(c));
        if !self.available.contains(&self.active) {
            if let Some(&first) = self.available.first() {
                self.active = first;
            }
        }
    }

    pub fn active(&self) -> i32 {
        self.active
    }

    pub fn is_active(&self, code: i32) -> bool {
        self.active == code
    }

    pub fn contains(&self, code: i32) -> bool {
        self.available.contains(&code)
    }

    pub fn label(&self, code: i32) -> Option<&'static str> {
        self.config
            .codes
            .iter()
            .find(|c| c.code == code)
            .map(|c| c.label)
    }

    /// A button click: select `code` and tell the host.
    pub fn select(&mut self, code: i32) -> Result<(), UiError> {
        if !self.contains(code) {
            return Err(UiError::InvalidSlope(code.to_string()));
        }
        self.active = code;
        log::debug!("filter slope {}", self.label(code).unwrap_or("?"));
        self.bridge.emit(self.config.param_id, f64::from(code));
        Ok(())
    }

    /// Host resync. The raw number must be an integral, known code; anything
    /// else leaves the selection untouched.
    pub fn set_from_host(&mut self, raw: f64) -> Result<i32, UiError> {
        let code = parse_code(raw).filter(|c| self.contains(*c));
        match code {
            Some(code) => {
                self.active = code;
                Ok(code)
            }
            None => Err(UiError::InvalidSlope(raw.to_string())),
        }
    }
}

fn parse_code(raw: f64) -> Option<i32> {
    if !raw.is_finite() || raw.fract() != 0.0 {
        return None;
    }
    if raw < f64::from(i32::MIN) || raw > f64::from(i32::MAX) {
        return None;
    }
    Some(raw as i32)
}

/// Parse a `data-slope` attribute.
pub fn parse_attr(attr: &str) -> Result<i32, UiError> {
    attr.trim()
        .parse::<i32>()
        .map_err(|_| UiError::InvalidSlope(attr.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::testing::RecordingBridge;
    use crate::config::SLOPE_PARAM;

    fn selector() -> (SlopeSelector, Rc<RecordingBridge>) {
        let bridge = Rc::new(RecordingBridge::default());
        (SlopeSelector::new(SlopeConfig::default(), bridge.clone()), bridge)
    }

    #[test]
    fn defaults_to_twelve_db() {
        let (s, _) = selector();
        assert_eq!(s.active(), 1);
        assert_eq!(s.label(s.active()), Some("12 dB/oct"));
    }

    #[test]
    fn click_selects_and_pushes() {
        let (mut s, bridge) = selector();
        s.select(3).unwrap();
        assert!(s.is_active(3));
        assert!(!s.is_active(1));
        assert_eq!(bridge.calls(), vec![(SLOPE_PARAM.to_string(), 3.0)]);
    }

    #[test]
    fn unknown_code_is_rejected() {
        let (mut s, bridge) = selector();
        assert!(matches!(s.select(7), Err(UiError::InvalidSlope(_))));
        assert_eq!(s.active(), 1);
        assert!(bridge.calls().is_empty());
    }

    #[test]
    fn host_resync_does_not_echo() {
        let (mut s, bridge) = selector();
        assert_eq!(s.set_from_host(0.0).unwrap(), 0);
        assert!(s.is_active(0));
        assert!(bridge.calls().is_empty());
    }

    #[test]
    fn active_code_always_has_a_button() {
        let (mut s, _) = selector();
        s.restrict_to(&[0, 2, 9]);
        assert_eq!(s.active(), 0);
        assert!(!s.contains(1));
        assert!(!s.contains(9));

        assert!(s.set_from_host(3.0).is_err());
        assert!(s.select(1).is_err());
        assert_eq!(s.active(), 0);

        assert_eq!(s.set_from_host(2.0).unwrap(), 2);
        let shown: Vec<i32> = [0, 2].into_iter().filter(|c| s.is_active(*c)).collect();
        assert_eq!(shown, vec![2]);
    }

    #[test]
    fn restrict_keeps_bound_default() {
        let (mut s, _) = selector();
        s.restrict_to(&[3, 1]);
        assert_eq!(s.active(), 1);
    }

    #[test]
    fn malformed_host_index_keeps_selection() {
        let (mut s, _) = selector();
        s.select(2).unwrap();
        for raw in [1.5, -1.0, 4.0, f64::NAN, f64::INFINITY, 1e12] {
            assert!(s.set_from_host(raw).is_err(), "{} accepted", raw);
            assert_eq!(s.active(), 2);
        }
    }

    #[test]
    fn parses_data_attribute() {
        assert_eq!(parse_attr("2").unwrap(), 2);
        assert_eq!(parse_attr(" 0 ").unwrap(), 0);
        assert!(parse_attr("x").is_err());
        assert!(parse_attr("").is_err());
    }
}
