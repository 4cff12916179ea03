// src/lib.rs
//! Browser-side control surface for the BuildUp Verb editor: the build-up
//! knob, the filter drive knob, the slope buttons and the filter settings
//! popup, kept in sync with the plugin host.

pub mod bridge;
pub mod config;
pub mod error;
pub mod knob;
pub mod mapping;
pub mod popup;
pub mod slope;
pub mod sync;

#[cfg(target_arch = "wasm32")]
mod dom;

pub use bridge::{HostBridge, NoopBridge};
pub use error::UiError;
pub use knob::{ControlValue, DragSession, Knob, KnobFrame};
pub use popup::Popup;
pub use slope::SlopeSelector;
pub use sync::{HostSlot, HostSync};

#[cfg(target_arch = "wasm32")]
pub use wasm::*;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;

    use crate::bridge::JuceBridge;
    use crate::config::{DomIds, BUILDUP_PARAM, DRIVE_PARAM, SLOPE_PARAM};
    use crate::dom;

    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        set_panic_hook();
        console_log::init_with_level(log::Level::Info).ok();
        dom::mount(Rc::new(JuceBridge), &DomIds::default())?;
        Ok(())
    }

    // ---------- host -> UI ----------
    #[wasm_bindgen]
    pub fn update_knob_value(value: f64) {
        dom::with_ui(|ui| ui.resync_main(value));
    }

    #[wasm_bindgen]
    pub fn update_drive_value(value: f64) {
        dom::with_ui(|ui| ui.resync_drive(value));
    }

    #[wasm_bindgen]
    pub fn update_slope_value(index: f64) {
        dom::with_ui(|ui| ui.resync_slope(index));
    }

    /// Resync by host parameter id.
    #[wasm_bindgen]
    pub fn set_parameter(name: &str, value: f64) {
        match name {
            BUILDUP_PARAM => update_knob_value(value),
            DRIVE_PARAM => update_drive_value(value),
            SLOPE_PARAM => update_slope_value(value),
            _ => log::debug!("no control for parameter {}", name),
        }
    }

    // better panic messages in console
    fn set_panic_hook() {
        console_error_panic_hook::set_once();
    }
}
