// src/bridge.rs
//! Outbound channel to the plugin host.

/// Receives parameter changes made in the UI.
pub trait HostBridge {
    fn emit(&self, param_id: &str, value: f64);
}

/// Used when no host is attached.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopBridge;

impl HostBridge for NoopBridge {
    fn emit(&self, _param_id: &str, _value: f64) {}
}

/// Forwards to `window.juce.setParameter(paramId, value)` when the host has
/// injected it. Absence of the object is not an error.
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy, Debug, Default)]
pub struct JuceBridge;

#[cfg(target_arch = "wasm32")]
impl JuceBridge {
    fn set_parameter(param_id: &str, value: f64) -> Result<bool, wasm_bindgen::JsValue> {
        use js_sys::{Function, Reflect};
        use wasm_bindgen::{JsCast, JsValue};

        let juce = Reflect::get(&js_sys::global(), &"juce".into())?;
        if juce.is_undefined() || juce.is_null() {
            return Ok(false);
        }
        let setter = Reflect::get(&juce, &"setParameter".into())?;
        let Some(setter) = setter.dyn_ref::<Function>() else {
            return Ok(false);
        };
        setter.call2(&juce, &JsValue::from_str(param_id), &JsValue::from_f64(value))?;
        Ok(true)
    }
}

#[cfg(target_arch = "wasm32")]
impl HostBridge for JuceBridge {
    fn emit(&self, param_id: &str, value: f64) {
        match Self::set_parameter(param_id, value) {
            Ok(true) => log::debug!("{} -> {}", param_id, value),
            Ok(false) => {}
            Err(err) => log::debug!("setParameter({}) failed: {:?}", param_id, err),
        }
    }
}
