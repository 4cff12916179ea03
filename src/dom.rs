// src/dom.rs
//! Binds the knob, slope and popup models to the page.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, HtmlElement, KeyboardEvent, MouseEvent, SvgElement, WheelEvent,
    Window,
};

use crate::bridge::HostBridge;
use crate::config::{
    DomIds, KnobConfig, KnobIds, SlopeConfig, ACTIVE_CLASS, PULSE_CLASS, PULSE_MS, SLOPE_ATTR,
};
use crate::error::UiError;
use crate::knob::{Knob, KnobFrame};
use crate::popup::Popup;
use crate::slope::{self, SlopeSelector};
use crate::sync::{HostSlot, HostSync};

thread_local! {
    static UI: RefCell<Option<KnobSyncUi>> = const { RefCell::new(None) };
}

/// The views the host can resync.
pub(crate) struct KnobSyncUi {
    main: Rc<HostSlot<KnobView>>,
    drive: Rc<HostSlot<KnobView>>,
    slope: Rc<HostSlot<SlopeView>>,
}

/// Finds every element, wires the listeners and paints the initial state.
pub(crate) fn mount(bridge: Rc<dyn HostBridge>, ids: &DomIds) -> Result<(), UiError> {
    let document = document()?;

    let main = Rc::new(HostSlot::new(KnobView::find(
        &document,
        &ids.main,
        Knob::new(KnobConfig::main(), bridge.clone()),
    )?));
    let drive = Rc::new(HostSlot::new(KnobView::find(
        &document,
        &ids.drive,
        Knob::new(KnobConfig::drive(), bridge.clone()),
    )?));
    let slope = Rc::new(HostSlot::new(SlopeView::find(
        &document,
        ids.slope_buttons,
        SlopeSelector::new(SlopeConfig::default(), bridge),
    )?));
    let popup = Rc::new(RefCell::new(PopupView {
        overlay: query(&document, ids.popup_overlay)?,
        popup: Popup::default(),
    }));

    bind_knob(&document, &main)?;
    bind_knob(&document, &drive)?;
    bind_slope(&slope)?;
    bind_popup(&document, ids, &popup)?;

    main.read(KnobView::paint_current);
    drive.read(KnobView::paint_current);
    slope.read(SlopeView::paint);

    UI.with(|ui| {
        *ui.borrow_mut() = Some(KnobSyncUi { main, drive, slope })
    });
    install_host_hooks(&window()?)?;
    log::info!("control surface mounted");
    Ok(())
}

pub(crate) fn with_ui(f: impl FnOnce(&KnobSyncUi)) {
    UI.with(|ui| match ui.borrow().as_ref() {
        Some(ui) => f(ui),
        None => log::warn!("host update before the UI was mounted"),
    })
}

impl KnobSyncUi {
    pub(crate) fn resync_main(&self, value: f64) {
        self.main.host_push(value);
    }

    pub(crate) fn resync_drive(&self, value: f64) {
        self.drive.host_push(value);
    }

    pub(crate) fn resync_slope(&self, raw: f64) {
        self.slope.host_push(raw);
    }
}

// ---------- knobs ----------
struct KnobView {
    knob: Knob,
    container: Element,
    indicator: Element,
    arc: Element,
    label: Element,
}

impl HostSync for KnobView {
    fn host_sync(&mut self, value: f64) {
        let frame = self.knob.set_from_host(value);
        self.paint(&frame);
    }
}

impl KnobView {
    fn find(document: &Document, ids: &KnobIds, knob: Knob) -> Result<Self, UiError> {
        Ok(Self {
            knob,
            container: query(document, ids.container)?,
            indicator: query(document, ids.indicator)?,
            arc: query(document, ids.arc)?,
            label: query(document, ids.label)?,
        })
    }

    fn paint_current(&self) {
        self.paint(&self.knob.frame());
    }

    fn paint(&self, frame: &KnobFrame) {
        if let Err(err) = self.try_paint(frame) {
            log::warn!("{}: paint failed: {:?}", self.knob.config().param_id, err);
        }
    }

    fn try_paint(&self, frame: &KnobFrame) -> Result<(), JsValue> {
        self.indicator
            .set_attribute("cx", &frame.indicator.x.to_string())?;
        self.indicator
            .set_attribute("cy", &frame.indicator.y.to_string())?;
        self.arc.set_attribute("d", &frame.arc_path)?;
        set_style(&self.arc, "stroke", &frame.stroke)?;
        self.label.set_text_content(Some(&frame.label));
        pulse(&self.label)
    }

    fn set_cursor(&self, cursor: &str) {
        if let Err(err) = set_style(&self.container, "cursor", cursor) {
            log::warn!("cursor: {:?}", err);
        }
    }
}

fn bind_knob(document: &Document, slot: &Rc<HostSlot<KnobView>>) -> Result<(), UiError> {
    let (container, config) = slot.read(|v| (v.container.clone(), *v.knob.config()));

    let down_slot = Rc::clone(slot);
    let down_cb = Closure::wrap(Box::new(move |event: MouseEvent| {
        if config.stops("mousedown") {
            event.stop_propagation();
        }
        down_slot.update(|v| {
            v.knob.pointer_down(f64::from(event.client_y()));
            v.set_cursor("grabbing");
        });
    }) as Box<dyn FnMut(_)>);
    container.add_event_listener_with_callback("mousedown", down_cb.as_ref().unchecked_ref())?;
    down_cb.forget();

    let move_slot = Rc::clone(slot);
    let move_cb = Closure::wrap(Box::new(move |event: MouseEvent| {
        move_slot.update(|v| {
            if let Some(frame) = v.knob.pointer_move(f64::from(event.client_y())) {
                v.paint(&frame);
            }
        });
    }) as Box<dyn FnMut(_)>);
    document.add_event_listener_with_callback("mousemove", move_cb.as_ref().unchecked_ref())?;
    move_cb.forget();

    // Document level so a release outside the knob still ends its drag.
    let up_slot = Rc::clone(slot);
    let up_cb = Closure::wrap(Box::new(move |_event: MouseEvent| {
        up_slot.update(|v| {
            if v.knob.pointer_up() {
                v.set_cursor("pointer");
            }
        });
    }) as Box<dyn FnMut(_)>);
    document.add_event_listener_with_callback("mouseup", up_cb.as_ref().unchecked_ref())?;
    up_cb.forget();

    let wheel_slot = Rc::clone(slot);
    let wheel_cb = Closure::wrap(Box::new(move |event: WheelEvent| {
        event.prevent_default();
        if config.stops("wheel") {
            event.stop_propagation();
        }
        wheel_slot.update(|v| {
            let frame = v.knob.wheel(event.delta_y());
            v.paint(&frame);
        });
    }) as Box<dyn FnMut(_)>);
    container.add_event_listener_with_callback("wheel", wheel_cb.as_ref().unchecked_ref())?;
    wheel_cb.forget();

    let reset_slot = Rc::clone(slot);
    let reset_cb = Closure::wrap(Box::new(move |event: MouseEvent| {
        if config.stops("dblclick") {
            event.stop_propagation();
        }
        reset_slot.update(|v| {
            let frame = v.knob.reset();
            v.paint(&frame);
        });
    }) as Box<dyn FnMut(_)>);
    container.add_event_listener_with_callback("dblclick", reset_cb.as_ref().unchecked_ref())?;
    reset_cb.forget();

    // The press and release of every drag also produce a click.
    if config.stops("click") {
        let click_cb = Closure::wrap(Box::new(move |event: MouseEvent| {
            event.stop_propagation();
        }) as Box<dyn FnMut(_)>);
        container.add_event_listener_with_callback("click", click_cb.as_ref().unchecked_ref())?;
        click_cb.forget();
    }

    Ok(())
}

// ---------- slope ----------
struct SlopeView {
    selector: SlopeSelector,
    buttons: Vec<(i32, Element)>,
}

impl HostSync for SlopeView {
    fn host_sync(&mut self, raw: f64) {
        match self.selector.set_from_host(raw) {
            Ok(_) => self.paint(),
            Err(err) => log::warn!("{}", err),
        }
    }
}

impl SlopeView {
    fn find(
        document: &Document,
        selector: &str,
        mut model: SlopeSelector,
    ) -> Result<Self, UiError> {
        let nodes = document.query_selector_all(selector)?;
        let mut buttons = Vec::with_capacity(nodes.length() as usize);
        for i in 0..nodes.length() {
            let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let attr = el.get_attribute(SLOPE_ATTR).unwrap_or_default();
            match slope::parse_attr(&attr) {
                Ok(code) if model.contains(code) => buttons.push((code, el)),
                Ok(code) => log::warn!("slope button with unknown code {}", code),
                Err(err) => log::warn!("skipping slope button: {}", err),
            }
        }
        if buttons.is_empty() {
            log::warn!("no slope buttons match `{}`", selector);
        }
        let bound: Vec<i32> = buttons.iter().map(|(code, _)| *code).collect();
        model.restrict_to(&bound);
        Ok(Self {
            selector: model,
            buttons,
        })
    }

    fn paint(&self) {
        for (code, el) in &self.buttons {
            let on = self.selector.is_active(*code);
            if let Err(err) = el.class_list().toggle_with_force(ACTIVE_CLASS, on) {
                log::warn!("slope {}: {:?}", code, err);
            }
        }
    }
}

fn bind_slope(slot: &Rc<HostSlot<SlopeView>>) -> Result<(), UiError> {
    let buttons = slot.read(|v| v.buttons.clone());
    for (code, el) in buttons {
        let click_slot = Rc::clone(slot);
        let click_cb = Closure::wrap(Box::new(move |event: Event| {
            event.stop_propagation();
            click_slot.update(|v| match v.selector.select(code) {
                Ok(()) => v.paint(),
                Err(err) => log::warn!("{}", err),
            });
        }) as Box<dyn FnMut(_)>);
        el.add_event_listener_with_callback("click", click_cb.as_ref().unchecked_ref())?;
        click_cb.forget();
    }
    Ok(())
}

// ---------- popup ----------
struct PopupView {
    overlay: Element,
    popup: Popup,
}

impl PopupView {
    fn apply(&self) {
        let result = self
            .overlay
            .class_list()
            .toggle_with_force(ACTIVE_CLASS, self.popup.is_open());
        if let Err(err) = result {
            log::warn!("popup: {:?}", err);
        }
    }
}

fn bind_popup(
    document: &Document,
    ids: &DomIds,
    view: &Rc<RefCell<PopupView>>,
) -> Result<(), UiError> {
    let section = query(document, ids.filter_section)?;
    let settings = query(document, ids.settings_button)?;
    let close = query(document, ids.close_popup)?;
    let overlay = view.borrow().overlay.clone();

    on_click(&section, view, |_, popup| popup.open())?;
    on_click(&settings, view, |event, popup| {
        event.stop_propagation();
        popup.open();
    })?;
    on_click(&close, view, |_, popup| popup.close())?;

    let backdrop = overlay.clone();
    on_click(&overlay, view, move |event, popup| {
        let on_overlay = event
            .target()
            .is_some_and(|t| AsRef::<JsValue>::as_ref(&t) == AsRef::<JsValue>::as_ref(&backdrop));
        popup.backdrop_click(on_overlay);
    })?;

    let key_view = Rc::clone(view);
    let key_cb = Closure::wrap(Box::new(move |event: KeyboardEvent| {
        let mut v = key_view.borrow_mut();
        if v.popup.key(&event.key()) {
            v.apply();
        }
    }) as Box<dyn FnMut(_)>);
    document.add_event_listener_with_callback("keydown", key_cb.as_ref().unchecked_ref())?;
    key_cb.forget();

    Ok(())
}

fn on_click(
    target: &Element,
    view: &Rc<RefCell<PopupView>>,
    mut action: impl FnMut(&Event, &mut Popup) + 'static,
) -> Result<(), UiError> {
    let click_view = Rc::clone(view);
    let click_cb = Closure::wrap(Box::new(move |event: Event| {
        let mut v = click_view.borrow_mut();
        action(&event, &mut v.popup);
        v.apply();
    }) as Box<dyn FnMut(_)>);
    target.add_event_listener_with_callback("click", click_cb.as_ref().unchecked_ref())?;
    click_cb.forget();
    Ok(())
}

// ---------- host hooks ----------
fn install_host_hooks(window: &Window) -> Result<(), UiError> {
    install_hook(window, "updateKnobValue", |ui, v| ui.resync_main(v))?;
    install_hook(window, "updateDriveValue", |ui, v| ui.resync_drive(v))?;
    install_hook(window, "updateSlopeValue", |ui, v| ui.resync_slope(v))?;
    Ok(())
}

fn install_hook(
    window: &Window,
    name: &str,
    apply: fn(&KnobSyncUi, f64),
) -> Result<(), UiError> {
    let hook_name = name.to_string();
    let hook = Closure::wrap(Box::new(move |value: JsValue| match value.as_f64() {
        Some(v) => with_ui(|ui| apply(ui, v)),
        None => log::warn!("{}: ignoring non-numeric {:?}", hook_name, value),
    }) as Box<dyn FnMut(JsValue)>);
    js_sys::Reflect::set(window, &JsValue::from_str(name), hook.as_ref())?;
    hook.forget();
    Ok(())
}

// ---------- helpers ----------
fn window() -> Result<Window, UiError> {
    web_sys::window().ok_or(UiError::NoWindow)
}

fn document() -> Result<Document, UiError> {
    window()?.document().ok_or(UiError::NoDocument)
}

fn query(document: &Document, selector: &str) -> Result<Element, UiError> {
    document
        .query_selector(selector)?
        .ok_or_else(|| UiError::MissingElement(selector.to_string()))
}

fn set_style(el: &Element, property: &str, value: &str) -> Result<(), JsValue> {
    if let Some(html) = el.dyn_ref::<HtmlElement>() {
        return html.style().set_property(property, value);
    }
    if let Some(svg) = el.dyn_ref::<SvgElement>() {
        return svg.style().set_property(property, value);
    }
    Ok(())
}

/// Adds the pulse class now and removes it after `PULSE_MS`. Overlapping
/// pulses each clear independently.
fn pulse(label: &Element) -> Result<(), JsValue> {
    label.class_list().add_1(PULSE_CLASS)?;
    let target = label.clone();
    let clear = Closure::once_into_js(move || {
        if let Err(err) = target.class_list().remove_1(PULSE_CLASS) {
            log::warn!("pulse clear: {:?}", err);
        }
    });
    web_sys::window()
        .ok_or_else(|| JsValue::from_str("no window"))?
        .set_timeout_with_callback_and_timeout_and_arguments_0(clear.unchecked_ref(), PULSE_MS)?;
    Ok(())
}
