#![forbid(unsafe_code)]

//! `wasm-bindgen` exports. Only compiled on `wasm32` targets.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use anchor_scroll::{AnchorHost, ScrollBehavior, ScrollRequest, TriggerOutcome};
use js_sys::Function;
use tracing::{debug, error, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, ScrollToOptions, Window};

use crate::binding_core::{BindingCore, DocumentReadyState};

const DOM_CONTENT_LOADED: &str = "DOMContentLoaded";
const HASH_CHANGE: &str = "hashchange";

const LOG_TAG: &str = "[anchor-scroll]";

/// Report a panic on the console, tagged so it can be told apart from the
/// page's own errors, and through `tracing` for hosts with a subscriber.
fn report_panic(info: &std::panic::PanicHookInfo<'_>) {
    let location = info
        .location()
        .map(|loc| format!(" at {}:{}", loc.file(), loc.line()))
        .unwrap_or_default();
    let msg = format!("{LOG_TAG} panic{location}: {info}");
    error!(%msg, "anchor binding panicked");
    web_sys::console::error_1(&JsValue::from_str(&msg));
}

fn install_panic_hook() {
    static ONCE: Once = Once::new();
    ONCE.call_once(|| std::panic::set_hook(Box::new(report_panic)));
}

fn web_behavior(behavior: ScrollBehavior) -> web_sys::ScrollBehavior {
    match behavior {
        ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
        ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
        ScrollBehavior::Auto => web_sys::ScrollBehavior::Auto,
    }
}

/// The live page: `window.location`, the document and `window.scrollTo`.
struct WindowHost {
    window: Window,
}

impl AnchorHost for WindowHost {
    fn location_hash(&self) -> String {
        self.window.location().hash().unwrap_or_default()
    }

    fn element_viewport_top(&self, id: &str) -> Option<f64> {
        let element = self.window.document()?.get_element_by_id(id)?;
        Some(element.get_bounding_client_rect().top())
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn scroll_to(&mut self, request: ScrollRequest) {
        let options = ScrollToOptions::new();
        options.set_top(request.top);
        options.set_behavior(web_behavior(request.behavior));
        self.window.scroll_to_with_scroll_to_options(&options);
    }
}

struct Shared {
    core: BindingCore,
    host: WindowHost,
}

type SharedRef = Rc<RefCell<Shared>>;

/// Arm the initial timer if structural load produced a delay.
fn handle_structural_load(shared: &SharedRef, window: &Window, on_timer: &Function) {
    let Ok(mut shared) = shared.try_borrow_mut() else {
        warn!("structural load re-entered anchor binding; dropped");
        return;
    };
    let Some(delay_ms) = shared.core.structural_load() else {
        return;
    };
    match window.set_timeout_with_callback_and_timeout_and_arguments_0(on_timer, delay_ms) {
        Ok(handle) => shared.core.arm_timer(handle),
        Err(err) => warn!(?err, "setTimeout failed; initial anchor sync skipped"),
    }
}

fn run_trigger(shared: &SharedRef, f: impl FnOnce(&mut Shared) -> TriggerOutcome) {
    let Ok(mut shared) = shared.try_borrow_mut() else {
        warn!("anchor binding re-entered; trigger dropped");
        return;
    };
    let outcome = f(&mut *shared);
    debug!(?outcome, "anchor trigger handled");
}

/// Keeps the viewport aligned with the URL fragment for one page view.
#[wasm_bindgen]
pub struct AnchorScrollBinding {
    window: Window,
    document: Document,
    shared: SharedRef,
    on_load: Option<Closure<dyn FnMut()>>,
    on_hash_change: Option<Closure<dyn FnMut()>>,
    on_timer: Option<Closure<dyn FnMut()>>,
}

#[wasm_bindgen]
impl AnchorScrollBinding {
    /// Subscribe to the page's load and fragment-change notifications.
    ///
    /// `config_json` is an optional JSON object with `offset_px`,
    /// `initial_delay_ms` and `behavior`; missing fields use the defaults.
    #[wasm_bindgen(constructor)]
    pub fn attach(config_json: Option<String>) -> Result<AnchorScrollBinding, JsValue> {
        install_panic_hook();

        let core = BindingCore::from_config_json(config_json.as_deref())
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("window has no document"))?;

        let shared: SharedRef = Rc::new(RefCell::new(Shared {
            core,
            host: WindowHost {
                window: window.clone(),
            },
        }));

        let on_timer = {
            let shared = Rc::clone(&shared);
            Closure::<dyn FnMut()>::new(move || {
                run_trigger(&shared, |s| s.core.fire_timer(&mut s.host));
            })
        };
        let timer_fn: Function = on_timer.as_ref().unchecked_ref::<Function>().clone();

        let on_hash_change = {
            let shared = Rc::clone(&shared);
            Closure::<dyn FnMut()>::new(move || {
                run_trigger(&shared, |s| s.core.hash_change(&mut s.host));
            })
        };
        window.add_event_listener_with_callback(
            HASH_CHANGE,
            on_hash_change.as_ref().unchecked_ref(),
        )?;

        let ready = DocumentReadyState::parse(&document.ready_state());
        let on_load = if ready.structure_loaded() {
            debug!(?ready, "document already parsed; treating attach as structural load");
            handle_structural_load(&shared, &window, &timer_fn);
            None
        } else {
            let shared = Rc::clone(&shared);
            let load_window = window.clone();
            let on_load = Closure::<dyn FnMut()>::new(move || {
                handle_structural_load(&shared, &load_window, &timer_fn);
            });
            document.add_event_listener_with_callback(
                DOM_CONTENT_LOADED,
                on_load.as_ref().unchecked_ref(),
            )?;
            Some(on_load)
        };

        Ok(Self {
            window,
            document,
            shared,
            on_load,
            on_hash_change: Some(on_hash_change),
            on_timer: Some(on_timer),
        })
    }

    /// Unsubscribe and cancel a pending initial sync. Idempotent.
    pub fn detach(&mut self) {
        if let Some(on_load) = self.on_load.take() {
            let _ = self.document.remove_event_listener_with_callback(
                DOM_CONTENT_LOADED,
                on_load.as_ref().unchecked_ref(),
            );
        }
        if let Some(on_hash_change) = self.on_hash_change.take() {
            let _ = self.window.remove_event_listener_with_callback(
                HASH_CHANGE,
                on_hash_change.as_ref().unchecked_ref(),
            );
        }
        if let Ok(mut shared) = self.shared.try_borrow_mut() {
            if let Some(handle) = shared.core.detach() {
                self.window.clear_timeout_with_handle(handle);
            }
        }
        self.on_timer = None;
    }

    /// Run a pass now. Returns whether a scroll was requested.
    #[wasm_bindgen(js_name = syncNow)]
    pub fn sync_now(&self) -> bool {
        let Ok(mut shared) = self.shared.try_borrow_mut() else {
            return false;
        };
        let Shared { core, host } = &mut *shared;
        matches!(core.sync_now(host), TriggerOutcome::Synced(ref o) if o.scrolled())
    }

    #[wasm_bindgen(js_name = isAttached)]
    pub fn is_attached(&self) -> bool {
        self.on_hash_change.is_some()
    }

    /// Trigger/outcome log, one JSON object per line.
    #[wasm_bindgen(js_name = traceJsonl)]
    pub fn trace_jsonl(&self) -> String {
        self.shared
            .try_borrow()
            .map(|shared| shared.core.trace_jsonl())
            .unwrap_or_default()
    }
}

impl Drop for AnchorScrollBinding {
    fn drop(&mut self) {
        self.detach();
    }
}
