#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for the PortfolioRunner.
//!
//! This module wraps [`super::runner_core::RunnerCore`] with JS-friendly types.
//! Only compiled on `wasm32` targets.

use folio_runtime::{RenderFault, Rendered};
use js_sys::{Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::runner_core::RunnerCore;

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

fn set_js(obj: &Object, key: &str, value: JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), &value);
}

/// Best-effort message from a thrown JS value.
fn js_error_message(err: &JsValue) -> String {
    if let Some(s) = err.as_string() {
        return s;
    }
    Reflect::get(err, &"message".into())
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| "unknown error".to_owned())
}

/// Portfolio runtime runner.
///
/// Host-driven: JavaScript forwards scroll, resize, mutation and image
/// events, fires animation frames when asked, advances time, and carries
/// out the commands drained from [`PortfolioRunner::take_commands`].
#[wasm_bindgen]
pub struct PortfolioRunner {
    inner: RunnerCore,
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

#[wasm_bindgen]
impl PortfolioRunner {
    /// Create a runner for a viewport of `width` x `height` CSS pixels.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Self {
        install_panic_hook();
        Self {
            inner: RunnerCore::new(width, height),
        }
    }

    /// Create a runner from a JSON configuration document.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(
        width: f64,
        height: f64,
        config_json: &str,
    ) -> Result<PortfolioRunner, JsValue> {
        install_panic_hook();
        RunnerCore::from_config_json(width, height, config_json)
            .map(|inner| Self { inner })
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Mount the app. Call once, after the initial sections are reported.
    pub fn init(&mut self) {
        self.inner.init();
    }

    /// Tear down listeners, observers and timers.
    pub fn unmount(&mut self) {
        self.inner.unmount();
    }

    #[wasm_bindgen(js_name = setSection)]
    pub fn set_section(
        &mut self,
        name: &str,
        offset_top: f64,
        height: f64,
        registered: bool,
    ) -> bool {
        self.inner.set_section(name, offset_top, height, registered)
    }

    #[wasm_bindgen(js_name = removeSection)]
    pub fn remove_section(&mut self, name: &str) -> bool {
        self.inner.remove_section(name)
    }

    #[wasm_bindgen(js_name = setDocumentHeight)]
    pub fn set_document_height(&mut self, height: f64) {
        self.inner.set_document_height(height);
    }

    /// Forward a window `scroll` event. Returns the clamped offset.
    pub fn scroll(&mut self, top: f64) -> f64 {
        self.inner.scroll(top)
    }

    /// Forward a window `resize` event.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.inner.resize(width, height);
    }

    /// Forward a `MutationObserver` callback.
    pub fn mutation(&mut self) {
        self.inner.mutation();
    }

    /// Run the requested animation frame.
    #[wasm_bindgen(js_name = animationFrame)]
    pub fn animation_frame(&mut self) -> bool {
        self.inner.animation_frame()
    }

    /// Advance deterministic clock by `dt_ms` milliseconds.
    #[wasm_bindgen(js_name = advanceTime)]
    pub fn advance_time(&mut self, dt_ms: f64) {
        self.inner.advance_time_ms(dt_ms);
    }

    /// Set deterministic clock to absolute milliseconds.
    #[wasm_bindgen(js_name = setTime)]
    pub fn set_time(&mut self, ts_ms: f64) {
        self.inner.set_time_ms(ts_ms);
    }

    /// Milliseconds until the next timer, or `undefined` when idle.
    #[wasm_bindgen(js_name = nextDeadline)]
    pub fn next_deadline(&self) -> Option<f64> {
        self.inner.next_deadline_ms()
    }

    #[wasm_bindgen(js_name = imageSettled)]
    pub fn image_settled(&mut self, url: &str, ok: bool) {
        self.inner.image_settled(url, ok);
    }

    /// Navigate to a section by name. `manual` marks a user click.
    pub fn navigate(&mut self, name: &str, manual: bool) -> bool {
        self.inner.navigate(name, manual)
    }

    #[wasm_bindgen(js_name = setMenuOpen)]
    pub fn set_menu_open(&mut self, open: bool) {
        self.inner.set_menu_open(open);
    }

    #[wasm_bindgen(js_name = toggleMenu)]
    pub fn toggle_menu(&mut self) -> bool {
        self.inner.toggle_menu()
    }

    #[wasm_bindgen(js_name = skipLoading)]
    pub fn skip_loading(&mut self) {
        self.inner.skip_loading();
    }

    #[wasm_bindgen(js_name = galleryFilter)]
    pub fn gallery_filter(&mut self, category: &str) -> bool {
        self.inner.gallery_filter(category)
    }

    #[wasm_bindgen(js_name = galleryOpen)]
    pub fn gallery_open(&mut self, id: u32) -> bool {
        self.inner.gallery_open(id)
    }

    #[wasm_bindgen(js_name = galleryClose)]
    pub fn gallery_close(&mut self) -> bool {
        self.inner.gallery_close()
    }

    #[wasm_bindgen(js_name = galleryKey)]
    pub fn gallery_key(&mut self, key: &str) -> bool {
        self.inner.gallery_key(key)
    }

    /// Current shell state as a JSON string.
    pub fn snapshot(&self) -> String {
        self.inner.snapshot_json()
    }

    /// Drain pending host commands as a JSON array string.
    #[wasm_bindgen(js_name = takeCommands)]
    pub fn take_commands(&mut self) -> String {
        self.inner.take_commands_json()
    }

    /// Render through the app's error boundary.
    ///
    /// `callback` receives the snapshot JSON. A thrown exception trips the
    /// boundary; the fallback panel is returned as
    /// `{ fallback: true, title, message, callPath }`.
    pub fn render(&mut self, callback: &js_sys::Function) -> JsValue {
        let rendered = self.inner.render_with(|state| {
            let json = serde_json::to_string(state).unwrap_or_else(|_| "{}".to_owned());
            callback
                .call1(&JsValue::NULL, &JsValue::from_str(&json))
                .map_err(|err| RenderFault::new(js_error_message(&err)).within("Shell"))
        });
        match rendered {
            Rendered::View(value) => value,
            Rendered::Fallback(panel) => {
                console_error(&format!("{}\n{}", panel.message, panel.call_path));
                let obj = Object::new();
                set_js(&obj, "fallback", JsValue::TRUE);
                set_js(&obj, "title", JsValue::from_str(panel.title));
                set_js(&obj, "message", JsValue::from_str(&panel.message));
                set_js(&obj, "callPath", JsValue::from_str(&panel.call_path));
                obj.into()
            }
        }
    }

    #[wasm_bindgen(js_name = nowMs)]
    pub fn now_ms(&self) -> f64 {
        self.inner.now_ms()
    }
}
