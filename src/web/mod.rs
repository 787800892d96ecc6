//! Browser bindings
//!
//! `Backdrop` is the handle the hosting page holds for as long as the view is
//! mounted. Dropping it (or calling `unmount`) cancels the pending frame and
//! removes every listener before the canvas goes away.

pub mod canvas;
pub mod host;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, Window};

pub use canvas::CanvasSurface;
pub use host::{FrameCallback, RafHost};

use crate::engine::{SimulationLoop, unmount_shared};
use crate::settings::Settings;

type WebLoop = SimulationLoop<CanvasSurface, RafHost>;

/// Canvas id used by `start`
pub const DEFAULT_CANVAS_ID: &str = "neural-canvas";

static LOGGING: Once = Once::new();

/// Install the panic hook and console logger (first call wins)
pub fn init_logging() {
    LOGGING.call_once(|| {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger already set: {}", e).into());
        }
    });
}

fn prefers_reduced_motion(window: &Window) -> bool {
    window
        .match_media("(prefers-reduced-motion: reduce)")
        .ok()
        .flatten()
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

/// A mounted backdrop animation
#[wasm_bindgen]
pub struct Backdrop {
    inner: Rc<RefCell<WebLoop>>,
    callback: FrameCallback,
}

#[wasm_bindgen]
impl Backdrop {
    /// Mount on the canvas with `canvas_id`, using stored settings
    pub fn mount(canvas_id: &str) -> Result<Backdrop, JsValue> {
        init_logging();
        Self::mount_with(canvas_id, Settings::load())
    }

    /// Mount with settings given as JSON (missing fields take defaults)
    #[wasm_bindgen(js_name = mountWithSettings)]
    pub fn mount_with_settings(canvas_id: &str, json: &str) -> Result<Backdrop, JsValue> {
        init_logging();
        let settings = Settings::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Self::mount_with(canvas_id, settings)
    }

    /// Stop the loop and release the canvas. Idempotent.
    pub fn unmount(&mut self) {
        unmount_shared(&self.inner, &self.callback);
    }

    /// Retry frame scheduling after the browser refused a frame
    pub fn resume(&mut self) -> bool {
        match self.inner.try_borrow_mut() {
            Ok(mut lp) => lp.resume(),
            Err(_) => false,
        }
    }

    /// Persist the settings this backdrop runs with to LocalStorage
    #[wasm_bindgen(js_name = saveSettings)]
    pub fn save_settings(&self) -> Result<(), JsValue> {
        self.inner.borrow().settings().save().map_err(|e| {
            log::warn!("{}", e);
            JsValue::from_str(&e.to_string())
        })
    }

    #[wasm_bindgen(getter, js_name = particleCount)]
    pub fn particle_count(&self) -> usize {
        self.inner.borrow().spray().len()
    }

    #[wasm_bindgen(getter, js_name = nodeCount)]
    pub fn node_count(&self) -> usize {
        self.inner.borrow().field().nodes().len()
    }

    #[wasm_bindgen(getter)]
    pub fn fps(&self) -> u32 {
        self.inner.borrow().stats().fps()
    }
}

impl Backdrop {
    fn mount_with(canvas_id: &str, mut settings: Settings) -> Result<Backdrop, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element #{}", canvas_id)))?
            .dyn_into()
            .map_err(|_| JsValue::from_str(&format!("#{} is not a canvas", canvas_id)))?;

        if prefers_reduced_motion(&window) {
            log::info!("prefers-reduced-motion set, cursor spray disabled");
            settings.reduced_motion = true;
        }
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);

        let surface = CanvasSurface::new(canvas.clone());
        let host = RafHost::new(window, canvas.clone());
        let callback = host.frame_callback();
        let inner = Rc::new(RefCell::new(SimulationLoop::new(surface, host, settings, seed)));

        let weak = Rc::downgrade(&inner);
        *callback.borrow_mut() = Some(Closure::new(move |time: f64| {
            if let Some(lp) = weak.upgrade() {
                match lp.try_borrow_mut() {
                    // Only one frame is ever outstanding, so the one firing is the pending one
                    Ok(mut lp) => {
                        if let Some(handle) = lp.pending_frame() {
                            lp.frame(handle, time);
                        }
                    }
                    Err(_) => log::warn!("Frame fired while loop was borrowed, dropping it"),
                }
            }
        }));

        let width = canvas.client_width().max(0) as u32;
        let height = canvas.client_height().max(0) as u32;
        inner
            .borrow_mut()
            .mount(width, height)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Backdrop mounted on #{} with seed {}", canvas_id, seed);
        Ok(Backdrop { inner, callback })
    }
}

impl Drop for Backdrop {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Mount on `#neural-canvas` for the lifetime of the page
pub fn start() {
    init_logging();
    match Backdrop::mount(DEFAULT_CANVAS_ID) {
        Ok(backdrop) => {
            // Page-lifetime animation; nothing ever unmounts it
            std::mem::forget(backdrop);
        }
        Err(e) => log::error!("Backdrop failed to mount: {:?}", e),
    }
}
