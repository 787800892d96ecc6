//! requestAnimationFrame scheduling and DOM listeners

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{EventTarget, HtmlCanvasElement, MouseEvent, TouchEvent, Window};

use crate::engine::{FrameHandle, Host, InputEvent, InputQueue};

/// Slot for the frame callback, filled once the loop exists
pub type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

/// Browser `Host`: frames via requestAnimationFrame, input via DOM events
pub struct RafHost {
    window: Window,
    canvas: HtmlCanvasElement,
    callback: FrameCallback,
    listeners: Vec<Listener>,
}

impl RafHost {
    pub fn new(window: Window, canvas: HtmlCanvasElement) -> Self {
        Self {
            window,
            canvas,
            callback: Rc::new(RefCell::new(None)),
            listeners: Vec::new(),
        }
    }

    /// Shared slot the owner fills with the closure that runs a frame
    pub fn frame_callback(&self) -> FrameCallback {
        self.callback.clone()
    }

    fn listen(
        &mut self,
        target: EventTarget,
        kind: &'static str,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) {
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
        match target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref()) {
            Ok(()) => self.listeners.push(Listener {
                target,
                kind,
                closure,
            }),
            Err(e) => log::warn!("Failed to attach {} listener: {:?}", kind, e),
        }
    }
}

/// Canvas-relative position from viewport client coordinates
fn canvas_point(canvas: &HtmlCanvasElement, client_x: f64, client_y: f64) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    Vec2::new(
        (client_x - rect.left()) as f32,
        (client_y - rect.top()) as f32,
    )
}

impl Host for RafHost {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        let slot = self.callback.borrow();
        let callback = slot.as_ref()?;
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(id) => Some(FrameHandle(id)),
            Err(e) => {
                log::error!("requestAnimationFrame failed: {:?}", e);
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Err(e) = self.window.cancel_animation_frame(handle.0) {
            log::warn!("cancelAnimationFrame failed: {:?}", e);
        }
    }

    fn attach_listeners(&mut self, queue: InputQueue) {
        let window_target: EventTarget = self.window.clone().into();

        // Mouse move anywhere on the page (canvas sits behind the content)
        {
            let queue = queue.clone();
            let canvas = self.canvas.clone();
            self.listen(window_target.clone(), "mousemove", move |event| {
                if let Some(event) = event.dyn_ref::<MouseEvent>() {
                    let pos = canvas_point(&canvas, event.client_x() as f64, event.client_y() as f64);
                    queue.push(InputEvent::PointerMove(pos));
                }
            });
        }

        // Touch move
        {
            let queue = queue.clone();
            let canvas = self.canvas.clone();
            self.listen(window_target.clone(), "touchmove", move |event| {
                if let Some(event) = event.dyn_ref::<TouchEvent>()
                    && let Some(touch) = event.touches().get(0)
                {
                    let pos = canvas_point(&canvas, touch.client_x() as f64, touch.client_y() as f64);
                    queue.push(InputEvent::PointerMove(pos));
                }
            });
        }

        // Viewport resize
        {
            let canvas = self.canvas.clone();
            self.listen(window_target, "resize", move |_event| {
                queue.push(InputEvent::Resize {
                    width: canvas.client_width().max(0) as u32,
                    height: canvas.client_height().max(0) as u32,
                });
            });
        }

        log::debug!("Attached {} DOM listeners", self.listeners.len());
    }

    fn detach_listeners(&mut self) {
        for listener in self.listeners.drain(..) {
            if let Err(e) = listener.target.remove_event_listener_with_callback(
                listener.kind,
                listener.closure.as_ref().unchecked_ref(),
            ) {
                log::warn!("Failed to detach {} listener: {:?}", listener.kind, e);
            }
        }
        log::debug!("DOM listeners detached");
    }
}
