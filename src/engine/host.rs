//! Frame scheduling and listener registration
//!
//! The loop never calls a display driver directly. A `Host` hands out
//! cancellable frame handles and owns the event listeners feeding the input
//! queue, so the browser, the headless runner and tests can each supply one.

use super::input::{InputEvent, InputQueue};

/// Cancellable handle for a scheduled frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// Platform services the simulation loop depends on
pub trait Host {
    /// Schedule one call to `SimulationLoop::frame`. `None` if the platform refused.
    fn request_frame(&mut self) -> Option<FrameHandle>;

    /// Cancel a previously scheduled frame
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Start forwarding pointer-move and resize events into `queue`
    fn attach_listeners(&mut self, queue: InputQueue);

    /// Stop forwarding events and release the handlers
    fn detach_listeners(&mut self);
}

/// Host driven by hand: frames fire only when the caller says so.
///
/// Used by the headless runner and tests in place of a display driver.
#[derive(Debug, Default)]
pub struct ManualHost {
    next_id: i32,
    /// Requested and not yet fired or cancelled
    pending: Vec<FrameHandle>,
    pub cancelled: Vec<FrameHandle>,
    pub requests: u64,
    queue: Option<InputQueue>,
    pub attach_count: u32,
    pub detach_count: u32,
    /// Refuse every frame request
    pub refuse_frames: bool,
}

impl ManualHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop the oldest scheduled frame, as if the display refreshed
    pub fn fire(&mut self) -> Option<FrameHandle> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0))
        }
    }

    pub fn pending(&self) -> &[FrameHandle] {
        &self.pending
    }

    pub fn listeners_attached(&self) -> bool {
        self.queue.is_some()
    }

    /// Deliver an event the way a DOM listener would. Dropped when detached.
    pub fn dispatch(&self, event: InputEvent) -> bool {
        match &self.queue {
            Some(queue) => {
                queue.push(event);
                true
            }
            None => false,
        }
    }
}

impl Host for ManualHost {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        self.requests += 1;
        if self.refuse_frames {
            return None;
        }
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push(handle);
        Some(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.retain(|h| *h != handle);
        self.cancelled.push(handle);
    }

    fn attach_listeners(&mut self, queue: InputQueue) {
        self.queue = Some(queue);
        self.attach_count += 1;
    }

    fn detach_listeners(&mut self) {
        self.queue = None;
        self.detach_count += 1;
    }
}
