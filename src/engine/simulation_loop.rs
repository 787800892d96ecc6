//! Simulation loop state machine
//!
//! `Idle → Running → Stopped`, with `Stalled` while the host refuses to
//! schedule frames. Each frame: drain input, clear, tick both layers, render
//! both layers, then reschedule if still running. At most one frame is ever
//! outstanding.

use std::cell::RefCell;
use std::fmt;

use super::host::{FrameHandle, Host};
use super::input::{InputEvent, InputQueue};
use super::stats::FrameStats;
use crate::renderer::Surface;
use crate::settings::Settings;
use crate::sim::{AmbientField, Bounds, CursorSpray};

/// Lifecycle of a loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Constructed, not yet mounted
    Idle,
    /// Mounted, frames are scheduled
    Running,
    /// Mounted, but the host refused the last frame request; see `resume`
    Stalled,
    /// Unmounted (terminal)
    Stopped,
}

/// What a single `frame()` call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Full clear/tick/render pass
    Rendered,
    /// Surface not ready, tick skipped
    Skipped,
    /// Loop is not running, nothing happened
    Inactive,
}

/// Errors from loop lifecycle calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopError {
    /// `mount` called on a mounted loop.
    AlreadyMounted,
    /// The loop was stopped and cannot be restarted.
    Stopped,
}

impl fmt::Display for LoopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopError::AlreadyMounted => write!(f, "Simulation loop is already mounted"),
            LoopError::Stopped => write!(f, "Simulation loop was stopped; create a new one"),
        }
    }
}

impl std::error::Error for LoopError {}

/// Owns both animation layers, the surface and the host handle
pub struct SimulationLoop<S: Surface, H: Host> {
    state: LoopState,
    surface: Option<S>,
    host: H,
    field: AmbientField,
    spray: CursorSpray,
    settings: Settings,
    queue: InputQueue,
    pending: Option<FrameHandle>,
    bounds: Bounds,
    stats: FrameStats,
}

impl<S: Surface, H: Host> SimulationLoop<S, H> {
    pub fn new(surface: S, host: H, settings: Settings, seed: u64) -> Self {
        let settings = settings.sanitized();
        let field = AmbientField::new(seed).with_palette(settings.palette);
        let mut spray = CursorSpray::new(seed)
            .with_max_particles(settings.max_particles())
            .with_palette(settings.palette);
        spray.set_enabled(settings.spray_enabled());

        Self {
            state: LoopState::Idle,
            surface: Some(surface),
            host,
            field,
            spray,
            settings,
            queue: InputQueue::new(),
            pending: None,
            bounds: Bounds::default(),
            stats: FrameStats::default(),
        }
    }

    /// Enter `Running`: size the surface, seed the field, attach listeners,
    /// schedule the first frame.
    pub fn mount(&mut self, width: u32, height: u32) -> Result<(), LoopError> {
        match self.state {
            LoopState::Running | LoopState::Stalled => return Err(LoopError::AlreadyMounted),
            LoopState::Stopped => return Err(LoopError::Stopped),
            LoopState::Idle => {}
        }

        self.bounds = Bounds::from_pixels(width, height);
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(width, height);
        }
        self.field
            .initialize(self.settings.node_count(), self.bounds);

        self.host.attach_listeners(self.queue.clone());
        self.state = LoopState::Running;
        log::info!(
            "Simulation loop mounted at {}x{} ({} nodes, particle cap {})",
            self.bounds.width,
            self.bounds.height,
            self.field.nodes().len(),
            self.settings.max_particles()
        );

        self.schedule();
        Ok(())
    }

    /// Run one frame. Called by the host when the frame `handle` fires.
    ///
    /// Only the pending handle is spent; a frame run with any other handle
    /// leaves the scheduled one in place, so `unmount` still cancels it.
    pub fn frame(&mut self, handle: FrameHandle, timestamp: f64) -> FrameOutcome {
        if self.pending == Some(handle) {
            self.pending = None;
        }

        if !self.is_mounted() {
            log::trace!("Frame fired while {:?}, ignoring", self.state);
            return FrameOutcome::Inactive;
        }

        self.stats.record(timestamp);
        self.apply_input();

        let outcome = match self.surface.as_mut() {
            Some(surface) if surface.is_ready() => {
                surface.clear();
                self.field.tick();
                self.spray.tick();
                self.field.render(&mut *surface);
                self.spray.render(&mut *surface);
                self.stats.rendered += 1;
                FrameOutcome::Rendered
            }
            _ => {
                self.stats.skipped += 1;
                log::debug!("Surface not ready, skipping tick");
                FrameOutcome::Skipped
            }
        };

        if self.stats.total() % 600 == 0 {
            log::debug!(
                "fps {} | nodes {} | edges {} | particles {}",
                self.stats.fps(),
                self.field.nodes().len(),
                self.field.edges().len(),
                self.spray.len()
            );
        }

        if self.is_mounted() {
            self.schedule();
        }
        outcome
    }

    /// Enter `Stopped`: cancel the pending frame, detach listeners, release
    /// the surface. Safe to call more than once.
    pub fn unmount(&mut self) {
        if self.state == LoopState::Stopped {
            return;
        }
        let was_running = self.is_mounted();
        self.state = LoopState::Stopped;

        if let Some(handle) = self.pending.take() {
            self.host.cancel_frame(handle);
        }
        if was_running {
            self.host.detach_listeners();
        }
        self.queue.clear();
        self.surface = None;
        log::info!(
            "Simulation loop stopped after {} frames ({} skipped)",
            self.stats.total(),
            self.stats.skipped
        );
    }

    /// Ask the host for a frame again after a refusal. Returns whether a
    /// frame is now scheduled.
    pub fn resume(&mut self) -> bool {
        if self.state == LoopState::Stalled {
            log::info!("Retrying frame scheduling");
            self.schedule();
        }
        self.pending.is_some()
    }

    fn is_mounted(&self) -> bool {
        matches!(self.state, LoopState::Running | LoopState::Stalled)
    }

    fn schedule(&mut self) {
        if self.pending.is_none() {
            self.pending = self.host.request_frame();
        }
        match self.pending {
            Some(_) => self.state = LoopState::Running,
            None => {
                if self.state != LoopState::Stalled {
                    log::warn!("Host refused to schedule the next frame, loop stalled");
                }
                self.state = LoopState::Stalled;
            }
        }
    }

    fn apply_input(&mut self) {
        for event in self.queue.drain() {
            match event {
                InputEvent::PointerMove(pos) => self.spray.on_pointer_move(pos),
                InputEvent::Resize { width, height } => {
                    self.bounds = Bounds::from_pixels(width, height);
                    if let Some(surface) = self.surface.as_mut() {
                        surface.resize(width, height);
                    }
                    self.field.resize(self.bounds);
                    log::debug!("Viewport resized to {}x{}", width, height);
                }
            }
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn field(&self) -> &AmbientField {
        &self.field
    }

    pub fn spray(&self) -> &CursorSpray {
        &self.spray
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// `None` once the loop has stopped
    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Handle for pushing input from outside a `Host`
    pub fn input_queue(&self) -> InputQueue {
        self.queue.clone()
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }
}

/// Unmount a loop shared with the callback its frames run through.
///
/// The callback is released only after the loop has stopped. If a frame
/// holds the loop borrowed, nothing is torn down and `false` is returned.
pub fn unmount_shared<S: Surface, H: Host, C>(
    lp: &RefCell<SimulationLoop<S, H>>,
    callback: &RefCell<Option<C>>,
) -> bool {
    match lp.try_borrow_mut() {
        Ok(mut lp) => lp.unmount(),
        Err(_) => {
            log::error!("unmount called from inside a frame");
            return false;
        }
    }
    callback.borrow_mut().take();
    true
}

impl<S: Surface, H: Host> Drop for SimulationLoop<S, H> {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::host::ManualHost;
    use crate::renderer::{DrawCommand, RecordingSurface};
    use glam::Vec2;

    fn running_loop() -> SimulationLoop<RecordingSurface, ManualHost> {
        let mut lp = SimulationLoop::new(
            RecordingSurface::new(),
            ManualHost::new(),
            Settings::default(),
            1234,
        );
        lp.mount(800, 600).unwrap();
        lp
    }

    /// Fire the next scheduled frame, if any
    fn step(lp: &mut SimulationLoop<RecordingSurface, ManualHost>, t: f64) -> Option<FrameOutcome> {
        lp.host_mut().fire().map(|handle| lp.frame(handle, t))
    }

    #[test]
    fn test_mount_enters_running_and_schedules() {
        let lp = running_loop();
        assert_eq!(lp.state(), LoopState::Running);
        assert!(lp.host().listeners_attached());
        assert_eq!(lp.host().attach_count, 1);
        assert_eq!(lp.host().requests, 1);
        assert_eq!(lp.host().pending().len(), 1);
        assert_eq!(lp.field().nodes().len(), 50);
        assert_eq!(lp.surface().unwrap().size, (800, 600));
    }

    #[test]
    fn test_frame_order_clear_then_field_then_spray() {
        let mut lp = running_loop();
        lp.host().dispatch(InputEvent::PointerMove(Vec2::new(400.0, 300.0)));
        assert_eq!(step(&mut lp, 16.0), Some(FrameOutcome::Rendered));

        let commands = &lp.surface().unwrap().commands;
        assert_eq!(commands[0], DrawCommand::Clear);
        // Spray cross-hair lines come after every field glow and edge
        let first_line = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::Line { .. }))
            .unwrap();
        let last_curve = commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Curve { .. }));
        if let Some(last_curve) = last_curve {
            assert!(last_curve < first_line);
        }
        assert_eq!(lp.surface().unwrap().line_count(), 6);
        // Rescheduled for the next refresh
        assert_eq!(lp.host().pending().len(), 1);
    }

    #[test]
    fn test_pointer_events_applied_before_tick() {
        let mut lp = running_loop();
        lp.host().dispatch(InputEvent::PointerMove(Vec2::new(10.0, 10.0)));
        lp.host().dispatch(InputEvent::PointerMove(Vec2::new(20.0, 20.0)));
        assert_eq!(lp.spray().len(), 0);
        step(&mut lp, 16.0);
        assert_eq!(lp.spray().len(), 6);
        // Already ticked once: life below 1
        assert!(lp.spray().particles().iter().all(|p| p.life < 1.0));
    }

    #[test]
    fn test_unmount_cancels_and_detaches() {
        let mut lp = running_loop();
        step(&mut lp, 16.0);
        let pending = lp.pending_frame().unwrap();

        lp.unmount();
        assert_eq!(lp.state(), LoopState::Stopped);
        assert!(lp.host().pending().is_empty());
        assert_eq!(lp.host().cancelled, vec![pending]);
        assert!(!lp.host().listeners_attached());
        assert_eq!(lp.host().detach_count, 1);
        assert!(lp.surface().is_none());

        // Late events go nowhere, late frames do nothing
        assert!(!lp.host().dispatch(InputEvent::PointerMove(Vec2::ONE)));
        assert_eq!(lp.frame(pending, 32.0), FrameOutcome::Inactive);
        assert!(lp.host().pending().is_empty());

        lp.unmount();
        assert_eq!(lp.host().detach_count, 1);
    }

    #[test]
    fn test_stopped_is_terminal() {
        let mut lp = running_loop();
        assert_eq!(lp.mount(10, 10), Err(LoopError::AlreadyMounted));
        lp.unmount();
        assert_eq!(lp.mount(10, 10), Err(LoopError::Stopped));
    }

    #[test]
    fn test_unready_surface_skips_tick_but_keeps_running() {
        let mut lp = running_loop();
        let before = lp.field().nodes().to_vec();
        lp.surface_mut().unwrap().ready = false;

        assert_eq!(step(&mut lp, 16.0), Some(FrameOutcome::Skipped));
        assert_eq!(lp.field().nodes(), &before[..]);
        assert_eq!(lp.stats().skipped, 1);
        assert_eq!(lp.host().pending().len(), 1);

        lp.surface_mut().unwrap().ready = true;
        assert_eq!(step(&mut lp, 32.0), Some(FrameOutcome::Rendered));
    }

    #[test]
    fn test_resize_to_zero_clamps_and_ticks() {
        let mut lp = running_loop();
        lp.host().dispatch(InputEvent::Resize {
            width: 0,
            height: 0,
        });
        assert_eq!(step(&mut lp, 16.0), Some(FrameOutcome::Rendered));
        assert_eq!(lp.bounds(), Bounds::new(1.0, 1.0));
        // Mount plus the queued resize both reached the surface
        let surface = lp.surface().unwrap();
        assert_eq!(surface.size, (1, 1));
        assert_eq!(surface.resizes, 2);
        assert!(lp
            .field()
            .nodes()
            .iter()
            .all(|n| n.pos.is_finite() && lp.bounds().contains(n.pos)));
        assert_eq!(step(&mut lp, 32.0), Some(FrameOutcome::Rendered));
    }

    #[test]
    fn test_refused_frame_stalls_until_resumed() {
        let mut host = ManualHost::new();
        host.refuse_frames = true;
        let mut lp = SimulationLoop::new(RecordingSurface::new(), host, Settings::default(), 1);
        lp.mount(100, 100).unwrap();
        assert!(lp.pending_frame().is_none());
        assert_eq!(lp.state(), LoopState::Stalled);
        assert_eq!(lp.mount(100, 100), Err(LoopError::AlreadyMounted));

        // Still refusing: stays stalled
        assert!(!lp.resume());
        assert_eq!(lp.state(), LoopState::Stalled);
        assert_eq!(lp.host().requests, 2);

        lp.host_mut().refuse_frames = false;
        assert!(lp.resume());
        assert_eq!(lp.state(), LoopState::Running);
        assert_eq!(step(&mut lp, 16.0), Some(FrameOutcome::Rendered));
        assert_eq!(lp.host().pending().len(), 1);
    }

    #[test]
    fn test_unmount_while_stalled_detaches() {
        let mut host = ManualHost::new();
        host.refuse_frames = true;
        let mut lp = SimulationLoop::new(RecordingSurface::new(), host, Settings::default(), 1);
        lp.mount(100, 100).unwrap();
        lp.unmount();
        assert_eq!(lp.state(), LoopState::Stopped);
        assert!(lp.host().cancelled.is_empty());
        assert_eq!(lp.host().detach_count, 1);
    }

    #[test]
    fn test_shared_unmount_keeps_callback_while_frame_runs() {
        let lp = RefCell::new(running_loop());
        let callback = RefCell::new(Some("frame"));

        {
            let _in_frame = lp.borrow_mut();
            assert!(!unmount_shared(&lp, &callback));
            assert!(callback.borrow().is_some());
        }
        assert_eq!(lp.borrow().state(), LoopState::Running);
        assert_eq!(lp.borrow().host().pending().len(), 1);

        assert!(unmount_shared(&lp, &callback));
        assert!(callback.borrow().is_none());
        assert_eq!(lp.borrow().state(), LoopState::Stopped);
        assert!(lp.borrow().host().pending().is_empty());
    }

    #[test]
    fn test_unscheduled_frame_keeps_pending_handle() {
        let mut lp = running_loop();
        let scheduled = lp.pending_frame().unwrap();

        // A frame run outside the scheduler must not orphan the scheduled one
        assert_eq!(lp.frame(FrameHandle(-1), 16.0), FrameOutcome::Rendered);
        assert_eq!(lp.pending_frame(), Some(scheduled));
        assert_eq!(lp.host().pending(), &[scheduled]);
        assert_eq!(lp.host().requests, 1);

        lp.unmount();
        assert!(lp.host().pending().is_empty());
        assert_eq!(lp.host().cancelled, vec![scheduled]);
    }

    #[test]
    fn test_reduced_motion_spray_stays_empty() {
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        let mut lp = SimulationLoop::new(RecordingSurface::new(), ManualHost::new(), settings, 5);
        lp.mount(300, 300).unwrap();
        lp.host().dispatch(InputEvent::PointerMove(Vec2::new(50.0, 50.0)));
        step(&mut lp, 16.0);
        assert!(lp.spray().is_empty());
    }

    #[test]
    fn test_same_seed_same_frames() {
        let mut a = running_loop();
        let mut b = running_loop();
        for i in 1..=120 {
            step(&mut a, i as f64 * 16.0);
            step(&mut b, i as f64 * 16.0);
        }
        assert_eq!(a.field().nodes(), b.field().nodes());
        assert_eq!(a.stats().rendered, 120);
    }
}
