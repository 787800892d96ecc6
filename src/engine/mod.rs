//! Frame loop driving both animation layers
//!
//! The loop is an explicit state machine fed by a `Host`, replacing a
//! self-rescheduling callback. Tests drive it with `ManualHost`.

pub mod host;
pub mod input;
pub mod simulation_loop;
pub mod stats;

pub use host::{FrameHandle, Host, ManualHost};
pub use input::{InputEvent, InputQueue};
pub use simulation_loop::{FrameOutcome, LoopError, LoopState, SimulationLoop, unmount_shared};
pub use stats::FrameStats;
