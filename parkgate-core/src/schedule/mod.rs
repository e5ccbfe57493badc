//! Time-driven work
//!
//! Instead of spinning on the clock, the firmware asks these schedules for
//! the next instant something is due and sleeps until then.

pub mod trigger;
pub mod wake;

pub use trigger::TriggerSchedule;
pub use wake::{WakeReason, WakeSchedule};
