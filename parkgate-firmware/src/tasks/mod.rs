//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod controller;
pub mod echo;
pub mod telemetry;
pub mod trigger;

pub use controller::{controller_task, Controller};
pub use echo::echo_task;
pub use telemetry::telemetry_tx_task;
pub use trigger::{trigger_task, Trigger};
