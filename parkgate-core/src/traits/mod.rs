//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations.

pub mod counter;
pub mod display;
pub mod gate;
pub mod telemetry;

pub use counter::FineCounter;
pub use display::SegmentOutput;
pub use gate::{GateActuator, GatePosition};
pub use telemetry::TelemetrySink;
