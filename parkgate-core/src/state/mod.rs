//! Gate state machine
//!
//! One state variable covers both gates, so at most one gate cycle is ever
//! in progress. A second vehicle detected mid-cycle is ignored.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::GateState;
