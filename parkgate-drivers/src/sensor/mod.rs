//! Sensor drivers

pub mod hcsr04;

pub use hcsr04::Hcsr04Trigger;
