//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in parkgate-core on top of `embedded-hal`:
//!
//! - Servo gate (PWM pulse width per position)
//! - HC-SR04 ultrasonic trigger pulse
//! - Parallel two-digit seven-segment port

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod segment;
pub mod sensor;
pub mod servo;

pub use segment::SegmentPort;
pub use sensor::Hcsr04Trigger;
pub use servo::{GateError, ServoGate};
