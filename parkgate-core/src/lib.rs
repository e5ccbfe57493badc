//! Board-agnostic core logic for the parking gate controller
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (gates, segment output, telemetry, fine counter)
//! - Monotonic clock combining a coarse tick with a hardware down-counter
//! - Echo channel timing and the shared distance cells
//! - Gate state machine and parking lot bookkeeping
//! - The parking controller that ties them together
//! - Trigger and wake schedules
//! - Configuration types and the embedded config parser
//!
//! # Shared state
//!
//! Everything an interrupt context writes and the control loop reads is a
//! single atomic word or a single-producer/single-consumer queue. Nothing
//! here takes a lock.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod clock;
pub mod config;
pub mod controller;
pub mod display;
pub mod echo;
pub mod lane;
pub mod lot;
pub mod schedule;
pub mod state;
pub mod telemetry;
pub mod traits;

pub use lane::Lane;
