//! Ultrasonic echo timing
//!
//! Each lane has one [`EchoChannel`], driven by the edges of its sensor's
//! echo line, and one [`DistanceCell`] the controller reads.

pub mod cell;
pub mod channel;

pub use cell::{DistanceCell, SENTINEL_DISTANCE_M};
pub use channel::{echo_distance_m, EchoChannel, EchoState, SPEED_OF_SOUND_M_S};
