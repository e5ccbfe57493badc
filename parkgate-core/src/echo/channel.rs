//! Echo channel state machine
//!
//! An HC-SR04 style sensor holds its echo line high for the round-trip
//! time of the ultrasonic burst. The rising edge starts a measurement and
//! the falling edge completes it.

use crate::clock::{MonotonicClock, Timestamp};
use crate::lane::Lane;

/// Speed of sound in dry air at about 20 °C
pub const SPEED_OF_SOUND_M_S: f32 = 343.0;

/// Convert an echo pulse width to a one-way distance
pub fn echo_distance_m(duration_us: u64, speed_of_sound_m_s: f32) -> f32 {
    duration_us as f32 * speed_of_sound_m_s / 2.0 / 1_000_000.0
}

/// Measurement state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EchoState {
    /// Waiting for a rising edge
    Idle,
    /// Echo line is high, waiting for the falling edge
    Measuring,
}

/// One ultrasonic ranging channel
///
/// Owned by the edge handler of its echo line. Completed measurements are
/// returned to the caller, which publishes them to the lane's
/// [`DistanceCell`](super::DistanceCell).
#[derive(Debug, Clone)]
pub struct EchoChannel {
    lane: Lane,
    state: EchoState,
    start: Timestamp,
    speed_of_sound_m_s: f32,
}

impl EchoChannel {
    /// Create an idle channel
    pub const fn new(lane: Lane, speed_of_sound_m_s: f32) -> Self {
        Self {
            lane,
            state: EchoState::Idle,
            start: Timestamp::ZERO,
            speed_of_sound_m_s,
        }
    }

    /// Lane this channel measures
    pub fn lane(&self) -> Lane {
        self.lane
    }

    /// Current measurement state
    pub fn state(&self) -> EchoState {
        self.state
    }

    /// Check if a measurement is in progress
    pub fn is_ongoing(&self) -> bool {
        self.state == EchoState::Measuring
    }

    /// Handle a rising edge
    ///
    /// A rising edge while already measuring means the previous echo never
    /// came back; the measurement restarts from this edge.
    pub fn on_rising(&mut self, now: Timestamp) {
        self.start = now;
        self.state = EchoState::Measuring;
    }

    /// Handle a falling edge
    ///
    /// Returns the measured distance in meters, or `None` for a falling
    /// edge with no measurement in progress.
    pub fn on_falling(&mut self, now: Timestamp, clock: &MonotonicClock) -> Option<f32> {
        match self.state {
            EchoState::Idle => None,
            EchoState::Measuring => {
                self.state = EchoState::Idle;
                let duration_us = clock.elapsed_us(self.start, now);
                Some(echo_distance_m(duration_us, self.speed_of_sound_m_s))
            }
        }
    }

    /// Handle an edge given the line level after it
    pub fn on_edge(&mut self, level_high: bool, now: Timestamp, clock: &MonotonicClock) -> Option<f32> {
        if level_high {
            self.on_rising(now);
            None
        } else {
            self.on_falling(now, clock)
        }
    }
}
