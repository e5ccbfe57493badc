//! State machine definition

use super::events::Event;
use crate::lane::Lane;

/// Controller states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GateState {
    /// Both gates closed, watching both lanes
    #[default]
    Idle,
    /// Entry gate open, waiting for the hold time
    EntryInProgress,
    /// Exit gate open, waiting for the hold time
    ExitInProgress,
}

impl GateState {
    /// Numeric code reported in the status line
    pub const fn code(self) -> i32 {
        match self {
            GateState::Idle => 0,
            GateState::EntryInProgress => 1,
            GateState::ExitInProgress => 2,
        }
    }

    /// Check if a gate cycle is in progress
    pub fn is_busy(self) -> bool {
        self.active_lane().is_some()
    }

    /// Lane whose gate is open, if any
    pub fn active_lane(self) -> Option<Lane> {
        match self {
            GateState::Idle => None,
            GateState::EntryInProgress => Some(Lane::Entry),
            GateState::ExitInProgress => Some(Lane::Exit),
        }
    }

    /// Process an event and return the next state
    ///
    /// Detections are only accepted while idle and hold expiry only while
    /// busy. Anything else leaves the state unchanged.
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use GateState::*;

        match (self, event) {
            (Idle, VehicleDetected(Lane::Entry)) => EntryInProgress,
            (Idle, VehicleDetected(Lane::Exit)) => ExitInProgress,
            (Idle, HoldElapsed) => Idle,

            // One gate cycle at a time
            (EntryInProgress, VehicleDetected(_)) => EntryInProgress,
            (EntryInProgress, HoldElapsed) => Idle,

            (ExitInProgress, VehicleDetected(_)) => ExitInProgress,
            (ExitInProgress, HoldElapsed) => Idle,
        }
    }
}
