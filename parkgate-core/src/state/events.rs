//! Events that trigger state transitions

use crate::lane::Lane;

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// A lane's sensor reported a vehicle within the threshold and the
    /// lane is allowed to open (entry requires a free space)
    VehicleDetected(Lane),
    /// The open gate's hold time has elapsed
    HoldElapsed,
}
