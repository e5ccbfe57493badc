//! Vehicle lanes
//!
//! The lot has one entry lane and one exit lane, each with its own
//! ultrasonic sensor and gate.

/// Lane identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Lane {
    /// Vehicles entering the lot
    Entry,
    /// Vehicles leaving the lot
    Exit,
}

impl Lane {
    /// Both lanes, in priority order
    pub const ALL: [Lane; 2] = [Lane::Entry, Lane::Exit];

    /// Index into per-lane arrays
    pub const fn index(self) -> usize {
        match self {
            Lane::Entry => 0,
            Lane::Exit => 1,
        }
    }

    /// The opposite lane
    pub const fn other(self) -> Lane {
        match self {
            Lane::Entry => Lane::Exit,
            Lane::Exit => Lane::Entry,
        }
    }
}
