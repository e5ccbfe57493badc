//! Shared distance reading
//!
//! An `f32` stored as its bit pattern in one atomic word, so the echo
//! context and the controller never see a half-written value.

use portable_atomic::{AtomicU32, Ordering};

/// Reading meaning "nothing detected since the last one was consumed"
pub const SENTINEL_DISTANCE_M: f32 = 99.0;

/// Latest completed distance measurement for one lane
///
/// Written by the echo context on every completed measurement and reset to
/// [`SENTINEL_DISTANCE_M`] by the controller once it acts on a reading.
#[derive(Debug)]
pub struct DistanceCell {
    bits: AtomicU32,
}

impl Default for DistanceCell {
    fn default() -> Self {
        Self::new()
    }
}

impl DistanceCell {
    /// Create a cell holding the sentinel
    pub const fn new() -> Self {
        // SENTINEL_DISTANCE_M.to_bits()
        Self {
            bits: AtomicU32::new(0x42C6_0000),
        }
    }

    /// Store a fresh measurement
    pub fn publish(&self, distance_m: f32) {
        self.bits.store(distance_m.to_bits(), Ordering::Release);
    }

    /// Latest measurement, or the sentinel
    pub fn load(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Acquire))
    }

    /// Reset to the sentinel
    pub fn clear(&self) {
        self.publish(SENTINEL_DISTANCE_M);
    }

    /// Check whether the cell holds a fresh reading
    pub fn is_fresh(&self) -> bool {
        self.load() != SENTINEL_DISTANCE_M
    }
}
