//! Monotonic clock
//!
//! Combines a coarse tick counter, incremented by a periodic interrupt, with
//! a hardware down-counter that runs between ticks:
//!
//! ```text
//! combined = coarse_ticks * F + (F - fine_counter)
//! ```
//!
//! where `F` is the number of fine counts per coarse tick. With a 1 ms tick
//! on a 72 MHz SysTick, `F = 72_000` and one fine count is ~13.9 ns.
//!
//! The coarse counter is 64 bits wide, so neither it nor the combined
//! value wraps while the board is powered. Deadlines and elapsed times
//! downstream compare plain `u64` microseconds.
//!
//! # Rollover boundary
//!
//! [`MonotonicClock::now`] reads the fine counter first and the coarse
//! counter second. If the tick interrupt fires between those two reads, the
//! fine value belongs to the old period and the coarse value to the new one,
//! and the result lands one period ahead of the true time. Nothing guards
//! against this; callers see it as an occasional one-tick jump forward.
//! [`MonotonicClock::elapsed_us`] clamps negative spans to zero so the
//! opposite case cannot produce a huge duration either.

use portable_atomic::{AtomicU64, Ordering};

use crate::traits::FineCounter;

/// Microseconds per second
const US_PER_S: u64 = 1_000_000;

/// A point in time, in fine counts since boot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timestamp(u64);

impl Timestamp {
    /// Boot time
    pub const ZERO: Timestamp = Timestamp(0);

    /// Create from raw fine counts
    pub const fn from_counts(counts: u64) -> Self {
        Self(counts)
    }

    /// Raw fine counts since boot
    pub const fn counts(self) -> u64 {
        self.0
    }
}

/// Coarse tick counter plus fine counter geometry
///
/// Lives in a `static` in firmware; the tick interrupt calls
/// [`MonotonicClock::tick`] and every other context reads.
#[derive(Debug)]
pub struct MonotonicClock {
    /// Ticks since boot, written only by the tick interrupt
    coarse_ticks: AtomicU64,
    /// Fine counts per coarse tick (`F`)
    fine_period: u32,
    /// Coarse ticks per second
    tick_hz: u32,
}

impl MonotonicClock {
    /// Create a clock
    ///
    /// - `fine_period`: fine counts per coarse tick (counter reload + 1)
    /// - `tick_hz`: coarse tick frequency
    pub const fn new(fine_period: u32, tick_hz: u32) -> Self {
        Self {
            coarse_ticks: AtomicU64::new(0),
            fine_period,
            tick_hz,
        }
    }

    /// Advance the coarse counter by one tick
    ///
    /// Called from the tick interrupt.
    pub fn tick(&self) {
        self.coarse_ticks.fetch_add(1, Ordering::Release);
    }

    /// Coarse ticks since boot
    pub fn coarse_ticks(&self) -> u64 {
        self.coarse_ticks.load(Ordering::Acquire)
    }

    /// Fine counts per coarse tick
    pub fn fine_period(&self) -> u32 {
        self.fine_period
    }

    /// Fine counter frequency in Hz
    pub fn fine_hz(&self) -> u64 {
        self.fine_period as u64 * self.tick_hz as u64
    }

    /// Current time
    ///
    /// Samples the fine counter before the coarse counter. See the module
    /// docs for the boundary hazard this ordering leaves in place.
    pub fn now<C: FineCounter>(&self, counter: &C) -> Timestamp {
        let fine = counter.read();
        let coarse = self.coarse_ticks();
        self.combine(coarse, fine)
    }

    /// Combine raw counter samples into a timestamp
    pub fn combine(&self, coarse: u64, fine: u32) -> Timestamp {
        let period = self.fine_period as u64;
        let into_tick = self.fine_period.saturating_sub(fine) as u64;
        Timestamp(coarse.saturating_mul(period).saturating_add(into_tick))
    }

    /// Microseconds from `a` to `b`
    ///
    /// Clamps to zero when `b` is earlier than `a`, which only happens when
    /// one of the samples hit the rollover boundary.
    pub fn elapsed_us(&self, a: Timestamp, b: Timestamp) -> u64 {
        let counts = b.0.saturating_sub(a.0);
        self.counts_to_us(counts)
    }

    /// Microseconds since boot
    pub fn to_us(&self, t: Timestamp) -> u64 {
        self.counts_to_us(t.0)
    }

    /// Milliseconds since boot
    pub fn to_ms(&self, t: Timestamp) -> u64 {
        self.to_us(t) / 1000
    }

    fn counts_to_us(&self, counts: u64) -> u64 {
        let hz = self.fine_hz();
        if hz == 0 {
            return 0;
        }
        // Split to keep `counts * 1e6` from overflowing
        (counts / hz) * US_PER_S + (counts % hz) * US_PER_S / hz
    }
}
