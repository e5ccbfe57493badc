//! Sub-tick counter trait

/// Hardware down-counter providing sub-tick resolution
///
/// The counter reloads to `period - 1` at every coarse tick and counts
/// down towards zero, so a freshly reloaded counter reads high and a
/// counter about to wrap reads low. On Cortex-M this is the SysTick
/// current value register.
pub trait FineCounter {
    /// Read the current counter value
    fn read(&self) -> u32;
}

impl<C: FineCounter + ?Sized> FineCounter for &C {
    fn read(&self) -> u32 {
        (**self).read()
    }
}
