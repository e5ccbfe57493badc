//! SysTick-backed monotonic clock
//!
//! SysTick runs from the 72 MHz core clock and reloads every millisecond.
//! Its exception bumps the coarse counter; its current-value register is
//! the fine counter.

use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::SYST;
use cortex_m_rt::exception;
use parkgate_core::clock::{MonotonicClock, Timestamp};
use parkgate_core::traits::FineCounter;

/// Core clock frequency
pub const SYSCLK_HZ: u32 = 72_000_000;

/// Coarse tick frequency
pub const TICK_HZ: u32 = 1_000;

/// SysTick counts per tick
pub const FINE_PERIOD: u32 = SYSCLK_HZ / TICK_HZ;

/// System clock shared by every context
pub static CLOCK: MonotonicClock = MonotonicClock::new(FINE_PERIOD, TICK_HZ);

/// SysTick current value register
pub struct SysTickCounter;

impl FineCounter for SysTickCounter {
    fn read(&self) -> u32 {
        SYST::get_current()
    }
}

/// Start SysTick with a one-tick reload
pub fn start(mut syst: SYST) {
    syst.set_clock_source(SystClkSource::Core);
    syst.set_reload(FINE_PERIOD - 1);
    syst.clear_current();
    syst.enable_interrupt();
    syst.enable_counter();
}

/// Current time
pub fn now() -> Timestamp {
    CLOCK.now(&SysTickCounter)
}

/// Microseconds since SysTick started
pub fn now_us() -> u64 {
    CLOCK.to_us(now())
}

#[exception]
fn SysTick() {
    CLOCK.tick();
}
