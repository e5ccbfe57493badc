//! HC-SR04 ultrasonic trigger
//!
//! A high pulse of at least 10 µs on TRIG starts one ranging cycle. The
//! sensor answers on ECHO, which the echo channel in parkgate-core times.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

/// Shortest trigger pulse the sensor accepts
pub const MIN_TRIGGER_PULSE_US: u32 = 10;

/// Trigger output for one sensor
pub struct Hcsr04Trigger<P, D> {
    pin: P,
    delay: D,
    pulse_us: u32,
}

impl<P: OutputPin, D: DelayNs> Hcsr04Trigger<P, D> {
    /// Create a trigger, driving the pin low
    ///
    /// Pulses shorter than [`MIN_TRIGGER_PULSE_US`] are stretched to it.
    pub fn new(mut pin: P, delay: D, pulse_us: u32) -> Result<Self, P::Error> {
        pin.set_low()?;
        Ok(Self {
            pin,
            delay,
            pulse_us: pulse_us.max(MIN_TRIGGER_PULSE_US),
        })
    }

    /// Pulse width in use
    pub fn pulse_us(&self) -> u32 {
        self.pulse_us
    }

    /// Emit one trigger pulse
    pub async fn fire(&mut self) -> Result<(), P::Error> {
        self.pin.set_high()?;
        self.delay.delay_us(self.pulse_us).await;
        self.pin.set_low()
    }
}
