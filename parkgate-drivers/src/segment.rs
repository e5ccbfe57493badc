//! Parallel seven-segment port
//!
//! Fourteen GPIOs, one per segment, for two common-cathode digits. Bit
//! `n` of each digit's pattern drives segment pin `n` of that digit.

use core::convert::Infallible;

use embedded_hal::digital::{OutputPin, PinState};
use parkgate_core::traits::SegmentOutput;

/// Segments per digit
pub const SEGMENTS: usize = 7;

/// Two digits of segment pins
pub struct SegmentPort<P> {
    units: [P; SEGMENTS],
    tens: [P; SEGMENTS],
}

impl<P: OutputPin<Error = Infallible>> SegmentPort<P> {
    /// Create a port and blank both digits
    pub fn new(units: [P; SEGMENTS], tens: [P; SEGMENTS]) -> Self {
        let mut port = Self { units, tens };
        port.write(0);
        port
    }

    /// Release the pins as `(units, tens)`
    pub fn release(self) -> ([P; SEGMENTS], [P; SEGMENTS]) {
        (self.units, self.tens)
    }
}

fn drive<P: OutputPin<Error = Infallible>>(pins: &mut [P; SEGMENTS], pattern: u8) {
    for (bit, pin) in pins.iter_mut().enumerate() {
        let state = PinState::from(pattern & (1 << bit) != 0);
        // Infallible
        let _ = pin.set_state(state);
    }
}

impl<P: OutputPin<Error = Infallible>> SegmentOutput for SegmentPort<P> {
    fn write(&mut self, bits: u16) {
        drive(&mut self.units, bits as u8);
        drive(&mut self.tens, (bits >> 8) as u8);
    }
}
