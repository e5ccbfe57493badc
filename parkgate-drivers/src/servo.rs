//! Servo-driven gate
//!
//! A hobby servo takes a 50 Hz frame and holds the angle encoded by the
//! pulse width, typically 500-2500 µs. Each gate uses two fixed widths,
//! one per position.
//!
//! ```ignore
//! let mut gate = ServoGate::new(pwm_channel, config.gate.entry)?;
//! gate.open();
//! // ... hold time ...
//! gate.close();
//! ```

use embedded_hal::pwm::SetDutyCycle;
use parkgate_core::config::{ServoConfig, SERVO_PERIOD_US};
use parkgate_core::traits::{GateActuator, GatePosition};

/// Gate driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GateError {
    /// Pulse width does not fit in the servo frame
    PulseOutOfRange,
    /// PWM peripheral rejected the duty cycle
    Pwm,
}

/// Gate driven by one PWM channel
pub struct ServoGate<P> {
    pwm: P,
    pulses: ServoConfig,
    position: GatePosition,
    /// Last PWM failure, kept until the next successful write
    fault: Option<GateError>,
}

impl<P: SetDutyCycle> ServoGate<P> {
    /// Create a gate and command it closed
    ///
    /// The PWM channel must already run at 50 Hz.
    pub fn new(pwm: P, pulses: ServoConfig) -> Result<Self, GateError> {
        if pulses.open_us >= SERVO_PERIOD_US || pulses.closed_us >= SERVO_PERIOD_US {
            return Err(GateError::PulseOutOfRange);
        }

        let mut gate = Self {
            pwm,
            pulses,
            position: GatePosition::Closed,
            fault: None,
        };
        gate.close();
        Ok(gate)
    }

    /// Pulse widths in use
    pub fn pulses(&self) -> ServoConfig {
        self.pulses
    }

    /// Last PWM failure, if the most recent command did not reach the servo
    pub fn fault(&self) -> Option<GateError> {
        self.fault
    }

    /// Release the PWM channel
    pub fn release(self) -> P {
        self.pwm
    }

    fn drive(&mut self, pulse_us: u16) {
        self.fault = self
            .pwm
            .set_duty_cycle_fraction(pulse_us, SERVO_PERIOD_US)
            .err()
            .map(|_| GateError::Pwm);
    }
}

impl<P: SetDutyCycle> GateActuator for ServoGate<P> {
    fn open(&mut self) {
        self.drive(self.pulses.open_us);
        self.position = GatePosition::Open;
    }

    fn close(&mut self) {
        self.drive(self.pulses.closed_us);
        self.position = GatePosition::Closed;
    }

    fn position(&self) -> GatePosition {
        self.position
    }
}
