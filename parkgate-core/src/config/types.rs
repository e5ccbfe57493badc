//! Configuration type definitions

use crate::echo::SENTINEL_DISTANCE_M;
use crate::lot::DEFAULT_CAPACITY;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Key not valid in its section
    UnknownKey,
    /// Value could not be parsed
    InvalidValue,
    /// Value parsed but is outside its allowed range
    OutOfRange,
}

/// Ultrasonic sensor settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorConfig {
    /// Readings closer than this count as a vehicle (meters)
    pub threshold_m: f32,
    /// Speed of sound used for echo conversion (m/s)
    pub speed_of_sound_m_s: f32,
    /// Time between two triggers of the same sensor (ms)
    pub trigger_interval_ms: u32,
    /// Trigger pulse width (µs)
    pub trigger_pulse_us: u32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            threshold_m: 1.0,
            speed_of_sound_m_s: 343.0,
            trigger_interval_ms: 5000,
            trigger_pulse_us: 10,
        }
    }
}

/// Servo pulse widths for one gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServoConfig {
    /// Pulse width for the open position (µs)
    pub open_us: u16,
    /// Pulse width for the closed position (µs)
    pub closed_us: u16,
}

/// Gate settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GateConfig {
    /// How long a gate stays open (ms)
    pub hold_ms: u32,
    pub entry: ServoConfig,
    pub exit: ServoConfig,
}

impl Default for GateConfig {
    fn default() -> Self {
        // The two servos are mounted mirrored, so they close in opposite
        // directions
        Self {
            hold_ms: 450,
            entry: ServoConfig {
                open_us: 1500,
                closed_us: 2500,
            },
            exit: ServoConfig {
                open_us: 1500,
                closed_us: 500,
            },
        }
    }
}

/// Serial telemetry settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetryConfig {
    pub baudrate: u32,
    /// Time between status lines (ms)
    pub status_interval_ms: u32,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            baudrate: 9600,
            status_interval_ms: 500,
        }
    }
}

/// Segment display settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    /// Blink half-period while the lot is full (ms)
    pub blink_interval_ms: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            blink_interval_ms: 500,
        }
    }
}

/// Complete controller configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParkingConfig {
    /// Number of parking spaces (0-99, the display has two digits)
    pub capacity: u8,
    pub sensor: SensorConfig,
    pub gate: GateConfig,
    pub telemetry: TelemetryConfig,
    pub display: DisplayConfig,
}

impl Default for ParkingConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            sensor: SensorConfig::default(),
            gate: GateConfig::default(),
            telemetry: TelemetryConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

/// Servo frame length at 50 Hz (µs)
pub const SERVO_PERIOD_US: u16 = 20_000;

impl ParkingConfig {
    /// Check every value against its allowed range
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sensor = &self.sensor;
        let in_range = self.capacity <= 99
            && sensor.threshold_m.is_finite()
            && sensor.threshold_m > 0.0
            && sensor.threshold_m < SENTINEL_DISTANCE_M
            && sensor.speed_of_sound_m_s.is_finite()
            && sensor.speed_of_sound_m_s > 0.0
            && sensor.trigger_interval_ms > 0
            && (10..=1000).contains(&sensor.trigger_pulse_us)
            && self.gate.hold_ms > 0
            && servo_in_range(&self.gate.entry)
            && servo_in_range(&self.gate.exit)
            && self.telemetry.baudrate > 0
            && self.telemetry.status_interval_ms > 0
            && self.display.blink_interval_ms > 0;

        if in_range {
            Ok(())
        } else {
            Err(ConfigError::OutOfRange)
        }
    }

    /// Gate hold time in microseconds
    pub fn hold_us(&self) -> u64 {
        self.gate.hold_ms as u64 * 1000
    }

    /// Status cadence in microseconds
    pub fn status_interval_us(&self) -> u64 {
        self.telemetry.status_interval_ms as u64 * 1000
    }

    /// Blink half-period in microseconds
    pub fn blink_interval_us(&self) -> u64 {
        self.display.blink_interval_ms as u64 * 1000
    }

    /// Trigger interval in microseconds
    pub fn trigger_interval_us(&self) -> u64 {
        self.sensor.trigger_interval_ms as u64 * 1000
    }
}

fn servo_in_range(servo: &ServoConfig) -> bool {
    servo.open_us < SERVO_PERIOD_US && servo.closed_us < SERVO_PERIOD_US
}
