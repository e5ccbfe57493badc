//! Minimal TOML parser for the parking configuration
//!
//! Handles only the subset the configuration file uses:
//! - `[section]` and `[section.subsection]` headers
//! - `key = value` pairs with integer and float values
//! - Comments (`# ...`), whole-line or trailing
//!
//! Keys missing from the file keep their defaults. Unknown keys and
//! sections are errors so typos do not pass silently.

use super::types::{ConfigError, ParkingConfig, ServoConfig};
use crate::lane::Lane;

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Lot,
    Sensor,
    Gate,
    Servo(Lane),
    Telemetry,
    Display,
}

/// Parse TOML text into a validated configuration
pub fn parse_config(input: &str) -> Result<ParkingConfig, ConfigError> {
    let mut config = ParkingConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = strip_comment(line).trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            section = parse_section_header(header)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ConfigError::InvalidValue)?;
        apply(&mut config, section, key, value)?;
    }

    config.validate()?;
    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ConfigError> {
    match header.trim() {
        "lot" => Ok(Section::Lot),
        "sensor" => Ok(Section::Sensor),
        "gate" => Ok(Section::Gate),
        "gate.entry" => Ok(Section::Servo(Lane::Entry)),
        "gate.exit" => Ok(Section::Servo(Lane::Exit)),
        "telemetry" => Ok(Section::Telemetry),
        "display" => Ok(Section::Display),
        _ => Err(ConfigError::InvalidSection),
    }
}

fn apply(config: &mut ParkingConfig, section: Section, key: &str, value: &str) -> Result<(), ConfigError> {
    match (section, key) {
        (Section::Lot, "capacity") => config.capacity = parse_int(value)?,

        (Section::Sensor, "threshold_m") => config.sensor.threshold_m = parse_float(value)?,
        (Section::Sensor, "speed_of_sound_m_s") => config.sensor.speed_of_sound_m_s = parse_float(value)?,
        (Section::Sensor, "trigger_interval_ms") => config.sensor.trigger_interval_ms = parse_int(value)?,
        (Section::Sensor, "trigger_pulse_us") => config.sensor.trigger_pulse_us = parse_int(value)?,

        (Section::Gate, "hold_ms") => config.gate.hold_ms = parse_int(value)?,
        (Section::Servo(lane), "open_us") => servo_mut(config, lane).open_us = parse_int(value)?,
        (Section::Servo(lane), "closed_us") => servo_mut(config, lane).closed_us = parse_int(value)?,

        (Section::Telemetry, "baudrate") => config.telemetry.baudrate = parse_int(value)?,
        (Section::Telemetry, "status_interval_ms") => config.telemetry.status_interval_ms = parse_int(value)?,

        (Section::Display, "blink_interval_ms") => config.display.blink_interval_ms = parse_int(value)?,

        _ => return Err(ConfigError::UnknownKey),
    }
    Ok(())
}

fn servo_mut(config: &mut ParkingConfig, lane: Lane) -> &mut ServoConfig {
    match lane {
        Lane::Entry => &mut config.gate.entry,
        Lane::Exit => &mut config.gate.exit,
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Split `key = value`
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let (key, value) = (key.trim(), value.trim());
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Parse an integer value, allowing `_` digit separators
fn parse_int<T: TryFrom<u64>>(value: &str) -> Result<T, ConfigError> {
    let mut result: u64 = 0;
    let mut digits = 0;
    for c in value.chars() {
        match c {
            '_' => continue,
            '0'..='9' => {
                result = result
                    .checked_mul(10)
                    .and_then(|r| r.checked_add(c as u64 - '0' as u64))
                    .ok_or(ConfigError::OutOfRange)?;
                digits += 1;
            }
            _ => return Err(ConfigError::InvalidValue),
        }
    }
    if digits == 0 {
        return Err(ConfigError::InvalidValue);
    }
    T::try_from(result).map_err(|_| ConfigError::OutOfRange)
}

/// Parse a float value; integers are accepted too
fn parse_float(value: &str) -> Result<f32, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue)
}
