//! Build script for parkgate-firmware
//!
//! - Links against the board's memory.x
//! - Validates parking.toml at compile time

use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    link_memory_map();
    validate_config();
}

/// Put memory.x on the linker search path and pick the linker scripts
fn link_memory_map() {
    let out = PathBuf::from(env::var_os("OUT_DIR").unwrap());
    fs::write(out.join("memory.x"), include_bytes!("memory.x")).unwrap();
    println!("cargo:rustc-link-search={}", out.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    if env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Reject a parking.toml the firmware would fall back on defaults for
fn validate_config() {
    println!("cargo:rerun-if-changed=parking.toml");

    let text = fs::read_to_string("parking.toml")
        .unwrap_or_else(|e| panic!("\nparkgate-firmware/parking.toml: {}\n", e));

    let config: toml::Value = toml::from_str(&text)
        .unwrap_or_else(|e| panic!("\nparking.toml is not valid TOML:\n{}\n", e));

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_ranges(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\nInvalid configuration in parking.toml:\n{}\n",
            errors.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n")
        );
    }
}

/// Known sections and their keys
const SECTIONS: &[(&str, &[&str])] = &[
    ("lot", &["capacity"]),
    (
        "sensor",
        &["threshold_m", "speed_of_sound_m_s", "trigger_interval_ms", "trigger_pulse_us"],
    ),
    ("gate", &["hold_ms", "entry", "exit"]),
    ("telemetry", &["baudrate", "status_interval_ms"]),
    ("display", &["blink_interval_ms"]),
];

const SERVO_KEYS: &[&str] = &["open_us", "closed_us"];

/// Reject unknown sections and keys
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        errors.push("top level must be a table".to_string());
        return;
    };

    for (name, section) in root {
        let Some(keys) = SECTIONS.iter().find(|(s, _)| s == name).map(|(_, k)| *k) else {
            errors.push(format!("unknown section [{}]", name));
            continue;
        };
        let Some(table) = section.as_table() else {
            errors.push(format!("[{}] must be a table", name));
            continue;
        };
        for (key, value) in table {
            if !keys.contains(&key.as_str()) {
                errors.push(format!("[{}] unknown key '{}'", name, key));
                continue;
            }
            if name == "gate" && (key == "entry" || key == "exit") {
                validate_servo_keys(key, value, errors);
            }
        }
    }
}

fn validate_servo_keys(lane: &str, value: &toml::Value, errors: &mut Vec<String>) {
    let Some(table) = value.as_table() else {
        errors.push(format!("[gate.{}] must be a table", lane));
        return;
    };
    for key in table.keys() {
        if !SERVO_KEYS.contains(&key.as_str()) {
            errors.push(format!("[gate.{}] unknown key '{}'", lane, key));
        }
    }
}

/// Look up `section.key`, or `section.sub.key` for a three-part path
fn lookup<'a>(config: &'a toml::Value, path: &[&str]) -> Option<&'a toml::Value> {
    path.iter().try_fold(config, |value, part| value.get(part))
}

fn check_int(config: &toml::Value, path: &[&str], min: i64, max: i64, errors: &mut Vec<String>) {
    match lookup(config, path) {
        None => {}
        Some(toml::Value::Integer(v)) if (min..=max).contains(v) => {}
        Some(toml::Value::Integer(_)) => {
            errors.push(format!("{} must be {}-{}", path.join("."), min, max));
        }
        Some(_) => errors.push(format!("{} must be an integer", path.join("."))),
    }
}

fn check_float(config: &toml::Value, path: &[&str], min_exclusive: f64, max_exclusive: f64, errors: &mut Vec<String>) {
    let value = match lookup(config, path) {
        None => return,
        Some(toml::Value::Float(v)) => *v,
        Some(toml::Value::Integer(v)) => *v as f64,
        Some(_) => {
            errors.push(format!("{} must be a number", path.join(".")));
            return;
        }
    };
    if !(value > min_exclusive && value < max_exclusive) {
        errors.push(format!(
            "{} must be between {} and {}",
            path.join("."),
            min_exclusive,
            max_exclusive
        ));
    }
}

/// Same bounds the firmware enforces at boot
fn validate_ranges(config: &toml::Value, errors: &mut Vec<String>) {
    const U32_MAX: i64 = u32::MAX as i64;
    // Servo frame is 20 ms
    const PULSE_MAX: i64 = 19_999;

    check_int(config, &["lot", "capacity"], 0, 99, errors);

    // Sentinel reading is 99 m
    check_float(config, &["sensor", "threshold_m"], 0.0, 99.0, errors);
    check_float(config, &["sensor", "speed_of_sound_m_s"], 0.0, f64::MAX, errors);
    check_int(config, &["sensor", "trigger_interval_ms"], 1, U32_MAX, errors);
    check_int(config, &["sensor", "trigger_pulse_us"], 10, 1000, errors);

    check_int(config, &["gate", "hold_ms"], 1, U32_MAX, errors);
    for lane in ["entry", "exit"] {
        check_int(config, &["gate", lane, "open_us"], 0, PULSE_MAX, errors);
        check_int(config, &["gate", lane, "closed_us"], 0, PULSE_MAX, errors);
    }

    check_int(config, &["telemetry", "baudrate"], 1, U32_MAX, errors);
    check_int(config, &["telemetry", "status_interval_ms"], 1, U32_MAX, errors);
    check_int(config, &["display", "blink_interval_ms"], 1, U32_MAX, errors);
}
