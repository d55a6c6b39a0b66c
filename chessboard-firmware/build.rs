//! Build script for chessboard-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates board.toml at compile time, with the `toml` crate and with
//!   the parser the firmware runs at boot

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Pins owned by the console and the I2C target
const RESERVED_PINS: [u8; 4] = [0, 1, 20, 21];

/// ADC-capable pins
const ANALOG_PINS: [u8; 4] = [26, 27, 28, 29];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths and scripts
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate board.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=board.toml");

    let config_path = Path::new("board.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: board.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds a board.toml configuration file.            ║\n\
            ║  Please create one in the chessboard-firmware directory.         ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read board.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in board.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();

    // The firmware parses the same text at boot; both must accept it
    if let Err(e) = chessboard_core::config::parse_config(&config_content) {
        errors.push(format!("firmware config parser rejects the file: {:?}", e));
    }

    validate_bus(&config, &mut errors);
    validate_orientation(&config, &mut errors);
    validate_debounce(&config, &mut errors);
    validate_sensor(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid board configuration                              ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=board.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn section<'a>(config: &'a toml::Value, path: &[&str]) -> Option<&'a toml::value::Table> {
    let mut value = config;
    for key in path {
        value = value.get(key)?;
    }
    value.as_table()
}

fn check_choice(
    table: &toml::value::Table,
    section: &str,
    key: &str,
    choices: &[&str],
    errors: &mut Vec<String>,
) {
    match table.get(key) {
        Some(toml::Value::String(s)) if choices.contains(&s.as_str()) => {}
        Some(_) => errors.push(format!(
            "[{}] {} must be one of {}",
            section,
            key,
            choices.join(", ")
        )),
        None => {}
    }
}

fn validate_bus(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(bus) = section(config, &["bus"]) else {
        return;
    };

    match bus.get("address") {
        Some(toml::Value::Integer(addr)) if (0x08..=0x77).contains(addr) => {}
        Some(_) => errors.push("[bus] address must be a 7-bit address 0x08-0x77".into()),
        None => {}
    }
    check_choice(bus, "bus", "pointer_mode", &["fixed", "auto_increment"], errors);
}

fn validate_orientation(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(orientation) = section(config, &["orientation"]) else {
        return;
    };

    match orientation.get("rotation") {
        Some(toml::Value::Integer(0 | 90 | 180 | 270)) | None => {}
        Some(_) => errors.push("[orientation] rotation must be 0, 90, 180 or 270".into()),
    }
    if let Some(flip) = orientation.get("flip") {
        if !flip.is_bool() {
            errors.push("[orientation] flip must be true or false".into());
        }
    }
    check_choice(
        orientation,
        "orientation",
        "flip_stage",
        &["scan", "transform"],
        errors,
    );
}

fn validate_debounce(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(debounce) = section(config, &["debounce"]) else {
        return;
    };

    check_choice(debounce, "debounce", "mode", &["dwell", "passthrough"], errors);
    match debounce.get("dwell_ms") {
        Some(toml::Value::Integer(ms)) if (0..=60_000).contains(ms) => {}
        Some(_) => errors.push("[debounce] dwell_ms must be 0-60000".into()),
        None => {}
    }
}

fn validate_sensor(config: &toml::Value, errors: &mut Vec<String>) {
    let kind = section(config, &["sensor"])
        .and_then(|s| s.get("type"))
        .and_then(|t| t.as_str())
        .unwrap_or("shift_register");

    let mut used = Vec::new();
    match kind {
        "shift_register" => {
            if let Some(sr) = section(config, &["sensor", "shift_register"]) {
                for key in [
                    "row_data",
                    "row_clock",
                    "row_latch",
                    "col_load",
                    "col_clock",
                    "col_data",
                ] {
                    if let Some(value) = sr.get(key) {
                        check_pin(value, &format!("sensor.shift_register.{}", key), &mut used, errors);
                    }
                }
                check_choice(
                    sr,
                    "sensor.shift_register",
                    "bit_order",
                    &["lsb_first", "msb_first"],
                    errors,
                );
            }
        }
        "matrix" => {
            if let Some(matrix) = section(config, &["sensor", "matrix"]) {
                check_pin_list(matrix, "sensor.matrix", "rows", 8, &mut used, errors);
                check_pin_list(matrix, "sensor.matrix", "columns", 8, &mut used, errors);
            }
        }
        "hall" => {
            if let Some(hall) = section(config, &["sensor", "hall"]) {
                check_pin_list(hall, "sensor.hall", "bank_enable", 4, &mut used, errors);
                check_pin_list(hall, "sensor.hall", "select", 4, &mut used, errors);
                if let Some(value) = hall.get("analog") {
                    match value.as_str().and_then(pin_number) {
                        Some(pin) if ANALOG_PINS.contains(&pin) => {}
                        _ => errors.push("[sensor.hall] analog must be one of gpio26-gpio29".into()),
                    }
                }
            }
        }
        "simulated" => {}
        other => errors.push(format!("[sensor] unknown type '{}'", other)),
    }
}

fn check_pin_list(
    table: &toml::value::Table,
    section: &str,
    key: &str,
    len: usize,
    used: &mut Vec<u8>,
    errors: &mut Vec<String>,
) {
    match table.get(key) {
        Some(toml::Value::Array(pins)) => {
            if pins.len() != len {
                errors.push(format!("[{}] {} must list {} pins", section, key, len));
            }
            for (i, value) in pins.iter().enumerate() {
                check_pin(value, &format!("{}.{}[{}]", section, key, i), used, errors);
            }
        }
        Some(_) => errors.push(format!("[{}] {} must be an array", section, key)),
        None => {}
    }
}

/// Check one pin string: syntax, reserved pins, and reuse
fn check_pin(value: &toml::Value, name: &str, used: &mut Vec<u8>, errors: &mut Vec<String>) {
    let Some(text) = value.as_str() else {
        errors.push(format!("{} must be a pin string", name));
        return;
    };

    let analog = text.starts_with("adc:");
    let Some(pin) = pin_number(text) else {
        errors.push(format!("{} '{}' is not a valid pin", name, text));
        return;
    };

    if RESERVED_PINS.contains(&pin) {
        errors.push(format!("{} uses reserved gpio{}", name, pin));
    } else if ANALOG_PINS.contains(&pin) != analog {
        errors.push(format!("{} gpio{} analog use mismatch", name, pin));
    } else if used.contains(&pin) {
        errors.push(format!("{} reuses gpio{}", name, pin));
    } else {
        used.push(pin);
    }
}

/// Pin number of "gpioN" with optional "adc:", "!" and "^" prefixes
fn pin_number(text: &str) -> Option<u8> {
    let text = text.strip_prefix("adc:").unwrap_or(text);
    let text = text.trim_start_matches(['!', '^']);
    let pin: u8 = text.strip_prefix("gpio")?.parse().ok()?;
    (pin < 30).then_some(pin)
}
