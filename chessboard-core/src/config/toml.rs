//! Simple TOML parser for board configuration
//!
//! A minimal line-oriented parser for the subset `board.toml` uses. It
//! does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer incl. `0x` hex, boolean)
//! - [section] and [section.subsection] headers
//! - Arrays of strings, on one line or spread over several:
//!   rows = ["gpio2", "gpio3"]
//! - Comments (# ...), whole-line or trailing, outside quoted strings
//!
//! Every section may appear at most once in practice; a repeated section
//! simply overwrites earlier keys.

use super::hardware::{
    BitOrder, ColumnConfig, HallConfig, MatrixConfig, PinConfig, SensorConfig,
    ShiftRegisterConfig, DEFAULT_COLUMN_THRESHOLD,
};
use super::types::{BoardConfig, FlipStage};
use crate::debounce::{FilterPolicy, DEFAULT_DWELL_MS};
use crate::orientation::Rotation;
use crate::registers::PointerMode;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Key not valid in its section
    UnknownKey,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// Invalid pin string
    InvalidPin,
    /// Pin list has the wrong number of entries
    WrongLength,
    /// `[sensor] type` names no known sensor
    UnknownSensor,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Bus,
    Orientation,
    Debounce,
    Sensor,
    ShiftRegister,
    Matrix,
    Hall,
}

/// Sensor type named in `[sensor]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SensorKind {
    ShiftRegister,
    Matrix,
    Hall,
    Simulated,
}

/// Values collected while parsing; the sensor is assembled at the end
struct Builder {
    config: BoardConfig,
    debounce_mode: Option<bool>,
    dwell_ms: u32,
    sensor: SensorKind,
    shift_register: ShiftRegisterConfig,
    matrix: MatrixConfig,
    /// Threshold for `adc:` matrix columns
    column_threshold: u16,
    hall: HallConfig,
}

/// Parse `board.toml` into a [`BoardConfig`]
///
/// Missing keys keep their default values.
pub fn parse_config(input: &str) -> Result<BoardConfig, ParseError> {
    let mut builder = Builder {
        config: BoardConfig::default(),
        debounce_mode: None,
        dwell_ms: DEFAULT_DWELL_MS,
        sensor: SensorKind::ShiftRegister,
        shift_register: ShiftRegisterConfig::default(),
        matrix: MatrixConfig::default(),
        column_threshold: DEFAULT_COLUMN_THRESHOLD,
        hall: HallConfig::default(),
    };
    let mut section = Section::Root;
    // Key and start offset of an array still waiting for its `]`
    let mut open_array: Option<(&str, usize)> = None;

    for line in input.lines() {
        let line = strip_comment(line).trim();

        if let Some((key, start)) = open_array {
            if line.contains(']') {
                let end = offset_in(input, line) + line.len();
                apply_value(section, key, &input[start..end], &mut builder)?;
                open_array = None;
            }
            continue;
        }

        // Skip empty lines and comments
        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidValue)?;
        if value.starts_with('[') && !value.contains(']') {
            open_array = Some((key, offset_in(input, value)));
            continue;
        }
        apply_value(section, key, value, &mut builder)?;
    }

    if open_array.is_some() {
        return Err(ParseError::InvalidValue);
    }

    Ok(builder.finish())
}

impl Builder {
    fn finish(self) -> BoardConfig {
        let mut config = self.config;

        config.debounce = match self.debounce_mode {
            Some(false) => FilterPolicy::Passthrough,
            _ => FilterPolicy::Dwell {
                dwell_ms: self.dwell_ms,
            },
        };

        config.sensor = match self.sensor {
            SensorKind::ShiftRegister => SensorConfig::ShiftRegister(self.shift_register),
            SensorKind::Matrix => {
                let mut matrix = self.matrix;
                for column in matrix.columns.iter_mut() {
                    if let ColumnConfig::Analog { threshold, .. } = column {
                        *threshold = self.column_threshold;
                    }
                }
                SensorConfig::Matrix(matrix)
            }
            SensorKind::Hall => SensorConfig::Hall(self.hall),
            SensorKind::Simulated => SensorConfig::Simulated,
        };

        config
    }
}

/// Parse section header like "bus" or "sensor.matrix"
fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "bus" => Ok(Section::Bus),
        "orientation" => Ok(Section::Orientation),
        "debounce" => Ok(Section::Debounce),
        "sensor" => Ok(Section::Sensor),
        "sensor.shift_register" => Ok(Section::ShiftRegister),
        "sensor.matrix" => Ok(Section::Matrix),
        "sensor.hall" => Ok(Section::Hall),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Apply a key-value pair to the current section
fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    builder: &mut Builder,
) -> Result<(), ParseError> {
    let config = &mut builder.config;

    match section {
        Section::Root => match key {
            "version" => config.version = parse_int(value)?,
            _ => return Err(ParseError::UnknownKey),
        },
        Section::Bus => match key {
            "address" => {
                let address: u8 = parse_int(value)?;
                if address > 0x7F {
                    return Err(ParseError::InvalidValue);
                }
                config.bus.address = address;
            }
            "pointer_mode" => {
                config.bus.pointer_mode = match parse_string(value)? {
                    "fixed" => PointerMode::Fixed,
                    "auto_increment" => PointerMode::AutoIncrement,
                    _ => return Err(ParseError::InvalidValue),
                }
            }
            _ => return Err(ParseError::UnknownKey),
        },
        Section::Orientation => match key {
            "rotation" => {
                config.orientation.rotation =
                    Rotation::from_degrees(parse_int(value)?).ok_or(ParseError::InvalidValue)?
            }
            "flip" => config.orientation.flip = parse_bool(value)?,
            "flip_stage" => {
                config.flip_stage = match parse_string(value)? {
                    "scan" => FlipStage::Scan,
                    "transform" => FlipStage::Transform,
                    _ => return Err(ParseError::InvalidValue),
                }
            }
            _ => return Err(ParseError::UnknownKey),
        },
        Section::Debounce => match key {
            "mode" => {
                builder.debounce_mode = Some(match parse_string(value)? {
                    "dwell" => true,
                    "passthrough" => false,
                    _ => return Err(ParseError::InvalidValue),
                })
            }
            "dwell_ms" => builder.dwell_ms = parse_int(value)?,
            _ => return Err(ParseError::UnknownKey),
        },
        Section::Sensor => match key {
            "type" => {
                builder.sensor = match parse_string(value)? {
                    "shift_register" => SensorKind::ShiftRegister,
                    "matrix" => SensorKind::Matrix,
                    "hall" => SensorKind::Hall,
                    "simulated" => SensorKind::Simulated,
                    _ => return Err(ParseError::UnknownSensor),
                }
            }
            _ => return Err(ParseError::UnknownKey),
        },
        Section::ShiftRegister => {
            let sr = &mut builder.shift_register;
            match key {
                "row_data" => sr.row_data = parse_pin(value)?,
                "row_clock" => sr.row_clock = parse_pin(value)?,
                "row_latch" => sr.row_latch = parse_pin(value)?,
                "col_load" => sr.col_load = parse_pin(value)?,
                "col_clock" => sr.col_clock = parse_pin(value)?,
                "col_data" => sr.col_data = parse_pin(value)?,
                "bit_order" => {
                    sr.bit_order = match parse_string(value)? {
                        "lsb_first" => BitOrder::LsbFirst,
                        "msb_first" => BitOrder::MsbFirst,
                        _ => return Err(ParseError::InvalidValue),
                    }
                }
                _ => return Err(ParseError::UnknownKey),
            }
        }
        Section::Matrix => match key {
            "rows" => builder.matrix.rows = parse_pin_array(value)?,
            "columns" => {
                let mut columns = [ColumnConfig::Digital(PinConfig::default()); 8];
                fill_array(value, &mut columns, parse_column)?;
                builder.matrix.columns = columns;
            }
            "analog_threshold" => builder.column_threshold = parse_int(value)?,
            _ => return Err(ParseError::UnknownKey),
        },
        Section::Hall => {
            let hall = &mut builder.hall;
            match key {
                "bank_enable" => hall.bank_enable = parse_pin_array(value)?,
                "select" => hall.select = parse_pin_array(value)?,
                "analog" => hall.analog = parse_pin(value)?.pin,
                "midpoint" => hall.midpoint = parse_int(value)?,
                "threshold" => hall.threshold = parse_int(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
        }
    }

    Ok(())
}

/// Cut a trailing `# comment`, leaving `#` inside quoted strings alone
fn strip_comment(line: &str) -> &str {
    let mut quoted = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => quoted = !quoted,
            '#' if !quoted => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Byte offset of `part` within `whole`; `part` must be a subslice
fn offset_in(whole: &str, part: &str) -> usize {
    part.as_ptr() as usize - whole.as_ptr() as usize
}

/// Parse a key = value line (comment already stripped)
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> Result<&str, ParseError> {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        Ok(&value[1..value.len() - 1])
    } else {
        // Allow unquoted strings for simple values
        Ok(value)
    }
}

/// Parse an integer value, decimal or `0x` hex
fn parse_int<T: TryFrom<u32>>(value: &str) -> Result<T, ParseError> {
    let raw = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse::<u32>(),
    }
    .map_err(|_| ParseError::InvalidValue)?;

    T::try_from(raw).map_err(|_| ParseError::InvalidValue)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse a pin string like "gpio11", "!gpio12", "^gpio4"
fn parse_pin(value: &str) -> Result<PinConfig, ParseError> {
    let value = parse_string(value)?;
    let mut inverted = false;
    let mut pull_up = false;
    let mut s = value;

    // Check for modifiers
    loop {
        if let Some(rest) = s.strip_prefix('!') {
            inverted = true;
            s = rest;
        } else if let Some(rest) = s.strip_prefix('^') {
            pull_up = true;
            s = rest;
        } else {
            break;
        }
    }

    let number = s.strip_prefix("gpio").ok_or(ParseError::InvalidPin)?;
    let pin: u8 = number.parse().map_err(|_| ParseError::InvalidPin)?;

    Ok(PinConfig {
        pin,
        inverted,
        pull_up,
    })
}

/// Parse a matrix column: a pin string or "adc:gpioN"
fn parse_column(value: &str) -> Result<ColumnConfig, ParseError> {
    let value = parse_string(value)?;
    match value.strip_prefix("adc:") {
        Some(pin) => Ok(ColumnConfig::Analog {
            pin: parse_pin(pin)?.pin,
            threshold: DEFAULT_COLUMN_THRESHOLD,
        }),
        None => parse_pin(value).map(ColumnConfig::Digital),
    }
}

/// Parse an array of exactly `N` pins
fn parse_pin_array<const N: usize>(value: &str) -> Result<[PinConfig; N], ParseError> {
    let mut pins = [PinConfig::default(); N];
    fill_array(value, &mut pins, parse_pin)?;
    Ok(pins)
}

/// Parse `["a", "b", ...]` into `out`, which must be filled exactly
///
/// The array may span several lines, each with its own trailing comment.
fn fill_array<T>(
    value: &str,
    out: &mut [T],
    parse: impl Fn(&str) -> Result<T, ParseError>,
) -> Result<(), ParseError> {
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .ok_or(ParseError::InvalidValue)?;

    let mut count = 0;
    let items = inner
        .lines()
        .map(strip_comment)
        .flat_map(|line| line.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty());
    for item in items {
        let slot = out.get_mut(count).ok_or(ParseError::WrongLength)?;
        *slot = parse(item)?;
        count += 1;
    }

    if count != out.len() {
        return Err(ParseError::WrongLength);
    }
    Ok(())
}
