//! Unit converters between raw sensor encodings and engineering units.
//!
//! The PMW3360 takes DPI as `(dpi / 100) - 1`, so the full 100..=12000 range
//! fits in one byte per axis. Colors are stored channel-for-channel with no
//! gamma or scaling.

use crate::config::Rgb8;
use crate::profile::Color;

/// Lowest DPI the sensor accepts.
pub const DPI_MIN: u16 = 100;
/// Highest DPI the sensor accepts.
pub const DPI_MAX: u16 = 12000;
/// DPI grid step.
pub const DPI_STEP: u16 = 100;

/// Convert a raw sensor byte to DPI.
pub fn dpi_from_raw(raw: u8) -> u16 {
    (u16::from(raw) + 1) * DPI_STEP
}

/// Convert a DPI value to the raw sensor encoding.
///
/// Mirrors the firmware: no validation, so callers must stay on the
/// 100..=12000 step-100 grid (see [`crate::safety::validate_dpi`]).
/// A disabled slot's 0 truncates to 0xFF, which is what the stock software
/// writes for slots it masks off.
pub fn dpi_to_raw(dpi: u16) -> u8 {
    (i32::from(dpi) / i32::from(DPI_STEP) - 1) as u8
}

/// Convert a raw RGB triple from the record to a color value.
pub fn color_from_raw(raw: Rgb8) -> Color {
    Color {
        red: raw.r,
        green: raw.g,
        blue: raw.b,
    }
}

/// Convert a color value to the raw RGB triple stored in the record.
pub fn color_to_raw(color: Color) -> Rgb8 {
    Rgb8 {
        r: color.red,
        g: color.green,
        b: color.blue,
    }
}
