//! Safety layer: validates user-supplied values against known-safe ranges
//! before they reach the codec.
//!
//! The codec itself mirrors the firmware and performs no validation — an
//! off-grid DPI value would be truncated into whatever byte the arithmetic
//! produces. Everything arriving from a user boundary (CLI arguments, loaded
//! profile files) goes through here first.
//!
//! # SinoWealth / Glorious Model O bounds
//!
//! ## DPI
//! - **Range**: 100 – 12,000 DPI (PMW3360 sensor; the stock software only
//!   goes down to 400 but the sensor accepts 100)
//! - **Step size**: 100 DPI increments
//! - **Encoding**: one byte per axis, `(dpi / 100) - 1`
//!
//! ## DPI slots
//! - **Range**: 0–5 (the record has room for eight, the stock software and
//!   this driver expose six)
//!
//! ## Lighting
//! - Colors are full 24-bit RGB, every value is valid
//! - The body LED only accepts the four simplified modes; per-slot indicator
//!   LEDs only accept "on"

use crate::config::NUM_DPI_SLOTS;
use crate::convert::{DPI_MAX, DPI_MIN, DPI_STEP};
use crate::error::{Error, Result};
use crate::profile::{Led, LedMode, Profile};

/// Validate a DPI value: range-check, then round onto the step grid.
///
/// DPI 0 is accepted as-is; it marks a slot disabled.
pub fn validate_dpi(dpi: u16) -> Result<u16> {
    if dpi == 0 {
        return Ok(0);
    }
    if !(DPI_MIN..=DPI_MAX).contains(&dpi) {
        return Err(Error::OutOfRange {
            field: "dpi",
            value: dpi as u32,
            min: DPI_MIN as u32,
            max: DPI_MAX as u32,
        });
    }
    // Round to nearest step
    let rounded = ((dpi + DPI_STEP / 2) / DPI_STEP) * DPI_STEP;
    Ok(rounded.clamp(DPI_MIN, DPI_MAX))
}

/// Validate a DPI slot index (0-based).
pub fn validate_slot_index(index: usize) -> Result<()> {
    if index >= NUM_DPI_SLOTS {
        return Err(Error::OutOfRange {
            field: "slot",
            value: index as u32,
            min: 0,
            max: (NUM_DPI_SLOTS - 1) as u32,
        });
    }
    Ok(())
}

/// Validate a whole profile's structure and values.
///
/// The encoder indexes the record's slot and LED arrays straight from the
/// profile, so anything loaded from disk must carry in-range slot indices
/// and the full LED list (body LED plus one indicator per slot, each at the
/// position matching its index) before it may be committed.
pub fn validate_profile(profile: &Profile) -> Result<()> {
    for resolution in &profile.resolutions {
        validate_slot_index(resolution.index)?;
        validate_dpi(resolution.dpi_x)?;
        validate_dpi(resolution.dpi_y)?;
        if (resolution.dpi_x == 0) != (resolution.dpi_y == 0) {
            return Err(Error::Profile(format!(
                "slot {}: X and Y DPI must be disabled together",
                resolution.index
            )));
        }
    }

    if profile.leds.len() != NUM_DPI_SLOTS + 1 {
        return Err(Error::Profile(format!(
            "expected {} LEDs (body plus one per DPI slot), got {}",
            NUM_DPI_SLOTS + 1,
            profile.leds.len()
        )));
    }
    for (position, led) in profile.leds.iter().enumerate() {
        if led.index != position {
            return Err(Error::Profile(format!(
                "LED at position {position} carries index {}",
                led.index
            )));
        }
    }

    Ok(())
}

/// Validate that an LED supports the requested mode.
pub fn validate_led_mode(led: &Led, mode: LedMode) -> Result<()> {
    if led.supports(mode) {
        Ok(())
    } else {
        Err(Error::Profile(format!(
            "LED {} does not support mode '{}'",
            led.index, mode
        )))
    }
}
