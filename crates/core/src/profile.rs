//! Semantic profile model: what the raw config record means to a host.
//!
//! This is the device-agnostic side of the codec. A [`Profile`] is produced by
//! decoding a config record and consumed when encoding one; it can also be
//! persisted to JSON so settings survive across machines.

use crate::config::NUM_DPI_SLOTS;
use crate::device::PollingRate;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A 24-bit RGB color value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parse a CLI-friendly `RRGGBB` hex string.
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.len() != 6 {
            return None;
        }
        let red = u8::from_str_radix(&s[0..2], 16).ok()?;
        let green = u8::from_str_radix(&s[2..4], 16).ok()?;
        let blue = u8::from_str_radix(&s[4..6], 16).ok()?;
        Some(Self { red, green, blue })
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

/// Simplified LED modes the host model understands.
///
/// The device's effect selector is richer; decoding collapses all animated
/// effects onto [`LedMode::Cycle`], so decode∘encode is not an identity for
/// those (the encoder always picks the rainbow-cycle effect for `Cycle`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedMode {
    Off,
    On,
    Cycle,
    Breathing,
}

impl LedMode {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
            Self::Cycle => "cycle",
            Self::Breathing => "breathing",
        }
    }

    /// Parse a mode from a CLI-friendly string (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "off" => Some(Self::Off),
            "on" | "solid" => Some(Self::On),
            "cycle" | "rainbow" => Some(Self::Cycle),
            "breathing" | "breathe" => Some(Self::Breathing),
            _ => None,
        }
    }
}

impl std::fmt::Display for LedMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Where an LED sits on the mouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedType {
    /// Body/side lighting driven by the effect selector.
    Side,
    /// Indicator showing which DPI slot is active.
    DpiIndicator,
}

/// One LED entry. Index 0 is the body LED; 1..=[`NUM_DPI_SLOTS`] are the
/// per-slot DPI indicators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Led {
    pub index: usize,
    pub led_type: LedType,
    pub mode: LedMode,
    pub color: Color,
    /// Modes this LED can actually be set to. Indicators only support `On`.
    pub supported_modes: Vec<LedMode>,
}

impl Led {
    pub fn supports(&self, mode: LedMode) -> bool {
        self.supported_modes.contains(&mode)
    }
}

/// One DPI preset slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Slot index, 0-based.
    pub index: usize,
    /// Horizontal DPI; 0 means the slot is disabled.
    pub dpi_x: u16,
    /// Vertical DPI; 0 means the slot is disabled. Zero iff `dpi_x` is zero.
    pub dpi_y: u16,
    pub is_active: bool,
    pub is_default: bool,
    /// Whether the hardware can drive X and Y at different resolutions.
    pub separate_xy: bool,
}

impl Resolution {
    pub fn is_disabled(&self) -> bool {
        self.dpi_x == 0
    }
}

/// A full decoded device configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub resolutions: Vec<Resolution>,
    pub leds: Vec<Led>,
    pub report_rate: PollingRate,
    pub supported_report_rates: Vec<PollingRate>,
    pub is_active: bool,
}

impl Profile {
    /// The body/effect LED (index 0).
    pub fn body_led(&self) -> &Led {
        &self.leds[0]
    }

    pub fn body_led_mut(&mut self) -> &mut Led {
        &mut self.leds[0]
    }

    /// The DPI indicator LED for `slot`, if present.
    pub fn indicator_led_mut(&mut self, slot: usize) -> Option<&mut Led> {
        self.leds.get_mut(slot + 1)
    }

    /// The currently active resolution slot.
    pub fn active_resolution(&self) -> Option<&Resolution> {
        self.resolutions.iter().find(|r| r.is_active)
    }

    pub fn resolution_mut(&mut self, slot: usize) -> Option<&mut Resolution> {
        self.resolutions.get_mut(slot)
    }

    /// Mark `slot` active (and default) and clear the flag everywhere else.
    pub fn set_active_slot(&mut self, slot: usize) -> Result<()> {
        if slot >= self.resolutions.len() {
            return Err(Error::OutOfRange {
                field: "slot",
                value: slot as u32,
                min: 0,
                max: (NUM_DPI_SLOTS - 1) as u32,
            });
        }
        for r in &mut self.resolutions {
            r.is_active = r.index == slot;
            r.is_default = r.is_active;
        }
        Ok(())
    }
}

/// Save a profile as JSON.
pub fn save_profile(profile: &Profile, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(profile)
        .map_err(|e| Error::Profile(format!("serialize: {e}")))?;
    std::fs::write(path, json)
        .map_err(|e| Error::Profile(format!("write {}: {e}", path.display())))
}

/// Load a profile from JSON.
pub fn load_profile(path: &Path) -> Result<Profile> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| Error::Profile(format!("read {}: {e}", path.display())))?;
    serde_json::from_str(&json).map_err(|e| Error::Profile(format!("parse: {e}")))
}
