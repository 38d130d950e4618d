//! Device model: discovery and identification.

use crate::error::{Error, Result};
use crate::{pids, GLORIOUS_VID};
use tracing::{debug, info};

/// Supported SinoWealth-based mouse models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseModel {
    ModelO,
    ModelOMinus,
    ModelD,
}

impl MouseModel {
    /// Look up model from USB product ID.
    pub fn from_pid(pid: u16) -> Option<Self> {
        match pid {
            pids::MODEL_O => Some(Self::ModelO),
            pids::MODEL_O_MINUS => Some(Self::ModelOMinus),
            pids::MODEL_D => Some(Self::ModelD),
            _ => None,
        }
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ModelO => "Glorious Model O",
            Self::ModelOMinus => "Glorious Model O-",
            Self::ModelD => "Glorious Model D",
        }
    }

    /// USB Product ID.
    pub fn pid(&self) -> u16 {
        match self {
            Self::ModelO => pids::MODEL_O,
            Self::ModelOMinus => pids::MODEL_O_MINUS,
            Self::ModelD => pids::MODEL_D,
        }
    }
}

/// Information about a discovered device interface.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub model: MouseModel,
    pub vid: u16,
    pub pid: u16,
    pub path: String,
    pub interface_number: i32,
    pub serial: Option<String>,
}

/// Discover all connected supported mice.
///
/// Enumerates USB HID interfaces and returns info for any recognized models.
/// A mouse shows up once per interface; only the interface carrying the
/// config feature report is usable, which callers detect via
/// [`crate::transport::FeatureTransport::has_report`] after opening.
pub fn discover_devices() -> Result<Vec<DeviceInfo>> {
    debug!("Starting HID device enumeration");
    let api = hidapi::HidApi::new().map_err(|e| Error::Hid(e.to_string()))?;

    let mut devices = Vec::new();
    for info in api.device_list() {
        if info.vendor_id() != GLORIOUS_VID {
            continue;
        }

        if let Some(model) = MouseModel::from_pid(info.product_id()) {
            info!(
                model = model.name(),
                vid = format_args!("0x{:04X}", info.vendor_id()),
                pid = format_args!("0x{:04X}", info.product_id()),
                interface = info.interface_number(),
                path = %info.path().to_string_lossy(),
                "Found Glorious device"
            );
            devices.push(DeviceInfo {
                model,
                vid: info.vendor_id(),
                pid: info.product_id(),
                path: info.path().to_string_lossy().into_owned(),
                interface_number: info.interface_number(),
                serial: info.serial_number().map(|s| s.to_string()),
            });
        }
    }

    debug!(count = devices.len(), "Device enumeration complete");
    Ok(devices)
}

/// Polling rate options.
///
/// The hardware supports all four, but the config record has no polling-rate
/// field the protocol documents; decoded profiles report a fixed 1000 Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[repr(u16)]
pub enum PollingRate {
    Hz125 = 125,
    Hz250 = 250,
    Hz500 = 500,
    Hz1000 = 1000,
}

impl PollingRate {
    /// Convert from raw Hz value.
    pub fn from_hz(hz: u16) -> Option<Self> {
        match hz {
            125 => Some(Self::Hz125),
            250 => Some(Self::Hz250),
            500 => Some(Self::Hz500),
            1000 => Some(Self::Hz1000),
            _ => None,
        }
    }

    /// Get the Hz value.
    pub fn as_hz(&self) -> u16 {
        *self as u16
    }

    /// All rates the hardware family advertises.
    pub const ALL: &'static [PollingRate] = &[
        PollingRate::Hz125,
        PollingRate::Hz250,
        PollingRate::Hz500,
        PollingRate::Hz1000,
    ];
}

impl std::fmt::Display for PollingRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} Hz", self.as_hz())
    }
}
