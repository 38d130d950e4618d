//! open-glorious CLI: command-line mouse configuration tool.

use anyhow::Result;
use clap::{Parser, Subcommand};
use open_glorious_core::profile::{Color, LedMode, Profile};
use open_glorious_core::session::{self, MouseSession};
use open_glorious_core::transport::FeatureTransport;
use std::path::PathBuf;

struct CliFeatureTransport {
    device: hidapi::HidDevice,
}

impl CliFeatureTransport {
    /// Open the first supported mouse interface.
    ///
    /// The mouse enumerates several HID interfaces; only the one exposing the
    /// config feature report is usable, so each candidate is probed in turn.
    fn open_first_supported() -> Result<Self> {
        let devices = open_glorious_core::device::discover_devices()?;
        if devices.is_empty() {
            anyhow::bail!("No supported Glorious device found");
        }

        let api = hidapi::HidApi::new().map_err(|e| anyhow::anyhow!("hidapi init: {e}"))?;
        for info in &devices {
            let path = std::ffi::CString::new(info.path.as_str())
                .map_err(|e| anyhow::anyhow!("device path: {e}"))?;
            let device = match api.open_path(&path) {
                Ok(d) => d,
                Err(e) => {
                    tracing::debug!(path = %info.path, error = %e, "could not open interface");
                    continue;
                }
            };

            let transport = Self { device };
            if session::is_supported_interface(&transport) {
                return Ok(transport);
            }
        }

        anyhow::bail!("No interface with the config feature report found (permissions?)")
    }
}

impl FeatureTransport for CliFeatureTransport {
    fn send_feature_command(
        &self,
        _report_id: u8,
        data: &[u8],
    ) -> open_glorious_core::error::Result<usize> {
        self.device
            .send_feature_report(data)
            .map_err(|e| open_glorious_core::error::Error::Hid(format!("send_feature_report: {e}")))?;
        Ok(data.len())
    }

    fn read_feature_report(
        &self,
        report_id: u8,
        capacity: usize,
    ) -> open_glorious_core::error::Result<Vec<u8>> {
        let mut buf = vec![0u8; capacity];
        buf[0] = report_id;
        let n = self
            .device
            .get_feature_report(&mut buf)
            .map_err(|e| open_glorious_core::error::Error::Hid(format!("get_feature_report: {e}")))?;
        buf.truncate(n);
        Ok(buf)
    }

    fn write_feature_report(
        &self,
        _report_id: u8,
        data: &[u8],
    ) -> open_glorious_core::error::Result<usize> {
        self.device
            .send_feature_report(data)
            .map_err(|e| open_glorious_core::error::Error::Hid(format!("send_feature_report: {e}")))?;
        Ok(data.len())
    }

    fn has_report(&self, report_id: u8) -> bool {
        let mut desc = [0u8; 4096];
        match self.device.get_report_descriptor(&mut desc) {
            Ok(n) => descriptor_has_report_id(&desc[..n], report_id),
            Err(_) => false,
        }
    }
}

/// Scan a HID report descriptor for a Report ID global item.
fn descriptor_has_report_id(desc: &[u8], report_id: u8) -> bool {
    let mut i = 0;
    while i < desc.len() {
        let prefix = desc[i];
        if prefix == 0xFE {
            // Long item: size byte follows the prefix.
            if i + 1 >= desc.len() {
                return false;
            }
            i += 3 + desc[i + 1] as usize;
            continue;
        }
        let size = match prefix & 0x3 {
            3 => 4,
            s => s as usize,
        };
        // Report ID item: global type, tag 8 (prefix 0x85 for 1-byte payload).
        if prefix & 0xFC == 0x84 && size >= 1 && i + 1 < desc.len() && desc[i + 1] == report_id {
            return true;
        }
        i += 1 + size;
    }
    false
}

/// One read-edit-commit round trip against the first supported device.
fn with_session<T>(op: impl FnOnce(&mut MouseSession, &CliFeatureTransport, Profile) -> Result<T>) -> Result<T> {
    let transport = CliFeatureTransport::open_first_supported()?;
    let mut session = MouseSession::new();
    let profile = session.read_profile(&transport)?;
    op(&mut session, &transport, profile)
}

fn parse_color(s: &str) -> Result<Color> {
    Color::from_hex(s)
        .ok_or_else(|| anyhow::anyhow!("invalid color '{s}' (expected RRGGBB hex)"))
}

#[derive(Parser)]
#[command(
    name = "open-glorious",
    version,
    about = "Open-source Glorious / SinoWealth mouse configuration"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List connected Glorious mice.
    ListDevices,
    /// Show the full decoded device configuration.
    Show,
    /// Show the device firmware revision.
    FirmwareVersion,
    /// Set a DPI slot (100-12000, step 100). Omit --dpi-y for linked axes.
    SetDpi {
        /// DPI slot index (0-5).
        slot: usize,
        /// Horizontal DPI.
        dpi_x: u16,
        /// Vertical DPI (defaults to the horizontal value).
        #[arg(long)]
        dpi_y: Option<u16>,
    },
    /// Disable a DPI slot.
    DisableSlot {
        /// DPI slot index (0-5).
        slot: usize,
    },
    /// Make a DPI slot the active one.
    SetActive {
        /// DPI slot index (0-5).
        slot: usize,
    },
    /// Set the body LED: off, on, cycle, or breathing.
    SetLed {
        /// LED mode.
        mode: String,
        /// Color as RRGGBB hex (used by 'on' and 'breathing').
        #[arg(long)]
        color: Option<String>,
    },
    /// Set the indicator color for a DPI slot.
    SetDpiColor {
        /// DPI slot index (0-5).
        slot: usize,
        /// Color as RRGGBB hex.
        color: String,
    },
    /// Save the current device configuration to a JSON profile.
    SaveProfile {
        /// Destination file.
        path: PathBuf,
    },
    /// Load a JSON profile and write it to the device.
    LoadProfile {
        /// Source file.
        path: PathBuf,
    },
}

fn print_profile(profile: &Profile) {
    println!("Resolutions:");
    for r in &profile.resolutions {
        let marker = if r.is_active { " (active)" } else { "" };
        if r.is_disabled() {
            println!("  slot {}: disabled{marker}", r.index);
        } else if r.dpi_x == r.dpi_y {
            println!("  slot {}: {} DPI{marker}", r.index, r.dpi_x);
        } else {
            println!("  slot {}: {}x{} DPI{marker}", r.index, r.dpi_x, r.dpi_y);
        }
    }

    let body = profile.body_led();
    println!("Body LED: {} {}", body.mode, body.color);
    println!("DPI indicator colors:");
    for led in &profile.leds[1..] {
        println!("  slot {}: {}", led.index - 1, led.color);
    }
    println!("Report rate: {}", profile.report_rate);
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::ListDevices => {
            let devices = open_glorious_core::device::discover_devices()?;
            if devices.is_empty() {
                println!("No Glorious mice found.");
                println!("Ensure your mouse is connected and permissions are set up.");
            } else {
                for dev in &devices {
                    println!(
                        "{} (VID: 0x{:04X}, PID: 0x{:04X}, interface: {}, path: {})",
                        dev.model.name(),
                        dev.vid,
                        dev.pid,
                        dev.interface_number,
                        dev.path
                    );
                }
            }
        }
        Commands::Show => {
            with_session(|session, _, profile| {
                print_profile(&profile);
                if let Some(lod) = session.lift_off_distance() {
                    let mm = match lod {
                        open_glorious_core::config::LiftOffDistance::Mm2 => 2,
                        open_glorious_core::config::LiftOffDistance::Mm3 => 3,
                    };
                    println!("Lift-off distance: {mm} mm");
                }
                Ok(())
            })?;
        }
        Commands::FirmwareVersion => {
            let transport = CliFeatureTransport::open_first_supported()?;
            let [major, minor] = session::read_firmware_version(&transport)?;
            println!("Firmware version: {major:02X}.{minor:02X}");
        }
        Commands::SetDpi { slot, dpi_x, dpi_y } => {
            open_glorious_core::safety::validate_slot_index(slot)?;
            let dpi_x = open_glorious_core::safety::validate_dpi(dpi_x)?;
            let dpi_y = match dpi_y {
                Some(y) => open_glorious_core::safety::validate_dpi(y)?,
                None => dpi_x,
            };
            if dpi_x == 0 || dpi_y == 0 {
                anyhow::bail!("use disable-slot to disable a slot");
            }
            with_session(|session, transport, mut profile| {
                let r = profile.resolution_mut(slot).expect("slot validated");
                r.dpi_x = dpi_x;
                r.dpi_y = dpi_y;
                session.commit(transport, &profile)?;
                if dpi_x == dpi_y {
                    println!("Slot {slot} set to {dpi_x} DPI");
                } else {
                    println!("Slot {slot} set to {dpi_x}x{dpi_y} DPI");
                }
                Ok(())
            })?;
        }
        Commands::DisableSlot { slot } => {
            open_glorious_core::safety::validate_slot_index(slot)?;
            with_session(|session, transport, mut profile| {
                if profile.resolutions[slot].is_active {
                    anyhow::bail!("cannot disable the active slot");
                }
                let r = profile.resolution_mut(slot).expect("slot validated");
                r.dpi_x = 0;
                r.dpi_y = 0;
                session.commit(transport, &profile)?;
                println!("Slot {slot} disabled");
                Ok(())
            })?;
        }
        Commands::SetActive { slot } => {
            open_glorious_core::safety::validate_slot_index(slot)?;
            with_session(|session, transport, mut profile| {
                if profile.resolutions[slot].is_disabled() {
                    anyhow::bail!("slot {slot} is disabled; set a DPI value first");
                }
                profile.set_active_slot(slot)?;
                session.commit(transport, &profile)?;
                println!("Slot {slot} is now active");
                Ok(())
            })?;
        }
        Commands::SetLed { mode, color } => {
            let mode = LedMode::from_name(&mode).ok_or_else(|| {
                anyhow::anyhow!("Unknown LED mode '{mode}'. Valid modes: off, on, cycle, breathing")
            })?;
            let color = color.as_deref().map(parse_color).transpose()?;
            with_session(|session, transport, mut profile| {
                open_glorious_core::safety::validate_led_mode(profile.body_led(), mode)?;
                profile.body_led_mut().mode = mode;
                if let Some(color) = color {
                    profile.body_led_mut().color = color;
                }
                session.commit(transport, &profile)?;
                println!("Body LED set to {} {}", mode, profile.body_led().color);
                Ok(())
            })?;
        }
        Commands::SetDpiColor { slot, color } => {
            open_glorious_core::safety::validate_slot_index(slot)?;
            let color = parse_color(&color)?;
            with_session(|session, transport, mut profile| {
                profile
                    .indicator_led_mut(slot)
                    .expect("slot validated")
                    .color = color;
                session.commit(transport, &profile)?;
                println!("Slot {slot} indicator set to {color}");
                Ok(())
            })?;
        }
        Commands::SaveProfile { path } => {
            with_session(|_, _, profile| {
                open_glorious_core::profile::save_profile(&profile, &path)?;
                println!("Profile saved to {}", path.display());
                Ok(())
            })?;
        }
        Commands::LoadProfile { path } => {
            let loaded = open_glorious_core::profile::load_profile(&path)?;
            open_glorious_core::safety::validate_profile(&loaded)?;
            with_session(|session, transport, _| {
                session.commit(transport, &loaded)?;
                println!("Applied profile from {}", path.display());
                print_profile(&loaded);
                Ok(())
            })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::descriptor_has_report_id;

    // Fragment of a real descriptor: Usage Page, Usage, Collection,
    // Report ID 4, Report ID 5.
    const DESC: &[u8] = &[
        0x06, 0x00, 0xFF, // Usage Page (Vendor)
        0x09, 0x01, // Usage
        0xA1, 0x01, // Collection (Application)
        0x85, 0x04, // Report ID (4)
        0x85, 0x05, // Report ID (5)
        0xC0, // End Collection
    ];

    #[test]
    fn finds_declared_report_ids() {
        assert!(descriptor_has_report_id(DESC, 0x04));
        assert!(descriptor_has_report_id(DESC, 0x05));
    }

    #[test]
    fn rejects_undeclared_report_id() {
        assert!(!descriptor_has_report_id(DESC, 0x11));
        // 0x04 appears as a payload byte above but only counts after an
        // item prefix; an empty descriptor has nothing.
        assert!(!descriptor_has_report_id(&[], 0x04));
    }

    #[test]
    fn skips_payload_bytes_that_look_like_prefixes() {
        // Usage Page (Vendor, 0xFF00) carries 0x00 0xFF payload bytes; the
        // scanner must not interpret them as items.
        assert!(!descriptor_has_report_id(&[0x06, 0x85, 0x04], 0x04));
    }
}
