//! Per-device session state: the read-then-modify-then-write cycle.
//!
//! A [`MouseSession`] owns the last config record read from one device and
//! merges profile edits over it on commit. Each read or write is a single
//! blocking feature-report round-trip; nothing is retried here, a failed
//! transfer surfaces straight to the caller.

use crate::codec::{decode_profile, encode_profile};
use crate::config::{
    build_command, ConfigReport, LiftOffDistance, CMD_FIRMWARE_VERSION, CMD_GET_CONFIG, CMD_LEN,
    CONFIG_REPORT_LEN, REPORT_ID_CMD, REPORT_ID_CONFIG,
};
use crate::error::{Error, Result};
use crate::profile::Profile;
use crate::safety::validate_profile;
use crate::transport::{send_command, FeatureTransport};
use tracing::{debug, warn};

/// Whether the opened interface speaks this protocol.
///
/// Only one of the device's HID interfaces carries the config report.
pub fn is_supported_interface(transport: &dyn FeatureTransport) -> bool {
    transport.has_report(REPORT_ID_CONFIG)
}

/// Read the device's 2-byte firmware revision.
///
/// The command report doubles as the response container: the device patches
/// the version into the report, which is then read back.
pub fn read_firmware_version(transport: &dyn FeatureTransport) -> Result<[u8; 2]> {
    send_command(transport, REPORT_ID_CMD, &build_command(CMD_FIRMWARE_VERSION))?;

    let data = transport.read_feature_report(REPORT_ID_CMD, CMD_LEN)?;
    if data.len() < 4 {
        return Err(Error::ReadTooShort {
            needed: 4,
            actual: data.len(),
        });
    }
    Ok([data[2], data[3]])
}

/// Session state for one connected mouse.
///
/// Owns the raw record across the read-then-modify-then-write cycle so
/// unmodeled bytes survive a round-trip. Dropped with the device connection.
#[derive(Debug, Default)]
pub struct MouseSession {
    config: Option<ConfigReport>,
}

impl MouseSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch and decode the device configuration.
    ///
    /// Issues the "get config" command, then reads the config feature report
    /// and parses its leading bytes. The session record is only replaced
    /// once the whole fetch succeeded, so a short read leaves prior state
    /// (and the caller's host model) untouched.
    pub fn read_profile(&mut self, transport: &dyn FeatureTransport) -> Result<Profile> {
        send_command(transport, REPORT_ID_CMD, &build_command(CMD_GET_CONFIG))?;

        let data = transport.read_feature_report(REPORT_ID_CONFIG, CONFIG_REPORT_LEN)?;
        debug!(len = data.len(), "Config feature report read");

        let config = ConfigReport::from_bytes(&data)?;
        let profile = decode_profile(&config);
        self.config = Some(config);
        Ok(profile)
    }

    /// Encode the profile over the last-read record and write it back.
    ///
    /// The profile is structurally validated first: the encoder indexes
    /// record arrays straight from it, so a malformed profile (loaded from
    /// disk, say) is rejected here rather than reaching the codec.
    ///
    /// Encoding happens on a staged copy; the session record is only swapped
    /// once the device acknowledged the full-length write, so a failed
    /// commit leaves the session holding the last state the device confirmed.
    pub fn commit(&mut self, transport: &dyn FeatureTransport, profile: &Profile) -> Result<()> {
        validate_profile(profile)?;

        let base = self.config.as_ref().ok_or_else(|| {
            Error::Profile("no configuration read from the device yet".to_string())
        })?;

        let mut staged = base.clone();
        encode_profile(profile, &mut staged);

        let buf = staged.to_transfer_buf();
        let written = transport.write_feature_report(REPORT_ID_CONFIG, &buf)?;
        if written != CONFIG_REPORT_LEN {
            warn!(
                expected = CONFIG_REPORT_LEN,
                actual = written,
                "config feature report short write"
            );
            return Err(Error::WriteFailed {
                expected: CONFIG_REPORT_LEN,
                actual: written,
            });
        }

        self.config = Some(staged);
        Ok(())
    }

    /// Lift-off distance from the last-read record, if any.
    pub fn lift_off_distance(&self) -> Option<LiftOffDistance> {
        self.config
            .as_ref()
            .and_then(|c| LiftOffDistance::from_byte(c.lift_off_distance))
    }

    /// The last record read from or confirmed written to the device.
    pub fn last_config(&self) -> Option<&ConfigReport> {
        self.config.as_ref()
    }
}
