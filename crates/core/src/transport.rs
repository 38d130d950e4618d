//! HID feature-report transport abstraction.
//!
//! SinoWealth mice are configured entirely through numbered feature reports,
//! so the transport surface is small: send a command report, read or write
//! the config report, and probe which report IDs an interface exposes.
//! A trait keeps real HID devices and mock devices behind the same interface.

use crate::error::{Error, Result};
use tracing::{trace, warn};

/// Abstraction over HID feature-report I/O.
pub trait FeatureTransport: Send {
    /// Send a feature report carrying a command; returns the byte count the
    /// HID layer reports as written.
    fn send_feature_command(&self, report_id: u8, data: &[u8]) -> Result<usize>;

    /// Read a feature report of up to `capacity` bytes for `report_id`.
    fn read_feature_report(&self, report_id: u8, capacity: usize) -> Result<Vec<u8>>;

    /// Write a feature report; returns the byte count the HID layer reports
    /// as written.
    fn write_feature_report(&self, report_id: u8, data: &[u8]) -> Result<usize>;

    /// Whether the interface exposes the given report ID.
    ///
    /// Used to detect whether this driver applies to a connected interface;
    /// only one of the device's interfaces carries the config report.
    fn has_report(&self, report_id: u8) -> bool;
}

/// Send a command feature report and verify it was written in full.
pub fn send_command(transport: &dyn FeatureTransport, report_id: u8, data: &[u8]) -> Result<()> {
    trace!(
        report_id = format_args!("0x{report_id:X}"),
        data_hex = format_args!("{data:02X?}"),
        "command TX"
    );

    let written = transport.send_feature_command(report_id, data)?;
    if written != data.len() {
        warn!(
            expected = data.len(),
            actual = written,
            "command feature report short write"
        );
        return Err(Error::CommandFailed {
            expected: data.len(),
            actual: written,
        });
    }
    Ok(())
}

/// A mock HID transport for testing.
///
/// Feature-report data is preloaded per report ID; commands and writes are
/// recorded for inspection, and reported byte counts can be overridden to
/// simulate partial transfers.
#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock transport backed by a per-report-ID feature data store.
    pub struct MockTransport {
        feature_data: Mutex<HashMap<u8, Vec<u8>>>,
        commands: Mutex<Vec<(u8, Vec<u8>)>>,
        writes: Mutex<Vec<(u8, Vec<u8>)>>,
        command_result: Mutex<Option<usize>>,
        write_result: Mutex<Option<usize>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self {
                feature_data: Mutex::new(HashMap::new()),
                commands: Mutex::new(Vec::new()),
                writes: Mutex::new(Vec::new()),
                command_result: Mutex::new(None),
                write_result: Mutex::new(None),
            }
        }

        /// Preload the data a `read_feature_report` for `report_id` returns.
        pub fn set_feature_report(&self, report_id: u8, data: Vec<u8>) {
            self.feature_data.lock().unwrap().insert(report_id, data);
        }

        /// Force `send_feature_command` to report `n` bytes written.
        pub fn fail_command_with(&self, n: usize) {
            *self.command_result.lock().unwrap() = Some(n);
        }

        /// Force `write_feature_report` to report `n` bytes written.
        pub fn fail_write_with(&self, n: usize) {
            *self.write_result.lock().unwrap() = Some(n);
        }

        /// All commands sent so far, in order.
        pub fn sent_commands(&self) -> Vec<(u8, Vec<u8>)> {
            self.commands.lock().unwrap().clone()
        }

        /// The most recent write for `report_id`, if any.
        pub fn last_write(&self, report_id: u8) -> Option<Vec<u8>> {
            self.writes
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find(|(id, _)| *id == report_id)
                .map(|(_, data)| data.clone())
        }
    }

    impl FeatureTransport for MockTransport {
        fn send_feature_command(&self, report_id: u8, data: &[u8]) -> Result<usize> {
            self.commands
                .lock()
                .unwrap()
                .push((report_id, data.to_vec()));
            Ok(self
                .command_result
                .lock()
                .unwrap()
                .unwrap_or(data.len()))
        }

        fn read_feature_report(&self, report_id: u8, capacity: usize) -> Result<Vec<u8>> {
            let data = self.feature_data.lock().unwrap();
            let report = data.get(&report_id).ok_or_else(|| {
                Error::Hid(format!(
                    "mock: no feature report registered for ID 0x{report_id:X}"
                ))
            })?;
            let len = report.len().min(capacity);
            Ok(report[..len].to_vec())
        }

        fn write_feature_report(&self, report_id: u8, data: &[u8]) -> Result<usize> {
            self.writes.lock().unwrap().push((report_id, data.to_vec()));
            Ok(self.write_result.lock().unwrap().unwrap_or(data.len()))
        }

        fn has_report(&self, report_id: u8) -> bool {
            self.feature_data.lock().unwrap().contains_key(&report_id)
        }
    }
}
