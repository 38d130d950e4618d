//! open-glorious-core: SinoWealth config codec, device discovery, and mouse configuration.
//!
//! This crate provides the cross-platform core logic for communicating with
//! Glorious (and other SinoWealth-based) gaming mice via HID feature reports.
//! The device keeps its entire configuration in one fixed-layout report; the
//! host reads it, edits the decoded profile, and writes the whole record back.

pub mod codec;
pub mod config;
pub mod convert;
pub mod device;
pub mod error;
pub mod profile;
pub mod safety;
pub mod session;
pub mod transport;

/// Glorious (SinoWealth) USB Vendor ID.
pub const GLORIOUS_VID: u16 = 0x258A;

/// Known Glorious product IDs.
pub mod pids {
    /// Glorious Model O.
    pub const MODEL_O: u16 = 0x0036;
    /// Glorious Model O- (minus).
    pub const MODEL_O_MINUS: u16 = 0x0037;
    /// Glorious Model D.
    pub const MODEL_D: u16 = 0x0033;
}
