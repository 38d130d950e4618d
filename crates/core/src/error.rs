//! Error types for open-glorious-core.

use thiserror::Error;

/// Core library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// HID device communication failure.
    #[error("HID error: {0}")]
    Hid(String),

    /// Device not found during enumeration.
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    /// A command feature report was not written in full.
    #[error("command write returned {actual} bytes (expected {expected})")]
    CommandFailed { expected: usize, actual: usize },

    /// The config feature report returned fewer bytes than the record needs.
    #[error("config read returned {actual} bytes (need at least {needed})")]
    ReadTooShort { needed: usize, actual: usize },

    /// The config feature report was not written in full.
    #[error("config write returned {actual} bytes (expected {expected})")]
    WriteFailed { expected: usize, actual: usize },

    /// Value out of safe range.
    #[error("value out of range: {field} = {value} (allowed {min}..={max})")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    /// Profile serialization/deserialization error.
    #[error("profile error: {0}")]
    Profile(String),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;
