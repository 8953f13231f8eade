//! Error types for the weather station firmware.
//!
//! Each subsystem returns its own small error.  All of them are `Copy` so
//! they can be stored as "last fault" state and passed through events
//! without allocation.  The binary wraps startup failures in `anyhow`.

use core::fmt;

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The I2C transaction was not acknowledged or timed out.
    I2cTimeout,
    /// The device returned a frame whose CRC does not match.
    ChecksumMismatch,
    /// The device is still busy with a conversion or reports no calibration.
    NotReady,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I2cTimeout => write!(f, "I2C timeout"),
            Self::ChecksumMismatch => write!(f, "checksum mismatch"),
            Self::NotReady => write!(f, "sensor not ready"),
        }
    }
}

// ---------------------------------------------------------------------------
// Calibration query errors
// ---------------------------------------------------------------------------

/// Why a `key=value&...` calibration query was rejected.
/// The payload names the offending key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// The key was absent or out of position.
    MissingField(&'static str),
    /// The key was present but its value is not a number.
    InvalidNumber(&'static str),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(key) => write!(f, "missing field '{key}'"),
            Self::InvalidNumber(key) => write!(f, "invalid number for '{key}'"),
        }
    }
}

// ---------------------------------------------------------------------------
// Network errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetError {
    WifiInitFailed,
    WifiConnectFailed,
    InvalidCredentials,
    BindFailed,
}

impl fmt::Display for NetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WifiInitFailed => write!(f, "WiFi driver init failed"),
            Self::WifiConnectFailed => write!(f, "WiFi association failed"),
            Self::InvalidCredentials => write!(f, "WiFi credentials invalid"),
            Self::BindFailed => write!(f, "HTTP listener bind failed"),
        }
    }
}
