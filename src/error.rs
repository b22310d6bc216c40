//! Binding error types

use thiserror::Error;
use wooting_analog_ffi::{decode_status, status_from_value, LoadError, UNKNOWN_ERROR};

/// Errors surfaced by `AnalogInput`
#[derive(Error, Debug)]
pub enum AnalogError {
    /// A control call returned something other than `Ok`, or a count call
    /// returned a negative status
    #[error("{message} (status {code})")]
    Status { code: i32, message: &'static str },

    /// A single-value read returned a value outside `[0, 1]`
    #[error("Analog value {value} out of range: {message}")]
    OutOfRange {
        value: f32,
        code: Option<i32>,
        message: &'static str,
    },

    /// The native library could not be loaded
    #[error("Library load failed: {0}")]
    Load(#[from] LoadError),
}

impl AnalogError {
    pub(crate) fn status(code: i32) -> Self {
        Self::Status {
            code,
            message: decode_status(code),
        }
    }

    pub(crate) fn out_of_range(value: f32) -> Self {
        let code = status_from_value(value);
        Self::OutOfRange {
            value,
            code,
            message: code.map(decode_status).unwrap_or(UNKNOWN_ERROR),
        }
    }

    /// Native status code carried by this error, if any
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::Status { code, .. } => Some(*code),
            Self::OutOfRange { code, .. } => *code,
            Self::Load(_) => None,
        }
    }

    /// Decoded message of the native status
    pub fn message(&self) -> String {
        match self {
            Self::Status { message, .. } | Self::OutOfRange { message, .. } => message.to_string(),
            Self::Load(e) => e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = AnalogError::status(-1999);
        assert_eq!(err.code(), Some(-1999));
        assert_eq!(err.message(), "No devices are connected");
        assert_eq!(err.to_string(), "No devices are connected (status -1999)");
    }

    #[test]
    fn test_unknown_status() {
        let err = AnalogError::status(42);
        assert_eq!(err.message(), UNKNOWN_ERROR);
    }

    #[test]
    fn test_out_of_range_sentinel() {
        let err = AnalogError::out_of_range(-1998.0);
        assert_eq!(err.code(), Some(-1998));
        assert_eq!(err.message(), "Device has been disconnected");
    }

    #[test]
    fn test_out_of_range_fraction() {
        let err = AnalogError::out_of_range(1.25);
        assert_eq!(err.code(), None);
        assert_eq!(err.message(), UNKNOWN_ERROR);
    }

    #[test]
    fn test_load_error() {
        let err: AnalogError = LoadError::UnsupportedPlatform("freebsd".into()).into();
        assert_eq!(err.code(), None);
        assert!(err.to_string().contains("freebsd"));
    }
}
