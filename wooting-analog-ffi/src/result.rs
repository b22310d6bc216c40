//! Native result codes (`WootingAnalogResult`) and their decoded messages

use std::ffi::c_int;

/// Message returned for codes the native library does not document
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Result codes returned by the native wrapper library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum AnalogResult {
    Ok = 1,
    UnInitialized = -2000,
    NoDevices = -1999,
    DeviceDisconnected = -1998,
    Failure = -1997,
    InvalidArgument = -1996,
    NoPlugins = -1995,
    FunctionNotFound = -1994,
    NoMapping = -1993,
    NotAvailable = -1992,
    IncompatibleVersion = -1991,
    DllNotFound = -1990,
}

impl AnalogResult {
    pub const ALL: &'static [AnalogResult] = &[
        AnalogResult::Ok,
        AnalogResult::UnInitialized,
        AnalogResult::NoDevices,
        AnalogResult::DeviceDisconnected,
        AnalogResult::Failure,
        AnalogResult::InvalidArgument,
        AnalogResult::NoPlugins,
        AnalogResult::FunctionNotFound,
        AnalogResult::NoMapping,
        AnalogResult::NotAvailable,
        AnalogResult::IncompatibleVersion,
        AnalogResult::DllNotFound,
    ];

    pub fn from_code(code: c_int) -> Option<Self> {
        Self::ALL.iter().copied().find(|r| r.code() == code)
    }

    pub fn code(self) -> c_int {
        self as c_int
    }

    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }

    /// Name as exported by the native header
    pub fn name(self) -> &'static str {
        match self {
            Self::Ok => "Ok",
            Self::UnInitialized => "UnInitialized",
            Self::NoDevices => "NoDevices",
            Self::DeviceDisconnected => "DeviceDisconnected",
            Self::Failure => "Failure",
            Self::InvalidArgument => "InvalidArgument",
            Self::NoPlugins => "NoPlugins",
            Self::FunctionNotFound => "FunctionNotFound",
            Self::NoMapping => "NoMapping",
            Self::NotAvailable => "NotAvailable",
            Self::IncompatibleVersion => "IncompatibleVersion",
            Self::DllNotFound => "DLLNotFound",
        }
    }

    /// Human-readable description
    pub fn message(self) -> &'static str {
        match self {
            Self::Ok => "Ok",
            Self::UnInitialized => "Item hasn't been initialized",
            Self::NoDevices => "No devices are connected",
            Self::DeviceDisconnected => "Device has been disconnected",
            Self::Failure => "Generic failure",
            Self::InvalidArgument => "A given parameter was invalid",
            Self::NoPlugins => "No plugins were found",
            Self::FunctionNotFound => "The specified function was not found in the library",
            Self::NoMapping => "No keycode mapping to HID was found for the given keycode",
            Self::NotAvailable => "The current operation is not available",
            Self::IncompatibleVersion => "Incompatible SDK version",
            Self::DllNotFound => "The Wooting Analog SDK could not be found on the system",
        }
    }
}

/// Decode a native status into its message, `UNKNOWN_ERROR` if unmapped
pub fn decode_status(code: c_int) -> &'static str {
    AnalogResult::from_code(code)
        .map(AnalogResult::message)
        .unwrap_or(UNKNOWN_ERROR)
}

/// Status code carried by an out-of-range analog value
///
/// The read calls return negative result codes cast to float. Only integral
/// values are treated as codes; anything else (NaN, 1.5, ...) has none.
pub fn status_from_value(value: f32) -> Option<c_int> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= c_int::MAX as f32 {
        Some(value as c_int)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(AnalogResult::from_code(1), Some(AnalogResult::Ok));
        assert_eq!(
            AnalogResult::from_code(-2000),
            Some(AnalogResult::UnInitialized)
        );
        assert_eq!(
            AnalogResult::from_code(-1990),
            Some(AnalogResult::DllNotFound)
        );
        for result in AnalogResult::ALL {
            assert_eq!(AnalogResult::from_code(result.code()), Some(*result));
        }
    }

    #[test]
    fn test_decode_every_known_code() {
        let expected = [
            (1, "Ok"),
            (-2000, "Item hasn't been initialized"),
            (-1999, "No devices are connected"),
            (-1998, "Device has been disconnected"),
            (-1997, "Generic failure"),
            (-1996, "A given parameter was invalid"),
            (-1995, "No plugins were found"),
            (-1994, "The specified function was not found in the library"),
            (-1993, "No keycode mapping to HID was found for the given keycode"),
            (-1992, "The current operation is not available"),
            (-1991, "Incompatible SDK version"),
            (-1990, "The Wooting Analog SDK could not be found on the system"),
        ];
        assert_eq!(expected.len(), AnalogResult::ALL.len());
        for (code, message) in expected {
            assert_eq!(decode_status(code), message, "code {code}");
        }
    }

    #[test]
    fn test_names_and_ok() {
        assert_eq!(AnalogResult::Ok.name(), "Ok");
        assert_eq!(AnalogResult::UnInitialized.name(), "UnInitialized");
        assert_eq!(AnalogResult::DllNotFound.name(), "DLLNotFound");
        assert!(AnalogResult::Ok.is_ok());
        assert_eq!(
            AnalogResult::ALL.iter().filter(|r| r.is_ok()).count(),
            1
        );
    }

    #[test]
    fn test_decode_unknown_codes() {
        for code in [0, 2, -1, -1989, -2001, i32::MIN, i32::MAX] {
            assert_eq!(decode_status(code), UNKNOWN_ERROR, "code {code}");
        }
    }

    #[test]
    fn test_status_from_value() {
        assert_eq!(status_from_value(-1998.0), Some(-1998));
        assert_eq!(status_from_value(2.0), Some(2));
        assert_eq!(status_from_value(1.5), None);
        assert_eq!(status_from_value(-0.25), None);
        assert_eq!(status_from_value(f32::NAN), None);
        assert_eq!(status_from_value(f32::INFINITY), None);
    }
}
