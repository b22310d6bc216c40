//! ABI records and enumerations shared with the native wrapper library

use serde::{Deserialize, Serialize};
use std::ffi::{c_char, c_int, CStr};
use std::fmt;

/// Opaque device handle assigned by the native library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(pub u64);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Device descriptor as laid out by the native library (`DeviceInfo_FFI`)
///
/// Only ever written by native code. The name pointers are owned by the
/// library and are not guaranteed to outlive the call that produced them.
#[repr(C)]
#[derive(Debug)]
pub struct DeviceInfoFfi {
    pub vendor_id: u16,
    pub product_id: u16,
    pub manufacturer_name: *const c_char,
    pub device_name: *const c_char,
    pub device_id: u64,
}

/// Owned snapshot of a device descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// USB Vendor ID
    pub vendor_id: u16,
    /// USB Product ID
    pub product_id: u16,
    pub manufacturer_name: String,
    pub device_name: String,
    /// Handle for the device-scoped read calls
    pub device_id: DeviceId,
}

impl DeviceInfo {
    /// Copy a native descriptor into an owned value
    ///
    /// Returns `None` for a null pointer. Null name pointers decode as empty
    /// strings, invalid UTF-8 is replaced lossily.
    ///
    /// # Safety
    ///
    /// `raw` must be null or point to a descriptor whose name pointers are
    /// null or valid NUL-terminated strings for the duration of this call.
    pub unsafe fn from_raw(raw: *const DeviceInfoFfi) -> Option<Self> {
        let raw = raw.as_ref()?;
        Some(Self {
            vendor_id: raw.vendor_id,
            product_id: raw.product_id,
            manufacturer_name: c_string_lossy(raw.manufacturer_name),
            device_name: c_string_lossy(raw.device_name),
            device_id: DeviceId(raw.device_id),
        })
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({:04x}:{:04x}, id {})",
            self.manufacturer_name, self.device_name, self.vendor_id, self.product_id, self.device_id
        )
    }
}

unsafe fn c_string_lossy(ptr: *const c_char) -> String {
    if ptr.is_null() {
        String::new()
    } else {
        CStr::from_ptr(ptr).to_string_lossy().into_owned()
    }
}

/// Device hot-plug event type (`WootingAnalog_DeviceEventType`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum DeviceEventType {
    Connected = 1,
    Disconnected = 2,
}

impl DeviceEventType {
    pub fn from_raw(raw: c_int) -> Option<Self> {
        match raw {
            1 => Some(Self::Connected),
            2 => Some(Self::Disconnected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        }
    }
}

/// Keycode interpretation used by the read calls (`WootingAnalog_KeycodeType`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(i32)]
pub enum KeycodeType {
    /// USB HID keyboard usage codes
    #[default]
    #[serde(rename = "HID", alias = "hid")]
    Hid = 0,
    /// Scan code set 1
    #[serde(alias = "scancode1")]
    ScanCode1 = 1,
    /// Windows virtual keys
    #[serde(alias = "virtualkey")]
    VirtualKey = 2,
    /// Windows virtual keys, translated to the current keyboard layout
    #[serde(alias = "virtualkeytranslate")]
    VirtualKeyTranslate = 3,
}

impl KeycodeType {
    pub const ALL: &'static [KeycodeType] = &[
        KeycodeType::Hid,
        KeycodeType::ScanCode1,
        KeycodeType::VirtualKey,
        KeycodeType::VirtualKeyTranslate,
    ];

    pub fn from_raw(raw: c_int) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| *m as c_int == raw)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hid => "HID",
            Self::ScanCode1 => "ScanCode1",
            Self::VirtualKey => "VirtualKey",
            Self::VirtualKeyTranslate => "VirtualKeyTranslate",
        }
    }
}

impl std::str::FromStr for KeycodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown keycode mode: \"{s}\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;
    use std::ptr;

    #[test]
    fn test_descriptor_layout() {
        // u16 + u16 + pad + 2 pointers + u64
        let ptr_size = std::mem::size_of::<*const c_char>();
        let expected = if ptr_size == 8 { 32 } else { 20 };
        assert_eq!(std::mem::size_of::<DeviceInfoFfi>(), expected);
        assert_eq!(std::mem::offset_of!(DeviceInfoFfi, product_id), 2);
    }

    #[test]
    fn test_decode_descriptor() {
        let manufacturer = CString::new("Wooting").unwrap();
        let name = CString::new("Wooting Two HE").unwrap();
        let raw = DeviceInfoFfi {
            vendor_id: 0x31E3,
            product_id: 0x1220,
            manufacturer_name: manufacturer.as_ptr(),
            device_name: name.as_ptr(),
            device_id: 0xDEAD_BEEF,
        };

        let info = unsafe { DeviceInfo::from_raw(&raw) }.unwrap();
        assert_eq!(info.vendor_id, 0x31E3);
        assert_eq!(info.product_id, 0x1220);
        assert_eq!(info.manufacturer_name, "Wooting");
        assert_eq!(info.device_name, "Wooting Two HE");
        assert_eq!(info.device_id, DeviceId(0xDEAD_BEEF));
    }

    #[test]
    fn test_decode_null_names() {
        let raw = DeviceInfoFfi {
            vendor_id: 1,
            product_id: 2,
            manufacturer_name: ptr::null(),
            device_name: ptr::null(),
            device_id: 3,
        };
        let info = unsafe { DeviceInfo::from_raw(&raw) }.unwrap();
        assert!(info.manufacturer_name.is_empty());
        assert!(info.device_name.is_empty());
    }

    #[test]
    fn test_decode_null_record() {
        assert!(unsafe { DeviceInfo::from_raw(ptr::null()) }.is_none());
    }

    #[test]
    fn test_event_type_codes() {
        assert_eq!(DeviceEventType::from_raw(1), Some(DeviceEventType::Connected));
        assert_eq!(
            DeviceEventType::from_raw(2),
            Some(DeviceEventType::Disconnected)
        );
        assert_eq!(DeviceEventType::from_raw(0), None);
        assert_eq!(DeviceEventType::from_raw(3), None);
    }

    #[test]
    fn test_keycode_type_parse() {
        assert_eq!("hid".parse::<KeycodeType>(), Ok(KeycodeType::Hid));
        assert_eq!(
            "VirtualKeyTranslate".parse::<KeycodeType>(),
            Ok(KeycodeType::VirtualKeyTranslate)
        );
        assert!("scancode2".parse::<KeycodeType>().is_err());
        assert_eq!(KeycodeType::from_raw(1), Some(KeycodeType::ScanCode1));
        assert_eq!(KeycodeType::from_raw(4), None);
    }

    #[test]
    fn test_keycode_type_serde_names() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            mode: KeycodeType,
        }

        let text = toml::to_string(&Wrapper { mode: KeycodeType::Hid }).unwrap();
        assert_eq!(text.trim(), "mode = \"HID\"");

        for (input, expected) in [
            ("HID", KeycodeType::Hid),
            ("hid", KeycodeType::Hid),
            ("ScanCode1", KeycodeType::ScanCode1),
            ("virtualkeytranslate", KeycodeType::VirtualKeyTranslate),
        ] {
            let parsed: Wrapper = toml::from_str(&format!("mode = \"{input}\"")).unwrap();
            assert_eq!(parsed.mode, expected);
        }

        #[derive(Deserialize)]
        struct IdWrapper {
            id: DeviceId,
        }
        let parsed: IdWrapper = toml::from_str("id = 42").unwrap();
        assert_eq!(parsed.id, DeviceId(42));
    }
}
