//! Dynamic loading of the native wrapper library
//!
//! The wrapper is resolved by a fixed, platform-dependent file name. Every
//! exported entry point is looked up once at load time; a missing symbol fails
//! the load rather than the first call.

use std::ffi::{c_int, c_uint, c_ushort};
use std::path::Path;

use libloading::Library;
use tracing::{debug, info};

use crate::error::LoadError;
use crate::types::{DeviceId, DeviceInfoFfi};
use crate::{AnalogSdk, DeviceEventCallback};

pub const WINDOWS_LIBRARY: &str = "wooting_analog_wrapper.dll";
pub const LINUX_LIBRARY: &str = "libwooting_analog_wrapper.so";
pub const MACOS_LIBRARY: &str = "libwooting_analog_wrapper.dylib";

/// Library file name for the platform this binary was built for
pub fn library_file_name() -> Result<&'static str, LoadError> {
    library_file_name_for(std::env::consts::OS)
}

/// Library file name for an OS name as reported by `std::env::consts::OS`
pub fn library_file_name_for(os: &str) -> Result<&'static str, LoadError> {
    match os {
        "windows" => Ok(WINDOWS_LIBRARY),
        "linux" => Ok(LINUX_LIBRARY),
        "macos" => Ok(MACOS_LIBRARY),
        other => Err(LoadError::UnsupportedPlatform(other.to_string())),
    }
}

type StatusFn = unsafe extern "C" fn() -> c_int;
type IsInitialisedFn = unsafe extern "C" fn() -> bool;
type SetKeycodeModeFn = unsafe extern "C" fn(c_int) -> c_int;
type ReadAnalogFn = unsafe extern "C" fn(c_ushort) -> f32;
type ReadAnalogDeviceFn = unsafe extern "C" fn(c_ushort, u64) -> f32;
type ReadFullBufferFn = unsafe extern "C" fn(*mut c_ushort, *mut f32, c_uint) -> c_int;
type ReadFullBufferDeviceFn = unsafe extern "C" fn(*mut c_ushort, *mut f32, c_uint, u64) -> c_int;
type GetDevicesFn = unsafe extern "C" fn(*mut *mut DeviceInfoFfi, c_uint) -> c_int;
type SetDeviceEventCbFn = unsafe extern "C" fn(DeviceEventCallback) -> c_int;

/// `AnalogSdk` backed by the dynamically loaded wrapper library
pub struct NativeSdk {
    clear_device_event_cb: StatusFn,
    get_connected_devices_info: GetDevicesFn,
    initialise: StatusFn,
    is_initialised: IsInitialisedFn,
    read_analog: ReadAnalogFn,
    read_analog_device: ReadAnalogDeviceFn,
    read_full_buffer: ReadFullBufferFn,
    read_full_buffer_device: ReadFullBufferDeviceFn,
    set_device_event_cb: SetDeviceEventCbFn,
    set_keycode_mode: SetKeycodeModeFn,
    uninitialise: StatusFn,
    // Keeps the function pointers above valid
    _library: Library,
}

impl NativeSdk {
    /// Load the wrapper by its platform file name from the system search path
    pub fn load() -> Result<Self, LoadError> {
        let name = library_file_name()?;
        Self::load_from(name)
    }

    /// Load the wrapper from an explicit path
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        debug!("Loading analog wrapper from {}", path.display());

        // SAFETY: loading runs the library's initialisers; the wrapper has no
        // load-time requirements beyond being a valid shared object.
        let library = unsafe { Library::new(path) }.map_err(|e| LoadError::Library {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        // SAFETY: each type alias matches the signature exported by the
        // wrapper's C header.
        let sdk = unsafe {
            Self {
                clear_device_event_cb: symbol(&library, "wooting_analog_clear_device_event_cb")?,
                get_connected_devices_info: symbol(
                    &library,
                    "wooting_analog_get_connected_devices_info",
                )?,
                initialise: symbol(&library, "wooting_analog_initialise")?,
                is_initialised: symbol(&library, "wooting_analog_is_initialised")?,
                read_analog: symbol(&library, "wooting_analog_read_analog")?,
                read_analog_device: symbol(&library, "wooting_analog_read_analog_device")?,
                read_full_buffer: symbol(&library, "wooting_analog_read_full_buffer")?,
                read_full_buffer_device: symbol(
                    &library,
                    "wooting_analog_read_full_buffer_device",
                )?,
                set_device_event_cb: symbol(&library, "wooting_analog_set_device_event_cb")?,
                set_keycode_mode: symbol(&library, "wooting_analog_set_keycode_mode")?,
                uninitialise: symbol(&library, "wooting_analog_uninitialise")?,
                _library: library,
            }
        };

        info!("Loaded analog wrapper: {}", path.display());
        Ok(sdk)
    }
}

unsafe fn symbol<T: Copy>(library: &Library, name: &'static str) -> Result<T, LoadError> {
    library
        .get::<T>(name.as_bytes())
        .map(|sym| *sym)
        .map_err(|e| LoadError::MissingSymbol {
            symbol: name,
            message: e.to_string(),
        })
}

/// Buffer capacity as passed across the ABI
fn abi_len(len: usize) -> c_uint {
    c_uint::try_from(len).unwrap_or(c_uint::MAX)
}

impl AnalogSdk for NativeSdk {
    fn initialise(&self) -> c_int {
        unsafe { (self.initialise)() }
    }

    fn is_initialised(&self) -> bool {
        unsafe { (self.is_initialised)() }
    }

    fn uninitialise(&self) -> c_int {
        unsafe { (self.uninitialise)() }
    }

    fn set_keycode_mode(&self, mode: c_int) -> c_int {
        unsafe { (self.set_keycode_mode)(mode) }
    }

    fn read_analog(&self, code: u16) -> f32 {
        unsafe { (self.read_analog)(code) }
    }

    fn read_analog_device(&self, code: u16, device_id: DeviceId) -> f32 {
        unsafe { (self.read_analog_device)(code, device_id.0) }
    }

    fn read_full_buffer(&self, codes: &mut [u16], analog: &mut [f32]) -> c_int {
        let len = abi_len(codes.len().min(analog.len()));
        // SAFETY: both buffers hold at least `len` elements.
        unsafe { (self.read_full_buffer)(codes.as_mut_ptr(), analog.as_mut_ptr(), len) }
    }

    fn read_full_buffer_device(
        &self,
        codes: &mut [u16],
        analog: &mut [f32],
        device_id: DeviceId,
    ) -> c_int {
        let len = abi_len(codes.len().min(analog.len()));
        // SAFETY: both buffers hold at least `len` elements.
        unsafe {
            (self.read_full_buffer_device)(codes.as_mut_ptr(), analog.as_mut_ptr(), len, device_id.0)
        }
    }

    fn get_connected_devices_info(&self, buffer: &mut [*mut DeviceInfoFfi]) -> c_int {
        unsafe { (self.get_connected_devices_info)(buffer.as_mut_ptr(), abi_len(buffer.len())) }
    }

    fn set_device_event_cb(&self, callback: DeviceEventCallback) -> c_int {
        unsafe { (self.set_device_event_cb)(callback) }
    }

    fn clear_device_event_cb(&self) -> c_int {
        unsafe { (self.clear_device_event_cb)() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_platform_names() {
        assert_eq!(
            library_file_name_for("windows").unwrap(),
            "wooting_analog_wrapper.dll"
        );
        assert_eq!(
            library_file_name_for("linux").unwrap(),
            "libwooting_analog_wrapper.so"
        );
        assert_eq!(
            library_file_name_for("macos").unwrap(),
            "libwooting_analog_wrapper.dylib"
        );
    }

    #[test]
    fn test_unsupported_platform() {
        for os in ["freebsd", "android", "ios", ""] {
            match library_file_name_for(os) {
                Err(LoadError::UnsupportedPlatform(name)) => assert_eq!(name, os),
                other => panic!("expected UnsupportedPlatform for {os:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_missing_library_fails_to_load() {
        let result = NativeSdk::load_from("/nonexistent/libwooting_analog_wrapper.so");
        assert!(matches!(result, Err(LoadError::Library { .. })));
    }

    #[test]
    fn test_abi_len_saturates() {
        assert_eq!(abi_len(16), 16);
        if usize::BITS > 32 {
            assert_eq!(abi_len(usize::MAX), c_uint::MAX);
        }
    }
}
