//! Raw ABI surface of the Wooting analog wrapper library
//!
//! This crate mirrors the wrapper's exported C interface:
//!
//! - `types`: the device descriptor record and the event/keycode enumerations
//! - `result`: result codes and their decoded messages
//! - `keycodes`: HID, virtual-key and scan code tables
//! - `library`: platform library resolution and the dynamically loaded `NativeSdk`
//! - `mock`: `MockSdk`, a simulated library for tests and offline use
//!
//! Calls on `AnalogSdk` return raw native results. Interpreting them is left
//! to the caller.

pub mod error;
pub mod keycodes;
pub mod library;
pub mod mock;
pub mod result;
pub mod types;

pub use error::LoadError;
pub use keycodes::{key_code_from_name, key_name, HidCode, ScanCode1, VirtualKey};
pub use library::{
    library_file_name, library_file_name_for, NativeSdk, LINUX_LIBRARY, MACOS_LIBRARY,
    WINDOWS_LIBRARY,
};
pub use mock::{MockCall, MockSdk};
pub use result::{decode_status, status_from_value, AnalogResult, UNKNOWN_ERROR};
pub use types::{DeviceEventType, DeviceId, DeviceInfo, DeviceInfoFfi, KeycodeType};

use std::ffi::c_int;
use std::sync::Arc;

/// Device-event callback as registered with the native library
///
/// Invoked on a native thread with the raw event type and a descriptor that
/// is only valid for the duration of the call.
pub type DeviceEventCallback = extern "C" fn(event_type: c_int, device: *mut DeviceInfoFfi);

/// The native entry points - `NativeSdk` and `MockSdk` implement this
///
/// One method per exported function. Slices replace pointer/length pairs;
/// the capacity passed across the ABI is the slice length (the shorter one
/// for the paired full-buffer calls).
pub trait AnalogSdk: Send + Sync {
    /// `wooting_analog_initialise`
    fn initialise(&self) -> c_int;

    /// `wooting_analog_is_initialised`
    fn is_initialised(&self) -> bool;

    /// `wooting_analog_uninitialise`
    fn uninitialise(&self) -> c_int;

    /// `wooting_analog_set_keycode_mode`
    fn set_keycode_mode(&self, mode: c_int) -> c_int;

    /// `wooting_analog_read_analog`
    ///
    /// Analog value in `[0, 1]`, or a negative result code cast to float.
    fn read_analog(&self, code: u16) -> f32;

    /// `wooting_analog_read_analog_device`
    fn read_analog_device(&self, code: u16, device_id: DeviceId) -> f32;

    /// `wooting_analog_read_full_buffer`
    ///
    /// Number of entries written, or a negative result code.
    fn read_full_buffer(&self, codes: &mut [u16], analog: &mut [f32]) -> c_int;

    /// `wooting_analog_read_full_buffer_device`
    fn read_full_buffer_device(
        &self,
        codes: &mut [u16],
        analog: &mut [f32],
        device_id: DeviceId,
    ) -> c_int;

    /// `wooting_analog_get_connected_devices_info`
    ///
    /// Fills `buffer` with pointers to native-owned descriptors and returns
    /// how many were written, or a negative result code.
    fn get_connected_devices_info(&self, buffer: &mut [*mut DeviceInfoFfi]) -> c_int;

    /// `wooting_analog_set_device_event_cb`
    fn set_device_event_cb(&self, callback: DeviceEventCallback) -> c_int;

    /// `wooting_analog_clear_device_event_cb`
    fn clear_device_event_cb(&self) -> c_int;
}

/// Type alias for a shared SDK handle
pub type SharedSdk = Arc<dyn AnalogSdk>;
